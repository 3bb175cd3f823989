mod cli;
mod eval_cmd;
mod locate_cmd;
mod segments_cmd;
mod shared;
mod transcribe_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_tracing();

    let result = match cli.command {
        cli::Commands::Segments {
            ref image,
            threshold,
            strict,
            min_area,
            min_ink_density,
            ref format,
        } => segments_cmd::run(image, threshold, strict, min_area, min_ink_density, format),
        cli::Commands::Transcribe {
            ref image,
            ref model,
            direction,
            ref names,
            ref format,
            ref region,
            regrow,
        } => transcribe_cmd::run(
            image,
            model,
            direction.map(Into::into),
            names.as_deref(),
            format,
            region.as_deref(),
            regrow,
        ),
        cli::Commands::Locate {
            ref image,
            ref locator,
            ref model,
            ref output,
        } => locate_cmd::run(image, locator, model, output.as_deref()),
        cli::Commands::Eval {
            ref model,
            ref image,
            ref regions,
        } => eval_cmd::run(model, image, regions),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
