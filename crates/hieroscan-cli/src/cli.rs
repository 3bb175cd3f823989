use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use hieroscan::Direction;
use hieroscan::hieroscan_core::segmentation::INK_THRESHOLD;

/// Segment, transcribe and locate hieroglyphic text in images.
#[derive(Debug, Parser)]
#[command(name = "hieroscan", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the connected components of an image
    Segments {
        /// Path to the image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Pixels at or below this intensity are ink
        #[arg(long, default_value_t = INK_THRESHOLD)]
        threshold: u8,

        /// Connect pixels horizontally and vertically only
        #[arg(long)]
        strict: bool,

        /// Drop components with a smaller bounding box area
        #[arg(long)]
        min_area: Option<u64>,

        /// Drop components with a smaller ink-to-box ratio
        #[arg(long)]
        min_ink_density: Option<f64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Transcribe an image to Unicode
    Transcribe {
        /// Path to the image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Model directory containing model.json
        #[arg(long, value_name = "DIR")]
        model: PathBuf,

        /// Reading direction. Default: vertical for images taller than wide
        #[arg(long, value_enum)]
        direction: Option<DirectionArg>,

        /// Sign-name table (unipoints.json) for readable output
        #[arg(long, value_name = "FILE")]
        names: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,

        /// Only transcribe this area of the image
        #[arg(long, value_name = "X,Y,W,H")]
        region: Option<String>,

        /// Follow signs that cross the region edge
        #[arg(long, requires = "region")]
        regrow: bool,
    },

    /// Find hieroglyphic regions on a page and transcribe each
    Locate {
        /// Path to the page image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Sign/letter table (locator.json)
        #[arg(long, value_name = "FILE")]
        locator: PathBuf,

        /// Model directory containing model.json
        #[arg(long, value_name = "DIR")]
        model: PathBuf,

        /// Write the region file here instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Compare transcriptions with a region file
    Eval {
        /// Model directory containing model.json
        #[arg(long, value_name = "DIR")]
        model: PathBuf,

        /// Path to the page image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Region file with reference encodings
        #[arg(value_name = "REGIONS")]
        regions: PathBuf,
    },
}

/// Output format for listings.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Plain text (tab-separated)
    Text,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

/// Output format for transcriptions.
#[derive(Debug, Clone, ValueEnum)]
pub enum TextFormat {
    /// The encoding on one line
    Text,
    /// Encoding, direction and signs as JSON
    Json,
}

/// Reading direction.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    /// Horizontal
    H,
    /// Vertical
    V,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::H => Direction::Horizontal,
            DirectionArg::V => Direction::Vertical,
        }
    }
}
