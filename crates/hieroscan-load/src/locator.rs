//! The sign/letter table used to find hieroglyphs on mixed pages.
//!
//! `locator.json` has the embedder fields of `model.json` followed by
//! `entries`, each `{ "embedding": [...], "aspect": 0.7, "is_sign": true }`.

use std::fs;
use std::path::Path;

use hieroscan_core::{Embedder, Pca, ShapeEntry, SignLetterModel, Standardizer};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

fn default_grid_size() -> u32 {
    hieroscan_core::embedding::DEFAULT_GRID_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorFile {
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
    #[serde(default)]
    pub standardizer: Option<Standardizer>,
    #[serde(default)]
    pub pca: Option<Pca>,
    pub entries: Vec<ShapeEntry>,
}

impl LocatorFile {
    pub fn into_model(self) -> Result<SignLetterModel, LoadError> {
        let embedder = Embedder {
            grid_size: self.grid_size,
            standardizer: self.standardizer,
            pca: self.pca,
        };
        Ok(SignLetterModel::new(embedder, self.entries)?)
    }
}

pub fn parse_sign_letter_model(json: &str) -> Result<SignLetterModel, LoadError> {
    let file: LocatorFile = serde_json::from_str(json)?;
    file.into_model()
}

pub fn load_sign_letter_model(path: impl AsRef<Path>) -> Result<SignLetterModel, LoadError> {
    let path = path.as_ref();
    let model = parse_sign_letter_model(&fs::read_to_string(path)?)?;
    tracing::debug!(path = %path.display(), entries = model.entries().len(), "loaded locator");
    Ok(model)
}
