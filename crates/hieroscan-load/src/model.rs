//! The prototype database on disk.
//!
//! A model directory holds `model.json`:
//!
//! ```json
//! {
//!   "grid_size": 64,
//!   "standardizer": { "mean": [...], "scale": [...] },
//!   "pca": { "mean": [...], "components": [[...], ...] },
//!   "prototypes": [
//!     { "sign": 77824, "core": { "embedding": [...], "aspect": 0.8 },
//!       "full": null, "parts": [] }
//!   ],
//!   "anchors": [
//!     { "sign": 78162, "corners": { "ts": {}, "be": { "y": 0.7 } } }
//!   ]
//! }
//! ```
//!
//! Signs are Unicode code points. Anchor coordinates that are left out
//! take the corner's default position.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use hieroscan_core::{
    AnchorTable, Corner, CornerAnchors, Embedder, FontInfo, PartBox, Pca, Prototype, Shape,
    Standardizer, embedding::DEFAULT_GRID_SIZE,
};
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, code_point};

/// File name of the prototype database inside a model directory.
pub const MODEL_FILE: &str = "model.json";

fn default_grid_size() -> u32 {
    DEFAULT_GRID_SIZE
}

/// Serialized form of a prototype database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
    #[serde(default)]
    pub standardizer: Option<Standardizer>,
    #[serde(default)]
    pub pca: Option<Pca>,
    pub prototypes: Vec<PrototypeRecord>,
    #[serde(default)]
    pub anchors: Vec<AnchorRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeRecord {
    pub sign: u32,
    pub core: Shape,
    #[serde(default)]
    pub full: Option<Shape>,
    #[serde(default)]
    pub parts: Vec<PartBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorRecord {
    pub sign: u32,
    pub corners: BTreeMap<String, AnchorPoint>,
}

/// Anchor override; missing coordinates keep the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl ModelFile {
    /// Embedder described by this file.
    pub fn embedder(&self) -> Embedder {
        Embedder {
            grid_size: self.grid_size,
            standardizer: self.standardizer.clone(),
            pca: self.pca.clone(),
        }
    }

    /// Convert into a validated database.
    pub fn into_font_info(self) -> Result<FontInfo, LoadError> {
        let embedder = self.embedder();
        let prototypes = self
            .prototypes
            .into_iter()
            .map(|p| {
                Ok(Prototype {
                    sign: code_point(p.sign)?,
                    core: p.core,
                    full: p.full,
                    parts: p.parts,
                })
            })
            .collect::<Result<Vec<_>, LoadError>>()?;
        let anchors = anchor_table(self.anchors)?;
        Ok(FontInfo::new(embedder, prototypes, anchors)?)
    }
}

fn anchor_table(records: Vec<AnchorRecord>) -> Result<AnchorTable, LoadError> {
    let mut table = AnchorTable::new();
    for record in records {
        let sign = code_point(record.sign)?;
        let corners = record
            .corners
            .iter()
            .map(|(code, point)| {
                let corner =
                    Corner::from_code(code).ok_or_else(|| LoadError::UnknownCorner(code.clone()))?;
                Ok((corner, point.x, point.y))
            })
            .collect::<Result<Vec<_>, LoadError>>()?;
        table.insert(sign, CornerAnchors::from_overrides(corners));
    }
    Ok(table)
}

/// Parse a prototype database from JSON text.
pub fn parse_font_info(json: &str) -> Result<FontInfo, LoadError> {
    let model: ModelFile = serde_json::from_str(json)?;
    model.into_font_info()
}

/// Load `model.json` from a model directory.
pub fn load_font_info(dir: impl AsRef<Path>) -> Result<FontInfo, LoadError> {
    let path = dir.as_ref().join(MODEL_FILE);
    let text = fs::read_to_string(&path)?;
    let font = parse_font_info(&text)?;
    tracing::debug!(
        path = %path.display(),
        prototypes = font.len(),
        anchored = font.anchor_table().len(),
        "loaded prototype database"
    );
    Ok(font)
}
