//! Gardiner names of signs, read from `unipoints.json`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use hieroscan_core::controls::control_name;

use crate::error::{LoadError, code_point};

/// Bidirectional table between sign names (e.g. "A1") and code points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignNames {
    by_sign: HashMap<char, String>,
    by_name: HashMap<String, char>,
}

impl SignNames {
    /// Parse a JSON object mapping names to code points.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let raw: BTreeMap<String, u32> = serde_json::from_str(json)?;
        let mut names = SignNames::default();
        for (name, value) in raw {
            let sign = code_point(value)?;
            names.by_sign.insert(sign, name.clone());
            names.by_name.insert(name, sign);
        }
        Ok(names)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let names = Self::from_json(&fs::read_to_string(path)?)?;
        tracing::debug!(path = %path.display(), signs = names.len(), "loaded sign names");
        Ok(names)
    }

    pub fn len(&self) -> usize {
        self.by_sign.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sign.is_empty()
    }

    pub fn name(&self, sign: char) -> Option<&str> {
        self.by_sign.get(&sign).map(String::as_str)
    }

    pub fn sign(&self, name: &str) -> Option<char> {
        self.by_name.get(name).copied()
    }

    /// Readable form of an encoding: one name per character, separated by
    /// spaces. Controls are spelled out; unknown signs appear as `U+XXXXX`.
    pub fn describe(&self, encoding: &str) -> String {
        encoding
            .chars()
            .map(|c| match (self.name(c), control_name(c)) {
                (Some(name), _) => name.to_string(),
                (None, Some(control)) => control.to_string(),
                (None, None) => format!("U+{:04X}", u32::from(c)),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
