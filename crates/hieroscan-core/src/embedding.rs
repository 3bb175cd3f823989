//! Appearance embeddings of sign images.
//!
//! An image is resized to a fixed square grid and flattened row by row into
//! a vector of intensities. When the prototype database was trained with a
//! standardizing scaler and a PCA projection, the same transforms are
//! applied here so that unknown shapes land in the prototypes' space.

use image::GrayImage;
use image::imageops::{self, FilterType};

use crate::error::HieroError;

/// Default side length of the resampling grid.
pub const DEFAULT_GRID_SIZE: u32 = 64;

/// Per-feature standardization: `(v - mean) / scale`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Standardizer {
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
}

/// Linear projection onto principal components: `components · (v - mean)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pca {
    pub mean: Vec<f32>,
    /// One row per output dimension.
    pub components: Vec<Vec<f32>>,
}

/// Maps grayscale images to fixed-length vectors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Embedder {
    pub grid_size: u32,
    pub standardizer: Option<Standardizer>,
    pub pca: Option<Pca>,
}

impl Default for Embedder {
    fn default() -> Self {
        Self::raw(DEFAULT_GRID_SIZE)
    }
}

impl Embedder {
    /// An embedder that only resamples and flattens.
    pub fn raw(grid_size: u32) -> Self {
        Self {
            grid_size,
            standardizer: None,
            pca: None,
        }
    }

    /// Length of the flattened grid.
    pub fn input_dim(&self) -> usize {
        self.grid_size as usize * self.grid_size as usize
    }

    /// Length of the produced embeddings.
    pub fn output_dim(&self) -> usize {
        match &self.pca {
            Some(pca) => pca.components.len(),
            None => self.input_dim(),
        }
    }

    /// Check that the transforms fit the grid.
    pub fn validate(&self) -> Result<(), HieroError> {
        if self.grid_size == 0 {
            return Err(HieroError::InvalidModel("grid size must be positive".to_string()));
        }
        let dim = self.input_dim();
        if let Some(standardizer) = &self.standardizer {
            check_len("standardizer mean", dim, standardizer.mean.len())?;
            check_len("standardizer scale", dim, standardizer.scale.len())?;
            if standardizer.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err(HieroError::InvalidModel(
                    "standardizer scale must be finite and non-zero".to_string(),
                ));
            }
        }
        if let Some(pca) = &self.pca {
            check_len("PCA mean", dim, pca.mean.len())?;
            if pca.components.is_empty() {
                return Err(HieroError::InvalidModel("PCA has no components".to_string()));
            }
            for (i, component) in pca.components.iter().enumerate() {
                check_len(&format!("PCA component {i}"), dim, component.len())?;
            }
        }
        Ok(())
    }

    /// Embed a grayscale image.
    pub fn embed(&self, image: &GrayImage) -> Vec<f32> {
        let resized = imageops::resize(image, self.grid_size, self.grid_size, FilterType::Triangle);
        let mut vec: Vec<f32> = resized.pixels().map(|p| f32::from(p.0[0])).collect();

        if let Some(standardizer) = &self.standardizer {
            for ((v, mean), scale) in vec
                .iter_mut()
                .zip(&standardizer.mean)
                .zip(&standardizer.scale)
            {
                *v = (*v - mean) / scale;
            }
        }

        match &self.pca {
            Some(pca) => pca
                .components
                .iter()
                .map(|component| {
                    component
                        .iter()
                        .zip(vec.iter().zip(&pca.mean))
                        .map(|(c, (v, m))| c * (v - m))
                        .sum()
                })
                .collect(),
            None => vec,
        }
    }
}

pub(crate) fn check_len(context: &str, expected: usize, actual: usize) -> Result<(), HieroError> {
    if expected == actual {
        Ok(())
    } else {
        Err(HieroError::DimensionMismatch {
            context: context.to_string(),
            expected,
            actual,
        })
    }
}

/// Squared Euclidean distance between two embeddings of equal length.
pub fn squared_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum()
}
