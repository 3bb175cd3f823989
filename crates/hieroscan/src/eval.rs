//! Accuracy against hand-made transcriptions.
//!
//! A region counts `len(truth)` possible hits. Each edit needed to turn the
//! prediction into the truth costs one hit, down to zero.

use hieroscan_core::{Direction, HieroError};
use hieroscan_load::RegionRow;
use image::GrayImage;

use crate::transcriber::Transcriber;

/// One region compared with its reference transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvalRecord {
    pub label: String,
    pub truth: String,
    pub predicted: String,
}

impl EvalRecord {
    pub fn new(label: impl Into<String>, truth: impl Into<String>, predicted: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            truth: truth.into(),
            predicted: predicted.into(),
        }
    }

    /// Number of characters in the reference.
    pub fn total(&self) -> usize {
        self.truth.chars().count()
    }

    /// Character edit distance between reference and prediction.
    pub fn distance(&self) -> usize {
        strsim::levenshtein(&self.truth, &self.predicted)
    }

    pub fn hits(&self) -> usize {
        self.total().saturating_sub(self.distance())
    }

    pub fn is_exact(&self) -> bool {
        self.truth == self.predicted
    }
}

/// Totals over many records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvalSummary {
    pub regions: usize,
    pub exact: usize,
    pub total: usize,
    pub hits: usize,
}

impl EvalSummary {
    pub fn from_records(records: &[EvalRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            summary.add(record);
            summary
        })
    }

    pub fn add(&mut self, record: &EvalRecord) {
        self.regions += 1;
        self.exact += usize::from(record.is_exact());
        self.total += record.total();
        self.hits += record.hits();
    }

    /// Fraction of reference characters recovered, `None` when there were
    /// none to recover.
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.hits as f64 / self.total as f64)
        }
    }
}

/// Transcribe every region of `page` left to right and compare each with
/// its stored encoding. Records are labelled `{label}:{row index}`.
///
/// # Errors
///
/// Fails on the first region that does not fit inside the page.
pub fn evaluate_regions(
    transcriber: &Transcriber,
    page: &GrayImage,
    rows: &[RegionRow],
    label: &str,
) -> Result<Vec<EvalRecord>, HieroError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let result = transcriber.transcribe_region(page, row.rect, Some(Direction::Horizontal), false)?;
            let record = EvalRecord::new(format!("{label}:{i}"), row.encoding.clone(), result.encoding);
            if !record.is_exact() {
                tracing::debug!(
                    region = %record.label,
                    truth = %record.truth,
                    predicted = %record.predicted,
                    "transcription differs"
                );
            }
            Ok(record)
        })
        .collect()
}
