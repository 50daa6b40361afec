//! Diagnostic categories and their encoding for the classifier.

use std::fmt;

use crate::error::DataError;

/// Diagnosis attached to each row of the table.
///
/// Raw targets map as `0 → Malignant`, `1 → Benign`. Malignant is the
/// category the analysis sets out to detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Diagnosis {
    /// Malignant tumor (raw target 0).
    Malignant,
    /// Benign tumor (raw target 1).
    Benign,
}

impl Diagnosis {
    /// Row/column order for confusion matrices and heatmaps.
    pub const DISPLAY_ORDER: [Diagnosis; 2] = [Diagnosis::Malignant, Diagnosis::Benign];

    /// The category whose detection precision, recall and F1 measure.
    pub const POSITIVE: Diagnosis = Diagnosis::Malignant;

    /// Map a raw dataset target to a category.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownTarget`] for anything but 0 or 1; `row`
    /// is only used in the error.
    pub fn from_raw_target(raw: u32, row: usize) -> Result<Self, DataError> {
        match raw {
            0 => Ok(Diagnosis::Malignant),
            1 => Ok(Diagnosis::Benign),
            _ => Err(DataError::UnknownTarget { row, raw }),
        }
    }

    /// The raw 0/1 target this category came from.
    #[must_use]
    pub fn raw_target(self) -> u32 {
        match self {
            Diagnosis::Malignant => 0,
            Diagnosis::Benign => 1,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Diagnosis::Malignant => "Malignant",
            Diagnosis::Benign => "Benign",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps categories to dense class indices in alphabetical order of their names.
///
/// With both categories present this gives `Benign = 0`, `Malignant = 1`,
/// so column 1 of a probability matrix belongs to `Malignant`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<Diagnosis>,
}

impl LabelEncoder {
    /// Collect the distinct categories in `labels`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::EmptyDataset`] when `labels` is empty.
    pub fn fit(labels: &[Diagnosis]) -> Result<Self, DataError> {
        if labels.is_empty() {
            return Err(DataError::EmptyDataset);
        }
        let mut classes = labels.to_vec();
        classes.sort_unstable_by_key(|d| d.name());
        classes.dedup();
        Ok(Self { classes })
    }

    /// Fitted categories; position is the class index.
    #[must_use]
    pub fn classes(&self) -> &[Diagnosis] {
        &self.classes
    }

    /// Number of fitted categories.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Class index of one category.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownCategory`] if it was not seen by [`Self::fit`].
    pub fn encode(&self, label: Diagnosis) -> Result<usize, DataError> {
        self.classes
            .iter()
            .position(|&c| c == label)
            .ok_or_else(|| DataError::UnknownCategory {
                label: label.name().to_string(),
            })
    }

    /// Encode every label.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownCategory`] on the first unseen category.
    pub fn encode_all(&self, labels: &[Diagnosis]) -> Result<Vec<usize>, DataError> {
        labels.iter().map(|&l| self.encode(l)).collect()
    }

    /// Category for a class index.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::ClassIndexOutOfRange`] past the last class.
    pub fn decode(&self, index: usize) -> Result<Diagnosis, DataError> {
        self.classes
            .get(index)
            .copied()
            .ok_or(DataError::ClassIndexOutOfRange {
                index,
                n_classes: self.classes.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_target_mapping() {
        assert_eq!(Diagnosis::from_raw_target(0, 0).unwrap(), Diagnosis::Malignant);
        assert_eq!(Diagnosis::from_raw_target(1, 0).unwrap(), Diagnosis::Benign);
        assert!(matches!(
            Diagnosis::from_raw_target(2, 7),
            Err(DataError::UnknownTarget { row: 7, raw: 2 })
        ));
        for d in Diagnosis::DISPLAY_ORDER {
            assert_eq!(Diagnosis::from_raw_target(d.raw_target(), 0).unwrap(), d);
        }
    }

    #[test]
    fn display_order_starts_with_positive() {
        assert_eq!(Diagnosis::DISPLAY_ORDER[0], Diagnosis::POSITIVE);
        assert_eq!(Diagnosis::Benign.to_string(), "Benign");
    }

    #[test]
    fn encoder_sorts_by_name() {
        let labels = [Diagnosis::Malignant, Diagnosis::Benign, Diagnosis::Malignant];
        let encoder = LabelEncoder::fit(&labels).unwrap();
        assert_eq!(encoder.classes(), [Diagnosis::Benign, Diagnosis::Malignant]);
        assert_eq!(encoder.encode_all(&labels).unwrap(), vec![1, 0, 1]);
        assert_eq!(encoder.decode(1).unwrap(), Diagnosis::Malignant);
    }

    #[test]
    fn encoder_rejects_unseen_category() {
        let encoder = LabelEncoder::fit(&[Diagnosis::Benign]).unwrap();
        assert_eq!(encoder.n_classes(), 1);
        assert!(matches!(
            encoder.encode(Diagnosis::Malignant),
            Err(DataError::UnknownCategory { .. })
        ));
        assert!(matches!(
            encoder.decode(1),
            Err(DataError::ClassIndexOutOfRange {
                index: 1,
                n_classes: 1
            })
        ));
    }

    #[test]
    fn encoder_needs_labels() {
        assert!(matches!(LabelEncoder::fit(&[]), Err(DataError::EmptyDataset)));
    }
}
