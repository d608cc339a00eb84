use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;

/// Categories the scan model was trained on, in the order of its output scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TumorClass {
    Glioma,
    Meningioma,
    Normal,
    Pituitary,
}

impl TumorClass {
    pub const ALL: [TumorClass; 4] = [
        TumorClass::Glioma,
        TumorClass::Meningioma,
        TumorClass::Normal,
        TumorClass::Pituitary,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Picks the class with the highest score. The first maximum wins on ties.
    pub fn from_scores(scores: &[f32]) -> Result<Self, ClassifierError> {
        if scores.len() != Self::ALL.len() {
            return Err(ClassifierError::UnexpectedOutput {
                expected: Self::ALL.len(),
                got: scores.len(),
            });
        }

        let (index, _) = scores
            .iter()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |best, (i, &score)| {
                if score > best.1 {
                    (i, score)
                } else {
                    best
                }
            });

        Self::from_index(index).ok_or(ClassifierError::UnexpectedOutput {
            expected: Self::ALL.len(),
            got: scores.len(),
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            TumorClass::Glioma => "Glioma Tumor",
            TumorClass::Meningioma => "Meningioma Tumor",
            TumorClass::Normal => "Normal Brain",
            TumorClass::Pituitary => "Pituitary Tumor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TumorClass::Glioma => "Gliomas are tumors that start in the glial cells of the brain or spine. They can be malignant or benign and may cause headaches, seizures, or cognitive issues.",
            TumorClass::Meningioma => "Meningiomas are tumors that arise from the meninges, the protective layers covering the brain and spinal cord. They are usually benign but can cause pressure on the brain.",
            TumorClass::Normal => "No tumor detected in the brain.",
            TumorClass::Pituitary => "Pituitary tumors develop in the pituitary gland and can affect hormone production. Symptoms may include vision problems, headaches, and hormonal imbalances.",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionResponse {
    pub prediction: String,
    pub description: String,
}

impl From<TumorClass> for PredictionResponse {
    fn from(class: TumorClass) -> Self {
        Self {
            prediction: class.label().to_string(),
            description: class.description().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorResponse {
    pub error: String,
}
