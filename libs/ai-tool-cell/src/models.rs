use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use shared_models::error::AppError;

/// Classifier output: class name to probability in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub scores: BTreeMap<String, f64>,
}

impl Classification {
    /// The highest-probability class, if any scores came back.
    pub fn top(&self) -> Option<(&str, f64)> {
        self.scores
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(label, score)| (label.as_str(), *score))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationView {
    pub scores: BTreeMap<String, f64>,
    pub top_label: Option<String>,
    pub top_score: Option<f64>,
}

impl From<Classification> for ClassificationView {
    fn from(classification: Classification) -> Self {
        let (top_label, top_score) = match classification.top() {
            Some((label, score)) => (Some(label.to_string()), Some(score)),
            None => (None, None),
        };
        Self {
            scores: classification.scores,
            top_label,
            top_score,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("image classification endpoint is not configured")]
    NotConfigured,

    #[error("no image data was uploaded")]
    EmptyUpload,

    #[error("classifier returned probability {value} for {label}, outside [0, 1]")]
    InvalidProbability { label: String, value: f64 },

    #[error("classifier error: {0}")]
    Upstream(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<ClassifierError> for AppError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::EmptyUpload => AppError::ValidationError(err.to_string()),
            ClassifierError::NotConfigured
            | ClassifierError::InvalidProbability { .. }
            | ClassifierError::Upstream(_)
            | ClassifierError::Transport(_) => AppError::ExternalService(err.to_string()),
        }
    }
}
