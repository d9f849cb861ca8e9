use std::collections::BTreeMap;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{Classification, ClassifierError};

/// Client for the external image-classification endpoint. The upload is one
/// multipart field named `file`; the model itself lives behind the endpoint.
pub struct ClassifierService {
    client: Client,
    endpoint: String,
}

impl ClassifierService {
    pub fn new(config: &AppConfig) -> Result<Self, ClassifierError> {
        if !config.is_ai_tool_configured() {
            return Err(ClassifierError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            endpoint: config.ai_inference_url.clone(),
        })
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub async fn classify(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Classification, ClassifierError> {
        if bytes.is_empty() {
            return Err(ClassifierError::EmptyUpload);
        }

        info!("Submitting {} ({} bytes) for classification", file_name, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        debug!("Classifier response: {} - {}", status, response_text);

        if !status.is_success() {
            error!("Classification failed: {} - {}", status, response_text);
            return Err(ClassifierError::Upstream(format!(
                "HTTP {}: {}",
                status, response_text
            )));
        }

        let scores: BTreeMap<String, f64> = serde_json::from_str(&response_text)
            .map_err(|e| ClassifierError::Upstream(format!("unparseable response: {}", e)))?;

        validate_scores(&scores)?;

        info!("Classification returned {} classes", scores.len());
        Ok(Classification { scores })
    }
}

/// Probabilities outside [0, 1] mean the endpoint contract is broken; better
/// to fail loudly than to render nonsense confidence values.
fn validate_scores(scores: &BTreeMap<String, f64>) -> Result<(), ClassifierError> {
    for (label, value) in scores {
        if !(0.0..=1.0).contains(value) || value.is_nan() {
            return Err(ClassifierError::InvalidProbability {
                label: label.clone(),
                value: *value,
            });
        }
    }
    Ok(())
}
