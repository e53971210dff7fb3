use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};

/// Fetches raw tournament data from the spreadsheet-backed web app.
#[derive(Clone)]
pub struct SheetClient {
    client: Client,
    url: String,
}

impl SheetClient {
    pub fn new(url: String) -> Self {
        SheetClient {
            client: Client::new(),
            url,
        }
    }

    pub async fn fetch_raw(&self) -> Result<Value> {
        tracing::debug!("Fetching tournament data from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, "Tournament sheet HTTP error {}", status);
            return Err(AppError::Upstream(format!(
                "HTTP {}: {}",
                status,
                error_text.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid tournament data: {}", e)))
    }
}
