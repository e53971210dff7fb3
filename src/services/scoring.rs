use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use uuid::Uuid;

use crate::config::ScorerConfig;

#[derive(Error, Debug, Clone)]
pub enum ScorerError {
    #[error("scoring process failed: {details}")]
    ProcessFailed { details: String },

    #[error("scoring process produced output that is not JSON")]
    InvalidOutput { output: String },

    #[error("scoring process timed out after {0}s")]
    Timeout(u64),

    #[error("scoring I/O error: {0}")]
    Io(String),
}

/// Computes schedules, standings and brackets from raw tournament data.
#[async_trait]
pub trait TournamentScorer: Send + Sync {
    async fn score(&self, data: &Value) -> Result<Value, ScorerError>;

    /// Whether the scorer can be invoked at all, for health reporting.
    fn is_available(&self) -> bool {
        true
    }
}

/// Runs the external Python scheduler as `<python> <script> <input.json>` and
/// reads its JSON result from stdout.
pub struct PythonScorer {
    python: String,
    script: PathBuf,
    tmp_dir: PathBuf,
    timeout: Duration,
}

impl PythonScorer {
    pub fn new(config: &ScorerConfig) -> Self {
        PythonScorer {
            python: config.python.clone(),
            script: config.script.clone(),
            tmp_dir: config.tmp_dir.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn script_exists(&self) -> bool {
        self.script.is_file()
    }

    async fn run(&self, input_path: &Path) -> Result<Value, ScorerError> {
        let child = Command::new(&self.python)
            .arg(&self.script)
            .arg(input_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScorerError::Io(format!("Failed to spawn {}: {}", self.python, e)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ScorerError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| ScorerError::Io(e.to_string()))?;

        if !output.status.success() {
            return Err(ScorerError::ProcessFailed {
                details: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        match serde_json::from_str(&stdout) {
            Ok(value) => Ok(value),
            Err(_) => Err(ScorerError::InvalidOutput { output: stdout }),
        }
    }
}

#[async_trait]
impl TournamentScorer for PythonScorer {
    fn is_available(&self) -> bool {
        self.script_exists()
    }

    async fn score(&self, data: &Value) -> Result<Value, ScorerError> {
        tokio::fs::create_dir_all(&self.tmp_dir)
            .await
            .map_err(|e| ScorerError::Io(e.to_string()))?;

        let input_path = self.tmp_dir.join(format!("input_{}.json", Uuid::new_v4()));
        let payload = serde_json::to_vec(data).map_err(|e| ScorerError::Io(e.to_string()))?;
        tokio::fs::write(&input_path, payload)
            .await
            .map_err(|e| ScorerError::Io(e.to_string()))?;

        tracing::debug!("Running scorer {} on {}", self.script.display(), input_path.display());
        let result = self.run(&input_path).await;

        if let Err(e) = tokio::fs::remove_file(&input_path).await {
            tracing::warn!("Failed to remove scorer input {}: {}", input_path.display(), e);
        }

        result
    }
}
