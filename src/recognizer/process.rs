use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::{parse_recognition, Recognition, Recognizer, RecognizerError};
use crate::config::RecognizerConfig;

/// Runs the recognition script once per call: `<program> <script> [image] <subject>`.
///
/// Arguments go straight to the child, never through a shell, so subject
/// names cannot inject commands.
#[derive(Debug, Clone)]
pub struct ProcessRecognizer {
    program: String,
    script: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessRecognizer {
    pub fn new(config: &RecognizerConfig) -> Self {
        Self {
            program: config.program.clone(),
            script: config.script.clone(),
            timeout: config.timeout,
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(&self.script)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        command
    }

    async fn execute(&self, mut command: Command) -> Result<Vec<u8>, RecognizerError> {
        let pending = command.output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, pending)
                .await
                .map_err(|_| RecognizerError::TimedOut(limit))?,
            None => pending.await,
        }
        .map_err(RecognizerError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::error!("❌ Recognizer exited with {}: {}", output.status, stderr);
            return Err(RecognizerError::Failed {
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl Recognizer for ProcessRecognizer {
    async fn recognize(&self, image: &Path, subject: &str) -> Result<Recognition, RecognizerError> {
        log::debug!("🐍 Running recognizer on {} for subject {}", image.display(), subject);

        let mut command = self.command();
        command.arg(image).arg(subject);

        let stdout = self.execute(command).await?;
        parse_recognition(&stdout)
    }

    async fn record_attendance(&self, subject: &str) -> Result<(), RecognizerError> {
        log::debug!("🐍 Running recognizer in attendance mode for subject {}", subject);

        let mut command = self.command();
        command.arg(subject);

        self.execute(command).await?;
        Ok(())
    }
}
