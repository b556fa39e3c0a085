//! Face recognition capability used by the attendance handlers.
//!
//! Handlers only see the [`Recognizer`] trait; [`ProcessRecognizer`] runs the
//! external recognition script as a child process.

mod output;
mod process;

pub use output::parse_recognition;
pub use process::ProcessRecognizer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Name reported when no enrolled face matches.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Face bounding box in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FacePosition {
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
    pub left: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    Identified {
        name: String,
        face_position: FacePosition,
    },
    /// No face, or no enrolled identity matched. Not an error.
    Unknown,
}

#[derive(Debug, thiserror::Error)]
pub enum RecognizerError {
    #[error("failed to start recognizer: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("recognizer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("recognizer timed out after {0:?}")]
    TimedOut(Duration),
    #[error("malformed recognizer output: {0}")]
    MalformedOutput(String),
}

#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Identifies the face in the image at `image` against the enrolment for `subject`.
    async fn recognize(&self, image: &Path, subject: &str) -> Result<Recognition, RecognizerError>;

    /// Runs the recognizer in "record attendance" mode for `subject`.
    async fn record_attendance(&self, subject: &str) -> Result<(), RecognizerError>;
}
