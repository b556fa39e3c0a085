use serde::Deserialize;

use super::{FacePosition, Recognition, RecognizerError, UNKNOWN_NAME};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOutput {
    // Batch must come first: a derived struct also accepts JSON arrays
    Batch(Vec<RawMatch>),
    Single(RawMatch),
}

#[derive(Deserialize)]
struct RawMatch {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "facePosition", alias = "face_position")]
    face_position: Option<RawPosition>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPosition {
    Named(FacePosition),
    /// `[top, right, bottom, left]`
    Ordered([i64; 4]),
}

impl From<RawPosition> for FacePosition {
    fn from(raw: RawPosition) -> Self {
        match raw {
            RawPosition::Named(position) => position,
            RawPosition::Ordered([top, right, bottom, left]) => FacePosition {
                top,
                right,
                bottom,
                left,
            },
        }
    }
}

impl RawMatch {
    fn identified(self) -> Option<Recognition> {
        let name = self.name?.trim().to_string();
        if name.is_empty() || name == UNKNOWN_NAME {
            return None;
        }
        let face_position = self.face_position?.into();
        Some(Recognition::Identified {
            name,
            face_position,
        })
    }
}

/// Interprets the recognizer's standard output.
///
/// Accepts a single `{name, facePosition}` object or a list of matches, in
/// which case the first identified match wins. Anything that is not JSON is
/// an error; JSON without an identity is [`Recognition::Unknown`].
pub fn parse_recognition(stdout: &[u8]) -> Result<Recognition, RecognizerError> {
    let text = std::str::from_utf8(stdout)
        .map_err(|e| RecognizerError::MalformedOutput(e.to_string()))?
        .trim();

    if text.is_empty() {
        return Err(RecognizerError::MalformedOutput("empty output".to_string()));
    }

    let raw = match serde_json::from_str::<RawOutput>(text) {
        Ok(raw) => raw,
        // Scripts sometimes log before printing the payload on the last line
        Err(e) => text
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .and_then(|line| serde_json::from_str::<RawOutput>(line).ok())
            .ok_or_else(|| RecognizerError::MalformedOutput(e.to_string()))?,
    };

    let recognition = match raw {
        RawOutput::Batch(matches) => matches.into_iter().find_map(RawMatch::identified),
        RawOutput::Single(single) => single.identified(),
    };

    Ok(recognition.unwrap_or(Recognition::Unknown))
}
