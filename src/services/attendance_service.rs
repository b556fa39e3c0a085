use serde::{Deserialize, Serialize};

use crate::{
    database::StoreError,
    models::{AttendanceEntry, AttendanceRecord, DeleteAttendanceRequest, UpdateAttendanceRequest},
    recognizer::{FacePosition, Recognition, UNKNOWN_NAME},
    state::AppState,
    utils::{decode_frame, AppError, TempImage},
};

/// Subject used when the client does not name one.
pub const DEFAULT_SUBJECT: &str = "Default_Subject";

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RecognizeRequest {
    /// Base-64 JPEG frame, optionally as a data URI
    pub frame: Option<String>,
    pub subject_name: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RunAttendanceRequest {
    pub subject_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RecognitionResponse {
    pub name: String,
    #[serde(rename = "facePosition")]
    pub face_position: Option<FacePosition>,
}

impl RecognitionResponse {
    fn unknown() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            face_position: None,
        }
    }
}

/// Blank names fall back to [`DEFAULT_SUBJECT`]; anything else is kept as sent,
/// since it names the collection the records live in.
fn subject_or_default(subject: Option<String>) -> String {
    subject
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SUBJECT.to_string())
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::bad_request(format!("Missing field: {}", field)))
}

/// Decodes the frame, runs the recognizer on a private copy of it and marks the
/// identified student present for today.
pub async fn recognize_face(
    state: &AppState,
    request: RecognizeRequest,
) -> Result<RecognitionResponse, AppError> {
    let frame = request
        .frame
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("No image provided"))?;
    let image = decode_frame(&frame)?;
    let subject = subject_or_default(request.subject_name);

    // Lives until the recognizer returns; dropped (and deleted) on every path
    let temp = TempImage::write(image).await?;
    let recognition = state.recognizer.recognize(temp.path(), &subject).await?;
    drop(temp);

    match recognition {
        Recognition::Identified {
            name,
            face_position,
        } => {
            mark_present(state, &subject, &name).await?;
            Ok(RecognitionResponse {
                name,
                face_position: Some(face_position),
            })
        }
        Recognition::Unknown => Ok(RecognitionResponse::unknown()),
    }
}

/// Records `name` as present today unless an entry for today already exists.
async fn mark_present(state: &AppState, subject: &str, name: &str) -> Result<bool, AppError> {
    let entry = AttendanceEntry::present_now(name);

    if state.attendance.is_marked(subject, name, &entry.date).await? {
        log::debug!("ℹ️  {} already marked for {} on {}", name, subject, entry.date);
        return Ok(false);
    }

    match state.attendance.insert_into(subject, &entry).await {
        Ok(()) => {}
        // Another frame of the same student won the race for today's entry
        Err(StoreError::Duplicate) => {
            log::debug!("ℹ️  {} marked concurrently for {} on {}", name, subject, entry.date);
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    }
    log::info!("✅ Marked {} present for {} at {}", name, subject, entry.time);
    Ok(true)
}

pub async fn run_attendance(state: &AppState, request: RunAttendanceRequest) -> Result<(), AppError> {
    let subject = subject_or_default(request.subject_name);
    state.recognizer.record_attendance(&subject).await?;
    Ok(())
}

pub async fn view_attendance(
    state: &AppState,
    subject: Option<String>,
) -> Result<Vec<AttendanceRecord>, AppError> {
    let subject = subject
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Subject name required"))?;

    let records = state.attendance.list_of(&subject).await?;
    Ok(records)
}

pub async fn update_attendance(
    state: &AppState,
    request: UpdateAttendanceRequest,
) -> Result<(), AppError> {
    let subject = required(request.subject, "subject")?;
    let name = required(request.name, "name")?;
    let date = required(request.date, "date")?;
    let status = required(request.status, "status")?;

    if !state
        .attendance
        .update_status(&subject, &name, &date, &status)
        .await?
    {
        return Err(AppError::NotFound("Attendance record not found".to_string()));
    }
    Ok(())
}

pub async fn delete_attendance(
    state: &AppState,
    request: DeleteAttendanceRequest,
) -> Result<(), AppError> {
    let subject = required(request.subject, "subject")?;
    let name = required(request.name, "name")?;
    let date = required(request.date, "date")?;

    if !state.attendance.delete_entry(&subject, &name, &date).await? {
        return Err(AppError::NotFound("Attendance record not found".to_string()));
    }
    Ok(())
}
