use serde::{Deserialize, Serialize};

/// A stored attendance document exactly as read back from a subject collection.
pub type AttendanceRecord = serde_json::Map<String, serde_json::Value>;

pub const STATUS_PRESENT: &str = "Present";

/// Entry written when a recognised student is marked present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub name: String,
    pub status: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `YYYY-MM-DD HH:MM:SS`, the same shape the recognizer script writes
    pub time: String,
}

impl AttendanceEntry {
    pub fn present_now(name: &str) -> Self {
        let now = chrono::Local::now();
        Self {
            name: name.to_string(),
            status: STATUS_PRESENT.to_string(),
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ViewAttendanceQuery {
    pub subject_name: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateAttendanceRequest {
    pub subject: Option<String>,
    pub name: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DeleteAttendanceRequest {
    pub subject: Option<String>,
    pub name: Option<String>,
    pub date: Option<String>,
}
