//! In-memory stand-ins for the stores and the recognizer, used by unit tests.

use actix_web::{web, App};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::database::{AttendanceStore, CredentialStore, StoreError, StoreHealth, StudentStore};
use crate::models::{AttendanceEntry, AttendanceRecord, Student, User};
use crate::recognizer::{FacePosition, Recognition, Recognizer, RecognizerError};
use crate::services::auth_service::AuthSettings;
use crate::state::AppState;

pub const TEST_SECRET: &str = "test-secret";

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
    duplicate_on_insert: AtomicBool,
}

impl InMemoryUsers {
    pub fn get(&self, email: &str) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.email == email).cloned()
    }

    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn seed(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    /// Simulates losing the check-then-insert race to another signup.
    pub fn fail_inserts_as_duplicate(&self) {
        self.duplicate_on_insert.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialStore for InMemoryUsers {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.get(email))
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        if self.duplicate_on_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Duplicate);
        }
        let mut users = self.users.lock().unwrap();
        // mirrors the unique index on users(email)
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate);
        }
        users.push(user.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryStudents {
    students: Mutex<Vec<Student>>,
}

impl InMemoryStudents {
    pub fn all(&self) -> Vec<Student> {
        self.students.lock().unwrap().clone()
    }
}

#[async_trait]
impl StudentStore for InMemoryStudents {
    async fn insert_student(&self, student: &Student) -> Result<(), StoreError> {
        self.students.lock().unwrap().push(student.clone());
        Ok(())
    }

    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.all())
    }

    async fn delete_student(&self, name: &str) -> Result<bool, StoreError> {
        let mut students = self.students.lock().unwrap();
        match students.iter().position(|s| s.name.as_deref() == Some(name)) {
            Some(idx) => {
                students.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryAttendance {
    subjects: Mutex<HashMap<String, Vec<AttendanceRecord>>>,
    unavailable: AtomicBool,
    stale_lookups: AtomicBool,
}

impl InMemoryAttendance {
    pub fn records(&self, subject: &str) -> Vec<AttendanceRecord> {
        self.subjects
            .lock()
            .unwrap()
            .get(subject)
            .cloned()
            .unwrap_or_default()
    }

    pub fn seed(&self, subject: &str, record: AttendanceRecord) {
        self.subjects
            .lock()
            .unwrap()
            .entry(subject.to_string())
            .or_default()
            .push(record);
    }

    pub fn set_unavailable(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    /// `is_marked` always answers `false`, as if a concurrent insert had not
    /// landed yet when the lookup ran.
    pub fn use_stale_lookups(&self) {
        self.stale_lookups.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection refused".to_string()));
        }
        Ok(())
    }
}

fn matches_entry(record: &AttendanceRecord, name: &str, date: &str) -> bool {
    record.get("name").and_then(|v| v.as_str()) == Some(name)
        && record.get("date").and_then(|v| v.as_str()) == Some(date)
}

#[async_trait]
impl AttendanceStore for InMemoryAttendance {
    async fn insert_into(&self, subject: &str, entry: &AttendanceEntry) -> Result<(), StoreError> {
        self.check()?;
        let record = match serde_json::to_value(entry) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => return Err(StoreError::Backend("entry is not an object".to_string())),
        };
        let mut subjects = self.subjects.lock().unwrap();
        let records = subjects.entry(subject.to_string()).or_default();
        // mirrors the unique index on (name, date)
        if records.iter().any(|r| matches_entry(r, &entry.name, &entry.date)) {
            return Err(StoreError::Duplicate);
        }
        records.push(record);
        Ok(())
    }

    async fn list_of(&self, subject: &str) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.check()?;
        Ok(self.records(subject))
    }

    async fn is_marked(&self, subject: &str, name: &str, date: &str) -> Result<bool, StoreError> {
        self.check()?;
        if self.stale_lookups.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self
            .records(subject)
            .iter()
            .any(|r| matches_entry(r, name, date)))
    }

    async fn update_status(
        &self,
        subject: &str,
        name: &str,
        date: &str,
        status: &str,
    ) -> Result<bool, StoreError> {
        self.check()?;
        let mut subjects = self.subjects.lock().unwrap();
        let record = subjects
            .get_mut(subject)
            .and_then(|records| records.iter_mut().find(|r| matches_entry(r, name, date)));
        match record {
            Some(record) => {
                record.insert("status".to_string(), status.into());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_entry(&self, subject: &str, name: &str, date: &str) -> Result<bool, StoreError> {
        self.check()?;
        let mut subjects = self.subjects.lock().unwrap();
        let Some(records) = subjects.get_mut(subject) else {
            return Ok(false);
        };
        match records.iter().position(|r| matches_entry(r, name, date)) {
            Some(idx) => {
                records.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct FakeHealth {
    down: AtomicBool,
}

impl FakeHealth {
    pub fn set_down(&self) {
        self.down.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoreHealth for FakeHealth {
    async fn ping(&self) -> Result<(), StoreError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("server selection timeout".to_string()));
        }
        Ok(())
    }
}

/// Recognizer that "identifies" whoever is named inside the image file.
///
/// `nobody` yields no match and `crash` a process failure.
#[derive(Default)]
pub struct ScriptedRecognizer {
    calls: AtomicUsize,
    seen: Mutex<Vec<PathBuf>>,
    fail_trigger: bool,
}

impl ScriptedRecognizer {
    pub fn failing_trigger() -> Self {
        Self {
            fail_trigger: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_paths(&self) -> Vec<PathBuf> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Recognizer for ScriptedRecognizer {
    async fn recognize(&self, image: &Path, _subject: &str) -> Result<Recognition, RecognizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(image.to_path_buf());

        let name = std::fs::read_to_string(image).map_err(RecognizerError::Spawn)?;
        // let concurrent requests interleave between reading and answering
        tokio::task::yield_now().await;

        match name.as_str() {
            "nobody" => Ok(Recognition::Unknown),
            "crash" => Err(RecognizerError::Failed {
                status: "exit status: 1".to_string(),
                stderr: "Traceback".to_string(),
            }),
            _ => Ok(Recognition::Identified {
                name,
                face_position: FacePosition {
                    top: 10,
                    right: 80,
                    bottom: 90,
                    left: 5,
                },
            }),
        }
    }

    async fn record_attendance(&self, _subject: &str) -> Result<(), RecognizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_trigger {
            return Err(RecognizerError::Failed {
                status: "exit status: 2".to_string(),
                stderr: "camera not found".to_string(),
            });
        }
        Ok(())
    }
}

pub struct TestContext {
    pub users: Arc<InMemoryUsers>,
    pub students: Arc<InMemoryStudents>,
    pub attendance: Arc<InMemoryAttendance>,
    pub health: Arc<FakeHealth>,
    pub recognizer: Arc<ScriptedRecognizer>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_recognizer(Arc::new(ScriptedRecognizer::default()))
    }

    pub fn with_recognizer(recognizer: Arc<ScriptedRecognizer>) -> Self {
        Self {
            users: Arc::default(),
            students: Arc::default(),
            attendance: Arc::default(),
            health: Arc::default(),
            recognizer,
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            users: self.users.clone(),
            students: self.students.clone(),
            attendance: self.attendance.clone(),
            health: self.health.clone(),
            recognizer: self.recognizer.clone(),
            // minimum bcrypt cost keeps the tests fast
            auth: AuthSettings::new(TEST_SECRET, chrono::Duration::minutes(60), 4),
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}

pub fn test_app(
    state: AppState,
    recognition_enabled: bool,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(move |cfg| crate::api::configure(cfg, recognition_enabled))
}
