use async_trait::async_trait;

use crate::models::{AttendanceEntry, AttendanceRecord, Student, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate key")]
    Duplicate,
    #[error("{0}")]
    Backend(String),
}

/// Accounts used for signup and signin.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the email is already taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
}

#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn insert_student(&self, student: &Student) -> Result<(), StoreError>;

    async fn list_students(&self) -> Result<Vec<Student>, StoreError>;

    /// Returns `false` when no student had that name.
    async fn delete_student(&self, name: &str) -> Result<bool, StoreError>;
}

/// Per-subject attendance collections.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] when `entry.name` already has an
    /// entry for `entry.date` in that subject.
    async fn insert_into(&self, subject: &str, entry: &AttendanceEntry) -> Result<(), StoreError>;

    async fn list_of(&self, subject: &str) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn is_marked(&self, subject: &str, name: &str, date: &str) -> Result<bool, StoreError>;

    async fn update_status(
        &self,
        subject: &str,
        name: &str,
        date: &str,
        status: &str,
    ) -> Result<bool, StoreError>;

    async fn delete_entry(&self, subject: &str, name: &str, date: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}
