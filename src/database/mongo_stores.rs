use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};

use super::{AttendanceStore, CredentialStore, MongoDB, StoreError, StoreHealth, StudentStore};
use crate::models::{AttendanceEntry, AttendanceRecord, Student, User};

const DUPLICATE_KEY_CODE: i32 = 11000;

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        match e.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == DUPLICATE_KEY_CODE =>
            {
                StoreError::Duplicate
            }
            _ => StoreError::Backend(e.to_string()),
        }
    }
}

#[async_trait]
impl CredentialStore for MongoDB {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = self
            .users_collection::<User>()
            .find_one(doc! { "email": email })
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.users_collection::<User>().insert_one(user).await?;
        Ok(())
    }
}

#[async_trait]
impl StudentStore for MongoDB {
    async fn insert_student(&self, student: &Student) -> Result<(), StoreError> {
        self.students_collection::<Student>().insert_one(student).await?;
        Ok(())
    }

    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        let cursor = self.students_collection::<Student>().find(doc! {}).await?;
        let students: Vec<Student> = cursor.try_collect().await?;
        Ok(students)
    }

    async fn delete_student(&self, name: &str) -> Result<bool, StoreError> {
        let result = self
            .students_collection::<Document>()
            .delete_one(doc! { "name": name })
            .await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl AttendanceStore for MongoDB {
    async fn insert_into(&self, subject: &str, entry: &AttendanceEntry) -> Result<(), StoreError> {
        self.ensure_subject_index(subject).await;
        self.subject_collection::<AttendanceEntry>(subject)
            .insert_one(entry)
            .await?;
        Ok(())
    }

    async fn list_of(&self, subject: &str) -> Result<Vec<AttendanceRecord>, StoreError> {
        let cursor = self.subject_collection::<Document>(subject).find(doc! {}).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(document_to_record).collect())
    }

    async fn is_marked(&self, subject: &str, name: &str, date: &str) -> Result<bool, StoreError> {
        let existing = self
            .subject_collection::<Document>(subject)
            .find_one(doc! { "name": name, "date": date })
            .await?;
        Ok(existing.is_some())
    }

    async fn update_status(
        &self,
        subject: &str,
        name: &str,
        date: &str,
        status: &str,
    ) -> Result<bool, StoreError> {
        let result = self
            .subject_collection::<Document>(subject)
            .update_one(
                doc! { "name": name, "date": date },
                doc! { "$set": { "status": status } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_entry(&self, subject: &str, name: &str, date: &str) -> Result<bool, StoreError> {
        let result = self
            .subject_collection::<Document>(subject)
            .delete_one(doc! { "name": name, "date": date })
            .await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl StoreHealth for MongoDB {
    async fn ping(&self) -> Result<(), StoreError> {
        MongoDB::ping(self).await?;
        Ok(())
    }
}

/// Renders a stored document as plain JSON, with `_id` as its hex string.
fn document_to_record(mut document: Document) -> AttendanceRecord {
    if let Ok(oid) = document.get_object_id("_id") {
        document.insert("_id", oid.to_hex());
    }
    match Bson::Document(document).into_relaxed_extjson() {
        serde_json::Value::Object(map) => map,
        _ => AttendanceRecord::new(),
    }
}
