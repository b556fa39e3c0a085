mod mongo_stores;
mod stores;

pub use stores::*;

use crate::config::DatabaseNames;
use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::collections::HashSet;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const USERS_COLLECTION: &str = "users";
pub const STUDENTS_COLLECTION: &str = "users";

/// Handle to the three databases the service uses.
///
/// Built once at startup and shared by every handler through `AppState`.
#[derive(Clone)]
pub struct MongoDB {
    users: Database,
    students: Database,
    attendance: Database,
    /// Subject collections whose `(name, date)` index has been attempted.
    indexed_subjects: Arc<Mutex<HashSet<String>>>,
}

impl MongoDB {
    pub async fn new(uri: &str, names: &DatabaseNames) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));
        client_options.app_name = Some("drishyanet-service".to_string());

        let client = Client::with_options(client_options)?;

        let mongodb = Self {
            users: client.database(&names.users),
            students: client.database(&names.students),
            attendance: client.database(&names.attendance),
            indexed_subjects: Arc::default(),
        };

        // Fail at boot rather than on the first request
        mongodb.ping().await?;

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        // users(email) unique: closes the check-then-insert race on signup
        let users = self.users_collection::<Document>();
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) index: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.users.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn users_collection<T: Send + Sync>(&self) -> Collection<T> {
        self.users.collection(USERS_COLLECTION)
    }

    pub fn students_collection<T: Send + Sync>(&self) -> Collection<T> {
        self.students.collection(STUDENTS_COLLECTION)
    }

    /// Attendance is namespaced by subject: one collection per subject name.
    pub fn subject_collection<T: Send + Sync>(&self, subject: &str) -> Collection<T> {
        self.attendance.collection(subject)
    }

    /// Creates the unique `(name, date)` index on a subject collection the
    /// first time the subject is written to, so a student is marked at most
    /// once per day even when frames race.
    pub async fn ensure_subject_index(&self, subject: &str) {
        if !self.indexed_subjects.lock().await.insert(subject.to_string()) {
            return;
        }

        let index = IndexModel::builder()
            .keys(doc! { "name": 1, "date": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match self.subject_collection::<Document>(subject).create_index(index).await {
            Ok(_) => log::info!("   ✅ Index created: {}(name, date) unique", subject),
            // Existing duplicate rows block the index; marking still dedupes by lookup
            Err(e) => log::warn!("   ⚠️  Could not create {}(name, date) index: {}", subject, e),
        }
    }
}
