//! Shared helpers for unit tests: environment guards and in-memory fakes of
//! the profile, account and push collaborators.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::FirebaseConfig;
use crate::error::{AppError, AppResult};
use crate::external::google::{
    FIRESTORE_SERVICE, IDENTITY_SERVICE, MESSAGING_SERVICE, USER_NOT_FOUND_MESSAGE,
};
use crate::models::UserProfile;
use crate::repositories::{AccountRepository, ProfileRepository, Repositories};
use crate::services::notifications::{PushMessage, PushProvider, PushReceipt};
use crate::services::Services;
use crate::state::AppState;

/// Serializes tests that read or mutate process environment variables
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Sets or removes environment variables and restores them on drop
pub struct EnvGuard {
    vars_to_restore: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            vars_to_restore: Vec::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        let original = std::env::var(key).ok();
        self.vars_to_restore.push((key.to_string(), original));
        unsafe {
            std::env::set_var(key, value);
        }
    }

    pub fn remove(&mut self, key: &str) {
        let original = std::env::var(key).ok();
        self.vars_to_restore.push((key.to_string(), original));
        unsafe {
            std::env::remove_var(key);
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // reverse order so a key touched twice ends at its first original value
        for (key, original_value) in self.vars_to_restore.iter().rev() {
            unsafe {
                match original_value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}

/// Profile records kept in memory
#[derive(Default)]
pub struct InMemoryProfiles {
    records: Mutex<BTreeMap<String, UserProfile>>,
    deleted: Mutex<Vec<String>>,
    read_failure: Option<String>,
    delete_failure: Option<String>,
    delete_delay: Option<Duration>,
}

impl InMemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, id: &str, fcm_token: Option<&str>) -> Self {
        self.records.lock().unwrap().insert(
            id.to_string(),
            UserProfile {
                id: id.to_string(),
                fcm_token: fcm_token.map(str::to_string),
            },
        );
        self
    }

    pub fn failing_reads(mut self, message: &str) -> Self {
        self.read_failure = Some(message.to_string());
        self
    }

    pub fn failing_deletes(mut self, message: &str) -> Self {
        self.delete_failure = Some(message.to_string());
        self
    }

    pub fn with_delete_delay(mut self, delay: Duration) -> Self {
        self.delete_delay = Some(delay);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.lock().unwrap().contains_key(id)
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfiles {
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        if let Some(message) = &self.read_failure {
            return Err(AppError::upstream(FIRESTORE_SERVICE, Some(503), message.clone()));
        }
        Ok(self.records.lock().unwrap().get(user_id).cloned())
    }

    async fn delete(&self, user_id: &str) -> AppResult<()> {
        if let Some(delay) = self.delete_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.delete_failure {
            return Err(AppError::upstream(FIRESTORE_SERVICE, Some(503), message.clone()));
        }
        self.records.lock().unwrap().remove(user_id);
        self.deleted.lock().unwrap().push(user_id.to_string());
        Ok(())
    }
}

/// Authentication accounts kept in memory. Deleting an unknown uid fails the
/// way Identity Toolkit does.
#[derive(Default)]
pub struct InMemoryAccounts {
    accounts: Mutex<BTreeSet<String>>,
    deleted: Mutex<Vec<String>>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, uid: &str) -> Self {
        self.accounts.lock().unwrap().insert(uid.to_string());
        self
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.accounts.lock().unwrap().contains(uid)
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccounts {
    async fn delete_account(&self, uid: &str) -> AppResult<()> {
        if !self.accounts.lock().unwrap().remove(uid) {
            return Err(AppError::upstream(
                IDENTITY_SERVICE,
                Some(400),
                USER_NOT_FOUND_MESSAGE,
            ));
        }
        self.deleted.lock().unwrap().push(uid.to_string());
        Ok(())
    }
}

/// Push provider that records every message it is asked to send
#[derive(Default)]
pub struct RecordingPush {
    sent: Mutex<Vec<PushMessage>>,
    failure: Option<String>,
}

impl RecordingPush {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushProvider for RecordingPush {
    async fn send(&self, message: &PushMessage) -> AppResult<PushReceipt> {
        if let Some(failure) = &self.failure {
            return Err(AppError::upstream(MESSAGING_SERVICE, Some(404), failure.clone()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(message.clone());
        Ok(PushReceipt {
            message_id: format!("projects/test/messages/{}", sent.len()),
            duration_ms: 0,
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub fn test_firebase_config() -> FirebaseConfig {
    FirebaseConfig {
        project_id: "salon-test".to_string(),
        ..Default::default()
    }
}

/// Application state wired to the given fakes
pub fn fake_state(
    profiles: Arc<InMemoryProfiles>,
    accounts: Arc<InMemoryAccounts>,
    push: Arc<RecordingPush>,
) -> AppState {
    let firebase = test_firebase_config();
    let repos = Repositories {
        profiles,
        accounts,
    };
    let services = Services::new(repos, push, firebase.admin_user_id.clone());
    AppState::from_parts(services, firebase)
}
