#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use scout_portal_edit::content::{ContentError, ContentStore};
use scout_portal_edit::identity::{CurrentUser, Role};
use scout_portal_edit::session::change::{ChangePayload, ChangeValue, PendingChange};

/// In-memory stand-in for the content API. Saves succeed unless the content
/// id was scripted to fail; every call is recorded with its payload.
pub struct MockContentStore {
    fail_ids: HashSet<i64>,
    calls: Mutex<Vec<(i64, ChangePayload)>>,
}

impl MockContentStore {
    pub fn new() -> Self {
        Self {
            fail_ids: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_for(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            fail_ids: ids.into_iter().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn saved_payloads(&self) -> Vec<(i64, ChangePayload)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn save(
        &self,
        content_id: i64,
        payload: &ChangePayload,
        _credential: &str,
    ) -> Result<(), ContentError> {
        self.calls
            .lock()
            .unwrap()
            .push((content_id, payload.clone()));

        if self.fail_ids.contains(&content_id) {
            Err(ContentError::Rejected {
                content_id,
                status: 500,
            })
        } else {
            Ok(())
        }
    }
}

pub fn admin_user() -> CurrentUser {
    CurrentUser::new("akela", Role::Admin).with_credential("test-token")
}

pub fn admin_without_credential() -> CurrentUser {
    CurrentUser::new("akela", Role::Admin)
}

pub fn member_user() -> CurrentUser {
    CurrentUser::new("scout", Role::Member)
}

pub fn text_change(id: &str, content_id: i64, text: &str) -> PendingChange {
    PendingChange::new(id, content_id, ChangeValue::PlainText(text.to_string()))
}
