// Live edit mode session: buffered content edits and the bulk save/discard
// protocol. Owned by whatever composes the page renderer; constructed per
// user session, never a global.

pub mod change;

use std::collections::HashMap;

use crate::content::ContentStore;
use crate::identity::CurrentUser;
use change::PendingChange;

/// Outcome of an edit-mode transition. `Activated.first_activation` is true
/// for the first inactive-to-active transition of the login session, so the
/// renderer can surface its one-time advisory; the session itself owns no
/// presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditModeEvent {
    Activated { first_activation: bool },
    Deactivated,
    /// Capability gate blocked the activation. Silent no-op, already logged.
    Denied,
    /// Requested state was already in effect.
    Unchanged,
}

/// Edit session manager for live edit mode.
///
/// Holds the edit-mode flag, the buffer of uncommitted changes keyed by id,
/// and a snapshot of the current user for the capability gate and commit
/// credential. The buffer is owned exclusively by this type; callers read it
/// through the accessors and mutate it only through the operations below.
pub struct EditSession {
    user: Option<CurrentUser>,
    active: bool,
    committing: bool,
    buffer: HashMap<String, PendingChange>,
    advisory_shown: bool,
    auto_activate: bool,
}

impl EditSession {
    pub fn new() -> Self {
        Self {
            user: None,
            active: false,
            committing: false,
            buffer: HashMap::new(),
            advisory_shown: false,
            auto_activate: false,
        }
    }

    /// Session carrying the one-shot auto-activation signal (the portal puts
    /// it in the navigation URL). See [`EditSession::consume_activation_signal`].
    pub fn with_auto_activate() -> Self {
        Self {
            auto_activate: true,
            ..Self::new()
        }
    }

    /// Update the current-user snapshot. Passing `None` is the logout signal:
    /// edit mode is forced off, the buffer is cleared and the first-activation
    /// advisory is re-armed, regardless of any commit that was in flight.
    pub fn set_user(&mut self, user: Option<CurrentUser>) {
        if user.is_none() {
            if self.active || !self.buffer.is_empty() {
                tracing::debug!(
                    discarded = self.buffer.len(),
                    "user logged out; tearing down edit session"
                );
            }
            self.active = false;
            self.buffer.clear();
            self.advisory_shown = false;
        }
        self.user = user;
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    fn can_edit(&self) -> bool {
        self.user
            .as_ref()
            .map(|user| user.role.can_edit_content())
            .unwrap_or(false)
    }

    pub fn is_edit_mode_active(&self) -> bool {
        self.active
    }

    pub fn is_committing(&self) -> bool {
        self.committing
    }

    /// True exactly when the buffer is non-empty. The environment keys the
    /// blocking "unsaved changes" navigation guard off this predicate.
    pub fn has_unsaved_changes(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn pending_change(&self, id: &str) -> Option<&PendingChange> {
        self.buffer.get(id)
    }

    pub fn pending_changes(&self) -> impl Iterator<Item = &PendingChange> {
        self.buffer.values()
    }

    /// Activate edit mode, subject to the capability gate. Denied activations
    /// are logged and reported but never raised as errors.
    pub fn enable_edit_mode(&mut self) -> EditModeEvent {
        if self.active {
            return EditModeEvent::Unchanged;
        }
        if !self.can_edit() {
            tracing::warn!("edit mode activation denied: current user lacks the admin role");
            return EditModeEvent::Denied;
        }

        self.active = true;
        let first_activation = !self.advisory_shown;
        self.advisory_shown = true;
        tracing::info!(first_activation, "edit mode activated");
        EditModeEvent::Activated { first_activation }
    }

    /// Deactivate edit mode. Always allowed, so a capability lost mid-session
    /// can still turn editing off. Buffered changes are kept.
    pub fn disable_edit_mode(&mut self) -> EditModeEvent {
        if !self.active {
            return EditModeEvent::Unchanged;
        }
        self.active = false;
        tracing::info!("edit mode deactivated");
        EditModeEvent::Deactivated
    }

    pub fn toggle_edit_mode(&mut self) -> EditModeEvent {
        if self.active {
            self.disable_edit_mode()
        } else {
            self.enable_edit_mode()
        }
    }

    /// Consume the one-shot auto-activation signal. Returns `Some` exactly
    /// once when the session was constructed with the signal present; the
    /// caller must then strip the signal from its routing layer so a reload
    /// cannot re-trigger it. The signal is consumed even when the capability
    /// gate denies the activation.
    pub fn consume_activation_signal(&mut self) -> Option<EditModeEvent> {
        if !self.auto_activate {
            return None;
        }
        self.auto_activate = false;
        tracing::debug!("consuming one-shot edit mode activation signal");
        Some(self.enable_edit_mode())
    }

    /// Insert or replace the buffer entry at `change.id`. Last write wins;
    /// there is no merging. Value shape is the renderer's responsibility and
    /// is not validated here.
    pub fn record_change(&mut self, change: PendingChange) {
        if !self.can_edit() {
            tracing::warn!(
                change_id = %change.id,
                "change dropped: current user lacks the admin role"
            );
            return;
        }
        tracing::debug!(change_id = %change.id, content_id = change.content_id, "change buffered");
        self.buffer.insert(change.id.clone(), change);
    }

    /// Drop a single buffered change. Unknown ids are a no-op.
    pub fn discard_change(&mut self, id: &str) {
        if self.buffer.remove(id).is_some() {
            tracing::debug!(change_id = %id, "change discarded");
        }
    }

    /// Drop every buffered change. Never issues network requests; requests
    /// already dispatched by an in-flight commit are not recalled.
    pub fn discard_all(&mut self) {
        if !self.buffer.is_empty() {
            tracing::debug!(discarded = self.buffer.len(), "all pending changes discarded");
        }
        self.buffer.clear();
    }

    /// Persist every buffered change to the content service, all requests in
    /// flight concurrently. Returns `true` and clears the buffer only when
    /// every item succeeded; on any failure the buffer is left exactly as it
    /// was so the user can retry. Diagnostics go to the log; nothing is
    /// raised across this boundary.
    ///
    /// The all-or-nothing guarantee covers the client buffer only: the
    /// content service applies each save independently, so a failed commit
    /// may still have durably written a subset server-side. Saves are
    /// idempotent per content unit, which makes the full retry safe.
    ///
    /// A second call while a commit is already in flight is rejected and
    /// returns `false` without touching the one outstanding.
    pub async fn commit_all(&mut self, store: &dyn ContentStore) -> bool {
        if self.committing {
            tracing::warn!("commit already in flight; rejecting re-entrant commit");
            return false;
        }
        if self.buffer.is_empty() {
            tracing::debug!("commit requested with empty buffer; nothing to do");
            return true;
        }

        let credential = match self
            .user
            .as_ref()
            .and_then(|user| user.credential.clone())
        {
            Some(credential) => credential,
            None => {
                tracing::warn!("commit requested without a credential; buffer left untouched");
                return false;
            }
        };

        self.committing = true;
        let total = self.buffer.len();
        tracing::info!(total, "committing buffered changes");

        let saves = self.buffer.values().map(|pending| {
            let payload = pending.payload();
            let credential = credential.as_str();
            async move {
                store
                    .save(pending.content_id, &payload, credential)
                    .await
                    .map_err(|err| {
                        tracing::error!(
                            change_id = %pending.id,
                            content_id = pending.content_id,
                            error = %err,
                            "failed to persist change"
                        );
                    })
            }
        });
        let results = futures::future::join_all(saves).await;
        self.committing = false;

        let failed = results.iter().filter(|result| result.is_err()).count();
        if failed == 0 {
            self.buffer.clear();
            tracing::info!(total, "commit succeeded; buffer cleared");
            true
        } else {
            tracing::warn!(failed, total, "commit failed; buffer preserved for retry");
            false
        }
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}
