//! Client-side synchronization and validation controller for the operative
//! roster. Keeps a local view of the roster consistent with the remote
//! service across create/update/delete, and owns the transient state
//! (loading, error banner, form selection) a rendering layer draws from.

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use shared::{
    domain::{Operative, OperativeId},
    protocol::{CreateOperativeRequest, UpdateOperativeRequest},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

pub mod breeds;
pub mod form;
pub mod gateway;

pub use breeds::{resolve_breed_options, BreedSource, CatApiBreedSource, FALLBACK_BREEDS};
pub use form::{DraftField, FieldErrors, OperativeDraft};
pub use gateway::{GatewayError, HttpRosterGateway, MissingRosterGateway, RosterGateway};

const LOAD_FAILED_MESSAGE: &str = "Failed to load the operative roster. Please try again.";
const CREATE_FAILED_MESSAGE: &str = "Failed to create operative";
const UPDATE_FAILED_MESSAGE: &str = "Failed to update operative";
const DELETE_FAILED_MESSAGE: &str = "Failed to delete operative";
const NOT_FOUND_MESSAGE: &str = "Operative not found";

/// Guard consulted before a delete is dispatched. Deletion is irreversible,
/// so nothing reaches the gateway until the prompt confirms.
#[async_trait]
pub trait DeletePrompt: Send + Sync {
    async fn confirm_delete(&self, operative: &Operative) -> bool;
}

/// Default prompt when no interactive surface is wired in: declines every
/// request, so no destructive call can be dispatched.
pub struct DenyDeletes;

#[async_trait]
impl DeletePrompt for DenyDeletes {
    async fn confirm_delete(&self, _operative: &Operative) -> bool {
        false
    }
}

/// Form visibility and edit-target selection. At most one draft is live at a
/// time; entering create or edit replaces whatever mode was active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Closed,
    Creating,
    Editing(OperativeId),
}

#[derive(Debug, Clone)]
pub enum RosterEvent {
    /// Collection, loading flag, or in-flight delete markers changed.
    RosterChanged,
    /// Form visibility or edit selection changed.
    FormChanged,
    Error(String),
}

/// Cloned view of the controller state for the rendering layer.
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    pub operatives: Vec<Operative>,
    pub loading: bool,
    pub error: Option<String>,
    pub form: FormMode,
    pub inflight_deletes: HashSet<OperativeId>,
}

struct RosterState {
    operatives: Vec<Operative>,
    loading: bool,
    error: Option<String>,
    form: FormMode,
    inflight_deletes: HashSet<OperativeId>,
    load_generation: u64,
}

/// Owns the authoritative roster collection and reconciles it from gateway
/// responses. Mutations are all-or-nothing: the collection changes only on a
/// confirmed success, and no partial state is ever observable.
pub struct RosterController {
    gateway: Arc<dyn RosterGateway>,
    delete_prompt: Arc<dyn DeletePrompt>,
    inner: Mutex<RosterState>,
    events: broadcast::Sender<RosterEvent>,
}

impl RosterController {
    pub fn new(gateway: Arc<dyn RosterGateway>) -> Arc<Self> {
        Self::new_with_delete_prompt(gateway, Arc::new(DenyDeletes))
    }

    pub fn new_with_delete_prompt(
        gateway: Arc<dyn RosterGateway>,
        delete_prompt: Arc<dyn DeletePrompt>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            gateway,
            delete_prompt,
            inner: Mutex::new(RosterState {
                operatives: Vec::new(),
                loading: false,
                error: None,
                form: FormMode::Closed,
                inflight_deletes: HashSet::new(),
                load_generation: 0,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<RosterEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> RosterSnapshot {
        let guard = self.inner.lock().await;
        RosterSnapshot {
            operatives: guard.operatives.clone(),
            loading: guard.loading,
            error: guard.error.clone(),
            form: guard.form,
            inflight_deletes: guard.inflight_deletes.clone(),
        }
    }

    /// Replaces the collection with the gateway's full listing. A load
    /// superseded by a newer one discards its response instead of clobbering
    /// the newer result; the newest load owns the loading flag.
    pub async fn load(&self) {
        let generation = {
            let mut guard = self.inner.lock().await;
            guard.loading = true;
            guard.load_generation += 1;
            guard.load_generation
        };
        let _ = self.events.send(RosterEvent::RosterChanged);

        let result = self.gateway.list_operatives().await;

        let mut guard = self.inner.lock().await;
        if guard.load_generation != generation {
            info!("roster: discarding superseded load response");
            return;
        }
        guard.loading = false;
        match result {
            Ok(operatives) => {
                info!(count = operatives.len(), "roster: listing loaded");
                guard.operatives = operatives;
                guard.error = None;
                drop(guard);
                let _ = self.events.send(RosterEvent::RosterChanged);
            }
            Err(err) => {
                warn!("roster: failed to load listing: {err}");
                guard.error = Some(LOAD_FAILED_MESSAGE.to_string());
                drop(guard);
                let _ = self.events.send(RosterEvent::RosterChanged);
                let _ = self
                    .events
                    .send(RosterEvent::Error(LOAD_FAILED_MESSAGE.to_string()));
            }
        }
    }

    /// Creates a roster entry. On success the returned operative, with its
    /// server-assigned identifier, is appended at the end and the form
    /// closes. On failure the collection is untouched and the form stays
    /// open for retry.
    pub async fn create(&self, payload: CreateOperativeRequest) {
        match self.gateway.create_operative(&payload).await {
            Ok(created) => {
                info!(operative_id = created.id.0, "roster: operative created");
                let mut guard = self.inner.lock().await;
                guard.operatives.push(created);
                guard.form = FormMode::Closed;
                guard.error = None;
                drop(guard);
                let _ = self.events.send(RosterEvent::RosterChanged);
                let _ = self.events.send(RosterEvent::FormChanged);
            }
            Err(err) => self.report_failure(CREATE_FAILED_MESSAGE, &err).await,
        }
    }

    /// Applies a salary update. The gateway's returned operative replaces
    /// the matching entry wholesale, absorbing any server-side
    /// recomputation; its position in the collection is unchanged. Success
    /// clears the edit selection and closes the form.
    pub async fn update_salary(&self, id: OperativeId, payload: UpdateOperativeRequest) {
        match self.gateway.update_operative(id, &payload).await {
            Ok(updated) => {
                info!(operative_id = id.0, "roster: operative updated");
                let mut guard = self.inner.lock().await;
                if let Some(slot) = guard
                    .operatives
                    .iter_mut()
                    .find(|operative| operative.id == id)
                {
                    *slot = updated;
                }
                guard.form = FormMode::Closed;
                guard.error = None;
                drop(guard);
                let _ = self.events.send(RosterEvent::RosterChanged);
                let _ = self.events.send(RosterEvent::FormChanged);
            }
            Err(err) => self.report_failure(UPDATE_FAILED_MESSAGE, &err).await,
        }
    }

    /// Deletes a roster entry after interactive confirmation. While a delete
    /// for `id` is in flight, further requests for the same id are ignored;
    /// other rows stay interactive.
    pub async fn delete(&self, id: OperativeId) {
        let target = {
            let guard = self.inner.lock().await;
            if guard.inflight_deletes.contains(&id) {
                info!(
                    operative_id = id.0,
                    "roster: delete already in flight, ignoring"
                );
                return;
            }
            guard
                .operatives
                .iter()
                .find(|operative| operative.id == id)
                .cloned()
        };
        let Some(target) = target else {
            warn!(
                operative_id = id.0,
                "roster: delete requested for operative not in the collection"
            );
            return;
        };

        if !self.delete_prompt.confirm_delete(&target).await {
            info!(
                operative_id = id.0,
                "roster: delete declined, nothing dispatched"
            );
            return;
        }

        {
            let mut guard = self.inner.lock().await;
            if !guard.inflight_deletes.insert(id) {
                return;
            }
        }
        let _ = self.events.send(RosterEvent::RosterChanged);

        let result = self.gateway.delete_operative(id).await;

        {
            let mut guard = self.inner.lock().await;
            guard.inflight_deletes.remove(&id);
            if result.is_ok() {
                guard.operatives.retain(|operative| operative.id != id);
                guard.error = None;
            }
        }
        match result {
            Ok(()) => {
                info!(operative_id = id.0, "roster: operative deleted");
                let _ = self.events.send(RosterEvent::RosterChanged);
            }
            Err(err) => {
                let _ = self.events.send(RosterEvent::RosterChanged);
                self.report_failure(DELETE_FAILED_MESSAGE, &err).await;
            }
        }
    }

    /// `Closed|Editing -> Creating`: opens the form for a new entry,
    /// discarding any edit selection and unsaved draft.
    pub async fn begin_create(&self) {
        {
            let mut guard = self.inner.lock().await;
            guard.form = FormMode::Creating;
        }
        let _ = self.events.send(RosterEvent::FormChanged);
    }

    /// `Closed|Creating|Editing -> Editing(id)`: selects an existing entry
    /// for salary editing, replacing any previous draft. Rejected when the
    /// id is not in the collection.
    pub async fn begin_edit(&self, id: OperativeId) -> bool {
        {
            let mut guard = self.inner.lock().await;
            if !guard.operatives.iter().any(|operative| operative.id == id) {
                warn!(
                    operative_id = id.0,
                    "roster: edit requested for operative not in the collection"
                );
                return false;
            }
            guard.form = FormMode::Editing(id);
        }
        let _ = self.events.send(RosterEvent::FormChanged);
        true
    }

    /// `Creating|Editing -> Closed`: discards the draft and selection.
    pub async fn cancel_form(&self) {
        {
            let mut guard = self.inner.lock().await;
            guard.form = FormMode::Closed;
        }
        let _ = self.events.send(RosterEvent::FormChanged);
    }

    /// The operative currently selected for editing, for seeding
    /// [`OperativeDraft::for_edit`].
    pub async fn editing_target(&self) -> Option<Operative> {
        let guard = self.inner.lock().await;
        let FormMode::Editing(id) = guard.form else {
            return None;
        };
        guard
            .operatives
            .iter()
            .find(|operative| operative.id == id)
            .cloned()
    }

    /// Validates the draft and, only when it passes, dispatches it according
    /// to the current form mode. Validation failures never touch the
    /// network.
    pub async fn submit(&self, draft: &mut OperativeDraft) -> Result<(), FieldErrors> {
        let mode = { self.inner.lock().await.form };
        match mode {
            FormMode::Closed => {
                warn!("roster: submit with no open form, ignoring");
                Ok(())
            }
            FormMode::Creating => {
                let payload = draft.submit_create()?;
                self.create(payload).await;
                Ok(())
            }
            FormMode::Editing(id) => {
                let payload = draft.submit_update()?;
                self.update_salary(id, payload).await;
                Ok(())
            }
        }
    }

    /// Clears the error banner. The banner holds only the most recent
    /// failure; there is no history to page through.
    pub async fn dismiss_error(&self) {
        {
            let mut guard = self.inner.lock().await;
            guard.error = None;
        }
        let _ = self.events.send(RosterEvent::RosterChanged);
    }

    async fn report_failure(&self, fallback: &str, err: &GatewayError) {
        let message = match err {
            GatewayError::NotFound => NOT_FOUND_MESSAGE.to_string(),
            _ => err
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        };
        warn!("roster: {message} ({err})");
        {
            let mut guard = self.inner.lock().await;
            guard.error = Some(message.clone());
        }
        let _ = self.events.send(RosterEvent::Error(message));
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
