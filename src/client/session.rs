use std::time::Instant;

use tracing::{debug, warn};

use super::{
    api::TaskClient,
    view::{reconcile, Outcome, ViewState},
};

/// Keeps a [`ViewState`] in sync with the task service.
///
/// Each operation issues at most one request and applies the response
/// through [`reconcile`]; the view is never touched before the server
/// has answered.
pub struct SyncSession {
    client: TaskClient,
    view: ViewState,
}

impl SyncSession {
    pub fn new(client: TaskClient) -> Self {
        Self {
            client,
            view: ViewState::default(),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub async fn load(&mut self) {
        let result = self.client.list().await;
        match &result {
            Ok(tasks) => debug!(count = tasks.len(), "loaded tasks"),
            Err(error) => warn!(%error, "failed to fetch tasks"),
        }
        self.apply(Outcome::Loaded(result));
    }

    /// Returns true when a task was created, so the caller can clear its input.
    pub async fn add(&mut self, input: &str) -> bool {
        let text = input.trim();
        if text.is_empty() {
            return false;
        }
        let result = self.client.create(text).await;
        let created = result.is_ok();
        if let Err(error) = &result {
            warn!(%error, "failed to add task");
        }
        self.apply(Outcome::Created(result));
        created
    }

    /// Submits the inverse of the task's current completion state.
    pub async fn toggle(&mut self, id: &str) -> bool {
        let Some(current) = self.view.get(id).map(|task| task.completed) else {
            debug!(task_id = %id, "toggle ignored for task not in view");
            return false;
        };
        let result = self.client.set_completed(id, !current).await;
        let updated = result.is_ok();
        if let Err(error) = &result {
            warn!(task_id = %id, %error, "failed to update task");
        }
        self.apply(Outcome::Toggled {
            id: id.to_string(),
            result,
        });
        updated
    }

    pub async fn remove(&mut self, id: &str) -> bool {
        if self.view.get(id).is_none() {
            debug!(task_id = %id, "remove ignored for task not in view");
            return false;
        }
        let result = self.client.delete(id).await;
        let removed = result.is_ok();
        if let Err(error) = &result {
            warn!(task_id = %id, %error, "failed to delete task");
        }
        self.apply(Outcome::Removed {
            id: id.to_string(),
            result,
        });
        removed
    }

    fn apply(&mut self, outcome: Outcome) {
        let previous = std::mem::take(&mut self.view);
        self.view = reconcile(previous, outcome, Instant::now());
    }
}
