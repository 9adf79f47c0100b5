//! Client-side view model.
//!
//! The view only ever changes in response to a server outcome; `reconcile`
//! is the single place where that happens and it performs no I/O.

use std::time::{Duration, Instant};

use super::api::ClientError;
use crate::types::Task;

/// How long an error banner stays up after it is shown.
pub const BANNER_TTL: Duration = Duration::from_secs(5);

pub const EMPTY_PLACEHOLDER: &str = "No tasks yet. Add one above!";
pub const LOAD_FAILED: &str = "Could not connect to the server to fetch tasks.";
pub const ADD_FAILED: &str = "Failed to add the new task. Please try again.";
pub const UPDATE_FAILED: &str = "Could not update the task. Please refresh and try again.";
pub const DELETE_FAILED: &str = "Could not delete the task. Please refresh and try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub shown_at: Instant,
}

impl Banner {
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < BANNER_TTL
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    items: Vec<Task>,
    banner: Option<Banner>,
    loaded: bool,
}

impl ViewState {
    pub fn items(&self) -> &[Task] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.items.iter().find(|task| task.id == id)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// True once loaded with nothing to show, i.e. when the placeholder applies.
    pub fn is_empty(&self) -> bool {
        self.loaded && self.items.is_empty()
    }

    pub fn visible_banner(&self, now: Instant) -> Option<&Banner> {
        self.banner
            .as_ref()
            .filter(|banner| banner.is_visible_at(now))
    }

    fn show_banner(&mut self, message: &str, now: Instant) {
        self.banner = Some(Banner {
            message: message.to_string(),
            shown_at: now,
        });
    }
}

/// Server result of one client request.
#[derive(Debug)]
pub enum Outcome {
    Loaded(Result<Vec<Task>, ClientError>),
    Created(Result<Task, ClientError>),
    Toggled {
        id: String,
        result: Result<Task, ClientError>,
    },
    Removed {
        id: String,
        result: Result<(), ClientError>,
    },
}

/// Computes the next view from the previous one and a server outcome.
///
/// Failures leave the items untouched and raise a banner.
pub fn reconcile(previous: ViewState, outcome: Outcome, now: Instant) -> ViewState {
    let mut next = previous;
    match outcome {
        Outcome::Loaded(Ok(tasks)) => {
            next.items = tasks;
            next.loaded = true;
        }
        Outcome::Loaded(Err(_)) => {
            next.items.clear();
            next.loaded = true;
            next.show_banner(LOAD_FAILED, now);
        }
        Outcome::Created(Ok(task)) => {
            match next.items.iter().position(|item| item.id == task.id) {
                Some(index) => next.items[index] = task,
                None => next.items.push(task),
            }
        }
        Outcome::Created(Err(_)) => next.show_banner(ADD_FAILED, now),
        Outcome::Toggled { id, result: Ok(task) } => {
            if let Some(item) = next.items.iter_mut().find(|item| item.id == id) {
                item.completed = task.completed;
            }
        }
        Outcome::Toggled { result: Err(_), .. } => next.show_banner(UPDATE_FAILED, now),
        Outcome::Removed { id, result: Ok(()) } => next.items.retain(|item| item.id != id),
        Outcome::Removed { result: Err(_), .. } => next.show_banner(DELETE_FAILED, now),
    }
    next
}
