use std::{collections::HashSet, sync::Arc};

use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::types::{NewTask, Task};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(String),
}

const SEED_TASKS: [(&str, &str, bool); 3] = [
    ("1", "Install Node.js and run the backend", true),
    ("2", "Open the HTML file in a browser", true),
    ("3", "Add a new task using the form", false),
];

/// Ordered, in-memory task collection. Clones share the same tasks.
///
/// Every operation holds the write lock for its whole duration, so
/// mutations are atomic with respect to each other.
#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    tasks: Vec<Task>,
    issued_ids: HashSet<String>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        let tasks: Vec<Task> = SEED_TASKS
            .iter()
            .map(|(id, text, completed)| Task {
                id: (*id).to_string(),
                text: (*text).to_string(),
                completed: *completed,
            })
            .collect();
        let issued_ids = tasks.iter().map(|task| task.id.clone()).collect();
        Self {
            inner: Arc::new(RwLock::new(StoreInner { tasks, issued_ids })),
        }
    }

    pub async fn list(&self) -> Vec<Task> {
        self.inner.read().await.tasks.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.tasks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn create(&self, new_task: NewTask) -> Task {
        let mut inner = self.inner.write().await;
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if inner.issued_ids.insert(candidate.clone()) {
                break candidate;
            }
        };
        let task = Task {
            id,
            text: new_task.text.into_inner(),
            completed: false,
        };
        inner.tasks.push(task.clone());
        task
    }

    pub async fn set_completed(&self, id: &str, completed: bool) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let task = inner
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        task.completed = completed;
        Ok(task.clone())
    }

    pub async fn delete(&self, id: &str) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let index = inner
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(inner.tasks.remove(index))
    }
}
