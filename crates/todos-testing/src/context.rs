//! Per-run fixture shared between checks

use tracing::warn;
use uuid::Uuid;

use crate::todo::TodoId;

/// State carried from one check to the next within a run.
///
/// The created todo id moves from unset to set at most once and is never
/// cleared; later attempts to record a different id are ignored.
#[derive(Debug, Clone)]
pub struct SuiteContext {
    run_id: Uuid,
    created_todo_id: Option<TodoId>,
}

impl SuiteContext {
    pub fn new() -> Self {
        Self::with_run_id(Uuid::new_v4())
    }

    pub fn with_run_id(run_id: Uuid) -> Self {
        Self {
            run_id,
            created_todo_id: None,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Id recorded by the create check, if it ran and succeeded
    pub fn created_todo_id(&self) -> Option<&TodoId> {
        self.created_todo_id.as_ref()
    }

    /// Record the id of a freshly created todo.
    ///
    /// Returns `false` when an id was already recorded.
    pub fn record_created(&mut self, id: TodoId) -> bool {
        match &self.created_todo_id {
            Some(existing) => {
                warn!(%existing, ignored = %id, "created todo id already recorded");
                false
            }
            None => {
                self.created_todo_id = Some(id);
                true
            }
        }
    }

    /// Recorded id, or `fallback` when nothing was created
    pub fn todo_id_or(&self, fallback: &TodoId) -> TodoId {
        self.created_todo_id
            .clone()
            .unwrap_or_else(|| fallback.clone())
    }
}

impl Default for SuiteContext {
    fn default() -> Self {
        Self::new()
    }
}
