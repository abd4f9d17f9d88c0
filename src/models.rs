// Data models for the task list

use serde::{Deserialize, Serialize};

/// Identifier assigned to a task at creation. Unique for the process lifetime.
pub type TaskId = u64;

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

impl Task {
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

/// An in-progress, unsaved edit of one task's text.
///
/// At most one is alive at a time; starting a new edit discards the previous
/// draft without saving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub task_id: TaskId,
    pub draft: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_pending() {
        let task = Task::new(1, "Buy groceries");
        assert_eq!(task.id, 1);
        assert_eq!(task.text, "Buy groceries");
        assert!(!task.completed);
    }

    #[test]
    fn test_task_serialization() {
        let task = Task {
            id: 2,
            text: "Complete project".to_string(),
            completed: true,
        };

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"completed\":true"));

        let deserialized: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, task);
    }
}
