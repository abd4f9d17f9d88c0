// tasklist - In-memory to-do list state engine with a persisted theme preference

pub mod filter;
pub mod models;
pub mod prefs;
pub mod store;

// Re-export main types for convenience
pub use filter::Filter;
pub use models::{EditSession, Task, TaskId};
pub use prefs::{DARK_MODE_KEY, KeyValue, MemoryPrefs, SqlitePrefs};
pub use store::TaskListStore;
