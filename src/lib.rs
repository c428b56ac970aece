// tasklist - Single-user task list with write-through key-value persistence

pub mod config;
pub mod error;
pub mod filter;
pub mod kv;
pub mod models;
pub mod notify;
pub mod render;
pub mod store;
pub mod terminal;

// Re-export main types for convenience
pub use config::{Config, ReorderPolicy};
pub use error::TaskError;
pub use filter::FilterMode;
pub use kv::{KeyValueStore, MemoryKv, SqliteKv};
pub use models::{Stats, Task, TaskId, now_ms};
pub use notify::{ConfirmationGate, Notification, NotificationSink, Severity};
pub use store::{LoadOutcome, TaskStore};
