pub mod project;
pub mod task;

pub use project::Project;
pub use task::{Task, TaskDraft, TaskFields, TaskId};
