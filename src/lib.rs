//! Task-graph engine for Gantt charts.
//!
//! A [`TaskGraph`] holds a forest of tasks with dependency edges. All edits
//! go through [`Command`]s on a [`CommandStack`] so they can be undone, and
//! the [`Editor`] wraps both with change notifications. Parent dates are
//! derived lazily by the scheduler, and [`compute_layout`] turns the
//! scheduled rows into chart geometry.

pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod graph;
pub mod io;
pub mod layout;
pub mod logging;
pub mod model;
pub mod scheduler;

pub use command::{Command, CommandStack};
pub use config::{EngineConfig, HistoryConfig, LayoutConfig};
pub use editor::{ChangeEvent, ChangeKind, Editor, ObserverId};
pub use error::{EngineError, Result};
pub use graph::{GraphBuilder, TaskGraph};
pub use layout::{compute_layout, route_dependency, Layout, Scale, TaskGeometry, TaskShape};
pub use logging::init_logging;
pub use model::{Project, Task, TaskDraft, TaskFields, TaskId};
pub use scheduler::{Schedule, ScheduledTask};
