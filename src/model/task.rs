use std::cell::Cell;
use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::error::{EngineError, Result};
use crate::scheduler::Schedule;

/// Stable task identity, unique across a whole project.
pub type TaskId = u64;

/// The user-editable fields of a task.
///
/// This is the unit an update edits and the snapshot an undo restores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    pub name: String,
    /// Own start date, used when the task has no children.
    pub start: NaiveDate,
    /// Own duration in whole days, used when the task has no children.
    pub duration_days: i64,
    /// Progress from 0 (not started) to 100 (complete).
    pub percent_complete: u8,
    /// Predecessors: this task starts after each of them finishes.
    pub dependencies: BTreeSet<TaskId>,
}

impl TaskFields {
    /// Create fields for a regular task with sensible defaults.
    pub fn new(name: impl Into<String>, start: NaiveDate, duration_days: i64) -> Self {
        Self {
            name: name.into(),
            start,
            duration_days,
            percent_complete: 0,
            dependencies: BTreeSet::new(),
        }
    }

    /// Create fields for a milestone (zero duration).
    pub fn milestone(name: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(name, date, 0)
    }

    pub fn with_progress(mut self, percent_complete: u8) -> Self {
        self.percent_complete = percent_complete;
        self
    }

    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = deps.into_iter().collect();
        self
    }

    /// Own end date, `None` when it falls outside the calendar.
    pub fn end(&self) -> Option<NaiveDate> {
        Duration::try_days(self.duration_days).and_then(|d| self.start.checked_add_signed(d))
    }

    /// Reject values no task may hold.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "task name must not be blank".to_string(),
            ));
        }
        if self.duration_days < 0 {
            return Err(EngineError::InvalidArgument(format!(
                "duration of '{}' is negative ({} days)",
                self.name, self.duration_days
            )));
        }
        if self.end().is_none() {
            return Err(EngineError::InvalidArgument(format!(
                "'{}' would end past the last representable date ({} days)",
                self.name, self.duration_days
            )));
        }
        if self.percent_complete > 100 {
            return Err(EngineError::InvalidArgument(format!(
                "progress of '{}' is {}%, must be 0-100",
                self.name, self.percent_complete
            )));
        }
        Ok(())
    }
}

/// Plain data describing a task to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Explicit id, or `None` to have the graph assign the next free one.
    pub id: Option<TaskId>,
    pub fields: TaskFields,
}

impl TaskDraft {
    pub fn new(name: impl Into<String>, start: NaiveDate, duration_days: i64) -> Self {
        Self {
            id: None,
            fields: TaskFields::new(name, start, duration_days),
        }
    }

    pub fn milestone(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: None,
            fields: TaskFields::milestone(name, date),
        }
    }

    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_progress(mut self, percent_complete: u8) -> Self {
        self.fields.percent_complete = percent_complete;
        self
    }

    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = TaskId>) -> Self {
        self.fields.dependencies = deps.into_iter().collect();
        self
    }
}

impl From<TaskFields> for TaskDraft {
    fn from(fields: TaskFields) -> Self {
        Self { id: None, fields }
    }
}

/// Cached derived schedule. Never part of a task's identity.
#[derive(Debug, Clone, Default)]
pub(crate) struct DerivedCache(Cell<Option<Schedule>>);

impl DerivedCache {
    pub(crate) fn get(&self) -> Option<Schedule> {
        self.0.get()
    }

    pub(crate) fn set(&self, schedule: Schedule) {
        self.0.set(Some(schedule));
    }

    pub(crate) fn clear(&self) {
        self.0.set(None);
    }
}

impl PartialEq for DerivedCache {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for DerivedCache {}

/// A single task in the project forest.
///
/// Children and dependencies are stored as ids into the owning
/// [`TaskGraph`](crate::graph::TaskGraph) arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub start: NaiveDate,
    pub duration_days: i64,
    pub percent_complete: u8,
    /// Ordered child ids (display order).
    pub children: Vec<TaskId>,
    pub dependencies: BTreeSet<TaskId>,
    pub(crate) derived: DerivedCache,
}

impl Task {
    pub(crate) fn from_fields(id: TaskId, fields: TaskFields) -> Self {
        Self {
            id,
            name: fields.name,
            start: fields.start,
            duration_days: fields.duration_days,
            percent_complete: fields.percent_complete,
            children: Vec::new(),
            dependencies: fields.dependencies,
            derived: DerivedCache::default(),
        }
    }

    /// Snapshot of the user-editable fields.
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            name: self.name.clone(),
            start: self.start,
            duration_days: self.duration_days,
            percent_complete: self.percent_complete,
            dependencies: self.dependencies.clone(),
        }
    }

    pub(crate) fn apply_fields(&mut self, fields: TaskFields) {
        self.name = fields.name;
        self.start = fields.start;
        self.duration_days = fields.duration_days;
        self.percent_complete = fields.percent_complete;
        self.dependencies = fields.dependencies;
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let base = TaskFields::new("Design", date(2025, 4, 1), 3);
        assert!(base.validate().is_ok());

        let blank = TaskFields::new("   ", date(2025, 4, 1), 3);
        assert!(matches!(blank.validate(), Err(EngineError::InvalidArgument(_))));

        let negative = TaskFields::new("Design", date(2025, 4, 1), -1);
        assert!(matches!(negative.validate(), Err(EngineError::InvalidArgument(_))));

        let endless = TaskFields::new("Design", date(2025, 4, 1), 1_000_000_000);
        assert!(endless.end().is_none());
        assert!(matches!(endless.validate(), Err(EngineError::InvalidArgument(_))));
        assert!(matches!(
            TaskFields::new("Design", date(2025, 4, 1), i64::MAX).validate(),
            Err(EngineError::InvalidArgument(_))
        ));

        let overdone = base.clone().with_progress(101);
        assert!(matches!(overdone.validate(), Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn equality_ignores_derived_cache() {
        let a = Task::from_fields(1, TaskFields::new("A", date(2025, 4, 1), 2));
        let b = a.clone();
        a.derived.set(Schedule {
            start: date(2025, 4, 1),
            duration_days: 2,
        });
        assert_eq!(a, b);
    }

    #[test]
    fn fields_round_trip_through_apply() {
        let mut task = Task::from_fields(7, TaskFields::milestone("Launch", date(2025, 5, 1)));
        let edited = TaskFields::new("Launch v2", date(2025, 5, 3), 1)
            .with_progress(40)
            .with_dependencies([2, 3]);
        task.apply_fields(edited.clone());
        assert_eq!(task.fields(), edited);
        assert_eq!(task.id, 7);
    }
}
