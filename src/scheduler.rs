//! Derived scheduling: parents span their children.
//!
//! Each task caches its derived [`Schedule`]. Mutations clear the cache of
//! the touched task and every ancestor; reads refill it bottom-up.

use chrono::{Duration, NaiveDate};

use crate::graph::TaskGraph;
use crate::model::TaskId;

/// Calculated start and duration of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start: NaiveDate,
    pub duration_days: i64,
}

impl Schedule {
    /// Last day covered, clamped to the calendar's last date.
    pub fn end(&self) -> NaiveDate {
        Duration::try_days(self.duration_days)
            .and_then(|d| self.start.checked_add_signed(d))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Milestones are tasks whose calculated duration is exactly zero.
    pub fn is_milestone(&self) -> bool {
        self.duration_days == 0
    }
}

/// One row of the flattened, scheduled task list handed to the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub name: String,
    /// Nesting depth in the forest (0 for top level).
    pub depth: usize,
    pub schedule: Schedule,
    pub percent_complete: u8,
    /// True if the schedule is derived from children.
    pub is_summary: bool,
    pub dependencies: Vec<TaskId>,
}

impl ScheduledTask {
    pub fn start(&self) -> NaiveDate {
        self.schedule.start
    }

    pub fn end(&self) -> NaiveDate {
        self.schedule.end()
    }

    pub fn is_milestone(&self) -> bool {
        self.schedule.is_milestone()
    }
}

impl TaskGraph {
    /// Calculated schedule of `id`, recomputed lazily if the cache is stale.
    ///
    /// Leaves use their own start and duration. A parent starts at its
    /// earliest child start and ends at its latest child end.
    pub fn schedule(&self, id: TaskId) -> Option<Schedule> {
        let task = self.find(id)?;
        if let Some(cached) = task.derived.get() {
            return Some(cached);
        }

        let own = Schedule {
            start: task.start,
            duration_days: task.duration_days,
        };
        let mut span: Option<(NaiveDate, NaiveDate)> = None;
        for child in &task.children {
            if let Some(s) = self.schedule(*child) {
                span = Some(match span {
                    Some((start, end)) => (start.min(s.start), end.max(s.end())),
                    None => (s.start, s.end()),
                });
            }
        }
        let schedule = match span {
            Some((start, end)) => Schedule {
                start,
                duration_days: (end - start).num_days(),
            },
            None => own,
        };

        task.derived.set(schedule);
        Some(schedule)
    }

    /// Clear the cached schedule of `id` and all of its ancestors.
    pub(crate) fn invalidate(&self, id: TaskId) {
        if let Some(task) = self.find(id) {
            task.derived.clear();
        }
        for ancestor in self.ancestors(id) {
            if let Some(task) = self.find(ancestor) {
                task.derived.clear();
            }
        }
    }

    /// Earliest start and latest end over all tasks.
    pub fn project_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.roots().iter().filter_map(|id| self.schedule(*id)).fold(None, |acc, s| {
            Some(match acc {
                Some((start, end)) => (s.start.min(start), s.end().max(end)),
                None => (s.start, s.end()),
            })
        })
    }

    /// The flattened task list with calculated schedules, ready for layout.
    pub fn scheduled_rows(&self) -> Vec<ScheduledTask> {
        self.flatten_with_depth()
            .into_iter()
            .filter_map(|(depth, task)| {
                let schedule = self.schedule(task.id)?;
                Some(ScheduledTask {
                    id: task.id,
                    name: task.name.clone(),
                    depth,
                    schedule,
                    percent_complete: task.percent_complete,
                    is_summary: !task.is_leaf(),
                    dependencies: task.dependencies.iter().copied().collect(),
                })
            })
            .collect()
    }
}
