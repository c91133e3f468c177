//! The editing session: one project, its history and its observers.
//!
//! Commands are the only way to change the task graph. Each completed
//! execute/undo/redo fires exactly one synchronous [`ChangeEvent`] after the
//! mutation, so observers always see the post-mutation state.

use egui::Vec2;
use tracing::debug;

use crate::command::{Command, CommandStack};
use crate::config::{EngineConfig, LayoutConfig};
use crate::error::Result;
use crate::graph::TaskGraph;
use crate::layout::{compute_layout, Layout};
use crate::model::{Project, Task};
use crate::scheduler::ScheduledTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Executed,
    Undone,
    Redone,
    /// The whole project was swapped out (new/open/import).
    Replaced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub description: String,
}

/// Handle returned by [`Editor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&ChangeEvent)>;

pub struct Editor {
    project: Project,
    history: CommandStack,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Project::default())
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("project", &self.project.name)
            .field("tasks", &self.project.graph.len())
            .field("undo", &self.history.undo_len())
            .field("redo", &self.history.redo_len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Editor {
    pub fn new(project: Project) -> Self {
        Self::with_history(project, CommandStack::new())
    }

    pub fn with_config(project: Project, config: &EngineConfig) -> Self {
        Self::with_history(project, CommandStack::with_max_depth(config.history.max_depth))
    }

    fn with_history(project: Project, history: CommandStack) -> Self {
        Self {
            project,
            history,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.project.graph
    }

    /// Top-level tasks in display order; children hang off each task by id.
    pub fn tasks(&self) -> Vec<&Task> {
        self.project.graph.top_level()
    }

    /// Flattened rows with calculated schedules.
    pub fn rows(&self) -> Vec<ScheduledTask> {
        self.project.graph.scheduled_rows()
    }

    /// Geometry for the current state in a viewport of `viewport` pixels.
    pub fn layout(&self, viewport: Vec2, config: &LayoutConfig) -> Layout {
        compute_layout(&self.rows(), viewport, config)
    }

    /// Rename the project or change its metadata. Not part of undo history.
    pub fn set_details(&mut self, name: impl Into<String>, author: impl Into<String>, narrative: Option<String>) {
        self.project.name = name.into();
        self.project.author = author.into();
        self.project.narrative = narrative;
        self.project.touch();
    }

    /// Swap in a freshly loaded project. History is cleared.
    pub fn replace_project(&mut self, project: Project) {
        let description = format!("Opened '{}'", project.name);
        self.project = project;
        self.history.clear();
        self.notify(ChangeKind::Replaced, description);
    }

    pub fn execute(&mut self, command: Command) -> Result<()> {
        let description = command.describe();
        self.history.execute(command, &mut self.project.graph)?;
        self.project.touch();
        self.notify(ChangeKind::Executed, description);
        Ok(())
    }

    /// Returns `false` (and notifies nobody) when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let description = self.history.peek_undo().unwrap_or_default();
        if !self.history.undo(&mut self.project.graph) {
            return false;
        }
        self.project.touch();
        self.notify(ChangeKind::Undone, description);
        true
    }

    /// Returns `false` (and notifies nobody) when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let description = self.history.peek_redo().unwrap_or_default();
        if !self.history.redo(&mut self.project.graph) {
            return false;
        }
        self.project.touch();
        self.notify(ChangeKind::Redone, description);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.history.peek_undo()
    }

    pub fn redo_description(&self) -> Option<String> {
        self.history.peek_redo()
    }

    /// Register `observer` to be called after every completed change.
    pub fn subscribe(&mut self, observer: impl FnMut(&ChangeEvent) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    fn notify(&mut self, kind: ChangeKind, description: String) {
        debug!(?kind, %description, observers = self.observers.len(), "graph changed");
        let event = ChangeEvent { kind, description };
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::NaiveDate;

    use super::*;
    use crate::model::TaskDraft;

    fn draft(name: &str) -> TaskDraft {
        TaskDraft::new(name, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(), 3)
    }

    #[test]
    fn observers_fire_once_per_completed_operation() {
        let mut editor = Editor::default();
        let seen: Rc<RefCell<Vec<ChangeKind>>> = Rc::default();
        let sink = Rc::clone(&seen);
        editor.subscribe(move |event| sink.borrow_mut().push(event.kind));

        editor.execute(Command::add(draft("A"), None).unwrap()).unwrap();
        assert!(editor.undo());
        assert!(!editor.undo());
        assert!(editor.redo());
        assert!(!editor.redo());
        assert!(editor.execute(Command::delete(42)).is_err());

        assert_eq!(
            *seen.borrow(),
            vec![ChangeKind::Executed, ChangeKind::Undone, ChangeKind::Redone]
        );
    }

    #[test]
    fn unsubscribed_observers_stop_receiving() {
        let mut editor = Editor::default();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = editor.subscribe(move |_| *sink.borrow_mut() += 1);

        editor.execute(Command::add(draft("A"), None).unwrap()).unwrap();
        assert!(editor.unsubscribe(id));
        assert!(!editor.unsubscribe(id));
        editor.execute(Command::add(draft("B"), None).unwrap()).unwrap();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn replacing_the_project_clears_history() {
        let mut editor = Editor::default();
        editor.execute(Command::add(draft("A"), None).unwrap()).unwrap();
        assert!(editor.can_undo());
        editor.replace_project(Project::new("Other"));
        assert!(!editor.can_undo());
        assert!(editor.tasks().is_empty());
        assert_eq!(editor.project().name, "Other");
    }

    #[test]
    fn history_depth_comes_from_config() {
        let mut config = EngineConfig::default();
        config.history.max_depth = Some(1);
        let mut editor = Editor::with_config(Project::default(), &config);
        editor.execute(Command::add(draft("A"), None).unwrap()).unwrap();
        editor.execute(Command::add(draft("B"), None).unwrap()).unwrap();
        assert!(editor.undo());
        assert!(!editor.undo());
        assert_eq!(editor.tasks().len(), 1);
    }
}
