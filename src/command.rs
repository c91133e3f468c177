//! Reversible edits and the undo/redo stacks.
//!
//! A [`Command`] is built from plain data by one of its factories. Executing
//! it records a plain-data snapshot of whatever it overwrote, which is what
//! the inverse restores. Every forward action validates before it touches
//! the graph, so a failed command leaves no trace.

use std::collections::BTreeSet;

use tracing::{debug, error};

use crate::error::{EngineError, Result};
use crate::graph::{Location, Placement, Removal, TaskGraph};
use crate::model::{Task, TaskDraft, TaskFields, TaskId};

/// An opaque, reversible unit of mutation.
#[derive(Debug, Clone)]
pub struct Command {
    kind: CommandKind,
}

#[derive(Debug, Clone)]
enum CommandKind {
    Add {
        draft: TaskDraft,
        parent: Option<TaskId>,
        /// The created task and where it landed, set by the first execution.
        created: Option<(Task, Placement)>,
    },
    Delete {
        id: TaskId,
        removal: Option<Removal>,
    },
    Update {
        id: TaskId,
        fields: TaskFields,
        previous: Option<TaskFields>,
    },
    Reparent {
        id: TaskId,
        parent: Option<TaskId>,
        previous: Option<Location>,
    },
    Link {
        successor: TaskId,
        predecessor: TaskId,
        previous: Option<BTreeSet<TaskId>>,
    },
    Unlink {
        successor: TaskId,
        predecessor: TaskId,
        previous: Option<BTreeSet<TaskId>>,
    },
}

impl Command {
    /// Create a task from `draft`, appended under `parent` (top level when
    /// `None` or when the parent does not exist).
    pub fn add(draft: TaskDraft, parent: Option<TaskId>) -> Result<Self> {
        draft.fields.validate()?;
        Ok(Self {
            kind: CommandKind::Add {
                draft,
                parent,
                created: None,
            },
        })
    }

    /// Replace every editable field of `id`.
    pub fn update(id: TaskId, fields: TaskFields) -> Result<Self> {
        fields.validate()?;
        if fields.dependencies.contains(&id) {
            return Err(EngineError::InvalidArgument(format!(
                "task {} cannot list itself as a dependency",
                id
            )));
        }
        Ok(Self {
            kind: CommandKind::Update {
                id,
                fields,
                previous: None,
            },
        })
    }

    /// Delete `id` together with its subtree.
    pub fn delete(id: TaskId) -> Self {
        Self {
            kind: CommandKind::Delete { id, removal: None },
        }
    }

    /// Move `id` to the end of `parent`'s children (top level when `None`).
    pub fn reparent(id: TaskId, parent: Option<TaskId>) -> Result<Self> {
        if parent == Some(id) {
            return Err(EngineError::InvalidArgument(format!(
                "task {} cannot be its own parent",
                id
            )));
        }
        Ok(Self {
            kind: CommandKind::Reparent {
                id,
                parent,
                previous: None,
            },
        })
    }

    /// Make `successor` start after `predecessor` finishes.
    pub fn link(successor: TaskId, predecessor: TaskId) -> Result<Self> {
        if successor == predecessor {
            return Err(EngineError::InvalidArgument(format!(
                "task {} cannot depend on itself",
                successor
            )));
        }
        Ok(Self {
            kind: CommandKind::Link {
                successor,
                predecessor,
                previous: None,
            },
        })
    }

    /// Remove the edge `successor` -> `predecessor`.
    pub fn unlink(successor: TaskId, predecessor: TaskId) -> Self {
        Self {
            kind: CommandKind::Unlink {
                successor,
                predecessor,
                previous: None,
            },
        }
    }

    /// Human-readable summary for status lines and notifications.
    pub fn describe(&self) -> String {
        match &self.kind {
            CommandKind::Add { draft, .. } => format!("Add task '{}'", draft.fields.name),
            CommandKind::Delete { id, removal } => match removal.as_ref().and_then(|r| r.subtree.first()) {
                Some(task) => format!("Delete task '{}'", task.name),
                None => format!("Delete task {}", id),
            },
            CommandKind::Update { fields, .. } => format!("Update task '{}'", fields.name),
            CommandKind::Reparent { id, parent, .. } => match parent {
                Some(pid) => format!("Move task {} under {}", id, pid),
                None => format!("Move task {} to top level", id),
            },
            CommandKind::Link {
                successor,
                predecessor,
                ..
            } => format!("Link {} -> {}", predecessor, successor),
            CommandKind::Unlink {
                successor,
                predecessor,
                ..
            } => format!("Unlink {} -> {}", predecessor, successor),
        }
    }

    /// Id of the task this command created, once it has been executed.
    pub fn created_id(&self) -> Option<TaskId> {
        match &self.kind {
            CommandKind::Add { created, .. } => created.as_ref().map(|(task, _)| task.id),
            _ => None,
        }
    }

    /// Forward action. Validates first; on error the graph is untouched.
    fn apply(&mut self, graph: &mut TaskGraph) -> Result<()> {
        match &mut self.kind {
            CommandKind::Add {
                draft,
                parent,
                created,
            } => {
                if let Some((task, placement)) = created {
                    // Redo: put back the identical task in the identical spot.
                    let restored = graph.insert_task(
                        task.clone(),
                        placement.location.parent,
                        Some(placement.location.index),
                    );
                    *placement = restored;
                    return Ok(());
                }
                if let Some(id) = draft.id {
                    if graph.contains(id) {
                        return Err(EngineError::DuplicateId(id));
                    }
                }
                let resolved = graph.resolve_parent(*parent);
                let id = match draft.id {
                    Some(id) => id,
                    None => graph.allocate_id()?,
                };
                graph.validate_new_dependencies(id, resolved, &draft.fields.dependencies)?;
                let placement = graph.insert(draft.clone().with_id(id), resolved);
                let task = graph
                    .find(placement.id)
                    .cloned()
                    .ok_or(EngineError::TaskNotFound(placement.id))?;
                *created = Some((task, placement));
                Ok(())
            }
            CommandKind::Delete { id, removal } => {
                let removed = graph.remove(*id).ok_or(EngineError::TaskNotFound(*id))?;
                *removal = Some(removed);
                Ok(())
            }
            CommandKind::Update {
                id,
                fields,
                previous,
            } => {
                *previous = Some(graph.update_fields(*id, fields.clone())?);
                Ok(())
            }
            CommandKind::Reparent {
                id,
                parent,
                previous,
            } => {
                *previous = Some(graph.reparent(*id, *parent, None)?);
                Ok(())
            }
            CommandKind::Link {
                successor,
                predecessor,
                previous,
            } => {
                let current = graph
                    .find(*successor)
                    .map(|t| t.dependencies.clone())
                    .ok_or(EngineError::TaskNotFound(*successor))?;
                if current.contains(predecessor) {
                    return Err(EngineError::InvalidDependency {
                        successor: *successor,
                        predecessor: *predecessor,
                        reason: "it is already a predecessor",
                    });
                }
                let mut next = current;
                next.insert(*predecessor);
                *previous = Some(graph.set_dependencies(*successor, next)?);
                Ok(())
            }
            CommandKind::Unlink {
                successor,
                predecessor,
                previous,
            } => {
                let current = graph
                    .find(*successor)
                    .map(|t| t.dependencies.clone())
                    .ok_or(EngineError::TaskNotFound(*successor))?;
                if !current.contains(predecessor) {
                    return Err(EngineError::InvalidDependency {
                        successor: *successor,
                        predecessor: *predecessor,
                        reason: "it is not a predecessor",
                    });
                }
                let mut next = current;
                next.remove(predecessor);
                *previous = Some(graph.set_dependencies(*successor, next)?);
                Ok(())
            }
        }
    }

    /// Inverse action. Only ever called on the state `apply` produced.
    fn revert(&mut self, graph: &mut TaskGraph) {
        match &mut self.kind {
            CommandKind::Add { created, .. } => {
                if let Some((task, _)) = created {
                    graph.remove(task.id);
                }
            }
            CommandKind::Delete { removal, .. } => {
                if let Some(removal) = removal.clone() {
                    graph.restore(removal);
                }
            }
            CommandKind::Update { id, previous, .. } => {
                if let Some(fields) = previous.take() {
                    graph.restore_fields(*id, fields);
                }
            }
            CommandKind::Reparent { id, previous, .. } => {
                if let Some(location) = previous.take() {
                    graph.move_to(*id, location.parent, Some(location.index));
                }
            }
            CommandKind::Link {
                successor,
                previous,
                ..
            }
            | CommandKind::Unlink {
                successor,
                previous,
                ..
            } => {
                if let Some(deps) = previous.take() {
                    if let Some(task) = graph.find_mut(*successor) {
                        task.dependencies = deps;
                    }
                }
            }
        }
    }
}

/// Undo and redo history.
#[derive(Debug, Default)]
pub struct CommandStack {
    undo: Vec<Command>,
    redo: Vec<Command>,
    max_depth: Option<usize>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_depth` undo entries, discarding the oldest.
    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Apply `command` and record it. A new action invalidates redo history.
    pub fn execute(&mut self, mut command: Command, graph: &mut TaskGraph) -> Result<()> {
        command.apply(graph)?;
        debug!(command = %command.describe(), "executed");
        self.undo.push(command);
        self.redo.clear();
        if let Some(max) = self.max_depth {
            if self.undo.len() > max {
                let excess = self.undo.len() - max;
                self.undo.drain(..excess);
            }
        }
        Ok(())
    }

    /// Revert the most recent command. Returns `false` when there is nothing
    /// to undo.
    pub fn undo(&mut self, graph: &mut TaskGraph) -> bool {
        let Some(mut command) = self.undo.pop() else {
            return false;
        };
        command.revert(graph);
        debug!(command = %command.describe(), "undone");
        self.redo.push(command);
        true
    }

    /// Re-apply the most recently undone command. Returns `false` when there
    /// is nothing to redo.
    pub fn redo(&mut self, graph: &mut TaskGraph) -> bool {
        let Some(mut command) = self.redo.pop() else {
            return false;
        };
        match command.apply(graph) {
            Ok(()) => {
                debug!(command = %command.describe(), "redone");
                self.undo.push(command);
                true
            }
            Err(e) => {
                error!(command = %command.describe(), error = %e, "redo failed, dropping redo history");
                self.redo.clear();
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Description of the command `undo` would revert.
    pub fn peek_undo(&self) -> Option<String> {
        self.undo.last().map(Command::describe)
    }

    /// Description of the command `redo` would re-apply.
    pub fn peek_redo(&self) -> Option<String> {
        self.redo.last().map(Command::describe)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
