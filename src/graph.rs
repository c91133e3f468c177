//! The task forest and its dependency edges.
//!
//! Tasks live in an arena keyed by [`TaskId`]. Children are ordered id
//! lists and dependencies are id sets, so snapshots for undo are plain data
//! and never hold references into the live graph.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::error::{EngineError, Result};
use crate::model::{Task, TaskDraft, TaskFields, TaskId};

/// Where a task sits: its parent (`None` for top level) and its index
/// within that parent's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub parent: Option<TaskId>,
    pub index: usize,
}

/// Result of an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub id: TaskId,
    pub location: Location,
}

/// Everything needed to put a removed subtree back exactly where it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub location: Location,
    /// The removed task followed by its descendants, in pre-order.
    pub subtree: Vec<Task>,
    /// Full prior dependency sets of surviving tasks that lost an edge.
    pub severed: BTreeMap<TaskId, BTreeSet<TaskId>>,
}

impl Removal {
    pub fn root_id(&self) -> Option<TaskId> {
        self.subtree.first().map(|t| t.id)
    }
}

/// Single source of truth for task structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskGraph {
    tasks: BTreeMap<TaskId, Task>,
    roots: Vec<TaskId>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Top-level task ids in display order.
    pub fn roots(&self) -> &[TaskId] {
        &self.roots
    }

    /// Top-level tasks in display order.
    pub fn top_level(&self) -> Vec<&Task> {
        self.roots.iter().filter_map(|id| self.tasks.get(id)).collect()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub(crate) fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Task> {
        self.flatten()
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// The task whose children directly contain `id`, found depth-first
    /// from the roots. `None` for top-level or unknown tasks.
    pub fn find_parent(&self, id: TaskId) -> Option<TaskId> {
        let mut stack: Vec<TaskId> = self.roots.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let Some(task) = self.tasks.get(&current) else {
                continue;
            };
            if task.children.contains(&id) {
                return Some(current);
            }
            stack.extend(task.children.iter().rev().copied());
        }
        None
    }

    /// Parent and index of `id`, or `None` if it is not in the forest.
    pub fn locate(&self, id: TaskId) -> Option<Location> {
        match self.find_parent(id) {
            Some(parent) => {
                let index = self.tasks.get(&parent)?.children.iter().position(|c| *c == id)?;
                Some(Location {
                    parent: Some(parent),
                    index,
                })
            }
            None => {
                let index = self.roots.iter().position(|r| *r == id)?;
                Some(Location {
                    parent: None,
                    index,
                })
            }
        }
    }

    /// Parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: TaskId) -> Vec<TaskId> {
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(parent) = self.find_parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// All descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: TaskId) -> Vec<TaskId> {
        let mut out = Vec::new();
        if let Some(task) = self.tasks.get(&id) {
            for child in &task.children {
                self.collect_preorder(*child, &mut out);
            }
        }
        out
    }

    /// True if `ancestor` appears on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: TaskId, id: TaskId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    fn collect_preorder(&self, id: TaskId, out: &mut Vec<TaskId>) {
        if let Some(task) = self.tasks.get(&id) {
            out.push(id);
            for child in &task.children {
                self.collect_preorder(*child, out);
            }
        }
    }

    /// Pre-order linearization: each node, then each child's subtree in order.
    pub fn flatten(&self) -> Vec<&Task> {
        self.flatten_with_depth()
            .into_iter()
            .map(|(_, task)| task)
            .collect()
    }

    /// Pre-order linearization with the nesting depth of each task.
    pub fn flatten_with_depth(&self) -> Vec<(usize, &Task)> {
        let mut out = Vec::with_capacity(self.tasks.len());
        let mut stack: Vec<(usize, TaskId)> = self.roots.iter().rev().map(|id| (0, *id)).collect();
        while let Some((depth, id)) = stack.pop() {
            if let Some(task) = self.tasks.get(&id) {
                out.push((depth, task));
                stack.extend(task.children.iter().rev().map(|c| (depth + 1, *c)));
            }
        }
        out
    }

    /// Next id to hand out: one past the largest id in use, 1 when empty.
    /// Saturates at `TaskId::MAX`; use [`allocate_id`](Self::allocate_id)
    /// when the id is about to be inserted.
    pub fn next_id(&self) -> TaskId {
        self.tasks.keys().next_back().map_or(1, |max| max.saturating_add(1))
    }

    /// Like [`next_id`](Self::next_id), but fails once the largest id in
    /// use is `TaskId::MAX`.
    pub fn allocate_id(&self) -> Result<TaskId> {
        match self.tasks.keys().next_back() {
            Some(max) => max.checked_add(1).ok_or_else(|| {
                EngineError::InvalidArgument(format!("no task id left after {}", max))
            }),
            None => Ok(1),
        }
    }

    // ── Structural mutation ─────────────────────────────────────────

    /// Insert a new task, appending it under `parent` or at top level.
    ///
    /// An unknown parent falls back to top level, and an id that is already
    /// taken is replaced by [`next_id`](Self::next_id). Never fails.
    pub(crate) fn insert(&mut self, draft: TaskDraft, parent: Option<TaskId>) -> Placement {
        let id = match draft.id {
            Some(id) if !self.contains(id) => id,
            Some(taken) => {
                let fresh = self.next_id();
                warn!(taken, fresh, "task id already in use, assigning a fresh one");
                fresh
            }
            None => self.next_id(),
        };
        let task = Task::from_fields(id, draft.fields);
        let parent = self.resolve_parent(parent);
        self.insert_task(task, parent, None)
    }

    /// Map an unknown parent id to top level.
    pub(crate) fn resolve_parent(&self, parent: Option<TaskId>) -> Option<TaskId> {
        match parent {
            Some(pid) if self.contains(pid) => Some(pid),
            Some(pid) => {
                warn!(parent = pid, "parent task not found, inserting at top level");
                None
            }
            None => None,
        }
    }

    /// Put an already-built task at `parent` (which must exist) at `index`,
    /// or at the end when `index` is `None` or out of range.
    pub(crate) fn insert_task(
        &mut self,
        task: Task,
        parent: Option<TaskId>,
        index: Option<usize>,
    ) -> Placement {
        let id = task.id;
        self.tasks.insert(id, task);
        let location = self.attach(id, parent, index);
        self.invalidate(id);
        Placement { id, location }
    }

    fn attach(&mut self, id: TaskId, parent: Option<TaskId>, index: Option<usize>) -> Location {
        let siblings = match parent.and_then(|pid| self.tasks.get_mut(&pid)) {
            Some(p) => &mut p.children,
            None => &mut self.roots,
        };
        let index = index.map_or(siblings.len(), |i| i.min(siblings.len()));
        siblings.insert(index, id);
        Location {
            parent: parent.filter(|pid| self.tasks.contains_key(pid)),
            index,
        }
    }

    fn detach(&mut self, id: TaskId) -> Option<Location> {
        let location = self.locate(id)?;
        let siblings = match location.parent.and_then(|pid| self.tasks.get_mut(&pid)) {
            Some(p) => &mut p.children,
            None => &mut self.roots,
        };
        siblings.remove(location.index);
        Some(location)
    }

    /// Remove `id` and its whole subtree, severing every dependency edge
    /// that points into the removed set.
    pub(crate) fn remove(&mut self, id: TaskId) -> Option<Removal> {
        if !self.contains(id) {
            return None;
        }
        let location = self.detach(id)?;
        if let Some(parent) = location.parent {
            self.invalidate(parent);
        }

        let mut ids = Vec::new();
        self.collect_preorder(id, &mut ids);
        let removed: BTreeSet<TaskId> = ids.iter().copied().collect();
        let subtree: Vec<Task> = ids.iter().filter_map(|tid| self.tasks.remove(tid)).collect();

        let mut severed = BTreeMap::new();
        for task in self.tasks.values_mut() {
            if task.dependencies.iter().any(|d| removed.contains(d)) {
                severed.insert(task.id, task.dependencies.clone());
                task.dependencies.retain(|d| !removed.contains(d));
            }
        }

        Some(Removal {
            location,
            subtree,
            severed,
        })
    }

    /// Exact inverse of [`remove`](Self::remove).
    pub(crate) fn restore(&mut self, removal: Removal) {
        let Some(root) = removal.root_id() else {
            return;
        };
        for task in removal.subtree {
            task.derived.clear();
            self.tasks.insert(task.id, task);
        }
        self.attach(root, removal.location.parent, Some(removal.location.index));
        for (tid, deps) in removal.severed {
            if let Some(task) = self.tasks.get_mut(&tid) {
                task.dependencies = deps;
            }
        }
        self.invalidate(root);
    }

    /// Move `id` (with its subtree) under `new_parent` at `index` (end when
    /// `None`). Returns where it used to be.
    pub(crate) fn reparent(
        &mut self,
        id: TaskId,
        new_parent: Option<TaskId>,
        index: Option<usize>,
    ) -> Result<Location> {
        if !self.contains(id) {
            return Err(EngineError::TaskNotFound(id));
        }
        if let Some(pid) = new_parent {
            if !self.contains(pid) {
                return Err(EngineError::TaskNotFound(pid));
            }
            if pid == id || self.is_ancestor(id, pid) {
                return Err(EngineError::InvalidReparent { task: id, parent: pid });
            }
            // A dependency edge between the task's subtree and its new
            // ancestors would become a hierarchy edge.
            let mut moving = self.descendants(id);
            moving.push(id);
            let mut chain = self.ancestors(pid);
            chain.push(pid);
            for m in &moving {
                for a in &chain {
                    let crosses = self.find(*m).is_some_and(|t| t.dependencies.contains(a))
                        || self.find(*a).is_some_and(|t| t.dependencies.contains(m));
                    if crosses {
                        return Err(EngineError::InvalidDependency {
                            successor: *m,
                            predecessor: *a,
                            reason: "the move would nest a task inside its own dependency",
                        });
                    }
                }
            }
        }
        self.move_to(id, new_parent, index)
            .ok_or(EngineError::TaskNotFound(id))
    }

    /// Unchecked move used by undo, where the target is known to be valid.
    pub(crate) fn move_to(
        &mut self,
        id: TaskId,
        new_parent: Option<TaskId>,
        index: Option<usize>,
    ) -> Option<Location> {
        let previous = self.detach(id)?;
        if let Some(old) = previous.parent {
            self.invalidate(old);
        }
        self.attach(id, new_parent, index);
        self.invalidate(id);
        Some(previous)
    }

    // ── Dependencies ────────────────────────────────────────────────

    /// Check that `successor` may depend on every id in `predecessors`.
    pub fn validate_dependencies(
        &self,
        successor: TaskId,
        predecessors: &BTreeSet<TaskId>,
    ) -> Result<()> {
        if !self.contains(successor) {
            return Err(EngineError::TaskNotFound(successor));
        }
        let ancestors = self.ancestors(successor);
        for &pred in predecessors {
            if !self.contains(pred) {
                return Err(EngineError::TaskNotFound(pred));
            }
            let reason = if pred == successor {
                Some("a task cannot depend on itself")
            } else if ancestors.contains(&pred) {
                Some("the predecessor is one of its ancestors")
            } else if self.is_ancestor(successor, pred) {
                Some("the predecessor is one of its descendants")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(EngineError::InvalidDependency {
                    successor,
                    predecessor: pred,
                    reason,
                });
            }
            if self.depends_transitively(pred, successor) {
                return Err(EngineError::DependencyCycle {
                    successor,
                    predecessor: pred,
                });
            }
        }
        Ok(())
    }

    /// Check predecessors for a task `successor` not yet inserted under
    /// `parent`.
    pub fn validate_new_dependencies(
        &self,
        successor: TaskId,
        parent: Option<TaskId>,
        predecessors: &BTreeSet<TaskId>,
    ) -> Result<()> {
        let mut chain = Vec::new();
        if let Some(pid) = parent.filter(|p| self.contains(*p)) {
            chain.push(pid);
            chain.extend(self.ancestors(pid));
        }
        for &pred in predecessors {
            if !self.contains(pred) {
                return Err(EngineError::TaskNotFound(pred));
            }
            if chain.contains(&pred) {
                return Err(EngineError::InvalidDependency {
                    successor,
                    predecessor: pred,
                    reason: "the predecessor is one of its ancestors",
                });
            }
        }
        Ok(())
    }

    /// True if `from` reaches `to` by following dependency edges.
    pub fn depends_transitively(&self, from: TaskId, to: TaskId) -> bool {
        let mut seen = BTreeSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(task) = self.tasks.get(&current) {
                stack.extend(task.dependencies.iter().copied());
            }
        }
        false
    }

    /// Replace the dependency set of `id` after validation. Returns the
    /// previous set.
    pub(crate) fn set_dependencies(
        &mut self,
        id: TaskId,
        deps: BTreeSet<TaskId>,
    ) -> Result<BTreeSet<TaskId>> {
        self.validate_dependencies(id, &deps)?;
        let task = self.find_mut(id).ok_or(EngineError::TaskNotFound(id))?;
        Ok(std::mem::replace(&mut task.dependencies, deps))
    }

    /// Overwrite the editable fields of `id`. Returns the previous values.
    pub(crate) fn update_fields(&mut self, id: TaskId, fields: TaskFields) -> Result<TaskFields> {
        self.validate_dependencies(id, &fields.dependencies)?;
        let task = self.find_mut(id).ok_or(EngineError::TaskNotFound(id))?;
        let previous = task.fields();
        task.apply_fields(fields);
        self.invalidate(id);
        Ok(previous)
    }

    /// Restore fields without validation (undo path).
    pub(crate) fn restore_fields(&mut self, id: TaskId, fields: TaskFields) {
        if let Some(task) = self.find_mut(id) {
            task.apply_fields(fields);
        }
        self.invalidate(id);
    }
}

/// Builds a graph from loaded or imported data, validating as it goes.
///
/// Dependencies are collected first and resolved in [`build`](Self::build),
/// so tasks may reference predecessors that appear later in the input.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: TaskGraph,
    pending: Vec<(TaskId, BTreeSet<TaskId>)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task under `parent` (appended in call order). Invalid fields
    /// and an explicit id that is already taken are errors.
    pub fn add(&mut self, draft: TaskDraft, parent: Option<TaskId>) -> Result<TaskId> {
        draft.fields.validate()?;
        let id = match draft.id {
            Some(id) if self.graph.contains(id) => return Err(EngineError::DuplicateId(id)),
            Some(id) => id,
            None => self.graph.allocate_id()?,
        };
        let mut draft = draft.with_id(id);
        let deps = std::mem::take(&mut draft.fields.dependencies);
        let placement = self.graph.insert(draft, parent);
        if !deps.is_empty() {
            self.pending.push((placement.id, deps));
        }
        Ok(placement.id)
    }

    /// Resolve dependencies. Unknown predecessor ids are dropped with a
    /// warning; invalid or cyclic edges are errors.
    pub fn build(mut self) -> Result<TaskGraph> {
        for (id, deps) in std::mem::take(&mut self.pending) {
            let mut resolved = BTreeSet::new();
            for dep in deps {
                if self.graph.contains(dep) {
                    resolved.insert(dep);
                } else {
                    warn!(task = id, missing = dep, "dropping dependency on unknown task");
                }
            }
            self.graph.set_dependencies(id, resolved)?;
        }
        Ok(self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    /// 1 Planning
    ///   2 Kickoff
    ///   3 Requirements
    /// 4 Execution
    ///   5 Build
    fn sample() -> TaskGraph {
        let mut g = TaskGraph::new();
        g.insert(TaskDraft::new("Planning", date(1), 5), None);
        g.insert(TaskDraft::new("Kickoff", date(1), 1), Some(1));
        g.insert(TaskDraft::new("Requirements", date(2), 3), Some(1));
        g.insert(TaskDraft::new("Execution", date(6), 5), None);
        g.insert(TaskDraft::new("Build", date(6), 4), Some(4));
        g
    }

    fn ids(tasks: Vec<&Task>) -> Vec<TaskId> {
        tasks.into_iter().map(|t| t.id).collect()
    }

    #[test]
    fn ids_are_assigned_monotonically_from_one() {
        let g = sample();
        assert_eq!(ids(g.flatten()), vec![1, 2, 3, 4, 5]);
        assert_eq!(g.next_id(), 6);
        assert_eq!(TaskGraph::new().next_id(), 1);
    }

    #[test]
    fn flatten_is_preorder_in_child_order() {
        let mut g = sample();
        g.insert(TaskDraft::new("Nested", date(3), 1), Some(2));
        assert_eq!(ids(g.flatten()), vec![1, 2, 6, 3, 4, 5]);
        let depths: Vec<usize> = g.flatten_with_depth().iter().map(|(d, _)| *d).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0, 1]);
    }

    #[test]
    fn find_and_find_parent() {
        let g = sample();
        assert_eq!(g.find(3).map(|t| t.name.as_str()), Some("Requirements"));
        assert!(g.find(42).is_none());
        assert_eq!(g.find_parent(3), Some(1));
        assert_eq!(g.find_parent(1), None);
        assert_eq!(g.find_parent(42), None);
        assert_eq!(g.find_by_name("build").map(|t| t.id), Some(5));
    }

    #[test]
    fn unknown_parent_falls_back_to_top_level() {
        let mut g = sample();
        let placement = g.insert(TaskDraft::new("Orphan", date(1), 1), Some(99));
        assert_eq!(placement.location.parent, None);
        assert_eq!(g.roots(), &[1, 4, 6]);
    }

    #[test]
    fn taken_explicit_id_is_replaced() {
        let mut g = sample();
        let placement = g.insert(TaskDraft::new("Clash", date(1), 1).with_id(2), None);
        assert_eq!(placement.id, 6);
    }

    #[test]
    fn remove_and_restore_is_exact() {
        let mut g = sample();
        g.set_dependencies(5, [2, 3].into()).unwrap();
        g.set_dependencies(3, [2].into()).unwrap();
        let before = g.clone();

        let removal = g.remove(1).unwrap();
        assert_eq!(removal.location, Location { parent: None, index: 0 });
        assert_eq!(removal.subtree.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(removal.severed.get(&5), Some(&BTreeSet::from([2, 3])));
        assert!(g.find(5).unwrap().dependencies.is_empty());
        assert_eq!(ids(g.flatten()), vec![4, 5]);

        g.restore(removal);
        assert_eq!(g, before);
    }

    #[test]
    fn remove_missing_task_is_none() {
        let mut g = sample();
        assert!(g.remove(42).is_none());
    }

    #[test]
    fn dependency_validation_rejects_cycles_and_hierarchy_edges() {
        let mut g = sample();
        g.set_dependencies(5, [3].into()).unwrap();

        assert!(matches!(
            g.set_dependencies(3, [5].into()),
            Err(EngineError::DependencyCycle { .. })
        ));
        assert!(matches!(
            g.set_dependencies(3, [3].into()),
            Err(EngineError::InvalidDependency { .. })
        ));
        assert!(matches!(
            g.set_dependencies(2, [1].into()),
            Err(EngineError::InvalidDependency { .. })
        ));
        assert!(matches!(
            g.set_dependencies(1, [2].into()),
            Err(EngineError::InvalidDependency { .. })
        ));
        assert!(matches!(
            g.set_dependencies(2, [77].into()),
            Err(EngineError::TaskNotFound(77))
        ));
        assert!(g.find(3).unwrap().dependencies.is_empty());
    }

    #[test]
    fn transitive_cycle_is_detected() {
        let mut g = sample();
        g.set_dependencies(3, [2].into()).unwrap();
        g.set_dependencies(5, [3].into()).unwrap();
        assert!(g.depends_transitively(5, 2));
        assert!(matches!(
            g.set_dependencies(2, [5].into()),
            Err(EngineError::DependencyCycle { successor: 2, predecessor: 5 })
        ));
    }

    #[test]
    fn reparent_moves_subtree_and_rejects_descendants() {
        let mut g = sample();
        let previous = g.reparent(4, Some(2), None).unwrap();
        assert_eq!(previous, Location { parent: None, index: 1 });
        assert_eq!(ids(g.flatten()), vec![1, 2, 4, 5, 3]);
        assert_eq!(g.ancestors(5), vec![4, 2, 1]);

        assert!(matches!(
            g.reparent(1, Some(5), None),
            Err(EngineError::InvalidReparent { task: 1, parent: 5 })
        ));
        assert!(matches!(g.reparent(1, Some(1), None), Err(EngineError::InvalidReparent { .. })));
    }

    #[test]
    fn reparent_rejects_nesting_under_a_predecessor() {
        let mut g = sample();
        g.set_dependencies(5, [3].into()).unwrap();
        assert!(matches!(
            g.reparent(5, Some(3), None),
            Err(EngineError::InvalidDependency { .. })
        ));
        assert_eq!(g.find_parent(5), Some(4));
    }

    #[test]
    fn builder_resolves_forward_references_and_drops_dangling() {
        let mut b = GraphBuilder::new();
        b.add(TaskDraft::new("A", date(1), 1).with_id(10).with_dependencies([11, 99]), None)
            .unwrap();
        b.add(TaskDraft::new("B", date(1), 1).with_id(11), None).unwrap();
        let g = b.build().unwrap();
        assert_eq!(g.find(10).unwrap().dependencies, BTreeSet::from([11]));
    }

    #[test]
    fn builder_rejects_duplicate_ids_and_cycles() {
        let mut b = GraphBuilder::new();
        b.add(TaskDraft::new("A", date(1), 1).with_id(1), None).unwrap();
        assert!(matches!(
            b.add(TaskDraft::new("B", date(1), 1).with_id(1), None),
            Err(EngineError::DuplicateId(1))
        ));

        let mut b = GraphBuilder::new();
        b.add(TaskDraft::new("A", date(1), 1).with_id(1).with_dependencies([2]), None)
            .unwrap();
        b.add(TaskDraft::new("B", date(1), 1).with_id(2).with_dependencies([1]), None)
            .unwrap();
        assert!(matches!(b.build(), Err(EngineError::DependencyCycle { .. })));
    }

    #[test]
    fn builder_validates_fields_and_runs_out_of_ids() {
        let mut b = GraphBuilder::new();
        assert!(matches!(
            b.add(TaskDraft::new("Forever", date(1), 1_000_000_000), None),
            Err(EngineError::InvalidArgument(_))
        ));
        assert_eq!(b.add(TaskDraft::new("First", date(1), 1), None).unwrap(), 1);
        b.add(TaskDraft::new("Last", date(1), 1).with_id(TaskId::MAX), None).unwrap();
        assert!(matches!(
            b.add(TaskDraft::new("Next", date(1), 1), None),
            Err(EngineError::InvalidArgument(_))
        ));
        assert_eq!(b.build().unwrap().len(), 2);
    }
}
