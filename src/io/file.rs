use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::graph::{GraphBuilder, TaskGraph};
use crate::model::{Project, TaskDraft, TaskFields, TaskId};

/// On-disk shape of a project: the task forest as nested records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub narrative: Option<String>,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub name: String,
    pub start: NaiveDate,
    pub duration_days: i64,
    #[serde(default)]
    pub percent_complete: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaskRecord>,
}

impl ProjectDocument {
    pub fn from_project(project: &Project) -> Self {
        let graph = &project.graph;
        Self {
            name: project.name.clone(),
            author: project.author.clone(),
            narrative: project.narrative.clone(),
            created: project.created,
            modified: project.modified,
            tasks: graph
                .roots()
                .iter()
                .filter_map(|id| record_for(graph, *id))
                .collect(),
        }
    }

    /// Rebuild the in-memory project, validating ids and dependencies.
    pub fn into_project(self) -> Result<Project> {
        let mut builder = GraphBuilder::new();
        for record in self.tasks {
            add_record(&mut builder, record, None)?;
        }
        Ok(Project {
            name: self.name,
            author: self.author,
            narrative: self.narrative,
            graph: builder.build()?,
            created: self.created,
            modified: self.modified,
        })
    }
}

fn record_for(graph: &TaskGraph, id: TaskId) -> Option<TaskRecord> {
    let task = graph.find(id)?;
    Some(TaskRecord {
        id: task.id,
        name: task.name.clone(),
        start: task.start,
        duration_days: task.duration_days,
        percent_complete: task.percent_complete,
        dependencies: task.dependencies.iter().copied().collect(),
        children: task
            .children
            .iter()
            .filter_map(|child| record_for(graph, *child))
            .collect(),
    })
}

fn add_record(builder: &mut GraphBuilder, record: TaskRecord, parent: Option<TaskId>) -> Result<()> {
    let fields = TaskFields::new(record.name, record.start, record.duration_days)
        .with_progress(record.percent_complete)
        .with_dependencies(record.dependencies);
    let id = builder.add(TaskDraft::from(fields).with_id(record.id), parent)?;
    for child in record.children {
        add_record(builder, child, Some(id))?;
    }
    Ok(())
}

/// Save a project to a JSON file.
pub fn save_project(project: &Project, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&ProjectDocument::from_project(project))?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), tasks = project.graph.len(), "project saved");
    Ok(())
}

/// Load a project from a JSON file.
pub fn load_project(path: &Path) -> Result<Project> {
    let json = std::fs::read_to_string(path)?;
    let document: ProjectDocument = serde_json::from_str(&json)?;
    let project = document.into_project()?;
    info!(path = %path.display(), tasks = project.graph.len(), "project loaded");
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    fn sample() -> Project {
        let mut b = GraphBuilder::new();
        b.add(TaskDraft::new("Planning", date(1), 1).with_id(1), None).unwrap();
        b.add(TaskDraft::new("Kickoff", date(1), 2).with_id(2), Some(1)).unwrap();
        b.add(TaskDraft::new("Scope", date(3), 4).with_id(3).with_dependencies([2]), Some(1))
            .unwrap();
        b.add(TaskDraft::milestone("Launch", date(9)).with_id(7).with_dependencies([1]), None)
            .unwrap();
        let mut project = Project::with_graph("Website", b.build().unwrap());
        project.author = "mhj".to_string();
        project.narrative = Some("Relaunch of the public site".to_string());
        project
    }

    #[test]
    fn save_and_load_preserve_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.gantt.json");
        let project = sample();
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.graph, project.graph);
        assert_eq!(loaded.name, "Website");
        assert_eq!(loaded.author, "mhj");
        assert_eq!(loaded.narrative.as_deref(), Some("Relaunch of the public site"));
        assert_eq!(loaded.graph.next_id(), 8);
    }

    #[test]
    fn document_nests_children() {
        let doc = ProjectDocument::from_project(&sample());
        assert_eq!(doc.tasks.len(), 2);
        assert_eq!(doc.tasks[0].children.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(doc.tasks[1].dependencies, vec![1]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{
            "name": "Broken",
            "tasks": [
                { "id": 1, "name": "A", "start": "2025-04-01", "duration_days": 1 },
                { "id": 1, "name": "B", "start": "2025-04-02", "duration_days": 1 }
            ]
        }"#;
        let doc: ProjectDocument = serde_json::from_str(json).unwrap();
        assert!(matches!(doc.into_project(), Err(EngineError::DuplicateId(1))));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ \"name\": ").unwrap();
        assert!(matches!(load_project(&path), Err(EngineError::Json(_))));
    }

    #[test]
    fn durations_past_the_calendar_are_rejected_on_load() {
        let json = r#"{
            "name": "Endless",
            "tasks": [
                { "id": 1, "name": "Forever", "start": "2025-04-01", "duration_days": 1000000000 }
            ]
        }"#;
        let doc: ProjectDocument = serde_json::from_str(json).unwrap();
        assert!(matches!(doc.into_project(), Err(EngineError::InvalidArgument(_))));
    }
}
