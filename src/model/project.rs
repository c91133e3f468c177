use chrono::{DateTime, Utc};

use crate::graph::TaskGraph;

/// A Gantt project: metadata plus the task forest.
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub author: String,
    /// Free-text description of the project.
    pub narrative: Option<String>,
    pub graph: TaskGraph,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
            author: String::new(),
            narrative: None,
            graph: TaskGraph::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_graph(name: impl Into<String>, graph: TaskGraph) -> Self {
        Self {
            name: name.into(),
            graph,
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}
