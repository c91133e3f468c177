use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{EngineError, Result};
use crate::graph::{GraphBuilder, TaskGraph};
use crate::model::{TaskDraft, TaskFields, TaskId};

/// What an import produced.
#[derive(Debug)]
pub struct ImportReport {
    pub graph: TaskGraph,
    pub imported: usize,
    pub skipped: usize,
}

/// Columns we understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Name,
    Start,
    End,
    Progress,
    Duration,
    Parent,
    DependsOn,
    Id,
    Milestone,
}

/// Map a status string or percentage to a progress value (0 to 100).
fn parse_progress(value: &str) -> u8 {
    let value = value.trim();
    if let Ok(pct) = value.trim_end_matches('%').trim().parse::<f32>() {
        return pct.clamp(0.0, 100.0).round() as u8;
    }
    match value.to_lowercase().as_str() {
        "finished" | "done" | "complete" | "completed" => 100,
        "in progress" | "in-progress" | "active" | "started" => 50,
        "released" | "planned" => 25,
        _ => 0,
    }
}

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

fn header_to_column(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    match normalized.as_str() {
        "name" | "task" | "tasklabel" | "taskname" | "label" | "title" | "activity" => {
            Some(Column::Name)
        }
        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => {
            Some(Column::End)
        }
        "status" | "state" | "progress" | "done" | "percentcomplete" | "complete" => {
            Some(Column::Progress)
        }
        "duration" | "days" | "durationdays" => Some(Column::Duration),
        "parent" | "parenttask" | "parentname" | "subtaskof" => Some(Column::Parent),
        "dependson" | "depends" | "dependencies" | "predecessors" | "after" => {
            Some(Column::DependsOn)
        }
        "id" | "taskid" => Some(Column::Id),
        "milestone" | "ismilestone" | "type" => Some(Column::Milestone),
        _ => None,
    }
}

/// A parsed row whose parent and dependency references are still names.
struct PendingRow {
    id: Option<TaskId>,
    fields: TaskFields,
    parent: Option<String>,
    depends_on: Vec<String>,
}

/// Import a task forest from a CSV file.
///
/// Auto-detects the delimiter and matches headers flexibly. Needs a name and
/// a start column plus either an end or a duration column. Parents are
/// resolved by name (or id) in a second pass, dependencies likewise.
pub fn import_csv(path: &Path) -> Result<ImportReport> {
    let content = std::fs::read_to_string(path)?;
    let report = import_csv_str(&content)?;
    info!(
        path = %path.display(),
        imported = report.imported,
        skipped = report.skipped,
        "imported CSV"
    );
    Ok(report)
}

/// Same as [`import_csv`] for in-memory text.
pub fn import_csv_str(content: &str) -> Result<ImportReport> {
    let first_line = content.lines().next().unwrap_or("");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(first_line))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let columns: Vec<Option<Column>> = reader.headers()?.iter().map(header_to_column).collect();
    let has = |c: Column| columns.contains(&Some(c));
    if !has(Column::Name) || !has(Column::Start) || !(has(Column::End) || has(Column::Duration)) {
        return Err(EngineError::Format(
            "CSV needs columns for task name, start date and end date or duration".to_string(),
        ));
    }

    let mut rows: Vec<PendingRow> = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable CSV row");
                skipped += 1;
                continue;
            }
        };

        let mut cell: HashMap<Column, &str> = HashMap::new();
        for (idx, value) in record.iter().enumerate() {
            if let Some(Some(column)) = columns.get(idx) {
                cell.entry(*column).or_insert(value);
            }
        }
        let get = |c: Column| cell.get(&c).copied().filter(|v| !v.is_empty());

        let Some(name) = get(Column::Name) else {
            skipped += 1;
            continue;
        };
        let Some(start) = get(Column::Start).and_then(parse_date) else {
            warn!(line, task = name, "skipping row with invalid start date");
            skipped += 1;
            continue;
        };
        let milestone = get(Column::Milestone).is_some_and(|s| {
            matches!(s.to_lowercase().as_str(), "true" | "yes" | "1" | "milestone")
        });
        let duration = if milestone {
            Some(0)
        } else if let Some(end) = get(Column::End).and_then(parse_date) {
            Some((end - start).num_days().max(0))
        } else {
            get(Column::Duration).and_then(|d| d.parse::<i64>().ok()).map(|d| d.max(0))
        };
        let Some(duration_days) = duration else {
            warn!(line, task = name, "skipping row without an end date or duration");
            skipped += 1;
            continue;
        };

        let fields = TaskFields::new(name, start, duration_days)
            .with_progress(get(Column::Progress).map(parse_progress).unwrap_or(0));
        if let Err(e) = fields.validate() {
            warn!(line, task = name, error = %e, "skipping row with invalid task fields");
            skipped += 1;
            continue;
        }
        rows.push(PendingRow {
            id: get(Column::Id).and_then(|s| s.parse().ok()),
            fields,
            parent: get(Column::Parent).map(str::to_string),
            depends_on: get(Column::DependsOn)
                .map(|s| {
                    s.split([',', '|'])
                        .map(|r| r.trim().to_string())
                        .filter(|r| !r.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        });
    }

    if rows.is_empty() {
        return Err(EngineError::Format(if skipped > 0 {
            format!("No valid tasks found in CSV ({} rows skipped)", skipped)
        } else {
            "CSV file is empty or has no data rows".to_string()
        }));
    }

    let ids = assign_ids(&rows)?;
    let mut by_name: HashMap<String, TaskId> = HashMap::new();
    for (row, id) in rows.iter().zip(&ids) {
        by_name.entry(row.fields.name.to_lowercase()).or_insert(*id);
    }
    let known: BTreeSet<TaskId> = ids.iter().copied().collect();
    let resolve = |reference: &str| -> Option<TaskId> {
        by_name
            .get(&reference.to_lowercase())
            .copied()
            .or_else(|| reference.parse().ok().filter(|id| known.contains(id)))
    };

    // Parent index per row; self references and cycles are dropped.
    let index_of: HashMap<TaskId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let mut parent_of: Vec<Option<usize>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let reference = row.parent.as_deref()?;
            match resolve(reference).and_then(|pid| index_of.get(&pid).copied()) {
                Some(p) if p != i => Some(p),
                Some(_) => None,
                None => {
                    warn!(parent = reference, task = %row.fields.name, "parent task not found");
                    None
                }
            }
        })
        .collect();
    for i in 0..rows.len() {
        let mut current = parent_of[i];
        let mut steps = 0;
        while let Some(p) = current {
            if p == i || steps > rows.len() {
                warn!(task = %rows[i].fields.name, "breaking parent cycle");
                parent_of[i] = None;
                break;
            }
            current = parent_of[p];
            steps += 1;
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
    let mut roots = Vec::new();
    for (i, parent) in parent_of.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    let mut drafts: Vec<Option<TaskDraft>> = rows
        .into_iter()
        .zip(&ids)
        .map(|(row, id)| {
            let deps = row.depends_on.iter().filter_map(|r| {
                let resolved = resolve(r);
                if resolved.is_none() {
                    warn!(dependency = %r, task = %row.fields.name, "dependency not found");
                }
                resolved
            });
            let deps: BTreeSet<TaskId> = deps.collect();
            Some(TaskDraft::from(row.fields.with_dependencies(deps)).with_id(*id))
        })
        .collect();

    let mut builder = GraphBuilder::new();
    let mut stack: Vec<(usize, Option<TaskId>)> = roots.iter().rev().map(|i| (*i, None)).collect();
    let mut imported = 0;
    while let Some((i, parent)) = stack.pop() {
        let Some(draft) = drafts[i].take() else {
            continue;
        };
        let id = builder.add(draft, parent)?;
        imported += 1;
        stack.extend(children[i].iter().rev().map(|c| (*c, Some(id))));
    }

    Ok(ImportReport {
        graph: builder.build()?,
        imported,
        skipped,
    })
}

/// Explicit ids are kept; the rest continue after the largest one.
fn assign_ids(rows: &[PendingRow]) -> Result<Vec<TaskId>> {
    let mut taken = BTreeSet::new();
    for id in rows.iter().filter_map(|r| r.id) {
        if !taken.insert(id) {
            return Err(EngineError::DuplicateId(id));
        }
    }
    let mut next = match taken.iter().next_back() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    };
    let mut ids = Vec::with_capacity(rows.len());
    for row in rows {
        let id = match row.id {
            Some(id) => id,
            None => {
                let id = next.ok_or_else(|| {
                    EngineError::Format(format!("no task id left after {}", TaskId::MAX))
                })?;
                next = id.checked_add(1);
                id
            }
        };
        ids.push(id);
    }
    Ok(ids)
}
