use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::graph::TaskGraph;

pub const HEADER: [&str; 8] = [
    "Id",
    "Task Label",
    "Parent",
    "Start Date",
    "End Date",
    "Duration",
    "Progress",
    "Depends On",
];

/// Export the flattened schedule to a semicolon-delimited CSV file that
/// [`import_csv`](super::csv_import::import_csv) reads back.
///
/// Dates are the calculated schedule, formatted as DD/MM/YYYY. Parents are
/// referenced by name, dependencies by id.
/// Returns the number of tasks written.
pub fn export_csv(graph: &TaskGraph, path: &Path) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)?;

    wtr.write_record(HEADER)?;

    let mut count = 0;
    for row in graph.scheduled_rows() {
        let parent = graph
            .find_parent(row.id)
            .and_then(|pid| graph.find(pid))
            .map(|p| p.name.clone())
            .unwrap_or_default();
        let depends_on = row
            .dependencies
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",");
        wtr.write_record([
            row.id.to_string(),
            row.name.clone(),
            parent,
            row.start().format("%d/%m/%Y").to_string(),
            row.end().format("%d/%m/%Y").to_string(),
            row.schedule.duration_days.to_string(),
            format!("{}%", row.percent_complete),
            depends_on,
        ])?;
        count += 1;
    }

    wtr.flush()?;
    info!(path = %path.display(), tasks = count, "exported CSV");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::io::csv_import::import_csv;
    use crate::model::TaskDraft;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    fn sample() -> TaskGraph {
        let mut b = GraphBuilder::new();
        b.add(TaskDraft::new("Phase", date(1), 1), None).unwrap();
        b.add(TaskDraft::new("Design", date(2), 3).with_progress(40), Some(1)).unwrap();
        b.add(TaskDraft::new("Build", date(5), 4).with_dependencies([2]), Some(1)).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn writes_header_and_scheduled_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        assert_eq!(export_csv(&sample(), &path).unwrap(), 3);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADER.join(";"));
        assert_eq!(lines[1], "1;Phase;;02/04/2025;09/04/2025;7;0%;");
        assert_eq!(lines[2], "2;Design;Phase;02/04/2025;05/04/2025;3;40%;");
        assert_eq!(lines[3], "3;Build;Phase;05/04/2025;09/04/2025;4;0%;2");
    }

    #[test]
    fn export_then_import_keeps_the_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.csv");
        let graph = sample();
        export_csv(&graph, &path).unwrap();

        let report = import_csv(&path).unwrap();
        assert_eq!(report.imported, 3);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.graph.scheduled_rows(), graph.scheduled_rows());
    }
}
