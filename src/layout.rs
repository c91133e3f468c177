//! Timeline geometry.
//!
//! [`compute_layout`] turns the flattened, scheduled task list into pixel
//! coordinates: one bar or diamond per row, an orthogonal polyline per
//! dependency edge, and one header tick per day. It never touches task data
//! and keeps no state between calls.
//!
//! Coordinates are relative to the top-left corner of the chart body; the
//! day ruler sits above it in a band of `header_height` pixels.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use egui::{pos2, vec2, Pos2, Rect, Vec2};

use crate::config::LayoutConfig;
use crate::model::TaskId;
use crate::scheduler::ScheduledTask;

/// Mapping between dates/rows and pixels for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub min_date: NaiveDate,
    /// Days covered by the ruler, inclusive of both ends.
    pub total_days: i64,
    pub pixels_per_day: f32,
    pub row_height: f32,
}

impl Scale {
    /// Fit the task span into `viewport`, never going below the configured
    /// minimum zoom or row height. `None` when there are no rows.
    pub fn fit(rows: &[ScheduledTask], viewport: Vec2, config: &LayoutConfig) -> Option<Self> {
        let min_date = rows.iter().map(|r| r.start()).min()?;
        let max_end = rows.iter().map(|r| r.end()).max()?;
        let total_days = (max_end - min_date).num_days() + 1;

        let width = viewport.x.max(0.0);
        let height = (viewport.y - config.header_height).max(0.0);

        Some(Self {
            min_date,
            total_days,
            pixels_per_day: (width / total_days as f32).max(config.min_pixels_per_day),
            row_height: (height / rows.len() as f32).max(config.min_row_height),
        })
    }

    /// Convert a date to an x-pixel offset from the first ruler day.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        let days = (date - self.min_date).num_days() as f32;
        days * self.pixels_per_day
    }

    /// Convert an x-pixel offset back to the nearest date, clamped to the
    /// calendar.
    pub fn x_to_date(&self, x: f32) -> NaiveDate {
        let days = (x / self.pixels_per_day).round() as i64;
        Duration::try_days(days)
            .and_then(|d| self.min_date.checked_add_signed(d))
            .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
    }

    pub fn row_top(&self, row: usize) -> f32 {
        row as f32 * self.row_height
    }

    pub fn row_center(&self, row: usize) -> f32 {
        self.row_top(row) + self.row_height / 2.0
    }
}

/// How a task is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskShape {
    Bar {
        rect: Rect,
        /// Completed portion, present only for partial progress.
        progress: Option<Rect>,
    },
    Milestone { center: Pos2, half_size: f32 },
}

impl TaskShape {
    /// Corners of a milestone diamond: top, right, bottom, left.
    pub fn diamond(&self) -> Option<[Pos2; 4]> {
        match *self {
            TaskShape::Milestone { center, half_size } => Some([
                pos2(center.x, center.y - half_size),
                pos2(center.x + half_size, center.y),
                pos2(center.x, center.y + half_size),
                pos2(center.x - half_size, center.y),
            ]),
            TaskShape::Bar { .. } => None,
        }
    }

    /// Bounding box, used for hit testing.
    pub fn bounds(&self) -> Rect {
        match *self {
            TaskShape::Bar { rect, .. } => rect,
            TaskShape::Milestone { center, half_size } => {
                Rect::from_center_size(center, Vec2::splat(half_size * 2.0))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskGeometry {
    pub id: TaskId,
    pub row: usize,
    /// The full-width band of the row.
    pub row_rect: Rect,
    pub shape: TaskShape,
}

/// Routed line from a predecessor's end into a successor's start.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyPath {
    pub predecessor: TaskId,
    pub successor: TaskId,
    /// Five orthogonal segments, in drawing order.
    pub segments: Vec<[Pos2; 2]>,
    /// Two strokes converging on the successor's start edge.
    pub arrowhead: [[Pos2; 2]; 2],
}

impl DependencyPath {
    /// The path as a connected polyline (segment end points in order).
    pub fn points(&self) -> Vec<Pos2> {
        let mut points = Vec::with_capacity(self.segments.len() + 1);
        if let Some(first) = self.segments.first() {
            points.push(first[0]);
        }
        points.extend(self.segments.iter().map(|s| s[1]));
        points
    }
}

/// One vertical rule of the day ruler.
#[derive(Debug, Clone, PartialEq)]
pub struct DayTick {
    pub date: NaiveDate,
    pub x: f32,
    pub day_label: String,
    /// Set on the first visible day and on every first-of-month.
    pub month_label: Option<String>,
    pub is_weekend: bool,
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// `None` for an empty task list.
    pub scale: Option<Scale>,
    /// Size of the chart body (excluding the header band).
    pub size: Vec2,
    pub header_height: f32,
    pub tasks: Vec<TaskGeometry>,
    pub dependencies: Vec<DependencyPath>,
    pub ticks: Vec<DayTick>,
}

impl Layout {
    fn empty(config: &LayoutConfig) -> Self {
        Self {
            scale: None,
            size: Vec2::ZERO,
            header_height: config.header_height,
            tasks: Vec::new(),
            dependencies: Vec::new(),
            ticks: Vec::new(),
        }
    }

    pub fn geometry(&self, id: TaskId) -> Option<&TaskGeometry> {
        self.tasks.iter().find(|g| g.id == id)
    }

    /// The task drawn under `pos` (chart-body coordinates), if any.
    pub fn task_at(&self, pos: Pos2) -> Option<TaskId> {
        self.tasks
            .iter()
            .find(|g| g.shape.bounds().expand(2.0).contains(pos))
            .map(|g| g.id)
    }
}

/// Lay out `rows` (pre-order, already scheduled) inside `viewport`.
pub fn compute_layout(rows: &[ScheduledTask], viewport: Vec2, config: &LayoutConfig) -> Layout {
    let Some(scale) = Scale::fit(rows, viewport, config) else {
        return Layout::empty(config);
    };

    let width = scale.total_days as f32 * scale.pixels_per_day;
    let tasks: Vec<TaskGeometry> = rows
        .iter()
        .enumerate()
        .map(|(row, task)| TaskGeometry {
            id: task.id,
            row,
            row_rect: Rect::from_min_size(
                pos2(0.0, scale.row_top(row)),
                vec2(width, scale.row_height),
            ),
            shape: task_shape(&scale, config, row, task),
        })
        .collect();

    let row_of: HashMap<TaskId, usize> = rows.iter().enumerate().map(|(i, r)| (r.id, i)).collect();
    let mut dependencies = Vec::new();
    for (succ_row, successor) in rows.iter().enumerate() {
        for pred_id in &successor.dependencies {
            // Predecessors outside the list (filtered or collapsed) are not drawn.
            let Some(&pred_row) = row_of.get(pred_id) else {
                continue;
            };
            dependencies.push(route_dependency(
                &scale,
                config,
                (&rows[pred_row], pred_row),
                (successor, succ_row),
            ));
        }
    }

    Layout {
        scale: Some(scale),
        size: vec2(width, rows.len() as f32 * scale.row_height),
        header_height: config.header_height,
        tasks,
        dependencies,
        ticks: day_ticks(&scale),
    }
}

fn task_shape(scale: &Scale, config: &LayoutConfig, row: usize, task: &ScheduledTask) -> TaskShape {
    let x = scale.date_to_x(task.start());
    let y = scale.row_top(row);

    if task.is_milestone() {
        return TaskShape::Milestone {
            center: pos2(x, y + scale.row_height / 2.0),
            half_size: (scale.row_height / 2.0 - config.bar_inset).max(2.0),
        };
    }

    let width = task.schedule.duration_days as f32 * scale.pixels_per_day;
    let inset = config.bar_inset.min(scale.row_height / 4.0);
    let rect = Rect::from_min_max(pos2(x, y + inset), pos2(x + width, y + scale.row_height - inset));
    let progress = (task.percent_complete > 0 && task.percent_complete < 100).then(|| {
        let done = width * f32::from(task.percent_complete) / 100.0;
        Rect::from_min_size(rect.min, vec2(done, rect.height()))
    });
    TaskShape::Bar { rect, progress }
}

/// Route predecessor end → successor start as five orthogonal segments so
/// the line never crosses the bars on the rows in between: out a quarter
/// day, along the gap just above the successor's row, back a quarter day
/// before the successor, down to its centre line, then in.
pub fn route_dependency(
    scale: &Scale,
    config: &LayoutConfig,
    (predecessor, pred_row): (&ScheduledTask, usize),
    (successor, succ_row): (&ScheduledTask, usize),
) -> DependencyPath {
    let stub = scale.pixels_per_day / 4.0;
    let channel_y = scale.row_center(succ_row) - scale.row_height / 2.0;

    let from = pos2(scale.date_to_x(predecessor.end()), scale.row_center(pred_row));
    let out = pos2(from.x + stub, from.y);
    let drop = pos2(out.x, channel_y);
    let to = pos2(scale.date_to_x(successor.start()), scale.row_center(succ_row));
    let approach = pos2(to.x - stub, channel_y);
    let descend = pos2(approach.x, to.y);

    let a = config.arrow_size;
    DependencyPath {
        predecessor: predecessor.id,
        successor: successor.id,
        segments: vec![[from, out], [out, drop], [drop, approach], [approach, descend], [descend, to]],
        arrowhead: [[pos2(to.x - a, to.y - a), to], [pos2(to.x - a, to.y + a), to]],
    }
}

fn day_ticks(scale: &Scale) -> Vec<DayTick> {
    (0..scale.total_days)
        .map(|offset| {
            let date = scale.min_date + Duration::days(offset);
            DayTick {
                date,
                x: offset as f32 * scale.pixels_per_day,
                day_label: date.format("%d").to_string(),
                month_label: (offset == 0 || date.day() == 1)
                    .then(|| date.format("%b %Y").to_string()),
                is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            }
        })
        .collect()
}
