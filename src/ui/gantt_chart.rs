use crate::ui::theme;
use egui::{pos2, vec2, Align2, Color32, Painter, Rect, Rounding, Sense, Shape, Stroke, Ui, Vec2};
use gantt_engine::layout::{DayTick, Layout};
use gantt_engine::{compute_layout, LayoutConfig, ScheduledTask, TaskId, TaskShape};

/// Render the Gantt chart area (right panel).
///
/// Returns `Some(selection)` when the chart was clicked: the task under the
/// pointer, or `None` for empty space.
pub fn show_gantt_chart(
    rows: &[ScheduledTask],
    config: &LayoutConfig,
    selected_task: Option<TaskId>,
    ui: &mut Ui,
) -> Option<Option<TaskId>> {
    let available = ui.available_size();
    let layout = compute_layout(rows, available, config);
    let mut clicked = None;

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let canvas = chart_size(&layout).max(available);
            let (response, painter) = ui.allocate_painter(canvas, Sense::click());
            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            // Chart-body coordinates start below the header band.
            let body = response.rect.min + vec2(0.0, layout.header_height);

            draw_header(&painter, &layout, response.rect);
            draw_grid(&painter, &layout, body, canvas.y - layout.header_height);

            if let Some(geometry) = selected_task.and_then(|id| layout.geometry(id)) {
                painter.rect_filled(geometry.row_rect.translate(body.to_vec2()), 0.0, theme::BG_SELECTED);
            }

            for geometry in &layout.tasks {
                let Some(row) = rows.get(geometry.row) else {
                    continue;
                };
                draw_task(&painter, body, &geometry.shape, row, selected_task == Some(row.id));
            }

            let line = Stroke::new(1.2, theme::DEPENDENCY_LINE);
            for path in &layout.dependencies {
                for [a, b] in &path.segments {
                    painter.line_segment([body + a.to_vec2(), body + b.to_vec2()], line);
                }
                for [a, b] in &path.arrowhead {
                    painter.line_segment([body + a.to_vec2(), body + b.to_vec2()], line);
                }
            }

            if response.clicked() {
                clicked = Some(response.interact_pointer_pos().and_then(|p| {
                    let local = p - body;
                    layout.task_at(pos2(local.x, local.y))
                }));
            }
        });

    clicked
}

fn draw_header(painter: &Painter, layout: &Layout, canvas: Rect) {
    let header = Rect::from_min_size(canvas.min, vec2(canvas.width(), layout.header_height));
    painter.rect_filled(header, 0.0, theme::BG_HEADER);

    let pixels_per_day = layout.scale.map_or(0.0, |s| s.pixels_per_day);
    for tick in &layout.ticks {
        let x = canvas.min.x + tick.x;
        if let Some(month) = &tick.month_label {
            painter.text(
                pos2(x + 3.0, header.min.y + 3.0),
                Align2::LEFT_TOP,
                month,
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }
        if pixels_per_day >= theme::MIN_DAY_LABEL_WIDTH {
            painter.text(
                pos2(x + pixels_per_day / 2.0, header.max.y - 3.0),
                Align2::CENTER_BOTTOM,
                &tick.day_label,
                theme::font_sub(),
                day_label_color(tick),
            );
        }
    }

    painter.line_segment(
        [pos2(header.min.x, header.max.y), pos2(header.max.x, header.max.y)],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn day_label_color(tick: &DayTick) -> Color32 {
    if tick.is_weekend {
        theme::TEXT_DIM
    } else {
        theme::TEXT_SECONDARY
    }
}

fn draw_grid(painter: &Painter, layout: &Layout, body: egui::Pos2, height: f32) {
    let Some(scale) = layout.scale else {
        return;
    };
    for tick in &layout.ticks {
        let x = body.x + tick.x;
        if tick.is_weekend {
            painter.rect_filled(
                Rect::from_min_size(pos2(x, body.y), vec2(scale.pixels_per_day, height)),
                0.0,
                theme::BG_WEEKEND,
            );
        }
        painter.line_segment(
            [pos2(x, body.y), pos2(x, body.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }
    for geometry in &layout.tasks {
        let y = body.y + geometry.row_rect.max.y;
        painter.line_segment(
            [pos2(body.x, y), pos2(body.x + layout.size.x, y)],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
}

fn draw_task(painter: &Painter, body: egui::Pos2, shape: &TaskShape, row: &ScheduledTask, selected: bool) {
    let outline = if selected {
        Stroke::new(1.5, Color32::WHITE)
    } else {
        Stroke::NONE
    };
    let offset = body.to_vec2();

    match shape {
        TaskShape::Bar { rect, progress } => {
            let rect = rect.translate(offset);
            let color = if row.is_summary {
                theme::SUMMARY_BAR
            } else {
                theme::task_color(row.id)
            };
            let rounding = Rounding::same(theme::BAR_ROUNDING.min(rect.height() / 2.0));
            painter.rect(rect, rounding, color, outline);
            if let Some(done) = progress {
                painter.rect_filled(done.translate(offset), rounding, theme::PROGRESS_OVERLAY);
            }
            draw_label(painter, rect, &row.name);
        }
        TaskShape::Milestone { .. } => {
            let Some(points) = shape.diamond() else {
                return;
            };
            let points = points.iter().map(|p| *p + offset).collect();
            painter.add(Shape::convex_polygon(points, theme::MILESTONE, outline));
            let bounds = shape.bounds().translate(offset);
            painter.text(
                pos2(bounds.max.x + 4.0, bounds.center().y),
                Align2::LEFT_CENTER,
                &row.name,
                theme::font_bar(),
                theme::TEXT_SECONDARY,
            );
        }
    }
}

/// Name inside the bar when it fits, otherwise just right of it.
fn draw_label(painter: &Painter, rect: Rect, name: &str) {
    let galley = painter.layout_no_wrap(name.to_string(), theme::font_bar(), theme::TEXT_ON_BAR);
    let fits = galley.size().x + 8.0 <= rect.width();
    let (pos, color) = if fits {
        (pos2(rect.min.x + 4.0, rect.center().y), theme::TEXT_ON_BAR)
    } else {
        (pos2(rect.max.x + 4.0, rect.center().y), theme::TEXT_SECONDARY)
    };
    painter.text(pos, Align2::LEFT_CENTER, name, theme::font_bar(), color);
}

fn chart_size(layout: &Layout) -> Vec2 {
    vec2(layout.size.x, layout.header_height + layout.size.y)
}
