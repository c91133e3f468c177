use crate::ui::theme;
use chrono::NaiveDate;
use egui::{Id, RichText, Ui};
use gantt_engine::{Command, Result, TaskGraph, TaskId};

/// Uncommitted edits for the selected task, kept in egui memory so typing
/// does not create one command per keystroke.
#[derive(Clone)]
struct EditBuffer {
    name: String,
    start: NaiveDate,
    duration_days: i64,
    percent_complete: u8,
}

fn section_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_DIM).strong());
}

/// Render an inline editor for task `id`. Returns the command the user asked
/// for, if any.
pub fn show_task_editor(graph: &TaskGraph, id: TaskId, ui: &mut Ui) -> Option<Result<Command>> {
    let task = graph.find(id)?;
    let mut command = None;

    let buffer_id = Id::new(("task-edit", id));
    let mut buffer = ui.data_mut(|d| d.get_temp::<EditBuffer>(buffer_id)).unwrap_or_else(|| EditBuffer {
        name: task.name.clone(),
        start: task.start,
        duration_days: task.duration_days,
        percent_complete: task.percent_complete,
    });

    ui.add_space(6.0);
    ui.label(RichText::new("Edit Task").strong().size(13.0).color(theme::TEXT_PRIMARY));
    ui.add_space(4.0);

    egui::Frame::default()
        .fill(theme::BG_DARK)
        .rounding(egui::Rounding::same(4.0))
        .inner_margin(egui::Margin::same(8.0))
        .stroke(egui::Stroke::new(1.0, theme::BORDER_SUBTLE))
        .show(ui, |ui| {
            ui.spacing_mut().item_spacing.y = 6.0;

            // ── Fields ─────────────────────────────────────────────────────
            section_label(ui, "Name");
            ui.add_sized([ui.available_width(), 24.0], egui::TextEdit::singleline(&mut buffer.name));

            if !task.is_leaf() {
                if let Some(schedule) = graph.schedule(id) {
                    ui.label(
                        RichText::new(format!(
                            "Spans {} → {} from its subtasks",
                            schedule.start.format("%Y-%m-%d"),
                            schedule.end().format("%Y-%m-%d")
                        ))
                        .size(10.5)
                        .color(theme::TEXT_SECONDARY),
                    );
                }
            }

            egui::Grid::new(("task-edit-grid", id))
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    section_label(ui, "Start");
                    ui.add(egui_extras::DatePickerButton::new(&mut buffer.start).id_salt("edit_dp_start"));
                    ui.end_row();

                    section_label(ui, "Days");
                    ui.add(egui::DragValue::new(&mut buffer.duration_days).range(0..=3650));
                    ui.end_row();

                    section_label(ui, "Done");
                    ui.add(egui::Slider::new(&mut buffer.percent_complete, 0..=100).suffix("%"));
                    ui.end_row();
                });

            ui.horizontal(|ui| {
                if ui.button("Apply").clicked() {
                    let fields = task.fields();
                    let mut edited = fields.clone();
                    edited.name = buffer.name.trim().to_string();
                    edited.start = buffer.start;
                    edited.duration_days = buffer.duration_days;
                    edited.percent_complete = buffer.percent_complete;
                    if edited != fields {
                        command = Some(Command::update(id, edited));
                    }
                }
                if ui.button("Revert").clicked() {
                    buffer = EditBuffer {
                        name: task.name.clone(),
                        start: task.start,
                        duration_days: task.duration_days,
                        percent_complete: task.percent_complete,
                    };
                }
            });

            ui.separator();

            // ── Parent ─────────────────────────────────────────────────────
            section_label(ui, "Parent");
            let current_parent = graph.find_parent(id);
            let parent_label = current_parent
                .and_then(|pid| graph.find(pid))
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "(top level)".to_string());
            let descendants = graph.descendants(id);
            egui::ComboBox::from_id_salt(("parent_combo", id))
                .selected_text(RichText::new(parent_label).size(11.0))
                .width(ui.available_width())
                .show_ui(ui, |ui| {
                    if ui.selectable_label(current_parent.is_none(), "(top level)").clicked()
                        && current_parent.is_some()
                    {
                        command = Some(Command::reparent(id, None));
                    }
                    for candidate in graph.flatten() {
                        if candidate.id == id
                            || descendants.contains(&candidate.id)
                            || task.dependencies.contains(&candidate.id)
                        {
                            continue;
                        }
                        let is_current = current_parent == Some(candidate.id);
                        if ui.selectable_label(is_current, candidate.name.as_str()).clicked() && !is_current {
                            command = Some(Command::reparent(id, Some(candidate.id)));
                        }
                    }
                });

            // ── Dependencies ───────────────────────────────────────────────
            section_label(ui, "Starts after");
            for pred in &task.dependencies {
                let name = graph.find(*pred).map(|t| t.name.as_str()).unwrap_or("?");
                ui.horizontal(|ui| {
                    ui.label(RichText::new(name).size(11.0));
                    if ui
                        .add(egui::Button::new(RichText::new("✕").size(10.0)).frame(false))
                        .on_hover_text("Remove dependency")
                        .clicked()
                    {
                        command = Some(Ok(Command::unlink(id, *pred)));
                    }
                });
            }

            let ancestors = graph.ancestors(id);
            egui::ComboBox::from_id_salt(("dep_combo", id))
                .selected_text(RichText::new("Add predecessor…").size(11.0))
                .width(ui.available_width())
                .show_ui(ui, |ui| {
                    for candidate in graph.flatten() {
                        if candidate.id == id
                            || task.dependencies.contains(&candidate.id)
                            || ancestors.contains(&candidate.id)
                            || descendants.contains(&candidate.id)
                        {
                            continue;
                        }
                        if ui.selectable_label(false, candidate.name.as_str()).clicked() {
                            command = Some(Command::link(id, candidate.id));
                        }
                    }
                });
        });

    if command.is_some() {
        ui.data_mut(|d| d.remove::<EditBuffer>(buffer_id));
    } else {
        ui.data_mut(|d| d.insert_temp(buffer_id, buffer));
    }
    command
}
