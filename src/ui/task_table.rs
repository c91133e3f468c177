use crate::ui::theme;
use egui::{Color32, RichText, Ui};
use gantt_engine::{ScheduledTask, TaskId};

/// Actions that the task table can request.
pub enum TaskTableAction {
    None,
    Select(TaskId),
    Delete(TaskId),
    Add,
}

/// Render the left-side task table: one row per scheduled task, indented by
/// depth, in the same order as the chart.
pub fn show_task_table(
    rows: &[ScheduledTask],
    selected_task: Option<TaskId>,
    ui: &mut Ui,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Tasks").strong().size(15.0).color(theme::TEXT_PRIMARY));
        ui.add_space(4.0);
        ui.label(RichText::new(format!("({})", rows.len())).size(11.0).color(theme::TEXT_DIM));
    });
    ui.add_space(4.0);

    let label = if selected_task.is_some() { "＋  Add Subtask" } else { "＋  Add Task" };
    let btn = egui::Button::new(RichText::new(label).color(Color32::WHITE).size(12.0))
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(5.0));
    if ui.add_sized([ui.available_width(), 30.0], btn).clicked() {
        action = TaskTableAction::Add;
    }

    ui.add_space(6.0);
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (i, row) in rows.iter().enumerate() {
                let is_selected = selected_task == Some(row.id);
                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };

                let frame_resp = egui::Frame::default()
                    .fill(row_bg)
                    .rounding(egui::Rounding::same(4.0))
                    .inner_margin(egui::Margin::symmetric(6.0, 4.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.spacing_mut().item_spacing.x = 6.0;
                            ui.add_space(row.depth as f32 * 12.0);

                            let name = if row.is_milestone() {
                                format!("◆ {}", row.name)
                            } else {
                                row.name.clone()
                            };
                            let mut name_text = RichText::new(name).size(12.0).color(if is_selected {
                                Color32::WHITE
                            } else {
                                theme::TEXT_PRIMARY
                            });
                            if row.is_summary {
                                name_text = name_text.strong();
                            }
                            ui.add(egui::Label::new(name_text).truncate());

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.spacing_mut().item_spacing.x = 4.0;

                                let del_btn = ui.add(
                                    egui::Button::new(RichText::new("✕").size(10.0).color(theme::TEXT_DIM))
                                        .frame(false),
                                );
                                if del_btn.on_hover_text("Delete task").clicked() {
                                    action = TaskTableAction::Delete(row.id);
                                }

                                ui.label(
                                    RichText::new(format!("{}%", row.percent_complete))
                                        .size(10.0)
                                        .color(theme::TEXT_SECONDARY),
                                );
                                ui.label(
                                    RichText::new(format!(
                                        "{} → {}",
                                        row.start().format("%m/%d"),
                                        row.end().format("%m/%d")
                                    ))
                                    .size(10.0)
                                    .color(theme::TEXT_SECONDARY),
                                );
                            });
                        });
                    });

                // Make entire row clickable
                let row_click = ui.interact(
                    frame_resp.response.rect,
                    egui::Id::new(("task-row", row.id)),
                    egui::Sense::click(),
                );
                if row_click.clicked() {
                    action = TaskTableAction::Select(row.id);
                }
                ui.add_space(1.0);
            }
        });

    action
}
