use crate::app::GanttApp;
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};

/// Render the "Add Task" dialog.
pub fn show_add_task_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut should_close = false;
    let mut should_create = false;

    let parent_label = app
        .add_task
        .parent
        .and_then(|pid| app.editor.graph().find(pid))
        .map(|t| t.name.clone())
        .unwrap_or_else(|| "(top level)".to_string());
    let candidates: Vec<(u64, String)> = app
        .editor
        .graph()
        .flatten_with_depth()
        .into_iter()
        .map(|(depth, t)| (t.id, format!("{}{}", "  ".repeat(depth), t.name)))
        .collect();

    let dialog = &mut app.add_task;
    Window::new(RichText::new("Add Task").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);

            egui::Grid::new("add_task_grid")
                .num_columns(2)
                .striped(false)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut dialog.name).hint_text("Task name..."),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut dialog.start).id_salt("dlg_dp_start"));
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    ui.add_enabled_ui(!dialog.milestone, |ui| {
                        ui.add(egui_extras::DatePickerButton::new(&mut dialog.end).id_salt("dlg_dp_end"));
                    });
                    ui.end_row();

                    ui.label(RichText::new("Parent").color(theme::TEXT_SECONDARY));
                    egui::ComboBox::from_id_salt("dlg_parent")
                        .selected_text(parent_label)
                        .width(220.0)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut dialog.parent, None, "(top level)");
                            for (id, name) in &candidates {
                                ui.selectable_value(&mut dialog.parent, Some(*id), name.as_str());
                            }
                        });
                    ui.end_row();

                    ui.label("");
                    ui.checkbox(&mut dialog.milestone, "Milestone");
                    ui.end_row();
                });

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let create_btn = egui::Button::new(RichText::new("Create").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], create_btn).clicked() {
                    should_create = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if should_create {
        // Closes itself on success; stays open with the error in the status bar otherwise.
        app.create_task_from_dialog();
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.add_task.open = false;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([280.0, 160.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Gantt Viewer").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Task graphs with undo, derived");
                ui.label("schedules and routed dependencies.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
