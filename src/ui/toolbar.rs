use crate::app::GanttApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  New Project").clicked() {
                app.new_project();
                ui.close_menu();
            }
            if ui.button("  Open...").clicked() {
                app.open_project();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Save          Ctrl+S").clicked() {
                app.save_project();
                ui.close_menu();
            }
            if ui.button("  Save As...").clicked() {
                app.save_project_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Import CSV...").clicked() {
                app.import_csv();
                ui.close_menu();
            }
            if ui.button("  Export CSV...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Edit  ").font(theme::font_menu()), |ui| {
            let undo_label = match app.editor.undo_description() {
                Some(d) => format!("  Undo {}    Ctrl+Z", d),
                None => "  Undo    Ctrl+Z".to_string(),
            };
            if ui.add_enabled(app.editor.can_undo(), egui::Button::new(undo_label)).clicked() {
                app.undo();
                ui.close_menu();
            }
            let redo_label = match app.editor.redo_description() {
                Some(d) => format!("  Redo {}    Ctrl+Y", d),
                None => "  Redo    Ctrl+Y".to_string(),
            };
            if ui.add_enabled(app.editor.can_redo(), egui::Button::new(redo_label)).clicked() {
                app.redo();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Add Task...").clicked() {
                app.add_task.parent = app.selected_task;
                app.add_task.open = true;
                ui.close_menu();
            }
            if ui
                .add_enabled(app.selected_task.is_some(), egui::Button::new("  Delete Task"))
                .clicked()
            {
                if let Some(id) = app.selected_task {
                    app.delete_task(id);
                }
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        // Right-aligned project name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let modified = if app.is_dirty() || app.file_path.is_none() {
                " (unsaved)"
            } else {
                ""
            };
            ui.label(
                RichText::new(format!("{}{}", app.editor.project().name, modified))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
