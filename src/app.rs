use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use chrono::{Duration, NaiveDate};
use gantt_engine::io::{export_csv, import_csv, load_project, save_project};
use gantt_engine::{Command, Editor, EngineConfig, GraphBuilder, Project, Result, TaskDraft, TaskId};
use tracing::warn;

use crate::ui;

/// State of the "Add Task" dialog.
pub struct AddTaskDialog {
    pub open: bool,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub milestone: bool,
    pub parent: Option<TaskId>,
}

impl AddTaskDialog {
    fn new() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            open: false,
            name: String::new(),
            start: today,
            end: today + Duration::days(7),
            milestone: false,
            parent: None,
        }
    }
}

/// Main application state.
pub struct GanttApp {
    pub editor: Editor,
    pub config: EngineConfig,
    pub file_path: Option<PathBuf>,
    pub selected_task: Option<TaskId>,
    pub add_task: AddTaskDialog,
    pub show_about: bool,
    pub status_message: String,
    /// Set by the editor observer whenever the graph changes.
    dirty: Rc<Cell<bool>>,
}

impl GanttApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: EngineConfig) -> Self {
        ui::theme::apply_theme(&cc.egui_ctx);

        let project = Self::sample_project().unwrap_or_else(|e| {
            warn!(error = %e, "could not build the sample project");
            Project::default()
        });
        let mut editor = Editor::with_config(project, &config);

        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        editor.subscribe(move |_| flag.set(true));

        Self {
            editor,
            config,
            file_path: None,
            selected_task: None,
            add_task: AddTaskDialog::new(),
            show_about: false,
            status_message: "Ready".to_string(),
            dirty,
        }
    }

    /// Generate a sample project for demonstration.
    fn sample_project() -> Result<Project> {
        let today = chrono::Local::now().date_naive();
        let day = |offset: i64| today + Duration::days(offset);
        let mut b = GraphBuilder::new();

        // ── Phase 1: Planning ───────────────────────────────────────
        let planning = b.add(TaskDraft::new("Planning", day(-5), 13), None)?;
        let kickoff = b.add(
            TaskDraft::new("Project Kickoff", day(-5), 3).with_progress(100),
            Some(planning),
        )?;
        let requirements = b.add(
            TaskDraft::new("Requirements Gathering", day(-2), 7)
                .with_progress(60)
                .with_dependencies([kickoff]),
            Some(planning),
        )?;
        let planned = b.add(
            TaskDraft::milestone("Planning Complete", day(8)).with_dependencies([requirements]),
            Some(planning),
        )?;

        // ── Phase 2: Execution ──────────────────────────────────────
        let execution = b.add(TaskDraft::new("Execution", day(8), 24), None)?;
        let design = b.add(
            TaskDraft::new("UI Design", day(8), 12).with_dependencies([planned]),
            Some(execution),
        )?;
        let backend = b.add(
            TaskDraft::new("Backend Development", day(8), 20).with_dependencies([planned]),
            Some(execution),
        )?;
        let testing = b.add(
            TaskDraft::new("Testing & QA", day(24), 8).with_dependencies([design, backend]),
            Some(execution),
        )?;
        b.add(TaskDraft::milestone("Launch", day(33)).with_dependencies([testing]), None)?;

        Ok(Project::with_graph("Sample Project", b.build()?))
    }

    /// True if there are changes since the last save or load.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    // --- File operations ---

    fn replace(&mut self, project: Project, file_path: Option<PathBuf>) {
        self.editor.replace_project(project);
        self.file_path = file_path;
        self.selected_task = None;
        self.dirty.set(false);
    }

    pub fn new_project(&mut self) {
        self.replace(Project::default(), None);
        self.status_message = "New project created".to_string();
    }

    pub fn open_project(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Project", &["gantt.json", "json"])
            .pick_file()
        {
            match load_project(&path) {
                Ok(project) => {
                    self.replace(project, Some(path));
                    self.status_message = "Project loaded".to_string();
                }
                Err(e) => {
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_project(&mut self) {
        match self.file_path.clone() {
            Some(path) => self.write_project(path),
            None => self.save_project_as(),
        }
    }

    pub fn save_project_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Project", &["gantt.json", "json"])
            .set_file_name(format!("{}.gantt.json", self.editor.project().name))
            .save_file()
        {
            self.write_project(path);
        }
    }

    fn write_project(&mut self, path: PathBuf) {
        match save_project(self.editor.project(), &path) {
            Ok(()) => {
                self.file_path = Some(path);
                self.dirty.set(false);
                self.status_message = "Project saved".to_string();
            }
            Err(e) => self.status_message = format!("Error saving: {}", e),
        }
    }

    pub fn import_csv(&mut self) {
        // Guard: if current project has tasks, confirm before replacing
        if !self.editor.graph().is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import CSV")
                .set_description("This will replace the current project. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match import_csv(&path) {
                Ok(report) => {
                    let name = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("Imported Project")
                        .to_string();
                    self.replace(Project::with_graph(name, report.graph), None);
                    self.status_message = if report.skipped > 0 {
                        format!(
                            "Imported {} tasks ({} rows skipped)",
                            report.imported, report.skipped
                        )
                    } else {
                        format!("Imported {} tasks", report.imported)
                    };
                }
                Err(e) => {
                    self.status_message = format!("CSV import failed: {}", e);
                }
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.editor.graph().is_empty() {
            self.status_message = "Nothing to export, the project has no tasks".to_string();
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(format!("{}.csv", self.editor.project().name))
            .save_file()
        {
            match export_csv(self.editor.graph(), &path) {
                Ok(count) => self.status_message = format!("Exported {} tasks to CSV", count),
                Err(e) => self.status_message = format!("CSV export failed: {}", e),
            }
        }
    }

    // --- Task operations ---

    /// Run a command through the editor and report the outcome.
    pub fn run(&mut self, command: Result<Command>) -> bool {
        let outcome = command.and_then(|command| {
            let description = command.describe();
            self.editor.execute(command).map(|()| description)
        });
        match outcome {
            Ok(description) => {
                self.status_message = description;
                if self.selected_task.is_some_and(|id| !self.editor.graph().contains(id)) {
                    self.selected_task = None;
                }
                true
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
                false
            }
        }
    }

    pub fn undo(&mut self) {
        self.status_message = match self.editor.undo_description() {
            Some(description) if self.editor.undo() => format!("Undo: {}", description),
            _ => "Nothing to undo".to_string(),
        };
        self.drop_stale_selection();
    }

    pub fn redo(&mut self) {
        self.status_message = match self.editor.redo_description() {
            Some(description) if self.editor.redo() => format!("Redo: {}", description),
            _ => "Nothing to redo".to_string(),
        };
        self.drop_stale_selection();
    }

    fn drop_stale_selection(&mut self) {
        if self.selected_task.is_some_and(|id| !self.editor.graph().contains(id)) {
            self.selected_task = None;
        }
    }

    pub fn create_task_from_dialog(&mut self) {
        let id = match self.editor.graph().allocate_id() {
            Ok(id) => id,
            Err(e) => {
                self.status_message = format!("Error: {}", e);
                return;
            }
        };
        let dialog = &self.add_task;
        let name = if dialog.name.trim().is_empty() {
            "New Task".to_string()
        } else {
            dialog.name.trim().to_string()
        };
        let draft = if dialog.milestone {
            TaskDraft::milestone(name, dialog.start)
        } else {
            let days = (dialog.end - dialog.start).num_days();
            TaskDraft::new(name, dialog.start, if days > 0 { days } else { 7 })
        };
        let parent = dialog.parent;

        if self.run(Command::add(draft.with_id(id), parent)) {
            self.selected_task = Some(id);
            self.add_task = AddTaskDialog::new();
        }
    }

    pub fn delete_task(&mut self, id: TaskId) {
        self.run(Ok(Command::delete(id)));
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle keyboard shortcuts outside closures to avoid borrow issues
        let should_save = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S));
        let should_undo =
            ctx.input(|i| i.modifiers.ctrl && !i.modifiers.shift && i.key_pressed(egui::Key::Z));
        let should_redo = ctx.input(|i| {
            i.modifiers.ctrl
                && (i.key_pressed(egui::Key::Y) || (i.modifiers.shift && i.key_pressed(egui::Key::Z)))
        });
        if should_save {
            self.save_project();
        }
        if should_undo {
            self.undo();
        }
        if should_redo {
            self.redo();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("Tasks: {}", self.editor.graph().len()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        let rows = self.editor.rows();

        // Left panel: task editor + task table
        let mut table_action = ui::task_table::TaskTableAction::None;
        let mut edit_command = None;
        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                if let Some(id) = self.selected_task {
                    edit_command = ui::task_editor::show_task_editor(self.editor.graph(), id, ui);
                    ui.add_space(4.0);
                    ui.separator();
                }
                table_action = ui::task_table::show_task_table(&rows, self.selected_task, ui);
            });

        if let Some(command) = edit_command {
            self.run(command);
        }
        match table_action {
            ui::task_table::TaskTableAction::Select(id) => self.selected_task = Some(id),
            ui::task_table::TaskTableAction::Delete(id) => self.delete_task(id),
            ui::task_table::TaskTableAction::Add => {
                self.add_task.parent = self.selected_task;
                self.add_task.open = true;
            }
            ui::task_table::TaskTableAction::None => {}
        }

        // Central panel: Gantt chart
        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(ui::theme::BG_DARK))
            .show(ctx, |ui| {
                let clicked = ui::gantt_chart::show_gantt_chart(
                    &rows,
                    &self.config.layout,
                    self.selected_task,
                    ui,
                );
                if let Some(selection) = clicked {
                    self.selected_task = selection;
                }
            });

        if self.add_task.open {
            ui::dialogs::show_add_task_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
