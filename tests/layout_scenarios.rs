use chrono::NaiveDate;
use egui::{pos2, vec2};
use gantt_engine::{
    compute_layout, Command, Editor, GraphBuilder, LayoutConfig, Project, TaskDraft, TaskShape,
};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
}

fn flat_config() -> LayoutConfig {
    LayoutConfig {
        header_height: 0.0,
        ..LayoutConfig::default()
    }
}

#[test]
fn milestone_sits_on_its_day_and_row() {
    let mut b = GraphBuilder::new();
    b.add(TaskDraft::new("Span", date(1), 19), None).unwrap();
    for i in 2..=10u32 {
        let draft = if i == 5 {
            TaskDraft::milestone("Review", date(10))
        } else {
            TaskDraft::new(format!("Task {}", i), date(i), 3)
        };
        b.add(draft, None).unwrap();
    }
    let graph = b.build().unwrap();
    let rows = graph.scheduled_rows();

    let layout = compute_layout(&rows, vec2(900.0, 300.0), &flat_config());
    let scale = layout.scale.unwrap();
    assert_eq!(scale.total_days, 20);
    assert_eq!(scale.pixels_per_day, 45.0);
    assert_eq!(scale.row_height, 30.0);

    let milestone = layout.geometry(5).unwrap();
    assert_eq!(milestone.row, 4);
    match milestone.shape {
        TaskShape::Milestone { center, .. } => assert_eq!(center, pos2(405.0, 135.0)),
        other => panic!("expected a diamond, got {:?}", other),
    }
    assert_eq!(layout.task_at(pos2(405.0, 135.0)), Some(5));
}

#[test]
fn dependency_leaves_the_predecessor_end_and_enters_the_successor_start() {
    let mut b = GraphBuilder::new();
    b.add(TaskDraft::new("Design", date(1), 4), None).unwrap();
    b.add(TaskDraft::new("Build", date(6), 4).with_dependencies([1]), None)
        .unwrap();
    let graph = b.build().unwrap();

    let layout = compute_layout(&graph.scheduled_rows(), vec2(200.0, 60.0), &flat_config());
    assert_eq!(layout.scale.unwrap().pixels_per_day, 20.0);
    assert_eq!(layout.dependencies.len(), 1);

    let path = &layout.dependencies[0];
    assert_eq!((path.predecessor, path.successor), (1, 2));
    assert_eq!(
        path.points(),
        vec![
            pos2(80.0, 15.0),
            pos2(85.0, 15.0),
            pos2(85.0, 30.0),
            pos2(95.0, 30.0),
            pos2(95.0, 45.0),
            pos2(100.0, 45.0),
        ]
    );
    assert_eq!(
        path.arrowhead,
        [
            [pos2(95.0, 40.0), pos2(100.0, 45.0)],
            [pos2(95.0, 50.0), pos2(100.0, 45.0)],
        ]
    );
    // Every segment is axis-aligned.
    for [a, b] in &path.segments {
        assert!(a.x == b.x || a.y == b.y);
    }
}

#[test]
fn later_starts_are_further_right_and_wider_viewports_stretch() {
    let mut b = GraphBuilder::new();
    for d in [3, 1, 7, 5] {
        b.add(TaskDraft::new(format!("Day {}", d), date(d), 2), None).unwrap();
    }
    let rows = b.build().unwrap().scheduled_rows();

    let narrow = compute_layout(&rows, vec2(400.0, 200.0), &flat_config());
    let wide = compute_layout(&rows, vec2(800.0, 200.0), &flat_config());

    let left = |layout: &gantt_engine::Layout, id| layout.geometry(id).unwrap().shape.bounds().min.x;
    for (earlier, later) in [(2, 1), (1, 4), (4, 3)] {
        assert!(left(&narrow, earlier) < left(&narrow, later));
    }
    for id in 1..=4 {
        assert!(left(&wide, id) >= left(&narrow, id));
    }
}

#[test]
fn tiny_viewports_fall_back_to_minimum_sizes() {
    let mut b = GraphBuilder::new();
    b.add(TaskDraft::new("Long", date(1), 29), None).unwrap();
    b.add(TaskDraft::new("Short", date(2), 1), None).unwrap();
    let rows = b.build().unwrap().scheduled_rows();

    let config = flat_config();
    let layout = compute_layout(&rows, vec2(10.0, 10.0), &config);
    let scale = layout.scale.unwrap();
    assert_eq!(scale.pixels_per_day, config.min_pixels_per_day);
    assert_eq!(scale.row_height, config.min_row_height);
    assert_eq!(layout.size, vec2(30.0 * config.min_pixels_per_day, 2.0 * config.min_row_height));
}

#[test]
fn editor_layout_follows_undo() {
    let mut b = GraphBuilder::new();
    b.add(TaskDraft::new("Phase", date(1), 1), None).unwrap();
    b.add(TaskDraft::new("Work", date(2), 4), Some(1)).unwrap();
    let mut editor = Editor::new(Project::with_graph("Layout", b.build().unwrap()));
    let viewport = vec2(600.0, 240.0);
    let config = LayoutConfig::default();
    let before = editor.layout(viewport, &config);

    editor
        .execute(Command::add(TaskDraft::new("Late", date(20), 2), Some(1)).unwrap())
        .unwrap();
    let after = editor.layout(viewport, &config);
    assert_eq!(after.tasks.len(), 3);
    assert_ne!(after.scale, before.scale);

    assert!(editor.undo());
    assert_eq!(editor.layout(viewport, &config), before);
}
