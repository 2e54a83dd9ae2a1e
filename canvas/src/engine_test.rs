#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::consts::DEFAULT_PASTE_OFFSET;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn shift_modifier() -> Modifiers {
    Modifiers { shift: true, ..Default::default() }
}

fn ctrl_modifier() -> Modifiers {
    Modifiers { ctrl: true, ..Default::default() }
}

fn key(name: &str) -> Key {
    Key(name.to_owned())
}

fn make_rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Element {
    Element::line(Line {
        tool: Tool::Rectangle,
        geometry: Geometry::Rectangle { start: pt(x0, y0), end: pt(x1, y1) },
        color: [0.0, 0.0, 0.0, 1.0],
        width: 2.0,
    })
}

/// Insert a rectangle directly, bypassing history.
fn add_rect(core: &mut EngineCore, x0: f64, y0: f64, x1: f64, y1: f64) -> ElementId {
    let e = make_rect(x0, y0, x1, y1);
    let id = e.id;
    core.doc.insert(e);
    id
}

/// Place a widget through the engine and return its id.
fn place(core: &mut EngineCore, kind: WidgetKind, literal: &str, at: Point) -> ElementId {
    let actions = core.place_widget(kind, literal, Some(at)).unwrap();
    created_id(&actions)
}

fn created_id(actions: &[Action]) -> ElementId {
    actions
        .iter()
        .find_map(|a| match a {
            Action::ElementCreated(e) => Some(e.id),
            _ => None,
        })
        .unwrap()
}

fn drag(core: &mut EngineCore, from: Point, to: Point) -> Vec<Action> {
    let mut actions = core.on_pointer_down(from, Button::Primary, no_modifiers());
    actions.extend(core.on_pointer_move(to, no_modifiers()));
    actions.extend(core.on_pointer_up(to, Button::Primary, no_modifiers()));
    actions
}

fn click(core: &mut EngineCore, at: Point, modifiers: Modifiers) -> Vec<Action> {
    let mut actions = core.on_pointer_down(at, Button::Primary, modifiers);
    actions.extend(core.on_pointer_up(at, Button::Primary, modifiers));
    actions
}

fn rect_start(core: &EngineCore, id: &ElementId) -> Point {
    match &core.element(id).unwrap().as_line().unwrap().geometry {
        Geometry::Rectangle { start, .. } => *start,
        other => panic!("expected rectangle, got {other:?}"),
    }
}

fn widget_origin(core: &EngineCore, id: &ElementId) -> Point {
    core.element(id).unwrap().as_widget().unwrap().origin
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn has_element_created(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::ElementCreated(_)))
}

fn has_element_deleted(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::ElementDeleted { .. }))
}

fn has_selection_changed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::SelectionChanged(_)))
}

// =============================================================
// EngineCore: construction and defaults
// =============================================================

#[test]
fn core_new_is_empty_and_idle() {
    let core = EngineCore::new();
    assert!(core.elements().is_empty());
    assert!(core.selection().is_empty());
    assert!(matches!(core.input, InputState::Idle));
    assert_eq!(core.ui.tool, Tool::Pen);
    assert!(!core.can_undo());
    assert!(!core.can_redo());
}

#[test]
fn core_with_config_uses_history_limit() {
    let config = BoardConfig { history_limit: 7, ..BoardConfig::default() };
    let core = EngineCore::with_config(config);
    assert_eq!(core.history.limit(), 7);
    assert_eq!(core.config, config);
}

// =============================================================
// Style setters
// =============================================================

#[test]
fn set_stroke_width_ignores_invalid() {
    let mut core = EngineCore::new();
    core.set_stroke_width(5.0);
    core.set_stroke_width(0.0);
    core.set_stroke_width(-1.0);
    core.set_stroke_width(f64::NAN);
    assert_eq!(core.ui.stroke_width, 5.0);
}

#[test]
fn set_font_size_ignores_invalid() {
    let mut core = EngineCore::new();
    core.set_font_size(24.0);
    core.set_font_size(f64::INFINITY);
    assert_eq!(core.ui.font_size, 24.0);
}

#[test]
fn set_tool_abandons_drawing() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(10.0, 10.0), no_modifiers());
    core.set_tool(Tool::Select);
    assert!(matches!(core.input, InputState::Idle));
    assert!(core.elements().is_empty());
}

// =============================================================
// Drawing: pen / eraser
// =============================================================

#[test]
fn pen_stroke_commits_path() {
    let mut core = EngineCore::new();
    core.set_color([1.0, 0.0, 0.0, 1.0]);
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(20.0, 20.0), no_modifiers());
    core.on_pointer_move(pt(30.0, 25.0), no_modifiers());
    let actions = core.on_pointer_up(pt(30.0, 25.0), Button::Primary, no_modifiers());

    assert!(has_element_created(&actions));
    assert!(has_action(&actions, |a| matches!(a, Action::HistoryChanged { can_undo: true, can_redo: false })));
    assert!(matches!(core.input, InputState::Idle));

    let line = core.elements()[0].as_line().unwrap();
    assert_eq!(line.tool, Tool::Pen);
    assert_eq!(line.color, [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(
        line.geometry,
        Geometry::Path { points: vec![pt(10.0, 10.0), pt(20.0, 20.0), pt(30.0, 25.0)] }
    );
}

#[test]
fn pen_click_without_motion_is_discarded() {
    let mut core = EngineCore::new();
    let actions = click(&mut core, pt(10.0, 10.0), no_modifiers());
    assert!(!has_element_created(&actions));
    assert!(core.elements().is_empty());
    assert!(!core.can_undo());
}

#[test]
fn pen_preview_renders_while_drawing() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, no_modifiers());
    let actions = core.on_pointer_move(pt(5.0, 5.0), no_modifiers());
    assert!(has_render_needed(&actions));
    assert!(matches!(core.input, InputState::Drawing { .. }));
    assert!(core.elements().is_empty());
}

#[test]
fn eraser_strokes_are_stored_but_not_selectable() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Eraser);
    drag(&mut core, pt(0.0, 0.0), pt(50.0, 50.0));
    assert_eq!(core.elements().len(), 1);
    assert_eq!(core.elements()[0].as_line().unwrap().tool, Tool::Eraser);

    core.select_all();
    assert!(core.selection().is_empty());
}

#[test]
fn pen_draws_over_widgets() {
    let mut core = EngineCore::new();
    place(&mut core, WidgetKind::Array, "[1,2,3]", pt(100.0, 100.0));
    drag(&mut core, pt(110.0, 110.0), pt(200.0, 120.0));
    assert_eq!(core.elements().len(), 2);
    assert!(core.elements()[1].as_line().is_some());
}

#[test]
fn secondary_button_is_ignored() {
    let mut core = EngineCore::new();
    let actions = core.on_pointer_down(pt(0.0, 0.0), Button::Secondary, no_modifiers());
    assert!(actions.is_empty());
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn move_while_idle_does_nothing() {
    let mut core = EngineCore::new();
    assert!(core.on_pointer_move(pt(5.0, 5.0), no_modifiers()).is_empty());
    assert!(core.on_pointer_up(pt(5.0, 5.0), Button::Primary, no_modifiers()).is_empty());
}

// =============================================================
// Drawing: shapes and text
// =============================================================

#[test]
fn rectangle_tool_commits_corners() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rectangle);
    core.set_stroke_width(4.0);
    drag(&mut core, pt(0.0, 0.0), pt(40.0, 30.0));

    let line = core.elements()[0].as_line().unwrap();
    assert_eq!(line.tool, Tool::Rectangle);
    assert_eq!(line.width, 4.0);
    assert_eq!(line.geometry, Geometry::Rectangle { start: pt(0.0, 0.0), end: pt(40.0, 30.0) });
}

#[test]
fn circle_and_arrow_tools_commit_their_geometry() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Circle);
    drag(&mut core, pt(0.0, 0.0), pt(20.0, 20.0));
    core.set_tool(Tool::Arrow);
    drag(&mut core, pt(50.0, 50.0), pt(90.0, 50.0));

    assert!(matches!(core.elements()[0].as_line().unwrap().geometry, Geometry::Circle { .. }));
    assert_eq!(
        core.elements()[1].as_line().unwrap().geometry,
        Geometry::Arrow { start: pt(50.0, 50.0), end: pt(90.0, 50.0) }
    );
}

#[test]
fn tiny_shape_is_discarded() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rectangle);
    drag(&mut core, pt(0.0, 0.0), pt(1.0, 1.0));
    assert!(core.elements().is_empty());
    assert!(!core.can_undo());
}

#[test]
fn thin_shape_in_one_axis_is_kept() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Arrow);
    drag(&mut core, pt(0.0, 0.0), pt(100.0, 0.0));
    assert_eq!(core.elements().len(), 1);
}

#[test]
fn text_tool_requests_edit() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    let actions = core.on_pointer_down(pt(12.0, 34.0), Button::Primary, no_modifiers());
    assert_eq!(actions, vec![Action::EditTextRequested { position: pt(12.0, 34.0) }]);
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn add_text_commits_label_with_font_size() {
    let mut core = EngineCore::new();
    core.set_font_size(20.0);
    let actions = core.add_text(pt(5.0, 5.0), "hello");
    assert!(has_element_created(&actions));

    let line = core.elements()[0].as_line().unwrap();
    assert_eq!(line.tool, Tool::Text);
    assert_eq!(line.geometry, Geometry::Text { position: pt(5.0, 5.0), content: "hello".into(), size: 20.0 });
}

#[test]
fn add_text_ignores_blank() {
    let mut core = EngineCore::new();
    assert!(core.add_text(pt(0.0, 0.0), "   ").is_empty());
    assert!(core.elements().is_empty());
}

// =============================================================
// Select tool: click selection
// =============================================================

#[test]
fn select_click_selects_and_starts_drag() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let id = add_rect(&mut core, 0.0, 0.0, 100.0, 80.0);

    let actions = core.on_pointer_down(pt(50.0, 40.0), Button::Primary, no_modifiers());
    assert_eq!(core.selection(), &[id]);
    assert!(matches!(core.input, InputState::DraggingSelection { moved: false, .. }));
    assert!(has_selection_changed(&actions));
}

#[test]
fn select_click_replaces_selection() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let a = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    let b = add_rect(&mut core, 100.0, 0.0, 110.0, 10.0);

    click(&mut core, pt(5.0, 5.0), no_modifiers());
    click(&mut core, pt(105.0, 5.0), no_modifiers());
    assert_eq!(core.selection(), &[b]);
    assert!(!core.ui.is_selected(&a));
}

#[test]
fn select_shift_click_adds() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let a = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    let b = add_rect(&mut core, 100.0, 0.0, 110.0, 10.0);

    click(&mut core, pt(5.0, 5.0), no_modifiers());
    click(&mut core, pt(105.0, 5.0), shift_modifier());
    assert_eq!(core.selection(), &[a, b]);
}

#[test]
fn select_click_on_selected_keeps_group() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let a = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    let b = add_rect(&mut core, 100.0, 0.0, 110.0, 10.0);
    core.select_all();

    let actions = core.on_pointer_down(pt(5.0, 5.0), Button::Primary, no_modifiers());
    assert!(!has_selection_changed(&actions));
    assert_eq!(core.selection(), &[a, b]);
}

#[test]
fn select_click_empty_clears_selection() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    click(&mut core, pt(5.0, 5.0), no_modifiers());
    assert_eq!(core.selection().len(), 1);

    let actions = click(&mut core, pt(500.0, 500.0), no_modifiers());
    assert!(core.selection().is_empty());
    assert!(has_action(&actions, |a| matches!(a, Action::SelectionChanged(ids) if ids.is_empty())));
    assert!(core.ui.marquee.is_none());
}

#[test]
fn select_shift_click_empty_keeps_selection() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let id = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    click(&mut core, pt(5.0, 5.0), no_modifiers());

    click(&mut core, pt(500.0, 500.0), shift_modifier());
    assert_eq!(core.selection(), &[id]);
}

#[test]
fn select_click_does_not_touch_history() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    click(&mut core, pt(5.0, 5.0), no_modifiers());
    assert!(!core.can_undo());
}

// =============================================================
// Select tool: marquee
// =============================================================

#[test]
fn marquee_selects_intersecting() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    let b = add_rect(&mut core, 200.0, 200.0, 210.0, 210.0);

    core.on_pointer_down(pt(300.0, 300.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(150.0, 150.0), no_modifiers());
    assert_eq!(core.ui.marquee, Some(Bounds::from_corners(pt(150.0, 150.0), pt(300.0, 300.0))));

    let actions = core.on_pointer_up(pt(150.0, 150.0), Button::Primary, no_modifiers());
    assert_eq!(core.selection(), &[b]);
    assert!(has_selection_changed(&actions));
    assert!(core.ui.marquee.is_none());
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn marquee_replaces_selection_without_shift() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    let b = add_rect(&mut core, 200.0, 200.0, 210.0, 210.0);
    click(&mut core, pt(5.0, 5.0), no_modifiers());

    drag(&mut core, pt(300.0, 300.0), pt(150.0, 150.0));
    assert_eq!(core.selection(), &[b]);
}

#[test]
fn marquee_with_shift_unions() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let a = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    let b = add_rect(&mut core, 200.0, 200.0, 210.0, 210.0);
    click(&mut core, pt(5.0, 5.0), no_modifiers());

    core.on_pointer_down(pt(300.0, 300.0), Button::Primary, shift_modifier());
    core.on_pointer_move(pt(150.0, 150.0), shift_modifier());
    core.on_pointer_up(pt(150.0, 150.0), Button::Primary, shift_modifier());
    assert_eq!(core.selection(), &[a, b]);
}

#[test]
fn marquee_over_nothing_clears() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    click(&mut core, pt(5.0, 5.0), no_modifiers());

    drag(&mut core, pt(500.0, 500.0), pt(600.0, 600.0));
    assert!(core.selection().is_empty());
}

// =============================================================
// Select tool: dragging the selection
// =============================================================

#[test]
fn drag_moves_selection_as_one_undo_step() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let id = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);

    core.on_pointer_down(pt(5.0, 5.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(15.0, 5.0), no_modifiers());
    core.on_pointer_move(pt(25.0, 5.0), no_modifiers());
    let actions = core.on_pointer_up(pt(25.0, 5.0), Button::Primary, no_modifiers());

    assert_eq!(rect_start(&core, &id), pt(20.0, 0.0));
    assert_eq!(core.history.undo_count(), 1);
    assert!(has_action(&actions, |a| matches!(a, Action::HistoryChanged { can_undo: true, .. })));

    core.undo();
    assert_eq!(rect_start(&core, &id), pt(0.0, 0.0));
}

#[test]
fn drag_moves_every_selected_element() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let a = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    let b = add_rect(&mut core, 100.0, 0.0, 110.0, 10.0);
    core.select_all();

    drag(&mut core, pt(5.0, 5.0), pt(5.0, 55.0));
    assert_eq!(rect_start(&core, &a), pt(0.0, 50.0));
    assert_eq!(rect_start(&core, &b), pt(100.0, 50.0));
}

#[test]
fn drag_within_slop_does_not_move() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let id = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);

    drag(&mut core, pt(5.0, 5.0), pt(6.0, 6.0));
    assert_eq!(rect_start(&core, &id), pt(0.0, 0.0));
    assert!(!core.can_undo());
}

#[test]
fn drag_emits_updates_for_moved_elements() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let id = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);

    core.on_pointer_down(pt(5.0, 5.0), Button::Primary, no_modifiers());
    let actions = core.on_pointer_move(pt(50.0, 5.0), no_modifiers());
    assert!(actions.contains(&Action::ElementUpdated { id }));
    assert!(has_render_needed(&actions));
}

#[test]
fn drag_on_widget_in_group_moves_whole_selection() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let rect = add_rect(&mut core, 400.0, 400.0, 410.0, 410.0);
    let widget = place(&mut core, WidgetKind::Array, "[1,2]", pt(100.0, 100.0));
    core.select_all();

    core.on_pointer_down(pt(110.0, 110.0), Button::Primary, no_modifiers());
    assert!(matches!(core.input, InputState::DraggingSelection { .. }));
    core.on_pointer_move(pt(160.0, 110.0), no_modifiers());
    core.on_pointer_up(pt(160.0, 110.0), Button::Primary, no_modifiers());

    assert_eq!(widget_origin(&core, &widget), pt(150.0, 100.0));
    assert_eq!(rect_start(&core, &rect), pt(450.0, 400.0));
    assert_eq!(core.selection().len(), 2);
}

#[test]
fn drag_on_lone_selected_widget_still_drags_widget() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let widget = place(&mut core, WidgetKind::Array, "[1,2]", pt(100.0, 100.0));
    core.select_all();

    core.on_pointer_down(pt(110.0, 110.0), Button::Primary, no_modifiers());
    assert!(matches!(core.input, InputState::DraggingWidget { id, .. } if id == widget));
}

// =============================================================
// Widgets: placement
// =============================================================

#[test]
fn place_widget_at_default_origin() {
    let mut core = EngineCore::new();
    let actions = core.place_widget(WidgetKind::Deque, "[1,2]", None).unwrap();
    let id = created_id(&actions);
    assert_eq!(widget_origin(&core, &id), DEFAULT_WIDGET_ORIGIN);
    assert!(core.can_undo());
}

#[test]
fn place_widget_parses_grid() {
    let mut core = EngineCore::new();
    let id = place(&mut core, WidgetKind::Grid, "[[1,2],[3]]", pt(0.0, 0.0));
    let widget = core.element(&id).unwrap().as_widget().unwrap();
    assert_eq!(
        widget.data,
        WidgetData::Grid(vec![vec!["1".into(), "2".into()], vec!["3".into(), "0".into()]])
    );
}

#[test]
fn place_widget_invalid_literal_leaves_board_untouched() {
    let mut core = EngineCore::new();
    let err = core.place_widget(WidgetKind::Array, "[1,,2]", None).unwrap_err();
    assert!(matches!(err, LiteralError::EmptyElement { .. }));
    assert!(core.elements().is_empty());
    assert!(!core.can_undo());
}

// =============================================================
// Widgets: dragging and the delete zone
// =============================================================

#[test]
fn select_tool_drags_widget() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let id = place(&mut core, WidgetKind::Array, "[1,2,3]", pt(100.0, 100.0));

    let actions = core.on_pointer_down(pt(110.0, 110.0), Button::Primary, no_modifiers());
    assert!(matches!(core.input, InputState::DraggingWidget { id: dragged, .. } if dragged == id));
    assert_eq!(core.selection(), &[id]);
    assert!(has_selection_changed(&actions));

    core.on_pointer_move(pt(160.0, 130.0), no_modifiers());
    core.on_pointer_up(pt(160.0, 130.0), Button::Primary, no_modifiers());
    assert_eq!(widget_origin(&core, &id), pt(150.0, 120.0));
}

#[test]
fn shape_tool_drags_widget_instead_of_drawing() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rectangle);
    let id = place(&mut core, WidgetKind::Array, "[1,2,3]", pt(100.0, 100.0));

    drag(&mut core, pt(110.0, 110.0), pt(130.0, 110.0));
    assert_eq!(core.elements().len(), 1);
    assert_eq!(widget_origin(&core, &id), pt(120.0, 100.0));
}

#[test]
fn text_tool_on_widget_drags_instead_of_prompting() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    place(&mut core, WidgetKind::Array, "[1]", pt(100.0, 100.0));

    let actions = core.on_pointer_down(pt(110.0, 110.0), Button::Primary, no_modifiers());
    assert!(!has_action(&actions, |a| matches!(a, Action::EditTextRequested { .. })));
    assert!(matches!(core.input, InputState::DraggingWidget { .. }));
}

#[test]
fn widget_dropped_on_delete_zone_is_removed() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let id = place(&mut core, WidgetKind::Array, "[1,2,3]", pt(100.0, 100.0));
    let undo_before = core.history.undo_count();

    core.on_pointer_down(pt(110.0, 110.0), Button::Primary, no_modifiers());
    let actions = core.on_pointer_move(pt(980.0, 720.0), no_modifiers());
    assert!(actions.contains(&Action::DeleteZoneArmed(true)));
    assert!(core.ui.delete_zone_armed);

    let actions = core.on_pointer_up(pt(980.0, 720.0), Button::Primary, no_modifiers());
    assert!(actions.contains(&Action::ElementDeleted { id }));
    assert!(actions.contains(&Action::DeleteZoneArmed(false)));
    assert!(core.element(&id).is_none());
    assert!(core.selection().is_empty());
    assert!(!core.ui.delete_zone_armed);
    assert_eq!(core.history.undo_count(), undo_before + 1);
}

#[test]
fn undo_restores_widget_dropped_on_delete_zone() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let id = place(&mut core, WidgetKind::Array, "[1,2,3]", pt(100.0, 100.0));

    drag(&mut core, pt(110.0, 110.0), pt(980.0, 720.0));
    assert!(core.element(&id).is_none());

    core.undo();
    assert_eq!(widget_origin(&core, &id), pt(100.0, 100.0));
}

#[test]
fn widget_dragged_through_zone_and_out_survives() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let id = place(&mut core, WidgetKind::Array, "[1]", pt(100.0, 100.0));

    core.on_pointer_down(pt(110.0, 110.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(980.0, 720.0), no_modifiers());
    let actions = core.on_pointer_move(pt(500.0, 400.0), no_modifiers());
    assert!(actions.contains(&Action::DeleteZoneArmed(false)));

    let actions = core.on_pointer_up(pt(500.0, 400.0), Button::Primary, no_modifiers());
    assert!(!has_element_deleted(&actions));
    assert!(core.element(&id).is_some());
}

#[test]
fn delete_zone_follows_viewport() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    core.set_viewport(400.0, 300.0);
    let id = place(&mut core, WidgetKind::Array, "[1]", pt(100.0, 100.0));

    drag(&mut core, pt(110.0, 110.0), pt(350.0, 250.0));
    assert!(core.element(&id).is_none());
}

#[test]
fn set_viewport_ignores_invalid_sizes() {
    let mut core = EngineCore::new();
    for (w, h) in [(f64::NAN, 600.0), (800.0, f64::INFINITY), (0.0, 600.0), (-5.0, 600.0), (50.0, 50.0)] {
        core.set_viewport(w, h);
        assert_eq!(core.config.viewport_width, 1024.0, "width after {w}x{h}");
        assert_eq!(core.config.viewport_height, 768.0, "height after {w}x{h}");
    }

    core.set_viewport(400.0, 300.0);
    assert_eq!(core.config.viewport_width, 400.0);
    assert_eq!(core.config.viewport_height, 300.0);
}

#[test]
fn zero_sized_delete_zone_never_deletes() {
    let config = BoardConfig { delete_zone_size: 0.0, ..BoardConfig::default() };
    let mut core = EngineCore::with_config(config);
    core.set_tool(Tool::Select);
    let id = place(&mut core, WidgetKind::Array, "[1]", pt(100.0, 100.0));

    drag(&mut core, pt(110.0, 110.0), pt(1024.0, 768.0));
    assert!(core.element(&id).is_some());
}

#[test]
fn lines_dragged_to_zone_are_not_deleted() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let id = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);

    drag(&mut core, pt(5.0, 5.0), pt(980.0, 720.0));
    assert!(core.element(&id).is_some());
}

#[test]
fn delete_key_during_widget_drag_ends_the_drag() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let id = place(&mut core, WidgetKind::Array, "[1]", pt(100.0, 100.0));

    core.on_pointer_down(pt(110.0, 110.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(200.0, 200.0), no_modifiers());
    let actions = core.on_key_down(&key("Delete"), no_modifiers());
    assert!(actions.contains(&Action::ElementDeleted { id }));
    assert!(matches!(core.input, InputState::Idle));

    let mut actions = core.on_pointer_move(pt(1000.0, 750.0), no_modifiers());
    actions.extend(core.on_pointer_up(pt(1000.0, 750.0), Button::Primary, no_modifiers()));
    assert!(!has_action(&actions, |a| matches!(a, Action::ElementUpdated { .. })));
    assert!(!has_element_deleted(&actions));
    assert!(!core.ui.delete_zone_armed);
    // place, drag, delete
    assert_eq!(core.history.undo_count(), 3);
}

#[test]
fn widget_removed_mid_drag_is_not_deleted_again() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let id = place(&mut core, WidgetKind::Array, "[1]", pt(100.0, 100.0));

    core.on_pointer_down(pt(110.0, 110.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(200.0, 200.0), no_modifiers());
    core.doc.remove(&id).unwrap();

    let mut actions = core.on_pointer_move(pt(980.0, 720.0), no_modifiers());
    assert!(!actions.contains(&Action::ElementUpdated { id }));
    assert!(!actions.contains(&Action::DeleteZoneArmed(true)));
    actions.extend(core.on_pointer_up(pt(980.0, 720.0), Button::Primary, no_modifiers()));
    assert!(!has_element_deleted(&actions));
    assert!(matches!(core.input, InputState::Idle));
}

// =============================================================
// Widgets: edits
// =============================================================

#[test]
fn edit_widget_push_and_pop() {
    let mut core = EngineCore::new();
    let id = place(&mut core, WidgetKind::Array, "[1,2]", pt(0.0, 0.0));

    let (removed, actions) = core.edit_widget(&id, WidgetEdit::PushBack { value: "3".into() }).unwrap();
    assert_eq!(removed, None);
    assert!(actions.contains(&Action::ElementUpdated { id }));

    let (removed, _) = core.edit_widget(&id, WidgetEdit::PopBack).unwrap();
    assert_eq!(removed.as_deref(), Some("3"));
    assert_eq!(core.history.undo_count(), 3);
}

#[test]
fn edit_widget_is_undoable() {
    let mut core = EngineCore::new();
    let id = place(&mut core, WidgetKind::Deque, "[1,2]", pt(0.0, 0.0));
    core.edit_widget(&id, WidgetEdit::PushFront { value: "0".into() }).unwrap();

    core.undo();
    let widget = core.element(&id).unwrap().as_widget().unwrap();
    assert_eq!(widget.data.cell_count(), 2);
}

#[test]
fn edit_widget_errors_leave_history_alone() {
    let mut core = EngineCore::new();
    let grid = place(&mut core, WidgetKind::Grid, "[[1]]", pt(0.0, 0.0));
    let rect = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    let undo_before = core.history.undo_count();

    assert_eq!(core.edit_widget(&rect, WidgetEdit::PopBack).unwrap_err(), EditError::NotAWidget(rect));

    let missing = Uuid::new_v4();
    assert_eq!(core.edit_widget(&missing, WidgetEdit::PopBack).unwrap_err(), EditError::NotFound(missing));

    let err = core.edit_widget(&grid, WidgetEdit::PushFront { value: "1".into() }).unwrap_err();
    assert!(matches!(err, EditError::Widget(WidgetError::Unsupported { .. })));

    let err = core
        .edit_widget(&grid, WidgetEdit::SetCell { row: 0, col: 0, value: "abc".into() })
        .unwrap_err();
    assert!(matches!(err, EditError::Widget(WidgetError::Value(_))));

    assert_eq!(core.history.undo_count(), undo_before);
}

// =============================================================
// History
// =============================================================

#[test]
fn undo_redo_roundtrip() {
    let mut core = EngineCore::new();
    drag(&mut core, pt(0.0, 0.0), pt(10.0, 10.0));
    assert_eq!(core.elements().len(), 1);

    let actions = core.undo();
    assert!(core.elements().is_empty());
    assert!(actions.contains(&Action::HistoryChanged { can_undo: false, can_redo: true }));

    core.redo();
    assert_eq!(core.elements().len(), 1);
    assert!(!core.can_redo());
}

#[test]
fn undo_with_empty_history_is_noop() {
    let mut core = EngineCore::new();
    assert!(core.undo().is_empty());
    assert!(core.redo().is_empty());
}

#[test]
fn new_action_clears_redo() {
    let mut core = EngineCore::new();
    drag(&mut core, pt(0.0, 0.0), pt(10.0, 10.0));
    core.undo();
    assert!(core.can_redo());

    drag(&mut core, pt(20.0, 20.0), pt(30.0, 30.0));
    assert!(!core.can_redo());
}

#[test]
fn undo_prunes_selection() {
    let mut core = EngineCore::new();
    drag(&mut core, pt(0.0, 0.0), pt(10.0, 10.0));
    core.select_all();
    assert_eq!(core.selection().len(), 1);

    let actions = core.undo();
    assert!(core.selection().is_empty());
    assert!(has_selection_changed(&actions));
}

#[test]
fn history_limit_zero_disables_undo() {
    let config = BoardConfig { history_limit: 0, ..BoardConfig::default() };
    let mut core = EngineCore::with_config(config);
    drag(&mut core, pt(0.0, 0.0), pt(10.0, 10.0));
    assert_eq!(core.elements().len(), 1);
    assert!(!core.can_undo());
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn delete_key_removes_selection() {
    let mut core = EngineCore::new();
    let a = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    let b = add_rect(&mut core, 50.0, 0.0, 60.0, 10.0);
    core.select_all();

    let actions = core.on_key_down(&key("Delete"), no_modifiers());
    assert!(actions.contains(&Action::ElementDeleted { id: a }));
    assert!(actions.contains(&Action::ElementDeleted { id: b }));
    assert!(core.elements().is_empty());
    assert!(core.selection().is_empty());

    core.undo();
    assert_eq!(core.elements().len(), 2);
}

#[test]
fn backspace_with_nothing_selected_is_noop() {
    let mut core = EngineCore::new();
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    assert!(core.on_key_down(&key("Backspace"), no_modifiers()).is_empty());
    assert!(!core.can_undo());
}

#[test]
fn escape_discards_preview_and_clears_selection() {
    let mut core = EngineCore::new();
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    core.select_all();

    core.on_pointer_down(pt(100.0, 100.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(150.0, 150.0), no_modifiers());
    core.on_key_down(&key("Escape"), no_modifiers());

    assert!(matches!(core.input, InputState::Idle));
    assert!(core.selection().is_empty());
    assert_eq!(core.elements().len(), 1);
}

#[test]
fn escape_disarms_delete_zone() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    let id = place(&mut core, WidgetKind::Array, "[1]", pt(100.0, 100.0));
    core.on_pointer_down(pt(110.0, 110.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(980.0, 720.0), no_modifiers());

    let actions = core.on_key_down(&key("Escape"), no_modifiers());
    assert!(actions.contains(&Action::DeleteZoneArmed(false)));
    assert!(core.element(&id).is_some());
}

#[test]
fn escape_after_moved_drag_reports_history() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    core.on_pointer_down(pt(5.0, 5.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(50.0, 5.0), no_modifiers());

    let actions = core.on_key_down(&key("Escape"), no_modifiers());
    assert!(actions.contains(&Action::HistoryChanged { can_undo: true, can_redo: false }));
}

#[test]
fn escape_before_drag_moves_reports_no_history() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Select);
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    core.on_pointer_down(pt(5.0, 5.0), Button::Primary, no_modifiers());

    let actions = core.on_key_down(&key("Escape"), no_modifiers());
    assert!(!has_action(&actions, |a| matches!(a, Action::HistoryChanged { .. })));
}

#[test]
fn ctrl_z_and_redo_shortcuts() {
    let mut core = EngineCore::new();
    drag(&mut core, pt(0.0, 0.0), pt(10.0, 10.0));

    core.on_key_down(&key("z"), ctrl_modifier());
    assert!(core.elements().is_empty());

    let redo = Modifiers { ctrl: true, shift: true, ..Default::default() };
    core.on_key_down(&key("Z"), redo);
    assert_eq!(core.elements().len(), 1);

    core.on_key_down(&key("z"), ctrl_modifier());
    core.on_key_down(&key("y"), ctrl_modifier());
    assert_eq!(core.elements().len(), 1);
}

#[test]
fn meta_counts_as_command() {
    let mut core = EngineCore::new();
    drag(&mut core, pt(0.0, 0.0), pt(10.0, 10.0));
    core.on_key_down(&key("z"), Modifiers { meta: true, ..Default::default() });
    assert!(core.elements().is_empty());
}

#[test]
fn plain_letters_are_ignored() {
    let mut core = EngineCore::new();
    drag(&mut core, pt(0.0, 0.0), pt(10.0, 10.0));
    assert!(core.on_key_down(&key("z"), no_modifiers()).is_empty());
    assert_eq!(core.elements().len(), 1);
}

#[test]
fn ctrl_a_selects_all() {
    let mut core = EngineCore::new();
    let a = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    let b = add_rect(&mut core, 50.0, 0.0, 60.0, 10.0);
    core.on_key_down(&key("a"), ctrl_modifier());
    assert_eq!(core.selection(), &[a, b]);
}

// =============================================================
// Clipboard
// =============================================================

#[test]
fn copy_paste_offsets_and_selects_copies() {
    let mut core = EngineCore::new();
    let id = add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    core.select_all();

    core.on_key_down(&key("c"), ctrl_modifier());
    assert_eq!(core.clipboard.len(), 1);

    let actions = core.on_key_down(&key("v"), ctrl_modifier());
    let copy = created_id(&actions);
    assert_ne!(copy, id);
    assert_eq!(rect_start(&core, &copy), pt(DEFAULT_PASTE_OFFSET, DEFAULT_PASTE_OFFSET));
    assert_eq!(core.selection(), &[copy]);
    assert!(core.can_undo());
}

#[test]
fn repeated_paste_cascades() {
    let mut core = EngineCore::new();
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    core.select_all();
    assert_eq!(core.copy_selection(), 1);

    core.paste();
    let second = created_id(&core.paste());
    let offset = 2.0 * DEFAULT_PASTE_OFFSET;
    assert_eq!(rect_start(&core, &second), pt(offset, offset));
    assert_eq!(core.elements().len(), 3);
}

#[test]
fn copy_resets_paste_cascade() {
    let mut core = EngineCore::new();
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    core.select_all();
    core.copy_selection();
    let first = created_id(&core.paste());

    // The pasted copy is now selected; copying it restarts the offset.
    core.copy_selection();
    let next = created_id(&core.paste());
    let expected = 2.0 * DEFAULT_PASTE_OFFSET;
    assert_eq!(rect_start(&core, &next), pt(expected, expected));
    assert_ne!(first, next);
}

#[test]
fn paste_with_empty_clipboard_is_noop() {
    let mut core = EngineCore::new();
    assert!(core.paste().is_empty());
    assert!(!core.can_undo());
}

#[test]
fn copy_with_empty_selection_keeps_clipboard() {
    let mut core = EngineCore::new();
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    core.select_all();
    core.copy_selection();
    core.clear_selection();

    assert_eq!(core.copy_selection(), 0);
    assert_eq!(core.clipboard.len(), 1);
}

#[test]
fn paste_config_offset_is_used() {
    let config = BoardConfig { paste_offset: 5.0, ..BoardConfig::default() };
    let mut core = EngineCore::with_config(config);
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    core.select_all();
    core.copy_selection();
    let copy = created_id(&core.paste());
    assert_eq!(rect_start(&core, &copy), pt(5.0, 5.0));
}

#[test]
fn duplicate_copies_widgets_in_place() {
    let mut core = EngineCore::new();
    let id = place(&mut core, WidgetKind::LinkedList, "[1,2]", pt(100.0, 100.0));
    core.select_all();

    let actions = core.on_key_down(&key("d"), ctrl_modifier());
    let copy = created_id(&actions);
    let offset = 100.0 + DEFAULT_PASTE_OFFSET;
    assert_eq!(widget_origin(&core, &copy), pt(offset, offset));
    assert_eq!(core.selection(), &[copy]);
    assert!(core.clipboard.is_empty());
    assert!(core.element(&id).is_some());
}

// =============================================================
// Clear
// =============================================================

#[test]
fn clear_canvas_is_undoable() {
    let mut core = EngineCore::new();
    add_rect(&mut core, 0.0, 0.0, 10.0, 10.0);
    place(&mut core, WidgetKind::Array, "[1]", pt(0.0, 0.0));
    core.select_all();

    let actions = core.clear_canvas();
    assert!(core.elements().is_empty());
    assert!(core.selection().is_empty());
    assert!(has_element_deleted(&actions));

    core.undo();
    assert_eq!(core.elements().len(), 2);
}

#[test]
fn clear_empty_canvas_is_noop() {
    let mut core = EngineCore::new();
    assert!(core.clear_canvas().is_empty());
    assert!(!core.can_undo());
}
