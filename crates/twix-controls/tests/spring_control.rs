//! End-to-end behavior of a mounted spring control.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use twix_controls::preview::DrawOp;
use twix_controls::{
    Axis, ControlConfig, DragEvent, RecordingDriver, RecordingSurface, Rgba, SpringControl,
    SpringRegistry, SpringSettings, SpringValue, StaticTheme, UpdateOutcome, register_spring_plugin,
};

type Commits = Rc<RefCell<Vec<SpringValue>>>;

fn mount(value: SpringValue, registry: SpringRegistry) -> (SpringControl<RecordingDriver>, Commits) {
    let commits: Commits = Rc::default();
    let sink = Rc::clone(&commits);
    let control = SpringControl::new(
        value,
        SpringSettings::default(),
        Arc::new(registry),
        ControlConfig::default(),
        RecordingDriver::new(),
        Box::new(move |v: &SpringValue| sink.borrow_mut().push(*v)),
    )
    .unwrap()
    .with_canvas(200, 60);
    (control, commits)
}

fn bare() -> SpringRegistry {
    SpringRegistry::new()
}

fn with_spring_plugin() -> SpringRegistry {
    let mut reg = SpringRegistry::new();
    register_spring_plugin(&mut reg);
    reg
}

#[test]
fn unregistered_spring_type_commits_verbatim() {
    let (mut c, commits) = mount(SpringValue::default(), bare());
    let outcome = c.on_update(SpringValue::new(200.0, 12.0)).unwrap();

    assert_eq!(outcome, UpdateOutcome::Committed);
    assert_eq!(*commits.borrow(), vec![SpringValue::new(200.0, 12.0)]);
    assert_eq!(*c.displayed_value(), SpringValue::new(200.0, 12.0));
    assert_eq!(c.driver().started().len(), 1);
}

#[test]
fn x_drag_edits_tension_and_locks_axis() {
    let (mut c, commits) = mount(SpringValue::new(200.0, 12.0), bare());

    c.on_drag(DragEvent::Start, 0.0).unwrap();
    c.on_drag(DragEvent::Move { dx: 10.0, dy: 0.0 }, 16.0).unwrap();
    assert_eq!(*c.displayed_value(), SpringValue::new(180.0, 12.0));
    assert_eq!(c.drag().locked_axis(), Some(Axis::X));

    // vertical movement in the same gesture does not touch friction
    c.on_drag(DragEvent::Move { dx: 10.0, dy: 40.0 }, 32.0).unwrap();
    assert_eq!(*c.displayed_value(), SpringValue::new(180.0, 12.0));
    c.on_drag(DragEvent::End, 48.0).unwrap();

    // nothing commits until the quiet window has passed
    assert!(c.tick(200.0).commit.is_none());
    assert!(commits.borrow().is_empty());

    let report = c.tick(32.0 + 250.0);
    assert_eq!(report.commit, Some(UpdateOutcome::Committed));
    assert_eq!(*commits.borrow(), vec![SpringValue::new(180.0, 12.0)]);

    let anim = c.driver().last().unwrap();
    assert_eq!(anim.config.tension, 180.0);
    assert_eq!(anim.config.friction, 12.0);
    assert_eq!(anim.config.mass, 1.0);
}

#[test]
fn external_change_updates_display_without_commit() {
    let (mut c, commits) = mount(SpringValue::new(200.0, 12.0), bare());
    let before = c.preview_revision();

    assert!(c.sync_external(&SpringValue::new(300.0, 12.0)));
    assert_eq!(*c.displayed_value(), SpringValue::new(300.0, 12.0));
    assert!(c.preview_revision() > before);

    c.tick(10_000.0);
    assert!(commits.borrow().is_empty());
    assert!(c.driver().started().is_empty());

    // the same value again is not a change
    assert!(!c.sync_external(&SpringValue::new(300.0, 12.0)));
}

#[test]
fn change_is_drawn_before_commit() {
    let (mut c, commits) = mount(SpringValue::new(200.0, 12.0), bare());
    let before = c.preview_revision();
    let settled_y = c.trace().last().unwrap().1;

    c.on_change(SpringValue::new(50.0, 30.0), 0.0).unwrap();
    assert_eq!(c.preview_revision(), before + 1);
    assert!(commits.borrow().is_empty());
    assert_eq!(c.trace().len(), 200);
    assert_ne!(c.trace()[20].1, settled_y);

    c.tick(250.0);
    assert_eq!(commits.borrow().len(), 1);
}

#[test]
fn burst_of_changes_commits_last_value_once() {
    let (mut c, commits) = mount(SpringValue::new(200.0, 12.0), bare());

    c.on_drag(DragEvent::Start, 0.0).unwrap();
    for i in 1..=20 {
        let now = f64::from(i) * 16.0;
        c.on_drag(DragEvent::Move { dx: f64::from(i), dy: 0.0 }, now).unwrap();
        assert!(c.tick(now).commit.is_none());
    }
    c.on_drag(DragEvent::End, 330.0).unwrap();

    c.tick(320.0 + 250.0);
    assert_eq!(*commits.borrow(), vec![SpringValue::new(160.0, 12.0)]);
    assert_eq!(c.driver().started().len(), 1);
}

#[test]
fn invalid_drag_rolls_back_on_commit() {
    let (mut c, commits) = mount(SpringValue::new(200.0, 12.0), with_spring_plugin());

    c.on_drag(DragEvent::Start, 0.0).unwrap();
    // friction 12 - 100/5 = -8
    c.on_drag(DragEvent::Move { dx: 0.0, dy: 100.0 }, 10.0).unwrap();
    assert_eq!(c.displayed_value().friction, -8.0);
    c.on_drag(DragEvent::End, 20.0).unwrap();

    let report = c.tick(260.0);
    assert_eq!(report.commit, Some(UpdateOutcome::RolledBack));
    assert!(commits.borrow().is_empty());
    assert!(c.driver().started().is_empty());
    // the plugin fills in the default mass at mount
    let mounted = SpringValue::new(200.0, 12.0).with_mass(1.0);
    assert_eq!(*c.displayed_value(), mounted);
    assert_eq!(*c.last_correct_value(), mounted);
}

#[test]
fn dragging_back_to_committed_value_is_noop() {
    let (mut c, commits) = mount(SpringValue::new(200.0, 12.0), bare());

    c.on_drag(DragEvent::Start, 0.0).unwrap();
    c.on_drag(DragEvent::Move { dx: 10.0, dy: 0.0 }, 10.0).unwrap();
    c.on_drag(DragEvent::Move { dx: 0.0, dy: 0.0 }, 20.0).unwrap();
    c.on_drag(DragEvent::End, 30.0).unwrap();

    let report = c.tick(1000.0);
    assert_eq!(report.commit, Some(UpdateOutcome::Unchanged));
    assert!(commits.borrow().is_empty());
    assert!(c.driver().started().is_empty());
}

#[test]
fn spring_plugin_commits_sanitized_value() {
    let (mut c, commits) = mount(SpringValue::new(200.0, 12.0), with_spring_plugin());

    c.on_change(SpringValue::new(180.004, 12.0), 0.0).unwrap();
    c.tick(250.0);
    let committed = SpringValue::new(180.0, 12.0).with_mass(1.0);
    assert_eq!(*commits.borrow(), vec![committed]);
    assert_eq!(*c.displayed_value(), committed);

    // same canonical value a second time
    assert_eq!(
        c.on_update(SpringValue::new(179.996, 12.0).with_mass(1.0)).unwrap(),
        UpdateOutcome::Unchanged
    );
    assert_eq!(commits.borrow().len(), 1);
}

#[test]
fn unmount_cancels_pending_commit() {
    let (mut c, commits) = mount(SpringValue::new(200.0, 12.0), bare());

    c.on_change(SpringValue::new(150.0, 12.0), 0.0).unwrap();
    c.on_resize(400, 100, 0.0).unwrap();
    c.unmount();

    let report = c.tick(10_000.0);
    assert!(report.commit.is_none());
    assert!(!report.resized);
    assert!(commits.borrow().is_empty());
    assert_eq!(c.canvas_size(), (200, 60));
}

#[test]
fn dropping_control_discards_pending_commit() {
    let (mut c, commits) = mount(SpringValue::new(200.0, 12.0), bare());
    c.on_change(SpringValue::new(150.0, 12.0), 0.0).unwrap();
    assert!(c.commit_pending());
    drop(c);
    assert!(commits.borrow().is_empty());
}

#[test]
fn resize_is_debounced_and_redraws() {
    let (mut c, commits) = mount(SpringValue::new(200.0, 12.0), bare());

    c.on_resize(300, 80, 0.0).unwrap();
    c.on_resize(320, 90, 100.0).unwrap();
    assert_eq!(c.trace().len(), 200);

    let report = c.tick(350.0);
    assert!(report.resized);
    assert_eq!(c.canvas_size(), (320, 90));
    assert_eq!(c.trace().len(), 320);
    assert_eq!(c.trace()[0], (0.0, 90.0));
    assert!(commits.borrow().is_empty());
}

#[test]
fn external_change_supersedes_pending_edit() {
    let (mut c, commits) = mount(SpringValue::new(200.0, 12.0), bare());

    c.on_change(SpringValue::new(150.0, 12.0), 0.0).unwrap();
    assert!(c.sync_external(&SpringValue::new(300.0, 12.0)));
    assert!(!c.commit_pending());

    c.tick(10_000.0);
    assert!(commits.borrow().is_empty());
    assert_eq!(*c.displayed_value(), SpringValue::new(300.0, 12.0));
}

#[test]
fn draw_strokes_trace_with_configured_color() {
    let (c, _commits) = mount(SpringValue::new(200.0, 12.0), bare());
    let theme = StaticTheme::new().with("folder-border", Rgba::new(10, 20, 30, 255));
    let mut surface = RecordingSurface::new(200, 60);

    c.draw(&mut surface, &theme);
    assert_eq!(surface.ops()[0], DrawOp::Clear);
    assert_eq!(surface.path(), c.trace().to_vec());
    assert_eq!(surface.stroke_color(), Some(Rgba::new(10, 20, 30, 255)));
}

#[test]
fn typed_value_supersedes_pending_drag() {
    let (mut c, commits) = mount(SpringValue::new(200.0, 12.0), bare());

    c.on_drag(DragEvent::Start, 0.0).unwrap();
    c.on_drag(DragEvent::Move { dx: 10.0, dy: 0.0 }, 16.0).unwrap();
    c.on_drag(DragEvent::End, 32.0).unwrap();
    assert_eq!(c.displayed_value().tension, 180.0);

    let typed = SpringValue::new(300.0, 12.0);
    assert_eq!(c.on_update(typed).unwrap(), UpdateOutcome::Committed);

    let report = c.tick(1000.0);
    assert!(report.commit.is_none());
    assert_eq!(*commits.borrow(), vec![typed]);
    assert_eq!(*c.last_correct_value(), typed);
    assert_eq!(*c.displayed_value(), typed);
    assert_eq!(c.driver().started().len(), 1);
}

#[test]
fn mount_value_without_mass_does_not_recommit() {
    let (mut c, commits) = mount(SpringValue::new(200.0, 12.0), with_spring_plugin());

    assert_eq!(
        c.on_update(SpringValue::new(200.0, 12.0)).unwrap(),
        UpdateOutcome::Unchanged
    );
    // the owner still holds the mass-less form; that is not an external change
    assert!(!c.sync_external(&SpringValue::new(200.0, 12.0)));
    assert!(commits.borrow().is_empty());
    assert!(c.driver().started().is_empty());
}
