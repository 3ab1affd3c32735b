use super::*;
use crate::foundation::core::Vec2;
use crate::input::event::RotateStep;
use crate::layers::transform::{Transform, ZoomBounds};

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn pinch_at(distance: f64) -> InputEvent {
    InputEvent::TouchMove {
        touches: vec![p(0.0, 0.0), p(distance, 0.0)],
    }
}

fn zoom_of(out: &Interpretation) -> f64 {
    out.commands
        .iter()
        .map(|c| match c {
            EditCommand::Transform(d) => d.zoom,
            EditCommand::Pulse(_) => 0.0,
        })
        .sum()
}

fn pan_of(out: &Interpretation) -> Vec2 {
    out.commands
        .iter()
        .fold(Vec2::ZERO, |acc, c| match c {
            EditCommand::Transform(d) => acc + d.offset,
            EditCommand::Pulse(_) => acc,
        })
}

fn pulses_of(out: &Interpretation) -> Vec<OpacityPulse> {
    out.commands
        .iter()
        .filter_map(|c| match c {
            EditCommand::Pulse(p) => Some(*p),
            EditCommand::Transform(_) => None,
        })
        .collect()
}

#[test]
fn pointer_move_without_press_is_ignored() {
    let mut input = InputInterpreter::default();
    let out = input.interpret(&InputEvent::PointerMove { at: p(10.0, 10.0) }, 0.0);
    assert!(out.commands.is_empty());
    assert!(!out.consumed);
}

#[test]
fn drag_moves_by_scaled_delta_and_holds_pulse() {
    let mut input = InputInterpreter::default();
    input.interpret(&InputEvent::PointerDown { at: p(100.0, 100.0) }, 0.0);
    assert_eq!(input.session().phase(), GesturePhase::Dragging);

    let out = input.interpret(&InputEvent::PointerMove { at: p(110.0, 96.0) }, 0.0);
    assert!(out.consumed);
    let pan = pan_of(&out);
    assert!((pan.x - 15.0).abs() < 1e-9);
    assert!((pan.y + 6.0).abs() < 1e-9);
    assert_eq!(pulses_of(&out), vec![OpacityPulse::hold(0.5)]);

    // Deltas are measured from the previous sample, not the press point.
    let out = input.interpret(&InputEvent::PointerMove { at: p(112.0, 96.0) }, 0.0);
    assert!((pan_of(&out).x - 3.0).abs() < 1e-9);

    let out = input.interpret(&InputEvent::PointerUp, 0.0);
    assert_eq!(pulses_of(&out), vec![OpacityPulse::settle()]);
    assert_eq!(input.session().phase(), GesturePhase::Idle);

    // A second release with nothing active does nothing.
    assert!(input.interpret(&InputEvent::PointerUp, 0.0).commands.is_empty());
}

#[test]
fn drag_is_rotation_compensated() {
    let mut input = InputInterpreter::default();
    input.interpret(&InputEvent::PointerDown { at: p(0.0, 0.0) }, 90.0);
    let out = input.interpret(&InputEvent::PointerMove { at: p(10.0, 0.0) }, 90.0);
    let pan = pan_of(&out);
    assert!(pan.x.abs() < 1e-9);
    assert!((pan.y + 15.0).abs() < 1e-9);
}

#[test]
fn pinch_first_sample_is_baseline_then_deltas() {
    let mut input = InputInterpreter::default();
    let bounds = ZoomBounds::default();
    let mut t = Transform::default();

    input.interpret(
        &InputEvent::TouchStart {
            touches: vec![p(0.0, 0.0), p(100.0, 0.0)],
        },
        0.0,
    );
    assert_eq!(input.session().phase(), GesturePhase::Pinching);

    let first = input.interpret(&pinch_at(100.0), 0.0);
    assert!(first.consumed);
    assert!(first.commands.is_empty());

    let second = input.interpret(&pinch_at(150.0), 0.0);
    assert_eq!(zoom_of(&second), 0.25);
    assert_eq!(pulses_of(&second), vec![OpacityPulse::hold(0.5)]);
    for c in &second.commands {
        if let EditCommand::Transform(d) = c {
            t.apply(*d, bounds);
        }
    }
    assert_eq!(t.zoom, 1.25);

    let third = input.interpret(&pinch_at(140.0), 0.0);
    assert!((zoom_of(&third) + 0.05).abs() < 1e-12);
    for c in &third.commands {
        if let EditCommand::Transform(d) = c {
            t.apply(*d, bounds);
        }
    }
    assert!((t.zoom - 1.2).abs() < 1e-12);
}

#[test]
fn pinch_without_touch_start_still_needs_a_baseline() {
    let mut input = InputInterpreter::default();
    assert!(input.interpret(&pinch_at(80.0), 0.0).commands.is_empty());
    assert_eq!(input.session().pinch_baseline().unwrap().distance, 80.0);
    assert_eq!(zoom_of(&input.interpret(&pinch_at(100.0), 0.0)), 0.1);
}

#[test]
fn lifting_one_pinch_finger_reseeds_drag_without_jump() {
    let mut input = InputInterpreter::default();
    input.interpret(&pinch_at(100.0), 0.0);
    input.interpret(&pinch_at(120.0), 0.0);

    let out = input.interpret(
        &InputEvent::TouchEnd {
            touches: vec![p(500.0, 500.0)],
        },
        0.0,
    );
    assert!(out.commands.is_empty());
    assert_eq!(input.session().phase(), GesturePhase::Dragging);

    let out = input.interpret(
        &InputEvent::TouchMove {
            touches: vec![p(502.0, 500.0)],
        },
        0.0,
    );
    assert!((pan_of(&out).x - 3.0).abs() < 1e-9);

    let out = input.interpret(&InputEvent::TouchEnd { touches: vec![] }, 0.0);
    assert_eq!(pulses_of(&out), vec![OpacityPulse::settle()]);
    assert!(input.session().pinch_baseline().is_none());
}

#[test]
fn new_pinch_session_starts_without_stale_baseline() {
    let mut input = InputInterpreter::default();
    input.interpret(&pinch_at(100.0), 0.0);
    input.interpret(&InputEvent::TouchEnd { touches: vec![] }, 0.0);

    input.interpret(
        &InputEvent::TouchStart {
            touches: vec![p(0.0, 0.0), p(300.0, 0.0)],
        },
        0.0,
    );
    assert!(input.interpret(&pinch_at(300.0), 0.0).commands.is_empty());
}

#[test]
fn pinch_twist_rotates_when_enabled() {
    let mut input = InputInterpreter::new(InputOpts {
        pinch_rotates: true,
        ..InputOpts::default()
    });
    input.interpret(
        &InputEvent::TouchMove {
            touches: vec![p(0.0, 0.0), p(100.0, 0.0)],
        },
        0.0,
    );
    let out = input.interpret(
        &InputEvent::TouchMove {
            touches: vec![p(0.0, 0.0), p(0.0, 100.0)],
        },
        0.0,
    );
    let rot: f64 = out
        .commands
        .iter()
        .map(|c| match c {
            EditCommand::Transform(d) => d.rotation_deg,
            EditCommand::Pulse(_) => 0.0,
        })
        .sum();
    assert!((rot - 90.0).abs() < 1e-9);
    assert_eq!(zoom_of(&out), 0.0);
}

#[test]
fn wheel_needs_modifier_and_restores_on_timer() {
    let mut input = InputInterpreter::default();
    let plain = input.interpret(
        &InputEvent::Wheel {
            delta_y: -100.0,
            modifiers: Modifiers::default(),
        },
        0.0,
    );
    assert!(!plain.consumed);
    assert!(plain.commands.is_empty());

    let zoomed = input.interpret(
        &InputEvent::Wheel {
            delta_y: -100.0,
            modifiers: Modifiers::ctrl(),
        },
        0.0,
    );
    assert!(zoomed.consumed);
    assert!((zoom_of(&zoomed) - 0.2).abs() < 1e-12);
    assert_eq!(
        pulses_of(&zoomed),
        vec![OpacityPulse::timed(0.5, Duration::from_millis(200))]
    );
}

#[test]
fn meta_modifier_is_configurable() {
    let mut input = InputInterpreter::new(InputOpts {
        wheel_modifier: WheelModifier::CtrlOrMeta,
        ..InputOpts::default()
    });
    let out = input.interpret(
        &InputEvent::Wheel {
            delta_y: 50.0,
            modifiers: Modifiers {
                meta: true,
                ..Modifiers::default()
            },
        },
        0.0,
    );
    assert!((zoom_of(&out) + 0.1).abs() < 1e-12);
}

#[test]
fn rotate_buttons_step_by_quarter_turns() {
    let mut input = InputInterpreter::default();
    let out = input.interpret(
        &InputEvent::Rotate {
            step: RotateStep::CounterClockwise,
        },
        0.0,
    );
    let mut t = Transform::default();
    for c in &out.commands {
        if let EditCommand::Transform(d) = c {
            t.apply(*d, ZoomBounds::default());
        }
    }
    assert_eq!(t.rotation_deg, 270.0);
}

#[test]
fn shortest_turn_stays_in_half_circle() {
    assert_eq!(shortest_turn(350.0), -10.0);
    assert_eq!(shortest_turn(-350.0), 10.0);
    assert_eq!(shortest_turn(180.0), 180.0);
}

#[test]
fn input_opts_json_uses_millis() {
    let json = serde_json::to_value(InputOpts::default()).unwrap();
    assert_eq!(json["wheel_restore_after"], 200);
    let parsed: InputOpts =
        serde_json::from_str(r#"{ "drag_sensitivity": 2.0, "wheel_restore_after": 50 }"#).unwrap();
    assert_eq!(parsed.drag_sensitivity, 2.0);
    assert_eq!(parsed.wheel_restore_after, Duration::from_millis(50));
    assert_eq!(parsed.pinch_divisor, 200.0);
}

#[test]
fn non_finite_coordinates_and_deltas_are_dropped() {
    let mut input = InputInterpreter::default();

    let wheel = InputEvent::Wheel {
        delta_y: f64::NAN,
        modifiers: Modifiers::ctrl(),
    };
    let out = input.interpret(&wheel, 0.0);
    assert!(!out.consumed && out.commands.is_empty());

    let out = input.interpret(&InputEvent::PointerDown { at: p(f64::NAN, 0.0) }, 0.0);
    assert!(!out.consumed);
    assert_eq!(input.session().phase(), GesturePhase::Idle);

    input.interpret(&InputEvent::PointerDown { at: p(0.0, 0.0) }, 0.0);
    let out = input.interpret(&InputEvent::PointerMove { at: p(f64::INFINITY, 1.0) }, 0.0);
    assert!(out.commands.is_empty());
    // The origin is untouched, so the next finite move is measured from the press.
    let out = input.interpret(&InputEvent::PointerMove { at: p(2.0, 0.0) }, 0.0);
    assert_eq!(pan_of(&out), Vec2::new(3.0, 0.0));

    input.interpret(&InputEvent::PointerUp, 0.0);
    input.interpret(&pinch_at(100.0), 0.0);
    let out = input.interpret(&pinch_at(f64::NAN), 0.0);
    assert!(out.commands.is_empty());
    let out = input.interpret(&pinch_at(120.0), 0.0);
    assert!((zoom_of(&out) - 0.1).abs() < 1e-12);
}
