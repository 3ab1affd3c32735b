use std::time::Duration;

use smallvec::SmallVec;

use crate::{
    foundation::core::Point,
    input::{
        event::{InputEvent, Modifiers},
        gesture::{GesturePhase, GestureSession, PinchSample},
    },
    layers::{
        store::OpacityPulse,
        transform::{TransformDelta, screen_to_layer_delta},
    },
};

/// Which modifier turns a wheel event into a zoom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelModifier {
    #[default]
    Ctrl,
    Meta,
    CtrlOrMeta,
}

impl WheelModifier {
    fn is_held(self, m: Modifiers) -> bool {
        match self {
            Self::Ctrl => m.ctrl,
            Self::Meta => m.meta,
            Self::CtrlOrMeta => m.ctrl || m.meta,
        }
    }
}

/// Tuning for gesture translation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InputOpts {
    /// Multiplier applied to drag deltas.
    pub drag_sensitivity: f64,
    /// Pixels of pinch distance change per 1.0 of zoom.
    pub pinch_divisor: f64,
    /// Wheel units per 1.0 of zoom.
    pub wheel_divisor: f64,
    /// Frame opacity while the photo is being moved.
    pub pulse_opacity: f32,
    /// Delay before a wheel zoom restores full frame opacity.
    #[serde(with = "millis")]
    pub wheel_restore_after: Duration,
    /// Modifier that enables wheel zoom.
    pub wheel_modifier: WheelModifier,
    /// Two-finger twist also rotates the photo.
    pub pinch_rotates: bool,
}

impl Default for InputOpts {
    fn default() -> Self {
        Self {
            drag_sensitivity: 1.5,
            pinch_divisor: 200.0,
            wheel_divisor: 500.0,
            pulse_opacity: 0.5,
            wheel_restore_after: Duration::from_millis(200),
            wheel_modifier: WheelModifier::Ctrl,
            pinch_rotates: false,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// A store mutation requested by an input event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditCommand {
    /// Relative transform change.
    Transform(TransformDelta),
    /// Frame opacity pulse.
    Pulse(OpacityPulse),
}

/// Outcome of interpreting one event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interpretation {
    /// Commands to apply, in order.
    pub commands: SmallVec<[EditCommand; 2]>,
    /// The event was claimed by the editor; the host should suppress its default action
    /// (page scroll, text selection).
    pub consumed: bool,
}

impl Interpretation {
    fn ignored() -> Self {
        Self::default()
    }

    fn consumed() -> Self {
        Self {
            commands: SmallVec::new(),
            consumed: true,
        }
    }

    fn push(mut self, cmd: EditCommand) -> Self {
        self.commands.push(cmd);
        self
    }
}

/// Turns raw pointer, touch and wheel input into [`EditCommand`]s.
///
/// Owns the [`GestureSession`]; the caller supplies the photo's current rotation so drags stay
/// screen-relative.
#[derive(Debug, Default)]
pub struct InputInterpreter {
    opts: InputOpts,
    session: GestureSession,
}

impl InputInterpreter {
    /// Create an idle interpreter.
    pub fn new(opts: InputOpts) -> Self {
        Self {
            opts,
            session: GestureSession::default(),
        }
    }

    /// Interpreter tuning.
    pub fn opts(&self) -> &InputOpts {
        &self.opts
    }

    /// Current gesture session.
    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    /// Translate one event. `rotation_deg` is the photo's rotation before the event.
    pub fn interpret(&mut self, event: &InputEvent, rotation_deg: f64) -> Interpretation {
        match event {
            InputEvent::PointerDown { at } => self.seed_drag(*at),
            InputEvent::PointerMove { at } => self.drag(*at, rotation_deg),
            InputEvent::PointerUp => self.end_gesture(),
            InputEvent::TouchStart { touches } => self.touch_start(touches),
            InputEvent::TouchMove { touches } => self.touch_move(touches, rotation_deg),
            InputEvent::TouchEnd { touches } => self.touch_end(touches),
            InputEvent::Wheel { delta_y, modifiers } => self.wheel(*delta_y, *modifiers),
            InputEvent::Rotate { step } => Interpretation::consumed().push(
                EditCommand::Transform(TransformDelta::rotate(step.degrees())),
            ),
        }
    }

    fn seed_drag(&mut self, at: Point) -> Interpretation {
        if !at.is_finite() {
            return Interpretation::ignored();
        }
        self.session.begin_drag(at, 1);
        Interpretation::consumed()
    }

    fn drag(&mut self, at: Point, rotation_deg: f64) -> Interpretation {
        if self.session.phase() != GesturePhase::Dragging || !at.is_finite() {
            return Interpretation::ignored();
        }
        let raw = self.session.drag_to(at);
        let delta = screen_to_layer_delta(raw, rotation_deg, self.opts.drag_sensitivity);
        Interpretation::consumed()
            .push(EditCommand::Transform(TransformDelta::pan(delta)))
            .push(EditCommand::Pulse(OpacityPulse::hold(self.opts.pulse_opacity)))
    }

    fn end_gesture(&mut self) -> Interpretation {
        if !self.session.is_active() {
            return Interpretation::ignored();
        }
        tracing::debug!(phase = ?self.session.phase(), "gesture ended");
        self.session.end();
        Interpretation::consumed().push(EditCommand::Pulse(OpacityPulse::settle()))
    }

    fn touch_start(&mut self, touches: &[Point]) -> Interpretation {
        match touches {
            [only] => self.seed_drag(*only),
            [_, _] => {
                self.session.begin_pinch();
                Interpretation::consumed()
            }
            _ => Interpretation::ignored(),
        }
    }

    fn touch_move(&mut self, touches: &[Point], rotation_deg: f64) -> Interpretation {
        match touches {
            [a, b] => self.pinch(*a, *b),
            [only] => match self.session.phase() {
                GesturePhase::Dragging => self.drag(*only, rotation_deg),
                // One finger left after a pinch: continue as a drag from here without a jump.
                GesturePhase::Pinching => self.seed_drag(*only),
                GesturePhase::Idle => Interpretation::ignored(),
            },
            _ => Interpretation::ignored(),
        }
    }

    fn pinch(&mut self, a: Point, b: Point) -> Interpretation {
        if !(a.is_finite() && b.is_finite()) {
            return Interpretation::ignored();
        }
        self.session.begin_pinch();
        let sample = PinchSample::between(a, b);
        let Some(last) = self.session.swap_pinch(sample) else {
            // First sample of the session only establishes the baseline.
            return Interpretation::consumed();
        };

        let scale_change = sample.distance - last.distance;
        let mut delta = TransformDelta::zoom(scale_change / self.opts.pinch_divisor);
        if self.opts.pinch_rotates {
            delta.rotation_deg = shortest_turn(sample.angle_deg - last.angle_deg);
        }
        Interpretation::consumed()
            .push(EditCommand::Transform(delta))
            .push(EditCommand::Pulse(OpacityPulse::hold(self.opts.pulse_opacity)))
    }

    fn touch_end(&mut self, remaining: &[Point]) -> Interpretation {
        match remaining {
            [] => self.end_gesture(),
            [only] => self.seed_drag(*only),
            _ => Interpretation::consumed(),
        }
    }

    fn wheel(&mut self, delta_y: f64, modifiers: Modifiers) -> Interpretation {
        if !delta_y.is_finite() || !self.opts.wheel_modifier.is_held(modifiers) {
            return Interpretation::ignored();
        }
        Interpretation::consumed()
            .push(EditCommand::Transform(TransformDelta::zoom(
                -delta_y / self.opts.wheel_divisor,
            )))
            .push(EditCommand::Pulse(OpacityPulse::timed(
                self.opts.pulse_opacity,
                self.opts.wheel_restore_after,
            )))
    }
}

/// Map an angle difference into `(-180, 180]` so a twist across the atan2 seam stays small.
fn shortest_turn(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}

#[cfg(test)]
#[path = "../../tests/unit/input/interpreter.rs"]
mod tests;
