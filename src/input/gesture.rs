use crate::foundation::core::{Point, Vec2};

/// Phase of the current interaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging,
    Pinching,
}

/// Two-finger baseline. Only deltas between consecutive samples are used.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchSample {
    /// Distance between the two touches.
    pub distance: f64,
    /// Angle of the line from the first to the second touch, in degrees.
    pub angle_deg: f64,
}

impl PinchSample {
    /// Measure two touches.
    pub fn between(a: Point, b: Point) -> Self {
        let v = b - a;
        Self {
            distance: v.hypot(),
            angle_deg: v.y.atan2(v.x).to_degrees(),
        }
    }
}

/// Transient per-interaction state; reset whenever the interaction ends.
#[derive(Clone, Debug, Default)]
pub struct GestureSession {
    phase: GesturePhase,
    origin: Point,
    pointer_count: usize,
    pinch: Option<PinchSample>,
}

impl GestureSession {
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Pointers or touches currently down.
    pub fn pointer_count(&self) -> usize {
        self.pointer_count
    }

    /// Last recorded pinch baseline.
    pub fn pinch_baseline(&self) -> Option<PinchSample> {
        self.pinch
    }

    /// Whether any interaction is in progress.
    pub fn is_active(&self) -> bool {
        self.phase != GesturePhase::Idle
    }

    /// Start (or restart) a single-pointer drag at `at`.
    pub(crate) fn begin_drag(&mut self, at: Point, pointer_count: usize) {
        self.phase = GesturePhase::Dragging;
        self.origin = at;
        self.pointer_count = pointer_count;
        self.pinch = None;
    }

    /// Enter the pinch phase without a baseline; the next two-finger sample records one.
    pub(crate) fn begin_pinch(&mut self) {
        if self.phase != GesturePhase::Pinching {
            self.pinch = None;
        }
        self.phase = GesturePhase::Pinching;
        self.pointer_count = 2;
    }

    /// Advance the drag origin to `at` and return the raw screen movement since the last sample.
    pub(crate) fn drag_to(&mut self, at: Point) -> Vec2 {
        let raw = at - self.origin;
        self.origin = at;
        raw
    }

    /// Replace the pinch baseline, returning the previous one.
    pub(crate) fn swap_pinch(&mut self, sample: PinchSample) -> Option<PinchSample> {
        self.pinch.replace(sample)
    }

    /// Discard all transient state.
    pub(crate) fn end(&mut self) {
        *self = Self::default();
    }
}
