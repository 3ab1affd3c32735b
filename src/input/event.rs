use crate::foundation::core::Point;

/// Keyboard modifiers held during a wheel event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }
}

/// Discrete rotation button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotateStep {
    /// +90 degrees.
    Clockwise,
    /// -90 degrees.
    CounterClockwise,
}

impl RotateStep {
    /// Signed step in degrees.
    pub fn degrees(self) -> f64 {
        match self {
            Self::Clockwise => 90.0,
            Self::CounterClockwise => -90.0,
        }
    }
}

/// Raw input as delivered by the host surface, in screen coordinates.
///
/// Touch events carry the full list of touches still on the surface after the event, the way
/// browsers report `TouchEvent.touches`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Mouse button pressed over the canvas.
    PointerDown {
        /// Pointer position.
        at: Point,
    },
    /// Mouse moved over the canvas.
    PointerMove {
        /// Pointer position.
        at: Point,
    },
    /// Mouse button released.
    PointerUp,
    /// One or more fingers touched down.
    TouchStart {
        /// Active touches.
        touches: Vec<Point>,
    },
    /// Active touches moved.
    TouchMove {
        /// Active touches.
        touches: Vec<Point>,
    },
    /// One or more fingers lifted.
    TouchEnd {
        /// Touches still down.
        #[serde(default)]
        touches: Vec<Point>,
    },
    /// Scroll wheel.
    Wheel {
        /// Vertical scroll amount; positive scrolls down.
        delta_y: f64,
        /// Modifiers held at the time.
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Rotation button pressed.
    Rotate {
        /// Direction.
        step: RotateStep,
    },
}
