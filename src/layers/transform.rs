use crate::foundation::core::Vec2;

/// Inclusive zoom range.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ZoomBounds {
    /// Smallest allowed zoom.
    pub min: f64,
    /// Largest allowed zoom.
    pub max: f64,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self { min: 0.5, max: 2.0 }
    }
}

impl ZoomBounds {
    /// Clamp `zoom` into the range. NaN falls back to the lower bound.
    pub fn clamp(self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.min;
        }
        // Not `f64::clamp`: inverted bounds from unvalidated options must not panic.
        zoom.max(self.min).min(self.max)
    }
}

/// Photo placement relative to the canvas center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// Pan in device pixels, applied in the photo's rotated space.
    pub offset: Vec2,
    /// Uniform scale, always inside the store's [`ZoomBounds`].
    pub zoom: f64,
    /// Rotation in degrees, always in `[0, 360)`.
    pub rotation_deg: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            rotation_deg: 0.0,
        }
    }
}

impl Transform {
    /// Rotation in radians.
    pub fn rotation_rad(&self) -> f64 {
        self.rotation_deg.to_radians()
    }

    /// Apply a relative change, clamping zoom and wrapping rotation.
    pub fn apply(&mut self, delta: TransformDelta, bounds: ZoomBounds) {
        self.offset += delta.offset;
        self.zoom = bounds.clamp(self.zoom + delta.zoom);
        self.rotation_deg = wrap_degrees(self.rotation_deg + delta.rotation_deg);
    }
}

/// Relative change to a [`Transform`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformDelta {
    /// Pan delta in layer space.
    pub offset: Vec2,
    /// Zoom delta, added before clamping.
    pub zoom: f64,
    /// Rotation delta in degrees; may be negative.
    pub rotation_deg: f64,
}

impl TransformDelta {
    /// Pan only.
    pub fn pan(offset: Vec2) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    /// Zoom only.
    pub fn zoom(zoom: f64) -> Self {
        Self {
            zoom,
            ..Self::default()
        }
    }

    /// Rotate only.
    pub fn rotate(rotation_deg: f64) -> Self {
        Self {
            rotation_deg,
            ..Self::default()
        }
    }

    /// Return `true` when applying this delta cannot change anything.
    pub fn is_noop(&self) -> bool {
        self.offset == Vec2::ZERO && self.zoom == 0.0 && self.rotation_deg == 0.0
    }
}

/// Normalize degrees into `[0, 360)`.
pub fn wrap_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Map a screen-space drag into the photo's rotated layer space.
///
/// This is the inverse rotation of the screen delta, scaled by `sensitivity`, so the photo
/// follows the pointer whatever its current rotation.
pub fn screen_to_layer_delta(raw: Vec2, rotation_deg: f64, sensitivity: f64) -> Vec2 {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    let dx = raw.x * cos + raw.y * sin;
    let dy = raw.y * cos - raw.x * sin;
    Vec2::new(dx * sensitivity, dy * sensitivity)
}

#[cfg(test)]
#[path = "../../tests/unit/layers/transform.rs"]
mod tests;
