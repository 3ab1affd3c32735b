use std::time::Duration;

use crate::{
    assets::Layer,
    foundation::core::Millis,
    layers::transform::{Transform, TransformDelta, ZoomBounds},
};

/// A transient change of the frame's blend opacity.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OpacityPulse {
    /// Opacity to apply immediately, clamped to `[0, 1]`.
    pub value: f32,
    /// When set, opacity returns to 1 after this delay unless another pulse arrives first.
    pub restore_after: Option<Duration>,
}

impl OpacityPulse {
    /// Pulse that stays until replaced.
    pub fn hold(value: f32) -> Self {
        Self {
            value,
            restore_after: None,
        }
    }

    /// Pulse that restores itself after `delay`.
    pub fn timed(value: f32, delay: Duration) -> Self {
        Self {
            value,
            restore_after: Some(delay),
        }
    }

    /// Immediate return to full opacity.
    pub fn settle() -> Self {
        Self::hold(1.0)
    }
}

/// Single source of truth for the compositor: both layers plus the photo transform.
///
/// Every mutation marks the store dirty; the owner redraws once and calls
/// [`LayerStore::take_dirty`].
#[derive(Debug)]
pub struct LayerStore {
    frame: Option<Layer>,
    photo: Option<Layer>,
    transform: Transform,
    zoom_bounds: ZoomBounds,
    blend_opacity: f32,
    restore_due: Option<Millis>,
    dirty: bool,
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new(ZoomBounds::default())
    }
}

impl LayerStore {
    /// Create an empty store.
    pub fn new(zoom_bounds: ZoomBounds) -> Self {
        Self {
            frame: None,
            photo: None,
            transform: Transform {
                zoom: zoom_bounds.clamp(1.0),
                ..Transform::default()
            },
            zoom_bounds,
            blend_opacity: 1.0,
            restore_due: None,
            dirty: false,
        }
    }

    /// Decorative frame, once loaded.
    pub fn frame(&self) -> Option<&Layer> {
        self.frame.as_ref()
    }

    /// Current photo, if one was uploaded.
    pub fn photo(&self) -> Option<&Layer> {
        self.photo.as_ref()
    }

    /// Current photo transform.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Opacity the frame is drawn with while a photo is present.
    pub fn blend_opacity(&self) -> f32 {
        self.blend_opacity
    }

    /// Time at which a pending opacity restore fires.
    pub fn pending_restore(&self) -> Option<Millis> {
        self.restore_due
    }

    /// Install the frame layer. Surface dimensions follow it on the next redraw.
    pub fn set_frame_layer(&mut self, layer: Layer) {
        tracing::debug!(width = layer.width, height = layer.height, "frame layer set");
        self.frame = Some(layer);
        self.dirty = true;
    }

    /// Drop the frame layer (editor unmount).
    pub fn release_frame(&mut self) -> Option<Layer> {
        let released = self.frame.take();
        if released.is_some() {
            self.dirty = true;
        }
        released
    }

    /// Replace the photo layer. The transform is kept as is.
    pub fn set_photo_layer(&mut self, layer: Layer) {
        tracing::debug!(width = layer.width, height = layer.height, "photo layer set");
        self.photo = Some(layer);
        self.dirty = true;
    }

    /// Remove the photo layer.
    pub fn clear_photo(&mut self) -> Option<Layer> {
        let cleared = self.photo.take();
        if cleared.is_some() {
            self.dirty = true;
        }
        cleared
    }

    /// Apply a relative transform change (zoom clamped, rotation wrapped).
    pub fn update_transform(&mut self, delta: TransformDelta) {
        if delta.is_noop() {
            return;
        }
        let before = self.transform;
        self.transform.apply(delta, self.zoom_bounds);
        if self.transform != before {
            self.dirty = true;
        }
    }

    /// Return pan, zoom and rotation to identity.
    pub fn reset_transform(&mut self) {
        let identity = Transform {
            zoom: self.zoom_bounds.clamp(1.0),
            ..Transform::default()
        };
        if self.transform != identity {
            self.transform = identity;
            self.dirty = true;
        }
    }

    /// Set blend opacity now; optionally schedule a restore to 1.
    ///
    /// Any restore scheduled by an earlier pulse is cancelled first, so a stale timer can never
    /// override a newer interaction.
    pub fn pulse_opacity(&mut self, pulse: OpacityPulse, now: Millis) {
        self.restore_due = pulse.restore_after.map(|d| now.saturating_add(d));
        let value = if pulse.value.is_nan() {
            1.0
        } else {
            pulse.value.clamp(0.0, 1.0)
        };
        if value != self.blend_opacity {
            self.blend_opacity = value;
            self.dirty = true;
        }
    }

    /// Fire a due opacity restore. Returns `true` when opacity changed.
    pub fn fire_due_timers(&mut self, now: Millis) -> bool {
        match self.restore_due {
            Some(due) if due <= now => {
                self.restore_due = None;
                if self.blend_opacity != 1.0 {
                    self.blend_opacity = 1.0;
                    self.dirty = true;
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Whether a redraw is owed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/store.rs"]
mod tests;
