use std::path::Path;

use anyhow::Context as _;

use crate::{
    TwibbonError, TwibbonResult,
    foundation::core::Rgba8,
    input::interpreter::InputOpts,
    layers::transform::ZoomBounds,
    render::export::DEFAULT_EXPORT_FILE_NAME,
};

/// Editor configuration.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorOpts {
    /// Gesture tuning.
    pub input: InputOpts,
    /// Allowed zoom range.
    pub zoom_bounds: ZoomBounds,
    /// Fill color while no photo is present.
    pub background: Rgba8,
    /// Download name for exported PNGs.
    pub export_file_name: String,
}

impl Default for EditorOpts {
    fn default() -> Self {
        Self {
            input: InputOpts::default(),
            zoom_bounds: ZoomBounds::default(),
            background: Rgba8::WHITE,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl EditorOpts {
    /// Load options from a JSON file.
    pub fn from_path(path: &Path) -> TwibbonResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read editor options '{}'", path.display()))?;
        let opts: Self =
            serde_json::from_str(&text).map_err(|e| TwibbonError::serde(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Apply `TWIBBON_EXPORT_FILE_NAME` and `TWIBBON_DRAG_SENSITIVITY` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(name) = std::env::var("TWIBBON_EXPORT_FILE_NAME")
            .ok()
            .filter(|v| !v.trim().is_empty())
        {
            self.export_file_name = name;
        }
        if let Some(s) = std::env::var("TWIBBON_DRAG_SENSITIVITY")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|s| s.is_finite() && *s > 0.0)
        {
            self.input.drag_sensitivity = s;
        }
        self
    }

    /// Return options with a different zoom range.
    pub fn with_zoom_bounds(mut self, min: f64, max: f64) -> Self {
        self.zoom_bounds = ZoomBounds { min, max };
        self
    }

    /// Return options with a different export file name.
    pub fn with_export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = name.into();
        self
    }

    /// Return options with different gesture tuning.
    pub fn with_input(mut self, input: InputOpts) -> Self {
        self.input = input;
        self
    }

    /// Check ranges that would make the editor misbehave.
    pub fn validate(&self) -> TwibbonResult<()> {
        let z = self.zoom_bounds;
        if !(z.min.is_finite() && z.max.is_finite() && z.min > 0.0 && z.min <= z.max) {
            return Err(TwibbonError::validation(
                "zoom bounds must be finite with 0 < min <= max",
            ));
        }
        let i = &self.input;
        if !(i.drag_sensitivity.is_finite() && i.drag_sensitivity > 0.0) {
            return Err(TwibbonError::validation("drag_sensitivity must be > 0"));
        }
        if !(i.pinch_divisor.is_finite() && i.pinch_divisor > 0.0) {
            return Err(TwibbonError::validation("pinch_divisor must be > 0"));
        }
        if !(i.wheel_divisor.is_finite() && i.wheel_divisor > 0.0) {
            return Err(TwibbonError::validation("wheel_divisor must be > 0"));
        }
        if !(0.0..=1.0).contains(&i.pulse_opacity) {
            return Err(TwibbonError::validation("pulse_opacity must be in [0, 1]"));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(TwibbonError::validation("export_file_name must not be empty"));
        }
        Ok(())
    }
}
