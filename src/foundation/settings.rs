use std::path::Path;

use crate::foundation::core::{Point, SourceRect, Vec2};
use crate::foundation::error::{RigError, RigResult};
use crate::foundation::math::is_finite_vec;

/// Tunables shared by the pose and composition passes.
///
/// Every field has a default, so a settings file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RigSettings {
    /// World position of the root limb.
    pub canvas_anchor: Point,
    /// Multiplier applied to every wearable scale after the scale mode ran.
    pub display_scale: f64,
    /// Ragdoll texture scale folded in unless a wearable sets `ignore_ragdoll_scale`.
    pub ragdoll_scale: f64,
    /// Subtracted from the inherited depth so inherited-depth wearables draw above the limb.
    pub depth_epsilon: f64,
    /// Pick the legacy wearable scale computation.
    pub use_legacy_scale_logic: bool,
    /// Rectangle used when nothing resolvable is authored.
    pub default_source_rect: SourceRect,
    /// Origin used when nothing resolvable is authored.
    pub default_origin: Vec2,
    /// Overlay depth used when neither an explicit nor inherited depth exists.
    pub default_depth: f64,
}

impl Default for RigSettings {
    fn default() -> Self {
        Self {
            canvas_anchor: Point::new(400.0, 250.0),
            display_scale: 2.0,
            ragdoll_scale: 0.5,
            depth_epsilon: 0.01,
            use_legacy_scale_logic: false,
            default_source_rect: SourceRect::new(0.0, 0.0, 128.0, 128.0),
            default_origin: Vec2::new(0.5, 0.5),
            default_depth: 0.5,
        }
    }
}

impl RigSettings {
    /// Parse settings from JSON and validate them.
    pub fn from_json_str(s: &str) -> RigResult<Self> {
        let settings: Self = serde_json::from_str(s).map_err(|e| RigError::serde(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file and validate them.
    pub fn from_path(path: impl AsRef<Path>) -> RigResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            RigError::Other(anyhow::anyhow!("read settings '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    /// Reject values the passes cannot work with.
    pub fn validate(&self) -> RigResult<()> {
        if !(self.canvas_anchor.x.is_finite() && self.canvas_anchor.y.is_finite()) {
            return Err(RigError::validation("canvas_anchor must be finite"));
        }
        for (name, v) in [
            ("display_scale", self.display_scale),
            ("ragdoll_scale", self.ragdoll_scale),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(RigError::validation(format!("{name} must be > 0")));
            }
        }
        if !self.depth_epsilon.is_finite() {
            return Err(RigError::validation("depth_epsilon must be finite"));
        }
        if !self.default_source_rect.is_well_formed() {
            return Err(RigError::validation(
                "default_source_rect must be finite with a positive size",
            ));
        }
        if !is_finite_vec(self.default_origin) {
            return Err(RigError::validation("default_origin must be finite"));
        }
        if !self.default_depth.is_finite() {
            return Err(RigError::validation("default_depth must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/settings.rs"]
mod tests;
