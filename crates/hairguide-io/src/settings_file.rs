//! User settings persisted as TOML.
//!
//! A missing file is not an error: the first run starts from defaults and
//! writes the file on exit. Unknown keys are ignored and missing keys take
//! their default, so files written by older builds keep loading.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use hairguide_guides::GuideSettings;
use hairguide_scene::Scene;
use hairguide_types::{HairError, HairResult};

/// Viewport and window preferences. Stored for the front end; the engine
/// never reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Draw the ground grid.
    pub show_grid: bool,
    /// Draw the head mesh.
    pub show_mesh: bool,
    /// Draw the guide curves.
    pub show_guides: bool,
    /// Opacity of curves outside the selection.
    pub deselected_curve_opacity: f32,
    /// Control point size in pixels.
    pub guide_point_size_px: f32,
    /// Viewport clear colour, linear RGB.
    pub viewport_bg: [f32; 3],
    /// Show the keyboard and mouse help overlay.
    pub show_controls_overlay: bool,
    /// UI scale factor.
    pub ui_scale: f32,
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Start maximized.
    pub window_maximized: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_mesh: true,
            show_guides: true,
            deselected_curve_opacity: 0.35,
            guide_point_size_px: 6.0,
            viewport_bg: [0.10, 0.10, 0.11],
            show_controls_overlay: true,
            ui_scale: 1.0,
            window_width: 1600,
            window_height: 900,
            window_maximized: false,
        }
    }
}

/// Everything remembered between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Solver and authoring defaults.
    pub guides: GuideSettings,
    /// Viewport and window preferences.
    pub display: DisplaySettings,
}

impl UserSettings {
    /// Parses TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> HairResult<Self> {
        toml::from_str(text).map_err(|e| HairError::Serialization(e.to_string()))
    }

    /// Serializes to pretty TOML.
    pub fn to_toml_string(&self) -> HairResult<String> {
        toml::to_string_pretty(self).map_err(|e| HairError::Serialization(e.to_string()))
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> HairResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let settings = Self::from_toml_str(&text)?;
                info!(path = %path.display(), "user settings loaded");
                Ok(settings)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file; using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> HairResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        info!(path = %path.display(), "user settings saved");
        Ok(())
    }

    /// Takes the scene's guide settings, keeping `display` as it is.
    pub fn capture(&mut self, scene: &Scene) {
        self.guides = scene.settings().clone();
    }

    /// Installs the guide settings into `scene`.
    pub fn apply_to(&self, scene: &mut Scene) {
        *scene.settings_mut() = self.guides.clone();
    }
}
