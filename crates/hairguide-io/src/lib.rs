//! # hairguide-io
//!
//! Persistence boundary of the hairguide engine.
//!
//! - [`scene_file`] — JSON scene documents (settings, layers, curves,
//!   optionally the mesh itself)
//! - [`settings_file`] — TOML user settings that outlive a scene
//! - [`ply`] — ASCII PLY point clouds of guide curves
//! - [`rebind`] — Re-anchoring imported strands on the current mesh
//! - [`validator`] — Structural checks run before anything is applied

pub mod ply;
pub mod rebind;
pub mod scene_file;
pub mod settings_file;
pub mod validator;

pub use ply::{export_ply, import_ply, read_ply, write_ply, PlyCurve, PlyDocument, PlyExportOptions};
pub use rebind::{import_into_scene, ImportReport};
pub use scene_file::{load_scene, save_scene, ApplyReport, CurveRecord, SceneDocument};
pub use settings_file::{DisplaySettings, UserSettings};
pub use validator::{validate_document, validate_settings, ValidationReport};
