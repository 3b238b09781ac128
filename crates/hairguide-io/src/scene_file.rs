//! JSON scene documents.
//!
//! A document is a field-for-field snapshot of the session. Restoring it
//! goes through the same curve-creation path as interactive editing, then
//! overwrites the points with the saved ones.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use hairguide_guides::{GuideSettings, HairCurve, Layer};
use hairguide_math::curve::polyline_length;
use hairguide_math::Vec3;
use hairguide_mesh::TriangleMesh;
use hairguide_scene::Scene;
use hairguide_types::{HairError, HairResult, LayerId, TriangleId};

use crate::validator::{validate_document, ValidationReport};

/// Current document format.
pub const SCENE_FORMAT_VERSION: u32 = 1;

/// One saved curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRecord {
    /// Bound triangle, `-1` when the curve is free.
    #[serde(default = "unbound")]
    pub root_triangle: i64,
    /// Barycentric weights of the root binding.
    #[serde(default)]
    pub root_bary: [f32; 3],
    /// Control points, root first.
    pub points: Vec<[f32; 3]>,
    /// Layer the curve belongs to.
    #[serde(default)]
    pub layer: LayerId,
    /// Per-curve visibility.
    #[serde(default = "visible")]
    pub visible: bool,
    /// Whether the curve was selected when saved.
    #[serde(default)]
    pub selected: bool,
}

fn unbound() -> i64 {
    -1
}

fn visible() -> bool {
    true
}

/// A saved session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Format version, see [`SCENE_FORMAT_VERSION`].
    pub version: u32,
    /// Where the mesh was loaded from. Informational; loading files is the
    /// caller's business.
    #[serde(default)]
    pub mesh_path: Option<String>,
    /// The mesh itself, when the document is self-contained.
    #[serde(default)]
    pub mesh: Option<TriangleMesh>,
    /// Solver and authoring settings.
    #[serde(default)]
    pub settings: GuideSettings,
    /// Layers, default first.
    #[serde(default)]
    pub layers: Vec<Layer>,
    /// Curves in index order.
    #[serde(default)]
    pub curves: Vec<CurveRecord>,
}

/// What [`SceneDocument::apply`] restored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    /// Curves added to the scene.
    pub restored: usize,
    /// Records with fewer than two points.
    pub skipped: usize,
    /// Bound records restored free because no mesh was available.
    pub unbound: usize,
    /// Non-fatal validation findings.
    pub warnings: Vec<String>,
}

impl CurveRecord {
    fn capture(curve: &HairCurve, selected: bool) -> Self {
        Self {
            root_triangle: TriangleId::to_signed(curve.root.map(|b| b.triangle)),
            root_bary: curve.root.map_or([0.0; 3], |b| b.bary.to_array()),
            points: curve.points.iter().map(|p| p.to_array()).collect(),
            layer: curve.layer,
            visible: curve.visible,
            selected,
        }
    }

    /// Control points as vectors.
    pub fn points(&self) -> Vec<Vec3> {
        self.points.iter().map(|&p| Vec3::from_array(p)).collect()
    }
}

impl SceneDocument {
    /// Snapshots `scene`. With `embed_mesh` the mesh travels along.
    pub fn capture(scene: &Scene, embed_mesh: bool) -> Self {
        let guides = scene.guides();
        Self {
            version: SCENE_FORMAT_VERSION,
            mesh_path: scene.mesh_path().map(|p| p.to_string_lossy().into_owned()),
            mesh: if embed_mesh { scene.mesh().cloned() } else { None },
            settings: scene.settings().clone(),
            layers: guides.layers().to_vec(),
            curves: guides
                .curves()
                .iter()
                .enumerate()
                .map(|(i, c)| CurveRecord::capture(c, guides.is_curve_selected(i)))
                .collect(),
        }
    }

    /// Restores the document into `scene`, replacing its curves, layers
    /// and settings.
    ///
    /// An embedded mesh replaces the scene's mesh; otherwise the scene's
    /// current mesh (if any) is used for binding. The document is
    /// validated first and nothing changes if that fails.
    pub fn apply(&self, scene: &mut Scene) -> HairResult<ApplyReport> {
        let mesh_for_check = self.mesh.as_ref().or(scene.mesh());
        let ValidationReport { warnings } = validate_document(self, mesh_for_check)?;

        if let Some(mesh) = &self.mesh {
            let path = self.mesh_path.as_deref().map(Path::new);
            scene.load_mesh(mesh.clone(), path)?;
        }

        scene.clear_guides();
        *scene.settings_mut() = self.settings.clone();
        scene.guides_mut().set_layers(self.layers.clone());

        let mut report = ApplyReport {
            warnings,
            ..Default::default()
        };
        let has_mesh = scene.mesh().is_some();
        for (i, record) in self.curves.iter().enumerate() {
            let points = record.points();
            if points.len() < 2 {
                warn!(record = i, points = points.len(), "skipping curve with fewer than 2 points");
                report.skipped += 1;
                continue;
            }
            let rest = polyline_length(&points) / (points.len() - 1) as f32;
            let triangle = TriangleId::from_signed(record.root_triangle);

            let index = match triangle {
                Some(t) if has_mesh => {
                    let index = scene.add_curve(Some(t), Vec3::from_array(record.root_bary), points[0], Vec3::Y)?;
                    if let Some(curve) = scene.guides_mut().curve_mut(index) {
                        curve.prev_points.clone_from(&points);
                        curve.points = points;
                        curve.segment_rest_len = rest;
                    }
                    index
                }
                _ => {
                    if triangle.is_some() {
                        warn!(record = i, "no mesh to bind to; restoring curve free");
                        report.unbound += 1;
                    }
                    scene.guides_mut().push_curve(HairCurve::from_points(points, rest))
                }
            };

            let guides = scene.guides_mut();
            if !guides.set_curve_layer(index, record.layer) {
                report
                    .warnings
                    .push(format!("curve {} references unknown layer {}", i, record.layer.0));
            }
            if let Some(curve) = guides.curve_mut(index) {
                curve.visible = record.visible;
            }
            if record.selected {
                guides.select_curve(index, true);
            }
            report.restored += 1;
        }

        info!(
            curves = report.restored,
            skipped = report.skipped,
            unbound = report.unbound,
            "scene document applied"
        );
        Ok(report)
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> HairResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| HairError::Serialization(e.to_string()))
    }

    /// Parses a JSON document.
    pub fn from_json(json: &str) -> HairResult<Self> {
        serde_json::from_str(json).map_err(|e| HairError::Serialization(e.to_string()))
    }

    /// Writes the document to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> HairResult<()> {
        fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), curves = self.curves.len(), "scene saved");
        Ok(())
    }

    /// Reads a document from `path`.
    pub fn load(path: &Path) -> HairResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Saves `scene` to `path`.
pub fn save_scene(scene: &Scene, path: &Path, embed_mesh: bool) -> HairResult<()> {
    SceneDocument::capture(scene, embed_mesh).save(path)
}

/// Loads the document at `path` into `scene`.
pub fn load_scene(scene: &mut Scene, path: &Path) -> HairResult<ApplyReport> {
    SceneDocument::load(path)?.apply(scene)
}
