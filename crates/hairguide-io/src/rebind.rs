//! Re-binding imported curves to the scene mesh.

use std::collections::HashSet;

use tracing::{info, warn};
use hairguide_math::curve::polyline_length;
use hairguide_scene::Scene;
use hairguide_types::constants::DEFAULT_REBIND_TOLERANCE;
use hairguide_types::{HairError, HairResult};

use crate::ply::PlyDocument;

/// Outcome of [`import_into_scene`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Curves added to the scene.
    pub imported: usize,
    /// Curves whose root had no surface within tolerance, or with fewer
    /// than two usable points.
    pub rejected: usize,
    /// Layers created for ids the scene did not have.
    pub layers_added: usize,
    /// Scene indices of the imported curves.
    pub curves: Vec<usize>,
}

/// Adds the curves of `doc` to `scene`, binding each root to the nearest
/// surface point within `tolerance` metres.
///
/// The root is the curve's anchor point (points before it are dropped), or
/// its first point without one. Layers the scene lacks are added; existing
/// ids keep their current name and colour.
pub fn import_into_scene(scene: &mut Scene, doc: &PlyDocument, tolerance: f32) -> HairResult<ImportReport> {
    if scene.mesh().is_none() {
        return Err(HairError::InvalidMesh(
            "a mesh must be loaded before importing curves".into(),
        ));
    }
    let tolerance = if tolerance.is_finite() && tolerance >= 0.0 {
        tolerance
    } else {
        warn!(tolerance, "invalid re-bind tolerance; using default");
        DEFAULT_REBIND_TOLERANCE
    };

    let mut report = ImportReport::default();

    let known: HashSet<_> = scene.guides().layers().iter().map(|l| l.id).collect();
    let mut layers = scene.guides().layers().to_vec();
    for layer in doc.layers.iter().filter(|l| !known.contains(&l.id)) {
        layers.push(layer.clone());
        report.layers_added += 1;
    }
    if report.layers_added > 0 {
        scene.guides_mut().set_layers(layers);
    }

    for (i, curve) in doc.curves.iter().enumerate() {
        let start = curve.anchor.unwrap_or(0);
        let mut points = curve.points.get(start..).unwrap_or_default().to_vec();
        if points.len() < 2 || points.iter().any(|p| !p.is_finite()) {
            warn!(curve = i, points = points.len(), "rejecting imported curve with unusable points");
            report.rejected += 1;
            continue;
        }
        let Some(hit) = scene.nearest_surface(points[0], tolerance) else {
            warn!(curve = i, root = ?points[0], tolerance, "no surface near imported root; rejected");
            report.rejected += 1;
            continue;
        };

        let index = scene.add_curve(Some(hit.triangle), hit.bary, hit.position, hit.normal)?;
        points[0] = hit.position;
        let rest = polyline_length(&points) / (points.len() - 1) as f32;

        let guides = scene.guides_mut();
        if let Some(c) = guides.curve_mut(index) {
            c.prev_points.clone_from(&points);
            c.points = points;
            c.segment_rest_len = rest;
        }
        guides.set_curve_layer(index, curve.layer);
        report.curves.push(index);
        report.imported += 1;
    }

    info!(
        imported = report.imported,
        rejected = report.rejected,
        layers_added = report.layers_added,
        tolerance,
        "PLY curves re-bound"
    );
    Ok(report)
}
