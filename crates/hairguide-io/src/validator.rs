//! Document and settings validation.
//!
//! Structural problems (unknown format version, broken mesh, non-finite
//! curve data, bindings past the end of the mesh) are errors. Settings
//! outside their useful range are only reported: the engine clamps them at
//! the point of use.

use std::collections::HashSet;

use hairguide_guides::GuideSettings;
use hairguide_mesh::TriangleMesh;
use hairguide_types::constants::{
    MAX_CURVE_STEPS, MAX_SOLVER_ITERATIONS, MIN_CURVE_STEPS, MIN_SOLVER_ITERATIONS,
};
use hairguide_types::{HairError, HairResult, TriangleId};

use crate::scene_file::{SceneDocument, SCENE_FORMAT_VERSION};

/// Non-fatal findings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Human-readable warnings, in discovery order.
    pub warnings: Vec<String>,
}

/// Validates a scene document.
///
/// `mesh` is the mesh the curves will bind to (the embedded one, or the
/// scene's). Without one, triangle indices are not range-checked.
pub fn validate_document(doc: &SceneDocument, mesh: Option<&TriangleMesh>) -> HairResult<ValidationReport> {
    if doc.version == 0 || doc.version > SCENE_FORMAT_VERSION {
        return Err(HairError::InvalidConfig(format!(
            "Unsupported scene format version {} (expected 1..={})",
            doc.version, SCENE_FORMAT_VERSION
        )));
    }

    if let Some(embedded) = &doc.mesh {
        embedded
            .validate()
            .map_err(|e| HairError::InvalidMesh(format!("Embedded mesh: {}", e)))?;
    }

    let mut seen = HashSet::new();
    for layer in &doc.layers {
        if !seen.insert(layer.id) {
            return Err(HairError::InvalidConfig(format!(
                "Duplicate layer id {}",
                layer.id.0
            )));
        }
    }

    for (i, record) in doc.curves.iter().enumerate() {
        if let Some(j) = record.points.iter().position(|p| p.iter().any(|v| !v.is_finite())) {
            return Err(HairError::InvalidCurve(format!(
                "Curve {}: point {} is not finite",
                i, j
            )));
        }
        if record.root_bary.iter().any(|v| !v.is_finite()) {
            return Err(HairError::InvalidCurve(format!(
                "Curve {}: root barycentrics are not finite",
                i
            )));
        }
        if record.root_triangle < -1 {
            return Err(HairError::InvalidBinding {
                triangle: record.root_triangle,
                triangle_count: mesh.map_or(0, TriangleMesh::triangle_count),
            });
        }
        if let (Some(t), Some(mesh)) = (TriangleId::from_signed(record.root_triangle), mesh) {
            if mesh.triangle_vertices(t).is_none() {
                return Err(HairError::InvalidBinding {
                    triangle: record.root_triangle,
                    triangle_count: mesh.triangle_count(),
                });
            }
        }
    }

    let mut report = ValidationReport {
        warnings: settings_warnings(&doc.settings),
    };
    let short = doc.curves.iter().filter(|c| c.points.len() < 2).count();
    if short > 0 {
        report
            .warnings
            .push(format!("{} curve(s) have fewer than 2 points and will be skipped", short));
    }
    Ok(report)
}

/// Validates a settings record: non-finite values are errors, values the
/// engine will clamp are warnings.
pub fn validate_settings(settings: &GuideSettings) -> HairResult<ValidationReport> {
    let floats = [
        ("default_length", settings.default_length),
        ("collision_thickness", settings.collision_thickness),
        ("friction", settings.friction),
        ("gravity", settings.gravity),
        ("damping", settings.damping),
        ("bend_stiffness", settings.bend_stiffness),
        ("drag_smoothing", settings.drag_smoothing),
        ("gravity_override", settings.gravity_override),
    ];
    if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
        return Err(HairError::InvalidConfig(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    Ok(ValidationReport {
        warnings: settings_warnings(settings),
    })
}

fn settings_warnings(s: &GuideSettings) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut check = |ok: bool, message: String| {
        if !ok {
            warnings.push(message);
        }
    };
    check(
        (MIN_CURVE_STEPS..=MAX_CURVE_STEPS).contains(&s.default_steps),
        format!(
            "default_steps {} will be clamped to [{}, {}]",
            s.default_steps, MIN_CURVE_STEPS, MAX_CURVE_STEPS
        ),
    );
    check(
        (MIN_SOLVER_ITERATIONS..=MAX_SOLVER_ITERATIONS).contains(&s.solver_iterations),
        format!(
            "solver_iterations {} will be clamped to [{}, {}]",
            s.solver_iterations, MIN_SOLVER_ITERATIONS, MAX_SOLVER_ITERATIONS
        ),
    );
    check(
        s.collision_thickness >= 0.0,
        format!("collision_thickness {} is negative", s.collision_thickness),
    );
    check(
        (0.0..=1.0).contains(&s.friction),
        format!("friction {} will be clamped to [0, 1]", s.friction),
    );
    check(
        (0.0..=1.0).contains(&s.damping),
        format!("damping {} will be clamped to [0, 1]", s.damping),
    );
    check(
        (0.0..=1.0).contains(&s.bend_stiffness),
        format!("bend_stiffness {} will be clamped to [0, 1]", s.bend_stiffness),
    );
    check(
        (0.05..=1.0).contains(&s.drag_smoothing),
        format!("drag_smoothing {} will be clamped to [0.05, 1]", s.drag_smoothing),
    );
    check(
        s.gravity >= 0.0,
        format!("gravity {} is negative and acts as zero", s.gravity),
    );
    warnings
}
