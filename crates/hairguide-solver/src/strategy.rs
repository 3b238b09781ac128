//! Solver strategy trait, the step contract every backend implements.

use hairguide_contact::{ContactResult, MeshBvh, MeshDistanceField};
use hairguide_guides::{BindingFault, GuideSettings, HairGuideSet};
use hairguide_mesh::TriangleMesh;

use crate::interaction::Interaction;

/// Read-only inputs to one physics step.
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    /// Current collision mesh.
    pub mesh: &'a TriangleMesh,
    /// BVH of `mesh`'s current version.
    pub bvh: &'a MeshBvh,
    /// Baked nearest-surface grid, present when the active backend asked for it.
    pub field: Option<&'a MeshDistanceField>,
    /// Solver settings for this step.
    pub settings: &'a GuideSettings,
    /// Drag, gravity override and mirror state.
    pub interaction: &'a Interaction,
}

/// A rate-limited report of implausible curve motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionWarning {
    /// Index of the curve.
    pub curve: usize,
    /// Largest implied speed after the step (m/s).
    pub max_speed: f32,
    /// Largest distance of any point from the origin (m).
    pub max_distance: f32,
}

/// Outcome of a step. Nothing inside a step fails; repairs and removals
/// are reported here instead.
#[derive(Debug, Clone, Default)]
pub struct StepResult {
    /// Curves integrated this step.
    pub simulated_curves: u32,
    /// Constraint relaxation passes per curve.
    pub iterations: u32,
    /// Curves deleted for holding non-finite points, as pre-step indices in
    /// descending order.
    pub removed_curves: Vec<usize>,
    /// Roots whose binding failed and were unpinned.
    pub unpinned: Vec<(usize, BindingFault)>,
    /// Implied velocities zeroed by the safety clamp.
    pub clamped_velocities: u32,
    /// Rate-limited motion warnings.
    pub motion_warnings: Vec<MotionWarning>,
    /// Mesh pushouts resolved this step.
    pub mesh_contacts: ContactResult,
    /// Curve-curve separations resolved this step.
    pub curve_contacts: ContactResult,
    /// Worst `|segment - rest|` over all simulated curves after the step.
    pub max_stretch_error: f32,
    /// Wall-clock time for this step (seconds).
    pub wall_time: f64,
}

/// Trait for guide solvers.
///
/// The driver calls `step` once per fixed substep:
///
/// ```text
/// for _ in 0..driver.advance(frame_dt) {
///     let result = solver.step(&mut guides, &ctx, FIXED_DT);
///     interaction.apply_removals(&result.removed_curves);
/// }
/// ```
///
/// Implementations must honour the same contract: re-pin roots, simulate
/// selected curves only, keep point 0 and the dragged vertex pinned, delete
/// curves that turned non-finite, then run curve-curve collision.
pub trait SolverStrategy: Send {
    /// Advance the selected curves by `dt` seconds.
    fn step(&mut self, guides: &mut HairGuideSet, ctx: &StepContext<'_>, dt: f32) -> StepResult;

    /// Returns the solver's name.
    fn name(&self) -> &str;

    /// True if the solver reads [`StepContext::field`] instead of the BVH.
    fn uses_distance_field(&self) -> bool {
        false
    }
}
