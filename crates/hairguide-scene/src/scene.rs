//! Scene ownership: mesh, caches, guides, settings.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use hairguide_contact::{nearest_on_mesh, raycast_mesh, MeshBvh, MeshDistanceField, RayHit};
use hairguide_guides::{GuideSettings, HairGuideSet};
use hairguide_math::{Aabb, Ray, Vec3};
use hairguide_mesh::normals::compute_vertex_normals;
use hairguide_mesh::TriangleMesh;
use hairguide_solver::{FixedTimestep, Interaction, SolverBackend};
use hairguide_telemetry::{EventBus, EventKind, GuideEvent};
use hairguide_types::constants::{
    DEFAULT_FIELD_PADDING, DEFAULT_FIELD_RESOLUTION, MAX_FIELD_RESOLUTION, MIN_FIELD_RESOLUTION,
};
use hairguide_types::HairResult;

use crate::drag::DragPlane;

/// An authoring session.
///
/// Everything lives on one thread. The BVH is rebuilt eagerly whenever
/// the mesh changes; the distance field is built on demand for backends
/// that read it.
pub struct Scene {
    pub(crate) mesh: Option<TriangleMesh>,
    pub(crate) mesh_path: Option<PathBuf>,
    /// Last version handed out; bumped by every [`load_mesh`](Self::load_mesh).
    pub(crate) mesh_version: u64,
    pub(crate) bvh: Option<MeshBvh>,
    pub(crate) field: Option<MeshDistanceField>,
    pub(crate) field_resolution: usize,

    pub(crate) guides: HairGuideSet,
    pub(crate) settings: GuideSettings,
    pub(crate) interaction: Interaction,
    pub(crate) drag_plane: Option<DragPlane>,

    pub(crate) driver: FixedTimestep,
    pub(crate) backend: SolverBackend,
    pub(crate) events: EventBus,
    /// Physics steps taken so far.
    pub(crate) step_count: u64,
    /// Simulated seconds so far.
    pub(crate) sim_time: f64,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("mesh_path", &self.mesh_path)
            .field("mesh_version", &self.mesh_version)
            .field("curves", &self.guides.len())
            .field("backend", &self.backend)
            .field("step_count", &self.step_count)
            .finish()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty scene with default settings and the CPU solver.
    pub fn new() -> Self {
        Self::with_backend(SolverBackend::default())
    }

    /// An empty scene driven by `backend`.
    pub fn with_backend(backend: SolverBackend) -> Self {
        Self {
            mesh: None,
            mesh_path: None,
            mesh_version: 0,
            bvh: None,
            field: None,
            field_resolution: DEFAULT_FIELD_RESOLUTION,
            guides: HairGuideSet::new(),
            settings: GuideSettings::default(),
            interaction: Interaction::new(),
            drag_plane: None,
            driver: FixedTimestep::default(),
            backend,
            events: EventBus::new(),
            step_count: 0,
            sim_time: 0.0,
        }
    }

    /// Replaces the settings.
    pub fn with_settings(mut self, settings: GuideSettings) -> Self {
        self.settings = settings;
        self
    }

    // ─── Mesh ─────────────────────────────────────────────────

    /// Replaces the head mesh.
    ///
    /// The mesh is validated, given vertex normals if it has none and
    /// stamped with a fresh version. Existing curves are kept; their
    /// bindings now refer to the old version and unpin on the next step.
    /// Returns the new version.
    pub fn load_mesh(&mut self, mut mesh: TriangleMesh, path: Option<&Path>) -> HairResult<u64> {
        mesh.validate()?;
        if !mesh.has_normals() {
            compute_vertex_normals(&mut mesh);
        }
        self.mesh_version += 1;
        let version = self.mesh_version;
        let mesh = mesh.with_version(version);

        self.bvh = Some(MeshBvh::build(&mesh));
        self.field = None;
        self.mesh_path = path.map(Path::to_path_buf);
        info!(
            path = ?self.mesh_path,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            version,
            "mesh loaded"
        );
        self.events.emit(GuideEvent::new(
            self.step_count,
            EventKind::MeshReloaded {
                version,
                triangles: mesh.triangle_count(),
            },
        ));
        self.events.flush();
        self.mesh = Some(mesh);
        Ok(version)
    }

    /// Moves mesh vertices in place (morph targets, sculpting).
    ///
    /// The version is kept, so bound roots follow their triangles on the
    /// next step. Caches are rebuilt. Returns false without a mesh.
    pub fn deform_mesh<F>(&mut self, deform: F) -> bool
    where
        F: FnOnce(&mut TriangleMesh),
    {
        let Some(mesh) = self.mesh.as_mut() else {
            return false;
        };
        deform(mesh);
        if mesh.has_normals() {
            compute_vertex_normals(mesh);
        }
        self.bvh = Some(MeshBvh::build(mesh));
        self.field = None;
        true
    }

    /// Drops the mesh and its caches. Curves are kept.
    pub fn unload_mesh(&mut self) {
        self.mesh = None;
        self.mesh_path = None;
        self.bvh = None;
        self.field = None;
    }

    /// The loaded mesh.
    pub fn mesh(&self) -> Option<&TriangleMesh> {
        self.mesh.as_ref()
    }

    /// Where the mesh was loaded from, if known.
    pub fn mesh_path(&self) -> Option<&Path> {
        self.mesh_path.as_deref()
    }

    /// Version stamped on the most recently loaded mesh.
    pub fn mesh_version(&self) -> u64 {
        self.mesh_version
    }

    /// Bounds of the loaded mesh, for framing.
    pub fn mesh_bounds(&self) -> Option<Aabb> {
        self.mesh.as_ref().map(TriangleMesh::bounds)
    }

    /// BVH of the loaded mesh.
    pub fn bvh(&self) -> Option<&MeshBvh> {
        self.bvh.as_ref()
    }

    /// The cached distance field, if one has been built for this mesh.
    pub fn distance_field(&self) -> Option<&MeshDistanceField> {
        self.field.as_ref()
    }

    /// Sets the grid resolution used the next time the field is built.
    pub fn set_field_resolution(&mut self, resolution: usize) {
        let resolution = resolution.clamp(MIN_FIELD_RESOLUTION, MAX_FIELD_RESOLUTION);
        if resolution != self.field_resolution {
            self.field_resolution = resolution;
            self.field = None;
        }
    }

    /// Builds the distance field unless a current one is cached.
    pub fn ensure_distance_field(&mut self) -> Option<&MeshDistanceField> {
        let (Some(mesh), Some(bvh)) = (self.mesh.as_ref(), self.bvh.as_ref()) else {
            return None;
        };
        let fresh = self
            .field
            .as_ref()
            .is_some_and(|f| f.mesh_version() == mesh.version && f.resolution() == self.field_resolution);
        if !fresh {
            debug!(resolution = self.field_resolution, "building mesh distance field");
            self.field = MeshDistanceField::build(mesh, bvh, self.field_resolution, DEFAULT_FIELD_PADDING);
        }
        self.field.as_ref()
    }

    /// Nearest mesh hit along `ray`.
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        let (mesh, bvh) = (self.mesh.as_ref()?, self.bvh.as_ref()?);
        raycast_mesh(bvh, mesh, ray)
    }

    /// Closest mesh surface point within `max_distance` of `p`.
    pub fn nearest_surface(&self, p: Vec3, max_distance: f32) -> Option<RayHit> {
        let (mesh, bvh) = (self.mesh.as_ref()?, self.bvh.as_ref()?);
        nearest_on_mesh(bvh, mesh, p, max_distance)
    }

    // ─── Guides and settings ──────────────────────────────────

    /// The curve store.
    pub fn guides(&self) -> &HairGuideSet {
        &self.guides
    }

    /// Direct access to the curve store. Mirror pairs are re-validated
    /// against the selection at the start of the next frame.
    pub fn guides_mut(&mut self) -> &mut HairGuideSet {
        &mut self.guides
    }

    /// Removes every curve and ends any drag.
    pub fn clear_guides(&mut self) {
        self.guides.clear();
        self.interaction.drag = None;
        self.interaction.mirror.clear();
        self.drag_plane = None;
    }

    /// Current settings.
    pub fn settings(&self) -> &GuideSettings {
        &self.settings
    }

    /// Mutable settings. Takes effect on the next step.
    pub fn settings_mut(&mut self) -> &mut GuideSettings {
        &mut self.settings
    }

    /// Restores default settings. Mesh and curves are kept.
    pub fn reset_settings(&mut self) {
        self.settings = GuideSettings::default();
    }

    /// Drag, gravity override and mirror state.
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Presses or releases the gravity override.
    pub fn set_gravity_override_held(&mut self, held: bool) {
        self.interaction.gravity_override_held = held;
    }

    /// True while the gravity override is held.
    pub fn gravity_override_held(&self) -> bool {
        self.interaction.gravity_override_held
    }

    /// Gravity `curve` would receive on the next step.
    pub fn effective_gravity(&self, curve: usize) -> f32 {
        self.interaction
            .effective_gravity(curve, self.guides.active_curve(), &self.settings)
    }

    // ─── Simulation plumbing ──────────────────────────────────

    /// The solver backend.
    pub fn backend(&self) -> &SolverBackend {
        &self.backend
    }

    /// The fixed-timestep driver.
    pub fn driver(&self) -> &FixedTimestep {
        &self.driver
    }

    /// The telemetry bus.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Physics steps run since creation.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Simulated time since creation (seconds).
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }
}
