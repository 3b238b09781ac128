//! Physical constants, simulation defaults and safety-net thresholds.
//!
//! All lengths are meters, all times seconds.

/// Gravitational acceleration (m/s²). Also the default gravity-override value.
pub const GRAVITY: f32 = 9.81;

/// Fixed physics step (seconds).
pub const FIXED_DT: f32 = 1.0 / 120.0;

/// Largest frame delta fed to the accumulator (seconds).
pub const MAX_FRAME_DT: f32 = 1.0 / 15.0;

/// Upper bound on physics steps taken in one frame.
pub const MAX_STEPS_PER_FRAME: u32 = 8;

/// Implied speed above which a vertex's velocity is zeroed (m/s).
pub const MAX_REASONABLE_SPEED: f32 = 50.0;

/// Post-step warning threshold on implied speed (m/s).
pub const WARN_SPEED: f32 = 10.0;

/// Post-step warning threshold on distance from the origin (m).
pub const WARN_DISTANCE: f32 = 5.0;

/// Only every Nth motion warning is logged.
pub const WARN_EVERY: u32 = 60;

/// Fewest control points per curve.
pub const MIN_CURVE_STEPS: usize = 2;
/// Most control points per curve.
pub const MAX_CURVE_STEPS: usize = 256;

/// Fewest constraint passes per step.
pub const MIN_SOLVER_ITERATIONS: u32 = 1;
/// Most constraint passes per step.
pub const MAX_SOLVER_ITERATIONS: u32 = 64;

/// Shortest curve length accepted by resampling (m).
pub const MIN_CURVE_LENGTH: f32 = 0.001;

/// BVH nodes with at most this many triangles become leaves.
pub const BVH_LEAF_SIZE: usize = 8;

/// Offset of the inside-test ray origin along +X.
pub const INSIDE_RAY_OFFSET: f32 = 1.0e-5;

/// Minimum ray parameter accepted as a real crossing.
pub const RAY_T_MIN: f32 = 1.0e-6;

/// Ray distance used to pick control points (m).
pub const PICK_POINT_THRESHOLD: f32 = 0.015;

/// Ray distance used to pick whole curves (m).
pub const PICK_CURVE_THRESHOLD: f32 = 0.025;

/// Catmull-Rom samples per segment for smooth presentation.
pub const SMOOTH_SAMPLES_PER_SEGMENT: usize = 8;

/// Scale applied to centimetre-authored meshes on import.
pub const MESH_IMPORT_SCALE: f32 = 0.01;

/// Coarsest distance-field grid, samples per axis.
pub const MIN_FIELD_RESOLUTION: usize = 16;
/// Finest distance-field grid, samples per axis.
pub const MAX_FIELD_RESOLUTION: usize = 256;
/// Distance-field grid used unless the scene asks for another.
pub const DEFAULT_FIELD_RESOLUTION: usize = 96;
/// Margin added around the mesh bounds before baking the field (m).
pub const DEFAULT_FIELD_PADDING: f32 = 0.03;

/// Maximum distance a re-bound PLY root may move onto the surface (m).
pub const DEFAULT_REBIND_TOLERANCE: f32 = 0.01;

/// Largest distance a mirrored curve root may snap onto the surface (m).
pub const MIRROR_SNAP_DISTANCE: f32 = 0.05;
