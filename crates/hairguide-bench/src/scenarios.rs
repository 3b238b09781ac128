//! Benchmark scenarios: procedural mesh, where curves grow and how the
//! session is driven.
//!
//! Three canonical scenarios for regression testing:
//! 1. **Head drape**: curves spread over a sphere "head" fall under gravity
//! 2. **Drag stress**: one curve's tip is dragged in circles every substep
//! 3. **Curve crowd**: a dense patch of horizontal curves piles up with
//!    curve-curve collision enabled

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use hairguide_guides::GuideSettings;
use hairguide_math::{Ray, Vec3};
use hairguide_mesh::generators::{cube, uv_sphere};
use hairguide_mesh::TriangleMesh;
use hairguide_types::constants::GRAVITY;

/// Radius of the sphere standing in for a head (m).
pub const HEAD_RADIUS: f32 = 0.12;

/// Which benchmark scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Curves hanging from a head under gravity.
    HeadDrape,
    /// One curve's tip dragged in circles.
    DragStress,
    /// Many curves packed close together.
    CurveCrowd,
}

impl ScenarioKind {
    /// Every scenario, in run order.
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::HeadDrape,
            ScenarioKind::DragStress,
            ScenarioKind::CurveCrowd,
        ]
    }

    /// Stable name used on the command line and in CSV output.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::HeadDrape => "head_drape",
            ScenarioKind::DragStress => "drag_stress",
            ScenarioKind::CurveCrowd => "curve_crowd",
        }
    }

    /// Parses a name produced by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.name() == name)
    }
}

/// Scripted drag: the tip of one curve follows a circle in the view plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragScript {
    /// Index of the creation ray whose curve is dragged.
    pub curve: usize,
    /// Circle radius (m).
    pub amplitude: f32,
    /// Seconds per revolution.
    pub period: f32,
}

impl DragScript {
    /// Offset from the grabbed position at simulated time `t`.
    pub fn offset(&self, t: f32) -> Vec3 {
        let phase = TAU * t / self.period.max(1.0e-3);
        Vec3::new(phase.sin(), 1.0 - phase.cos(), 0.0) * self.amplitude
    }
}

/// A fully specified benchmark scenario.
pub struct Scenario {
    /// Which scenario this is.
    pub kind: ScenarioKind,
    /// Collision mesh the curves grow from.
    pub mesh: TriangleMesh,
    /// One curve is grown where each ray meets the mesh.
    pub rays: Vec<Ray>,
    /// Solver settings for the run.
    pub settings: GuideSettings,
    /// Fixed substeps to run.
    pub timesteps: u32,
    /// Scripted drag of one curve's tip, if any.
    pub drag: Option<DragScript>,
}

/// Rays aimed at the centre of a sphere from directions spread over a band
/// of its upper half (golden-angle spiral).
fn spiral_rays(center: Vec3, count: usize, y_top: f32, y_bottom: f32) -> Vec<Ray> {
    let golden = PI * (3.0 - 5.0_f32.sqrt());
    (0..count)
        .map(|k| {
            let y = y_top - (y_top - y_bottom) * (k as f32 + 0.5) / count as f32;
            let r = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden * k as f32;
            let dir = Vec3::new(r * theta.cos(), y, r * theta.sin());
            Ray::new(center + dir, -dir)
        })
        .collect()
}

impl Scenario {
    /// 64 curves of 0.25 m spread over the upper head, falling for two
    /// seconds under full gravity.
    pub fn head_drape() -> Self {
        let settings = GuideSettings {
            default_length: 0.25,
            default_steps: 12,
            gravity: GRAVITY,
            ..GuideSettings::default()
        };
        Self {
            kind: ScenarioKind::HeadDrape,
            mesh: uv_sphere(Vec3::ZERO, HEAD_RADIUS, 24, 48),
            rays: spiral_rays(Vec3::ZERO, 64, 0.9, 0.1),
            settings,
            timesteps: 240,
            drag: None,
        }
    }

    /// A crown curve dragged in 8 cm circles while 16 others hang.
    pub fn drag_stress() -> Self {
        let mut rays = vec![Ray::new(Vec3::new(0.013, 1.0, 0.021), Vec3::NEG_Y)];
        rays.extend(spiral_rays(Vec3::ZERO, 16, 0.9, 0.1));
        let settings = GuideSettings {
            default_length: 0.25,
            default_steps: 12,
            gravity: GRAVITY,
            ..GuideSettings::default()
        };
        Self {
            kind: ScenarioKind::DragStress,
            mesh: uv_sphere(Vec3::ZERO, HEAD_RADIUS, 24, 48),
            rays,
            settings,
            timesteps: 240,
            drag: Some(DragScript {
                curve: 0,
                amplitude: 0.08,
                period: 0.5,
            }),
        }
    }

    /// A 10 × 10 patch on the side of a 30 cm cube. The curves start
    /// horizontal and collapse onto each other.
    pub fn curve_crowd() -> Self {
        let mut rays = Vec::with_capacity(100);
        for i in 0..10 {
            for j in 0..10 {
                // Offsets keep rays off the face diagonal.
                let y = -0.1 + 0.0205 * i as f32 + 0.003;
                let z = -0.1 + 0.0205 * j as f32 - 0.004;
                rays.push(Ray::new(Vec3::new(1.0, y, z), Vec3::NEG_X));
            }
        }
        let settings = GuideSettings {
            default_length: 0.2,
            default_steps: 10,
            gravity: GRAVITY,
            enable_curve_collision: true,
            ..GuideSettings::default()
        };
        Self {
            kind: ScenarioKind::CurveCrowd,
            mesh: cube(0.3),
            rays,
            settings,
            timesteps: 180,
            drag: None,
        }
    }

    /// Builds the procedural scenario for `kind`.
    pub fn from_kind(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::HeadDrape => Self::head_drape(),
            ScenarioKind::DragStress => Self::drag_stress(),
            ScenarioKind::CurveCrowd => Self::curve_crowd(),
        }
    }

    /// Shortens the run, keeping everything else.
    pub fn with_timesteps(mut self, timesteps: u32) -> Self {
        self.timesteps = timesteps;
        self
    }
}
