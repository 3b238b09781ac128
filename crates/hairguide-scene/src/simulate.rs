//! Frame loop: fixed substeps on the selected backend, with telemetry.

use std::time::Instant;

use hairguide_contact::ContactResult;
use hairguide_solver::{BackendKind, StepContext, StepResult};
use hairguide_telemetry::{EventKind, GuideEvent};

use crate::scene::Scene;

/// Summary of one [`Scene::simulate`] call.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Substeps actually run.
    pub steps: u32,
    /// Backend that ran the steps.
    pub backend: BackendKind,
    /// Curves deleted for NaN/Inf this frame, as indices at removal time.
    pub removed_curves: Vec<usize>,
    /// Roots unpinned this frame.
    pub unpinned: usize,
    /// Rate-limited motion warnings raised.
    pub motion_warnings: usize,
    /// Mesh pushouts over all substeps.
    pub mesh_contacts: ContactResult,
    /// Curve-curve separations over all substeps.
    pub curve_contacts: ContactResult,
    /// Worst segment-length error seen after any substep.
    pub max_stretch_error: f32,
    /// Wall-clock time of the frame (seconds).
    pub wall_time: f64,
}

impl FrameReport {
    fn absorb(&mut self, step: &StepResult) {
        self.steps += 1;
        self.removed_curves.extend_from_slice(&step.removed_curves);
        self.unpinned += step.unpinned.len();
        self.motion_warnings += step.motion_warnings.len();
        self.mesh_contacts.merge(&step.mesh_contacts);
        self.curve_contacts.merge(&step.curve_contacts);
        self.max_stretch_error = self.max_stretch_error.max(step.max_stretch_error);
    }
}

impl Scene {
    /// Advances the simulation by one frame of `frame_dt` seconds.
    ///
    /// The frame time is clamped and accumulated; whole fixed substeps are
    /// paid out (at most the driver's cap). With simulation disabled
    /// nothing accumulates. Without a mesh the substeps are no-ops.
    pub fn simulate(&mut self, frame_dt: f32) -> FrameReport {
        let start = Instant::now();
        let mut report = FrameReport::default();
        if !self.settings.enable_simulation {
            return report;
        }

        self.interaction.mirror.prune_to_selection(self.guides.selection());
        report.backend = self.backend.select(self.settings.enable_device_solver);

        let steps = self.driver.advance(frame_dt);
        for _ in 0..steps {
            if let Some(result) = self.step_once() {
                report.absorb(&result);
            }
        }
        report.wall_time = start.elapsed().as_secs_f64();
        report
    }

    /// Runs exactly one fixed substep, bypassing the accumulator.
    /// `None` without a mesh.
    pub fn step_once(&mut self) -> Option<StepResult> {
        if self.backend.needs_distance_field() {
            self.ensure_distance_field();
        }
        let dt = self.driver.step_dt();
        let (Some(mesh), Some(bvh)) = (self.mesh.as_ref(), self.bvh.as_ref()) else {
            return None;
        };

        self.events.emit(GuideEvent::new(
            self.step_count,
            EventKind::StepBegin {
                sim_time: self.sim_time,
                curves: self.guides.len() as u32,
            },
        ));

        let ctx = StepContext {
            mesh,
            bvh,
            field: self.field.as_ref(),
            settings: &self.settings,
            interaction: &self.interaction,
        };
        let result = self.backend.step(&mut self.guides, &ctx, dt);

        self.interaction.apply_removals(&result.removed_curves);
        if self.interaction.drag.is_none() {
            self.drag_plane = None;
        }
        self.report_step(&result);

        self.step_count += 1;
        self.sim_time += f64::from(dt);
        self.events.flush();
        Some(result)
    }

    fn report_step(&self, result: &StepResult) {
        let step = self.step_count;
        for &curve in &result.removed_curves {
            self.events
                .emit(GuideEvent::new(step, EventKind::CurveDiscarded { curve }));
        }
        for (curve, fault) in &result.unpinned {
            self.events.emit(GuideEvent::new(
                step,
                EventKind::RootUnpinned {
                    curve: *curve,
                    reason: fault.to_string(),
                },
            ));
        }
        for w in &result.motion_warnings {
            self.events.emit(GuideEvent::new(
                step,
                EventKind::MotionWarning {
                    curve: w.curve,
                    max_speed: w.max_speed,
                    max_distance: w.max_distance,
                },
            ));
        }
        let mesh_contacts = result.mesh_contacts.resolved_count;
        let curve_contacts = result.curve_contacts.resolved_count;
        if mesh_contacts + curve_contacts > 0 {
            self.events.emit(GuideEvent::new(
                step,
                EventKind::Contacts {
                    mesh_contacts,
                    curve_contacts,
                    max_penetration: result
                        .mesh_contacts
                        .max_penetration
                        .max(result.curve_contacts.max_penetration),
                },
            ));
        }
        self.events.emit(GuideEvent::new(
            step,
            EventKind::StepEnd {
                wall_time: result.wall_time,
                simulated_curves: result.simulated_curves,
                max_stretch_error: result.max_stretch_error,
            },
        ));
    }
}
