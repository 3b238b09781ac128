//! Backend selection: the CPU solver, or a device solver when one is
//! installed and its capability probe passes.

use std::fmt;

use tracing::{debug, info, warn};
use hairguide_guides::HairGuideSet;

use crate::cpu::VerletSolver;
use crate::strategy::{SolverStrategy, StepContext, StepResult};

/// Which solver runs the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// The built-in Verlet solver.
    #[default]
    Cpu,
    /// An injected device solver.
    Device,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Cpu => write!(f, "cpu"),
            BackendKind::Device => write!(f, "device"),
        }
    }
}

/// A data-parallel re-expression of the step contract on another device.
pub trait DeviceSolver: SolverStrategy {
    /// Checks that the device can run right now. `Err` carries the reason.
    fn probe(&self) -> Result<(), String>;
}

/// Owns the CPU solver and, optionally, a device solver.
pub struct SolverBackend {
    cpu: VerletSolver,
    device: Option<Box<dyn DeviceSolver>>,
    kind: BackendKind,
}

impl Default for SolverBackend {
    fn default() -> Self {
        Self::new(VerletSolver::new())
    }
}

impl fmt::Debug for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverBackend")
            .field("kind", &self.kind)
            .field("device", &self.device.as_ref().map(|d| d.name().to_string()))
            .finish()
    }
}

impl SolverBackend {
    /// A backend running `cpu` until a device is installed and selected.
    pub fn new(cpu: VerletSolver) -> Self {
        Self {
            cpu,
            device: None,
            kind: BackendKind::Cpu,
        }
    }

    /// Installs a device solver. It is used only after [`select`](Self::select).
    pub fn with_device(mut self, device: Box<dyn DeviceSolver>) -> Self {
        self.device = Some(device);
        self
    }

    /// True if a device solver is installed.
    pub fn has_device(&self) -> bool {
        self.device.is_some()
    }

    /// Chooses the backend for the coming steps. A missing or failing
    /// device falls back to the CPU solver.
    pub fn select(&mut self, prefer_device: bool) -> BackendKind {
        let kind = match (&self.device, prefer_device) {
            (Some(device), true) => match device.probe() {
                Ok(()) => BackendKind::Device,
                Err(reason) => {
                    if self.kind != BackendKind::Cpu {
                        warn!(device = device.name(), %reason, "device solver unavailable; falling back to CPU");
                    } else {
                        debug!(device = device.name(), %reason, "device solver unavailable");
                    }
                    BackendKind::Cpu
                }
            },
            (None, true) => {
                debug!("no device solver installed; using CPU");
                BackendKind::Cpu
            }
            (_, false) => BackendKind::Cpu,
        };
        if kind != self.kind {
            info!(from = %self.kind, to = %kind, "solver backend changed");
            self.kind = kind;
        }
        kind
    }

    /// Backend chosen by the last [`select`](Self::select).
    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// Name of the solver that will run the next step.
    pub fn active_name(&self) -> &str {
        match (self.kind, &self.device) {
            (BackendKind::Device, Some(device)) => device.name(),
            _ => self.cpu.name(),
        }
    }

    /// True if the active solver reads the distance field.
    pub fn needs_distance_field(&self) -> bool {
        match (self.kind, &self.device) {
            (BackendKind::Device, Some(device)) => device.uses_distance_field(),
            _ => self.cpu.uses_distance_field(),
        }
    }

    /// The CPU solver.
    pub fn cpu(&self) -> &VerletSolver {
        &self.cpu
    }

    /// Runs one substep on the selected backend.
    pub fn step(&mut self, guides: &mut HairGuideSet, ctx: &StepContext<'_>, dt: f32) -> StepResult {
        match (self.kind, self.device.as_mut()) {
            (BackendKind::Device, Some(device)) => device.step(guides, ctx, dt),
            _ => self.cpu.step(guides, ctx, dt),
        }
    }
}
