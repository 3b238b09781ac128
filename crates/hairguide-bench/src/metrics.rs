//! Benchmark metrics: data collected during a benchmark run.

use serde::{Deserialize, Serialize};

/// Metrics collected from a benchmark scenario run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Curves that were grown (rays that hit the mesh).
    pub curves: usize,
    /// Control points over all curves.
    pub points: usize,
    /// Triangles in the scenario mesh.
    pub triangle_count: usize,
    /// Substeps actually run.
    pub timesteps: u32,
    /// Total wall-clock time (seconds).
    pub total_wall_time: f64,
    /// Average wall-clock time per substep (seconds).
    pub avg_step_time: f64,
    /// Fastest substep (seconds).
    pub min_step_time: f64,
    /// Slowest substep (seconds).
    pub max_step_time: f64,
    /// Mean constraint passes per substep.
    pub avg_iterations: f32,
    /// Worst segment-length error after any substep (m).
    pub max_stretch_error: f32,
    /// Segment-length error after the last substep (m).
    pub final_stretch_error: f32,
    /// Largest distance any surviving curve's tip travelled.
    pub max_tip_displacement: f32,
    /// Curves deleted for non-finite data.
    pub removed_curves: usize,
    /// Roots unpinned over the run.
    pub unpinned: usize,
    /// Mesh pushouts resolved over the run.
    pub mesh_contacts: u64,
    /// Curve-curve separations resolved over the run.
    pub curve_contacts: u64,
}

impl BenchmarkMetrics {
    /// CSV header row matching [`to_csv_row`](Self::to_csv_row).
    pub fn to_csv_header() -> String {
        "scenario,curves,points,triangle_count,timesteps,total_wall_time_s,avg_step_ms,min_step_ms,max_step_ms,avg_iterations,max_stretch_error,final_stretch_error,max_tip_displacement,removed_curves,unpinned,mesh_contacts,curve_contacts".to_string()
    }

    /// Format this metrics instance as a CSV data row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{:.6},{:.4},{:.4},{:.4},{:.1},{:.6e},{:.6e},{:.6},{},{},{},{}",
            self.scenario,
            self.curves,
            self.points,
            self.triangle_count,
            self.timesteps,
            self.total_wall_time,
            self.avg_step_time * 1000.0,
            self.min_step_time * 1000.0,
            self.max_step_time * 1000.0,
            self.avg_iterations,
            self.max_stretch_error,
            self.final_stretch_error,
            self.max_tip_displacement,
            self.removed_curves,
            self.unpinned,
            self.mesh_contacts,
            self.curve_contacts,
        )
    }

    /// Header plus one row per run.
    pub fn to_csv(metrics: &[BenchmarkMetrics]) -> String {
        let mut csv = Self::to_csv_header();
        for m in metrics {
            csv.push('\n');
            csv.push_str(&m.to_csv_row());
        }
        csv
    }
}
