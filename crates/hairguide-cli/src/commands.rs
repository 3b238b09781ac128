//! CLI command implementations.

use std::error::Error;
use std::path::Path;

use hairguide_bench::{BenchmarkMetrics, BenchmarkRunner, Scenario, ScenarioKind};
use hairguide_io::{
    export_ply as write_ply_file, import_into_scene, import_ply as read_ply_file, validate_document,
    validate_settings, PlyExportOptions, SceneDocument, UserSettings,
};
use hairguide_mesh::TriangleMesh;
use hairguide_scene::Scene;
use hairguide_telemetry::TracingSink;
use hairguide_types::constants::MESH_IMPORT_SCALE;

type CliResult = Result<(), Box<dyn Error>>;

/// A mesh file named on the command line.
#[derive(Debug, Clone, Copy)]
pub struct MeshArg<'a> {
    /// JSON mesh file.
    pub path: &'a str,
    /// Positions are centimetres and get scaled to metres on load.
    pub centimeters: bool,
}

fn read_mesh(arg: MeshArg<'_>) -> Result<TriangleMesh, Box<dyn Error>> {
    let json = std::fs::read_to_string(arg.path)?;
    let mesh: TriangleMesh = serde_json::from_str(&json)?;
    Ok(if arg.centimeters {
        mesh.scaled(MESH_IMPORT_SCALE)
    } else {
        mesh
    })
}

/// Loads a scene document. A separate mesh file, when given, is loaded
/// first so bound curves have something to bind to. Returns whether the
/// document carried its own mesh.
fn open_scene(scene_path: &str, mesh: Option<MeshArg<'_>>) -> Result<(Scene, bool), Box<dyn Error>> {
    let mut scene = Scene::new();
    scene.events_mut().add_sink(Box::new(TracingSink::new()));

    if let Some(arg) = mesh {
        scene.load_mesh(read_mesh(arg)?, Some(Path::new(arg.path)))?;
    }

    let doc = SceneDocument::load(Path::new(scene_path))?;
    let report = doc.apply(&mut scene)?;
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
    if report.unbound > 0 {
        println!("  {} bound curve(s) restored free (no mesh)", report.unbound);
    }
    Ok((scene, doc.mesh.is_some()))
}

/// Simulate a saved scene headlessly.
pub fn simulate(
    scene_path: &str,
    seconds: f32,
    fps: f32,
    out: Option<&str>,
    mesh: Option<MeshArg<'_>>,
    select_all: bool,
) -> CliResult {
    println!("hairguide Simulation");
    println!("────────────────────");
    println!("Scene: {scene_path}");

    if !(seconds.is_finite() && seconds >= 0.0) {
        return Err(format!("--seconds must be a non-negative number, got {seconds}").into());
    }
    if !(fps.is_finite() && fps > 0.0) {
        return Err(format!("--fps must be positive, got {fps}").into());
    }

    let (mut scene, embedded) = open_scene(scene_path, mesh)?;
    if scene.mesh().is_none() {
        return Err("scene has no mesh; embed one or pass --mesh".into());
    }
    if select_all {
        for i in 0..scene.guides().len() {
            scene.guides_mut().select_curve(i, true);
        }
    }
    println!(
        "Curves: {} ({} selected)",
        scene.guides().len(),
        scene.guides().selected_curves().len()
    );

    let frames = (seconds * fps).ceil() as u32;
    let frame_dt = 1.0 / fps;
    let mut steps = 0u32;
    let mut removed = 0usize;
    let mut unpinned = 0usize;
    let mut max_stretch = 0.0f32;
    let mut wall = 0.0f64;
    for _ in 0..frames {
        let report = scene.simulate(frame_dt);
        steps += report.steps;
        removed += report.removed_curves.len();
        unpinned += report.unpinned;
        max_stretch = max_stretch.max(report.max_stretch_error);
        wall += report.wall_time;
    }

    println!();
    println!("  Backend:       {}", scene.backend().active_name());
    println!("  Frames:        {frames}");
    println!("  Substeps:      {steps}");
    println!("  Sim time:      {:.3}s", scene.sim_time());
    println!("  Wall time:     {wall:.3}s");
    println!("  Max stretch:   {max_stretch:.6}m");
    println!("  Removed:       {removed}");
    println!("  Unpinned:      {unpinned}");

    if let Some(path) = out {
        hairguide_io::save_scene(&scene, Path::new(path), embedded)?;
        println!();
        println!("Scene written to: {path}");
    }
    Ok(())
}

/// Run benchmark suite.
pub fn benchmark(scenario_name: &str, output_path: Option<&str>) -> CliResult {
    println!("hairguide Benchmark Suite");
    println!("═════════════════════════");
    println!();

    let scenarios: Vec<ScenarioKind> = if scenario_name == "all" {
        ScenarioKind::all().to_vec()
    } else {
        match ScenarioKind::from_name(scenario_name) {
            Some(kind) => vec![kind],
            None => {
                let available: Vec<&str> = ScenarioKind::all().iter().map(|k| k.name()).collect();
                eprintln!("Available: {}, all", available.join(", "));
                return Err(format!("Unknown scenario: {scenario_name}").into());
            }
        }
    };

    let mut all_metrics = Vec::new();
    for &kind in &scenarios {
        let scenario = Scenario::from_kind(kind);
        println!(
            "Running: {} ({} rays, {} tris, {} steps)",
            kind.name(),
            scenario.rays.len(),
            scenario.mesh.triangle_count(),
            scenario.timesteps,
        );

        let metrics = BenchmarkRunner::run(&scenario).map_err(|e| format!("Benchmark failed: {e}"))?;

        println!("  Curves:        {} ({} points)", metrics.curves, metrics.points);
        println!("  Wall time:     {:.3}s", metrics.total_wall_time);
        println!("  Avg step:      {:.3}ms", metrics.avg_step_time * 1000.0);
        println!("  Max stretch:   {:.6e}m", metrics.max_stretch_error);
        println!("  Tip travel:    {:.4}m", metrics.max_tip_displacement);
        println!("  Removed:       {}", metrics.removed_curves);
        println!();

        all_metrics.push(metrics);
    }

    let csv = BenchmarkMetrics::to_csv(&all_metrics);
    if let Some(path) = output_path {
        std::fs::write(path, &csv)?;
        println!("Results written to: {path}");
    } else {
        println!("CSV Output:");
        println!("{csv}");
    }
    Ok(())
}

/// Export a scene's curves as PLY.
pub fn export_ply(scene_path: &str, out: &str, smooth: bool, mesh: Option<MeshArg<'_>>) -> CliResult {
    let (scene, _) = open_scene(scene_path, mesh)?;
    let opts = PlyExportOptions {
        smooth,
        ..Default::default()
    };
    let curves = write_ply_file(scene.guides(), &opts, Path::new(out))?;
    println!("Exported {curves} curve(s) to: {out}");
    Ok(())
}

/// Import PLY curves into a scene and save the result.
pub fn import_ply(scene_path: &str, ply_path: &str, out: &str, tolerance: f32, mesh: Option<MeshArg<'_>>) -> CliResult {
    let (mut scene, embedded) = open_scene(scene_path, mesh)?;
    let doc = read_ply_file(Path::new(ply_path))?;
    let report = import_into_scene(&mut scene, &doc, tolerance)?;

    println!("Imported:      {}", report.imported);
    println!("Rejected:      {}", report.rejected);
    println!("Layers added:  {}", report.layers_added);

    hairguide_io::save_scene(&scene, Path::new(out), embedded)?;
    println!("Scene written to: {out}");
    Ok(())
}

/// Validate a scene document, settings file or PLY file.
pub fn validate(path: &str) -> CliResult {
    println!("hairguide Validator");
    println!("───────────────────");
    println!();

    let file = Path::new(path);
    let warnings = match file.extension().and_then(|e| e.to_str()) {
        Some("json") => {
            println!("Validating scene: {path}");
            let doc = SceneDocument::load(file)?;
            let report = validate_document(&doc, doc.mesh.as_ref())?;
            println!(
                "✅ Scene is valid ({} curves, {} layers{}).",
                doc.curves.len(),
                doc.layers.len(),
                if doc.mesh.is_some() { ", embedded mesh" } else { "" }
            );
            report.warnings
        }
        Some("toml") => {
            println!("Validating settings: {path}");
            let settings = UserSettings::from_toml_str(&std::fs::read_to_string(file)?)?;
            let report = validate_settings(&settings.guides)?;
            println!("✅ Settings are valid.");
            report.warnings
        }
        Some("ply") => {
            println!("Validating curves: {path}");
            let doc = read_ply_file(file)?;
            let points: usize = doc.curves.iter().map(|c| c.points.len()).sum();
            println!(
                "✅ PLY is valid ({} curves, {} points, {} layers).",
                doc.curves.len(),
                points,
                doc.layers.len()
            );
            Vec::new()
        }
        _ => {
            return Err("Unsupported file format. Use .json (scene), .toml (settings) or .ply (curves).".into());
        }
    };

    for warning in warnings {
        println!("  warning: {warning}");
    }
    Ok(())
}
