//! hairguide CLI: headless simulation, benchmarking and file conversion.

use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::MeshArg;

#[derive(Parser)]
#[command(name = "hairguide")]
#[command(version, about = "hairguide: interactive hair guide authoring engine")]
struct Cli {
    /// Logging verbosity (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Treat `--mesh` files as centimetres and scale them to metres.
    #[arg(long, global = true)]
    mesh_cm: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a saved scene for a number of seconds.
    Simulate {
        /// Scene document (JSON).
        #[arg(long)]
        scene: String,

        /// Simulated time in seconds.
        #[arg(long)]
        seconds: f32,

        /// Frames per second driving the fixed-step accumulator.
        #[arg(long, default_value_t = 60.0)]
        fps: f32,

        /// Where to save the simulated scene.
        #[arg(short, long)]
        out: Option<String>,

        /// Mesh (JSON) to bind to when the scene does not embed one.
        #[arg(long)]
        mesh: Option<String>,

        /// Select every curve first; only selected curves simulate.
        #[arg(long)]
        select_all: bool,
    },

    /// Run benchmark suite.
    Benchmark {
        /// Which scenario to run (head_drape, drag_stress, curve_crowd, all).
        #[arg(short, long, default_value = "all")]
        scenario: String,

        /// Output CSV file path.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Export a scene's guide curves as an ASCII PLY point cloud.
    ExportPly {
        #[arg(long)]
        scene: String,

        #[arg(short, long)]
        out: String,

        /// Write the Catmull-Rom presentation instead of control points.
        #[arg(long)]
        smooth: bool,

        /// Mesh (JSON) the roots are bound to, when the scene does not
        /// embed one. Without a mesh no root is flagged as anchor.
        #[arg(long)]
        mesh: Option<String>,
    },

    /// Import PLY curves into a scene, re-binding roots to its mesh.
    ImportPly {
        #[arg(long)]
        scene: String,

        #[arg(long)]
        ply: String,

        #[arg(short, long)]
        out: String,

        /// Maximum root-to-surface distance (m).
        #[arg(long, default_value_t = 0.01)]
        tolerance: f32,

        /// Mesh (JSON) to bind to when the scene does not embed one.
        #[arg(long)]
        mesh: Option<String>,
    },

    /// Validate a scene (.json), user settings (.toml) or curve file (.ply).
    Validate {
        path: String,
    },
}

fn log_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn mesh_arg(path: Option<&str>, centimeters: bool) -> Option<MeshArg<'_>> {
    path.map(|path| MeshArg { path, centimeters })
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&cli.log_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install logger: {e}");
    }
    debug!("hairguide v{}", env!("CARGO_PKG_VERSION"));

    let cm = cli.mesh_cm;
    let result = match &cli.command {
        Commands::Simulate {
            scene,
            seconds,
            fps,
            out,
            mesh,
            select_all,
        } => commands::simulate(scene, *seconds, *fps, out.as_deref(), mesh_arg(mesh.as_deref(), cm), *select_all),
        Commands::Benchmark { scenario, output } => commands::benchmark(scenario, output.as_deref()),
        Commands::ExportPly {
            scene,
            out,
            smooth,
            mesh,
        } => commands::export_ply(scene, out, *smooth, mesh_arg(mesh.as_deref(), cm)),
        Commands::ImportPly {
            scene,
            ply,
            out,
            tolerance,
            mesh,
        } => commands::import_ply(scene, ply, out, *tolerance, mesh_arg(mesh.as_deref(), cm)),
        Commands::Validate { path } => commands::validate(path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
