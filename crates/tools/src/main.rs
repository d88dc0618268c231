use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use scene::{ProjectionViewState, ViewConfig};
use tools::render::{load_shape_layer, render_svg};
use tools::replay::{load_script, replay};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Orthographic globe gesture replay and rendering")]
struct Args {
    /// View configuration (JSON); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a gesture script and print the view state after each event
    Replay {
        /// JSON array of start/move/end/resize/frame events
        script: PathBuf,

        /// Print only the final view state
        #[arg(long)]
        final_only: bool,
    },

    /// Render shapes to an SVG document
    Render {
        /// JSON shape, shorthand, or array of shapes
        shapes: PathBuf,

        /// Replay this gesture script first and render the resulting view
        #[arg(long)]
        script: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ViewConfig::from_path(path).map_err(|e| format!("config {path:?}: {e}"))?,
        None => ViewConfig::default(),
    };

    match args.command {
        Command::Replay { script, final_only } => cmd_replay(&config, &script, final_only),
        Command::Render { shapes, script } => cmd_render(&config, &shapes, script.as_deref()),
    }
}

fn cmd_replay(config: &ViewConfig, script: &Path, final_only: bool) -> Result<(), String> {
    let events = load_script(script).map_err(|e| format!("script {script:?}: {e}"))?;
    let report = replay(config, &events);

    let json = if final_only {
        serde_json::to_string_pretty(&report.final_view())
    } else {
        serde_json::to_string_pretty(&report)
    }
    .map_err(|e| format!("encode report: {e}"))?;
    println!("{json}");
    Ok(())
}

fn cmd_render(
    config: &ViewConfig,
    shapes: &Path,
    script: Option<&Path>,
) -> Result<(), String> {
    let layer = load_shape_layer(shapes).map_err(|e| format!("shapes {shapes:?}: {e}"))?;

    let view = match script {
        Some(path) => {
            let events = load_script(path).map_err(|e| format!("script {path:?}: {e}"))?;
            let report = replay(config, &events);
            for d in &report.diagnostics {
                info!(step = d.step, kind = d.kind, "{}", d.message);
            }
            report
                .final_view()
                .copied()
                .unwrap_or_else(|| ProjectionViewState::from_config(config))
        }
        None => ProjectionViewState::from_config(config),
    };

    print!("{}", render_svg(&layer, &view));
    Ok(())
}
