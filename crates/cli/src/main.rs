#![deny(unsafe_code)]
//! CLI binary for the mesh warp engine.
//!
//! Subcommands:
//! - `init` — lay out a default grid and save its state
//! - `inspect` — summarize the saved grid state
//! - `render` — warp a source image through the saved state, write PNG
//! - `deform` — run discrete points through a deformation strategy
//! - `payload` — print the generation-backend sync payload
//! - `list` — print available strategies and quality tiers

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use glam::DVec2;
use meshwarp_core::{
    now_millis, ControlGrid, DeformerKind, Placement, PointDeformer, StateStore, SyncRequest,
    WarpState,
};
use meshwarp_raster::{snapshot, RenderQuality, WarpEngine};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "meshwarp", about = "Mesh-based image warping engine CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Directory holding the persisted grid state.
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lay out a fresh grid over a placement rectangle and save its state.
    Init {
        /// Control points per grid axis.
        #[arg(short, long, default_value_t = 3)]
        size: usize,

        /// Output surface width in pixels.
        #[arg(short = 'W', long, default_value_t = 800)]
        width: usize,

        /// Output surface height in pixels.
        #[arg(short = 'H', long, default_value_t = 600)]
        height: usize,

        /// Placement rectangle as "x,y,width,height" (defaults to the full
        /// surface).
        #[arg(short, long)]
        placement: Option<String>,
    },
    /// Summarize the saved grid state.
    Inspect,
    /// Warp a source image through the saved grid state and write a PNG.
    Render {
        /// Source image path.
        #[arg(short, long)]
        image: PathBuf,

        /// Output surface width in pixels.
        #[arg(short = 'W', long, default_value_t = 800)]
        width: usize,

        /// Output surface height in pixels.
        #[arg(short = 'H', long, default_value_t = 600)]
        height: usize,

        /// Grid size used when no state is saved.
        #[arg(short, long, default_value_t = 3)]
        size: usize,

        /// Render quality (interactive, seamless).
        #[arg(short, long, default_value = "seamless")]
        quality: String,

        /// Placement rectangle as "x,y,width,height" (defaults to
        /// aspect-fitting the image into the surface).
        #[arg(short, long)]
        placement: Option<String>,

        /// Output file path.
        #[arg(short, long, default_value = "warped.png")]
        output: PathBuf,
    },
    /// Run discrete points through a deformation strategy.
    Deform {
        /// Strategy name (bilinear, coons).
        #[arg(short = 'S', long, default_value = "bilinear")]
        strategy: String,

        /// Placement rectangle as "x,y,width,height" (defaults to the
        /// bounding box of the saved grid's original positions).
        #[arg(short, long)]
        placement: Option<String>,

        /// Points to deform, each as "x,y".
        #[arg(required = true)]
        points: Vec<String>,
    },
    /// Print the request payload for the generation backend.
    Payload {
        /// Target character the warp applies to.
        #[arg(short, long)]
        char: String,

        /// Output surface width in pixels.
        #[arg(short = 'W', long, default_value_t = 800)]
        width: u32,

        /// Output surface height in pixels.
        #[arg(short = 'H', long, default_value_t = 600)]
        height: u32,
    },
    /// List available strategies and render quality tiers.
    List,
}

fn parse_placement(spec: &str) -> Result<Placement, CliError> {
    let parts: Vec<f64> = spec
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| CliError::Input(format!("invalid placement '{spec}': {e}")))?;
    if parts.len() != 4 {
        return Err(CliError::Input(format!(
            "invalid placement '{spec}': expected x,y,width,height"
        )));
    }
    Ok(Placement::new(parts[0], parts[1], parts[2], parts[3]))
}

fn parse_point(spec: &str) -> Result<DVec2, CliError> {
    let parts: Vec<f64> = spec
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| CliError::Input(format!("invalid point '{spec}': {e}")))?;
    if parts.len() != 2 {
        return Err(CliError::Input(format!(
            "invalid point '{spec}': expected x,y"
        )));
    }
    Ok(DVec2::new(parts[0], parts[1]))
}

fn run(cli: Cli) -> Result<(), CliError> {
    let store = StateStore::new(&cli.dir);
    match cli.command {
        Command::Init {
            size,
            width,
            height,
            placement,
        } => {
            let placement = match placement {
                Some(spec) => parse_placement(&spec)?,
                None => Placement::new(0.0, 0.0, width as f64, height as f64),
            };
            let grid = ControlGrid::new(size, &placement)?;
            let state = WarpState::capture(&grid, now_millis());
            store.save(&state)?;
            if cli.json {
                let info = serde_json::json!({
                    "size": size,
                    "points": state.control_points.len(),
                    "state": store.path().display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "initialized {size}x{size} grid -> {}",
                    store.path().display()
                );
            }
        }
        Command::Inspect => match store.load()? {
            None => {
                if cli.json {
                    println!("{}", serde_json::json!({ "saved": false }));
                } else {
                    println!("no saved grid state in {}", cli.dir.display());
                }
            }
            Some(state) => {
                let deformed = state
                    .to_grid()
                    .map(|g| g.has_deformation())
                    .unwrap_or(false);
                if cli.json {
                    let info = serde_json::json!({
                        "saved": true,
                        "size": state.size,
                        "points": state.control_points.len(),
                        "deformStrength": state.deform_strength,
                        "hasDeformation": deformed,
                        "timestamp": state.timestamp,
                    });
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    println!("grid:       {}x{}", state.size, state.size);
                    println!("points:     {}", state.control_points.len());
                    println!("strength:   {}", state.deform_strength);
                    println!("deformed:   {deformed}");
                    println!("timestamp:  {}", state.timestamp);
                }
            }
        },
        Command::Render {
            image,
            width,
            height,
            size,
            quality,
            placement,
            output,
        } => {
            let quality = RenderQuality::from_name(&quality)?;
            let placement = placement.map(|spec| parse_placement(&spec)).transpose()?;
            let source = snapshot::read_png(&image)?;
            let saved = store.load()?;

            let grid_size = saved
                .as_ref()
                .filter(|s| s.size >= 2)
                .map(|s| s.size)
                .unwrap_or(size);
            let mut engine = WarpEngine::new(width, height, grid_size)?;
            engine.set_source(source, placement);
            if let Some(state) = &saved {
                engine.apply_state(state);
            }
            match quality {
                RenderQuality::Interactive => engine.pump()?,
                RenderQuality::Seamless => engine.render_final()?,
            };
            snapshot::write_png(engine.surface(), &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "image": image.display().to_string(),
                    "quality": quality.name(),
                    "size": engine.grid().size(),
                    "hasDeformation": engine.has_deformation(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}, {}x{} grid) -> {}",
                    image.display(),
                    quality.name(),
                    engine.grid().size(),
                    engine.grid().size(),
                    output.display()
                );
            }
        }
        Command::Deform {
            strategy,
            placement,
            points,
        } => {
            let state = store.load()?.ok_or_else(|| {
                CliError::Input(format!(
                    "no saved grid state in {}; run `meshwarp init` first",
                    cli.dir.display()
                ))
            })?;
            let grid = state.to_grid()?;
            let placement = match placement {
                Some(spec) => parse_placement(&spec)?,
                None => grid
                    .original_bounds()
                    .ok_or_else(|| CliError::Input("saved grid has no points".into()))?,
            };
            let deformer = DeformerKind::from_name(&strategy, &grid, placement)?;

            let mut results = Vec::with_capacity(points.len());
            for spec in &points {
                let input = parse_point(spec)?;
                results.push((input, deformer.deform_point(input)));
            }
            if cli.json {
                let items: Vec<_> = results
                    .iter()
                    .map(|(input, output)| {
                        serde_json::json!({
                            "in": [input.x, input.y],
                            "out": [output.x, output.y],
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for (input, output) in results {
                    println!(
                        "{},{} -> {:.2},{:.2}",
                        input.x, input.y, output.x, output.y
                    );
                }
            }
        }
        Command::Payload {
            char,
            width,
            height,
        } => {
            let state = store.load()?.ok_or_else(|| {
                CliError::Input(format!(
                    "no saved grid state in {}; run `meshwarp init` first",
                    cli.dir.display()
                ))
            })?;
            if state.is_empty() {
                return Err(CliError::Input("saved grid has no control points".into()));
            }
            let payload = SyncRequest::new(state, width, height, char);
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::List => {
            let strategies = DeformerKind::list_strategies();
            let qualities = RenderQuality::list_names();
            if cli.json {
                let info = serde_json::json!({
                    "strategies": strategies,
                    "qualities": qualities,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Strategies:");
                for name in strategies {
                    println!("  {name}");
                }
                println!("Qualities:");
                println!("  {}", qualities.join(", "));
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_placement_accepts_four_numbers() {
        let p = parse_placement("10, 20, 300.5, 400").unwrap();
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 20.0);
        assert_eq!(p.width, 300.5);
        assert_eq!(p.height, 400.0);
    }

    #[test]
    fn parse_placement_rejects_wrong_arity() {
        assert!(parse_placement("1,2,3").is_err());
        assert!(parse_placement("1,2,3,4,5").is_err());
    }

    #[test]
    fn parse_placement_rejects_non_numeric() {
        assert!(parse_placement("a,b,c,d").is_err());
    }

    #[test]
    fn parse_point_accepts_pair() {
        let p = parse_point("12.5,-3").unwrap();
        assert_eq!(p, DVec2::new(12.5, -3.0));
    }

    #[test]
    fn parse_point_rejects_wrong_arity() {
        assert!(parse_point("1").is_err());
        assert!(parse_point("1,2,3").is_err());
    }

    #[test]
    fn init_writes_state_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            json: false,
            dir: dir.path().to_path_buf(),
            command: Command::Init {
                size: 4,
                width: 400,
                height: 400,
                placement: None,
            },
        };
        assert!(run(cli).is_ok());

        let store = StateStore::new(dir.path());
        let state = store.load().unwrap().unwrap();
        assert_eq!(state.size, 4);
        assert_eq!(state.control_points.len(), 16);
    }

    #[test]
    fn deform_requires_saved_state() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            json: false,
            dir: dir.path().to_path_buf(),
            command: Command::Deform {
                strategy: "bilinear".into(),
                placement: None,
                points: vec!["10,10".into()],
            },
        };
        match run(cli) {
            Err(e) => assert_eq!(e.exit_code(), 12),
            Ok(()) => panic!("expected a missing-state error"),
        }
    }

    #[test]
    fn render_rejects_unknown_quality() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            json: false,
            dir: dir.path().to_path_buf(),
            command: Command::Render {
                image: dir.path().join("missing.png"),
                width: 100,
                height: 100,
                size: 3,
                quality: "draft".into(),
                placement: None,
                output: dir.path().join("out.png"),
            },
        };
        match run(cli) {
            Err(e) => assert_eq!(e.exit_code(), 12),
            Ok(()) => panic!("expected an unknown-quality error"),
        }
    }
}
