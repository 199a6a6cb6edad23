use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use mazewalk_common::{Config, FrameInput};
use mazewalk_input::InputScript;
use mazewalk_kernel::{BlockWorld, ManualClock, MazeLayout, Session};
use mazewalk_render::{DebugTextRenderer, Projection, RenderView, Renderer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mazewalk", about = "Headless driver for the mazewalk first-person controller")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the default configuration as YAML
    Config,
    /// Replay an input script through the controller
    Walk {
        /// Input script (`<frames> [KEY ...] [look <dx> <dy>]` per line)
        #[arg(short, long)]
        script: PathBuf,
        /// YAML config file; missing fields take defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Maze layout file (`#` wall, `.` passage); defaults to the stock maze
        #[arg(long)]
        maze: Option<PathBuf>,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Print the top-down map after the walk
        #[arg(long)]
        map: bool,
        /// Print the final pose as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drop the player from a height and report when it lands
    Drop {
        /// Spawn height above the maze floor
        #[arg(long, default_value = "2.0")]
        height: f32,
        /// Maximum ticks to simulate
        #[arg(short, long, default_value = "240")]
        ticks: u64,
        /// Seconds per tick
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn load_maze(path: Option<&PathBuf>) -> anyhow::Result<MazeLayout> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading maze {}", path.display()))?;
            MazeLayout::parse(&text).with_context(|| format!("parsing maze {}", path.display()))
        }
        None => Ok(MazeLayout::default()),
    }
}

fn check_dt(dt: f32) -> anyhow::Result<()> {
    if !(dt.is_finite() && dt > 0.0) {
        anyhow::bail!("--dt must be a positive number of seconds, got {dt}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("mazewalk v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", mazewalk_common::crate_info());
            println!("kernel: {}", mazewalk_kernel::crate_info());
            println!("input: {}", mazewalk_input::crate_info());
            println!("render: {}", mazewalk_render::crate_info());
            let world = BlockWorld::from_maze(&MazeLayout::default());
            println!("stock maze: {} blocks", world.len());
        }
        Commands::Config => {
            print!("{}", Config::default().to_yaml()?);
        }
        Commands::Walk {
            script,
            config,
            maze,
            dt,
            map,
            json,
        } => {
            check_dt(dt)?;
            let config = load_config(config.as_ref())?;
            let layout = load_maze(maze.as_ref())?;
            let script = InputScript::load(&script)
                .with_context(|| format!("loading script {}", script.display()))?;
            let frames = script.playback(config.input.jump_trigger);
            tracing::info!(
                frames = frames.len(),
                width = layout.width(),
                depth = layout.depth(),
                "starting walk"
            );

            let mut session = Session::new(&config, BlockWorld::from_maze(&layout), ManualClock::default());
            for input in &frames {
                session.clock().advance(f64::from(dt));
                session.frame(input, dt);
            }

            let pose = session.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&pose)?);
            } else {
                println!(
                    "After {} frames: pos=({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1} grounded={}",
                    session.tick(),
                    pose.position.x,
                    pose.position.y,
                    pose.position.z,
                    pose.yaw,
                    pose.pitch,
                    pose.grounded
                );
            }
            if map {
                let projection = Projection::from_config(&config.view);
                let view = RenderView::from_controller(session.controller(), &projection);
                print!("{}", DebugTextRenderer::new().render(session.world(), &view));
            }
        }
        Commands::Drop { height, ticks, dt } => {
            check_dt(dt)?;
            let mut config = Config::default();
            config.camera.spawn = Vec3::new(2.0, height, 2.0);
            config.validate()?;
            println!("Drop test: height={height}, dt={dt}, max ticks={ticks}");

            let world = BlockWorld::from_maze(&MazeLayout::default());
            let mut session = Session::new(&config, world, ManualClock::default());
            let idle = FrameInput::default();
            let mut landed_at = None;
            for _ in 0..ticks {
                session.clock().advance(f64::from(dt));
                session.frame(&idle, dt);
                if session.controller().is_grounded() {
                    landed_at = Some(session.tick());
                    break;
                }
            }

            let pose = session.summary();
            match landed_at {
                Some(tick) => println!(
                    "Landed at tick {tick} ({:.3}s): y={:.3}",
                    tick as f32 * dt,
                    pose.position.y
                ),
                None => println!(
                    "Still airborne after {ticks} ticks: y={:.3} vy={:.3}",
                    pose.position.y, pose.velocity_y
                ),
            }
        }
    }

    Ok(())
}
