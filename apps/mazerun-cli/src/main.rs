mod script;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mazerun_common::GameConfig;
use mazerun_kernel::{MazeLayout, MazeModel, Session, SessionClock};
use mazerun_protocol::{CommandQueue, EventSink, LineFormat, LineSink};
use mazerun_tools::{FrameTimer, SessionInspector};
use script::{ScriptStep, parse_script};
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mazerun", about = "Headless host for first-person maze sessions")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SessionArgs {
    /// Maze layout JSON: {"width", "height", "walls", "spawns"}
    #[arg(short, long)]
    maze: PathBuf,
    /// Game config YAML; missing keys keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// RNG seed for reproducible placement
    #[arg(short, long)]
    seed: Option<u64>,
    /// Frame rate of the simulation loop
    #[arg(long, default_value = "60")]
    fps: u32,
    /// Emit events as JSON lines instead of the wire format
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the default config
    Info,
    /// Load and validate a maze layout
    Validate {
        #[arg(short, long)]
        maze: PathBuf,
    },
    /// Run a real-time session: protocol messages on stdin, events on stdout
    Play(SessionArgs),
    /// Run a deterministic session driven by a script file
    Script {
        #[command(flatten)]
        session: SessionArgs,
        /// Script of protocol messages plus `tick <n>` and `look <dx> <dy>` directives
        #[arg(long)]
        script: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Stdout carries the protocol, so logs go to stderr.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("mazerun v{}", env!("CARGO_PKG_VERSION"));
            println!("default config:");
            print!("{}", GameConfig::default().to_yaml_string()?);
        }
        Commands::Validate { maze } => validate(&maze)?,
        Commands::Play(args) => play(&args, cli.verbose)?,
        Commands::Script { session, script } => run_script(&session, &script, cli.verbose)?,
    }

    Ok(())
}

fn load_config(args: &SessionArgs) -> Result<GameConfig> {
    match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

fn build_session(args: &SessionArgs, clock: SessionClock) -> Result<Session> {
    let config = load_config(args)?;
    let layout = MazeLayout::load(&args.maze)
        .with_context(|| format!("loading maze {}", args.maze.display()))?;
    let mut builder = Session::builder(config)
        .layout(layout)
        .maze_collider()
        .clock(clock);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    Ok(builder.build()?)
}

fn frame_dt(fps: u32) -> Result<f32> {
    anyhow::ensure!(fps > 0, "--fps must be positive");
    Ok(1.0 / fps as f32)
}

fn validate(path: &PathBuf) -> Result<()> {
    let layout =
        MazeLayout::load(path).with_context(|| format!("loading maze {}", path.display()))?;
    let maze = MazeModel::new(layout.clone())?;
    let spawn_points = maze.spawns().len().max(1);
    println!(
        "maze {}x{}: walls={} spawns={} collectibles={}",
        maze.width(),
        maze.height(),
        maze.walls().len(),
        maze.spawns().len(),
        (spawn_points - 1) / 3
    );

    let session = Session::builder(GameConfig::default())
        .layout(layout)
        .maze_collider()
        .seed(0)
        .build()?;
    print!("{}", SessionInspector::minimap(&session));
    Ok(())
}

fn play(args: &SessionArgs, verbose: bool) -> Result<()> {
    anyhow::ensure!(args.fps > 0, "--fps must be positive");
    let mut session = build_session(args, SessionClock::wall())?;
    let mut sink = stdout_sink(args.json);
    session.flush_to(&mut sink);

    let (tx, mut queue) = CommandQueue::new();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if !tx.send_raw(&line) {
                break;
            }
        }
    });

    let mut timer = FrameTimer::for_fps(args.fps);
    tracing::info!(fps = args.fps, budget = ?timer.budget(), "starting session loop");
    let mut last_frame = Instant::now();
    loop {
        let start = Instant::now();
        let dt = start.duration_since(last_frame);
        last_frame = start;

        session.run_frame(&mut queue, dt.as_secs_f32());
        session.flush_to(&mut sink);
        let work = start.elapsed();
        if timer.record(dt, work) {
            tracing::debug!(frame = session.frame(), ?work, "frame over budget");
        }

        if session.is_won() {
            tracing::info!("session won, exiting");
            break;
        }
        if queue.is_closed() {
            tracing::info!("input closed, exiting");
            break;
        }
        std::thread::sleep(timer.remaining(work));
    }

    let stats = timer.stats();
    tracing::info!(
        frames = stats.frames,
        over_budget = stats.over_budget,
        fps = stats.fps,
        worst_work = ?stats.worst_work,
        "session loop finished"
    );
    if verbose {
        eprintln!("{stats}");
        eprintln!("{}", SessionInspector::summary(&session));
    }
    Ok(())
}

fn run_script(args: &SessionArgs, path: &PathBuf, verbose: bool) -> Result<()> {
    let dt = frame_dt(args.fps)?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    let steps = parse_script(&text)?;
    let mut session = build_session(args, SessionClock::simulated())?;
    let mut sink = stdout_sink(args.json);
    session.flush_to(&mut sink);

    for step in steps {
        match step {
            ScriptStep::Message(raw) => session.handle_message(&raw),
            ScriptStep::Look { dx, dy } => session.look(dx, dy, dt),
            ScriptStep::Tick(frames) => {
                for _ in 0..frames {
                    session.step(dt);
                    session.flush_to(&mut sink);
                }
            }
        }
        session.flush_to(&mut sink);
    }

    if verbose {
        eprintln!("{}", SessionInspector::summary(&session));
        eprint!("{}", SessionInspector::minimap(&session));
    }
    Ok(())
}

fn stdout_sink(json: bool) -> impl EventSink {
    let format = if json {
        LineFormat::Json
    } else {
        LineFormat::Wire
    };
    LineSink::new(std::io::stdout(), format)
}
