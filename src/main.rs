use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;

use clap::{Parser, ValueEnum};
use parabolic_rust::core::plot::SvgPlotSink;
use parabolic_rust::core::{
    AnimationScheduler, Clock, DerivedQuantities, PacingPolicy, RenderError, RenderSink,
    SimulationParameters, TickOutcome,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "parabolic_rust")]
#[command(version)]
#[command(about = "Projectile flight summary and real-time trajectory replay", long_about = None)]
struct Cli {
    /// Initial velocity (m/s)
    #[arg(short = 'v', long, allow_negative_numbers = true)]
    velocity: Option<f64>,

    /// Launch angle (degrees)
    #[arg(short = 'a', long, allow_negative_numbers = true)]
    angle: Option<f64>,

    /// Mass (kg), accepted but not used by the physics
    #[arg(short = 'm', long, allow_negative_numbers = true)]
    mass: Option<f64>,

    /// Drag coefficient, accepted but not used by the physics
    #[arg(short = 'd', long, allow_negative_numbers = true)]
    drag: Option<f64>,

    /// Virtual seconds per wall-clock second during replay
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    time_compression: Option<f64>,

    /// JSON file with launch parameters; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Animate the flight in real time and print each plotted point
    #[arg(long)]
    replay: bool,

    /// Write the replay as an SVG chart (implies --replay)
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Space ticks a fixed number of milliseconds apart instead of by virtual time
    #[arg(long)]
    fixed_interval_ms: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    fn parameters(&self) -> Result<SimulationParameters, Box<dyn Error>> {
        let mut params = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("could not read config '{}': {e}", path.display()))?;
                serde_json::from_str::<SimulationParameters>(&text)
                    .map_err(|e| format!("invalid config '{}': {e}", path.display()))?
            }
            None => SimulationParameters::default(),
        };

        if let Some(v) = self.velocity {
            params.initial_velocity_mps = v;
        }
        if let Some(a) = self.angle {
            params.launch_angle_deg = a;
        }
        if let Some(m) = self.mass {
            params.mass_kg = m;
        }
        if let Some(d) = self.drag {
            params.drag_coefficient = d;
        }
        if let Some(c) = self.time_compression {
            params.time_compression = c;
        }
        Ok(params)
    }

    fn pacing(&self) -> PacingPolicy {
        match self.fixed_interval_ms {
            Some(ms) => PacingPolicy::FixedInterval { ms },
            None => PacingPolicy::ElapsedVirtualTime,
        }
    }
}

/// Prints plotted points as they arrive and optionally feeds an SVG chart.
struct ReplaySink {
    echo: bool,
    points: Vec<(f64, f64)>,
    plot: Option<SvgPlotSink>,
}

impl RenderSink for ReplaySink {
    fn draw(&mut self, x: f64, y: f64) -> Result<(), RenderError> {
        if self.echo {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "x = {x:.2} m, y = {y:.2} m").map_err(|e| {
                if e.kind() == io::ErrorKind::BrokenPipe {
                    RenderError::SinkClosed
                } else {
                    RenderError::Backend(e.to_string())
                }
            })?;
        }
        if let Some(plot) = self.plot.as_mut() {
            plot.draw(x, y)?;
        }
        self.points.push((x, y));
        Ok(())
    }
}

fn replay(
    scheduler: &mut AnimationScheduler,
    sink: &mut ReplaySink,
) -> Result<usize, Box<dyn Error>> {
    let mut ticks = 0;
    loop {
        match scheduler.poll(sink)? {
            TickOutcome::Plotted { .. } => ticks += 1,
            TickOutcome::Landed { t, x, .. } => {
                ticks += 1;
                info!(ticks, t, x, "replay landed");
                return Ok(ticks);
            }
            TickOutcome::Inactive => return Ok(ticks),
            TickOutcome::Waiting | TickOutcome::Stale => {}
        }
        if let Some(due) = scheduler.next_due() {
            let wait = (due - scheduler.clock().now()).to_std().unwrap_or_default();
            thread::sleep(wait);
        }
    }
}

fn print_table(params: &SimulationParameters, derived: &DerivedQuantities) {
    println!(
        "Launch: {:.2} m/s at {:.2} deg (time compression x{})",
        params.initial_velocity_mps, params.launch_angle_deg, params.time_compression
    );
    println!("{}", derived.summary());
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let params = cli.parameters()?;
    let mut scheduler = AnimationScheduler::new().with_pacing(cli.pacing());
    let derived = scheduler.start(params)?;

    let animate = cli.replay || cli.svg.is_some();
    if cli.output == OutputFormat::Table {
        print_table(&params, &derived);
    }
    if !animate {
        if cli.output == OutputFormat::Json {
            let doc = serde_json::json!({
                "parameters": params,
                "derived": derived,
                "summary": derived.summary(),
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        return Ok(());
    }

    let mut sink = ReplaySink {
        echo: cli.output == OutputFormat::Table,
        points: Vec::new(),
        plot: cli.svg.as_ref().map(|_| SvgPlotSink::new(&derived)),
    };
    let ticks = replay(&mut scheduler, &mut sink)?;

    if let (Some(path), Some(plot)) = (&cli.svg, &sink.plot) {
        plot.save(path)?;
        info!(path = %path.display(), "wrote svg");
    }

    match cli.output {
        OutputFormat::Table => println!("Replay finished after {ticks} ticks"),
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "parameters": params,
                "derived": derived,
                "summary": derived.summary(),
                "trajectory": sink.points,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
