use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use twix_controls::preview::trace_points;
use twix_controls::{
    ControlConfig, ControlError, ControlResult, DragEvent, RecordingDriver, SettleAnimation,
    SpringControl, SpringRegistry, SpringSettings, SpringValue, register_spring_plugin,
};

/// Simulated frame interval for scripted gestures (ms).
const FRAME_MS: f64 = 16.0;

#[derive(Parser)]
#[command(name = "twix")]
#[command(about = "twix - spring tweak control engine", long_about = None)]
struct Cli {
    /// Control configuration YAML (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone, Copy)]
struct SpringArgs {
    #[arg(long)]
    tension: f64,
    #[arg(long)]
    friction: f64,
    #[arg(long)]
    mass: Option<f64>,
}

impl SpringArgs {
    fn value(&self) -> SpringValue {
        SpringValue {
            tension: self.tension,
            friction: self.friction,
            mass: self.mass,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print spring displacement at the given times
    Sample {
        #[command(flatten)]
        spring: SpringArgs,
        /// Times in milliseconds
        #[arg(long = "t", num_args = 1.., required = true)]
        times: Vec<f64>,
    },
    /// Print the preview trace as CSV
    Preview {
        #[command(flatten)]
        spring: SpringArgs,
        #[arg(long, default_value_t = 120)]
        width: u32,
        #[arg(long, default_value_t = 40)]
        height: u32,
    },
    /// Simulate a drag gesture and print what gets committed
    Drag {
        #[command(flatten)]
        spring: SpringArgs,
        /// Total horizontal movement in pixels
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dx: f64,
        /// Total vertical movement in pixels
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dy: f64,
        /// Number of move events in the gesture
        #[arg(long, default_value_t = 10)]
        steps: u32,
    },
    /// Apply an external value change and show that nothing is committed
    Sync {
        #[arg(long)]
        from_tension: f64,
        #[arg(long)]
        to_tension: f64,
        #[arg(long, default_value_t = 12.0)]
        friction: f64,
    },
}

#[derive(Serialize)]
struct DragReport {
    displayed: SpringValue,
    committed: Vec<SpringValue>,
    animations: Vec<SettleAnimation>,
}

fn main() -> ControlResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Sample { spring, times } => cmd_sample(spring.value(), &times),
        Commands::Preview {
            spring,
            width,
            height,
        } => cmd_preview(&config, spring.value(), width, height),
        Commands::Drag {
            spring,
            dx,
            dy,
            steps,
        } => cmd_drag(config, spring.value(), dx, dy, steps),
        Commands::Sync {
            from_tension,
            to_tension,
            friction,
        } => cmd_sync(config, from_tension, to_tension, friction),
    }
}

fn load_config(path: Option<&Path>) -> ControlResult<ControlConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading control config");
            ControlConfig::load(path)
        }
        None => Ok(ControlConfig::default()),
    }
}

fn cmd_sample(value: SpringValue, times: &[f64]) -> ControlResult<()> {
    let curve = value.curve();
    println!(
        "damping: {:?} (zeta = {:.4})",
        curve.damping(),
        curve.damping_ratio()
    );
    for &t in times {
        println!("{t:>10.2} ms  {:.6}", curve.at(t));
    }
    Ok(())
}

fn cmd_preview(config: &ControlConfig, value: SpringValue, width: u32, height: u32) -> ControlResult<()> {
    let points = trace_points(&value.curve(), width, height, config.preview_time_scale);
    println!("x,y");
    for (x, y) in points {
        println!("{x},{y:.3}");
    }
    Ok(())
}

fn mount(
    config: ControlConfig,
    value: SpringValue,
) -> ControlResult<(SpringControl<RecordingDriver>, Rc<RefCell<Vec<SpringValue>>>)> {
    let mut registry = SpringRegistry::new();
    register_spring_plugin(&mut registry);

    let committed: Rc<RefCell<Vec<SpringValue>>> = Rc::default();
    let sink = Rc::clone(&committed);
    let control = SpringControl::new(
        value,
        SpringSettings::default(),
        Arc::new(registry),
        config,
        RecordingDriver::new(),
        Box::new(move |v: &SpringValue| sink.borrow_mut().push(*v)),
    )?;
    Ok((control, committed))
}

fn cmd_drag(config: ControlConfig, value: SpringValue, dx: f64, dy: f64, steps: u32) -> ControlResult<()> {
    if steps == 0 {
        return Err(ControlError::InvalidArg {
            what: "steps must be at least 1",
        });
    }
    let delay = config.commit_delay_ms;
    let (mut control, committed) = mount(config, value)?;

    let mut now = 0.0;
    control.on_drag(DragEvent::Start, now)?;
    for i in 1..=steps {
        now += FRAME_MS;
        let frac = f64::from(i) / f64::from(steps);
        control.on_drag(
            DragEvent::Move {
                dx: dx * frac,
                dy: dy * frac,
            },
            now,
        )?;
        control.tick(now);
    }
    control.on_drag(DragEvent::End, now)?;
    let report = control.tick(now + delay);
    info!(outcome = ?report.commit, "gesture finished");

    let out = DragReport {
        displayed: *control.displayed_value(),
        committed: committed.borrow().clone(),
        animations: control.driver().started().to_vec(),
    };
    print_json(&out)
}

fn cmd_sync(config: ControlConfig, from_tension: f64, to_tension: f64, friction: f64) -> ControlResult<()> {
    let (mut control, committed) = mount(config, SpringValue::new(from_tension, friction))?;
    let adopted = control.sync_external(&SpringValue::new(to_tension, friction));
    control.tick(f64::MAX);

    println!("adopted:   {adopted}");
    println!("displayed: {:?}", control.displayed_value());
    println!("set calls: {}", committed.borrow().len());
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> ControlResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| ControlError::Config(e.to_string()))?;
    println!("{text}");
    Ok(())
}
