//! Wiring - guitar wiring diagram runner
//!
//! Loads a saved diagram, starts the signal simulation and prints which
//! wires carry signal or ground.
//!
//! # Usage
//!
//! ```bash
//! wiring strat.json --flip 7 --rotate 14
//! wiring --demo --save
//! RUST_LOG=guitar_wiring_core=debug wiring strat.json
//! ```

use std::path::PathBuf;

use clap::Parser;
use guitar_wiring_core::{
    demos,
    diagram::{validate_diagram, ComponentId, Diagram},
    error::{Result, WiringError},
    format::{self, Base64Codec},
    InductionBootstrap, SimulationConfig, Simulator,
};

/// Guitar wiring diagram simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the saved diagram
    #[arg(value_name = "DIAGRAM_FILE", required_unless_present = "demo")]
    diagram_file: Option<PathBuf>,

    /// The file holds URL-safe base64 encoded state
    #[arg(long)]
    encoded: bool,

    /// Use the built-in strat pickup and jack diagram
    #[arg(long, conflicts_with = "diagram_file")]
    demo: bool,

    /// Flip a switch before starting (repeatable)
    #[arg(long, value_name = "ID")]
    flip: Vec<u32>,

    /// Rotate a potentiometer before starting (repeatable)
    #[arg(long, value_name = "ID")]
    rotate: Vec<u32>,

    /// Seed +1 onto pickups that have no voltage on either coil end
    #[arg(long)]
    seed_hot: bool,

    /// Print the diagram as JSON after running
    #[arg(long)]
    save: bool,
}

fn read_diagram(args: &Args) -> Result<Diagram> {
    let Some(path) = &args.diagram_file else {
        let (diagram, _) = demos::strat_pickup_and_jack()?;
        return Ok(diagram);
    };
    if !args.encoded {
        return format::load_file(path);
    }
    let content = std::fs::read_to_string(path).map_err(|e| WiringError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    format::load_encoded(&content, &Base64Codec)
}

fn pin_label(diagram: &Diagram, pin: ComponentId) -> Result<String> {
    let p = diagram.pin(pin)?;
    match p.owner {
        Some(owner) => Ok(format!("{} {}", diagram.full_name(owner)?, p.name)),
        None => Ok(format!("Pin ({})", pin)),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut diagram = read_diagram(&args)?;
    validate_diagram(&diagram)?;

    for &id in &args.flip {
        diagram.flip(ComponentId(id))?;
    }
    for &id in &args.rotate {
        diagram.rotate(ComponentId(id))?;
    }

    let bootstrap = if args.seed_hot {
        InductionBootstrap::SeedHot
    } else {
        InductionBootstrap::Lazy
    };
    let config = SimulationConfig::new().with_bootstrap(bootstrap);
    let mut simulator = Simulator::with_config(diagram, config);
    simulator.start()?;

    let diagram = simulator.diagram();
    for wire in diagram.wires() {
        println!(
            "Wire {} ({}) {} -> {}: {}",
            wire.id,
            wire.color,
            pin_label(diagram, wire.start_pin())?,
            pin_label(diagram, wire.end_pin())?,
            wire.voltage()
        );
    }

    if args.save {
        println!("{}", format::save_pretty(diagram)?);
    }

    Ok(())
}
