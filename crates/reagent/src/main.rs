use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use reagent::config::{OutputFormat, ReagentConfig};
use reagent::entity::{IdleInput, InputSource};
use reagent::render::create_sink;
use reagent::runner::Runner;
use reagent::scenario::{ScenarioDefinition, ScriptedInput};
use reagent::simulation::Substances;
use reagent::world::World;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (RON); defaults to ./reagent.ron if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Substance table (RON) replacing the built-in chemistry
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Scripted input (RON scenario)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for spread directions
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory for PNG frames
    #[arg(long)]
    output: Option<PathBuf>,

    /// Frame output: png, text or none
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Run as fast as possible instead of at the target tick rate
    #[arg(long)]
    unpaced: bool,

    /// List substances and exit
    #[arg(long)]
    list_substances: bool,

    /// Print the built-in substance table as RON and exit
    #[arg(long)]
    dump_registry: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments
    let args = Args::parse();

    // Handle --dump-registry flag
    if args.dump_registry {
        let ron = Substances::new()
            .to_ron_string()
            .context("Failed to serialize substance table")?;
        println!("{}", ron);
        return Ok(());
    }

    let substances = match &args.registry {
        Some(path) => Substances::from_file(path)
            .with_context(|| format!("Invalid substance table: {}", path.display()))?,
        None => Substances::new(),
    };
    substances
        .validate()
        .context("Substance table failed validation")?;

    // Handle --list-substances flag
    if args.list_substances {
        println!("{:>3}  {:<12} {:>8} {:>7}  reactions", "id", "name", "density", "spread");
        for def in substances.iter() {
            println!(
                "{:>3}  {:<12} {:>8} {:>7}  {}",
                def.id,
                def.name,
                def.density,
                def.spread_rate,
                def.reactions.len()
            );
        }
        return Ok(());
    }

    let mut config = ReagentConfig::load(args.config.as_deref())?;

    // Command-line flags override configuration
    if let Some(ticks) = args.ticks {
        config.runner.max_ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(output) = args.output {
        config.output.directory = output;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.unpaced {
        config.runner.paced = false;
    }

    let scenario = args
        .scenario
        .as_ref()
        .map(ScenarioDefinition::from_file)
        .transpose()?;

    config
        .simulation
        .validate()
        .context("Invalid simulation configuration")?;

    let grid_size = config.world.grid_size();
    if grid_size.area() == 0 {
        bail!(
            "World {}x{} with cell size {} has no cells",
            config.world.width,
            config.world.height,
            config.world.cell_size
        );
    }

    let mut world = World::new(grid_size, substances, config.simulation.clone());
    let mut sink = create_sink(
        config.output.format,
        &config.output.directory,
        config.world.cell_size,
    )?;

    let mut input: Box<dyn InputSource> = match &scenario {
        Some(scenario) => {
            log::info!("Scenario: {} ({} ticks of input)", scenario.name, scenario.duration());
            Box::new(ScriptedInput::new(&scenario.actions))
        }
        None => Box::new(IdleInput),
    };

    let runner = Runner::new(config.runner.clone(), config.output.frame_every);
    runner.run(&mut world, input.as_mut(), sink.as_mut())?;

    if let Some(scenario) = scenario {
        let results = scenario.verify(&world);
        let failures = results.iter().filter(|result| !result.passed).count();

        for result in &results {
            if result.passed {
                log::info!("PASS {}", result.message);
            } else {
                log::error!("FAIL {}", result.message);
            }
        }

        if failures > 0 {
            bail!("{} of {} checks failed", failures, results.len());
        }
    }

    Ok(())
}
