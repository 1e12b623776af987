use belt_factory::{
    ConcurrencyMode, Factory, RowPolicy, SimulationConfig, SimulationEngine, StatePrinter,
};
use clap::Parser;
use std::io;

/// Run a conveyor belt factory simulation
#[derive(Debug, Parser)]
#[command(name = "belt_factory", version, about)]
struct Args {
    /// Print the state of the factory every tick. No effect on a stepped run
    #[arg(short = 'v', long = "is-verbose")]
    is_verbose: bool,

    /// Step through the simulation manually, tick by tick
    #[arg(short = 's', long = "is-stepped")]
    is_stepped: bool,

    /// How many slots the belt has, and so how many pairs of workers there are
    #[arg(short = 'b', long)]
    belt_length: Option<usize>,

    /// How many ticks to run for. No effect on a stepped run
    #[arg(short = 't', long)]
    ticks: Option<u64>,

    /// How many ticks an assembly takes. Accepted but not yet simulated
    #[arg(short = 'a', long)]
    assembly_ticks: Option<u64>,

    /// Worker orchestration: `independent` or `gated`
    #[arg(long, default_value = "independent")]
    policy: RowPolicy,

    /// Drive worker positions in parallel
    #[arg(long)]
    parallel: bool,

    /// Thread pool size for parallel runs
    #[arg(long, requires = "parallel")]
    threads: Option<usize>,

    /// Seed for the belt input, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn into_config(self) -> SimulationConfig {
        let mut config = SimulationConfig::resolve(self.belt_length, self.ticks, self.assembly_ticks)
            .with_row_policy(self.policy)
            .with_verbose(self.is_verbose)
            .with_stepped(self.is_stepped);
        if self.parallel {
            config = config.with_concurrency(ConcurrencyMode::Rayon);
        }
        if let Some(threads) = self.threads {
            config = config.with_thread_pool_size(threads);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.is_verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let config = args.into_config();
    log::debug!("Configuration: {:?}", config);

    let factory = Factory::from_config(&config)?;
    println!(
        "Empty belt created with {} slot(s)\nWorkers populated",
        config.belt_length
    );

    if config.stepped {
        let mut engine = SimulationEngine::new(factory, None);
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        engine.run_stepped(stdin.lock(), &mut stdout)?;
        engine.factory().print_tally();
    } else {
        let mut engine = SimulationEngine::new(factory, Some(config.ticks_to_run));
        if config.verbose {
            engine.add_observer(Box::new(StatePrinter));
        }
        println!("Running...");
        engine.run()?;
        println!("Finished");
        engine.factory().print_tally();
    }

    Ok(())
}
