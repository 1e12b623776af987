use crate::core::errors::FactoryError;
use crate::core::factory::Factory;
use crate::core::types::Item;
use log::debug;
use std::io::{BufRead, Write};

/// Observer trait for simulation progress
pub trait SimulationObserver {
    /// Called after every completed tick
    fn on_tick(&mut self, tick: u64, fallen: Item, factory: &Factory);

    /// Called once when a run loop finishes
    fn on_run_complete(&mut self, _factory: &Factory) {}
}

/// Prints the factory state after every tick
pub struct StatePrinter;

impl SimulationObserver for StatePrinter {
    fn on_tick(&mut self, _tick: u64, _fallen: Item, factory: &Factory) {
        factory.print_state();
    }
}

/// Drives a factory tick by tick, in batch or stepped mode
pub struct SimulationEngine {
    factory: Factory,
    max_ticks: Option<u64>,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl SimulationEngine {
    /// Create a new engine with an optional tick limit
    pub fn new(factory: Factory, max_ticks: Option<u64>) -> Self {
        Self {
            factory,
            max_ticks,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Advance one tick and notify observers, returns the fallen item
    pub fn step(&mut self) -> Result<Item, FactoryError> {
        let fallen = self.factory.tick()?;
        let tick = self.factory.ticks();
        for observer in &mut self.observers {
            observer.on_tick(tick, fallen, &self.factory);
        }
        Ok(fallen)
    }

    /// Run until the tick limit, returns the final tick count.
    /// Without a limit this returns immediately.
    pub fn run(&mut self) -> Result<u64, FactoryError> {
        debug!("Running for {:?} ticks", self.max_ticks);
        while self
            .max_ticks
            .map_or(false, |max| self.current_tick() < max)
        {
            self.step()?;
        }
        debug!("Finished after {} ticks", self.current_tick());
        self.notify_run_complete();
        Ok(self.current_tick())
    }

    /// Interactive loop: an empty line advances one tick and prints the
    /// state, anything else (or end of input) stops.
    pub fn run_stepped<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        output: &mut W,
    ) -> Result<u64, FactoryError> {
        writeln!(
            output,
            "What do you want to do? Press enter to step through to the next tick, or any other input to exit"
        )?;
        let mut line = String::new();
        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                debug!("Input closed, ending stepped run");
                break;
            }
            if !line.trim_end_matches(|c| c == '\r' || c == '\n').is_empty() {
                break;
            }
            self.step()?;
            write!(output, "{}", self.factory.render_state())?;
            writeln!(output, "What do you want to do now? Same options as before!")?;
        }
        self.notify_run_complete();
        Ok(self.current_tick())
    }

    fn notify_run_complete(&mut self) {
        for observer in &mut self.observers {
            observer.on_run_complete(&self.factory);
        }
    }

    pub fn current_tick(&self) -> u64 {
        self.factory.ticks()
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn into_factory(self) -> Factory {
        self.factory
    }
}
