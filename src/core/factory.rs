use super::belt::{Belt, RandomFeed};
use super::errors::FactoryError;
use super::execution::config::{ConcurrencyMode, RowPolicy, SimulationConfig};
use super::types::{Item, Row};
use super::worker::Worker;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Observable state between ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorySnapshot {
    pub tick: u64,
    pub belt: Vec<Item>,
    pub top: Vec<Vec<Item>>,
    pub bottom: Vec<Vec<Item>>,
}

/// A belt with a row of workers on either side.
///
/// Worker `i` of each row stands at belt slot `i`. Every tick the belt shifts
/// once, then the workers act under the configured [`RowPolicy`].
pub struct Factory {
    belt: Belt,
    top: Vec<Worker>,
    bottom: Vec<Worker>,
    output: Vec<Item>,
    policy: RowPolicy,
    concurrency: ConcurrencyMode,
    pool: Option<rayon::ThreadPool>,
    ticks: u64,
}

impl Factory {
    /// Build a factory around a randomly fed belt of `belt_length` slots
    pub fn new(belt_length: usize) -> Result<Self, FactoryError> {
        Self::with_belt(Belt::new(), belt_length)
    }

    /// Grow `belt` to `belt_length` slots and staff every position
    pub fn with_belt(belt: Belt, belt_length: usize) -> Result<Self, FactoryError> {
        if belt_length == 0 {
            return Err(FactoryError::InvalidConfiguration(
                "belt length must be positive".to_string(),
            ));
        }
        if belt.len() > belt_length {
            return Err(FactoryError::InvalidConfiguration(format!(
                "belt already has {} slots, more than the requested {}",
                belt.len(),
                belt_length
            )));
        }

        let mut factory = Self {
            belt,
            top: Vec::with_capacity(belt_length),
            bottom: Vec::with_capacity(belt_length),
            output: Vec::new(),
            policy: RowPolicy::default(),
            concurrency: ConcurrencyMode::default(),
            pool: None,
            ticks: 0,
        };
        factory.set_up(belt_length);
        Ok(factory)
    }

    /// Build a factory from a run configuration
    pub fn from_config(config: &SimulationConfig) -> Result<Self, FactoryError> {
        config.validate()?;
        let feed = match config.random_seed {
            Some(seed) => RandomFeed::seeded(seed),
            None => RandomFeed::from_entropy(),
        };
        Self::with_belt(Belt::with_feed(Box::new(feed)), config.belt_length)?
            .with_policy(config.row_policy)
            .with_concurrency(config.concurrency_mode, config.thread_pool_size)
    }

    pub fn with_policy(mut self, policy: RowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Select how workers are driven. `threads` builds a dedicated pool in
    /// Rayon mode; otherwise the global pool is used.
    pub fn with_concurrency(
        mut self,
        mode: ConcurrencyMode,
        threads: Option<usize>,
    ) -> Result<Self, FactoryError> {
        self.concurrency = mode;
        self.pool = match (mode, threads) {
            (ConcurrencyMode::Rayon, Some(n)) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| FactoryError::InvalidConfiguration(e.to_string()))?,
            ),
            _ => None,
        };
        Ok(self)
    }

    fn set_up(&mut self, belt_length: usize) {
        // staff any slots the supplied belt already has
        while self.top.len() < self.belt.len() {
            self.add_worker_pair();
        }
        while self.belt.len() < belt_length {
            self.belt.add_slot();
            self.add_worker_pair();
        }
        debug!(
            "Empty belt created with {} slot(s), workers populated",
            belt_length
        );
    }

    fn add_worker_pair(&mut self) {
        self.top.push(Worker::new(self.top.len(), Row::Top));
        self.bottom.push(Worker::new(self.bottom.len(), Row::Bottom));
    }

    /// Advance one tick: shift the belt, then let the workers act.
    /// Returns the item that fell off the end of the belt.
    pub fn tick(&mut self) -> Result<Item, FactoryError> {
        let fallen = self.belt.shift(None);
        self.output.push(fallen);
        self.ticks += 1;
        debug!("=== Tick {} === {} fell off the belt", self.ticks, fallen);

        match self.concurrency {
            ConcurrencyMode::Sequential => self.action_workers()?,
            ConcurrencyMode::Rayon => self.action_workers_parallel(),
        }
        Ok(fallen)
    }

    fn action_workers(&mut self) -> Result<(), FactoryError> {
        match self.policy {
            RowPolicy::Independent => {
                for worker in self.top.iter_mut().chain(self.bottom.iter_mut()) {
                    worker.take_action(&mut self.belt)?;
                }
            }
            RowPolicy::Gated => {
                for (top, bottom) in self.top.iter_mut().zip(self.bottom.iter_mut()) {
                    if !top.take_action(&mut self.belt)? {
                        bottom.take_action(&mut self.belt)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Each parallel task owns one slot and the workers standing at it
    fn action_workers_parallel(&mut self) {
        let policy = self.policy;
        let slots = self.belt.slots_mut();
        let top = &mut self.top;
        let bottom = &mut self.bottom;

        let mut drive = move || match policy {
            RowPolicy::Independent => {
                slots
                    .par_iter_mut()
                    .zip(top.par_iter_mut())
                    .for_each(|(slot, worker)| {
                        worker.act_on_slot(slot);
                    });
                slots
                    .par_iter_mut()
                    .zip(bottom.par_iter_mut())
                    .for_each(|(slot, worker)| {
                        worker.act_on_slot(slot);
                    });
            }
            RowPolicy::Gated => {
                slots
                    .par_iter_mut()
                    .zip(top.par_iter_mut())
                    .zip(bottom.par_iter_mut())
                    .for_each(|((slot, top), bottom)| {
                        if top.act_on_slot(slot).is_none() {
                            bottom.act_on_slot(slot);
                        }
                    });
            }
        };

        match &self.pool {
            Some(pool) => pool.install(drive),
            None => drive(),
        }
    }

    pub fn belt(&self) -> &Belt {
        &self.belt
    }

    pub fn workers(&self, row: Row) -> &[Worker] {
        match row {
            Row::Top => &self.top,
            Row::Bottom => &self.bottom,
        }
    }

    /// Put `worker` in place of whoever stands at its row and position
    pub fn replace_worker(&mut self, worker: Worker) -> Result<(), FactoryError> {
        let row = match worker.row() {
            Row::Top => &mut self.top,
            Row::Bottom => &mut self.bottom,
        };
        let len = row.len();
        let slot = row
            .get_mut(worker.belt_position())
            .ok_or(FactoryError::IndexOutOfRange {
                index: worker.belt_position(),
                len,
            })?;
        *slot = worker;
        Ok(())
    }

    /// Every item that has fallen off the belt, oldest first
    pub fn output(&self) -> &[Item] {
        &self.output
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn policy(&self) -> RowPolicy {
        self.policy
    }

    pub fn concurrency(&self) -> ConcurrencyMode {
        self.concurrency
    }

    pub fn snapshot(&self) -> FactorySnapshot {
        let hands = |workers: &[Worker]| -> Vec<Vec<Item>> {
            workers.iter().map(|w| w.held().to_vec()).collect()
        };
        FactorySnapshot {
            tick: self.ticks,
            belt: self.belt.slots(),
            top: hands(&self.top),
            bottom: hands(&self.bottom),
        }
    }

    /// Count of each item in the output, most common first.
    /// Equal counts keep the order in which the items first fell off.
    pub fn tally(&self) -> Vec<(Item, usize)> {
        let mut counts: Vec<(Item, usize)> = Vec::new();
        for item in &self.output {
            match counts.iter_mut().find(|(seen, _)| seen == item) {
                Some((_, count)) => *count += 1,
                None => counts.push((*item, 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    pub fn render_tally(&self) -> String {
        let entries: Vec<String> = self
            .tally()
            .iter()
            .map(|(item, count)| format!("{}: {}", item, count))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }

    pub fn render_state(&self) -> String {
        let row_line = |row: Row| {
            let entries: Vec<String> = self
                .workers(row)
                .iter()
                .map(|w| format!("'{}: {}'", w.belt_position() + 1, w.held_label()))
                .collect();
            format!("{} ROW: [{}]\n", row, entries.join(", "))
        };
        let slots: Vec<String> = self
            .belt
            .slots()
            .iter()
            .enumerate()
            .map(|(i, item)| format!("'{}: [{}]'", i + 1, item))
            .collect();

        let mut text = row_line(Row::Top);
        text.push_str(&format!("BELT: [{}]\n", slots.join(", ")));
        text.push_str(&row_line(Row::Bottom));
        text.push_str("\n***************\n\n");
        text
    }

    pub fn print_state(&self) {
        print!("{}", self.render_state());
    }

    pub fn print_tally(&self) {
        println!("{}", self.render_tally());
    }
}

impl std::fmt::Debug for Factory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("belt", &self.belt)
            .field("top", &self.top)
            .field("bottom", &self.bottom)
            .field("policy", &self.policy)
            .field("concurrency", &self.concurrency)
            .field("ticks", &self.ticks)
            .finish()
    }
}
