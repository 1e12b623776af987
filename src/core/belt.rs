use super::errors::FactoryError;
use super::types::Item;
use log::trace;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;

/// Source of the items entering the head of the belt
pub trait InputFeed: Send {
    /// Produce the next input item
    fn next_input(&mut self) -> Item;
}

/// Uniform random feed over the input tags
pub struct RandomFeed {
    rng: StdRng,
}

impl RandomFeed {
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Deterministic feed for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl InputFeed for RandomFeed {
    fn next_input(&mut self) -> Item {
        Item::random_input(&mut self.rng)
    }
}

/// Replays a fixed sequence of inputs, then feeds Empty forever
pub struct ScriptedFeed {
    remaining: VecDeque<Item>,
}

impl ScriptedFeed {
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        Self { remaining: items.into_iter().collect() }
    }
}

impl InputFeed for ScriptedFeed {
    fn next_input(&mut self) -> Item {
        self.remaining.pop_front().unwrap_or(Item::Empty)
    }
}

/// Fixed-length shift register of item slots.
///
/// Index 0 is the head where new input enters; the last index is the tail
/// where items fall off.
pub struct Belt {
    slots: VecDeque<Item>,
    feed: Box<dyn InputFeed>,
}

impl Belt {
    /// Empty belt fed by a random source
    pub fn new() -> Self {
        Self::with_feed(Box::new(RandomFeed::from_entropy()))
    }

    pub fn with_feed(feed: Box<dyn InputFeed>) -> Self {
        Self {
            slots: VecDeque::new(),
            feed,
        }
    }

    /// Append one Empty slot at the tail. Used during setup only.
    pub fn add_slot(&mut self) -> &mut Self {
        self.slots.push_back(Item::Empty);
        self
    }

    /// Advance the belt one step.
    ///
    /// `replacement` (or the next feed item when `None`) enters at the head,
    /// every slot moves one toward the tail and the old tail item is returned.
    pub fn shift(&mut self, replacement: Option<Item>) -> Item {
        let incoming = replacement.unwrap_or_else(|| {
            let drawn = self.feed.next_input();
            trace!("Belt drew input {}", drawn);
            drawn
        });
        self.slots.push_front(incoming);
        // length was at least one after the push
        self.slots.pop_back().unwrap_or(incoming)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots from head to tail
    pub fn slots(&self) -> Vec<Item> {
        self.slots.iter().copied().collect()
    }

    pub fn slot(&self, index: usize) -> Result<Item, FactoryError> {
        self.slots.get(index).copied().ok_or(FactoryError::IndexOutOfRange {
            index,
            len: self.slots.len(),
        })
    }

    pub fn slot_mut(&mut self, index: usize) -> Result<&mut Item, FactoryError> {
        let len = self.slots.len();
        self.slots
            .get_mut(index)
            .ok_or(FactoryError::IndexOutOfRange { index, len })
    }

    pub fn set_slot(&mut self, index: usize, item: Item) -> Result<(), FactoryError> {
        *self.slot_mut(index)? = item;
        Ok(())
    }

    /// Contiguous mutable view of the slots, head first
    pub(crate) fn slots_mut(&mut self) -> &mut [Item] {
        self.slots.make_contiguous()
    }
}

impl Default for Belt {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Belt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Belt").field("slots", &self.slots).finish()
    }
}
