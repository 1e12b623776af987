use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A single tag carried in a belt slot or a worker's hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Item {
    Empty,
    ComponentA,
    ComponentB,
    Product,
}

impl Item {
    /// Items a worker can pick up and combine
    pub const COMPONENTS: [Item; 2] = [Item::ComponentA, Item::ComponentB];

    /// Items that may enter the belt at its head
    pub const INPUTS: [Item; 3] = [Item::Empty, Item::ComponentA, Item::ComponentB];

    pub fn is_component(self) -> bool {
        matches!(self, Item::ComponentA | Item::ComponentB)
    }

    pub fn is_input(self) -> bool {
        !matches!(self, Item::Product)
    }

    /// Draw a uniformly random input. Products are never drawn.
    pub fn random_input<R: Rng + ?Sized>(rng: &mut R) -> Item {
        *Self::INPUTS.choose(rng).unwrap_or(&Item::Empty)
    }

    /// Short display name
    pub fn name(self) -> &'static str {
        match self {
            Item::Empty => "EMPTY",
            Item::ComponentA => "A",
            Item::ComponentB => "B",
            Item::Product => "P",
        }
    }
}

impl Default for Item {
    fn default() -> Self {
        Item::Empty
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One of the two lines of workers facing the belt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Row {
    Top,
    Bottom,
}

impl Row {
    pub const ALL: [Row; 2] = [Row::Top, Row::Bottom];
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Row::Top => write!(f, "TOP"),
            Row::Bottom => write!(f, "BOTTOM"),
        }
    }
}
