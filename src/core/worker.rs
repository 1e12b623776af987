use super::belt::Belt;
use super::errors::FactoryError;
use super::types::{Item, Row};
use log::debug;
use serde::{Deserialize, Serialize};

/// What a worker did with its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerAction {
    PlacedProduct,
    PickedUp(Item),
    Assembled,
}

/// A worker standing at one belt position in one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    belt_position: usize,
    row: Row,
    held: Vec<Item>,
}

impl Worker {
    pub const NUMBER_OF_HANDS: usize = 2;

    /// Create an empty-handed worker
    pub fn new(belt_position: usize, row: Row) -> Self {
        Self {
            belt_position,
            row,
            held: Vec::with_capacity(Self::NUMBER_OF_HANDS),
        }
    }

    /// Create a worker already holding `held`, checking the hand invariants
    pub fn holding(belt_position: usize, row: Row, held: Vec<Item>) -> Result<Self, FactoryError> {
        if held.len() > Self::NUMBER_OF_HANDS {
            return Err(FactoryError::InvalidHand(format!(
                "{} items for {} hands",
                held.len(),
                Self::NUMBER_OF_HANDS
            )));
        }
        if held.contains(&Item::Empty) {
            return Err(FactoryError::InvalidHand("cannot hold an empty slot".to_string()));
        }
        if held.contains(&Item::Product) && held.len() > 1 {
            return Err(FactoryError::InvalidHand(
                "a product must be held alone".to_string(),
            ));
        }
        if held.len() == 2 && held[0] == held[1] {
            return Err(FactoryError::InvalidHand(format!(
                "duplicate component {}",
                held[0]
            )));
        }
        Ok(Self { belt_position, row, held })
    }

    pub fn belt_position(&self) -> usize {
        self.belt_position
    }

    pub fn row(&self) -> Row {
        self.row
    }

    pub fn held(&self) -> &[Item] {
        &self.held
    }

    /// Act once against the slot at this worker's position.
    /// Returns true iff an action was taken.
    pub fn take_action(&mut self, belt: &mut Belt) -> Result<bool, FactoryError> {
        let slot = belt.slot_mut(self.belt_position)?;
        Ok(self.act_on_slot(slot).is_some())
    }

    /// Apply the action policy to `slot`: place, then pick up, then assemble.
    /// The first action that succeeds ends the turn.
    pub fn act_on_slot(&mut self, slot: &mut Item) -> Option<WorkerAction> {
        let action = if self.place_product(slot) {
            Some(WorkerAction::PlacedProduct)
        } else if let Some(item) = self.pick_up_component(slot) {
            Some(WorkerAction::PickedUp(item))
        } else if self.assemble() {
            Some(WorkerAction::Assembled)
        } else {
            None
        };

        if let Some(action) = action {
            debug!(
                "[Worker {}:{}] {:?}, now holding {}",
                self.row,
                self.belt_position + 1,
                action,
                self.held_label()
            );
        }
        action
    }

    fn can_place_product(&self, slot: Item) -> bool {
        self.held.contains(&Item::Product) && slot == Item::Empty
    }

    fn can_pick_up_component(&self, item: Item) -> bool {
        item.is_component()
            && self.held.len() < Self::NUMBER_OF_HANDS
            && !self.held.contains(&item)
            && !self.held.contains(&Item::Product)
    }

    fn can_assemble(&self) -> bool {
        self.held.contains(&Item::ComponentA) && self.held.contains(&Item::ComponentB)
    }

    fn place_product(&mut self, slot: &mut Item) -> bool {
        if !self.can_place_product(*slot) {
            return false;
        }
        if let Some(index) = self.held.iter().position(|item| *item == Item::Product) {
            *slot = self.held.remove(index);
            return true;
        }
        false
    }

    fn pick_up_component(&mut self, slot: &mut Item) -> Option<Item> {
        let item = *slot;
        if !self.can_pick_up_component(item) {
            return None;
        }
        self.held.push(item);
        *slot = Item::Empty;
        Some(item)
    }

    fn assemble(&mut self) -> bool {
        if !self.can_assemble() {
            return false;
        }
        self.held.clear();
        self.held.push(Item::Product);
        true
    }

    /// Held items rendered as `[A, B]`
    pub fn held_label(&self) -> String {
        let names: Vec<&str> = self.held.iter().map(|item| item.name()).collect();
        format!("[{}]", names.join(", "))
    }
}
