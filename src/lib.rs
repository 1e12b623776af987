pub mod core;

// Re-export commonly used types
pub use crate::core::belt::{Belt, InputFeed, RandomFeed, ScriptedFeed};
pub use crate::core::errors::FactoryError;
pub use crate::core::execution::{
    ConcurrencyMode, RowPolicy, SimulationConfig, SimulationEngine, SimulationObserver, StatePrinter,
};
pub use crate::core::factory::{Factory, FactorySnapshot};
pub use crate::core::types::{Item, Row};
pub use crate::core::worker::{Worker, WorkerAction};
