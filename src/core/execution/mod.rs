pub mod config;
pub mod simulation_engine;

// Re-export commonly used types
pub use config::{ConcurrencyMode, RowPolicy, SimulationConfig};
pub use simulation_engine::{SimulationEngine, SimulationObserver, StatePrinter};
