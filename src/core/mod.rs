pub mod belt;
pub mod errors;
pub mod execution;
pub mod factory;
pub mod types;
pub mod worker;

#[cfg(test)]
mod tests;
