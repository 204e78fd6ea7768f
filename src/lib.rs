#[macro_use]
pub mod core;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod genotype;
pub mod runner;
pub mod simulation;
pub mod stats;
