//! # Reagent - falling-sand chemistry sandbox
//!
//! Substances fall, rise and spread by density and react with their vertical
//! neighbors. This crate wires the engine to configuration, scripted input
//! and headless renderers.

pub mod config;
pub mod render;
pub mod runner;
pub mod scenario;

// Re-export core modules for convenience
pub use reagent_core::entity;
pub use reagent_core::simulation;
pub use reagent_core::world;

pub use config::ReagentConfig;
pub use runner::{RunSummary, Runner};
