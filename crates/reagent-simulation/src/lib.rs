//! Substance data for reagent
//!
//! This crate provides the foundational data types for the simulation:
//! - Substance definitions (SubstanceId, SubstanceDef, Substances)
//! - Reaction triples (Reaction)
//! - Registry validation errors (RegistryError)
//! - Cell types (Cell, cell_flags)

mod cell;
mod reactions;
mod substances;

pub use cell::{Cell, cell_flags};
pub use reactions::{MAX_REACTIONS, Reaction};
pub use substances::{MAX_SPREAD_RATE, RegistryError, SubstanceDef, SubstanceId, Substances};
