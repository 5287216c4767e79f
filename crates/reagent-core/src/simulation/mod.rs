//! Substance data used by the engine

// Re-export from reagent-simulation so engine code has a single import path
pub use reagent_simulation::{
    Cell, MAX_REACTIONS, MAX_SPREAD_RATE, Reaction, RegistryError, SubstanceDef, SubstanceId,
    Substances, cell_flags,
};
