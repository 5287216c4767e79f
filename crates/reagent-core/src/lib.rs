pub mod entity;
pub mod simulation;
pub mod world;
