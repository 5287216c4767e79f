//! RNG trait abstraction for the simulation
//!
//! Allows the engine to work with both:
//! - Rust's thread_rng() or a seeded RNG (normal runs)
//! - Fixed sequences in tests

/// Random number generator trait for the simulation
pub trait WorldRng {
    /// Generate random boolean with 50% probability
    fn gen_bool(&mut self) -> bool;

    /// Random horizontal direction, -1 or +1
    fn gen_direction(&mut self) -> i32 {
        if self.gen_bool() { 1 } else { -1 }
    }
}

// Blanket implementation for any type implementing rand::Rng
// This covers ThreadRng and the seedable Xoshiro generator owned by World
impl<T: ?Sized + rand::Rng> WorldRng for T {
    fn gen_bool(&mut self) -> bool {
        rand::Rng::r#gen(self)
    }
}
