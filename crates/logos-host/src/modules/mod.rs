//! Demo host modules.

pub mod counter;
pub mod math;

pub use counter::{CounterModule, COUNT_CHANGED};
pub use math::MathPlugin;
