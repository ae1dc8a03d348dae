//! Bridge assembly and the page-facing entry point.

pub mod bridge;
pub mod facade;
pub mod namespace;

pub use bridge::Bridge;
pub use facade::{Facade, FacadeProperty};
pub use namespace::{Installation, Namespace, READY_EVENT};
