//! Camera flight: animated, cancellable transitions of the globe camera to a
//! destination, driven one host frame at a time.

pub mod engine;
pub mod plan;
pub mod pose;
pub mod surface;

pub use engine::*;
pub use plan::*;
pub use pose::*;
pub use surface::*;
