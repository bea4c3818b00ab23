//! Place search: a local dataset lane and an optional remote prediction lane
//! merged into one keyboard-navigable suggestion list.

pub mod controller;
pub mod list;
pub mod predictor;
pub mod session;

pub use controller::*;
pub use list::*;
pub use predictor::*;
pub use session::*;
