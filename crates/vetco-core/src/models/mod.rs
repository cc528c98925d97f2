//! Domain models for Vetco.

mod animal;
mod appointment;
mod availability;
pub mod calendar;
mod knowledge;
mod messaging;
mod notice;
mod party;

pub use animal::*;
pub use appointment::*;
pub use availability::*;
pub use knowledge::*;
pub use messaging::*;
pub use notice::*;
pub use party::*;
