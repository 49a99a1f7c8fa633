//! Domain models for Brew Lens

mod analysis;
mod coffee;
mod flavor;
mod history;
mod roast;
mod statistics;

pub use analysis::*;
pub use coffee::*;
pub use flavor::*;
pub use history::*;
pub use roast::*;
pub use statistics::*;
