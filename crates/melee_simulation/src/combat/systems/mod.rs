//! Combat systems (strategic layer logic)

pub mod attack;
pub mod hits;
pub mod upkeep;


// Re-export all systems
pub use attack::*;
pub use hits::*;
pub use upkeep::*;
