//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (ClassReader, PairWriter, ...)
//! but are themselves concrete structs, not traits.

mod classes;
mod composition;
mod kerning;
mod leaders;

pub use classes::ClassService;
pub use composition::CompositionService;
pub use kerning::KerningService;
pub use leaders::LeaderService;
