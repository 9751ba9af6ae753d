//! # Lifecycle
//!
//! Starting, wiring and stopping the pieces.
//!
//! - [`HarvestSystem`] spawns the store actor, builds the discovery engine on top of it, and
//!   serializes scans per owner.
//! - [`setup_tracing`] configures logging for the binary.

pub mod harvest_system;
pub mod tracing;

pub use self::harvest_system::*;
pub use self::tracing::*;
