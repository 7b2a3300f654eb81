//! Core types, scheduling, and billing logic for the Gestao CRM.

/// Monthly revenue, tax, and cost aggregation.
pub mod billing;
/// Domain models shared across the workspace.
pub mod model;
/// Traits describing the persistence backend.
pub mod ports;
/// Weekly bin collection scheduling and event derivation.
pub mod schedule;
/// High-level service facade used by clients.
pub mod service;

pub use billing::*;
pub use model::*;
pub use ports::*;
pub use schedule::*;
pub use service::*;
