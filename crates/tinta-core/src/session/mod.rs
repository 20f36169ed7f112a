//! Simulation session domain module.
//!
//! # Module Structure
//!
//! - `model`: session domain model (`SimulatorSession`, `PaintingStatus`,
//!   `SessionSummary`)
//! - `simulator`: state machine transitions over the session model
//! - `repository`: repository trait for session persistence

mod model;
mod repository;
mod simulator;

pub use model::{PaintingStatus, SessionSummary, SimulatorSession};
pub use repository::SessionRepository;
