//! Use case layer for the Tinta simulator.
//!
//! Wires the session state machine to the AI clients, the image
//! preprocessor, and the persistence repositories, and owns the
//! single-writer discipline over the active session.

mod simulator_usecase;

pub use simulator_usecase::{AnalysisReport, SimulatorUseCase};
