//! Bank Desk Advisor
//!
//! An educational simulator of five banking business desks:
//! - FX dealing, risk management, trade finance, investment, macro strategy
//! - Each desk computes a small deterministic formula from form inputs
//! - Results can be handed to a Gemini-backed advisor for a short narrative
//!
//! FLOW:
//! INPUT → COMPUTE → (ASK ADVISOR?) → RENDER

pub mod advisor;
pub mod api;
pub mod config;
pub mod desks;
pub mod error;
pub mod gemini;
pub mod navigation;
pub mod page;

pub use error::Result;

// Re-export common types
pub use advisor::{Advisor, AdvisoryErrorKind, AdvisoryRequest, AdvisoryResponse, MacroScenario};
pub use config::AppConfig;
pub use navigation::Desk;
