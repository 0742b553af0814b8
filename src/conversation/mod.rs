//! Conversational lead intake.
//!
//! - Per-session partial lead records
//! - The scripted dialogue that fills them

pub mod intake;
pub mod session;

pub use intake::{advance, parse_utterance, Turn, Utterance};
pub use session::{IntakeSession, SessionManager};
