//! In-memory conversation state.
//!
//! The service keeps a single process-wide transcript: an append-only list
//! of [`AgentMessage`]s shared by every request, cleared only by the
//! explicit clear action and lost on restart.
//!
//! # Example
//!
//! ```rust
//! use openscript::session::{AgentMessage, Transcript};
//!
//! let transcript = Transcript::new();
//! transcript.push(AgentMessage::user("Hello!"));
//!
//! assert_eq!(transcript.len(), 1);
//! ```

mod transcript;

pub use transcript::{AgentMessage, AgentRole, Transcript};
