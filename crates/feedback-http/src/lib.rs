//! Feedback HTTP
//!
//! Outer surfaces of the feedback engine:
//! - [`ChatCompletionGenerator`]: `FeedbackGenerator` over an OpenAI-compatible API
//! - [`routes`]: warp filters serving `POST /api/feedback` and `GET /health`
//!
//! The `feedback-server` binary wires both to a pattern store chosen by
//! configuration.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod client;
pub mod prompt;
pub mod routes;

pub use client::{parse_patterns, ChatCompletionGenerator};
pub use prompt::{render_prompt, system_prompt};
pub use routes::routes;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
