//! EcoBot chat assistant.
//!
//! ```text
//! ChatSession (session.rs)          ← what channels call
//!     ├── LlmProvider::Gemini       ← hosted model, grounded by knowledge.rs
//!     └── LlmProvider::Mock         ← resolver.rs keyword table (+ quiz.rs)
//! ```

pub mod quiz;
pub mod resolver;
pub mod session;

pub use session::{APOLOGY, AssistantError, ChatSession};
