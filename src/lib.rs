//! EcoBot — the EcoNirvana e-waste assistant and the site's account backend.
//!
//! The binary in `main.rs` wires these modules together; everything here is
//! usable on its own (and is what the integration tests drive).

pub mod assistant;
pub mod auth;
pub mod comms;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod llm;
pub mod logger;
pub mod site;
