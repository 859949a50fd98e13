//! Foundry Compare is a console demo for hosted chat-completion models.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the completion-service seam, conversation history,
//!   configuration, the model comparator, and the interactive chat session.
//! - [`api`] defines the chat-completion wire payloads and the HTTP client
//!   that implements [`core::service::CompletionService`].
//! - [`auth`] discovers the endpoint credential from the environment or the
//!   system keyring.
//! - [`cli`] parses flags, sets up logging and the runtime, and runs the
//!   numbered menu that dispatches into the comparator and the chat session.
//!
//! The binary entrypoint (`src/main.rs`) only calls [`crate::cli::main`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod utils;
