//! Forge core: source positions, severities, and the token cursor shared by
//! the AST, verifier, and message buffer crates of the Forge front end.
//!
//! # Modules
//!
//! - `position`: `Location` and `Range`, including the synthetic "null" range.
//! - `severity`: the `Debug < Note < Warning < Error < FatalError < InternalError`
//!   ordering used by diagnostics.
//! - `token_reader`: a minimal positioned cursor over source text.

pub mod position;
pub mod severity;
pub mod token_reader;

pub use position::{Location, Range};
pub use severity::Severity;
pub use token_reader::{is_identifier_continue, is_identifier_start, is_valid_identifier, TokenReader};
