//! Forge compiler front end.
//!
//! Provides an AST model, a visitor framework, and a semantic verifier for
//! the Forge source language, plus a minimal bundled parser and the trait
//! boundaries a real codegen/linking backend would implement.
//!
//! # Verifying a program
//!
//! ```rust
//! use forge_compiler::{parser, verifier};
//!
//! let mut root = parser::parse("fn f() -> bool { return true; }", None).unwrap();
//! let messages = verifier::verify(&mut root);
//! assert!(!messages.has_errors());
//! ```

pub mod ast;
pub mod codegen;
pub mod config;
pub mod kind;
pub mod linking;
pub mod messages;
pub mod node_kind_info;
pub mod parser;
pub mod printer;
pub mod scope;
pub mod type_check;
pub mod type_ops;
pub mod type_resolve;
pub mod unsupported;
pub mod verifier;
pub mod visitor;
pub mod well_formedness;

pub use ast::Node;
pub use codegen::{CodeGenError, CodeGenerator, IrModule};
pub use config::{CliConfig, ColorMode, ConfigFileError, UnicodeMode, VerifierConfig};
pub use kind::NodeKind;
pub use linking::{LinkError, LinkOutputKind, LinkRequest, Linker, LinkerKind};
pub use messages::{Message, MessageBuffer, Query, SingleResult};
pub use parser::ParseError;
pub use verifier::verify;
