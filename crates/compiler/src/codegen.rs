//! The core → codegen boundary (§6). This repository is a front end only:
//! there is no LLVM or native backend here, only the trait a real backend
//! would implement and the opaque module type it would hand back.

use crate::ast::Node;
use crate::messages::MessageBuffer;

/// An opaque compiled module handle. The core never inspects its contents;
/// a real backend's `IrModule` would wrap something like an LLVM module or
/// a byte buffer of object code, neither of which this repository produces.
#[derive(Debug)]
pub struct IrModule {
    _private: (),
}

/// Error type for code generation, in the style of the teacher's
/// `codegen::error::CodeGenError`: a small enum with a manual `Display`,
/// not an error-derive crate.
#[derive(Debug)]
pub enum CodeGenError {
    Unsupported(String),
}

impl std::fmt::Display for CodeGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeGenError::Unsupported(what) => write!(f, "{what} is not implemented by this front-end-only build"),
        }
    }
}

impl std::error::Error for CodeGenError {}

/// What a real backend would implement to consume a verified AST. This
/// repository ships no implementor; `forgec compile` reports codegen as
/// out of scope once verification succeeds (§4.7).
pub trait CodeGenerator {
    fn generate(&mut self, root: &Node, messages: &mut MessageBuffer) -> Result<IrModule, CodeGenError>;
}

/// A `CodeGenerator` that always reports the boundary as unimplemented;
/// exists so callers (tests, the CLI) have something to construct and call
/// without a real backend present.
#[derive(Debug, Default)]
pub struct UnimplementedCodeGenerator;

impl CodeGenerator for UnimplementedCodeGenerator {
    fn generate(&mut self, _root: &Node, _messages: &mut MessageBuffer) -> Result<IrModule, CodeGenError> {
        Err(CodeGenError::Unsupported("code generation".to_string()))
    }
}
