//! The declaration emitter contract.
//!
//! An [`EmitterBackend`] constructs one [`ModuleEmitter`] per module; the
//! orchestrator feeds the module's declarations into it in sorted order and
//! serializes the accumulated output into one file. Any back-end (the
//! in-process [`SourceBackend`] default, or an external one) satisfies the
//! same contract.

mod source;

use eyre::Result;
use serde::Serialize;
use weft_schema::{Constant, Service, TypeDef};

pub use source::{SourceBackend, SourceEmitter};

/// Per-module configuration handed to a back-end when the orchestrator opens
/// a new emitter.
#[derive(Debug, Clone)]
pub struct EmitterOptions {
    /// Fully qualified import path of the module's package.
    pub import_path: String,
    /// Normalized package name: the last path segment with hyphens rewritten
    /// to underscores, since target identifier syntax forbids hyphens.
    pub package_name: String,
    /// Skip auxiliary logging glue in the emitted code.
    pub no_logging_glue: bool,
    /// Emit strict (erroring) text unmarshaling for unknown enum values.
    pub enum_text_marshal_strict: bool,
}

/// The schema text embedded into a module's generated file.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddedIdl {
    /// The module's schema file path relative to the schema root.
    pub relative_path: String,
    /// Raw source text of the schema file.
    pub source: String,
    /// Schema-root-relative paths of the module's direct includes, needed to
    /// reconstruct the schema text tree.
    pub includes: Vec<String>,
}

/// Accumulates one module's declarations and serializes them into one output
/// file.
///
/// Feed operations may fail with a declaration-specific error; the
/// orchestrator wraps such failures with the module's identity and aborts
/// the run.
pub trait ModuleEmitter {
    fn constant(&mut self, constant: &Constant) -> Result<()>;

    fn type_definition(&mut self, def: &TypeDef) -> Result<()>;

    fn embed_idl(&mut self, idl: &EmbeddedIdl) -> Result<()>;

    fn service(&mut self, service: &Service) -> Result<()>;

    /// Serialize everything accumulated so far into the bytes of one output
    /// file.
    fn finish(self: Box<Self>) -> Result<Vec<u8>>;
}

/// A code generation back-end: a factory for per-module emitters.
pub trait EmitterBackend {
    /// Back-end identifier (for debugging and error context).
    fn name(&self) -> &'static str;

    /// File extension for generated source files, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Open a fresh emitter for one module.
    fn emitter(&self, options: EmitterOptions) -> Box<dyn ModuleEmitter>;
}
