//! Generation back-end of the weft IDL-to-source compiler.
//!
//! Given an already compiled module graph from [`weft_schema`], this crate
//! decides what output files must exist, renders each module through an
//! emitter back-end, reconciles the core's files with a plugin's contributed
//! files, and materializes the merged set to disk.
//!
//! # Architecture
//!
//! ```text
//! Module graph → orchestrator → importer (identifiers)
//!                             → emitter back-end (per-module file)
//!                             → build tree → plugin → merged FileSet → disk
//! ```
//!
//! Output is deterministic: declarations are emitted in lexicographic name
//! order regardless of how the module stores them, and no output path is
//! ever written by two sources.
//!
//! # Example
//!
//! ```no_run
//! use weft_gen::{Options, generate};
//! use weft_schema::ModuleBuilder;
//!
//! let module = ModuleBuilder::new("/schemas/kv.thrift", "").build()?;
//! let options = Options::new("/out", "/schemas");
//! generate(&module, &options)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
pub mod emit;
mod error;
mod fileset;
mod generate;
mod importer;
mod options;
mod plugin;

pub use builder::{BuildTree, BuildTreeBuilder, ModuleInfo, RootService};
pub use error::{EmitError, Error, Result};
pub use fileset::FileSet;
pub use generate::{generate, generate_fileset, generate_with};
pub use importer::{SCHEMA_EXTENSION, SchemaImporter};
pub use options::Options;
pub use plugin::{EmptyServiceGenerator, ServiceGenerator};
