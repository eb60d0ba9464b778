//! Configuration for one generation run.

use std::path::PathBuf;

use crate::ServiceGenerator;

/// Controls how code gets generated for one run.
///
/// All path-valued options must be absolute; relative paths fail the run
/// before any generation work begins.
pub struct Options {
    /// Directory into which all generated code is written. Must be absolute.
    pub output_dir: PathBuf,

    /// Import path prefix for all generated packages.
    pub package_prefix: String,

    /// Directory within whose tree all consumed schema files are contained.
    /// The location of a schema file relative to this root determines its
    /// package structure under `output_dir`. Must be absolute.
    pub schema_root: PathBuf,

    /// If true, code gets generated only for the root module. Included
    /// modules still appear in the build tree.
    pub no_recurse: bool,

    /// Do not feed constants to the emitter.
    pub no_constants: bool,

    /// Do not feed type definitions to the emitter.
    pub no_types: bool,

    /// Do not feed service helpers to the emitter. Root services are still
    /// registered in the build tree.
    pub no_service_helpers: bool,

    /// Do not embed raw schema text in generated code.
    pub no_embed_idl: bool,

    /// Do not generate auxiliary logging glue.
    pub no_logging_glue: bool,

    /// Forces a single fixed output file name instead of one derived from the
    /// module's package. Implies non-recursive generation, since code for
    /// multiple modules cannot share one physical file.
    pub output_file: Option<String>,

    /// Generate an error when text unmarshaling meets an unrecognized enum
    /// value. Passed through unchanged to the emitter.
    pub enum_text_marshal_strict: bool,

    /// Code generation plugin. `None` behaves exactly like a plugin that
    /// returns an empty file set.
    pub service_generator: Option<Box<dyn ServiceGenerator>>,
}

impl Options {
    /// Options with the given roots and everything else at its default.
    pub fn new(output_dir: impl Into<PathBuf>, schema_root: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            package_prefix: String::new(),
            schema_root: schema_root.into(),
            no_recurse: false,
            no_constants: false,
            no_types: false,
            no_service_helpers: false,
            no_embed_idl: false,
            no_logging_glue: false,
            output_file: None,
            enum_text_marshal_strict: false,
            service_generator: None,
        }
    }
}
