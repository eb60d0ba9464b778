use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use weft_schema::DeclKind;

/// Result type for weft-gen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A failure of one generation run. Every variant is fatal; the run never
/// retries or degrades to partial success.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("{option} must be an absolute path: '{path}' is not absolute")]
    #[diagnostic(
        code(weft::gen::config),
        help("pass absolute paths for the output directory and the schema root")
    )]
    Config { option: &'static str, path: PathBuf },

    #[error("module '{path}' is outside the schema root '{root}'")]
    #[diagnostic(
        code(weft::gen::resolution),
        help("every processed schema file must live under the schema root")
    )]
    Resolution { path: PathBuf, root: PathBuf },

    #[error("could not generate code for module '{module}'")]
    #[diagnostic(code(weft::gen::module_generation))]
    ModuleGeneration {
        module: PathBuf,
        #[source]
        source: EmitError,
    },

    #[error("file generation conflict: multiple sources are trying to write to {}", .paths.join(", "))]
    #[diagnostic(
        code(weft::gen::conflict),
        help("two modules or a module and the plugin mapped to the same output path")
    )]
    Conflict { paths: Vec<String> },

    #[error("root module already registered: '{existing}'")]
    #[diagnostic(code(weft::gen::build_tree))]
    DuplicateRootModule { existing: PathBuf, new: PathBuf },

    #[error("service generator plugin failed")]
    #[diagnostic(code(weft::gen::plugin))]
    Plugin {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to write '{path}'")]
    #[diagnostic(code(weft::gen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// All output paths involved in a conflict, sorted. Empty for other kinds.
    pub fn conflicting_paths(&self) -> &[String] {
        match self {
            Error::Conflict { paths } => paths,
            _ => &[],
        }
    }
}

/// The declaration-level cause inside a module generation failure.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("could not render {kind} '{name}'")]
    Declaration {
        kind: DeclKind,
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("could not embed schema text '{path}'")]
    Embed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("could not write output for file '{file}'")]
    Serialize {
        file: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
