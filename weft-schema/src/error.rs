use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::DeclKind;

/// Result type for weft-schema operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("duplicate {kind} '{name}' in module '{module}'")]
    #[diagnostic(
        code(weft::schema::duplicate_declaration),
        help("declaration names must be unique per kind within a module")
    )]
    DuplicateDeclaration {
        module: PathBuf,
        kind: DeclKind,
        name: String,
    },

    #[error("module path must be absolute: '{path}' is not absolute")]
    #[diagnostic(code(weft::schema::relative_module_path))]
    RelativeModulePath { path: PathBuf },
}
