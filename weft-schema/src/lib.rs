//! Compiled schema module model for the weft generation back-end.
//!
//! This crate provides the types a schema front-end produces once a source
//! file has been parsed and type-checked: a [`Module`] per schema file, the
//! declarations it defines, and the modules it includes. Modules are immutable
//! once built; the generation back-end only reads them.
//!
//! # Architecture
//!
//! ```text
//! schema file → front-end (parse + check) → weft-schema (module graph) → weft-gen
//! ```

mod decl;
mod error;
mod module;

pub use decl::{Constant, DeclKind, EnumItem, Field, Function, Service, TypeDef, TypeKind};
pub use error::{Error, Result};
pub use module::{Module, ModuleBuilder};
