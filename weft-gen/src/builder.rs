//! The build tree accumulated across one generation run.
//!
//! The builder records every module encountered during traversal and every
//! root service, then freezes into an immutable [`BuildTree`] snapshot. The
//! snapshot is the only input ever handed to a service generator plugin, so
//! it is serializable for out-of-process transports.

use std::{path::PathBuf, sync::Arc};

use indexmap::IndexMap;
use serde::Serialize;
use weft_schema::{Module, Service};

use crate::{Error, Result, SchemaImporter, importer::path_to_slash};

/// Accumulates the cross-run module and root-service tree.
///
/// One builder lives per generation run. Modules register idempotently by
/// path; the root module registers exactly once. [`build`](Self::build)
/// consumes the builder, so a snapshot can only be taken once, after
/// traversal is complete.
#[derive(Debug)]
pub struct BuildTreeBuilder {
    importer: SchemaImporter,
    root: Option<PathBuf>,
    modules: IndexMap<PathBuf, ModuleInfo>,
    root_services: Vec<RootService>,
}

impl BuildTreeBuilder {
    pub fn new(importer: SchemaImporter) -> Self {
        Self {
            importer,
            root: None,
            modules: IndexMap::new(),
            root_services: Vec::new(),
        }
    }

    /// Register the run's single root module.
    ///
    /// Fails if a root module is already registered or if the module cannot
    /// be resolved against the schema root.
    pub fn add_root_module(&mut self, module: &Arc<Module>) -> Result<()> {
        if let Some(existing) = &self.root {
            return Err(Error::DuplicateRootModule {
                existing: existing.clone(),
                new: module.path().to_path_buf(),
            });
        }
        self.add_module(module)?;
        self.root = Some(module.path().to_path_buf());
        Ok(())
    }

    /// Idempotently register a module as part of the tree.
    ///
    /// Returns `true` if the module was newly added, `false` if it was
    /// already present. Fails if the module cannot be resolved against the
    /// schema root.
    pub fn add_module(&mut self, module: &Arc<Module>) -> Result<bool> {
        if self.modules.contains_key(module.path()) {
            return Ok(false);
        }

        let relative_path =
            path_to_slash(&self.importer.relative_schema_path(module.path())?);
        let package = self.importer.package(module.path())?;
        let includes = module
            .includes()
            .iter()
            .map(|include| {
                self.importer
                    .relative_schema_path(include.path())
                    .map(|path| path_to_slash(&path))
            })
            .collect::<Result<Vec<_>>>()?;

        self.modules.insert(
            module.path().to_path_buf(),
            ModuleInfo {
                relative_path,
                package,
                includes,
            },
        );
        Ok(true)
    }

    /// Register a service defined directly in a module of the generation set.
    ///
    /// Only these services are exposed to a plugin as primary generation
    /// targets; services merely visible through inclusion are not.
    pub fn add_root_service(&mut self, module: &Arc<Module>, service: &Service) -> Result<()> {
        let module_path =
            path_to_slash(&self.importer.relative_schema_path(module.path())?);
        self.root_services.push(RootService {
            module: module_path,
            service: service.clone(),
        });
        Ok(())
    }

    /// Freeze everything registered so far into an immutable snapshot.
    ///
    /// Consumes the builder; nothing can be registered afterwards.
    pub fn build(self) -> BuildTree {
        let root_module = self
            .root
            .as_ref()
            .and_then(|root| self.modules.get(root))
            .map(|info| info.relative_path.clone())
            .unwrap_or_default();
        BuildTree {
            root_module,
            modules: self.modules.into_values().collect(),
            root_services: self.root_services,
        }
    }
}

/// Immutable snapshot of one run's module and root-service tree.
#[derive(Debug, Clone, Serialize)]
pub struct BuildTree {
    /// Schema-root-relative path of the run's root module.
    pub root_module: String,
    /// Every module discovered during the run, each exactly once, in
    /// discovery order.
    pub modules: Vec<ModuleInfo>,
    /// Services defined directly in modules of the generation set.
    pub root_services: Vec<RootService>,
}

/// One module's identity within the build tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    /// Schema file path relative to the schema root.
    pub relative_path: String,
    /// Fully qualified import path of the module's package.
    pub package: String,
    /// Relative paths of the module's direct includes.
    pub includes: Vec<String>,
}

/// A root service together with the module that defines it.
#[derive(Debug, Clone, Serialize)]
pub struct RootService {
    /// Relative path of the defining module.
    pub module: String,
    /// The full service definition.
    pub service: Service,
}
