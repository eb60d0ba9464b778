//! The compiled module graph.
//!
//! A [`Module`] is one schema file after parsing and type-checking: its
//! declarations keyed by name, its raw source text, and the modules it
//! directly includes. Inclusion forms an arbitrary acyclic graph; the same
//! module may be reachable along several paths, so shared modules are held
//! behind [`Arc`] and [`Module::walk`] collapses diamonds.

use std::{
    collections::{HashMap, HashSet},
    convert::Infallible,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{Constant, DeclKind, Error, Result, Service, TypeDef};

/// A compiled, type-checked schema module.
///
/// Immutable once built. Construct one with [`ModuleBuilder`].
#[derive(Debug)]
pub struct Module {
    path: PathBuf,
    source: String,
    constants: HashMap<String, Constant>,
    types: HashMap<String, TypeDef>,
    services: HashMap<String, Service>,
    includes: Vec<Arc<Module>>,
}

impl Module {
    /// Absolute path of the schema file this module was compiled from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw source text of the schema file.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Constants keyed by name. Iteration order is unspecified.
    pub fn constants(&self) -> &HashMap<String, Constant> {
        &self.constants
    }

    /// Types keyed by name. Iteration order is unspecified.
    pub fn types(&self) -> &HashMap<String, TypeDef> {
        &self.types
    }

    /// Services keyed by name. Iteration order is unspecified.
    pub fn services(&self) -> &HashMap<String, Service> {
        &self.services
    }

    /// Directly included modules, in inclusion order.
    pub fn includes(&self) -> &[Arc<Module>] {
        &self.includes
    }

    /// Visit this module and every transitively included module exactly once.
    ///
    /// Traversal is depth-first starting at `self`. A module reachable along
    /// more than one inclusion path is visited only the first time. The
    /// callback's error aborts the walk and is returned unchanged.
    pub fn walk<E, F>(self: &Arc<Self>, mut f: F) -> std::result::Result<(), E>
    where
        F: FnMut(&Arc<Module>) -> std::result::Result<(), E>,
    {
        let mut visited = HashSet::new();
        self.walk_inner(&mut visited, &mut f)
    }

    fn walk_inner<E, F>(
        self: &Arc<Self>,
        visited: &mut HashSet<PathBuf>,
        f: &mut F,
    ) -> std::result::Result<(), E>
    where
        F: FnMut(&Arc<Module>) -> std::result::Result<(), E>,
    {
        if !visited.insert(self.path.clone()) {
            return Ok(());
        }
        f(self)?;
        for include in &self.includes {
            include.walk_inner(visited, f)?;
        }
        Ok(())
    }

    /// Every module reachable from this one (including itself), each once,
    /// in walk order.
    pub fn reachable(self: &Arc<Self>) -> Vec<Arc<Module>> {
        let mut modules = Vec::new();
        let walked: std::result::Result<(), Infallible> = self.walk(|module| {
            modules.push(module.clone());
            Ok(())
        });
        match walked {
            Ok(()) => modules,
            Err(never) => match never {},
        }
    }
}

/// Builder for [`Module`] values.
///
/// # Example
///
/// ```
/// use weft_schema::{Constant, ModuleBuilder};
///
/// let module = ModuleBuilder::new("/schemas/kv.thrift", "const i32 TTL = 60")
///     .constant(Constant::new("TTL", "i32", "60"))
///     .build()
///     .unwrap();
/// assert_eq!(module.constants().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ModuleBuilder {
    path: PathBuf,
    source: String,
    constants: Vec<Constant>,
    types: Vec<TypeDef>,
    services: Vec<Service>,
    includes: Vec<Arc<Module>>,
}

impl ModuleBuilder {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn constant(mut self, constant: Constant) -> Self {
        self.constants.push(constant);
        self
    }

    pub fn type_definition(mut self, def: TypeDef) -> Self {
        self.types.push(def);
        self
    }

    pub fn service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    pub fn include(mut self, module: Arc<Module>) -> Self {
        self.includes.push(module);
        self
    }

    /// Build the module, rejecting duplicate declaration names per kind.
    pub fn build(self) -> Result<Arc<Module>> {
        if !self.path.is_absolute() {
            return Err(Error::RelativeModulePath { path: self.path });
        }

        let mut constants = HashMap::new();
        for constant in self.constants {
            if let Some(existing) = constants.insert(constant.name.clone(), constant) {
                return Err(Error::DuplicateDeclaration {
                    module: self.path,
                    kind: DeclKind::Constant,
                    name: existing.name,
                });
            }
        }

        let mut types = HashMap::new();
        for def in self.types {
            if let Some(existing) = types.insert(def.name.clone(), def) {
                return Err(Error::DuplicateDeclaration {
                    module: self.path,
                    kind: DeclKind::Type,
                    name: existing.name,
                });
            }
        }

        let mut services = HashMap::new();
        for service in self.services {
            if let Some(existing) = services.insert(service.name.clone(), service) {
                return Err(Error::DuplicateDeclaration {
                    module: self.path,
                    kind: DeclKind::Service,
                    name: existing.name,
                });
            }
        }

        Ok(Arc::new(Module {
            path: self.path,
            source: self.source,
            constants,
            types,
            services,
            includes: self.includes,
        }))
    }
}
