//! The generation orchestrator.
//!
//! One run walks the module graph, renders every module in the generation
//! set through an emitter back-end, accumulates the build tree, invokes the
//! service generator plugin on the frozen snapshot, merges the two file sets,
//! and materializes the result.

use std::{collections::HashMap, path::Path, sync::Arc};

use weft_schema::{DeclKind, Module};

use crate::{
    BuildTreeBuilder, EmptyServiceGenerator, Error, FileSet, Options, Result, SchemaImporter,
    emit::{EmbeddedIdl, EmitterBackend, EmitterOptions, SourceBackend},
    error::EmitError,
    importer::path_to_slash,
};

/// Generate code for `root` with the default plain-source back-end and write
/// it under the output directory.
pub fn generate(root: &Arc<Module>, options: &Options) -> Result<()> {
    generate_with(root, &SourceBackend, options)
}

/// Generate code for `root` with the given back-end and write it under the
/// output directory.
///
/// Materialization is best-effort, not transactional: an I/O failure partway
/// through leaves earlier files on disk. Callers needing atomicity should
/// stage into a temporary directory and swap it in themselves.
pub fn generate_with(
    root: &Arc<Module>,
    backend: &dyn EmitterBackend,
    options: &Options,
) -> Result<()> {
    let files = generate_fileset(root, backend, options)?;
    files.write_to(&options.output_dir)
}

/// Run the whole pipeline short of materialization and return the merged
/// file set.
///
/// The generation set is the root module alone when `no_recurse` is set or an
/// explicit output file name is given; otherwise it is every module reachable
/// from the root, each exactly once. The build tree always covers the full
/// reachable set either way.
pub fn generate_fileset(
    root: &Arc<Module>,
    backend: &dyn EmitterBackend,
    options: &Options,
) -> Result<FileSet> {
    if !options.schema_root.is_absolute() {
        return Err(Error::Config {
            option: "schema root",
            path: options.schema_root.clone(),
        });
    }
    if !options.output_dir.is_absolute() {
        return Err(Error::Config {
            option: "output directory",
            path: options.output_dir.clone(),
        });
    }

    let importer = SchemaImporter::new(&options.package_prefix, &options.schema_root);
    let mut files = FileSet::new();
    let mut builder = BuildTreeBuilder::new(importer.clone());

    builder.add_root_module(root)?;

    // An explicit output file pins generation to the root module: code for
    // multiple modules cannot be compiled into a single file.
    let targets = if options.no_recurse || options.output_file.is_some() {
        vec![root.clone()]
    } else {
        root.reachable()
    };

    for module in &targets {
        let (path, contents) = generate_module(module, &importer, backend, &mut builder, options)?;
        files.insert(path, contents)?;
    }

    static EMPTY_GENERATOR: EmptyServiceGenerator = EmptyServiceGenerator;

    let tree = builder.build();
    let plugin = options
        .service_generator
        .as_deref()
        .unwrap_or(&EMPTY_GENERATOR);
    let contributed = plugin
        .generate(&tree)
        .map_err(|report| Error::Plugin {
            source: report.into(),
        })?;
    files.merge(contributed)?;

    Ok(files)
}

/// Generate the code for one module; returns the output path relative to the
/// output directory and the file contents.
fn generate_module(
    module: &Arc<Module>,
    importer: &SchemaImporter,
    backend: &dyn EmitterBackend,
    builder: &mut BuildTreeBuilder,
    options: &Options,
) -> Result<(String, Vec<u8>)> {
    // For $schemaRoot/foo/bar.thrift the package path is foo/bar; all of the
    // module's output lives in the foo/bar/ tree and is importable via
    // $packagePrefix/foo/bar.
    let package_rel = importer.relative_package(module.path())?;
    let package_base = file_name(&package_rel);

    // Output file name defaults to the package name.
    let output_filename = match &options.output_file {
        Some(name) => name.clone(),
        None => format!("{package_base}.{}", backend.file_extension()),
    };
    let output_path = path_to_slash(&package_rel.join(&output_filename));

    let import_path = importer.package(module.path())?;
    let mut emitter = backend.emitter(EmitterOptions {
        import_path,
        package_name: normalize_package_name(&package_base),
        no_logging_glue: options.no_logging_glue,
        enum_text_marshal_strict: options.enum_text_marshal_strict,
    });

    let wrap = |source: EmitError| Error::ModuleGeneration {
        module: module.path().to_path_buf(),
        source,
    };

    if !options.no_constants {
        for name in sorted_keys(module.constants()) {
            emitter
                .constant(&module.constants()[name])
                .map_err(|report| {
                    wrap(EmitError::Declaration {
                        kind: DeclKind::Constant,
                        name: name.clone(),
                        source: report.into(),
                    })
                })?;
        }
    }

    if !options.no_types {
        for name in sorted_keys(module.types()) {
            emitter
                .type_definition(&module.types()[name])
                .map_err(|report| {
                    wrap(EmitError::Declaration {
                        kind: DeclKind::Type,
                        name: name.clone(),
                        source: report.into(),
                    })
                })?;
        }
    }

    if !options.no_embed_idl {
        let relative_path = path_to_slash(&importer.relative_schema_path(module.path())?);
        let includes = module
            .includes()
            .iter()
            .map(|include| {
                importer
                    .relative_schema_path(include.path())
                    .map(|path| path_to_slash(&path))
            })
            .collect::<Result<Vec<_>>>()?;
        let idl = EmbeddedIdl {
            relative_path: relative_path.clone(),
            source: module.source().to_string(),
            includes,
        };
        emitter.embed_idl(&idl).map_err(|report| {
            wrap(EmitError::Embed {
                path: relative_path,
                source: report.into(),
            })
        })?;
    }

    // The build tree covers everything reachable from this module, even when
    // the generation set is smaller than the reachable set.
    for reachable in module.reachable() {
        builder.add_module(&reachable)?;
    }

    // Services are generated last: names of user-defined types take
    // precedence over the names picked for service types, so services must
    // never shadow them.
    for name in sorted_keys(module.services()) {
        let service = &module.services()[name];

        // generate_module only runs for modules in the generation set, so
        // services registered here are root services. Plugins generate code
        // only for these, even though the whole tree is visible to them.
        builder.add_root_service(module, service)?;

        if !options.no_service_helpers {
            emitter.service(service).map_err(|report| {
                wrap(EmitError::Declaration {
                    kind: DeclKind::Service,
                    name: name.clone(),
                    source: report.into(),
                })
            })?;
        }
    }

    let contents = emitter.finish().map_err(|report| {
        wrap(EmitError::Serialize {
            file: output_filename,
            source: report.into(),
        })
    })?;

    Ok((output_path, contents))
}

/// Sorted declaration names. Emission order must be a pure function of the
/// names, never of the map's iteration order, to keep builds reproducible.
fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<&String> {
    let mut keys: Vec<_> = map.keys().collect();
    keys.sort();
    keys
}

/// Replaces hyphens in the package name with underscores; target identifier
/// syntax forbids hyphens.
fn normalize_package_name(name: &str) -> String {
    name.replace('-', "_")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
