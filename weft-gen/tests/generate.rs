//! End-to-end tests for the generation pipeline.

use std::sync::{Arc, Mutex};

use weft_gen::{
    BuildTree, Error, FileSet, Options, ServiceGenerator,
    emit::{EmbeddedIdl, EmitterBackend, EmitterOptions, ModuleEmitter, SourceBackend},
    generate, generate_fileset,
};
use weft_schema::{Constant, Field, Function, Module, ModuleBuilder, Service, TypeDef};

/// a includes b and c; b and c both include d.
fn diamond() -> Arc<Module> {
    let d = ModuleBuilder::new("/schemas/d.thrift", "// d")
        .constant(Constant::new("DEPTH", "i32", "3"))
        .build()
        .unwrap();
    let b = ModuleBuilder::new("/schemas/b.thrift", "// b")
        .include(d.clone())
        .build()
        .unwrap();
    let c = ModuleBuilder::new("/schemas/c.thrift", "// c")
        .include(d)
        .service(Service::new("Nested"))
        .build()
        .unwrap();
    ModuleBuilder::new("/schemas/a.thrift", "// a")
        .include(b)
        .include(c)
        .service(
            Service::new("Root").function(
                Function::new("ping")
                    .param(Field::new(1, "payload", "string"))
                    .returns("string"),
            ),
        )
        .build()
        .unwrap()
}

fn options() -> Options {
    let mut options = Options::new("/out", "/schemas");
    options.package_prefix = "pfx".to_string();
    options
}

/// Captures the frozen build tree it was handed.
struct RecordingPlugin {
    seen: Arc<Mutex<Option<BuildTree>>>,
}

impl ServiceGenerator for RecordingPlugin {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn generate(&self, tree: &BuildTree) -> eyre::Result<FileSet> {
        *self.seen.lock().unwrap() = Some(tree.clone());
        Ok(FileSet::new())
    }
}

/// Contributes a fixed file set.
struct StaticPlugin {
    files: FileSet,
}

impl ServiceGenerator for StaticPlugin {
    fn name(&self) -> &'static str {
        "static"
    }

    fn generate(&self, _tree: &BuildTree) -> eyre::Result<FileSet> {
        Ok(self.files.clone())
    }
}

fn recorded_tree(root: &Arc<Module>, mut options: Options) -> BuildTree {
    let seen = Arc::new(Mutex::new(None));
    options.service_generator = Some(Box::new(RecordingPlugin { seen: seen.clone() }));
    generate_fileset(root, &SourceBackend, &options).unwrap();
    let tree = seen.lock().unwrap().take();
    tree.expect("plugin was not invoked")
}

#[test]
fn test_generates_one_file_per_reachable_module() {
    let files = generate_fileset(&diamond(), &SourceBackend, &options()).unwrap();

    let mut paths: Vec<_> = files.paths().collect();
    paths.sort();
    assert_eq!(paths, ["a/a.rs", "b/b.rs", "c/c.rs", "d/d.rs"]);
}

#[test]
fn test_generation_is_deterministic() {
    let first = generate_fileset(&diamond(), &SourceBackend, &options()).unwrap();
    let second = generate_fileset(&diamond(), &SourceBackend, &options()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_declarations_emitted_in_lexicographic_order() {
    // Insertion order deliberately scrambled; HashMap iteration order is
    // arbitrary anyway.
    let module = ModuleBuilder::new("/schemas/kv.thrift", "")
        .constant(Constant::new("ZETA", "i32", "3"))
        .constant(Constant::new("ALPHA", "i32", "1"))
        .constant(Constant::new("MID", "i32", "2"))
        .build()
        .unwrap();

    let files = generate_fileset(&module, &SourceBackend, &options()).unwrap();
    let out = String::from_utf8(files.get("kv/kv.rs").unwrap().to_vec()).unwrap();

    let alpha = out.find("ALPHA").unwrap();
    let mid = out.find("MID").unwrap();
    let zeta = out.find("ZETA").unwrap();
    assert!(alpha < mid && mid < zeta);
}

#[test]
fn test_diamond_module_appears_once_in_build_tree() {
    let tree = recorded_tree(&diamond(), options());

    let d_entries = tree
        .modules
        .iter()
        .filter(|info| info.relative_path == "d.thrift")
        .count();
    assert_eq!(d_entries, 1);
    assert_eq!(tree.modules.len(), 4);
    assert_eq!(tree.root_module, "a.thrift");
}

#[test]
fn test_no_recurse_generates_root_only_but_full_tree() {
    let mut options = options();
    options.no_recurse = true;

    let files = generate_fileset(&diamond(), &SourceBackend, &options).unwrap();
    let paths: Vec<_> = files.paths().collect();
    assert_eq!(paths, ["a/a.rs"]);

    let mut options = self::options();
    options.no_recurse = true;
    let tree = recorded_tree(&diamond(), options);
    assert_eq!(tree.modules.len(), 4);

    // Only the generated module's services are root services; the service in
    // c.thrift is merely visible through inclusion.
    let names: Vec<_> = tree
        .root_services
        .iter()
        .map(|root| root.service.name.as_str())
        .collect();
    assert_eq!(names, ["Root"]);
}

#[test]
fn test_recursive_run_includes_nested_root_services() {
    let tree = recorded_tree(&diamond(), options());

    let mut names: Vec<_> = tree
        .root_services
        .iter()
        .map(|root| root.service.name.as_str())
        .collect();
    names.sort();
    assert_eq!(names, ["Nested", "Root"]);
}

#[test]
fn test_output_file_forces_non_recursive_generation() {
    // Recursion was not turned off, but the explicit output file pins the run
    // to the root module rather than erroring.
    let mut options = options();
    options.output_file = Some("generated.rs".to_string());

    let files = generate_fileset(&diamond(), &SourceBackend, &options).unwrap();
    let paths: Vec<_> = files.paths().collect();
    assert_eq!(paths, ["a/generated.rs"]);
}

#[test]
fn test_empty_plugin_is_identity() {
    let without = generate_fileset(&diamond(), &SourceBackend, &options()).unwrap();

    let mut with = options();
    with.service_generator = Some(Box::new(weft_gen::EmptyServiceGenerator));
    let with = generate_fileset(&diamond(), &SourceBackend, &with).unwrap();

    assert_eq!(without, with);
}

#[test]
fn test_plugin_files_are_merged() {
    let mut contributed = FileSet::new();
    contributed
        .insert("a/root_client.rs", b"// client".to_vec())
        .unwrap();

    let mut options = options();
    options.service_generator = Some(Box::new(StaticPlugin { files: contributed }));

    let files = generate_fileset(&diamond(), &SourceBackend, &options).unwrap();
    assert!(files.contains("a/root_client.rs"));
    assert!(files.contains("a/a.rs"));
}

#[test]
fn test_plugin_conflicts_are_aggregated() {
    let mut contributed = FileSet::new();
    contributed.insert("a/a.rs", b"// dupe".to_vec()).unwrap();
    contributed.insert("b/b.rs", b"// dupe".to_vec()).unwrap();
    contributed.insert("fresh.rs", b"// ok".to_vec()).unwrap();

    let mut options = options();
    options.service_generator = Some(Box::new(StaticPlugin { files: contributed }));

    let err = generate_fileset(&diamond(), &SourceBackend, &options).unwrap_err();
    assert_eq!(err.conflicting_paths(), ["a/a.rs", "b/b.rs"]);
}

#[test]
fn test_plugin_failure_propagates() {
    struct FailingPlugin;
    impl ServiceGenerator for FailingPlugin {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn generate(&self, _tree: &BuildTree) -> eyre::Result<FileSet> {
            eyre::bail!("transport broke")
        }
    }

    let mut options = options();
    options.service_generator = Some(Box::new(FailingPlugin));

    let err = generate_fileset(&diamond(), &SourceBackend, &options).unwrap_err();
    assert!(matches!(err, Error::Plugin { .. }));
}

#[test]
fn test_service_ordered_after_type_with_same_name() {
    let module = ModuleBuilder::new("/schemas/store.thrift", "")
        .type_definition(TypeDef::alias("Store", "map<string, string>"))
        .service(Service::new("Store"))
        .build()
        .unwrap();

    let files = generate_fileset(&module, &SourceBackend, &options()).unwrap();
    let out = String::from_utf8(files.get("store/store.rs").unwrap().to_vec()).unwrap();

    let type_at = out.find("pub type Store").unwrap();
    let service_at = out.find("pub trait Store").unwrap();
    assert!(type_at < service_at);
}

#[test]
fn test_relative_schema_root_rejected() {
    let mut options = options();
    options.schema_root = "relative/schemas".into();

    let err = generate_fileset(&diamond(), &SourceBackend, &options).unwrap_err();
    assert!(matches!(err, Error::Config { option: "schema root", .. }));
}

#[test]
fn test_relative_output_dir_rejected() {
    let mut options = options();
    options.output_dir = "relative/out".into();

    let err = generate_fileset(&diamond(), &SourceBackend, &options).unwrap_err();
    assert!(matches!(err, Error::Config { option: "output directory", .. }));
}

#[test]
fn test_module_outside_schema_root_fails_resolution() {
    let stray = ModuleBuilder::new("/elsewhere/stray.thrift", "")
        .build()
        .unwrap();

    let err = generate_fileset(&stray, &SourceBackend, &options()).unwrap_err();
    assert!(matches!(err, Error::Resolution { .. }));
}

#[test]
fn test_suppression_flags_do_not_touch_build_tree() {
    let mut options = options();
    options.no_constants = true;
    options.no_types = true;
    options.no_service_helpers = true;
    options.no_embed_idl = true;

    let tree = recorded_tree(&diamond(), options);
    assert_eq!(tree.modules.len(), 4);

    let mut names: Vec<_> = tree
        .root_services
        .iter()
        .map(|root| root.service.name.as_str())
        .collect();
    names.sort();
    assert_eq!(names, ["Nested", "Root"]);
}

#[test]
fn test_embedded_idl_suppression() {
    let module = ModuleBuilder::new("/schemas/kv.thrift", "const i32 TTL = 60")
        .build()
        .unwrap();

    let embedded = generate_fileset(&module, &SourceBackend, &options()).unwrap();
    let out = String::from_utf8(embedded.get("kv/kv.rs").unwrap().to_vec()).unwrap();
    assert!(out.contains("const i32 TTL = 60"));

    let mut options = options();
    options.no_embed_idl = true;
    let stripped = generate_fileset(&module, &SourceBackend, &options).unwrap();
    let out = String::from_utf8(stripped.get("kv/kv.rs").unwrap().to_vec()).unwrap();
    assert!(!out.contains("const i32 TTL = 60"));
}

#[test]
fn test_hyphenated_package_name_is_normalized() {
    let module = ModuleBuilder::new("/schemas/key-value.thrift", "")
        .build()
        .unwrap();

    let files = generate_fileset(&module, &SourceBackend, &options()).unwrap();
    let out =
        String::from_utf8(files.get("key-value/key-value.rs").unwrap().to_vec()).unwrap();
    assert!(out.contains("// module key_value\n"));
    assert!(out.contains("// package pfx/key-value\n"));
}

#[test]
fn test_failing_emitter_reports_module_and_declaration() {
    struct FailingEmitter;
    impl ModuleEmitter for FailingEmitter {
        fn constant(&mut self, constant: &Constant) -> eyre::Result<()> {
            eyre::bail!("cannot render {}", constant.name)
        }
        fn type_definition(&mut self, _def: &TypeDef) -> eyre::Result<()> {
            Ok(())
        }
        fn embed_idl(&mut self, _idl: &EmbeddedIdl) -> eyre::Result<()> {
            Ok(())
        }
        fn service(&mut self, _service: &Service) -> eyre::Result<()> {
            Ok(())
        }
        fn finish(self: Box<Self>) -> eyre::Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    struct FailingBackend;
    impl EmitterBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn file_extension(&self) -> &'static str {
            "rs"
        }
        fn emitter(&self, _options: EmitterOptions) -> Box<dyn ModuleEmitter> {
            Box::new(FailingEmitter)
        }
    }

    let module = ModuleBuilder::new("/schemas/kv.thrift", "")
        .constant(Constant::new("TTL", "i32", "60"))
        .build()
        .unwrap();

    let err = generate_fileset(&module, &FailingBackend, &options()).unwrap_err();
    match err {
        Error::ModuleGeneration { module, source } => {
            assert!(module.ends_with("kv.thrift"));
            assert!(source.to_string().contains("constant 'TTL'"));
        }
        other => panic!("expected module generation error, got {other:?}"),
    }
}

#[test]
fn test_generate_materializes_the_tree() {
    let temp = tempfile::TempDir::new().unwrap();
    let mut options = options();
    options.output_dir = temp.path().to_path_buf();

    generate(&diamond(), &options).unwrap();

    for path in ["a/a.rs", "b/b.rs", "c/c.rs", "d/d.rs"] {
        let contents = std::fs::read_to_string(temp.path().join(path)).unwrap();
        assert!(contents.starts_with("// Code generated by weft. DO NOT EDIT."));
    }
}
