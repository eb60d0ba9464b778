//! Default plain-source back-end.
//!
//! Renders each declaration as a self-contained Rust source block. This is
//! the in-process default; it exists so the engine is usable without an
//! external back-end and so tests have concrete bytes to assert on.

use eyre::Result;
use weft_schema::{Constant, Function, Service, TypeDef, TypeKind};

use super::{EmbeddedIdl, EmitterBackend, EmitterOptions, ModuleEmitter};

/// The in-process plain-source back-end.
#[derive(Debug, Default)]
pub struct SourceBackend;

impl EmitterBackend for SourceBackend {
    fn name(&self) -> &'static str {
        "source"
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn emitter(&self, options: EmitterOptions) -> Box<dyn ModuleEmitter> {
        Box::new(SourceEmitter::new(options))
    }
}

/// Accumulates declaration blocks and renders them as one source file.
///
/// Blocks are rendered in feed order with a blank line between them, under a
/// generated-file header naming the import path.
pub struct SourceEmitter {
    options: EmitterOptions,
    blocks: Vec<String>,
}

impl SourceEmitter {
    pub fn new(options: EmitterOptions) -> Self {
        Self {
            options,
            blocks: Vec::new(),
        }
    }

    fn render_fields(fields: &[weft_schema::Field]) -> String {
        fields
            .iter()
            .map(|field| {
                let ty = if field.required {
                    field.ty.clone()
                } else {
                    format!("Option<{}>", field.ty)
                };
                format!("    pub {}: {}, // field {}\n", field.name, ty, field.id)
            })
            .collect()
    }

    fn render_function(function: &Function) -> String {
        let params = function
            .params
            .iter()
            .map(|param| format!("{}: {}", param.name, param.ty))
            .collect::<Vec<_>>()
            .join(", ");
        let result = match (&function.result, function.oneway) {
            (_, true) => String::new(),
            (Some(ty), false) => format!(" -> {ty}"),
            (None, false) => String::new(),
        };
        format!("    fn {}({params}){result};\n", function.name)
    }
}

impl ModuleEmitter for SourceEmitter {
    fn constant(&mut self, constant: &Constant) -> Result<()> {
        self.blocks.push(format!(
            "pub const {}: {} = {};\n",
            constant.name, constant.ty, constant.value
        ));
        Ok(())
    }

    fn type_definition(&mut self, def: &TypeDef) -> Result<()> {
        let block = match &def.kind {
            TypeKind::Alias { target } => format!("pub type {} = {};\n", def.name, target),
            TypeKind::Record { fields } | TypeKind::Exception { fields } => {
                format!(
                    "pub struct {} {{\n{}}}\n",
                    def.name,
                    Self::render_fields(fields)
                )
            }
            TypeKind::Enum { items } => {
                let mut block = format!("pub enum {} {{\n", def.name);
                for item in items {
                    block.push_str(&format!("    {} = {},\n", item.name, item.value));
                }
                block.push_str("}\n\n");
                block.push_str(&format!("impl {} {{\n", def.name));
                if self.options.enum_text_marshal_strict {
                    block.push_str(
                        "    pub fn from_name(name: &str) -> Result<Self, String> {\n        match name {\n",
                    );
                    for item in items {
                        block.push_str(&format!(
                            "            \"{0}\" => Ok({1}::{0}),\n",
                            item.name, def.name
                        ));
                    }
                    block.push_str(&format!(
                        "            _ => Err(format!(\"unknown {} value: {{name}}\")),\n        }}\n    }}\n",
                        def.name
                    ));
                } else {
                    block.push_str("    pub fn from_name(name: &str) -> Option<Self> {\n        match name {\n");
                    for item in items {
                        block.push_str(&format!(
                            "            \"{0}\" => Some({1}::{0}),\n",
                            item.name, def.name
                        ));
                    }
                    block.push_str("            _ => None,\n        }\n    }\n");
                }
                block.push_str("}\n");
                block
            }
        };
        self.blocks.push(block);
        Ok(())
    }

    fn embed_idl(&mut self, idl: &EmbeddedIdl) -> Result<()> {
        let mut block = format!("// {}\n", idl.relative_path);
        for include in &idl.includes {
            block.push_str(&format!("// includes {include}\n"));
        }
        block.push_str(&format!(
            "pub const RAW_IDL: &str = r#\"{}\"#;\n",
            idl.source
        ));
        self.blocks.push(block);
        Ok(())
    }

    fn service(&mut self, service: &Service) -> Result<()> {
        let parent = service
            .parent
            .as_ref()
            .map(|parent| format!(": {parent}"))
            .unwrap_or_default();
        let mut block = format!("pub trait {}{parent} {{\n", service.name);
        for function in &service.functions {
            block.push_str(&Self::render_function(function));
        }
        block.push_str("}\n");
        if !self.options.no_logging_glue {
            block.push_str(&format!(
                "\npub const {}_SERVICE_NAME: &str = \"{}\";\n",
                service.name.to_uppercase(),
                service.name
            ));
        }
        self.blocks.push(block);
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>> {
        let mut out = String::new();
        out.push_str("// Code generated by weft. DO NOT EDIT.\n");
        out.push_str(&format!("// package {}\n", self.options.import_path));
        out.push_str(&format!("// module {}\n", self.options.package_name));
        for block in &self.blocks {
            out.push('\n');
            out.push_str(block);
        }
        Ok(out.into_bytes())
    }
}
