//! Declaration types for compiled schema modules.
//!
//! These types are the unit of work handed to an emitter capability. The
//! back-end never inspects their contents beyond the name; only emitters
//! render them.

use serde::{Deserialize, Serialize};

/// The kind of a named declaration within a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclKind {
    /// A named constant value.
    Constant,
    /// A user-defined type (struct, enum, typedef, exception).
    Type,
    /// A service definition.
    Service,
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclKind::Constant => write!(f, "constant"),
            DeclKind::Type => write!(f, "type"),
            DeclKind::Service => write!(f, "service"),
        }
    }
}

/// A named constant declared in a schema file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constant {
    /// Declared name, unique among the module's constants.
    pub name: String,
    /// Rendered type expression.
    pub ty: String,
    /// Rendered value expression.
    pub value: String,
}

impl Constant {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            value: value.into(),
        }
    }
}

/// A user-defined type declared in a schema file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Declared name, unique among the module's types.
    pub name: String,
    /// The shape of the definition.
    pub kind: TypeKind,
}

impl TypeDef {
    /// A type alias.
    pub fn alias(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Alias {
                target: target.into(),
            },
        }
    }

    /// A struct with the given fields.
    pub fn record(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Record { fields },
        }
    }

    /// An enum with the given items.
    pub fn enumeration(name: impl Into<String>, items: Vec<EnumItem>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Enum { items },
        }
    }

    /// An exception with the given fields.
    pub fn exception(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Exception { fields },
        }
    }
}

/// The shape of a user-defined type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    /// A type alias pointing at another type expression.
    Alias { target: String },
    /// A struct with named fields.
    Record { fields: Vec<Field> },
    /// An enum with named integer items.
    Enum { items: Vec<EnumItem> },
    /// An exception, structurally a record that can be thrown.
    Exception { fields: Vec<Field> },
}

/// A field of a record, exception, or function parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field identifier within the enclosing declaration.
    pub id: i16,
    /// Field name.
    pub name: String,
    /// Rendered type expression.
    pub ty: String,
    /// Whether the field is required.
    pub required: bool,
}

impl Field {
    pub fn new(id: i16, name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ty: ty.into(),
            required: true,
        }
    }
}

/// A single item of an enum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumItem {
    pub name: String,
    pub value: i32,
}

impl EnumItem {
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A service declared in a schema file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Declared name, unique among the module's services.
    pub name: String,
    /// Name of the extended service, if any.
    pub parent: Option<String>,
    /// Functions in declaration order.
    pub functions: Vec<Function>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            functions: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }
}

/// A single function of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    /// Parameters in declaration order.
    pub params: Vec<Field>,
    /// Rendered result type; `None` for void.
    pub result: Option<String>,
    /// Fire-and-forget functions have no response at all.
    pub oneway: bool,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            result: None,
            oneway: false,
        }
    }

    pub fn param(mut self, field: Field) -> Self {
        self.params.push(field);
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.result = Some(ty.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decl_kind_display() {
        assert_eq!(DeclKind::Constant.to_string(), "constant");
        assert_eq!(DeclKind::Type.to_string(), "type");
        assert_eq!(DeclKind::Service.to_string(), "service");
    }

    #[test]
    fn test_service_builder() {
        let service = Service::new("KeyValue")
            .extends("Base")
            .function(Function::new("get").param(Field::new(1, "key", "string")).returns("string"));

        assert_eq!(service.parent.as_deref(), Some("Base"));
        assert_eq!(service.functions.len(), 1);
        assert_eq!(service.functions[0].result.as_deref(), Some("string"));
    }
}
