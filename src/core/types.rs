use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Primitive kinds of the foreign runtime's type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Void,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "void" => Some(PrimitiveKind::Void),
            "boolean" => Some(PrimitiveKind::Boolean),
            "byte" => Some(PrimitiveKind::Byte),
            "char" => Some(PrimitiveKind::Char),
            "short" => Some(PrimitiveKind::Short),
            "int" => Some(PrimitiveKind::Int),
            "long" => Some(PrimitiveKind::Long),
            "float" => Some(PrimitiveKind::Float),
            "double" => Some(PrimitiveKind::Double),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }
}

/// A reference to a type as it appears in a signature or field.
///
/// Class references are by-name and stay unresolved until the whole
/// class map is built, which is what makes forward references and
/// cyclic class graphs safe to represent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TypeReference {
    Primitive(PrimitiveKind),
    Array(Box<TypeReference>),
    Class(String),
}

impl TypeReference {
    /// Parse a JVM-style type name such as `int`, `java.lang.String`
    /// or `com.example.Vertex[][]` into a reference.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if let Some(element) = name.strip_suffix("[]") {
            return TypeReference::Array(Box::new(TypeReference::parse(element)));
        }
        match PrimitiveKind::from_name(name) {
            Some(kind) => TypeReference::Primitive(kind),
            None => TypeReference::Class(name.to_string()),
        }
    }

    /// The class name behind this reference, unwrapping any array
    /// nesting. Primitive references (and arrays of primitives) have
    /// no underlying class.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeReference::Primitive(_) => None,
            TypeReference::Array(element) => element.class_name(),
            TypeReference::Class(name) => Some(name),
        }
    }

    /// Render back to the JVM-style source notation.
    pub fn type_name(&self) -> String {
        match self {
            TypeReference::Primitive(kind) => kind.name().to_string(),
            TypeReference::Array(element) => format!("{}[]", element.type_name()),
            TypeReference::Class(name) => name.clone(),
        }
    }
}

/// Whether a definition describes a class, an interface, or a
/// primitive alias recorded for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassKind {
    Class,
    Interface,
    PrimitiveAlias,
}

/// One callable shape: ordered parameter types, a return type, and
/// whether the member is static. Constructors use the defining class
/// as their return type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub params: Vec<TypeReference>,
    pub returns: TypeReference,
    pub is_static: bool,
}

/// A declared generic type parameter, erased to its upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericParam {
    pub name: String,
    pub bound: TypeReference,
}

/// The normalized shape of one class or interface.
///
/// Methods are grouped by name into overload sets; group order and
/// the order of signatures within a group follow reflection discovery
/// order so that downstream overload resolution is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinition {
    pub short_name: String,
    pub full_name: String,
    pub kind: ClassKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub constructors: Vec<Signature>,
    pub methods: IndexMap<String, Vec<Signature>>,
    pub fields: IndexMap<String, TypeReference>,
    pub generics: Vec<GenericParam>,
    pub is_included: bool,
}

impl ClassDefinition {
    /// A placeholder definition for a class that was discovered but
    /// never expanded (filtered out or unreflectable).
    pub fn leaf(full_name: &str, kind: ClassKind) -> Self {
        Self {
            short_name: short_name_of(full_name).to_string(),
            full_name: full_name.to_string(),
            kind,
            superclass: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
            methods: IndexMap::new(),
            fields: IndexMap::new(),
            generics: Vec::new(),
            is_included: false,
        }
    }

    /// The package portion of the fully-qualified name, empty for
    /// classes in the default package.
    pub fn package(&self) -> &str {
        match self.full_name.rfind('.') {
            Some(idx) => &self.full_name[..idx],
            None => "",
        }
    }
}

/// Last dot-separated segment of a fully-qualified name.
pub fn short_name_of(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}

/// Raw reflected member as reported by the bridge: type names are
/// still strings in the runtime's own notation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodShape {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default = "default_return")]
    pub returns: String,
    #[serde(default)]
    pub is_static: bool,
}

fn default_return() -> String {
    "void".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldShape {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub is_static: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericShape {
    pub name: String,
    #[serde(default)]
    pub bound: Option<String>,
}

/// Everything the Reflection Provider reports about one class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassShape {
    pub full_name: String,
    #[serde(default = "default_kind")]
    pub kind: ClassKind,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub constructors: Vec<MethodShape>,
    #[serde(default)]
    pub methods: Vec<MethodShape>,
    #[serde(default)]
    pub fields: Vec<FieldShape>,
    #[serde(default)]
    pub generics: Vec<GenericShape>,
}

fn default_kind() -> ClassKind {
    ClassKind::Class
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitive() {
        assert_eq!(
            TypeReference::parse("int"),
            TypeReference::Primitive(PrimitiveKind::Int)
        );
        assert_eq!(
            TypeReference::parse("void"),
            TypeReference::Primitive(PrimitiveKind::Void)
        );
    }

    #[test]
    fn test_parse_class_reference() {
        let reference = TypeReference::parse("java.lang.String");
        assert_eq!(reference, TypeReference::Class("java.lang.String".to_string()));
        assert_eq!(reference.class_name(), Some("java.lang.String"));
    }

    #[test]
    fn test_parse_nested_array() {
        let reference = TypeReference::parse("com.example.Vertex[][]");
        assert_eq!(reference.type_name(), "com.example.Vertex[][]");
        assert_eq!(reference.class_name(), Some("com.example.Vertex"));

        let primitive_array = TypeReference::parse("int[]");
        assert_eq!(primitive_array.class_name(), None);
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name_of("com.example.Graph"), "Graph");
        assert_eq!(short_name_of("Graph"), "Graph");
    }

    #[test]
    fn test_package_of_definition() {
        let def = ClassDefinition::leaf("com.example.Graph", ClassKind::Class);
        assert_eq!(def.package(), "com.example");
        assert_eq!(def.short_name, "Graph");
        assert!(!def.is_included);

        let rootless = ClassDefinition::leaf("Graph", ClassKind::Class);
        assert_eq!(rootless.package(), "");
    }

    #[test]
    fn test_class_shape_from_json() {
        let json = r#"{
            "fullName": "com.example.Graph",
            "kind": "class",
            "superclass": "java.lang.Object",
            "methods": [
                { "name": "addVertex", "params": ["java.lang.String"], "returns": "com.example.Vertex" }
            ]
        }"#;

        let shape: ClassShape = serde_json::from_str(json).unwrap();
        assert_eq!(shape.full_name, "com.example.Graph");
        assert_eq!(shape.kind, ClassKind::Class);
        assert_eq!(shape.methods.len(), 1);
        assert_eq!(shape.methods[0].returns, "com.example.Vertex");
        assert!(shape.constructors.is_empty());
    }
}
