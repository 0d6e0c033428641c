//! Declaration model of the host program.
//!
//! The scanner never talks to a compiler directly. Everything it needs is
//! exposed through [`DeclarationProvider`]; [`Program`] is the in-memory
//! implementation, deserializable from a JSON or YAML declaration dump.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

// ── Type references ─────────────────────────────────────────────────────

/// A reference to a type as written in a signature or field.
///
/// In dumps a type reference is written as a string:
///
/// | Syntax | Meaning |
/// |--------|---------|
/// | `app::models::User` | named type |
/// | `app::Page<app::User>` | generic instantiation |
/// | `Vec<T>` or `[T]` | array of `T` |
/// | `Option<T>` | optional `T` |
/// | `$T` | open generic placeholder |
/// | `!` | unresolvable type |
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Named { path: String, args: Vec<TypeRef> },
    Array(Box<TypeRef>),
    Optional(Box<TypeRef>),
    Param(String),
    Error,
}

impl TypeRef {
    pub fn named(path: impl Into<String>) -> Self {
        TypeRef::Named {
            path: path.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(path: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            path: path.into(),
            args,
        }
    }

    /// Parse the textual form documented on [`TypeRef`].
    pub fn parse(input: &str) -> Result<Self, TypeParseError> {
        let mut parser = TypeParser {
            src: input,
            pos: 0,
        };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != input.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(ty)
    }

    /// Path of a named type, `None` for every other shape.
    pub fn path(&self) -> Option<&str> {
        match self {
            TypeRef::Named { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, TypeRef::Named { path, args } if path == "()" && args.is_empty())
    }

    /// Whether this names a built-in scalar type.
    pub fn is_primitive(&self) -> bool {
        match self {
            TypeRef::Named { path, args } => args.is_empty() && is_primitive_path(path),
            _ => false,
        }
    }

    /// Whether any part of the reference failed to resolve.
    pub fn contains_error(&self) -> bool {
        match self {
            TypeRef::Error => true,
            TypeRef::Named { args, .. } => args.iter().any(TypeRef::contains_error),
            TypeRef::Array(inner) | TypeRef::Optional(inner) => inner.contains_error(),
            TypeRef::Param(_) => false,
        }
    }
}

const PRIMITIVES: &[&str] = &[
    "()", "bool", "char", "str", "String", "i8", "i16", "i32", "i64", "i128", "isize", "u8",
    "u16", "u32", "u64", "u128", "usize", "f32", "f64",
];

/// Whether `path` names a built-in scalar type (`String` counts as one).
pub fn is_primitive_path(path: &str) -> bool {
    let path = path.strip_prefix("std::string::").unwrap_or(path);
    PRIMITIVES.contains(&path)
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named { path, args } => {
                write!(f, "{path}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeRef::Array(inner) => write!(f, "Vec<{inner}>"),
            TypeRef::Optional(inner) => write!(f, "Option<{inner}>"),
            TypeRef::Param(name) => write!(f, "${name}"),
            TypeRef::Error => write!(f, "!"),
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, TypeParseError> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

/// Error returned when a textual type reference is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParseError {
    pub input: String,
    pub position: usize,
    pub message: &'static str,
}

impl fmt::Display for TypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid type `{}` at offset {}: {}",
            self.input, self.position, self.message
        )
    }
}

impl std::error::Error for TypeParseError {}

struct TypeParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn error(&self, message: &'static str) -> TypeParseError {
        TypeParseError {
            input: self.src.to_string(),
            position: self.pos,
            message,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<&'a str, TypeParseError> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected identifier"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn parse_type(&mut self) -> Result<TypeRef, TypeParseError> {
        if self.eat("!") {
            return Ok(TypeRef::Error);
        }
        if self.eat("()") {
            return Ok(TypeRef::named("()"));
        }
        if self.eat("$") {
            return Ok(TypeRef::Param(self.ident()?.to_string()));
        }
        if self.eat("[") {
            let elem = self.parse_type()?;
            if !self.eat("]") {
                return Err(self.error("expected `]`"));
            }
            return Ok(TypeRef::Array(Box::new(elem)));
        }

        self.eat("::");
        let mut path = self.ident()?.to_string();
        while self.eat("::") {
            path.push_str("::");
            path.push_str(self.ident()?);
        }

        let mut args = Vec::new();
        if self.eat("<") {
            loop {
                args.push(self.parse_type()?);
                if self.eat(",") {
                    continue;
                }
                if self.eat(">") {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
        }

        match (path.as_str(), args.len()) {
            ("Vec" | "std::vec::Vec", 1) => Ok(TypeRef::Array(Box::new(args.remove(0)))),
            ("Option" | "std::option::Option", 1) => {
                Ok(TypeRef::Optional(Box::new(args.remove(0))))
            }
            _ => Ok(TypeRef::Named { path, args }),
        }
    }
}

// ── Attributes ──────────────────────────────────────────────────────────

/// A literal attribute argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<AttrValue>),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedArg {
    pub name: String,
    pub value: AttrValue,
}

/// One attribute usage on a type, method, field, or parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeUsage {
    /// Fully-qualified name of the attribute type.
    pub name: String,
    #[serde(default)]
    pub args: Vec<AttrValue>,
    #[serde(default)]
    pub named: Vec<NamedArg>,
}

impl AttributeUsage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            named: Vec::new(),
        }
    }

    pub fn with_arg(mut self, value: AttrValue) -> Self {
        self.args.push(value);
        self
    }

    pub fn with_named(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.named.push(NamedArg {
            name: name.into(),
            value,
        });
        self
    }
}

// ── Declarations ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Record,
    Enum,
    Interface,
    Primitive,
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default = "yes")]
    pub public: bool,
    #[serde(default = "yes")]
    pub readable: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub attributes: Vec<AttributeUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default = "yes")]
    pub public: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "async")]
    pub is_async: bool,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    /// Declared return type; absent means unit.
    #[serde(default)]
    pub returns: Option<TypeRef>,
    #[serde(default)]
    pub attributes: Vec<AttributeUsage>,
}

/// One declaration of a type. A type split over several partial
/// declarations appears once per part.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeDecl {
    pub path: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub generics: Vec<String>,
    #[serde(default)]
    pub base: Option<TypeRef>,
    #[serde(default)]
    pub attributes: Vec<AttributeUsage>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Last path segment, e.g. `UserController` for `app::UserController`.
    pub fn short_name(&self) -> &str {
        short_name(&self.path)
    }

    fn absorb(&mut self, part: &TypeDecl) {
        if self.kind == TypeKind::default() {
            self.kind = part.kind;
        }
        self.is_abstract |= part.is_abstract;
        if self.generics.is_empty() {
            self.generics = part.generics.clone();
        }
        if self.base.is_none() {
            self.base = part.base.clone();
        }
        self.attributes.extend(part.attributes.iter().cloned());
        self.fields.extend(part.fields.iter().cloned());
        self.methods.extend(part.methods.iter().cloned());
    }
}

pub fn short_name(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

// ── Provider ────────────────────────────────────────────────────────────

/// Read-only view of the declarations of a compiled program.
pub trait DeclarationProvider {
    /// Every declaration, in source order. Partial declarations of the same
    /// type appear separately.
    fn declarations(&self) -> &[TypeDecl];

    /// The merged view of the type declared at `path`, if any.
    fn resolve(&self, path: &str) -> Option<&TypeDecl>;
}

/// In-memory program model.
#[derive(Debug, Clone, Default)]
pub struct Program {
    declarations: Vec<TypeDecl>,
    merged: Vec<TypeDecl>,
    index: HashMap<String, usize>,
}

#[derive(Deserialize)]
struct ProgramDump {
    #[serde(default)]
    types: Vec<TypeDecl>,
}

impl Program {
    pub fn new(declarations: Vec<TypeDecl>) -> Self {
        let mut merged: Vec<TypeDecl> = Vec::new();
        let mut index = HashMap::new();
        for decl in &declarations {
            match index.get(&decl.path) {
                Some(&i) => {
                    let existing: &mut TypeDecl = &mut merged[i];
                    existing.absorb(decl);
                }
                None => {
                    index.insert(decl.path.clone(), merged.len());
                    merged.push(decl.clone());
                }
            }
        }
        Self {
            declarations,
            merged,
            index,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let dump: ProgramDump = serde_json::from_str(json).map_err(LoadError::Json)?;
        Ok(Self::new(dump.types))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, LoadError> {
        let dump: ProgramDump = serde_yaml::from_str(yaml).map_err(LoadError::Yaml)?;
        Ok(Self::new(dump.types))
    }

    /// Load a dump, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            other => Err(LoadError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Merged declarations, one per type, in first-seen order.
    pub fn types(&self) -> &[TypeDecl] {
        &self.merged
    }
}

impl DeclarationProvider for Program {
    fn declarations(&self) -> &[TypeDecl] {
        &self.declarations
    }

    fn resolve(&self, path: &str) -> Option<&TypeDecl> {
        self.index.get(path).map(|&i| &self.merged[i])
    }
}

/// Error raised while loading a declaration dump.
#[derive(Debug)]
pub enum LoadError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    UnsupportedFormat(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => write!(f, "cannot read '{path}': {source}"),
            LoadError::Json(e) => write!(f, "invalid JSON declaration dump: {e}"),
            LoadError::Yaml(e) => write!(f, "invalid YAML declaration dump: {e}"),
            LoadError::UnsupportedFormat(ext) => write!(
                f,
                "unsupported declaration dump extension '{ext}' (expected json, yaml or yml)"
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Json(e) => Some(e),
            LoadError::Yaml(e) => Some(e),
            LoadError::UnsupportedFormat(_) => None,
        }
    }
}
