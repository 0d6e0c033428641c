use std::collections::{BTreeMap, BTreeSet};

use crate::model::{short_name, AttrValue, AttributeUsage, TypeRef};

/// Names that stay fully qualified rather than shadow the prelude.
const RESERVED: &[&str] = &["Box", "Option", "Result", "String", "Vec", "Some", "None", "Ok", "Err"];

/// `use` items needed by one artifact.
///
/// Threaded through the emitters as an explicit accumulator: every path
/// rendered through [`Imports::name_of`] is recorded and its short name
/// returned. A second path with an already-taken short name is rendered
/// fully qualified instead.
#[derive(Debug, Default)]
pub struct Imports {
    by_short: BTreeMap<String, String>,
    paths: BTreeSet<String>,
}

impl Imports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name to write in generated code for the item at `path`.
    pub fn name_of(&mut self, path: &str) -> String {
        if !path.contains("::") {
            return path.to_string();
        }
        let short = short_name(path);
        if RESERVED.contains(&short) {
            return path.to_string();
        }
        match self.by_short.get(short) {
            Some(existing) if existing == path => short.to_string(),
            Some(_) => path.to_string(),
            None => {
                self.by_short.insert(short.to_string(), path.to_string());
                self.paths.insert(path.to_string());
                short.to_string()
            }
        }
    }

    pub fn render_type(&mut self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Named { path, args } => {
                let name = self.name_of(path);
                if args.is_empty() {
                    name
                } else {
                    let args: Vec<String> = args.iter().map(|a| self.render_type(a)).collect();
                    format!("{name}<{}>", args.join(", "))
                }
            }
            TypeRef::Array(inner) => format!("Vec<{}>", self.render_type(inner)),
            TypeRef::Optional(inner) => format!("Option<{}>", self.render_type(inner)),
            TypeRef::Param(name) => name.clone(),
            TypeRef::Error => "_".to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Sorted `use` lines, one per path.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for path in &self.paths {
            out.push_str("use ");
            out.push_str(path);
            out.push_str(";\n");
        }
        out
    }
}

/// Render an attribute exactly as declared: `#[name(args, key = value)]`.
pub fn render_attribute(attr: &AttributeUsage) -> String {
    let mut parts: Vec<String> = attr.args.iter().map(render_value).collect();
    parts.extend(
        attr.named
            .iter()
            .map(|arg| format!("{} = {}", arg.name, render_value(&arg.value))),
    );
    if parts.is_empty() {
        format!("#[{}]", attr.name)
    } else {
        format!("#[{}({})]", attr.name, parts.join(", "))
    }
}

fn render_value(value: &AttrValue) -> String {
    match value {
        AttrValue::Bool(b) => b.to_string(),
        AttrValue::Int(i) => i.to_string(),
        AttrValue::Float(f) => format!("{f:?}"),
        AttrValue::Str(s) => format!("{s:?}"),
        AttrValue::List(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", items.join(", "))
        }
    }
}
