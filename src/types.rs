use std::any::{type_name, Any, TypeId};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use ahash::AHashMap;
use crate::Result;

/// Descriptor of an application value type.
///
/// Identity is the Rust `TypeId`; the name only shows up in diagnostics, so two
/// descriptors for the same type under different aliases are equal.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    name: Arc<str>,
    type_id: TypeId,
}

impl TypeDescriptor {
    pub fn of<T: Any>() -> Self {
        Self { name: short_type_name(type_name::<T>()).into(), type_id: TypeId::of::<T>() }
    }

    pub fn named<T: Any>(name: &str) -> Self {
        Self { name: name.into(), type_id: TypeId::of::<T>() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

// "alloc::vec::Vec<u8>" -> "Vec<u8>", "my_app::model::User" -> "User"
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        match c {
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                out.push_str(&segment);
                segment.clear();
                out.push(c);
            }
            _ => segment.push(c),
        }
    }
    out.push_str(&segment);
    out
}

/// Name -> value type lookup, used where configuration refers to types by name.
#[derive(Clone, Debug, Default)]
pub struct TypeCatalog {
    types: AHashMap<String, TypeDescriptor>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Any>(&mut self, name: &str) -> &mut Self {
        self.types.insert(name.to_string(), TypeDescriptor::named::<T>(name));
        self
    }

    pub fn lookup(&self, name: &str) -> Result<TypeDescriptor> {
        self.types.get(name).cloned().ok_or_else(|| format!("unknown value type \"{}\"", name))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

pub fn builtin_type_catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog
        .register::<i32>("int")
        .register::<i64>("long")
        .register::<bool>("bool")
        .register::<String>("string")
        .register::<Vec<u8>>("bytes")
        .register::<serde_json::Value>("json");
    catalog
}
