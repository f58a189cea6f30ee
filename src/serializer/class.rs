use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use ahash::AHashMap;
use itertools::Itertools;
use crate::Result;
use crate::serializer::{SerializationContext, Serializer};
use crate::types::TypeDescriptor;

type ContextAndTypeFn = dyn Fn(&dyn SerializationContext, &TypeDescriptor) -> Result<Box<dyn Serializer>> + Send + Sync;
type ContextFn = dyn Fn(&dyn SerializationContext) -> Result<Box<dyn Serializer>> + Send + Sync;
type TypeFn = dyn Fn(&TypeDescriptor) -> Result<Box<dyn Serializer>> + Send + Sync;
type NoArgsFn = dyn Fn() -> Result<Box<dyn Serializer>> + Send + Sync;

/// Argument list a serializer constructor accepts. Declaration order is resolution priority.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstructorShape {
    ContextAndType,
    Context,
    Type,
    NoArgs,
}

impl ConstructorShape {
    pub const PRIORITY: [ConstructorShape; 4] = [
        ConstructorShape::ContextAndType,
        ConstructorShape::Context,
        ConstructorShape::Type,
        ConstructorShape::NoArgs,
    ];
}

impl Display for ConstructorShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConstructorShape::ContextAndType => "(context, type)",
            ConstructorShape::Context => "(context)",
            ConstructorShape::Type => "(type)",
            ConstructorShape::NoArgs => "()",
        };
        f.write_str(s)
    }
}

#[derive(Clone)]
pub enum Constructor {
    ContextAndType(Arc<ContextAndTypeFn>),
    Context(Arc<ContextFn>),
    Type(Arc<TypeFn>),
    NoArgs(Arc<NoArgsFn>),
}

impl Constructor {
    pub fn shape(&self) -> ConstructorShape {
        match self {
            Constructor::ContextAndType(_) => ConstructorShape::ContextAndType,
            Constructor::Context(_) => ConstructorShape::Context,
            Constructor::Type(_) => ConstructorShape::Type,
            Constructor::NoArgs(_) => ConstructorShape::NoArgs,
        }
    }

    /// Calls the constructor, passing only the arguments its shape asks for.
    pub fn invoke(&self, context: &dyn SerializationContext, value_type: &TypeDescriptor) -> Result<Box<dyn Serializer>> {
        match self {
            Constructor::ContextAndType(f) => f(context, value_type),
            Constructor::Context(f) => f(context),
            Constructor::Type(f) => f(value_type),
            Constructor::NoArgs(f) => f(),
        }
    }
}

impl Debug for Constructor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Constructor{}", self.shape())
    }
}

/// A named serializer implementation together with the constructors it exposes.
#[derive(Clone)]
pub struct SerializerClass {
    name: Arc<str>,
    constructors: Vec<Constructor>,
}

impl SerializerClass {
    pub fn new(name: &str) -> Self {
        Self { name: name.into(), constructors: Vec::new() }
    }

    pub fn with_context_and_type<F>(self, f: F) -> Self
    where
        F: Fn(&dyn SerializationContext, &TypeDescriptor) -> Result<Box<dyn Serializer>> + Send + Sync + 'static,
    {
        self.with_constructor(Constructor::ContextAndType(Arc::new(f)))
    }

    pub fn with_context<F>(self, f: F) -> Self
    where
        F: Fn(&dyn SerializationContext) -> Result<Box<dyn Serializer>> + Send + Sync + 'static,
    {
        self.with_constructor(Constructor::Context(Arc::new(f)))
    }

    pub fn with_type<F>(self, f: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> Result<Box<dyn Serializer>> + Send + Sync + 'static,
    {
        self.with_constructor(Constructor::Type(Arc::new(f)))
    }

    pub fn with_no_args<F>(self, f: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Serializer>> + Send + Sync + 'static,
    {
        self.with_constructor(Constructor::NoArgs(Arc::new(f)))
    }

    /// Declares a constructor, replacing any earlier one of the same shape.
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        let shape = constructor.shape();
        self.constructors.retain(|c| c.shape() != shape);
        self.constructors.push(constructor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constructor(&self, shape: ConstructorShape) -> Option<&Constructor> {
        self.constructors.iter().find(|c| c.shape() == shape)
    }

    /// The most specific constructor this class exposes, if any.
    pub fn resolve_constructor(&self) -> Option<&Constructor> {
        ConstructorShape::PRIORITY.iter().find_map(|shape| self.constructor(*shape))
    }

    pub fn shapes(&self) -> Vec<ConstructorShape> {
        self.constructors.iter().map(|c| c.shape()).sorted().collect()
    }
}

impl PartialEq for SerializerClass {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for SerializerClass {}

impl Hash for SerializerClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Debug for SerializerClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializerClass")
            .field("name", &self.name)
            .field("shapes", &self.shapes())
            .finish()
    }
}

impl Display for SerializerClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Name -> serializer class lookup, the stand-in for loading a class by name.
#[derive(Clone, Debug, Default)]
pub struct SerializerCatalog {
    classes: AHashMap<String, SerializerClass>,
}

impl SerializerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class: SerializerClass) -> &mut Self {
        self.classes.insert(class.name().to_string(), class);
        self
    }

    pub fn register_as(&mut self, name: &str, class: SerializerClass) -> &mut Self {
        self.classes.insert(name.to_string(), class);
        self
    }

    pub fn lookup(&self, name: &str) -> Result<SerializerClass> {
        self.classes.get(name).cloned().ok_or_else(|| format!("unknown serializer \"{}\"", name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.classes.keys().map(|k| k.as_str()).sorted().collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
