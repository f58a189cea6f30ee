use ahash::AHashMap;
use log::warn;
use crate::serializer::{ContextSettings, SerializationContext, Serializer};
use crate::types::TypeDescriptor;

/// In-memory serialization context: value type -> serializer, in registration order.
#[derive(Debug, Clone, Default)]
pub struct SerializerRegistry {
    settings: ContextSettings,
    serializers: AHashMap<TypeDescriptor, Box<dyn Serializer>>,
    order: Vec<TypeDescriptor>,
}

impl SerializerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ContextSettings) -> Self {
        Self { settings, ..Self::default() }
    }

    pub fn registered_types(&self) -> &[TypeDescriptor] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl SerializationContext for SerializerRegistry {
    fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    fn register(&mut self, value_type: TypeDescriptor, serializer: Box<dyn Serializer>) {
        if let Some(previous) = self.serializers.insert(value_type.clone(), serializer) {
            warn!("replacing serializer {:?} registered for {}", previous, value_type);
        } else {
            self.order.push(value_type);
        }
    }

    fn serializer_for(&self, value_type: &TypeDescriptor) -> Option<&dyn Serializer> {
        self.serializers.get(value_type).map(|s| s.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use crate::serializer::builtin::{IntSerializer, LongSerializer};
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = SerializerRegistry::new();
        assert!(registry.is_empty());
        registry.register(TypeDescriptor::of::<i32>(), Box::new(IntSerializer));
        registry.register(TypeDescriptor::of::<i64>(), Box::new(LongSerializer));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.registered_types(), &[TypeDescriptor::of::<i32>(), TypeDescriptor::of::<i64>()]);

        let serializer = registry.serializer_for(&TypeDescriptor::of::<i64>()).unwrap();
        let mut out = Vec::new();
        serializer.write(&7i64, &mut out).unwrap();
        assert_eq!(out.len(), 8);
        assert!(registry.serializer_for(&TypeDescriptor::of::<bool>()).is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = SerializerRegistry::new();
        registry.register(TypeDescriptor::of::<i32>(), Box::new(LongSerializer));
        registry.register(TypeDescriptor::named::<i32>("int"), Box::new(IntSerializer));
        assert_eq!(registry.len(), 1);
        let serializer = registry.serializer_for(&TypeDescriptor::of::<i32>()).unwrap();
        assert_eq!(format!("{:?}", serializer), "IntSerializer");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut registry = SerializerRegistry::new();
        registry.register(TypeDescriptor::of::<i32>(), Box::new(IntSerializer));
        let snapshot = registry.clone();
        registry.register(TypeDescriptor::of::<i64>(), Box::new(LongSerializer));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }
}
