use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use log::debug;
use crate::registrar::{InstantiationCause, InstantiationError, Registrar};
use crate::serializer::{SerializationContext, Serializer, SerializerClass};
use crate::types::TypeDescriptor;

const HASH_SEEDS: [u64; 4] = [0x243f_6a88_85a3_08d3, 0x1319_8a2e_0370_7344, 0xa409_3822_299f_31d0, 0x082e_fa98_ec4e_6c89];

fn fixed_hash<T: Hash>(value: &T) -> u64 {
    let [k0, k1, k2, k3] = HASH_SEEDS;
    ahash::RandomState::with_seeds(k0, k1, k2, k3).hash_one(value)
}

/// Registers `serializer_class` for `value_type`, building the serializer through the
/// most specific constructor the class exposes:
/// `(context, type)`, then `(context)`, then `(type)`, then `()`.
///
/// Only the absence of a shape moves on to the next one. Once a constructor is
/// picked, its error is final.
#[derive(Debug, Clone)]
pub struct ReflectingRegistrar {
    value_type: TypeDescriptor,
    serializer_class: SerializerClass,
}

impl ReflectingRegistrar {
    pub fn new(value_type: TypeDescriptor, serializer_class: SerializerClass) -> Self {
        Self { value_type, serializer_class }
    }

    pub fn registered_type(&self) -> &TypeDescriptor {
        &self.value_type
    }

    pub fn serializer_class(&self) -> &SerializerClass {
        &self.serializer_class
    }

    pub fn apply(&self, context: &mut dyn SerializationContext) -> Result<(), InstantiationError> {
        let serializer = self.new_serializer(&*context)?;
        context.register(self.value_type.clone(), serializer);
        Ok(())
    }

    pub fn new_serializer(&self, context: &dyn SerializationContext) -> Result<Box<dyn Serializer>, InstantiationError> {
        let constructor = self.serializer_class.resolve_constructor()
            .ok_or_else(|| self.instantiation_error(InstantiationCause::NoUsableConstructor))?;
        debug!("creating serializer {} for {} with constructor {}", self.serializer_class, self.value_type, constructor.shape());
        constructor.invoke(context, &self.value_type)
            .map_err(|e| self.instantiation_error(InstantiationCause::ConstructorFailed(e)))
    }

    /// `hash(value_type) ^ hash(serializer_class)`, stable for the life of the process.
    pub fn hash_code(&self) -> u64 {
        fixed_hash(&self.value_type) ^ fixed_hash(&self.serializer_class)
    }

    fn instantiation_error(&self, cause: InstantiationCause) -> InstantiationError {
        InstantiationError::new(self.serializer_class.name(), self.value_type.name(), cause)
    }
}

impl Registrar for ReflectingRegistrar {
    fn apply(&self, context: &mut dyn SerializationContext) -> crate::Result<()> {
        ReflectingRegistrar::apply(self, context).map_err(String::from)
    }
}

impl PartialEq for ReflectingRegistrar {
    fn eq(&self, other: &Self) -> bool {
        self.value_type == other.value_type && self.serializer_class == other.serializer_class
    }
}

impl Eq for ReflectingRegistrar {}

impl Hash for ReflectingRegistrar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl Display for ReflectingRegistrar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.value_type, self.serializer_class)
    }
}
