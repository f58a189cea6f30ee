mod class;
pub mod builtin;

pub use class::*;

use std::any::Any;
use std::fmt::Debug;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use crate::Result;
use crate::types::TypeDescriptor;

pub trait Serializer: DynClone + Debug + Send + Sync {
    fn write(&self, value: &dyn Any, out: &mut Vec<u8>) -> Result<()>;

    fn read(&self, input: &[u8]) -> Result<Box<dyn Any + Send>>;
}
dyn_clone::clone_trait_object!(Serializer);

/// The framework side of a registration: stores value type -> serializer mappings.
pub trait SerializationContext {
    fn settings(&self) -> &ContextSettings;

    fn register(&mut self, value_type: TypeDescriptor, serializer: Box<dyn Serializer>);

    fn serializer_for(&self, value_type: &TypeDescriptor) -> Option<&dyn Serializer>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSettings {
    /// Upper bound on a single encoded value, enforced by size-aware serializers.
    #[serde(default = "default_max_buffer_size")]
    pub max_buffer_size: usize,
}

impl Default for ContextSettings {
    fn default() -> Self {
        ContextSettings {
            max_buffer_size: default_max_buffer_size(),
        }
    }
}

fn default_max_buffer_size() -> usize {
    64 * 1024 * 1024
}
