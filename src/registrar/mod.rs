mod error;
mod reflecting;

pub use error::*;
pub use reflecting::*;

use std::fmt::Debug;
use crate::Result;
use crate::serializer::SerializationContext;

/// Something that installs serializers into a context during setup.
pub trait Registrar: Debug {
    fn apply(&self, context: &mut dyn SerializationContext) -> Result<()>;
}

/// Applies registrars in order, stopping at the first failure.
pub fn apply_all<R: Registrar>(registrars: &[R], context: &mut dyn SerializationContext) -> Result<()> {
    for registrar in registrars {
        registrar.apply(context)?;
    }
    Ok(())
}
