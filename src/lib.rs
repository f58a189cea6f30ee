pub mod common;
pub mod types;
pub mod serializer;
pub mod registry;
pub mod registrar;
pub mod config;

pub use common::*;
