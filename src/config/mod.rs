use std::fs;
use ahash::AHashSet;
use config::{Config, FileFormat};
use log::warn;
use serde::{Deserialize, Serialize};
use crate::Result;
use crate::registrar::ReflectingRegistrar;
use crate::serializer::{ContextSettings, SerializerCatalog};
use crate::types::TypeCatalog;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub context: ContextSettings,
    #[serde(default)]
    pub registrations: Vec<RegistrationConfig>,
}

/// One `type -> serializer` line, both sides referring to catalog names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationConfig {
    #[serde(rename = "type")]
    pub value_type: String,
    pub serializer: String,
}

pub fn parse_config(config_path: &str) -> Result<AppConfig> {
    let content = fs::read_to_string(config_path).map_err(|e| format!("Failed to read config file {}: {}", config_path, e))?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<AppConfig> {
    Config::builder()
        .add_source(config::File::from_str(content, FileFormat::Yaml))
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| format!("Invalid config: {}", e))
}

/// Resolves every configured registration by name. Repeated pairs are kept once,
/// at their first position.
pub fn build_registrars(config: &AppConfig, types: &TypeCatalog, serializers: &SerializerCatalog) -> Result<Vec<ReflectingRegistrar>> {
    let mut seen = AHashSet::new();
    let mut registrars = Vec::with_capacity(config.registrations.len());
    for registration in &config.registrations {
        let registrar = ReflectingRegistrar::new(
            types.lookup(&registration.value_type)?,
            serializers.lookup(&registration.serializer)?,
        );
        if seen.insert(registrar.clone()) {
            registrars.push(registrar);
        } else {
            warn!("duplicate registration of {} for {} ignored", registrar.serializer_class(), registrar.registered_type());
        }
    }
    Ok(registrars)
}

#[cfg(test)]
mod tests {
    use crate::registrar::apply_all;
    use crate::registry::SerializerRegistry;
    use crate::serializer::{ConstructorShape, SerializationContext};
    use crate::serializer::builtin::builtin_serializer_catalog;
    use crate::types::{builtin_type_catalog, TypeDescriptor};
    use super::*;

    const CONFIG: &str = r#"
context:
  max_buffer_size: 1024
registrations:
  - type: int
    serializer: int
  - type: string
    serializer: string
  - type: int
    serializer: int
  - type: json
    serializer: json
"#;

    #[test]
    fn test_parse_config_str() {
        let config = parse_config_str(CONFIG).unwrap();
        assert_eq!(config.context.max_buffer_size, 1024);
        assert_eq!(config.registrations.len(), 4);
        assert_eq!(config.registrations[1], RegistrationConfig { value_type: "string".to_string(), serializer: "string".to_string() });

        let empty = parse_config_str("registrations: []").unwrap();
        assert_eq!(empty.context, ContextSettings::default());
        assert!(serde_yaml::to_string(&empty).unwrap().contains("max_buffer_size"));
    }

    #[test]
    fn test_config_file() {
        let config = parse_config("config/registrations.yaml").unwrap();
        let registrars = build_registrars(&config, &builtin_type_catalog(), &builtin_serializer_catalog()).unwrap();
        let mut registry = SerializerRegistry::with_settings(config.context);
        apply_all(&registrars, &mut registry).unwrap();
        assert_eq!(registry.len(), registrars.len());
        assert!(parse_config("config/missing.yaml").unwrap_err().starts_with("Failed to read config file"));
    }

    #[test]
    fn test_build_registrars_dedups() {
        let config = parse_config_str(CONFIG).unwrap();
        let registrars = build_registrars(&config, &builtin_type_catalog(), &builtin_serializer_catalog()).unwrap();
        let names: Vec<String> = registrars.iter().map(|r| r.to_string()).collect();
        assert_eq!(names, vec!["int -> IntSerializer", "string -> StringSerializer", "json -> JsonSerializer"]);
        assert!(registrars[2].registered_type().is::<serde_json::Value>());
        assert_eq!(registrars[2].serializer_class().shapes(), vec![ConstructorShape::ContextAndType]);

        let mut registry = SerializerRegistry::with_settings(config.context.clone());
        apply_all(&registrars, &mut registry).unwrap();
        assert_eq!(registry.len(), 3);
        assert!(registry.serializer_for(&TypeDescriptor::of::<serde_json::Value>()).is_some());
    }

    #[test]
    fn test_unknown_names() {
        let types = builtin_type_catalog();
        let serializers = builtin_serializer_catalog();
        let config = parse_config_str("registrations:\n  - type: decimal\n    serializer: int\n").unwrap();
        assert_eq!(build_registrars(&config, &types, &serializers).unwrap_err(), "unknown value type \"decimal\"");
        let config = parse_config_str("registrations:\n  - type: int\n    serializer: varint\n").unwrap();
        assert_eq!(build_registrars(&config, &types, &serializers).unwrap_err(), "unknown serializer \"varint\"");
    }

    #[test]
    fn test_mismatched_serializer_fails_on_apply() {
        let config = parse_config_str("registrations:\n  - type: int\n    serializer: string\n").unwrap();
        let registrars = build_registrars(&config, &builtin_type_catalog(), &builtin_serializer_catalog()).unwrap();
        let mut registry = SerializerRegistry::new();
        let err = apply_all(&registrars, &mut registry).unwrap_err();
        assert_eq!(err, "Unable to create serializer \"StringSerializer\" for type: int: StringSerializer only support String, not int");
        assert!(registry.is_empty());
    }
}
