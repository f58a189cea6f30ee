use std::any::Any;
use crate::Result;
use crate::serializer::{SerializationContext, Serializer, SerializerCatalog, SerializerClass};
use crate::types::TypeDescriptor;

fn downcast<'a, T: Any>(value: &'a dyn Any, expected: &str) -> Result<&'a T> {
    value.downcast_ref::<T>().ok_or_else(|| format!("expected {} value", expected))
}

fn read_fixed<const N: usize>(input: &[u8], expected: &str) -> Result<[u8; N]> {
    input.get(..N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| format!("need {} bytes to read {}, got {}", N, expected, input.len()))
}

fn write_sized(bytes: &[u8], max_size: usize, out: &mut Vec<u8>) -> Result<()> {
    if bytes.len() > max_size {
        return Err(format!("value of {} bytes exceeds max buffer size {}", bytes.len(), max_size));
    }
    let len = u32::try_from(bytes.len()).map_err(|_| format!("value of {} bytes is too large", bytes.len()))?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

fn read_sized(input: &[u8], max_size: usize) -> Result<&[u8]> {
    let len = u32::from_le_bytes(read_fixed::<4>(input, "length")?) as usize;
    if len > max_size {
        return Err(format!("value of {} bytes exceeds max buffer size {}", len, max_size));
    }
    input[4..].get(..len).ok_or_else(|| format!("truncated input: expected {} bytes, got {}", len, input.len() - 4))
}

#[derive(Debug, Clone, Default)]
pub struct IntSerializer;

impl Serializer for IntSerializer {
    fn write(&self, value: &dyn Any, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&downcast::<i32>(value, "i32")?.to_le_bytes());
        Ok(())
    }

    fn read(&self, input: &[u8]) -> Result<Box<dyn Any + Send>> {
        Ok(Box::new(i32::from_le_bytes(read_fixed(input, "i32")?)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LongSerializer;

impl Serializer for LongSerializer {
    fn write(&self, value: &dyn Any, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&downcast::<i64>(value, "i64")?.to_le_bytes());
        Ok(())
    }

    fn read(&self, input: &[u8]) -> Result<Box<dyn Any + Send>> {
        Ok(Box::new(i64::from_le_bytes(read_fixed(input, "i64")?)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoolSerializer;

impl Serializer for BoolSerializer {
    fn write(&self, value: &dyn Any, out: &mut Vec<u8>) -> Result<()> {
        out.push(*downcast::<bool>(value, "bool")? as u8);
        Ok(())
    }

    fn read(&self, input: &[u8]) -> Result<Box<dyn Any + Send>> {
        match read_fixed::<1>(input, "bool")? {
            [0] => Ok(Box::new(false)),
            [1] => Ok(Box::new(true)),
            [b] => Err(format!("invalid bool byte {}", b)),
        }
    }
}

/// Length-prefixed UTF-8. Built from the value type so misconfiguration fails at setup.
#[derive(Debug, Clone)]
pub struct StringSerializer {
    value_type: TypeDescriptor,
}

impl StringSerializer {
    pub fn new(value_type: &TypeDescriptor) -> Result<Self> {
        if !value_type.is::<String>() {
            return Err(format!("StringSerializer only support String, not {}", value_type));
        }
        Ok(Self { value_type: value_type.clone() })
    }
}

impl Serializer for StringSerializer {
    fn write(&self, value: &dyn Any, out: &mut Vec<u8>) -> Result<()> {
        let s = downcast::<String>(value, self.value_type.name())?;
        write_sized(s.as_bytes(), u32::MAX as usize, out)
    }

    fn read(&self, input: &[u8]) -> Result<Box<dyn Any + Send>> {
        let bytes = read_sized(input, u32::MAX as usize)?;
        let s = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
        Ok(Box::new(s.to_string()))
    }
}

/// Length-prefixed bytes, bounded by the context's max buffer size.
#[derive(Debug, Clone)]
pub struct BytesSerializer {
    max_buffer_size: usize,
}

impl BytesSerializer {
    pub fn new(context: &dyn SerializationContext) -> Self {
        Self { max_buffer_size: context.settings().max_buffer_size }
    }
}

impl Serializer for BytesSerializer {
    fn write(&self, value: &dyn Any, out: &mut Vec<u8>) -> Result<()> {
        write_sized(downcast::<Vec<u8>>(value, "Vec<u8>")?, self.max_buffer_size, out)
    }

    fn read(&self, input: &[u8]) -> Result<Box<dyn Any + Send>> {
        Ok(Box::new(read_sized(input, self.max_buffer_size)?.to_vec()))
    }
}

/// Length-prefixed JSON text for `serde_json::Value`.
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    max_buffer_size: usize,
}

impl JsonSerializer {
    pub fn new(context: &dyn SerializationContext, value_type: &TypeDescriptor) -> Result<Self> {
        if !value_type.is::<serde_json::Value>() {
            return Err(format!("JsonSerializer only support json Value, not {}", value_type));
        }
        Ok(Self { max_buffer_size: context.settings().max_buffer_size })
    }
}

impl Serializer for JsonSerializer {
    fn write(&self, value: &dyn Any, out: &mut Vec<u8>) -> Result<()> {
        let json = downcast::<serde_json::Value>(value, "json")?;
        let bytes = serde_json::to_vec(json).map_err(|e| e.to_string())?;
        write_sized(&bytes, self.max_buffer_size, out)
    }

    fn read(&self, input: &[u8]) -> Result<Box<dyn Any + Send>> {
        let bytes = read_sized(input, self.max_buffer_size)?;
        let json: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        Ok(Box::new(json))
    }
}

macro_rules! init_serializer_classes {
    ($($name:literal => $class:expr),* $(,)?) => {
        {
            let mut catalog = SerializerCatalog::new();
            $(
                catalog.register_as($name, $class);
            )*
            catalog
        }
    };
}

pub fn builtin_serializer_catalog() -> SerializerCatalog {
    init_serializer_classes!(
        "int" => SerializerClass::new("IntSerializer").with_no_args(|| Ok(Box::new(IntSerializer))),
        "long" => SerializerClass::new("LongSerializer").with_no_args(|| Ok(Box::new(LongSerializer))),
        "bool" => SerializerClass::new("BoolSerializer").with_no_args(|| Ok(Box::new(BoolSerializer))),
        "string" => SerializerClass::new("StringSerializer")
            .with_type(|t| Ok(Box::new(StringSerializer::new(t)?))),
        "bytes" => SerializerClass::new("BytesSerializer")
            .with_context(|ctx| Ok(Box::new(BytesSerializer::new(ctx)))),
        "json" => SerializerClass::new("JsonSerializer")
            .with_context_and_type(|ctx, t| Ok(Box::new(JsonSerializer::new(ctx, t)?))),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use crate::registry::SerializerRegistry;
    use crate::serializer::ContextSettings;
    use super::*;

    fn roundtrip<T: Any + Send>(serializer: &dyn Serializer, value: T) -> T {
        let mut out = Vec::new();
        serializer.write(&value, &mut out).unwrap();
        *serializer.read(&out).unwrap().downcast::<T>().unwrap()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(roundtrip(&IntSerializer, -42i32), -42);
        assert_eq!(roundtrip(&LongSerializer, i64::MAX), i64::MAX);
        assert!(roundtrip(&BoolSerializer, true));
        assert_eq!(BoolSerializer.read(&[7]).unwrap_err(), "invalid bool byte 7");
        assert_eq!(IntSerializer.read(&[1, 2]).unwrap_err(), "need 4 bytes to read i32, got 2");
    }

    #[test]
    fn test_wrong_value_type() {
        let mut out = Vec::new();
        assert_eq!(IntSerializer.write(&1i64, &mut out).unwrap_err(), "expected i32 value");
        assert!(out.is_empty());
    }

    #[test]
    fn test_string_serializer() {
        let serializer = StringSerializer::new(&TypeDescriptor::of::<String>()).unwrap();
        assert_eq!(roundtrip(&serializer, "莫南".to_string()), "莫南");
        let err = StringSerializer::new(&TypeDescriptor::of::<i32>()).unwrap_err();
        assert_eq!(err, "StringSerializer only support String, not i32");
    }

    #[test]
    fn test_bytes_serializer_respects_context() {
        let ctx = SerializerRegistry::with_settings(ContextSettings { max_buffer_size: 4 });
        let serializer = BytesSerializer::new(&ctx);
        assert_eq!(roundtrip(&serializer, vec![1u8, 2, 3]), vec![1, 2, 3]);
        let mut out = Vec::new();
        let err = serializer.write(&vec![0u8; 5], &mut out).unwrap_err();
        assert_eq!(err, "value of 5 bytes exceeds max buffer size 4");
        assert!(serializer.read(&[3, 0, 0, 0, 1]).unwrap_err().starts_with("truncated input"));
    }

    #[test]
    fn test_json_serializer() {
        let ctx = SerializerRegistry::new();
        let serializer = JsonSerializer::new(&ctx, &TypeDescriptor::of::<serde_json::Value>()).unwrap();
        let value = json!({"id": 1, "name": "燕青丝", "tags": ["a", "b"]});
        assert_eq!(roundtrip(&serializer, value.clone()), value);
        assert!(JsonSerializer::new(&ctx, &TypeDescriptor::of::<String>()).is_err());
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = builtin_serializer_catalog();
        assert_eq!(catalog.names(), vec!["bool", "bytes", "int", "json", "long", "string"]);
        assert_eq!(catalog.lookup("json").unwrap().name(), "JsonSerializer");
    }
}
