//! YAML support backed by `serde_yaml`.

use serde_json::Value;
use serde_yaml::{Mapping, Number};

use crate::contract::{CodecError, YamlCodec};

/// The YAML codec shipped with the `yaml` feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeYamlCodec;

impl YamlCodec for SerdeYamlCodec {
    fn parse(&self, raw: &str) -> Result<Value, CodecError> {
        // An empty stream is a null document.
        if raw.trim().is_empty() {
            return Ok(Value::Null);
        }
        let mut doc: serde_yaml::Value = serde_yaml::from_str(raw)?;
        // `<<: *anchor` entries are folded into their mapping.
        doc.apply_merge()?;
        Ok(serde_json::to_value(doc)?)
    }

    fn render(&self, doc: &Value) -> Result<String, CodecError> {
        Ok(serde_yaml::to_string(&to_yaml(doc))?)
    }
}

/// Rebuild the tree as a YAML value. Numbers go through their native
/// width rather than serde_json's exact-text representation.
fn to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Number(n) => {
            let number = if let Some(u) = n.as_u64() {
                Number::from(u)
            } else if let Some(i) = n.as_i64() {
                Number::from(i)
            } else {
                // Wider than 64 bits: YAML numbers here are at most f64.
                Number::from(n.as_f64().unwrap_or(f64::NAN))
            };
            serde_yaml::Value::Number(number)
        }
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Array(items) => serde_yaml::Value::Sequence(items.iter().map(to_yaml).collect()),
        Value::Object(map) => {
            let mut out = Mapping::new();
            for (key, v) in map {
                out.insert(serde_yaml::Value::String(key.clone()), to_yaml(v));
            }
            serde_yaml::Value::Mapping(out)
        }
    }
}
