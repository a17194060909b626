//! Helpers over the generic document tree.

use serde_json::Value;

pub const NODES: &str = "nodes";
pub const BMCS: &str = "bmcs";

pub const XNAME: &str = "xname";
pub const GROUP: &str = "group";
pub const GROUPS: &str = "groups";
pub const BMC: &str = "bmc";

pub const BMC_MAC: &str = "bmc_mac";
pub const BMC_IP: &str = "bmc_ip";
pub const BMC_FQDN: &str = "bmc_fqdn";
pub const BMC_XNAME: &str = "bmc_xname";

/// Whether a value carries information: null, `false`, zero, `""`, `[]` and `{}` do not.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Text form of a value: strings verbatim, everything else as compact JSON.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text form of a value that carries information, `None` otherwise.
pub fn truthy_text(value: &Value) -> Option<String> {
    is_truthy(value).then(|| to_text(value))
}
