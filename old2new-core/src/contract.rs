//! # contract: the YAML capability seam
//!
//! JSON support is always present (it is the tree type itself). YAML is an
//! optional capability: the reader and the writer receive it as an
//! `Option<&dyn YamlCodec>` and report [`crate::Error::Capability`] when it is
//! unset, instead of falling back to JSON.
//!
//! ## Implementations
//! - [`crate::yaml::SerdeYamlCodec`], compiled in with the `yaml` feature.
//! - `MockYamlCodec`, generated by `mockall` for tests (exported with the
//!   `test-export-mocks` feature so integration tests can use it too).

use serde_json::Value;

/// Error type returned by codecs. Mapped to parse or serialize errors by the caller.
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

/// A parse/render pair for YAML documents.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
pub trait YamlCodec {
    /// Decode a whole YAML document into the generic tree.
    fn parse(&self, raw: &str) -> Result<Value, CodecError>;

    /// Render the tree as block-style YAML, keeping mapping key order.
    fn render(&self, doc: &Value) -> Result<String, CodecError>;
}
