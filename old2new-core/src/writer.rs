//! Output side of the pipeline: tree in, text out.

use std::io::Write;

use serde_json::Value;
use tracing::debug;

use crate::contract::YamlCodec;
use crate::error::{Error, Result};
use crate::format::Format;

/// Render the document as text in `format`.
///
/// JSON uses two-space indentation, keeps key order, leaves non-ASCII
/// characters unescaped and ends with a newline. YAML is delegated to the
/// codec; without one this is [`Error::Capability`].
pub fn write_document(
    doc: &Value,
    format: Format,
    yaml: Option<&dyn YamlCodec>,
) -> Result<String> {
    let rendered = match format {
        Format::Json => {
            let mut text = serde_json::to_string_pretty(doc).map_err(|e| Error::Serialize {
                format,
                message: e.to_string(),
            })?;
            text.push('\n');
            text
        }
        Format::Yaml => {
            let codec = yaml.ok_or_else(|| {
                Error::Capability(
                    "YAML output requested but YAML support is not available.".to_string(),
                )
            })?;
            codec.render(doc).map_err(|e| Error::Serialize {
                format,
                message: e.to_string(),
            })?
        }
    };
    debug!(%format, bytes = rendered.len(), "Rendered output");
    Ok(rendered)
}

/// Render the document and write it out in one go, so nothing is written on failure.
pub fn write_to<W: Write>(
    mut output: W,
    doc: &Value,
    format: Format,
    yaml: Option<&dyn YamlCodec>,
) -> Result<()> {
    let rendered = write_document(doc, format, yaml)?;
    output.write_all(rendered.as_bytes())?;
    output.flush()?;
    Ok(())
}
