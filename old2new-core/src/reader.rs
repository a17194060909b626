//! Input side of the pipeline: text in, generic tree out.

use std::io::Read;

use serde_json::Value;
use tracing::{debug, info};

use crate::contract::YamlCodec;
use crate::error::{Error, Result};
use crate::format::{Format, InputFormat};

/// Read a whole stream and decode it. See [`read_document`].
pub fn read_from<R: Read>(
    mut input: R,
    hint: InputFormat,
    yaml: Option<&dyn YamlCodec>,
) -> Result<(Format, Value)> {
    let mut raw = String::new();
    input.read_to_string(&mut raw)?;
    debug!(bytes = raw.len(), "Read input");
    read_document(&raw, hint, yaml)
}

/// Decode `raw` according to `hint`, returning the format that was actually used.
///
/// `Auto` tries JSON first and falls back to YAML on any JSON failure. Forced
/// formats never fall back. A missing YAML codec is reported as
/// [`Error::Capability`] before any YAML parsing is attempted.
pub fn read_document(
    raw: &str,
    hint: InputFormat,
    yaml: Option<&dyn YamlCodec>,
) -> Result<(Format, Value)> {
    let detected = match hint {
        InputFormat::Json => (Format::Json, parse_json(raw)?),
        InputFormat::Yaml => {
            let codec = yaml.ok_or_else(|| {
                Error::Capability(
                    "YAML parsing requested but YAML support is not available.".to_string(),
                )
            })?;
            (Format::Yaml, parse_yaml(codec, raw)?)
        }
        InputFormat::Auto => match parse_json(raw) {
            Ok(doc) => (Format::Json, doc),
            Err(json_err) => {
                debug!(error = %json_err, "Input is not JSON, trying YAML");
                let codec = yaml.ok_or_else(|| {
                    Error::Capability(
                        "Input does not appear to be JSON and YAML support is not available."
                            .to_string(),
                    )
                })?;
                (Format::Yaml, parse_yaml(codec, raw)?)
            }
        },
    };
    info!(format = %detected.0, ?hint, "Input decoded");
    Ok(detected)
}

fn parse_json(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| Error::Parse {
        format: Format::Json,
        message: e.to_string(),
    })
}

fn parse_yaml(codec: &dyn YamlCodec, raw: &str) -> Result<Value> {
    codec.parse(raw).map_err(|e| Error::Parse {
        format: Format::Yaml,
        message: e.to_string(),
    })
}
