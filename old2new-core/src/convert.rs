//! Old-format to new-format document conversion.
//!
//! The converter walks `nodes` in order, strips the per-node `bmc_*` fields,
//! folds them into one record per BMC and links each node back to its BMC by
//! identifier. Group membership is normalised along the way.
//!
//! # Output contract
//! The result is always a mapping with exactly two keys, `bmcs` then `nodes`.
//! Any other top-level key of the input is dropped.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::bmc::{derive_bmc_xname, BmcFields, BmcRecord, BmcRegistry};
use crate::document::{BMC, BMCS, NODES, XNAME};
use crate::error::{Error, Result};
use crate::groups::normalize_groups;

/// Counts describing one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Entries in the input `nodes` sequence.
    pub nodes_seen: usize,
    pub nodes_converted: usize,
    /// Entries skipped because they were not mappings.
    pub entries_skipped: usize,
    pub bmcs: usize,
    /// Converted nodes that received a `bmc` reference.
    pub nodes_linked: usize,
}

/// Convert a parsed old-format document into the new format.
pub fn convert(doc: &Value) -> Result<Value> {
    convert_with_summary(doc).map(|(converted, _)| converted)
}

/// Like [`convert`], also returning what happened.
pub fn convert_with_summary(doc: &Value) -> Result<(Value, ConversionSummary)> {
    let top = doc.as_object().ok_or_else(|| {
        Error::Schema("Top-level document must be a mapping containing 'nodes'.".to_string())
    })?;
    let nodes = top
        .get(NODES)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Schema("Input must contain a top-level 'nodes' array.".to_string()))?;

    let mut summary = ConversionSummary {
        nodes_seen: nodes.len(),
        ..Default::default()
    };
    let mut registry = BmcRegistry::new();
    let mut converted_nodes = Vec::with_capacity(nodes.len());

    for (index, raw_node) in nodes.iter().enumerate() {
        let Some(node) = raw_node.as_object() else {
            debug!(index, "Skipping non-mapping entry in nodes");
            summary.entries_skipped += 1;
            continue;
        };

        let node = convert_node(node.clone(), &mut registry);
        if node.contains_key(BMC) {
            summary.nodes_linked += 1;
        }
        converted_nodes.push(Value::Object(node));
    }

    summary.nodes_converted = converted_nodes.len();
    if registry.is_empty() {
        debug!("No node carried BMC information");
    }
    summary.bmcs = registry.len();

    let bmcs: Vec<Value> = registry
        .into_sorted()
        .iter()
        .map(BmcRecord::to_value)
        .collect();

    let mut out = Map::new();
    out.insert(BMCS.to_string(), Value::Array(bmcs));
    out.insert(NODES.to_string(), Value::Array(converted_nodes));

    info!(
        nodes_seen = summary.nodes_seen,
        nodes_converted = summary.nodes_converted,
        entries_skipped = summary.entries_skipped,
        bmcs = summary.bmcs,
        nodes_linked = summary.nodes_linked,
        "Conversion complete"
    );
    Ok((Value::Object(out), summary))
}

/// Rewrite one node (already a shallow copy) and record its BMC in `registry`.
fn convert_node(mut node: Map<String, Value>, registry: &mut BmcRegistry) -> Map<String, Value> {
    let bmc = BmcFields::extract(&mut node);
    normalize_groups(&mut node);

    let identifier = derive_bmc_xname(node.get(XNAME), &bmc);
    if bmc.has_any() || identifier.is_some() {
        let key = bmc.key(identifier.as_deref());
        debug!(?key, "Merging BMC observation");
        registry.merge(key, bmc.observed(identifier.as_deref()));

        if let Some(id) = identifier {
            node.insert(BMC.to_string(), Value::String(id));
        }
    }
    node
}
