//! BMC extraction, identifier derivation and first-writer-wins aggregation.
//!
//! Old-format nodes each carry their own copy of the BMC contact fields. This
//! module pulls those fields off a node ([`BmcFields::extract`]), works out
//! which BMC the node belongs to ([`derive_bmc_xname`]), and folds the
//! observations into a [`BmcRegistry`] so that every physical BMC is emitted
//! exactly once.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::document::{
    is_truthy, to_text, truthy_text, BMC_FQDN, BMC_IP, BMC_MAC, BMC_XNAME,
};

/// Trailing node index of a location identifier: `x1000c0s0b0n0` -> `n0`.
static NODE_INDEX_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"n\d+.*$").expect("node index pattern is valid"));

/// The four `bmc_*` fields removed from a node. Absent fields are null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BmcFields {
    pub mac: Value,
    pub ip: Value,
    pub fqdn: Value,
    pub xname: Value,
}

impl BmcFields {
    /// Remove the BMC fields from a node, keeping the order of the remaining keys.
    pub fn extract(node: &mut Map<String, Value>) -> Self {
        let mut take = |key: &str| node.shift_remove(key).unwrap_or(Value::Null);
        BmcFields {
            mac: take(BMC_MAC),
            ip: take(BMC_IP),
            fqdn: take(BMC_FQDN),
            xname: take(BMC_XNAME),
        }
    }

    pub fn has_any(&self) -> bool {
        [&self.mac, &self.ip, &self.fqdn, &self.xname]
            .into_iter()
            .any(is_truthy)
    }

    /// Aggregation key: the identifier when there is one, the raw contact triplet otherwise.
    pub fn key(&self, identifier: Option<&str>) -> BmcKey {
        match identifier {
            Some(id) => BmcKey::Xname(id.to_string()),
            None => BmcKey::Triplet {
                mac: raw_component(&self.mac),
                ip: raw_component(&self.ip),
                fqdn: raw_component(&self.fqdn),
            },
        }
    }

    /// What this node tells us about its BMC; only fields with information are set.
    pub fn observed(&self, identifier: Option<&str>) -> BmcRecord {
        let known = |v: &Value| is_truthy(v).then(|| v.clone());
        BmcRecord {
            xname: identifier.map(str::to_string),
            mac: known(&self.mac),
            ip: known(&self.ip),
            fqdn: known(&self.fqdn),
        }
    }
}

fn raw_component(value: &Value) -> Option<String> {
    (!value.is_null()).then(|| value.to_string())
}

/// Work out which BMC a node hangs off. First non-empty candidate wins:
///
/// 1. the explicit `bmc_xname`;
/// 2. the node's own `xname` with its node index suffix trimmed
///    (`x1000c0s0b0n0` -> `x1000c0s0b0`), or unchanged when it has none;
/// 3. the host label of `bmc_fqdn` (`bmc07.cluster.example` -> `bmc07`).
pub fn derive_bmc_xname(node_xname: Option<&Value>, bmc: &BmcFields) -> Option<String> {
    if let Some(explicit) = truthy_text(&bmc.xname) {
        return Some(explicit);
    }

    let from_node = node_xname
        .and_then(truthy_text)
        .map(|xname| trim_node_index(&xname))
        .filter(|trimmed| !trimmed.is_empty());
    if from_node.is_some() {
        return from_node;
    }

    truthy_text(&bmc.fqdn)
        .and_then(|fqdn| fqdn.split('.').next().map(str::to_string))
        .filter(|label| !label.is_empty())
}

/// Drop the node index suffix. A single trailing newline is kept and does not
/// stop the suffix from matching at the end.
fn trim_node_index(xname: &str) -> String {
    let (body, newline) = match xname.strip_suffix('\n') {
        Some(body) => (body, "\n"),
        None => (xname, ""),
    };
    let mut trimmed = NODE_INDEX_SUFFIX.replace(body, "").into_owned();
    trimmed.push_str(newline);
    trimmed
}

/// Identity of a BMC across nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BmcKey {
    Xname(String),
    /// Raw `(mac, ip, fqdn)` values, used only when no identifier could be derived.
    Triplet {
        mac: Option<String>,
        ip: Option<String>,
        fqdn: Option<String>,
    },
}

/// Everything known about one BMC.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BmcRecord {
    pub xname: Option<String>,
    pub mac: Option<Value>,
    pub ip: Option<Value>,
    pub fqdn: Option<Value>,
}

impl BmcRecord {
    /// Fill every field that is still unknown from `observed`. Known fields never change.
    pub fn merge(&mut self, observed: BmcRecord) {
        fill(&mut self.xname, observed.xname);
        fill(&mut self.mac, observed.mac);
        fill(&mut self.ip, observed.ip);
        fill(&mut self.fqdn, observed.fqdn);
    }

    /// Output mapping with only known keys, in `xname`, `mac`, `ip`, `fqdn` order.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        if let Some(xname) = &self.xname {
            out.insert("xname".to_string(), Value::String(xname.clone()));
        }
        for (key, value) in [("mac", &self.mac), ("ip", &self.ip), ("fqdn", &self.fqdn)] {
            if let Some(v) = value {
                out.insert(key.to_string(), v.clone());
            }
        }
        Value::Object(out)
    }

    fn sort_key(&self) -> SortKey<'_> {
        match &self.xname {
            Some(xname) => SortKey::Named(xname),
            None => {
                let text = |v: &Option<Value>| v.as_ref().map(to_text).unwrap_or_default();
                SortKey::Unnamed(text(&self.ip), text(&self.mac), text(&self.fqdn))
            }
        }
    }
}

fn fill<T>(slot: &mut Option<T>, candidate: Option<T>) {
    if slot.is_none() {
        *slot = candidate;
    }
}

/// Named records sort before unnamed ones.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey<'a> {
    Named(&'a str),
    Unnamed(String, String, String),
}

/// Accumulator of BMC records keyed by [`BmcKey`], remembering first-seen order.
#[derive(Debug, Default)]
pub struct BmcRegistry {
    order: Vec<BmcKey>,
    records: HashMap<BmcKey, BmcRecord>,
}

impl BmcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one node's observation into the record stored under `key`.
    pub fn merge(&mut self, key: BmcKey, observed: BmcRecord) {
        match self.records.get_mut(&key) {
            Some(record) => record.merge(observed),
            None => {
                self.order.push(key.clone());
                self.records.insert(key, observed);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records ordered for output: by identifier, then by `(ip, mac, fqdn)`.
    /// Ties keep first-seen order.
    pub fn into_sorted(mut self) -> Vec<BmcRecord> {
        let mut records: Vec<BmcRecord> = self
            .order
            .iter()
            .filter_map(|key| self.records.remove(key))
            .collect();
        records.sort_by(compare);
        records
    }
}

fn compare(a: &BmcRecord, b: &BmcRecord) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}
