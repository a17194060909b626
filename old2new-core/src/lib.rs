#![doc = "old2new-core: conversion logic for node inventory documents."]

//! This crate holds everything needed to migrate an inventory from the old
//! discovery format (flat `bmc_*` fields on every node, singular `group`) to the
//! new one (a top-level `bmcs` list referenced from nodes, `groups` as a list).
//!
//! The pipeline is strictly Reader -> Converter -> Writer:
//! - [`reader::read_document`] decodes text into a [`serde_json::Value`] tree,
//!   detecting JSON or YAML.
//! - [`convert::convert`] rewrites the tree.
//! - [`writer::write_document`] renders the result back to text.
//!
//! YAML support is a capability behind the [`contract::YamlCodec`] trait; the
//! converter itself never touches YAML.

pub mod bmc;
pub mod contract;
pub mod convert;
pub mod document;
pub mod error;
pub mod format;
pub mod groups;
pub mod reader;
pub mod writer;
#[cfg(feature = "yaml")]
pub mod yaml;

pub use contract::YamlCodec;
pub use convert::{convert, convert_with_summary, ConversionSummary};
pub use error::{Error, Result};
pub use format::{Format, InputFormat, OutputFormat};
pub use reader::{read_document, read_from};
pub use writer::{write_document, write_to};

/// Returns the YAML codec compiled into this build.
#[cfg(feature = "yaml")]
pub fn default_yaml_codec() -> Option<Box<dyn YamlCodec>> {
    Some(Box::new(yaml::SerdeYamlCodec))
}

/// Built without the `yaml` feature: no YAML capability.
#[cfg(not(feature = "yaml"))]
pub fn default_yaml_codec() -> Option<Box<dyn YamlCodec>> {
    None
}
