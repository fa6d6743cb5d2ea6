//! Generator configuration

use crate::error::GenResult;
use serde::Deserialize;
use std::path::Path;

/// Interface name of the standard introspection meta-interface
pub const INTROSPECTABLE_INTERFACE: &str = "org.freedesktop.DBus.Introspectable";

/// Interface name of the standard properties meta-interface
pub const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";

/// Settings shared by every generation pass.
///
/// Loaded once and passed by reference into the generators; nothing in the
/// crate mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Text placed inside the comment banner at the top of every artifact
    pub banner: String,

    /// Foundational include lines, written verbatim after the include guard
    pub includes: Vec<String>,

    /// One level of indentation
    pub indent: String,

    /// Prefix of the include guard macro
    pub guard_prefix: String,

    /// Interfaces that never produce a class
    pub skip_interfaces: Vec<String>,

    /// Interface the proxy property accessors send `Get`/`Set` to
    pub properties_interface: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            banner: "This file was automatically generated by busgen; DO NOT EDIT!".to_string(),
            includes: vec![
                "#include <dbus-c++/dbus.h>".to_string(),
                "#include <cassert>".to_string(),
            ],
            indent: "\t".to_string(),
            guard_prefix: "__dbusxx__".to_string(),
            skip_interfaces: vec![
                INTROSPECTABLE_INTERFACE.to_string(),
                PROPERTIES_INTERFACE.to_string(),
            ],
            properties_interface: PROPERTIES_INTERFACE.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parse configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> GenResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> GenResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Whether `interface` is one of the skipped meta-interfaces
    pub fn is_skipped(&self, interface: &str) -> bool {
        self.skip_interfaces.iter().any(|s| s == interface)
    }

    /// Indentation for nesting `depth`
    pub fn indent(&self, depth: usize) -> String {
        self.indent.repeat(depth)
    }
}
