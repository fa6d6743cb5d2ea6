//! busgen-core - Proxy and adaptor generation from D-Bus introspection data
//!
//! This crate turns an introspection description into C++ source for the
//! dbus-c++ runtime:
//! - [`Document`] parses the XML once into the typed model in [`model`]
//! - [`generate`] renders one artifact, either client-side proxies
//!   ([`Role::Proxy`]) or server-side adaptors ([`Role::Adaptor`])
//! - [`GeneratorConfig`] carries the banner, includes and other fixed text
//! - [`TypeMapper`] resolves wire signatures to host types
//!
//! ```
//! use busgen_core::{DbusCppTypes, Document, GenContext, GeneratorConfig, ProxyModes, Role, generate};
//!
//! let doc = Document::parse(r#"<node><interface name="com.example.Ping"/></node>"#).unwrap();
//! let config = GeneratorConfig::default();
//! let ctx = GenContext::new(&config, &DbusCppTypes);
//!
//! let header = generate(&doc, Role::Proxy(ProxyModes::SYNC), "ping.h", &ctx).unwrap();
//! assert!(header.contains("class Ping_proxy"));
//! ```

pub mod adaptor;
pub mod classify;
pub mod config;
pub mod document;
pub mod driver;
mod emit;
pub mod error;
pub mod model;
pub mod naming;
pub mod proxy;
pub mod signature;
pub mod type_map;

pub use config::GeneratorConfig;
pub use document::Document;
pub use driver::{GenContext, ProxyModes, Role, generate, generate_file, write_output};
pub use error::{GenError, GenResult};
pub use model::{Access, ArgumentDef, Direction, InterfaceDef, MethodDef, PropertyDef, SignalDef};
pub use type_map::{DbusCppTypes, TypeMapper};
