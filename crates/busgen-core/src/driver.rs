//! Document driver: one artifact per invocation.
//!
//! Wraps the per-interface classes from [`crate::proxy`] and
//! [`crate::adaptor`] in the banner, include guard, foundational includes and
//! namespace scopes. The whole artifact is rendered in memory and written once
//! with [`write_output`].

use crate::adaptor::{ADAPTOR_SUFFIX, generate_adaptor_class};
use crate::config::GeneratorConfig;
use crate::document::Document;
use crate::emit::{CodeWriter, close_scopes, open_scopes};
use crate::error::{GenError, GenResult};
use crate::naming::{legalize, resolve};
use crate::proxy::{PROXY_SUFFIX, generate_proxy_class};
use crate::type_map::TypeMapper;
use std::path::Path;
use tracing::{info, warn};

/// Immutable collaborators shared by every generator in one pass.
#[derive(Clone, Copy)]
pub struct GenContext<'a> {
    pub config: &'a GeneratorConfig,
    pub types: &'a dyn TypeMapper,
}

impl<'a> GenContext<'a> {
    pub fn new(config: &'a GeneratorConfig, types: &'a dyn TypeMapper) -> Self {
        Self { config, types }
    }
}

/// Calling conventions of the generated proxy invocation stubs.
///
/// At least one convention is always on; build values through the constants
/// or [`ProxyModes::from_flags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyModes {
    sync: bool,
    asynchronous: bool,
}

impl ProxyModes {
    /// Blocking stubs only.
    pub const SYNC: Self = Self {
        sync: true,
        asynchronous: false,
    };

    /// Non-blocking stubs only.
    pub const ASYNC: Self = Self {
        sync: false,
        asynchronous: true,
    };

    pub const BOTH: Self = Self {
        sync: true,
        asynchronous: true,
    };

    /// Modes from command-line style flags; neither flag means sync.
    pub fn from_flags(sync: bool, asynchronous: bool) -> Self {
        if !sync && !asynchronous {
            Self::SYNC
        } else {
            Self { sync, asynchronous }
        }
    }

    /// Whether blocking stubs are emitted.
    pub fn sync(self) -> bool {
        self.sync
    }

    /// Whether non-blocking stubs and their reply handlers are emitted.
    pub fn asynchronous(self) -> bool {
        self.asynchronous
    }
}

impl Default for ProxyModes {
    fn default() -> Self {
        Self::SYNC
    }
}

/// Which side of the interface an artifact is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Proxy(ProxyModes),
    Adaptor,
}

impl Role {
    fn class_suffix(self) -> &'static str {
        match self {
            Role::Proxy(_) => PROXY_SUFFIX,
            Role::Adaptor => ADAPTOR_SUFFIX,
        }
    }

    fn guard_suffix(self) -> &'static str {
        match self {
            Role::Proxy(_) => "__PROXY_MARSHAL_H",
            Role::Adaptor => "__ADAPTOR_MARSHAL_H",
        }
    }
}

/// Include guard macro for an artifact written to `output_name`.
///
/// ```
/// use busgen_core::config::GeneratorConfig;
/// use busgen_core::driver::{Role, include_guard};
///
/// let config = GeneratorConfig::default();
/// assert_eq!(
///     include_guard(&config, Role::Adaptor, "greeter-glue.h"),
///     "__dbusxx__greeter_glue_h__ADAPTOR_MARSHAL_H"
/// );
/// ```
pub fn include_guard(config: &GeneratorConfig, role: Role, output_name: &str) -> String {
    format!(
        "{}{}{}",
        config.guard_prefix,
        legalize(output_name),
        role.guard_suffix()
    )
}

/// Render the complete artifact for `doc`.
///
/// `output_name` only feeds the include guard; nothing is written here.
pub fn generate(
    doc: &Document,
    role: Role,
    output_name: &str,
    ctx: &GenContext<'_>,
) -> GenResult<String> {
    let config = ctx.config;
    let guard = include_guard(config, role, output_name);
    let mut w = CodeWriter::new(config);

    w.blank();
    w.line(0, "/*");
    w.line(0, format!(" *\t{}", config.banner));
    w.line(0, " */");
    w.blank();
    w.line(0, format!("#ifndef {guard}"));
    w.line(0, format!("#define {guard}"));
    w.blank();
    for include in &config.includes {
        w.line(0, include);
    }
    w.blank();

    for iface in &doc.interfaces {
        if config.is_skipped(&iface.name) {
            warn!(interface = %iface.name, "skipping interface");
            continue;
        }

        let path = resolve(&iface.name);
        let scopes: Vec<String> = path.scopes.iter().map(|s| legalize(s)).collect();
        let class = format!("{}{}", legalize(&path.base_name), role.class_suffix());

        info!(interface = %iface.name, class = %class, "generating code for interface");

        open_scopes(&mut w, &scopes);
        let body = match role {
            Role::Proxy(modes) => generate_proxy_class(iface, &class, modes, ctx)?,
            Role::Adaptor => generate_adaptor_class(iface, &class, ctx)?,
        };
        w.fragment(&body);
        close_scopes(&mut w, scopes.len());
    }

    w.line(0, format!("#endif //{guard}"));

    Ok(w.finish())
}

/// Write a rendered artifact to `path` in one go.
pub fn write_output(path: impl AsRef<Path>, text: &str) -> GenResult<()> {
    let path = path.as_ref();
    std::fs::write(path, text).map_err(|source| GenError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

/// Render one artifact and write it to `output`.
pub fn generate_file(
    doc: &Document,
    role: Role,
    output: impl AsRef<Path>,
    ctx: &GenContext<'_>,
) -> GenResult<()> {
    let output = output.as_ref();
    let text = generate(doc, role, &output.to_string_lossy(), ctx)?;
    write_output(output, &text)
}

#[cfg(test)]
#[path = "driver/driver_tests.rs"]
mod driver_tests;
