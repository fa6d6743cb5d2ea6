//! `busgen generate`: render proxy and adaptor headers.

use anyhow::{Context, Result};
use busgen_core::{
    DbusCppTypes, Document, GenContext, GeneratorConfig, ProxyModes, Role, generate, write_output,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything one `generate` invocation needs.
#[derive(Debug, Clone)]
pub struct Request {
    pub input: PathBuf,
    pub proxy: Option<PathBuf>,
    pub adaptor: Option<PathBuf>,
    pub modes: ProxyModes,
    pub config: Option<PathBuf>,
}

impl Request {
    /// Artifacts to produce, proxy first.
    fn artifacts(&self) -> Vec<(Role, &Path)> {
        let mut artifacts = Vec::new();
        if let Some(path) = &self.proxy {
            artifacts.push((Role::Proxy(self.modes), path.as_path()));
        }
        if let Some(path) = &self.adaptor {
            artifacts.push((Role::Adaptor, path.as_path()));
        }
        artifacts
    }
}

/// Load the generator configuration, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

/// Run the generate command.
///
/// Every artifact is rendered before any file is written, so a bad
/// description never leaves a half-updated set of headers behind.
pub fn run(request: &Request) -> Result<()> {
    let artifacts = request.artifacts();
    if artifacts.is_empty() {
        anyhow::bail!("Nothing to generate: pass --proxy <FILE> and/or --adaptor <FILE>");
    }

    let config = load_config(request.config.as_deref())?;
    let doc = Document::from_file(&request.input).with_context(|| {
        format!(
            "Failed to read introspection file: {}",
            request.input.display()
        )
    })?;
    debug!(interfaces = doc.interfaces.len(), "parsed introspection file");

    let ctx = GenContext::new(&config, &DbusCppTypes);

    let mut rendered = Vec::with_capacity(artifacts.len());
    for (role, path) in artifacts {
        let text = generate(&doc, role, &path.to_string_lossy(), &ctx)
            .with_context(|| format!("Failed to generate {}", path.display()))?;
        rendered.push((path, text));
    }

    for (path, text) in rendered {
        write_output(path, &text)?;
        println!("Generated: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
#[path = "generate/generate_tests.rs"]
mod generate_tests;
