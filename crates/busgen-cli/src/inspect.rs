//! `busgen inspect`: print the typed model of an introspection file.

use anyhow::{Context, Result};
use busgen_core::{ArgumentDef, Document, InterfaceDef};
use std::path::Path;

/// Run the inspect command.
pub fn run(input: &Path, json: bool) -> Result<()> {
    let doc = Document::from_file(input)
        .with_context(|| format!("Failed to read introspection file: {}", input.display()))?;

    let output = if json {
        serde_json::to_string_pretty(&doc.interfaces).context("Failed to serialize model")?
    } else {
        summary(&doc)
    };
    println!("{output}");

    Ok(())
}

/// Human-readable outline, one member per line.
pub fn summary(doc: &Document) -> String {
    let mut output = String::new();

    for iface in &doc.interfaces {
        output.push_str(&interface_summary(iface));
    }
    if output.is_empty() {
        output.push_str("no interfaces\n");
    }

    output
}

fn interface_summary(iface: &InterfaceDef) -> String {
    let mut output = format!("interface {}\n", iface.name);

    for method in &iface.methods {
        let args: Vec<String> = method
            .args
            .iter()
            .map(|arg| format!("{} {}", arg.direction, arg_summary(arg)))
            .collect();
        output.push_str(&format!("  method {}({})\n", method.name, args.join(", ")));
    }
    for signal in &iface.signals {
        let args: Vec<String> = signal.args.iter().map(arg_summary).collect();
        output.push_str(&format!("  signal {}({})\n", signal.name, args.join(", ")));
    }
    for property in &iface.properties {
        output.push_str(&format!(
            "  property {}: {} ({})\n",
            property.name, property.signature, property.access
        ));
    }

    output
}

fn arg_summary(arg: &ArgumentDef) -> String {
    if arg.is_anonymous() {
        arg.signature.clone()
    } else {
        format!("{} {}", arg.signature, arg.name)
    }
}
