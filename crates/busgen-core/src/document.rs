//! Introspection XML to typed model.
//!
//! This is the only place that looks at the raw XML tree. Everything
//! downstream works on [`InterfaceDef`] and friends.
//!
//! # Accepted input
//!
//! ```xml
//! <node>
//!   <interface name="com.example.Greeter">
//!     <method name="Greet">
//!       <arg name="name" type="s" direction="in"/>
//!       <arg name="greeting" type="s" direction="out"/>
//!     </method>
//!     <signal name="Greeted">
//!       <arg name="who" type="s"/>
//!     </signal>
//!     <property name="Count" type="u" access="readwrite"/>
//!   </interface>
//! </node>
//! ```
//!
//! Only direct `<interface>` children of the root element are read.
//! `<annotation>`, `<doc>` and unknown elements are ignored. Missing
//! attributes are read as empty strings; a method argument without a
//! `direction` is an in-argument.

use crate::error::{GenError, GenResult};
use crate::model::{
    Access, ArgumentDef, Direction, InterfaceDef, MethodDef, PropertyDef, SignalDef,
};
use roxmltree::{Node, ParsingOptions};
use std::path::Path;

/// A parsed introspection description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Interfaces in document order.
    pub interfaces: Vec<InterfaceDef>,
}

impl Document {
    /// Parse an introspection description from a file.
    pub fn from_file(path: impl AsRef<Path>) -> GenResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse an introspection description from XML text.
    pub fn parse(xml: &str) -> GenResult<Self> {
        // Introspection data commonly carries the freedesktop DOCTYPE.
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let tree = roxmltree::Document::parse_with_options(xml, options)?;

        let interfaces = elements(tree.root_element(), "interface")
            .map(interface_from_node)
            .collect::<GenResult<Vec<_>>>()?;

        Ok(Self { interfaces })
    }

    pub fn from_interfaces(interfaces: Vec<InterfaceDef>) -> Self {
        Self { interfaces }
    }
}

/// Direct element children with the given tag, in document order.
fn elements<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.has_tag_name(tag))
}

fn attr(node: Node<'_, '_>, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

fn interface_from_node(node: Node<'_, '_>) -> GenResult<InterfaceDef> {
    let methods = elements(node, "method")
        .map(method_from_node)
        .collect::<GenResult<Vec<_>>>()?;

    let signals = elements(node, "signal").map(signal_from_node).collect();

    let properties = elements(node, "property")
        .map(|p| {
            let access = Access::parse(p.attribute("access").unwrap_or_default());
            PropertyDef::new(attr(p, "name"), attr(p, "type"), access)
        })
        .collect();

    Ok(InterfaceDef {
        name: attr(node, "name"),
        methods,
        signals,
        properties,
    })
}

fn method_from_node(node: Node<'_, '_>) -> GenResult<MethodDef> {
    let name = attr(node, "name");

    let args = elements(node, "arg")
        .map(|arg| {
            let direction = match arg.attribute("direction") {
                None | Some("in") => Direction::In,
                Some("out") => Direction::Out,
                Some(other) => {
                    return Err(GenError::InvalidDirection {
                        member: name.clone(),
                        arg: attr(arg, "name"),
                        value: other.to_string(),
                    });
                }
            };
            Ok(ArgumentDef::new(attr(arg, "name"), attr(arg, "type"), direction))
        })
        .collect::<GenResult<Vec<_>>>()?;

    Ok(MethodDef::new(name, args))
}

fn signal_from_node(node: Node<'_, '_>) -> SignalDef {
    let args = elements(node, "arg")
        .map(|arg| ArgumentDef::payload(attr(arg, "name"), attr(arg, "type")))
        .collect();

    SignalDef::new(attr(node, "name"), args)
}
