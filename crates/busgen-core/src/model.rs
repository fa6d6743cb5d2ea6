//! Typed view over an introspection description.
//!
//! Everything the generators read lives here: one [`InterfaceDef`] per
//! `<interface>` element, holding its methods, signals and properties in the
//! order they were declared. The model is built once by
//! [`crate::document`] and is never mutated afterwards.
//!
//! Names are stored raw, exactly as they appear in the description. Use
//! [`crate::naming::legalize`] when a name has to become host identifier text;
//! the raw form is what goes on the wire.

use serde::Serialize;

/// A named contract grouping methods, signals and properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDef {
    /// Dotted interface name, e.g. `com.example.Greeter`.
    pub name: String,

    /// Methods in declaration order.
    pub methods: Vec<MethodDef>,

    /// Signals in declaration order.
    pub signals: Vec<SignalDef>,

    /// Properties in declaration order.
    pub properties: Vec<PropertyDef>,
}

/// A remotely invocable operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDef {
    pub name: String,
    pub args: Vec<ArgumentDef>,
}

/// A one-way event notification. Every argument is payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalDef {
    pub name: String,
    pub args: Vec<ArgumentDef>,
}

/// A single method or signal argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentDef {
    /// Raw argument name; empty when the argument is anonymous.
    pub name: String,

    /// Wire type signature, resolved only through a [`crate::TypeMapper`].
    #[serde(rename = "type")]
    pub signature: String,

    /// Direction of a method argument. Always [`Direction::Out`] for signals.
    pub direction: Direction,
}

/// Direction of a method argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// A named, typed remote attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDef {
    pub name: String,

    #[serde(rename = "type")]
    pub signature: String,

    pub access: Access,
}

/// Read/write capability of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Read,
    Write,
    ReadWrite,
    /// Unrecognized or missing access mode; no accessor is generated.
    Neither,
}

impl Access {
    /// Parse an `access` attribute value. Anything unrecognized is [`Access::Neither`].
    pub fn parse(value: &str) -> Self {
        match value {
            "read" => Access::Read,
            "write" => Access::Write,
            "readwrite" => Access::ReadWrite,
            _ => Access::Neither,
        }
    }

    pub fn readable(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    pub fn writable(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Access::Read => write!(f, "read"),
            Access::Write => write!(f, "write"),
            Access::ReadWrite => write!(f, "readwrite"),
            Access::Neither => write!(f, "neither"),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

impl ArgumentDef {
    /// Create a method argument.
    pub fn new(name: impl Into<String>, signature: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            direction,
        }
    }

    /// Create a signal payload argument.
    pub fn payload(name: impl Into<String>, signature: impl Into<String>) -> Self {
        Self::new(name, signature, Direction::Out)
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
}

impl InterfaceDef {
    /// Create an interface with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            signals: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_signal(mut self, signal: SignalDef) -> Self {
        self.signals.push(signal);
        self
    }

    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }
}

impl MethodDef {
    pub fn new(name: impl Into<String>, args: Vec<ArgumentDef>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl SignalDef {
    pub fn new(name: impl Into<String>, args: Vec<ArgumentDef>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, signature: impl Into<String>, access: Access) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            access,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use test_case::test_case;

    #[test_case("read", Access::Read, true, false)]
    #[test_case("write", Access::Write, false, true)]
    #[test_case("readwrite", Access::ReadWrite, true, true)]
    #[test_case("", Access::Neither, false, false)]
    #[test_case("READ", Access::Neither, false, false)]
    #[test_case("none", Access::Neither, false, false)]
    fn Access___parse___maps_capabilities(value: &str, expected: Access, read: bool, write: bool) {
        let access = Access::parse(value);

        assert_eq!(access, expected);
        assert_eq!(access.readable(), read);
        assert_eq!(access.writable(), write);
    }

    #[test_case(Access::ReadWrite, "readwrite")]
    #[test_case(Access::Neither, "neither")]
    fn Access___display___matches_attribute_spelling(access: Access, expected: &str) {
        assert_eq!(access.to_string(), expected);
    }

    #[test]
    fn ArgumentDef___payload___is_out_direction() {
        let arg = ArgumentDef::payload("who", "s");

        assert_eq!(arg.direction, Direction::Out);
        assert!(!arg.is_anonymous());
    }

    #[test]
    fn ArgumentDef___empty_name___is_anonymous() {
        assert!(ArgumentDef::new("", "i", Direction::In).is_anonymous());
    }

    #[test]
    fn InterfaceDef___builders___preserve_insertion_order() {
        let iface = InterfaceDef::new("a.B")
            .with_method(MethodDef::new("Z", vec![]))
            .with_method(MethodDef::new("A", vec![]))
            .with_property(PropertyDef::new("p2", "i", Access::Read))
            .with_property(PropertyDef::new("p1", "i", Access::Read));

        let methods: Vec<_> = iface.methods.iter().map(|m| m.name.as_str()).collect();
        let props: Vec<_> = iface.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(methods, ["Z", "A"]);
        assert_eq!(props, ["p2", "p1"]);
    }
}
