//! Wire signature to host type mapping.
//!
//! # Type Mappings
//!
//! | Signature | Host type | Primitive |
//! |-----------|-----------|-----------|
//! | `y` `b` `n` `q` | `uint8_t` `bool` `int16_t` `uint16_t` | yes |
//! | `i` `u` `x` `t` `d` | `int32_t` `uint32_t` `int64_t` `uint64_t` `double` | yes |
//! | `s` `o` `g` `v` | `std::string` `::DBus::Path` `::DBus::Signature` `::DBus::Variant` | no |
//! | `aT` | `std::vector< T >` | no |
//! | `a{KV}` | `std::map< K, V >` | no |
//! | `(T…)` | `::DBus::Struct< T, … >` | no |
//! | `a(T…)` | `std::vector< ::DBus::Struct< T, … > >` | no |

use crate::error::{GenError, GenResult};

/// Resolves wire type signatures to host type names.
pub trait TypeMapper {
    /// Host type spelled for `signature`.
    fn host_type(&self, signature: &str) -> GenResult<String>;

    /// Whether `signature` maps to a primitive (copyable scalar) host type.
    fn is_primitive(&self, signature: &str) -> bool;
}

/// Type mapping for one basic type code
struct TypeMapping {
    code: char,
    host_type: &'static str,
    primitive: bool,
}

const TYPE_MAPPINGS: &[TypeMapping] = &[
    TypeMapping {
        code: 'y',
        host_type: "uint8_t",
        primitive: true,
    },
    TypeMapping {
        code: 'b',
        host_type: "bool",
        primitive: true,
    },
    TypeMapping {
        code: 'n',
        host_type: "int16_t",
        primitive: true,
    },
    TypeMapping {
        code: 'q',
        host_type: "uint16_t",
        primitive: true,
    },
    TypeMapping {
        code: 'i',
        host_type: "int32_t",
        primitive: true,
    },
    TypeMapping {
        code: 'u',
        host_type: "uint32_t",
        primitive: true,
    },
    TypeMapping {
        code: 'x',
        host_type: "int64_t",
        primitive: true,
    },
    TypeMapping {
        code: 't',
        host_type: "uint64_t",
        primitive: true,
    },
    TypeMapping {
        code: 'd',
        host_type: "double",
        primitive: true,
    },
    TypeMapping {
        code: 's',
        host_type: "std::string",
        primitive: false,
    },
    TypeMapping {
        code: 'o',
        host_type: "::DBus::Path",
        primitive: false,
    },
    TypeMapping {
        code: 'g',
        host_type: "::DBus::Signature",
        primitive: false,
    },
    TypeMapping {
        code: 'v',
        host_type: "::DBus::Variant",
        primitive: false,
    },
];

fn basic_type(code: char) -> Option<&'static TypeMapping> {
    TYPE_MAPPINGS.iter().find(|m| m.code == code)
}

/// Host types of the dbus-c++ runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct DbusCppTypes;

impl TypeMapper for DbusCppTypes {
    fn host_type(&self, signature: &str) -> GenResult<String> {
        if signature.is_empty() {
            return Ok(String::new());
        }

        let mut parser = SignatureParser::new(signature);
        let mut types = Vec::new();
        while !parser.at_end() {
            types.push(parser.single()?);
        }
        Ok(types.join(", "))
    }

    fn is_primitive(&self, signature: &str) -> bool {
        let mut chars = signature.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => basic_type(code).is_some_and(|m| m.primitive),
            _ => false,
        }
    }
}

/// Recursive-descent reader over one signature string
struct SignatureParser<'a> {
    signature: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> SignatureParser<'a> {
    fn new(signature: &'a str) -> Self {
        Self {
            signature,
            chars: signature.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> GenResult<char> {
        let c = self
            .peek()
            .ok_or_else(|| self.error("unexpected end of signature"))?;
        self.pos += 1;
        Ok(c)
    }

    fn error(&self, reason: impl Into<String>) -> GenError {
        GenError::invalid_signature(self.signature, reason)
    }

    /// One complete type.
    fn single(&mut self) -> GenResult<String> {
        match self.bump()? {
            'a' => match self.peek() {
                Some('{') => {
                    self.pos += 1;
                    let entry = self.sequence('}', "dict entry")?;
                    if entry.len() != 2 {
                        return Err(self.error("dict entry must hold exactly a key and a value"));
                    }
                    Ok(format!("std::map< {} >", entry.join(", ")))
                }
                Some('(') => {
                    self.pos += 1;
                    let fields = self.sequence(')', "struct")?;
                    Ok(format!(
                        "std::vector< ::DBus::Struct< {} > >",
                        fields.join(", ")
                    ))
                }
                _ => {
                    let element = self.single()?;
                    Ok(format!("std::vector< {element} >"))
                }
            },
            '(' => {
                let fields = self.sequence(')', "struct")?;
                Ok(format!("::DBus::Struct< {} >", fields.join(", ")))
            }
            c @ (')' | '}') => Err(self.error(format!("unbalanced '{c}'"))),
            c => basic_type(c)
                .map(|m| m.host_type.to_string())
                .ok_or_else(|| self.error(format!("unknown type code '{c}'"))),
        }
    }

    /// Types up to and including `close`.
    fn sequence(&mut self, close: char, what: &str) -> GenResult<Vec<String>> {
        let mut types = Vec::new();
        loop {
            match self.peek() {
                Some(c) if c == close => {
                    self.pos += 1;
                    if types.is_empty() {
                        return Err(self.error(format!("empty {what}")));
                    }
                    return Ok(types);
                }
                Some(_) => types.push(self.single()?),
                None => return Err(self.error(format!("unterminated {what}"))),
            }
        }
    }
}
