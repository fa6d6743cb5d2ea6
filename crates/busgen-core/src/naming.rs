//! Identifier and scope naming for generated code.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `my-prop` | [`legalize`] | `my_prop` |
//! | `com.example.Greeter` | [`resolve`] | scopes `com`, `example`; base `Greeter` |
//! | `Greeted` | [`stub_name`] | `_Greeted_stub` |
//! | `out/greeter-proxy.h` | [`legalize`] | `out_greeter_proxy_h` |

/// Make a description-supplied name safe to use as a host identifier.
///
/// Every character other than an ASCII letter, digit or `_` becomes `_`.
/// Total and idempotent: `legalize(legalize(s)) == legalize(s)`.
///
/// # Examples
///
/// ```
/// use busgen_core::naming::legalize;
///
/// assert_eq!(legalize("max-count"), "max_count");
/// assert_eq!(legalize("Greet"), "Greet");
/// assert_eq!(legalize(""), "");
/// ```
pub fn legalize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Enclosing scopes and class base name derived from a dotted interface name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePath {
    /// Every segment but the last, outermost first.
    pub scopes: Vec<String>,

    /// The final segment.
    pub base_name: String,
}

/// Split a dotted interface name into scopes and a base name.
///
/// A name without `.` has no scopes.
///
/// # Examples
///
/// ```
/// use busgen_core::naming::resolve;
///
/// let path = resolve("com.example.Greeter");
/// assert_eq!(path.scopes, ["com", "example"]);
/// assert_eq!(path.base_name, "Greeter");
///
/// assert!(resolve("Greeter").scopes.is_empty());
/// ```
pub fn resolve(dotted_name: &str) -> NamespacePath {
    match dotted_name.rsplit_once('.') {
        Some((scopes, base)) => NamespacePath {
            scopes: scopes.split('.').map(str::to_string).collect(),
            base_name: base.to_string(),
        },
        None => NamespacePath {
            scopes: Vec::new(),
            base_name: dotted_name.to_string(),
        },
    }
}

/// Name of the private stub bound to a signal or method.
///
/// ```
/// use busgen_core::naming::stub_name;
///
/// assert_eq!(stub_name("Name-Changed"), "_Name_Changed_stub");
/// ```
pub fn stub_name(member: &str) -> String {
    format!("_{}_stub", legalize(member))
}
