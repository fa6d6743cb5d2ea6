//! Host call signatures derived from a method's classification.
//!
//! Proxy invocation stubs and adaptor abstract declarations are both built
//! from [`method_signature`], which is what keeps their shapes in step.

use crate::classify::{Classified, in_name, out_name};
use crate::error::GenResult;
use crate::model::MethodDef;
use crate::naming::legalize;
use crate::type_map::TypeMapper;

/// How a parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// `const T& name`
    In,

    /// `T& name`, written by the callee
    OutRef,

    /// `T name`, spelled verbatim (user data, timeout, error carrier)
    Extra,
}

/// One host-side parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub kind: ParamKind,
    pub ty: String,
    pub name: String,
}

impl Param {
    /// Read-only in-argument.
    pub fn input(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ParamKind::In,
            ty: ty.into(),
            name: name.into(),
        }
    }

    /// Out-argument the callee writes through a reference.
    pub fn out_ref(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ParamKind::OutRef,
            ty: ty.into(),
            name: name.into(),
        }
    }

    /// Parameter spelled exactly as given.
    pub fn extra(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ParamKind::Extra,
            ty: ty.into(),
            name: name.into(),
        }
    }

    /// Declaration text, e.g. `const std::string& name`.
    pub fn render(&self) -> String {
        match self.kind {
            ParamKind::In => format!("const {}& {}", self.ty, self.name),
            ParamKind::OutRef => format!("{}& {}", self.ty, self.name),
            ParamKind::Extra => format!("{} {}", self.ty, self.name),
        }
    }
}

/// A rendered-on-demand function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub return_type: String,
    pub name: String,
    pub params: Vec<Param>,
}

impl Signature {
    pub fn is_void(&self) -> bool {
        self.return_type == "void"
    }

    /// Reference out-parameters, in order.
    pub fn out_refs(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| p.kind == ParamKind::OutRef)
    }

    /// `virtual` declaration form.
    pub fn render_virtual(&self) -> String {
        format!("virtual {}", self.render())
    }

    pub fn render(&self) -> String {
        let params: Vec<String> = self.params.iter().map(Param::render).collect();
        format!("{} {}({})", self.return_type, self.name, params.join(", "))
    }
}

/// Signature shared by proxy and adaptor for `method`.
///
/// In-arguments come first as `const T&`. With exactly one out-argument its
/// host type is the return type; otherwise the call returns `void` and every
/// out-argument follows as `T&`.
pub fn method_signature(
    method: &MethodDef,
    classified: &Classified<'_>,
    types: &dyn TypeMapper,
) -> GenResult<Signature> {
    let mut params = Vec::with_capacity(classified.args_in.len() + classified.args_out.len());

    for (i, arg) in classified.args_in.iter().enumerate() {
        params.push(Param::input(types.host_type(&arg.signature)?, in_name(arg, i)));
    }
    for (i, arg) in classified.reference_outs().iter().enumerate() {
        params.push(Param::out_ref(types.host_type(&arg.signature)?, out_name(arg, i)));
    }

    let return_type = match classified.direct_return() {
        Some(arg) => types.host_type(&arg.signature)?,
        None => "void".to_string(),
    };

    Ok(Signature {
        return_type,
        name: legalize(&method.name),
        params,
    })
}
