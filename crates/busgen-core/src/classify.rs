//! Argument partitioning and return-shape decisions for methods.
//!
//! The same classification feeds the proxy call signatures and the adaptor
//! dispatch stubs, so both sides agree on how out-arguments travel.

use crate::model::{ArgumentDef, Direction, MethodDef};
use crate::naming::legalize;

/// How a method hands its out-arguments back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnShape {
    /// Exactly one out-argument: it is the return value.
    Direct,

    /// Zero or several out-arguments: the call returns nothing and each
    /// out-argument is passed by reference.
    ByReference,
}

/// A method's arguments split by direction.
#[derive(Debug, Clone)]
pub struct Classified<'a> {
    pub args_in: Vec<&'a ArgumentDef>,
    pub args_out: Vec<&'a ArgumentDef>,
    pub shape: ReturnShape,
}

impl<'a> Classified<'a> {
    /// The single out-argument returned directly, if any.
    pub fn direct_return(&self) -> Option<&'a ArgumentDef> {
        match self.shape {
            ReturnShape::Direct => self.args_out.first().copied(),
            ReturnShape::ByReference => None,
        }
    }

    /// Out-arguments passed as reference parameters (none in direct mode).
    pub fn reference_outs(&self) -> &[&'a ArgumentDef] {
        match self.shape {
            ReturnShape::Direct => &[],
            ReturnShape::ByReference => &self.args_out,
        }
    }
}

/// Partition a method's arguments into in and out sequences.
///
/// The partition is stable: relative declaration order is kept on both sides.
pub fn classify(method: &MethodDef) -> Classified<'_> {
    let (args_in, args_out): (Vec<_>, Vec<_>) = method
        .args
        .iter()
        .partition(|arg| arg.direction == Direction::In);

    let shape = if args_out.len() == 1 {
        ReturnShape::Direct
    } else {
        ReturnShape::ByReference
    };

    Classified {
        args_in,
        args_out,
        shape,
    }
}

const IN_PREFIX: &str = "argin";
const OUT_PREFIX: &str = "argout";
const PAYLOAD_PREFIX: &str = "arg";

/// Host identifier for the `index`th (zero-based) in-argument.
///
/// Anonymous arguments fall back to `argin<N>` with `N` one-based.
pub fn in_name(arg: &ArgumentDef, index: usize) -> String {
    named_or_positional(arg, Positional::In, index)
}

/// Host identifier for the `index`th (zero-based) out-argument; falls back to `argout<N>`.
pub fn out_name(arg: &ArgumentDef, index: usize) -> String {
    named_or_positional(arg, Positional::Out, index)
}

/// Host identifier for the `index`th (zero-based) signal argument; falls back to `arg<N>`.
pub fn payload_name(arg: &ArgumentDef, index: usize) -> String {
    named_or_positional(arg, Positional::Payload, index)
}

/// Positional identifier, ignoring any declared name.
pub fn positional(kind: Positional, index: usize) -> String {
    let prefix = match kind {
        Positional::In => IN_PREFIX,
        Positional::Out => OUT_PREFIX,
        Positional::Payload => PAYLOAD_PREFIX,
    };
    format!("{prefix}{}", index + 1)
}

/// Family of positional names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positional {
    In,
    Out,
    Payload,
}

fn named_or_positional(arg: &ArgumentDef, kind: Positional, index: usize) -> String {
    if arg.is_anonymous() {
        positional(kind, index)
    } else {
        legalize(&arg.name)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use test_case::test_case;

    fn method(dirs: &[Direction]) -> MethodDef {
        let args = dirs
            .iter()
            .enumerate()
            .map(|(i, d)| ArgumentDef::new(format!("a{i}"), "i", *d))
            .collect();
        MethodDef::new("M", args)
    }

    #[test_case(&[], ReturnShape::ByReference; "no arguments")]
    #[test_case(&[Direction::In], ReturnShape::ByReference; "only in")]
    #[test_case(&[Direction::Out], ReturnShape::Direct; "one out")]
    #[test_case(&[Direction::In, Direction::Out], ReturnShape::Direct; "in then one out")]
    #[test_case(&[Direction::Out, Direction::Out], ReturnShape::ByReference; "two outs")]
    #[test_case(&[Direction::Out, Direction::In, Direction::Out, Direction::Out], ReturnShape::ByReference; "three outs")]
    fn classify___out_count___decides_shape(dirs: &[Direction], expected: ReturnShape) {
        let m = method(dirs);
        assert_eq!(classify(&m).shape, expected);
    }

    #[test]
    fn classify___interleaved_directions___partition_is_stable() {
        let m = method(&[
            Direction::Out,
            Direction::In,
            Direction::Out,
            Direction::In,
            Direction::In,
        ]);

        let c = classify(&m);

        let ins: Vec<_> = c.args_in.iter().map(|a| a.name.as_str()).collect();
        let outs: Vec<_> = c.args_out.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(ins, ["a1", "a3", "a4"]);
        assert_eq!(outs, ["a0", "a2"]);
    }

    #[test]
    fn direct_return___single_out___is_that_argument() {
        let m = method(&[Direction::In, Direction::Out]);
        let c = classify(&m);

        assert_eq!(c.direct_return().map(|a| a.name.as_str()), Some("a1"));
        assert!(c.reference_outs().is_empty());
    }

    #[test]
    fn reference_outs___several_outs___all_in_order() {
        let m = method(&[Direction::Out, Direction::Out]);
        let c = classify(&m);

        assert!(c.direct_return().is_none());
        let outs: Vec<_> = c.reference_outs().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(outs, ["a0", "a1"]);
    }

    #[test]
    fn in_name___anonymous___falls_back_one_based() {
        let arg = ArgumentDef::new("", "s", Direction::In);

        assert_eq!(in_name(&arg, 0), "argin1");
        assert_eq!(out_name(&arg, 2), "argout3");
        assert_eq!(payload_name(&arg, 1), "arg2");
    }

    #[test]
    fn in_name___named___is_legalized() {
        let arg = ArgumentDef::new("user-id", "s", Direction::In);

        assert_eq!(in_name(&arg, 4), "user_id");
    }

    #[test]
    fn positional___ignores_declared_name() {
        assert_eq!(positional(Positional::In, 0), "argin1");
        assert_eq!(positional(Positional::Out, 1), "argout2");
        assert_eq!(positional(Positional::Payload, 2), "arg3");
    }
}
