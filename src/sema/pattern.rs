// src/sema/pattern.rs
//
// The arm language fed into switch analysis: constants, type tests with
// optional bindings, catch-alls, and null. Guards and bodies arrive as
// opaque handles; binding and lowering of their contents happens in the
// surrounding compiler.

use std::fmt;

use crate::intern::Symbol;
use crate::span::Span;
use crate::types::{Type, TypeDefId};

/// Opaque handle to an already-bound boolean guard expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuardId(pub u32);

/// Opaque handle to an arm body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

/// Decimal constant: 96-bit mantissa with a base-10 scale, sign carried
/// in the mantissa. Only construction and canonical-value comparison are
/// needed here, so this stays a small value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    pub mantissa: i128,
    pub scale: u8,
}

impl Decimal {
    pub fn new(mantissa: i128, scale: u8) -> Self {
        Self { mantissa, scale }
    }

    /// Strip trailing zero digits so equal mathematical values share one
    /// representation: 1.10 and 1.100 both canonicalize to {11, 1}.
    pub fn canonical(self) -> Decimal {
        let mut mantissa = self.mantissa;
        let mut scale = self.scale;
        while scale > 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            scale -= 1;
        }
        Decimal { mantissa, scale }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if digits.len() > scale {
            let split = digits.len() - scale;
            write!(f, "{}{}.{}", sign, &digits[..split], &digits[split..])
        } else {
            write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
        }
    }
}

/// A compile-time constant usable as a case label.
#[derive(Debug, Clone)]
pub enum ConstValue {
    Int(i64),
    UInt(u64),
    Bool(bool),
    Char(char),
    Str(String),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    /// Enum member constant with its underlying integral value
    Enum { def: TypeDefId, value: i128 },
    Null,
}

impl PartialEq for ConstValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConstValue::Int(a), ConstValue::Int(b)) => a == b,
            (ConstValue::UInt(a), ConstValue::UInt(b)) => a == b,
            (ConstValue::Bool(a), ConstValue::Bool(b)) => a == b,
            (ConstValue::Char(a), ConstValue::Char(b)) => a == b,
            (ConstValue::Str(a), ConstValue::Str(b)) => a == b,
            // Raw bit equality; label equality lives in the normalizer.
            (ConstValue::F32(a), ConstValue::F32(b)) => a.to_bits() == b.to_bits(),
            (ConstValue::F64(a), ConstValue::F64(b)) => a.to_bits() == b.to_bits(),
            (ConstValue::Decimal(a), ConstValue::Decimal(b)) => a == b,
            (
                ConstValue::Enum { def: da, value: va },
                ConstValue::Enum { def: db, value: vb },
            ) => da == db && va == vb,
            (ConstValue::Null, ConstValue::Null) => true,
            _ => false,
        }
    }
}

impl Eq for ConstValue {}

// Manual Hash implementation because floats don't implement Hash
impl std::hash::Hash for ConstValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ConstValue::Int(v) => v.hash(state),
            ConstValue::UInt(v) => v.hash(state),
            ConstValue::Bool(v) => v.hash(state),
            ConstValue::Char(v) => v.hash(state),
            ConstValue::Str(v) => v.hash(state),
            ConstValue::F32(v) => v.to_bits().hash(state),
            ConstValue::F64(v) => v.to_bits().hash(state),
            ConstValue::Decimal(v) => v.hash(state),
            ConstValue::Enum { def, value } => {
                def.hash(state);
                value.hash(state);
            }
            ConstValue::Null => {}
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(v) => write!(f, "{}", v),
            ConstValue::UInt(v) => write!(f, "{}", v),
            ConstValue::Bool(v) => write!(f, "{}", v),
            ConstValue::Char(v) => write!(f, "'{}'", v),
            ConstValue::Str(v) => write!(f, "\"{}\"", v),
            ConstValue::F32(v) if v.is_nan() => write!(f, "NaN"),
            ConstValue::F32(v) => write!(f, "{}", v),
            ConstValue::F64(v) if v.is_nan() => write!(f, "NaN"),
            ConstValue::F64(v) => write!(f, "{}", v),
            ConstValue::Decimal(v) => write!(f, "{}", v),
            ConstValue::Enum { value, .. } => write!(f, "{}", value),
            ConstValue::Null => write!(f, "null"),
        }
    }
}

/// One case pattern. The scrutinee's static type is fixed on the
/// enclosing SwitchCase at construction and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `case 3:` - constant label with the type it was written at
    Constant { value: ConstValue, declared: Type },
    /// `case T x:` / `case T:` - runtime type test with optional binding
    Type { tested: Type, binding: Option<Symbol> },
    /// `case var x:` - matches anything, binds at the scrutinee's static type
    Var { binding: Symbol },
    /// `default:` / `case _:` - matches anything, binds nothing
    Discard,
    /// `case null:`
    Null,
}

impl Pattern {
    /// Matches every value of the scrutinee type, no test emitted.
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Pattern::Var { .. } | Pattern::Discard)
    }

    pub fn binding(&self) -> Option<Symbol> {
        match self {
            Pattern::Type { binding, .. } => *binding,
            Pattern::Var { binding } => Some(*binding),
            _ => None,
        }
    }
}

/// One `case pattern [when guard]:` unit with its body.
///
/// Labels that share a body are consecutive arms carrying the same
/// `group` id; the checker tests them against one space snapshot
/// (alternatives, not sequential).
#[derive(Debug, Clone)]
pub struct CaseArm {
    pub pattern: Pattern,
    pub guard: Option<GuardId>,
    pub body: BodyId,
    pub span: Span,
    pub body_span: Span,
    pub group: u32,
}

impl CaseArm {
    pub fn new(pattern: Pattern, guard: Option<GuardId>, body: BodyId, span: Span) -> Self {
        Self {
            pattern,
            guard,
            body,
            span,
            body_span: span,
            group: 0,
        }
    }

    pub fn in_group(mut self, group: u32) -> Self {
        self.group = group;
        self
    }
}

/// A fully type-annotated switch dispatch, ready for analysis.
#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub scrutinee: Type,
    pub arms: Vec<CaseArm>,
    pub span: Span,
}
