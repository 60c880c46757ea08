// src/types/convert.rs
//
// Conversion classification consumed by switch pattern analysis.
// The checker never inspects declarations directly; it asks an injected
// TypeEnv oracle, so the surrounding compiler can plug in its own
// resolution machinery.

use super::Type;

/// How a value of one static type reaches another.
///
/// Only the distinctions pattern analysis needs are kept: whether a
/// conversion exists at all, whether it is implicit, and whether a runtime
/// type test can observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    Identity,
    /// Derived class/interface to a base class or implemented interface
    ImplicitReference,
    /// Value type to object (or a compatible interface)
    Boxing,
    /// Lossless numeric widening
    ImplicitNumeric,
    /// `T` to `T?`
    ImplicitNullable,
    /// Base to derived; succeeds or fails at runtime
    ExplicitReference,
    /// Object/interface back to a value type
    Unboxing,
    /// `T?` to `T`
    ExplicitNullable,
    /// Lossy numeric narrowing, enum to/from its underlying type
    ExplicitNumeric,
    Incompatible,
}

impl ConversionKind {
    pub fn exists(&self) -> bool {
        !matches!(self, ConversionKind::Incompatible)
    }

    pub fn is_implicit(&self) -> bool {
        matches!(
            self,
            ConversionKind::Identity
                | ConversionKind::ImplicitReference
                | ConversionKind::Boxing
                | ConversionKind::ImplicitNumeric
                | ConversionKind::ImplicitNullable
        )
    }

    /// Conversions a runtime type test can traverse. Numeric conversions
    /// change representation, so `case i64 v:` never matches an i32 value.
    pub fn is_pattern_checkable(&self) -> bool {
        matches!(
            self,
            ConversionKind::Identity
                | ConversionKind::ImplicitReference
                | ConversionKind::Boxing
                | ConversionKind::ImplicitNullable
                | ConversionKind::ExplicitReference
                | ConversionKind::Unboxing
                | ConversionKind::ExplicitNullable
        )
    }
}

/// Oracle for type relationships, injected into the switch analyzer.
///
/// The compiler's real resolution engine implements this; tests use the
/// fixture `TypeRegistry`.
pub trait TypeEnv {
    /// Classify the conversion from `from` to `to`.
    fn classify_conversion(&self, from: &Type, to: &Type) -> ConversionKind;

    /// Human-readable type name for diagnostics.
    fn display(&self, ty: &Type) -> String;
}

/// Whether values of type `cone` are guaranteed handled once the subtype
/// cone of `of` has been removed from a value space.
pub fn cone_covers(env: &dyn TypeEnv, of: &Type, cone: &Type) -> bool {
    matches!(
        env.classify_conversion(of, cone),
        ConversionKind::Identity | ConversionKind::ImplicitReference | ConversionKind::Boxing
    )
}

/// Whether a runtime type test for `tested` can ever succeed against a
/// value whose static type is `scrutinee`.
pub fn pattern_test_possible(env: &dyn TypeEnv, scrutinee: &Type, tested: &Type) -> bool {
    if scrutinee.is_error() || tested.is_error() {
        return true;
    }
    // Unconstrained type parameters can be instantiated at anything.
    if matches!(scrutinee, Type::TypeParam { .. }) || matches!(tested, Type::TypeParam { .. }) {
        return true;
    }
    env.classify_conversion(scrutinee.underlying(), tested)
        .is_pattern_checkable()
        || env
            .classify_conversion(tested, scrutinee.underlying())
            .is_pattern_checkable()
}
