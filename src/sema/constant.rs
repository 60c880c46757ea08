// src/sema/constant.rs
//
// Label equality for duplicate detection. Two constants are the same
// switch label iff their ComparisonKeys are equal. This is a *static*
// notion and intentionally diverges from the runtime comparison operator
// for floating-point special values: NaN labels collide with each other,
// and -0.0 collides with 0.0.

use super::pattern::{ConstValue, Decimal};
use crate::types::{NominalType, PrimitiveType, Type};

/// Canonical identity of a case label, after conversion to the governing
/// type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComparisonKey {
    /// All integrals, char, and enum constants share one key space:
    /// runtime dispatch compares underlying representations.
    Int(i128),
    Bool(bool),
    Str(String),
    /// Canonicalized bits: one NaN, one zero
    F32(u32),
    /// Canonicalized bits: one NaN, one zero
    F64(u64),
    Decimal(Decimal),
    Null,
}

/// A constant label whose value does not fit the governing type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange;

fn canonical_f32_bits(v: f32) -> u32 {
    if v.is_nan() {
        f32::NAN.to_bits()
    } else if v == 0.0 {
        0.0f32.to_bits()
    } else {
        v.to_bits()
    }
}

fn canonical_f64_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Integral value of a constant, if it has one.
fn integer_value(value: &ConstValue) -> Option<i128> {
    match value {
        ConstValue::Int(v) => Some(*v as i128),
        ConstValue::UInt(v) => Some(*v as i128),
        ConstValue::Char(c) => Some(*c as u32 as i128),
        ConstValue::Enum { value, .. } => Some(*value),
        _ => None,
    }
}

/// Normalize a constant in isolation (no governing-type conversion).
pub fn normalize(value: &ConstValue) -> ComparisonKey {
    match value {
        ConstValue::Int(v) => ComparisonKey::Int(*v as i128),
        ConstValue::UInt(v) => ComparisonKey::Int(*v as i128),
        ConstValue::Bool(v) => ComparisonKey::Bool(*v),
        ConstValue::Char(c) => ComparisonKey::Int(*c as u32 as i128),
        ConstValue::Str(s) => ComparisonKey::Str(s.clone()),
        ConstValue::F32(v) => ComparisonKey::F32(canonical_f32_bits(*v)),
        ConstValue::F64(v) => ComparisonKey::F64(canonical_f64_bits(*v)),
        ConstValue::Decimal(d) => ComparisonKey::Decimal(d.canonical()),
        ConstValue::Enum { value, .. } => ComparisonKey::Int(*value),
        ConstValue::Null => ComparisonKey::Null,
    }
}

/// Key for a label on a switch governed by `scrutinee`, converting the
/// constant to the governing type first so `case 1:` and `case 1.0:`
/// collide on a float scrutinee. Errs when an integral label does not fit
/// the governing integral type.
pub fn label_key(value: &ConstValue, scrutinee: &Type) -> Result<ComparisonKey, OutOfRange> {
    let governing = scrutinee.underlying();

    let target = match governing {
        Type::Primitive(p) => Some(*p),
        Type::Nominal(NominalType::Enum(e)) => Some(e.underlying),
        _ => None,
    };

    let Some(target) = target else {
        return Ok(normalize(value));
    };

    if let Some((min, max)) = target.integer_range() {
        if let Some(v) = integer_value(value) {
            if v < min || v > max {
                return Err(OutOfRange);
            }
            return Ok(ComparisonKey::Int(v));
        }
        return Ok(normalize(value));
    }

    match target {
        PrimitiveType::F32 => match integer_value(value) {
            Some(v) => Ok(ComparisonKey::F32(canonical_f32_bits(v as f32))),
            None => Ok(normalize(value)),
        },
        PrimitiveType::F64 => match (integer_value(value), value) {
            (Some(v), _) => Ok(ComparisonKey::F64(canonical_f64_bits(v as f64))),
            (None, ConstValue::F32(f)) => Ok(ComparisonKey::F64(canonical_f64_bits(*f as f64))),
            _ => Ok(normalize(value)),
        },
        PrimitiveType::Decimal => match integer_value(value) {
            Some(v) => Ok(ComparisonKey::Decimal(Decimal::new(v, 0).canonical())),
            None => Ok(normalize(value)),
        },
        _ => Ok(normalize(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_zero_labels_collide() {
        assert_eq!(
            normalize(&ConstValue::F64(0.0)),
            normalize(&ConstValue::F64(-0.0))
        );
        assert_eq!(
            normalize(&ConstValue::F32(0.0)),
            normalize(&ConstValue::F32(-0.0))
        );
    }

    #[test]
    fn nan_labels_collide_despite_runtime_inequality() {
        let nan = ConstValue::F64(f64::NAN);
        let neg_nan = ConstValue::F64(-f64::NAN);
        assert_eq!(normalize(&nan), normalize(&neg_nan));
        assert_eq!(
            normalize(&ConstValue::F32(f32::NAN)),
            normalize(&ConstValue::F32(-f32::NAN))
        );
    }

    #[test]
    fn ordinary_floats_keep_distinct_keys() {
        assert_ne!(
            normalize(&ConstValue::F64(1.0)),
            normalize(&ConstValue::F64(2.0))
        );
    }

    #[test]
    fn decimal_labels_compare_by_mathematical_value() {
        let a = ConstValue::Decimal(Decimal::new(110, 2)); // 1.10
        let b = ConstValue::Decimal(Decimal::new(1100, 3)); // 1.100
        let c = ConstValue::Decimal(Decimal::new(111, 2)); // 1.11
        assert_eq!(normalize(&a), normalize(&b));
        assert_ne!(normalize(&a), normalize(&c));
    }

    #[test]
    fn enum_constant_identifies_with_underlying_value() {
        let member = ConstValue::Enum {
            def: crate::types::TypeDefId(0),
            value: 3,
        };
        assert_eq!(normalize(&member), normalize(&ConstValue::Int(3)));
    }

    #[test]
    fn integer_label_converts_to_float_governing_type() {
        let double = Type::primitive(PrimitiveType::F64);
        assert_eq!(
            label_key(&ConstValue::Int(1), &double).unwrap(),
            label_key(&ConstValue::F64(1.0), &double).unwrap()
        );
    }

    #[test]
    fn out_of_range_label_is_rejected() {
        let byte = Type::primitive(PrimitiveType::U8);
        assert_eq!(label_key(&ConstValue::Int(1000), &byte), Err(OutOfRange));
        assert!(label_key(&ConstValue::Int(255), &byte).is_ok());
    }

    #[test]
    fn nullable_governing_type_uses_underlying_domain() {
        let byte_opt = Type::nullable(Type::primitive(PrimitiveType::U8));
        assert_eq!(label_key(&ConstValue::Int(300), &byte_opt), Err(OutOfRange));
    }
}
