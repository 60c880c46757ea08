// src/types/mod.rs
//
// Core type system module for Marlin switch analysis.
//
// This module is organized into submodules by type category:
// - `nominal` - NominalType enum (Class, Interface, Enum) with TypeDefIds
// - `convert` - ConversionKind and the TypeEnv oracle trait
// - `registry` - TypeRegistry, the concrete TypeEnv used by the compiler

pub mod convert;
pub mod nominal;
pub mod registry;

pub use convert::{ConversionKind, TypeEnv};
pub use nominal::{ClassType, EnumType, ExtendsVec, InterfaceType, NominalType, TypeDefId};
pub use registry::{TypeRegistry, Variance};

/// Primitive scalar types of the Marlin object language.
///
/// `String` is a reference type; everything else is a value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    Bool,
    Char,
    String,
}

impl PrimitiveType {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::I8 => "i8",
            PrimitiveType::I16 => "i16",
            PrimitiveType::I32 => "i32",
            PrimitiveType::I64 => "i64",
            PrimitiveType::U8 => "u8",
            PrimitiveType::U16 => "u16",
            PrimitiveType::U32 => "u32",
            PrimitiveType::U64 => "u64",
            PrimitiveType::F32 => "f32",
            PrimitiveType::F64 => "f64",
            PrimitiveType::Decimal => "decimal",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Char => "char",
            PrimitiveType::String => "string",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            PrimitiveType::I8
                | PrimitiveType::I16
                | PrimitiveType::I32
                | PrimitiveType::I64
                | PrimitiveType::U8
                | PrimitiveType::U16
                | PrimitiveType::U32
                | PrimitiveType::U64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, PrimitiveType::F32 | PrimitiveType::F64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float() || *self == PrimitiveType::Decimal
    }

    pub fn is_value_type(&self) -> bool {
        *self != PrimitiveType::String
    }

    /// Representable range for integral types, as i128 bounds.
    /// `Char` counts as its scalar range for label representability checks.
    pub fn integer_range(&self) -> Option<(i128, i128)> {
        match self {
            PrimitiveType::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            PrimitiveType::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            PrimitiveType::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            PrimitiveType::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            PrimitiveType::U8 => Some((0, u8::MAX as i128)),
            PrimitiveType::U16 => Some((0, u16::MAX as i128)),
            PrimitiveType::U32 => Some((0, u32::MAX as i128)),
            PrimitiveType::U64 => Some((0, u64::MAX as i128)),
            PrimitiveType::Char => Some((0, char::MAX as u32 as i128)),
            _ => None,
        }
    }

    /// Implicit (lossless) numeric widening between primitives.
    pub fn widens_to(&self, other: &PrimitiveType) -> bool {
        use PrimitiveType::*;
        if self == other {
            return true;
        }
        match self {
            I8 => matches!(other, I16 | I32 | I64 | F32 | F64 | Decimal),
            I16 => matches!(other, I32 | I64 | F32 | F64 | Decimal),
            I32 => matches!(other, I64 | F32 | F64 | Decimal),
            I64 => matches!(other, F32 | F64 | Decimal),
            U8 => matches!(other, U16 | U32 | U64 | I16 | I32 | I64 | F32 | F64 | Decimal),
            U16 => matches!(other, U32 | U64 | I32 | I64 | F32 | F64 | Decimal),
            U32 => matches!(other, U64 | I64 | F32 | F64 | Decimal),
            U64 => matches!(other, F32 | F64 | Decimal),
            Char => matches!(other, U16 | U32 | U64 | I32 | I64 | F32 | F64 | Decimal),
            F32 => matches!(other, F64),
            _ => false,
        }
    }
}

/// Static type of a scrutinee, a pattern test, or a binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveType),
    /// Class, interface, or enum instance
    Nominal(NominalType),
    /// Nullable value type `T?`
    Nullable(Box<Type>),
    /// Top reference type; every type converts to it
    Object,
    /// Generic type parameter with an optional declared bound
    TypeParam {
        id: u32,
        bound: Option<Box<Type>>,
    },
    /// Error recovery type from an upstream type-check failure
    Error,
}

impl Type {
    pub fn primitive(p: PrimitiveType) -> Type {
        Type::Primitive(p)
    }

    pub fn nullable(inner: Type) -> Type {
        Type::Nullable(Box::new(inner))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveType::Bool))
    }

    /// Value types cannot hold null directly.
    pub fn is_value_type(&self) -> bool {
        match self {
            Type::Primitive(p) => p.is_value_type(),
            Type::Nominal(NominalType::Enum(_)) => true,
            Type::Nullable(_) => true,
            _ => false,
        }
    }

    /// Whether the runtime domain of this type contains null.
    pub fn admits_null(&self) -> bool {
        match self {
            Type::Object | Type::Nullable(_) | Type::Error => true,
            Type::Primitive(p) => !p.is_value_type(),
            Type::Nominal(NominalType::Class(_)) | Type::Nominal(NominalType::Interface(_)) => true,
            Type::Nominal(NominalType::Enum(_)) => false,
            // A type parameter may be instantiated at a reference type.
            Type::TypeParam { .. } => true,
        }
    }

    /// The scalar domain underneath a nullable wrapper; identity otherwise.
    pub fn underlying(&self) -> &Type {
        match self {
            Type::Nullable(inner) => inner,
            other => other,
        }
    }
}
