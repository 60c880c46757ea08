// src/types/nominal.rs
//
// Nominal type enum consolidating Class, Interface, and Enum instance types.
// These are types with a definition identity (TypeDefId) registered in the
// TypeRegistry, plus optional type arguments for generic instantiation.

use smallvec::SmallVec;

use super::{PrimitiveType, Type};

/// Identity of a declared class, interface, or enum definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDefId(pub u32);

/// SmallVec for interface extends lists - most interfaces extend 0-2 parents
pub type ExtendsVec = SmallVec<[TypeDefId; 2]>;

/// Generic type arguments. Heap-allocated: `Type` contains `NominalType`,
/// so an inline buffer here would make the type recursive without
/// indirection.
pub type TypeArgsVec = Vec<Type>;

/// Nominal types - types with a definition identity in the TypeRegistry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NominalType {
    /// Class instance type
    Class(ClassType),
    /// Interface instance type
    Interface(InterfaceType),
    /// Enum type, dispatching on its underlying integral representation
    Enum(EnumType),
}

impl NominalType {
    /// Get the TypeDefId for this nominal type.
    pub fn type_def_id(&self) -> TypeDefId {
        match self {
            NominalType::Class(c) => c.def,
            NominalType::Interface(i) => i.def,
            NominalType::Enum(e) => e.def,
        }
    }

    /// Generic type arguments; empty for enums.
    pub fn type_args(&self) -> &[Type] {
        match self {
            NominalType::Class(c) => &c.args,
            NominalType::Interface(i) => &i.args,
            NominalType::Enum(_) => &[],
        }
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, NominalType::Interface(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassType {
    pub def: TypeDefId,
    pub args: TypeArgsVec,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceType {
    pub def: TypeDefId,
    pub args: TypeArgsVec,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub def: TypeDefId,
    /// Underlying integral representation; runtime dispatch compares this.
    pub underlying: PrimitiveType,
}

impl From<NominalType> for Type {
    fn from(n: NominalType) -> Type {
        Type::Nominal(n)
    }
}
