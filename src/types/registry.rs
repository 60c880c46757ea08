// src/types/registry.rs
//
// Registry of declared classes, interfaces, and enums, answering the
// subtype/conversion queries pattern analysis needs. This is the concrete
// TypeEnv used by the compiler (and by tests as a fixture); the checker
// itself only sees the trait.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::convert::{ConversionKind, TypeEnv};
use super::nominal::{ClassType, EnumType, InterfaceType, NominalType, TypeArgsVec, TypeDefId};
use super::{ExtendsVec, PrimitiveType, Type};

/// Variance of a generic interface parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variance {
    Invariant,
    Covariant,
}

#[derive(Debug)]
struct ClassDef {
    name: String,
    base: Option<TypeDefId>,
    implements: ExtendsVec,
    sealed: bool,
}

#[derive(Debug)]
struct InterfaceDef {
    name: String,
    extends: ExtendsVec,
    variance: SmallVec<[Variance; 1]>,
}

#[derive(Debug)]
struct EnumDef {
    name: String,
    underlying: PrimitiveType,
}

#[derive(Debug)]
enum TypeDef {
    Class(ClassDef),
    Interface(InterfaceDef),
    Enum(EnumDef),
}

/// Declared-type registry and conversion oracle.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    defs: Vec<TypeDef>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_class(
        &mut self,
        name: &str,
        base: Option<TypeDefId>,
        implements: ExtendsVec,
        sealed: bool,
    ) -> TypeDefId {
        self.push(TypeDef::Class(ClassDef {
            name: name.to_string(),
            base,
            implements,
            sealed,
        }))
    }

    pub fn register_interface(
        &mut self,
        name: &str,
        extends: ExtendsVec,
        variance: SmallVec<[Variance; 1]>,
    ) -> TypeDefId {
        self.push(TypeDef::Interface(InterfaceDef {
            name: name.to_string(),
            extends,
            variance,
        }))
    }

    pub fn register_enum(&mut self, name: &str, underlying: PrimitiveType) -> TypeDefId {
        self.push(TypeDef::Enum(EnumDef {
            name: name.to_string(),
            underlying,
        }))
    }

    fn push(&mut self, def: TypeDef) -> TypeDefId {
        let id = TypeDefId(self.defs.len() as u32);
        self.defs.push(def);
        id
    }

    pub fn class_type(&self, def: TypeDefId) -> Type {
        self.class_type_with(def, TypeArgsVec::new())
    }

    pub fn class_type_with(&self, def: TypeDefId, args: TypeArgsVec) -> Type {
        debug_assert!(matches!(self.def(def), TypeDef::Class(_)));
        Type::Nominal(NominalType::Class(ClassType { def, args }))
    }

    pub fn interface_type(&self, def: TypeDefId) -> Type {
        self.interface_type_with(def, TypeArgsVec::new())
    }

    pub fn interface_type_with(&self, def: TypeDefId, args: TypeArgsVec) -> Type {
        debug_assert!(matches!(self.def(def), TypeDef::Interface(_)));
        Type::Nominal(NominalType::Interface(InterfaceType { def, args }))
    }

    pub fn enum_type(&self, def: TypeDefId) -> Type {
        let underlying = match self.def(def) {
            TypeDef::Enum(e) => e.underlying,
            _ => unreachable!("enum_type on non-enum def"),
        };
        Type::Nominal(NominalType::Enum(EnumType { def, underlying }))
    }

    fn def(&self, id: TypeDefId) -> &TypeDef {
        &self.defs[id.0 as usize]
    }

    fn def_name(&self, id: TypeDefId) -> &str {
        match self.def(id) {
            TypeDef::Class(c) => &c.name,
            TypeDef::Interface(i) => &i.name,
            TypeDef::Enum(e) => &e.name,
        }
    }

    /// Walk the base-class chain from `derived` looking for `base`.
    fn is_base_class_of(&self, base: TypeDefId, derived: TypeDefId) -> bool {
        let mut current = derived;
        loop {
            if current == base {
                return true;
            }
            match self.def(current) {
                TypeDef::Class(c) => match c.base {
                    Some(next) => current = next,
                    None => return false,
                },
                _ => return false,
            }
        }
    }

    /// All interface defs reachable from `iface` via extends, inclusive.
    fn interface_closure(&self, iface: TypeDefId) -> FxHashSet<TypeDefId> {
        let mut out = FxHashSet::default();
        let mut work = vec![iface];
        while let Some(id) = work.pop() {
            if !out.insert(id) {
                continue;
            }
            if let TypeDef::Interface(i) = self.def(id) {
                work.extend(i.extends.iter().copied());
            }
        }
        out
    }

    /// Whether `class` (or any base of it) implements `iface` (or a
    /// descendant of it).
    fn class_implements(&self, class: TypeDefId, iface: TypeDefId) -> bool {
        let mut current = Some(class);
        while let Some(id) = current {
            let c = match self.def(id) {
                TypeDef::Class(c) => c,
                _ => return false,
            };
            for implemented in &c.implements {
                if self.interface_closure(*implemented).contains(&iface) {
                    return true;
                }
            }
            current = c.base;
        }
        false
    }

    fn is_sealed(&self, class: TypeDefId) -> bool {
        matches!(self.def(class), TypeDef::Class(c) if c.sealed)
    }

    fn classify_interface_pair(&self, from: &InterfaceType, to: &InterfaceType) -> ConversionKind {
        if from.def == to.def {
            // Same definition: compare type arguments by declared variance.
            let variance = match self.def(from.def) {
                TypeDef::Interface(i) => &i.variance,
                _ => unreachable!(),
            };
            let mut implicit = true;
            for (idx, (a, b)) in from.args.iter().zip(to.args.iter()).enumerate() {
                let v = variance.get(idx).copied().unwrap_or(Variance::Invariant);
                let ok = match v {
                    Variance::Invariant => a == b,
                    Variance::Covariant => self.classify_conversion(a, b).is_implicit(),
                };
                if !ok {
                    implicit = false;
                    break;
                }
            }
            if implicit {
                return ConversionKind::ImplicitReference;
            }
            // Differently-instantiated values are still interface-typed;
            // a runtime test can distinguish them.
            return ConversionKind::ExplicitReference;
        }
        if self.interface_closure(from.def).contains(&to.def) {
            // Extends relationship, arity-erased: Sequence<T> -> Sequence.
            return ConversionKind::ImplicitReference;
        }
        // Unrelated interfaces: some class may implement both.
        ConversionKind::ExplicitReference
    }
}

impl TypeEnv for TypeRegistry {
    fn classify_conversion(&self, from: &Type, to: &Type) -> ConversionKind {
        use ConversionKind::*;

        if from == to {
            return Identity;
        }
        // Error types convert everywhere so recovery never cascades.
        if from.is_error() || to.is_error() {
            return Identity;
        }

        // Nullable lifting and unwrapping.
        if let Type::Nullable(inner) = to {
            if from == inner.as_ref() {
                return ImplicitNullable;
            }
            if from.is_value_type() && self.classify_conversion(from, inner).is_implicit() {
                return ImplicitNullable;
            }
        }
        if let Type::Nullable(inner) = from {
            if *to == Type::Object {
                // Boxes to the underlying value, or to a null reference.
                return Boxing;
            }
            if self.classify_conversion(inner, to).exists() {
                return ExplicitNullable;
            }
            return Incompatible;
        }

        if *to == Type::Object {
            return if from.is_value_type() || matches!(from, Type::TypeParam { .. }) {
                Boxing
            } else {
                ImplicitReference
            };
        }
        if *from == Type::Object {
            return if to.is_value_type() { Unboxing } else { ExplicitReference };
        }

        match (from, to) {
            (Type::Primitive(a), Type::Primitive(b)) => {
                if a.widens_to(b) {
                    ImplicitNumeric
                } else if a.is_numeric() && b.is_numeric()
                    || *a == PrimitiveType::Char && b.is_numeric()
                    || a.is_numeric() && *b == PrimitiveType::Char
                {
                    ExplicitNumeric
                } else {
                    Incompatible
                }
            }

            (Type::Nominal(NominalType::Enum(_)), Type::Primitive(p)) => {
                if p.is_numeric() || *p == PrimitiveType::Char {
                    ExplicitNumeric
                } else {
                    Incompatible
                }
            }
            (Type::Primitive(p), Type::Nominal(NominalType::Enum(_))) => {
                if p.is_numeric() || *p == PrimitiveType::Char {
                    ExplicitNumeric
                } else {
                    Incompatible
                }
            }

            (Type::Nominal(NominalType::Class(a)), Type::Nominal(NominalType::Class(b))) => {
                if a.def == b.def {
                    // Same definition, different args: invariant.
                    Incompatible
                } else if self.is_base_class_of(b.def, a.def) {
                    ImplicitReference
                } else if self.is_base_class_of(a.def, b.def) {
                    ExplicitReference
                } else {
                    Incompatible
                }
            }

            (Type::Nominal(NominalType::Class(c)), Type::Nominal(NominalType::Interface(i))) => {
                if self.class_implements(c.def, i.def) {
                    ImplicitReference
                } else if !self.is_sealed(c.def) {
                    // A derived class might implement it.
                    ExplicitReference
                } else {
                    Incompatible
                }
            }
            (Type::Nominal(NominalType::Interface(i)), Type::Nominal(NominalType::Class(c))) => {
                if self.class_implements(c.def, i.def) || !self.is_sealed(c.def) {
                    ExplicitReference
                } else {
                    Incompatible
                }
            }

            (
                Type::Nominal(NominalType::Interface(a)),
                Type::Nominal(NominalType::Interface(b)),
            ) => self.classify_interface_pair(a, b),

            (Type::TypeParam { bound, .. }, other) => {
                if let Some(b) = bound {
                    if self.classify_conversion(b, other).is_implicit() {
                        return ImplicitReference;
                    }
                }
                ExplicitReference
            }
            (_, Type::TypeParam { .. }) => ExplicitReference,

            _ => Incompatible,
        }
    }

    fn display(&self, ty: &Type) -> String {
        match ty {
            Type::Primitive(p) => p.name().to_string(),
            Type::Object => "object".to_string(),
            Type::Error => "<error>".to_string(),
            Type::Nullable(inner) => format!("{}?", self.display(inner)),
            Type::TypeParam { id, .. } => format!("T{}", id),
            Type::Nominal(n) => {
                let name = self.def_name(n.type_def_id());
                let args = n.type_args();
                if args.is_empty() {
                    name.to_string()
                } else {
                    let rendered: Vec<String> = args.iter().map(|a| self.display(a)).collect();
                    format!("{}<{}>", name, rendered.join(", "))
                }
            }
        }
    }
}
