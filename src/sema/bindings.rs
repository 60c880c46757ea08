// src/sema/bindings.rs
//
// Pattern variable introduction. Each arm introduces at most one
// variable; its scope is the arm body, nested under the enclosing
// lexical scope of the switch.

use rustc_hash::{FxHashMap, FxHashSet};

use super::pattern::{CaseArm, Pattern};
use super::TypeError;
use crate::errors::SemanticError;
use crate::intern::{Interner, Symbol};
use crate::types::{Type, TypeEnv};

/// A declared variable visible in some scope.
#[derive(Debug, Clone)]
pub struct Variable {
    pub ty: Type,
}

/// Lexical scope chain. Lookup walks outward through parents.
#[derive(Debug, Default)]
pub struct Scope {
    variables: FxHashMap<Symbol, Variable>,
    parent: Option<Box<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(self) -> Self {
        Self {
            variables: FxHashMap::default(),
            parent: Some(Box::new(self)),
        }
    }

    pub fn declare(&mut self, name: Symbol, ty: Type) {
        self.variables.insert(name, Variable { ty });
    }

    pub fn lookup(&self, name: Symbol) -> Option<&Variable> {
        match self.variables.get(&name) {
            Some(var) => Some(var),
            None => self.parent.as_ref().and_then(|p| p.lookup(name)),
        }
    }
}

/// A variable introduced by one arm's pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: Symbol,
    pub ty: Type,
}

/// Resolve the variable an arm's pattern introduces, if any.
///
/// A name that collides with the enclosing scope or with another label
/// of the same body is reported and rebound at the error type so later
/// lookups stay quiet.
pub fn bind_arm(
    arm: &CaseArm,
    scrutinee: &Type,
    outer: &Scope,
    group_names: &mut FxHashSet<Symbol>,
    interner: &Interner,
    env: &dyn TypeEnv,
    errors: &mut Vec<TypeError>,
) -> Option<Binding> {
    let (name, mut ty) = match &arm.pattern {
        Pattern::Type {
            tested,
            binding: Some(name),
        } => {
            if matches!(tested, Type::Nullable(_)) {
                errors.push(TypeError::new(
                    SemanticError::InvalidNullableBindingType {
                        ty: env.display(tested),
                        span: arm.span.into(),
                    },
                    arm.span,
                ));
                (*name, Type::Error)
            } else {
                (*name, tested.clone())
            }
        }
        Pattern::Var { binding } => (*binding, scrutinee.clone()),
        _ => return None,
    };

    if outer.lookup(name).is_some() || !group_names.insert(name) {
        errors.push(TypeError::new(
            SemanticError::DuplicateBindingName {
                name: interner.resolve(name).to_string(),
                span: arm.span.into(),
            },
            arm.span,
        ));
        ty = Type::Error;
    }

    Some(Binding { name, ty })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::pattern::{BodyId, CaseArm, Pattern};
    use crate::span::Span;
    use crate::types::{PrimitiveType, TypeRegistry};

    fn arm(pattern: Pattern) -> CaseArm {
        CaseArm::new(pattern, None, BodyId(0), Span::new(0, 4, 1, 1))
    }

    #[test]
    fn type_pattern_binds_at_tested_type() {
        let registry = TypeRegistry::new();
        let mut interner = Interner::new();
        let name = interner.intern("s");
        let outer = Scope::new();
        let mut group = FxHashSet::default();
        let mut errors = Vec::new();

        let binding = bind_arm(
            &arm(Pattern::Type {
                tested: Type::primitive(PrimitiveType::String),
                binding: Some(name),
            }),
            &Type::Object,
            &outer,
            &mut group,
            &interner,
            &registry,
            &mut errors,
        );

        assert!(errors.is_empty());
        assert_eq!(
            binding,
            Some(Binding {
                name,
                ty: Type::primitive(PrimitiveType::String)
            })
        );
    }

    #[test]
    fn var_pattern_binds_at_scrutinee_type() {
        let registry = TypeRegistry::new();
        let mut interner = Interner::new();
        let name = interner.intern("v");
        let outer = Scope::new();
        let mut group = FxHashSet::default();
        let mut errors = Vec::new();

        let scrutinee = Type::primitive(PrimitiveType::I32);
        let binding = bind_arm(
            &arm(Pattern::Var { binding: name }),
            &scrutinee,
            &outer,
            &mut group,
            &interner,
            &registry,
            &mut errors,
        )
        .unwrap();

        assert!(errors.is_empty());
        assert_eq!(binding.ty, scrutinee);
    }

    #[test]
    fn collision_with_enclosing_scope_is_reported() {
        let registry = TypeRegistry::new();
        let mut interner = Interner::new();
        let name = interner.intern("x");
        let mut outer = Scope::new();
        outer.declare(name, Type::primitive(PrimitiveType::I64));
        let mut group = FxHashSet::default();
        let mut errors = Vec::new();

        let binding = bind_arm(
            &arm(Pattern::Var { binding: name }),
            &Type::primitive(PrimitiveType::I32),
            &outer,
            &mut group,
            &interner,
            &registry,
            &mut errors,
        )
        .unwrap();

        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].error,
            SemanticError::DuplicateBindingName { .. }
        ));
        assert!(binding.ty.is_error());
    }

    #[test]
    fn collision_within_label_group_is_reported() {
        let registry = TypeRegistry::new();
        let mut interner = Interner::new();
        let name = interner.intern("n");
        let outer = Scope::new();
        let mut group = FxHashSet::default();
        let mut errors = Vec::new();

        let pattern = Pattern::Type {
            tested: Type::primitive(PrimitiveType::I32),
            binding: Some(name),
        };
        bind_arm(
            &arm(pattern.clone()),
            &Type::Object,
            &outer,
            &mut group,
            &interner,
            &registry,
            &mut errors,
        );
        let second = bind_arm(
            &arm(pattern),
            &Type::Object,
            &outer,
            &mut group,
            &interner,
            &registry,
            &mut errors,
        )
        .unwrap();

        assert_eq!(errors.len(), 1);
        assert!(second.ty.is_error());
    }

    #[test]
    fn nullable_tested_type_is_rejected() {
        let registry = TypeRegistry::new();
        let mut interner = Interner::new();
        let name = interner.intern("q");
        let outer = Scope::new();
        let mut group = FxHashSet::default();
        let mut errors = Vec::new();

        let binding = bind_arm(
            &arm(Pattern::Type {
                tested: Type::nullable(Type::primitive(PrimitiveType::I32)),
                binding: Some(name),
            }),
            &Type::Object,
            &outer,
            &mut group,
            &interner,
            &registry,
            &mut errors,
        )
        .unwrap();

        assert!(matches!(
            errors[0].error,
            SemanticError::InvalidNullableBindingType { .. }
        ));
        assert!(binding.ty.is_error());
    }
}
