// src/sema/lower.rs
//
// Lowers a checked switch into a linear decision sequence. Dispatch
// evaluates reachable tests in source order and takes the first hit;
// every labeled arm keeps an entry point regardless of reachability so
// `goto case` can still target it.

use rustc_hash::FxHashMap;

use super::bindings::Binding;
use super::checker::CheckOutcome;
use super::constant::{label_key, ComparisonKey};
use super::pattern::{BodyId, ConstValue, GuardId, Pattern, SwitchCase};
use super::TypeWarning;
use crate::errors::SemanticWarning;
use crate::intern::Symbol;
use crate::span::Span;
use crate::types::{Type, TypeEnv};

/// Runtime test one decision step performs before entering its body.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseTest {
    /// Equality against a constant
    Eq(ConstValue),
    /// NaN label: runtime `==` never matches NaN, so the test is IsNaN
    Nan(FloatWidth),
    /// Runtime type test, binding on success
    Type(Type),
    /// Null check
    Null,
    /// Matches unconditionally
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    F32,
    F64,
}

/// One lowered arm. Unreachable steps are kept for their entry point
/// but never appear in the dispatch order.
#[derive(Debug, Clone)]
pub struct DecisionStep {
    pub arm_index: usize,
    pub test: CaseTest,
    pub binding: Option<Binding>,
    pub guard: Option<GuardId>,
    pub body: BodyId,
    pub reachable: bool,
}

/// The lowered form of one switch statement.
#[derive(Debug)]
pub struct DecisionSequence {
    scrutinee: Type,
    pub steps: Vec<DecisionStep>,
    /// Step indices evaluated at runtime, in source order
    pub dispatch: Vec<usize>,
    label_entries: FxHashMap<ComparisonKey, usize>,
    default_entry: Option<usize>,
}

pub(crate) fn lower_switch(
    case: &SwitchCase,
    outcome: &CheckOutcome,
    bindings: Vec<Option<Binding>>,
) -> DecisionSequence {
    let mut steps = Vec::with_capacity(case.arms.len());
    let mut dispatch = Vec::new();
    let mut label_entries = FxHashMap::default();
    let mut default_entry = None;

    for (idx, (arm, binding)) in case.arms.iter().zip(bindings).enumerate() {
        let test = match &arm.pattern {
            Pattern::Constant { value, .. } => match value {
                ConstValue::F32(v) if v.is_nan() => CaseTest::Nan(FloatWidth::F32),
                ConstValue::F64(v) if v.is_nan() => CaseTest::Nan(FloatWidth::F64),
                _ => CaseTest::Eq(value.clone()),
            },
            Pattern::Type { tested, .. } => CaseTest::Type(tested.clone()),
            Pattern::Null => CaseTest::Null,
            Pattern::Var { .. } | Pattern::Discard => CaseTest::Always,
        };

        let reachable = outcome.reachable[idx];
        if reachable {
            dispatch.push(idx);
        }

        if arm.guard.is_none() {
            if let Pattern::Constant { value, .. } = &arm.pattern {
                if let Ok(key) = label_key(value, &case.scrutinee) {
                    // First occurrence wins the entry point, even when
                    // the duplicate analysis already flagged the rest.
                    label_entries.entry(key).or_insert(idx);
                }
            }
            if matches!(arm.pattern, Pattern::Discard) && default_entry.is_none() {
                default_entry = Some(idx);
            }
        }

        steps.push(DecisionStep {
            arm_index: idx,
            test,
            binding,
            guard: arm.guard,
            body: arm.body,
            reachable,
        });
    }

    DecisionSequence {
        scrutinee: case.scrutinee.clone(),
        steps,
        dispatch,
        label_entries,
        default_entry,
    }
}

impl DecisionSequence {
    /// Step targeted by `goto case <value>`, if any label matches.
    pub fn entry_for_label(&self, value: &ConstValue) -> Option<usize> {
        let key = label_key(value, &self.scrutinee).ok()?;
        self.label_entries.get(&key).copied()
    }

    /// Step targeted by `goto default`, if a default arm exists.
    pub fn entry_for_default(&self) -> Option<usize> {
        self.default_entry
    }

    /// Resolve a `goto case` operand written at its own type. A value
    /// that does not implicitly convert to the governing type still
    /// resolves (or fails to find a target), but gets a warning either
    /// way so the jump is never silently off-type.
    pub fn resolve_goto_case(
        &self,
        value: &ConstValue,
        declared: &Type,
        env: &dyn TypeEnv,
        span: Span,
    ) -> (Option<usize>, Option<TypeWarning>) {
        let governing = self.scrutinee.underlying();
        let conv = env.classify_conversion(declared, governing);
        let warning = if !conv.is_implicit() {
            Some(TypeWarning::new(
                SemanticWarning::GotoCaseShouldConvert {
                    label: value.to_string(),
                    ty: env.display(governing),
                    span: span.into(),
                },
                span,
            ))
        } else {
            None
        };
        (self.entry_for_label(value), warning)
    }

    /// Assign each bound pattern variable a frame slot, keyed by the arm
    /// that declares it. Arms are independent scopes: the same name bound
    /// in two arms (possibly at different types) gets two slots, never
    /// one aliased storage location.
    pub fn binding_slots(&self) -> FxHashMap<(usize, Symbol), u32> {
        let mut slots = FxHashMap::default();
        let mut next = 0u32;
        for step in &self.steps {
            if let Some(binding) = &step.binding {
                slots.insert((step.arm_index, binding.name), next);
                next += 1;
            }
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::pattern::{CaseArm, SwitchCase};
    use crate::types::{PrimitiveType, TypeRegistry};

    fn span() -> Span {
        Span::new(0, 4, 1, 1)
    }

    fn int_case(values: &[i64]) -> SwitchCase {
        let arms = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                CaseArm::new(
                    Pattern::Constant {
                        value: ConstValue::Int(*v),
                        declared: Type::primitive(PrimitiveType::I32),
                    },
                    None,
                    BodyId(i as u32),
                    span(),
                )
                .in_group(i as u32)
            })
            .collect();
        SwitchCase {
            scrutinee: Type::primitive(PrimitiveType::I32),
            arms,
            span: span(),
        }
    }

    fn all_reachable(n: usize) -> CheckOutcome {
        CheckOutcome {
            reachable: vec![true; n],
            has_default: false,
        }
    }

    #[test]
    fn dispatch_preserves_source_order() {
        let case = int_case(&[3, 1, 2]);
        let seq = lower_switch(&case, &all_reachable(3), vec![None; 3]);

        assert_eq!(seq.dispatch, vec![0, 1, 2]);
        assert_eq!(seq.steps[0].test, CaseTest::Eq(ConstValue::Int(3)));
    }

    #[test]
    fn nan_label_lowers_to_nan_test() {
        let case = SwitchCase {
            scrutinee: Type::primitive(PrimitiveType::F64),
            arms: vec![CaseArm::new(
                Pattern::Constant {
                    value: ConstValue::F64(f64::NAN),
                    declared: Type::primitive(PrimitiveType::F64),
                },
                None,
                BodyId(0),
                span(),
            )],
            span: span(),
        };
        let seq = lower_switch(&case, &all_reachable(1), vec![None]);

        assert_eq!(seq.steps[0].test, CaseTest::Nan(FloatWidth::F64));
    }

    #[test]
    fn unreachable_arm_keeps_its_label_entry() {
        let mut case = int_case(&[1, 2]);
        // Insert a catch-all before the last label.
        case.arms.insert(
            1,
            CaseArm::new(Pattern::Discard, None, BodyId(9), span()).in_group(9),
        );
        let outcome = CheckOutcome {
            reachable: vec![true, true, false],
            has_default: true,
        };
        let seq = lower_switch(&case, &outcome, vec![None; 3]);

        assert_eq!(seq.dispatch, vec![0, 1]);
        assert_eq!(seq.entry_for_label(&ConstValue::Int(2)), Some(2));
        assert_eq!(seq.entry_for_default(), Some(1));
    }

    #[test]
    fn duplicate_labels_resolve_to_first_occurrence() {
        let case = int_case(&[1, 1]);
        let outcome = CheckOutcome {
            reachable: vec![true, false],
            has_default: false,
        };
        let seq = lower_switch(&case, &outcome, vec![None; 2]);

        assert_eq!(seq.entry_for_label(&ConstValue::Int(1)), Some(0));
    }

    #[test]
    fn goto_case_warns_on_explicit_conversion() {
        let registry = TypeRegistry::new();
        let case = int_case(&[1]);
        let seq = lower_switch(&case, &all_reachable(1), vec![None]);

        let (entry, warning) = seq.resolve_goto_case(
            &ConstValue::Int(1),
            &Type::primitive(PrimitiveType::I64),
            &registry,
            span(),
        );
        assert_eq!(entry, Some(0));
        let warning = warning.unwrap();
        assert!(matches!(
            warning.warning,
            SemanticWarning::GotoCaseShouldConvert { .. }
        ));

        let (entry, warning) = seq.resolve_goto_case(
            &ConstValue::Int(1),
            &Type::primitive(PrimitiveType::I32),
            &registry,
            span(),
        );
        assert_eq!(entry, Some(0));
        assert!(warning.is_none());
    }

    #[test]
    fn goto_case_warns_when_no_conversion_exists() {
        let registry = TypeRegistry::new();
        let case = int_case(&[1]);
        let seq = lower_switch(&case, &all_reachable(1), vec![None]);

        // A string-typed operand has no path to an i32 governing type;
        // the mismatch must still surface as a diagnostic.
        let (entry, warning) = seq.resolve_goto_case(
            &ConstValue::Str("one".to_string()),
            &Type::primitive(PrimitiveType::String),
            &registry,
            span(),
        );
        assert!(entry.is_none());
        assert!(matches!(
            warning.unwrap().warning,
            SemanticWarning::GotoCaseShouldConvert { .. }
        ));
    }

    #[test]
    fn binding_slots_are_dense_and_per_arm() {
        use crate::intern::Interner;
        use crate::sema::bindings::Binding;

        let mut interner = Interner::new();
        let x = interner.intern("x");
        let b = interner.intern("b");

        // Arms 0 and 2 both bind `x`, at different types: independent
        // scopes, so the two must not share storage.
        let case = int_case(&[1, 2, 3]);
        let bindings = vec![
            Some(Binding {
                name: x,
                ty: Type::primitive(PrimitiveType::I32),
            }),
            Some(Binding {
                name: b,
                ty: Type::primitive(PrimitiveType::I32),
            }),
            Some(Binding {
                name: x,
                ty: Type::Object,
            }),
        ];
        let seq = lower_switch(&case, &all_reachable(3), bindings);

        let slots = seq.binding_slots();
        assert_eq!(slots[&(0, x)], 0);
        assert_eq!(slots[&(1, b)], 1);
        assert_eq!(slots[&(2, x)], 2);
    }
}
