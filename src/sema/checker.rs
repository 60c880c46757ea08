// src/sema/checker.rs
//
// Subsumption and reachability analysis over the ordered arm list.
// Arms are visited left to right against a monotonically shrinking value
// space; diagnostics are appended as each arm is visited so their order
// follows source order. One bad arm never aborts analysis of the rest.

use rustc_hash::FxHashMap;
use tracing::trace;

use super::constant::{label_key, ComparisonKey};
use super::pattern::{CaseArm, Pattern, SwitchCase};
use super::value_space::{Intersection, ValueSpace};
use super::{TypeError, TypeWarning};
use crate::errors::{SemanticError, SemanticWarning};
use crate::span::Span;
use crate::types::convert::pattern_test_possible;
use crate::types::{Type, TypeEnv};

/// Reachability verdicts, indexed like the arm list.
#[derive(Debug)]
pub struct CheckOutcome {
    pub reachable: Vec<bool>,
    /// Control cannot fall out of the dispatch without matching
    pub has_default: bool,
}

pub(crate) struct SwitchChecker<'a> {
    env: &'a dyn TypeEnv,
    errors: &'a mut Vec<TypeError>,
    warnings: &'a mut Vec<TypeWarning>,
    /// First-occurrence span per unguarded constant label
    seen_labels: FxHashMap<ComparisonKey, Span>,
}

impl<'a> SwitchChecker<'a> {
    pub(crate) fn new(
        env: &'a dyn TypeEnv,
        errors: &'a mut Vec<TypeError>,
        warnings: &'a mut Vec<TypeWarning>,
    ) -> Self {
        Self {
            env,
            errors,
            warnings,
            seen_labels: FxHashMap::default(),
        }
    }

    fn add_error(&mut self, error: SemanticError, span: Span) {
        self.errors.push(TypeError::new(error, span));
    }

    fn add_warning(&mut self, warning: SemanticWarning, span: Span) {
        self.warnings.push(TypeWarning::new(warning, span));
    }

    pub(crate) fn check(&mut self, case: &SwitchCase) -> CheckOutcome {
        let mut space = ValueSpace::new(&case.scrutinee);
        let mut reachable = vec![true; case.arms.len()];
        let mut has_default = false;

        let mut i = 0;
        while i < case.arms.len() {
            // Labels sharing a group are alternatives feeding one body:
            // each is tested against the same snapshot, then all removed.
            let group = case.arms[i].group;
            let mut end = i + 1;
            while end < case.arms.len() && case.arms[end].group == group {
                end += 1;
            }

            let snapshot = space.clone();
            let mut any_subsumed_dead = false;

            for (idx, arm) in case.arms.iter().enumerate().take(end).skip(i) {
                let Some(inter) = self.check_arm(arm, &case.scrutinee, &snapshot) else {
                    // Statically invalid pattern; it takes no part in
                    // space bookkeeping.
                    reachable[idx] = false;
                    continue;
                };
                trace!(arm = idx, ?inter, "switch arm intersection");
                if inter == Intersection::Never {
                    self.add_error(
                        SemanticError::SubsumedPattern {
                            span: arm.span.into(),
                        },
                        arm.span,
                    );
                    reachable[idx] = false;
                    any_subsumed_dead = true;
                    continue;
                }
                if arm.guard.is_none() {
                    if inter == Intersection::Always {
                        has_default = true;
                    }
                    self.register_label(arm, &case.scrutinee);
                }
            }

            // Shrink once per group, after every label was tested.
            for idx in i..end {
                let arm = &case.arms[idx];
                if arm.guard.is_none() && reachable[idx] {
                    space.remove(&arm.pattern, self.env);
                }
            }

            if (i..end).all(|idx| !reachable[idx]) && any_subsumed_dead {
                let body_span = case.arms[end - 1].body_span;
                self.add_warning(
                    SemanticWarning::UnreachableArmBody {
                        span: body_span.into(),
                    },
                    body_span,
                );
            }

            i = end;
        }

        if space.is_empty() {
            has_default = true;
        }
        if case
            .arms
            .iter()
            .any(|arm| arm.pattern.is_catch_all() && arm.guard.is_none())
        {
            // Explicit default arm, even under error-type degrade.
            has_default = true;
        }

        CheckOutcome {
            reachable,
            has_default,
        }
    }

    /// Static validity plus space intersection for one arm. Emits the
    /// arm's own diagnostics; None means the pattern is statically
    /// invalid.
    fn check_arm(
        &mut self,
        arm: &CaseArm,
        scrutinee: &Type,
        snapshot: &ValueSpace,
    ) -> Option<Intersection> {
        match &arm.pattern {
            Pattern::Constant { value, declared } => {
                let conv = self
                    .env
                    .classify_conversion(declared, scrutinee.underlying());
                if !conv.exists() {
                    self.add_error(
                        SemanticError::PatternTypeMismatch {
                            scrutinee: self.env.display(scrutinee),
                            pattern: value.to_string(),
                            span: arm.span.into(),
                        },
                        arm.span,
                    );
                    return None;
                }
                let key = match label_key(value, scrutinee) {
                    Ok(key) => key,
                    Err(_) => {
                        self.add_error(
                            SemanticError::ConstantOutOfRange {
                                value: value.to_string(),
                                ty: self.env.display(scrutinee.underlying()),
                                span: arm.span.into(),
                            },
                            arm.span,
                        );
                        return None;
                    }
                };
                if arm.guard.is_none() {
                    if let Some(first) = self.seen_labels.get(&key) {
                        self.add_error(
                            SemanticError::DuplicateLabel {
                                label: value.to_string(),
                                span: arm.span.into(),
                                first: (*first).into(),
                            },
                            arm.span,
                        );
                    }
                }
            }
            Pattern::Null => {
                if !scrutinee.admits_null() {
                    self.add_error(
                        SemanticError::PatternTypeMismatch {
                            scrutinee: self.env.display(scrutinee),
                            pattern: "null".to_string(),
                            span: arm.span.into(),
                        },
                        arm.span,
                    );
                    return None;
                }
            }
            Pattern::Type { tested, .. } => {
                if !pattern_test_possible(self.env, scrutinee, tested) {
                    self.add_error(
                        SemanticError::PatternTypeMismatch {
                            scrutinee: self.env.display(scrutinee),
                            pattern: self.env.display(tested),
                            span: arm.span.into(),
                        },
                        arm.span,
                    );
                    return None;
                }
            }
            Pattern::Var { .. } | Pattern::Discard => {}
        }

        Some(snapshot.intersect(&arm.pattern, self.env))
    }

    /// Record an unguarded constant label's first occurrence.
    fn register_label(&mut self, arm: &CaseArm, scrutinee: &Type) {
        if let Pattern::Constant { value, .. } = &arm.pattern {
            if let Ok(key) = label_key(value, scrutinee) {
                self.seen_labels.entry(key).or_insert(arm.span);
            }
        }
    }
}
