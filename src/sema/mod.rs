// src/sema/mod.rs
pub mod bindings;
pub mod checker;
pub mod constant;
pub mod lower;
pub mod pattern;
pub mod value_space;

use rustc_hash::FxHashSet;
use tracing::trace;

pub use bindings::{bind_arm, Binding, Scope, Variable};
pub use checker::CheckOutcome;
pub use constant::{label_key, ComparisonKey, OutOfRange};
pub use lower::{CaseTest, DecisionSequence, DecisionStep, FloatWidth};
pub use pattern::{BodyId, CaseArm, ConstValue, Decimal, GuardId, Pattern, SwitchCase};
pub use value_space::{Intersection, ValueSpace};

use crate::errors::{SemanticError, SemanticWarning};
use crate::intern::Interner;
use crate::span::Span;
use crate::types::TypeEnv;

/// A type error wrapping a miette-enabled SemanticError
#[derive(Debug, Clone)]
pub struct TypeError {
    pub error: SemanticError,
    pub span: Span,
}

impl TypeError {
    /// Create a new type error
    pub fn new(error: SemanticError, span: Span) -> Self {
        Self { error, span }
    }
}

/// A warning wrapping a miette-enabled SemanticWarning
#[derive(Debug, Clone)]
pub struct TypeWarning {
    pub warning: SemanticWarning,
    pub span: Span,
}

impl TypeWarning {
    pub fn new(warning: SemanticWarning, span: Span) -> Self {
        Self { warning, span }
    }
}

/// Everything downstream phases need from one analyzed switch.
#[derive(Debug)]
pub struct SwitchAnalysis {
    pub decision: DecisionSequence,
    pub errors: Vec<TypeError>,
    pub warnings: Vec<TypeWarning>,
    /// Control cannot fall past the dispatch without entering a body
    pub has_default: bool,
}

/// Run the full switch pipeline: reachability, pattern variable
/// binding, then lowering to a decision sequence. Diagnostics never
/// abort the pipeline; an erroneous switch still lowers so later
/// phases have something to walk.
pub fn analyze_switch(
    case: &SwitchCase,
    env: &dyn TypeEnv,
    outer: &Scope,
    interner: &Interner,
) -> SwitchAnalysis {
    trace!(arms = case.arms.len(), "analyzing switch");

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let outcome = checker::SwitchChecker::new(env, &mut errors, &mut warnings).check(case);

    let mut results = Vec::with_capacity(case.arms.len());
    let mut group_names = FxHashSet::default();
    let mut current_group = None;
    for arm in &case.arms {
        if current_group != Some(arm.group) {
            group_names.clear();
            current_group = Some(arm.group);
        }
        results.push(bind_arm(
            arm,
            &case.scrutinee,
            outer,
            &mut group_names,
            interner,
            env,
            &mut errors,
        ));
    }

    let decision = lower::lower_switch(case, &outcome, results);

    SwitchAnalysis {
        decision,
        errors,
        warnings,
        has_default: outcome.has_default,
    }
}
