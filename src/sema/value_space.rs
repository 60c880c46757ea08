// src/sema/value_space.rs
//
// Static approximation of "values not yet definitely handled" for one
// switch, consulted arm by arm in source order. The space only ever
// shrinks; guarded arms never shrink it (a guard may fail at runtime).
//
// The approximation is exact for the boolean domain and for the null
// portion of nullable/reference domains. For everything else it tracks
// removed constant keys and removed subtype cones, which is sound in the
// "never falsely subsumed" direction and intentionally incomplete.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::constant::{label_key, ComparisonKey};
use super::pattern::Pattern;
use crate::types::convert::cone_covers;
use crate::types::{PrimitiveType, Type, TypeEnv};

/// Result of testing a pattern against the remaining value space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intersection {
    /// The pattern matches every remaining value
    Always,
    /// The pattern can match no remaining value
    Never,
    /// The pattern may match some remaining values
    Maybe,
}

#[derive(Debug, Clone)]
pub struct ValueSpace {
    scrutinee: Type,
    /// Scrutinee is an error type: approximation disabled, everything Maybe
    degraded: bool,
    /// Null is still unhandled (always false for domains without null)
    null_remaining: bool,
    /// Exact finite domain when the scalar domain is bool: (true, false)
    bools: Option<(bool, bool)>,
    /// The entire non-null portion has been handled
    non_null_removed: bool,
    removed_consts: FxHashSet<ComparisonKey>,
    removed_cones: SmallVec<[Type; 2]>,
}

impl ValueSpace {
    pub fn new(scrutinee: &Type) -> Self {
        let bools = match scrutinee.underlying() {
            Type::Primitive(PrimitiveType::Bool) => Some((true, true)),
            _ => None,
        };
        Self {
            degraded: scrutinee.is_error(),
            null_remaining: scrutinee.admits_null(),
            bools,
            non_null_removed: false,
            removed_consts: FxHashSet::default(),
            removed_cones: SmallVec::new(),
            scrutinee: scrutinee.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.degraded && self.non_null_removed && !self.null_remaining
    }

    pub fn null_remaining(&self) -> bool {
        self.null_remaining
    }

    /// Test a pattern against the remaining space without shrinking it.
    pub fn intersect(&self, pattern: &Pattern, env: &dyn TypeEnv) -> Intersection {
        if self.degraded {
            return Intersection::Maybe;
        }
        if self.is_empty() {
            return Intersection::Never;
        }

        match pattern {
            Pattern::Var { .. } | Pattern::Discard => Intersection::Always,

            Pattern::Null => {
                if !self.null_remaining {
                    Intersection::Never
                } else if self.non_null_removed {
                    // Only null is left; the null test is exact.
                    Intersection::Always
                } else {
                    Intersection::Maybe
                }
            }

            Pattern::Type { tested, .. } => {
                if self.non_null_removed {
                    // A type test never matches null, and null is all that remains.
                    return Intersection::Never;
                }
                if self
                    .removed_cones
                    .iter()
                    .any(|cone| cone_covers(env, tested, cone))
                {
                    return Intersection::Never;
                }
                if cone_covers(env, self.scrutinee.underlying(), tested) {
                    if self.null_remaining {
                        Intersection::Maybe
                    } else {
                        Intersection::Always
                    }
                } else {
                    Intersection::Maybe
                }
            }

            Pattern::Constant { value, declared } => {
                let Ok(key) = label_key(value, &self.scrutinee) else {
                    // Unrepresentable labels are rejected before space ops.
                    return Intersection::Never;
                };
                if let (Some((t, f)), ComparisonKey::Bool(b)) = (self.bools, &key) {
                    let (this, other) = if *b { (t, f) } else { (f, t) };
                    return if !this {
                        Intersection::Never
                    } else if !other && !self.null_remaining {
                        // The one remaining boolean value.
                        Intersection::Always
                    } else {
                        Intersection::Maybe
                    };
                }
                if self.removed_consts.contains(&key) {
                    return Intersection::Never;
                }
                if self
                    .removed_cones
                    .iter()
                    .any(|cone| cone_covers(env, declared, cone))
                {
                    // A removed type cone already handles every value of
                    // the label's type.
                    return Intersection::Never;
                }
                Intersection::Maybe
            }
        }
    }

    /// Shrink the space by an unguarded pattern. Callers skip this for
    /// guarded arms and for arms whose intersection was Never.
    pub fn remove(&mut self, pattern: &Pattern, env: &dyn TypeEnv) {
        if self.degraded {
            return;
        }
        match pattern {
            Pattern::Var { .. } | Pattern::Discard => {
                self.non_null_removed = true;
                self.null_remaining = false;
                self.bools = self.bools.map(|_| (false, false));
            }
            Pattern::Null => {
                self.null_remaining = false;
            }
            Pattern::Type { tested, .. } => {
                if cone_covers(env, self.scrutinee.underlying(), tested) {
                    self.non_null_removed = true;
                    self.bools = self.bools.map(|_| (false, false));
                }
                self.removed_cones.push(tested.clone());
            }
            Pattern::Constant { value, .. } => {
                let Ok(key) = label_key(value, &self.scrutinee) else {
                    return;
                };
                if let (Some((t, f)), ComparisonKey::Bool(b)) = (&mut self.bools, &key) {
                    if *b {
                        *t = false;
                    } else {
                        *f = false;
                    }
                    if !*t && !*f {
                        self.non_null_removed = true;
                    }
                    return;
                }
                self.removed_consts.insert(key);
            }
        }
    }
}
