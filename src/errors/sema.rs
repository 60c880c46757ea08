// src/errors/sema.rs
//! Semantic analysis errors (E2xxx) and warnings (W3xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum SemanticError {
    #[error("the switch contains multiple cases with the label value '{label}'")]
    #[diagnostic(code(E2050))]
    DuplicateLabel {
        label: String,
        #[label("duplicate case label")]
        span: SourceSpan,
        #[label("first occurrence here")]
        first: SourceSpan,
    },

    #[error("the switch case is unreachable: it has already been handled by a previous case or it is impossible to match")]
    #[diagnostic(code(E2051))]
    SubsumedPattern {
        #[label("unreachable case")]
        span: SourceSpan,
    },

    #[error("pattern type mismatch: a value of type '{scrutinee}' can never match '{pattern}'")]
    #[diagnostic(code(E2052))]
    PatternTypeMismatch {
        scrutinee: String,
        pattern: String,
        #[label("impossible given the scrutinee type")]
        span: SourceSpan,
    },

    #[error("constant value '{value}' cannot be represented in type '{ty}'")]
    #[diagnostic(code(E2053))]
    ConstantOutOfRange {
        value: String,
        ty: String,
        #[label("out of range for the scrutinee type")]
        span: SourceSpan,
    },

    #[error("a pattern variable named '{name}' is already in scope")]
    #[diagnostic(
        code(E2054),
        help("each pattern variable must have a name distinct from every local visible at the pattern")
    )]
    DuplicateBindingName {
        name: String,
        #[label("name already bound")]
        span: SourceSpan,
    },

    #[error("a pattern variable cannot have the nullable type '{ty}'")]
    #[diagnostic(
        code(E2055),
        help("test the underlying type instead; a successful type test never produces an unset value")
    )]
    InvalidNullableBindingType {
        ty: String,
        #[label("nullable binding type")]
        span: SourceSpan,
    },
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum SemanticWarning {
    #[error("unreachable case body")]
    #[diagnostic(code(W3010))]
    UnreachableArmBody {
        #[label("this body can never execute")]
        span: SourceSpan,
    },

    #[error("'goto case' label value '{label}' does not convert to the governing type '{ty}'")]
    #[diagnostic(
        code(W3011),
        help("the jump target is resolved as if the label value were converted to '{ty}'")
    )]
    GotoCaseShouldConvert {
        label: String,
        ty: String,
        #[label("label type differs from the governing type")]
        span: SourceSpan,
    },
}
