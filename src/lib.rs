// src/lib.rs
pub mod errors;
pub mod intern;
pub mod sema;
pub mod span;
pub mod types;
