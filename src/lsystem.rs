//! Main module for L-system rewriting
//!
//! The pipeline, bottom up:
//!
//! - [symbols]: the active and ignored alphabets
//! - [expression]: arithmetic in parameter lists
//! - [lexing]: phrases to axioms
//! - [production]: rules and their classic-syntax keys
//! - [context]: branch-aware neighborhood matching
//! - [resolver]: what one occurrence becomes
//! - [engine]: iteration and interpretation

pub mod axiom;
pub mod config;
pub mod context;
pub mod defines;
pub mod engine;
pub mod error;
pub mod expression;
pub mod formats;
pub mod lexing;
pub mod production;
pub mod resolver;
pub mod sampler;
pub mod symbols;
