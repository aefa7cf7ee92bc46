//! # Introduction
//!
//! In-class demonstrations of how a program's objects are laid out, found
//! and released:
//!
//! 1. [`dispatch`] — an abstract [`dispatch::Speaker`] with one variant,
//!    [`dispatch::Cow`], called through a trait object and statically.
//! 2. [`storage`] — one value of each storage duration (static, automatic,
//!    heap) with the heap cell released by its scoped owner.
//! 3. [`memory`] — a virtual storage model (globals, call stack, heap with
//!    tombstones) that [`storage::trace_demo`] replays the storage demo on,
//!    recording [`snapshot::MemorySnapshot`]s.
//! 4. [`interpreter`] — a tree-walking interpreter for a tiny statement
//!    language, with the factorial program as a reference.
//! 5. [`parser`] — a recursive descent recognizer for a textbook grammar.
//!
//! ## Pipeline of the storage trace
//!
//! ```text
//! define global → push main → push demo → declare bar → malloc baz
//!               → free baz, pop demo → pop main → leak check
//! ```
//!
//! Limits for every component live in [`config`].

pub mod config;
pub mod dispatch;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod storage;
