//! # satenc - Building SAT Instances Programmatically
//!
//! `satenc` is a small library for constructing SAT and MaxSAT instances in
//! Rust, writing them in DIMACS format and handing them to an external solver
//! executable.
//!
//! - [`types`]: variables, literals, clauses and assignments
//! - [`instances`]: variable management, clause collections and the [`instances::Model`]
//! - [`encodings`]: clause helpers and cardinality encodings
//! - [`solvers`]: calling external solvers and interpreting their output
//!
//! ## Crate Features
//!
//! | Feature name | Description |
//! | --- | --- |
//! | `compression` | Reading and writing compressed input files based on the file extension. |
//! | `serde` | Serialization and deserialization of the data types. |
//! | `all` | All of the above. |
//!
//! ## Logging
//!
//! The library emits diagnostics through [`tracing`]. Install a subscriber,
//! e.g., from `tracing-subscriber`, to see them.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod encodings;
pub mod instances;
pub mod solvers;
pub mod types;
