//! Relational steps via DuckDB
//!
//! Deduplication, the catalog join and the songplay ranking all run as SQL
//! over an in-memory DuckDB database loaded with the run's raw records.

mod engine;

pub use engine::QueryEngine;
