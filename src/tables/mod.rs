//! Report tables built from the reconciled records.

mod context;
mod introductions;
mod qc;
mod queries;

pub use context::{context_table, ContextSummary};
pub use introductions::{new_introductions, query_lineages};
pub use qc::{describe_qc_failure, qc_fail_table};
pub use queries::{query_tables, QueryTables};

#[cfg(test)]
mod tests;
