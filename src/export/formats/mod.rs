pub mod node_summary;
pub mod run;

pub use node_summary::{NodeSummaryExport, TreeNodeSummary};
pub use run::RunExport;
