pub mod newick;
pub mod phylo;
pub mod scanner;

pub use newick::{parse_newick, read_tree_file, TreeFile};
pub use phylo::{NodeId, PhyloNode, PhyloTree};
pub use scanner::{scan_tree_dir, TipScan, TreeEntry};
