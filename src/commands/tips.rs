use crate::tree::scan_tree_dir;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Print what a tree directory holds once collapsed nodes are expanded.
pub fn run(tree_dir: PathBuf) -> Result<()> {
    let scan = scan_tree_dir(&tree_dir)
        .with_context(|| format!("Failed to scan trees in {}", tree_dir.display()))?;

    println!("Tree name stem: {}", scan.tree_name_stem);
    println!("Trees: {}", scan.trees.len());
    println!("Sequences present: {}", scan.present_in_tree.len());
    println!("tree\ttips\tcollapsed_nodes\treadable");
    for entry in &scan.trees {
        let tips = scan.tree_to_all_tips.get(&entry.id).map_or(0, Vec::len);
        let collapsed = scan
            .inserted_node_membership
            .get(&entry.id)
            .map_or(0, |nodes| nodes.len());
        let readable = !scan.unreadable_trees.contains(&entry.id);
        println!("{}\t{}\t{}\t{}", entry.id, tips, collapsed, readable);
    }
    Ok(())
}
