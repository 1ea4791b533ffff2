use super::newick::read_tree_file;
use crate::error::{ReportError, Result};
use crate::utils::natural_sort::natural_cmp;
use csv::ReaderBuilder;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Leaf names containing this marker are collapsed-node placeholders.
pub const INSERTED_MARKER: &str = "inserted";
/// Leaf names containing this marker stand for a separately drawn tree.
pub const SUBTREE_MARKER: &str = "subtree";

pub fn is_collapsed_placeholder(name: &str) -> bool {
    name.contains(INSERTED_MARKER)
}

pub fn is_subtree_placeholder(name: &str) -> bool {
    name.contains(SUBTREE_MARKER)
}

/// One `<stem>_<index>.tree` file and its membership companions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub id: String,
    pub index: u32,
    pub tree_path: PathBuf,
    pub membership_paths: Vec<PathBuf>,
}

/// Everything the tree directory says about which sequences are shown where.
#[derive(Debug, Clone, Default)]
pub struct TipScan {
    pub tree_name_stem: String,
    /// Trees in index order.
    pub trees: Vec<TreeEntry>,
    pub present_in_tree: Vec<String>,
    pub tip_to_tree: HashMap<String, String>,
    pub tree_to_all_tips: BTreeMap<String, Vec<String>>,
    pub inserted_node_membership: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    pub protected_sequences: BTreeSet<String>,
    /// Trees whose file could not be parsed; their tips are absent above.
    pub unreadable_trees: Vec<String>,
    present_lookup: HashSet<String>,
}

impl TipScan {
    pub fn is_present(&self, name: &str) -> bool {
        self.present_lookup.contains(name)
    }

    pub fn tree_of(&self, name: &str) -> Option<&str> {
        self.tip_to_tree.get(name).map(String::as_str)
    }

    pub fn collapsed_members(&self, tree: &str, node: &str) -> Option<&[String]> {
        self.inserted_node_membership
            .get(tree)
            .and_then(|nodes| nodes.get(node))
            .map(Vec::as_slice)
    }

    fn add_present(&mut self, name: &str) {
        if self.present_lookup.insert(name.to_string()) {
            self.present_in_tree.push(name.to_string());
        }
    }
}

/// Split `civet_12` into `("civet", 12)`.
pub fn split_tree_id(id: &str) -> Option<(&str, u32)> {
    let (stem, index) = id.rsplit_once('_')?;
    if stem.is_empty() {
        return None;
    }
    index.parse::<u32>().ok().map(|i| (stem, i))
}

/// Collect the tree files in `tree_dir`, requiring a single name stem.
pub fn find_trees(tree_dir: &Path) -> Result<(String, Vec<TreeEntry>)> {
    let mut trees: Vec<TreeEntry> = Vec::new();
    let mut memberships: Vec<(String, PathBuf)> = Vec::new();
    let mut stems: BTreeSet<String> = BTreeSet::new();

    for entry in WalkDir::new(tree_dir).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ReportError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let (Some(basename), Some(ext)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|s| s.to_str()),
        ) else {
            continue;
        };

        match ext {
            "tree" => {
                let (stem, index) =
                    split_tree_id(basename).ok_or_else(|| ReportError::TreeName(path.to_path_buf()))?;
                stems.insert(stem.to_string());
                trees.push(TreeEntry {
                    id: basename.to_string(),
                    index,
                    tree_path: path.to_path_buf(),
                    membership_paths: Vec::new(),
                });
            }
            "txt" => {
                let tree_id = basename.split('.').next().unwrap_or(basename);
                memberships.push((tree_id.to_string(), path.to_path_buf()));
            }
            _ => {}
        }
    }

    let stem = match stems.len() {
        0 => return Err(ReportError::NoTrees(tree_dir.to_path_buf())),
        1 => stems.into_iter().next().unwrap_or_default(),
        _ => {
            return Err(ReportError::MultipleTreeStems {
                path: tree_dir.to_path_buf(),
                stems: stems.into_iter().collect(),
            })
        }
    };

    for (tree_id, path) in memberships {
        match trees.iter_mut().find(|t| t.id == tree_id) {
            Some(tree) => tree.membership_paths.push(path),
            None => warn!("Ignoring membership file {} with no matching tree", path.display()),
        }
    }

    trees.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| natural_cmp(&a.id, &b.id)));
    Ok((stem, trees))
}

/// Read collapsed-node membership: tab separated, header row, node name
/// then comma-joined member names.
pub fn read_membership_file(path: &Path) -> Result<BTreeMap<String, Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut nodes = BTreeMap::new();
    for record in reader.records() {
        let record = record?;
        let Some(node) = record.get(0).map(str::trim).filter(|n| !n.is_empty()) else {
            continue;
        };
        let members: Vec<String> = record
            .get(1)
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
        nodes.insert(node.to_string(), members);
    }
    Ok(nodes)
}

/// Walk every tree and membership file in `tree_dir`.
pub fn scan_tree_dir(tree_dir: &Path) -> Result<TipScan> {
    let (stem, trees) = find_trees(tree_dir)?;
    let mut scan = TipScan {
        tree_name_stem: stem,
        ..TipScan::default()
    };

    for entry in &trees {
        let mut node_dict: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for path in &entry.membership_paths {
            node_dict.extend(read_membership_file(path)?);
        }

        let leaves = match read_tree_file(&entry.tree_path) {
            Ok(file) => file.tree.leaf_names(),
            Err(e) => {
                warn!("{}", e);
                scan.unreadable_trees.push(entry.id.clone());
                scan.inserted_node_membership.insert(entry.id.clone(), node_dict);
                continue;
            }
        };

        let mut all_tips: Vec<String> = Vec::new();
        for leaf in leaves {
            if is_collapsed_placeholder(&leaf) {
                let members = node_dict.get(&leaf).cloned().unwrap_or_default();
                if members.is_empty() {
                    debug!("Collapsed node {} in {} has no listed members", leaf, entry.id);
                }
                for member in members {
                    if !is_subtree_placeholder(&member) {
                        scan.add_present(&member);
                    }
                    all_tips.push(member);
                }
            } else if is_subtree_placeholder(&leaf) {
                all_tips.push(leaf);
            } else {
                scan.add_present(&leaf);
                scan.tip_to_tree.insert(leaf.clone(), entry.id.clone());
                scan.protected_sequences.insert(leaf.clone());
                all_tips.push(leaf);
            }
        }

        debug!("{}: {} tips after expanding collapsed nodes", entry.id, all_tips.len());
        scan.tree_to_all_tips.insert(entry.id.clone(), all_tips);
        scan.inserted_node_membership.insert(entry.id.clone(), node_dict);
    }

    scan.trees = trees;
    Ok(scan)
}
