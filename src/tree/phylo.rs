pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct PhyloNode {
    pub name: Option<String>,
    /// Branch length to the parent; 0.0 when the file gives none.
    pub length: f64,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Distance from the root, filled by [`PhyloTree::layout`].
    pub height: f64,
    /// Vertical position, filled by [`PhyloTree::layout`].
    pub y: f64,
}

impl PhyloNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Rooted tree stored as an arena of nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct PhyloTree {
    nodes: Vec<PhyloNode>,
    root: NodeId,
}

impl PhyloTree {
    pub(crate) fn with_root() -> Self {
        Self {
            nodes: vec![PhyloNode {
                name: None,
                length: 0.0,
                parent: None,
                children: Vec::new(),
                height: 0.0,
                y: 0.0,
            }],
            root: 0,
        }
    }

    pub(crate) fn add_child(&mut self, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(PhyloNode {
            name: None,
            length: 0.0,
            parent: Some(parent),
            children: Vec::new(),
            height: 0.0,
            y: 0.0,
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut PhyloNode {
        &mut self.nodes[id]
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &PhyloNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[PhyloNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Leaves in left-to-right (pre-order) order.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_leaf() {
                leaves.push(id);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        leaves
    }

    pub fn leaf_names(&self) -> Vec<String> {
        self.leaves()
            .into_iter()
            .map(|id| self.nodes[id].name_or_empty().to_string())
            .collect()
    }

    /// Assign heights (root at 0) and y positions (leaves 0, 1, 2, ...;
    /// internal nodes at the mean of their children).
    pub fn layout(&mut self) {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }

        for &id in &order {
            let height = match self.nodes[id].parent {
                Some(parent) => self.nodes[parent].height + self.nodes[id].length,
                None => 0.0,
            };
            self.nodes[id].height = height;
        }

        let mut next_y = 0.0;
        for &id in &order {
            if self.nodes[id].is_leaf() {
                self.nodes[id].y = next_y;
                next_y += 1.0;
            }
        }

        for &id in order.iter().rev() {
            let children = &self.nodes[id].children;
            if !children.is_empty() {
                let sum: f64 = children.iter().map(|&c| self.nodes[c].y).sum();
                let y = sum / children.len() as f64;
                self.nodes[id].y = y;
            }
        }
    }

    /// Largest root-to-node distance. Call after [`PhyloTree::layout`].
    pub fn tree_height(&self) -> f64 {
        self.nodes.iter().map(|n| n.height).fold(0.0, f64::max)
    }

    /// Put a new root above the current one, joined by a branch of
    /// `length`, and redo the layout. Gives the drawing a visible root line.
    pub fn add_root_stub(&mut self, length: f64) {
        let old_root = self.root;
        let new_root = self.nodes.len();
        self.nodes.push(PhyloNode {
            name: None,
            length: 0.0,
            parent: None,
            children: vec![old_root],
            height: 0.0,
            y: 0.0,
        });
        self.nodes[old_root].parent = Some(new_root);
        self.nodes[old_root].length = length;
        self.root = new_root;
        self.layout();
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::newick::parse_newick;

    #[test]
    fn layout_places_leaves_in_order_and_parents_at_the_mean() {
        let mut tree = parse_newick("((A:1,B:2):1,C:0.5);").unwrap();
        tree.layout();
        let names = tree.leaf_names();
        assert_eq!(names, vec!["A", "B", "C"]);

        let leaves = tree.leaves();
        let ys: Vec<f64> = leaves.iter().map(|&id| tree.node(id).y).collect();
        assert_eq!(ys, vec![0.0, 1.0, 2.0]);

        let a = tree.node(leaves[0]);
        let ab = tree.node(a.parent.unwrap());
        assert_eq!(ab.y, 0.5);
        assert_eq!(tree.node(tree.root()).y, (0.5 + 2.0) / 2.0);
        assert_eq!(tree.node(leaves[1]).height, 3.0);
        assert_eq!(tree.tree_height(), 3.0);
    }

    #[test]
    fn root_stub_shifts_every_height() {
        let mut tree = parse_newick("(A:1,B:1);").unwrap();
        tree.layout();
        tree.add_root_stub(0.5);
        assert_eq!(tree.tree_height(), 1.5);
        assert!(tree.node(tree.root()).parent.is_none());
        assert_eq!(tree.leaves().len(), 2);
    }
}
