//! Fundamental loop discovery.
//!
//! For every unknown-current branch not yet covered by a loop, a search tree
//! is grown breadth-first from the first node the branch touches. Each tree
//! entry stores a signed, 1-based branch number (the sign is the incidence
//! sign at the node the branch was reached from) and the node it leads to.
//! Growing stops as soon as an entry repeats the root's branch: the path from
//! that entry's parent back to the root is the loop. Each node enters a tree
//! at most once, so the first closing path is a shortest one.
//!
//! Only unknown-current branches take part. Current-source branches never
//! appear in a loop because their current is already known.

use serde::Serialize;
use std::collections::VecDeque;
use tracing::debug;

use super::incidence::IncidenceMatrix;

/// Index into a `LoopTree` arena.
type TreeIndex = usize;

#[derive(Debug, Clone)]
struct TreeNode {
    branch: i64,
    node: usize,
    parent: Option<TreeIndex>,
    children: Vec<TreeIndex>,
}

/// Search tree stored as an arena; parents and children are indices.
#[derive(Debug, Clone)]
struct LoopTree {
    entries: Vec<TreeNode>,
}

impl LoopTree {
    fn with_root(branch: i64, node: usize) -> Self {
        Self {
            entries: vec![TreeNode {
                branch,
                node,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    fn push_child(&mut self, parent: TreeIndex, branch: i64, node: usize) -> TreeIndex {
        let index = self.entries.len();
        self.entries.push(TreeNode {
            branch,
            node,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.entries[parent].children.push(index);
        index
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Loops {
    loops: Vec<Vec<i64>>,
    /// Unknown-current branches that seeded a tree but closed no loop.
    discarded: Vec<usize>,
}

impl Loops {
    pub fn find(incidence: &IncidenceMatrix) -> Self {
        let unknown = incidence.unknown_count();
        let mut visited = vec![false; unknown];
        let mut loops = Vec::new();
        let mut discarded = Vec::new();

        for seed in 0..unknown {
            if visited[seed] {
                continue;
            }
            let Some((node, sign)) = incidence.first_incident(seed) else {
                visited[seed] = true;
                continue;
            };
            if incidence.node_with_sign(seed, -sign).is_none() {
                visited[seed] = true;
                discarded.push(seed);
                continue;
            }
            let root_branch = branch_number(seed, sign);
            let mut tree = LoopTree::with_root(root_branch, node);

            match grow(&mut tree, incidence, unknown) {
                Some(closing) => {
                    let path = trace_back(&tree, closing, root_branch);
                    for branch in &path {
                        visited[branch.unsigned_abs() as usize - 1] = true;
                    }
                    loops.push(path);
                }
                None => {
                    visited[seed] = true;
                    discarded.push(seed);
                }
            }
        }

        debug!(
            loop_count = loops.len(),
            discarded = discarded.len(),
            "loops found"
        );
        Self { loops, discarded }
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[i64]> {
        self.loops.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[i64]> {
        self.loops.iter().map(Vec::as_slice)
    }

    pub fn discarded(&self) -> &[usize] {
        &self.discarded
    }

    pub fn as_vecs(&self) -> &[Vec<i64>] {
        &self.loops
    }
}

#[inline]
fn branch_number(branch: usize, sign: i8) -> i64 {
    (branch as i64 + 1) * i64::from(sign)
}

/// Breadth-first growth; returns the entry that repeats the root's branch.
fn grow(tree: &mut LoopTree, incidence: &IncidenceMatrix, unknown: usize) -> Option<TreeIndex> {
    let root_branch = tree.entries[0].branch;
    let mut reached = vec![false; incidence.node_count()];
    reached[tree.entries[0].node] = true;
    let mut queue = VecDeque::from([0]);

    while let Some(current) = queue.pop_front() {
        let (current_branch, current_node) = {
            let entry = &tree.entries[current];
            (entry.branch, entry.node)
        };
        let arrived_by = current_branch.unsigned_abs() as usize - 1;

        for row in 0..unknown {
            if row == arrived_by {
                continue;
            }
            let sign = incidence.get(row, current_node);
            if sign == 0 {
                continue;
            }
            let Some(next) = incidence.node_with_sign(row, -sign) else {
                continue;
            };
            let branch = branch_number(row, incidence.get(row, next));
            if branch == root_branch {
                return Some(tree.push_child(current, branch, next));
            }
            if reached[next] {
                continue;
            }
            reached[next] = true;
            let child = tree.push_child(current, branch, next);
            queue.push_back(child);
        }
    }
    None
}

/// Collect negated branch numbers from the closing entry's parent up to the
/// root, then the root's own.
fn trace_back(tree: &LoopTree, closing: TreeIndex, root_branch: i64) -> Vec<i64> {
    let mut path = Vec::new();
    let mut cursor = tree.entries[closing].parent;
    while let Some(index) = cursor {
        let entry = &tree.entries[index];
        if entry.branch == root_branch {
            break;
        }
        path.push(-entry.branch);
        cursor = entry.parent;
    }
    path.push(-root_branch);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_node_loop() {
        // Two unknown branches between the same pair of nodes, one source.
        let inc = IncidenceMatrix::from_rows(vec![vec![-1, 1], vec![-1, 1], vec![1, -1]], 2);
        let loops = Loops::find(&inc);
        assert_eq!(loops.as_vecs(), &[vec![-2, 1]]);
        assert!(loops.discarded().is_empty());
    }

    #[test]
    fn test_parallel_bank_gives_one_loop_per_extra_branch() {
        let rows = vec![vec![-1, 1]; 4];
        let loops = Loops::find(&IncidenceMatrix::from_rows(rows, 4));
        assert_eq!(
            loops.as_vecs(),
            &[vec![-2, 1], vec![-1, 3], vec![-1, 4]]
        );
    }

    #[test]
    fn test_lone_unknown_branch_is_discarded() {
        // One unknown branch and two current sources on the same node pair.
        let inc = IncidenceMatrix::from_rows(vec![vec![-1, 1]; 3], 1);
        let loops = Loops::find(&inc);
        assert!(loops.is_empty());
        assert_eq!(loops.discarded(), &[0]);
    }

    #[test]
    fn test_branch_with_single_incidence_is_discarded() {
        // Branch 1 ends open: it only touches node 0.
        let inc = IncidenceMatrix::from_rows(vec![vec![-1, 1], vec![-1, 0], vec![1, -1]], 3);
        let loops = Loops::find(&inc);
        assert_eq!(loops.as_vecs(), &[vec![3, 1]]);
        assert_eq!(loops.discarded(), &[1]);
    }

    #[test]
    fn test_triangle() {
        // Nodes 0-1-2 joined by three branches in a ring.
        let inc = IncidenceMatrix::from_rows(
            vec![vec![-1, 1, 0], vec![0, -1, 1], vec![1, 0, -1]],
            3,
        );
        let loops = Loops::find(&inc);
        assert_eq!(loops.len(), 1);
        let mut members: Vec<i64> = loops.get(0).unwrap().iter().map(|b| b.abs()).collect();
        members.sort_unstable();
        assert_eq!(members, vec![1, 2, 3]);
    }

    /// One branch per node pair, oriented from the lower node.
    fn complete_mesh(nodes: usize) -> Vec<Vec<i8>> {
        let mut rows = Vec::new();
        for a in 0..nodes {
            for b in a + 1..nodes {
                let mut row = vec![0; nodes];
                row[a] = -1;
                row[b] = 1;
                rows.push(row);
            }
        }
        rows
    }

    #[test]
    fn test_tree_arena_links() {
        let mut tree = LoopTree::with_root(1, 0);
        let child = tree.push_child(0, -2, 1);
        let grandchild = tree.push_child(child, 3, 2);
        assert_eq!(tree.entries.len(), 3);
        assert_eq!(tree.entries[0].children, vec![child]);
        assert_eq!(tree.entries[grandchild].parent, Some(child));
        assert_eq!(trace_back(&tree, grandchild, 1), vec![2, -1]);
    }

    #[test]
    fn test_search_tree_holds_each_node_once() {
        let rows = complete_mesh(8);
        let unknown = rows.len();
        let inc = IncidenceMatrix::from_rows(rows, unknown);
        let (node, sign) = inc.first_incident(0).unwrap();
        let root_branch = branch_number(0, sign);
        let mut tree = LoopTree::with_root(root_branch, node);

        let closing = grow(&mut tree, &inc, unknown).unwrap();
        // Root, the seven other nodes, and the closing entry.
        assert_eq!(tree.entries.len(), 9);
        assert_eq!(trace_back(&tree, closing, root_branch), vec![8, -2, 1]);
    }

    #[test]
    fn test_dangling_seed_on_dense_mesh_is_discarded() {
        let mut dangling = vec![0; 10];
        dangling[0] = -1;
        let mut rows = vec![dangling];
        rows.extend(complete_mesh(10));
        let unknown = rows.len();

        let loops = Loops::find(&IncidenceMatrix::from_rows(rows, unknown));
        assert_eq!(loops.discarded(), &[0]);
        assert!(!loops.is_empty());
        for path in loops.iter() {
            assert!(path.len() >= 3);
            assert!(path.iter().all(|b| b.abs() != 1));
        }
    }
}
