//! Balanced Sequence Tree (BST-Seq): a height-balanced binary tree over a
//! sequence of elements, supporting split/merge/index, subtree size, and a
//! per-element boolean annotation with an output-sensitive scan.
//!
//! The merge/split algorithms below are ported from the reference AVL tree
//! (`AVLTree` in the Python original this crate's specification was distilled
//! from): merge-by-height with the two-branch `merge_left`/`merge_right`
//! recursion, and split-by-walking-up-the-parent-chain. Nodes live in an
//! arena and are addressed by `Idx`, following the teacher's `Lists::EMPTY`
//! sentinel convention rather than a generic `Option<Idx>` everywhere, since
//! that's the idiom this whole codebase already reaches for.

use std::fmt::{Debug, Formatter};

use debug_tree::{add_branch_to, add_leaf_to, AsTree, TreeBuilder};
use derivative::Derivative;

/// Index of a node inside a [`BstSeq`]'s arena. `NIL` stands for "no node".
pub type Idx = usize;

/// Sentinel for "no node". Mirrors the teacher's `Lists::EMPTY = usize::MAX`.
pub const NIL: Idx = usize::MAX;

fn idx_fmt(u: &Idx, f: &mut Formatter) -> std::fmt::Result {
    if *u == NIL {
        write!(f, "∅")
    } else {
        write!(f, "{u}")
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
struct Node<T> {
    value: T,
    #[derivative(Debug(format_with = "idx_fmt"))]
    left: Idx,
    #[derivative(Debug(format_with = "idx_fmt"))]
    right: Idx,
    #[derivative(Debug(format_with = "idx_fmt"))]
    parent: Idx,
    height: u32,
    size: usize,
    annotation: bool,
    subtree_annotation: bool,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            left: NIL,
            right: NIL,
            parent: NIL,
            height: 1,
            size: 1,
            annotation: false,
            subtree_annotation: false,
        }
    }
}

/// Arena of AVL-balanced sequences. Every node belongs to exactly one
/// sequence at a time; which sequence is determined by walking parent
/// pointers to the root.
pub struct BstSeq<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Debug for BstSeq<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let builder = TreeBuilder::new();
        add_branch_to!(builder, "BstSeq");
        for u in 0..self.nodes.len() {
            if self.nodes[u].parent == NIL {
                self.tree_dbg(u, &builder);
            }
        }
        writeln!(f, "{}", builder.string())
    }
}

impl<T> Default for BstSeq<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> BstSeq<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn tree_dbg<B: AsTree>(&self, u: Idx, tree: &B)
    where
        T: Debug,
    {
        let n = &self.nodes[u];
        if n.left != NIL {
            add_branch_to!(*tree, "left of {u}");
            self.tree_dbg(n.left, tree);
        }
        add_branch_to!(
            *tree,
            "[{u}] {:?} (h={}, sz={}, ann={}/{})",
            n.value,
            n.height,
            n.size,
            n.annotation,
            n.subtree_annotation
        );
        if n.right != NIL {
            self.tree_dbg(n.right, tree);
        } else {
            add_leaf_to!(*tree, "<end>");
        }
    }

    /// Creates a fresh standalone node holding `value`. Returns its index.
    pub fn create(&mut self, value: T) -> Idx {
        let idx = self.nodes.len();
        self.nodes.push(Node::new(value));
        idx
    }

    pub fn value(&self, u: Idx) -> &T {
        &self.nodes[u].value
    }

    fn height(&self, u: Idx) -> u32 {
        if u == NIL {
            0
        } else {
            self.nodes[u].height
        }
    }

    fn size(&self, u: Idx) -> usize {
        if u == NIL {
            0
        } else {
            self.nodes[u].size
        }
    }

    fn subtree_annotation(&self, u: Idx) -> bool {
        if u == NIL {
            false
        } else {
            self.nodes[u].subtree_annotation
        }
    }

    fn balance_factor(&self, u: Idx) -> i64 {
        if u == NIL {
            0
        } else {
            self.height(self.nodes[u].left) as i64 - self.height(self.nodes[u].right) as i64
        }
    }

    /// Root of the sequence containing `u`.
    pub fn root_of(&self, mut u: Idx) -> Idx {
        while self.nodes[u].parent != NIL {
            u = self.nodes[u].parent;
        }
        u
    }

    /// Number of nodes in the sequence containing `u`.
    pub fn len_of(&self, u: Idx) -> usize {
        self.size(self.root_of(u))
    }

    fn update_stats(&mut self, u: Idx) {
        if u == NIL {
            return;
        }
        let (l, r) = (self.nodes[u].left, self.nodes[u].right);
        self.nodes[u].height = 1 + self.height(l).max(self.height(r));
        self.nodes[u].size = 1 + self.size(l) + self.size(r);
        self.nodes[u].subtree_annotation =
            self.nodes[u].annotation || self.subtree_annotation(l) || self.subtree_annotation(r);
    }

    /// Detaches `u` from its parent (updating the parent's child slot and
    /// stats). A no-op on `NIL` or on a node that's already a root.
    fn cut_parent(&mut self, u: Idx) -> Idx {
        if u == NIL {
            return u;
        }
        let p = self.nodes[u].parent;
        if p != NIL {
            if self.nodes[p].left == u {
                self.nodes[p].left = NIL;
                self.update_stats(p);
            } else if self.nodes[p].right == u {
                self.nodes[p].right = NIL;
                self.update_stats(p);
            }
            self.nodes[u].parent = NIL;
        }
        u
    }

    /// Sets `u`'s left child, detaching the old one and the new one from
    /// wherever they were first. Recomputes `u`'s stats.
    fn set_left(&mut self, u: Idx, new_left: Idx) {
        if self.nodes[u].left != new_left {
            let old_left = self.nodes[u].left;
            self.cut_parent(old_left);
            self.cut_parent(new_left);
            self.nodes[u].left = new_left;
            if new_left != NIL {
                self.nodes[new_left].parent = u;
            }
        }
        self.update_stats(u);
    }

    fn set_right(&mut self, u: Idx, new_right: Idx) {
        if self.nodes[u].right != new_right {
            let old_right = self.nodes[u].right;
            self.cut_parent(old_right);
            self.cut_parent(new_right);
            self.nodes[u].right = new_right;
            if new_right != NIL {
                self.nodes[new_right].parent = u;
            }
        }
        self.update_stats(u);
    }

    fn rotate_right(&mut self, u: Idx) -> Idx {
        let child = self.nodes[u].left;
        debug_assert_ne!(child, NIL);
        self.set_left(u, self.nodes[child].right);
        self.set_right(child, u);
        self.update_stats(u);
        self.update_stats(child);
        child
    }

    fn rotate_left(&mut self, u: Idx) -> Idx {
        let child = self.nodes[u].right;
        debug_assert_ne!(child, NIL);
        self.set_right(u, self.nodes[child].left);
        self.set_left(child, u);
        self.update_stats(u);
        self.update_stats(child);
        child
    }

    /// `left` is taller than `right` by more than one; walk down `left`'s
    /// right spine until heights are within one of each other, attach `mid`
    /// as the pivot there, then rebalance by at most one (possibly double)
    /// rotation on the way back up.
    fn merge_left(&mut self, left: Idx, mid: Idx, right: Idx) -> Idx {
        if self.height(left) > self.height(right) + 1 {
            let new_right = self.merge_left(self.nodes[left].right, mid, right);
            self.set_right(left, new_right);
            if self.balance_factor(left) < -1 {
                let rc = self.nodes[left].right;
                if self.balance_factor(rc) < 0 {
                    return self.rotate_left(left);
                }
                let new_rc = self.rotate_right(rc);
                self.set_right(left, new_rc);
                return self.rotate_left(left);
            }
            left
        } else {
            self.set_left(mid, left);
            self.set_right(mid, right);
            mid
        }
    }

    fn merge_right(&mut self, left: Idx, mid: Idx, right: Idx) -> Idx {
        if self.height(right) > self.height(left) + 1 {
            let new_left = self.merge_right(left, mid, self.nodes[right].left);
            self.set_left(right, new_left);
            if self.balance_factor(right) > 1 {
                let lc = self.nodes[right].left;
                if self.balance_factor(lc) > 0 {
                    return self.rotate_right(right);
                }
                let new_lc = self.rotate_left(lc);
                self.set_left(right, new_lc);
                return self.rotate_right(right);
            }
            right
        } else {
            self.set_left(mid, left);
            self.set_right(mid, right);
            mid
        }
    }

    /// Concatenates `left`, the single pivot node `mid`, and `right` into one
    /// sequence, in that order. `mid` must currently be a standalone node
    /// (it is forcibly detached from any children it has first). Returns the
    /// new root. O(log n).
    pub fn merge(&mut self, left: Idx, mid: Idx, right: Idx) -> Idx {
        self.set_left(mid, NIL);
        self.set_right(mid, NIL);
        let root = if self.height(left) > self.height(right) + 1 {
            self.merge_left(left, mid, right)
        } else if self.height(right) > self.height(left) + 1 {
            self.merge_right(left, mid, right)
        } else {
            self.set_left(mid, left);
            self.set_right(mid, right);
            mid
        };
        self.cut_parent(root)
    }

    pub fn push_front(&mut self, node: Idx, tree: Idx) -> Idx {
        self.merge(NIL, node, tree)
    }

    pub fn push_back(&mut self, tree: Idx, node: Idx) -> Idx {
        self.merge(tree, node, NIL)
    }

    /// Removes the leftmost element and returns `(element, rest)`.
    /// Panics if `tree` is `NIL`.
    pub fn pop_front(&mut self, tree: Idx) -> (Idx, Idx) {
        assert_ne!(tree, NIL, "pop_front on empty sequence");
        let mut leftmost = tree;
        while self.nodes[leftmost].left != NIL {
            leftmost = self.nodes[leftmost].left;
        }
        let (_, mid, right) = self.split(leftmost);
        (mid, right)
    }

    /// Removes the rightmost element and returns `(rest, element)`.
    /// Panics if `tree` is `NIL`.
    pub fn pop_back(&mut self, tree: Idx) -> (Idx, Idx) {
        assert_ne!(tree, NIL, "pop_back on empty sequence");
        let mut rightmost = tree;
        while self.nodes[rightmost].right != NIL {
            rightmost = self.nodes[rightmost].right;
        }
        let (left, mid, _) = self.split(rightmost);
        (left, mid)
    }

    /// Removes `mid` from its sequence. Returns `(left, mid, right)`: the
    /// sequences before and after `mid`, plus `mid` itself (now standalone).
    /// O(log n).
    pub fn split(&mut self, mid: Idx) -> (Idx, Idx, Idx) {
        if mid == NIL {
            return (NIL, NIL, NIL);
        }
        // Walk up recording, for each ancestor, whether `mid`'s side was that
        // ancestor's right child (in which case the ancestor belongs to the
        // left half once split) or left child (ancestor belongs to the right
        // half).
        let mut ancestor_splits: Vec<(Idx, bool)> = Vec::new();
        let mut cur = mid;
        while self.nodes[cur].parent != NIL {
            let child = cur;
            let parent = self.nodes[child].parent;
            let child_was_right = self.nodes[parent].right == child;
            cur = parent;
            ancestor_splits.push((cur, child_was_right));
        }
        let node_left = self.nodes[mid].left;
        let node_right = self.nodes[mid].right;
        let node = self.cut_parent(mid);
        let mut left = self.cut_parent(node_left);
        let mut right = self.cut_parent(node_right);
        for (anc, child_was_right) in ancestor_splits {
            self.cut_parent(anc);
            if child_was_right {
                let anc_left = self.cut_parent(self.nodes[anc].left);
                left = self.merge(anc_left, anc, left);
            } else {
                let anc_right = self.cut_parent(self.nodes[anc].right);
                right = self.merge(right, anc, anc_right);
            }
        }
        (left, node, right)
    }

    /// The i-th element (0-indexed) of the sequence containing `root`, or
    /// `None` if out of range.
    pub fn index(&self, mut u: Idx, mut i: usize) -> Option<Idx> {
        loop {
            if u == NIL {
                return None;
            }
            let lsize = self.size(self.nodes[u].left);
            if i < lsize {
                u = self.nodes[u].left;
            } else if i == lsize {
                return Some(u);
            } else {
                i -= lsize + 1;
                u = self.nodes[u].right;
            }
        }
    }

    /// Materialized in-order traversal of the sequence containing `root`.
    pub fn inorder(&self, root: Idx) -> Vec<&T> {
        let mut result = Vec::with_capacity(self.size(root));
        let mut stack = Vec::new();
        let mut cur = root;
        while cur != NIL || !stack.is_empty() {
            while cur != NIL {
                stack.push(cur);
                cur = self.nodes[cur].left;
            }
            cur = stack.pop().unwrap();
            result.push(&self.nodes[cur].value);
            cur = self.nodes[cur].right;
        }
        result
    }

    /// Sets `u`'s annotation bit and refreshes `subtree_annotation` up the
    /// parent chain, stopping as soon as an ancestor's aggregate doesn't
    /// change (or the root is reached).
    pub fn set_annotation(&mut self, u: Idx, flag: bool) {
        self.nodes[u].annotation = flag;
        let mut cur = u;
        loop {
            let (l, r) = (self.nodes[cur].left, self.nodes[cur].right);
            let new_val =
                self.nodes[cur].annotation || self.subtree_annotation(l) || self.subtree_annotation(r);
            let changed = self.nodes[cur].subtree_annotation != new_val;
            self.nodes[cur].subtree_annotation = new_val;
            if !changed {
                break;
            }
            let p = self.nodes[cur].parent;
            if p == NIL {
                break;
            }
            cur = p;
        }
    }

    pub fn annotation(&self, u: Idx) -> bool {
        self.nodes[u].annotation
    }

    /// Enumerates every node with its annotation bit set in the sequence
    /// rooted at `root`, pruning whole subtrees via `subtree_annotation`.
    /// O((k+1) log n) for k results.
    pub fn annotated_nodes(&self, root: Idx) -> Vec<Idx> {
        let mut out = Vec::new();
        self.collect_annotated(root, &mut out);
        out
    }

    fn collect_annotated(&self, u: Idx, out: &mut Vec<Idx>) {
        if u == NIL || !self.nodes[u].subtree_annotation {
            return;
        }
        self.collect_annotated(self.nodes[u].left, out);
        if self.nodes[u].annotation {
            out.push(u);
        }
        self.collect_annotated(self.nodes[u].right, out);
    }

    /// Renders the sequence containing `root` as an indented ASCII tree, for
    /// interactive debugging.
    pub fn render(&self, root: Idx) -> String
    where
        T: Debug,
    {
        let builder = TreeBuilder::new();
        if root == NIL {
            add_leaf_to!(builder, "<empty>");
        } else {
            self.tree_dbg(root, &builder);
        }
        builder.string()
    }

    /// Walks every reachable node and checks the invariants listed in the
    /// specification: AVL balance, correct height/size/subtree_annotation,
    /// and parent-pointer consistency. Intended for tests.
    pub fn validate_structure(&self, root: Idx) {
        if root == NIL {
            return;
        }
        let n = &self.nodes[root];
        self.validate_structure(n.left);
        self.validate_structure(n.right);
        assert_eq!(n.height, 1 + self.height(n.left).max(self.height(n.right)));
        assert_eq!(n.size, 1 + self.size(n.left) + self.size(n.right));
        assert_eq!(
            n.subtree_annotation,
            n.annotation || self.subtree_annotation(n.left) || self.subtree_annotation(n.right)
        );
        let bf = self.balance_factor(root);
        assert!((-1..=1).contains(&bf), "unbalanced node {root}: bf={bf}");
        if n.left != NIL {
            assert_eq!(self.nodes[n.left].parent, root);
        }
        if n.right != NIL {
            assert_eq!(self.nodes[n.right].parent, root);
        }
    }
}
