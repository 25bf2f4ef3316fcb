use crate::error::{Error, Result};
use crate::tree::node::{Node, NodeId, ROOT};

/// The end of the longest suffix that did not require explicit insertion,
/// carried between extensions.
///
/// With `length == 0` the active point *is* `node` and `edge` is unused.
/// With `length > 0` the point sits `length` symbols down the outgoing
/// edge of `node` whose first symbol is `text[edge]`, and `length` is
/// strictly less than that edge's length (a point at the far end is
/// normalized onto the child).
#[derive(Debug, Clone, Copy)]
struct ActivePoint {
    node: NodeId,
    /// Input index whose symbol keys the active edge
    edge: usize,
    length: usize,
}

impl ActivePoint {
    fn at(node: NodeId) -> Self {
        Self {
            node,
            edge: 0,
            length: 0,
        }
    }
}

/// A compressed suffix tree over a single input string, built online by
/// Ukkonen's algorithm.
///
/// Time complexity: O(n) for construction, O(m) per query of length m.
/// Space complexity: O(n) — at most `2n` nodes for an input of length n.
///
/// No sentinel terminator is appended, so some suffixes remain implicit
/// (they end in the middle of an edge) and [`find`](Self::find) reports
/// every substring of the input as present, not only suffixes. Callers
/// that need suffix-only queries should append a symbol of their own that
/// does not occur in the input.
///
/// # Example
/// ```
/// use ukkonen::tree::SuffixTree;
///
/// let mut tree = SuffixTree::new("savannas");
/// tree.build().unwrap();
///
/// assert!(tree.find("nas").unwrap());
/// assert!(!tree.find("sana").unwrap());
/// ```
pub struct SuffixTree {
    /// The input, stored as characters
    text: Vec<char>,

    /// Arena of all nodes; a node's id is its index here
    nodes: Vec<Node>,

    /// Global end: every open leaf edge runs to this index. Advances once
    /// per phase, which is what extends all leaf edges in O(1).
    end: usize,

    /// Where the previous extension left off
    active: ActivePoint,

    /// First suffix index not yet carried by its own leaf. Extensions of a
    /// phase resume here; everything below it is a leaf that grows through
    /// the global end.
    next_extension: usize,

    /// Internal node created by the most recent split, awaiting its suffix
    /// link; resolved in the following extension
    pending_link: Option<NodeId>,

    built: bool,
}

impl SuffixTree {
    /// Binds the input and initializes a tree containing only the root.
    /// Call [`build`](Self::build) before querying.
    pub fn new<S: AsRef<str>>(input: S) -> Self {
        let text: Vec<char> = input.as_ref().chars().collect();
        let mut nodes = Vec::with_capacity(2 * text.len().max(1));
        nodes.push(Node::root());

        Self {
            text,
            nodes,
            end: 0,
            active: ActivePoint::at(ROOT),
            next_extension: 0,
            pending_link: None,
            built: false,
        }
    }

    /// Runs Ukkonen's algorithm, one phase per input symbol.
    ///
    /// # Errors
    /// * `Error::AlreadyBuilt` if the tree was built before; construction
    ///   is one-shot per instance.
    pub fn build(&mut self) -> Result<()> {
        if self.built {
            return Err(Error::already_built());
        }
        for phase in 0..self.text.len() {
            self.extend_phase(phase);
        }
        self.built = true;
        Ok(())
    }

    /// Returns whether [`build`](Self::build) has completed.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Returns whether `query` occurs as a substring of the input, by
    /// descending from the root edge by edge and comparing symbols.
    ///
    /// The empty query is always present.
    ///
    /// # Errors
    /// * `Error::NotBuilt` if called before [`build`](Self::build).
    ///
    /// # Example
    /// ```
    /// use ukkonen::tree::SuffixTree;
    ///
    /// let mut tree = SuffixTree::new("abcde");
    /// tree.build().unwrap();
    /// assert!(tree.find("bcd").unwrap());
    /// assert!(!tree.find("ce").unwrap());
    /// ```
    pub fn find<S: AsRef<str>>(&self, query: S) -> Result<bool> {
        if !self.built {
            return Err(Error::not_built());
        }
        let query: Vec<char> = query.as_ref().chars().collect();
        let mut node = ROOT;
        let mut qi = 0;

        while qi < query.len() {
            let child = match self.find_edge(node, query[qi]) {
                Some(child) => child,
                None => return Ok(false),
            };
            let mut pos = self.nodes[child].start;
            let end = self.edge_end(child);
            while pos < end && qi < query.len() {
                if self.text[pos] != query[qi] {
                    return Ok(false);
                }
                pos += 1;
                qi += 1;
            }
            node = child;
        }

        Ok(true)
    }

    /// Returns how many nodes are currently in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    /// Panics if `id` is out of range; valid ids are
    /// `0..self.node_count()`.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Enumerates all nodes in id order, the root first.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate()
    }

    /// Returns the end index of the edge entering `id`, resolving open
    /// leaf edges against the global end.
    pub fn edge_end(&self, id: NodeId) -> usize {
        match self.nodes[id].end {
            Some(end) => end,
            None => self.end,
        }
    }

    /// Returns the substring labeling the edge entering `id`; empty for
    /// the root.
    pub fn edge_label(&self, id: NodeId) -> String {
        self.text[self.nodes[id].start..self.edge_end(id)]
            .iter()
            .collect()
    }

    /// Phase `phase` extends the tree so that every suffix of
    /// `text[0..=phase]` is represented, implicitly or explicitly.
    ///
    /// The global end is advanced first, so all open leaf edges absorb the
    /// new symbol before any extension runs, and `text[phase]` is the
    /// symbol each extension appends.
    fn extend_phase(&mut self, phase: usize) {
        self.end = phase + 1;
        self.pending_link = None;
        let symbol = self.text[phase];

        // Suffixes below next_extension already end at leaves and grew
        // with the global end. Resuming here instead of at 0 is what keeps
        // the total work linear.
        while self.next_extension <= phase {
            let j = self.next_extension;
            // The active point sits at the end of text[j..phase) here.
            if self.try_advance(symbol) {
                // Already present: this suffix and all shorter ones are
                // implicit. The phase ends and the next one resumes at j.
                break;
            }
            self.insert_suffix(phase);
            self.next_extension = j + 1;
            self.reposition(phase);
        }

        debug_assert!(self.pending_link.is_none(), "suffix link left dangling");
    }

    /// Checks whether the active point already continues with `symbol` and
    /// advances one step along it if so, normalizing onto the child when
    /// the edge is consumed.
    fn try_advance(&mut self, symbol: char) -> bool {
        if self.active.length == 0 {
            let node = self.active.node;
            assert!(
                !self.nodes[node].is_leaf(),
                "active point parked on a leaf"
            );
            match self.find_edge(node, symbol) {
                Some(child) => {
                    self.resolve_pending_link(node);
                    self.active.edge = self.nodes[child].start;
                    self.active.length = 1;
                    self.normalize();
                    true
                }
                None => false,
            }
        } else {
            let child = self
                .find_edge(self.active.node, self.text[self.active.edge])
                .expect("active edge has no matching child");
            let pos = self.nodes[child].start + self.active.length;
            if self.text[pos] == symbol {
                self.resolve_pending_link(self.active.node);
                self.active.length += 1;
                self.normalize();
                true
            } else {
                false
            }
        }
    }

    /// If the active point has consumed its whole edge, move it onto the
    /// child node.
    fn normalize(&mut self) {
        if self.active.length == 0 {
            return;
        }
        let child = self
            .find_edge(self.active.node, self.text[self.active.edge])
            .expect("active edge has no matching child");
        let len = self.edge_length(child);
        debug_assert!(self.active.length <= len);
        if self.active.length == len {
            self.active = ActivePoint::at(child);
        }
    }

    /// The active point does not continue with `text[phase]`: insert a new
    /// leaf there, splitting the edge first if the point is inside one.
    fn insert_suffix(&mut self, phase: usize) {
        if self.active.length == 0 {
            // New leaf hanging off an existing node
            let node = self.active.node;
            self.new_leaf(node, phase);
            self.resolve_pending_link(node);
        } else {
            // Split the active edge: a fresh internal node takes over the
            // matched prefix, the old child keeps the remainder, and the
            // new leaf branches off for the new symbol.
            let split = self.split_edge();
            self.new_leaf(split, phase);
            self.resolve_pending_link(split);
            self.pending_link = Some(split);
            self.active = ActivePoint::at(split);
        }
    }

    /// Splits the active edge at the active length and returns the new
    /// internal node.
    fn split_edge(&mut self) -> NodeId {
        let parent = self.active.node;
        let child = self
            .find_edge(parent, self.text[self.active.edge])
            .expect("active edge has no matching child");
        let start = self.nodes[child].start;
        let split_at = start + self.active.length;

        let split = self.new_internal(parent, start, split_at);
        let key = self.text[split_at];
        self.nodes[child].start = split_at;
        self.nodes[child].parent = split;
        self.nodes[split].children.insert(key, child);
        split
    }

    /// Moves the active point to the end of `text[next_extension..phase)`
    /// in preparation for the next extension.
    ///
    /// The previous extension always leaves the active point on a node, so
    /// this is a suffix-link hop when the node has one. A node split off
    /// in the current extension has no link yet; it is re-entered by
    /// walking its incoming edge from its parent's link (dropping the
    /// leading symbol when the parent is the root), and the pending-link
    /// machinery then records where it lands.
    fn reposition(&mut self, phase: usize) {
        let j = self.next_extension;
        if j > phase {
            // Every suffix of this prefix is explicit; the next phase
            // starts over at the root with its one-symbol suffix.
            self.active = ActivePoint::at(ROOT);
            return;
        }
        debug_assert_eq!(self.active.length, 0);

        let node = self.active.node;
        if node == ROOT {
            // No shortcut out of the root: re-walk the suffix from the top
            self.walk(j, phase, ROOT);
            return;
        }
        match self.nodes[node].suffix_link {
            Some(link) => self.active = ActivePoint::at(link),
            None => {
                let start = self.nodes[node].start;
                let end = self.nodes[node].end.expect("split node must be internal");
                let parent = self.nodes[node].parent;
                if parent == ROOT {
                    self.walk(start + 1, end, ROOT);
                } else {
                    let link = self.nodes[parent]
                        .suffix_link
                        .expect("internal node is missing its suffix link");
                    self.walk(start, end, link);
                }
            }
        }
    }

    /// Skip/count descent: positions the active point at the end of
    /// `text[start..end)` below `from`, which must already label a path
    /// there. Whole edges are consumed at a time using only the first
    /// symbol and the edge length; no per-symbol comparison happens.
    fn walk(&mut self, start: usize, end: usize, from: NodeId) {
        self.active = ActivePoint::at(from);
        let mut pos = start;

        while pos < end {
            let child = self
                .find_edge(self.active.node, self.text[pos])
                .expect("skip/count walk ran off the tree");
            let len = self.edge_length(child);
            let remaining = end - pos;
            if len < remaining {
                self.active.node = child;
                pos += len;
            } else if len == remaining {
                self.active = ActivePoint::at(child);
                break;
            } else {
                self.active.edge = self.nodes[child].start;
                self.active.length = remaining;
                break;
            }
        }
    }

    /// Assigns the suffix link of the node split off by the previous
    /// extension, if one is still waiting. `target` is where the current
    /// extension landed, which is always an internal node or the root.
    fn resolve_pending_link(&mut self, target: NodeId) {
        if let Some(pending) = self.pending_link.take() {
            debug_assert!(!self.nodes[target].is_leaf());
            self.nodes[pending].suffix_link = Some(target);
        }
    }

    /// Returns the child of `node` whose incoming edge begins with
    /// `symbol`.
    fn find_edge(&self, node: NodeId, symbol: char) -> Option<NodeId> {
        self.nodes[node].children.get(&symbol).copied()
    }

    /// Length of the edge entering `id`, with open leaf edges measured
    /// against the global end.
    fn edge_length(&self, id: NodeId) -> usize {
        self.edge_end(id) - self.nodes[id].start
    }

    /// Allocates a leaf under `parent` whose open edge starts at `start`.
    fn new_leaf(&mut self, parent: NodeId, start: usize) -> NodeId {
        let id = self.nodes.len();
        let key = self.text[start];
        self.nodes.push(Node::leaf(parent, start));
        self.nodes[parent].children.insert(key, id);
        id
    }

    /// Allocates an internal node under `parent` with the stored edge
    /// interval `[start, end)`, replacing the parent's edge for that first
    /// symbol. The caller re-parents the former child.
    fn new_internal(&mut self, parent: NodeId, start: usize, end: usize) -> NodeId {
        let id = self.nodes.len();
        let key = self.text[start];
        self.nodes.push(Node::internal(parent, start, end));
        self.nodes[parent].children.insert(key, id);
        id
    }
}
