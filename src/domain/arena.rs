use std::fmt;
use std::iter;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

/// Stable handle of a node in a [`TreeArena`].
///
/// Handles stay valid until the node is removed; a removed handle never
/// aliases a later node because the arena tracks generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (index, generation) = self.0.into_raw_parts();
        write!(f, "{}v{}", index, generation)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    /// Payload shown for this node (class name, glyph, group label, ...)
    pub data: T,
    /// Parent handle, None for root-level nodes
    pub parent: Option<NodeId>,
    /// Child handles in display order
    pub children: Vec<NodeId>,
}

/// Arena-based forest backing every editable hierarchy.
///
/// Nodes without a parent live at the root level, in `roots` order. Parent
/// links are plain handles, so cycle checks are an ancestor walk by id.
#[derive(Debug, Clone)]
pub struct TreeArena<T> {
    arena: Arena<TreeNode<T>>,
    roots: Vec<NodeId>,
}

impl<T> Default for TreeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeArena<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.arena.get(id.0)
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.get_node(id).map(|node| &node.data)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.arena.get_mut(id.0).map(|node| &mut node.data)
    }

    pub fn parent(&self, id: NodeId) -> DomainResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> DomainResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// Walks parent links upward, nearest parent first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self.get_node(id).and_then(|node| node.parent);
        iter::successors(first, move |current| {
            self.get_node(*current).and_then(|node| node.parent)
        })
    }

    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|candidate| candidate == ancestor)
    }

    /// Number of levels in the deepest branch (0 for an empty forest).
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, id: NodeId) -> usize {
        if let Some(node) = self.get_node(id) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Handles of `id` and all its descendants, pre-order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get_node(current) {
                result.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        result
    }

    pub fn iter(&self) -> TreeIterator<'_, T> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self)
    }

    /// Creates a node at the end of `parent`'s children, or at the root level.
    #[instrument(level = "trace", skip(self, data))]
    pub fn add(&mut self, parent: Option<NodeId>, data: T) -> DomainResult<NodeId> {
        if let Some(parent) = parent {
            self.node(parent)?;
        }
        let id = NodeId(self.arena.insert(TreeNode {
            data,
            parent,
            children: Vec::new(),
        }));
        self.siblings_mut(parent)?.push(id);
        Ok(id)
    }

    /// Deletes every listed node together with its subtree.
    ///
    /// Unknown handles are ignored. Targets are processed deepest-first so a
    /// batch holding both an ancestor and its descendant never touches a
    /// detached child list.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, ids: &[NodeId]) {
        let mut targets: Vec<(usize, NodeId)> = ids
            .iter()
            .filter(|id| self.contains(**id))
            .map(|&id| (self.ancestors(id).count(), id))
            .collect();
        targets.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, id) in targets {
            if !self.contains(id) {
                continue;
            }
            if self.detach(id).is_err() {
                continue;
            }
            for node in self.subtree(id) {
                self.arena.remove(node.0);
            }
            debug!("removed subtree {}", id);
        }
    }

    /// Moves the subtree rooted at `id` under `new_parent`.
    ///
    /// `index_hint` is the position among the new siblings (clamped),
    /// `None` appends. Fails before mutating when the move would create a cycle.
    #[instrument(level = "debug", skip(self))]
    pub fn reparent(
        &mut self,
        id: NodeId,
        new_parent: NodeId,
        index_hint: Option<usize>,
    ) -> DomainResult<()> {
        self.node(id)?;
        self.node(new_parent)?;
        if new_parent == id {
            return Err(DomainError::InvalidOperation(format!(
                "cannot make node {} its own parent",
                id
            )));
        }
        if self.is_ancestor(id, new_parent) {
            return Err(DomainError::InvalidOperation(format!(
                "cannot move node {} under its descendant {}",
                id, new_parent
            )));
        }
        self.detach(id)?;
        self.attach(id, Some(new_parent), index_hint)
    }

    /// Moves every listed node to the root level, subtrees intact.
    ///
    /// The batch is applied in reverse of the given order, matching the way a
    /// selection is unnested one item at a time from the bottom up.
    #[instrument(level = "debug", skip(self))]
    pub fn unnest(&mut self, ids: &[NodeId]) -> DomainResult<()> {
        for &id in ids {
            self.node(id)?;
        }
        for &id in ids.iter().rev() {
            if self.node(id)?.parent.is_none() {
                continue;
            }
            self.detach(id)?;
            self.attach(id, None, None)?;
        }
        Ok(())
    }

    /// Moves `id` to `index` among its current siblings (clamped).
    #[instrument(level = "debug", skip(self))]
    pub fn reposition(&mut self, id: NodeId, index: usize) -> DomainResult<()> {
        let parent = self.node(id)?.parent;
        self.detach(id)?;
        self.attach(id, parent, Some(index))
    }

    fn node(&self, id: NodeId) -> DomainResult<&TreeNode<T>> {
        self.arena.get(id.0).ok_or(DomainError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomainResult<&mut TreeNode<T>> {
        self.arena.get_mut(id.0).ok_or(DomainError::NotFound(id))
    }

    fn siblings_mut(&mut self, parent: Option<NodeId>) -> DomainResult<&mut Vec<NodeId>> {
        match parent {
            Some(parent) => Ok(&mut self.node_mut(parent)?.children),
            None => Ok(&mut self.roots),
        }
    }

    fn siblings(&self, parent: Option<NodeId>) -> DomainResult<&[NodeId]> {
        match parent {
            Some(parent) => Ok(&self.node(parent)?.children),
            None => Ok(&self.roots),
        }
    }

    /// Unlinks `id` from its sibling list and returns its former position.
    fn detach(&mut self, id: NodeId) -> DomainResult<usize> {
        let parent = self.node(id)?.parent;
        let siblings = self.siblings_mut(parent)?;
        let position = siblings
            .iter()
            .position(|&sibling| sibling == id)
            .ok_or_else(|| {
                DomainError::InvalidOperation(format!("node {} missing from its parent", id))
            })?;
        siblings.remove(position);
        self.node_mut(id)?.parent = None;
        Ok(position)
    }

    fn attach(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
        index: Option<usize>,
    ) -> DomainResult<()> {
        let siblings = self.siblings_mut(parent)?;
        let index = index.unwrap_or(siblings.len()).min(siblings.len());
        siblings.insert(index, id);
        self.node_mut(id)?.parent = parent;
        Ok(())
    }
}

impl<T: Clone> TreeArena<T> {
    /// Deep-clones each listed subtree and places the clone right after its
    /// original. Returns the clone roots in the order given.
    #[instrument(level = "debug", skip(self))]
    pub fn duplicate(&mut self, ids: &[NodeId]) -> DomainResult<Vec<NodeId>> {
        for &id in ids {
            self.node(id)?;
        }
        let mut clones = Vec::with_capacity(ids.len());
        for &id in ids {
            let parent = self.node(id)?.parent;
            let clone = self.clone_subtree(id, parent)?;
            let position = self
                .siblings(parent)?
                .iter()
                .position(|&sibling| sibling == id)
                .map_or(0, |p| p + 1);
            self.siblings_mut(parent)?.insert(position, clone);
            debug!("duplicated {} as {}", id, clone);
            clones.push(clone);
        }
        Ok(clones)
    }

    fn clone_subtree(&mut self, source: NodeId, parent: Option<NodeId>) -> DomainResult<NodeId> {
        let (data, children) = {
            let node = self.node(source)?;
            (node.data.clone(), node.children.clone())
        };
        let id = NodeId(self.arena.insert(TreeNode {
            data,
            parent,
            children: Vec::with_capacity(children.len()),
        }));
        for child in children {
            let cloned = self.clone_subtree(child, Some(id))?;
            self.node_mut(id)?.children.push(cloned);
        }
        Ok(id)
    }
}

/// Pre-order traversal over all root-level trees, left to right.
pub struct TreeIterator<'a, T> {
    arena: &'a TreeArena<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> TreeIterator<'a, T> {
    fn new(arena: &'a TreeArena<T>) -> Self {
        let stack = arena.roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current, node));
            }
        }
        None
    }
}

/// Post-order traversal: every node is yielded after all its children.
pub struct PostOrderIterator<'a, T> {
    arena: &'a TreeArena<T>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(arena: &'a TreeArena<T>) -> Self {
        let stack = arena.roots.iter().rev().map(|&id| (id, false)).collect();
        Self { arena, stack }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current) {
                if visited {
                    return Some((current, node));
                }
                self.stack.push((current, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
