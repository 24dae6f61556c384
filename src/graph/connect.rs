use fixedbitset::FixedBitSet;
use petgraph::visit::*;
use smallvec::{smallvec, SmallVec};

/// Walk the connected components of a graph, yielding each one's nodes in ascending index order.
#[derive(Debug, Clone)]
pub struct ComponentWalker {
    pub seen: FixedBitSet,
    next: usize,
}
impl ComponentWalker {
    pub fn new<G: NodeCount>(graph: G) -> Self {
        Self {
            seen: FixedBitSet::with_capacity(graph.node_count()),
            next: 0,
        }
    }
}
impl<G: IntoNeighbors + NodeIndexable + NodeCount> Walker<G> for ComponentWalker {
    type Item = Vec<G::NodeId>;
    fn walk_next(&mut self, graph: G) -> Option<Self::Item> {
        while self.next < graph.node_count() && self.seen.contains(self.next) {
            self.next += 1;
        }
        if self.next >= graph.node_count() {
            return None;
        }
        let mut stack: SmallVec<G::NodeId, 8> = smallvec![graph.from_index(self.next)];
        self.seen.insert(self.next);
        let mut out = Vec::new();
        while let Some(id) = stack.pop() {
            out.push(graph.to_index(id));
            for n in graph.neighbors(id) {
                let idx = graph.to_index(n);
                if !self.seen.put(idx) {
                    stack.push(n);
                }
            }
        }
        out.sort_unstable();
        Some(out.into_iter().map(|i| graph.from_index(i)).collect())
    }
}

/// Nodes reachable from `start` without crossing its edge to `blocked`, including `start`.
///
/// If `blocked` ends up in the set, that edge is in a ring.
pub fn side_of<G>(graph: G, start: G::NodeId, blocked: G::NodeId) -> FixedBitSet
where
    G: IntoNeighbors + NodeIndexable,
{
    let mut seen = FixedBitSet::with_capacity(graph.node_bound());
    seen.insert(graph.to_index(start));
    let mut stack: SmallVec<G::NodeId, 8> = smallvec![start];
    while let Some(id) = stack.pop() {
        for n in graph.neighbors(id) {
            if id == start && n == blocked {
                continue;
            }
            if !seen.put(graph.to_index(n)) {
                stack.push(n);
            }
        }
    }
    seen
}
