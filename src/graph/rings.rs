//! Ring bonds and aromaticity

use super::connect::side_of;
use crate::core::*;
use crate::element;
use fixedbitset::FixedBitSet;
use petgraph::prelude::*;
use smallvec::SmallVec;
use tracing::*;

/// Bond order as seen by canonical ranking and output, with aromaticity folded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondClass {
    Single,
    Double,
    Triple,
    Aromatic,
    Query,
}
impl BondClass {
    pub fn of(order: BondOrder) -> Self {
        match order {
            BondOrder::Single => Self::Single,
            BondOrder::Double => Self::Double,
            BondOrder::Triple => Self::Triple,
            BondOrder::Query(_) => Self::Query,
        }
    }
    /// Numeric code used in invariant products
    pub const fn code(self) -> u128 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Aromatic => 5,
            Self::Query => 9,
        }
    }
}

/// Is the bond between `a` and `b` free to rotate, i.e. not in a ring?
pub fn is_rotatable(graph: &MoleculeGraph, a: NodeIndex, b: NodeIndex) -> bool {
    !side_of(graph, a, b).contains(b.index())
}

/// The set of ring bonds, indexed by edge
pub fn ring_bonds(graph: &MoleculeGraph) -> FixedBitSet {
    let mut out = FixedBitSet::with_capacity(graph.edge_count());
    for e in graph.edge_references() {
        if !is_rotatable(graph, e.source(), e.target()) {
            out.insert(e.id().index());
        }
    }
    out
}

/// Ring and aromaticity flags for every atom and bond
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingInfo {
    pub ring_bonds: FixedBitSet,
    pub aromatic_atoms: FixedBitSet,
    pub classes: Vec<BondClass>,
}
impl RingInfo {
    /// Full perception. Aromaticity is skipped if any query bond is present.
    pub fn new(graph: &MoleculeGraph) -> Self {
        if graph.edge_weights().any(|b| b.order.is_query()) {
            Self::plain(graph)
        } else {
            Self::aromatic(graph)
        }
    }
    /// Ring bonds only, every bond classed by its stored order
    pub fn plain(graph: &MoleculeGraph) -> Self {
        Self {
            ring_bonds: ring_bonds(graph),
            aromatic_atoms: FixedBitSet::with_capacity(graph.node_count()),
            classes: graph.edge_weights().map(|b| BondClass::of(b.order)).collect(),
        }
    }
    /// Ring bonds plus aromaticity.
    ///
    /// Candidates are ring atoms of C, N, P, O, S, Se or a label, with at most three neighbors
    /// counting hydrogens. A ring bond between two candidates is aromatic if its ends are still
    /// connected through candidates once the bond itself is ignored.
    #[instrument(level = "trace", skip_all)]
    pub fn aromatic(graph: &MoleculeGraph) -> Self {
        let mut info = Self::plain(graph);
        let mut candidate = FixedBitSet::with_capacity(graph.node_count());
        for n in graph.node_indices() {
            let atom = &graph[n];
            let in_ring = graph
                .edges(n)
                .any(|e| info.ring_bonds.contains(e.id().index()));
            let allowed = match atom.kind {
                AtomKind::Element(p) => element::can_be_aromatic(p),
                AtomKind::Label(_) => true,
                AtomKind::RGroup(_) => false,
            };
            let crowded = graph.edges(n).count() + atom.hydrogens() as usize > 3;
            if in_ring && allowed && !crowded {
                candidate.insert(n.index());
            }
        }
        let mut seen = FixedBitSet::with_capacity(graph.node_count());
        let mut stack: SmallVec<NodeIndex, 8> = SmallVec::new();
        for e in graph.edge_references() {
            let (a, b) = (e.source(), e.target());
            if !info.ring_bonds.contains(e.id().index())
                || !candidate.contains(a.index())
                || !candidate.contains(b.index())
            {
                continue;
            }
            seen.clear();
            stack.clear();
            for r in graph.edges(a) {
                let n = if r.source() == a { r.target() } else { r.source() };
                if n != b
                    && candidate.contains(n.index())
                    && info.ring_bonds.contains(r.id().index())
                    && !seen.put(n.index())
                {
                    stack.push(n);
                }
            }
            while let Some(cur) = stack.pop() {
                for r in graph.edges(cur) {
                    let n = if r.source() == cur { r.target() } else { r.source() };
                    if n != a
                        && candidate.contains(n.index())
                        && info.ring_bonds.contains(r.id().index())
                        && !seen.put(n.index())
                    {
                        stack.push(n);
                    }
                }
            }
            if seen.contains(b.index()) {
                info.aromatic_atoms.insert(a.index());
                info.aromatic_atoms.insert(b.index());
                info.classes[e.id().index()] = BondClass::Aromatic;
            }
        }
        trace!(
            aromatic = info.aromatic_atoms.count_ones(..),
            rings = info.ring_bonds.count_ones(..),
            "perceived rings"
        );
        info
    }

    pub fn is_ring_bond(&self, bond: EdgeIndex) -> bool {
        self.ring_bonds.contains(bond.index())
    }
    pub fn is_aromatic(&self, atom: NodeIndex) -> bool {
        self.aromatic_atoms.contains(atom.index())
    }
    pub fn class(&self, bond: EdgeIndex) -> BondClass {
        self.classes
            .get(bond.index())
            .copied()
            .unwrap_or(BondClass::Single)
    }
}
