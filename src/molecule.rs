//! The molecule graph store: an owned, versioned graph with cached ring perception

use crate::core::*;
use crate::graph::connect::{side_of, ComponentWalker};
use crate::graph::rings::RingInfo;
use petgraph::prelude::*;
use petgraph::visit::Walker;
use smallvec::SmallVec;
use std::cell::OnceCell;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;
use tracing::*;

/// An edit was refused. The molecule is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error(transparent)]
    TooManyBonds(#[from] TooManyBonds),
    #[error("atom {0} does not exist")]
    NoSuchAtom(usize),
    #[error("bond {0} does not exist")]
    NoSuchBond(usize),
    #[error("atom {0} can't be bonded to itself")]
    SelfBond(usize),
    #[error("atoms {0} and {1} are already bonded")]
    DuplicateBond(usize, usize),
    #[error("removal of substituent not possible: bond {0} is in a ring")]
    SharedSubstituent(usize),
    #[error("stereo marking is meaningless on bond {0}")]
    StereoNotAllowed(usize),
}

/// A molecule, owning its graph.
///
/// Every edit bumps the version and drops the ring cache, which is rebuilt on the next query.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    graph: MoleculeGraph,
    version: u64,
    rings: OnceCell<RingInfo>,
}
impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }
    /// Wrap an existing graph, checking the degree limit and bond endpoints
    pub fn from_graph(graph: MoleculeGraph) -> Result<Self, StructuralError> {
        for e in graph.edge_references() {
            if e.source() == e.target() {
                return Err(StructuralError::SelfBond(e.source().index()));
            }
        }
        for n in graph.node_indices() {
            let degree = graph.edges(n).count();
            if degree > MAX_BONDS_ON_ATOM {
                return Err(TooManyBonds(TooMany::Heavy, degree).into());
            }
            let mut seen: SmallVec<NodeIndex, 6> = SmallVec::new();
            for other in graph.neighbors(n) {
                if seen.contains(&other) {
                    return Err(StructuralError::DuplicateBond(n.index(), other.index()));
                }
                seen.push(other);
            }
        }
        Ok(Self {
            graph,
            ..Self::default()
        })
    }

    pub fn graph(&self) -> &MoleculeGraph {
        &self.graph
    }
    pub fn into_graph(self) -> MoleculeGraph {
        self.graph
    }
    /// Mutable access to the graph. Invalidates caches.
    pub(crate) fn graph_mut(&mut self) -> &mut MoleculeGraph {
        self.touch();
        &mut self.graph
    }
    /// Bumped on every structural or attribute edit
    pub fn version(&self) -> u64 {
        self.version
    }
    fn touch(&mut self) {
        self.version += 1;
        self.rings.take();
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }
    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
    pub fn atoms(&self) -> impl Iterator<Item = (NodeIndex, &Atom)> + '_ {
        self.graph.node_indices().map(|n| (n, &self.graph[n]))
    }
    pub fn atom(&self, atom: NodeIndex) -> Option<&Atom> {
        self.graph.node_weight(atom)
    }
    pub fn atom_mut(&mut self, atom: NodeIndex) -> Option<&mut Atom> {
        self.graph.node_weight(atom)?;
        self.touch();
        self.graph.node_weight_mut(atom)
    }
    pub fn bond(&self, bond: EdgeIndex) -> Option<&Bond> {
        self.graph.edge_weight(bond)
    }
    pub fn bond_mut(&mut self, bond: EdgeIndex) -> Option<&mut Bond> {
        self.graph.edge_weight(bond)?;
        self.touch();
        self.graph.edge_weight_mut(bond)
    }
    /// Endpoints in the order they were stored, which wedge markings are relative to
    pub fn endpoints(&self, bond: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(bond)
    }
    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }
    pub fn degree(&self, atom: NodeIndex) -> usize {
        self.graph.edges(atom).count()
    }
    /// Neighbors in ascending index order
    pub fn neighbors(&self, atom: NodeIndex) -> SmallVec<NodeIndex, 6> {
        let mut out: SmallVec<NodeIndex, 6> = self.graph.neighbors(atom).collect();
        out.sort_unstable();
        out
    }
    /// Atom-map numbers, by atom
    pub fn marks(&self) -> impl Iterator<Item = (NodeIndex, u32)> + '_ {
        self.atoms().filter_map(|(n, a)| a.map.map(|m| (n, m)))
    }
    pub fn has_query_bonds(&self) -> bool {
        self.graph.edge_weights().any(|b| b.order.is_query())
    }

    /// Ring bonds and aromaticity, computed on first use after an edit
    pub fn ring_info(&self) -> &RingInfo {
        self.rings.get_or_init(|| RingInfo::new(&self.graph))
    }
    pub fn is_ring_bond(&self, bond: EdgeIndex) -> bool {
        self.ring_info().is_ring_bond(bond)
    }
    pub fn is_aromatic(&self, atom: NodeIndex) -> bool {
        self.ring_info().is_aromatic(atom)
    }

    pub fn add_atom(&mut self, atom: Atom) -> NodeIndex {
        self.touch();
        self.graph.add_node(atom)
    }
    /// Bond two atoms. Refused for self bonds, duplicates, or past the degree limit.
    pub fn add_bond(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        bond: Bond,
    ) -> Result<EdgeIndex, StructuralError> {
        self.check_atom(a)?;
        self.check_atom(b)?;
        if a == b {
            return Err(StructuralError::SelfBond(a.index()));
        }
        if self.graph.contains_edge(a, b) {
            return Err(StructuralError::DuplicateBond(a.index(), b.index()));
        }
        for n in [a, b] {
            let degree = self.degree(n) + 1;
            if degree > MAX_BONDS_ON_ATOM {
                return Err(TooManyBonds(TooMany::Heavy, degree).into());
            }
        }
        self.touch();
        Ok(self.graph.add_edge(a, b, bond))
    }
    pub fn set_charge(&mut self, atom: NodeIndex, charge: i8) -> Result<(), StructuralError> {
        self.atom_mut(atom)
            .ok_or(StructuralError::NoSuchAtom(atom.index()))?
            .charge = charge;
        Ok(())
    }
    pub fn set_mark(&mut self, atom: NodeIndex, mark: Option<u32>) -> Result<(), StructuralError> {
        self.atom_mut(atom)
            .ok_or(StructuralError::NoSuchAtom(atom.index()))?
            .map = mark;
        Ok(())
    }

    /// Remove an atom and its bonds. Every higher atom index shifts down by one.
    #[instrument(level = "debug", skip(self, atom), fields(atom = atom.index()))]
    pub fn delete_atom(&mut self, atom: NodeIndex) -> Result<Atom, StructuralError> {
        let removed = self
            .atom(atom)
            .cloned()
            .ok_or(StructuralError::NoSuchAtom(atom.index()))?;
        let neighbors = self.neighbors(atom);
        self.remove_atoms(|n| n == atom);
        for n in neighbors {
            // indices above the removed atom shifted down
            let n = if n > atom { NodeIndex::new(n.index() - 1) } else { n };
            self.derive_atom_valence(n);
        }
        Ok(removed)
    }
    /// Remove a bond, along with any endpoint left without neighbors
    pub fn delete_bond(&mut self, bond: EdgeIndex) -> Result<Bond, StructuralError> {
        let (a, b) = self
            .endpoints(bond)
            .ok_or(StructuralError::NoSuchBond(bond.index()))?;
        let removed = self.graph[bond].clone();
        self.remove_bonds(|e| e == bond);
        let lonely = [a, b].map(|n| self.degree(n) == 0);
        if lonely[0] || lonely[1] {
            self.remove_atoms(|n| (n == a && lonely[0]) || (n == b && lonely[1]));
        }
        for n in self.graph.node_indices().collect::<Vec<_>>() {
            self.derive_atom_valence(n);
        }
        Ok(removed)
    }
    /// Remove everything on the far side of `bond` from `keep`, returning how many atoms went
    pub fn delete_substituent(
        &mut self,
        bond: EdgeIndex,
        keep: NodeIndex,
    ) -> Result<usize, StructuralError> {
        let (a, b) = self
            .endpoints(bond)
            .ok_or(StructuralError::NoSuchBond(bond.index()))?;
        let other = if keep == a {
            b
        } else if keep == b {
            a
        } else {
            return Err(StructuralError::NoSuchAtom(keep.index()));
        };
        let side = side_of(&self.graph, other, keep);
        if side.contains(keep.index()) {
            return Err(StructuralError::SharedSubstituent(bond.index()));
        }
        let count = side.count_ones(..);
        debug!(count, "deleting substituent");
        self.remove_atoms(|n| side.contains(n.index()));
        let keep = NodeIndex::new(keep.index() - side.count_ones(..keep.index()));
        self.derive_atom_valence(keep);
        Ok(count)
    }
    /// Cycle the stereo marking of a bond, as a click in an editor would.
    ///
    /// Single bonds go none, up, down with the narrow end at `at`, and back to none. Double bonds
    /// toggle the E/Z mark.
    pub fn cycle_stereo(
        &mut self,
        bond: EdgeIndex,
        at: NodeIndex,
    ) -> Result<BondStereo, StructuralError> {
        let (a, b) = self
            .endpoints(bond)
            .ok_or(StructuralError::NoSuchBond(bond.index()))?;
        let order = self.graph[bond].order;
        let current = self.graph[bond].stereo;
        let next = match order {
            BondOrder::Single => {
                if at != a && at != b {
                    return Err(StructuralError::NoSuchAtom(at.index()));
                }
                if self.degree(a) < 2 && self.degree(b) < 2 {
                    return Err(StructuralError::StereoNotAllowed(bond.index()));
                }
                let narrow_at_source = at == a;
                let next = match current {
                    BondStereo::Up | BondStereo::CrossUp => BondStereo::Down,
                    BondStereo::Down | BondStereo::CrossDown => BondStereo::None,
                    _ => BondStereo::Up,
                };
                if narrow_at_source {
                    next
                } else {
                    next.flipped()
                }
            }
            BondOrder::Double if current == BondStereo::EzMarked => BondStereo::None,
            BondOrder::Double => BondStereo::EzMarked,
            _ => return Err(StructuralError::StereoNotAllowed(bond.index())),
        };
        self.touch();
        self.graph[bond].stereo = next;
        Ok(next)
    }

    /// Connected components, each as its atoms in ascending order
    pub fn components(&self) -> Vec<Vec<NodeIndex>> {
        ComponentWalker::new(&self.graph).iter(&self.graph).collect()
    }
    /// Copy out the given atoms and the bonds between them, keeping their relative order
    pub fn extract(&self, atoms: &[NodeIndex]) -> Molecule {
        let mut keep = vec![false; self.atom_count()];
        for a in atoms {
            if let Some(k) = keep.get_mut(a.index()) {
                *k = true;
            }
        }
        let graph = self.graph.filter_map(
            |n, a| keep[n.index()].then(|| a.clone()),
            |_, b| Some(b.clone()),
        );
        Molecule {
            graph,
            ..Molecule::default()
        }
    }
    /// Split into one molecule per connected component
    pub fn split(&self) -> Vec<Molecule> {
        self.components()
            .iter()
            .map(|c| self.extract(c))
            .collect()
    }

    /// Renumber atoms so that `order[k]` becomes atom `k`.
    ///
    /// Bonds are rebuilt sorted by their new endpoints, lower index first, with wedges flipped
    /// wherever that swaps the stored endpoints.
    pub(crate) fn permute(&mut self, order: &[NodeIndex]) {
        debug_assert_eq!(order.len(), self.atom_count());
        let mut new_index = vec![NodeIndex::end(); order.len()];
        for (k, old) in order.iter().enumerate() {
            new_index[old.index()] = NodeIndex::new(k);
        }
        let mut graph = MoleculeGraph::with_capacity(order.len(), self.bond_count());
        for &old in order {
            graph.add_node(self.graph[old].clone());
        }
        let mut bonds = self
            .graph
            .edge_references()
            .map(|e| {
                let a = new_index[e.source().index()];
                let b = new_index[e.target().index()];
                let mut bond = e.weight().clone();
                if a > b {
                    bond.stereo = bond.stereo.flipped();
                    (b, a, bond)
                } else {
                    (a, b, bond)
                }
            })
            .collect::<Vec<_>>();
        bonds.sort_by_key(|&(a, b, _)| (a, b));
        for (a, b, bond) in bonds {
            graph.add_edge(a, b, bond);
        }
        self.graph = graph;
        self.touch();
    }

    fn check_atom(&self, atom: NodeIndex) -> Result<(), StructuralError> {
        if atom.index() < self.atom_count() {
            Ok(())
        } else {
            Err(StructuralError::NoSuchAtom(atom.index()))
        }
    }
    /// Drop atoms matching a predicate, keeping everything else in order
    fn remove_atoms<F: Fn(NodeIndex) -> bool>(&mut self, remove: F) {
        let graph = self.graph.filter_map(
            |n, a| (!remove(n)).then(|| a.clone()),
            |_, b| Some(b.clone()),
        );
        self.graph = graph;
        self.touch();
    }
    fn remove_bonds<F: Fn(EdgeIndex) -> bool>(&mut self, remove: F) {
        let graph = self.graph.filter_map(
            |_, a| Some(a.clone()),
            |e, b| (!remove(e)).then(|| b.clone()),
        );
        self.graph = graph;
        self.touch();
    }
}
impl Display for Molecule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        crate::disp::native::write_native(self, f)
    }
}
