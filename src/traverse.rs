//! Depth-first spanning tree that fixes the SMILES output order

use crate::graph::rings::{BondClass, RingInfo};
use crate::molecule::Molecule;
use petgraph::prelude::*;
use smallvec::SmallVec;
use tracing::*;

/// Output order for one connected molecule.
///
/// Built in two passes from atom 0. The first walks depth-first, preferring chain bonds over ring
/// bonds and multiple ring bonds over single ones, and records every ring closure. The second
/// replays that walk so that when an atom has several children, the ones visited first become
/// parenthesized branches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanningTree {
    /// Atoms in output order
    pub order: Vec<NodeIndex>,
    /// Output position of each atom
    pub position: Vec<usize>,
    /// The atom each one is written after, `None` for the root
    pub parent: Vec<Option<NodeIndex>>,
    /// Ring closures in numbering order, earlier visited atom first
    pub closures: Vec<(NodeIndex, NodeIndex)>,
    /// A `(` goes before this atom
    pub open_branch: Vec<bool>,
    /// A `)` goes after this atom
    pub close_branch: Vec<bool>,
}
impl SpanningTree {
    /// Walk the component containing atom 0. The rest of the molecule is ignored.
    #[instrument(level = "trace", skip_all)]
    pub fn build(mol: &Molecule, info: &RingInfo) -> Self {
        let n = mol.atom_count();
        let mut tree = Self {
            order: Vec::with_capacity(n),
            position: vec![usize::MAX; n],
            parent: vec![None; n],
            closures: Vec::new(),
            open_branch: vec![false; n],
            close_branch: vec![false; n],
        };
        if n == 0 {
            return tree;
        }
        let mut visit = vec![0usize; n];
        let mut first_parent: Vec<Option<NodeIndex>> = vec![None; n];
        let mut stack: SmallVec<NodeIndex, 8> = SmallVec::new();
        let mut atom = NodeIndex::new(0);
        let mut step = 1;
        visit[0] = 1;
        loop {
            let mut candidates: SmallVec<NodeIndex, 6> = SmallVec::new();
            for x in mol.neighbors(atom) {
                if visit[x.index()] == 0 {
                    candidates.push(x);
                    continue;
                }
                if visit[x.index()] > visit[atom.index()] || first_parent[atom.index()] == Some(x) {
                    continue;
                }
                if !tree.closures.iter().any(|&(a, b)| {
                    (a == x && b == atom) || (a == atom && b == x)
                }) {
                    tree.closures.push((x, atom));
                }
            }
            let next = match candidates.len() {
                0 => {
                    if step == n {
                        break;
                    }
                    match stack.pop() {
                        Some(a) => {
                            atom = a;
                            continue;
                        }
                        None => break,
                    }
                }
                1 => candidates[0],
                _ => {
                    stack.push(atom);
                    let class = |x: NodeIndex| {
                        mol.bond_between(atom, x).map(|e| (e, info.class(e)))
                    };
                    candidates
                        .iter()
                        .copied()
                        .find(|&x| class(x).is_some_and(|(e, _)| !info.is_ring_bond(e)))
                        .or_else(|| {
                            candidates.iter().copied().find(|&x| {
                                class(x).is_some_and(|(_, c)| {
                                    matches!(c, BondClass::Double | BondClass::Triple)
                                })
                            })
                        })
                        .unwrap_or(candidates[0])
                }
            };
            first_parent[next.index()] = Some(atom);
            step += 1;
            visit[next.index()] = step;
            atom = next;
        }

        let is_closure = |a: NodeIndex, b: NodeIndex| {
            tree.closures
                .iter()
                .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
        };
        let mut order = Vec::with_capacity(n);
        let mut parent = vec![None; n];
        let mut open_branch = vec![false; n];
        let mut close_branch = vec![false; n];
        let mut branches: SmallVec<NodeIndex, 8> = SmallVec::new();
        let mut atom = NodeIndex::new(0);
        let mut prev = None;
        'walk: loop {
            parent[atom.index()] = prev;
            order.push(atom);
            visit[atom.index()] = 0;
            let (next, count) = loop {
                let mut next: Option<NodeIndex> = None;
                let mut count = 0;
                for x in mol.neighbors(atom) {
                    if visit[x.index()] == 0 || is_closure(atom, x) {
                        continue;
                    }
                    count += 1;
                    if next.map_or(true, |m| visit[x.index()] < visit[m.index()]) {
                        next = Some(x);
                    }
                }
                match next {
                    Some(next) => break (next, count),
                    None => match branches.pop() {
                        Some(a) => {
                            close_branch[atom.index()] = true;
                            atom = a;
                        }
                        None => break 'walk,
                    },
                }
            };
            if count > 1 {
                branches.push(atom);
                open_branch[next.index()] = true;
            }
            prev = Some(atom);
            atom = next;
        }
        for (i, a) in order.iter().enumerate() {
            tree.position[a.index()] = i;
        }
        tree.order = order;
        tree.parent = parent;
        tree.open_branch = open_branch;
        tree.close_branch = close_branch;
        trace!(atoms = tree.order.len(), closures = tree.closures.len(), "built spanning tree");
        tree
    }

    /// Output position of an atom
    pub fn pos(&self, atom: NodeIndex) -> usize {
        self.position[atom.index()]
    }
    /// 1-based closure numbers touching `atom`, with the atom at the other end
    pub fn closures_at(
        &self,
        atom: NodeIndex,
    ) -> impl Iterator<Item = (usize, NodeIndex)> + '_ {
        self.closures
            .iter()
            .enumerate()
            .filter_map(move |(j, &(a, b))| {
                if a == atom {
                    Some((j + 1, b))
                } else if b == atom {
                    Some((j + 1, a))
                } else {
                    None
                }
            })
    }
}
