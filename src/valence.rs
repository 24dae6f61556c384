//! Implicit hydrogens and charges from bond-order sums, plus the cleanup passes run before
//! canonical output

use crate::core::*;
use crate::element::{self, *};
use crate::molecule::Molecule;
use petgraph::prelude::*;
use tracing::*;

/// Sum of bond orders to heavy neighbors, or `None` if any attached bond is a query bond
pub fn bond_order_sum(graph: &MoleculeGraph, atom: NodeIndex) -> Option<u8> {
    graph
        .edges(atom)
        .try_fold(0u8, |acc, e| Some(acc + e.weight().order.order()?))
}

/// Hydrogen count and charge for an element with bond-order sum `sbo` and `degree` neighbors.
///
/// Returns `None` for elements without rules, which keep whatever they have.
pub fn valence_state(protons: u8, sbo: u8, degree: usize, charge: i8) -> Option<(u8, i8)> {
    let s = sbo as i32;
    let mut q = charge as i32;
    let h;
    match protons {
        element::H => {
            q = (s == 2) as i32;
            h = 0;
        }
        B => match s {
            3 | 5 => {
                q = 0;
                h = 0;
            }
            0..=2 => h = 3 - s - q,
            4 => {
                q = -1;
                h = 0;
            }
            _ => {
                q = s - 5;
                h = 0;
            }
        },
        C | SI => {
            if s < 4 {
                h = if q != 0 { 2 - s + q.abs() } else { 4 - s };
            } else {
                q = s - 4;
                h = 0;
            }
        }
        N | P => match s {
            0..=2 => h = 3 - s + q,
            3 => {
                if q < 0 {
                    q = 0;
                    h = 0;
                } else {
                    h = q;
                }
            }
            4 => {
                q = 1;
                h = 0;
            }
            6 => {
                q = -1;
                h = 0;
            }
            _ => {
                q = s - 5;
                h = 0;
            }
        },
        O => {
            if s == 2 && q < 0 {
                q = 0;
            }
            if s > 2 {
                q = s - 2;
            }
            h = 2 - s + q;
        }
        S | SE => match s {
            0..=1 => h = 2 - s + q,
            2 => {
                if q < 0 {
                    q = 0;
                    h = 0;
                } else {
                    h = q;
                }
            }
            3 if degree == 2 => {
                q = 0;
                h = 1;
            }
            3 => {
                q = 1;
                h = 0;
            }
            4 => {
                q = 0;
                h = 0;
            }
            5 => {
                q = 0;
                h = 1;
            }
            _ => {
                q = s - 6;
                h = 0;
            }
        },
        F | CL | BR | I => {
            if s >= 1 {
                q = s - 1;
            }
            if s > 2 {
                q = 0;
                h = 0;
            } else {
                h = 1 - s + q;
            }
        }
        _ => return None,
    }
    Some((h.clamp(0, MAX_HYDROGENS as i32) as u8, q as i8))
}

impl Molecule {
    /// Recompute hydrogen counts and charges for every atom
    pub fn derive_valence(&mut self) {
        for n in self.graph().node_indices().collect::<Vec<_>>() {
            self.derive_atom_valence(n);
        }
    }
    /// Recompute one atom's hydrogen count and charge. Atoms with a fixed count are left alone.
    pub fn derive_atom_valence(&mut self, atom: NodeIndex) {
        let Some(current) = self.atom(atom) else {
            return;
        };
        if current.data.fixed_hydrogen() {
            return;
        }
        let sbo = bond_order_sum(self.graph(), atom);
        let degree = self.degree(atom);
        let next = match (sbo, &current.kind) {
            (None, _) | (Some(_), AtomKind::Label(_) | AtomKind::RGroup(_)) => {
                Some((0, current.charge))
            }
            (Some(sbo), AtomKind::Element(p)) => valence_state(*p, sbo, degree, current.charge),
        };
        if let Some((h, q)) = next {
            if current.hydrogens() != h || current.charge != q {
                let graph = self.graph_mut();
                graph[atom].data.set_hydrogen(h);
                graph[atom].charge = q;
            }
        }
    }

    /// Remove explicit hydrogens that can be written implicitly, returning how many went.
    ///
    /// With `keep_stereo` set, hydrogens on wedge bonds stay.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_hydrogens(&mut self, keep_stereo: bool) -> usize {
        let graph = self.graph();
        let doomed = graph
            .node_indices()
            .filter(|&n| {
                let atom = &graph[n];
                if !atom.is(element::H) || atom.charge != 0 || atom.map.is_some() {
                    return false;
                }
                let mut edges = graph.edges(n);
                let (Some(e), None) = (edges.next(), edges.next()) else {
                    return false;
                };
                let parent = if e.source() == n { e.target() } else { e.source() };
                let removable_parent = matches!(graph[parent].kind, AtomKind::Element(p) if p != element::H);
                removable_parent
                    && e.weight().order == BondOrder::Single
                    && (e.weight().stereo == BondStereo::None || !keep_stereo)
            })
            .collect::<Vec<_>>();
        // highest first so the remaining indices stay valid
        for &n in doomed.iter().rev() {
            if let Err(err) = self.delete_atom(n) {
                warn!("{err}");
            }
        }
        if !doomed.is_empty() {
            debug!(count = doomed.len(), "removed explicit hydrogens");
        }
        doomed.len()
    }

    /// Normalize charge-separated bonds, returning how many bonds changed.
    ///
    /// `[X+]-[Y-]` becomes `X=Y` and `[X+]=[Y-]` becomes `X#Y`, unless either end is H, B, or a
    /// halogen, or `polar_nitro` is set and neither end is carbon. `[X+]=[Y+]` drops an order.
    #[instrument(level = "debug", skip(self))]
    pub fn clean_polar_bonds(&mut self, polar_nitro: bool) -> usize {
        let mut changed = 0;
        for e in self.graph().edge_indices().collect::<Vec<_>>() {
            let Some((a, b)) = self.endpoints(e) else {
                continue;
            };
            let graph = self.graph();
            let (qa, qb) = (graph[a].charge, graph[b].charge);
            let (pa, pb) = (graph[a].protons(), graph[b].protons());
            let order = graph[e].order;
            if ((qa == 1 && qb == -1) || (qa == -1 && qb == 1))
                && matches!(order, BondOrder::Single | BondOrder::Double) {
                let excluded = |p: Option<u8>| {
                    p.is_some_and(|p| p == element::H || p == B || element::is_halogen(p))
                };
                let nitro_like = polar_nitro && pa != Some(C) && pb != Some(C);
                if !nitro_like && !excluded(pa) && !excluded(pb) {
                    let graph = self.graph_mut();
                    graph[a].charge = 0;
                    graph[b].charge = 0;
                    graph[e].order = if order == BondOrder::Single {
                        BondOrder::Double
                    } else {
                        BondOrder::Triple
                    };
                    changed += 1;
                    debug!(a = a.index(), b = b.index(), "merged charge-separated bond");
                    self.derive_atom_valence(a);
                    self.derive_atom_valence(b);
                }
            }
            let graph = self.graph();
            if graph[a].charge == 1 && graph[b].charge == 1 {
                let lowered = match graph[e].order {
                    BondOrder::Double => Some(BondOrder::Single),
                    BondOrder::Triple => Some(BondOrder::Double),
                    _ => None,
                };
                if let Some(order) = lowered {
                    self.graph_mut()[e].order = order;
                    changed += 1;
                    self.derive_atom_valence(a);
                    self.derive_atom_valence(b);
                }
            }
        }
        changed
    }
}
