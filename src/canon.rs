//! Canonical atom numbering by iterative invariant refinement

use crate::graph::rings::RingInfo;
use crate::molecule::Molecule;
use petgraph::prelude::*;
use tracing::*;

/// Order-independent seed for one atom: degree, element class, charge class, hydrogens and the
/// product of incident bond codes, most significant first
fn seed(mol: &Molecule, info: &RingInfo, atom: NodeIndex) -> u128 {
    let a = &mol.graph()[atom];
    let charge = match a.charge {
        0 => 0,
        i8::MIN..=-3 => 1,
        -2 => 2,
        -1 => 3,
        1 => 4,
        2 => 5,
        _ => 6,
    };
    let bonds = mol
        .graph()
        .edges(atom)
        .map(|e| info.class(e.id()).code())
        .product::<u128>();
    let mut out = mol.degree(atom) as u128;
    out = (out << 12) | (a.kind.class() as u128 & 0xfff);
    out = (out << 3) | charge;
    out = (out << 4) | a.hydrogens() as u128;
    (out << 20) | (bonds & 0xfffff)
}

/// Dense 1-based ranks of `inv`, written into `ranks`. Returns whether every rank is distinct.
fn dense_ranks(inv: &[u128], ranks: &mut Vec<usize>) -> bool {
    let mut sorted = inv.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    ranks.clear();
    ranks.extend(inv.iter().map(|v| sorted.partition_point(|s| s < v) + 1));
    sorted.len() == inv.len()
}

/// Canonical rank of every atom, 1-based and all distinct.
///
/// Ranks are refined by products of neighbor primes until they stop changing, then once by the
/// neighbors' element classes and bond codes. Remaining ties are broken by promoting the lowest
/// index atom of the lowest tied rank, and refinement starts over.
pub fn canonical_ranks(mol: &Molecule, info: &RingInfo) -> Vec<usize> {
    let n = mol.atom_count();
    if n == 0 {
        return Vec::new();
    }
    let primes = primal::Sieve::new(primal::estimate_nth_prime(n as u64 + 1).1 as usize)
        .primes_from(0)
        .take(n)
        .map(|p| p as u128)
        .collect::<Vec<_>>();
    let graph = mol.graph();
    let mut inv = graph
        .node_indices()
        .map(|a| seed(mol, info, a))
        .collect::<Vec<_>>();
    let mut ranks = Vec::with_capacity(n);
    let mut old = vec![0; n];
    let mut scratch = Vec::with_capacity(n);
    let mut structural_done = false;
    let mut round = 0usize;
    while !dense_ranks(&inv, &mut ranks) {
        round += 1;
        if ranks != old {
            old.copy_from_slice(&ranks);
            for a in graph.node_indices() {
                inv[a.index()] = graph
                    .neighbors(a)
                    .map(|nb| primes.get(ranks[nb.index()] - 1).copied().unwrap_or(1))
                    .fold(1u128, u128::wrapping_mul);
            }
            structural_done = false;
            trace!(round, "refined by neighbor ranks");
        } else if !structural_done {
            for a in graph.node_indices() {
                inv[a.index()] = graph
                    .edges(a)
                    .map(|e| {
                        let nb = if e.source() == a { e.target() } else { e.source() };
                        graph[nb].kind.class() as u128 * info.class(e.id()).code()
                    })
                    .fold(1u128, u128::wrapping_mul);
            }
            structural_done = true;
            trace!(round, "refined by neighbor structure");
        } else {
            let Some(tied) = (1..=n).find(|r| ranks.iter().filter(|&&x| x == *r).count() > 1)
            else {
                break;
            };
            // the lowest-index tied atom moves ahead of its ties, not behind them as in JME
            let mut promoted = false;
            for (i, &r) in ranks.iter().enumerate() {
                inv[i] = if r == tied && !promoted {
                    promoted = true;
                    1
                } else {
                    2
                };
            }
            structural_done = false;
            trace!(round, tied, "broke a tie");
        }
        dense_ranks(&inv, &mut scratch);
        for i in 0..n {
            inv[i] = old[i] as u128 * n as u128 + scratch[i] as u128;
        }
    }
    debug!(rounds = round, atoms = n, "canonical ranking done");
    ranks
}

impl Molecule {
    /// Renumber atoms into canonical order. Returns the old index of each new atom.
    #[instrument(level = "debug", skip_all)]
    pub fn canonicalize(&mut self) -> Vec<NodeIndex> {
        let info = self.ring_info().clone();
        let ranks = canonical_ranks(self, &info);
        let mut order = vec![NodeIndex::end(); ranks.len()];
        for (i, r) in ranks.iter().enumerate() {
            order[r - 1] = NodeIndex::new(i);
        }
        self.permute(&order);
        order
    }
}
