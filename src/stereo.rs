//! Stereo perception from 2D coordinates and wedge bonds.
//!
//! Double-bond configuration becomes `/` and `\` marks on the neighboring single bonds, and
//! wedged centers become `@` or `@@`, all relative to a [`SpanningTree`]'s output order.

use crate::core::*;
use crate::graph::rings::{BondClass, RingInfo};
use crate::molecule::Molecule;
use crate::traverse::SpanningTree;
use petgraph::prelude::*;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::*;

/// Fraction of the mean bond length a double bond's substituent must sit off its axis
pub const EZ_FLATNESS: f64 = 2.0 / 25.0;

/// Direction mark written on a single bond next to a stereo double bond
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondDirection {
    Slash,
    Backslash,
}
impl BondDirection {
    pub const fn token(self) -> &'static str {
        match self {
            Self::Slash => "/",
            Self::Backslash => "\\",
        }
    }
    fn from_sign(s: i8) -> Option<Self> {
        match s {
            1 => Some(Self::Slash),
            -1 => Some(Self::Backslash),
            _ => None,
        }
    }
}

/// Chirality mark on an atom, as seen from the atom written before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    /// `@`
    Anticlockwise,
    /// `@@`
    Clockwise,
}
impl Parity {
    pub const fn token(self) -> &'static str {
        match self {
            Self::Anticlockwise => "@",
            Self::Clockwise => "@@",
        }
    }
    fn from_sign(s: i8) -> Option<Self> {
        match s {
            1 => Some(Self::Anticlockwise),
            -1 => Some(Self::Clockwise),
            _ => None,
        }
    }
}

/// Stereo that was drawn but couldn't be written. Output carries on without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum StereoIssue {
    #[error("not unique E/Z geometry on bond {0}")]
    AmbiguousEz(usize),
    #[error("E/Z marks conflict on bond {0}")]
    EzConflict(usize),
    #[error("bad stereo specification on trigonal atom {0}")]
    BadTrigonal(usize),
    #[error("bad stereo specification on tetrahedral atom {0}")]
    BadTetrahedral(usize),
    #[error("bad stereo specification on allene starting at atom {0}")]
    BadAllene(usize),
    #[error("could not resolve stereo on atom {0}")]
    Unresolved(usize),
}

/// Perceived marks, indexed by bond and atom
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StereoFlags {
    pub directions: Vec<Option<BondDirection>>,
    pub parities: Vec<Option<Parity>>,
    pub issues: Vec<StereoIssue>,
}
impl StereoFlags {
    pub fn direction(&self, bond: EdgeIndex) -> Option<BondDirection> {
        self.directions.get(bond.index()).copied().flatten()
    }
    pub fn parity(&self, atom: NodeIndex) -> Option<Parity> {
        self.parities.get(atom.index()).copied().flatten()
    }
}

/// One neighbor position around a stereocenter
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Slot {
    #[default]
    Empty,
    H,
    Atom(NodeIndex),
}
impl Slot {
    fn atom(self) -> Option<NodeIndex> {
        match self {
            Self::Atom(a) => Some(a),
            _ => None,
        }
    }
}

/// Find E/Z and chirality marks for a molecule about to be written in `tree`'s order
#[instrument(level = "debug", skip_all)]
pub fn perceive(mol: &Molecule, info: &RingInfo, tree: &SpanningTree, auto_ez: bool) -> StereoFlags {
    let mut p = Perceiver {
        mol,
        info,
        tree,
        auto_ez,
        flat: 0.0,
        slash: vec![0; mol.bond_count()],
        parity: vec![0; mol.atom_count()],
        issues: Vec::new(),
    };
    let graph = mol.graph();
    if graph.edge_count() > 0 {
        let mean = graph
            .edge_references()
            .map(|e| {
                let (a, b) = (&graph[e.source()], &graph[e.target()]);
                (a.x - b.x).hypot(a.y - b.y)
            })
            .sum::<f64>()
            / graph.edge_count() as f64;
        if mean < 1e-6 {
            debug!("no usable coordinates, skipping stereo");
            return p.finish();
        }
        p.flat = mean * EZ_FLATNESS;
    }
    p.run();
    p.finish()
}

struct Perceiver<'a> {
    mol: &'a Molecule,
    info: &'a RingInfo,
    tree: &'a SpanningTree,
    auto_ez: bool,
    flat: f64,
    slash: Vec<i8>,
    parity: Vec<i8>,
    issues: Vec<StereoIssue>,
}
impl Perceiver<'_> {
    fn finish(self) -> StereoFlags {
        for issue in &self.issues {
            warn!("{issue}");
        }
        StereoFlags {
            directions: self.slash.iter().map(|&s| BondDirection::from_sign(s)).collect(),
            parities: self.parity.iter().map(|&s| Parity::from_sign(s)).collect(),
            issues: self.issues,
        }
    }

    fn run(&mut self) {
        let (mol, tree) = (self.mol, self.tree);
        let graph = mol.graph();
        let mut done = vec![false; graph.edge_count()];
        for &atom in &tree.order {
            let Some(parent) = tree.parent[atom.index()] else {
                continue;
            };
            if let Some(e) = mol.bond_between(atom, parent) {
                self.double_bond(e);
                done[e.index()] = true;
            }
        }
        for e in graph.edge_indices() {
            if !done[e.index()] {
                self.double_bond(e);
            }
        }
        'atoms: for atom in graph.node_indices() {
            let degree = mol.degree(atom);
            if !(2..=4).contains(&degree) {
                continue;
            }
            let mut wedges = 0;
            let mut double = false;
            for e in graph.edges(atom) {
                if self.info.class(e.id()) == BondClass::Aromatic {
                    continue 'atoms;
                }
                match e.weight().order {
                    BondOrder::Single if self.up_down(e.id(), atom) != 0 => wedges += 1,
                    BondOrder::Double => double = true,
                    _ => {}
                }
            }
            if wedges == 0 {
                continue;
            }
            if double {
                self.allene(atom);
            } else {
                self.tetrahedral(atom);
            }
        }
    }

    /// Screen coordinates, y pointing down
    fn xy(&self, atom: NodeIndex) -> (f64, f64) {
        let a = &self.mol.graph()[atom];
        (a.x, -a.y)
    }
    fn pos(&self, atom: NodeIndex) -> usize {
        self.tree.pos(atom)
    }
    fn bond(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.mol.bond_between(a, b)
    }
    fn slash_of(&self, a: NodeIndex, b: NodeIndex) -> i8 {
        self.bond(a, b).map_or(0, |e| self.slash[e.index()])
    }
    fn plain_single(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.bond(a, b).is_some_and(|e| {
            self.mol.graph()[e].order == BondOrder::Single
                && self.info.class(e) != BondClass::Aromatic
        })
    }
    /// +1 or -1 if the bond is wedged with its narrow end on `atom`
    fn up_down(&self, bond: EdgeIndex, atom: NodeIndex) -> i8 {
        let Some((source, target)) = self.mol.endpoints(bond) else {
            return 0;
        };
        match self.mol.graph()[bond].stereo {
            BondStereo::Up if source == atom => 1,
            BondStereo::Down if source == atom => -1,
            BondStereo::CrossUp if target == atom => 1,
            BondStereo::CrossDown if target == atom => -1,
            _ => 0,
        }
    }
    fn up_down_between(&self, center: NodeIndex, other: Option<NodeIndex>) -> i8 {
        other
            .and_then(|o| self.bond(center, o))
            .map_or(0, |e| self.up_down(e, center))
    }
    /// Substituents of `atom` other than `skip`
    fn others(&self, atom: NodeIndex, skip: NodeIndex) -> SmallVec<NodeIndex, 6> {
        let mut out = self.mol.neighbors(atom);
        out.retain(|n| *n != skip);
        out
    }

    fn double_bond(&mut self, e: EdgeIndex) {
        let mol = self.mol;
        let bond = &mol.graph()[e];
        if bond.order != BondOrder::Double || self.info.class(e) == BondClass::Aromatic {
            return;
        }
        if !(bond.stereo == BondStereo::EzMarked || (self.auto_ez && !self.info.is_ring_bond(e))) {
            return;
        }
        let Some((mut a1, mut a2)) = self.mol.endpoints(e) else {
            return;
        };
        let degrees = 2..=3;
        if !degrees.contains(&self.mol.degree(a1)) || !degrees.contains(&self.mol.degree(a2)) {
            return;
        }
        if self.pos(a1) > self.pos(a2) {
            std::mem::swap(&mut a1, &mut a2);
        }

        let mut near = self.others(a1, a2);
        if near.len() > 1 && self.pos(near[0]) > self.pos(near[1]) {
            near.swap(0, 1);
        }
        let ref1 = near
            .iter()
            .take(2)
            .copied()
            .find(|&r| self.slash_of(a1, r) != 0 || self.plain_single(a1, r));
        let mut far = self.others(a2, a1);
        if far.len() > 1 && self.pos(far[0]) < self.pos(far[1]) {
            far.swap(0, 1);
        }
        let ref2 = match far.first() {
            Some(&r) if self.plain_single(a2, r) && self.slash_of(a2, r) == 0 => Some(r),
            _ => far.get(1).copied().filter(|&r| self.plain_single(a2, r)),
        };
        let (Some(ref1), Some(ref2)) = (ref1, ref2) else {
            return;
        };
        let ref1_after = self.pos(ref1) > self.pos(a1);

        let (x1, y1) = self.xy(a1);
        let (x2, y2) = self.xy(a2);
        let (dx, dy) = (x2 - x1, y2 - y1);
        let rx = dx.hypot(dy).max(0.001);
        let (sina, cosa) = (dy / rx, dx / rx);
        let offset = |r: NodeIndex| {
            let (xr, yr) = self.xy(r);
            (yr - y1) * cosa - (xr - x1) * sina
        };
        let (off1, off2) = (offset(ref1), offset(ref2));
        if off1.abs() < self.flat || off2.abs() < self.flat {
            self.issues.push(StereoIssue::AmbiguousEz(e.index()));
            return;
        }
        let (Some(b1), Some(b2)) = (self.bond(ref1, a1), self.bond(ref2, a2)) else {
            return;
        };
        if self.slash[b1.index()] == 0 {
            let mut mark = 1;
            for x in self.others(ref1, a1) {
                let s = self.slash_of(ref1, x);
                if s != 0 {
                    mark = if self.pos(x) > self.pos(ref1) { -s } else { s };
                    break;
                }
            }
            self.slash[b1.index()] = mark;
        }
        if self.slash[b2.index()] != 0 {
            self.issues.push(StereoIssue::EzConflict(e.index()));
            return;
        }
        let s1 = self.slash[b1.index()];
        let mut s2 = if (off1 > 0.0) == (off2 > 0.0) { -s1 } else { s1 };
        if ref1_after {
            s2 = -s2;
        }
        self.slash[b2.index()] = s2;
        trace!(bond = e.index(), "perceived E/Z");
    }

    /// Neighbors of `atom` in the order they're written, with an implicit hydrogen slotted in
    fn neighbor_slots(&self, atom: NodeIndex) -> [Slot; 4] {
        let mut refs: SmallVec<NodeIndex, 6> = SmallVec::new();
        let parent = self.tree.parent[atom.index()];
        if let Some(p) = parent {
            refs.push(p);
        }
        for (_, other) in self.tree.closures_at(atom) {
            refs.push(other);
        }
        let mut rest = self.mol.neighbors(atom);
        rest.retain(|n| !refs.contains(n));
        rest.sort_by_key(|&n| self.pos(n));
        refs.extend(rest);

        let mut slots = [Slot::Empty; 4];
        for (slot, &r) in slots.iter_mut().zip(&refs) {
            *slot = Slot::Atom(r);
        }
        if self.mol.graph()[atom].hydrogens() > 0 {
            if parent.is_none() {
                slots = [Slot::H, slots[0], slots[1], slots[2]];
            } else {
                slots[3] = slots[2];
                slots[2] = slots[1];
                slots[1] = Slot::H;
            }
        }
        slots
    }

    /// The other neighbors in `refs` in clockwise order around `center`, starting from `first`
    fn clockwise(&self, center: NodeIndex, first: Slot, refs: &[Slot; 4]) -> Option<[Slot; 4]> {
        let (cx, cy) = self.xy(center);
        let (fx, fy) = self.xy(first.atom()?);
        let (dx, dy) = (fx - cx, fy - cy);
        let rx = dx.hypot(dy).max(0.001);
        let (sin0, cos0) = (dy / rx, dx / rx);
        let p = refs
            .iter()
            .filter(|&&r| r != first)
            .filter_map(|r| r.atom())
            .take(3)
            .collect::<SmallVec<NodeIndex, 3>>();
        if p.len() < 2 {
            return None;
        }
        let angle = |a: NodeIndex| {
            let (x, y) = self.xy(a);
            let dx = (x - cx) * cos0 + (y - cy) * sin0;
            let dy = (y - cy) * cos0 - (x - cx) * sin0;
            let rx = dx.hypot(dy).max(0.001);
            (dy / rx, dx / rx)
        };
        let mut ox = [first, Slot::Empty, Slot::Empty, Slot::Empty];
        let a1 = angle(p[0]);
        let a2 = angle(p[1]);
        let c12 = compare_angles(a1, a2);
        if let Some(&p3) = p.get(2) {
            let a3 = angle(p3);
            let c23 = compare_angles(a2, a3);
            let c13 = compare_angles(a1, a3);
            let order = if c12 > 0 && c23 > 0 {
                Some([p[0], p[1], p3])
            } else if c13 > 0 && c23 < 0 {
                Some([p[0], p3, p[1]])
            } else if c12 < 0 && c13 > 0 {
                Some([p[1], p[0], p3])
            } else if c23 > 0 && c13 < 0 {
                Some([p[1], p3, p[0]])
            } else if c13 < 0 && c12 > 0 {
                Some([p3, p[0], p[1]])
            } else if c23 < 0 && c12 < 0 {
                Some([p3, p[1], p[0]])
            } else {
                None
            };
            if let Some(order) = order {
                for (o, a) in ox[1..].iter_mut().zip(order) {
                    *o = Slot::Atom(a);
                }
            }
        } else if c12 > 0 {
            ox[1] = Slot::Atom(p[0]);
            ox[2] = Slot::Atom(p[1]);
        } else {
            ox[1] = Slot::Atom(p[1]);
            ox[2] = Slot::Atom(p[0]);
        }
        Some(ox)
    }

    fn tetrahedral(&mut self, atom: NodeIndex) {
        let degree = self.mol.degree(atom);
        if degree != 3 && degree != 4 {
            return;
        }
        let refs = self.neighbor_slots(atom);
        let (mut nup, mut ndown) = (0i32, 0i32);
        let (mut up, mut down, mut marked, mut unmarked) =
            (Slot::Empty, Slot::Empty, Slot::Empty, Slot::Empty);
        for &r in &refs {
            let Some(a) = r.atom() else {
                continue;
            };
            match self.up_down_between(atom, Some(a)) {
                1 => {
                    nup += 1;
                    up = r;
                    marked = r;
                }
                -1 => {
                    ndown += 1;
                    down = r;
                    marked = r;
                }
                _ => unmarked = r,
            }
        }
        let mut nstereo = nup + ndown;
        let unresolved = StereoIssue::Unresolved(atom.index());

        let mut t = [Slot::Empty; 4];
        let stereo_ref: i8;
        if degree == 3 {
            if (nup == 1 && ndown == 1) || (nstereo == 3 && nup > 0 && ndown > 0) {
                self.issues.push(StereoIssue::BadTrigonal(atom.index()));
                return;
            }
            let first = match nstereo {
                1 => marked,
                2 => unmarked,
                _ => refs[0],
            };
            let Some(ox) = self.clockwise(atom, first, &refs) else {
                self.issues.push(unresolved);
                return;
            };
            t = [marked, Slot::H, ox[2], ox[1]];
            stereo_ref = if nup > 0 { 1 } else { -1 };
        } else if nstereo == 1 {
            let Some(ox) = self.clockwise(atom, marked, &refs) else {
                self.issues.push(unresolved);
                return;
            };
            t = [ox[0], ox[3], ox[2], ox[1]];
            stereo_ref = if nup > 0 { 1 } else { -1 };
        } else {
            let mut first = refs[0];
            if unmarked != Slot::Empty {
                first = unmarked;
            }
            if nup == 1 {
                first = up;
            } else if ndown == 1 {
                first = down;
            }
            let Some(mut ox) = self.clockwise(atom, first, &refs) else {
                self.issues.push(unresolved);
                return;
            };
            let mut marks = ox.map(|s| self.up_down_between(atom, s.atom()));
            let mut chosen = None;
            if nstereo == 4 {
                if nup == 0 || ndown == 0 {
                    self.issues.push(StereoIssue::BadTetrahedral(atom.index()));
                    return;
                } else if nup == 1 || ndown == 1 {
                    t = [ox[0], ox[3], ox[2], ox[1]];
                    chosen = Some(marks[0]);
                } else {
                    for m in &mut marks {
                        if *m == -1 {
                            *m = 0;
                        }
                    }
                    nstereo = 2;
                }
            } else if nstereo == 3 {
                if nup == 3 || ndown == 3 {
                    t = [ox[0], ox[3], ox[2], ox[1]];
                    chosen = Some(if nup > 0 { -1 } else { 1 });
                } else {
                    // keep whichever direction has two wedges; the lone one is ignored
                    let dropped = if nup == 1 { 1 } else { -1 };
                    for m in &mut marks {
                        if *m == dropped {
                            *m = 0;
                        }
                    }
                    nstereo = 2;
                }
            }
            if nstereo == 2 {
                if nup == 1 && ndown == 1 {
                    if ox[1] == down {
                        ox[1] = ox[2];
                        ox[2] = ox[3];
                    } else if ox[2] == down {
                        ox[2] = ox[3];
                    }
                    t = [up, down, ox[2], ox[1]];
                    chosen = Some(1);
                } else {
                    if marks[0] == marks[1] || marks[1] == marks[2] {
                        self.issues.push(StereoIssue::BadTetrahedral(atom.index()));
                        return;
                    }
                    t = if marks[0] != 0 {
                        [ox[0], ox[2], ox[1], ox[3]]
                    } else {
                        [ox[1], ox[3], ox[2], ox[0]]
                    };
                    chosen = Some(if nup > 1 { 1 } else { -1 });
                }
            }
            let Some(chosen) = chosen else {
                self.issues.push(unresolved);
                return;
            };
            stereo_ref = chosen;
        }

        align(&mut t, &refs);
        let sign = if t[2] == refs[2] {
            1
        } else if t[2] == refs[3] {
            -1
        } else {
            self.issues.push(unresolved);
            return;
        };
        self.parity[atom.index()] = sign * stereo_ref;
        trace!(atom = atom.index(), parity = sign * stereo_ref, "perceived tetrahedral center");
    }

    fn allene(&mut self, start: NodeIndex) {
        let mol = self.mol;
        let graph = mol.graph();
        let mut chain: SmallVec<NodeIndex, 8> = SmallVec::new();
        chain.push(start);
        let mut cur = start;
        while chain.len() <= graph.node_count() {
            let prev = chain.len().checked_sub(2).map(|i| chain[i]);
            let next = self.mol.neighbors(cur).into_iter().find(|&x| {
                x != start
                    && Some(x) != prev
                    && self.bond(cur, x).is_some_and(|e| {
                        graph[e].order == BondOrder::Double
                            && self.info.class(e) != BondClass::Aromatic
                    })
            });
            let Some(next) = next else {
                break;
            };
            chain.push(next);
            cur = next;
        }
        if chain.len() % 2 == 0 || chain.len() < 3 {
            return;
        }
        let end = chain[chain.len() - 1];
        let before_end = chain[chain.len() - 2];
        if !(2..=3).contains(&self.mol.degree(end)) {
            return;
        }
        let center = chain[chain.len() / 2];

        let singles = |atom: NodeIndex| {
            let mut out = self.mol.neighbors(atom);
            out.retain(|&x| self.plain_single(atom, x));
            if out.len() > 1 && self.pos(out[0]) > self.pos(out[1]) {
                out.swap(0, 1);
            }
            (out.first().copied(), out.get(1).copied())
        };
        let (r11, r12) = singles(start);
        let (r21, r22) = singles(end);
        let r11x = self.up_down_between(start, r11);
        let r12x = self.up_down_between(start, r12);
        let r21x = self.up_down_between(end, r21);
        let r22x = self.up_down_between(end, r22);
        if (r11x + r12x).abs() > 1 || r21x != 0 || r22x != 0 {
            self.issues.push(StereoIssue::BadAllene(start.index()));
            return;
        }
        let (Some(ref1), Some(ref2)) = (r11, r21) else {
            return;
        };

        let (xe, ye) = self.xy(end);
        let (xp, yp) = self.xy(before_end);
        let (dx, dy) = (xp - xe, yp - ye);
        let rx = dx.hypot(dy).max(0.001);
        let (sina, cosa) = (dy / rx, dx / rx);
        let (x2, y2) = self.xy(ref2);
        let off = (y2 - yp) * cosa - (x2 - xp) * sina;

        let mut sign: i8 = if off > 0.0 { 1 } else { -1 };
        if r11x < 0 {
            sign = -sign;
        }
        if self.pos(ref1) > self.pos(ref2) {
            sign = -sign;
        }
        self.parity[center.index()] = sign;
        trace!(center = center.index(), parity = sign, "perceived allene");
    }
}

/// Quadrant-aware comparison of two directions given as (sin, cos). Positive if `a` comes
/// before `b` going clockwise on screen.
fn compare_angles((sina, cosa): (f64, f64), (sinb, cosb): (f64, f64)) -> i8 {
    let quadrant = |s: f64, c: f64| match (s >= 0.0, c >= 0.0) {
        (true, true) => 1,
        (true, false) => 2,
        (false, false) => 3,
        (false, true) => 4,
    };
    let (qa, qb) = (quadrant(sina, cosa), quadrant(sinb, cosb));
    if qa != qb {
        return if qa < qb { 1 } else { -1 };
    }
    let before = match qa {
        1 | 4 => sina < sinb,
        _ => sina > sinb,
    };
    if before {
        1
    } else {
        -1
    }
}

/// Permute tetrahedron corners `t` so its first two match `refs`, preserving handedness
fn align(t: &mut [Slot; 4], refs: &[Slot; 4]) {
    if refs[0] == t[1] {
        t.swap(0, 1);
        t.swap(2, 3);
    } else if refs[0] == t[2] {
        t.swap(0, 2);
        t.swap(1, 3);
    } else if refs[0] == t[3] {
        t.swap(0, 3);
        t.swap(1, 2);
    }
    if refs[1] == t[2] {
        t.swap(1, 2);
        t.swap(2, 3);
    } else if refs[1] == t[3] {
        t.swap(1, 3);
        t.swap(2, 3);
    }
}
