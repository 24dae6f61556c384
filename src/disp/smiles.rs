use crate::core::*;
use crate::element::{self, *};
use crate::graph::rings::{BondClass, RingInfo};
use crate::molecule::Molecule;
use crate::stereo::{self, Parity, StereoFlags, StereoIssue};
use crate::traverse::SpanningTree;
use petgraph::prelude::*;
use std::borrow::Cow;
use std::fmt::Write;
use tracing::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SmilesConfig {
    /// Write E/Z and chirality marks
    pub isomeric: bool,
    /// Clean up and renumber before writing, so equal molecules give equal strings
    pub canonical: bool,
    /// Perceive E/Z on every chain double bond, not only marked ones
    pub auto_ez: bool,
    /// Leave charge-separated bonds between two non-carbons alone, e.g. `[N+](=O)[O-]`
    pub polar_nitro: bool,
    /// Strip explicit hydrogens that can be written implicitly
    pub remove_hydrogens: bool,
    /// Bracket every atom
    pub all_hydrogens: bool,
    /// Write `:` for aromatic bonds
    pub query: bool,
    /// Write highlighted atoms with a map number of 1
    pub show_highlight: bool,
}
impl SmilesConfig {
    /// Default config, gives canonical isomeric output
    pub const fn new() -> Self {
        Self {
            isomeric: true,
            canonical: true,
            auto_ez: false,
            polar_nitro: false,
            remove_hydrogens: false,
            all_hydrogens: false,
            query: false,
            show_highlight: false,
        }
    }
    /// Canonical output without stereo
    pub const fn non_isomeric() -> Self {
        Self::new().with_isomeric(false)
    }
    /// Keep the input numbering, don't canonicalize.
    pub const fn fast() -> Self {
        Self::new().with_canonical(false)
    }

    pub const fn with_isomeric(mut self, isomeric: bool) -> Self {
        self.isomeric = isomeric;
        self
    }
    pub const fn with_canonical(mut self, canonical: bool) -> Self {
        self.canonical = canonical;
        self
    }
    pub const fn with_auto_ez(mut self, auto_ez: bool) -> Self {
        self.auto_ez = auto_ez;
        self
    }
    pub const fn with_polar_nitro(mut self, polar_nitro: bool) -> Self {
        self.polar_nitro = polar_nitro;
        self
    }
    pub const fn with_remove_hydrogens(mut self, remove_hydrogens: bool) -> Self {
        self.remove_hydrogens = remove_hydrogens;
        self
    }
    pub const fn with_all_hydrogens(mut self, all_hydrogens: bool) -> Self {
        self.all_hydrogens = all_hydrogens;
        self
    }
    pub const fn with_query(mut self, query: bool) -> Self {
        self.query = query;
        self
    }
    pub const fn with_show_highlight(mut self, show_highlight: bool) -> Self {
        self.show_highlight = show_highlight;
        self
    }
}
impl Default for SmilesConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Generated SMILES, along with any stereo that had to be left out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmilesReport {
    pub smiles: String,
    pub issues: Vec<StereoIssue>,
}

/// SMILES for a molecule, with stereo if `isomeric` is set. Stereo issues are logged and dropped.
pub fn to_smiles(mol: &Molecule, isomeric: bool) -> String {
    generate_smiles(mol, SmilesConfig::new().with_isomeric(isomeric)).smiles
}

/// SMILES for a molecule. Components are written separately and joined with `.`, sorted when
/// canonical.
#[instrument(level = "debug", skip(mol))]
pub fn generate_smiles(mol: &Molecule, cfg: SmilesConfig) -> SmilesReport {
    let mut issues = Vec::new();
    let mut parts = component_smiles(mol, cfg, &mut issues);
    if cfg.canonical {
        parts.sort_unstable();
    }
    SmilesReport {
        smiles: parts.join("."),
        issues,
    }
}

/// One string per connected component, in component order
pub(crate) fn component_smiles(
    mol: &Molecule,
    cfg: SmilesConfig,
    issues: &mut Vec<StereoIssue>,
) -> Vec<String> {
    mol.split()
        .into_iter()
        .map(|mut part| {
            let (smiles, found) = connected_smiles(&mut part, cfg);
            issues.extend(found);
            smiles
        })
        .collect()
}

/// SMILES for a single connected molecule, which gets cleaned up in place if canonical
fn connected_smiles(mol: &mut Molecule, cfg: SmilesConfig) -> (String, Vec<StereoIssue>) {
    let info = if cfg.canonical && !mol.has_query_bonds() {
        mol.derive_valence();
        if cfg.remove_hydrogens {
            mol.delete_hydrogens(cfg.isomeric);
        }
        mol.clean_polar_bonds(cfg.polar_nitro);
        mol.canonicalize();
        mol.derive_valence();
        mol.ring_info().clone()
    } else {
        mol.derive_valence();
        RingInfo::plain(mol.graph())
    };
    let tree = SpanningTree::build(mol, &info);
    let flags = if cfg.isomeric {
        stereo::perceive(mol, &info, &tree, cfg.auto_ez)
    } else {
        StereoFlags::default()
    };
    let mut out = String::with_capacity(mol.atom_count() * 2);
    for &atom in &tree.order {
        if tree.open_branch[atom.index()] {
            out.push('(');
        }
        if let Some(e) = tree.parent[atom.index()].and_then(|p| mol.bond_between(atom, p)) {
            push_bond(&mut out, mol, &info, &flags, e, cfg);
        }
        push_atom(
            &mut out,
            &mol.graph()[atom],
            info.is_aromatic(atom),
            flags.parity(atom),
            cfg,
        );
        for (j, other) in tree.closures_at(atom) {
            if tree.pos(atom) < tree.pos(other) {
                if let Some(e) = mol.bond_between(atom, other) {
                    push_bond(&mut out, mol, &info, &flags, e, cfg);
                }
            }
            if j > 9 {
                out.push('%');
            }
            let _ = write!(out, "{j}");
        }
        if tree.close_branch[atom.index()] {
            out.push(')');
        }
    }
    trace!(smiles = %out, "wrote component");
    (out, flags.issues)
}

fn push_bond(
    out: &mut String,
    mol: &Molecule,
    info: &RingInfo,
    flags: &StereoFlags,
    e: EdgeIndex,
    cfg: SmilesConfig,
) {
    let bond = &mol.graph()[e];
    let class = info.class(e);
    match bond.order {
        BondOrder::Double if class != BondClass::Aromatic => out.push('='),
        BondOrder::Triple => out.push('#'),
        BondOrder::Query(q) => out.push_str(bond.query.as_deref().unwrap_or(q.default_token())),
        _ if class == BondClass::Aromatic && cfg.query => out.push(':'),
        _ => {
            if let Some(dir) = flags.direction(e) {
                out.push_str(dir.token());
            }
        }
    }
}

fn push_atom(
    out: &mut String,
    atom: &Atom,
    aromatic: bool,
    parity: Option<Parity>,
    cfg: SmilesConfig,
) {
    let mut bracket = atom.charge != 0
        || parity.is_some()
        || atom.map.is_some()
        || cfg.all_hydrogens
        || atom.data.fixed_hydrogen();
    let mut map = atom.map;
    if cfg.show_highlight && atom.highlight() > 0 {
        bracket = true;
        map = Some(1);
    }
    let symbol: Cow<'_, str> = match &atom.kind {
        AtomKind::Element(p) => Cow::Borrowed(match (*p, aromatic) {
            (C, true) => "c",
            (N, true) => {
                bracket |= atom.hydrogens() > 0;
                "n"
            }
            (O, true) => "o",
            (P, true) => {
                bracket |= atom.hydrogens() > 0;
                "p"
            }
            (S, true) => "s",
            (SE, true) => {
                bracket = true;
                "se"
            }
            (B | C | N | O | P | S | F | CL | BR | I, _) => element::symbol(*p),
            (p, _) => {
                bracket = true;
                element::symbol(p)
            }
        }),
        AtomKind::RGroup(_) => {
            bracket = true;
            atom.symbol()
        }
        AtomKind::Label(l) => {
            if !matches!(&**l, "*" | "a" | "A") {
                bracket = true;
            }
            atom.symbol()
        }
    };
    if !bracket {
        out.push_str(&symbol);
        return;
    }
    out.push('[');
    out.push_str(&symbol);
    if let Some(parity) = parity {
        out.push_str(parity.token());
    }
    match atom.hydrogens() {
        0 => {}
        1 => out.push('H'),
        h => {
            let _ = write!(out, "H{h}");
        }
    }
    match atom.charge {
        0 => {}
        1 => out.push('+'),
        -1 => out.push('-'),
        q if q > 0 => {
            let _ = write!(out, "+{q}");
        }
        q => {
            let _ = write!(out, "-{}", q.unsigned_abs());
        }
    }
    if let Some(map) = map {
        let _ = write!(out, ":{map}");
    }
    out.push(']');
}
