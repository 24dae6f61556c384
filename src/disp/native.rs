//! Writer for the compact `natoms nbonds {symbol x y}* {a1 a2 code}*` notation

use crate::core::*;
use crate::molecule::Molecule;
use std::fmt::{self, Write};

/// Bond code for wedge up, narrow end at the first atom
pub const CODE_UP: i32 = -1;
/// Bond code for wedge down, narrow end at the first atom
pub const CODE_DOWN: i32 = -2;
/// Bond code for a double bond whose E/Z configuration is significant
pub const CODE_EZ: i32 = -5;

/// Write a molecule in native notation
pub fn write_native<W: Write>(mol: &Molecule, out: &mut W) -> fmt::Result {
    let graph = mol.graph();
    write!(out, "{} {}", graph.node_count(), graph.edge_count())?;
    for atom in graph.node_weights() {
        out.write_char(' ')?;
        write_atom_token(atom, out)?;
        write!(out, " {:.2} {:.2}", tidy(atom.x), tidy(atom.y))?;
    }
    for e in graph.edge_indices() {
        let Some((a, b)) = graph.edge_endpoints(e) else {
            continue;
        };
        let (a, b) = (a.index() + 1, b.index() + 1);
        let bond = &graph[e];
        let (a, b, code) = match (bond.order, bond.stereo) {
            (BondOrder::Query(q), _) => (a, b, q.code()),
            (BondOrder::Single, BondStereo::Up) => (a, b, CODE_UP),
            (BondOrder::Single, BondStereo::Down) => (a, b, CODE_DOWN),
            (BondOrder::Single, BondStereo::CrossUp) => (b, a, CODE_UP),
            (BondOrder::Single, BondStereo::CrossDown) => (b, a, CODE_DOWN),
            (BondOrder::Double, BondStereo::EzMarked) => (a, b, CODE_EZ),
            (order, _) => (a, b, order.order().map_or(1, i32::from)),
        };
        write!(out, " {a} {b} {code}")?;
    }
    Ok(())
}

/// Native notation as a string
pub fn to_native_text(mol: &Molecule) -> String {
    let mut out = String::new();
    let _ = write_native(mol, &mut out);
    out
}

/// Avoid writing `-0.00`
fn tidy(v: f64) -> f64 {
    if v.abs() < 0.005 {
        0.0
    } else {
        v
    }
}

/// Symbol, charge and map for one atom. Fixed hydrogen counts and free-text labels go in brackets.
pub(crate) fn write_atom_token<W: Write>(atom: &Atom, out: &mut W) -> fmt::Result {
    let fixed = atom.data.fixed_hydrogen();
    let bracketed = match &atom.kind {
        AtomKind::Element(_) => fixed,
        AtomKind::Label(l) => !is_plain_label(l),
        AtomKind::RGroup(_) => false,
    };
    if bracketed {
        out.write_char('[')?;
    }
    out.write_str(&atom.symbol())?;
    if fixed {
        match atom.hydrogens() {
            0 => {}
            1 => out.write_char('H')?,
            h => write!(out, "H{h}")?,
        }
    }
    match atom.charge {
        0 => {}
        1 => out.write_char('+')?,
        -1 => out.write_char('-')?,
        q => write!(out, "{q:+}")?,
    }
    if bracketed {
        out.write_char(']')?;
    }
    if let Some(map) = atom.map {
        write!(out, ":{map}")?;
    }
    Ok(())
}
