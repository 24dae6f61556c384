//! MDL molfile (V2000) writer

use crate::core::*;
use crate::molecule::Molecule;
use std::fmt::{self, Write};

/// Program line written into every header
pub const PROGRAM_LINE: &str = "  MOLSKTCH          2D";

/// Longest title kept as-is
const MAX_TITLE: usize = 79;

/// Molfile for a molecule, or an empty string if it has no atoms
pub fn to_molfile(mol: &Molecule, title: &str) -> String {
    let mut out = String::new();
    let _ = write_molfile(mol, title, &mut out);
    out
}

/// Write a molfile. Nothing is written for an empty molecule.
pub fn write_molfile<W: Write>(mol: &Molecule, title: &str, out: &mut W) -> fmt::Result {
    let graph = mol.graph();
    if graph.node_count() == 0 {
        return Ok(());
    }
    if title.chars().count() > MAX_TITLE {
        let head = title.chars().take(MAX_TITLE - 3).collect::<String>();
        writeln!(out, "{head}...")?;
    } else {
        writeln!(out, "{title}")?;
    }
    writeln!(out, "{PROGRAM_LINE}")?;
    writeln!(out)?;
    writeln!(
        out,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        graph.node_count(),
        graph.edge_count()
    )?;

    let (xmin, ymin) = graph
        .node_weights()
        .fold((f64::INFINITY, f64::INFINITY), |(x, y), a| {
            (x.min(a.x), y.min(a.y))
        });
    for atom in graph.node_weights() {
        let symbol = atom.symbol();
        let symbol = if symbol.len() > 3 { "Q" } else { &*symbol };
        let charge = match atom.charge {
            q @ -3..=3 if q != 0 => 4 - q as i32,
            _ => 0,
        };
        writeln!(
            out,
            "{:>10.4}{:>10.4}{:>10.4} {symbol:<3} 0{charge:>3}  0  0  0  0  0  0  0{:>3}  0  0",
            atom.x - xmin,
            atom.y - ymin,
            0.0,
            atom.map.unwrap_or(0),
        )?;
    }

    for e in graph.edge_indices() {
        let Some((a, b)) = graph.edge_endpoints(e) else {
            continue;
        };
        let (a, b) = (a.index() + 1, b.index() + 1);
        let bond = &graph[e];
        let order = match bond.order {
            BondOrder::Query(QueryBond::Aromatic) => 4,
            BondOrder::Query(_) => 8,
            o => o.order().unwrap_or(1),
        };
        let (a, b, stereo) = match bond.stereo {
            BondStereo::Up => (a, b, 1),
            BondStereo::Down => (a, b, 6),
            BondStereo::CrossUp => (b, a, 1),
            BondStereo::CrossDown => (b, a, 6),
            _ => (a, b, 0),
        };
        writeln!(out, "{a:>3}{b:>3}{order:>3}{stereo:>3}  0  0  0")?;
    }

    for (n, atom) in mol.atoms() {
        if atom.charge != 0 {
            writeln!(out, "M  CHG  1{:>4}{:>4}", n.index() + 1, atom.charge)?;
        }
    }
    writeln!(out, "M  END")
}
