//! MDL molfile (V2000) reader

use super::{ParseError, ParseErrorKind::*};
use crate::core::*;
use crate::element;
use crate::molecule::Molecule;
use crate::utils::echar::*;
use atoi::FromRadix10SignedChecked;
use petgraph::prelude::*;
use std::ops::Range;
use tracing::*;

/// Fixed-width column, trimmed. Columns past the end of the line are empty.
fn column(line: &str, range: Range<usize>) -> &str {
    let end = range.end.min(line.len());
    line.get(range.start.min(end)..end).unwrap_or("").trim()
}

/// Integer column. An empty column reads as 0 unless `required`.
fn int_column(line: &str, range: Range<usize>, required: bool, at: Position) -> Result<i32, ParseError> {
    let field = column(line, range);
    if field.is_empty() && !required {
        return Ok(0);
    }
    signed(field, at)
}

/// Whole field as an `i32`, rejecting trailing junk and overflow
fn signed(field: &str, at: Position) -> Result<i32, ParseError> {
    match i32::from_radix_10_signed_checked(field.as_bytes()) {
        (Some(n), used) if used > 0 && used == field.len() => Ok(n),
        _ => Err(ParseError::new(at, BadInteger(EChar::new(field.as_bytes())))),
    }
}

fn float_column(line: &str, range: Range<usize>, at: Position) -> Result<f64, ParseError> {
    let field = column(line, range);
    field
        .parse()
        .map_err(|_| ParseError::new(at, BadNumber(EChar::new(field.as_bytes()))))
}

pub(crate) fn atom_kind(symbol: &str, at: Position) -> Result<AtomKind, ParseError> {
    if let Some(p) = element::from_symbol(symbol.as_bytes()) {
        return Ok(AtomKind::Element(p));
    }
    if let Some(rest) = symbol.strip_prefix('R') {
        if rest.is_empty() || rest == "#" {
            return Ok(AtomKind::RGroup(0));
        }
        if let Ok(n) = rest.parse() {
            return Ok(AtomKind::RGroup(n));
        }
    }
    if GENERIC_LABELS.contains(&symbol) {
        return Ok(AtomKind::Label(symbol.into()));
    }
    Err(ParseError::new(at, UnknownElement(EChar::new(symbol.as_bytes()))))
}

/// Read a V2000 molfile.
///
/// Text with fewer than four lines is split on `|` instead, for molfiles passed through
/// single-line channels.
#[instrument(level = "debug", skip(text))]
pub fn parse_molfile(text: &str) -> Result<Molecule, ParseError> {
    let mut lines = text.lines().collect::<Vec<_>>();
    if lines.len() < 4 {
        lines = text.split('|').collect();
    }
    let line = |i: usize| {
        lines
            .get(i)
            .copied()
            .ok_or(ParseError::new(Position::Line(i + 1), UnexpectedEnd))
    };

    let counts = line(3)?;
    let at = Position::Line(4);
    let natoms = int_column(counts, 0..3, true, at)?.max(0) as usize;
    let nbonds = int_column(counts, 3..6, true, at)?.max(0) as usize;

    let mut mol = Molecule::new();
    for k in 0..natoms {
        let i = 4 + k;
        let (l, at) = (line(i)?, Position::Line(i + 1));
        let x = float_column(l, 0..10, at)?;
        let y = float_column(l, 10..20, at)?;
        let kind = atom_kind(column(l, 31..34), at)?;
        let charge = match int_column(l, 36..39, false, at)? {
            c @ 1..=7 => 4 - c,
            _ => 0,
        };
        let map = int_column(l, 60..63, false, at)?;
        let mut atom = Atom::with_kind(kind).charged(charge as i8).at(x, y);
        atom.map = (map > 0).then_some(map as u32);
        mol.add_atom(atom);
    }

    for k in 0..nbonds {
        let i = 4 + natoms + k;
        let (l, at) = (line(i)?, Position::Line(i + 1));
        let mut ends = [NodeIndex::end(); 2];
        for (end, range) in ends.iter_mut().zip([0..3, 3..6]) {
            let a = int_column(l, range, true, at)?;
            if a < 1 || a as usize > natoms {
                return Err(ParseError::new(at, AtomOutOfRange(a.max(0) as usize, natoms)));
            }
            *end = NodeIndex::new(a as usize - 1);
        }
        let order = match int_column(l, 6..9, true, at)? {
            o @ 1..=3 => BondOrder::from_order(o as u8).unwrap_or(BondOrder::Single),
            4 => BondOrder::Query(QueryBond::Aromatic),
            8 => BondOrder::Query(QueryBond::Any),
            o => return Err(ParseError::new(at, BadBondOrder(o))),
        };
        let stereo = match (order, int_column(l, 9..12, false, at)?) {
            (BondOrder::Single, 1) => BondStereo::Up,
            (BondOrder::Single, 6) => BondStereo::Down,
            _ => BondStereo::None,
        };
        mol.add_bond(ends[0], ends[1], Bond::new(order).with_stereo(stereo))
            .map_err(|err| ParseError::new(at, err.into()))?;
    }

    let mut charges_seen = false;
    for (i, l) in lines.iter().enumerate().skip(4 + natoms + nbonds) {
        let at = Position::Line(i + 1);
        if l.starts_with("M  END") {
            break;
        }
        let pairs = |prefix: &str| -> Result<Vec<(NodeIndex, i32)>, ParseError> {
            let fields = l[prefix.len()..].split_ascii_whitespace().skip(1);
            let mut out = Vec::new();
            let nums = fields
                .map(|f| signed(f, at))
                .collect::<Result<Vec<_>, _>>()?;
            for pair in nums.chunks_exact(2) {
                let a = pair[0];
                if a < 1 || a as usize > mol.atom_count() {
                    return Err(ParseError::new(at, AtomOutOfRange(a.max(0) as usize, natoms)));
                }
                out.push((NodeIndex::new(a as usize - 1), pair[1]));
            }
            Ok(out)
        };
        if l.starts_with("M  CHG") {
            let found = pairs("M  CHG")?;
            if !charges_seen {
                charges_seen = true;
                for n in mol.graph().node_indices().collect::<Vec<_>>() {
                    mol.set_charge(n, 0)?;
                }
            }
            for (n, q) in found {
                mol.set_charge(n, q.clamp(i8::MIN as i32, i8::MAX as i32) as i8)?;
            }
        } else if l.starts_with("M  APO") {
            for (n, point) in pairs("M  APO")? {
                let (x, y) = mol.atom(n).map_or((0.0, 0.0), |a| (a.x, a.y));
                let r = mol.add_atom(Atom::r_group(point.clamp(0, u8::MAX as i32) as u8).at(x + 1.0, y));
                mol.add_bond(n, r, Bond::single())
                    .map_err(|err| ParseError::new(at, err.into()))?;
            }
        }
    }
    mol.derive_valence();
    debug!(atoms = natoms, bonds = nbonds, "parsed molfile");
    Ok(mol)
}
