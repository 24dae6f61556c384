//! Adapter for atoms and bonds handed over by an external cheminformatics toolkit

use super::{molfile::atom_kind, ParseError, ParseErrorKind::*};
use crate::core::*;
use crate::molecule::Molecule;
use crate::utils::echar::Position;
use ahash::AHashMap;
use tracing::*;

pub const COVALENT_SINGLE: u32 = 0x001;
pub const COVALENT_DOUBLE: u32 = 0x002;
pub const COVALENT_TRIPLE: u32 = 0x003;
pub const AROMATIC_SINGLE: u32 = 0x201;
pub const AROMATIC_DOUBLE: u32 = 0x202;
pub const AROMATIC: u32 = 0x203;
pub const STEREO_NEAR: u32 = 0x401;
pub const STEREO_FAR: u32 = 0x411;
pub const STEREO_EITHER: u32 = 0x421;

/// An atom as the toolkit reports it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolkitAtom<'a> {
    pub id: u64,
    pub symbol: &'a str,
    pub charge: i8,
    pub x: f64,
    pub y: f64,
}

/// A bond between two toolkit atom ids, with the toolkit's order code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToolkitBond {
    pub a: u64,
    pub b: u64,
    pub order: u32,
}

/// Bond for a toolkit order code. Stereo codes become wedges with the narrow end on the first atom.
pub fn bond_from_toolkit(order: u32) -> Bond {
    match order {
        STEREO_NEAR => Bond::single().with_stereo(BondStereo::Up),
        STEREO_FAR => Bond::single().with_stereo(BondStereo::Down),
        STEREO_EITHER | COVALENT_SINGLE | AROMATIC_SINGLE => Bond::single(),
        COVALENT_DOUBLE | AROMATIC_DOUBLE => Bond::double(),
        COVALENT_TRIPLE => Bond::triple(),
        AROMATIC => Bond::new(BondOrder::Query(QueryBond::Aromatic)),
        o => Bond::new(BondOrder::from_order((o & 7) as u8).unwrap_or(BondOrder::Single)),
    }
}

/// Build a molecule from toolkit atoms and bonds. Atoms keep the order they arrive in.
#[instrument(level = "debug", skip_all)]
pub fn from_toolkit<'a, A, B>(atoms: A, bonds: B) -> Result<Molecule, ParseError>
where
    A: IntoIterator<Item = ToolkitAtom<'a>>,
    B: IntoIterator<Item = ToolkitBond>,
{
    let mut mol = Molecule::new();
    let mut ids = AHashMap::new();
    for atom in atoms {
        let kind = atom_kind(atom.symbol, Position::Unknown)?;
        let idx = mol.add_atom(Atom::with_kind(kind).charged(atom.charge).at(atom.x, atom.y));
        ids.insert(atom.id, idx);
    }
    for bond in bonds {
        let lookup = |id: u64| {
            ids.get(&id)
                .copied()
                .ok_or(ParseError::new(Position::Unknown, UnknownToolkitAtom(id)))
        };
        let (a, b) = (lookup(bond.a)?, lookup(bond.b)?);
        mol.add_bond(a, b, bond_from_toolkit(bond.order))?;
    }
    mol.derive_valence();
    debug!(atoms = mol.atom_count(), bonds = mol.bond_count(), "read toolkit molecule");
    Ok(mol)
}
