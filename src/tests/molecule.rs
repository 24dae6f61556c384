use crate::prelude::*;
use petgraph::prelude::*;

#[test]
fn add_and_query() {
    let mut mol = Molecule::new();
    let c = mol.add_atom(Atom::new(6));
    let o = mol.add_atom(Atom::new(8).at(1.0, 0.0));
    let e = mol.add_bond(c, o, Bond::single()).unwrap();
    assert_eq!(mol.atom_count(), 2);
    assert_eq!(mol.bond_count(), 1);
    assert_eq!(mol.bond_between(o, c), Some(e));
    assert_eq!(mol.endpoints(e), Some((c, o)));
    assert_eq!(mol.neighbors(c).as_slice(), &[o]);
}

#[test]
fn refused_bonds() {
    let mut mol = native!("2 1 C 0 0 C 1 0 1 2 1");
    let (a, b) = (NodeIndex::new(0), NodeIndex::new(1));
    let version = mol.version();
    assert_eq!(
        mol.add_bond(a, a, Bond::single()),
        Err(StructuralError::SelfBond(0))
    );
    assert_eq!(
        mol.add_bond(b, a, Bond::double()),
        Err(StructuralError::DuplicateBond(1, 0))
    );
    assert_eq!(
        mol.add_bond(a, NodeIndex::new(5), Bond::single()),
        Err(StructuralError::NoSuchAtom(5))
    );
    assert_eq!(mol.version(), version);
    assert_eq!(mol.bond_count(), 1);
}

#[test]
fn degree_limit() {
    let mut mol = Molecule::new();
    let center = mol.add_atom(Atom::new(16));
    for _ in 0..MAX_BONDS_ON_ATOM {
        let f = mol.add_atom(Atom::new(9));
        mol.add_bond(center, f, Bond::single()).unwrap();
    }
    let extra = mol.add_atom(Atom::new(9));
    assert!(matches!(
        mol.add_bond(center, extra, Bond::single()),
        Err(StructuralError::TooManyBonds(_))
    ));
    assert_eq!(mol.degree(center), MAX_BONDS_ON_ATOM);
}

#[test]
fn edits_bump_version() {
    let mut mol = native!("2 1 C 0 0 O 1 0 1 2 1");
    let v0 = mol.version();
    mol.set_charge(NodeIndex::new(1), -1).unwrap();
    let v1 = mol.version();
    assert!(v1 > v0);
    mol.set_mark(NodeIndex::new(0), Some(3)).unwrap();
    assert!(mol.version() > v1);
    assert_eq!(mol.marks().collect::<Vec<_>>(), [(NodeIndex::new(0), 3)]);
}

#[test]
fn delete_atom_renumbers() {
    let mut mol = native!("3 2 C 0 0 C 1 0 O 2 0 1 2 1 2 3 1");
    mol.set_mark(NodeIndex::new(2), Some(7)).unwrap();
    let removed = mol.delete_atom(NodeIndex::new(0)).unwrap();
    assert!(removed.is(6));
    assert_eq!(mol.atom_count(), 2);
    assert_eq!(mol.bond_count(), 1);
    assert!(mol.atom(NodeIndex::new(1)).unwrap().is(8));
    assert_eq!(mol.marks().collect::<Vec<_>>(), [(NodeIndex::new(1), 7)]);
    // the former middle carbon is now a methyl
    assert_eq!(mol.atom(NodeIndex::new(0)).unwrap().hydrogens(), 3);
    assert_eq!(
        mol.delete_atom(NodeIndex::new(4)),
        Err(StructuralError::NoSuchAtom(4))
    );
}

#[test]
fn delete_bond_drops_lonely_atoms() {
    let mut mol = native!("2 1 C 0 0 O 1 0 1 2 1");
    mol.delete_bond(EdgeIndex::new(0)).unwrap();
    assert!(mol.is_empty());

    let mut mol = native!("3 2 C 0 0 C 1 0 O 2 0 1 2 1 2 3 1");
    mol.delete_bond(EdgeIndex::new(1)).unwrap();
    assert_eq!(mol.atom_count(), 2);
    assert_eq!(to_smiles(&mol, false), "CC");
}

#[test]
fn delete_substituent() {
    let mut mol = native!("4 3 C 0 0 C 1 0 O 2 0 C 3 0 1 2 1 2 3 1 3 4 1");
    let bond = mol.bond_between(NodeIndex::new(1), NodeIndex::new(2)).unwrap();
    assert_eq!(mol.delete_substituent(bond, NodeIndex::new(1)), Ok(2));
    assert_eq!(to_smiles(&mol, false), "CC");
}

#[test]
fn ring_substituent_refused() {
    let mut mol = native!("3 3 C 0 0 C 1 0 C 0.5 0.87 1 2 1 2 3 1 3 1 1");
    let version = mol.version();
    assert_eq!(
        mol.delete_substituent(EdgeIndex::new(0), NodeIndex::new(0)),
        Err(StructuralError::SharedSubstituent(0))
    );
    assert_eq!(mol.atom_count(), 3);
    assert_eq!(mol.version(), version);
}

#[test]
fn cycle_single_bond_stereo() {
    let mut mol = native!("3 2 C 0 0 C 1 0 C 2 0 1 2 1 2 3 1");
    let e = EdgeIndex::new(0);
    let at = NodeIndex::new(1);
    // narrow end on the target, so the cross variants
    assert_eq!(mol.cycle_stereo(e, at), Ok(BondStereo::CrossUp));
    assert_eq!(mol.cycle_stereo(e, at), Ok(BondStereo::CrossDown));
    assert_eq!(mol.cycle_stereo(e, at), Ok(BondStereo::None));
    assert_eq!(mol.cycle_stereo(e, NodeIndex::new(0)), Ok(BondStereo::Up));
}

#[test]
fn cycle_stereo_refused() {
    let mut ethane = native!("2 1 C 0 0 C 1 0 1 2 1");
    assert_eq!(
        ethane.cycle_stereo(EdgeIndex::new(0), NodeIndex::new(0)),
        Err(StructuralError::StereoNotAllowed(0))
    );
    let mut ethene = native!("2 1 C 0 0 C 1 0 1 2 2");
    let e = EdgeIndex::new(0);
    assert_eq!(ethene.cycle_stereo(e, NodeIndex::new(0)), Ok(BondStereo::EzMarked));
    assert_eq!(ethene.cycle_stereo(e, NodeIndex::new(0)), Ok(BondStereo::None));
}

#[test]
fn split_components() {
    let mol = native!("4 2 C 0 0 O 1 0 N 5 0 N 6 0 1 2 1 3 4 1");
    let parts = mol.split();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].atom_count(), 2);
    assert!(parts[1].atom(NodeIndex::new(0)).unwrap().is(7));
    assert_eq!(
        mol.components(),
        [
            vec![NodeIndex::new(0), NodeIndex::new(1)],
            vec![NodeIndex::new(2), NodeIndex::new(3)]
        ]
    );
}

#[test]
fn extract_fragment() {
    let mol = native!("3 2 C 0 0 C 1 0 O 2 0 1 2 1 2 3 1");
    let frag = mol.extract(&[NodeIndex::new(1), NodeIndex::new(2)]);
    assert_eq!(frag.atom_count(), 2);
    assert_eq!(frag.bond_count(), 1);
    assert!(frag.atom(NodeIndex::new(1)).unwrap().is(8));
}
