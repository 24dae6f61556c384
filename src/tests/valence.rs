use crate::prelude::*;
use crate::valence::valence_state;
use petgraph::prelude::*;

fn hydrogens(mol: &Molecule, atom: usize) -> u8 {
    mol.atom(NodeIndex::new(atom)).unwrap().hydrogens()
}
fn charge(mol: &Molecule, atom: usize) -> i8 {
    mol.atom(NodeIndex::new(atom)).unwrap().charge
}

#[test]
fn simple_hydrogens() {
    let ethanol = native!("3 2 C 0 0 C 1 0 O 2 0 1 2 1 2 3 1");
    assert_eq!(hydrogens(&ethanol, 0), 3);
    assert_eq!(hydrogens(&ethanol, 1), 2);
    assert_eq!(hydrogens(&ethanol, 2), 1);

    let hcn = native!("2 1 C 0 0 N 1 0 1 2 3");
    assert_eq!(hydrogens(&hcn, 0), 1);
    assert_eq!(hydrogens(&hcn, 1), 0);
}

#[test]
fn charged_atoms() {
    let methoxide = native!("2 1 C 0 0 O- 1 0 1 2 1");
    assert_eq!(hydrogens(&methoxide, 1), 0);
    assert_eq!(charge(&methoxide, 1), -1);

    // a fourth bond on nitrogen makes it cationic
    let mut mol = native!("5 4 N 0 0 C 1 0 C -1 0 C 0 1 C 0 -1 1 2 1 1 3 1 1 4 1 1 5 1");
    assert_eq!(charge(&mol, 0), 1);
    assert_eq!(hydrogens(&mol, 0), 0);
    mol.delete_atom(NodeIndex::new(4)).unwrap();
    assert_eq!(hydrogens(&mol, 0), 1);
}

#[test]
fn element_rules() {
    // carbocation
    assert_eq!(valence_state(6, 3, 3, 1), Some((0, 1)));
    // pentavalent carbon is forced positive
    assert_eq!(valence_state(6, 5, 5, 0), Some((0, 1)));
    assert_eq!(valence_state(7, 4, 4, 0), Some((0, 1)));
    assert_eq!(valence_state(7, 3, 3, -1), Some((0, 0)));
    assert_eq!(valence_state(5, 4, 4, 0), Some((0, -1)));
    assert_eq!(valence_state(8, 3, 3, 0), Some((0, 1)));
    assert_eq!(valence_state(16, 4, 4, 0), Some((0, 0)));
    assert_eq!(valence_state(16, 3, 2, 0), Some((1, 0)));
    assert_eq!(valence_state(17, 0, 0, 0), Some((1, 0)));
    assert_eq!(valence_state(17, 4, 4, 0), Some((0, 0)));
    // no rules for metals
    assert_eq!(valence_state(26, 2, 2, 2), None);
}

#[test]
fn fixed_hydrogens_survive() {
    let mut ammonium = native!("1 0 [NH4+] 0 0");
    assert_eq!(hydrogens(&ammonium, 0), 4);
    assert_eq!(charge(&ammonium, 0), 1);
    ammonium.derive_valence();
    assert_eq!(hydrogens(&ammonium, 0), 4);
    assert_eq!(to_smiles(&ammonium, false), "[NH4+]");
}

#[test]
fn query_bonds_clear_hydrogens() {
    let mol = native!("2 1 C 0 0 C 1 0 1 2 11");
    assert_eq!(hydrogens(&mol, 0), 0);
    assert_eq!(hydrogens(&mol, 1), 0);
}

#[test]
fn labels_have_no_hydrogens() {
    let mol = native!("2 1 C 0 0 R1 1 0 1 2 1");
    assert_eq!(hydrogens(&mol, 1), 0);
    assert_eq!(hydrogens(&mol, 0), 3);
}

#[test]
fn polar_bond_cleanup() {
    let mut mol = native!("2 1 C+ 0 0 O- 1 0 1 2 1");
    assert_eq!(mol.clean_polar_bonds(false), 1);
    assert_eq!(charge(&mol, 0), 0);
    assert_eq!(charge(&mol, 1), 0);
    assert_eq!(mol.bond(EdgeIndex::new(0)).unwrap().order, BondOrder::Double);
    assert_eq!(hydrogens(&mol, 0), 2);
}

#[test]
fn nitro_kept_when_asked() {
    let text = "4 3 C 0 0 N+ 1 0 O 2 0.5 O- 2 -0.5 1 2 1 2 3 2 2 4 1";
    let mut kept = parse_native(text).unwrap();
    assert_eq!(kept.clean_polar_bonds(true), 0);
    let mut merged = parse_native(text).unwrap();
    assert_eq!(merged.clean_polar_bonds(false), 1);
}

#[test]
fn explicit_hydrogens() {
    let mut mol = native!("3 2 C 0 0 O 1 0 H 2 0 1 2 1 2 3 1");
    assert_eq!(hydrogens(&mol, 1), 0);
    assert_eq!(mol.delete_hydrogens(true), 1);
    assert_eq!(mol.atom_count(), 2);
    assert_eq!(hydrogens(&mol, 1), 1);
}
