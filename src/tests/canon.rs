use super::macros::*;
use crate::canon::canonical_ranks;
use crate::prelude::*;
use petgraph::prelude::*;

const ISOPENTANOL: &str = "6 5 C 0 0 C 1 0 C 1 1 C 2 0 C 3 0 O 4 0 1 2 1 2 3 1 2 4 1 4 5 1 5 6 1";
const ISOPENTANOL_REVERSED: &str =
    "6 5 O 4 0 C 3 0 C 2 0 C 1 0 C 1 1 C 0 0 1 2 1 2 3 1 3 4 1 4 5 1 4 6 1";
const TOLUENE: &str = "7 7 C 0 1 C 0.87 0.5 C 0.87 -0.5 C 0 -1 C -0.87 -0.5 C -0.87 0.5 C 0 2 \
                       1 2 2 2 3 1 3 4 2 4 5 1 5 6 2 6 1 1 1 7 1";
const TOLUENE_SHUFFLED: &str = "7 7 C 0.87 -0.5 C 0 2 C -0.87 0.5 C 0 1 C 0 -1 C 0.87 0.5 C -0.87 -0.5 \
                                4 6 2 6 1 1 1 5 2 5 7 1 7 3 2 3 4 1 4 2 1";

#[test]
fn ranks_are_a_permutation() {
    trace_capture!();
    let mol = parse_native(TOLUENE).unwrap();
    let mut ranks = canonical_ranks(&mol, mol.ring_info());
    ranks.sort_unstable();
    assert_eq!(ranks, (1..=7).collect::<Vec<_>>());
}

#[test]
fn seeds_order_atoms() {
    let mol = native!("3 2 C 0 0 C 1 0 O 2 0 1 2 1 2 3 1");
    // methyl, then hydroxyl, then the two-connected carbon
    assert_eq!(canonical_ranks(&mol, mol.ring_info()), [1, 3, 2]);
}

#[test]
fn independent_of_input_order() {
    trace_capture!();
    let a = parse_native(ISOPENTANOL).unwrap();
    let b = parse_native(ISOPENTANOL_REVERSED).unwrap();
    assert!(super::macros::same_structure(&a, &b));
    assert_eq!(to_smiles(&a, false), to_smiles(&b, false));

    let a = parse_native(TOLUENE).unwrap();
    let b = parse_native(TOLUENE_SHUFFLED).unwrap();
    assert!(super::macros::same_structure(&a, &b));
    assert_eq!(to_smiles(&a, false), to_smiles(&b, false));
}

#[test]
fn idempotent() {
    trace_capture!();
    for text in [ISOPENTANOL, TOLUENE_SHUFFLED] {
        let mut mol = parse_native(text).unwrap();
        mol.canonicalize();
        let before = mol.clone();
        let order = mol.canonicalize();
        assert_eq!(order, (0..mol.atom_count()).map(NodeIndex::new).collect::<Vec<_>>());
        assert!(super::macros::same_structure(&before, &mol));
    }
}

#[test]
fn canonicalize_keeps_wedges() {
    let mut mol = native!("4 3 C 0 0 F 0 1 Cl -0.87 -0.5 Br 0.87 -0.5 1 2 -1 1 3 1 1 4 1");
    let order = mol.canonicalize();
    let c = NodeIndex::new(order.iter().position(|&o| o == NodeIndex::new(0)).unwrap());
    let f = NodeIndex::new(order.iter().position(|&o| o == NodeIndex::new(1)).unwrap());
    let e = mol.bond_between(c, f).unwrap();
    let (source, _) = mol.endpoints(e).unwrap();
    let stereo = mol.bond(e).unwrap().stereo;
    if source == c {
        assert_eq!(stereo, BondStereo::Up);
    } else {
        assert_eq!(stereo, BondStereo::CrossUp);
    }
}
