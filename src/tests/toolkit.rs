use crate::parse::toolkit::*;
use crate::prelude::*;
use petgraph::prelude::*;

fn atom(id: u64, symbol: &str, x: f64) -> ToolkitAtom<'_> {
    ToolkitAtom {
        id,
        symbol,
        charge: 0,
        x,
        y: 0.0,
    }
}

#[test]
fn formaldehyde() {
    let mol = from_toolkit(
        [atom(10, "C", 0.0), atom(20, "O", 1.0)],
        [ToolkitBond {
            a: 20,
            b: 10,
            order: COVALENT_DOUBLE,
        }],
    )
    .unwrap();
    assert_eq!(mol.endpoints(EdgeIndex::new(0)), Some((NodeIndex::new(1), NodeIndex::new(0))));
    assert_eq!(to_smiles(&mol, true), "C=O");
}

#[test]
fn bond_codes() {
    assert_eq!(bond_from_toolkit(AROMATIC_SINGLE), Bond::single());
    assert_eq!(bond_from_toolkit(AROMATIC_DOUBLE), Bond::double());
    assert_eq!(
        bond_from_toolkit(AROMATIC),
        Bond::new(BondOrder::Query(QueryBond::Aromatic))
    );
    assert_eq!(
        bond_from_toolkit(STEREO_NEAR),
        Bond::single().with_stereo(BondStereo::Up)
    );
    assert_eq!(
        bond_from_toolkit(STEREO_FAR),
        Bond::single().with_stereo(BondStereo::Down)
    );
    assert_eq!(bond_from_toolkit(STEREO_EITHER), Bond::single());
    assert_eq!(bond_from_toolkit(0x103), Bond::triple());
    assert_eq!(bond_from_toolkit(0x100), Bond::single());
}

#[test]
fn charged_atoms() {
    let mol = from_toolkit(
        [
            atom(1, "C", 0.0),
            ToolkitAtom {
                charge: -1,
                ..atom(2, "O", 1.0)
            },
        ],
        [ToolkitBond {
            a: 1,
            b: 2,
            order: COVALENT_SINGLE,
        }],
    )
    .unwrap();
    assert_eq!(to_smiles(&mol, true), "C[O-]");
}

#[test]
fn unknown_atoms() {
    let err = from_toolkit(
        [atom(1, "C", 0.0)],
        [ToolkitBond {
            a: 1,
            b: 99,
            order: COVALENT_SINGLE,
        }],
    )
    .unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownToolkitAtom(99));

    let err = from_toolkit([atom(1, "Qq", 0.0)], []).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnknownElement(_)));
}
