use super::macros::*;
use crate::parse::native::parse_atom_token;
use crate::prelude::*;
use crate::utils::echar::Position;
use petgraph::prelude::*;

fn kind_of(text: &str) -> ParseErrorKind {
    parse_native(text).unwrap_err().kind
}

#[test]
fn write_simple() {
    let mol = native!("2 1 C 0.0 0.0 N 1.0 0.0 1 2 1");
    assert_eq!(to_native_text(&mol), "2 1 C 0.00 0.00 N 1.00 0.00 1 2 1");
    assert_eq!(mol.to_string(), "2 1 C 0.00 0.00 N 1.00 0.00 1 2 1");
}

#[test]
fn quotes_and_empty() {
    assert!(native!("").is_empty());
    let quoted = native!("\"1 0 O 0 0\"");
    assert_eq!(quoted.atom_count(), 1);
}

#[test]
fn atom_tokens() {
    let atom = parse_atom_token("N+").unwrap();
    assert!(atom.is(7));
    assert_eq!(atom.charge, 1);
    assert_eq!(parse_atom_token("O--").unwrap().charge, -2);
    assert_eq!(parse_atom_token("Fe+2").unwrap().charge, 2);
    assert_eq!(parse_atom_token("C:12").unwrap().map, Some(12));

    let fixed = parse_atom_token("[NH4+]").unwrap();
    assert!(fixed.data.fixed_hydrogen());
    assert_eq!(fixed.hydrogens(), 4);

    assert_eq!(parse_atom_token("R2").unwrap().kind, AtomKind::RGroup(2));
    assert_eq!(parse_atom_token("X").unwrap().kind, AtomKind::Label("X".into()));
    assert_eq!(
        parse_atom_token("C,N").unwrap().kind,
        AtomKind::Label("C,N".into())
    );
    assert_eq!(
        parse_atom_token("[Foo]").unwrap().kind,
        AtomKind::Label("Foo".into())
    );
    assert!(matches!(
        parse_atom_token("Xy"),
        Err(ParseErrorKind::UnknownElement(_))
    ));
    assert!(matches!(
        parse_atom_token("C&"),
        Err(ParseErrorKind::BadAtom(_))
    ));
}

#[test]
fn bond_codes() {
    let mol = native!("5 4 C 0 0 C 1 0 C 2 0 C 3 0 C 4 0 1 2 -1 2 3 -5 3 4 12 5 4 -2");
    let stereo = |e: usize| mol.bond(EdgeIndex::new(e)).unwrap().stereo;
    assert_eq!(stereo(0), BondStereo::Up);
    assert_eq!(stereo(1), BondStereo::EzMarked);
    assert_eq!(
        mol.bond(EdgeIndex::new(2)).unwrap().order,
        BondOrder::Query(QueryBond::Aromatic)
    );
    assert_eq!(stereo(3), BondStereo::Down);
    assert_eq!(mol.endpoints(EdgeIndex::new(3)), Some((NodeIndex::new(4), NodeIndex::new(3))));
}

#[test]
fn round_trip() {
    trace_capture!();
    let text = "5 4 C 0.00 0.00 [NH3+] 1.00 0.00 R1 2.00 0.00 O-:3 3.00 0.00 [Foo] 4.00 0.00 \
                1 2 1 2 3 1 3 4 -1 4 5 13";
    let mol = parse_native(text).unwrap();
    assert_eq!(mol.to_string(), text);
    let back = parse_native(&mol.to_string()).unwrap();
    assert!(same_structure(&mol, &back));
}

#[test]
fn errors() {
    assert_eq!(kind_of("2 1 C 0 0"), ParseErrorKind::UnexpectedEnd);
    assert_eq!(
        kind_of("2 1 C 0 0 N 1 0 1 3 1"),
        ParseErrorKind::AtomOutOfRange(3, 2)
    );
    assert_eq!(
        kind_of("2 1 C 0 0 N 1 0 1 2 7"),
        ParseErrorKind::BadBondOrder(7)
    );
    assert_eq!(kind_of("1 0 C 0 0 5"), ParseErrorKind::TrailingTokens);
    assert!(matches!(kind_of("1 0 Xx 0 0"), ParseErrorKind::UnknownElement(_)));
    assert!(matches!(kind_of("x 0"), ParseErrorKind::BadInteger(_)));
    assert!(matches!(kind_of("1 0 C zero 0"), ParseErrorKind::BadNumber(_)));
    assert!(matches!(
        kind_of("2 1 C 0 0 N 1 0 1 1 1"),
        ParseErrorKind::Structure(StructuralError::SelfBond(0))
    ));

    let err = parse_native("2 1 C 0 0 N 1 0 1 3 1").unwrap_err();
    assert_eq!(err.position, Position::Token(10));
}

#[test]
fn oversized_numbers() {
    for text in [
        "1 0 CH300 0 0",
        "1 0 C+300 0 0",
        "1 0 C+200 0 0",
        "1 0 C:99999999999 0 0",
        "1 0 R999 0 0",
        "99999999999999999999999 0",
        "2 1 C 0 0 C 1 0 1 99999999999 1",
        "2 1 C 0 0 C 1 0 1 2 99999999999",
    ] {
        assert!(matches!(kind_of(text), ParseErrorKind::BadInteger(_)), "{text}");
    }
    assert!(matches!(
        parse_atom_token("NH256"),
        Err(ParseErrorKind::BadInteger(_))
    ));
    assert_eq!(parse_atom_token("R255").unwrap().kind, AtomKind::RGroup(255));
}
