use super::macros::*;
use crate::prelude::*;
use petgraph::prelude::*;

#[test]
fn write_simple() {
    let mol = native!("2 1 C 0.0 0.0 N 1.0 0.0 1 2 1");
    let text = to_molfile(&mol, "methylamine");
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "methylamine");
    assert_eq!(lines[1], crate::disp::molfile::PROGRAM_LINE);
    assert_eq!(lines[2], "");
    assert!(lines[3].starts_with("  2  1  0"));
    assert!(lines[3].ends_with("V2000"));
    assert_eq!(
        lines[4],
        "    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0"
    );
    assert!(lines[5].starts_with("    1.0000    0.0000    0.0000 N "));
    assert_eq!(lines[6], "  1  2  1  0  0  0  0");
    assert_eq!(lines.last(), Some(&"M  END"));
}

#[test]
fn empty_molecule() {
    assert_eq!(to_molfile(&Molecule::new(), "nothing"), "");
}

#[test]
fn long_titles() {
    let mol = native!("1 0 C 0 0");
    let title = "x".repeat(100);
    let text = to_molfile(&mol, &title);
    let first = text.lines().next().unwrap();
    assert_eq!(first.len(), 79);
    assert!(first.ends_with("..."));
}

#[test]
fn shifted_to_origin() {
    let mol = native!("2 1 C -2 3 O -1 4 1 2 1");
    let text = to_molfile(&mol, "");
    let parsed = parse_molfile(&text).unwrap();
    let atom = parsed.atom(NodeIndex::new(0)).unwrap();
    assert_eq!(atom.pos(), [0.0, 0.0]);
    assert_eq!(parsed.atom(NodeIndex::new(1)).unwrap().pos(), [1.0, 1.0]);
}

#[test]
fn round_trip() {
    trace_capture!();
    let mol = native!(
        "7 7 C 0 1 C 0.87 0.5 C 0.87 -0.5 C 0 -1 C -0.87 -0.5 C -0.87 0.5 O- 0 2 \
         1 2 2 2 3 1 3 4 2 4 5 1 5 6 2 6 1 1 1 7 1"
    );
    let text = to_molfile(&mol, "phenoxide");
    assert!(text.contains("M  CHG  1   7  -1"));
    let back = parse_molfile(&text).unwrap();
    assert!(same_structure(&mol, &back));
    assert_eq!(to_smiles(&mol, true), to_smiles(&back, true));
}

#[test]
fn wedges() {
    let mol = native!("4 3 C 0 0 F 0 1 Cl -0.87 -0.5 Br 0.87 -0.5 2 1 -2 1 3 1 1 4 1");
    let text = to_molfile(&mol, "");
    assert!(text.contains("\n  2  1  1  6  0  0  0\n"));
    let back = parse_molfile(&text).unwrap();
    let e = back.bond_between(NodeIndex::new(0), NodeIndex::new(1)).unwrap();
    assert_eq!(back.endpoints(e), Some((NodeIndex::new(1), NodeIndex::new(0))));
    assert_eq!(back.bond(e).unwrap().stereo, BondStereo::Down);
}

#[test]
fn single_line() {
    let mol = native!("2 1 C 0 0 O 1 0 1 2 1");
    let text = to_molfile(&mol, "").replace('\n', "|");
    let back = parse_molfile(&text).unwrap();
    assert_eq!(to_smiles(&back, true), "CO");
}

#[test]
fn charge_column_and_apo() {
    let text = "\n  test\n\n  2  1  0  0  0  0  0  0  0  0999 V2000\n\
                \x20   0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0\n\
                \x20   1.0000    0.0000    0.0000 O   0  5  0  0  0  0  0  0  0  0  0  0\n\
                \x20 1  2  1  0  0  0  0\n\
                M  APO  1   1   1\n\
                M  END\n";
    let mol = parse_molfile(text).unwrap();
    assert_eq!(mol.atom(NodeIndex::new(1)).unwrap().charge, -1);
    assert_eq!(mol.atom_count(), 3);
    assert_eq!(mol.atom(NodeIndex::new(2)).unwrap().kind, AtomKind::RGroup(1));
    assert_eq!(mol.degree(NodeIndex::new(0)), 2);
}

#[test]
fn errors() {
    let good = to_molfile(&native!("2 1 C 0 0 O 1 0 1 2 1"), "");
    let bad_order = good.replace("  1  2  1  0", "  1  2  5  0");
    assert!(matches!(
        parse_molfile(&bad_order),
        Err(ParseError {
            kind: ParseErrorKind::BadBondOrder(5),
            ..
        })
    ));
    let truncated = good.lines().take(5).collect::<Vec<_>>().join("\n");
    assert!(matches!(
        parse_molfile(&truncated),
        Err(ParseError {
            kind: ParseErrorKind::UnexpectedEnd,
            ..
        })
    ));
    let unknown = good.replace(" O ", " Zz");
    assert!(matches!(
        parse_molfile(&unknown),
        Err(ParseError {
            kind: ParseErrorKind::UnknownElement(_),
            ..
        })
    ));
}

#[test]
fn oversized_property_fields() {
    let good = to_molfile(&native!("2 1 C 0 0 O 1 0 1 2 1"), "");
    for prop in ["M  CHG  1   1 99999999999", "M  APO  1 99999999999   1"] {
        let text = good.replace("M  END", &format!("{prop}\nM  END"));
        let err = parse_molfile(&text).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::BadInteger(_)), "{prop}");
        assert_eq!(err.position, crate::utils::echar::Position::Line(8));
    }
}
