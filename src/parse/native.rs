//! Reader for the compact `natoms nbonds {symbol x y}* {a1 a2 code}*` notation

use super::{ParseError, ParseErrorKind, ParseErrorKind::*};
use crate::core::*;
use crate::disp::native::{CODE_DOWN, CODE_EZ, CODE_UP};
use crate::element;
use crate::molecule::{Molecule, StructuralError};
use crate::reaction::Reaction;
use crate::utils::echar::*;
use atoi::{FromRadix10Checked, FromRadix10SignedChecked};
use petgraph::prelude::*;
use std::str::SplitAsciiWhitespace;
use tracing::*;

#[macro_export]
macro_rules! native {
    ($text:literal) => {
        $crate::parse::native::parse_native($text)
            .expect(concat!("Failed to parse native text ", $text))
    };
}

/// Whitespace-separated tokens, counting as it goes
#[derive(Debug, Clone)]
struct Tokens<'a> {
    iter: SplitAsciiWhitespace<'a>,
    index: usize,
}
impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            iter: text.split_ascii_whitespace(),
            index: 0,
        }
    }
    /// Position of the last token returned
    fn pos(&self) -> Position {
        Position::Token(self.index)
    }
    fn next(&mut self) -> Result<&'a str, ParseError> {
        self.index += 1;
        self.iter
            .next()
            .ok_or(ParseError::new(self.pos(), UnexpectedEnd))
    }
    fn count(&mut self) -> Result<usize, ParseError> {
        let tok = self.next()?;
        match usize::from_radix_10_checked(tok.as_bytes()) {
            (Some(n), used) if used > 0 && used == tok.len() => Ok(n),
            _ => Err(ParseError::new(self.pos(), BadInteger(EChar::new(tok.as_bytes())))),
        }
    }
    fn int(&mut self) -> Result<i32, ParseError> {
        let tok = self.next()?;
        match i32::from_radix_10_signed_checked(tok.as_bytes()) {
            (Some(n), used) if used > 0 && used == tok.len() => Ok(n),
            _ => Err(ParseError::new(self.pos(), BadInteger(EChar::new(tok.as_bytes())))),
        }
    }
    fn float(&mut self) -> Result<f64, ParseError> {
        let tok = self.next()?;
        tok.parse()
            .map_err(|_| ParseError::new(self.pos(), BadNumber(EChar::new(tok.as_bytes()))))
    }
}

/// Read a molecule from native text. Surrounding quotes are ignored, and empty text gives an
/// empty molecule.
#[instrument(level = "debug", skip(text))]
pub fn parse_native(text: &str) -> Result<Molecule, ParseError> {
    let text = text.trim().trim_matches('"').trim();
    let mut mol = Molecule::new();
    if text.is_empty() {
        return Ok(mol);
    }
    let mut tokens = Tokens::new(text);
    let natoms = tokens.count()?;
    let nbonds = tokens.count()?;
    for _ in 0..natoms {
        let tok = tokens.next()?;
        let atom = parse_atom_token(tok).map_err(|kind| ParseError::new(tokens.pos(), kind))?;
        let x = tokens.float()?;
        let y = tokens.float()?;
        mol.add_atom(atom.at(x, y));
    }
    for _ in 0..nbonds {
        let mut ends = [NodeIndex::end(); 2];
        for end in &mut ends {
            let a = tokens.int()?;
            if a < 1 || a as usize > natoms {
                return Err(ParseError::new(
                    tokens.pos(),
                    AtomOutOfRange(a.max(0) as usize, natoms),
                ));
            }
            *end = NodeIndex::new(a as usize - 1);
        }
        let code = tokens.int()?;
        let bond = bond_from_code(code).ok_or(ParseError::new(tokens.pos(), BadBondOrder(code)))?;
        mol.add_bond(ends[0], ends[1], bond)
            .map_err(|err| ParseError::new(tokens.pos(), err.into()))?;
    }
    if tokens.iter.next().is_some() {
        return Err(ParseError::new(Position::Token(tokens.index + 1), TrailingTokens));
    }
    mol.derive_valence();
    debug!(atoms = natoms, bonds = nbonds, "parsed native text");
    Ok(mol)
}

/// Read a reaction: molecules separated by `|` within a role, and roles separated by `>`
pub fn parse_native_reaction(text: &str) -> Result<Reaction, ParseError> {
    let text = text.trim().trim_matches('"');
    let roles = text.split('>').collect::<Vec<_>>();
    let [reactants, agents, products] = roles[..] else {
        return Err(ParseError::new(Position::Unknown, BadReaction(roles.len())));
    };
    let role = |part: &str| -> Result<Vec<Molecule>, ParseError> {
        part.split('|')
            .filter(|s| !s.trim().is_empty())
            .map(parse_native)
            .collect()
    };
    Ok(Reaction {
        reactants: role(reactants)?,
        agents: role(agents)?,
        products: role(products)?,
    })
}

/// Bond for a native bond code
pub fn bond_from_code(code: i32) -> Option<Bond> {
    match code {
        1 => Some(Bond::single()),
        2 => Some(Bond::double()),
        3 => Some(Bond::triple()),
        CODE_UP => Some(Bond::single().with_stereo(BondStereo::Up)),
        CODE_DOWN => Some(Bond::single().with_stereo(BondStereo::Down)),
        CODE_EZ => Some(Bond::double().with_stereo(BondStereo::EzMarked)),
        _ => QueryBond::from_code(code).map(|q| Bond::new(BondOrder::Query(q))),
    }
}

/// Leading digits of `b` as a `u8`, with how many bytes were read. No digits reads as 0.
fn digit_run(b: &[u8]) -> Result<(u8, usize), ParseErrorKind> {
    match u8::from_radix_10_checked(b) {
        (Some(n), used) => Ok((n, used)),
        (None, used) => Err(BadInteger(EChar::new(&b[..used]))),
    }
}

/// Parse one atom token: an optional bracket, a symbol, an optional hydrogen count and charge,
/// then an optional `:map`.
pub fn parse_atom_token(tok: &str) -> Result<Atom, ParseErrorKind> {
    let (body, map) = match tok.rfind(':') {
        Some(i) if i > 0 => {
            let digits = &tok.as_bytes()[(i + 1)..];
            match u32::from_radix_10_checked(digits) {
                (Some(map), used) if used > 0 && used == digits.len() => (&tok[..i], Some(map)),
                _ => return Err(BadInteger(EChar::new(digits))),
            }
        }
        _ => (tok, None),
    };
    let (body, bracketed) = match body.strip_prefix('[').and_then(|b| b.strip_suffix(']')) {
        Some(inner) => (inner, true),
        None => (body, false),
    };
    if body.contains([',', ';', '#', '!']) {
        let mut atom = Atom::label(body);
        atom.map = map;
        return Ok(atom);
    }

    let b = body.as_bytes();
    let mut i = match b.first() {
        Some(b'*' | b'a') => 1,
        Some(b'L') if b.get(1) == Some(&b'P') => 2,
        Some(b'R') if !b.get(1).is_some_and(u8::is_ascii_lowercase) => 1,
        Some(c) if c.is_ascii_uppercase() => {
            1 + b[1..].iter().take_while(|c| c.is_ascii_lowercase()).count()
        }
        c => return Err(BadAtom(TextByte(c.copied()))),
    };
    let sym = &body[..i];
    let kind = if sym == "R" {
        let (n, used) = digit_run(&b[i..])?;
        i += used;
        AtomKind::RGroup(n)
    } else if let Some(p) = element::from_symbol(sym.as_bytes()) {
        AtomKind::Element(p)
    } else if GENERIC_LABELS.contains(&sym) || bracketed {
        AtomKind::Label(sym.into())
    } else {
        return Err(UnknownElement(EChar::new(sym.as_bytes())));
    };

    let mut hydrogens = None;
    if b.get(i) == Some(&b'H') {
        i += 1;
        let (h, used) = digit_run(&b[i..])?;
        i += used;
        hydrogens = Some(if used == 0 { 1 } else { h });
    }

    let mut charge = 0i32;
    if let Some(&sign @ (b'+' | b'-')) = b.get(i) {
        let unit = if sign == b'+' { 1 } else { -1 };
        i += 1;
        let (n, used) = digit_run(&b[i..])?;
        if used > 0 {
            i += used;
            charge = unit * n as i32;
        } else {
            charge = unit;
            while b.get(i) == Some(&sign) {
                charge += unit;
                i += 1;
            }
        }
    }
    if i < b.len() {
        return Err(BadAtom(TextByte(Some(b[i]))));
    }
    let charge = i8::try_from(charge).map_err(|_| BadInteger(EChar::new(b)))?;

    let mut atom = Atom::with_kind(kind).charged(charge);
    atom.map = map;
    let fixed = match atom.kind {
        AtomKind::Element(_) => bracketed,
        _ => bracketed || hydrogens.is_some(),
    };
    if fixed {
        atom.fix_hydrogens(hydrogens.unwrap_or(0))
            .map_err(StructuralError::from)?;
    }
    Ok(atom)
}
