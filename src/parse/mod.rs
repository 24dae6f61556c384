use crate::molecule::{Molecule, StructuralError};
use crate::utils::echar::*;
use thiserror::Error;

pub mod molfile;
pub mod native;
pub mod toolkit;

pub use molfile::parse_molfile;
pub use native::{parse_native, parse_native_reaction};
pub use toolkit::{from_toolkit, ToolkitAtom, ToolkitBond};

/// Inner enum for `ParseError`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("expected an integer, found {0}")]
    BadInteger(EChar),
    #[error("expected a number, found {0}")]
    BadNumber(EChar),
    #[error("{0} is not a recognized element")]
    UnknownElement(EChar),
    #[error("unexpected {0} in atom")]
    BadAtom(TextByte),
    #[error("atom {0} is out of range, there are only {1} atoms")]
    AtomOutOfRange(usize, usize),
    #[error("{0} is not a supported bond order")]
    BadBondOrder(i32),
    #[error("input continues after the last bond")]
    TrailingTokens,
    #[error("a reaction needs three roles separated by '>', found {0}")]
    BadReaction(usize),
    #[error("toolkit atom {0} was never added")]
    UnknownToolkitAtom(u64),
    #[error(transparent)]
    Structure(#[from] StructuralError),
}

/// Something went wrong reading a molecule. Nothing is kept from a failed parse.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("an error occured at {position}: {kind}")]
pub struct ParseError {
    pub position: Position,
    pub kind: ParseErrorKind,
}
impl ParseError {
    /// Convenience method
    pub const fn new(position: Position, kind: ParseErrorKind) -> Self {
        Self { position, kind }
    }
}
impl From<StructuralError> for ParseError {
    fn from(value: StructuralError) -> Self {
        Self::new(Position::Unknown, value.into())
    }
}

/// Text formats a molecule can be read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `natoms nbonds {symbol x y}* {a1 a2 code}*`
    Native,
    /// MDL molfile, V2000
    MolFile,
}

/// Read a molecule in the given format
pub fn parse_molecule(text: &str, format: Format) -> Result<Molecule, ParseError> {
    match format {
        Format::Native => parse_native(text),
        Format::MolFile => parse_molfile(text),
    }
}
