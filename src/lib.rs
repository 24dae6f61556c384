pub mod canon;
pub mod core;
pub mod disp;
pub mod element;
pub mod graph;
pub mod molecule;
pub mod parse;
pub mod reaction;
pub mod stereo;
pub mod traverse;
pub mod utils;
pub mod valence;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use crate::core::*;
    pub use crate::disp::{generate_smiles, to_molfile, to_native_text, to_smiles, SmilesConfig};
    pub use crate::molecule::{Molecule, StructuralError};
    pub use crate::native;
    pub use crate::parse::{
        from_toolkit, parse_molecule, parse_molfile, parse_native, parse_native_reaction, Format,
        ParseError, ParseErrorKind, ToolkitAtom, ToolkitBond,
    };
    pub use crate::reaction::Reaction;
    pub use crate::stereo::StereoIssue;
}
