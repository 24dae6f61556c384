pub mod molfile;
pub mod native;
pub mod smiles;

pub use molfile::{to_molfile, write_molfile};
pub use native::{to_native_text, write_native};
pub use smiles::{generate_smiles, to_smiles, SmilesConfig, SmilesReport};
