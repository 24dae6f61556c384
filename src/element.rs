//! Periodic table symbol lookup

/// Element symbols, indexed by atomic number. Index 0 is unused.
#[rustfmt::skip]
pub const SYMBOLS: [&str; 119] = [
    "?",
    "H",                                                                                                                                   "He",
    "Li", "Be",                                                                                            "B",  "C",  "N",  "O",  "F",  "Ne",
    "Na", "Mg",                                                                                            "Al", "Si", "P",  "S",  "Cl", "Ar",
    "K",  "Ca", "Sc",                                                  "Ti", "V",  "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr",
    "Rb", "Sr", "Y",                                                   "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "I",  "Xe",
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W",  "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    "Fr", "Ra", "Ac", "Th", "Pa", "U",  "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

pub const H: u8 = 1;
pub const B: u8 = 5;
pub const C: u8 = 6;
pub const N: u8 = 7;
pub const O: u8 = 8;
pub const F: u8 = 9;
pub const SI: u8 = 14;
pub const P: u8 = 15;
pub const S: u8 = 16;
pub const CL: u8 = 17;
pub const SE: u8 = 34;
pub const BR: u8 = 35;
pub const I: u8 = 53;

/// Symbol for an atomic number, or `"?"` if it's out of range
pub fn symbol(protons: u8) -> &'static str {
    SYMBOLS.get(protons as usize).copied().unwrap_or("?")
}

/// Atomic number for a symbol, matched case-sensitively
pub fn from_symbol(sym: &[u8]) -> Option<u8> {
    SYMBOLS
        .iter()
        .skip(1)
        .position(|s| s.as_bytes() == sym)
        .map(|i| i as u8 + 1)
}

/// Is this one of the halogens the valence rules know about?
pub const fn is_halogen(protons: u8) -> bool {
    matches!(protons, F | CL | BR | I)
}

/// Elements that can take part in an aromatic ring
pub const fn can_be_aromatic(protons: u8) -> bool {
    matches!(protons, C | N | P | O | S | SE)
}
