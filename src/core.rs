//! Atoms and bonds, the weights of the molecule graph

use crate::element;
use modular_bitfield::prelude::*;
use petgraph::prelude::*;
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Most bonds a single atom may have to other heavy atoms
pub const MAX_BONDS_ON_ATOM: usize = 6;
/// Most hydrogens that fit in the packed atom data
pub const MAX_HYDROGENS: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TooMany {
    H,
    Heavy,
}
impl TooMany {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::H => "hydrogen",
            Self::Heavy => "heavy atom",
        }
    }
    pub fn max(self) -> usize {
        match self {
            Self::H => MAX_HYDROGENS as _,
            Self::Heavy => MAX_BONDS_ON_ATOM,
        }
    }
}
impl Display for TooMany {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("too many {0} bonds: attempted to set {1}, the max is {}", .0.max())]
pub struct TooManyBonds(pub TooMany, pub usize);

/// Bit-packed per-atom state
#[bitfield]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AtomData {
    pub hydrogen: B4,
    /// The hydrogen count was given explicitly and valence derivation leaves it alone
    pub fixed_hydrogen: bool,
    /// Highlight color, 0 is none
    pub highlight: B3,
}

/// What kind of thing sits at a node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AtomKind {
    /// A real element, by atomic number
    Element(u8),
    /// Substituent placeholder, `R` for 0, `R1`, `R2`...
    RGroup(u8),
    /// Generic or query atom, kept as its text
    Label(Box<str>),
}
impl AtomKind {
    pub fn symbol(&self) -> Cow<'_, str> {
        match self {
            Self::Element(p) => Cow::Borrowed(element::symbol(*p)),
            Self::RGroup(0) => Cow::Borrowed("R"),
            Self::RGroup(n) => Cow::Owned(format!("R{n}")),
            Self::Label(l) => Cow::Borrowed(l),
        }
    }
    /// Atomic number, if this is an element
    pub fn protons(&self) -> Option<u8> {
        match self {
            Self::Element(p) => Some(*p),
            _ => None,
        }
    }
    /// Numeric class used to seed canonical ranking. Labels hash their first two characters.
    pub fn class(&self) -> u64 {
        match self {
            Self::Element(p) => *p as u64,
            Self::RGroup(n) => 120 + *n as u64,
            Self::Label(l) => {
                let b = l.as_bytes();
                let c1 = b.first().map_or(0, |&c| (c as i64 - b'A' as i64 + 1).max(0));
                let c2 = b.get(1).map_or(0, |&c| (c as i64 - b'a' as i64).max(0));
                256 + (c1 * 28 + c2) as u64
            }
        }
    }
}

/// Generic atom labels understood by every reader
pub const GENERIC_LABELS: [&str; 7] = ["X", "A", "Q", "*", "a", "L", "LP"];

/// Does this label read back from native text without brackets?
pub fn is_plain_label(label: &str) -> bool {
    GENERIC_LABELS.contains(&label) || label.contains([',', ';', '#', '!'])
}

/// An atom in the molecule graph
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub kind: AtomKind,
    pub charge: i8,
    /// 2D position, y pointing up
    pub x: f64,
    pub y: f64,
    /// Atom-map number
    pub map: Option<u32>,
    pub data: AtomData,
}
impl Atom {
    pub fn new(protons: u8) -> Self {
        Self::with_kind(AtomKind::Element(protons))
    }
    pub fn with_kind(kind: AtomKind) -> Self {
        Self {
            kind,
            charge: 0,
            x: 0.0,
            y: 0.0,
            map: None,
            data: AtomData::new(),
        }
    }
    pub fn label(label: &str) -> Self {
        Self::with_kind(AtomKind::Label(label.into()))
    }
    pub fn r_group(n: u8) -> Self {
        Self::with_kind(AtomKind::RGroup(n))
    }
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }
    pub fn charged(mut self, charge: i8) -> Self {
        self.charge = charge;
        self
    }

    pub fn is(&self, protons: u8) -> bool {
        self.kind == AtomKind::Element(protons)
    }
    pub fn protons(&self) -> Option<u8> {
        self.kind.protons()
    }
    pub fn symbol(&self) -> Cow<'_, str> {
        self.kind.symbol()
    }
    #[inline(always)]
    pub fn hydrogens(&self) -> u8 {
        self.data.hydrogen()
    }
    pub fn set_hydrogens(&mut self, h: u8) -> Result<(), TooManyBonds> {
        if h <= MAX_HYDROGENS {
            self.data.set_hydrogen(h);
            Ok(())
        } else {
            Err(TooManyBonds(TooMany::H, h as _))
        }
    }
    /// Set a hydrogen count that valence derivation won't overwrite
    pub fn fix_hydrogens(&mut self, h: u8) -> Result<(), TooManyBonds> {
        self.set_hydrogens(h)?;
        self.data.set_fixed_hydrogen(true);
        Ok(())
    }
    pub fn highlight(&self) -> u8 {
        self.data.highlight()
    }
    pub fn set_highlight(&mut self, color: u8) {
        self.data.set_highlight(color.min(6));
    }
    pub fn pos(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}
impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use fmtastic::*;
        f.write_str(&self.symbol())?;
        match self.hydrogens() {
            0 => {}
            1 => f.write_str("H")?,
            h => write!(f, "H{}", Subscript(h))?,
        }
        match self.charge {
            0 => {}
            1 => f.write_str("⁺")?,
            -1 => f.write_str("⁻")?,
            _ => write!(f, "{:+}", Superscript(self.charge))?,
        }
        if f.alternate() {
            if let Some(map) = self.map {
                write!(f, ":{map}")?;
            }
        }
        Ok(())
    }
}

/// Query bond subtypes, with their native text codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryBond {
    Any,
    Aromatic,
    Ring,
    NonRing,
}
impl QueryBond {
    pub const fn code(self) -> i32 {
        match self {
            Self::Any => 11,
            Self::Aromatic => 12,
            Self::Ring => 13,
            Self::NonRing => 14,
        }
    }
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            11 => Some(Self::Any),
            12 => Some(Self::Aromatic),
            13 => Some(Self::Ring),
            14 => Some(Self::NonRing),
            _ => None,
        }
    }
    /// Token used when the bond carries no custom text
    pub const fn default_token(self) -> &'static str {
        match self {
            Self::Any => "~",
            Self::Aromatic => ":",
            Self::Ring => "@",
            Self::NonRing => "!@",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Query(QueryBond),
}
impl BondOrder {
    /// Contribution to the bond-order sum, `None` for query bonds
    pub const fn order(self) -> Option<u8> {
        match self {
            Self::Single => Some(1),
            Self::Double => Some(2),
            Self::Triple => Some(3),
            Self::Query(_) => None,
        }
    }
    pub const fn from_order(order: u8) -> Option<Self> {
        match order {
            1 => Some(Self::Single),
            2 => Some(Self::Double),
            3 => Some(Self::Triple),
            _ => None,
        }
    }
    pub const fn is_query(self) -> bool {
        matches!(self, Self::Query(_))
    }
}
impl Display for BondOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Double => f.write_str("double"),
            Self::Triple => f.write_str("triple"),
            Self::Query(q) => write!(f, "{q:?} query"),
        }
    }
}

/// Stereo marking drawn on a bond.
///
/// `Up` and `Down` wedges have their narrow end on the bond's source atom, the `Cross` variants on
/// its target.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondStereo {
    #[default]
    None,
    Up,
    Down,
    CrossUp,
    CrossDown,
    /// Double bond whose E/Z configuration should be written out
    EzMarked,
}
impl BondStereo {
    /// The same marking after swapping the bond's endpoints
    pub const fn flipped(self) -> Self {
        match self {
            Self::Up => Self::CrossUp,
            Self::Down => Self::CrossDown,
            Self::CrossUp => Self::Up,
            Self::CrossDown => Self::Down,
            s => s,
        }
    }
    pub const fn is_wedge(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::CrossUp | Self::CrossDown)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub order: BondOrder,
    pub stereo: BondStereo,
    /// Custom query text, written verbatim in SMILES
    pub query: Option<Box<str>>,
}
impl Bond {
    pub const fn new(order: BondOrder) -> Self {
        Self {
            order,
            stereo: BondStereo::None,
            query: None,
        }
    }
    pub const fn single() -> Self {
        Self::new(BondOrder::Single)
    }
    pub const fn double() -> Self {
        Self::new(BondOrder::Double)
    }
    pub const fn triple() -> Self {
        Self::new(BondOrder::Triple)
    }
    pub const fn with_stereo(mut self, stereo: BondStereo) -> Self {
        self.stereo = stereo;
        self
    }
}
impl Display for Bond {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.order, f)
    }
}

/// A molecule graph is an undirected graph between atoms, connected with bonds
pub type MoleculeGraph = UnGraph<Atom, Bond>;
