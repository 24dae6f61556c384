use std::fmt::{self, Debug, Display, Formatter};

/// Stack-allocated short string, for use with errors.
///
/// Longer input is cut off at `N` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EChar<const N: usize = 8> {
    buf: [u8; N],
    len: u8,
}
impl<const N: usize> EChar<N> {
    pub fn new(bytes: &[u8]) -> Self {
        let len = bytes.len().min(N);
        let mut buf = [0u8; N];
        buf[..len].copy_from_slice(&bytes[..len]);
        Self {
            buf,
            len: len as u8,
        }
    }
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..(self.len as usize)]
    }
}
impl<const N: usize> Display for EChar<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(bstr::BStr::new(self.as_slice()), f)
    }
}

/// A wrapper around a byte that prints escape codes.
///
/// The `Display` impl substitutes `\n`, `\r`, `\t`, and hex codes, and wraps the output in single quotes.
/// `None` prints as "end of token".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextByte(pub Option<u8>);
impl Display for TextByte {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => f.write_str("end of token"),
            Some(c @ 32..=126) => write!(f, "'{}'", c as char),
            Some(b'\n') => f.write_str("'\\n'"),
            Some(b'\r') => f.write_str("'\\r'"),
            Some(b'\t') => f.write_str("'\\t'"),
            Some(c) => write!(f, "'\\x{c:0>2x}'"),
        }
    }
}

/// Where in the input a parse error happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// 1-based whitespace-separated token
    Token(usize),
    /// 1-based line
    Line(usize),
    Unknown,
}
impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(n) => write!(f, "token {n}"),
            Self::Line(n) => write!(f, "line {n}"),
            Self::Unknown => f.write_str("unknown position"),
        }
    }
}
