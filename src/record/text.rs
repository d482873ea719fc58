//! Fixed-width text fields
//!
//! ASCII text stored NUL-padded in a `[u8; N]`. At most `N - 1` bytes are
//! used so every field keeps a terminating NUL on disk.

use std::fmt;

/// A NUL-padded text field of exactly `N` bytes
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedText<const N: usize>([u8; N]);

impl<const N: usize> FixedText<N> {
    /// Longest text that fits (one byte is reserved for the NUL)
    pub const MAX_LEN: usize = N - 1;

    /// Build a field from `text`; returns `None` if it is not ASCII or too long
    pub fn new(text: &str) -> Option<Self> {
        if !text.is_ascii() || text.len() > Self::MAX_LEN {
            return None;
        }
        let mut buf = [0u8; N];
        buf[..text.len()].copy_from_slice(text.as_bytes());
        Some(Self(buf))
    }

    /// Wrap raw bytes read from disk
    pub fn from_bytes(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// The raw on-disk bytes
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// The text up to the first NUL, or `None` if those bytes are not UTF-8
    pub fn try_as_str(&self) -> Option<&str> {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(N);
        std::str::from_utf8(&self.0[..end]).ok()
    }

    /// The text up to the first NUL (empty if the bytes are not UTF-8)
    pub fn as_str(&self) -> &str {
        self.try_as_str().unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }
}

impl<const N: usize> Default for FixedText<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> fmt::Debug for FixedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl<const N: usize> fmt::Display for FixedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
