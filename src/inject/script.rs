//! Immutable injection script.

use crate::error::Error;

/// The bytes to type, with an authoritative length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Script<'a> {
    bytes: &'a [u8],
}

impl<'a> Script<'a> {
    /// Script whose length is the length of `bytes`.
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Script limited to a separately declared length.
    ///
    /// A declared length shorter than `bytes` types only the prefix. A longer
    /// one would read past the script and is rejected.
    pub fn with_declared_len(bytes: &'a [u8], declared: usize) -> Result<Self, Error> {
        match bytes.get(..declared) {
            Some(prefix) => Ok(Self { bytes: prefix }),
            None => Err(Error::ScriptLength {
                declared,
                actual: bytes.len(),
            }),
        }
    }

    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte at `index`, `None` past the end.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}
