//! Projector executable layout
//!
//! A projector executable is a player stub with a movie and an 8-byte
//! trailer appended. The trailer is the magic marker plus the movie length,
//! and the variant decides where it sits relative to the movie.
//!
//! ```text
//!   windows                       linux
//! ┌─────────────────────────┐   ┌─────────────────────────┐
//! │  stub (unchanged)       │   │  stub (unchanged)       │
//! ├─────────────────────────┤   ├─────────────────────────┤
//! │  movie                  │   │  length (i32 LE)        │
//! ├─────────────────────────┤   ├─────────────────────────┤
//! │  magic 56 34 12 FA      │   │  magic 56 34 12 FA      │
//! ├─────────────────────────┤   ├─────────────────────────┤
//! │  length (i32 LE)        │   │  movie                  │
//! └─────────────────────────┘   └─────────────────────────┘
//! ```

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::error::{BundleError, Result};

/// Marker the stub searches for to find the length field.
pub const TRAILER_MAGIC: [u8; 4] = [0x56, 0x34, 0x12, 0xFA];

/// Width of the length field in bytes.
pub const LENGTH_SIZE: usize = 4;

/// Size of magic + length.
pub const TRAILER_SIZE: usize = TRAILER_MAGIC.len() + LENGTH_SIZE;

/// Largest movie the signed 32-bit length field can describe.
pub const MAX_BUNDLE_LEN: usize = i32::MAX as usize;

/// Segment ordering of the assembled executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// `[stub][movie][magic][length]`
    Windows,
    /// `[stub][length][magic][movie]`
    Linux,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Windows, Variant::Linux];

    /// The keyword accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Windows => "windows",
            Variant::Linux => "linux",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| BundleError::ParseVariant(s.to_string()))
    }
}

/// Magic marker plus movie length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    bundle_len: u32,
}

impl Trailer {
    /// Trailer describing a movie of `len` bytes.
    pub fn for_len(len: u64) -> Result<Self> {
        if len > MAX_BUNDLE_LEN as u64 {
            return Err(BundleError::BundleTooLarge { len });
        }
        Ok(Self {
            bundle_len: len as u32,
        })
    }

    pub fn for_bundle(bundle: &[u8]) -> Result<Self> {
        Self::for_len(bundle.len() as u64)
    }

    pub fn bundle_len(&self) -> usize {
        self.bundle_len as usize
    }

    /// Length field as written to disk.
    pub fn length_bytes(&self) -> [u8; LENGTH_SIZE] {
        (self.bundle_len as i32).to_le_bytes()
    }

    /// Trailer bytes in the order `variant` writes them.
    pub fn to_bytes(&self, variant: Variant) -> [u8; TRAILER_SIZE] {
        let mut bytes = [0u8; TRAILER_SIZE];
        let (first, second) = bytes.split_at_mut(LENGTH_SIZE);
        match variant {
            Variant::Windows => {
                first.copy_from_slice(&TRAILER_MAGIC);
                second.copy_from_slice(&self.length_bytes());
            }
            Variant::Linux => {
                first.copy_from_slice(&self.length_bytes());
                second.copy_from_slice(&TRAILER_MAGIC);
            }
        }
        bytes
    }

    /// Read a trailer laid out for `variant`. Returns `None` if the magic
    /// is missing or the length is outside the signed 32-bit range.
    pub fn from_bytes(bytes: &[u8], variant: Variant) -> Option<Self> {
        let bytes = bytes.get(..TRAILER_SIZE)?;
        let (magic, length) = match variant {
            Variant::Windows => (&bytes[..4], &bytes[4..]),
            Variant::Linux => (&bytes[4..], &bytes[..4]),
        };
        if magic != TRAILER_MAGIC {
            return None;
        }
        let len = u32::from_le_bytes(length.try_into().ok()?);
        Self::for_len(len as u64).ok()
    }
}

/// Encode a movie length into the 4-byte little-endian field.
pub fn encode_length(len: usize) -> Result<[u8; LENGTH_SIZE]> {
    Ok(Trailer::for_len(len as u64)?.length_bytes())
}

/// A stub and movie checked against the length limit and ready to write.
#[derive(Debug, Clone, Copy)]
pub struct Assembly<'a> {
    variant: Variant,
    stub: &'a [u8],
    bundle: &'a [u8],
    trailer: Trailer,
}

impl<'a> Assembly<'a> {
    pub fn new(variant: Variant, stub: &'a [u8], bundle: &'a [u8]) -> Result<Self> {
        Ok(Self {
            variant,
            stub,
            bundle,
            trailer: Trailer::for_bundle(bundle)?,
        })
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn trailer(&self) -> Trailer {
        self.trailer
    }

    /// Total size of the assembled executable.
    pub fn output_len(&self) -> u64 {
        (self.stub.len() + self.bundle.len() + TRAILER_SIZE) as u64
    }

    /// Segments in the order they appear on disk, with the trailer bytes
    /// borrowed from `trailer`.
    fn segments<'t>(&'t self, trailer: &'t [u8; TRAILER_SIZE]) -> [(&'static str, &'t [u8]); 3] {
        match self.variant {
            Variant::Windows => [
                ("stub", self.stub),
                ("movie", self.bundle),
                ("trailer", &trailer[..]),
            ],
            Variant::Linux => [
                ("stub", self.stub),
                ("trailer", &trailer[..]),
                ("movie", self.bundle),
            ],
        }
    }

    /// Write stub, movie and trailer in variant order.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<u64> {
        let trailer = self.trailer.to_bytes(self.variant);
        for (segment, bytes) in self.segments(&trailer) {
            writer.write_all(bytes)?;
            tracing::debug!(segment, len = bytes.len(), "wrote segment");
        }
        Ok(self.output_len())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let trailer = self.trailer.to_bytes(self.variant);
        let mut out = Vec::with_capacity(self.output_len() as usize);
        for (_, bytes) in self.segments(&trailer) {
            out.extend_from_slice(bytes);
        }
        out
    }
}

/// Build the assembled executable in memory.
pub fn assemble_bytes(variant: Variant, stub: &[u8], bundle: &[u8]) -> Result<Vec<u8>> {
    Ok(Assembly::new(variant, stub, bundle)?.to_bytes())
}
