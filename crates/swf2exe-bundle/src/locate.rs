//! Recover the stub and movie from an assembled projector executable.
//!
//! Windows executables keep the trailer at the very end, so the split is a
//! fixed-size read. Linux executables put the trailer in front of the movie;
//! the magic is searched for from the start and the first hit whose length
//! field reaches exactly to the end of the file wins.

use std::fs;
use std::path::Path;

use crate::error::{BundleError, Result};
use crate::format::{Trailer, Variant, LENGTH_SIZE, TRAILER_MAGIC, TRAILER_SIZE};

/// Borrowed view of an assembled executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitExecutable<'a> {
    pub variant: Variant,
    pub stub: &'a [u8],
    pub bundle: &'a [u8],
}

impl SplitExecutable<'_> {
    pub fn into_owned(self) -> OwnedSplit {
        OwnedSplit {
            variant: self.variant,
            stub: self.stub.to_vec(),
            bundle: self.bundle.to_vec(),
        }
    }
}

/// Owned stub and movie read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedSplit {
    pub variant: Variant,
    pub stub: Vec<u8>,
    pub bundle: Vec<u8>,
}

/// Split `data` assuming it was assembled with `variant`.
pub fn split(data: &[u8], variant: Variant) -> Option<SplitExecutable<'_>> {
    match variant {
        Variant::Windows => split_windows(data),
        Variant::Linux => split_linux(data),
    }
}

/// Split `data` with whichever layout matches, trying windows first.
pub fn detect(data: &[u8]) -> Option<SplitExecutable<'_>> {
    split_windows(data).or_else(|| split_linux(data))
}

/// Read `path` and split it. `Ok(None)` means the file carries no movie.
pub fn read_split(path: &Path) -> Result<Option<OwnedSplit>> {
    let data = fs::read(path).map_err(|e| BundleError::io(path, e))?;
    let found = detect(&data).map(SplitExecutable::into_owned);
    match &found {
        Some(s) => tracing::debug!(
            path = %path.display(),
            variant = %s.variant,
            bundle_len = s.bundle.len(),
            "found embedded movie"
        ),
        None => tracing::debug!(path = %path.display(), "no embedded movie"),
    }
    Ok(found)
}

fn split_windows(data: &[u8]) -> Option<SplitExecutable<'_>> {
    let trailer_start = data.len().checked_sub(TRAILER_SIZE)?;
    let trailer = Trailer::from_bytes(&data[trailer_start..], Variant::Windows)?;
    let bundle_start = trailer_start.checked_sub(trailer.bundle_len())?;

    Some(SplitExecutable {
        variant: Variant::Windows,
        stub: &data[..bundle_start],
        bundle: &data[bundle_start..trailer_start],
    })
}

fn split_linux(data: &[u8]) -> Option<SplitExecutable<'_>> {
    if data.len() < TRAILER_SIZE {
        return None;
    }
    let mut from = LENGTH_SIZE;
    while let Some(offset) = find(&data[from..], &TRAILER_MAGIC) {
        let magic_at = from + offset;
        let trailer_start = magic_at - LENGTH_SIZE;
        if let Some(trailer) = Trailer::from_bytes(&data[trailer_start..], Variant::Linux) {
            let bundle_start = trailer_start + TRAILER_SIZE;
            if bundle_start + trailer.bundle_len() == data.len() {
                return Some(SplitExecutable {
                    variant: Variant::Linux,
                    stub: &data[..trailer_start],
                    bundle: &data[bundle_start..],
                });
            }
        }
        from = magic_at + 1;
    }
    None
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
