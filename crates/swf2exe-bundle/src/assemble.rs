//! File-level assembly
//!
//! Reads the stub and the movie fully, then writes the projector executable:
//! 1. Read stub
//! 2. Read movie
//! 3. Check the movie fits the length field
//! 4. Create (or truncate) the output
//! 5. Write stub, movie and trailer in variant order
//!
//! Nothing is created on disk until both inputs have been read and checked.
//! A failure while writing leaves whatever was written in place.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{BundleError, Result};
use crate::format::{Assembly, Variant};
use crate::stub::StubKind;

/// Sizes of a completed assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleReport {
    pub variant: Variant,
    pub stub_len: u64,
    pub bundle_len: u64,
    pub output_len: u64,
}

/// Assemble `stub_path` + `bundle_path` into `out_path` using `variant`'s layout.
pub fn assemble(
    variant: Variant,
    bundle_path: &Path,
    out_path: &Path,
    stub_path: &Path,
) -> Result<AssembleReport> {
    let stub = fs::read(stub_path).map_err(|e| BundleError::io(stub_path, e))?;
    let bundle = fs::read(bundle_path).map_err(|e| BundleError::io(bundle_path, e))?;

    let kind = StubKind::detect(&stub);
    match kind.variant() {
        Some(expected) if expected != variant => tracing::warn!(
            stub = %stub_path.display(),
            ?kind,
            %variant,
            "stub looks like a {} projector", expected
        ),
        _ => tracing::debug!(?kind, "stub format"),
    }

    let assembly = Assembly::new(variant, &stub, &bundle)?;

    let file = File::create(out_path).map_err(|e| BundleError::io(out_path, e))?;
    let mut writer = BufWriter::new(file);
    let written = assembly
        .write_to(&mut writer)
        .and_then(|n| writer.flush().map(|()| n))
        .map_err(|e| BundleError::io(out_path, e))?;

    let report = AssembleReport {
        variant,
        stub_len: stub.len() as u64,
        bundle_len: bundle.len() as u64,
        output_len: written,
    };
    tracing::info!(
        output = %out_path.display(),
        %variant,
        stub_len = report.stub_len,
        bundle_len = report.bundle_len,
        output_len = report.output_len,
        "projector assembled"
    );
    Ok(report)
}

/// `[stub][movie][magic][length]`
pub fn assemble_windows(bundle_path: &Path, out_path: &Path, stub_path: &Path) -> Result<AssembleReport> {
    assemble(Variant::Windows, bundle_path, out_path, stub_path)
}

/// `[stub][length][magic][movie]`
pub fn assemble_linux(bundle_path: &Path, out_path: &Path, stub_path: &Path) -> Result<AssembleReport> {
    assemble(Variant::Linux, bundle_path, out_path, stub_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{assemble_bytes, TRAILER_MAGIC};
    use tempfile::TempDir;

    struct Inputs {
        dir: TempDir,
    }

    impl Inputs {
        fn new(stub: &[u8], movie: &[u8]) -> Self {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("player.bin"), stub).unwrap();
            fs::write(dir.path().join("movie.swf"), movie).unwrap();
            Self { dir }
        }

        fn stub(&self) -> std::path::PathBuf {
            self.dir.path().join("player.bin")
        }

        fn movie(&self) -> std::path::PathBuf {
            self.dir.path().join("movie.swf")
        }

        fn out(&self) -> std::path::PathBuf {
            self.dir.path().join("game.exe")
        }
    }

    #[test]
    fn test_assemble_windows_file() {
        let inputs = Inputs::new(b"MZ-stub", b"CWS\x0a-movie");
        let report = assemble_windows(&inputs.movie(), &inputs.out(), &inputs.stub()).unwrap();

        let out = fs::read(inputs.out()).unwrap();
        let mut expected = b"MZ-stubCWS\x0a-movie".to_vec();
        expected.extend_from_slice(&TRAILER_MAGIC);
        expected.extend_from_slice(&[10, 0, 0, 0]);
        assert_eq!(out, expected);

        assert_eq!(report.variant, Variant::Windows);
        assert_eq!(report.stub_len, 7);
        assert_eq!(report.bundle_len, 10);
        assert_eq!(report.output_len, out.len() as u64);
    }

    #[test]
    fn test_assemble_linux_file() {
        let inputs = Inputs::new(b"\x7fELF-stub", b"FWS-movie");
        let report = assemble_linux(&inputs.movie(), &inputs.out(), &inputs.stub()).unwrap();

        let out = fs::read(inputs.out()).unwrap();
        let mut expected = b"\x7fELF-stub".to_vec();
        expected.extend_from_slice(&[9, 0, 0, 0]);
        expected.extend_from_slice(&TRAILER_MAGIC);
        expected.extend_from_slice(b"FWS-movie");
        assert_eq!(out, expected);
        assert_eq!(report.output_len, 9 + 9 + 8);
    }

    #[test]
    fn test_file_matches_in_memory_assembly() {
        let stub: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let movie: Vec<u8> = (0..=255u8).rev().cycle().take(1500).collect();
        let inputs = Inputs::new(&stub, &movie);

        for variant in Variant::ALL {
            assemble(variant, &inputs.movie(), &inputs.out(), &inputs.stub()).unwrap();
            let out = fs::read(inputs.out()).unwrap();
            assert_eq!(out, assemble_bytes(variant, &stub, &movie).unwrap());
        }
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let inputs = Inputs::new(b"stub", b"movie");
        assemble_windows(&inputs.movie(), &inputs.out(), &inputs.stub()).unwrap();
        let first = fs::read(inputs.out()).unwrap();
        assemble_windows(&inputs.movie(), &inputs.out(), &inputs.stub()).unwrap();
        let second = fs::read(inputs.out()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_existing_output_is_truncated() {
        let inputs = Inputs::new(b"s", b"m");
        fs::write(inputs.out(), vec![0xAA; 1024]).unwrap();
        let report = assemble_linux(&inputs.movie(), &inputs.out(), &inputs.stub()).unwrap();
        assert_eq!(fs::metadata(inputs.out()).unwrap().len(), report.output_len);
        assert_eq!(report.output_len, 10);
    }

    #[test]
    fn test_empty_movie() {
        let inputs = Inputs::new(b"stub", b"");
        assemble_windows(&inputs.movie(), &inputs.out(), &inputs.stub()).unwrap();
        assert_eq!(
            fs::read(inputs.out()).unwrap(),
            b"stub\x56\x34\x12\xFA\x00\x00\x00\x00".to_vec()
        );

        assemble_linux(&inputs.movie(), &inputs.out(), &inputs.stub()).unwrap();
        assert_eq!(
            fs::read(inputs.out()).unwrap(),
            b"stub\x00\x00\x00\x00\x56\x34\x12\xFA".to_vec()
        );
    }

    #[test]
    fn test_missing_stub_creates_no_output() {
        let inputs = Inputs::new(b"stub", b"movie");
        let missing = inputs.dir.path().join("no-such-player");

        let err = assemble_windows(&inputs.movie(), &inputs.out(), &missing).unwrap_err();
        match err {
            BundleError::Io { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
        assert!(!inputs.out().exists());
    }

    #[test]
    fn test_missing_movie_creates_no_output() {
        let inputs = Inputs::new(b"stub", b"movie");
        let missing = inputs.dir.path().join("no-such-movie.swf");

        let err = assemble_linux(&missing, &inputs.out(), &inputs.stub()).unwrap_err();
        assert!(matches!(err, BundleError::Io { ref path, .. } if *path == missing));
        assert!(!inputs.out().exists());
    }

    #[test]
    fn test_unwritable_output() {
        let inputs = Inputs::new(b"stub", b"movie");
        let out = inputs.dir.path().join("missing-dir").join("game.exe");

        let err = assemble_windows(&inputs.movie(), &out, &inputs.stub()).unwrap_err();
        assert!(matches!(err, BundleError::Io { ref path, .. } if *path == out));
        assert!(err.to_string().contains("game.exe"));
    }

    #[test]
    fn test_mismatched_stub_still_assembles() {
        // PE-looking stub with the linux layout is only a warning
        let mut stub = vec![0u8; 0x48];
        stub[..2].copy_from_slice(b"MZ");
        stub[0x3C] = 0x40;
        stub[0x40..0x42].copy_from_slice(b"PE");
        let inputs = Inputs::new(&stub, b"movie");

        let report = assemble_linux(&inputs.movie(), &inputs.out(), &inputs.stub()).unwrap();
        assert_eq!(report.output_len, 0x48 + 5 + 8);
    }
}
