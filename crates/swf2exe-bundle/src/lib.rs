//! Projector executable bundling
//!
//! Turns a Flash player stub and a movie into a single standalone
//! executable, and reads such executables back:
//! - **format**: trailer layout and the in-memory assembly
//! - **assemble**: file-to-file assembly for the windows and linux layouts
//! - **locate**: split an assembled executable into stub and movie
//! - **stub**: PE/ELF sniffing of the player stub

pub mod assemble;
pub mod error;
pub mod format;
pub mod locate;
pub mod stub;

pub use assemble::{assemble, assemble_linux, assemble_windows, AssembleReport};
pub use error::{BundleError, Result};
pub use format::{
    assemble_bytes, encode_length, Assembly, Trailer, Variant, MAX_BUNDLE_LEN, TRAILER_MAGIC,
    TRAILER_SIZE,
};
pub use locate::{detect, read_split, split, OwnedSplit, SplitExecutable};
pub use stub::StubKind;
