//! Stub executable format sniffing.
//!
//! Only the headers needed to tell a PE projector from an ELF one are
//! looked at; nothing else about the stub is checked.

use crate::format::Variant;

/// Offset of `e_lfanew`, the pointer to the PE signature, in the DOS header.
const PE_POINTER_OFFSET: usize = 0x3C;

const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

/// Executable format of a projector stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubKind {
    /// Windows portable executable (`MZ` header pointing at `PE`)
    Pe,
    /// ELF executable
    Elf,
    /// Neither of the above
    Unknown,
}

impl StubKind {
    pub fn detect(bytes: &[u8]) -> Self {
        if is_pe(bytes) {
            StubKind::Pe
        } else if bytes.starts_with(&ELF_MAGIC) {
            StubKind::Elf
        } else {
            StubKind::Unknown
        }
    }

    /// The variant a stub of this kind is normally paired with.
    pub fn variant(self) -> Option<Variant> {
        match self {
            StubKind::Pe => Some(Variant::Windows),
            StubKind::Elf => Some(Variant::Linux),
            StubKind::Unknown => None,
        }
    }
}

fn is_pe(bytes: &[u8]) -> bool {
    if !bytes.starts_with(b"MZ") {
        return false;
    }
    let Some(pointer) = bytes.get(PE_POINTER_OFFSET..PE_POINTER_OFFSET + 4) else {
        return false;
    };
    let pointer = u32::from_le_bytes([pointer[0], pointer[1], pointer[2], pointer[3]]) as usize;
    bytes
        .get(pointer..pointer.saturating_add(2))
        .is_some_and(|sig| sig == b"PE")
}
