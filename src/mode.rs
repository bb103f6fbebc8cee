use crate::{VfsError, VfsResult};
use std::fmt;

/// 9-bit permission value (owner/group/other × read/write/execute).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mode(u16);

impl Mode {
    pub const MAX: u16 = 0o777;

    /// Builds a mode out of raw `st_mode`-like bits, dropping everything above
    /// the permission triads (file type, setuid, sticky etc.).
    pub fn from_bits(bits: u32) -> Self {
        Self((bits & Self::MAX as u32) as u16)
    }

    /// Parses an octal mode, either bare (`755`, `0755`) or base-prefixed
    /// (`0o755`).
    pub fn parse(input: &str) -> VfsResult<Self> {
        let invalid = || VfsError::InvalidMode(input.to_owned());

        let digits = input
            .strip_prefix("0o")
            .or_else(|| input.strip_prefix("0O"))
            .unwrap_or(input);

        // from_str_radix() would happily take a leading `+`
        if digits.is_empty() || !digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return Err(invalid());
        }

        let value = u32::from_str_radix(digits, 8).map_err(|_| invalid())?;

        if value > Self::MAX as u32 {
            return Err(invalid());
        }

        Ok(Self(value as u16))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    pub fn octal(self) -> String {
        format!("0o{:o}", self.0)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_permissions(self.get()))
    }
}

/// Renders a mode as `rwxr-xr-x`, owner triad first.
pub fn format_permissions(mode: u16) -> String {
    const BITS: [(u16, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];

    BITS.iter()
        .map(|&(bit, ch)| if mode & bit != 0 { ch } else { '-' })
        .collect()
}
