//! Platform availability bitmask.
//!
//! Every declaration in the model is tagged with the set of platforms it
//! was observed on. A single parse pass stamps one platform bit; merging
//! the per-platform trees ORs the bits together. A mask equal to
//! [`Platforms::ALL`] means the declaration exists everywhere and needs no
//! platform-specific handling downstream.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Set of target platforms a declaration is available on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Platforms: u8 {
        /// Linux.
        const LINUX = 1;
        /// Windows.
        const WINDOWS = 1 << 1;
        /// macOS.
        const MACOS = 1 << 2;
        /// All supported platforms.
        const ALL = Self::LINUX.bits() | Self::WINDOWS.bits() | Self::MACOS.bits();
    }
}

impl Platforms {
    /// Human-readable name of a single platform bit.
    fn bit_name(bit: Platforms) -> &'static str {
        match bit {
            Platforms::LINUX => "linux",
            Platforms::WINDOWS => "windows",
            Platforms::MACOS => "macos",
            _ => "unknown",
        }
    }
}

impl fmt::Display for Platforms {
    /// Renders "linux, windows or macos" style platform lists.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self
            .iter()
            .filter(|bit| !bit.is_all())
            .map(|bit| Self::bit_name(bit))
            .collect();
        match names.split_last() {
            Some((last, [])) => write!(f, "{last}"),
            Some((last, rest)) => write!(f, "{} or {last}", rest.join(", ")),
            None => write!(f, "none"),
        }
    }
}
