//! `VF` update ordering relative to the destination write.

/// Describes how `VF` is updated around the destination-register write.
///
/// The ordering only matters when the destination is `VF` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagsUpdate {
    /// `VF` untouched.
    #[default]
    None,
    /// `VF` written before the destination, so a result in `VF` wins.
    Preceding(u8),
    /// `VF` written after the destination, so the flag wins.
    Trailing(u8),
}
