//! Opaque credential minting.

use rand::Rng;

/// Generates a random 32-character hex string (128 bits of entropy).
///
/// Used for host tokens, player possession tokens and session tokens.
/// Possession of the string IS the authority; there is no identity or
/// role lookup behind it, and minting a replacement invalidates the old
/// value wherever the holder stores only the current one.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
