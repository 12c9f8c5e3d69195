//! Wallet address generation
//!
//! Produces fixed-format wallet addresses: the `0x` prefix followed by 40
//! characters drawn from the alphanumeric alphabet. Addresses are routing
//! identifiers, not key material, so a fast non-cryptographic source is
//! used; the only property that matters is collision avoidance, which the
//! account store enforces by retrying generation against its address index.

use rand::{distributions::Alphanumeric, Rng};

use crate::types::WalletAddress;

/// Prefix of every generated wallet address
pub const ADDRESS_PREFIX: &str = "0x";

/// Number of random alphanumeric characters after the prefix
pub const ADDRESS_BODY_LEN: usize = 40;

/// Maximum generation attempts before account creation gives up
///
/// With a 62-character alphabet over 40 positions, hitting this bound in
/// practice means the address index is corrupted, not that we are unlucky.
pub const MAX_ADDRESS_ATTEMPTS: u32 = 8;

/// Generator for unique pseudo-random wallet addresses
///
/// Stateless; each call draws from the thread-local RNG. The caller is
/// responsible for rejecting and retrying on collision with existing
/// addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressGenerator;

impl AddressGenerator {
    /// Create a new generator
    pub fn new() -> Self {
        AddressGenerator
    }

    /// Generate one wallet address in the fixed `0x` + 40-char format
    pub fn generate(&self) -> WalletAddress {
        let body: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ADDRESS_BODY_LEN)
            .map(char::from)
            .collect();

        format!("{ADDRESS_PREFIX}{body}")
    }
}

/// Whether a string has the shape of a generated wallet address
///
/// Used by the CLI to reject obviously malformed recipient input before
/// it reaches the engine.
pub fn is_well_formed(address: &str) -> bool {
    address.len() == ADDRESS_PREFIX.len() + ADDRESS_BODY_LEN
        && address.starts_with(ADDRESS_PREFIX)
        && address[ADDRESS_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
}
