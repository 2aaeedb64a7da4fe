/*!
Constants for the QKD protocol.

This module contains the permutation geometry, digest widths, classical
channel tokens, and negotiation defaults.
*/

/// Width of the permutation state in bits
pub const STATE_BITS: usize = 1600;

/// Number of 64-bit lanes in the permutation state
pub const STATE_LANES: usize = 25;

/// Rounds of the permutation per invocation
pub const PERMUTATION_ROUNDS: usize = 24;

/// Maximum length of a classical-channel frame payload (8 MiB)
pub const MAX_FRAME_LEN: usize = 1 << 23;

/// Upper bound on the qubit count a responder will accept in one attempt
pub const MAX_NEGOTIATION_BITS: usize = 1 << 20;

/// Digest widths in bytes
pub mod digest {
    /// SHA3-224 output width
    pub const SHA3_224_LEN: usize = 28;

    /// SHA3-256 output width
    pub const SHA3_256_LEN: usize = 32;

    /// SHA3-384 output width
    pub const SHA3_384_LEN: usize = 48;

    /// SHA3-512 output width
    pub const SHA3_512_LEN: usize = 64;

    /// Width of the integrity tag appended to sealed messages
    pub const TAG_LEN: usize = SHA3_256_LEN;
}

/// Domain-separation padding bytes for the sponge
pub mod padding {
    /// Fixed-output digest variants
    pub const FIXED: u8 = 0x06;

    /// Extendable-output variants
    pub const XOF: u8 = 0x1F;
}

/// Control tokens of the classical QKD channel
pub mod tokens {
    /// Responder accepts the derived key
    pub const OK: &str = "OK";

    /// Responder rejects the attempt
    pub const ERROR: &str = "ERROR";

    /// Initiator restarts with a larger qubit count
    pub const NEW: &str = "NEW";

    /// Initiator confirms the key; negotiation is over
    pub const END: &str = "END";
}

/// Negotiation and key-exchange defaults
pub mod defaults {
    /// Maximum QKD negotiation attempts before giving up
    pub const MAX_ATTEMPTS: u32 = 8;

    /// Initial qubits per target key bit, covering the expected ~75%
    /// loss from basis mismatch and sampling
    pub const QUBIT_OVERSAMPLE: usize = 4;

    /// Default asymmetric key size in bits
    pub const RSA_KEY_BITS: u64 = 512;
}
