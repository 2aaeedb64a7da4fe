/*!
Cryptographic primitives for the QKD protocol.

This module provides the sponge-based hash family, the asymmetric
primitive used for classical key exchange, and the symmetric-cipher
collaborator interface.
*/

pub mod cipher;
pub mod rsa;
pub mod sponge;

pub use cipher::{BlockCipher, XorCipher};
pub use rsa::RsaKey;
pub use sponge::{Sponge, sha3_224, sha3_256, sha3_384, sha3_512, shake_128, shake_256};
