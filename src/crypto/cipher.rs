/*!
Symmetric-cipher collaborator interface.

The protocol treats the symmetric cipher as an injected capability: a
keyed object with a fixed block size and whole-buffer encrypt/decrypt.
The channel layer owns the PKCS#7 padding, so implementations only ever
see buffers that are a whole number of blocks.

[`XorCipher`] is a keyed reference implementation for tests and demos.
It provides no security whatsoever.
*/

use crate::error::{Result, config_err, format_err};

/// A keyed block cipher supplied by the application
pub trait BlockCipher: Sized {
    /// Cipher block width in bytes
    const BLOCK_SIZE: usize;

    /// Required key length in bytes
    const KEY_LEN: usize;

    /// Build the cipher from exactly [`Self::KEY_LEN`] key bytes
    fn new(key: &[u8]) -> Result<Self>;

    /// Encrypt a buffer that is a whole number of blocks
    fn encrypt(&self, data: &[u8]) -> Vec<u8>;

    /// Decrypt a buffer that is a whole number of blocks
    fn decrypt(&self, data: &[u8]) -> Vec<u8>;
}

/// Pad to a whole number of blocks, always appending at least one byte
pub fn pkcs7_pad(data: &[u8], block_size: usize) -> Vec<u8> {
    debug_assert!(block_size > 0 && block_size < 256);
    let pad = block_size - data.len() % block_size;
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.resize(data.len() + pad, pad as u8);
    out
}

/// Strip and validate PKCS#7 padding
pub fn pkcs7_unpad(data: &[u8], block_size: usize) -> Result<Vec<u8>> {
    if data.is_empty() || !data.len().is_multiple_of(block_size) {
        return format_err("padded data is not a whole number of blocks");
    }
    let pad = data[data.len() - 1] as usize;
    if pad == 0 || pad > block_size {
        return format_err("invalid padding length");
    }
    if !data[data.len() - pad..].iter().all(|&b| b as usize == pad) {
        return format_err("inconsistent padding bytes");
    }
    Ok(data[..data.len() - pad].to_vec())
}

/// Keyed XOR cipher for tests and demos.
///
/// Every block is XORed with the key, so encryption is its own inverse.
/// This exists to exercise the channel without an external cipher; it is
/// not an encryption scheme.
pub struct XorCipher {
    key: [u8; 16],
}

impl BlockCipher for XorCipher {
    const BLOCK_SIZE: usize = 16;
    const KEY_LEN: usize = 16;

    fn new(key: &[u8]) -> Result<Self> {
        if key.len() != Self::KEY_LEN {
            return config_err(format!(
                "cipher key must be {} bytes, got {}",
                Self::KEY_LEN,
                key.len()
            ));
        }
        let mut k = [0u8; 16];
        k.copy_from_slice(key);
        Ok(Self { key: k })
    }

    fn encrypt(&self, data: &[u8]) -> Vec<u8> {
        debug_assert!(data.len().is_multiple_of(Self::BLOCK_SIZE));
        data.iter()
            .enumerate()
            .map(|(i, &b)| b ^ self.key[i % Self::KEY_LEN])
            .collect()
    }

    fn decrypt(&self, data: &[u8]) -> Vec<u8> {
        self.encrypt(data)
    }
}
