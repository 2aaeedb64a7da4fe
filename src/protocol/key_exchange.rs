/*!
Classical RSA-wrapped symmetric-key exchange.

The receiver of the key generates a fresh RSA pair and publishes `n`
and `e` as fixed-width big-endian fields; the sender draws the random
symmetric key, wraps it with the textbook per-byte block mode, and
returns the blocks. No certificate authority is modeled: an active
attacker who substitutes the public key in flight wins, which is why
the QKD path exists.
*/

use log::debug;
use num_bigint::BigUint;
use rand::Rng;

use crate::crypto::rsa::{self, RsaKey};
use crate::error::{Result, format_err};
use crate::transport::{Transport, recv_frame, send_frame};

/// Serialize an integer into a fixed-width big-endian field
fn to_field(value: &BigUint, width: usize) -> Result<Vec<u8>> {
    let bytes = value.to_bytes_be();
    if bytes.len() > width {
        return format_err(format!(
            "integer needs {} bytes but the field holds {}",
            bytes.len(),
            width
        ));
    }
    let mut field = vec![0u8; width - bytes.len()];
    field.extend_from_slice(&bytes);
    Ok(field)
}

/// Receive one fixed-width integer field
fn recv_field<T: Transport + ?Sized>(transport: &mut T, width: usize) -> Result<BigUint> {
    let field = recv_frame(transport)?;
    if field.len() != width {
        return format_err(format!("expected a {}-byte field, got {}", width, field.len()));
    }
    Ok(BigUint::from_bytes_be(&field))
}

/// Key-receiver side: generate an RSA pair, publish the public half,
/// and unwrap the symmetric key the peer sends back.
pub fn receive_key<T, R>(
    transport: &mut T,
    rng: &mut R,
    bit_length: u64,
    key_len: usize,
) -> Result<Vec<u8>>
where
    T: Transport + ?Sized,
    R: Rng + ?Sized,
{
    let (n, e, d) = rsa::generate_key(rng, bit_length)?;
    let width = (bit_length as usize).div_ceil(8);
    send_frame(transport, &to_field(&n, width)?)?;
    send_frame(transport, &to_field(&e, width)?)?;

    let wrapped = recv_frame(transport)?;
    let secret = RsaKey::from_private(n, d).decrypt(&wrapped)?;
    if secret.len() != key_len {
        return format_err(format!(
            "peer wrapped a {}-byte key, wanted {}",
            secret.len(),
            key_len
        ));
    }
    debug!("unwrapped a {}-byte symmetric key", secret.len());
    Ok(secret)
}

/// Key-sender side: read the peer's public half, draw a random
/// symmetric key, and send it back wrapped.
pub fn send_key<T, R>(
    transport: &mut T,
    rng: &mut R,
    bit_length: u64,
    key_len: usize,
) -> Result<Vec<u8>>
where
    T: Transport + ?Sized,
    R: Rng + ?Sized,
{
    let width = (bit_length as usize).div_ceil(8);
    let n = recv_field(transport, width)?;
    let e = recv_field(transport, width)?;
    if n <= BigUint::from(u8::MAX) {
        // byte-wide blocks need m < 256 <= n
        return format_err("peer modulus cannot carry byte blocks");
    }

    let mut secret = vec![0u8; key_len];
    rng.fill_bytes(&mut secret);

    let wrapped = RsaKey::from_public(n, e).encrypt(&secret)?;
    send_frame(transport, &wrapped)?;
    debug!("wrapped a {}-byte symmetric key", secret.len());
    Ok(secret)
}
