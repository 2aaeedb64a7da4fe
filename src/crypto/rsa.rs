/*!
RSA-style asymmetric primitive.

Key generation follows the classic recipe: two distinct random primes
drawn from `(2^(bits/4), 2^(bits/2))`, `φ = lcm(p-1, q-1)`, a random
public exponent coprime to `φ`, and the private exponent from the
extended Euclidean algorithm.

Encryption is textbook per-byte block mode: every plaintext byte is
raised to `e` independently and emitted as a fixed-width big-endian
block. That mode is not semantically secure and exists solely to wrap a
fixed-length symmetric key during channel establishment; never use it
for message payloads.
*/

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand::Rng;

use crate::error::{Result, config_err, crypto_err, format_err};

/// Miller-Rabin witness rounds per candidate
const MILLER_RABIN_ROUNDS: u32 = 40;

/// An asymmetric key, possibly holding only one exponent.
///
/// `n` is always present; a key parsed from the wire carries only the
/// half the peer published. Requesting an operation whose exponent is
/// missing is a configuration error.
pub struct RsaKey {
    n: BigUint,
    e: Option<BigUint>,
    d: Option<BigUint>,
}

impl RsaKey {
    /// Generate a fresh key pair of roughly `bit_length` bits.
    ///
    /// Both primes come from `(2^(bit_length/4), 2^(bit_length/2))`.
    /// Bit lengths below 16 are rejected: the prime windows could then
    /// produce a modulus smaller than a byte block requires.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, bit_length: u64) -> Result<Self> {
        let (n, e, d) = generate_key(rng, bit_length)?;
        Ok(Self { n, e: Some(e), d: Some(d) })
    }

    /// Key holding only the public half
    pub fn from_public(n: BigUint, e: BigUint) -> Self {
        Self { n, e: Some(e), d: None }
    }

    /// Key holding only the private half
    pub fn from_private(n: BigUint, d: BigUint) -> Self {
        Self { n, d: Some(d), e: None }
    }

    /// The modulus `n`
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// The public exponent, if present
    pub fn public_exponent(&self) -> Option<&BigUint> {
        self.e.as_ref()
    }

    /// The private exponent, if present
    pub fn private_exponent(&self) -> Option<&BigUint> {
        self.d.as_ref()
    }

    /// Width in bytes of one ciphertext block
    pub fn block_len(&self) -> usize {
        (self.n.bits() as usize).div_ceil(8)
    }

    /// Encrypt each plaintext byte into one fixed-width block
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let e = match &self.e {
            Some(e) => e,
            None => return config_err("public exponent is unset"),
        };
        let width = self.block_len();
        let mut out = Vec::with_capacity(plaintext.len() * width);
        for &m in plaintext {
            let c = BigUint::from(m).modpow(e, &self.n);
            let block = c.to_bytes_be();
            out.resize(out.len() + (width - block.len()), 0);
            out.extend_from_slice(&block);
        }
        Ok(out)
    }

    /// Decrypt fixed-width blocks back into one byte each
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let d = match &self.d {
            Some(d) => d,
            None => return config_err("private exponent is unset"),
        };
        let width = self.block_len();
        if !ciphertext.len().is_multiple_of(width) {
            return format_err(format!(
                "ciphertext length {} is not a multiple of the {}-byte block",
                ciphertext.len(),
                width
            ));
        }
        let mut out = Vec::with_capacity(ciphertext.len() / width);
        for block in ciphertext.chunks(width) {
            let m = BigUint::from_bytes_be(block).modpow(d, &self.n);
            match m.to_u8() {
                Some(byte) => out.push(byte),
                None => return crypto_err("block decrypts outside the byte range"),
            }
        }
        Ok(out)
    }
}

/// Generate raw key material `(n, e, d)` of roughly `bit_length` bits.
///
/// `(n, e)` is the public key, `(n, d)` the private one. Useful when the
/// halves travel separately; [`RsaKey::generate`] wraps this.
pub fn generate_key<R: Rng + ?Sized>(
    rng: &mut R,
    bit_length: u64,
) -> Result<(BigUint, BigUint, BigUint)> {
    let (_, _, n, e, d) = generate_parts(rng, bit_length)?;
    Ok((n, e, d))
}

/// Full key material, with the primes kept for invariant checks
fn generate_parts<R: Rng + ?Sized>(
    rng: &mut R,
    bit_length: u64,
) -> Result<(BigUint, BigUint, BigUint, BigUint, BigUint)> {
    if bit_length < 16 {
        return config_err(format!("key size {} too small for byte-wide blocks", bit_length));
    }

    let lower = BigUint::one() << (bit_length / 4);
    let upper = BigUint::one() << (bit_length / 2);
    let p = random_prime(rng, &lower, &upper);
    let q = loop {
        let q = random_prime(rng, &lower, &upper);
        if q != p {
            break q;
        }
    };

    let n = &p * &q;
    let phi = (&p - 1u32).lcm(&(&q - 1u32));

    let (e, d) = loop {
        let e = BigUint::from(3u32) + random_below(rng, &(&phi - 3u32));
        let (gcd, x) = ext_gcd(&e, &phi);
        if gcd.is_one() {
            let d = x.mod_floor(&BigInt::from(phi.clone())).magnitude().clone();
            break (e, d);
        }
    };

    Ok((p, q, n, e, d))
}

/// Extended Euclidean algorithm: returns `(gcd(a, b), x)` with
/// `a*x + b*y = gcd(a, b)` for some `y`
fn ext_gcd(a: &BigUint, b: &BigUint) -> (BigInt, BigInt) {
    let mut r0 = BigInt::from(a.clone());
    let mut r1 = BigInt::from(b.clone());
    let (mut x0, mut x1) = (BigInt::one(), BigInt::zero());
    while !r1.is_zero() {
        let q = &r0 / &r1;
        let r = &r0 % &r1;
        r0 = std::mem::replace(&mut r1, r);
        let x = &x0 - &q * &x1;
        x0 = std::mem::replace(&mut x1, x);
    }
    (r0, x0)
}

/// Uniform draw from `[0, bound)` by byte fill and top-bit masking
fn random_below<R: Rng + ?Sized>(rng: &mut R, bound: &BigUint) -> BigUint {
    debug_assert!(!bound.is_zero());
    let bits = bound.bits();
    let len = bits.div_ceil(8) as usize;
    let rem = (bits % 8) as u32;
    let top_mask = if rem == 0 { 0xFF } else { 0xFFu8 >> (8 - rem) };
    loop {
        let mut buf = vec![0u8; len];
        rng.fill_bytes(&mut buf);
        buf[0] &= top_mask;
        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < bound {
            return candidate;
        }
    }
}

/// Random prime strictly inside `(lower, upper)`
fn random_prime<R: Rng + ?Sized>(rng: &mut R, lower: &BigUint, upper: &BigUint) -> BigUint {
    let span = upper - lower - 1u32;
    loop {
        let mut candidate = lower + 1u32 + random_below(rng, &span);
        if candidate.is_even() {
            candidate += 1u32;
        }
        if is_prime(rng, &candidate) {
            return candidate;
        }
    }
}

/// Miller-Rabin probabilistic primality test
fn is_prime<R: Rng + ?Sized>(rng: &mut R, n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);
    if n < &two {
        return false;
    }
    if n == &two || n == &three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // n - 1 = d * 2^s with d odd
    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for _ in 0..MILLER_RABIN_ROUNDS {
        let a = &two + random_below(rng, &(n - &three));
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
