/*!
Per-negotiation state of one QKD role.

A party holds the random bits and bases of a single attempt, and walks
them through the protocol stages: photon emission or measurement,
sifting against the peer's bases, eavesdropper-detection sampling, and
final key packing. Parties are created fresh for every attempt and
never outlive it.
*/

use rand::Rng;

use crate::error::{Result, format_err};

use super::photon::{Basis, Photon};

/// One role's bit and basis records for a single negotiation attempt
pub struct QkdParty {
    /// Raw bit per position (generated for the initiator, measured for
    /// the responder)
    bits: Vec<bool>,
    /// Independently drawn basis per position
    bases: Vec<Basis>,
    /// Sifted key bits, shrunk again after sampling
    key: Vec<bool>,
}

impl QkdParty {
    /// Initiator-side party: random bits and random bases
    pub fn with_random_bits<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Self {
        Self {
            bits: (0..count).map(|_| rng.random()).collect(),
            bases: (0..count).map(|_| Basis::random(rng)).collect(),
            key: Vec::new(),
        }
    }

    /// Responder-side party: random bases, bits filled in by measurement
    pub fn with_random_bases<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Self {
        Self {
            bits: Vec::new(),
            bases: (0..count).map(|_| Basis::random(rng)).collect(),
            key: Vec::new(),
        }
    }

    /// This party's basis choices
    pub fn bases(&self) -> &[Basis] {
        &self.bases
    }

    /// Encode every bit in its basis for the quantum channel
    pub fn photons(&self) -> Vec<Photon> {
        self.bits
            .iter()
            .zip(&self.bases)
            .map(|(&bit, &basis)| basis.encode(bit))
            .collect()
    }

    /// Measure received photons in this party's bases
    pub fn measure<R: Rng + ?Sized>(&mut self, photons: &[Photon], rng: &mut R) -> Result<()> {
        if photons.len() != self.bases.len() {
            return format_err(format!(
                "received {} photons for {} bases",
                photons.len(),
                self.bases.len()
            ));
        }
        self.bits = photons
            .iter()
            .zip(&self.bases)
            .map(|(&photon, &basis)| photon.measure(basis, rng).0)
            .collect();
        Ok(())
    }

    /// Keep only positions where both parties chose the same basis.
    ///
    /// Returns the sifted key length in bits.
    pub fn sift(&mut self, peer_bases: &[Basis]) -> Result<usize> {
        if peer_bases.len() != self.bases.len() {
            return format_err(format!(
                "peer announced {} bases for {} positions",
                peer_bases.len(),
                self.bases.len()
            ));
        }
        self.key = self
            .bits
            .iter()
            .zip(self.bases.iter().zip(peer_bases))
            .filter(|(_, (own, peer))| own == peer)
            .map(|(&bit, _)| bit)
            .collect();
        Ok(self.key.len())
    }

    /// Current key length in bits
    pub fn key_len(&self) -> usize {
        self.key.len()
    }

    /// Choose positions to reveal: `draws` indices sampled with
    /// replacement, deduplicated into a selection mask
    pub fn sample_mask<R: Rng + ?Sized>(&self, rng: &mut R, draws: usize) -> Vec<bool> {
        let mut mask = vec![false; self.key.len()];
        if self.key.is_empty() {
            return mask;
        }
        for _ in 0..draws {
            mask[rng.random_range(0..self.key.len())] = true;
        }
        mask
    }

    /// The key bits at the masked positions
    pub fn revealed_bits(&self, mask: &[bool]) -> Result<Vec<bool>> {
        if mask.len() != self.key.len() {
            return format_err(format!(
                "selection mask covers {} of {} key bits",
                mask.len(),
                self.key.len()
            ));
        }
        Ok(self
            .key
            .iter()
            .zip(mask)
            .filter(|&(_, &chosen)| chosen)
            .map(|(&bit, _)| bit)
            .collect())
    }

    /// Compare this party's revealed bits against the peer's.
    ///
    /// On agreement the sampled positions are burned: they were public,
    /// so only the unsampled remainder stays in the key.
    pub fn confirm(&mut self, mask: &[bool], peer_bits: &[bool]) -> Result<bool> {
        if self.revealed_bits(mask)? != peer_bits {
            return Ok(false);
        }
        self.key = self
            .key
            .iter()
            .zip(mask)
            .filter(|&(_, &chosen)| !chosen)
            .map(|(&bit, _)| bit)
            .collect();
        Ok(true)
    }

    /// Pack the remaining key bits into bytes, 8 bits per byte with the
    /// first bit in the lowest position.
    ///
    /// Returns `None` when fewer than `byte_len` whole bytes remain.
    pub fn key_bytes(&self, byte_len: usize) -> Option<Vec<u8>> {
        if self.key.len() / 8 < byte_len {
            return None;
        }
        Some(
            (0..byte_len)
                .map(|i| {
                    let mut byte = 0u8;
                    for j in 0..8 {
                        if self.key[8 * i + j] {
                            byte |= 1 << j;
                        }
                    }
                    byte
                })
                .collect(),
        )
    }
}
