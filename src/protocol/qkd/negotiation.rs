/*!
Two-role BB84 negotiation over the classical channel.

The initiator drives every attempt: it announces a qubit count, emits
photons, and leads basis reconciliation and eavesdropper-detection
sampling. Each side compares the revealed sample independently; one
failed comparison, or a sifted remainder shorter than the requested key,
fails the whole attempt. The initiator then grows the qubit count by
half and starts over, up to `max_attempts`.

All classical traffic is text tokens inside length-prefixed frames:
a decimal qubit count, polarization and basis symbol strings, `0`/`1`
bit strings, and the control tokens `OK`, `ERROR`, `NEW` and `END`.
*/

use log::{debug, warn};
use rand::Rng;

use crate::constants::{MAX_NEGOTIATION_BITS, defaults, tokens};
use crate::error::{Error, NegotiationError, Result, format_err, negotiation_err};
use crate::transport::{Transport, recv_frame, send_frame};

use super::party::QkdParty;
use super::photon::{bases_to_string, parse_bases, parse_photons, photons_to_string};

fn send_text<T: Transport + ?Sized>(transport: &mut T, text: &str) -> Result<()> {
    send_frame(transport, text.as_bytes())
}

fn recv_text<T: Transport + ?Sized>(transport: &mut T) -> Result<String> {
    String::from_utf8(recv_frame(transport)?)
        .map_err(|_| Error::Format("frame is not valid UTF-8".to_string()))
}

fn bits_to_string(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

fn parse_bits(s: &str) -> Result<Vec<bool>> {
    s.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => format_err(format!("invalid bit character {:?}", c)),
        })
        .collect()
}

/// Close out the sampling stage of one attempt: compare the revealed
/// bits, discard the sampled positions, and pack the remaining key.
///
/// The outer `Result` carries protocol violations; the inner one says
/// whether this attempt produced a key or must be retried.
fn attempt_outcome(
    party: &mut QkdParty,
    mask: &[bool],
    peer_bits: &[bool],
    target_bytes: usize,
) -> Result<std::result::Result<Vec<u8>, NegotiationError>> {
    if !party.confirm(mask, peer_bits)? {
        return Ok(Err(NegotiationError::SampleMismatch));
    }
    Ok(match party.key_bytes(target_bytes) {
        Some(key) => Ok(key),
        None => Err(NegotiationError::KeyTooShort {
            got: party.key_len(),
            need: target_bytes,
        }),
    })
}

/// The role that leads the negotiation
pub struct Initiator {
    target_bytes: usize,
    max_attempts: u32,
}

impl Initiator {
    /// Negotiate a key of `target_bytes` bytes
    pub fn new(target_bytes: usize) -> Self {
        Self { target_bytes, max_attempts: defaults::MAX_ATTEMPTS }
    }

    /// Override the attempt ceiling
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Run the negotiation to completion.
    ///
    /// Blocks on the transport; returns the derived key bytes, or a
    /// negotiation error once every attempt has failed.
    pub fn negotiate<T, R>(&self, transport: &mut T, rng: &mut R) -> Result<Vec<u8>>
    where
        T: Transport + ?Sized,
        R: Rng + ?Sized,
    {
        // oversample against the expected ~75% loss to sifting and sampling
        let mut qubits = self.target_bytes * 8 * defaults::QUBIT_OVERSAMPLE;

        for attempt in 1..=self.max_attempts {
            debug!("attempt {}: sending {} qubits", attempt, qubits);
            send_text(transport, &qubits.to_string())?;

            let mut party = QkdParty::with_random_bits(rng, qubits);

            // quantum channel
            send_text(transport, &photons_to_string(&party.photons()))?;

            // basis reconciliation
            send_text(transport, &bases_to_string(party.bases()))?;
            let peer_bases = parse_bases(&recv_text(transport)?)?;
            let sifted = party.sift(&peer_bases)?;
            debug!("{} of {} positions survived sifting", sifted, qubits);

            // eavesdropper-detection sampling
            let mask = party.sample_mask(rng, sifted / 2);
            send_text(transport, &bits_to_string(&mask))?;
            let peer_bits = parse_bits(&recv_text(transport)?)?;
            let own_bits = party.revealed_bits(&mask)?;
            send_text(transport, &bits_to_string(&own_bits))?;

            let outcome = attempt_outcome(&mut party, &mask, &peer_bits, self.target_bytes)?;

            let status = recv_text(transport)?;
            if status != tokens::OK && status != tokens::ERROR {
                return negotiation_err(NegotiationError::UnexpectedToken(status));
            }
            match outcome {
                Ok(key) if status == tokens::OK => {
                    send_text(transport, tokens::END)?;
                    debug!("negotiated a {}-byte key on attempt {}", key.len(), attempt);
                    return Ok(key);
                }
                Ok(_) => warn!("attempt {}: peer rejected the sample", attempt),
                Err(reason) => warn!("attempt {}: {}", attempt, reason),
            }

            send_text(transport, tokens::NEW)?;
            qubits = qubits * 3 / 2;
        }

        negotiation_err(NegotiationError::AttemptsExhausted { attempts: self.max_attempts })
    }
}

/// The role that answers the negotiation
pub struct Responder {
    target_bytes: usize,
    max_attempts: u32,
}

impl Responder {
    /// Negotiate a key of `target_bytes` bytes
    pub fn new(target_bytes: usize) -> Self {
        Self { target_bytes, max_attempts: defaults::MAX_ATTEMPTS }
    }

    /// Override the attempt ceiling
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Run the negotiation to completion.
    ///
    /// Blocks on the transport; returns the derived key bytes once the
    /// initiator confirms with `END`.
    pub fn negotiate<T, R>(&self, transport: &mut T, rng: &mut R) -> Result<Vec<u8>>
    where
        T: Transport + ?Sized,
        R: Rng + ?Sized,
    {
        for attempt in 1..=self.max_attempts {
            let header = recv_text(transport)?;
            let qubits: usize = header
                .trim()
                .parse()
                .map_err(|_| Error::Format(format!("invalid qubit count {:?}", header)))?;
            if qubits == 0 || qubits > MAX_NEGOTIATION_BITS {
                return format_err(format!("qubit count {} out of range", qubits));
            }
            debug!("attempt {}: measuring {} qubits", attempt, qubits);

            let mut party = QkdParty::with_random_bases(rng, qubits);

            // quantum channel
            let photons = parse_photons(&recv_text(transport)?)?;
            party.measure(&photons, rng)?;

            // basis reconciliation
            let peer_bases = parse_bases(&recv_text(transport)?)?;
            send_text(transport, &bases_to_string(party.bases()))?;
            let sifted = party.sift(&peer_bases)?;
            debug!("{} of {} positions survived sifting", sifted, qubits);

            // eavesdropper-detection sampling
            let mask = parse_bits(&recv_text(transport)?)?;
            let own_bits = party.revealed_bits(&mask)?;
            send_text(transport, &bits_to_string(&own_bits))?;
            let peer_bits = parse_bits(&recv_text(transport)?)?;

            let outcome = attempt_outcome(&mut party, &mask, &peer_bits, self.target_bytes)?;
            if let Err(reason) = &outcome {
                warn!("attempt {}: {}", attempt, reason);
            }

            send_text(transport, if outcome.is_ok() { tokens::OK } else { tokens::ERROR })?;

            match recv_text(transport)?.as_str() {
                tokens::END => {
                    return match outcome {
                        Ok(key) => {
                            debug!("negotiated a {}-byte key on attempt {}", key.len(), attempt);
                            Ok(key)
                        }
                        // the initiator must not confirm an attempt we rejected
                        Err(_) => negotiation_err(NegotiationError::UnexpectedToken(
                            tokens::END.to_string(),
                        )),
                    };
                }
                tokens::NEW => continue,
                other => {
                    return negotiation_err(NegotiationError::UnexpectedToken(other.to_string()));
                }
            }
        }

        negotiation_err(NegotiationError::AttemptsExhausted { attempts: self.max_attempts })
    }
}
