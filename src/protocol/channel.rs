/*!
Authenticated channel over an injected block cipher.

Sealing pads the plaintext to the cipher's block size, encrypts, and
appends the SHA3-256 digest of the ciphertext as a trailing tag.
Opening recomputes the digest over the received ciphertext bytes and
compares before any decryption happens; a mismatch surfaces as
[`Error::Integrity`] and the message is dropped.

The channel does not care where its key came from. The `establish_*`
constructors cover both the classical RSA exchange and the QKD
negotiation, producing a key of exactly the cipher's length.
*/

use bytes::{BufMut, BytesMut};
use log::warn;
use rand::Rng;

use crate::constants::digest;
use crate::crypto::cipher::{BlockCipher, pkcs7_pad, pkcs7_unpad};
use crate::crypto::sponge::sha3_256;
use crate::error::{Error, Result, format_err};
use crate::transport::{Transport, recv_frame, send_frame};

use super::key_exchange;
use super::qkd;

/// An established channel: a keyed cipher plus the integrity tag rule
pub struct SecureChannel<C: BlockCipher> {
    cipher: C,
}

impl<C: BlockCipher> SecureChannel<C> {
    /// Build a channel from an already-shared key
    pub fn new(key: &[u8]) -> Result<Self> {
        Ok(Self { cipher: C::new(key)? })
    }

    /// Establish over a classical exchange, as the side that generates
    /// the RSA pair and receives the wrapped key
    pub fn establish_rsa_receiver<T, R>(
        transport: &mut T,
        rng: &mut R,
        bit_length: u64,
    ) -> Result<Self>
    where
        T: Transport + ?Sized,
        R: Rng + ?Sized,
    {
        let key = key_exchange::receive_key(transport, rng, bit_length, C::KEY_LEN)?;
        Self::new(&key)
    }

    /// Establish over a classical exchange, as the side that draws the
    /// symmetric key and wraps it
    pub fn establish_rsa_sender<T, R>(
        transport: &mut T,
        rng: &mut R,
        bit_length: u64,
    ) -> Result<Self>
    where
        T: Transport + ?Sized,
        R: Rng + ?Sized,
    {
        let key = key_exchange::send_key(transport, rng, bit_length, C::KEY_LEN)?;
        Self::new(&key)
    }

    /// Establish over a QKD negotiation, leading it
    pub fn establish_qkd_initiator<T, R>(transport: &mut T, rng: &mut R) -> Result<Self>
    where
        T: Transport + ?Sized,
        R: Rng + ?Sized,
    {
        let key = qkd::Initiator::new(C::KEY_LEN).negotiate(transport, rng)?;
        Self::new(&key)
    }

    /// Establish over a QKD negotiation, answering it
    pub fn establish_qkd_responder<T, R>(transport: &mut T, rng: &mut R) -> Result<Self>
    where
        T: Transport + ?Sized,
        R: Rng + ?Sized,
    {
        let key = qkd::Responder::new(C::KEY_LEN).negotiate(transport, rng)?;
        Self::new(&key)
    }

    /// Encrypt and tag a plaintext
    pub fn seal(&self, plaintext: &[u8]) -> Vec<u8> {
        let padded = pkcs7_pad(plaintext, C::BLOCK_SIZE);
        let ciphertext = self.cipher.encrypt(&padded);
        let mut message = BytesMut::with_capacity(ciphertext.len() + digest::TAG_LEN);
        message.put_slice(&ciphertext);
        message.put_slice(&sha3_256(&ciphertext));
        message.to_vec()
    }

    /// Verify and decrypt a sealed message.
    ///
    /// The tag is recomputed over the received ciphertext bytes exactly;
    /// on mismatch the message is dropped undecrypted.
    pub fn open(&self, message: &[u8]) -> Result<Vec<u8>> {
        if message.len() < digest::TAG_LEN + C::BLOCK_SIZE
            || !(message.len() - digest::TAG_LEN).is_multiple_of(C::BLOCK_SIZE)
        {
            return format_err(format!("sealed message of {} bytes is impossible", message.len()));
        }
        let (ciphertext, tag) = message.split_at(message.len() - digest::TAG_LEN);
        if sha3_256(ciphertext) != tag[..] {
            warn!("dropping message with a bad integrity tag");
            return Err(Error::Integrity);
        }
        pkcs7_unpad(&self.cipher.decrypt(ciphertext), C::BLOCK_SIZE)
    }

    /// Seal a plaintext and send it as one frame
    pub fn send_message<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        plaintext: &[u8],
    ) -> Result<()> {
        send_frame(transport, &self.seal(plaintext))
    }

    /// Receive one frame and open it
    pub fn recv_message<T: Transport + ?Sized>(&self, transport: &mut T) -> Result<Vec<u8>> {
        let frame = recv_frame(transport)?;
        self.open(&frame)
    }
}
