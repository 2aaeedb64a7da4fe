/*!
Error handling for the QKD protocol.
*/

use std::io;
use thiserror::Error;

/// Result type for the QKD protocol
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the QKD protocol
#[derive(Error, Debug)]
pub enum Error {
    /// IO error on the transport
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid construction parameters or a key half missing for the
    /// requested operation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed wire data
    #[error("Invalid message format: {0}")]
    Format(String),

    /// Integrity tag mismatch on a received message; the ciphertext is
    /// dropped without being decrypted
    #[error("Message integrity check failed")]
    Integrity,

    /// Key negotiation failure
    #[error("Key negotiation failed")]
    Negotiation(#[source] NegotiationError),

    /// Cryptographic error
    #[error("Cryptographic error: {0}")]
    Crypto(String),
}

/// Detail for failed QKD negotiations
#[derive(Error, Debug)]
pub enum NegotiationError {
    /// Revealed sample bits disagree (possible eavesdropping or noise)
    #[error("Revealed sample bits disagree")]
    SampleMismatch,

    /// The sifted key ran short of the requested length
    #[error("Sifted key too short: {got} bits left for {need} bytes")]
    KeyTooShort { got: usize, need: usize },

    /// Every attempt failed
    #[error("Negotiation failed after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },

    /// The peer sent a token the protocol does not expect here
    #[error("Unexpected token from peer: {0:?}")]
    UnexpectedToken(String),
}

/// Convert a string to an Error::Config
pub fn config_err<T, S: Into<String>>(msg: S) -> Result<T> {
    Err(Error::Config(msg.into()))
}

/// Convert a string to an Error::Format
pub fn format_err<T, S: Into<String>>(msg: S) -> Result<T> {
    Err(Error::Format(msg.into()))
}

/// Convert a string to an Error::Crypto
pub fn crypto_err<T, S: Into<String>>(msg: S) -> Result<T> {
    Err(Error::Crypto(msg.into()))
}

/// Wrap a NegotiationError
pub fn negotiation_err<T>(err: NegotiationError) -> Result<T> {
    Err(Error::Negotiation(err))
}
