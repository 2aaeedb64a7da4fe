/*!
# QKD Protocol

The cryptographic core of a secure chat channel, built around a
simulated quantum key exchange:

- A from-scratch sponge hash family over Keccak-f[1600] (SHA3-224/256/
  384/512 and the SHAKE extendable-output variants)
- A textbook RSA primitive for classically wrapping a symmetric key
- A simulated BB84 quantum-key-distribution negotiation with basis
  reconciliation, eavesdropper-detection sampling, and
  retry-on-shortage
- An authenticated channel binding an injected block cipher's output to
  a SHA3-256 integrity tag

The symmetric cipher and the transport are collaborators, not parts of
this crate: both are consumed through small traits ([`BlockCipher`],
[`Transport`]) so tests can substitute a reference cipher and an
in-memory byte stream. Everything is synchronous and blocking; a caller
that needs bounded negotiation time applies timeouts at the transport
layer.

## Establishing a channel

```no_run
use qkd_protocol::{Result, SecureChannel, XorCipher};
use std::net::TcpStream;

fn main() -> Result<()> {
    let mut socket = TcpStream::connect("127.0.0.1:55555")?;
    let mut rng = rand::rng();

    // quantum path; see establish_rsa_sender/receiver for the classical one
    let channel = SecureChannel::<XorCipher>::establish_qkd_initiator(&mut socket, &mut rng)?;
    channel.send_message(&mut socket, b"hello over a quantum-negotiated key")?;
    Ok(())
}
```
*/

pub mod constants;
pub mod crypto;
pub mod error;
pub mod protocol;
pub mod transport;

// Re-export commonly used types for convenience
pub use crypto::cipher::{BlockCipher, XorCipher, pkcs7_pad, pkcs7_unpad};
pub use crypto::rsa::RsaKey;
pub use crypto::sponge::{Sponge, sha3_224, sha3_256, sha3_384, sha3_512, shake_128, shake_256};
pub use error::{Error, NegotiationError, Result};
pub use protocol::channel::SecureChannel;
pub use protocol::key_exchange::{receive_key, send_key};
pub use protocol::qkd::{Basis, Initiator, Photon, QkdParty, Responder};
pub use transport::{MemoryTransport, Transport, duplex};
