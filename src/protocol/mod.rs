//! Protocol layer: key establishment and the authenticated channel.
//!
//! A channel is established either classically (RSA-wrapped key exchange)
//! or through the simulated quantum negotiation; afterwards every message
//! flows through [`channel::SecureChannel`].

pub mod channel;
pub mod key_exchange;
pub mod qkd;

pub use channel::SecureChannel;
