/*!
Simulated BB84 quantum key distribution.

The quantum channel is modeled as a sequence of four polarization
symbols in two complementary bases; measuring a symbol in the wrong
basis destroys its bit. Both roles talk over the classical [`Transport`]
channel only; there is no physics here, just its statistics.

[`Transport`]: crate::transport::Transport
*/

pub mod negotiation;
pub mod party;
pub mod photon;

pub use negotiation::{Initiator, Responder};
pub use party::QkdParty;
pub use photon::{Basis, Photon};
