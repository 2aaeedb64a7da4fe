/*!
Polarization symbols of the simulated quantum channel.

A photon is prepared in one of two bases: rectilinear (`+`, symbols `↑`
and `→`) or diagonal (`X`, symbols `↖` and `↗`). Measuring in the
preparation basis recovers the encoded bit exactly; measuring in the
other basis yields a uniformly random bit and re-emits the photon in the
measurement basis. That asymmetry is the whole physical model.
*/

use std::fmt;

use rand::Rng;

use crate::error::{Result, format_err};

/// Measurement basis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// `+`: vertical/horizontal polarization
    Rectilinear,
    /// `X`: diagonal polarization
    Diagonal,
}

impl Basis {
    /// Draw a uniformly random basis
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random() { Basis::Rectilinear } else { Basis::Diagonal }
    }

    /// Prepare a photon carrying `bit` in this basis
    pub fn encode(self, bit: bool) -> Photon {
        match (self, bit) {
            (Basis::Rectilinear, true) => Photon::Up,
            (Basis::Rectilinear, false) => Photon::Right,
            (Basis::Diagonal, true) => Photon::UpLeft,
            (Basis::Diagonal, false) => Photon::UpRight,
        }
    }

    /// Wire character for this basis
    pub fn as_char(self) -> char {
        match self {
            Basis::Rectilinear => '+',
            Basis::Diagonal => 'X',
        }
    }

    /// Parse a wire character
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Basis::Rectilinear),
            'X' => Some(Basis::Diagonal),
            _ => None,
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A polarized photon on the quantum channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Photon {
    /// `↑`: rectilinear 1
    Up,
    /// `→`: rectilinear 0
    Right,
    /// `↖`: diagonal 1
    UpLeft,
    /// `↗`: diagonal 0
    UpRight,
}

impl Photon {
    /// The basis this photon was prepared in
    pub fn basis(self) -> Basis {
        match self {
            Photon::Up | Photon::Right => Basis::Rectilinear,
            Photon::UpLeft | Photon::UpRight => Basis::Diagonal,
        }
    }

    /// The bit this photon encodes in its own basis
    pub fn bit(self) -> bool {
        matches!(self, Photon::Up | Photon::UpLeft)
    }

    /// Measure in `basis`: exact in the preparation basis, a coin flip
    /// (with the photon re-emitted in the measurement basis) otherwise
    pub fn measure<R: Rng + ?Sized>(self, basis: Basis, rng: &mut R) -> (bool, Photon) {
        if self.basis() == basis {
            (self.bit(), self)
        } else {
            let bit: bool = rng.random();
            (bit, basis.encode(bit))
        }
    }

    /// Wire character for this photon
    pub fn as_char(self) -> char {
        match self {
            Photon::Up => '↑',
            Photon::Right => '→',
            Photon::UpLeft => '↖',
            Photon::UpRight => '↗',
        }
    }

    /// Parse a wire character
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '↑' => Some(Photon::Up),
            '→' => Some(Photon::Right),
            '↖' => Some(Photon::UpLeft),
            '↗' => Some(Photon::UpRight),
            _ => None,
        }
    }
}

impl fmt::Display for Photon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Format a basis sequence for the classical channel
pub fn bases_to_string(bases: &[Basis]) -> String {
    bases.iter().map(|b| b.as_char()).collect()
}

/// Parse a basis sequence from the classical channel
pub fn parse_bases(s: &str) -> Result<Vec<Basis>> {
    s.chars()
        .map(|c| match Basis::from_char(c) {
            Some(b) => Ok(b),
            None => format_err(format!("invalid basis symbol {:?}", c)),
        })
        .collect()
}

/// Format a photon sequence for the quantum channel
pub fn photons_to_string(photons: &[Photon]) -> String {
    photons.iter().map(|p| p.as_char()).collect()
}

/// Parse a photon sequence from the quantum channel
pub fn parse_photons(s: &str) -> Result<Vec<Photon>> {
    s.chars()
        .map(|c| match Photon::from_char(c) {
            Some(p) => Ok(p),
            None => format_err(format!("invalid polarization symbol {:?}", c)),
        })
        .collect()
}
