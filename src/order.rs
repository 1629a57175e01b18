//! Play order for the loaded tracks
//!
//! The player walks positions `0..n`; a [`TrackOrder`] maps each position to
//! a track index and back. Shuffle mode uses a seeded permutation so the
//! order is reproducible across launches for the same seed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::PlayerConfig;
use crate::error::{Result, RlcapError};

/// Fisher–Yates shuffle in place. Empty and single-element slices are left
/// untouched.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    if items.len() < 2 {
        return;
    }
    items.shuffle(rng);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackOrder {
    /// position -> track
    forward: Vec<usize>,
    /// track -> position
    inverse: Vec<usize>,
}

impl TrackOrder {
    /// Tracks play in directory order
    pub fn identity(len: usize) -> Self {
        let forward: Vec<usize> = (0..len).collect();
        Self {
            inverse: forward.clone(),
            forward,
        }
    }

    /// Seeded random permutation of `0..len`
    pub fn shuffled(len: usize, seed: u64) -> Self {
        let mut forward: Vec<usize> = (0..len).collect();
        shuffle(&mut forward, &mut StdRng::seed_from_u64(seed));
        Self::from_forward(forward)
    }

    /// Order the player should use for `config`: shuffled with `seed` when
    /// the shuffle flag is set, directory order otherwise
    pub fn for_config(config: &PlayerConfig, len: usize, seed: u64) -> Self {
        if config.shuffle {
            Self::shuffled(len, seed)
        } else {
            Self::identity(len)
        }
    }

    /// Build from an explicit position -> track mapping
    ///
    /// # Errors
    /// `InvalidInput` if `forward` is not a permutation of `0..len`
    pub fn from_permutation(forward: Vec<usize>) -> Result<Self> {
        let mut seen = vec![false; forward.len()];
        for &track in &forward {
            match seen.get_mut(track) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(RlcapError::InvalidInput(format!(
                        "not a permutation: track {} out of range or repeated",
                        track
                    )))
                }
            }
        }
        Ok(Self::from_forward(forward))
    }

    fn from_forward(forward: Vec<usize>) -> Self {
        let mut inverse = vec![0; forward.len()];
        for (position, &track) in forward.iter().enumerate() {
            inverse[track] = position;
        }
        Self { forward, inverse }
    }

    /// Track index played at `position`
    pub fn at(&self, position: usize) -> Option<usize> {
        self.forward.get(position).copied()
    }

    /// Position at which `track` is played
    pub fn position_of(&self, track: usize) -> Option<usize> {
        self.inverse.get(track).copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
