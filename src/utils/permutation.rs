use crate::error::{ProtocolError, Result};
use crate::graph::Color;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Relabelling of the colour set. `images[c.to_u8()]` is where `c` goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorPermutation {
    images: [Color; 3],
}

impl ColorPermutation {
    pub const ALL: [ColorPermutation; 6] = [
        ColorPermutation::from_images_unchecked([Color::Red, Color::Green, Color::Blue]),
        ColorPermutation::from_images_unchecked([Color::Red, Color::Blue, Color::Green]),
        ColorPermutation::from_images_unchecked([Color::Green, Color::Red, Color::Blue]),
        ColorPermutation::from_images_unchecked([Color::Green, Color::Blue, Color::Red]),
        ColorPermutation::from_images_unchecked([Color::Blue, Color::Red, Color::Green]),
        ColorPermutation::from_images_unchecked([Color::Blue, Color::Green, Color::Red]),
    ];

    const fn from_images_unchecked(images: [Color; 3]) -> Self {
        ColorPermutation { images }
    }

    pub fn identity() -> Self {
        ColorPermutation { images: Color::ALL }
    }

    /// Builds a permutation from the images of RED, GREEN and BLUE, in that order.
    pub fn new(images: [Color; 3]) -> Result<Self> {
        let mut seen = [false; 3];
        for color in images {
            seen[color.to_u8() as usize] = true;
        }
        if seen.iter().all(|&hit| hit) {
            Ok(ColorPermutation { images })
        } else {
            Err(ProtocolError::InvalidPermutation)
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        let mut images = Color::ALL;
        images.shuffle(rng);
        ColorPermutation { images }
    }

    pub fn apply(&self, color: Color) -> Color {
        self.images[color.to_u8() as usize]
    }

    pub fn apply_all(&self, colors: &[Color]) -> Vec<Color> {
        colors.iter().map(|&color| self.apply(color)).collect()
    }

    pub fn images(&self) -> [Color; 3] {
        self.images
    }
}

impl Default for ColorPermutation {
    fn default() -> Self {
        Self::identity()
    }
}
