use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Shape, ShapeKind};

/// Supplies the shapes a game spawns, in order.
///
/// The engine never reaches for a global random generator; every
/// [`GameState`](super::GameState) draws from the source it was built with.
pub trait ShapeSource {
    /// Returns the next shape at its template offsets.
    fn next_shape(&mut self) -> Shape;
}

/// Uniformly random shapes from a seeded PCG32 generator.
///
/// # Example
///
/// ```
/// use sticktris_engine::{RandomShapes, ShapeSeed, ShapeSource as _};
///
/// let seed: ShapeSeed = "00000000000000000000000000000001".parse().unwrap();
/// let mut first = RandomShapes::with_seed(seed);
/// let mut second = RandomShapes::with_seed(seed);
/// assert_eq!(first.next_shape(), second.next_shape());
/// ```
#[derive(Debug, Clone)]
pub struct RandomShapes {
    rng: Pcg32,
}

impl Default for RandomShapes {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomShapes {
    /// Creates a source seeded from the thread-local generator.
    ///
    /// For deterministic shape sequences, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: ShapeSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }
}

impl ShapeSource for RandomShapes {
    fn next_shape(&mut self) -> Shape {
        Shape::generate(&mut self.rng)
    }
}

/// A fixed sequence of shape kinds, repeated once exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedShapes {
    kinds: Vec<ShapeKind>,
    index: usize,
}

impl ScriptedShapes {
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    #[must_use]
    pub fn new(kinds: impl IntoIterator<Item = ShapeKind>) -> Self {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "a scripted sequence needs at least one shape");
        Self { kinds, index: 0 }
    }
}

impl ShapeSource for ScriptedShapes {
    fn next_shape(&mut self) -> Shape {
        let kind = self.kinds[self.index];
        self.index = (self.index + 1) % self.kinds.len();
        Shape::new(kind)
    }
}

/// Seed for deterministic shape generation.
///
/// A 128-bit seed for the PCG32 generator behind [`RandomShapes`]. The same
/// seed always yields the same shape sequence, which makes recorded games
/// replayable.
///
/// Written as a 32-character hex string, both in text and in serialized form.
///
/// ```
/// use rand::Rng as _;
/// use sticktris_engine::ShapeSeed;
///
/// let seed: ShapeSeed = rand::rng().random();
/// let parsed: ShapeSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeSeed([u8; 16]);

impl ShapeSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

/// Text that is not a 32-character hex seed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {reason}")]
pub struct ParseShapeSeedError {
    reason: String,
}

impl fmt::Display for ShapeSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for ShapeSeed {
    type Err = ParseShapeSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseShapeSeedError {
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParseShapeSeedError {
            reason: format!("{s} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for ShapeSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `ShapeSeed` values with `rng.random()`.
impl Distribution<ShapeSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ShapeSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_shapes_cycle() {
        let mut source = ScriptedShapes::new([ShapeKind::I, ShapeKind::O]);
        let kinds: Vec<_> = (0..5).map(|_| source.next_shape().kind()).collect();
        assert_eq!(
            kinds,
            [
                ShapeKind::I,
                ShapeKind::O,
                ShapeKind::I,
                ShapeKind::O,
                ShapeKind::I
            ]
        );
    }

    #[test]
    #[should_panic(expected = "at least one shape")]
    fn test_scripted_shapes_rejects_empty() {
        let _ = ScriptedShapes::new([]);
    }

    #[test]
    fn test_deterministic_shape_generation() {
        let seed = ShapeSeed::from_bytes([
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x77, 0x88,
        ]);

        let mut source1 = RandomShapes::with_seed(seed);
        let mut source2 = RandomShapes::with_seed(seed);

        for _ in 0..20 {
            assert_eq!(source1.next_shape(), source2.next_shape());
        }
    }

    #[test]
    fn test_random_shapes_are_templates() {
        let mut source = RandomShapes::new();
        for _ in 0..50 {
            let shape = source.next_shape();
            assert_eq!(shape, Shape::new(shape.kind()));
        }
    }

    mod shape_seed_format {
        use super::*;

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = ShapeSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");

            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
            let deserialized: ShapeSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_parse_uppercase_hex() {
            let seed: ShapeSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_error_invalid_hex_characters() {
            let result = "ghijklmnopqrstuvwxyzghijklmnopqr".parse::<ShapeSeed>();
            assert!(result.unwrap_err().to_string().contains("invalid hex"));
        }

        #[test]
        fn test_error_wrong_length() {
            for text in ["", "0123456789abcdef0123456789abcde", "0123456789abcdef0123456789abcdef0"] {
                let err_msg = text.parse::<ShapeSeed>().unwrap_err().to_string();
                assert!(err_msg.contains("expected 32 characters"), "{err_msg}");
            }
        }

        #[test]
        fn test_deserialize_error_message() {
            let result: Result<ShapeSeed, _> = serde_json::from_str("\"xyz\"");
            assert!(result.unwrap_err().to_string().contains("invalid hex"));
        }
    }
}
