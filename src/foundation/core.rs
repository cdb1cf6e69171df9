use crate::foundation::error::{CartoucheError, CartoucheResult};

/// Canonical tile coordinates identifying the tile a feature was read from.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CanonicalTileId {
    /// Zoom level of the tile.
    pub z: u8,
    /// Tile column.
    pub x: u32,
    /// Tile row.
    pub y: u32,
}

impl CanonicalTileId {
    /// Build a canonical tile id, checking the coordinate range for the zoom level.
    pub fn new(z: u8, x: u32, y: u32) -> CartoucheResult<Self> {
        let extent = 1u64 << z;
        if u64::from(x) >= extent || u64::from(y) >= extent {
            return Err(CartoucheError::style(
                "CanonicalTileId x/y out of range for zoom",
            ));
        }
        Ok(Self { z, x, y })
    }
}

/// Four-sided padding in the schema's fixed component order.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Padding {
    /// Components as `[top, right, bottom, left]`.
    pub values: [f64; 4],
}

impl Padding {
    /// Uniform padding on all four sides.
    pub fn uniform(v: f64) -> Self {
        Self { values: [v; 4] }
    }

    /// Multiply every component by `ratio`.
    pub fn scaled(self, ratio: f64) -> Self {
        Self {
            values: self.values.map(|v| v * ratio),
        }
    }

    /// Expand a CSS-style shorthand slice (1, 2, 3 or 4 components).
    pub fn from_slice(values: &[f64]) -> CartoucheResult<Self> {
        let v = match *values {
            [all] => [all; 4],
            [tb, rl] => [tb, rl, tb, rl],
            [t, rl, b] => [t, rl, b, rl],
            [t, r, b, l] => [t, r, b, l],
            _ => {
                return Err(CartoucheError::style(
                    "padding must have between 1 and 4 components",
                ));
            }
        };
        Ok(Self { values: v })
    }
}

impl<'de> serde::Deserialize<'de> for Padding {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Arr(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(v) => Ok(Self::uniform(v)),
            Repr::Arr(v) => Self::from_slice(&v).map_err(serde::de::Error::custom),
        }
    }
}

/// Per-generation evaluation inputs shared by every property of a layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EvaluationParameters {
    /// Current map zoom.
    pub zoom: f64,
}

impl EvaluationParameters {
    /// Parameters for a plain zoom evaluation.
    pub fn new(zoom: f64) -> Self {
        Self { zoom }
    }
}
