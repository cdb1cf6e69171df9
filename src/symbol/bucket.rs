use crate::foundation::core::CanonicalTileId;

/// Inputs handed to the tessellation subsystem when a tile bucket is built.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BucketParameters {
    /// Tile the bucket belongs to.
    pub canonical: CanonicalTileId,
    /// Tile zoom the bucket is built for.
    pub zoom: f64,
    /// Ratio of tile zoom to source max zoom.
    pub overscaling: f64,
    /// Device pixel ratio.
    pub pixel_ratio: f64,
}

/// Per-tile container of symbol geometry, filled by the tessellation
/// subsystem; the style layer only seeds it with its inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolBucket {
    /// Id of the owning style layer.
    pub layer_id: String,
    /// Build inputs.
    pub parameters: BucketParameters,
}

impl SymbolBucket {
    /// Seed a bucket for the given layer.
    pub fn new(layer_id: impl Into<String>, parameters: BucketParameters) -> Self {
        Self {
            layer_id: layer_id.into(),
            parameters,
        }
    }
}
