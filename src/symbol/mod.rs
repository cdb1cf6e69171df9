pub mod bucket;
pub mod layer;
pub mod overrides;
pub mod resolve;
pub mod tokens;
