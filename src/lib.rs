//! Cartouche is a symbol-layer style resolution and paint-override engine for
//! map rendering.
//!
//! It turns declarative, possibly zoom- and feature-dependent symbol style
//! definitions into concrete per-generation rendering parameters, and it
//! implements per-run paint overrides for rich formatted text (for example a
//! per-character text color inside one label).
//!
//! # Pipeline overview
//!
//! 1. **Parse**: `LayerDef` (style JSON) -> declared property sets
//! 2. **Recalculate** (per zoom/style generation):
//!    generic evaluation -> layout default resolution -> paint override
//!    injection ([`SymbolLayer::recalculate`])
//! 3. **Read back**: the renderer consumes `layout`/`paint`, plus
//!    [`SymbolLayer::get_value_and_resolve_tokens`] and
//!    [`SymbolLayer::icon_padding`] per feature
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: recalculation is a pure function of the declared
//!   style, the evaluation parameters, and the available images.
//! - **Rebuild, don't patch**: every generation rebuilds the evaluated sets,
//!   so override wrappers never stack and alignment rules see fresh inputs.
//! - **Single writer per layer**: one instance is never recalculated
//!   concurrently; distinct instances may run in parallel
//!   ([`recalculate_layers`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod expression;
mod foundation;
mod property;
mod schema;
mod symbol;

pub use expression::ast::{CaseBranch, Expr, FormatExpr, FormatSectionExpr, SectionOverrideExpr};
pub use expression::eval::{EvaluationContext, Feature, Lerp};
pub use expression::value::{Color, Formatted, FormattedSection, Value, ValueType};
pub use foundation::core::{CanonicalTileId, EvaluationParameters, Padding};
pub use foundation::error::{CartoucheError, CartoucheResult};
pub use property::possibly::{
    CompositeExpression, EvaluationKind, PossiblyEvaluated, PossiblyEvaluatedValue, PropertySet,
    SourceExpression, UnevaluatedProperties, UnevaluatedProperty,
};
pub use property::spec::{PropertySpec, symbol_layout_specs, symbol_paint_specs};
pub use property::value::{ExpressionKind, PropertyValue, StyleExpression};
pub use schema::{LayerDef, build_properties};
pub use symbol::bucket::{BucketParameters, SymbolBucket};
pub use symbol::layer::{SymbolLayer, recalculate_layers};
pub use symbol::overrides::{apply_paint_overrides, has_paint_override};
pub use symbol::resolve::{Alignment, SymbolPlacement, WritingMode, resolve_symbol_layout};
pub use symbol::tokens::resolve_tokens;
