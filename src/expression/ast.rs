use crate::expression::value::Value;
use crate::foundation::error::{CartoucheError, CartoucheResult};
use crate::property::possibly::PossiblyEvaluatedValue;

/// Closed style-expression AST.
///
/// Nodes are parsed from the JSON array syntax (`["get", "name"]`, …) except
/// [`Expr::SectionOverride`], which is constructed programmatically by the
/// paint-override injector and never appears in parsed input.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Constant value.
    Literal(Value),
    /// Current map zoom (camera input).
    Zoom,
    /// Feature attribute lookup.
    Get(String),
    /// Equality comparison.
    Eq(Box<Expr>, Box<Expr>),
    /// First non-null operand.
    Coalesce(Vec<Expr>),
    /// String concatenation of all operands.
    Concat(Vec<Expr>),
    /// Condition/output branches with a fallback.
    Case {
        /// Ordered condition/output pairs.
        branches: Vec<CaseBranch>,
        /// Output when no condition matches.
        fallback: Box<Expr>,
    },
    /// Piecewise-constant function over a numeric input.
    Step {
        /// Numeric input.
        input: Box<Expr>,
        /// Output below the first stop.
        default: Box<Expr>,
        /// Ascending stop input/output pairs.
        stops: Vec<(f64, Expr)>,
    },
    /// Piecewise-linear interpolation over a numeric input.
    Interpolate {
        /// Numeric input.
        input: Box<Expr>,
        /// Ascending stop input/output pairs.
        stops: Vec<(f64, Expr)>,
    },
    /// Image name resolved against the set of available images.
    Image(Box<Expr>),
    /// Rich-text constructor with construction-time declared sections.
    Format(FormatExpr),
    /// Per-run paint override resolver (injector-built, never parsed).
    SectionOverride(SectionOverrideExpr),
}

/// One `case` condition/output pair.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseBranch {
    /// Branch condition.
    pub condition: Expr,
    /// Branch output.
    pub output: Expr,
}

/// A `format` expression; its sections are known at construction time.
#[derive(Clone, Debug, PartialEq)]
pub struct FormatExpr {
    /// Ordered declared sections.
    pub sections: Vec<FormatSectionExpr>,
}

/// One declared section of a [`FormatExpr`].
#[derive(Clone, Debug, PartialEq)]
pub struct FormatSectionExpr {
    /// Section content.
    pub content: Expr,
    /// Declared per-run text color.
    pub text_color: Option<Expr>,
    /// Declared per-run font scale.
    pub font_scale: Option<Expr>,
    /// Declared per-run font stack.
    pub text_font: Option<Expr>,
}

impl FormatSectionExpr {
    fn content_only(content: Expr) -> Self {
        Self {
            content,
            text_color: None,
            font_scale: None,
            text_font: None,
        }
    }

    /// Whether this section declares an override for the paint property `name`.
    ///
    /// Declared presence is known without evaluating anything.
    pub fn declares_override(&self, name: &str) -> bool {
        match name {
            "text-color" => self.text_color.is_some(),
            _ => false,
        }
    }
}

/// Wraps an original paint value; at evaluation time the active formatted
/// section's override wins over the wrapped value.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionOverrideExpr {
    /// Overridable paint property name.
    pub property: String,
    /// The pre-override value, evaluated when no section override applies.
    pub fallback: Box<PossiblyEvaluatedValue>,
}

impl Expr {
    /// Direct children in their natural (argument) order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Literal(_) | Self::Zoom | Self::Get(_) | Self::SectionOverride(_) => Vec::new(),
            Self::Eq(a, b) => vec![a.as_ref(), b.as_ref()],
            Self::Coalesce(items) | Self::Concat(items) => items.iter().collect(),
            Self::Case { branches, fallback } => {
                let mut out = Vec::with_capacity(branches.len() * 2 + 1);
                for branch in branches {
                    out.push(&branch.condition);
                    out.push(&branch.output);
                }
                out.push(fallback.as_ref());
                out
            }
            Self::Step {
                input,
                default,
                stops,
            } => {
                let mut out = vec![input.as_ref(), default.as_ref()];
                out.extend(stops.iter().map(|(_, e)| e));
                out
            }
            Self::Interpolate { input, stops } => {
                let mut out = vec![input.as_ref()];
                out.extend(stops.iter().map(|(_, e)| e));
                out
            }
            Self::Image(name) => vec![name.as_ref()],
            Self::Format(format) => {
                let mut out = Vec::new();
                for section in &format.sections {
                    out.push(&section.content);
                    out.extend(section.text_color.as_ref());
                    out.extend(section.font_scale.as_ref());
                    out.extend(section.text_font.as_ref());
                }
                out
            }
        }
    }

    /// Whether any node in this tree reads feature data.
    pub fn uses_feature(&self) -> bool {
        matches!(self, Self::Get(_) | Self::SectionOverride(_))
            || self.children().iter().any(|c| c.uses_feature())
    }

    /// Whether any node in this tree reads the camera zoom.
    pub fn uses_zoom(&self) -> bool {
        matches!(self, Self::Zoom) || self.children().iter().any(|c| c.uses_zoom())
    }

    /// Whether `json` is the array expression syntax rather than a constant.
    pub fn is_expression_json(json: &serde_json::Value) -> bool {
        match json.as_array().and_then(|a| a.first()) {
            Some(serde_json::Value::String(op)) => matches!(
                op.as_str(),
                "literal"
                    | "zoom"
                    | "get"
                    | "=="
                    | "coalesce"
                    | "concat"
                    | "case"
                    | "step"
                    | "interpolate"
                    | "image"
                    | "format"
            ),
            _ => false,
        }
    }

    /// Parse the JSON array expression syntax.
    pub fn from_json(json: &serde_json::Value) -> CartoucheResult<Self> {
        let Some(items) = json.as_array() else {
            return Ok(Self::Literal(Value::from_json(json)?));
        };
        let Some(serde_json::Value::String(op)) = items.first() else {
            // A bare array constant (e.g. a font stack) is a literal.
            return Ok(Self::Literal(Value::from_json(json)?));
        };
        let args = &items[1..];
        match op.as_str() {
            "literal" => {
                let [arg] = args else {
                    return Err(arity("literal", 1, args.len()));
                };
                Ok(Self::Literal(Value::from_json(arg)?))
            }
            "zoom" => {
                if !args.is_empty() {
                    return Err(arity("zoom", 0, args.len()));
                }
                Ok(Self::Zoom)
            }
            "get" => {
                let [serde_json::Value::String(name)] = args else {
                    return Err(CartoucheError::expression(
                        "\"get\" expects a single attribute name",
                    ));
                };
                Ok(Self::Get(name.clone()))
            }
            "==" => {
                let [a, b] = args else {
                    return Err(arity("==", 2, args.len()));
                };
                Ok(Self::Eq(
                    Box::new(Self::from_json(a)?),
                    Box::new(Self::from_json(b)?),
                ))
            }
            "coalesce" => Ok(Self::Coalesce(parse_all(args)?)),
            "concat" => Ok(Self::Concat(parse_all(args)?)),
            "case" => {
                if args.len() < 3 || args.len() % 2 == 0 {
                    return Err(CartoucheError::expression(
                        "\"case\" expects condition/output pairs and a fallback",
                    ));
                }
                let mut branches = Vec::with_capacity(args.len() / 2);
                for pair in args[..args.len() - 1].chunks(2) {
                    branches.push(CaseBranch {
                        condition: Self::from_json(&pair[0])?,
                        output: Self::from_json(&pair[1])?,
                    });
                }
                let fallback = Box::new(Self::from_json(&args[args.len() - 1])?);
                Ok(Self::Case { branches, fallback })
            }
            "step" => {
                if args.len() < 2 || args.len() % 2 != 0 {
                    return Err(CartoucheError::expression(
                        "\"step\" expects an input, a default output, and stop pairs",
                    ));
                }
                let input = Box::new(Self::from_json(&args[0])?);
                let default = Box::new(Self::from_json(&args[1])?);
                let stops = parse_stops("step", &args[2..])?;
                Ok(Self::Step {
                    input,
                    default,
                    stops,
                })
            }
            "interpolate" => {
                if args.len() < 4 || args.len() % 2 != 0 {
                    return Err(CartoucheError::expression(
                        "\"interpolate\" expects a method, an input, and stop pairs",
                    ));
                }
                match args[0].as_array().and_then(|a| a.first()) {
                    Some(serde_json::Value::String(kind)) if kind == "linear" => {}
                    _ => {
                        return Err(CartoucheError::expression(
                            "only [\"linear\"] interpolation is supported",
                        ));
                    }
                }
                let input = Box::new(Self::from_json(&args[1])?);
                let stops = parse_stops("interpolate", &args[2..])?;
                if stops.is_empty() {
                    return Err(CartoucheError::expression(
                        "\"interpolate\" requires at least one stop",
                    ));
                }
                Ok(Self::Interpolate { input, stops })
            }
            "image" => {
                let [name] = args else {
                    return Err(arity("image", 1, args.len()));
                };
                Ok(Self::Image(Box::new(Self::from_json(name)?)))
            }
            "format" => Ok(Self::Format(parse_format(args)?)),
            other => Err(CartoucheError::expression(format!(
                "unknown expression operator \"{other}\""
            ))),
        }
    }
}

fn arity(op: &str, want: usize, got: usize) -> CartoucheError {
    CartoucheError::expression(format!(
        "\"{op}\" expects {want} argument(s), got {got}"
    ))
}

fn parse_all(args: &[serde_json::Value]) -> CartoucheResult<Vec<Expr>> {
    args.iter().map(Expr::from_json).collect()
}

fn parse_stops(op: &str, args: &[serde_json::Value]) -> CartoucheResult<Vec<(f64, Expr)>> {
    let mut stops = Vec::with_capacity(args.len() / 2);
    let mut last: Option<f64> = None;
    for pair in args.chunks(2) {
        let [at_raw, output_raw] = pair else {
            return Err(CartoucheError::expression(format!(
                "\"{op}\" stops must come in input/output pairs"
            )));
        };
        let Some(at) = at_raw.as_f64() else {
            return Err(CartoucheError::expression(format!(
                "\"{op}\" stop inputs must be number literals"
            )));
        };
        if last.is_some_and(|prev| at <= prev) {
            return Err(CartoucheError::expression(format!(
                "\"{op}\" stop inputs must be strictly ascending"
            )));
        }
        last = Some(at);
        stops.push((at, Expr::from_json(output_raw)?));
    }
    Ok(stops)
}

fn parse_format(args: &[serde_json::Value]) -> CartoucheResult<FormatExpr> {
    let mut sections: Vec<FormatSectionExpr> = Vec::new();
    for arg in args {
        if let serde_json::Value::Object(style) = arg {
            let Some(section) = sections.last_mut() else {
                return Err(CartoucheError::expression(
                    "\"format\" style options must follow a section input",
                ));
            };
            for (key, raw) in style {
                let expr = Some(Expr::from_json(raw)?);
                match key.as_str() {
                    "text-color" => section.text_color = expr,
                    "font-scale" => section.font_scale = expr,
                    "text-font" => section.text_font = expr,
                    other => {
                        return Err(CartoucheError::expression(format!(
                            "unknown \"format\" style option \"{other}\""
                        )));
                    }
                }
            }
        } else {
            sections.push(FormatSectionExpr::content_only(Expr::from_json(arg)?));
        }
    }
    Ok(FormatExpr { sections })
}

#[cfg(test)]
#[path = "../../tests/unit/expression/ast.rs"]
mod tests;
