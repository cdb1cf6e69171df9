/// Convenience result type used across Cartouche.
pub type CartoucheResult<T> = Result<T, CartoucheError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum CartoucheError {
    /// Invalid layer or property definitions.
    #[error("style error: {0}")]
    Style(String),

    /// Errors while parsing or evaluating style expressions.
    #[error("expression error: {0}")]
    Expression(String),

    /// Feature queries routed to the wrong subsystem.
    #[error("query error: {0}")]
    Query(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CartoucheError {
    /// Build a [`CartoucheError::Style`] value.
    pub fn style(msg: impl Into<String>) -> Self {
        Self::Style(msg.into())
    }

    /// Build a [`CartoucheError::Expression`] value.
    pub fn expression(msg: impl Into<String>) -> Self {
        Self::Expression(msg.into())
    }

    /// Build a [`CartoucheError::Query`] value.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
