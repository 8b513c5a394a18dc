//! Error types for pipeline assembly.

/// Errors raised while registering pipeline steps.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PipelineError {
    /// The placement refers to a step that is not registered.
    #[error("Unknown pipeline step '{anchor}' (needed to place '{step}')")]
    UnknownAnchor {
        /// Step being registered.
        step: String,
        /// Step it was supposed to be placed next to.
        anchor: String,
    },
    /// A step with the same name is already registered.
    #[error("Pipeline step '{0}' is already registered")]
    Duplicate(String),
}
