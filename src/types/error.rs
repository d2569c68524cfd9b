use thiserror::Error;

/// Why a rule tree could not be compiled against a target type.
///
/// Every variant is detected while compiling; evaluating a compiled
/// predicate never fails.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("member '{member}' not found on type '{ty}'")]
    MemberNotFound { member: String, ty: String },

    #[error("no method '{method}({})' on type '{ty}'", signature.join(", "))]
    MethodNotFound {
        method: String,
        ty: String,
        signature: Vec<String>,
    },

    #[error(
        "ambiguous call to '{method}({})' on type '{ty}': {candidates} overloads match equally well",
        signature.join(", ")
    )]
    AmbiguousMethod {
        method: String,
        ty: String,
        signature: Vec<String>,
        candidates: usize,
    },

    #[error("cannot convert '{literal}' to type '{ty}'")]
    UnparsableLiteral { literal: String, ty: String },

    #[error("malformed rule '{operator}': {reason}")]
    MalformedRuleTree {
        operator: String,
        reason: &'static str,
    },

    #[error("operator '{operator}' is not supported for type '{ty}'")]
    OperatorNotSupported { operator: String, ty: String },

    #[error("invalid pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("member '{member}' of type '{ty}' is not a collection")]
    NotACollection { member: String, ty: String },
}
