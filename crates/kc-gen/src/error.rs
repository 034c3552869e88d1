//! IR-emission error type. Every variant indicates an internal bug (a
//! missing case, or a builder verification failure) rather than a source
//! program defect — by the time emission runs, the type checker has
//! already rejected every ill-typed program (§7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IrEmitError {
    #[error("function {0:?} failed verification: {1}")]
    VerificationFailed(String, String),

    #[error("internal: {0}")]
    Internal(String),

    #[error("failed to write object file to {0}: {1}")]
    ObjectWriteFailed(String, String),

    #[error("failed to create target machine for triple {0:?}")]
    NoTargetMachine(String),
}
