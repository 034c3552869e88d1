//! Driver-stage error type: everything that can go wrong before a single
//! compiler phase even runs (argument parsing), as opposed to the
//! phase errors (`LexError`/`ParseError`/`TypeError`/`IrEmitError`) each
//! carry their own `thiserror` enum and are folded into `anyhow::Error` by
//! `run` (§7's "[prefix] message" convention).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown flag {0:?}")]
    UnknownFlag(String),

    #[error("{0} requires a value")]
    MissingValue(String),
}
