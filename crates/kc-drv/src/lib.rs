//! The driver: orchestrates the four compiler phases in order, turns each
//! phase's own error type into a single `[prefix] message` line (§7), and
//! owns the hand-rolled CLI (§6/§6A). Grounded in `faxc-drv`'s
//! `Config`/`Session` pipeline-orchestration shape (`lib.rs`), trimmed of
//! the multi-file `SourceMap`, incremental cache, and HIR/MIR/LIR/linking
//! stages this single-file, no-GC, object-file-only compiler has no use
//! for (DESIGN.md).

mod config;
mod error;

pub use config::{parse_args, Config, Emit, USAGE};
pub use error::CliError;

use anyhow::anyhow;
use inkwell::context::Context;
use inkwell::targets::TargetMachine;
use tracing::info;

use kc_gen::{IrBuilder, LlvmIrBuilder};

/// Runs the full pipeline against `config`, writing the object file (or,
/// for `--emit-tokens`/`--emit-ast`, a debug dump to stdout) and returning
/// the first phase error it hits, already carrying its `[prefix]` tag.
pub fn run(config: &Config) -> anyhow::Result<()> {
    info!(input = %config.input.display(), "lex");
    let tokens = kc_lex::Lexer::tokenize_file(&config.input).map_err(|e| anyhow!("[lex] {e}"))?;

    if config.emit == Emit::Tokens {
        for tok in &tokens {
            println!("{tok:?}");
        }
        return Ok(());
    }

    info!("parse");
    let ast = kc_par::parse(tokens).map_err(|e| anyhow!("[parse] {e}"))?;

    if config.emit == Emit::Ast {
        println!("{ast:#?}");
        return Ok(());
    }

    info!("type check");
    let types = kc_sem::check(&ast).map_err(|e| anyhow!("[type] {e}"))?;

    info!("emit IR");
    let context = Context::create();
    let module_name = config
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "kc_module".to_string());
    let triple = TargetMachine::get_default_triple().to_string();
    let mut builder = LlvmIrBuilder::new(&context, &module_name, triple);

    kc_gen::emit_translation_unit(&ast, &types, &mut builder).map_err(|e| anyhow!("[ir] {e}"))?;

    info!(output = %config.output.display(), "write object file");
    builder.emit_object(&config.output).map_err(|e| anyhow!("[ir] {e}"))?;

    Ok(())
}

/// Installs a `tracing-subscriber` `fmt` subscriber at `debug` level,
/// gated behind `-v`/`--verbose` (§6A). Grounded in `faxt`'s
/// `tracing`/`tracing-subscriber` pair — the closest ambient-logging
/// precedent in the pack, since `faxc-drv` itself only `eprintln!`s.
pub fn install_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
