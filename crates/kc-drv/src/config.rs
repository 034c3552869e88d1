//! Command-line configuration, populated by hand-rolled `std::env::args()`
//! parsing rather than a `clap`-derived parser — mirroring `faxc-drv`'s own
//! `main.rs`/`lib.rs`, which never reaches for the `clap`-based CLI
//! framework the sibling `faxt` tool uses (DESIGN.md).

use std::path::PathBuf;

use crate::error::CliError;

/// What the driver should stop after and print, instead of finishing the
/// pipeline through object-file emission (§6A: `--emit-tokens`/`--emit-ast`,
/// scaled down from `faxc-drv`'s `EmitType::{Tokens, Ast, Hir, Mir, Lir,
/// Asm}` to the two real front-end stages this compiler has).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    Tokens,
    Ast,
    Object,
}

impl Default for Emit {
    fn default() -> Self {
        Emit::Object
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub emit: Emit,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::from("kc.o"),
            emit: Emit::default(),
            verbose: false,
        }
    }
}

pub const USAGE: &str = "\
usage: kc <input-file> [-o <output-file>] [-v|--verbose] [--emit-tokens|--emit-ast]

Compiles a KC source file to a native object file (default: kc.o).
";

/// Parses the process argument list (excluding `argv[0]`). `Ok(None)` means
/// usage text was already printed to stdout and the caller should exit 0
/// (§6: the no-positional-argument case, and `-h`/`--help`).
pub fn parse_args<I, S>(args: I) -> Result<Option<Config>, CliError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut config = Config::default();
    let mut input: Option<PathBuf> = None;

    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        let arg = arg.as_ref();
        match arg {
            "-h" | "--help" => {
                print!("{USAGE}");
                return Ok(None);
            }
            "-o" => {
                let value = it
                    .next()
                    .ok_or_else(|| CliError::MissingValue("-o".to_string()))?;
                config.output = PathBuf::from(value.as_ref());
            }
            "-v" | "--verbose" => config.verbose = true,
            "--emit-tokens" => config.emit = Emit::Tokens,
            "--emit-ast" => config.emit = Emit::Ast,
            _ if arg.starts_with('-') => return Err(CliError::UnknownFlag(arg.to_string())),
            _ => input = Some(PathBuf::from(arg)),
        }
    }

    let Some(input) = input else {
        print!("{USAGE}");
        return Ok(None);
    };
    config.input = input;
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_prints_usage_and_returns_none() {
        assert!(parse_args(Vec::<&str>::new()).unwrap().is_none());
    }

    #[test]
    fn help_flag_returns_none() {
        assert!(parse_args(["--help"]).unwrap().is_none());
        assert!(parse_args(["-h"]).unwrap().is_none());
    }

    #[test]
    fn bare_input_defaults_output_to_kc_dot_o() {
        let config = parse_args(["main.kc"]).unwrap().unwrap();
        assert_eq!(config.input, PathBuf::from("main.kc"));
        assert_eq!(config.output, PathBuf::from("kc.o"));
        assert_eq!(config.emit, Emit::Object);
    }

    #[test]
    fn dash_o_overrides_output() {
        let config = parse_args(["main.kc", "-o", "out.o"]).unwrap().unwrap();
        assert_eq!(config.output, PathBuf::from("out.o"));
    }

    #[test]
    fn verbose_flag_is_recorded() {
        let config = parse_args(["main.kc", "-v"]).unwrap().unwrap();
        assert!(config.verbose);
    }

    #[test]
    fn emit_flags_select_the_stage() {
        assert_eq!(
            parse_args(["main.kc", "--emit-tokens"]).unwrap().unwrap().emit,
            Emit::Tokens
        );
        assert_eq!(
            parse_args(["main.kc", "--emit-ast"]).unwrap().unwrap().emit,
            Emit::Ast
        );
    }

    #[test]
    fn dash_o_without_a_value_is_an_error() {
        assert!(matches!(parse_args(["main.kc", "-o"]), Err(CliError::MissingValue(_))));
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(matches!(parse_args(["main.kc", "--bogus"]), Err(CliError::UnknownFlag(_))));
    }
}
