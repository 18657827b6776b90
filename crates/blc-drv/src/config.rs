//! Resolved configuration for one compilation run.

use std::path::{Path, PathBuf};

use crate::cli::Args;
use crate::error::{DrvError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output_stem: PathBuf,
    pub target: String,
    pub print_ir: bool,
    pub asm_only: bool,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self> {
        let input = args.input.clone().ok_or(DrvError::MissingInput)?;

        let target = if args.wasmedge_aot { "wasmedge".to_string() } else { args.target.clone() };

        let output_stem = args.output.clone().unwrap_or_else(|| default_stem(&input));

        Ok(Self { input, output_stem, target, print_ir: args.print_ir, asm_only: args.asm_only })
    }
}

fn default_stem(input: &Path) -> PathBuf {
    input.with_extension("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: Option<&str>) -> Args {
        Args {
            input: input.map(PathBuf::from),
            target: "x86_64".to_string(),
            output: None,
            optimize: None,
            print_ir: false,
            asm_only: false,
            wasmedge_aot: false,
            list_targets: false,
            parse: None,
        }
    }

    #[test]
    fn missing_input_is_an_error() {
        assert!(matches!(Config::from_args(&args(None)), Err(DrvError::MissingInput)));
    }

    #[test]
    fn output_stem_defaults_to_the_input_stem() {
        let config = Config::from_args(&args(Some("programs/hello.b"))).unwrap();
        assert_eq!(config.output_stem, PathBuf::from("programs/hello"));
    }

    #[test]
    fn wasmedge_aot_overrides_the_chosen_target() {
        let mut a = args(Some("a.b"));
        a.target = "x86_64".to_string();
        a.wasmedge_aot = true;
        let config = Config::from_args(&a).unwrap();
        assert_eq!(config.target, "wasmedge");
    }
}
