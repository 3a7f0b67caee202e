use std::fs;

use anyhow::{Context, Result, bail};
use liftoff::{interpreter, lexer, parser};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mut show_ast = false;
    let mut input_path: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ast" | "-a" => {
                show_ast = true;
            }
            _ => {
                input_path = Some(arg);
                if args.next().is_some() {
                    bail!("Only one input file is supported");
                }
                break;
            }
        }
    }

    let Some(path) = input_path else {
        bail!("Usage: liftoff [--ast] <file>");
    };
    let source = fs::read_to_string(&path).with_context(|| format!("Reading {path}"))?;

    let tokens = lexer::tokenize(&source)?;
    let program = parser::parse_tokens(tokens)?;

    if show_ast {
        println!("{program}");
        println!();
    }

    interpreter::evaluate(&program)?;
    Ok(())
}
