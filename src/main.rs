use std::env;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use rpal::common::Source;
use rpal::compiler::{self, Lexer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Evaluate the program and print its output.
    Run,
    /// Print the parse tree and stop.
    DumpAst,
    /// Print the standardized tree and stop.
    DumpStandardized,
}

fn main() {
    let (path, mode) = parse_args();

    let source = match Source::path(&path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("could not read {}: {}", path.display(), error);
            process::exit(1);
        },
    };

    if let Err(message) = drive(source, mode) {
        eprintln!("{}", message);
        process::exit(1);
    }
}

fn parse_args() -> (PathBuf, Mode) {
    let mut path = None;
    let mut mode = Mode::Run;

    for arg in env::args_os().skip(1) {
        match arg.to_str() {
            Some("-ast") => {
                mode = Mode::DumpAst;
                continue;
            },
            Some("-st") => {
                mode = Mode::DumpStandardized;
                continue;
            },
            Some(flag) if flag.starts_with('-') => usage(&format!("unknown flag `{}`", flag)),
            _ => (),
        }

        if path.is_none() {
            path = Some(PathBuf::from(arg));
        } else {
            usage("more than one input file given");
        }
    }

    match path {
        Some(path) => (path, mode),
        None => usage("no input file given"),
    }
}

fn usage(complaint: &str) -> ! {
    eprintln!("{}", complaint);
    eprintln!("Usage: rpal <filename> [-ast] [-st]");
    process::exit(1);
}

/// Runs the pipeline up to the point the mode asks for.
/// All errors come back as their display form, ready for stderr.
fn drive(source: Rc<Source>, mode: Mode) -> Result<(), String> {
    let tokens = Lexer::lex(source).map_err(|error| error.to_string())?;
    let tree = compiler::parse(tokens).map_err(|error| error.to_string())?;

    if mode == Mode::DumpAst {
        print!("{}", tree.dump());
        return Ok(());
    }

    let standardized = compiler::standardize(tree);

    if mode == Mode::DumpStandardized {
        print!("{}", standardized.dump());
        return Ok(());
    }

    let control = compiler::gen(&standardized).map_err(|error| error.to_string())?;
    let output = rpal::run(control).map_err(|error| error.to_string())?;

    if !output.is_empty() {
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}
