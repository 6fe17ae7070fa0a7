// Command-line driver for the Cinder interpreter: parse, type-check,
// transform and run a program, then show the final state.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use cinder_ast::ast::{RawProgram, TypedProgram};
use cinder_eval::state::{Slot, State};
use cinder_ast::value::Value;
use cinder_parser::parser::parse_program;

#[derive(Debug, Parser)]
#[command(
    name = "cinder",
    version,
    about = "The Cinder language interpreter",
    long_about = "cinder parses, type-checks and interprets Cinder programs.\n\n\
        EXAMPLES:\n\
        \n  cinder run program.cn             Run a program, print the final state\n\
        \n  cinder check program.cn           Type-check only\n\
        \n  cinder ast program.cn             Print the abstract syntax tree\n\
        \n  echo 'int main() { }' | cinder check   Read from stdin"
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse and type-check a source file
    Check(InputArgs),
    /// Run a program and print its final state
    Run(InputArgs),
    /// Print the abstract syntax tree of a source file
    Ast(InputArgs),
}

#[derive(Debug, Args, Clone)]
struct InputArgs {
    /// Source file (reads from stdin if not provided)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Emit machine-readable JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let result = match &cli.command {
        Command::Check(args) => cmd_check(args),
        Command::Run(args) => cmd_run(args),
        Command::Ast(args) => cmd_ast(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn read_source(input: &Option<PathBuf>) -> Result<String, String> {
    match input {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))
        }
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| format!("stdin: {e}"))?;
            Ok(source)
        }
    }
}

fn front_end(args: &InputArgs) -> Result<RawProgram, String> {
    let source = read_source(&args.input)?;
    parse_program(&source).map_err(|e| e.to_string())
}

fn compile(args: &InputArgs) -> Result<TypedProgram, String> {
    let program = front_end(args)?;
    cinder_typeck::check(&program).map_err(|e| e.to_string())?;
    cinder_typeck::transform(&program).map_err(|e| e.to_string())
}

fn cmd_check(args: &InputArgs) -> Result<(), String> {
    let program = front_end(args)?;
    cinder_typeck::check(&program).map_err(|e| e.to_string())?;
    if args.json {
        println!("{}", serde_json::json!({ "status": "ok" }));
    } else {
        println!("type check ok");
    }
    Ok(())
}

fn cmd_run(args: &InputArgs) -> Result<(), String> {
    let program = compile(args)?;
    let state = cinder_eval::run(&program).map_err(|e| e.to_string())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&state_to_json(&state)).expect("state serializes"));
    } else {
        print!("{state}");
    }
    Ok(())
}

fn cmd_ast(args: &InputArgs) -> Result<(), String> {
    let program = front_end(args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&program).map_err(|e| e.to_string())?);
    } else {
        println!("{program:#?}");
    }
    Ok(())
}

fn state_to_json(state: &State) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (name, slot) in state.bindings() {
        let value = match slot {
            Slot::Undefined(_) => serde_json::Value::Null,
            Slot::Defined(Value::Int(v)) => serde_json::json!(v),
            Slot::Defined(Value::Bool(v)) => serde_json::json!(v),
            Slot::Defined(Value::Char(v)) => serde_json::json!(v.to_string()),
            Slot::Defined(Value::Float(v)) => serde_json::json!(v),
        };
        map.insert(name.to_string(), value);
    }
    serde_json::Value::Object(map)
}
