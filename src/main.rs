use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use holyd::interpreter::context::StdioContext;
use holyd::interpreter::formatter::{
    BasicFormatter as BasicValueFormatter, DebugFormatter as DebugValueFormatter,
    PrettyFormatter as PrettyValueFormatter, ValueFormatter,
};
use holyd::interpreter::TreeWalkInterpreter;
use holyd::lexer::formatter::{
    BasicFormatter as BasicTokenFormatter, DebugFormatter as DebugTokenFormatter,
    PrettyFormatter as PrettyTokenFormatter, TokenFormatter,
};
use holyd::lexer::{Lexer, TokenKind};
use holyd::parser::formatter::{
    BasicParserFormatter, DebugParserFormatter, DebugProgramFormatter, ParserFormatter,
    PrettyParserFormatter, ProgramFormatter, SExpressionFormatter,
};
use holyd::parser::statement::Program;
use holyd::HolyError;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};

const CACHE_DIRECTORY: &str = "_holy_d_cache";
const CACHE_EXTENSION: &str = "hdast";
const COMPILE_ERROR_CODE: u8 = 65;
const RUNTIME_ERROR_CODE: u8 = 70;

#[derive(Debug, Parser)]
#[clap(name = "holyd", version, about = "Holy-D language interpreter")]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: HolyCommand,
    /// How errors are reported.
    #[clap(long = "errors", value_enum, default_value = "pretty", global = true)]
    pub errors: ErrorFormat,
}

#[derive(Debug, Subcommand)]
pub enum HolyCommand {
    /// Print the token stream of a script.
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    /// Print the syntax tree of a script.
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "sexpr")]
        format: TreeFormat,
    },
    /// Execute a script.
    Run {
        path: PathBuf,
        /// Save the parsed tree next to the script.
        #[clap(long = "cache")]
        cache: bool,
    },
    /// Start an interactive session.
    Repl,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TreeFormat {
    Debug,
    #[clap(name = "sexpr")]
    SExpr,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ErrorFormat {
    Debug,
    Basic,
    Pretty,
}

fn main() -> ExitCode {
    holy_main().expect("Encountered an error!")
}

fn holy_main() -> Result<ExitCode> {
    color_eyre::install().expect("Can't fail at first call!");
    let args = CLArgs::parse();
    match args.routine {
        HolyCommand::Tokenize { path, format } => {
            eprintln!("Tokenizing {:?}...", path);
            let src = read_to_string(&path).wrap_err("Failed to read script")?;
            if !tokenize(&src, &path, &format, args.errors) {
                return Ok(ExitCode::from(COMPILE_ERROR_CODE));
            }
        }
        HolyCommand::Parse { path, format } => {
            eprintln!("Parsing {:?}...", path);
            let src = read_to_string(&path).wrap_err("Failed to read script")?;
            match parse(&src, &path, args.errors) {
                Ok(program) => {
                    let formatter: Box<dyn ProgramFormatter> = match format {
                        TreeFormat::Debug => Box::new(DebugProgramFormatter),
                        TreeFormat::SExpr => Box::new(SExpressionFormatter),
                    };
                    println!("{}", formatter.format(&program));
                }
                Err(report) => {
                    eprintln!("{report}");
                    return Ok(ExitCode::from(COMPILE_ERROR_CODE));
                }
            }
        }
        HolyCommand::Run { path, cache } => {
            eprintln!("Running {:?}...", path);
            let src = read_to_string(&path).wrap_err("Failed to read script")?;
            let program = match parse(&src, &path, args.errors) {
                Ok(program) => program,
                Err(report) => {
                    eprintln!("{report}");
                    return Ok(ExitCode::from(COMPILE_ERROR_CODE));
                }
            };
            if cache {
                let cache_path = save_ast(&program, &path)?;
                eprintln!("AST saved to {:?}", cache_path);
            }
            let mut interpreter = TreeWalkInterpreter::new(StdioContext);
            if let Err(error) = interpreter.interpret(&program) {
                eprintln!(
                    "{}",
                    format_error(&HolyError::Runtime(error), &src, &path, args.errors)
                );
                return Ok(ExitCode::from(RUNTIME_ERROR_CODE));
            }
        }
        HolyCommand::Repl => {
            repl(args.errors)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn format_error(error: &HolyError, src: &str, path: &Path, format: ErrorFormat) -> String {
    match (error, format) {
        (HolyError::Lexical(e), ErrorFormat::Debug) => DebugTokenFormatter.format_error(e),
        (HolyError::Lexical(e), ErrorFormat::Basic) => {
            BasicTokenFormatter::new(src).format_error(e)
        }
        (HolyError::Lexical(e), ErrorFormat::Pretty) => {
            PrettyTokenFormatter::new(src, path).format_error(e)
        }
        (HolyError::Parser(e), ErrorFormat::Debug) => DebugParserFormatter.format_error(e),
        (HolyError::Parser(e), ErrorFormat::Basic) => BasicParserFormatter.format_error(e),
        (HolyError::Parser(e), ErrorFormat::Pretty) => {
            PrettyParserFormatter::new(src, path).format_error(e)
        }
        (HolyError::Runtime(e), ErrorFormat::Debug) => DebugValueFormatter.format_error(e),
        (HolyError::Runtime(e), ErrorFormat::Basic) => BasicValueFormatter.format_error(e),
        (HolyError::Runtime(e), ErrorFormat::Pretty) => {
            PrettyValueFormatter::new(src, path).format_error(e)
        }
    }
}

fn tokenize(src: &str, path: &Path, format: &TokenFormat, errors: ErrorFormat) -> bool {
    let formatter: Box<dyn TokenFormatter> = match format {
        TokenFormat::Debug => Box::new(DebugTokenFormatter),
        TokenFormat::Basic => Box::new(BasicTokenFormatter::new(src)),
    };
    for token_or_error in Lexer::new(src) {
        match token_or_error {
            Ok(token) => {
                println!("{}", formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    return true;
                }
            }
            Err(error) => {
                eprintln!("{}", format_error(&error.into(), src, path, errors));
                return false;
            }
        }
    }
    true
}

/// Tokenizes and parses `src`, rendering any failure with the chosen format.
fn parse(src: &str, path: &Path, errors: ErrorFormat) -> Result<Program, String> {
    holyd::tokenize(src)
        .map_err(HolyError::from)
        .and_then(|tokens| holyd::parse(&tokens).map_err(HolyError::from))
        .map_err(|error| format_error(&error, src, path, errors))
}

fn write_ast(program: &Program, destination: &Path) -> Result<()> {
    std::fs::write(destination, SExpressionFormatter.format(program))
        .wrap_err_with(|| format!("Failed to write AST to {:?}", destination))
}

/// `<script dir>/_holy_d_cache/<script stem>.hdast`. Only the last extension
/// is replaced, so `a.x.hd` and `a.y.hd` get separate files.
fn cache_path(script: &Path) -> PathBuf {
    let directory = script
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .join(CACHE_DIRECTORY);
    let mut file_name = script.file_stem().unwrap_or(script.as_os_str()).to_os_string();
    file_name.push(".");
    file_name.push(CACHE_EXTENSION);
    directory.join(file_name)
}

fn save_ast(program: &Program, script: &Path) -> Result<PathBuf> {
    let destination = cache_path(script);
    if let Some(directory) = destination.parent() {
        std::fs::create_dir_all(directory)
            .wrap_err_with(|| format!("Failed to create cache directory {:?}", directory))?;
    }
    write_ast(program, &destination)?;
    Ok(destination)
}

fn repl(errors: ErrorFormat) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut interpreter = TreeWalkInterpreter::new(StdioContext);
    let mut last_program: Option<Program> = None;
    let mut session = 1;
    let repl_path = Path::new("<repl>");

    println!("Holy-D REPL (type 'exit' to quit, 'save' to save the last fragment)");
    loop {
        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(error) => return Err(error.into()),
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        editor.add_history_entry(input)?;

        match input.to_lowercase().as_str() {
            "exit" | "quit" => break,
            "save" => {
                match last_program {
                    Some(ref program) => {
                        let destination =
                            PathBuf::from(format!("repl_session_{session}.{CACHE_EXTENSION}"));
                        write_ast(program, &destination)?;
                        eprintln!("AST saved to {:?}", destination);
                        session += 1;
                    }
                    None => eprintln!("Nothing to save yet."),
                }
                continue;
            }
            _ => {}
        }

        let program = match parse(input, repl_path, errors) {
            Ok(program) => program,
            Err(report) => {
                eprintln!("{report}");
                last_program = None;
                continue;
            }
        };
        match interpreter.interpret(&program) {
            Ok(environment) => {
                if !environment.is_empty() {
                    println!("{environment}");
                }
                last_program = Some(program);
            }
            Err(error) => {
                eprintln!(
                    "{}",
                    format_error(&HolyError::Runtime(error), input, repl_path, errors)
                );
                last_program = None;
            }
        }
    }
    Ok(())
}
