// Copyright (C) 2023 - 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

#![deny(elided_lifetimes_in_paths)]

mod logger;

use std::{path::{Path, PathBuf}, process::ExitCode};

use anyhow::Context;
use clap::Subcommand;
use colored::Colorize;
use log::LevelFilter;
use logger::Logger;
use sparrow::{ConfigRoot, Lexer, Node, OutputFormat, ParseError, Parser, Token};

#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        use clap::Parser;
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every token of a source file.
    Tokens {
        file: PathBuf,
    },

    /// Print the syntax tree of a source file.
    Parse {
        file: PathBuf,
    },
}

impl Commands {
    fn file(&self) -> &Path {
        match self {
            Self::Tokens { file } | Self::Parse { file } => file,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse_args();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e:#}", "error".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let file = args.command.file();
    let directory = file.parent().unwrap_or(Path::new("."));
    let config = ConfigRoot::load(directory)?;

    Logger::initialize(log_level(args.verbose, &config));

    let mut lexer = Lexer::new();
    if !lexer.parse_file(file) {
        anyhow::bail!("could not open {}", file.display());
    }

    match &args.command {
        Commands::Tokens { .. } => {
            for token in &mut lexer {
                println!("{}", describe_token(&token));
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Parse { .. } => match Parser::new().parse(&mut lexer) {
            Ok(program) => {
                print_tree(&program, config.output.format);
                Ok(ExitCode::SUCCESS)
            }

            Err(e) => {
                let source = std::fs::read_to_string(file)
                    .with_context(|| format!("could not reread {}", file.display()))?;
                print_error(&source, &e);
                Ok(ExitCode::from(1))
            }
        },
    }
}

fn log_level(verbose: bool, config: &ConfigRoot) -> LevelFilter {
    if config.log.trace {
        LevelFilter::Trace
    } else if verbose || config.log.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

fn describe_token(token: &Token) -> String {
    format!("{:>4}  {:<10} {token}", token.line(), token.kind().name())
}

fn print_tree(program: &Node, format: OutputFormat) {
    match format {
        OutputFormat::Tree => {
            for statement in program.statements().unwrap_or_default() {
                println!("{statement}");
            }
        }

        OutputFormat::Debug => println!("{program:#?}"),
    }
}

fn print_error(source: &str, error: &ParseError) {
    eprintln!("{}: {}", "syntax error".red().bold(), error.to_string().bold());

    let Some(location) = error.location() else {
        return;
    };

    if let Some(line) = source.lines().nth(location.line.saturating_sub(1)) {
        eprintln!();
        eprintln!("{:>4} {} {line}", location.line.to_string().bright_blue(), "|".bright_blue());
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use rstest::rstest;
    use sparrow::TokenKind;

    #[rstest]
    #[case(false, false, false, LevelFilter::Warn)]
    #[case(true, false, false, LevelFilter::Debug)]
    #[case(false, true, false, LevelFilter::Debug)]
    #[case(true, false, true, LevelFilter::Trace)]
    fn level_from_flags_and_config(#[case] verbose: bool, #[case] debug: bool, #[case] trace: bool, #[case] expected: LevelFilter) {
        let mut config = ConfigRoot::default();
        config.log.debug = debug;
        config.log.trace = trace;

        assert_eq!(log_level(verbose, &config), expected);
    }

    #[rstest]
    #[case(Token::new(TokenKind::Integer(42), 3, Rc::from(""), "42"), "   3  integer    42")]
    #[case(Token::identifier(12, Rc::from(""), "while"), "  12  identifier while")]
    #[case(Token::identifier(1, Rc::from(""), Token::END_OF_LINE), "   1  identifier \\n")]
    fn token_listing(#[case] token: Token, #[case] expected: &str) {
        assert_eq!(describe_token(&token), expected);
    }
}
