//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the same definition can be
//! composed into several commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Program file (positional). `-` reads stdin.
pub fn program_path_arg() -> Arg {
    Arg::new("program_path")
        .value_name("PROGRAM")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Program JSON file, or - for stdin")
}

/// Declaration name (positional).
pub fn decl_arg() -> Arg {
    Arg::new("decl")
        .value_name("DECL")
        .required(true)
        .help("Declaration name")
}

/// Restrict output to one declaration (--decl).
pub fn decl_filter_arg() -> Arg {
    Arg::new("decl")
        .long("decl")
        .value_name("NAME")
        .help("Only show this declaration")
}

/// Field to locate (positional).
pub fn target_arg() -> Arg {
    Arg::new("target")
        .value_name("TARGET")
        .required(true)
        .help("parent, vwt, arg:T, witness:T:P, field:NAME or method:NAME")
}

/// Target configuration file (--config).
pub fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Target configuration JSON")
}

/// Word size override (--word-size).
pub fn word_size_arg() -> Arg {
    Arg::new("word_size")
        .long("word-size")
        .value_name("BYTES")
        .value_parser(value_parser!(u8))
        .help("Target word size in bytes (4 or 8)")
}

/// Enable foreign object runtime interop (--interop).
pub fn interop_arg() -> Arg {
    Arg::new("interop")
        .long("interop")
        .action(ArgAction::SetTrue)
        .help("Target has foreign object runtime interop")
}

/// Include lowered fill functions (--ir).
pub fn ir_arg() -> Arg {
    Arg::new("ir")
        .long("ir")
        .action(ArgAction::SetTrue)
        .help("Also print fill functions")
}

/// Report offsets in bytes (--bytes).
pub fn bytes_arg() -> Arg {
    Arg::new("bytes")
        .long("bytes")
        .action(ArgAction::SetTrue)
        .help("Print the offset in bytes instead of words")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}
