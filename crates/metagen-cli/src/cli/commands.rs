//! Command builders for the CLI.
//!
//! Every command loads a program and a target configuration, so the
//! target flags are shared.

use clap::Command;

use super::args::*;

/// Add the target configuration flags.
fn with_target_args(cmd: Command) -> Command {
    cmd.arg(config_arg())
        .arg(word_size_arg())
        .arg(interop_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("metagen")
        .about("Runtime type metadata layout, templates and vtables")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(dump_command())
        .subcommand(locate_command())
        .subcommand(vtable_command())
}

/// Show emitted metadata records and templates.
pub fn dump_command() -> Command {
    let cmd = Command::new("dump")
        .about("Show emitted metadata records and templates")
        .override_usage(
            "\
  metagen dump <PROGRAM>
  metagen dump <PROGRAM> --decl <NAME> [--ir]",
        )
        .after_help(
            r#"EXAMPLES:
  metagen dump program.json                 # every declaration
  metagen dump program.json --decl Box --ir # one template and its fill function
  metagen dump - --word-size 4 < prog.json  # 32-bit target from stdin"#,
        )
        .arg(program_path_arg())
        .arg(decl_filter_arg())
        .arg(ir_arg())
        .arg(color_arg());

    with_target_args(cmd)
}

/// Print the offset of one metadata field.
pub fn locate_command() -> Command {
    let cmd = Command::new("locate")
        .about("Print the offset of a metadata field from the address point")
        .override_usage("  metagen locate <PROGRAM> <DECL> <TARGET> [--bytes]")
        .after_help(
            r#"EXAMPLES:
  metagen locate program.json Point vwt            # 0
  metagen locate program.json Box arg:T            # generic argument slot
  metagen locate program.json Box witness:T:Equatable
  metagen locate program.json Derived method:f --bytes"#,
        )
        .arg(program_path_arg())
        .arg(decl_arg())
        .arg(target_arg())
        .arg(bytes_arg());

    with_target_args(cmd)
}

/// Show the vtable of a class.
pub fn vtable_command() -> Command {
    let cmd = Command::new("vtable")
        .about("Show the vtable slots and final overriders of a class")
        .override_usage("  metagen vtable <PROGRAM> <DECL>")
        .arg(program_path_arg())
        .arg(decl_arg())
        .arg(color_arg());

    with_target_args(cmd)
}
