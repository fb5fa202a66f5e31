//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! This module contains:
//! - `*Params` structs populated from clap matches
//! - `from_matches()` extractors
//! - `Into<*Args>` impls bridging dispatch to command handlers

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::dump::DumpArgs;
use crate::commands::locate::LocateArgs;
use crate::commands::program_loader::TargetOptions;
use crate::commands::vtable::VtableArgs;

/// Target flags shared by every command.
#[derive(Debug, PartialEq, Eq)]
pub struct TargetParams {
    pub config_path: Option<PathBuf>,
    pub word_size: Option<u8>,
    pub interop: bool,
}

impl TargetParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            config_path: m.get_one::<PathBuf>("config").cloned(),
            word_size: m.get_one::<u8>("word_size").copied(),
            interop: m.get_flag("interop"),
        }
    }
}

impl From<TargetParams> for TargetOptions {
    fn from(p: TargetParams) -> Self {
        Self {
            config_path: p.config_path,
            word_size: p.word_size,
            interop: p.interop,
        }
    }
}

pub struct DumpParams {
    pub program_path: PathBuf,
    pub decl: Option<String>,
    pub ir: bool,
    pub target: TargetParams,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program_path: program_path(m),
            decl: m.get_one::<String>("decl").cloned(),
            ir: m.get_flag("ir"),
            target: TargetParams::from_matches(m),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            program_path: p.program_path,
            decl: p.decl,
            ir: p.ir,
            target: p.target.into(),
            color: p.color.should_colorize(),
        }
    }
}

pub struct LocateParams {
    pub program_path: PathBuf,
    pub decl: String,
    pub target_field: String,
    pub bytes: bool,
    pub target: TargetParams,
}

impl LocateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program_path: program_path(m),
            decl: required_string(m, "decl"),
            target_field: required_string(m, "target"),
            bytes: m.get_flag("bytes"),
            target: TargetParams::from_matches(m),
        }
    }
}

impl From<LocateParams> for LocateArgs {
    fn from(p: LocateParams) -> Self {
        Self {
            program_path: p.program_path,
            decl: p.decl,
            target_field: p.target_field,
            bytes: p.bytes,
            target: p.target.into(),
        }
    }
}

pub struct VtableParams {
    pub program_path: PathBuf,
    pub decl: String,
    pub target: TargetParams,
    pub color: ColorChoice,
}

impl VtableParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program_path: program_path(m),
            decl: required_string(m, "decl"),
            target: TargetParams::from_matches(m),
            color: parse_color(m),
        }
    }
}

impl From<VtableParams> for VtableArgs {
    fn from(p: VtableParams) -> Self {
        Self {
            program_path: p.program_path,
            decl: p.decl,
            target: p.target.into(),
            color: p.color.should_colorize(),
        }
    }
}

// Required positionals are enforced by clap before dispatch.
fn program_path(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("program_path")
        .cloned()
        .unwrap_or_default()
}

fn required_string(m: &ArgMatches, id: &str) -> String {
    m.get_one::<String>(id).cloned().unwrap_or_default()
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
