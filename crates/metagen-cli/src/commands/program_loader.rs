use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use metagen_abi::WordSize;
use metagen_compiler::TargetConfig;
use metagen_core::{DeclId, Program};

/// Target flags after dispatch. Flags override the configuration file.
#[derive(Debug, Default)]
pub struct TargetOptions {
    pub config_path: Option<PathBuf>,
    pub word_size: Option<u8>,
    pub interop: bool,
}

impl TargetOptions {
    pub fn resolve(&self) -> Result<TargetConfig, String> {
        let mut config = match &self.config_path {
            Some(path) => {
                let text = read_input(path)?;
                TargetConfig::from_json(&text)
                    .map_err(|e| format!("invalid config '{}': {}", path.display(), e))?
            }
            None => TargetConfig::new(),
        };
        if let Some(bytes) = self.word_size {
            let word = WordSize::try_from(bytes).map_err(|e| e.to_string())?;
            config = config.word_size(word);
        }
        if self.interop {
            config = config.interop(true);
        }
        Ok(config)
    }
}

pub fn load_program(path: &Path) -> Result<Program, String> {
    let text = read_input(path)?;
    Program::from_json(&text).map_err(|e| format!("{}: {}", path.display(), e))
}

pub fn lookup_decl(program: &Program, name: &str) -> Result<DeclId, String> {
    program
        .lookup(name)
        .ok_or_else(|| format!("no declaration named `{name}`"))
}

/// Load the program and target, or exit with an error message.
pub fn load_or_exit(path: &Path, target: &TargetOptions) -> (Program, TargetConfig) {
    let loaded = load_program(path).and_then(|program| Ok((program, target.resolve()?)));
    match loaded {
        Ok(loaded) => loaded,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    }
}

fn read_input(path: &Path) -> Result<String, String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {}", path.display(), e))
}
