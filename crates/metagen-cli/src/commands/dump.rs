use std::path::PathBuf;

use metagen_abi::{dump_record, dump_template};
use metagen_compiler::{Diagnostics, emit_module};
use metagen_core::Colors;

use super::program_loader::{TargetOptions, load_or_exit, lookup_decl};

pub struct DumpArgs {
    pub program_path: PathBuf,
    pub decl: Option<String>,
    pub ir: bool,
    pub target: TargetOptions,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let (program, config) = load_or_exit(&args.program_path, &args.target);

    let only = match args.decl.as_deref().map(|name| lookup_decl(&program, name)) {
        None => None,
        Some(Ok(decl)) => Some(decl),
        Some(Err(msg)) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };
    if let Some(decl) = only
        && program.decl(decl).foreign
    {
        eprintln!(
            "error: `{}` is provided by the foreign runtime and has no native metadata",
            program.decl_name(decl)
        );
        std::process::exit(1);
    }

    let (module, diagnostics) = emit_module(&program, &config);
    let colors = Colors::new(args.color);

    let mut sections = Vec::new();
    for (decl, _) in program.decls() {
        if only.is_some_and(|only| only != decl) {
            continue;
        }
        if let Some(template) = module.template(decl) {
            let mut text = dump_template(&program, template, config.word(), colors);
            if args.ir
                && let Some(fill) = module.fill_function(decl)
            {
                text.push('\n');
                text.push_str(&fill.dump(&program));
            }
            sections.push(text);
        } else if let Some(record) = module.record(decl) {
            sections.push(dump_record(&program, record, colors));
        }
    }
    print!("{}", sections.join("\n"));

    if only.is_none() && !module.class_list.is_empty() {
        let names: Vec<&str> = module
            .class_list
            .iter()
            .map(|&c| program.decl_name(c))
            .collect();
        println!("\nclass list: {}", names.join(", "));
    }

    let mut shown = Diagnostics::new();
    shown.extend(
        diagnostics
            .into_iter()
            .filter(|d| only.is_none() || d.decl == only),
    );
    if !shown.is_empty() {
        eprint!("{}", shown.render(&program, Colors::new(args.color)));
    }
    if shown.has_errors() {
        std::process::exit(1);
    }
}
