use std::path::PathBuf;

use metagen_compiler::overrides::find_overridden_function;
use metagen_compiler::{LocateTarget, ModuleCtx, locate, locate_bytes};
use metagen_core::{ArchetypeId, DeclId, DeclKind, Program};

use super::program_loader::{TargetOptions, load_or_exit, lookup_decl};

pub struct LocateArgs {
    pub program_path: PathBuf,
    pub decl: String,
    pub target_field: String,
    pub bytes: bool,
    pub target: TargetOptions,
}

pub fn run(args: LocateArgs) {
    let (program, config) = load_or_exit(&args.program_path, &args.target);
    let cx = ModuleCtx::new(&program, &config);

    let result = lookup_decl(&program, &args.decl).and_then(|decl| {
        let target = parse_target(&cx, decl, &args.target_field)?;
        let offset = if args.bytes {
            locate_bytes(&cx, decl, target)
        } else {
            locate(&cx, decl, target)
        };
        Ok((target, offset.map_err(|e| e.to_string())?))
    });
    let (target, offset) = match result {
        Ok(found) => found,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    if args.bytes {
        println!("{}: {:+} bytes", target.describe(&program), offset);
    } else {
        println!("{}: {:+}", target.describe(&program), offset);
    }
}

/// Parse `parent`, `vwt`, `arg:T`, `witness:T:P`, `field:NAME` or `method:NAME`.
///
/// Names are looked up in `decl` first and then in its superclasses. A
/// method resolves to the ancestor whose slot its virtual calls use.
pub fn parse_target(cx: &ModuleCtx, decl: DeclId, text: &str) -> Result<LocateTarget, String> {
    let program = cx.program;
    let mut parts = text.split(':');
    let head = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    let target = match (head, rest.as_slice()) {
        ("parent", []) => LocateTarget::Parent,
        ("vwt" | "value-witnesses", []) => LocateTarget::ValueWitnessTable,
        ("arg", [name]) => LocateTarget::GenericArgument(find_archetype(program, decl, name)?),
        ("witness", [name, protocol]) => {
            let archetype = find_archetype(program, decl, name)?;
            let protocol = program
                .lookup(protocol)
                .filter(|&p| program.decl(p).kind == DeclKind::Protocol)
                .ok_or_else(|| format!("no protocol named `{protocol}`"))?;
            LocateTarget::WitnessTable {
                archetype,
                protocol,
            }
        }
        ("field", [name]) => lineage(program, decl)
            .find_map(|d| program.lookup_field(d, name))
            .map(LocateTarget::FieldOffset)
            .ok_or_else(|| not_found(program, decl, "field", name))?,
        ("method", [name]) => lineage(program, decl)
            .find_map(|d| program.lookup_method(d, name))
            .map(|m| LocateTarget::Method(find_overridden_function(cx, m)))
            .ok_or_else(|| not_found(program, decl, "method", name))?,
        _ => {
            return Err(format!(
                "invalid target `{text}` (expected parent, vwt, arg:T, witness:T:P, field:NAME or method:NAME)"
            ));
        }
    };
    Ok(target)
}

/// `decl` and then its superclasses, most-derived first.
fn lineage(program: &Program, decl: DeclId) -> impl Iterator<Item = DeclId> {
    let chain = match program.decl(decl).kind {
        DeclKind::Class => program.class_chain(decl),
        _ => vec![decl],
    };
    chain.into_iter().rev()
}

fn find_archetype(program: &Program, decl: DeclId, name: &str) -> Result<ArchetypeId, String> {
    lineage(program, decl)
        .find_map(|d| program.lookup_archetype(d, name))
        .ok_or_else(|| not_found(program, decl, "generic parameter", name))
}

fn not_found(program: &Program, decl: DeclId, what: &str, name: &str) -> String {
    format!("`{}` has no {what} named `{name}`", program.decl_name(decl))
}
