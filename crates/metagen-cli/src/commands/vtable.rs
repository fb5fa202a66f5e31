use std::path::PathBuf;

use metagen_abi::GlobalRef;
use metagen_compiler::overrides::{final_overriders, requires_new_slot};
use metagen_compiler::{EmitError, LocateTarget, ModuleCtx, locate};
use metagen_core::{Colors, DeclId, DeclKind, MethodId};

use super::program_loader::{TargetOptions, load_or_exit, lookup_decl};

pub struct VtableArgs {
    pub program_path: PathBuf,
    pub decl: String,
    pub target: TargetOptions,
    pub color: bool,
}

pub fn run(args: VtableArgs) {
    let (program, config) = load_or_exit(&args.program_path, &args.target);
    let cx = ModuleCtx::new(&program, &config);

    let class = match lookup_decl(&program, &args.decl) {
        Ok(decl) if program.decl(decl).kind == DeclKind::Class => decl,
        Ok(_) => {
            eprintln!("error: `{}` is not a class", args.decl);
            std::process::exit(1);
        }
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    match vtable_slots(&cx, class) {
        Ok(slots) => print!("{}", render(&cx, class, &slots, Colors::new(args.color))),
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    }
}

/// One vtable entry: its offset, the method that introduced the slot and
/// the implementation the class installs there.
#[derive(Debug, PartialEq, Eq)]
pub struct VtableSlot {
    pub offset: i64,
    pub introduced: MethodId,
    pub implementation: MethodId,
}

pub fn vtable_slots(cx: &ModuleCtx, class: DeclId) -> Result<Vec<VtableSlot>, EmitError> {
    let mut slots = Vec::new();
    for (introduced, implementation) in final_overriders(cx, class) {
        if !requires_new_slot(cx, introduced) {
            continue;
        }
        let offset = locate(cx, class, LocateTarget::Method(introduced))?;
        slots.push(VtableSlot {
            offset,
            introduced,
            implementation,
        });
    }
    slots.sort_by_key(|slot| slot.offset);
    Ok(slots)
}

fn render(cx: &ModuleCtx, class: DeclId, slots: &[VtableSlot], colors: Colors) -> String {
    let program = cx.program;
    let c = colors;
    let mut out = format!(
        "class {}{}{} vtable {}({} slots){}\n",
        c.blue,
        program.decl_name(class),
        c.reset,
        c.dim,
        slots.len(),
        c.reset
    );
    for slot in slots {
        let introduced = GlobalRef::Method(slot.introduced);
        let implementation = GlobalRef::Method(slot.implementation);
        out.push_str(&format!(
            "{}{:>5}{}  {:<24}{}{}{}\n",
            c.dim,
            slot.offset,
            c.reset,
            introduced.display(program).to_string(),
            c.green,
            implementation.display(program),
            c.reset,
        ));
    }
    out
}
