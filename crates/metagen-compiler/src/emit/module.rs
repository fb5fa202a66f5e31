use metagen_abi::{MetadataRecord, MetadataTemplate, PendingRelocation, Relocation};
use metagen_core::{DeclId, DeclKind, Program};

use crate::build::{build_record, build_template};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::ir::Function;
use crate::{ModuleCtx, TargetConfig};

/// A pending relocation together with the record it patches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModulePending {
    pub decl: DeclId,
    pub relocation: PendingRelocation,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmittedModule {
    pub records: Vec<MetadataRecord>,
    pub templates: Vec<MetadataTemplate>,
    pub fill_functions: Vec<Function>,
    /// Slots to patch before the module's metadata is used.
    pub pending: Vec<ModulePending>,
    /// Native classes registered with the foreign runtime on load.
    pub class_list: Vec<DeclId>,
}

impl EmittedModule {
    pub fn record(&self, decl: DeclId) -> Option<&MetadataRecord> {
        self.records.iter().find(|r| r.decl == decl)
    }

    pub fn template(&self, decl: DeclId) -> Option<&MetadataTemplate> {
        self.templates.iter().find(|t| t.decl() == decl)
    }

    /// Fill functions are emitted in template order.
    pub fn fill_function(&self, decl: DeclId) -> Option<&Function> {
        let index = self.templates.iter().position(|t| t.decl() == decl)?;
        self.fill_functions.get(index)
    }

    /// Every link-time address in the module, per declaration.
    pub fn relocations(&self, cx: &ModuleCtx) -> Vec<(DeclId, Vec<Relocation>)> {
        let word = cx.word();
        let records = self
            .records
            .iter()
            .map(|r| (r.decl, r.relocations(word, 0)));
        let templates = self
            .templates
            .iter()
            .map(|t| (t.decl(), t.relocations(word)));
        records.chain(templates).collect()
    }
}

/// Emit metadata for every declaration of `program`.
#[tracing::instrument(skip_all, fields(decls = program.decl_count()))]
pub fn emit_module(program: &Program, config: &TargetConfig) -> (EmittedModule, Diagnostics) {
    let cx = ModuleCtx::new(program, config);
    let mut module = EmittedModule::default();
    let mut diagnostics = Diagnostics::new();

    for (decl, d) in program.decls() {
        if d.foreign {
            continue;
        }
        if program.is_generic(decl) {
            match build_template(&cx, decl) {
                Ok(built) => {
                    collect_pending(&mut module, decl, &built.template.record);
                    module.fill_functions.push(built.fill.lower(&cx));
                    module.templates.push(built.template);
                }
                Err(err) => {
                    tracing::warn!(decl = program.decl_name(decl), "{err}");
                    diagnostics.push(Diagnostic::emission(decl, &err));
                }
            }
            continue;
        }
        match build_record(&cx, decl) {
            Ok(record) => {
                collect_pending(&mut module, decl, &record);
                if d.kind == DeclKind::Class && config.has_interop() {
                    module.class_list.push(decl);
                }
                module.records.push(record);
            }
            Err(err) => {
                tracing::warn!(decl = program.decl_name(decl), "{err}");
                diagnostics.push(Diagnostic::emission(decl, &err));
            }
        }
    }

    tracing::debug!(
        records = module.records.len(),
        templates = module.templates.len(),
        pending = module.pending.len(),
        errors = diagnostics.error_count(),
        "emitted module"
    );
    (module, diagnostics)
}

fn collect_pending(module: &mut EmittedModule, decl: DeclId, record: &MetadataRecord) {
    module
        .pending
        .extend(record.pending.iter().cloned().map(|relocation| ModulePending {
            decl,
            relocation,
        }));
}
