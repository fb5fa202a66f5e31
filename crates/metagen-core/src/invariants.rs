//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{
    ArchetypeDecl, ArchetypeId, DeclId, FieldDecl, FieldId, MethodDecl, MethodId, NominalDecl,
    Program,
};

impl Program {
    pub(crate) fn ensure_decl(&self, id: DeclId) -> &NominalDecl {
        self.try_decl(id).unwrap_or_else(|| {
            panic!("Program: decl {id:?} not found (ids must come from the same program)")
        })
    }

    pub(crate) fn ensure_field(&self, id: FieldId) -> &FieldDecl {
        self.try_field(id).unwrap_or_else(|| {
            panic!("Program: field {id:?} not found (ids must come from the same program)")
        })
    }

    pub(crate) fn ensure_method(&self, id: MethodId) -> &MethodDecl {
        self.try_method(id).unwrap_or_else(|| {
            panic!("Program: method {id:?} not found (ids must come from the same program)")
        })
    }

    pub(crate) fn ensure_archetype(&self, id: ArchetypeId) -> &ArchetypeDecl {
        self.try_archetype(id).unwrap_or_else(|| {
            panic!("Program: archetype {id:?} not found (ids must come from the same program)")
        })
    }
}
