//! Type-checked nominal declarations, stored in an id-indexed arena.

use indexmap::IndexMap;

use crate::{Interner, SubstitutionMap, Symbol, Type};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }
        }
    };
}

arena_id!(
    /// Nominal type declaration (class, struct, enum, protocol).
    DeclId
);
arena_id!(
    /// Stored property of a class or struct.
    FieldId
);
arena_id!(MethodId);
arena_id!(
    /// Generic parameter of a declaration, seen from inside its context.
    ArchetypeId
);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DeclKind {
    Class,
    Struct,
    Enum,
    Protocol,
}

impl DeclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Struct => "struct",
            DeclKind::Enum => "enum",
            DeclKind::Protocol => "protocol",
        }
    }
}

#[derive(Clone, Debug)]
pub struct NominalDecl {
    pub name: Symbol,
    pub kind: DeclKind,
    /// Enclosing nominal type, for nested declarations.
    pub parent: Option<DeclId>,
    pub generic_params: Vec<ArchetypeId>,
    pub superclass: Option<Type>,
    pub fields: Vec<FieldId>,
    pub cases: Vec<EnumCase>,
    pub methods: Vec<MethodId>,
    /// Provided by the foreign object runtime; has no native metadata.
    pub foreign: bool,
}

#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub name: Symbol,
    pub owner: DeclId,
    pub ty: Type,
}

#[derive(Clone, Debug)]
pub struct EnumCase {
    pub name: Symbol,
    pub payload: Option<Type>,
}

#[derive(Clone, Debug)]
pub struct MethodDecl {
    pub name: Symbol,
    pub owner: DeclId,
    /// Curried function type; `self` is the outermost parameter list.
    pub ty: Type,
    /// Number of parameter lists beyond the first that are passed together.
    pub uncurry_level: u32,
    pub overrides: Option<MethodId>,
}

#[derive(Clone, Debug)]
pub struct ArchetypeDecl {
    pub name: Symbol,
    pub owner: DeclId,
    /// Protocols the archetype conforms to, in requirement order.
    pub conforms_to: Vec<DeclId>,
    pub class_bound: bool,
}

/// Read-only declaration context handed to the metadata engine.
#[derive(Clone, Debug, Default)]
pub struct Program {
    interner: Interner,
    decls: Vec<NominalDecl>,
    fields: Vec<FieldDecl>,
    methods: Vec<MethodDecl>,
    archetypes: Vec<ArchetypeDecl>,
    by_name: IndexMap<Symbol, DeclId>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        self.interner.intern(name)
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn add_decl(&mut self, kind: DeclKind, name: &str) -> DeclId {
        let name = self.interner.intern(name);
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(NominalDecl {
            name,
            kind,
            parent: None,
            generic_params: Vec::new(),
            superclass: None,
            fields: Vec::new(),
            cases: Vec::new(),
            methods: Vec::new(),
            foreign: false,
        });
        self.by_name.entry(name).or_insert(id);
        id
    }

    pub fn add_class(&mut self, name: &str) -> DeclId {
        self.add_decl(DeclKind::Class, name)
    }

    pub fn add_struct(&mut self, name: &str) -> DeclId {
        self.add_decl(DeclKind::Struct, name)
    }

    pub fn add_enum(&mut self, name: &str) -> DeclId {
        self.add_decl(DeclKind::Enum, name)
    }

    pub fn add_protocol(&mut self, name: &str) -> DeclId {
        self.add_decl(DeclKind::Protocol, name)
    }

    pub fn set_parent(&mut self, decl: DeclId, parent: DeclId) {
        self.decl_mut(decl).parent = Some(parent);
    }

    pub fn set_superclass(&mut self, class: DeclId, superclass: Type) {
        self.decl_mut(class).superclass = Some(superclass);
    }

    pub fn set_foreign(&mut self, decl: DeclId, foreign: bool) {
        self.decl_mut(decl).foreign = foreign;
    }

    pub fn add_generic_param(
        &mut self,
        decl: DeclId,
        name: &str,
        conforms_to: &[DeclId],
    ) -> ArchetypeId {
        let name = self.interner.intern(name);
        let id = ArchetypeId(self.archetypes.len() as u32);
        self.archetypes.push(ArchetypeDecl {
            name,
            owner: decl,
            conforms_to: conforms_to.to_vec(),
            class_bound: false,
        });
        self.decl_mut(decl).generic_params.push(id);
        id
    }

    pub fn set_class_bound(&mut self, archetype: ArchetypeId, class_bound: bool) {
        self.archetypes[archetype.index()].class_bound = class_bound;
    }

    pub fn add_field(&mut self, decl: DeclId, name: &str, ty: Type) -> FieldId {
        let name = self.interner.intern(name);
        let id = FieldId(self.fields.len() as u32);
        self.fields.push(FieldDecl {
            name,
            owner: decl,
            ty,
        });
        self.decl_mut(decl).fields.push(id);
        id
    }

    pub fn add_case(&mut self, decl: DeclId, name: &str, payload: Option<Type>) {
        let name = self.interner.intern(name);
        self.decl_mut(decl).cases.push(EnumCase { name, payload });
    }

    pub fn add_method(
        &mut self,
        decl: DeclId,
        name: &str,
        ty: Type,
        uncurry_level: u32,
    ) -> MethodId {
        let name = self.interner.intern(name);
        let id = MethodId(self.methods.len() as u32);
        self.methods.push(MethodDecl {
            name,
            owner: decl,
            ty,
            uncurry_level,
            overrides: None,
        });
        self.decl_mut(decl).methods.push(id);
        id
    }

    pub fn set_override(&mut self, method: MethodId, overridden: MethodId) {
        self.methods[method.index()].overrides = Some(overridden);
    }

    fn decl_mut(&mut self, id: DeclId) -> &mut NominalDecl {
        &mut self.decls[id.index()]
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn decl(&self, id: DeclId) -> &NominalDecl {
        self.ensure_decl(id)
    }

    pub fn field(&self, id: FieldId) -> &FieldDecl {
        self.ensure_field(id)
    }

    pub fn method(&self, id: MethodId) -> &MethodDecl {
        self.ensure_method(id)
    }

    pub fn archetype(&self, id: ArchetypeId) -> &ArchetypeDecl {
        self.ensure_archetype(id)
    }

    pub(crate) fn try_decl(&self, id: DeclId) -> Option<&NominalDecl> {
        self.decls.get(id.index())
    }

    pub(crate) fn try_field(&self, id: FieldId) -> Option<&FieldDecl> {
        self.fields.get(id.index())
    }

    pub(crate) fn try_method(&self, id: MethodId) -> Option<&MethodDecl> {
        self.methods.get(id.index())
    }

    pub(crate) fn try_archetype(&self, id: ArchetypeId) -> Option<&ArchetypeDecl> {
        self.archetypes.get(id.index())
    }

    pub fn decl_name(&self, id: DeclId) -> &str {
        self.resolve(self.decl(id).name)
    }

    pub fn method_name(&self, id: MethodId) -> &str {
        self.resolve(self.method(id).name)
    }

    pub fn field_name(&self, id: FieldId) -> &str {
        self.resolve(self.field(id).name)
    }

    /// Declaration by name. The first declaration wins on duplicates.
    pub fn lookup(&self, name: &str) -> Option<DeclId> {
        let sym = self.interner.lookup(name)?;
        self.by_name.get(&sym).copied()
    }

    /// Method declared directly in `decl` with the given name.
    pub fn lookup_method(&self, decl: DeclId, name: &str) -> Option<MethodId> {
        let sym = self.interner.lookup(name)?;
        self.decl(decl)
            .methods
            .iter()
            .copied()
            .find(|&m| self.method(m).name == sym)
    }

    /// Stored field declared directly in `decl` with the given name.
    pub fn lookup_field(&self, decl: DeclId, name: &str) -> Option<FieldId> {
        let sym = self.interner.lookup(name)?;
        self.decl(decl)
            .fields
            .iter()
            .copied()
            .find(|&f| self.field(f).name == sym)
    }

    /// Generic parameter of `decl` with the given name.
    pub fn lookup_archetype(&self, decl: DeclId, name: &str) -> Option<ArchetypeId> {
        let sym = self.interner.lookup(name)?;
        self.decl(decl)
            .generic_params
            .iter()
            .copied()
            .find(|&a| self.archetype(a).name == sym)
    }

    pub fn decls(&self) -> impl Iterator<Item = (DeclId, &NominalDecl)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, d)| (DeclId(i as u32), d))
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    // ------------------------------------------------------------------
    // Derived queries
    // ------------------------------------------------------------------

    pub fn is_generic(&self, decl: DeclId) -> bool {
        !self.decl(decl).generic_params.is_empty()
    }

    /// The declaration's type as seen from inside it: archetypes as arguments.
    pub fn declared_type(&self, decl: DeclId) -> Type {
        let params = &self.decl(decl).generic_params;
        if params.is_empty() {
            Type::Nominal(decl)
        } else {
            Type::BoundGeneric {
                decl,
                args: params.iter().map(|&a| Type::Archetype(a)).collect(),
            }
        }
    }

    pub fn superclass_decl(&self, class: DeclId) -> Option<DeclId> {
        self.decl(class)
            .superclass
            .as_ref()
            .and_then(Type::nominal_decl)
    }

    /// Inheritance chain from the root class down to `class` inclusive.
    ///
    /// Stops early on a cycle; the loader rejects cyclic programs.
    pub fn class_chain(&self, class: DeclId) -> Vec<DeclId> {
        let mut chain = vec![class];
        let mut current = class;
        while let Some(superclass) = self.superclass_decl(current) {
            if chain.contains(&superclass) || chain.len() > self.decls.len() {
                break;
            }
            chain.push(superclass);
            current = superclass;
        }
        chain.reverse();
        chain
    }

    /// Whether the class or any ancestor is provided by the foreign runtime.
    pub fn has_foreign_ancestry(&self, class: DeclId) -> bool {
        self.class_chain(class)
            .iter()
            .any(|&c| self.decl(c).foreign)
    }

    /// Foreign protocols dispatch dynamically and carry no witness table.
    pub fn requires_witness_table(&self, protocol: DeclId) -> bool {
        let decl = self.decl(protocol);
        decl.kind == DeclKind::Protocol && !decl.foreign
    }

    /// Bindings of `decl`'s generic parameters for an instantiation.
    pub fn substitutions(&self, decl: DeclId, args: &[Type]) -> SubstitutionMap {
        self.decl(decl)
            .generic_params
            .iter()
            .copied()
            .zip(args.iter().cloned())
            .collect()
    }

    /// Substitutions that map an ancestor's archetypes into `class`'s context.
    ///
    /// Composes bound generic superclass arguments along the chain, so an
    /// archetype of a grandparent maps to whatever `class` passes for it.
    pub fn ancestor_substitutions(&self, class: DeclId, ancestor: DeclId) -> SubstitutionMap {
        let mut subs = SubstitutionMap::new();
        let mut current = class;
        while current != ancestor {
            let Some(superclass) = self.decl(current).superclass.as_ref() else {
                break;
            };
            let Some(next) = superclass.nominal_decl() else {
                break;
            };
            if let Type::BoundGeneric { args, .. } = superclass {
                let args: Vec<Type> = args.iter().map(|a| a.substitute(&subs)).collect();
                subs = self.substitutions(next, &args);
            } else {
                subs = SubstitutionMap::new();
            }
            current = next;
        }
        subs
    }

    /// The override chain of `method`, closest-derived first, excluding itself.
    pub fn override_chain(&self, method: MethodId) -> Vec<MethodId> {
        let mut chain = Vec::new();
        let mut current = self.method(method).overrides;
        while let Some(overridden) = current {
            if overridden == method || chain.contains(&overridden) {
                break;
            }
            chain.push(overridden);
            current = self.method(overridden).overrides;
        }
        chain
    }
}
