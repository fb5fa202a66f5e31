//! ABI shape of types: how values are passed and whether their layout is
//! known without instantiation.
//!
//! Recursion through nominal fields is bounded; a type nested deeper than
//! [`MAX_DEPTH`] is conservatively treated as address-only with an unfixed
//! layout.

use metagen_core::{BuiltinType, DeclId, DeclKind, Program, Type};

use crate::TargetConfig;

pub const MAX_DEPTH: usize = 64;

/// Whether a value is being passed as an exploded set of scalars or in
/// memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Explosion,
    Memory,
}

#[derive(Clone, Copy, Debug)]
pub struct TypeLowering<'a> {
    program: &'a Program,
    config: &'a TargetConfig,
}

impl<'a> TypeLowering<'a> {
    pub fn new(program: &'a Program, config: &'a TargetConfig) -> Self {
        Self { program, config }
    }

    /// Class instances and class-bound archetypes: a single reference.
    pub fn is_class_type(&self, ty: &Type) -> bool {
        match ty {
            Type::Nominal(d) | Type::BoundGeneric { decl: d, .. } => {
                self.program.decl(*d).kind == DeclKind::Class
            }
            Type::Archetype(a) => self.program.archetype(*a).class_bound,
            _ => false,
        }
    }

    /// Values that cannot be moved as plain bits and must live in memory.
    pub fn is_address_only(&self, ty: &Type) -> bool {
        self.address_only_at(ty, 0)
    }

    fn address_only_at(&self, ty: &Type, depth: usize) -> bool {
        if depth > MAX_DEPTH {
            return true;
        }
        match ty {
            Type::Archetype(a) => !self.program.archetype(*a).class_bound,
            Type::Tuple(elements) => elements
                .iter()
                .any(|e| self.address_only_at(&e.ty, depth + 1)),
            Type::Nominal(d) => self.nominal_address_only(*d, &[], depth),
            Type::BoundGeneric { decl, args } => self.nominal_address_only(*decl, args, depth),
            Type::ProtocolComposition(_) => true,
            Type::LValue(object) => self.address_only_at(object, depth + 1),
            _ => false,
        }
    }

    fn nominal_address_only(&self, decl: DeclId, args: &[Type], depth: usize) -> bool {
        match self.program.decl(decl).kind {
            DeclKind::Class => false,
            DeclKind::Protocol => true,
            DeclKind::Struct | DeclKind::Enum => self
                .stored_types(decl, args)
                .iter()
                .any(|ty| self.address_only_at(ty, depth + 1)),
        }
    }

    /// Stored field types of a struct or payload types of an enum, with the
    /// instantiation's arguments substituted.
    pub fn stored_types(&self, decl: DeclId, args: &[Type]) -> Vec<Type> {
        let d = self.program.decl(decl);
        let subs = self.program.substitutions(decl, args);
        let raw = d
            .fields
            .iter()
            .map(|&f| &self.program.field(f).ty)
            .chain(d.cases.iter().filter_map(|c| c.payload.as_ref()));
        if subs.is_empty() {
            raw.cloned().collect()
        } else {
            raw.map(|ty| ty.substitute(&subs)).collect()
        }
    }

    /// Number of machine words a loadable value occupies when exploded.
    pub fn explosion_words(&self, ty: &Type) -> usize {
        self.words_at(ty, 0)
    }

    fn words_at(&self, ty: &Type, depth: usize) -> usize {
        if depth > MAX_DEPTH {
            return 1;
        }
        let word_bits = self.config.word().bits() as usize;
        match ty {
            Type::Builtin(BuiltinType::Int(bits)) => (*bits as usize).div_ceil(word_bits).max(1),
            Type::Builtin(_) => 1,
            Type::Function { .. } => 2,
            Type::Metatype(instance) => usize::from(!self.has_trivial_metatype(instance)),
            Type::Tuple(elements) => elements.iter().map(|e| self.words_at(&e.ty, depth + 1)).sum(),
            ty if self.is_class_type(ty) => 1,
            Type::Nominal(d) => self.nominal_words(*d, &[], depth),
            Type::BoundGeneric { decl, args } => self.nominal_words(*decl, args, depth),
            _ => 1,
        }
    }

    fn nominal_words(&self, decl: DeclId, args: &[Type], depth: usize) -> usize {
        let d = self.program.decl(decl);
        let stored = self.stored_types(decl, args);
        match d.kind {
            DeclKind::Struct => stored.iter().map(|ty| self.words_at(ty, depth + 1)).sum(),
            DeclKind::Enum => {
                let payload = stored
                    .iter()
                    .map(|ty| self.words_at(ty, depth + 1))
                    .max()
                    .unwrap_or(0);
                payload + 1
            }
            DeclKind::Class | DeclKind::Protocol => 1,
        }
    }

    /// A result the caller must allocate and pass a pointer to.
    pub fn requires_indirect_result(&self, ty: &Type) -> bool {
        self.is_address_only(ty)
            || self.explosion_words(ty) > self.config.direct_word_limit() as usize
    }

    /// Whether passing `overriding` where `overridden` is expected needs a
    /// thunk to change representation.
    pub fn differs_by_abstraction(
        &self,
        overridden: &Type,
        overriding: &Type,
        position: Position,
    ) -> bool {
        let overridden_indirect = self.is_address_only(overridden);
        let overriding_indirect = self.is_address_only(overriding);
        if overridden_indirect != overriding_indirect {
            return true;
        }
        match position {
            Position::Memory => false,
            Position::Explosion if overridden_indirect => false,
            Position::Explosion => {
                self.explosion_words(overridden) != self.explosion_words(overriding)
            }
        }
    }

    /// Whether the type's size and alignment are known without knowing its
    /// generic arguments.
    pub fn has_fixed_layout(&self, ty: &Type) -> bool {
        self.fixed_at(ty, 0)
    }

    fn fixed_at(&self, ty: &Type, depth: usize) -> bool {
        if depth > MAX_DEPTH {
            return false;
        }
        match ty {
            Type::Archetype(a) => self.program.archetype(*a).class_bound,
            Type::Tuple(elements) => elements.iter().all(|e| self.fixed_at(&e.ty, depth + 1)),
            Type::Nominal(d) => self.nominal_fixed(*d, &[], depth),
            Type::BoundGeneric { decl, args } => self.nominal_fixed(*decl, args, depth),
            _ => true,
        }
    }

    fn nominal_fixed(&self, decl: DeclId, args: &[Type], depth: usize) -> bool {
        match self.program.decl(decl).kind {
            DeclKind::Class | DeclKind::Protocol => true,
            DeclKind::Struct | DeclKind::Enum => self
                .stored_types(decl, args)
                .iter()
                .all(|ty| self.fixed_at(ty, depth + 1)),
        }
    }

    /// Generic value types whose stored layout depends on their arguments
    /// get a value-witness table computed at instantiation.
    pub fn has_dependent_value_witnesses(&self, decl: DeclId) -> bool {
        let d = self.program.decl(decl);
        if !matches!(d.kind, DeclKind::Struct | DeclKind::Enum) || d.generic_params.is_empty() {
            return false;
        }
        self.stored_types(decl, &[])
            .iter()
            .any(|ty| !self.has_fixed_layout(ty))
    }

    /// Metatypes whose value carries no information: the static type
    /// already determines it.
    pub fn has_trivial_metatype(&self, instance: &Type) -> bool {
        match instance {
            Type::Metatype(inner) => self.has_trivial_metatype(inner),
            Type::Archetype(_) | Type::ProtocolComposition(_) => false,
            Type::Nominal(d) | Type::BoundGeneric { decl: d, .. } => !matches!(
                self.program.decl(*d).kind,
                DeclKind::Class | DeclKind::Protocol
            ),
            _ => true,
        }
    }
}
