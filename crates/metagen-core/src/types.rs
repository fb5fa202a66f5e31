//! Substituted compile-time types.
//!
//! Types are plain values: structurally equal types compare and hash equal,
//! which is what the per-function reference cache keys on.

use std::fmt;

use indexmap::IndexMap;

use crate::{ArchetypeId, DeclId, Program, Symbol};

/// Archetype-to-type bindings produced by a generic instantiation.
pub type SubstitutionMap = IndexMap<ArchetypeId, Type>;

/// Compiler-builtin scalar types.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BuiltinType {
    /// Integer of the given bit width.
    Int(u16),
    /// IEEE float of the given bit width.
    Float(u16),
    RawPointer,
    /// Reference-counted pointer to a native object.
    NativeObject,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TupleElement {
    pub label: Option<Symbol>,
    pub ty: Type,
}

impl TupleElement {
    pub fn unlabeled(ty: Type) -> Self {
        Self { label: None, ty }
    }

    pub fn labeled(label: Symbol, ty: Type) -> Self {
        Self {
            label: Some(label),
            ty,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Type {
    Builtin(BuiltinType),
    /// Non-generic nominal type.
    Nominal(DeclId),
    /// Generic nominal type applied to arguments, one per generic parameter.
    BoundGeneric {
        decl: DeclId,
        args: Vec<Type>,
    },
    Archetype(ArchetypeId),
    Tuple(Vec<TupleElement>),
    /// Single function level. Curried functions nest in `result`.
    Function {
        input: Box<Type>,
        result: Box<Type>,
    },
    Metatype(Box<Type>),
    GenericFunction {
        params: Vec<ArchetypeId>,
        input: Box<Type>,
        result: Box<Type>,
    },
    PolymorphicFunction {
        params: Vec<Symbol>,
        input: Box<Type>,
        result: Box<Type>,
    },
    Module(Symbol),
    Array {
        element: Box<Type>,
        len: u64,
    },
    DependentMember {
        base: Box<Type>,
        member: Symbol,
    },
    ProtocolComposition(Vec<DeclId>),
    GenericParam {
        depth: u32,
        index: u32,
    },
    LValue(Box<Type>),
}

impl Type {
    pub fn unit() -> Self {
        Type::Tuple(Vec::new())
    }

    pub fn int(bits: u16) -> Self {
        Type::Builtin(BuiltinType::Int(bits))
    }

    pub fn function(input: Type, result: Type) -> Self {
        Type::Function {
            input: Box::new(input),
            result: Box::new(result),
        }
    }

    pub fn metatype(instance: Type) -> Self {
        Type::Metatype(Box::new(instance))
    }

    /// Tuple without labels.
    pub fn tuple(elements: impl IntoIterator<Item = Type>) -> Self {
        Type::Tuple(elements.into_iter().map(TupleElement::unlabeled).collect())
    }

    /// Declaration of a nominal or bound generic type.
    pub fn nominal_decl(&self) -> Option<DeclId> {
        match self {
            Type::Nominal(decl) | Type::BoundGeneric { decl, .. } => Some(*decl),
            _ => None,
        }
    }

    pub fn contains_archetype(&self) -> bool {
        match self {
            Type::Archetype(_) => true,
            Type::BoundGeneric { args, .. } => args.iter().any(Type::contains_archetype),
            Type::Tuple(elements) => elements.iter().any(|e| e.ty.contains_archetype()),
            Type::Function { input, result }
            | Type::GenericFunction { input, result, .. }
            | Type::PolymorphicFunction { input, result, .. } => {
                input.contains_archetype() || result.contains_archetype()
            }
            Type::Metatype(inner) | Type::LValue(inner) => inner.contains_archetype(),
            Type::Array { element, .. } => element.contains_archetype(),
            Type::DependentMember { base, .. } => base.contains_archetype(),
            Type::Builtin(_)
            | Type::Nominal(_)
            | Type::Module(_)
            | Type::ProtocolComposition(_)
            | Type::GenericParam { .. } => false,
        }
    }

    /// Replace bound archetypes. Archetypes missing from `subs` are kept.
    pub fn substitute(&self, subs: &SubstitutionMap) -> Type {
        let boxed = |t: &Type| Box::new(t.substitute(subs));
        match self {
            Type::Archetype(id) => subs.get(id).cloned().unwrap_or_else(|| self.clone()),
            Type::BoundGeneric { decl, args } => Type::BoundGeneric {
                decl: *decl,
                args: args.iter().map(|a| a.substitute(subs)).collect(),
            },
            Type::Tuple(elements) => Type::Tuple(
                elements
                    .iter()
                    .map(|e| TupleElement {
                        label: e.label,
                        ty: e.ty.substitute(subs),
                    })
                    .collect(),
            ),
            Type::Function { input, result } => Type::Function {
                input: boxed(input),
                result: boxed(result),
            },
            Type::GenericFunction {
                params,
                input,
                result,
            } => Type::GenericFunction {
                params: params.clone(),
                input: boxed(input),
                result: boxed(result),
            },
            Type::PolymorphicFunction {
                params,
                input,
                result,
            } => Type::PolymorphicFunction {
                params: params.clone(),
                input: boxed(input),
                result: boxed(result),
            },
            Type::Metatype(inner) => Type::Metatype(boxed(inner)),
            Type::LValue(inner) => Type::LValue(boxed(inner)),
            Type::Array { element, len } => Type::Array {
                element: boxed(element),
                len: *len,
            },
            Type::DependentMember { base, member } => Type::DependentMember {
                base: boxed(base),
                member: *member,
            },
            Type::Builtin(_)
            | Type::Nominal(_)
            | Type::Module(_)
            | Type::ProtocolComposition(_)
            | Type::GenericParam { .. } => self.clone(),
        }
    }

    /// Short name of the type's shape, used in diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Type::Builtin(_) => "builtin",
            Type::Nominal(_) => "nominal",
            Type::BoundGeneric { .. } => "bound generic",
            Type::Archetype(_) => "archetype",
            Type::Tuple(_) => "tuple",
            Type::Function { .. } => "function",
            Type::Metatype(_) => "metatype",
            Type::GenericFunction { .. } => "generic function",
            Type::PolymorphicFunction { .. } => "polymorphic function",
            Type::Module(_) => "module",
            Type::Array { .. } => "array",
            Type::DependentMember { .. } => "dependent member",
            Type::ProtocolComposition(_) => "protocol composition",
            Type::GenericParam { .. } => "generic type parameter",
            Type::LValue(_) => "lvalue",
        }
    }
}

impl Program {
    /// Render a type with declaration names resolved.
    pub fn display<'a>(&'a self, ty: &'a Type) -> DisplayType<'a> {
        DisplayType { program: self, ty }
    }
}

pub struct DisplayType<'a> {
    program: &'a Program,
    ty: &'a Type,
}

impl DisplayType<'_> {
    fn nested<'b>(&'b self, ty: &'b Type) -> DisplayType<'b> {
        DisplayType {
            program: self.program,
            ty,
        }
    }

    fn write_list(&self, f: &mut fmt::Formatter<'_>, items: &[Type]) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", self.nested(item))?;
        }
        Ok(())
    }

    fn write_arrow(&self, f: &mut fmt::Formatter<'_>, input: &Type, result: &Type) -> fmt::Result {
        if matches!(input, Type::Function { .. }) {
            write!(f, "({}) -> {}", self.nested(input), self.nested(result))
        } else {
            write!(f, "{} -> {}", self.nested(input), self.nested(result))
        }
    }
}

impl fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.program;
        match self.ty {
            Type::Builtin(BuiltinType::Int(bits)) => write!(f, "Builtin.Int{bits}"),
            Type::Builtin(BuiltinType::Float(bits)) => write!(f, "Builtin.FPIEEE{bits}"),
            Type::Builtin(BuiltinType::RawPointer) => f.write_str("Builtin.RawPointer"),
            Type::Builtin(BuiltinType::NativeObject) => f.write_str("Builtin.NativeObject"),
            Type::Nominal(decl) => f.write_str(p.decl_name(*decl)),
            Type::BoundGeneric { decl, args } => {
                write!(f, "{}<", p.decl_name(*decl))?;
                self.write_list(f, args)?;
                f.write_str(">")
            }
            Type::Archetype(id) => f.write_str(p.resolve(p.archetype(*id).name)),
            Type::Tuple(elements) => {
                f.write_str("(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if let Some(label) = element.label {
                        write!(f, "{}: ", p.resolve(label))?;
                    }
                    write!(f, "{}", self.nested(&element.ty))?;
                }
                f.write_str(")")
            }
            Type::Function { input, result } => self.write_arrow(f, input, result),
            Type::Metatype(instance) => write!(f, "{}.Type", self.nested(instance)),
            Type::GenericFunction {
                params,
                input,
                result,
            } => {
                f.write_str("<")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(p.resolve(p.archetype(*param).name))?;
                }
                f.write_str("> ")?;
                self.write_arrow(f, input, result)
            }
            Type::PolymorphicFunction {
                params,
                input,
                result,
            } => {
                f.write_str("<")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(p.resolve(*param))?;
                }
                f.write_str("> ")?;
                self.write_arrow(f, input, result)
            }
            Type::Module(name) => write!(f, "module<{}>", p.resolve(*name)),
            Type::Array { element, len } => write!(f, "{}[{len}]", self.nested(element)),
            Type::DependentMember { base, member } => {
                write!(f, "{}.{}", self.nested(base), p.resolve(*member))
            }
            Type::ProtocolComposition(protocols) => {
                f.write_str("protocol<")?;
                for (i, protocol) in protocols.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(p.decl_name(*protocol))?;
                }
                f.write_str(">")
            }
            Type::GenericParam { depth, index } => write!(f, "τ_{depth}_{index}"),
            Type::LValue(object) => write!(f, "@lvalue {}", self.nested(object)),
        }
    }
}
