//! JSON program format and its resolution into a [`Program`].
//!
//! The raw structs mirror the file 1:1 and refer to everything by name.
//! [`Program::from_raw`] resolves names in passes so declarations may refer
//! to each other in any order.

use serde::Deserialize;

use crate::{DeclId, DeclKind, Program, TupleElement, Type};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid program: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate declaration `{0}`")]
    DuplicateDecl(String),

    #[error("unknown type `{name}` (referenced from `{context}`)")]
    UnknownType { name: String, context: String },

    #[error("`{name}` is not a protocol (referenced from `{context}`)")]
    NotAProtocol { name: String, context: String },

    #[error("superclass of `{0}` is not a class")]
    BadSuperclass(String),

    #[error("inheritance cycle through `{0}`")]
    InheritanceCycle(String),

    #[error("unknown overridden method `{name}` (overridden by `{context}`)")]
    UnknownMethod { name: String, context: String },

    #[error("`{name}` expects {expected} generic arguments, found {found}")]
    GenericArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawProgram {
    #[serde(default)]
    pub decls: Vec<RawDecl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawDeclKind {
    Class,
    Struct,
    Enum,
    Protocol,
}

impl From<RawDeclKind> for DeclKind {
    fn from(kind: RawDeclKind) -> Self {
        match kind {
            RawDeclKind::Class => DeclKind::Class,
            RawDeclKind::Struct => DeclKind::Struct,
            RawDeclKind::Enum => DeclKind::Enum,
            RawDeclKind::Protocol => DeclKind::Protocol,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDecl {
    pub name: String,
    pub kind: RawDeclKind,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub generics: Vec<RawGenericParam>,
    #[serde(default)]
    pub superclass: Option<RawType>,
    #[serde(default)]
    pub fields: Vec<RawField>,
    #[serde(default)]
    pub cases: Vec<RawCase>,
    #[serde(default)]
    pub methods: Vec<RawMethod>,
    #[serde(default)]
    pub foreign: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawGenericParam {
    pub name: String,
    #[serde(default)]
    pub conforms_to: Vec<String>,
    #[serde(default)]
    pub class_bound: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: RawType,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCase {
    pub name: String,
    #[serde(default)]
    pub payload: Option<RawType>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawMethod {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: RawType,
    #[serde(default)]
    pub uncurry_level: u32,
    /// `Class.method` of the overridden declaration.
    #[serde(default)]
    pub overrides: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTupleElement {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub ty: RawType,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawType {
    Int {
        bits: u16,
    },
    Float {
        bits: u16,
    },
    RawPointer,
    NativeObject,
    /// Nominal type or generic parameter in scope.
    Named {
        name: String,
        #[serde(default)]
        args: Vec<RawType>,
    },
    Tuple {
        #[serde(default)]
        elements: Vec<RawTupleElement>,
    },
    Function {
        input: Box<RawType>,
        result: Box<RawType>,
    },
    Metatype {
        instance: Box<RawType>,
    },
    Module {
        name: String,
    },
    Array {
        element: Box<RawType>,
        len: u64,
    },
    DependentMember {
        base: Box<RawType>,
        member: String,
    },
    Composition {
        protocols: Vec<String>,
    },
    GenericParam {
        depth: u32,
        index: u32,
    },
    Lvalue {
        object: Box<RawType>,
    },
}

/// Parse the JSON program format without resolving names.
pub fn parse_program(json: &str) -> Result<RawProgram, serde_json::Error> {
    serde_json::from_str(json)
}

impl Program {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let raw = parse_program(json)?;
        Self::from_raw(&raw)
    }

    pub fn from_raw(raw: &RawProgram) -> Result<Self, LoadError> {
        let mut program = Program::new();

        let mut ids = Vec::with_capacity(raw.decls.len());
        for decl in &raw.decls {
            if program.lookup(&decl.name).is_some() {
                return Err(LoadError::DuplicateDecl(decl.name.clone()));
            }
            let id = program.add_decl(decl.kind.into(), &decl.name);
            program.set_foreign(id, decl.foreign);
            ids.push(id);
        }

        for (decl, &id) in raw.decls.iter().zip(&ids) {
            if let Some(parent) = &decl.parent {
                let parent = program.lookup(parent).ok_or_else(|| LoadError::UnknownType {
                    name: parent.clone(),
                    context: decl.name.clone(),
                })?;
                program.set_parent(id, parent);
            }
        }

        for (decl, &id) in raw.decls.iter().zip(&ids) {
            for param in &decl.generics {
                let mut conforms_to = Vec::with_capacity(param.conforms_to.len());
                for name in &param.conforms_to {
                    conforms_to.push(resolve_protocol(&program, name, &decl.name)?);
                }
                let archetype = program.add_generic_param(id, &param.name, &conforms_to);
                program.set_class_bound(archetype, param.class_bound);
            }
        }

        for (decl, &id) in raw.decls.iter().zip(&ids) {
            if let Some(superclass) = &decl.superclass {
                let ty = resolve_type(&mut program, superclass, id)?;
                let is_class = ty
                    .nominal_decl()
                    .is_some_and(|d| program.decl(d).kind == DeclKind::Class);
                if decl.kind != RawDeclKind::Class || !is_class {
                    return Err(LoadError::BadSuperclass(decl.name.clone()));
                }
                program.set_superclass(id, ty);
            }
            for field in &decl.fields {
                let ty = resolve_type(&mut program, &field.ty, id)?;
                program.add_field(id, &field.name, ty);
            }
            for case in &decl.cases {
                let payload = match &case.payload {
                    Some(raw) => Some(resolve_type(&mut program, raw, id)?),
                    None => None,
                };
                program.add_case(id, &case.name, payload);
            }
            for method in &decl.methods {
                let ty = resolve_type(&mut program, &method.ty, id)?;
                program.add_method(id, &method.name, ty, method.uncurry_level);
            }
        }

        for (decl, &id) in raw.decls.iter().zip(&ids) {
            for (index, method) in decl.methods.iter().enumerate() {
                let Some(target) = &method.overrides else {
                    continue;
                };
                let context = format!("{}.{}", decl.name, method.name);
                let overridden = resolve_method(&program, target).ok_or_else(|| {
                    LoadError::UnknownMethod {
                        name: target.clone(),
                        context,
                    }
                })?;
                let this = program.decl(id).methods[index];
                program.set_override(this, overridden);
            }
        }

        for &id in &ids {
            check_acyclic(&program, id)?;
        }

        Ok(program)
    }
}

fn resolve_protocol(program: &Program, name: &str, context: &str) -> Result<DeclId, LoadError> {
    let id = program.lookup(name).ok_or_else(|| LoadError::UnknownType {
        name: name.to_owned(),
        context: context.to_owned(),
    })?;
    if program.decl(id).kind != DeclKind::Protocol {
        return Err(LoadError::NotAProtocol {
            name: name.to_owned(),
            context: context.to_owned(),
        });
    }
    Ok(id)
}

fn resolve_method(program: &Program, path: &str) -> Option<crate::MethodId> {
    let (class, method) = path.rsplit_once('.')?;
    let class = program.lookup(class)?;
    program.lookup_method(class, method)
}

/// Resolve a type written inside `scope`; generic parameters of `scope`
/// and its enclosing declarations are visible.
fn resolve_type(program: &mut Program, raw: &RawType, scope: DeclId) -> Result<Type, LoadError> {
    let boxed = |program: &mut Program, raw: &RawType| -> Result<Box<Type>, LoadError> {
        resolve_type(program, raw, scope).map(Box::new)
    };

    let ty = match raw {
        RawType::Int { bits } => Type::int(*bits),
        RawType::Float { bits } => Type::Builtin(crate::BuiltinType::Float(*bits)),
        RawType::RawPointer => Type::Builtin(crate::BuiltinType::RawPointer),
        RawType::NativeObject => Type::Builtin(crate::BuiltinType::NativeObject),
        RawType::Named { name, args } => resolve_named(program, name, args, scope)?,
        RawType::Tuple { elements } => {
            let mut resolved = Vec::with_capacity(elements.len());
            for element in elements {
                let ty = resolve_type(program, &element.ty, scope)?;
                let label = element.label.as_deref().map(|l| program.intern(l));
                resolved.push(TupleElement { label, ty });
            }
            Type::Tuple(resolved)
        }
        RawType::Function { input, result } => Type::Function {
            input: boxed(program, input)?,
            result: boxed(program, result)?,
        },
        RawType::Metatype { instance } => Type::Metatype(boxed(program, instance)?),
        RawType::Module { name } => Type::Module(program.intern(name)),
        RawType::Array { element, len } => Type::Array {
            element: boxed(program, element)?,
            len: *len,
        },
        RawType::DependentMember { base, member } => Type::DependentMember {
            base: boxed(program, base)?,
            member: program.intern(member),
        },
        RawType::Composition { protocols } => {
            let context = program.decl_name(scope).to_owned();
            let mut resolved = Vec::with_capacity(protocols.len());
            for name in protocols {
                resolved.push(resolve_protocol(program, name, &context)?);
            }
            Type::ProtocolComposition(resolved)
        }
        RawType::GenericParam { depth, index } => Type::GenericParam {
            depth: *depth,
            index: *index,
        },
        RawType::Lvalue { object } => Type::LValue(boxed(program, object)?),
    };
    Ok(ty)
}

fn resolve_named(
    program: &mut Program,
    name: &str,
    args: &[RawType],
    scope: DeclId,
) -> Result<Type, LoadError> {
    let mut context = Some(scope);
    while let Some(decl) = context {
        if let Some(archetype) = program.lookup_archetype(decl, name) {
            return Ok(Type::Archetype(archetype));
        }
        context = program.decl(decl).parent;
    }

    let decl = program.lookup(name).ok_or_else(|| LoadError::UnknownType {
        name: name.to_owned(),
        context: program.decl_name(scope).to_owned(),
    })?;

    let expected = program.decl(decl).generic_params.len();
    if expected != args.len() {
        return Err(LoadError::GenericArgumentCount {
            name: name.to_owned(),
            expected,
            found: args.len(),
        });
    }
    if args.is_empty() {
        return Ok(Type::Nominal(decl));
    }

    let mut resolved = Vec::with_capacity(args.len());
    for arg in args {
        resolved.push(resolve_type(program, arg, scope)?);
    }
    Ok(Type::BoundGeneric {
        decl,
        args: resolved,
    })
}

fn check_acyclic(program: &Program, class: DeclId) -> Result<(), LoadError> {
    let mut seen = vec![class];
    let mut current = class;
    while let Some(superclass) = program.superclass_decl(current) {
        if seen.contains(&superclass) {
            return Err(LoadError::InheritanceCycle(
                program.decl_name(class).to_owned(),
            ));
        }
        seen.push(superclass);
        current = superclass;
    }
    Ok(())
}
