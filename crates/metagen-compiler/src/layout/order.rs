//! Slot orders per type kind.

use metagen_abi::MetadataField;
use metagen_core::{DeclId, DeclKind, Program, Type};

use super::{LayoutMode, LayoutStep};
use crate::ModuleCtx;
use crate::overrides::requires_new_slot;

use LayoutStep::{AddressPoint, Field};

pub(super) fn steps(cx: &ModuleCtx, decl: DeclId, mode: LayoutMode) -> Vec<LayoutStep> {
    let mut steps = match cx.program.decl(decl).kind {
        DeclKind::Class => class_steps(cx, decl),
        DeclKind::Struct | DeclKind::Enum => value_type_steps(cx.program, decl),
        DeclKind::Protocol => protocol_steps(),
    };
    if mode == LayoutMode::Template && cx.lowering().has_dependent_value_witnesses(decl) {
        steps.push(Field(MetadataField::DependentValueWitnessTable));
    }
    steps
}

fn class_steps(cx: &ModuleCtx, class: DeclId) -> Vec<LayoutStep> {
    let mut steps = vec![
        Field(MetadataField::Flags),
        Field(MetadataField::ValueWitnessTable),
        Field(MetadataField::Destructor),
        Field(MetadataField::Parent),
        Field(MetadataField::Superclass),
        AddressPoint,
    ];
    // Root first, so a subclass extends its superclass's layout.
    for c in cx.program.class_chain(class) {
        let decl = cx.program.decl(c);
        if decl.foreign {
            continue;
        }
        steps.extend(decl.fields.iter().map(|&f| Field(MetadataField::FieldOffset(f))));
        steps.extend(
            decl.methods
                .iter()
                .filter(|&&m| requires_new_slot(cx, m))
                .map(|&m| Field(MetadataField::Method(m))),
        );
        steps.extend(generic_requirements(cx.program, c).into_iter().map(Field));
    }
    steps
}

fn value_type_steps(program: &Program, decl: DeclId) -> Vec<LayoutStep> {
    let mut steps = vec![
        Field(MetadataField::Flags),
        Field(MetadataField::NominalTypeDescriptor),
        Field(MetadataField::Parent),
        AddressPoint,
        Field(MetadataField::ValueWitnessTable),
    ];
    steps.extend(generic_requirements(program, decl).into_iter().map(Field));
    steps
}

fn protocol_steps() -> Vec<LayoutStep> {
    vec![
        AddressPoint,
        Field(MetadataField::Flags),
        Field(MetadataField::ValueWitnessTable),
    ]
}

/// Generic requirement slots of one declaration: every argument in
/// declaration order, then every witness table, archetype-major.
///
/// [`template_arguments`] packs each declaration's requirements in this order.
pub fn generic_requirements(program: &Program, decl: DeclId) -> Vec<MetadataField> {
    let params = &program.decl(decl).generic_params;
    let arguments = params.iter().map(|&a| MetadataField::GenericArgument(a));
    let witnesses = params.iter().flat_map(|&archetype| {
        program
            .archetype(archetype)
            .conforms_to
            .iter()
            .filter(|&&protocol| program.requires_witness_table(protocol))
            .map(move |&protocol| MetadataField::GenericWitnessTable {
                archetype,
                protocol,
            })
    });
    arguments.chain(witnesses).collect()
}

/// One word of a template's instantiation argument buffer: the metadata of
/// `ty`, or its witness table for `protocol`. `ty` is written in terms of
/// the template's own archetypes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateArgument {
    pub ty: Type,
    pub protocol: Option<DeclId>,
}

/// The argument buffer of `decl`'s template: one entry per generic
/// requirement slot, in layout order.
///
/// A class template also fills its ancestors' requirement slots, each with
/// whatever the superclass chain binds that archetype to.
pub fn template_arguments(program: &Program, decl: DeclId) -> Vec<TemplateArgument> {
    let owners: Vec<DeclId> = match program.decl(decl).kind {
        DeclKind::Class => program
            .class_chain(decl)
            .into_iter()
            .filter(|&c| !program.decl(c).foreign)
            .collect(),
        _ => vec![decl],
    };
    let mut arguments = Vec::new();
    for owner in owners {
        let subs = program.ancestor_substitutions(decl, owner);
        for field in generic_requirements(program, owner) {
            let (archetype, protocol) = match field {
                MetadataField::GenericArgument(archetype) => (archetype, None),
                MetadataField::GenericWitnessTable {
                    archetype,
                    protocol,
                } => (archetype, Some(protocol)),
                _ => continue,
            };
            let ty = subs
                .get(&archetype)
                .cloned()
                .unwrap_or(Type::Archetype(archetype));
            arguments.push(TemplateArgument { ty, protocol });
        }
    }
    arguments
}
