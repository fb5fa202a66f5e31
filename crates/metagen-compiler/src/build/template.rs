//! Generic templates: a record pattern plus the instructions for filling
//! in each instantiation's arguments.

use metagen_abi::{FillOp, GlobalRef, MetadataField, MetadataTemplate, RuntimeFn, TemplateHeader};
use metagen_core::{DeclId, DeclKind};

use super::RecordBuilder;
use super::fill::{DependentWitnessInit, FillRoutine};
use crate::layout::{LayoutMode, LayoutOrder, LayoutVisitor, template_arguments};
use crate::{EmitError, ModuleCtx};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltTemplate {
    pub template: MetadataTemplate,
    pub fill: FillRoutine,
}

/// Forwards every slot to the record builder and assigns each generic
/// requirement slot the next argument buffer index.
struct TemplateBuilder<'a> {
    inner: RecordBuilder<'a>,
    fill_ops: Vec<FillOp>,
    value_witnesses: Option<usize>,
    dependent_vwt: Option<usize>,
}

impl LayoutVisitor for TemplateBuilder<'_> {
    type Error = EmitError;

    fn field(&mut self, slot: usize, field: MetadataField) -> Result<(), EmitError> {
        self.inner.field(slot, field)?;
        match field {
            _ if field.is_generic_requirement() => self.fill_ops.push(FillOp {
                from: self.fill_ops.len() as u32,
                to: slot as u32,
            }),
            MetadataField::ValueWitnessTable => self.value_witnesses = Some(slot),
            MetadataField::DependentValueWitnessTable => self.dependent_vwt = Some(slot),
            _ => {}
        }
        Ok(())
    }

    fn address_point(&mut self, slot: usize) -> Result<(), EmitError> {
        self.inner.address_point(slot)
    }
}

/// Build the template and fill routine of a generic declaration.
pub fn build_template(cx: &ModuleCtx, decl: DeclId) -> Result<BuiltTemplate, EmitError> {
    let d = cx.program.decl(decl);
    let name = cx.program.decl_name(decl);
    if d.foreign {
        return Err(EmitError::ForeignDeclaration(name.to_owned()));
    }
    if !cx.program.is_generic(decl) {
        return Err(EmitError::NotGeneric(name.to_owned()));
    }

    let order = LayoutOrder::with_mode(cx, decl, LayoutMode::Template);
    let mut builder = TemplateBuilder {
        inner: RecordBuilder::new(cx, decl),
        fill_ops: Vec::new(),
        value_witnesses: None,
        dependent_vwt: None,
    };
    let placement = order.walk(&mut builder)?;
    let TemplateBuilder {
        inner,
        fill_ops,
        value_witnesses,
        dependent_vwt,
    } = builder;
    debug_assert_eq!(
        fill_ops.len(),
        template_arguments(cx.program, decl).len(),
        "argument buffer disagrees with the template's requirement slots"
    );

    let word = cx.word().bytes();
    let header = TemplateHeader::new(
        GlobalRef::FillFunction(decl),
        placement.slot_count * word,
        fill_ops.len(),
        placement.address_point * word,
    )?;
    let record = inner.finish(&order, true);

    let dependent = match (dependent_vwt, value_witnesses) {
        (Some(table_slot), Some(vwt_slot)) => Some(DependentWitnessInit {
            table_slot,
            vwt_slot,
            initializer: match d.kind {
                DeclKind::Enum => RuntimeFn::InitEnumValueWitnessTable,
                _ => RuntimeFn::InitStructValueWitnessTable,
            },
        }),
        _ => None,
    };

    tracing::debug!(
        decl = name,
        slots = placement.slot_count,
        arguments = fill_ops.len(),
        dependent_witnesses = dependent.is_some(),
        "built metadata template"
    );

    Ok(BuiltTemplate {
        fill: FillRoutine {
            decl,
            ops: fill_ops.clone(),
            address_point: placement.address_point,
            dependent_vwt: dependent,
        },
        template: MetadataTemplate {
            header,
            record,
            fill_ops,
            dependent_vwt,
        },
    })
}
