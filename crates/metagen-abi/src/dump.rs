//! Human-readable record dump for debugging and tests.
//!
//! One line per slot with its offset from the address point; the address
//! point itself is marked with `>`. Templates add a header line and their
//! fill operations.

use std::fmt::Write as _;

use metagen_core::{Colors, Program};

use crate::{MetadataRecord, MetadataTemplate, WordSize};

const ROLE_WIDTH: usize = 24;

pub fn dump_record(program: &Program, record: &MetadataRecord, colors: Colors) -> String {
    let mut out = String::new();
    let c = colors;
    writeln!(
        out,
        "{} {}{}{} {}({} slots, address point {}){}",
        record.kind.name(),
        c.blue,
        program.decl_name(record.decl),
        c.reset,
        c.dim,
        record.len(),
        record.address_point,
        c.reset,
    )
    .unwrap();
    dump_body(&mut out, program, record, colors);
    out
}

pub fn dump_template(
    program: &Program,
    template: &MetadataTemplate,
    word: WordSize,
    colors: Colors,
) -> String {
    let mut out = String::new();
    let c = colors;
    let record = &template.record;
    let header = &template.header;
    writeln!(
        out,
        "{} {}{}{} template {}(size {}, args {}, address point {}, header {} bytes){}",
        record.kind.name(),
        c.blue,
        program.decl_name(record.decl),
        c.reset,
        c.dim,
        header.size,
        header.num_arguments,
        header.address_point,
        crate::TemplateHeader::encoded_len(word),
        c.reset,
    )
    .unwrap();
    dump_body(&mut out, program, record, colors);
    for op in &template.fill_ops {
        writeln!(out, "  fill args[{}] -> slot {}", op.from, op.to).unwrap();
    }
    if let Some(slot) = template.dependent_vwt {
        writeln!(out, "  dependent witnesses at slot {slot}").unwrap();
    }
    out
}

fn dump_body(out: &mut String, program: &Program, record: &MetadataRecord, colors: Colors) {
    let c = colors;
    for (i, slot) in record.slots.iter().enumerate() {
        let marker = if i == record.address_point { '>' } else { ' ' };
        let role = slot.field.describe(program);
        writeln!(
            out,
            "{marker}{}{:>5}{}  {:<width$}{}{}{}",
            c.dim,
            record.offset_of(i),
            c.reset,
            role,
            c.green,
            slot.value.display(program),
            c.reset,
            width = ROLE_WIDTH,
        )
        .unwrap();
    }
    for pending in &record.pending {
        write!(
            out,
            "  pending slot {}: {}",
            pending.slot,
            program.display(&pending.target)
        )
        .unwrap();
        match pending.protocol {
            Some(protocol) => writeln!(out, ": {}", program.decl_name(protocol)).unwrap(),
            None => writeln!(out).unwrap(),
        }
    }
    for entry in &record.vtable_offsets {
        writeln!(
            out,
            "  vtable {} at {:+}",
            crate::GlobalRef::Method(entry.method).display(program),
            entry.offset
        )
        .unwrap();
    }
}
