//! Fixture programs shared by the tests.

use metagen_core::{ArchetypeId, DeclId, MethodId, Program, Type};

use crate::{ModuleCtx, TargetConfig};

pub fn int() -> Type {
    Type::int(64)
}

/// `struct Point { x: Int64, y: Int64 }`
pub struct PointFixture {
    pub program: Program,
    pub point: DeclId,
}

pub fn point() -> PointFixture {
    let mut program = Program::new();
    let point = program.add_struct("Point");
    program.add_field(point, "x", int());
    program.add_field(point, "y", int());
    PointFixture { program, point }
}

/// `protocol Equatable; class Box<T: Equatable> { var value: T; func get() -> T }`
/// and `class IntBox: Box<Int64> { override func get() -> Int64 }`.
pub struct BoxFixture {
    pub program: Program,
    pub equatable: DeclId,
    pub boxed: DeclId,
    pub t: ArchetypeId,
    pub get: MethodId,
    pub int_box: DeclId,
    pub int_get: MethodId,
}

pub fn boxes() -> BoxFixture {
    let mut program = Program::new();
    let equatable = program.add_protocol("Equatable");
    let boxed = program.add_class("Box");
    let t = program.add_generic_param(boxed, "T", &[equatable]);
    program.add_field(boxed, "value", Type::Archetype(t));
    let box_ty = program.declared_type(boxed);
    let get = program.add_method(
        boxed,
        "get",
        Type::function(box_ty, Type::function(Type::unit(), Type::Archetype(t))),
        1,
    );

    let int_box = program.add_class("IntBox");
    program.set_superclass(
        int_box,
        Type::BoundGeneric {
            decl: boxed,
            args: vec![int()],
        },
    );
    let int_get = program.add_method(
        int_box,
        "get",
        Type::function(
            Type::Nominal(int_box),
            Type::function(Type::unit(), int()),
        ),
        1,
    );
    program.set_override(int_get, get);

    BoxFixture {
        program,
        equatable,
        boxed,
        t,
        get,
        int_box,
        int_get,
    }
}

/// [`boxes`] plus `class Sub<U: Equatable>: Box<U>`.
pub struct SubFixture {
    pub boxes: BoxFixture,
    pub sub: DeclId,
    pub u: ArchetypeId,
}

pub fn generic_subclass() -> SubFixture {
    let mut boxes = boxes();
    let sub = boxes.program.add_class("Sub");
    let u = boxes.program.add_generic_param(sub, "U", &[boxes.equatable]);
    boxes.program.set_superclass(
        sub,
        Type::BoundGeneric {
            decl: boxes.boxed,
            args: vec![Type::Archetype(u)],
        },
    );
    SubFixture { boxes, sub, u }
}

/// `class Base { func f(Int64) -> Int64; func g(Int64) -> Int64 }` and
/// `class Derived: Base { override func f(Int64) -> Int64 }`.
pub struct HierarchyFixture {
    pub program: Program,
    pub base: DeclId,
    pub derived: DeclId,
    pub base_f: MethodId,
    pub base_g: MethodId,
    pub derived_f: MethodId,
}

pub fn hierarchy() -> HierarchyFixture {
    let mut program = Program::new();
    let base = program.add_class("Base");
    let base_f = program.add_method(base, "f", method_ty(Type::Nominal(base), int(), int()), 1);
    let base_g = program.add_method(base, "g", method_ty(Type::Nominal(base), int(), int()), 1);

    let derived = program.add_class("Derived");
    program.set_superclass(derived, Type::Nominal(base));
    program.add_field(derived, "count", int());
    let derived_f = program.add_method(
        derived,
        "f",
        method_ty(Type::Nominal(derived), int(), int()),
        1,
    );
    program.set_override(derived_f, base_f);

    HierarchyFixture {
        program,
        base,
        derived,
        base_f,
        base_g,
        derived_f,
    }
}

/// `(Self) -> (input) -> result`
pub fn method_ty(self_ty: Type, input: Type, result: Type) -> Type {
    Type::function(self_ty, Type::function(input, result))
}

/// Run `f` with a module context over `program` and the default target.
pub fn with_cx<R>(program: &Program, f: impl FnOnce(&ModuleCtx) -> R) -> R {
    let config = TargetConfig::default();
    f(&ModuleCtx::new(program, &config))
}
