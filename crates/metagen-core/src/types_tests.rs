use crate::{BuiltinType, Program, SubstitutionMap, TupleElement, Type};

#[test]
fn display_renders_names() {
    let mut p = Program::new();
    let opt = p.add_enum("Optional");
    let t = p.add_generic_param(opt, "T", &[]);
    let label = p.intern("x");

    let ty = Type::function(
        Type::Tuple(vec![
            TupleElement::labeled(label, Type::int(64)),
            TupleElement::unlabeled(Type::Archetype(t)),
        ]),
        Type::BoundGeneric {
            decl: opt,
            args: vec![Type::metatype(Type::Archetype(t))],
        },
    );

    assert_eq!(
        p.display(&ty).to_string(),
        "(x: Builtin.Int64, T) -> Optional<T.Type>"
    );
}

#[test]
fn display_parenthesizes_function_inputs() {
    let p = Program::new();
    let inner = Type::function(Type::unit(), Type::unit());
    let ty = Type::function(inner, Type::Builtin(BuiltinType::RawPointer));

    assert_eq!(p.display(&ty).to_string(), "(() -> ()) -> Builtin.RawPointer");
}

#[test]
fn substitute_replaces_bound_archetypes_only() {
    let mut p = Program::new();
    let s = p.add_struct("S");
    let t = p.add_generic_param(s, "T", &[]);
    let u = p.add_generic_param(s, "U", &[]);

    let mut subs = SubstitutionMap::new();
    subs.insert(t, Type::int(32));

    let ty = Type::tuple([Type::Archetype(t), Type::Archetype(u)]);
    assert_eq!(
        ty.substitute(&subs),
        Type::tuple([Type::int(32), Type::Archetype(u)])
    );
}

#[test]
fn contains_archetype_looks_through_structure() {
    let mut p = Program::new();
    let s = p.add_struct("S");
    let t = p.add_generic_param(s, "T", &[]);

    assert!(Type::metatype(Type::Archetype(t)).contains_archetype());
    assert!(Type::function(Type::unit(), Type::tuple([Type::Archetype(t)])).contains_archetype());
    assert!(!Type::function(Type::unit(), Type::int(8)).contains_archetype());
    assert!(!Type::Nominal(s).contains_archetype());
}

#[test]
fn structurally_equal_types_are_equal() {
    let a = Type::function(Type::int(64), Type::tuple([Type::int(8)]));
    let b = Type::function(Type::int(64), Type::tuple([Type::int(8)]));
    assert_eq!(a, b);
    assert_eq!(a.shape_name(), "function");
}
