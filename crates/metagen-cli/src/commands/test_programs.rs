use indoc::indoc;

/// `Base` with two methods, `Derived` overriding one and adding another,
/// and a generic `Box`.
pub const HIERARCHY: &str = indoc! {r#"
    {
      "decls": [
        { "name": "Equatable", "kind": "protocol" },
        {
          "name": "Base",
          "kind": "class",
          "methods": [
            {
              "name": "f",
              "uncurry_level": 1,
              "type": {
                "kind": "function",
                "input": { "kind": "named", "name": "Base" },
                "result": {
                  "kind": "function",
                  "input": { "kind": "tuple" },
                  "result": { "kind": "int", "bits": 64 }
                }
              }
            },
            {
              "name": "g",
              "uncurry_level": 1,
              "type": {
                "kind": "function",
                "input": { "kind": "named", "name": "Base" },
                "result": {
                  "kind": "function",
                  "input": { "kind": "tuple" },
                  "result": { "kind": "tuple" }
                }
              }
            }
          ]
        },
        {
          "name": "Derived",
          "kind": "class",
          "superclass": { "kind": "named", "name": "Base" },
          "fields": [{ "name": "count", "type": { "kind": "int", "bits": 64 } }],
          "methods": [
            {
              "name": "f",
              "uncurry_level": 1,
              "overrides": "Base.f",
              "type": {
                "kind": "function",
                "input": { "kind": "named", "name": "Derived" },
                "result": {
                  "kind": "function",
                  "input": { "kind": "tuple" },
                  "result": { "kind": "int", "bits": 64 }
                }
              }
            },
            {
              "name": "h",
              "uncurry_level": 1,
              "type": {
                "kind": "function",
                "input": { "kind": "named", "name": "Derived" },
                "result": {
                  "kind": "function",
                  "input": { "kind": "tuple" },
                  "result": { "kind": "tuple" }
                }
              }
            }
          ]
        },
        {
          "name": "Box",
          "kind": "class",
          "generics": [{ "name": "T", "conforms_to": ["Equatable"] }],
          "fields": [{ "name": "value", "type": { "kind": "named", "name": "T" } }]
        },
        { "name": "Point", "kind": "struct" }
      ]
    }
"#};
