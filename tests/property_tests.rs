mod common;

use common::fixtures::{BARE_WP, EDITBOIL_ENT, MAINT_WP, NOTES_ENT, TOOLS_ENT};
use common::{builtin_engine, catalog_from, prepare};
use entsync::{Catalog, Declaration, DeclarationSet};

fn project_catalog() -> Catalog {
    catalog_from(&[("notes", NOTES_ENT), ("editboil", EDITBOIL_ENT), ("tools", TOOLS_ENT)])
}

#[test]
fn test_rewrite_is_idempotent() {
    let engine = builtin_engine();
    let catalog = project_catalog();

    for original in [MAINT_WP, BARE_WP] {
        let once = prepare(&engine, original, &catalog);
        let twice = prepare(&engine, &once.output, &catalog);
        assert_eq!(twice.output, once.output);
        assert!(!twice.changed);
    }
}

#[test]
fn test_declaration_order_ignores_discovery_order() {
    let declarations = vec![
        Declaration::new("\t<!ENTITY ZZ-9 SYSTEM \"../graphics-SVG/ZZ-9.svg\" NDATA svg>"),
        Declaration::new("\t<!ENTITY % tools PUBLIC \"T\" \"../entities/tools.ent\"> %tools;"),
        Declaration::new("\t<!ENTITY AA-1 SYSTEM \"../graphics-SVG/AA-1.svg\" NDATA svg>"),
        Declaration::new("\t<!ENTITY % notes PUBLIC \"N\" \"../entities/notes.ent\"> %notes;"),
    ];
    let mut reversed = declarations.clone();
    reversed.reverse();

    let forward = DeclarationSet::build(declarations[..2].to_vec(), declarations[2..].to_vec());
    let backward = DeclarationSet::build(reversed[..2].to_vec(), reversed[2..].to_vec());
    assert_eq!(forward.to_lines(), backward.to_lines());
}

#[test]
fn test_catalog_order_does_not_change_output() {
    let engine = builtin_engine();
    let forward = project_catalog();
    let backward = catalog_from(&[("tools", TOOLS_ENT), ("editboil", EDITBOIL_ENT), ("notes", NOTES_ENT)]);

    assert_eq!(
        prepare(&engine, MAINT_WP, &forward).output,
        prepare(&engine, MAINT_WP, &backward).output
    );
}

#[test]
fn test_repeated_reference_declared_once() {
    let doc = prepare(
        &builtin_engine(),
        "<descwp>\n<para>&safety_note_1;</para>\n<para>&safety_note_1; &safety_note_1;</para>\n</descwp>\n",
        &project_catalog(),
    );
    let notes: Vec<_> = doc
        .declarations
        .iter()
        .filter(|d| d.as_str().contains("%notes;"))
        .collect();
    assert_eq!(notes.len(), 1);
    assert_eq!(doc.declarations.len(), 1);
}

#[test]
fn test_body_without_doctype_is_preserved_verbatim() {
    let doc = prepare(&builtin_engine(), BARE_WP, &project_catalog());

    assert!(doc.output.starts_with(&doc.header));
    assert_eq!(&doc.output[doc.header.len()..], BARE_WP);
}

#[test]
fn test_crlf_body_is_preserved_verbatim() {
    let original = "<descwp>\r\n<para>&safety_note_2;</para>\r\n</descwp>\r\n";
    let doc = prepare(&builtin_engine(), original, &project_catalog());
    assert_eq!(&doc.output[doc.header.len()..], original);
}

#[test]
fn test_references_inside_old_subset_do_not_break_idempotence() {
    let engine = builtin_engine();
    let catalog = project_catalog();
    let original = "<?xml version=\"1.0\"?>\n\
                    <!DOCTYPE descwp PUBLIC \"-//OLD//EN\" \"old.dtd\" [\n\
                    <!ENTITY local \"see &safety_note_1;\">\n\
                    ]>\n\
                    <descwp>\n<para>No shared text here.</para>\n</descwp>\n";

    let once = prepare(&engine, original, &catalog);
    let twice = prepare(&engine, &once.output, &catalog);

    assert!(once.declarations.is_empty());
    assert_eq!(twice.output, once.output);
}

#[test]
fn test_multi_line_doctype_is_replaced_not_duplicated() {
    let engine = builtin_engine();
    let original = "<?xml version=\"1.0\"?>\n<!DOCTYPE descwp PUBLIC \"-//OLD//EN\"\n  \"old.dtd\">\n<descwp>\n<para>&safety_note_2;</para>\n</descwp>\n";

    let once = prepare(&engine, original, &project_catalog());
    assert_eq!(once.output.matches("<!DOCTYPE").count(), 1);
    assert!(once.output.ends_with("]>\n<descwp>\n<para>&safety_note_2;</para>\n</descwp>\n"));

    let twice = prepare(&engine, &once.output, &project_catalog());
    assert_eq!(twice.output, once.output);
}
