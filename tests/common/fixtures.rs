//! Reference files, documents and profiles shared across integration tests.

use entsync::{DeclarationRule, Profile};

pub const NOTES_ENT: &str = r#"<!-- shared notes -->
<!ENTITY safety_note_1 "<note>Wear eye protection.</note>">
<!ENTITY safety_note_2 "<note>Disconnect power.</note>">
"#;

pub const EDITBOIL_ENT: &str = r#"<!ENTITY  torque_values "<para>Torque to spec.</para>">
<!ENTITY % internal "ignored">
"#;

pub const TOOLS_ENT: &str = "<!ENTITY wrench_set \"<name>Wrench set</name>\">\n";

/// A maintenance work package with a stale subset, graphics and entity references.
pub const MAINT_WP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE maintwp PUBLIC "-//OLD//DTD//EN" "../dtd/old.dtd" [
	<!ENTITY stale SYSTEM "stale.svg" NDATA svg>
]>
<maintwp chngno="0" wpno="WP0001">
<title>Replace Pump</title>
<para>Refer to &safety_note_1; before starting.</para>
<graphic boardno="FO-1" />
<para>Use &wrench_set; and &torque_values;.</para>
<para>Again: &safety_note_1; &amp; more.</para>
<icon-set boardno="ICON-2"/>
</maintwp>
"#;

/// A work package with no prolog at all.
pub const BARE_WP: &str = "<descwp>\n<para>&safety_note_2;</para>\n<![CDATA[ raw ]]>\n</descwp>\n";

/// Built-in profile with its rule table replaced by one `notes` rule.
pub fn notes_only_profile() -> Profile {
    let mut profile = Profile::builtin().expect("built-in profile must be valid");
    profile.rules = vec![DeclarationRule {
        key: "notes".to_string(),
        canonical_name: "notes".to_string(),
        storage_path: "../entities/notes".to_string(),
        public_id: "PUBLIC-ID-X".to_string(),
    }];
    profile.companions.clear();
    profile
}
