//! Declaration mapper: entity name + catalog -> canonical declaration.

use crate::catalog::Catalog;
use crate::declaration::Declaration;
use crate::profile::{DeclarationRule, Profile};

/// A resolved entity usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'p> {
    /// The rule that claimed the name.
    pub rule: &'p DeclarationRule,
    pub declaration: Declaration,
    /// Extra declarations the rule's canonical name pulls in.
    pub companions: Vec<Declaration>,
}

/// Walks the profile's rule table in order against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationMapper<'p> {
    profile: &'p Profile,
}

impl<'p> DeclarationMapper<'p> {
    pub fn new(profile: &'p Profile) -> Self {
        Self { profile }
    }

    /// The declaration for `name`, or `None` if no rule's reference file owns it.
    pub fn declaration_for(&self, name: &str, catalog: &Catalog) -> Option<Declaration> {
        self.resolve(name, catalog).map(|r| r.declaration)
    }

    /// Find the first rule, in table order, whose reference file declares `name`.
    ///
    /// Rules whose reference file is absent from the catalog are skipped.
    pub fn resolve(&self, name: &str, catalog: &Catalog) -> Option<Resolution<'p>> {
        let extension = self.profile.reference_extension.as_str();
        let rule = self
            .profile
            .rules
            .iter()
            .find(|rule| catalog.owns(&rule.key, name))?;

        let companions = self
            .profile
            .companions
            .iter()
            .filter(|c| c.trigger == rule.canonical_name)
            .map(|c| Declaration::for_companion(c, extension))
            .collect();

        Some(Resolution {
            rule,
            declaration: Declaration::for_rule(rule, extension),
            companions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;

    fn catalog(entries: &[(&str, &str)]) -> Catalog {
        let mut builder = CatalogBuilder::new();
        for (identifier, name) in entries {
            builder.add_reference(*identifier, &format!("<!ENTITY {} \"x\">", name));
        }
        builder.build()
    }

    #[test]
    fn test_resolves_entity_from_shared_file() {
        let profile = Profile::builtin().unwrap();
        let catalog = catalog(&[("notes", "safety_note_1")]);
        let decl = DeclarationMapper::new(&profile)
            .declaration_for("safety_note_1", &catalog)
            .unwrap();
        assert_eq!(
            decl.as_str(),
            "\t<!ENTITY % notes PUBLIC \"-//TRG//ENTITIES MIL-STD-40051 Notes REV A 1.0 20241018//EN\" \"../entities/notes.ent\"> %notes;"
        );
    }

    #[test]
    fn test_unknown_name_resolves_to_none() {
        let profile = Profile::builtin().unwrap();
        let catalog = catalog(&[("notes", "safety_note_1")]);
        assert!(DeclarationMapper::new(&profile).resolve("unknown_xyz", &catalog).is_none());
    }

    #[test]
    fn test_first_rule_in_table_order_wins() {
        let profile = Profile::builtin().unwrap();
        let catalog = catalog(&[("warnings", "shared"), ("dimboil", "shared")]);
        let resolution = DeclarationMapper::new(&profile).resolve("shared", &catalog).unwrap();
        assert_eq!(resolution.rule.key, "dimboil");
    }

    #[test]
    fn test_reference_file_without_rule_is_ignored() {
        let profile = Profile::builtin().unwrap();
        let catalog = catalog(&[("local_stuff", "thing")]);
        assert!(DeclarationMapper::new(&profile).resolve("thing", &catalog).is_none());
    }

    #[test]
    fn test_editable_boilerplate_pulls_in_selection_companion() {
        let profile = Profile::builtin().unwrap();
        let catalog = catalog(&[("editboil", "edit.torque")]);
        let resolution = DeclarationMapper::new(&profile).resolve("edit.torque", &catalog).unwrap();

        assert_eq!(resolution.rule.canonical_name, "editable_boilerplate");
        assert_eq!(resolution.companions.len(), 1);
        assert!(resolution.companions[0].as_str().contains("%select_boilerplate;"));
        assert!(resolution.companions[0].as_str().contains("../dtd/boilerplate/selectboil.ent"));
    }

    #[test]
    fn test_plain_rule_has_no_companions() {
        let profile = Profile::builtin().unwrap();
        let catalog = catalog(&[("cautions", "c1")]);
        let resolution = DeclarationMapper::new(&profile).resolve("c1", &catalog).unwrap();
        assert!(resolution.companions.is_empty());
    }
}
