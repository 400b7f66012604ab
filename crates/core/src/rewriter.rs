//! Document rewriter: new prolog + internal subset, original body verbatim.
//!
//! Output layout:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <!DOCTYPE root PUBLIC "public id" "system path" [
//! \t<!ENTITY ...>
//! ]>
//! ...original body, byte for byte...
//! ```

use crate::classifier::is_element_start;
use crate::declaration::DeclarationSet;
use crate::profile::DoctypeTemplate;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Closes the internal subset (and the DOCTYPE).
pub const SUBSET_CLOSE: &str = "]>";

const BYTE_ORDER_MARK: &str = "\u{feff}";

#[derive(Debug, Clone, Copy)]
pub struct Rewriter<'p> {
    doctype: &'p DoctypeTemplate,
}

impl<'p> Rewriter<'p> {
    pub fn new(doctype: &'p DoctypeTemplate) -> Self {
        Self { doctype }
    }

    /// Everything the rewrite puts in front of the body, `]>` line included.
    pub fn header(&self, root_element: &str, declarations: &DeclarationSet) -> String {
        let mut out = String::with_capacity(256 + declarations.len() * 128);
        out.push_str(XML_DECLARATION);
        out.push('\n');
        out.push_str(&format!(
            "<!DOCTYPE {} PUBLIC \"{}\" \"{}\" [\n",
            root_element, self.doctype.public_id, self.doctype.system_path
        ));
        for declaration in declarations {
            out.push_str(declaration.as_str());
            out.push('\n');
        }
        out.push_str(SUBSET_CLOSE);
        out.push('\n');
        out
    }

    pub fn rewrite(&self, original: &str, root_element: &str, declarations: &DeclarationSet) -> String {
        let body = body_after_prolog(original);
        let mut out = self.header(root_element, declarations);
        out.push_str(body);
        out
    }
}

/// The part of `original` that survives a rewrite.
///
/// The old internal subset ends at the first `]>` line of the prolog (the
/// lines before the first element start tag). Everything up to and
/// including that line is dropped. A `]]>` in the body is never mistaken
/// for it.
///
/// Without such a line, only a leading XML declaration and a subset-less
/// DOCTYPE (which may span several lines) are dropped, since the new
/// header replaces both.
pub fn body_after_prolog(original: &str) -> &str {
    let text = original.strip_prefix(BYTE_ORDER_MARK).unwrap_or(original);

    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if is_element_start(line) {
            break;
        }
        offset += line.len();
        if line.contains(SUBSET_CLOSE) {
            return &text[offset..];
        }
    }

    let mut offset = 0;
    let mut in_doctype = false;
    for line in text.split_inclusive('\n') {
        if is_element_start(line) {
            break;
        }
        let trimmed = line.trim();
        if in_doctype {
            in_doctype = !trimmed.contains('>');
        } else if trimmed.starts_with("<!DOCTYPE") && !trimmed.contains('[') {
            in_doctype = !trimmed.ends_with('>');
        } else if !is_xml_declaration(trimmed) {
            break;
        }
        offset += line.len();
    }
    &text[offset..]
}

fn is_xml_declaration(trimmed: &str) -> bool {
    trimmed.starts_with("<?xml ") || trimmed.starts_with("<?xml?")
}
