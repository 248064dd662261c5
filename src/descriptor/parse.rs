// src/descriptor/parse.rs

//! `ivy.xml` parsing.
//!
//! Only the parts needed for dependency resolution are read:
//!
//! ```xml
//! <ivy-module version="2.0">
//!   <info organisation="MyOrg" module="App" revision="1.0" branch="stable"/>
//!   <dependencies>
//!     <dependency org="MyOrg" name="MyLibrary" rev="1.+"/>
//!   </dependencies>
//! </ivy-module>
//! ```
//!
//! Everything else in the document is ignored.

use roxmltree::{Document, Node, ParsingOptions};

use crate::descriptor::model::{
    DEFAULT_BRANCH, DEFAULT_STATUS, DependencyDeclaration, Descriptor, DescriptorIdentity,
};
use crate::errors::{IvysnapError, Result};

const MODULE_TAG: &str = "ivy-module";

/// Parse raw descriptor bytes.
///
/// Optional attributes (`branch`, `status`) take their defaults only when
/// absent; an empty attribute value is kept as-is.
pub fn parse(bytes: &[u8]) -> Result<Descriptor> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| malformed(format!("descriptor is not valid UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let doc = Document::parse_with_options(text, options)
        .map_err(|e| malformed(format!("invalid XML: {e}")))?;

    let module = doc
        .descendants()
        .find(|n| n.has_tag_name(MODULE_TAG))
        .ok_or_else(|| malformed(format!("no <{MODULE_TAG}> element")))?;

    let identity = parse_info(module)?;
    let dependencies = parse_dependencies(module)?;

    Ok(Descriptor::new(identity, dependencies))
}

fn parse_info(module: Node<'_, '_>) -> Result<DescriptorIdentity> {
    let info = child_elements(module, "info")
        .next()
        .ok_or_else(|| malformed("no <info> element".to_string()))?;

    Ok(DescriptorIdentity {
        organisation: required(info, "organisation", "<info>")?,
        module: required(info, "module", "<info>")?,
        branch: optional(info, "branch", DEFAULT_BRANCH),
        status: optional(info, "status", DEFAULT_STATUS),
        revision: required(info, "revision", "<info>")?,
    })
}

fn parse_dependencies(module: Node<'_, '_>) -> Result<Vec<DependencyDeclaration>> {
    child_elements(module, "dependencies")
        .flat_map(|deps| child_elements(deps, "dependency"))
        .enumerate()
        .map(|(idx, node)| -> Result<DependencyDeclaration> {
            let what = format!("<dependency> #{}", idx + 1);
            Ok(DependencyDeclaration {
                organisation: required(node, "org", &what)?,
                name: required(node, "name", &what)?,
                rev: required(node, "rev", &what)?,
                branch: optional(node, "branch", DEFAULT_BRANCH),
            })
        })
        .collect()
}

fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.has_tag_name(tag))
}

fn required(node: Node<'_, '_>, attr: &str, what: &str) -> Result<String> {
    node.attribute(attr)
        .map(str::to_string)
        .ok_or_else(|| malformed(format!("{what} is missing required attribute '{attr}'")))
}

fn optional(node: Node<'_, '_>, attr: &str, default: &str) -> String {
    node.attribute(attr).unwrap_or(default).to_string()
}

fn malformed(msg: String) -> IvysnapError {
    IvysnapError::MalformedDescriptor(msg)
}
