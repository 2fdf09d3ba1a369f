use std::collections::BTreeSet;

use crate::document::Element;

const TAG_CATEGORIES: &str = "categories";
const TAG_CATEGORY: &str = "category";
const ATTR_NAME: &str = "name";

/// Where `categories` blocks are looked up relative to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagScope {
    /// Only `categories` elements that are direct children.
    Direct,
    /// Any `categories` element below the element.
    Recursive,
}

/// Names of the `category` entries of the `categories` blocks in `scope`.
pub fn collect_tags(element: Element<'_>, scope: TagScope) -> BTreeSet<String> {
    let blocks: Vec<Element<'_>> = match scope {
        TagScope::Direct => element.children_named(TAG_CATEGORIES).collect(),
        TagScope::Recursive => element.descendants(TAG_CATEGORIES).collect(),
    };

    blocks
        .iter()
        .flat_map(|block| block.children_named(TAG_CATEGORY))
        .filter_map(|category| category.attribute(ATTR_NAME))
        .map(String::from)
        .collect()
}
