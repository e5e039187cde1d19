//! Identifier derivation from free text
//!
//! Story titles become table names, URL segments and component names, so they
//! are reduced to lower-case ASCII words first.

/// Slug used when a title yields no identifier characters at all
pub const FALLBACK_SLUG: &str = "feature";

/// Characters that join the surrounding letters instead of separating words
fn is_joiner(c: char) -> bool {
    matches!(c, '-' | '\'')
}

/// Lower-cased, underscore-joined identifier derived from `text`
///
/// `"Task Management"` becomes `task_management` and
/// `"E-commerce Product Catalog"` becomes `ecommerce_product_catalog`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if is_joiner(c) {
            continue;
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }

    while slug.ends_with('_') {
        slug.pop();
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// PascalCase name built from the slug words of `text`
#[must_use]
pub fn pascal_case(text: &str) -> String {
    slugify(text)
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
