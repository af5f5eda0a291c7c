//! Slug Derivation
//!
//! URL-safe identifiers derived from display names: lowercase, runs of
//! non-alphanumeric characters collapsed to a single hyphen, leading and
//! trailing hyphens stripped.

/// Derive a slug from a display name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // swallows leading separators

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(slugify("Running Shoes"), "running-shoes");
    }

    #[test]
    fn test_collapses_separator_runs() {
        assert_eq!(slugify("Mens -- T-Shirts & Polos"), "mens-t-shirts-polos");
    }

    #[test]
    fn test_strips_leading_and_trailing() {
        assert_eq!(slugify("  --Sale!--  "), "sale");
    }

    #[test]
    fn test_mixed_case_and_digits() {
        assert_eq!(slugify("iPhone 15 Pro"), "iphone-15-pro");
    }

    #[test]
    fn test_only_symbols_is_empty() {
        assert_eq!(slugify("!!!"), "");
    }
}
