//! Public post slugs of the form `{id}-{title-slug}`.
//!
//! The numeric prefix is authoritative: it is what the router uses to look the
//! post up. The remainder is cosmetic and may drift when a title changes, so
//! callers compare it against [`public_slug`] to decide whether to redirect.

use slug::slugify;

use crate::domain::error::DomainError;

/// Build the canonical public slug for a post.
pub fn public_slug(id: i64, title: &str) -> String {
    let title_slug = slugify(title);
    if title_slug.is_empty() {
        id.to_string()
    } else {
        format!("{id}-{title_slug}")
    }
}

/// Split a public slug into its id and the trailing title part.
///
/// `"42-hello-world"` yields `(42, "hello-world")`; a bare `"42"` yields
/// `(42, "")`.
pub fn parse_public_slug(value: &str) -> Result<(i64, &str), DomainError> {
    let digits_end = value
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map(|(index, _)| index)
        .unwrap_or(value.len());

    if digits_end == 0 {
        return Err(DomainError::malformed_slug(value));
    }

    let id = value[..digits_end]
        .parse::<i64>()
        .map_err(|_| DomainError::malformed_slug(value))?;

    let rest = &value[digits_end..];
    let title = match rest.strip_prefix('-') {
        Some(title) => title,
        None if rest.is_empty() => rest,
        None => return Err(DomainError::malformed_slug(value)),
    };

    Ok((id, title))
}
