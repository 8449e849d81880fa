use crate::{
    error::ConfigError,
    order::{OrderDirection, OrderKey},
};

// Split a raw order string into keys. A blank string yields no keys; the
// caller appends the primary key.
pub(super) fn parse_order_fragments(raw: &str) -> Result<Vec<OrderKey>, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',')
        .enumerate()
        .map(|(position, fragment)| parse_fragment(position, fragment))
        .collect()
}

fn parse_fragment(position: usize, fragment: &str) -> Result<OrderKey, ConfigError> {
    let mut tokens = fragment.split_whitespace();

    let Some(field) = tokens.next() else {
        return Err(ConfigError::EmptyFragment { position });
    };
    if !is_field_name(field) {
        return Err(ConfigError::MalformedFragment {
            fragment: fragment.trim().to_string(),
        });
    }

    let direction = match tokens.next() {
        None => OrderDirection::Asc,
        Some(token) => parse_direction(token).ok_or_else(|| ConfigError::UnknownDirection {
            fragment: fragment.trim().to_string(),
            direction: token.to_string(),
        })?,
    };

    if tokens.next().is_some() {
        return Err(ConfigError::MalformedFragment {
            fragment: fragment.trim().to_string(),
        });
    }

    Ok(OrderKey {
        field: field.to_string(),
        direction,
    })
}

fn parse_direction(token: &str) -> Option<OrderDirection> {
    if token.eq_ignore_ascii_case("asc") {
        Some(OrderDirection::Asc)
    } else if token.eq_ignore_ascii_case("desc") {
        Some(OrderDirection::Desc)
    } else {
        None
    }
}

// Identifier: leading letter or underscore, then alphanumerics or underscores.
fn is_field_name(token: &str) -> bool {
    let mut chars = token.chars();

    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
