//! Tenant namespace derived from the practice name.

use std::iter;

use crate::session::OnboardingData;

/// Tenant id used before a practice name is known.
pub const FALLBACK_TENANT_ID: &str = "demo";

/// Knowledge namespace for the practice being onboarded.
///
/// Lower-cases the practice name and maps every character outside
/// `[a-z0-9]` to `_`, one underscore per UTF-16 code unit, so a character
/// outside the Basic Multilingual Plane becomes `__`. Ids stay identical to
/// those minted by the web client.
pub fn derive_tenant_id(data: &OnboardingData) -> String {
    match data.details.provided().map(|d| d.practice_name.as_str()) {
        Some(name) if !name.is_empty() => slugify(name),
        _ => FALLBACK_TENANT_ID.to_string(),
    }
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .flat_map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                iter::repeat_n(c, 1)
            } else {
                iter::repeat_n('_', c.len_utf16())
            }
        })
        .collect()
}
