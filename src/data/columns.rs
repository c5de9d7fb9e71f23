// ---------------------------------------------------------------------------
// Header canonicalization
// ---------------------------------------------------------------------------

/// Known alternate spellings (already normalized) → canonical column name.
///
/// Different releases of the report name the same indicator differently;
/// everything downstream only ever looks up the canonical names.
pub const RENAME_MAP: &[(&str, &str)] = &[
    ("country_name", "country"),
    ("ladder_score", "happiness_score"),
    ("logged_gdp_per_capita", "gdp_per_capita"),
    ("social_support", "social_support"),
    ("healthy_life_expectancy", "life_expectancy"),
    ("freedom_to_make_life_choices", "freedom"),
    ("perceptions_of_corruption", "corruption"),
    ("regional_indicator", "region"),
];

pub const COUNTRY: &str = "country";
pub const HAPPINESS_SCORE: &str = "happiness_score";
pub const GDP_PER_CAPITA: &str = "gdp_per_capita";
pub const SOCIAL_SUPPORT: &str = "social_support";
pub const LIFE_EXPECTANCY: &str = "life_expectancy";
pub const FREEDOM: &str = "freedom";
pub const REGION: &str = "region";

/// Trim, lowercase and underscore a raw header.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_lowercase()
        .replace(' ', "_")
}

/// Normalize a header and map it onto its canonical name if one is known.
pub fn canonical_name(raw: &str) -> String {
    let normalized = normalize_header(raw);
    RENAME_MAP
        .iter()
        .find(|(old, _)| *old == normalized)
        .map(|(_, new)| (*new).to_string())
        .unwrap_or(normalized)
}

/// Canonicalize a full header row, preserving order.
pub fn normalize_headers<I, S>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    headers
        .into_iter()
        .map(|h| canonical_name(h.as_ref()))
        .collect()
}
