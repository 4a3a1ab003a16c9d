//! District name normalization.
//!
//! Rainfall datasets and boundary datasets spell the same district with
//! different case, spacing and punctuation ("AHMED-NAGAR", "Ahmed Nagar",
//! "ahmednagar."). Every comparison in the reconciler goes through
//! [`normalize_name`] on both sides so that only genuine spelling differences
//! are left for the alias table.
//!
//! Normalization is deliberately conservative: it never drops words. A
//! trailing "District" is kept, so "Mumbai City" and "Mumbai City District"
//! only match through an explicit alias.

/// Normalizes a district name for comparison.
///
/// - lowercases
/// - removes `.` `,` `'` `` ` `` and `"`
/// - turns `-` `_` `/` into spaces
/// - trims and collapses runs of whitespace to one space
pub fn normalize_name(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '.' | ',' | '\'' | '`' | '"' => {}
            '-' | '_' | '/' => cleaned.push(' '),
            _ => cleaned.extend(c.to_lowercase()),
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_surrounding_whitespace_are_ignored() {
        assert_eq!(normalize_name("  PUNE "), "pune");
        assert_eq!(normalize_name("Pune"), "pune");
    }

    #[test]
    fn test_internal_whitespace_is_collapsed() {
        assert_eq!(normalize_name("MUMBAI   SUBURBAN"), "mumbai suburban");
        assert_eq!(normalize_name("Mumbai\tSuburban"), "mumbai suburban");
    }

    #[test]
    fn test_hyphens_and_periods_do_not_block_a_match() {
        assert_eq!(normalize_name("Sindhu-durg"), normalize_name("Sindhu durg"));
        assert_eq!(normalize_name("N. Goa"), "n goa");
        assert_eq!(normalize_name("Chhatrapati Sambhaji-Nagar"), "chhatrapati sambhaji nagar");
        assert_eq!(normalize_name("Chhatrapati_Sambhaji_Nagar"), "chhatrapati sambhaji nagar");
    }

    #[test]
    fn test_district_suffix_is_not_stripped() {
        assert_ne!(normalize_name("Mumbai City"), normalize_name("Mumbai City District"));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for name in ["Thane", " RAIGAD-", "Dharashiv (Osmanabad)", "Bid."] {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once, "normalizing '{}' twice changed it", name);
        }
    }

    #[test]
    fn test_empty_and_punctuation_only_names_become_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name(" .-. "), "");
    }
}
