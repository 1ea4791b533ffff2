//! Admin-1 normalisation for the domestic country's nations.

mod adm2;

pub use adm2::Adm2Lookup;

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};

pub const OTHER: &str = "Other";

/// Country code → canonical admin-1 label, in matching priority order.
const CODE_TABLE: [(&str, &str); 4] = [
    ("SCT", "Scotland"),
    ("WLS", "Wales"),
    ("ENG", "England"),
    ("NIR", "Northern_Ireland"),
];

const CLEANUP_TABLE: [(&str, &str); 5] = [
    ("SCOTLAND", "Scotland"),
    ("WALES", "Wales"),
    ("ENGLAND", "England"),
    ("NORTHERN_IRELAND", "Northern_Ireland"),
    ("NORTHERN IRELAND", "Northern_Ireland"),
];

pub fn canonical_regions() -> impl Iterator<Item = &'static str> {
    CODE_TABLE.iter().map(|(_, region)| *region)
}

pub fn code_to_region(code: &str) -> Option<&'static str> {
    let code = code.trim().to_uppercase();
    CODE_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, region)| *region)
}

/// What to store for an admin-1 value nothing else could resolve, on a
/// sequence from outside the domestic country.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Admin1Fallback {
    /// Keep the raw value.
    #[default]
    Keep,
    /// Replace it with `"Other"`.
    Other,
}

#[derive(Debug, Clone)]
pub struct GeographyNormalizer {
    domestic_country: String,
    fallback: Admin1Fallback,
    adm2_lookup: Adm2Lookup,
}

impl GeographyNormalizer {
    pub fn new(domestic_country: impl Into<String>, fallback: Admin1Fallback) -> Self {
        Self {
            domestic_country: domestic_country.into(),
            fallback,
            adm2_lookup: Adm2Lookup::official(),
        }
    }

    pub fn with_lookup(mut self, lookup: Adm2Lookup) -> Self {
        self.adm2_lookup = lookup;
        self
    }

    pub fn domestic_country(&self) -> &str {
        &self.domestic_country
    }

    pub fn fallback(&self) -> Admin1Fallback {
        self.fallback
    }

    /// Map a raw admin-1 value onto a canonical region label.
    ///
    /// `identifier` is the sequence's own name, searched for a region name
    /// or code when the value itself is not recognised.
    pub fn normalize(&self, raw: &str, identifier: &str) -> Result<String> {
        let value = raw.trim();

        if let Some((country, code)) = value.split_once('-') {
            if country.trim().eq_ignore_ascii_case(&self.domestic_country) {
                return code_to_region(code)
                    .map(str::to_string)
                    .ok_or_else(|| ReportError::UnknownAdminCode {
                        code: code.trim().to_string(),
                        value: value.to_string(),
                    });
            }
        }

        let upper = value.to_uppercase();
        if let Some((_, region)) = CLEANUP_TABLE.iter().find(|(k, _)| *k == upper) {
            return Ok(region.to_string());
        }

        if let Some(region) = region_from_identifier(identifier) {
            return Ok(region.to_string());
        }

        Ok(value.to_string())
    }

    /// [`normalize`](Self::normalize) for a sequence from `country`; an
    /// unresolved foreign value follows the configured fallback.
    pub fn normalize_for_country(&self, raw: &str, identifier: &str, country: &str) -> Result<String> {
        let normalized = self.normalize(raw, identifier)?;
        let resolved = canonical_regions().any(|r| r == normalized);
        if !resolved
            && self.fallback == Admin1Fallback::Other
            && !country.trim().eq_ignore_ascii_case(&self.domestic_country)
        {
            return Ok(OTHER.to_string());
        }
        Ok(normalized)
    }

    /// Admin-1 implied by an admin-2 name, if known.
    pub fn adm1_from_adm2(&self, adm2: &str) -> Option<&str> {
        self.adm2_lookup.get(adm2)
    }
}

/// First canonical region whose code or name appears in `identifier`.
pub fn region_from_identifier(identifier: &str) -> Option<&'static str> {
    CODE_TABLE
        .iter()
        .find(|(code, region)| identifier.contains(code) || identifier.contains(region))
        .map(|(_, region)| *region)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> GeographyNormalizer {
        GeographyNormalizer::new("UK", Admin1Fallback::Keep)
    }

    #[test]
    fn country_codes_map_to_regions() {
        assert_eq!(normalizer().normalize("UK-SCT", "x").unwrap(), "Scotland");
        assert_eq!(normalizer().normalize("UK-NIR", "x").unwrap(), "Northern_Ireland");
    }

    #[test]
    fn unknown_codes_are_fatal() {
        let err = normalizer().normalize("UK-XYZ", "x").unwrap_err();
        assert!(matches!(err, ReportError::UnknownAdminCode { ref code, .. } if code == "XYZ"));
    }

    #[test]
    fn alternate_spellings_are_cleaned() {
        assert_eq!(normalizer().normalize("England", "x").unwrap(), "England");
        assert_eq!(normalizer().normalize("northern ireland", "x").unwrap(), "Northern_Ireland");
    }

    #[test]
    fn identifier_is_searched_when_value_is_unrecognised() {
        assert_eq!(normalizer().normalize("", "Wales/PHWC-1/2020").unwrap(), "Wales");
        assert_eq!(normalizer().normalize("", "ENG-12345").unwrap(), "England");
        assert_eq!(normalizer().normalize("Bavaria", "DE/1/2020").unwrap(), "Bavaria");
    }

    #[test]
    fn foreign_values_follow_the_fallback_policy() {
        let keep = normalizer();
        let other = GeographyNormalizer::new("UK", Admin1Fallback::Other);
        assert_eq!(keep.normalize_for_country("Bavaria", "DE/1", "Germany").unwrap(), "Bavaria");
        assert_eq!(other.normalize_for_country("Bavaria", "DE/1", "Germany").unwrap(), "Other");
        assert_eq!(other.normalize_for_country("UK-ENG", "x", "UK").unwrap(), "England");
        assert_eq!(other.normalize_for_country("Devon", "x", "UK").unwrap(), "Devon");
    }

    #[test]
    fn admin2_lookup_resolves_missing_admin1() {
        assert_eq!(normalizer().adm1_from_adm2("Cardiff"), Some("Wales"));
    }
}
