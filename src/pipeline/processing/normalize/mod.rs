//! Party-code recoding.
//!
//! FEC party codes are free-ish text ("DEM", "Dem", "DFL", ...). Two display
//! contexts recode them differently, so each gets its own function:
//! [`display_party`] keeps unrecognized codes as they are, while
//! [`donation_party`] collapses everything into four fixed categories.

use std::fmt;

/// A canonical label and the raw codes that mean it
#[derive(Debug)]
pub struct EquivalenceClass<L> {
    pub label: L,
    pub variants: &'static [&'static str],
}

const DEMOCRATIC: &[&str] = &["DEM", "DFL", "D"];
const REPUBLICAN: &[&str] = &["REP", "R", "GOP"];

pub const DISPLAY_CLASSES: &[EquivalenceClass<&str>] = &[
    EquivalenceClass {
        label: "Democratic Party",
        variants: DEMOCRATIC,
    },
    EquivalenceClass {
        label: "Republican Party",
        variants: REPUBLICAN,
    },
    EquivalenceClass {
        label: "Libertarian Party",
        variants: &["LIB"],
    },
    EquivalenceClass {
        label: "Green Party",
        variants: &["GRE", "GRN"],
    },
    EquivalenceClass {
        label: "Independent",
        variants: &["IND", "I"],
    },
];

/// Label for absent party codes in the display context
pub const DISPLAY_FALLBACK: &str = "Other";

/// First class containing `raw`, compared trimmed and case-insensitively
pub fn match_class<'c, L>(
    classes: &'c [EquivalenceClass<L>],
    raw: &str,
) -> Option<&'c EquivalenceClass<L>> {
    let raw = raw.trim();
    classes
        .iter()
        .find(|class| class.variants.iter().any(|v| v.eq_ignore_ascii_case(raw)))
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Party label for the cash-holdings, counts and recipient tables.
///
/// Recognized codes map to their canonical label, unrecognized codes pass
/// through unchanged, absent codes become "Other".
pub fn display_party(raw: Option<&str>) -> String {
    match present(raw) {
        None => DISPLAY_FALLBACK.to_string(),
        Some(code) => match match_class(DISPLAY_CLASSES, code) {
            Some(class) => class.label.to_string(),
            None => code.to_string(),
        },
    }
}

/// The closed set of categories used by the donation dataset and chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DonationParty {
    Democrat,
    Republican,
    Other,
    NonPartisan,
}

impl DonationParty {
    pub const ALL: [DonationParty; 4] = [
        DonationParty::Democrat,
        DonationParty::Republican,
        DonationParty::Other,
        DonationParty::NonPartisan,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DonationParty::Democrat => "Democrat",
            DonationParty::Republican => "Republican",
            DonationParty::Other => "Other",
            DonationParty::NonPartisan => "Non-Partisan Donation",
        }
    }
}

impl fmt::Display for DonationParty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const DONATION_CLASSES: &[EquivalenceClass<DonationParty>] = &[
    EquivalenceClass {
        label: DonationParty::Democrat,
        variants: DEMOCRATIC,
    },
    EquivalenceClass {
        label: DonationParty::Republican,
        variants: REPUBLICAN,
    },
];

/// Category for the donation dataset.
///
/// Present but unrecognized codes become `Other`; absent or blank codes
/// become `NonPartisan`.
pub fn donation_party(raw: Option<&str>) -> DonationParty {
    let Some(code) = present(raw) else {
        return DonationParty::NonPartisan;
    };
    match_class(DONATION_CLASSES, code)
        .map(|class| class.label)
        .unwrap_or(DonationParty::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_democratic_variants_in_both_contexts() {
        for raw in ["Dem", "DEM", "dem", "DFL"] {
            assert_eq!(display_party(Some(raw)), "Democratic Party", "{raw}");
            assert_eq!(donation_party(Some(raw)), DonationParty::Democrat, "{raw}");
        }
    }

    #[test]
    fn test_display_passes_unrecognized_codes_through() {
        assert_eq!(display_party(Some("CON")), "CON");
        assert_eq!(display_party(Some(" W ")), "W");
        assert_eq!(display_party(Some("gop")), "Republican Party");
        assert_eq!(display_party(Some("grn")), "Green Party");
    }

    #[test]
    fn test_display_absent_becomes_other() {
        assert_eq!(display_party(None), "Other");
        assert_eq!(display_party(Some("   ")), "Other");
    }

    #[test]
    fn test_donation_collapses_unrecognized_to_other() {
        assert_eq!(donation_party(Some("REP")), DonationParty::Republican);
        assert_eq!(donation_party(Some("LIB")), DonationParty::Other);
        assert_eq!(donation_party(Some("UNK")), DonationParty::Other);
    }

    #[test]
    fn test_donation_absent_is_non_partisan() {
        assert_eq!(donation_party(None), DonationParty::NonPartisan);
        assert_eq!(donation_party(Some("")), DonationParty::NonPartisan);
        assert_eq!(DonationParty::NonPartisan.label(), "Non-Partisan Donation");
    }

    #[test]
    fn test_first_matching_class_wins() {
        const OVERLAPPING: &[EquivalenceClass<&str>] = &[
            EquivalenceClass {
                label: "first",
                variants: &["X"],
            },
            EquivalenceClass {
                label: "second",
                variants: &["x", "Y"],
            },
        ];
        assert_eq!(match_class(OVERLAPPING, "x").map(|c| c.label), Some("first"));
        assert_eq!(match_class(OVERLAPPING, "y").map(|c| c.label), Some("second"));
        assert!(match_class(OVERLAPPING, "z").is_none());
    }
}
