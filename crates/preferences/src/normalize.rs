//! Attribute normalization.
//!
//! Catalog attributes are hand-written free text ("$4650 tuition Room &
//! Board $2994", "6% (130/800)", "Rising Seniors Only"). Preference learning
//! needs discrete values, so every function here maps text onto a small set
//! of buckets. All functions are total: text that cannot be interpreted
//! lands in an explicit `unknown` / `general` bucket.

pub use data_loader::split_categories;
use std::fmt;

// =============================================================================
// Cost
// =============================================================================

/// Cost bucket of a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostTier {
    Free,
    Low,
    Medium,
    High,
    Unknown,
}

impl CostTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostTier::Free => "free",
            CostTier::Low => "low",
            CostTier::Medium => "medium",
            CostTier::High => "high",
            CostTier::Unknown => "unknown",
        }
    }
}

/// Concatenate every ASCII digit in `text` and parse the result.
///
/// "$13,500 residential" -> 13500. Digits from unrelated numbers are glued
/// together as well: "11% (60/700)" -> 1160700.
fn concatenated_digits(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Map free-text cost onto a `CostTier`.
///
/// - contains "free" (any case) -> Free
/// - contains `$` -> all digits as one amount: <1000 Low, <5000 Medium, else High
/// - anything else -> Unknown
pub fn normalize_cost(text: &str) -> CostTier {
    if text.to_lowercase().contains("free") {
        return CostTier::Free;
    }
    if !text.contains('$') {
        return CostTier::Unknown;
    }

    match concatenated_digits(text) {
        Some(amount) if amount < 1000.0 => CostTier::Low,
        Some(amount) if amount < 5000.0 => CostTier::Medium,
        Some(_) => CostTier::High,
        None => CostTier::Unknown,
    }
}

// =============================================================================
// Selectivity
// =============================================================================

/// Selectivity bucket derived from an acceptance percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectivityTier {
    VerySelective,
    Selective,
    Moderate,
    Open,
    Unknown,
}

impl SelectivityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectivityTier::VerySelective => "very_selective",
            SelectivityTier::Selective => "selective",
            SelectivityTier::Moderate => "moderate",
            SelectivityTier::Open => "open",
            SelectivityTier::Unknown => "unknown",
        }
    }
}

/// Map free-text selectivity onto a `SelectivityTier`.
///
/// Only text containing `%` is interpreted. The percentage is read by
/// concatenating every digit in the string, so "6% (130/800)" reads as
/// 6130800 and lands in `Open`. Catalog entries and stored profiles depend
/// on these buckets, so the extraction is kept as is.
pub fn normalize_selectivity(text: &str) -> SelectivityTier {
    if !text.contains('%') {
        return SelectivityTier::Unknown;
    }

    match concatenated_digits(text) {
        Some(pct) if pct < 10.0 => SelectivityTier::VerySelective,
        Some(pct) if pct < 25.0 => SelectivityTier::Selective,
        Some(pct) if pct < 50.0 => SelectivityTier::Moderate,
        Some(_) => SelectivityTier::Open,
        None => SelectivityTier::Unknown,
    }
}

// =============================================================================
// Restrictions
// =============================================================================

/// Eligibility tag extracted from the restrictions text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestrictionTag {
    SeniorsOnly,
    IncludesJuniors,
    RisingGrades,
    AgeRestricted,
    GenderSpecific,
    DiversityFocused,
    General,
}

impl RestrictionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestrictionTag::SeniorsOnly => "seniors_only",
            RestrictionTag::IncludesJuniors => "includes_juniors",
            RestrictionTag::RisingGrades => "rising_grades",
            RestrictionTag::AgeRestricted => "age_restricted",
            RestrictionTag::GenderSpecific => "gender_specific",
            RestrictionTag::DiversityFocused => "diversity_focused",
            RestrictionTag::General => "general",
        }
    }
}

/// Substring rules, checked in this order; each may fire independently
const RESTRICTION_RULES: &[(&[&str], RestrictionTag)] = &[
    (&["senior"], RestrictionTag::SeniorsOnly),
    (&["junior"], RestrictionTag::IncludesJuniors),
    (&["rising"], RestrictionTag::RisingGrades),
    (&["16", "17", "18"], RestrictionTag::AgeRestricted),
    (&["female", "girls"], RestrictionTag::GenderSpecific),
    (&["underserved", "minorities"], RestrictionTag::DiversityFocused),
];

/// Extract restriction tags; `[General]` when no rule fires.
pub fn normalize_restrictions(text: &str) -> Vec<RestrictionTag> {
    let lower = text.to_lowercase();
    let tags: Vec<RestrictionTag> = RESTRICTION_RULES
        .iter()
        .filter(|(needles, _)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|&(_, tag)| tag)
        .collect();

    if tags.is_empty() {
        vec![RestrictionTag::General]
    } else {
        tags
    }
}

// =============================================================================
// Categories
// =============================================================================

pub const STEM_GENERAL: &str = "STEM - General";
pub const STEM_ENGINEERING_CS: &str = "STEM - Engineering & CS";
pub const STEM_PHYSICAL_SCIENCES: &str = "STEM - Physical Sciences";
pub const STEM_LIFE_SCIENCES: &str = "STEM - Life Sciences";
pub const STEM_EARTH_ENVIRONMENT: &str = "STEM - Earth & Environment";
pub const MATH_DATA: &str = "Mathematics & Data";
pub const MEDICINE_HEALTH: &str = "Medicine & Health";
pub const VETERINARY: &str = "Veterinary & Animal Science";
pub const BUSINESS: &str = "Business & Entrepreneurship";
pub const VISUAL_ARTS: &str = "Visual Arts & Design";
pub const ARCHITECTURE: &str = "Architecture";
pub const FILM_MEDIA: &str = "Film & Media";
pub const WRITING_JOURNALISM: &str = "Writing & Journalism";
pub const HUMANITIES_SOCIAL: &str = "Humanities & Social Sciences";
pub const RESEARCH_GENERAL: &str = "Research & General Academics";

/// Group a single raw category label belongs to, if it is a known label.
///
/// Matching is exact on the trimmed label. Some catalog labels contain
/// zero-width spaces where a line break used to be; those are listed
/// verbatim.
pub fn category_group(label: &str) -> Option<&'static str> {
    let group = match label.trim() {
        "STEM" | "All STEM" | "All STEM categories" | "Multiple STEM" | "STEM (multiple)"
        | "STEM Research" | "Astrophysics + STEM" | "Natural Sciences"
        | "Engineering + Natural Science Research" | "Science" | "Sciences" => STEM_GENERAL,

        "Engineering" | "Engineering (broad overview)" | "CS" | "Computer Science" | "AI"
        | "Robotics" | "Machine Learning" | "EECS or ME (Mechanical)" | "Radar Systems"
        | "Applied Science & Engineering / Biological & Biomedical"
        | "Bioinformatics + Cloud Computing" | "Game Design" | "Cybersecurity"
        | "Aerospace" | "Electrical Engineering" | "Mechanical Engineering"
        | "Entrepreneurship\u{200b}Tech" => STEM_ENGINEERING_CS,

        "Physics" | "Astronomy" | "Astrophysics" | "Chemistry" | "Polymer Research"
        | "Materials Science" => STEM_PHYSICAL_SCIENCES,

        "Biology" | "Biochemistry" | "Computational biology" | "Genomics" | "Neuroscience"
        | "Biomedical (multiple research labs)"
        | "Multiple (Bioengineering / Molecular Bio / Sports Medicine)" | "Paleontology"
        | "Marine Biology" | "Molecular Biology" => STEM_LIFE_SCIENCES,

        "Earth Sciences" | "Earth / Space research" | "Environmental Science" | "Ecology"
        | "Sustainability" => STEM_EARTH_ENVIRONMENT,

        "Mathematics" | "Data" | "probability" | "game theory" | "quantitative reasoning"
        | "Sports Analytics \u{200b}Statistics" | "Statistics" | "Data Science" | "Math" => {
            MATH_DATA
        }

        "Medicine" | "Medicine / Public Health" | "Nursing" | "Public Health" | "Pre-Med" => {
            MEDICINE_HEALTH
        }

        "Veterinary Medicine" | "Animal Science" => VETERINARY,

        "Business / Economics / Entrepreneurship" | "Business / Entrepreneurship"
        | "Entrepreneurship" | "EntrepreneurshipBusiness" | "Entrepeneurship \u{200b}Business"
        | "Business" | "Economics" | "Finance" => BUSINESS,

        "Art" | "JArt" | "Design" | "Modeling" | "Fine Arts" | "Graphic Design"
        | "Photography" | "Fashion" => VISUAL_ARTS,

        "Architecture" | "Urban Design" => ARCHITECTURE,

        "Film & Video" | "Film" | "Animation" => FILM_MEDIA,

        "Creative Writing" | "Journalism" | "Literature" | "Poetry" | "Screenwriting"
        | "Novel Writing\u{200b}TV Writing + 3-week creative writing" => WRITING_JOURNALISM,

        "Humanities" | "Multiple Humanities" | "Ethnic Studies" | "Psychology"
        | "cognitive science" | "Leadership / Global Issues" | "History" | "Philosophy"
        | "Political Science" | "Law" => HUMANITIES_SOCIAL,

        "Every Major" | "Multiple" | "Multiple research" => RESEARCH_GENERAL,

        _ => return None,
    };
    Some(group)
}

/// Normalize one raw category label to its group name.
///
/// Unknown labels pass through (trimmed) and act as their own group.
pub fn normalize_category(raw: &str) -> String {
    let label = raw.trim();
    category_group(label)
        .map(str::to_string)
        .unwrap_or_else(|| label.to_string())
}

/// Normalized groups of a category list, de-duplicated, first-seen order
pub fn normalized_categories(list: &str) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();
    for label in split_categories(list) {
        let group = normalize_category(label);
        if !groups.contains(&group) {
            groups.push(group);
        }
    }
    groups
}

// =============================================================================
// Display
// =============================================================================

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(CostTier, SelectivityTier, RestrictionTag);
