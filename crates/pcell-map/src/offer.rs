/// Canonical spellings for offer types, keyed by lowercase text.
const OFFER_TYPES: &[(&str, &str)] = &[
    ("on campus", "On Campus"),
    ("oncampus", "On Campus"),
    ("off campus", "Off Campus"),
    ("offcampus", "Off Campus"),
    ("direct", "Direct"),
    ("phone call", "Phone Call"),
    ("phonecall", "Phone Call"),
    ("pooled", "Pooled"),
    ("pooled campus", "Pooled"),
    ("internship/ppo", "Internship/PPO"),
    ("internship", "Internship/PPO"),
    ("ppo", "Internship/PPO"),
    ("hackathon", "Hackathon"),
    ("placement", "Placement"),
];

/// Maps known offer type spellings onto their canonical label; other text
/// is returned trimmed.
pub fn canonical_offer_type(value: &str) -> String {
    let trimmed = value.trim();
    let key = trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    OFFER_TYPES
        .iter()
        .find(|(spelling, _)| *spelling == key)
        .map_or_else(|| trimmed.to_string(), |(_, canonical)| (*canonical).to_string())
}
