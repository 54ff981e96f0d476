//! Additive keyword relevance score in ⟨0..1⟩.

pub const BASE_SCORE: f32 = 0.30;
pub const DOMAIN_WEIGHT: f32 = 0.10;
pub const GLOBAL_WEIGHT: f32 = 0.05;
pub const HUB_PHRASE_WEIGHT: f32 = 0.15;
pub const TAG_BONUS: f32 = 0.10;

pub const DOMAIN_TERMS: &[&str] = &[
    "supply chain",
    "logistics",
    "shipping",
    "freight",
    "transport",
    "manufacturing",
    "production",
    "materials",
    "commodity",
    "trade",
    "tariff",
    "port",
    "warehouse",
    "airport",
    "rail",
    "hub",
    "congestion",
    "infrastructure",
];

pub const GLOBAL_TERMS: &[&str] = &["global", "international", "worldwide", "major", "significant"];

pub const HUB_PHRASES: &[&str] = &[
    "port congestion",
    "airport delays",
    "rail strike",
    "hub disruption",
    "infrastructure failure",
];

pub const BONUS_TAGS: &[&str] = &["business", "technology"];

/// Score plus the terms that contributed to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub score: f32,
    pub matched: Vec<String>,
}

/// Sum weighted keyword hits over `corpus` (already lowercase) and clamp.
/// `extra_terms` are additional domain terms at the domain weight.
pub fn relevance_score(corpus: &str, tags: &[String], extra_terms: &[String]) -> ScoreBreakdown {
    let mut score = BASE_SCORE;
    let mut matched = Vec::new();

    let extra = extra_terms.iter().map(String::as_str);
    for term in DOMAIN_TERMS.iter().copied().chain(extra) {
        if corpus.contains(term) {
            score += DOMAIN_WEIGHT;
            matched.push(term.to_string());
        }
    }
    for term in GLOBAL_TERMS {
        if corpus.contains(term) {
            score += GLOBAL_WEIGHT;
            matched.push(term.to_string());
        }
    }
    for phrase in HUB_PHRASES {
        if corpus.contains(phrase) {
            score += HUB_PHRASE_WEIGHT;
            matched.push(phrase.to_string());
        }
    }
    if tags.iter().any(|t| BONUS_TAGS.contains(&t.as_str())) {
        score += TAG_BONUS;
        matched.push("tag:business_or_technology".into());
    }

    ScoreBreakdown {
        score: score.clamp(0.0, 1.0),
        matched,
    }
}
