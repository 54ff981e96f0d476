//! Ordered keyword rules for category and impact assignment.
//!
//! Both tables are evaluated top to bottom against the lowercase corpus
//! (`title description keywords`); the first rule that matches decides the
//! label. Category rules may additionally fire on provider tags.
//!
//! Several category rules fall back to the `business` tag. Only the first of
//! them can ever win on that tag alone, so a bare `business` article is
//! always Logistics. Keep the order stable.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Geopolitical,
    Logistics,
    Manufacturing,
    Trade,
    Materials,
    Infrastructure,
    General,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Geopolitical => "Geopolitical",
            Category::Logistics => "Logistics",
            Category::Manufacturing => "Manufacturing",
            Category::Trade => "Trade",
            Category::Materials => "Materials",
            Category::Infrastructure => "Infrastructure",
            Category::General => "General",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImpactLevel::Low => "Low",
            ImpactLevel::Medium => "Medium",
            ImpactLevel::High => "High",
            ImpactLevel::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// One category predicate: any keyword in the corpus or any tag in the tag set.
#[derive(Debug)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
    pub tags: &'static [&'static str],
}

impl CategoryRule {
    fn matches(&self, corpus: &str, tags: &[String]) -> bool {
        any_contains(corpus, self.keywords)
            || tags.iter().any(|t| self.tags.contains(&t.as_str()))
    }
}

pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Geopolitical,
        keywords: &[
            "geopolitical",
            "war",
            "sanctions",
            "middle east",
            "china",
            "russia",
            "iran",
            "israel",
        ],
        tags: &["politics", "world"],
    },
    CategoryRule {
        category: Category::Logistics,
        keywords: &[
            "shipping",
            "logistics",
            "freight",
            "transport",
            "port",
            "red sea",
            "suez",
            "airport",
            "rail",
            "hub",
            "supply chain",
        ],
        tags: &["business"],
    },
    CategoryRule {
        category: Category::Manufacturing,
        keywords: &["manufacturing", "factory", "production", "industrial"],
        tags: &["business", "technology"],
    },
    CategoryRule {
        category: Category::Trade,
        keywords: &["tariff", "trade", "import", "export", "customs"],
        tags: &["business", "finance"],
    },
    CategoryRule {
        category: Category::Materials,
        keywords: &[
            "material",
            "commodity",
            "price",
            "cobalt",
            "tungsten",
            "steel",
            "rare earth",
            "mining",
        ],
        tags: &["business"],
    },
    CategoryRule {
        category: Category::Infrastructure,
        keywords: &["infrastructure", "congestion", "strike", "closure"],
        tags: &["general"],
    },
];

pub const IMPACT_RULES: &[(ImpactLevel, &[&str])] = &[
    (
        ImpactLevel::Critical,
        &[
            "crisis",
            "critical",
            "severe",
            "major disruption",
            "emergency",
            "closure",
            "suspended",
            "shutdown",
        ],
    ),
    (
        ImpactLevel::High,
        &[
            "disruption",
            "shortage",
            "delay",
            "increase",
            "volatility",
            "congestion",
            "strike",
            "surge",
        ],
    ),
    (
        ImpactLevel::Medium,
        &["concern", "risk", "challenge", "impact", "warning"],
    ),
];

/// First matching category rule, General otherwise.
pub fn assign_category(corpus: &str, tags: &[String]) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|r| r.matches(corpus, tags))
        .map(|r| r.category)
        .unwrap_or(Category::General)
}

/// First matching impact tier, Low otherwise.
pub fn assign_impact(corpus: &str) -> ImpactLevel {
    IMPACT_RULES
        .iter()
        .find(|(_, kws)| any_contains(corpus, kws))
        .map(|(lvl, _)| *lvl)
        .unwrap_or(ImpactLevel::Low)
}

pub(crate) fn any_contains(corpus: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| corpus.contains(n))
}
