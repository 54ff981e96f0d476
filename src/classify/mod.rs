//! Article relevance classifier: category, impact level and relevance score.
//!
//! Pure function of the article text and provider tags. The only state is the
//! static list of extra domain terms taken from configuration.

pub mod rules;
pub mod scoring;

use serde::Serialize;

pub use crate::classify::rules::{assign_category, assign_impact, Category, ImpactLevel};
pub use crate::classify::scoring::{relevance_score, ScoreBreakdown};

/// Result of classifying one article.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub category: Category,
    pub impact_level: ImpactLevel,
    pub relevance_score: f32,
    /// Scoring terms that fired (diagnostics only).
    pub matched: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    extra_domain_terms: Vec<String>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra company/industry terms scored at the domain weight.
    /// Lowercased, trimmed, deduplicated; built-in domain terms are skipped.
    pub fn with_extra_domain_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for t in terms {
            let t = t.as_ref().trim().to_lowercase();
            if t.is_empty() || scoring::DOMAIN_TERMS.contains(&t.as_str()) || out.contains(&t) {
                continue;
            }
            out.push(t);
        }
        Self {
            extra_domain_terms: out,
        }
    }

    pub fn extra_domain_terms(&self) -> &[String] {
        &self.extra_domain_terms
    }

    pub fn classify(
        &self,
        title: &str,
        description: &str,
        keywords: &str,
        source_categories: &[String],
    ) -> Classification {
        let corpus = build_corpus(title, description, keywords);
        let tags = fold_tags(source_categories);

        let category = assign_category(&corpus, &tags);
        let impact_level = assign_impact(&corpus);
        let ScoreBreakdown { score, matched } =
            relevance_score(&corpus, &tags, &self.extra_domain_terms);

        Classification {
            category,
            impact_level,
            relevance_score: score,
            matched,
        }
    }
}

/// Classify with the built-in term lists only.
pub fn classify(
    title: &str,
    description: &str,
    keywords: &str,
    source_categories: &[String],
) -> Classification {
    Classifier::new().classify(title, description, keywords, source_categories)
}

fn build_corpus(title: &str, description: &str, keywords: &str) -> String {
    format!("{title} {description} {keywords}").to_lowercase()
}

fn fold_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
