// tests/pipeline_rank.rs
use chrono::{DateTime, TimeZone, Utc};
use cockpit_news::classify::{Category, ImpactLevel};
use cockpit_news::ingest::{dedupe_articles, process, rank_articles};
use cockpit_news::{ClassifiedArticle, Classifier, NewsArticle};

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
}

fn article(id: &str, title: &str, published: Option<DateTime<Utc>>) -> NewsArticle {
    NewsArticle {
        id: id.into(),
        title: title.into(),
        description: "desc".into(),
        keywords: vec![],
        source_categories: vec![],
        source_name: "Reuters".into(),
        published_at: published,
        url: format!("https://example.com/{id}"),
    }
}

fn scored(id: &str, score: f32, published: Option<DateTime<Utc>>) -> ClassifiedArticle {
    ClassifiedArticle {
        article: article(id, id, published),
        category: Category::General,
        impact_level: ImpactLevel::Low,
        relevance_score: score,
    }
}

fn ids(v: &[ClassifiedArticle]) -> Vec<&str> {
    v.iter().map(|a| a.article.id.as_str()).collect()
}

#[test]
fn recency_wins_within_tie_band() {
    let a = scored("a", 0.82, Some(ts(1, 8)));
    let b = scored("b", 0.78, Some(ts(2, 8)));
    assert_eq!(ids(&rank_articles(vec![a.clone(), b.clone()])), vec!["b", "a"]);
    assert_eq!(ids(&rank_articles(vec![b, a])), vec!["b", "a"]);
}

#[test]
fn score_wins_outside_tie_band() {
    let a = scored("a", 0.90, Some(ts(1, 8)));
    let b = scored("b", 0.70, Some(ts(2, 8)));
    assert_eq!(ids(&rank_articles(vec![a.clone(), b.clone()])), vec!["a", "b"]);
    assert_eq!(ids(&rank_articles(vec![b, a])), vec!["a", "b"]);
}

#[test]
fn undated_articles_sort_after_dated_ties() {
    let a = scored("undated", 0.5, None);
    let b = scored("dated", 0.5, Some(ts(1, 0)));
    assert_eq!(ids(&rank_articles(vec![a, b])), vec!["dated", "undated"]);
}

#[test]
fn ranking_keeps_every_article_for_chained_ties() {
    // 0.9 ~ 0.82 ~ 0.74 pairwise within band, 0.9 vs 0.74 outside it
    let v = vec![
        scored("x", 0.74, Some(ts(3, 0))),
        scored("y", 0.82, Some(ts(2, 0))),
        scored("z", 0.90, Some(ts(1, 0))),
        scored("w", 0.30, Some(ts(4, 0))),
    ];
    let out = rank_articles(v);
    assert_eq!(out.len(), 4);
    assert_eq!(out.last().unwrap().article.id, "w");
}

#[test]
fn same_id_different_titles_keeps_one() {
    let raw = vec![
        article("nd-1", "Rotterdam strike", Some(ts(1, 0))),
        article("nd-1", "Rotterdam strike (updated)", Some(ts(1, 2))),
    ];
    let (kept, removed) = dedupe_articles(raw);
    assert_eq!(kept.len(), 1);
    assert_eq!(removed, 1);
    assert_eq!(kept[0].title, "Rotterdam strike");
}

#[test]
fn process_dedupes_filters_classifies_and_truncates() {
    let mut incomplete = article("c", "No source", Some(ts(1, 0)));
    incomplete.source_name.clear();
    let raw = vec![
        article("a", "Port congestion worsens", Some(ts(1, 0))),
        article("a", "Port congestion worsens (dup)", Some(ts(1, 1))),
        incomplete,
        article("b", "Quiet day", Some(ts(2, 0))),
        article("d", "Freight rail strike looms", Some(ts(3, 0))),
    ];

    let out = process(raw, &Classifier::new(), 2);
    assert_eq!(out.dedup, 1);
    assert_eq!(out.filtered, 1);
    assert_eq!(out.articles.len(), 2);
    // both logistics headlines outrank the quiet one
    assert!(out.articles.iter().all(|a| a.category == Category::Logistics));
}

#[test]
fn one_term_gap_is_a_tie_at_every_score_level() {
    // each pair: older article carries exactly one more domain term
    let pairs = [
        ("freight logistics", "freight", 0.5, 0.4),
        ("freight logistics shipping", "freight logistics", 0.6, 0.5),
        (
            "freight logistics shipping warehouse tariff commodity",
            "freight logistics shipping warehouse tariff",
            0.9,
            0.8,
        ),
    ];
    let cl = Classifier::new();
    for (old_title, new_title, old_score, new_score) in pairs {
        let raw = vec![
            article("old", old_title, Some(ts(1, 0))),
            article("new", new_title, Some(ts(2, 0))),
        ];
        let out = process(raw, &cl, 10);
        let (old, new) = if out.articles[0].article.id == "old" {
            (&out.articles[0], &out.articles[1])
        } else {
            (&out.articles[1], &out.articles[0])
        };
        assert!((old.relevance_score - old_score).abs() < 1e-4, "{old_title}");
        assert!((new.relevance_score - new_score).abs() < 1e-4, "{new_title}");
        assert_eq!(ids(&out.articles), vec!["new", "old"], "{old_score} vs {new_score}");
    }
}
