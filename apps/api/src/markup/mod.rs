#![allow(dead_code)]

//! SEO markup utilities — schema.org JSON-LD builders, llms.txt rendering,
//! and the small markdown/slug helpers the content pipeline needs.
//!
//! All pure. Builders return `serde_json::Value` ready to embed in a page
//! head or persist alongside content. Absent optional fields are omitted
//! from the output object, never serialized as null.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ────────────────────────────────────────────────────────────────────────────
// schema.org builders
// ────────────────────────────────────────────────────────────────────────────

/// Inputs for an Article schema object.
#[derive(Debug, Clone)]
pub struct ArticleParams<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub url: &'a str,
    /// ISO-8601.
    pub date_published: &'a str,
    /// Defaults to `date_published` when absent.
    pub date_modified: Option<&'a str>,
    pub author_name: &'a str,
    pub author_url: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

/// Builds an `Article` JSON-LD object.
pub fn article_schema(params: &ArticleParams<'_>) -> Value {
    let mut author = json!({
        "@type": "Person",
        "name": params.author_name,
    });
    if let Some(url) = params.author_url {
        author["url"] = json!(url);
    }

    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": params.title,
        "description": params.description,
        "url": params.url,
        "datePublished": params.date_published,
        "dateModified": params.date_modified.unwrap_or(params.date_published),
        "author": author,
    });
    if let Some(image) = params.image_url {
        schema["image"] = json!(image);
    }
    schema
}

/// One step of a HowTo schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HowToStep {
    pub name: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Builds a `HowTo` JSON-LD object. Steps carry 1-based positions.
pub fn how_to_schema(
    name: &str,
    description: &str,
    steps: &[HowToStep],
    total_time: Option<&str>,
) -> Value {
    let step_objects: Vec<Value> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let mut obj = json!({
                "@type": "HowToStep",
                "position": i + 1,
                "name": step.name,
                "text": step.text,
            });
            if let Some(image) = &step.image {
                obj["image"] = json!(image);
            }
            obj
        })
        .collect();

    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": "HowTo",
        "name": name,
        "description": description,
        "step": step_objects,
    });
    if let Some(time) = total_time {
        schema["totalTime"] = json!(time);
    }
    schema
}

/// One question/answer pair for an FAQPage schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// Builds an `FAQPage` JSON-LD object.
pub fn faq_schema(questions: &[FaqItem]) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": questions.iter().map(|qa| json!({
            "@type": "Question",
            "name": qa.question,
            "acceptedAnswer": {
                "@type": "Answer",
                "text": qa.answer,
            }
        })).collect::<Vec<_>>(),
    })
}

/// Offer details for a Product schema.
#[derive(Debug, Clone)]
pub struct ProductOffer<'a> {
    pub price: f64,
    pub currency: &'a str,
    /// schema.org availability URL, e.g. "https://schema.org/InStock".
    pub availability: &'a str,
}

/// Aggregate rating for a Product schema.
#[derive(Debug, Clone, Copy)]
pub struct AggregateRating {
    pub rating_value: f64,
    pub review_count: u64,
}

/// Builds a `Product` JSON-LD object. The rating block is omitted entirely
/// when absent.
pub fn product_schema(
    name: &str,
    description: &str,
    image_url: &str,
    offer: &ProductOffer<'_>,
    rating: Option<AggregateRating>,
) -> Value {
    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": "Product",
        "name": name,
        "description": description,
        "image": image_url,
        "offers": {
            "@type": "Offer",
            "price": offer.price,
            "priceCurrency": offer.currency,
            "availability": offer.availability,
        },
    });
    if let Some(r) = rating {
        schema["aggregateRating"] = json!({
            "@type": "AggregateRating",
            "ratingValue": r.rating_value,
            "reviewCount": r.review_count,
        });
    }
    schema
}

// ────────────────────────────────────────────────────────────────────────────
// llms.txt
// ────────────────────────────────────────────────────────────────────────────

/// One entry in the llms.txt main-pages listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmsTxtPage {
    pub title: String,
    pub url: String,
    pub description: String,
}

/// Renders an llms.txt document for a site.
pub fn llms_txt(
    site_name: &str,
    description: &str,
    main_pages: &[LlmsTxtPage],
    api_docs: Option<&str>,
    contact_email: Option<&str>,
) -> String {
    let mut out = format!("# {site_name}\n\n> {description}\n\n## Main Pages\n\n");
    for page in main_pages {
        out.push_str(&format!(
            "- [{}]({}): {}\n",
            page.title, page.url, page.description
        ));
    }
    if let Some(docs) = api_docs {
        out.push_str(&format!("\n## API Documentation\n\n{docs}\n"));
    }
    if let Some(email) = contact_email {
        out.push_str(&format!("\n## Contact\n\nEmail: {email}\n"));
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Markdown / slug helpers
// ────────────────────────────────────────────────────────────────────────────

/// URL slug from a title: lowercase, alphanumeric runs joined by single
/// hyphens, no leading or trailing hyphen.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// First `#` heading of a markdown document.
pub fn extract_title(markdown: &str) -> Option<String> {
    markdown.lines().find_map(|line| {
        let trimmed = line.trim_start();
        trimmed
            .strip_prefix("# ")
            .map(|rest| rest.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// Extracts `Step N` headings (`## Step 1: …` / `### Step 2 …`) as HowTo
/// steps, in document order.
pub fn extract_how_to_steps(markdown: &str) -> Vec<HowToStep> {
    markdown
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            let heading = trimmed
                .strip_prefix("### ")
                .or_else(|| trimmed.strip_prefix("## "))?;
            let rest = heading.strip_prefix("Step ").or_else(|| heading.strip_prefix("step "))?;
            // Require a step number, then trim the "N:" prefix off the name
            let after_number = rest.trim_start_matches(|c: char| c.is_ascii_digit());
            if after_number.len() == rest.len() {
                return None;
            }
            let name = after_number.trim_start_matches(':').trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some(HowToStep {
                text: name.clone(),
                name,
                image: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_schema_core_fields() {
        let schema = article_schema(&ArticleParams {
            title: "How to Brew Coffee",
            description: "A practical brewing guide",
            url: "https://example.com/blog/how-to-brew-coffee",
            date_published: "2026-08-08T10:00:00Z",
            date_modified: None,
            author_name: "RankForge AI",
            author_url: Some("https://rankforge.app"),
            image_url: None,
        });
        assert_eq!(schema["@type"], "Article");
        assert_eq!(schema["headline"], "How to Brew Coffee");
        assert_eq!(schema["dateModified"], schema["datePublished"]);
        assert_eq!(schema["author"]["name"], "RankForge AI");
        assert!(schema.get("image").is_none(), "absent image must be omitted");
    }

    #[test]
    fn test_how_to_schema_positions_are_one_based() {
        let steps = vec![
            HowToStep { name: "Grind".into(), text: "Grind the beans".into(), image: None },
            HowToStep { name: "Pour".into(), text: "Pour the water".into(), image: None },
        ];
        let schema = how_to_schema("Brew", "Brewing", &steps, Some("PT10M"));
        assert_eq!(schema["step"][0]["position"], 1);
        assert_eq!(schema["step"][1]["position"], 2);
        assert_eq!(schema["totalTime"], "PT10M");
    }

    #[test]
    fn test_faq_schema_wraps_answers() {
        let schema = faq_schema(&[FaqItem {
            question: "Is it free?".into(),
            answer: "There is a free tier.".into(),
        }]);
        assert_eq!(schema["@type"], "FAQPage");
        assert_eq!(schema["mainEntity"][0]["acceptedAnswer"]["text"], "There is a free tier.");
    }

    #[test]
    fn test_product_schema_omits_absent_rating() {
        let offer = ProductOffer { price: 29.0, currency: "USD", availability: "https://schema.org/InStock" };
        let without = product_schema("Starter", "Entry plan", "https://example.com/img.png", &offer, None);
        assert!(without.get("aggregateRating").is_none());

        let with = product_schema(
            "Starter",
            "Entry plan",
            "https://example.com/img.png",
            &offer,
            Some(AggregateRating { rating_value: 4.6, review_count: 212 }),
        );
        assert_eq!(with["aggregateRating"]["reviewCount"], 212);
        assert_eq!(with["offers"]["priceCurrency"], "USD");
    }

    #[test]
    fn test_llms_txt_lists_pages_and_optional_sections() {
        let pages = vec![LlmsTxtPage {
            title: "Home".into(),
            url: "https://example.com".into(),
            description: "Homepage".into(),
        }];
        let txt = llms_txt("Example", "An example site", &pages, None, Some("hi@example.com"));
        assert!(txt.starts_with("# Example\n\n> An example site"));
        assert!(txt.contains("- [Home](https://example.com): Homepage"));
        assert!(txt.contains("Email: hi@example.com"));
        assert!(!txt.contains("API Documentation"));
    }

    #[test]
    fn test_slugify_collapses_and_trims() {
        assert_eq!(slugify("How to Brew Coffee"), "how-to-brew-coffee");
        assert_eq!(slugify("  CRM — Best Picks (2026)!  "), "crm-best-picks-2026");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
    }

    #[test]
    fn test_extract_title_takes_first_h1() {
        let md = "intro text\n# Real Title\n## Section\n# Second H1";
        assert_eq!(extract_title(md), Some("Real Title".to_string()));
        assert_eq!(extract_title("no headings here"), None);
        // H2 is not a title
        assert_eq!(extract_title("## only a section"), None);
    }

    #[test]
    fn test_extract_how_to_steps_requires_numbered_step_headings() {
        let md = "\
# Brew Coffee
## Step 1: Grind the beans
text
### Step 2 Heat the water
more text
## Tips
## Stepladder usage
";
        let steps = extract_how_to_steps(md);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].name, "Grind the beans");
        assert_eq!(steps[1].name, "Heat the water");
    }

    #[test]
    fn test_extract_how_to_steps_empty_when_no_steps() {
        assert!(extract_how_to_steps("# Title\n## Overview\n").is_empty());
    }
}
