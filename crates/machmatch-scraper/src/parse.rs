//! Regex-based extraction of exhibitor listings from directory HTML.
//!
//! The directory markup is not stable enough to warrant a full DOM parser:
//! listings are block elements whose class names contain recognizable
//! markers, with the company name in the first heading or anchor.

use std::sync::LazyLock;

use regex::Regex;

use machmatch_core::{Provider, Tier};

static CATEGORY_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<(?:div|article)\b[^>]*class="[^"]*(?:exhibitor|company|profile)[^"]*"[^>]*>(.*?)</(?:div|article)>"#,
    )
    .expect("valid category block regex")
});
static DIRECTORY_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<(?:li|div)\b[^>]*class="[^"]*(?:company|exhibitor|entry)[^"]*"[^>]*>(.*?)</(?:li|div)>"#,
    )
    .expect("valid directory block regex")
});
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:h2|h3|a|span)\b[^>]*>(.*?)</(?:h2|h3|a|span)>")
        .expect("valid name regex")
});
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*href="([^"]+)""#).expect("valid href regex")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tag regex"));
static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|nav|footer)\b.*?</(script|style|nav|footer)>")
        .expect("valid script regex")
});

/// Extracts exhibitor listings from a category search page.
///
/// `base_url` resolves relative profile links. Blocks with no readable name
/// are skipped.
#[must_use]
pub fn parse_category_listing(html: &str, base_url: &str) -> Vec<Provider> {
    extract_listings(&CATEGORY_BLOCK_RE, html, base_url)
}

/// Extracts exhibitor listings from an alphabetical directory page.
#[must_use]
pub fn parse_directory_listing(html: &str, base_url: &str) -> Vec<Provider> {
    extract_listings(&DIRECTORY_BLOCK_RE, html, base_url)
}

fn extract_listings(block_re: &Regex, html: &str, base_url: &str) -> Vec<Provider> {
    let mut providers = Vec::new();
    for block in block_re.captures_iter(html) {
        let body = &block[1];
        let Some(name) = NAME_RE
            .captures(body)
            .map(|c| inner_text(&c[1]))
            .filter(|n| !n.is_empty())
        else {
            continue;
        };
        let url = HREF_RE
            .captures(body)
            .map(|c| resolve_url(base_url, &c[1]));
        providers.push(Provider {
            name,
            country: String::new(),
            tier: Tier::default(),
            url,
            hall: None,
            stand: None,
            products: Vec::new(),
            specialty: None,
        });
    }
    providers
}

/// Reduces an HTML document to plain text for brand scanning: drops
/// script/style/nav/footer blocks, strips the remaining tags, and collapses
/// whitespace.
#[must_use]
pub fn strip_html_text(html: &str) -> String {
    let without_blocks = SCRIPT_RE.replace_all(html, " ");
    let without_tags = TAG_RE.replace_all(&without_blocks, " ");
    let decoded = without_tags
        .replace("&amp;", "&")
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn inner_text(fragment: &str) -> String {
    strip_html_text(fragment)
}

/// Joins a possibly-relative `href` against the page URL. A href that does
/// not resolve is kept verbatim rather than dropped.
fn resolve_url(base_url: &str, href: &str) -> String {
    match reqwest::Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
