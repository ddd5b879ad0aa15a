//! # Aldi Price Lookup Module
//!
//! Fetches the current price of a can of Karlskrone from the Aldi Nord
//! product page. The page embeds the article data as JSON inside the
//! `data-article` attribute of the `ArticleIntro` component; the price sits
//! at `productInfo.priceWithTax`.
//!
//! Every failure mode (network, page-structure drift, missing field) is a
//! single error to the caller; the conversion engine decides whether to
//! degrade or propagate.

use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

const KARLSKRONE_ARTICLE_URL: &str =
    "https://www.aldi-nord.de/sortiment/getraenke/bier/pilsener-0313-1-1.article.html";

lazy_static! {
    static ref ARTICLE_INTRO_TAG: Regex = Regex::new(r#"<[^>]*data-t-name="ArticleIntro"[^>]*>"#)
        .expect("article intro pattern should be valid");
    static ref DATA_ARTICLE_ATTR: Regex =
        Regex::new(r#"data-article="([^"]*)""#).expect("data-article pattern should be valid");
}

/// Fetch the current Karlskrone price in euros
pub async fn fetch_karlskrone_price(client: &reqwest::Client) -> Result<f64> {
    let response = client
        .get(KARLSKRONE_ARTICLE_URL)
        .send()
        .await?
        .error_for_status()?;
    let body = response.text().await?;

    let price = extract_price(&body)?;
    debug!(price, "Fetched current Karlskrone price");

    Ok(price)
}

/// Pull the price out of the article page HTML
fn extract_price(body: &str) -> Result<f64> {
    let tag = ARTICLE_INTRO_TAG
        .find(body)
        .context("article intro component not found in page")?;
    let attribute = DATA_ARTICLE_ATTR
        .captures(tag.as_str())
        .and_then(|capture| capture.get(1))
        .context("data-article attribute not found on article intro")?;

    let payload = decode_entities(attribute.as_str());
    let article: serde_json::Value =
        serde_json::from_str(&payload).context("article data is not valid JSON")?;

    match &article["productInfo"]["priceWithTax"] {
        serde_json::Value::Number(price) => price
            .as_f64()
            .ok_or_else(|| anyhow!("price is not representable as a float")),
        serde_json::Value::String(price) => price
            .parse()
            .with_context(|| format!("price `{}` is not a float", price)),
        _ => Err(anyhow!("priceWithTax missing from article data")),
    }
}

/// Decode the entity escapes the attribute serialization uses
fn decode_entities(payload: &str) -> String {
    payload
        .replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
