use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::headline::HeadlineRecord;
use crate::ingest::types::HeadlineSource;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

fn parse_rfc2822(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(ts.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse an RSS 2.0 document into headline records attributed to `source_name`.
///
/// Items without a usable title are dropped; missing or invalid `pubDate`
/// falls back to now. At most `max_items` records are returned.
pub fn parse_rss(xml: &str, source_name: &str, max_items: usize) -> Result<Vec<HeadlineRecord>> {
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean).context("parsing rss xml")?;

    let mut out = Vec::with_capacity(rss.channel.item.len().min(max_items));
    for it in rss.channel.item {
        if out.len() >= max_items {
            break;
        }
        let published = it.pub_date.as_deref().and_then(parse_rfc2822);
        let Ok(mut rec) =
            HeadlineRecord::new(it.title.as_deref().unwrap_or_default(), source_name, published)
        else {
            continue;
        };
        if let Some(link) = it.link {
            rec = rec.with_url(link.trim());
        }
        if let Some(desc) = it.description {
            rec = rec.with_description(desc);
        }
        out.push(rec);
    }
    Ok(out)
}

/// One outlet's feed document captured in memory, served for a single region.
pub struct RssSnapshot {
    source_name: String,
    region: String,
    xml: String,
    max_items: usize,
}

impl RssSnapshot {
    pub fn from_fixture(source_name: &str, region: &str, xml: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            region: region.trim().to_ascii_uppercase(),
            xml: xml.to_string(),
            max_items: usize::MAX,
        }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }
}

#[async_trait]
impl HeadlineSource for RssSnapshot {
    async fn fetch_region(&self, region: &str) -> Result<Vec<HeadlineRecord>> {
        if !region.trim().eq_ignore_ascii_case(&self.region) {
            return Ok(Vec::new());
        }
        parse_rss(&self.xml, &self.source_name, self.max_items)
            .with_context(|| format!("feed of {}", self.source_name))
    }

    fn name(&self) -> &'static str {
        "rss-snapshot"
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
