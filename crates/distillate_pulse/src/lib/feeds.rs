//! # Feed parsing
//!
//! Turns RSS 2.0 and Atom documents into normalized entries the ingestion
//! stage can persist, keeping document order (feeds list newest first).

use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::error::Error;

/// A normalized feed entry, whichever dialect it came from.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    /// Feed-declared identifier, when the feed carries one.
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub published: Option<DateTime<Utc>>,
    /// First enclosure with an audio media type.
    pub audio_enclosure: Option<String>,
}

/// Parses an RSS 2.0 or Atom document into normalized entries.
pub fn parse_feed(body: &str) -> Result<Vec<FeedEntry>, Error> {
    if let Ok(rss) = from_str::<Rss>(body) {
        return Ok(rss
            .channel
            .items
            .into_iter()
            .map(FeedEntry::from_rss)
            .collect());
    }

    if let Ok(atom) = from_str::<AtomFeed>(body) {
        if !atom.entries.is_empty() {
            return Ok(atom
                .entries
                .into_iter()
                .map(FeedEntry::from_atom)
                .collect());
        }
    }

    Err(Error::ParseError("Document is neither RSS 2.0 nor Atom"))
}

fn parse_feed_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl FeedEntry {
    fn from_rss(item: RssItem) -> Self {
        let audio_enclosure = item
            .enclosures
            .into_iter()
            .find(|e| e.mime_type.as_deref().unwrap_or_default().contains("audio"))
            .and_then(|e| e.url);

        FeedEntry {
            id: item.guid.and_then(|g| g.value),
            title: item.title,
            link: item.link,
            summary: item.description,
            published: item.pub_date.as_deref().and_then(parse_feed_timestamp),
            audio_enclosure,
        }
    }

    fn from_atom(entry: AtomEntry) -> Self {
        let link = entry
            .links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .and_then(|l| l.href.clone());
        let audio_enclosure = entry
            .links
            .iter()
            .find(|l| {
                l.rel.as_deref() == Some("enclosure")
                    && l.mime_type.as_deref().unwrap_or_default().contains("audio")
            })
            .and_then(|l| l.href.clone());
        let published = entry
            .published
            .or(entry.updated)
            .as_deref()
            .and_then(parse_feed_timestamp);

        FeedEntry {
            id: entry.id,
            title: entry.title.and_then(|t| t.value),
            link,
            summary: entry
                .summary
                .and_then(|s| s.value)
                .or(entry.content.and_then(|c| c.value)),
            published,
            audio_enclosure,
        }
    }
}

/// Element with text content, tolerating attributes like `isPermaLink` or
/// `type` on the tag.
#[derive(Debug, Deserialize)]
struct XmlText {
    #[serde(rename = "$text")]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    guid: Option<XmlText>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    #[serde(rename = "enclosure", default)]
    enclosures: Vec<RssEnclosure>,
}

#[derive(Debug, Deserialize)]
struct RssEnclosure {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "@type")]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    id: Option<String>,
    title: Option<XmlText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    updated: Option<String>,
    published: Option<String>,
    summary: Option<XmlText>,
    content: Option<XmlText>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@rel")]
    rel: Option<String>,
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@type")]
    mime_type: Option<String>,
}
