//! # Channel scraping and transcripts
//!
//! Extraction of recent video ids from a channel listing page, watch-page
//! metadata recovery, and transcript retrieval via the page's caption track.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;

use crate::{error::Error, fetcher::Fetcher};

pub const WATCH_BASE_URL: &str = "https://www.youtube.com/watch";

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""videoId":"([^"]+)""#).unwrap());
static PUBLISH_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""publishDate":"([^"]+)""#).unwrap());
static META_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta name="title" content="([^"]*)""#).unwrap());
static CAPTION_TRACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""captionTracks":\[\{"baseUrl":"([^"]+)""#).unwrap());

/// Extracts up to `limit` recent video ids from a channel listing page,
/// deduplicated while preserving first-seen order (the platform lists most
/// recent first).
pub fn extract_video_ids(html: &str, limit: usize) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for caps in VIDEO_ID_RE.captures_iter(html) {
        let id = caps[1].to_string();
        if !ids.contains(&id) {
            ids.push(id);
            if ids.len() == limit {
                break;
            }
        }
    }
    ids
}

/// Human title from the watch page, if present.
pub fn extract_title(html: &str) -> Option<String> {
    META_TITLE_RE
        .captures(html)
        .map(|caps| html_escape::decode_html_entities(&caps[1]).into_owned())
        .filter(|title| !title.is_empty())
}

/// Publish timestamp from the watch page's player payload. The value is a
/// bare date on older pages and a full RFC 3339 timestamp on newer ones.
pub fn extract_publish_date(html: &str) -> Option<DateTime<Utc>> {
    let raw = PUBLISH_DATE_RE.captures(html).map(|caps| caps[1].to_string())?;

    DateTime::parse_from_rfc3339(&raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

/// Caption-track URL from the watch page's player payload. The URL arrives
/// with JSON-escaped ampersands.
pub fn extract_caption_url(html: &str) -> Option<String> {
    CAPTION_TRACK_RE
        .captures(html)
        .map(|caps| caps[1].replace(r"\u0026", "&"))
}

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(rename = "text", default)]
    segments: Vec<TimedTextSegment>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSegment {
    #[serde(rename = "$text")]
    body: Option<String>,
}

/// Joins a timedtext XML document's segments into one transcript string.
pub fn join_transcript(xml: &str) -> Result<String, Error> {
    let timed: TimedText = from_str(xml)?;

    let joined = timed
        .segments
        .into_iter()
        .filter_map(|segment| segment.body)
        .map(|body| html_escape::decode_html_entities(&body).into_owned())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(joined.trim().to_string())
}

/// Fetches and joins the transcript advertised by a watch page.
pub async fn fetch_transcript<F>(fetcher: &F, watch_html: &str) -> anyhow::Result<String>
where
    F: Fetcher + Sync,
{
    let caption_url = extract_caption_url(watch_html)
        .ok_or_else(|| anyhow::anyhow!("No caption track on watch page"))?;

    let xml = fetcher.fetch_text(&caption_url).await?;

    Ok(join_transcript(&xml)?)
}
