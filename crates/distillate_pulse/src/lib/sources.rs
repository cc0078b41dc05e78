//! The source registry: a static list of feed and channel descriptors handed
//! to the ingestion stage at construction.

/// What a registry entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Feed,
    VideoChannel,
}

/// One feed or video-channel descriptor.
#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub endpoint: String,
    pub kind: SourceKind,
    /// When set, ingestion fetches the linked page and replaces the feed
    /// blurb with extracted article text. Off for abstract feeds whose
    /// entry body already is the article.
    pub full_text: bool,
}

impl Source {
    pub fn feed(name: &str, endpoint: &str) -> Self {
        Source {
            name: name.into(),
            endpoint: endpoint.into(),
            kind: SourceKind::Feed,
            full_text: true,
        }
    }

    pub fn abstract_feed(name: &str, endpoint: &str) -> Self {
        Source {
            full_text: false,
            ..Source::feed(name, endpoint)
        }
    }

    pub fn video_channel(name: &str, endpoint: &str) -> Self {
        Source {
            name: name.into(),
            endpoint: endpoint.into(),
            kind: SourceKind::VideoChannel,
            full_text: false,
        }
    }
}

/// The source whose most recent item is always represented in the next
/// report within the freshness window.
pub const LIVE_BRIEFING_SOURCE: &str = "The AI Daily Brief";

/// The production registry.
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::feed(
            "TechCrunch AI",
            "https://techcrunch.com/category/artificial-intelligence/feed/",
        ),
        Source::feed("VentureBeat AI", "https://venturebeat.com/category/ai/feed/"),
        Source::feed(
            "AI News",
            "https://www.artificialintelligence-news.com/feed/",
        ),
        Source::feed(
            "The Verge AI",
            "https://www.theverge.com/rss/artificial-intelligence/index.xml",
        ),
        Source::feed("Wired AI", "https://www.wired.com/feed/tag/ai/latest/rss"),
        Source::feed(
            "Ars Technica",
            "https://feeds.arstechnica.com/arstechnica/technology-lab",
        ),
        Source::feed("OpenAI Blog", "https://openai.com/blog/rss.xml"),
        Source::feed(
            "Google Research",
            "https://blog.research.google/feeds/posts/default?alt=rss",
        ),
        Source::feed("BAIR", "https://bair.berkeley.edu/blog/feed.xml"),
        Source::feed(
            "AWS ML",
            "https://aws.amazon.com/blogs/machine-learning/feed/",
        ),
        Source::feed("NVIDIA AI", "https://blogs.nvidia.com/feed/"),
        Source::feed(
            "Microsoft Research",
            "https://www.microsoft.com/en-us/research/feed/",
        ),
        Source::abstract_feed("ArXiv (cs.AI)", "http://export.arxiv.org/rss/cs.AI"),
        Source::abstract_feed("ArXiv (cs.LG)", "http://export.arxiv.org/rss/cs.LG"),
        Source::abstract_feed("ArXiv (cs.CL)", "http://export.arxiv.org/rss/cs.CL"),
        Source::video_channel(
            LIVE_BRIEFING_SOURCE,
            "https://www.youtube.com/@AIDailyBrief/videos",
        ),
    ]
}
