use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::types::{FeedItem, PipelineError, Result};

/// Element whose text content may sit beside attributes, e.g.
/// `<title type="html">…</title>` or `<guid isPermaLink="false">…</guid>`.
#[derive(Debug, Default, Deserialize)]
struct TextNode {
    #[serde(rename = "$text")]
    value: Option<String>,
}

impl TextNode {
    fn text(&self) -> Option<&str> {
        self.value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct RssDocument {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    title: Option<TextNode>,
    #[serde(default, rename = "item")]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<TextNode>,
    link: Option<String>,
    guid: Option<TextNode>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AtomFeed {
    title: Option<TextNode>,
    #[serde(default, rename = "entry")]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<TextNode>,
    #[serde(default, rename = "link")]
    links: Vec<AtomLink>,
    id: Option<TextNode>,
    published: Option<String>,
    updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

/// One fetched document, resolved to its concrete shape exactly once.
#[derive(Debug)]
pub enum FeedDocument {
    Rss(RssDocument),
    Atom(AtomFeed),
}

impl FeedDocument {
    /// Best-effort shape resolution: try the RSS layout first, then Atom.
    pub fn parse(body: &str) -> Result<Self> {
        if let Ok(rss) = from_str::<RssDocument>(body) {
            return Ok(FeedDocument::Rss(rss));
        }
        match from_str::<AtomFeed>(body) {
            Ok(feed) => Ok(FeedDocument::Atom(feed)),
            Err(e) => Err(PipelineError::Parse(e.to_string())),
        }
    }

    /// Flatten the document into canonical feed items. `feed_url` supplies
    /// the source fallback when the channel/feed carries no title.
    pub fn into_items(self, feed_url: &str) -> Vec<FeedItem> {
        match self {
            FeedDocument::Rss(doc) => extract_rss(doc, feed_url),
            FeedDocument::Atom(feed) => extract_atom(feed, feed_url),
        }
    }
}

fn source_name(title: Option<&str>, feed_url: &str) -> String {
    if let Some(title) = title {
        return title.to_string();
    }
    Url::parse(feed_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| feed_url.to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn extract_rss(doc: RssDocument, feed_url: &str) -> Vec<FeedItem> {
    let channel = doc.channel;
    let source = source_name(channel.title.as_ref().and_then(TextNode::text), feed_url);

    let mut items = Vec::with_capacity(channel.items.len());
    for item in channel.items {
        let title = item
            .title
            .as_ref()
            .and_then(TextNode::text)
            .map(str::to_string)
            .unwrap_or_default();
        // The guid stands in for a missing or empty link.
        let link = non_empty(item.link.as_deref())
            .or_else(|| item.guid.as_ref().and_then(TextNode::text))
            .map(str::to_string)
            .unwrap_or_default();
        if title.is_empty() || link.is_empty() {
            debug!(source = %source, "dropping item without title or link");
            continue;
        }
        let published_at = non_empty(item.pub_date.as_deref()).map(str::to_string);
        items.push(FeedItem {
            title,
            link,
            published_at,
            source: source.clone(),
        });
    }
    items
}

fn link_href(link: &AtomLink) -> Option<&str> {
    non_empty(link.href.as_deref())
}

fn pick_link(links: &[AtomLink]) -> Option<&str> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .and_then(link_href)
        .or_else(|| links.iter().find_map(link_href))
}

fn extract_atom(feed: AtomFeed, feed_url: &str) -> Vec<FeedItem> {
    let source = source_name(feed.title.as_ref().and_then(TextNode::text), feed_url);

    let mut items = Vec::with_capacity(feed.entries.len());
    for entry in feed.entries {
        let title = entry
            .title
            .as_ref()
            .and_then(TextNode::text)
            .map(str::to_string)
            .unwrap_or_default();
        // The entry id stands in for a missing link element.
        let link = pick_link(&entry.links)
            .or_else(|| entry.id.as_ref().and_then(TextNode::text))
            .map(str::to_string)
            .unwrap_or_default();
        if title.is_empty() || link.is_empty() {
            debug!(source = %source, "dropping entry without title or link");
            continue;
        }
        let published_at = [entry.published.as_deref(), entry.updated.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string);
        items.push(FeedItem {
            title,
            link,
            published_at,
            source: source.clone(),
        });
    }
    items
}
