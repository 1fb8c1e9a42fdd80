use feed_digester::parser::FeedDocument;

const RSS_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example News</title>
    <item>
      <title><![CDATA[Coping with change]]></title>
      <link>https://news.example/coping</link>
      <pubDate>Wed, 01 May 2024 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Guid only entry</title>
      <guid isPermaLink="false">https://news.example/guid-only</guid>
    </item>
    <item>
      <title></title>
      <link>https://news.example/untitled</link>
    </item>
  </channel>
</rss>"#;

const ATOM_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Blog</title>
  <entry>
    <title type="text">Mindful mornings</title>
    <link rel="alternate" href="https://blog.example/mindful"/>
    <id>urn:uuid:1</id>
    <published>2024-05-02T08:00:00Z</published>
    <updated>2024-05-03T08:00:00Z</updated>
  </entry>
  <entry>
    <title>Id fallback entry</title>
    <id>https://blog.example/id-fallback</id>
    <updated>2024-05-01T08:00:00Z</updated>
  </entry>
</feed>"#;

#[test]
fn rss_items_extract_title_link_and_date() {
    let doc = FeedDocument::parse(RSS_FIXTURE).expect("parse rss");
    assert!(matches!(doc, FeedDocument::Rss(_)));

    let items = doc.into_items("https://news.example/rss.xml");
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].title, "Coping with change");
    assert_eq!(items[0].link, "https://news.example/coping");
    assert_eq!(
        items[0].published_at.as_deref(),
        Some("Wed, 01 May 2024 10:00:00 GMT")
    );
    assert_eq!(items[0].source, "Example News");

    // Missing link falls back to the guid; missing pubDate stays None.
    assert_eq!(items[1].link, "https://news.example/guid-only");
    assert_eq!(items[1].published_at, None);
}

#[test]
fn atom_entries_extract_href_and_published() {
    let doc = FeedDocument::parse(ATOM_FIXTURE).expect("parse atom");
    assert!(matches!(doc, FeedDocument::Atom(_)));

    let items = doc.into_items("https://blog.example/atom.xml");
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].title, "Mindful mornings");
    assert_eq!(items[0].link, "https://blog.example/mindful");
    assert_eq!(items[0].published_at.as_deref(), Some("2024-05-02T08:00:00Z"));
    assert_eq!(items[0].source, "Example Blog");

    // No link element: the id stands in; published absent, updated used.
    assert_eq!(items[1].link, "https://blog.example/id-fallback");
    assert_eq!(items[1].published_at.as_deref(), Some("2024-05-01T08:00:00Z"));
}

#[test]
fn source_falls_back_to_hostname_without_channel_title() {
    let xml = r#"<rss version="2.0"><channel>
        <item><title>T</title><link>https://host.example/t</link></item>
    </channel></rss>"#;
    let items = FeedDocument::parse(xml)
        .expect("parse")
        .into_items("https://host.example/feed.xml");
    assert_eq!(items[0].source, "host.example");
}

#[test]
fn channel_without_items_is_empty() {
    let xml = r#"<rss version="2.0"><channel><title>Empty</title></channel></rss>"#;
    let items = FeedDocument::parse(xml)
        .expect("parse")
        .into_items("https://host.example/feed.xml");
    assert!(items.is_empty());
}

#[test]
fn malformed_body_is_an_error() {
    assert!(FeedDocument::parse("this is not xml <at all").is_err());
}
