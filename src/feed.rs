//! RSS feed parsing into the item shape served to clients
//!
//! The `/feed` endpoint serves parsed items rather than raw XML: title,
//! link, categories, and the item content with HTML kept intact. Items
//! without `content:encoded` fall back to their `description`, then to an
//! empty string.

use serde::{Deserialize, Serialize};

/// One entry of the parsed feed, as serialized into the `/feed` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub categories: Vec<String>,
    /// Item body HTML; `content:encoded` if present, else `description`
    pub content: String,
}

/// Parse raw feed XML into the items served to clients
///
/// # Errors
/// Returns the underlying parse error when the text is not a valid RSS
/// channel; handlers treat that the same as an upstream fetch failure.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedItem>, rss::Error> {
    let channel = rss::Channel::read_from(xml.as_bytes())?;

    let items = channel
        .items()
        .iter()
        .map(|item| FeedItem {
            title: item.title().unwrap_or_default().to_string(),
            link: item.link().unwrap_or_default().to_string(),
            categories: item
                .categories()
                .iter()
                .map(|category| category.name().to_string())
                .collect(),
            content: item
                .content()
                .or_else(|| item.description())
                .unwrap_or_default()
                .to_string(),
        })
        .collect();

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_xml(items: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Grant Magazine</title>
    <link>https://grantmagazine.com</link>
    <description>Student magazine</description>
    {items}
  </channel>
</rss>"#
        )
    }

    #[test]
    fn parses_title_link_and_categories() {
        let xml = feed_xml(
            r#"<item>
                 <title>First Story</title>
                 <link>https://grantmagazine.com/first</link>
                 <category>News</category>
                 <category>Features</category>
                 <description>Short teaser</description>
               </item>"#,
        );

        let items = parse_feed(&xml).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "First Story");
        assert_eq!(items[0].link, "https://grantmagazine.com/first");
        assert_eq!(items[0].categories, vec!["News", "Features"]);
        assert_eq!(items[0].content, "Short teaser");
    }

    #[test]
    fn content_encoded_wins_over_description() {
        let xml = feed_xml(
            r#"<item>
                 <title>Story</title>
                 <link>https://grantmagazine.com/story</link>
                 <description>teaser</description>
                 <content:encoded><![CDATA[<p>Full <b>body</b></p>]]></content:encoded>
               </item>"#,
        );

        let items = parse_feed(&xml).unwrap();
        assert_eq!(items[0].content, "<p>Full <b>body</b></p>");
    }

    #[test]
    fn missing_fields_become_empty() {
        let xml = feed_xml("<item></item>");

        let items = parse_feed(&xml).unwrap();
        assert_eq!(items[0].title, "");
        assert_eq!(items[0].link, "");
        assert!(items[0].categories.is_empty());
        assert_eq!(items[0].content, "");
    }

    #[test]
    fn empty_channel_yields_no_items() {
        let items = parse_feed(&feed_xml("")).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn garbage_input_is_an_error() {
        assert!(parse_feed("this is not xml").is_err());
    }
}
