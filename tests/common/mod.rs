//! Shared fixtures for integration tests

use chrono::{DateTime, Utc};

/// One RSS item for [`rss_feed`]
pub struct RssItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: Option<DateTime<Utc>>,
}

impl RssItem {
    pub fn new(title: &str, description: &str, pub_date: Option<DateTime<Utc>>) -> Self {
        Self {
            title: title.to_string(),
            link: format!("https://example.com/news/{}", title.replace(' ', "-")),
            description: description.to_string(),
            pub_date,
        }
    }
}

/// Render a minimal RSS 2.0 document.
pub fn rss_feed(channel_title: &str, items: &[RssItem]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\"><channel>\n",
    );
    xml.push_str(&format!("<title>{channel_title}</title>\n"));
    xml.push_str("<link>https://example.com</link>\n");
    xml.push_str("<description>test feed</description>\n");

    for item in items {
        xml.push_str("<item>\n");
        xml.push_str(&format!("<title>{}</title>\n", item.title));
        xml.push_str(&format!("<link>{}</link>\n", item.link));
        xml.push_str(&format!(
            "<description><![CDATA[{}]]></description>\n",
            item.description
        ));
        if let Some(date) = item.pub_date {
            xml.push_str(&format!("<pubDate>{}</pubDate>\n", date.to_rfc2822()));
        }
        xml.push_str(&format!("<guid>{}</guid>\n", item.link));
        xml.push_str("</item>\n");
    }

    xml.push_str("</channel></rss>\n");
    xml
}
