//! Content transformation for article HTML
//!
//! Two distinct operations that historical drafts of this proxy diverged on,
//! kept separate rather than conflated:
//!
//! - [`rewrite_all_images`] rewrites every inline `img` `src` so the bytes
//!   route back through the proxy's `/image` endpoint. It works by
//!   text-level substitution so all surrounding markup survives
//!   byte-for-byte; parsing and re-serializing the document would not give
//!   that guarantee.
//! - [`extract_featured_image`] picks one representative image for a page
//!   from its `og:image` metadata, falling back to the magazine's
//!   `.photowrap` container.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::{Html, Selector};

/// Matches an `img` tag's `src` attribute: everything up to and including
/// `src=` in group 1, the quoted value in group 2 (double) or 3 (single).
/// `src` must follow whitespace so `data-src` and friends are left alone.
static IMG_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(<img\s(?:[^>]*?\s)?src\s*=\s*)(?:"([^"]*)"|'([^']*)')"#)
        .expect("static regex")
});

static OG_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:image"]"#).expect("static selector"));

static PHOTOWRAP_IMG: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".photowrap img").expect("static selector"));

/// Rewrite every `img` `src` to `<proxy_base>/image?url=<encoded original>`
///
/// Tags without a `src` attribute and all other markup pass through
/// unchanged. The original URL is percent-encoded so reserved characters
/// round-trip through the query parameter.
pub fn rewrite_all_images(html: &str, proxy_base: &str) -> String {
    let base = proxy_base.trim_end_matches('/');
    IMG_SRC
        .replace_all(html, |caps: &Captures<'_>| {
            let prefix = &caps[1];
            let (quote, original) = match caps.get(2) {
                Some(m) => ('"', m.as_str()),
                None => ('\'', caps.get(3).map_or("", |m| m.as_str())),
            };
            let encoded = urlencoding::encode(original);
            format!("{prefix}{quote}{base}/image?url={encoded}{quote}")
        })
        .into_owned()
}

/// Extract the page's featured image URL
///
/// Prefers the `og:image` meta content; falls back to the `src` of the
/// first image inside a `.photowrap` container. Returns `None` when the
/// page offers neither (callers serve a null value, never an error).
pub fn extract_featured_image(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    if let Some(content) = document
        .select(&OG_IMAGE)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .filter(|content| !content.is_empty())
    {
        return Some(content.to_string());
    }

    document
        .select(&PHOTOWRAP_IMG)
        .next()
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:3000";

    #[test]
    fn rewrites_a_single_image() {
        let out = rewrite_all_images(r#"<img src="http://a/b.jpg">"#, BASE);
        assert_eq!(
            out,
            r#"<img src="http://localhost:3000/image?url=http%3A%2F%2Fa%2Fb.jpg">"#
        );
    }

    #[test]
    fn preserves_other_attributes_and_markup() {
        let html = r#"<p>before</p><img class="wide" src="http://a/b.jpg" alt="cover"><p>after</p>"#;
        let out = rewrite_all_images(html, BASE);
        assert_eq!(
            out,
            r#"<p>before</p><img class="wide" src="http://localhost:3000/image?url=http%3A%2F%2Fa%2Fb.jpg" alt="cover"><p>after</p>"#
        );
    }

    #[test]
    fn leaves_img_without_src_unchanged() {
        let html = r#"<img alt="x">"#;
        assert_eq!(rewrite_all_images(html, BASE), html);
    }

    #[test]
    fn rewrites_every_image() {
        let html = r#"<img src="http://a/1.jpg"><img src="http://a/2.jpg">"#;
        let out = rewrite_all_images(html, BASE);
        assert_eq!(out.matches("/image?url=").count(), 2);
        assert!(out.contains("http%3A%2F%2Fa%2F1.jpg"));
        assert!(out.contains("http%3A%2F%2Fa%2F2.jpg"));
    }

    #[test]
    fn handles_single_quoted_src() {
        let out = rewrite_all_images(r#"<img src='http://a/b.jpg'>"#, BASE);
        assert_eq!(
            out,
            r#"<img src='http://localhost:3000/image?url=http%3A%2F%2Fa%2Fb.jpg'>"#
        );
    }

    #[test]
    fn percent_encodes_reserved_characters() {
        let out = rewrite_all_images(r#"<img src="http://a/b.jpg?w=100&h=50">"#, BASE);
        assert!(out.contains("url=http%3A%2F%2Fa%2Fb.jpg%3Fw%3D100%26h%3D50"));
        // Round-trip: decoding the parameter recovers the original URL
        let encoded = out
            .split("url=")
            .nth(1)
            .unwrap()
            .trim_end_matches("\">");
        assert_eq!(
            urlencoding::decode(encoded).unwrap(),
            "http://a/b.jpg?w=100&h=50"
        );
    }

    #[test]
    fn does_not_touch_data_src() {
        let html = r#"<img data-src="http://a/lazy.jpg" alt="x">"#;
        assert_eq!(rewrite_all_images(html, BASE), html);
    }

    #[test]
    fn trailing_slash_on_base_is_normalized() {
        let out = rewrite_all_images(r#"<img src="http://a/b.jpg">"#, "http://p/");
        assert!(out.contains(r#"src="http://p/image?url="#));
    }

    #[test]
    fn no_images_means_no_changes() {
        let html = "<html><body><p>text only</p></body></html>";
        assert_eq!(rewrite_all_images(html, BASE), html);
    }

    #[test]
    fn featured_image_prefers_og_image() {
        let html = r#"<html><head>
            <meta property="og:image" content="http://x/y.jpg">
            </head><body>
            <div class="photowrap"><img src="http://x/z.jpg"></div>
            </body></html>"#;
        assert_eq!(
            extract_featured_image(html).as_deref(),
            Some("http://x/y.jpg")
        );
    }

    #[test]
    fn featured_image_falls_back_to_photowrap() {
        let html = r#"<html><body>
            <div class="photowrap"><img src="http://x/z.jpg"></div>
            </body></html>"#;
        assert_eq!(
            extract_featured_image(html).as_deref(),
            Some("http://x/z.jpg")
        );
    }

    #[test]
    fn featured_image_none_when_absent() {
        assert_eq!(extract_featured_image("<html><body></body></html>"), None);
    }

    #[test]
    fn empty_og_content_falls_through() {
        let html = r#"<html><head><meta property="og:image" content=""></head>
            <body><div class="photowrap"><img src="http://x/z.jpg"></div></body></html>"#;
        assert_eq!(
            extract_featured_image(html).as_deref(),
            Some("http://x/z.jpg")
        );
    }

    #[test]
    fn img_outside_photowrap_is_ignored() {
        let html = r#"<html><body><img src="http://x/banner.jpg"></body></html>"#;
        assert_eq!(extract_featured_image(html), None);
    }
}
