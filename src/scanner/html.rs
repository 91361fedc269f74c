//! Image discovery in parsed HTML.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::ImageReference;

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("img[src]"));
static BASE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("base[href]"));

#[allow(clippy::expect_used)]
fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static CSS selector")
}

/// Extracts the absolute URL of every `<img src>` in document order.
///
/// Relative sources resolve against the document's `<base href>` when one is
/// present, otherwise against `page_url`. Sources that cannot be resolved are
/// logged and skipped.
///
/// # Example
///
/// ```
/// use imgfetch_core::scanner::extract_image_urls;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/gallery/").unwrap();
/// let images = extract_image_urls(r#"<img src="a.png"><img alt="no src">"#, &page);
/// assert_eq!(images.len(), 1);
/// assert_eq!(images[0].as_str(), "https://example.com/gallery/a.png");
/// ```
#[must_use]
pub fn extract_image_urls(html: &str, page_url: &Url) -> Vec<ImageReference> {
    let document = Html::parse_document(html);
    let base = document_base(&document, page_url);

    document
        .select(&IMG_SELECTOR)
        .filter_map(|img| {
            let src = img.value().attr("src")?.trim();
            match base.join(src) {
                Ok(url) => Some(ImageReference::new(url)),
                Err(e) => {
                    warn!(src, error = %e, "skipping unresolvable image source");
                    None
                }
            }
        })
        .collect()
}

fn document_base(document: &Html, page_url: &Url) -> Url {
    let Some(href) = document
        .select(&BASE_SELECTOR)
        .next()
        .and_then(|base| base.value().attr("href"))
    else {
        return page_url.clone();
    };

    match page_url.join(href.trim()) {
        Ok(base) => {
            debug!(base = %base, "using document base URL");
            base
        }
        Err(e) => {
            warn!(href, error = %e, "ignoring unresolvable <base href>");
            page_url.clone()
        }
    }
}

/// Whether a declared content type can be parsed as a markup document.
///
/// A missing content type is accepted, as are `text/*`, `application/xml`
/// and any `+xml` type.
pub(crate) fn is_markup_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return true;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime.is_empty()
        || mime.starts_with("text/")
        || mime == "application/xml"
        || mime.ends_with("+xml")
}
