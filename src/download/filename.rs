//! Filename resolution for downloaded images.
//!
//! A local name is derived from the last path segment of the image URL (plus
//! its query, if any). When that name lacks a known image extension, the
//! subtype of an `image/*` content type is appended. Long names are cut down
//! before the extension so the result always fits in a single path segment,
//! and it is then sanitised.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use sha2::{Digest, Sha256};
use url::Url;

use super::constants::{
    IMAGE_EXTENSIONS, MAX_EXTENSION_BYTES, MAX_STEM_BYTES, PLACEHOLDER_PREFIX,
};

/// A sanitised file name, safe to join onto the download folder.
///
/// Never empty, never `.` or `..`, at most
/// `MAX_STEM_BYTES + 1 + MAX_EXTENSION_BYTES` bytes long, and free of path
/// separators and the characters rejected by common filesystems.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedFilename(String);

impl ResolvedFilename {
    /// Returns the file name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for ResolvedFilename {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// Computes the local filename for an image URL.
///
/// `content_type` is the declared media type of the image, from a probe or
/// from the GET response. It is only consulted when the URL itself does not
/// end in one of the known image extensions.
///
/// # Example
///
/// ```
/// use imgfetch_core::download::resolve_filename;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/img?id=5").unwrap();
/// assert_eq!(resolve_filename(&url, Some("image/png")).as_str(), "img_id=5.png");
/// ```
#[must_use]
pub fn resolve_filename(image_url: &Url, content_type: Option<&str>) -> ResolvedFilename {
    let candidate = candidate_from_url(image_url);
    let name = if candidate.is_empty() || candidate == "." || candidate == ".." {
        placeholder_name(image_url)
    } else {
        candidate
    };

    let (stem, extension) = if has_image_extension(&name)
        && let Some((stem, extension)) = name.rsplit_once('.')
    {
        (stem.to_string(), Some(extension.to_string()))
    } else {
        (name, content_type.and_then(image_subtype))
    };

    let mut resolved = truncate_to_bytes(stem, MAX_STEM_BYTES);
    if let Some(extension) = extension {
        resolved.push('.');
        resolved.push_str(&truncate_to_bytes(extension, MAX_EXTENSION_BYTES));
    }

    ResolvedFilename(sanitize_filename(&resolved))
}

/// Returns true when [`resolve_filename`] would use a content type for this URL.
#[must_use]
pub fn needs_content_type(image_url: &Url) -> bool {
    !has_image_extension(&candidate_from_url(image_url))
}

/// Last path segment (percent-decoded when valid UTF-8) followed by `?query`.
pub(crate) fn candidate_from_url(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    let mut candidate = urlencoding::decode(segment).map_or_else(
        |_| segment.to_string(),
        Cow::into_owned,
    );
    if let Some(query) = url.query() {
        candidate.push('?');
        candidate.push_str(query);
    }
    candidate
}

/// Substring after the last `.`, unless that dot is the first or last character.
pub(crate) fn extension_of(candidate: &str) -> Option<&str> {
    let dot = candidate.rfind('.')?;
    if dot == 0 || dot + 1 == candidate.len() {
        return None;
    }
    Some(&candidate[dot + 1..])
}

pub(crate) fn has_image_extension(candidate: &str) -> bool {
    extension_of(candidate).is_some_and(|ext| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    })
}

/// Subtype of an `image/*` content type, lowercased and without parameters.
pub(crate) fn image_subtype(content_type: &str) -> Option<String> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    let subtype = mime.strip_prefix("image/")?.trim();
    (!subtype.is_empty()).then(|| subtype.to_string())
}

/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Cuts `s` to at most `max` bytes without splitting a character.
fn truncate_to_bytes(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}

/// `image_` followed by the first 16 hex digits of the URL's SHA-256.
fn placeholder_name(url: &Url) -> String {
    let digest = Sha256::digest(url.as_str().as_bytes());
    let hex: String = digest[..8].iter().map(|byte| format!("{byte:02x}")).collect();
    format!("{PLACEHOLDER_PREFIX}{hex}")
}
