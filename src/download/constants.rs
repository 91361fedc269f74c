//! Constants for the download module (timeouts, filename rules).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large images).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Image extensions accepted from the URL without a content-type lookup.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "raw", "jp2", "svg", "psd", "eps", "heif",
];

/// Prefix for names generated when the URL has no usable path segment.
pub const PLACEHOLDER_PREFIX: &str = "image_";

/// Upper bound, in bytes, for the part of a filename before its extension.
pub const MAX_STEM_BYTES: usize = 200;

/// Upper bound, in bytes, for an extension taken from a content type.
pub const MAX_EXTENSION_BYTES: usize = 32;
