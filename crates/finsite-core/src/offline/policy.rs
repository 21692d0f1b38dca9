//! Per-request routing: which strategy (if any) handles a request.

use reqwest::Method;

use super::request::{Destination, Request};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "avif"];
const FONT_EXTENSIONS: &[&str] = &["woff", "woff2", "ttf", "eot"];
const STATIC_EXTENSIONS: &[&str] = &["css", "js", "json"];

/// Hosts serving web-font stylesheets and font files.
const FONT_HOSTS: &[&str] = &["fonts.googleapis.com", "fonts.gstatic.com"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Not intercepted: non-GET or non-HTTP(S).
    PassThrough,
    Image,
    Font,
    StaticAsset,
    Page,
}

/// Lowercased extension of the URL's last path segment.
fn extension(request: &Request) -> Option<String> {
    let segment = request.url.path_segments()?.next_back()?;
    let (_, ext) = segment.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

fn has_extension(ext: Option<&str>, candidates: &[&str]) -> bool {
    ext.map(|e| candidates.contains(&e)).unwrap_or(false)
}

/// Classify a request. Checks run in order: image, font, static asset, page.
pub fn classify(request: &Request) -> Route {
    if request.method != Method::GET {
        return Route::PassThrough;
    }
    if !matches!(request.url.scheme(), "http" | "https") {
        return Route::PassThrough;
    }

    let ext = extension(request);
    let ext = ext.as_deref();

    if request.destination == Destination::Image || has_extension(ext, IMAGE_EXTENSIONS) {
        Route::Image
    } else if request.destination == Destination::Font
        || has_extension(ext, FONT_EXTENSIONS)
        || request
            .url
            .host_str()
            .map(|host| FONT_HOSTS.contains(&host))
            .unwrap_or(false)
    {
        Route::Font
    } else if has_extension(ext, STATIC_EXTENSIONS) {
        Route::StaticAsset
    } else {
        Route::Page
    }
}
