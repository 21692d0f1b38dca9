//! Namespace naming and the install-time manifest.

use reqwest::Url;

use super::error::FetchError;
use super::request::{Destination, Request};

/// Critical resources pre-cached at install time. Relative entries resolve
/// against the site origin.
const DEFAULT_MANIFEST: &[&str] = &[
    "/",
    "/src/assets/financial3.jpg",
    "/logo.png",
    "https://fonts.googleapis.com/css2?family=Playfair+Display:wght@400;500;600;700;800;900&family=Open+Sans:wght@300;400;500;600;700&display=swap&subset=latin",
    "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700;800&display=swap&subset=latin",
];

/// The two namespaces owned by one deployed version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheNames {
    /// Documents, scripts, styles and JSON.
    pub primary: String,
    /// Images and fonts.
    pub static_assets: String,
}

impl CacheNames {
    pub fn new(app_name: &str, version: u32) -> Self {
        Self {
            primary: format!("{}-v{}", app_name, version),
            static_assets: format!("{}-static-v{}", app_name, version),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        name == self.primary || name == self.static_assets
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub entries: Vec<String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            entries: DEFAULT_MANIFEST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Manifest {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Resolve every entry to a GET request. Entries that cannot be resolved
    /// are returned as errors next to their original text.
    pub fn requests(&self, origin: &Url) -> Vec<(String, Result<Request, FetchError>)> {
        self.entries
            .iter()
            .map(|entry| {
                let request = origin
                    .join(entry)
                    .map_err(|e| FetchError::InvalidRequest(format!("{}: {}", entry, e)))
                    .and_then(|url| Request::get(url.as_str()))
                    .map(|request| request.with_destination(guess_destination(entry)));
                (entry.clone(), request)
            })
            .collect()
    }
}

fn guess_destination(entry: &str) -> Destination {
    if entry == "/" {
        Destination::Document
    } else if entry.contains("fonts.googleapis.com") {
        Destination::Style
    } else {
        Destination::Unspecified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_names_embed_version() {
        let names = CacheNames::new("aadhaar-capital", 1);
        assert_eq!(names.primary, "aadhaar-capital-v1");
        assert_eq!(names.static_assets, "aadhaar-capital-static-v1");
        assert!(names.contains("aadhaar-capital-v1"));
        assert!(!names.contains("aadhaar-capital-v0"));
    }

    #[test]
    fn test_manifest_resolves_against_origin() {
        let origin = Url::parse("https://aadhaarcapital.com").unwrap();
        let requests = Manifest::default().requests(&origin);
        assert_eq!(requests.len(), 5);

        let urls: Vec<String> = requests
            .iter()
            .map(|(_, r)| r.as_ref().unwrap().url.to_string())
            .collect();
        assert_eq!(urls[0], "https://aadhaarcapital.com/");
        assert_eq!(urls[1], "https://aadhaarcapital.com/src/assets/financial3.jpg");
        assert!(urls[3].starts_with("https://fonts.googleapis.com/css2?family=Playfair"));
        assert_eq!(requests[0].1.as_ref().unwrap().destination, Destination::Document);
    }
}
