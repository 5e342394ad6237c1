//! Run input: which product pages to visit.
//!
//! ```json
//! { "urls": [ { "url": "https://shop.example/product/chair" } ] }
//! ```
//!
//! Entries may carry extra keys (request metadata from whoever produced the
//! file); only `url` is read.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::error::{Error, Result};

/// One start URL entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartUrl {
    pub url: String,
}

/// Parsed input document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInput {
    #[serde(default)]
    pub urls: Vec<StartUrl>,
}

impl RunInput {
    /// Reads an input document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, [`Error::Input`] if
    /// it is not a valid input document.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|e| match e {
            Error::Input { message } => Error::input(format!("{}: {message}", path.display())),
            other => other,
        })
    }

    /// Parses an input document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Input`] if `json` is not a valid input document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::input(e.to_string()))
    }

    /// Appends URLs given outside the document, e.g. on the command line.
    #[must_use]
    pub fn with_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls
            .extend(urls.into_iter().map(|url| StartUrl { url: url.into() }));
        self
    }

    /// Valid http(s) start URLs in input order.
    ///
    /// Anything else is logged and skipped.
    #[must_use]
    pub fn start_urls(&self) -> Vec<Url> {
        self.urls
            .iter()
            .filter_map(|entry| match parse_start_url(&entry.url) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(url = %entry.url, error = %e, "Skipping start URL");
                    None
                }
            })
            .collect()
    }
}

fn parse_start_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::input(format!("unsupported scheme {scheme:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_document_with_extra_keys() {
        let input = RunInput::from_json(
            r#"{"urls": [
                {"url": "https://shop.test/product/a", "method": "GET"},
                {"url": "https://shop.test/product/b"}
            ]}"#,
        )
        .expect("parse");

        let urls: Vec<String> = input.start_urls().iter().map(Url::to_string).collect();
        assert_eq!(urls, ["https://shop.test/product/a", "https://shop.test/product/b"]);
    }

    #[test]
    fn test_invalid_urls_are_skipped() {
        let input = RunInput::default().with_urls([
            "not a url",
            "ftp://shop.test/file",
            " https://shop.test/product/a ",
        ]);

        let urls = input.start_urls();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].as_str(), "https://shop.test/product/a");
    }

    #[test]
    fn test_missing_urls_key_is_empty() {
        let input = RunInput::from_json("{}").expect("parse");
        assert!(input.start_urls().is_empty());
    }

    #[test]
    fn test_malformed_document_is_input_error() {
        let err = RunInput::from_json(r#"{"urls": "https://shop.test"}"#).unwrap_err();
        assert!(matches!(err, Error::Input { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("input.json");
        fs::write(&path, r#"{"urls": [{"url": "https://shop.test/p"}]}"#).expect("write");

        let input = RunInput::from_file(&path).expect("read");
        assert_eq!(input.urls.len(), 1);

        assert!(matches!(
            RunInput::from_file(dir.path().join("nope.json")).unwrap_err(),
            Error::Io(_)
        ));
    }
}
