//! Local copies of catalog files.
//!
//! The fetch step is idempotent: files already present in the destination
//! directory (matched by name only) are never downloaded or rewritten. A
//! transport error aborts the whole step; nothing is retried and response
//! bodies are written verbatim.

use crate::catalog::{Catalog, OracleApp};
use crate::result::{HarnessError, HarnessResult};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::collections::HashSet;
use std::fmt;
use std::fs;

/// Retrieves the raw bytes behind a URL.
pub trait Transport: Send + Sync {
    /// Fetch `url`, following redirects.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Transport`] when the request cannot complete.
    fn get(&self, url: &str) -> HarnessResult<Vec<u8>>;
}

/// Blocking HTTP transport.
///
/// The status code is not inspected: an error page is returned like any other
/// body.
pub struct HttpTransport {
    client: Client,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Build a transport that follows redirects.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> HarnessResult<Self> {
        let client = Client::builder()
            .redirect(Policy::limited(10))
            .build()
            .map_err(|e| HarnessError::Transport {
                url: String::new(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> HarnessResult<Vec<u8>> {
        let transport_err = |e: reqwest::Error| HarnessError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = self.client.get(url).send().map_err(transport_err)?;
        tracing::debug!(url, status = %response.status(), "download response");
        let body = response.bytes().map_err(transport_err)?;
        Ok(body.to_vec())
    }
}

/// Outcome of a fetch step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Apps whose file was downloaded
    pub downloaded: Vec<OracleApp>,
    /// Apps whose file was already present
    pub skipped: Vec<OracleApp>,
}

impl FetchReport {
    /// Whether nothing had to be downloaded
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.downloaded.is_empty()
    }
}

/// Ensures every catalog file exists locally.
pub struct Fetcher<'a> {
    transport: &'a dyn Transport,
}

impl fmt::Debug for Fetcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher").finish_non_exhaustive()
    }
}

impl<'a> Fetcher<'a> {
    /// Create a fetcher over a transport
    #[must_use]
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Download every catalog file missing from the catalog's directory.
    ///
    /// The directory listing is taken once, before any download.
    ///
    /// # Errors
    ///
    /// Returns the first I/O or transport error; files written before the
    /// failure are kept.
    pub fn ensure_local_copies(&self, catalog: &Catalog) -> HarnessResult<FetchReport> {
        let dir = catalog.dir();
        fs::create_dir_all(dir)?;

        let existing = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<Result<HashSet<_>, _>>()?;

        let mut report = FetchReport::default();
        for entry in catalog.iter() {
            if existing.contains(entry.file_name()) {
                report.skipped.push(entry.app);
                continue;
            }

            tracing::info!(app = %entry.app, url = %entry.url, "downloading");
            let body = self.transport.get(&entry.url)?;
            fs::write(&entry.local_path, &body)?;
            tracing::debug!(path = %entry.local_path.display(), bytes = body.len(), "saved");
            report.downloaded.push(entry.app);
        }

        tracing::info!(
            downloaded = report.downloaded.len(),
            skipped = report.skipped.len(),
            dir = %dir.display(),
            "local copies ready"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Transport that records requested URLs and answers with a fixed body.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingTransport {
        pub(crate) requests: Mutex<Vec<String>>,
        pub(crate) fail_on: Option<String>,
    }

    impl RecordingTransport {
        pub(crate) fn count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl Transport for RecordingTransport {
        fn get(&self, url: &str) -> HarnessResult<Vec<u8>> {
            self.requests.lock().unwrap().push(url.to_string());
            if self.fail_on.as_deref().is_some_and(|f| url.contains(f)) {
                return Err(HarnessError::Transport {
                    url: url.to_string(),
                    message: "refused".to_string(),
                });
            }
            Ok(format!("body of {url}").into_bytes())
        }
    }

    fn setup() -> (TempDir, Catalog) {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::load(dir.path()).unwrap();
        (dir, catalog)
    }

    #[test]
    fn test_empty_dir_downloads_everything() {
        let (_dir, catalog) = setup();
        let transport = RecordingTransport::default();

        let report = Fetcher::new(&transport)
            .ensure_local_copies(&catalog)
            .unwrap();

        assert_eq!(transport.count(), catalog.len());
        assert_eq!(report.downloaded.len(), catalog.len());
        assert!(report.skipped.is_empty());
        let entry = catalog.entry(OracleApp::Button);
        let body = fs::read_to_string(&entry.local_path).unwrap();
        assert_eq!(body, format!("body of {}", entry.url));
    }

    #[test]
    fn test_second_run_issues_no_requests() {
        let (_dir, catalog) = setup();
        let transport = RecordingTransport::default();
        let fetcher = Fetcher::new(&transport);

        fetcher.ensure_local_copies(&catalog).unwrap();
        let first = transport.count();
        let report = fetcher.ensure_local_copies(&catalog).unwrap();

        assert_eq!(transport.count(), first);
        assert!(report.is_up_to_date());
        assert_eq!(report.skipped.len(), catalog.len());
    }

    #[test]
    fn test_only_missing_files_are_downloaded() {
        let (_dir, catalog) = setup();
        let present = [OracleApp::Button, OracleApp::FileChooser, OracleApp::Tree];
        for app in present {
            fs::write(&catalog.entry(app).local_path, b"cached").unwrap();
        }
        let transport = RecordingTransport::default();

        let report = Fetcher::new(&transport)
            .ensure_local_copies(&catalog)
            .unwrap();

        assert_eq!(transport.count(), catalog.len() - present.len());
        assert_eq!(report.skipped, present.to_vec());
        for app in present {
            assert_eq!(fs::read(&catalog.entry(app).local_path).unwrap(), b"cached");
        }
    }

    #[test]
    fn test_creates_missing_directory() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("nested").join("jnlps");
        let catalog = Catalog::load(&dir).unwrap();
        let transport = RecordingTransport::default();

        Fetcher::new(&transport)
            .ensure_local_copies(&catalog)
            .unwrap();

        assert!(dir.is_dir());
    }

    #[test]
    fn test_writes_and_lists_catalog_dir() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("apps");
        let catalog = Catalog::load(&dir).unwrap();
        let transport = RecordingTransport::default();
        let fetcher = Fetcher::new(&transport);

        fetcher.ensure_local_copies(&catalog).unwrap();
        let report = fetcher.ensure_local_copies(&catalog).unwrap();

        assert_eq!(transport.count(), catalog.len());
        assert!(report.is_up_to_date());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), catalog.len());
        // Nothing lands next to the catalog directory.
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_transport_error_aborts() {
        let (_dir, catalog) = setup();
        let transport = RecordingTransport {
            fail_on: Some("DialogDemo".to_string()),
            ..RecordingTransport::default()
        };

        let err = Fetcher::new(&transport)
            .ensure_local_copies(&catalog)
            .expect_err("dialog download fails");

        assert!(matches!(err, HarnessError::Transport { .. }));
        // Button, CheckBox, ColorChooser, ComboBox, then Dialog fails.
        assert_eq!(transport.count(), 5);
        assert!(catalog.entry(OracleApp::ComboBox).local_path.exists());
        assert!(!catalog.entry(OracleApp::Dialog).local_path.exists());
    }

    #[test]
    fn test_zero_byte_file_counts_as_present() {
        let (_dir, catalog) = setup();
        fs::write(&catalog.entry(OracleApp::Label).local_path, b"").unwrap();
        let transport = RecordingTransport::default();

        let report = Fetcher::new(&transport)
            .ensure_local_copies(&catalog)
            .unwrap();

        assert!(report.skipped.contains(&OracleApp::Label));
    }
}
