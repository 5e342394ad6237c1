//! Driver: launches Firefox windows wired to the automation extension.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::browser::{Window, WindowBuilder};
use crate::error::{Error, Result};
use crate::identifiers::{SessionId, TabId};
use crate::transport::PendingServer;

use super::assets;
use super::builder::DriverBuilder;
use super::options::FirefoxOptions;
use super::profile::{ExtensionSource, Profile};

// ============================================================================
// Types
// ============================================================================

struct DriverInner {
    binary: PathBuf,
    extension: ExtensionSource,
}

// ============================================================================
// Driver
// ============================================================================

/// Factory for Firefox windows.
///
/// Each spawned [`Window`] gets its own temporary profile, its own loopback
/// WebSocket server and its own Firefox process.
///
/// ```no_run
/// use product_scraper::Driver;
///
/// # async fn example() -> product_scraper::Result<()> {
/// let driver = Driver::builder().extension("./extension").build()?;
/// let window = driver.window().headless().window_size(1920, 1080).spawn().await?;
/// window.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Driver {
    inner: Arc<DriverInner>,
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("binary", &self.inner.binary)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Driver - Public API
// ============================================================================

impl Driver {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> DriverBuilder {
        DriverBuilder::new()
    }

    /// Starts configuring a new window.
    #[inline]
    #[must_use]
    pub fn window(&self) -> WindowBuilder<'_> {
        WindowBuilder::new(self)
    }

    /// Returns the Firefox executable path.
    #[inline]
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.inner.binary
    }
}

// ============================================================================
// Driver - Internal API
// ============================================================================

impl Driver {
    pub(crate) fn new(binary: PathBuf, extension: ExtensionSource) -> Self {
        Self {
            inner: Arc::new(DriverInner { binary, extension }),
        }
    }

    /// Launches Firefox and waits for the extension to connect back.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] for invalid options
    /// - [`Error::Profile`] if the profile or extension cannot be prepared
    /// - [`Error::ProcessLaunchFailed`] if Firefox cannot be started
    /// - Connection errors if the extension never completes READY
    pub(crate) async fn spawn_window(&self, options: FirefoxOptions) -> Result<Window> {
        options.validate()?;

        let profile = Profile::new_temp()?;
        profile.install_extension(&self.inner.extension)?;
        profile.write_prefs(&Profile::scraping_prefs())?;

        let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await?;
        let port = server.port();
        let session_id = SessionId::next();
        let data_uri = assets::build_init_data_uri(&server.ws_url(), &session_id);

        let child = self.spawn_firefox_process(&profile, &options, &data_uri)?;
        info!(pid = child.id(), %session_id, port, "Firefox process spawned");

        // The child is kill_on_drop, so an early return here tears it down.
        let (connection, ready) = server.accept().await?;

        if ready.session_id != session_id.as_u32() {
            warn!(
                expected = %session_id,
                received = ready.session_id,
                "READY carried an unexpected session id"
            );
        }

        let tab_id = TabId::new(ready.tab_id)
            .ok_or_else(|| Error::protocol("Invalid tabId in READY message"))?;

        debug!(%session_id, %tab_id, "Window connected");

        Ok(Window::new(connection, child, profile, port, session_id, tab_id))
    }

    fn spawn_firefox_process(
        &self,
        profile: &Profile,
        options: &FirefoxOptions,
        data_uri: &str,
    ) -> Result<Child> {
        let mut cmd = Command::new(&self.inner.binary);

        cmd.arg("--profile")
            .arg(profile.path())
            .arg("--no-remote")
            .arg("--new-instance")
            .args(options.to_args())
            .arg(data_uri)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        cmd.spawn().map_err(Error::process_launch_failed)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_is_clone_and_debug() {
        fn assert_traits<T: Clone + fmt::Debug>() {}
        assert_traits::<Driver>();
    }

    #[tokio::test]
    async fn test_spawn_rejects_invalid_options_before_launch() {
        let driver = Driver::new(
            PathBuf::from("/nonexistent/firefox"),
            ExtensionSource::base64("UEsDBBQ="),
        );

        let err = driver
            .spawn_window(FirefoxOptions::new().with_window_size(0, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_spawn_reports_unlaunchable_binary() {
        let extension = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            extension.path().join("manifest.json"),
            r#"{"browser_specific_settings": {"gecko": {"id": "a@b"}}}"#,
        )
        .expect("write manifest");

        let driver = Driver::new(
            PathBuf::from("/nonexistent/firefox"),
            ExtensionSource::unpacked(extension.path()),
        );

        let err = driver.spawn_window(FirefoxOptions::new()).await.unwrap_err();
        assert!(matches!(err, Error::ProcessLaunchFailed { .. }));
    }
}
