//! Throwaway Firefox profiles.
//!
//! Each window gets a fresh temporary profile holding the automation
//! extension and a `user.js` that silences first-run UI, telemetry and
//! updates. The directory is removed when the [`Profile`] is dropped.

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use serde_json::Value;
use tempfile::TempDir;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{Error, Result};

// ============================================================================
// Submodules
// ============================================================================

/// Extension source variants.
pub mod extensions;

/// `user.js` preference lines.
pub mod preferences;

// ============================================================================
// Re-exports
// ============================================================================

pub use extensions::ExtensionSource;
pub use preferences::{Pref, PrefValue};

// ============================================================================
// Constants
// ============================================================================

const USER_JS_HEADER: &str = "// Generated by product-scraper\n\n";

/// Manifest pointers that may hold the Gecko add-on ID.
const GECKO_ID_POINTERS: [&str; 2] = [
    "/browser_specific_settings/gecko/id",
    "/applications/gecko/id",
];

// ============================================================================
// Profile
// ============================================================================

/// A temporary Firefox profile directory.
#[derive(Debug)]
pub struct Profile {
    dir: TempDir,
}

impl Profile {
    /// Creates an empty profile under the system temp directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] if the directory cannot be created.
    pub fn new_temp() -> Result<Self> {
        let dir = TempDir::with_prefix("product-scraper-")
            .map_err(|e| Error::profile(format!("Failed to create temp profile: {e}")))?;

        debug!(path = %dir.path().display(), "Created temporary profile");

        Ok(Self { dir })
    }

    /// Returns the profile directory.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `user.js`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] if the file cannot be written.
    pub fn write_prefs(&self, prefs: &[Pref]) -> Result<()> {
        let file_path = self.path().join("user.js");

        let mut content = String::from(USER_JS_HEADER);
        for pref in prefs {
            content.push_str(&pref.to_string());
            content.push('\n');
        }

        fs::write(&file_path, content).map_err(|e| {
            Error::profile(format!("Failed to write {}: {e}", file_path.display()))
        })?;

        debug!(pref_count = prefs.len(), "Wrote user.js");
        Ok(())
    }

    /// Preferences for an unattended scraping browser.
    #[must_use]
    pub fn scraping_prefs() -> Vec<Pref> {
        vec![
            // Extension loading
            Pref::new("xpinstall.signatures.required", false)
                .note("Load the unsigned automation extension"),
            Pref::new("extensions.autoDisableScopes", 0),
            Pref::new("extensions.webextensions.restrictedDomains", ""),
            Pref::new("security.data_uri.block_toplevel_data_uri_navigations", false)
                .note("The bootstrap page is a data: URI"),
            // Startup
            Pref::new("browser.startup.page", 0),
            Pref::new("browser.shell.checkDefaultBrowser", false),
            Pref::new("browser.startup.homepage_override.mstone", "ignore"),
            Pref::new("startup.homepage_welcome_url", ""),
            Pref::new("browser.sessionstore.resume_from_crash", false),
            Pref::new("toolkit.startup.max_resumed_crashes", -1),
            Pref::new("browser.aboutConfig.showWarning", false),
            Pref::new("browser.warnOnQuit", false),
            Pref::new("browser.tabs.warnOnClose", false),
            // Telemetry and background traffic
            Pref::new("datareporting.policy.dataSubmissionEnabled", false),
            Pref::new("datareporting.healthreport.uploadEnabled", false),
            Pref::new("toolkit.telemetry.enabled", false),
            Pref::new("toolkit.telemetry.unified", false),
            Pref::new("toolkit.telemetry.server", ""),
            Pref::new("app.normandy.enabled", false),
            Pref::new("app.update.auto", false),
            Pref::new("app.update.staging.enabled", false),
            Pref::new("extensions.update.enabled", false),
            Pref::new("browser.search.update", false),
            Pref::new("network.captive-portal-service.enabled", false),
            // Page noise
            Pref::new("dom.webnotifications.enabled", false),
            Pref::new("dom.push.enabled", false),
            Pref::new("media.autoplay.default", 5).note("Block all autoplay"),
            Pref::new("browser.pagethumbnails.capturing_disabled", true),
        ]
    }

    /// Installs the automation extension into `extensions/<gecko id>/`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] if the archive or manifest is invalid,
    /// or [`Error::Io`] if copying fails.
    pub fn install_extension(&self, source: &ExtensionSource) -> Result<()> {
        match source {
            ExtensionSource::Unpacked(path) => self.install_dir(path),
            ExtensionSource::Packed(path) => self.install_archive(fs::File::open(path)?),
            ExtensionSource::Base64(data) => {
                let bytes = Base64Standard
                    .decode(data.trim())
                    .map_err(|e| Error::profile(format!("Invalid base64 extension: {e}")))?;
                self.install_archive(Cursor::new(bytes))
            }
        }
    }

    fn install_dir(&self, src: &Path) -> Result<()> {
        let id = read_gecko_id(src)?;
        let dest = self.extensions_dir()?.join(&id);

        copy_dir_recursive(src, &dest)?;

        debug!(extension_id = %id, dest = %dest.display(), "Installed extension");
        Ok(())
    }

    fn install_archive<R: Read + Seek>(&self, reader: R) -> Result<()> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::profile(format!("Invalid extension archive: {e}")))?;

        let staging = TempDir::new()?;
        archive
            .extract(staging.path())
            .map_err(|e| Error::profile(format!("Failed to extract extension: {e}")))?;

        self.install_dir(staging.path())
    }

    fn extensions_dir(&self) -> Result<PathBuf> {
        let dir = self.path().join("extensions");
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

// ============================================================================
// Private Helpers
// ============================================================================

/// Reads the Gecko add-on ID from `manifest.json`.
fn read_gecko_id(dir: &Path) -> Result<String> {
    let manifest_path = dir.join("manifest.json");
    let content = fs::read_to_string(&manifest_path).map_err(|e| {
        Error::profile(format!(
            "Extension manifest not found at {}: {e}",
            manifest_path.display()
        ))
    })?;

    let manifest: Value = serde_json::from_str(&content)
        .map_err(|e| Error::profile(format!("Invalid manifest.json: {e}")))?;

    GECKO_ID_POINTERS
        .iter()
        .find_map(|pointer| manifest.pointer(pointer).and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| Error::profile("Extension manifest has no gecko id"))
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    const MANIFEST: &str = r#"{
        "manifest_version": 2,
        "name": "automation",
        "version": "1.0",
        "browser_specific_settings": { "gecko": { "id": "automation@scraper" } }
    }"#;

    fn unpacked_extension() -> TempDir {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("manifest.json"), MANIFEST).expect("write manifest");
        fs::create_dir(dir.path().join("content")).expect("mkdir");
        fs::write(dir.path().join("content/main.js"), "// content").expect("write js");
        dir
    }

    fn packed_extension() -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("manifest.json", SimpleFileOptions::default())
            .expect("start file");
        writer.write_all(MANIFEST.as_bytes()).expect("write");
        writer.finish().expect("finish").into_inner()
    }

    fn installed_manifest(profile: &Profile) -> PathBuf {
        profile
            .path()
            .join("extensions/automation@scraper/manifest.json")
    }

    #[test]
    fn test_temp_profile_removed_on_drop() {
        let path = {
            let profile = Profile::new_temp().expect("profile");
            assert!(profile.path().is_dir());
            profile.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_write_prefs() {
        let profile = Profile::new_temp().expect("profile");
        profile
            .write_prefs(&Profile::scraping_prefs())
            .expect("write prefs");

        let user_js = fs::read_to_string(profile.path().join("user.js")).expect("read");
        assert!(user_js.starts_with(USER_JS_HEADER));
        assert!(user_js.contains(r#"user_pref("xpinstall.signatures.required", false);"#));
    }

    #[test]
    fn test_install_unpacked_extension() {
        let source = unpacked_extension();
        let profile = Profile::new_temp().expect("profile");

        profile
            .install_extension(&ExtensionSource::unpacked(source.path()))
            .expect("install");

        assert!(installed_manifest(&profile).is_file());
        assert!(
            profile
                .path()
                .join("extensions/automation@scraper/content/main.js")
                .is_file()
        );
    }

    #[test]
    fn test_install_packed_extension() {
        let dir = tempfile::tempdir().expect("temp dir");
        let xpi = dir.path().join("automation.xpi");
        fs::write(&xpi, packed_extension()).expect("write xpi");

        let profile = Profile::new_temp().expect("profile");
        profile
            .install_extension(&ExtensionSource::packed(&xpi))
            .expect("install");

        assert!(installed_manifest(&profile).is_file());
    }

    #[test]
    fn test_install_base64_extension() {
        let encoded = Base64Standard.encode(packed_extension());
        let profile = Profile::new_temp().expect("profile");

        profile
            .install_extension(&ExtensionSource::base64(encoded))
            .expect("install");

        assert!(installed_manifest(&profile).is_file());
    }

    #[test]
    fn test_manifest_without_id_is_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("manifest.json"), r#"{"name": "x"}"#).expect("write");

        let profile = Profile::new_temp().expect("profile");
        let err = profile
            .install_extension(&ExtensionSource::unpacked(dir.path()))
            .unwrap_err();

        assert!(matches!(err, Error::Profile { .. }));
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let profile = Profile::new_temp().expect("profile");
        let err = profile
            .install_extension(&ExtensionSource::base64("not base64!"))
            .unwrap_err();

        assert!(matches!(err, Error::Profile { .. }));
    }
}
