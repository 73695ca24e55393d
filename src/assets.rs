//! Bundled and deployment-provided client-side assets.
//!
//! The crate ships its JavaScript support bundle embedded at compile time.
//! The third-party plugin libraries (OpenChemLib JS, MolPaint JS, the OVE
//! bundle) are not redistributable with the crate, so an [`AssetCatalog`]
//! lets the deployment overlay directories containing them; overlay files
//! resolve under the same [`URL_PREFIX`] namespace as embedded ones. All
//! URLs carry a content-digest version query, which makes them
//! cache-friendly across deployments.

use std::borrow::Cow;
use std::hash::Hasher;
use std::path::{Path, PathBuf};

use rust_embed::RustEmbed;
use rustc_hash::FxHasher;

/// Embedded asset catalog (everything under `assets/`).
#[derive(RustEmbed)]
#[folder = "assets/"]
struct BundledAssets;

/// URL prefix under which the host serves the asset catalog.
pub const URL_PREFIX: &str = "/chembed/";

/// Asset resolver: the embedded catalog plus deployment overlay
/// directories.
///
/// Lookup order is embedded first, then overlays in registration order.
/// Overlay identifiers are relative paths under the overlay root, using
/// the same naming scheme as embedded assets (`js/plugins/...`).
#[derive(Debug, Default)]
pub struct AssetCatalog {
    overlays: Vec<PathBuf>,
}

impl AssetCatalog {
    /// Catalog containing only the embedded assets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a deployment directory whose files extend the catalog.
    pub fn add_overlay(&mut self, dir: impl Into<PathBuf>) {
        self.overlays.push(dir.into());
    }

    /// Builder-style [`Self::add_overlay`].
    #[must_use]
    pub fn with_overlay(mut self, dir: impl Into<PathBuf>) -> Self {
        self.add_overlay(dir);
        self
    }

    /// Whether an asset identifier resolves in this catalog.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        asset_exists(name) || self.overlay_path(name).is_some()
    }

    /// Versioned URL for an asset, or `None` if the identifier does not
    /// resolve. Overlay files are read to compute the digest; the read is
    /// once per flushed tag, not per request.
    #[must_use]
    pub fn url(&self, name: &str) -> Option<String> {
        if let Some(url) = asset_url(name) {
            return Some(url);
        }
        let path = self.overlay_path(name)?;
        let data = std::fs::read(path).ok()?;
        Some(versioned_url(name, &data))
    }

    /// Resolve a request path to `(mime type, content)` for serving.
    ///
    /// Accepts both bare identifiers (`js/chembed.js`) and full request
    /// paths with the [`URL_PREFIX`] and a version query.
    #[must_use]
    pub fn response(&self, path: &str) -> Option<(String, Cow<'static, [u8]>)> {
        let name = request_name(path);
        if let Some(response) = asset_response(name) {
            return Some(response);
        }
        let file = self.overlay_path(name)?;
        let data = std::fs::read(file).ok()?;
        Some((mime_for(name), Cow::Owned(data)))
    }

    /// First overlay directory containing `name`. Identifiers that
    /// escape the overlay root are never resolved.
    fn overlay_path(&self, name: &str) -> Option<PathBuf> {
        if Path::new(name)
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return None;
        }
        self.overlays
            .iter()
            .map(|dir| dir.join(name))
            .find(|p| p.is_file())
    }
}

/// Whether a bundled asset identifier resolves in the embedded catalog.
#[must_use]
pub fn asset_exists(name: &str) -> bool {
    BundledAssets::get(name).is_some()
}

/// Versioned URL for an embedded asset, or `None` if the identifier does
/// not resolve.
#[must_use]
pub fn asset_url(name: &str) -> Option<String> {
    let file = BundledAssets::get(name)?;
    Some(versioned_url(name, &file.data))
}

/// Resolve a request path against the embedded catalog only. Hosts with
/// overlays go through [`AssetCatalog::response`].
#[must_use]
pub fn asset_response(path: &str) -> Option<(String, Cow<'static, [u8]>)> {
    let name = request_name(path);
    let file = BundledAssets::get(name)?;
    Some((mime_for(name), file.data))
}

/// Strip the URL prefix and version query off a request path.
fn request_name(path: &str) -> &str {
    let path = path.strip_prefix(URL_PREFIX).unwrap_or(path);
    path.split('?').next().unwrap_or(path)
}

fn versioned_url(name: &str, data: &[u8]) -> String {
    let mut hasher = FxHasher::default();
    hasher.write(data);
    format!("{URL_PREFIX}{name}?v={:016x}", hasher.finish())
}

fn mime_for(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .to_string()
}
