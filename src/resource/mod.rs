//! Resource requests and the per-page-view [`ResourceLoader`].
//!
//! Every widget instance reports the JavaScript/CSS assets it needs as
//! [`ResourceRequest`]s. The loader deduplicates them by identity and
//! materializes bundled assets into the page exactly once per page view;
//! external assets are loaded client-side through each plugin's shared
//! loader object via [`loading_fragment`].

mod loader;

pub use loader::ResourceLoader;

use crate::html;

/// Kind of asset being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A JavaScript file.
    Script,
    /// A CSS stylesheet.
    Stylesheet,
}

/// How the asset is delivered to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delivery {
    /// Served from the crate's embedded asset catalog; the catalog applies
    /// its own cache-busting versioning.
    Bundled,
    /// Fetched from a deployment-configured URL by the client-side loader.
    External,
}

/// Page region the asset loads into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Document `<head>`.
    Head,
    /// Top of `<body>`. No load-order guarantee among these.
    BodyTop,
}

/// One JavaScript or CSS asset to load into a page region.
///
/// Identity for deduplication is the full tuple (kind, delivery, placement,
/// target); within one page view no identity is injected twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRequest {
    /// Asset kind.
    pub kind: ResourceKind,
    /// Delivery mechanism.
    pub delivery: Delivery,
    /// Target page region.
    pub placement: Placement,
    /// Bundled asset identifier or external URL.
    pub target: String,
}

impl ResourceRequest {
    /// A JavaScript file from the embedded catalog.
    pub fn bundled_script(name: impl Into<String>, placement: Placement) -> Self {
        Self {
            kind: ResourceKind::Script,
            delivery: Delivery::Bundled,
            placement,
            target: name.into(),
        }
    }

    /// A JavaScript file at an external URL.
    pub fn external_script(url: impl Into<String>, placement: Placement) -> Self {
        Self {
            kind: ResourceKind::Script,
            delivery: Delivery::External,
            placement,
            target: url.into(),
        }
    }

    /// A stylesheet from the embedded catalog. Stylesheets always load in
    /// the head.
    pub fn bundled_css(name: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Stylesheet,
            delivery: Delivery::Bundled,
            placement: Placement::Head,
            target: name.into(),
        }
    }

    /// A stylesheet at an external URL.
    pub fn external_css(url: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Stylesheet,
            delivery: Delivery::External,
            placement: Placement::Head,
            target: url.into(),
        }
    }
}

/// Emit the client-side loading fragment for the external resources among
/// `requests`.
///
/// Produces a `loader_var.addScriptToHead("url")...;` chain against the
/// named client-side loader object, or the empty string when `requests`
/// contains no external resource. Bundled requests are ignored; they are
/// materialized server-side by [`ResourceLoader::flush_to_page`]. Each
/// widget renders the fragment for its own requests only, so a page mixing
/// plugin types never chains one plugin's URLs onto another plugin's
/// loader. The client-side loader deduplicates URLs per instance, so
/// repeating the fragment across same-plugin widgets is harmless.
#[must_use]
pub fn loading_fragment(loader_var: &str, requests: &[ResourceRequest]) -> String {
    let external: Vec<&ResourceRequest> = requests
        .iter()
        .filter(|r| r.delivery == Delivery::External)
        .collect();
    if external.is_empty() {
        return String::new();
    }

    let mut script = String::from(loader_var);
    for request in external {
        let method = match (request.kind, request.placement) {
            (ResourceKind::Script, Placement::Head) => "addScriptToHead",
            (ResourceKind::Script, Placement::BodyTop) => "addScriptToBodyAtTop",
            (ResourceKind::Stylesheet, _) => "addCssToHead",
        };
        script.push_str(&format!(
            ".{method}(\"{}\")",
            html::escape_js_string(&request.target)
        ));
    }
    script.push(';');
    script
}
