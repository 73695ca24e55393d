//! Dedupe-and-flush bookkeeping for one logical page view.

use rustc_hash::FxHashSet;

use crate::assets::AssetCatalog;
use crate::html;
use crate::page::Page;
use crate::resource::{Delivery, Placement, ResourceKind, ResourceRequest};

/// Collects resource requests from widget instances and delivers each
/// distinct one to the page at most once.
///
/// The loader is scoped to one logical page view. The host environment may
/// re-run the enqueue/flush cycle several times per view (AJAX-style
/// partial re-renders); the internal seen-set guarantees that each identity
/// produces exactly one tag over the whole view. External requests are
/// deduplicated here too but never flushed server-side; each widget emits
/// its own [`crate::resource::loading_fragment`] and the client-side loader
/// owns their once-only loading. The single-writer assumption of the page
/// view is enforced by `&mut self`.
#[derive(Debug, Default)]
pub struct ResourceLoader {
    /// Bundled requests awaiting flush, in enqueue order.
    pending_bundled: Vec<ResourceRequest>,
    /// Every identity ever enqueued in this page view.
    seen: FxHashSet<ResourceRequest>,
}

impl ResourceLoader {
    /// Create a loader for a fresh page view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently enqueue a request. Duplicates of an identity already
    /// enqueued (or already flushed) in this page view are dropped. No
    /// side effect on the page.
    pub fn enqueue(&mut self, request: ResourceRequest) {
        if !self.seen.insert(request.clone()) {
            return;
        }
        if request.delivery == Delivery::Bundled {
            self.pending_bundled.push(request);
        }
    }

    /// Materialize all pending bundled resources into the page.
    ///
    /// Each resolves through the catalog, which applies its own
    /// cache-busting version parameter. An unresolvable identifier is
    /// logged and skipped; loading is attempt-once per page view, so the
    /// identifier stays marked as delivered and a widget depending on it
    /// fails purely client-side.
    pub fn flush_to_page(&mut self, catalog: &AssetCatalog, page: &mut Page) {
        for request in self.pending_bundled.drain(..) {
            let Some(url) = catalog.url(&request.target) else {
                log::warn!(
                    "bundled resource not found, skipping: {}",
                    request.target
                );
                continue;
            };
            let tag = match request.kind {
                ResourceKind::Script => html::script_src_tag(&url),
                ResourceKind::Stylesheet => html::css_link_tag(&url),
            };
            match request.placement {
                Placement::Head => page.insert_head(tag),
                Placement::BodyTop => page.insert_body_top(tag),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets;

    const SUPPORT: &str = "js/chembed.js";

    #[test]
    fn duplicate_enqueues_flush_once() {
        let mut loader = ResourceLoader::new();
        let mut page = Page::new();

        loader.enqueue(ResourceRequest::bundled_script(SUPPORT, Placement::Head));
        loader.enqueue(ResourceRequest::bundled_script(SUPPORT, Placement::Head));
        loader.flush_to_page(&AssetCatalog::new(), &mut page);

        assert_eq!(page.head_tags().len(), 1);
        assert!(page.head_tags()[0].contains("/chembed/js/chembed.js?v="));
    }

    #[test]
    fn repeated_enqueue_flush_cycles_stay_idempotent() {
        let mut loader = ResourceLoader::new();
        let mut page = Page::new();

        // Simulates partial re-renders: the page view re-runs the whole
        // collect/flush cycle but each tag must appear exactly once.
        for _ in 0..3 {
            loader.enqueue(ResourceRequest::bundled_script(
                SUPPORT,
                Placement::Head,
            ));
            loader.flush_to_page(&AssetCatalog::new(), &mut page);
        }

        assert_eq!(page.head_tags().len(), 1);
        assert!(page.body_top_tags().is_empty());
    }

    #[test]
    fn unresolvable_bundled_resource_is_skipped() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut loader = ResourceLoader::new();
        let mut page = Page::new();

        loader.enqueue(ResourceRequest::bundled_script(
            "js/does-not-exist.js",
            Placement::Head,
        ));
        loader.flush_to_page(&AssetCatalog::new(), &mut page);

        assert!(page.head_tags().is_empty());

        // Attempt-once: a later cycle does not retry it.
        loader.enqueue(ResourceRequest::bundled_script(
            "js/does-not-exist.js",
            Placement::Head,
        ));
        loader.flush_to_page(&AssetCatalog::new(), &mut page);
        assert!(page.head_tags().is_empty());
    }

    #[test]
    fn overlay_resolves_deployment_provided_libraries() {
        let dir = assets::tests::overlay_dir(&[(
            "js/plugins/molpaintjs/molpaint.js",
            "window.molPaintJS = {};",
        )]);
        let catalog = AssetCatalog::new().with_overlay(dir);

        let mut loader = ResourceLoader::new();
        let mut page = Page::new();
        loader.enqueue(ResourceRequest::bundled_script(
            "js/plugins/molpaintjs/molpaint.js",
            Placement::Head,
        ));
        loader.flush_to_page(&catalog, &mut page);

        assert_eq!(page.head_tags().len(), 1);
        assert!(page.head_tags()[0]
            .contains("/chembed/js/plugins/molpaintjs/molpaint.js?v="));
    }

    #[test]
    fn externals_are_deduplicated_but_never_flushed() {
        let mut loader = ResourceLoader::new();
        let mut page = Page::new();

        loader.enqueue(ResourceRequest::external_script(
            "https://cdn/a.js",
            Placement::Head,
        ));
        loader.enqueue(ResourceRequest::external_css("https://cdn/a.css"));
        loader.flush_to_page(&AssetCatalog::new(), &mut page);

        assert!(page.head_tags().is_empty());
        assert!(page.body_top_tags().is_empty());
    }

    #[test]
    fn body_top_placement_reaches_body_region() {
        let mut loader = ResourceLoader::new();
        let mut page = Page::new();

        loader.enqueue(ResourceRequest::bundled_script(
            SUPPORT,
            Placement::BodyTop,
        ));
        loader.flush_to_page(&AssetCatalog::new(), &mut page);

        assert!(page.head_tags().is_empty());
        assert_eq!(page.body_top_tags().len(), 1);
    }
}
