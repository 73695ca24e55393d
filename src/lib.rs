// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]

//! Server-side chemical structure widgets for HTML pages.
//!
//! Chembed renders the HTML and JavaScript glue that embeds third-party
//! browser-based structure editors and viewers (OpenChemLib JS, MolPaint JS,
//! Marvin JS, Open Vector Editor) into pages assembled by any server-side
//! templating system, and converts/validates the MDL Molfile text those
//! widgets exchange with the server.
//!
//! # Key entry points
//!
//! - [`resource::ResourceLoader`] - collects and deduplicates asset requests,
//!   materializes them into a [`page::Page`] exactly once per page view
//! - [`widget::StructureWidget`] - the per-plugin renderer trait, implemented
//!   by [`widget::OpenChemLib`], [`widget::MolPaint`], [`widget::Marvin`] and
//!   [`widget::VectorEditor`]
//! - [`mol::MolfileConverter`] / [`mol::MolfileValidator`] - MDL Molfile
//!   V2000/V3000 text to [`mol::Molecule`] and back
//! - [`config::ChembedConfig`] - deployment-level plugin locations
//!
//! # Page-build protocol
//!
//! A page render is two explicit phases. First every widget reports its
//! [`resource::ResourceRequest`]s and the loader deduplicates them; then the
//! loader flushes bundled assets (resolved through an
//! [`assets::AssetCatalog`]) into the page head/body regions and each widget
//! renders its markup plus a bootstrap script loading its own external
//! assets. External assets are sequenced in the browser through a
//! per-plugin shared loader object whose `status()` promise resolves once
//! everything finished loading:
//!
//! ```
//! use chembed::assets::AssetCatalog;
//! use chembed::config::ChembedConfig;
//! use chembed::page::Page;
//! use chembed::resource::ResourceLoader;
//! use chembed::widget::{OpenChemLib, StructureWidget, WidgetConfig};
//!
//! let deployment = ChembedConfig::default();
//! let widget = OpenChemLib::new("form:mol1", WidgetConfig::default(), &deployment);
//!
//! let mut loader = ResourceLoader::new();
//! chembed::widget::collect_resources(&[&widget], &mut loader);
//!
//! let mut page = Page::new();
//! loader.flush_to_page(&AssetCatalog::new(), &mut page);
//!
//! let markup = widget.render("");
//! assert!(markup.contains("form:mol1_Input"));
//! ```
//!
//! The crate has no internal threading; it runs synchronously inside the
//! host's request handling. A [`resource::ResourceLoader`] belongs to one
//! logical page view and is mutated through `&mut self` only.

pub mod assets;
pub mod config;
pub mod error;
pub mod html;
pub mod mol;
pub mod page;
pub mod resource;
pub mod widget;

pub use error::ChembedError;
