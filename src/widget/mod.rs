//! Per-instance widget configuration and the polymorphic renderer trait.
//!
//! Every embedded editor/viewer follows the same render contract: an
//! outer container `<div>` carrying the widget's client id, a target
//! element the browser plugin draws into, a hidden `<input>` that carries
//! the value (participating in form submission only when editable), and
//! one inline bootstrap script that constructs the plugin after its
//! resources finished loading.

mod marvin;
mod molpaint;
mod openchemlib;
mod vector_editor;

use std::collections::HashMap;
use std::fmt;

pub use marvin::Marvin;
pub use molpaint::MolPaint;
pub use openchemlib::OpenChemLib;
pub use vector_editor::VectorEditor;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::html;
use crate::mol::{MolFormat, MolfileConverter, Molecule};
use crate::resource::{self, Placement, ResourceLoader, ResourceRequest};

/// Bundled client-side support script required by every widget. Defines
/// the `chembed` browser namespace, the resources loader and the shared
/// per-plugin loader instances.
pub const SUPPORT_SCRIPT: &str = "js/chembed.js";

/// Per-instance widget settings.
///
/// Created when a widget is placed on a page, read-only during render,
/// discarded with the response.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema,
)]
#[serde(default)]
pub struct WidgetConfig {
    /// Widget width in pixels.
    pub width: u32,
    /// Widget height in pixels.
    pub height: u32,
    /// Render a 1px solid border around the widget.
    pub border: bool,
    /// Display-only mode: no form submission, no change listener.
    pub readonly: bool,
    /// Chemical file format of the exchanged value.
    pub format: MolFormat,
    /// Client-side global name the widget's construction promise is
    /// assigned to, for page-level scripting. No handle is exposed when
    /// unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_var: Option<String>,
    /// Server-side converter applied to submitted values. When unset the
    /// raw submitted string is the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converter: Option<MolfileConverter>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            border: false,
            readonly: false,
            format: MolFormat::default(),
            widget_var: None,
            converter: None,
        }
    }
}

impl WidgetConfig {
    /// Inline CSS for the widget's target element.
    #[must_use]
    pub fn div_style(&self) -> String {
        let mut style = format!("width:{}px;height:{}px;", self.width, self.height);
        if self.border {
            style.push_str("border:solid;border-width:1px;");
        }
        style
    }
}

/// A submitted value after conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmittedValue {
    /// No converter configured; the raw string is the value.
    Raw(String),
    /// Converted molecule object.
    Molecule(Molecule),
    /// Empty submission, converted to "no molecule".
    Empty,
}

/// A field-level validation failure tied to one widget.
///
/// These accompany a completed request (the user sees a message next to
/// the field); they never abort it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Client id of the submitting widget.
    pub client_id: String,
    /// Diagnostic shown to the user.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.client_id, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Renderer contract implemented once per third-party plugin.
pub trait StructureWidget {
    /// Unique client identifier; also the form parameter name in
    /// editable mode.
    fn client_id(&self) -> &str;

    /// Per-instance settings.
    fn config(&self) -> &WidgetConfig;

    /// Client-side global naming this plugin type's shared resources
    /// loader instance.
    fn loader_var(&self) -> &'static str;

    /// The assets this instance needs on the page.
    fn resource_requests(&self) -> Vec<ResourceRequest>;

    /// Render the widget markup: container, hidden input, bootstrap
    /// script seeding `value`. The bootstrap script loads this widget's
    /// own external resources through its plugin's shared client-side
    /// loader; bundled resources were already flushed into the page.
    fn render(&self, value: &str) -> String;

    /// Extract this widget's raw submitted string from the request
    /// parameter map. Readonly widgets never decode.
    fn decode<S: std::hash::BuildHasher>(
        &self,
        params: &HashMap<String, String, S>,
    ) -> Option<String>
    where
        Self: Sized,
    {
        if self.config().readonly {
            return None;
        }
        params.get(self.client_id()).cloned()
    }

    /// Convert a decoded raw string into the authoritative value using
    /// the configured converter. Conversion failure becomes a
    /// field-level [`ValidationError`], not a hard failure.
    fn convert_submitted(
        &self,
        raw: &str,
    ) -> Result<SubmittedValue, ValidationError> {
        let Some(converter) = &self.config().converter else {
            return Ok(SubmittedValue::Raw(raw.to_owned()));
        };
        match converter.to_molecule(raw) {
            Ok(Some(molecule)) => Ok(SubmittedValue::Molecule(molecule)),
            Ok(None) => Ok(SubmittedValue::Empty),
            Err(e) => Err(ValidationError {
                client_id: self.client_id().to_owned(),
                message: e.to_string(),
            }),
        }
    }
}

/// Phase one of a page build: every widget reports its resource requests
/// into the shared loader, which deduplicates them.
pub fn collect_resources(
    widgets: &[&dyn ErasedWidget],
    loader: &mut ResourceLoader,
) {
    for widget in widgets {
        for request in widget.resource_requests() {
            loader.enqueue(request);
        }
    }
}

/// Object-safe subset of [`StructureWidget`] used for heterogeneous
/// widget lists during resource collection.
pub trait ErasedWidget {
    /// See [`StructureWidget::resource_requests`].
    fn resource_requests(&self) -> Vec<ResourceRequest>;
}

impl<T: StructureWidget> ErasedWidget for T {
    fn resource_requests(&self) -> Vec<ResourceRequest> {
        StructureWidget::resource_requests(self)
    }
}

/// The bundled support-script request shared by all widgets.
pub(crate) fn support_script_request() -> ResourceRequest {
    ResourceRequest::bundled_script(SUPPORT_SCRIPT, Placement::Head)
}

/// Hidden `<input>` carrying the widget value. The `name` attribute is
/// present only in editable mode so readonly widgets are excluded from
/// form encoding.
pub(crate) fn hidden_input(client_id: &str, value: &str, editable: bool) -> String {
    let name = if editable {
        format!(" name=\"{}\"", html::escape_attr(client_id))
    } else {
        String::new()
    };
    format!(
        "<input type=\"hidden\" id=\"{}_Input\"{name} value=\"{}\" />",
        html::escape_attr(client_id),
        html::escape_attr(value)
    )
}

/// Assemble the inline bootstrap `<script>`: the loading fragment for
/// this widget's own external resources, optional widget-var assignment,
/// then the plugin construction body inside the loader's `status()`
/// promise.
pub(crate) fn bootstrap_script(
    requests: &[ResourceRequest],
    loader_var: &str,
    widget_var: Option<&str>,
    body: &str,
) -> String {
    let mut script = resource::loading_fragment(loader_var, requests);
    if let Some(var) = widget_var {
        if !var.is_empty() {
            script.push_str(&format!("var {var} = "));
        }
    }
    script.push_str(&format!(
        "{loader_var}.status().then(() => {{{body}}});"
    ));
    html::inline_script_tag(&script)
}

/// JavaScript fragment registering the on-change callback that writes
/// every edit back into the hidden input.
pub(crate) fn change_callback(hidden_input_id: &str) -> String {
    format!(
        "editorPromise.then(editor => \
         editor.getOnChangeSubject().addChangeCallback((mol) => {{ \
         document.getElementById(\"{hidden_input_id}\")\
         .setAttribute(\"value\", mol); }}));"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChembedConfig;

    #[test]
    fn defaults_match_the_documented_contract() {
        let config = WidgetConfig::default();
        assert_eq!(config.width, 400);
        assert_eq!(config.height, 400);
        assert!(!config.border);
        assert!(!config.readonly);
        assert_eq!(config.format, MolFormat::V2000);
        assert!(config.widget_var.is_none());
        assert!(config.converter.is_none());
    }

    #[test]
    fn div_style_is_exact() {
        let config = WidgetConfig {
            width: 300,
            height: 200,
            border: true,
            ..WidgetConfig::default()
        };
        assert_eq!(
            config.div_style(),
            "width:300px;height:200px;border:solid;border-width:1px;"
        );

        let no_border = WidgetConfig::default();
        assert_eq!(no_border.div_style(), "width:400px;height:400px;");
    }

    #[test]
    fn hidden_input_name_follows_editability() {
        let editable = hidden_input("form:mol1", "", true);
        assert!(editable.contains("id=\"form:mol1_Input\""));
        assert!(editable.contains("name=\"form:mol1\""));

        let readonly = hidden_input("form:mol1", "", false);
        assert!(readonly.contains("id=\"form:mol1_Input\""));
        assert!(!readonly.contains("name="));
    }

    #[test]
    fn hidden_input_escapes_the_value() {
        let markup = hidden_input("w", "a\"b<c>", true);
        assert!(markup.contains("value=\"a&quot;b&lt;c&gt;\""));
    }

    #[test]
    fn decode_skips_readonly_and_stages_submitted_text() {
        let deployment = ChembedConfig::default();
        let mut params = HashMap::new();
        let _ = params.insert(
            "form:mol1".to_owned(),
            "submitted molfile".to_owned(),
        );

        let editable = OpenChemLib::new(
            "form:mol1",
            WidgetConfig::default(),
            &deployment,
        );
        assert_eq!(
            editable.decode(&params).as_deref(),
            Some("submitted molfile")
        );

        let readonly = OpenChemLib::new(
            "form:mol1",
            WidgetConfig {
                readonly: true,
                ..WidgetConfig::default()
            },
            &deployment,
        );
        assert_eq!(readonly.decode(&params), None);
    }

    #[test]
    fn convert_submitted_routes_through_the_converter() {
        let deployment = ChembedConfig::default();
        let widget = OpenChemLib::new(
            "w",
            WidgetConfig {
                converter: Some(MolfileConverter::new(MolFormat::V2000)),
                ..WidgetConfig::default()
            },
            &deployment,
        );

        assert_eq!(widget.convert_submitted("").unwrap(), SubmittedValue::Empty);

        let molfile = crate::mol::v2000::write(&crate::mol::testmol::benzene());
        match widget.convert_submitted(&molfile).unwrap() {
            SubmittedValue::Molecule(mol) => assert_eq!(mol.formula(), "C6H6"),
            other => panic!("expected a molecule, got {other:?}"),
        }

        let err = widget.convert_submitted("abc").unwrap_err();
        assert_eq!(err.client_id, "w");
        assert!(err.message.contains("truncated"));

        // No converter: raw passthrough.
        let raw_widget =
            OpenChemLib::new("w", WidgetConfig::default(), &deployment);
        assert_eq!(
            raw_widget.convert_submitted("text").unwrap(),
            SubmittedValue::Raw("text".to_owned())
        );
    }

    #[test]
    fn collect_resources_deduplicates_the_support_script() {
        let deployment = ChembedConfig::default();
        let a = OpenChemLib::new("a", WidgetConfig::default(), &deployment);
        let b = OpenChemLib::new("b", WidgetConfig::default(), &deployment);

        let mut loader = crate::resource::ResourceLoader::new();
        collect_resources(&[&a, &b], &mut loader);

        let mut page = crate::page::Page::new();
        loader.flush_to_page(&crate::assets::AssetCatalog::new(), &mut page);
        let support_tags = page
            .head_tags()
            .iter()
            .filter(|t| t.contains("js/chembed.js"))
            .count();
        assert_eq!(support_tags, 1);
    }

    #[test]
    fn mixed_plugin_page_keeps_external_chains_per_plugin() {
        let mut deployment = ChembedConfig::default();
        deployment.marvin.base_url = "https://host/marvinjs".to_owned();
        deployment.open_chem_lib.custom_url =
            Some("https://cdn/openchemlib-full.js".to_owned());

        let marvin = Marvin::new("m", WidgetConfig::default(), &deployment);
        let ocl = OpenChemLib::new("o", WidgetConfig::default(), &deployment);

        let mut loader = crate::resource::ResourceLoader::new();
        collect_resources(&[&marvin, &ocl], &mut loader);

        // Each widget's markup chains only its own plugin's URLs onto its
        // own loader instance; nothing from the other plugin leaks in.
        let marvin_markup = marvin.render("");
        assert!(marvin_markup.contains(
            "chembed.marvinLoader\
             .addScriptToHead(\"https://host/marvinjs/gui/lib/promise-1.0.0.min.js\")\
             .addScriptToHead(\"https://host/marvinjs/js/marvinjslauncher.js\");"
        ));
        assert!(!marvin_markup.contains("openchemlib-full.js"));

        let ocl_markup = ocl.render("");
        assert!(ocl_markup.contains(
            "chembed.openChemLibLoader\
             .addScriptToHead(\"https://cdn/openchemlib-full.js\");"
        ));
        assert!(!ocl_markup.contains("marvinjs"));
    }
}
