//! MolPaint JS structure editor/viewer.
//!
//! The viewer variant is inline-seeded: the molecule text is embedded
//! directly in the bootstrap script as a JavaScript string literal
//! instead of being read back from the hidden input.

use crate::config::ChembedConfig;
use crate::html;
use crate::resource::{Placement, ResourceRequest};
use crate::widget::{
    bootstrap_script, change_callback, hidden_input, support_script_request,
    StructureWidget, WidgetConfig,
};

/// Bundled identifier of the MolPaint JS library.
const BUNDLED_LIBRARY: &str = "js/plugins/molpaintjs/molpaint.js";

/// A div-based MolPaint JS widget instance.
#[derive(Debug, Clone)]
pub struct MolPaint {
    client_id: String,
    config: WidgetConfig,
    custom_url: Option<String>,
}

impl MolPaint {
    /// Create a widget instance, reading plugin locations from the
    /// deployment configuration once.
    pub fn new(
        client_id: impl Into<String>,
        config: WidgetConfig,
        deployment: &ChembedConfig,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            config,
            custom_url: deployment.mol_paint.custom_url.clone(),
        }
    }
}

impl StructureWidget for MolPaint {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn config(&self) -> &WidgetConfig {
        &self.config
    }

    fn loader_var(&self) -> &'static str {
        "chembed.molPaintLoader"
    }

    fn resource_requests(&self) -> Vec<ResourceRequest> {
        let library = self.custom_url.as_ref().map_or_else(
            || ResourceRequest::bundled_script(BUNDLED_LIBRARY, Placement::Head),
            |url| ResourceRequest::external_script(url, Placement::Head),
        );
        vec![support_script_request(), library]
    }

    fn render(&self, value: &str) -> String {
        let client_id = &self.client_id;
        let input_id = format!("{client_id}_Input");
        let editable = !self.config.readonly;
        let target_id = if editable {
            format!("{client_id}_Editor")
        } else {
            format!("{client_id}_Viewer")
        };

        let target = format!(
            "<div id=\"{}\" style=\"{}\"></div>",
            html::escape_attr(&target_id),
            self.config.div_style()
        );
        let input = hidden_input(client_id, value, editable);

        let body = if editable {
            format!(
                "let editorPromise = chembed.MolPaintEditor\
                 .newEditor(\"{target_id}\", document.getElementById(\"{input_id}\")\
                 .getAttribute(\"value\"), {}, {}, \"{}\");{}return editorPromise;",
                self.config.height,
                self.config.width,
                self.config.format,
                change_callback(&input_id)
            )
        } else {
            format!(
                "return chembed.MolPaintViewer.newViewer(\"{target_id}\", \
                 \"{}\", {}, {});",
                html::escape_js_string(value),
                self.config.height,
                self.config.width
            )
        };
        let script = bootstrap_script(
            &self.resource_requests(),
            self.loader_var(),
            self.config.widget_var.as_deref(),
            &body,
        );

        format!(
            "<div id=\"{}\">{target}{input}{script}</div>",
            html::escape_attr(client_id)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployment() -> ChembedConfig {
        ChembedConfig::default()
    }

    #[test]
    fn editable_markup_uses_the_molpaint_loader_chain() {
        let widget = MolPaint::new("m", WidgetConfig::default(), &deployment());
        let markup = widget.render("");

        assert!(markup.contains("id=\"m_Editor\""));
        assert!(markup.contains("chembed.molPaintLoader.status().then"));
        assert!(markup.contains("MolPaintEditor.newEditor(\"m_Editor\""));
        assert!(markup.contains("addChangeCallback"));
    }

    #[test]
    fn viewer_inline_seeds_the_escaped_molecule() {
        let widget = MolPaint::new(
            "m",
            WidgetConfig {
                readonly: true,
                ..WidgetConfig::default()
            },
            &deployment(),
        );
        let markup = widget.render("line1\r\nC\\H \"quoted\"");

        assert!(markup.contains("id=\"m_Viewer\""));
        assert!(markup.contains(
            "MolPaintViewer.newViewer(\"m_Viewer\", \"line1\\nC\\\\H \\\"quoted\\\"\""
        ));
        assert!(!markup.contains('\r'));
        assert!(!markup.contains("name="));
    }

    #[test]
    fn library_resource_honours_the_custom_url() {
        let mut config = ChembedConfig::default();
        config.mol_paint.custom_url =
            Some("https://cdn/molpaint.js".to_owned());
        let widget = MolPaint::new("m", WidgetConfig::default(), &config);

        let requests = widget.resource_requests();
        assert_eq!(requests[1].target, "https://cdn/molpaint.js");

        let bundled =
            MolPaint::new("m", WidgetConfig::default(), &deployment());
        assert_eq!(
            bundled.resource_requests()[1].target,
            "js/plugins/molpaintjs/molpaint.js"
        );
    }
}
