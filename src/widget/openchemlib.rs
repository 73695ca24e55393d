//! OpenChemLib JS structure editor/viewer.

use crate::config::ChembedConfig;
use crate::html;
use crate::resource::{Placement, ResourceRequest};
use crate::widget::{
    bootstrap_script, change_callback, hidden_input, support_script_request,
    StructureWidget, WidgetConfig,
};

/// Bundled identifier of the OpenChemLib JS library.
const BUNDLED_LIBRARY: &str = "js/plugins/openchemlib/openchemlib-full.js";

/// A div-based OpenChemLib JS widget instance.
#[derive(Debug, Clone)]
pub struct OpenChemLib {
    client_id: String,
    config: WidgetConfig,
    custom_url: Option<String>,
}

impl OpenChemLib {
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
            custom_url: deployment.open_chem_lib.custom_url.clone(),
        }
    }
}

impl StructureWidget for OpenChemLib {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn config(&self) -> &WidgetConfig {
        &self.config
    }

    fn loader_var(&self) -> &'static str {
        "chembed.openChemLibLoader"
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
                "let editorPromise = chembed.OpenChemLibEditor\
                 .newEditor(\"{target_id}\", document.getElementById(\"{input_id}\")\
                 .getAttribute(\"value\"), \"{}\");{}return editorPromise;",
                self.config.format,
                change_callback(&input_id)
            )
        } else {
            format!(
                "return chembed.OpenChemLibViewer.newViewer(\"{target_id}\", \
                 document.getElementById(\"{input_id}\").getAttribute(\"value\"), \
                 {}, {});",
                self.config.height, self.config.width
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
    fn editable_markup_wires_submission_and_change_listener() {
        let widget = OpenChemLib::new(
            "form:mol1",
            WidgetConfig::default(),
            &deployment(),
        );
        let markup = widget.render("");

        assert!(markup.contains("<div id=\"form:mol1\">"));
        assert!(markup.contains("id=\"form:mol1_Editor\""));
        assert!(markup.contains("name=\"form:mol1\""));
        assert!(markup.contains("chembed.openChemLibLoader.status().then"));
        assert!(markup.contains("OpenChemLibEditor.newEditor(\"form:mol1_Editor\""));
        assert!(markup.contains("addChangeCallback"));
        assert!(markup.contains("\"MDLV2000\""));
    }

    #[test]
    fn readonly_markup_has_no_submission_name() {
        let widget = OpenChemLib::new(
            "v",
            WidgetConfig {
                readonly: true,
                width: 300,
                height: 200,
                border: true,
                ..WidgetConfig::default()
            },
            &deployment(),
        );
        let markup = widget.render("");

        assert!(markup.contains(
            "style=\"width:300px;height:200px;border:solid;border-width:1px;\""
        ));
        assert!(markup.contains("id=\"v_Viewer\""));
        assert!(!markup.contains("name="));
        assert!(markup.contains("OpenChemLibViewer.newViewer"));
        assert!(!markup.contains("addChangeCallback"));
    }

    #[test]
    fn widget_var_exposes_the_construction_promise() {
        let widget = OpenChemLib::new(
            "w",
            WidgetConfig {
                widget_var: Some("myEditor".to_owned()),
                ..WidgetConfig::default()
            },
            &deployment(),
        );
        let markup = widget.render("");
        assert!(markup.contains("var myEditor = chembed.openChemLibLoader"));

        let anonymous =
            OpenChemLib::new("w", WidgetConfig::default(), &deployment());
        assert!(!anonymous.render("").contains("var "));
    }

    #[test]
    fn custom_url_switches_the_library_to_external_delivery() {
        let mut config = ChembedConfig::default();
        config.open_chem_lib.custom_url =
            Some("https://cdn/openchemlib-full.js".to_owned());
        let widget = OpenChemLib::new("w", WidgetConfig::default(), &config);

        let requests = widget.resource_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].target, "https://cdn/openchemlib-full.js");

        // The widget's own bootstrap script loads the external copy.
        assert!(widget.render("").contains(
            "chembed.openChemLibLoader\
             .addScriptToHead(\"https://cdn/openchemlib-full.js\");"
        ));

        // Default configuration requests the bundled identifier instead
        // and emits no loading fragment of its own.
        let bundled =
            OpenChemLib::new("w", WidgetConfig::default(), &deployment());
        assert_eq!(
            bundled.resource_requests()[1].target,
            "js/plugins/openchemlib/openchemlib-full.js"
        );
        assert!(!bundled.render("").contains("addScriptToHead"));
    }
}
