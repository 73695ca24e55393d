//! Open Vector Editor (OVE) sequence editor/viewer.
//!
//! Unlike the chemistry widgets OVE exchanges JSON sequence data, not
//! Molfile text. The bootstrap script parses the hidden input's value on
//! the client; a parse failure is logged to the browser console and the
//! editor starts empty instead of breaking the page.

use serde_json::Value;

use crate::config::ChembedConfig;
use crate::html;
use crate::resource::{Placement, ResourceRequest};
use crate::widget::{
    bootstrap_script, hidden_input, support_script_request, StructureWidget,
    ValidationError, WidgetConfig,
};

/// Bundled identifier of the OVE library.
const BUNDLED_LIBRARY: &str = "js/plugins/openVectorEditor/open-vector-editor.min.js";

/// Bundled identifier of the OVE stylesheet.
const BUNDLED_CSS: &str = "js/plugins/openVectorEditor/main.css";

/// A div-based Open Vector Editor widget instance.
#[derive(Debug, Clone)]
pub struct VectorEditor {
    client_id: String,
    config: WidgetConfig,
    base_url: Option<String>,
}

impl VectorEditor {
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
            base_url: deployment.vector_editor.base_url.clone(),
        }
    }

    /// Parse a submitted sequence value on the server side. Empty or
    /// whitespace-only text means "no sequence"; anything else must be a
    /// JSON object.
    pub fn parse_sequence(&self, raw: &str) -> Result<Option<Value>, ValidationError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(value) if value.is_object() => Ok(Some(value)),
            Ok(_) => Err(ValidationError {
                client_id: self.client_id.clone(),
                message: "sequence data is not a JSON object".to_owned(),
            }),
            Err(e) => Err(ValidationError {
                client_id: self.client_id.clone(),
                message: e.to_string(),
            }),
        }
    }
}

impl StructureWidget for VectorEditor {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn config(&self) -> &WidgetConfig {
        &self.config
    }

    fn loader_var(&self) -> &'static str {
        "chembed.vectorEditorLoader"
    }

    fn resource_requests(&self) -> Vec<ResourceRequest> {
        // OVE documents itself as body-loaded; its stylesheet still goes
        // in the head.
        let (library, css) = self.base_url.as_ref().map_or_else(
            || {
                (
                    ResourceRequest::bundled_script(
                        BUNDLED_LIBRARY,
                        Placement::BodyTop,
                    ),
                    ResourceRequest::bundled_css(BUNDLED_CSS),
                )
            },
            |base| {
                (
                    ResourceRequest::external_script(
                        format!("{base}/open-vector-editor.min.js"),
                        Placement::BodyTop,
                    ),
                    ResourceRequest::external_css(format!("{base}/main.css")),
                )
            },
        );
        vec![support_script_request(), library, css]
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

        let mut body = format!(
            "let valueAsText = document.getElementById(\"{input_id}\")\
             .getAttribute(\"value\");\
             let valueAsJSON = {{}};\
             try {{ if (valueAsText.length > 0) {{ \
             valueAsJSON = JSON.parse(valueAsText); }} }} \
             catch (e) {{ console.error(e); }}\
             let editorPromise = chembed.VectorEditor\
             .newEditor(\"{target_id}\", valueAsJSON, {});",
            !editable
        );
        if editable {
            body.push_str(&format!(
                "editorPromise.then(editor => \
                 editor.getOnChangeSubject().addChangeCallback((data) => {{ \
                 document.getElementById(\"{input_id}\")\
                 .setAttribute(\"value\", JSON.stringify(data)); }}));"
            ));
        }
        body.push_str("return editorPromise;");

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
