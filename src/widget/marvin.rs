//! Marvin JS structure editor/viewer.
//!
//! Marvin is never bundled. Its scripts load from a deployment-provided
//! installation base URL, and the editable variant embeds the editor
//! sandbox page (`editor.html` or `editorws.html`) in an iframe instead
//! of drawing into a div.

use crate::config::{ChembedConfig, MarvinSettings};
use crate::html;
use crate::resource::{Placement, ResourceRequest};
use crate::widget::{
    bootstrap_script, change_callback, hidden_input, support_script_request,
    StructureWidget, WidgetConfig,
};

/// A Marvin JS widget instance.
#[derive(Debug, Clone)]
pub struct Marvin {
    client_id: String,
    config: WidgetConfig,
    settings: MarvinSettings,
}

impl Marvin {
    /// Create a widget instance, reading the Marvin installation
    /// parameters from the deployment configuration once.
    pub fn new(
        client_id: impl Into<String>,
        config: WidgetConfig,
        deployment: &ChembedConfig,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            config,
            settings: deployment.marvin.clone(),
        }
    }

    /// Editor sandbox page relative to the installation base URL.
    fn editor_page(&self) -> &'static str {
        if self.settings.web_services {
            "/editorws.html"
        } else {
            "/editor.html"
        }
    }
}

impl StructureWidget for Marvin {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn config(&self) -> &WidgetConfig {
        &self.config
    }

    fn loader_var(&self) -> &'static str {
        "chembed.marvinLoader"
    }

    fn resource_requests(&self) -> Vec<ResourceRequest> {
        let base = &self.settings.base_url;
        let mut requests = vec![
            support_script_request(),
            ResourceRequest::external_script(
                format!("{base}/gui/lib/promise-1.0.0.min.js"),
                Placement::Head,
            ),
            ResourceRequest::external_script(
                format!("{base}/js/marvinjslauncher.js"),
                Placement::Head,
            ),
        ];
        if self.settings.web_services {
            requests.push(ResourceRequest::external_script(
                format!("{base}/js/webservices.js"),
                Placement::Head,
            ));
        }
        requests
    }

    fn render(&self, value: &str) -> String {
        let client_id = &self.client_id;
        let input_id = format!("{client_id}_Input");
        let editable = !self.config.readonly;
        // Deployer-controlled, but a quote in a URL must not terminate
        // the script string early.
        let base = html::escape_js_string(&self.settings.base_url);
        let license = html::escape_js_string(&self.settings.license_url);

        let (target_id, target, body);
        if editable {
            target_id = format!("{client_id}_Editor");
            target = format!(
                "<iframe id=\"{}\" src=\"{}\" style=\"{}\"></iframe>",
                html::escape_attr(&target_id),
                html::escape_attr(&format!(
                    "{}{}",
                    self.settings.base_url,
                    self.editor_page()
                )),
                self.config.div_style()
            );
            body = format!(
                "let editorPromise = chembed.MarvinEditor\
                 .newEditor(\"{target_id}\", document.getElementById(\"{input_id}\")\
                 .getAttribute(\"value\"), \"{base}\", \"{license}\", {}, {}, \
                 \"{}\");{}return editorPromise;",
                self.config.height,
                self.config.width,
                self.config.format,
                change_callback(&input_id)
            );
        } else {
            target_id = format!("{client_id}_Viewer");
            target = format!(
                "<div id=\"{}\" style=\"{}\"></div>",
                html::escape_attr(&target_id),
                self.config.div_style()
            );
            body = format!(
                "return chembed.MarvinViewer.newViewer(\"{target_id}\", \
                 document.getElementById(\"{input_id}\").getAttribute(\"value\"), \
                 \"{base}\", \"{license}\", {}, {}, \"{}\");",
                self.config.height, self.config.width, self.config.format
            );
        }

        let input = hidden_input(client_id, value, editable);
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
