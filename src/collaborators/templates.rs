//! Templates for the files generated by `init`

use crate::collaborators::Templater;
use crate::core::{render_placeholders, WorkflowError};
use std::collections::HashMap;

macro_rules! template {
    ($name:literal) => {
        ($name, include_str!(concat!("../../templates/", $name, ".tmpl")))
    };
}

const TEMPLATES: &[(&str, &str)] = &[
    template!("config/babelrc"),
    template!("config/eslintrc"),
    template!("config/jest_config"),
    template!("config/enzyme"),
    template!("config/package"),
    template!("config/webpack_config"),
    template!("config/webpack_dev_config"),
    template!("config/webpack_prod_config"),
    template!("git/gitignore"),
    template!("git/changelog"),
    template!("git/readme"),
    template!("gae/app_yaml"),
    template!("gae/gcloudignore"),
    template!("app/index_html"),
    template!("app/main_index"),
    template!("app/index_less"),
    template!("app/variables_less"),
    template!("app/container"),
    template!("app/container_test"),
    template!("app/container_less"),
    template!("app/container_index"),
    template!("app/head"),
    template!("app/head_index"),
    template!("app/home"),
    template!("app/home_test"),
    template!("app/home_less"),
    template!("app/home_index"),
    template!("app/page_not_found"),
    template!("app/page_not_found_test"),
    template!("app/page_not_found_less"),
    template!("app/page_not_found_index"),
    template!("util/environment"),
];

/// `Templater` over the templates compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl BuiltinTemplates {
    pub fn new() -> Self {
        Self
    }

    /// Names of every available template
    pub fn names() -> impl Iterator<Item = &'static str> {
        TEMPLATES.iter().map(|(name, _)| *name)
    }

    fn source(name: &str) -> Option<&'static str> {
        TEMPLATES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, source)| *source)
    }
}

impl Templater for BuiltinTemplates {
    fn render(&self, template: &str, params: &HashMap<String, String>) -> Result<String, WorkflowError> {
        let source = Self::source(template)
            .ok_or_else(|| WorkflowError::Template(format!("Unknown template '{}'", template)))?;
        Ok(render_placeholders(source, params))
    }
}
