//! HTML shell for an app.
//!
//! The page inlines the bootstrap framework, then links every stylesheet
//! and script of the app in load order.

use std::sync::Arc;

use anyhow::Result;

use crate::builder::bundle::locale_code;
use crate::core::app::App;
use crate::core::entry::EntryKind;

/// Renders the tags of one app's page.
#[derive(Debug, Clone, Copy)]
pub struct HtmlContext<'a> {
    app: &'a App,
}

impl<'a> HtmlContext<'a> {
    pub fn new(app: &'a App) -> Self {
        HtmlContext { app }
    }

    /// Inline `<script>` tags with the bootstrap framework's scripts.
    pub fn bootstrap(&self) -> Result<String> {
        let Some(target) = self.app.bootstrap() else {
            return Ok(String::new());
        };

        let bundle = self.app.bundle(target, EntryKind::Script)?;
        Ok(bundle
            .artifacts()
            .iter()
            .map(|a| format!("<script type=\"text/javascript\">\n{}\n</script>", a.content))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// `<link>` tags for every stylesheet.
    pub fn stylesheets(&self) -> Result<String> {
        let mut tags = Vec::new();
        for bundle in self.app.bundles(EntryKind::Stylesheet)? {
            for path in bundle.paths() {
                tags.push(format!(
                    "<link href=\"{}\" rel=\"stylesheet\" type=\"text/css\" />",
                    path
                ));
            }
        }
        Ok(tags.join("\n"))
    }

    /// `<script>` tags for every script except the inlined bootstrap,
    /// followed by the preferred language setting.
    pub fn javascripts(&self) -> Result<String> {
        let mut tags = Vec::new();
        for target in self.app.targets() {
            if self
                .app
                .bootstrap()
                .is_some_and(|b| Arc::ptr_eq(b, target))
            {
                continue;
            }
            for path in self.app.bundle(target, EntryKind::Script)?.paths() {
                tags.push(format!(
                    "<script type=\"text/javascript\" src=\"{}\"></script>",
                    path
                ));
            }
        }
        tags.push(format!(
            "<script type=\"text/javascript\">String.preferredLanguage = \"{}\";</script>",
            locale_code(self.app.locale())
        ));
        Ok(tags.join("\n"))
    }

    /// Public URL of a static asset, or an empty string when unknown.
    pub fn static_url(&self, name: &str) -> String {
        match self.app.find_static(name) {
            Some(record) => record.destination.clone(),
            None => {
                tracing::warn!("{}: static not found: {}", self.app.name(), name);
                String::new()
            }
        }
    }

    /// The full page.
    pub fn render(&self) -> Result<String> {
        Ok(format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head>\n\
             <meta http-equiv=\"Content-type\" content=\"text/html; charset=utf-8\" />\n\
             <title>{title}</title>\n\
             {bootstrap}\n\
             {stylesheets}\n\
             </head>\n\
             <body>\n\
             {javascripts}\n\
             </body>\n\
             </html>\n",
            title = self.app.name(),
            bootstrap = self.bootstrap()?,
            stylesheets = self.stylesheets()?,
            javascripts = self.javascripts()?,
        ))
    }
}
