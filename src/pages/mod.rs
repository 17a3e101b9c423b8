//! Page views: data loading and rendering for the listing and post routes
//!
//! Each page exposes the same contract: `get_static_props` loads what the
//! page needs from the content API, `render` turns it into HTML.

pub mod home;
pub mod post;

use anyhow::Result;
use tera::Context;

use crate::config::SiteConfig;
use crate::helpers::DateFormatter;
use crate::i18n::I18n;
use crate::templates::TemplateRenderer;

/// Everything a page needs to render besides its own data
#[derive(Clone)]
pub struct Site {
    pub config: SiteConfig,
    pub formatter: DateFormatter,
    pub i18n: I18n,
    renderer: TemplateRenderer,
}

impl Site {
    pub fn new(config: SiteConfig) -> Result<Self> {
        let formatter = DateFormatter::from_config(&config)?;
        let i18n = I18n::new(&config.language)?;
        let renderer = TemplateRenderer::new()?;
        Ok(Self {
            config,
            formatter,
            i18n,
            renderer,
        })
    }

    /// Context shared by every page
    fn base_context(&self, page_title: &str) -> Context {
        let mut context = Context::new();
        context.insert("lang", self.i18n.language());
        context.insert("page_title", page_title);
        context.insert("site_title", &self.config.title);
        context.insert("logo_alt", &self.i18n.get("header.logo_alt"));
        context
    }

    fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        self.renderer.render(template_name, context)
    }
}
