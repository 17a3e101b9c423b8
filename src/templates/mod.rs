//! Built-in site templates using the Tera template engine
//!
//! Templates and static assets are embedded directly in the binary.

use anyhow::Result;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::html_escape;

/// Static files written next to the rendered pages
pub const ASSETS: [(&str, &str); 2] = [
    ("styles.css", include_str!("site/assets/styles.css")),
    ("logo.svg", include_str!("site/assets/logo.svg")),
];

/// Template renderer with the embedded site templates
#[derive(Clone)]
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Markup produced by the rich-text renderer is inserted verbatim;
        // text fields go through the `esc` filter instead
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("post.html", include_str!("site/post.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/post_summary.html",
                include_str!("site/partials/post_summary.html"),
            ),
        ])?;

        tera.register_filter("esc", esc_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: escape HTML special characters, `null` renders empty
fn esc_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = match value {
        tera::Value::Null => String::new(),
        tera::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Ok(tera::Value::String(html_escape(&s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_context() -> Context {
        let mut context = Context::new();
        context.insert("lang", "pt-BR");
        context.insert("page_title", "spacetraveling");
        context.insert("logo_alt", "logo");
        context
    }

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_esc_filter() {
        let out = esc_filter(&json!("<b>&</b>"), &HashMap::new()).unwrap();
        assert_eq!(out, json!("&lt;b&gt;&amp;&lt;/b&gt;"));
        assert_eq!(esc_filter(&json!(null), &HashMap::new()).unwrap(), json!(""));
        assert_eq!(esc_filter(&json!(3), &HashMap::new()).unwrap(), json!("3"));
    }

    #[test]
    fn test_summary_partial_escapes_text() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert(
            "post",
            &json!({
                "uid": "x",
                "href": "/post/x",
                "first_publication_date": "15 mar 2021",
                "data": { "title": "<script>", "subtitle": "s", "author": "a" }
            }),
        );
        let html = renderer.render("partials/post_summary.html", &context).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(r#"data-uid="x""#));
        assert!(html.contains(r#"href="/post/x""#));
    }

    #[test]
    fn test_index_without_more_url_has_no_button() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("posts", &Vec::<serde_json::Value>::new());
        context.insert("more_url", &Option::<String>::None);
        context.insert("load_more_label", "Carregar mais posts");
        let html = renderer.render("index.html", &context).unwrap();
        assert!(!html.contains("load-more"));
        assert!(html.contains(r#"<html lang="pt-BR">"#));
    }
}
