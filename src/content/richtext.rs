//! Prismic rich text: structured blocks with inline spans
//!
//! Span offsets are counted in UTF-16 code units of the block text, the
//! way the API computes them.

use serde::{Deserialize, Serialize};

use crate::helpers::{html_escape, image_tag, post_path};

/// An ordered sequence of rich-text blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<Block>);

/// One structured block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    #[serde(rename = "paragraph")]
    Paragraph(TextBlock),
    #[serde(rename = "heading1")]
    Heading1(TextBlock),
    #[serde(rename = "heading2")]
    Heading2(TextBlock),
    #[serde(rename = "heading3")]
    Heading3(TextBlock),
    #[serde(rename = "heading4")]
    Heading4(TextBlock),
    #[serde(rename = "heading5")]
    Heading5(TextBlock),
    #[serde(rename = "heading6")]
    Heading6(TextBlock),
    #[serde(rename = "preformatted")]
    Preformatted(TextBlock),
    #[serde(rename = "list-item")]
    ListItem(TextBlock),
    #[serde(rename = "o-list-item")]
    OrderedListItem(TextBlock),
    #[serde(rename = "image")]
    Image(ImageBlock),
    #[serde(rename = "embed")]
    Embed(EmbedBlock),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
}

impl TextBlock {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            spans: Vec::new(),
        }
    }
}

/// Inline formatting over `[start, end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub span_type: String,
    #[serde(default)]
    pub data: Option<SpanData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanData {
    pub link_type: Option<String>,
    pub url: Option<String>,
    pub target: Option<String>,
    /// Linked document, for links to other posts
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub document_type: Option<String>,
    /// Label name, for `label` spans
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageBlock {
    pub url: String,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedBlock {
    pub oembed: OEmbed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OEmbed {
    #[serde(rename = "type")]
    pub embed_type: Option<String>,
    pub embed_url: Option<String>,
    pub html: Option<String>,
}

impl Block {
    /// Text content, for blocks that carry text
    pub fn text(&self) -> Option<&str> {
        self.text_block().map(|b| b.text.as_str())
    }

    fn text_block(&self) -> Option<&TextBlock> {
        match self {
            Block::Paragraph(b)
            | Block::Heading1(b)
            | Block::Heading2(b)
            | Block::Heading3(b)
            | Block::Heading4(b)
            | Block::Heading5(b)
            | Block::Heading6(b)
            | Block::Preformatted(b)
            | Block::ListItem(b)
            | Block::OrderedListItem(b) => Some(b),
            Block::Image(_) | Block::Embed(_) | Block::Unknown => None,
        }
    }
}

impl RichText {
    /// Plain text of every text block, joined by a space
    pub fn as_text(&self) -> String {
        self.0
            .iter()
            .filter_map(Block::text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// HTML markup; consecutive list items share one list element
    pub fn as_html(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut open_list: Option<&'static str> = None;
        let mut items = String::new();

        for block in &self.0 {
            let list_tag = match block {
                Block::ListItem(_) => Some("ul"),
                Block::OrderedListItem(_) => Some("ol"),
                _ => None,
            };

            if open_list.is_some() && open_list != list_tag {
                let tag = open_list.take().unwrap_or("ul");
                parts.push(format!("<{tag}>{items}</{tag}>"));
                items.clear();
            }

            if let (Some(tag), Some(text)) = (list_tag, block.text_block()) {
                open_list = Some(tag);
                items.push_str(&format!("<li>{}</li>", render_spans(text)));
                continue;
            }

            if let Some(html) = block_html(block) {
                parts.push(html);
            }
        }

        if let Some(tag) = open_list {
            parts.push(format!("<{tag}>{items}</{tag}>"));
        }

        parts.join("")
    }
}

fn block_html(block: &Block) -> Option<String> {
    let html = match block {
        Block::Paragraph(b) => format!("<p>{}</p>", render_spans(b)),
        Block::Heading1(b) => format!("<h1>{}</h1>", render_spans(b)),
        Block::Heading2(b) => format!("<h2>{}</h2>", render_spans(b)),
        Block::Heading3(b) => format!("<h3>{}</h3>", render_spans(b)),
        Block::Heading4(b) => format!("<h4>{}</h4>", render_spans(b)),
        Block::Heading5(b) => format!("<h5>{}</h5>", render_spans(b)),
        Block::Heading6(b) => format!("<h6>{}</h6>", render_spans(b)),
        Block::Preformatted(b) => format!("<pre>{}</pre>", render_spans(b)),
        Block::Image(img) => format!(
            r#"<p class="block-img">{}</p>"#,
            image_tag(&img.url, img.alt.as_deref())
        ),
        Block::Embed(embed) => {
            let oembed = &embed.oembed;
            format!(
                r#"<div data-oembed="{}" data-oembed-type="{}">{}</div>"#,
                html_escape(oembed.embed_url.as_deref().unwrap_or("")),
                html_escape(oembed.embed_type.as_deref().unwrap_or("")),
                oembed.html.as_deref().unwrap_or("")
            )
        }
        Block::ListItem(_) | Block::OrderedListItem(_) | Block::Unknown => return None,
    };
    Some(html)
}

fn span_end(span: &Span, len: usize) -> usize {
    span.end.min(len)
}

fn open_tag(span: &Span) -> String {
    let data = span.data.clone().unwrap_or_default();
    match span.span_type.as_str() {
        "strong" => "<strong>".to_string(),
        "em" => "<em>".to_string(),
        "label" => format!(
            r#"<span class="{}">"#,
            html_escape(data.label.as_deref().unwrap_or(""))
        ),
        _ => {
            // Links to other documents resolve to their post route
            let href = match (data.link_type.as_deref(), &data.url, &data.uid) {
                (Some("Document"), _, Some(uid)) => post_path(uid),
                (_, Some(url), _) => url.clone(),
                (_, None, Some(uid)) => post_path(uid),
                (_, None, None) => "#".to_string(),
            };
            let target = data
                .target
                .map(|t| format!(r#" target="{}" rel="noopener""#, html_escape(&t)))
                .unwrap_or_default();
            format!(r#"<a href="{}"{}>"#, html_escape(&href), target)
        }
    }
}

fn close_tag(span: &Span) -> &'static str {
    match span.span_type.as_str() {
        "strong" => "</strong>",
        "em" => "</em>",
        "label" => "</span>",
        _ => "</a>",
    }
}

fn is_supported(span: &Span) -> bool {
    matches!(span.span_type.as_str(), "strong" | "em" | "label" | "hyperlink")
}

/// Render block text with its spans as well-formed nested markup
fn render_spans(block: &TextBlock) -> String {
    let chars: Vec<char> = block.text.chars().collect();
    // UTF-16 offset at which each char starts, plus the end offset
    let mut offsets = Vec::with_capacity(chars.len() + 1);
    let mut len = 0;
    for c in &chars {
        offsets.push(len);
        len += c.len_utf16();
    }
    offsets.push(len);

    let mut spans: Vec<&Span> = block
        .spans
        .iter()
        .filter(|s| is_supported(s) && s.start < s.end && s.start < len)
        .collect();
    // Outer spans first when several start at the same offset
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(block.text.len());
    let mut stack: Vec<&Span> = Vec::new();
    let mut next = 0;

    // Offsets falling inside a surrogate pair snap to the next char boundary
    for (i, &pos) in offsets.iter().enumerate() {
        if stack.iter().any(|s| span_end(s, len) <= pos) {
            let mut reopen = Vec::new();
            while let Some(top) = stack.pop() {
                out.push_str(close_tag(top));
                if span_end(top, len) > pos {
                    reopen.push(top);
                }
                if !stack.iter().any(|s| span_end(s, len) <= pos) {
                    break;
                }
            }
            for span in reopen.into_iter().rev() {
                out.push_str(&open_tag(span));
                stack.push(span);
            }
        }

        while next < spans.len() && spans[next].start <= pos {
            out.push_str(&open_tag(spans[next]));
            stack.push(spans[next]);
            next += 1;
        }

        if let Some(c) = chars.get(i) {
            match c {
                '\n' => out.push_str("<br />"),
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                c => out.push(*c),
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn span(start: usize, end: usize, kind: &str) -> Span {
        Span {
            start,
            end,
            span_type: kind.to_string(),
            data: None,
        }
    }

    fn paragraph(text: &str, spans: Vec<Span>) -> Block {
        Block::Paragraph(TextBlock {
            text: text.to_string(),
            spans,
        })
    }

    #[test]
    fn test_parse_blocks() {
        let rich: RichText = serde_json::from_value(json!([
            { "type": "paragraph", "text": "Hello", "spans": [] },
            { "type": "heading3", "text": "Title", "spans": [] },
            { "type": "image", "url": "https://img/x.png", "alt": null, "dimensions": { "width": 1 } },
            { "type": "some-future-block", "text": "ignored" }
        ]))
        .unwrap();

        assert_eq!(rich.0.len(), 4);
        assert_eq!(rich.0[0].text(), Some("Hello"));
        assert!(matches!(rich.0[1], Block::Heading3(_)));
        assert!(matches!(rich.0[3], Block::Unknown));
    }

    #[test]
    fn test_as_text() {
        let rich = RichText(vec![
            paragraph("Primeiro parágrafo.", vec![]),
            Block::Image(ImageBlock::default()),
            Block::ListItem(TextBlock::new("item")),
        ]);
        assert_eq!(rich.as_text(), "Primeiro parágrafo. item");
        assert_eq!(RichText::default().as_text(), "");
    }

    #[test]
    fn test_as_html_escapes_text() {
        let rich = RichText(vec![paragraph("a < b & \"c\"", vec![])]);
        assert_eq!(rich.as_html(), "<p>a &lt; b &amp; &quot;c&quot;</p>");
    }

    #[test]
    fn test_spans() {
        let rich = RichText(vec![paragraph(
            "Hello bold world",
            vec![span(6, 10, "strong")],
        )]);
        assert_eq!(rich.as_html(), "<p>Hello <strong>bold</strong> world</p>");
    }

    #[test]
    fn test_nested_and_overlapping_spans() {
        let nested = RichText(vec![paragraph(
            "abcdef",
            vec![span(0, 6, "strong"), span(2, 4, "em")],
        )]);
        assert_eq!(
            nested.as_html(),
            "<p><strong>ab<em>cd</em>ef</strong></p>"
        );

        let overlapping = RichText(vec![paragraph(
            "abcdef",
            vec![span(0, 4, "strong"), span(2, 6, "em")],
        )]);
        assert_eq!(
            overlapping.as_html(),
            "<p><strong>ab<em>cd</em></strong><em>ef</em></p>"
        );
    }

    #[test]
    fn test_span_offsets_are_utf16_units() {
        let rich = RichText(vec![paragraph("ação rápida", vec![span(5, 11, "em")])]);
        assert_eq!(rich.as_html(), "<p>ação <em>rápida</em></p>");

        // The rocket takes two UTF-16 units
        let rich = RichText(vec![paragraph(
            "🚀 Lançamento hoje",
            vec![span(3, 13, "strong")],
        )]);
        assert_eq!(
            rich.as_html(),
            "<p>🚀 <strong>Lançamento</strong> hoje</p>"
        );
    }

    #[test]
    fn test_hyperlink() {
        let mut link = span(0, 4, "hyperlink");
        link.data = Some(SpanData {
            url: Some("https://rocketseat.com.br".to_string()),
            target: Some("_blank".to_string()),
            ..SpanData::default()
        });
        let rich = RichText(vec![paragraph("site", vec![link])]);
        assert_eq!(
            rich.as_html(),
            r#"<p><a href="https://rocketseat.com.br" target="_blank" rel="noopener">site</a></p>"#
        );

        let mut doc_link = span(0, 4, "hyperlink");
        doc_link.data = Some(SpanData {
            link_type: Some("Document".to_string()),
            uid: Some("outro-post".to_string()),
            ..SpanData::default()
        });
        let rich = RichText(vec![paragraph("post", vec![doc_link])]);
        assert_eq!(rich.as_html(), r#"<p><a href="/post/outro-post">post</a></p>"#);

        // A document link goes to the post route even when the API resolved a url
        let mut resolved = span(0, 4, "hyperlink");
        resolved.data = Some(SpanData {
            link_type: Some("Document".to_string()),
            url: Some("https://other.site/outro-post".to_string()),
            uid: Some("outro-post".to_string()),
            ..SpanData::default()
        });
        let rich = RichText(vec![paragraph("post", vec![resolved])]);
        assert_eq!(rich.as_html(), r#"<p><a href="/post/outro-post">post</a></p>"#);
    }

    #[test]
    fn test_lists_are_grouped() {
        let rich = RichText(vec![
            Block::ListItem(TextBlock::new("one")),
            Block::ListItem(TextBlock::new("two")),
            Block::OrderedListItem(TextBlock::new("first")),
            paragraph("after", vec![]),
        ]);
        assert_eq!(
            rich.as_html(),
            "<ul><li>one</li><li>two</li></ul><ol><li>first</li></ol><p>after</p>"
        );
    }

    #[test]
    fn test_newlines_and_preformatted() {
        let rich = RichText(vec![Block::Preformatted(TextBlock::new("let x = 1;\nx"))]);
        assert_eq!(rich.as_html(), "<pre>let x = 1;<br />x</pre>");
    }

    #[test]
    fn test_image_and_embed() {
        let rich = RichText(vec![
            Block::Image(ImageBlock {
                url: "https://images.prismic.io/a.png".to_string(),
                alt: Some("banner".to_string()),
            }),
            Block::Embed(EmbedBlock {
                oembed: OEmbed {
                    embed_type: Some("video".to_string()),
                    embed_url: Some("https://youtu.be/x".to_string()),
                    html: Some("<iframe></iframe>".to_string()),
                },
            }),
        ]);
        assert_eq!(
            rich.as_html(),
            concat!(
                r#"<p class="block-img"><img src="https://images.prismic.io/a.png" alt="banner" /></p>"#,
                r#"<div data-oembed="https://youtu.be/x" data-oembed-type="video"><iframe></iframe></div>"#
            )
        );
    }
}
