//! Markdown to HTML.
//!
//! Fenced code blocks come out as `<pre><code class="language-x">`. Raw HTML
//! embedded in a model answer is escaped rather than passed through, and
//! links or images pointing at script-capable schemes keep only their text.

use minijinja::{Environment, context};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

use codebuddy_types::error::ExportError;

const DOCUMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; line-height: 1.55; color: #1f2328; }
pre { background: #f6f8fa; padding: 0.8rem 1rem; border-radius: 6px; overflow-x: auto; }
code { font-family: ui-monospace, Menlo, Consolas, monospace; font-size: 0.92em; }
table { border-collapse: collapse; }
th, td { border: 1px solid #d0d7de; padding: 0.3rem 0.6rem; }
</style>
</head>
<body>
{{ body }}
</body>
</html>
"#;

pub(crate) fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

const BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Browsers ignore ASCII whitespace and control characters inside a scheme.
fn is_unsafe_url(url: &str) -> bool {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

/// Render markdown to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    // One entry per open link/image: whether its tags were dropped.
    let mut dropped: Vec<bool> = Vec::new();
    let parser = Parser::new_ext(markdown, markdown_options()).filter_map(move |event| {
        let unsafe_target = match &event {
            Event::Start(Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. }) => {
                Some(is_unsafe_url(dest_url))
            }
            _ => None,
        };

        match (event, unsafe_target) {
            (Event::Html(raw) | Event::InlineHtml(raw), _) => Some(Event::Text(raw)),
            (start @ Event::Start(_), Some(drop_tag)) => {
                dropped.push(drop_tag);
                (!drop_tag).then_some(start)
            }
            (end @ Event::End(TagEnd::Link | TagEnd::Image), _) => {
                let was_dropped = dropped.pop().unwrap_or(false);
                (!was_dropped).then_some(end)
            }
            (other, _) => Some(other),
        }
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Render markdown into a standalone HTML document.
pub fn export_html_document(markdown: &str) -> Result<String, ExportError> {
    if markdown.trim().is_empty() {
        return Err(ExportError::Empty);
    }

    let mut env = Environment::new();
    env.add_template("answer.html", DOCUMENT_TEMPLATE)
        .map_err(|e| ExportError::Render(e.to_string()))?;
    let template = env
        .get_template("answer.html")
        .map_err(|e| ExportError::Render(e.to_string()))?;

    template
        .render(context! {
            title => "CodeBuddy Answer",
            body => minijinja::Value::from_safe_string(markdown_to_html(markdown)),
        })
        .map_err(|e| ExportError::Render(e.to_string()))
}
