//! Landing page and HTML rendering of analyze results.

use axum::response::Html;
use comrak::{markdown_to_html, Options};
use copilot_workflow::{Block, Presentation};

pub async fn index() -> Html<String> {
    Html(render_page("", None))
}

pub async fn health() -> &'static str {
    "ok"
}

/// Result area content: either the request's blocks or a request-level error.
pub enum PageResult<'a> {
    Presented(&'a Presentation),
    Failed(&'a str),
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// CommonMark to HTML. Raw HTML in the source is dropped, never passed through.
fn render_markdown(text: &str) -> String {
    let options = Options::default();
    markdown_to_html(text, &options)
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Success(t) => format!(r#"<div class="alert alert-success">{}</div>"#, escape_html(t)),
        Block::Info(t)    => format!(r#"<div class="alert alert-info">{}</div>"#, escape_html(t)),
        Block::Error(t)   => format!(r#"<div class="alert alert-danger">{}</div>"#, escape_html(t)),
        Block::Subheading(t) => format!("<h3>{}</h3>", escape_html(t)),
        Block::Markdown(t) => format!(r#"<div class="markdown">{}</div>"#, render_markdown(t)),
    }
}

pub fn render_page(query: &str, result: Option<PageResult<'_>>) -> String {
    let results_html = match result {
        None => String::new(),
        Some(PageResult::Failed(message)) => format!(
            r#"<div class="alert alert-danger">Request failed: {}</div>"#,
            escape_html(message)
        ),
        Some(PageResult::Presented(p)) => {
            let blocks: String = p.blocks.iter().map(render_block).collect();
            format!(
                r#"<section class="results">{}<p class="text-muted small">Request {}</p></section>"#,
                blocks, p.request_id
            )
        }
    };

    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>CRISPR Copilot</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; }}
        .alert {{ padding: .75rem 1rem; border-radius: 6px; margin: .75rem 0; }}
        .alert-success {{ background: #e6f4ea; color: #1e4620; }}
        .alert-info {{ background: #e8f0fe; color: #174ea6; }}
        .alert-danger {{ background: #fce8e6; color: #a50e0e; }}
        .markdown {{ margin: .75rem 0; }}
        .text-muted {{ color: #5f6368; }}
        .small {{ font-size: .8rem; }}
        label {{ display: block; margin-top: 1rem; }}
        input[type=text] {{ width: 100%; padding: .5rem; }}
        button {{ margin-top: 1rem; padding: .5rem 1.25rem; }}
    </style>
</head>
<body>
    <h1>CRISPR Copilot: Smart Companion to mEdit</h1>
    <p>This tool assists clinicians and researchers in navigating disease-causing mutations.
       Enter a variant or upload a screenshot, and we'll help with interpretation, histology, or even generate CRISPR guides.</p>
    <form method="post" action="/analyze" enctype="multipart/form-data">
        <label for="query">Enter a genomic coordinate or HGVS (HG38) mutation (e.g. chr1:123456A&gt;T, NM_017547.4...), or just a general question:</label>
        <input type="text" id="query" name="query" value="{}">
        <label for="image">Or upload a screenshot with mutation details:</label>
        <input type="file" id="image" name="image" accept=".png,.jpg,.jpeg">
        <button type="submit">Analyze Input</button>
    </form>
    {}
</body>
</html>"#, escape_html(query), results_html)
}
