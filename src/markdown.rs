//! Markdown pipeline for article bodies.
//!
//! [`render`] parses one Markdown body with pulldown-cmark and folds the event
//! stream into a small node tree. Footnote definitions are cut out of the tree
//! into a [`FootnoteTable`], and every footnote reference becomes a
//! [`Node::FootnoteMarker`]. [`render_html`] turns the tree back into HTML,
//! resolving markers against the table:
//!
//! - definition found: an inline tooltip marker
//!   (`<span class="footnote">[id]<span class="footnote-tooltip">…</span></span>`)
//! - definition missing: a plain `<sup class="footnote-ref">[id]</sup>`
//!
//! Nothing here can fail. Markdown has no syntax errors, and the tree builder
//! ignores end events that do not match an open element and closes anything
//! still open when the stream ends. Each call builds its own table, so
//! concurrent renders share nothing.

use crate::types::{Footnote, FootnoteTable};
use maud::{Markup, PreEscaped};
use pulldown_cmark::{Alignment, CodeBlockKind, Event, LinkType, Options, Parser, Tag, TagEnd};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// One node of a rendered article body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    /// HTML written directly in the Markdown source, passed through as is.
    Raw(String),
    Element(Element),
    /// A `[^id]` reference, resolved against the footnote table at render time.
    FootnoteMarker(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }
}

/// Output of [`render`].
#[derive(Debug, Clone, Default)]
pub struct RenderedMarkdown {
    pub nodes: Vec<Node>,
    pub footnotes: FootnoteTable,
}

/// Parse a Markdown body into a node tree and its footnote table.
pub fn render(source: &str) -> RenderedMarkdown {
    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(source, parser_options()) {
        builder.push(event);
    }
    builder.finish()
}

/// Old-style footnotes still emit a reference for `[^x]` when `x` is never
/// defined, which is what lets a missing definition fall back to `<sup>`.
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_OLD_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

// ============================================================================
// Tree building
// ============================================================================

/// Marks an open footnote definition on the stack. Not a valid HTML tag name,
/// so it cannot collide with a real element.
const FOOTNOTE_FRAME: &str = "#footnote";

struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    body_open: bool,
    column: usize,
}

struct TreeBuilder {
    /// `stack[0]` is the document root and is never popped.
    stack: Vec<Element>,
    footnotes: FootnoteTable,
    table: Option<TableState>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Element::new("")],
            footnotes: FootnoteTable::default(),
            table: None,
        }
    }

    fn push(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.append(Node::Text(text.into_string())),
            Event::Code(code) => {
                let mut el = Element::new("code");
                el.children.push(Node::Text(code.into_string()));
                self.append(Node::Element(el));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.append(Node::Raw(html.into_string()))
            }
            Event::FootnoteReference(id) => self.append(Node::FootnoteMarker(id.into_string())),
            Event::SoftBreak => self.append(Node::Text("\n".to_string())),
            Event::HardBreak => self.append(Node::Element(Element::new("br"))),
            Event::Rule => self.append(Node::Element(Element::new("hr"))),
            Event::TaskListMarker(checked) => {
                let mut el = Element::new("input")
                    .with_attr("type", "checkbox")
                    .with_attr("disabled", "");
                if checked {
                    el = el.with_attr("checked", "");
                }
                self.append(Node::Element(el));
            }
            Event::InlineMath(text) | Event::DisplayMath(text) => {
                self.append(Node::Text(text.into_string()))
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open(Element::new("p")),
            Tag::Heading {
                level,
                id,
                classes,
                attrs,
            } => {
                let mut el = Element::new(&level.to_string());
                if let Some(id) = id {
                    el = el.with_attr("id", id.into_string());
                }
                if !classes.is_empty() {
                    let joined: Vec<String> = classes.iter().map(|c| c.to_string()).collect();
                    el = el.with_attr("class", joined.join(" "));
                }
                for (key, value) in attrs {
                    el = el.with_attr(&key, value.map(|v| v.into_string()).unwrap_or_default());
                }
                self.open(el);
            }
            Tag::BlockQuote(_) => self.open(Element::new("blockquote")),
            Tag::CodeBlock(kind) => {
                self.open(Element::new("pre"));
                let mut code = Element::new("code");
                if let CodeBlockKind::Fenced(info) = kind
                    && let Some(lang) = info.split_whitespace().next()
                {
                    code = code.with_attr("class", format!("language-{lang}"));
                }
                self.open(code);
            }
            Tag::HtmlBlock => {}
            Tag::List(Some(start)) => {
                let mut el = Element::new("ol");
                if start != 1 {
                    el = el.with_attr("start", start.to_string());
                }
                self.open(el);
            }
            Tag::List(None) => self.open(Element::new("ul")),
            Tag::Item => self.open(Element::new("li")),
            Tag::FootnoteDefinition(id) => {
                self.open(Element::new(FOOTNOTE_FRAME).with_attr("id", id.into_string()))
            }
            Tag::Table(alignments) => {
                self.table = Some(TableState {
                    alignments,
                    in_head: false,
                    body_open: false,
                    column: 0,
                });
                self.open(Element::new("table"));
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                    table.column = 0;
                }
                self.open(Element::new("thead"));
                self.open(Element::new("tr"));
            }
            Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.column = 0;
                    if !table.body_open {
                        table.body_open = true;
                        self.open(Element::new("tbody"));
                    }
                }
                self.open(Element::new("tr"));
            }
            Tag::TableCell => {
                let (name, align) = match self.table.as_mut() {
                    Some(table) => {
                        let align = table.alignments.get(table.column).copied();
                        table.column += 1;
                        (if table.in_head { "th" } else { "td" }, align)
                    }
                    None => ("td", None),
                };
                let mut el = Element::new(name);
                if let Some(style) = align.and_then(alignment_style) {
                    el = el.with_attr("style", style);
                }
                self.open(el);
            }
            Tag::Emphasis => self.open(Element::new("em")),
            Tag::Strong => self.open(Element::new("strong")),
            Tag::Strikethrough => self.open(Element::new("del")),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let href = match link_type {
                    LinkType::Email => format!("mailto:{dest_url}"),
                    _ => dest_url.into_string(),
                };
                let mut el = Element::new("a").with_attr("href", href);
                if !title.is_empty() {
                    el = el.with_attr("title", title.into_string());
                }
                self.open(el);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut el = Element::new("img").with_attr("src", dest_url.into_string());
                if !title.is_empty() {
                    el = el.with_attr("title", title.into_string());
                }
                self.open(el);
            }
            // Extensions that are not enabled; keep the stack balanced anyway.
            _ => self.open(Element::new("span")),
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::HtmlBlock => {}
            TagEnd::CodeBlock => {
                self.close();
                self.close();
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = false;
                }
                self.close();
                self.close();
            }
            TagEnd::Table => {
                if self.table.take().is_some_and(|t| t.body_open) {
                    self.close();
                }
                self.close();
            }
            _ => self.close(),
        }
    }

    fn open(&mut self, el: Element) {
        self.stack.push(el);
    }

    /// Pop the innermost element into its parent. A close with nothing open
    /// is dropped.
    fn close(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(mut el) = self.stack.pop() else {
            return;
        };

        if el.name == FOOTNOTE_FRAME {
            let id = el.attrs.remove("id").unwrap_or_default();
            let footnote = footnote_from_children(el.children);
            self.footnotes.insert(&id, footnote);
            return;
        }

        if el.name == "img" {
            let alt = plain_text(&el.children);
            el.children.clear();
            el.attrs.insert("alt".to_string(), alt);
        }

        self.append(Node::Element(el));
    }

    fn append(&mut self, node: Node) {
        if let Some(top) = self.stack.last_mut() {
            top.children.push(node);
        }
    }

    fn finish(mut self) -> RenderedMarkdown {
        while self.stack.len() > 1 {
            self.close();
        }
        let root = self.stack.pop().map(|el| el.children).unwrap_or_default();
        RenderedMarkdown {
            nodes: root,
            footnotes: self.footnotes,
        }
    }
}

fn alignment_style(align: Alignment) -> Option<&'static str> {
    match align {
        Alignment::None => None,
        Alignment::Left => Some("text-align: left"),
        Alignment::Center => Some("text-align: center"),
        Alignment::Right => Some("text-align: right"),
    }
}

/// A definition that is a single paragraph is shown inline in the tooltip,
/// so the `<p>` wrapper is dropped.
fn footnote_from_children(mut children: Vec<Node>) -> Footnote {
    let single_paragraph = matches!(children.as_slice(), [Node::Element(el)] if el.name == "p");
    let text = if single_paragraph {
        if let Some(Node::Element(p)) = children.pop() {
            children = p.children;
        }
        plain_text(&children)
    } else {
        children
            .iter()
            .map(|block| plain_text(std::slice::from_ref(block)))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut html = String::new();
    write_nodes(&mut html, &children, &FootnoteTable::default());
    Footnote { text, html }
}

/// Concatenated text content, without markup.
pub fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    collect_text(nodes, &mut out);
    out
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Raw(_) => {}
            Node::Element(el) => collect_text(&el.children, out),
            Node::FootnoteMarker(id) => {
                out.push('[');
                out.push_str(id);
                out.push(']');
            }
        }
    }
}

// ============================================================================
// HTML serialization
// ============================================================================

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input"];

/// Serialize a node tree, resolving footnote markers against `footnotes`.
pub fn render_html(nodes: &[Node], footnotes: &FootnoteTable) -> Markup {
    let mut out = String::new();
    write_nodes(&mut out, nodes, footnotes);
    PreEscaped(out)
}

fn write_nodes(out: &mut String, nodes: &[Node], footnotes: &FootnoteTable) {
    for node in nodes {
        write_node(out, node, footnotes);
    }
}

fn write_node(out: &mut String, node: &Node, footnotes: &FootnoteTable) {
    match node {
        Node::Text(text) => out.push_str(&html_escape(text)),
        Node::Raw(html) => out.push_str(html),
        Node::FootnoteMarker(id) => write_footnote_marker(out, id, footnotes),
        Node::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (key, value) in &el.attrs {
                out.push(' ');
                out.push_str(key);
                if !value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&html_escape(value));
                    out.push('"');
                }
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&el.name.as_str()) {
                return;
            }
            write_nodes(out, &el.children, footnotes);
            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
    }
}

fn write_footnote_marker(out: &mut String, id: &str, footnotes: &FootnoteTable) {
    let label = html_escape(id);
    match footnotes.get(id) {
        Some(footnote) => {
            out.push_str("<span class=\"footnote\" tabindex=\"0\">[");
            out.push_str(&label);
            out.push_str("]<span class=\"footnote-tooltip\" role=\"tooltip\">");
            out.push_str(&footnote.html);
            out.push_str("</span></span>");
        }
        None => {
            out.push_str("<sup class=\"footnote-ref\">[");
            out.push_str(&label);
            out.push_str("]</sup>");
        }
    }
}

fn html_escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"']) {
        return Cow::Borrowed(s);
    }
    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
