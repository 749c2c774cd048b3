// src/extractors/tutorial.rs

// --- Imports ---
use crate::site::models::{bare_name, display_path, ContentBlock, Tutorial};
use ego_tree::{NodeId, NodeRef};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::{Node, Text};
use scraper::{ElementRef, Html, Selector};

// --- CSS Selectors (Lazy Static) ---
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("#maincol h2.posttitle > a").expect("Failed to compile TITLE_SELECTOR")
});

static CONTENT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.postcontent").expect("Failed to compile CONTENT_SELECTOR")
});

// A paragraph holding a linked picture is an image block, not text
static LINKED_IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a > img").expect("Failed to compile LINKED_IMAGE_SELECTOR")
});

static IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("img").expect("Failed to compile IMAGE_SELECTOR")
});

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a").expect("Failed to compile ANCHOR_SELECTOR")
});

static STRONG_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("strong").expect("Failed to compile STRONG_SELECTOR")
});

static EM_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("em").expect("Failed to compile EM_SELECTOR")
});

static SPAN_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("span").expect("Failed to compile SPAN_SELECTOR")
});

static LINK_TEXT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a span").expect("Failed to compile LINK_TEXT_SELECTOR")
});

// Same whitespace set the site's text is squashed with (includes zero-width space)
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("[\u{20}\u{09}\u{0C}\u{200B}\u{0A}\u{0D}]+").expect("Failed to compile WHITESPACE_RE")
});

// Stands in for <br> until whitespace is squashed; the parser never emits NUL in text
const BREAK_MARK: char = '\u{0}';

// --- Main Extractor Structure ---
#[derive(Debug, Default)]
pub struct TutorialExtractor;

impl TutorialExtractor {
    pub fn new() -> Self { Self {} }

    /// Builds a `Tutorial` (title, content blocks and image URLs) from a page.
    /// Never fails: missing pieces of markup degrade to empty values.
    pub fn extract(&self, html_content: &str, url: &str) -> Tutorial {
        let mut document = Html::parse_document(html_content);

        let title = document
            .select(&TITLE_SELECTOR)
            .next()
            .map(flatten_text)
            .unwrap_or_default();
        if title.is_empty() {
            tracing::warn!("No tutorial title found on {}", url);
        }

        let mut tutorial = Tutorial {
            url: url.to_string(),
            title,
            ..Default::default()
        };

        // Collect ids first, paragraphs are rewritten in place while we walk
        let children: Vec<NodeId> = match document.select(&CONTENT_SELECTOR).next() {
            Some(container) => container
                .children()
                .filter_map(ElementRef::wrap)
                .map(|child| child.id())
                .collect(),
            None => {
                tracing::warn!("No content container found on {}", url);
                return tutorial;
            }
        };
        tracing::debug!("Content container has {} element children", children.len());

        for id in children {
            if let Some(block) = self.extract_block(&mut document, id, &mut tutorial.images) {
                tracing::trace!("Extracted block: {:?}", block);
                tutorial.content.push(block);
            }
        }

        tracing::info!(
            "Extracted '{}': {} blocks, {} image references",
            tutorial.title,
            tutorial.content.len(),
            tutorial.images.len()
        );
        tutorial
    }

    /// Classifies one child of the content container by tag and shape.
    fn extract_block(&self, document: &mut Html, id: NodeId, images: &mut Vec<String>) -> Option<ContentBlock> {
        let element = element_by_id(document, id)?;
        let tag = element.value().name().to_string();

        let block = match tag.as_str() {
            "h1" => ContentBlock::BigHeader { text: flatten_text(element) },
            "h2" => ContentBlock::Header { text: flatten_text(element) },
            "h3" => ContentBlock::SubHeader { text: flatten_text(element) },
            "ul" => ContentBlock::List {
                items: element
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|child| child.value().name() == "li")
                    .map(flatten_text)
                    .collect(),
            },
            "pre" => ContentBlock::Code { text: code_text(element) },
            "p" if contains(element, &LINKED_IMAGE_SELECTOR) => extract_image(element, images),
            "div" | "a" if contains(element, &IMAGE_SELECTOR) => extract_image(element, images),
            "p" => ContentBlock::Text { text: rewrite_paragraph(document, id, images) },
            other => {
                tracing::trace!("Ignoring <{}> in content container", other);
                return None;
            }
        };

        Some(block)
    }
}

fn element_by_id(document: &Html, id: NodeId) -> Option<ElementRef<'_>> {
    document.tree.get(id).and_then(ElementRef::wrap)
}

fn contains(element: ElementRef, selector: &Selector) -> bool {
    element.select(selector).any(|found| found.id() != element.id())
}

/// Text of an element the way it reads on the page: whitespace runs squashed
/// to one space across the whole element, `<br>` kept as a line break, lines
/// and ends trimmed.
fn flatten_text(element: ElementRef) -> String {
    let mut raw = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(piece) => raw.push_str(piece),
            Node::Element(el) if el.name() == "br" => raw.push(BREAK_MARK),
            _ => {}
        }
    }

    WHITESPACE_RE
        .replace_all(&raw, " ")
        .split(BREAK_MARK)
        .map(|line| line.trim_matches(' '))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Raw code text, line endings normalized and surrounding blank lines dropped.
fn code_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .replace("\r\n", "\n")
        .trim_matches(|c: char| c == '\n' || c == '\r')
        .to_string()
}

/// Image block for a linked or wrapped picture. Both URLs are recorded for
/// download when the link points somewhere other than the picture itself.
fn extract_image(element: ElementRef, images: &mut Vec<String>) -> ContentBlock {
    let src = element
        .select(&IMAGE_SELECTOR)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string);

    let anchor_href = if element.value().name() == "a" {
        element.value().attr("href")
    } else {
        element
            .select(&ANCHOR_SELECTOR)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
    }
    .map(str::to_string);

    match &src {
        Some(src) => images.push(src.clone()),
        None => tracing::warn!("Image without src in <{}>", element.value().name()),
    }

    let href = match anchor_href {
        Some(href) => {
            if src.as_deref() != Some(href.as_str()) {
                images.push(href.clone());
            }
            Some(href)
        }
        None => src.clone(),
    };

    ContentBlock::Image { href, src }
}

/// Rewrites inline markup of a paragraph into Markdown text, in order:
/// images, then bold and italics, then span-wrapped links.
fn rewrite_paragraph(document: &mut Html, id: NodeId, images: &mut Vec<String>) -> String {
    replace_each(document, id, &IMAGE_SELECTOR, |img| {
        let src = img.value().attr("src");
        if let Some(src) = src {
            images.push(src.to_string());
        }
        let path = display_path(src.unwrap_or_default());
        let alt = img
            .value()
            .attr("alt")
            .filter(|alt| !alt.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| bare_name(&path));
        Some(format!("![{}]({})", alt, path))
    });

    replace_each(document, id, &STRONG_SELECTOR, |el| Some(format!("**{}**", flatten_text(el))));
    replace_each(document, id, &EM_SELECTOR, |el| Some(format!("*{}*", flatten_text(el))));

    replace_each(document, id, &SPAN_SELECTOR, |span| {
        let anchor = span.select(&ANCHOR_SELECTOR).next()?;
        let href = anchor.value().attr("href").unwrap_or_default().trim().to_string();
        let text = span
            .select(&LINK_TEXT_SELECTOR)
            .filter(|inner| inner.id() != span.id())
            .map(flatten_text)
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Some(format!("[{}]({})", text.trim(), href))
    });

    element_by_id(document, id).map(flatten_text).unwrap_or_default()
}

/// Replaces every element under `scope` matching `selector` with a text node
/// produced by `render`. Elements already removed by an earlier replacement
/// in the same pass are skipped; `render` returning `None` keeps the element.
fn replace_each<F>(document: &mut Html, scope: NodeId, selector: &Selector, mut render: F)
where
    F: FnMut(ElementRef) -> Option<String>,
{
    let targets: Vec<NodeId> = match element_by_id(document, scope) {
        Some(root) => root
            .select(selector)
            .map(|el| el.id())
            .filter(|target| *target != scope)
            .collect(),
        None => return,
    };

    for target in targets {
        let replacement = match document.tree.get(target) {
            Some(node) if is_attached_under(node, scope) => ElementRef::wrap(node).and_then(&mut render),
            _ => None,
        };

        if let Some(text) = replacement {
            if let Some(mut node) = document.tree.get_mut(target) {
                node.insert_before(Node::Text(Text { text: text.as_str().into() }));
                node.detach();
            }
        }
    }
}

fn is_attached_under(node: NodeRef<'_, Node>, scope: NodeId) -> bool {
    node.ancestors().any(|ancestor| ancestor.id() == scope)
}
