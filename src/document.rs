//! Defines [`PosterDocument`], a parsed HTML page whose [`Field`] nodes can be
//! looked up through a [`Schema`] and rewritten in place.

use crate::render::{render_document, EscapeHtml};
use crate::schema::{Field, Schema};
use ego_tree::{NodeId, NodeMut, NodeRef};
use scraper::{Html, Node};
use std::path::Path;

/// Extensions that mark a file as an HTML document.
pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

pub fn has_html_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| HTML_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// A parsed poster page (or template).
pub struct PosterDocument {
    html: Html,
}

impl PosterDocument {
    pub fn parse(source: &str) -> PosterDocument {
        PosterDocument {
            html: Html::parse_document(source),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Returns the id of the node holding `field`, or `None` when the schema's
    /// locator matches nothing.
    pub fn find(&self, schema: &Schema, field: Field) -> Option<NodeId> {
        schema.locate(&self.html, field).map(|element| element.id())
    }

    /// Returns the text of `field`: each text descendant trimmed, empty ones
    /// dropped, the rest joined with a single space.
    pub fn text(&self, schema: &Schema, field: Field) -> Option<String> {
        schema.locate(&self.html, field).map(|element| {
            element
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<&str>>()
                .join(" ")
        })
    }

    /// Replaces every child of `id` with the nodes parsed from `markup`.
    /// Returns `false` if `id` doesn't belong to this document.
    pub fn replace_children(&mut self, id: NodeId, markup: &str) -> bool {
        let fragment = Html::parse_fragment(markup);
        match self.html.tree.get_mut(id) {
            None => false,
            Some(mut node) => {
                while let Some(mut child) = node.first_child() {
                    child.detach();
                }
                graft(&mut node, *fragment.root_element());
                true
            }
        }
    }

    /// Replaces every child of `id` with a single text node holding `text`
    /// verbatim.
    pub fn replace_text(&mut self, id: NodeId, text: &str) -> bool {
        self.replace_children(id, &EscapeHtml(text).to_string())
    }

    /// Serializes the document with a leading doctype. See
    /// [`crate::render`].
    pub fn render(&self) -> String {
        render_document(&self.html)
    }
}

/// Deep-copies the children of `src` (a node of another tree) under `dest`.
fn graft(dest: &mut NodeMut<'_, Node>, src: NodeRef<'_, Node>) {
    for child in src.children() {
        let mut copy = dest.append(child.value().clone());
        graft(&mut copy, child);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{Marker, Selectors};

    fn schema() -> Schema {
        Schema::new(&Selectors::default(), &Marker::default()).unwrap()
    }

    const PAGE: &str = r#"<!DOCTYPE html><html><body>
        <p id="quote" class="q">Old <em>quote</em></p>
        <div class="mt-8"><p class="text-poster-accent">  Old author </p></div>
        </body></html>"#;

    #[test]
    fn test_text_joins_trimmed_pieces() {
        let doc = PosterDocument::parse(PAGE);
        let schema = schema();
        assert_eq!(Some("Old quote".to_owned()), doc.text(&schema, Field::Quote));
        assert_eq!(Some("Old author".to_owned()), doc.text(&schema, Field::Author));
        assert_eq!(None, doc.text(&schema, Field::Number));
    }

    #[test]
    fn test_replace_children_parses_markup() {
        let mut doc = PosterDocument::parse(PAGE);
        let schema = schema();
        let id = doc.find(&schema, Field::Quote).unwrap();
        assert!(doc.replace_children(id, "<b>New</b> words<br/>here"));

        let quote = schema.locate(doc.html(), Field::Quote).unwrap();
        assert_eq!("<b>New</b> words<br>here", quote.inner_html());
        // attributes of the replaced node itself are untouched
        assert_eq!(Some("q"), quote.value().attr("class"));
    }

    #[test]
    fn test_replace_text_does_not_interpret_markup() {
        let mut doc = PosterDocument::parse(PAGE);
        let schema = schema();
        let id = doc.find(&schema, Field::Author).unwrap();
        assert!(doc.replace_text(id, "Plato <Athens> & co"));
        assert_eq!(
            Some("Plato <Athens> & co".to_owned()),
            doc.text(&schema, Field::Author)
        );
        let author = schema.locate(doc.html(), Field::Author).unwrap();
        assert_eq!(0, author.children().filter(|c| c.value().is_element()).count());
    }
}
