//! Serializes a parsed document back into HTML. The output is pretty-printed:
//! every element starts on its own line and is indented by its depth, text is
//! trimmed, and elements whose only child is a short text run stay on one
//! line. The content of raw-text elements (`<script>`, `<style>`,
//! `<noscript>` and the like) and whitespace-sensitive elements (`<pre>`,
//! `<textarea>`) is written verbatim.
//!
//! Escaping is delegated to [`pulldown_cmark::escape`] through the
//! [`EscapeHtml`] and [`EscapeHref`] display adaptors.

use ego_tree::NodeRef;
use pulldown_cmark::escape::{escape_href, escape_html, StrWrite};
use scraper::{Html, Node};
use std::fmt::{self, Display, Write};
use std::io;

/// The doctype line written at the top of every rendered document.
pub const DOCTYPE: &str = "<!DOCTYPE html>";

const INDENT: &str = "  ";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content the parser keeps as unparsed text. `noscript` is
/// among them because documents are parsed with scripting enabled.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "script", "style", "xmp",
];

const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "textarea"];

struct Adaptor<'a, T> {
    formatter: &'a mut T,
    result: fmt::Result,
}

impl<T> Adaptor<'_, T> {
    fn handle_result(&mut self, result: fmt::Result) -> io::Result<()> {
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                self.result = result;
                Err(io::Error::new(io::ErrorKind::Other, e))
            }
        }
    }
}

impl<T: fmt::Write> StrWrite for Adaptor<'_, T> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        let result = self.formatter.write_str(s);
        self.handle_result(result)
    }

    fn write_fmt(&mut self, args: fmt::Arguments) -> io::Result<()> {
        let result = self.formatter.write_fmt(args);
        self.handle_result(result)
    }
}

/// Displays a string with `&`, `<`, `>` and `"` escaped, which makes it safe
/// both as element text and inside a double-quoted attribute value.
pub struct EscapeHtml<'a>(pub &'a str);

impl Display for EscapeHtml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_html(&mut adaptor, self.0);
        adaptor.result
    }
}

/// Displays a string escaped for use as an `href` value.
pub struct EscapeHref<'a>(pub &'a str);

impl Display for EscapeHref<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_href(&mut adaptor, self.0);
        adaptor.result
    }
}

/// Renders a whole document: the [`DOCTYPE`] line followed by the
/// pretty-printed tree. Any doctype node in the tree itself is dropped in
/// favor of the fixed line.
pub fn render_document(html: &Html) -> String {
    let mut out = String::from(DOCTYPE);
    out.push('\n');
    // Writing into a `String` cannot fail.
    let _ = render_children(&mut out, html.tree.root(), 0);
    out
}

fn render_children<W: Write>(w: &mut W, node: NodeRef<'_, Node>, depth: usize) -> fmt::Result {
    for child in node.children() {
        render_node(w, child, depth)?;
    }
    Ok(())
}

fn render_node<W: Write>(w: &mut W, node: NodeRef<'_, Node>, depth: usize) -> fmt::Result {
    match node.value() {
        Node::Element(element) => {
            let name = element.name();
            indent(w, depth)?;
            write!(w, "<{}", name)?;

            // Sorted so repeated runs serialize attributes identically.
            let mut attrs: Vec<(&str, &str)> = element.attrs().collect();
            attrs.sort();
            for (key, value) in attrs {
                write!(w, " {}=\"{}\"", key, EscapeHtml(value))?;
            }
            w.write_char('>')?;

            if VOID_ELEMENTS.contains(&name) {
                return w.write_char('\n');
            }

            if RAW_TEXT_ELEMENTS.contains(&name) {
                let raw = raw_text(node);
                let raw = raw.trim_matches('\n');
                if raw.trim().is_empty() {
                    return writeln!(w, "</{}>", name);
                }
                writeln!(w)?;
                writeln!(w, "{}", raw.trim_end())?;
                indent(w, depth)?;
                return writeln!(w, "</{}>", name);
            }

            if PREFORMATTED_ELEMENTS.contains(&name) {
                write!(w, "{}", EscapeHtml(&raw_text(node)))?;
                return writeln!(w, "</{}>", name);
            }

            match inline_text(node) {
                Some(text) => writeln!(w, "{}</{}>", EscapeHtml(text), name),
                None => {
                    writeln!(w)?;
                    render_children(w, node, depth + 1)?;
                    indent(w, depth)?;
                    writeln!(w, "</{}>", name)
                }
            }
        }
        Node::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(());
            }
            indent(w, depth)?;
            writeln!(w, "{}", EscapeHtml(text))
        }
        Node::Comment(comment) => {
            indent(w, depth)?;
            writeln!(w, "<!--{}-->", &**comment)
        }
        Node::Doctype(_) => Ok(()),
        _ => render_children(w, node, depth),
    }
}

/// Returns the trimmed text of `node` when it has no element children and its
/// text fits on one line, or `Some("")` when it has no children at all.
fn inline_text<'a>(node: NodeRef<'a, Node>) -> Option<&'a str> {
    let mut children = node.children();
    match (children.next(), children.next()) {
        (None, _) => Some(""),
        (Some(only), None) => match only.value() {
            Node::Text(text) if !text.trim().contains('\n') => Some(text.trim()),
            _ => None,
        },
        _ => None,
    }
}

fn raw_text(node: NodeRef<'_, Node>) -> String {
    node.descendants()
        .filter_map(|n| match n.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
        .collect()
}

fn indent<W: Write>(w: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        w.write_str(INDENT)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            "a &lt;b&gt; &amp; &quot;c&quot;",
            EscapeHtml("a <b> & \"c\"").to_string()
        );
    }

    #[test]
    fn test_escape_href_keeps_plain_file_names() {
        assert_eq!("poster_plato.html", EscapeHref("poster_plato.html").to_string());
    }

    #[test]
    fn test_render_document_starts_with_doctype() {
        let html = Html::parse_document("<!DOCTYPE html><html><head></head><body></body></html>");
        let rendered = render_document(&html);
        assert!(rendered.starts_with("<!DOCTYPE html>\n<html>\n"));
        assert_eq!(1, rendered.matches("<!DOCTYPE").count());
    }

    #[test]
    fn test_render_indents_and_inlines_short_text() {
        let html = Html::parse_document(
            "<html><body><div class=\"a\"><p>Hello   there</p><br></div></body></html>",
        );
        let rendered = render_document(&html);
        let wanted = "<!DOCTYPE html>
<html>
  <head></head>
  <body>
    <div class=\"a\">
      <p>Hello   there</p>
      <br>
    </div>
  </body>
</html>
";
        assert_eq!(wanted, rendered);
    }

    #[test]
    fn test_render_keeps_script_verbatim() {
        let html = Html::parse_document(
            "<html><head><script>if (a < b && c) { x(); }</script></head><body></body></html>",
        );
        let rendered = render_document(&html);
        assert!(rendered.contains("if (a < b && c) { x(); }"));
    }

    #[test]
    fn test_render_keeps_noscript_markup() {
        let html = Html::parse_document(
            "<html><head><noscript><link rel=\"stylesheet\" href=\"a.css\"></noscript></head>\
             <body><noscript><img src=\"x.png\"></noscript></body></html>",
        );
        let rendered = render_document(&html);
        assert!(rendered.contains("<link rel=\"stylesheet\" href=\"a.css\">"));
        assert!(rendered.contains("<img src=\"x.png\">"));
        assert!(!rendered.contains("&lt;"));

        // and survives another round
        assert_eq!(rendered, render_document(&Html::parse_document(&rendered)));
    }

    #[test]
    fn test_render_is_stable() {
        let source = "<html><body><p id=\"quote\" class=\"q\" data-x=\"1\">Text</p></body></html>";
        let first = render_document(&Html::parse_document(source));
        let second = render_document(&Html::parse_document(source));
        assert_eq!(first, second);
        assert!(first.contains("<p class=\"q\" data-x=\"1\" id=\"quote\">Text</p>"));
    }
}
