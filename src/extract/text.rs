use scraper::{ElementRef, Html};

/// Elements whose text never reaches the reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements rendered on their own line; their text never runs into a neighbour's
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "caption", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "option", "p", "pre", "section", "table",
    "tbody", "td", "tfoot", "th", "thead", "title", "tr", "ul",
];

/// Flattens the document into the text a visitor would see
///
/// Inline runs are concatenated as written, so `info<span>@</span>acme.test`
/// reads `info@acme.test`. Block elements are separated by a space and
/// whitespace runs collapse to one space.
pub fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    collect_text(document.root_element(), &mut text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, text: &mut String) {
    let name = element.value().name();
    if HIDDEN_ELEMENTS.contains(&name) {
        return;
    }

    let block = BLOCK_ELEMENTS.contains(&name);
    if block {
        text.push(' ');
    }

    for child in element.children() {
        if let Some(chunk) = child.value().as_text() {
            text.push_str(chunk);
        } else if let Some(child) = ElementRef::wrap(child) {
            collect_text(child, text);
        }
    }

    if block {
        text.push(' ');
    }
}
