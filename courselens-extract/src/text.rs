//! Visible-text flattening with footer/nav pruning.

use ego_tree::NodeRef;
use scraper::{Html, Node};

/// Elements whose subtrees never contribute visible content.
const SKIP_ELEMENTS: &[&str] = &["footer", "nav", "script", "style", "noscript", "head"];

/// Class tokens that mark site-chrome containers. Pruned before flattening
/// so footer copy cannot leak into regex-based field extraction.
const FOOTER_CLASSES: &[&str] = &[
    "footer",
    "site-footer",
    "page-footer",
    "global-footer",
    "company-info",
];

/// Flatten a parsed document into its visible text, skipping footer, nav,
/// script, and style subtrees. Whitespace runs are collapsed to one space.
pub fn visible_text(html: &Html) -> String {
    let mut out = String::new();
    collect(html.tree.root(), &mut out);
    collapse_whitespace(&out)
}

fn collect(node: NodeRef<'_, Node>, out: &mut String) {
    if let Node::Element(el) = node.value() {
        if SKIP_ELEMENTS.contains(&el.name()) {
            return;
        }
        if let Some(class) = el.attr("class") {
            let class = class.to_lowercase();
            if class
                .split_whitespace()
                .any(|token| FOOTER_CLASSES.contains(&token))
            {
                return;
            }
        }
    }
    if let Node::Text(t) = node.value() {
        out.push(' ');
        out.push_str(&t.text);
        return;
    }
    for child in node.children() {
        collect(child, out);
    }
}

/// Collapse all whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_and_collapses() {
        let html = Html::parse_document(
            "<html><body><h1>Routing</h1><p>Learn   the\n basics.</p></body></html>",
        );
        assert_eq!(visible_text(&html), "Routing Learn the basics.");
    }

    #[test]
    fn footer_and_nav_subtrees_are_pruned() {
        let html = Html::parse_document(
            r#"<body>
                <nav>Home | Courses</nav>
                <p>Actual content.</p>
                <footer>Copyright 2024. All rights reserved.</footer>
                <div class="global-footer">Privacy Policy</div>
            </body>"#,
        );
        let text = visible_text(&html);
        assert_eq!(text, "Actual content.");
    }

    #[test]
    fn script_and_style_are_invisible() {
        let html = Html::parse_document(
            "<body><style>p { color: red }</style><script>var x = 1;</script><p>Hi</p></body>",
        );
        assert_eq!(visible_text(&html), "Hi");
    }

    #[test]
    fn footer_class_must_match_a_whole_token() {
        // "footerish" is not the "footer" class; it must survive.
        let html = Html::parse_document(
            r#"<body><div class="footerish">Keep me</div><div class="page-footer">Drop me</div></body>"#,
        );
        assert_eq!(visible_text(&html), "Keep me");
    }
}
