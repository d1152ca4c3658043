//! Template syntax tree, parser, walker, and printer used by the flexi passes.
//!
//! Templates are handlebars-flavoured markup: elements, text, `{{mustaches}}`
//! and `{{#blocks}}…{{/blocks}}`. The tree is stored in an arena
//! ([`Template`]) and nodes are addressed by [`NodeId`], so a transform can
//! rewrite a node in place and every holder of its id sees the new contents.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Template`, `Node`, `ElementNode`, `AttrNode`, `BlockStatement`, … |
//! | [`builders`] | constructors for synthesized nodes |
//! | [`error`] | `ParseError` |
//! | [`lexer`] | `Lexer`, `Token` |
//! | [`parser`] | `parse_str` entry point |
//! | [`printer`] | `print` entry point |
//! | [`walker`] | depth-first `visit` |
//!
//! # Quick start
//!
//! ```rust
//! use flexi_syntax::{parse_str, print};
//!
//! let template = parse_str(r#"<box vertical class="card">{{title}}</box>"#).unwrap();
//! let root = template.root();
//! let boxed = template.children(root)[0];
//! assert_eq!(template.element(boxed).unwrap().tag, "box");
//! assert_eq!(print(&template), r#"<box vertical class="card">{{title}}</box>"#);
//! ```

pub mod ast;
pub mod builders;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod walker;

pub use ast::{Node, NodeId, SourcePosition, SourceSpan, Template};
pub use error::ParseError;
pub use parser::parse_str;
pub use printer::print;

#[cfg(test)]
mod parse_tests {
    use super::ast::*;
    use super::*;

    fn ok(src: &str) -> Template { parse_str(src).unwrap() }
    fn err(src: &str) -> ParseError { parse_str(src).unwrap_err() }

    fn first_element(template: &Template) -> &ElementNode {
        template
            .descendants()
            .into_iter()
            .find_map(|id| template.element(id))
            .expect("template has an element")
    }

    #[test] fn empty_template() { assert!(ok("").is_empty()); }
    #[test] fn plain_text() { ok("hello world"); }
    #[test] fn nested_elements() { ok("<box><hbox><vbox></vbox></hbox></box>"); }
    #[test] fn void_element() { ok("<box><img src=\"a.png\"><br></box>"); }
    #[test] fn self_closing() { ok("<grid responsive />"); }
    #[test] fn html_comment() { ok("<!-- layout -->"); }
    #[test] fn mustache_comment() { ok("{{!-- {{not parsed}} --}}{{! short }}"); }
    #[test] fn block_with_hash() { ok(r#"{{#my-card title="x" size=2}}<box></box>{{/my-card}}"#); }
    #[test] fn sub_expression() { ok(r#"<div class={{concat "a" (if b "c")}}></div>"#); }
    #[test] fn less_than_in_text() { ok("a < b"); }

    #[test]
    fn valueless_attribute_is_empty_text() {
        let template = ok("<box vertical></box>");
        let attr = &first_element(&template).attributes[0];
        assert_eq!(attr.name, "vertical");
        assert_eq!(attr.value.chars(), Some(""));
    }

    #[test]
    fn quoted_interpolation_is_concat() {
        let template = ok(r#"<box class="a {{b}}"></box>"#);
        match &first_element(&template).attributes[0].value {
            AttrValue::Concat(concat) => assert_eq!(concat.parts.len(), 2),
            other => panic!("expected concat, got {:?}", other),
        }
    }

    #[test]
    fn unquoted_mustache_value() {
        let template = ok("<box class={{classes}}></box>");
        assert!(matches!(first_element(&template).attributes[0].value, AttrValue::Mustache(_)));
    }

    #[test]
    fn element_and_attribute_locations() {
        let template = ok("<p>\n  <box  sm=\"12\"\n    md=\"6\">\n  </box></p>");
        let element = template
            .descendants()
            .into_iter()
            .filter_map(|id| template.element(id))
            .find(|e| e.tag == "box")
            .unwrap();

        assert_eq!(element.loc.start, SourcePosition::new(2, 2));
        assert_eq!(element.loc.end, SourcePosition::new(4, 8));
        let sm = &element.attributes[0];
        assert_eq!(sm.loc, SourceSpan::new(SourcePosition::new(2, 8), SourcePosition::new(2, 15)));
        assert_eq!(sm.value.loc().start, SourcePosition::new(2, 11));
        let md = &element.attributes[1];
        assert_eq!(md.value.loc().start.line, 3);
    }

    #[test]
    fn err_mismatched_close() {
        let e = err("<box></hbox>");
        assert_eq!((e.line, e.column), (1, 5));
    }
    #[test] fn err_unclosed_element() { err("<box><hbox></hbox>"); }
    #[test] fn err_unclosed_block() { err("{{#each items}}"); }
    #[test] fn err_stray_close() { err("</box>"); }
    #[test] fn err_unterminated_attribute() { err("<box class=\"a></box>"); }
    #[test] fn err_param_after_hash() { err("{{foo a=1 b}}"); }
    #[test] fn err_mismatched_block() { err("{{#a}}{{/b}}"); }
}
