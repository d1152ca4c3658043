//! Re-serializes a [`Template`] to source text.
//!
//! Source locations are ignored; output is normalized (`<tag />` for
//! self-closing elements, double-quoted attribute values, `{{!-- --}}` for
//! mustache comments).

use std::fmt::{self, Write};

use crate::ast::{
    AttrNode, AttrValue, ConcatPart, ConcatStatement, Expression, Hash, MustacheStatement, Node,
    NodeId, Template,
};

/// Print the whole template.
pub fn print(template: &Template) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = Printer { template, out: &mut out }.node(template.root());
    out
}

/// Print an attribute value the way it appears after `name=`.
pub fn print_attr_value(value: &AttrValue) -> String {
    let mut out = String::new();
    let _ = write_attr_value(&mut out, value);
    out
}

struct Printer<'t, 'o> {
    template: &'t Template,
    out: &'o mut String,
}

impl Printer<'_, '_> {
    fn children(&mut self, ids: &[NodeId]) -> fmt::Result {
        ids.iter().try_for_each(|&id| self.node(id))
    }

    fn node(&mut self, id: NodeId) -> fmt::Result {
        let template = self.template;
        match &template[id] {
            Node::Program(block) => self.children(&block.body),
            Node::Text(text) => self.out.write_str(&text.chars),
            Node::Mustache(mustache) => write_mustache(self.out, mustache),
            Node::Comment(comment) if comment.html => write!(self.out, "<!--{}-->", comment.value),
            Node::Comment(comment) => write!(self.out, "{{{{!--{}--}}}}", comment.value),
            Node::Element(element) => {
                write!(self.out, "<{}", element.tag)?;
                for attr in &element.attributes {
                    write_attr(self.out, attr)?;
                }
                if element.self_closing {
                    return self.out.write_str(" />");
                }
                self.out.write_char('>')?;
                if element.children.is_empty() && is_void(&element.tag) {
                    return Ok(());
                }
                self.children(&element.children)?;
                write!(self.out, "</{}>", element.tag)
            }
            Node::Block(block) => {
                write!(self.out, "{{{{#{}", block.path.original)?;
                write_args(self.out, &block.params, block.hash.as_ref())?;
                self.out.write_str("}}")?;
                self.children(&block.program.body)?;
                write!(self.out, "{{{{/{}}}}}", block.path.original)
            }
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}

fn write_attr(out: &mut String, attr: &AttrNode) -> fmt::Result {
    write!(out, " {}", attr.name)?;
    if matches!(&attr.value, AttrValue::Text(text) if text.chars.is_empty()) {
        return Ok(());
    }
    out.write_char('=')?;
    write_attr_value(out, &attr.value)
}

fn write_attr_value(out: &mut String, value: &AttrValue) -> fmt::Result {
    match value {
        AttrValue::Text(text) => write!(out, "\"{}\"", text.chars.replace('"', "&quot;")),
        AttrValue::Mustache(mustache) => write_mustache(out, mustache),
        AttrValue::Concat(concat) => {
            out.write_char('"')?;
            for part in &concat.parts {
                match part {
                    ConcatPart::Text(text) => out.write_str(&text.chars.replace('"', "&quot;"))?,
                    ConcatPart::Mustache(mustache) => write_mustache(out, mustache)?,
                }
            }
            out.write_char('"')
        }
    }
}

fn write_mustache(out: &mut String, mustache: &MustacheStatement) -> fmt::Result {
    write!(out, "{{{{{}", mustache.path.original)?;
    write_args(out, &mustache.params, mustache.hash.as_ref())?;
    out.write_str("}}")
}

fn write_args(out: &mut String, params: &[Expression], hash: Option<&Hash>) -> fmt::Result {
    for param in params {
        out.write_char(' ')?;
        write_expression(out, param)?;
    }
    if let Some(hash) = hash {
        for pair in &hash.pairs {
            write!(out, " {}=", pair.key)?;
            write_expression(out, &pair.value)?;
        }
    }
    Ok(())
}

fn write_expression(out: &mut String, expression: &Expression) -> fmt::Result {
    match expression {
        Expression::Path(path) => out.write_str(&path.original),
        Expression::StringLiteral(s) => write!(out, "{:?}", s.value),
        Expression::NumberLiteral(n) if n.value.fract() == 0.0 => write!(out, "{}", n.value as i64),
        Expression::NumberLiteral(n) => write!(out, "{}", n.value),
        Expression::BooleanLiteral(b) => write!(out, "{}", b.value),
        Expression::SubExpression(sub) => {
            write!(out, "({}", sub.path.original)?;
            write_args(out, &sub.params, sub.hash.as_ref())?;
            out.write_char(')')
        }
        Expression::Concat(concat) => write_concat_expression(out, concat),
    }
}

/// `(concat "text " path (helper arg))`
fn write_concat_expression(out: &mut String, concat: &ConcatStatement) -> fmt::Result {
    out.write_str("(concat")?;
    for part in &concat.parts {
        out.write_char(' ')?;
        match part {
            ConcatPart::Text(text) => write!(out, "{:?}", text.chars)?,
            ConcatPart::Mustache(m) if m.params.is_empty() && m.hash.is_none() => {
                out.write_str(&m.path.original)?
            }
            ConcatPart::Mustache(m) => {
                write!(out, "({}", m.path.original)?;
                write_args(out, &m.params, m.hash.as_ref())?;
                out.write_char(')')?
            }
        }
    }
    out.write_char(')')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;
    use pretty_assertions::assert_eq;

    fn round_trip(src: &str) -> String {
        print(&parse_str(src).unwrap())
    }

    #[test]
    fn prints_elements_and_attributes() {
        assert_eq!(
            round_trip(r#"<box vertical align="center" class="a {{b}} c">text</box>"#),
            r#"<box vertical align="center" class="a {{b}} c">text</box>"#
        );
    }

    #[test]
    fn prints_blocks_and_mustaches() {
        assert_eq!(
            round_trip(r#"{{#each items key="id"}}{{format item 2 (t "x")}}{{/each}}"#),
            r#"{{#each items key="id"}}{{format item 2 (t "x")}}{{/each}}"#
        );
    }

    #[test]
    fn normalizes_self_closing_and_comments() {
        assert_eq!(
            round_trip("<vbox/><br>{{! note }}<!-- html -->"),
            "<vbox /><br>{{!-- note --}}<!-- html -->"
        );
    }

    #[test]
    fn prints_unquoted_mustache_value() {
        assert_eq!(round_trip("<div class={{classes}}></div>"), "<div class={{classes}}></div>");
    }
}
