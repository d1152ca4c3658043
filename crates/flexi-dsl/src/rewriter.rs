//! Turns layout elements into layout-component invocations.
//!
//! `<container class="x">…</container>` becomes
//! `{{#flexi-container class="x"}}…{{/flexi-container}}`, and likewise for
//! `<grid responsive>`. The node is rewritten in place so its id, and every
//! parent that lists it, now refers to the block invocation.

use flexi_syntax::ast::{
    AttrNode, AttrValue, ConcatStatement, ElementNode, Expression, Hash, SourceSpan, SubExpression,
};
use flexi_syntax::{NodeId, Template, builders, walker};

use crate::attributes::has_attribute;

pub const CONTAINER_TAG: &str = "container";
pub const GRID_TAG: &str = "grid";
pub const RESPONSIVE_ATTRIBUTE: &str = "responsive";
pub const COMPONENT_PREFIX: &str = "flexi-";

/// Columns added to spans on the element's opening line: `{{#flexi-…` is
/// longer than `<…`.
pub const COLUMN_SHIFT: usize = 7;

#[derive(Debug, Clone, Copy, Default)]
pub struct ElementComponentRewriter;

impl ElementComponentRewriter {
    pub const NAME: &'static str = "flexi-component-conversion";

    pub fn new() -> Self {
        Self
    }

    /// Rewrite every layout element of `template` into a component block.
    pub fn transform(&self, template: &mut Template) {
        let result: Result<(), std::convert::Infallible> = walker::visit(template, |template, id| {
            self.rewrite(template, id);
            Ok(())
        });
        let Ok(()) = result;
    }

    fn rewrite(&self, template: &mut Template, id: NodeId) {
        let Some(element) = template.element(id) else {
            return;
        };
        if !is_layout_component(element) {
            return;
        }

        let component = format!("{COMPONENT_PREFIX}{}", element.tag);
        log::debug!("converting <{}> to {{{{#{component}}}}}", element.tag);

        let ElementNode { attributes, children, loc, .. } = element.clone();
        let hash = make_hash(attributes, loc.start.line);
        let program = builders::program(children, SourceSpan::default());

        let block = builders::block(component, Vec::new(), hash, program, adjust_location(loc));
        template.replace(id, block);
    }
}

/// `<container>`, or `<grid>` carrying a `responsive` attribute.
pub fn is_layout_component(element: &ElementNode) -> bool {
    element.tag == CONTAINER_TAG
        || (element.tag == GRID_TAG && has_attribute(element, RESPONSIVE_ATTRIBUTE))
}

fn make_hash(attributes: Vec<AttrNode>, declare_line: usize) -> Option<Hash> {
    if attributes.is_empty() {
        return None;
    }

    let pairs = attributes
        .into_iter()
        .map(|attr| {
            let mut value = attr_to_expression(attr.value);
            shift_span(value.loc_mut(), declare_line);
            let mut loc = attr.loc;
            shift_span(&mut loc, declare_line);
            builders::pair(attr.name, value, loc)
        })
        .collect();

    Some(builders::hash(pairs))
}

fn attr_to_expression(value: AttrValue) -> Expression {
    match value {
        AttrValue::Text(text) => builders::string_literal(text.chars, text.loc),
        AttrValue::Mustache(mustache) if mustache.params.is_empty() && mustache.hash.is_none() => {
            Expression::Path(mustache.path)
        }
        AttrValue::Mustache(mustache) => Expression::SubExpression(SubExpression {
            path: mustache.path,
            params: mustache.params,
            hash: mustache.hash,
            loc: mustache.loc,
        }),
        AttrValue::Concat(ConcatStatement { parts, loc }) => {
            Expression::Concat(builders::concat(parts, loc))
        }
    }
}

fn shift_span(span: &mut SourceSpan, declare_line: usize) {
    if span.start.line == declare_line {
        span.start.column += COLUMN_SHIFT;
    }
    if span.end.line == declare_line {
        span.end.column += COLUMN_SHIFT;
    }
}

fn adjust_location(mut loc: SourceSpan) -> SourceSpan {
    loc.end.column += COLUMN_SHIFT;
    loc
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexi_syntax::ast::{BlockStatement, Node, SourcePosition};
    use flexi_syntax::{parse_str, print};
    use pretty_assertions::assert_eq;

    fn rewrite(src: &str) -> Template {
        let mut template = parse_str(src).unwrap();
        ElementComponentRewriter::new().transform(&mut template);
        template
    }

    fn first_block(template: &Template) -> &BlockStatement {
        template
            .descendants()
            .into_iter()
            .find_map(|id| template[id].as_block())
            .expect("template has a block")
    }

    #[test_log::test]
    fn converts_container() {
        let template = rewrite(r#"<container class="low-class"></container>"#);
        let block = first_block(&template);

        assert_eq!(block.path.original, "flexi-container");
        assert!(block.params.is_empty());
        assert!(block.program.body.is_empty());
        let hash = block.hash.as_ref().unwrap();
        assert_eq!(hash.pairs.len(), 1);
        assert!(matches!(
            hash.get("class"),
            Some(Expression::StringLiteral(s)) if s.value == "low-class"
        ));
        assert_eq!(print(&template), r#"{{#flexi-container class="low-class"}}{{/flexi-container}}"#);
    }

    #[test_log::test]
    fn converts_responsive_grid_only() {
        assert_eq!(
            print(&rewrite(r#"<grid responsive class="high-class"></grid>"#)),
            r#"{{#flexi-grid responsive="" class="high-class"}}{{/flexi-grid}}"#
        );
        assert_eq!(print(&rewrite("<grid></grid>")), "<grid></grid>");
        assert_eq!(print(&rewrite(r#"<box responsive></box>"#)), "<box responsive></box>");
    }

    #[test_log::test]
    fn no_attributes_means_no_hash() {
        let template = rewrite("<container></container>");
        assert!(first_block(&template).hash.is_none());
        assert_eq!(print(&template), "{{#flexi-container}}{{/flexi-container}}");
    }

    #[test_log::test]
    fn keeps_children_and_identity() {
        let mut template = parse_str(r#"<div><container><box class="a"></box>text</container></div>"#).unwrap();
        let div = template.children(template.root())[0];
        let container = template.children(div)[0];
        let children_before = template.children(container).to_vec();

        ElementComponentRewriter::new().transform(&mut template);

        assert_eq!(template.children(div), &[container]);
        assert!(matches!(&template[container], Node::Block(_)));
        assert_eq!(template.children(container), &children_before[..]);
        assert_eq!(
            print(&template),
            r#"<div>{{#flexi-container}}<box class="a"></box>text{{/flexi-container}}</div>"#
        );
    }

    #[test_log::test]
    fn converts_nested_layout_elements() {
        assert_eq!(
            print(&rewrite(r#"<container><grid responsive><container></container></grid></container>"#)),
            r#"{{#flexi-container}}{{#flexi-grid responsive=""}}{{#flexi-container}}{{/flexi-container}}{{/flexi-grid}}{{/flexi-container}}"#
        );
    }

    #[test_log::test]
    fn dynamic_values_become_expressions() {
        assert_eq!(
            print(&rewrite(r#"<container id={{elementId}} class="a {{b}}" title={{t "x"}}></container>"#)),
            r#"{{#flexi-container id=elementId class=(concat "a " b) title=(t "x")}}{{/flexi-container}}"#
        );
    }

    #[test_log::test]
    fn shifts_columns_on_the_opening_line() {
        let template = rewrite("<container class=\"a\"\n  id=\"b\">\n</container>");
        let block = first_block(&template);
        let hash = block.hash.as_ref().unwrap();

        let class = &hash.pairs[0];
        assert_eq!(class.value.loc().start, SourcePosition::new(1, 17 + COLUMN_SHIFT));
        assert_eq!(class.value.loc().end, SourcePosition::new(1, 20 + COLUMN_SHIFT));
        assert_eq!(class.loc.start, SourcePosition::new(1, 11 + COLUMN_SHIFT));

        let id = &hash.pairs[1];
        assert_eq!(id.value.loc().start, SourcePosition::new(2, 5));
        assert_eq!(id.value.loc().end, SourcePosition::new(2, 8));

        assert_eq!(block.loc.start, SourcePosition::new(1, 0));
        assert_eq!(block.loc.end, SourcePosition::new(3, 12 + COLUMN_SHIFT));
    }
}
