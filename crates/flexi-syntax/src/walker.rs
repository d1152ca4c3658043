//! Depth-first traversal of a [`Template`].

use crate::ast::{NodeId, Template};

/// Visit every node reachable from the root, pre-order, in document order.
///
/// The visitor gets mutable access to the whole template and may rewrite the
/// node it is given. Children are read *after* the visitor returns, so a node
/// turned into a block is descended into through its new body. The first
/// error stops the walk and is returned.
pub fn visit<E>(
    template: &mut Template,
    mut visitor: impl FnMut(&mut Template, NodeId) -> Result<(), E>,
) -> Result<(), E> {
    let mut stack = vec![template.root()];
    while let Some(id) = stack.pop() {
        visitor(template, id)?;
        stack.extend(template.children(id).iter().rev().copied());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::parse_str;

    #[test]
    fn visits_in_document_order() {
        let mut template = parse_str("<box><hbox>a</hbox>{{b}}</box><vbox/>").unwrap();
        let mut kinds = Vec::new();
        visit::<()>(&mut template, |t, id| {
            kinds.push(match &t[id] {
                Node::Element(e) => e.tag.clone(),
                other => other.kind().to_string(),
            });
            Ok(())
        })
        .unwrap();

        assert_eq!(kinds, ["Program", "box", "hbox", "TextNode", "MustacheStatement", "vbox"]);
    }

    #[test]
    fn stops_at_first_error() {
        let mut template = parse_str("<a></a><b></b><c></c>").unwrap();
        let mut seen = 0;
        let result = visit(&mut template, |t, id| {
            if let Some(element) = t.element(id) {
                seen += 1;
                if element.tag == "b" {
                    return Err("stop");
                }
            }
            Ok(())
        });

        assert_eq!(result, Err("stop"));
        assert_eq!(seen, 2);
    }
}
