//! Constructors for nodes synthesized by transforms.

use crate::ast::{
    AttrNode, AttrValue, Block, BlockStatement, ConcatPart, ConcatStatement, Expression, Hash,
    HashPair, Node, NodeId, PathExpression, SourceSpan, StringLiteral, TextNode,
};

pub fn path(original: impl Into<String>) -> PathExpression {
    PathExpression { original: original.into(), loc: SourceSpan::default() }
}

pub fn string_literal(value: impl Into<String>, loc: SourceSpan) -> Expression {
    Expression::StringLiteral(StringLiteral { value: value.into(), loc })
}

pub fn text(chars: impl Into<String>) -> TextNode {
    TextNode { chars: chars.into(), loc: SourceSpan::default() }
}

/// A literal attribute: `name="value"`.
pub fn attr(name: impl Into<String>, value: impl Into<String>) -> AttrNode {
    AttrNode {
        name: name.into(),
        value: AttrValue::Text(text(value)),
        loc: SourceSpan::default(),
    }
}

pub fn concat(parts: Vec<ConcatPart>, loc: SourceSpan) -> ConcatStatement {
    ConcatStatement { parts, loc }
}

pub fn pair(key: impl Into<String>, value: Expression, loc: SourceSpan) -> HashPair {
    HashPair { key: key.into(), value, loc }
}

pub fn hash(pairs: Vec<HashPair>) -> Hash {
    let loc = match (pairs.first(), pairs.last()) {
        (Some(first), Some(last)) => SourceSpan::new(first.loc.start, last.loc.end),
        _ => SourceSpan::default(),
    };
    Hash { pairs, loc }
}

pub fn program(body: Vec<NodeId>, loc: SourceSpan) -> Block {
    Block { body, loc }
}

/// `{{#name params hash}}program{{/name}}`
pub fn block(
    name: impl Into<String>,
    params: Vec<Expression>,
    hash: Option<Hash>,
    program: Block,
    loc: SourceSpan,
) -> Node {
    Node::Block(BlockStatement { path: path(name), params, hash, program, loc })
}
