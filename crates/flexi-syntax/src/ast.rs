use std::ops::{Index, IndexMut};

// ── Source locations ──────────────────────────────────────────────────────

/// A point in the template source. `line` is 1-based, `column` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The source range a node was parsed from.
///
/// Nodes synthesized by a transform carry [`SourceSpan::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourceSpan {
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }
}

// ── Expressions ───────────────────────────────────────────────────────────

/// `foo`, `this.bar`, `@arg`
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpression {
    pub original: String,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub value: f64,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub loc: SourceSpan,
}

/// `(helper param key=value)`
#[derive(Debug, Clone, PartialEq)]
pub struct SubExpression {
    pub path: PathExpression,
    pub params: Vec<Expression>,
    pub hash: Option<Hash>,
    pub loc: SourceSpan,
}

/// An expression in a mustache, a block invocation, or a hash pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Path(PathExpression),
    StringLiteral(StringLiteral),
    NumberLiteral(NumberLiteral),
    BooleanLiteral(BooleanLiteral),
    SubExpression(SubExpression),
    /// Only produced when a quoted, interpolated attribute value is turned
    /// into a hash pair.
    Concat(ConcatStatement),
}

impl Expression {
    pub fn loc(&self) -> SourceSpan {
        match self {
            Self::Path(e) => e.loc,
            Self::StringLiteral(e) => e.loc,
            Self::NumberLiteral(e) => e.loc,
            Self::BooleanLiteral(e) => e.loc,
            Self::SubExpression(e) => e.loc,
            Self::Concat(e) => e.loc,
        }
    }

    pub fn loc_mut(&mut self) -> &mut SourceSpan {
        match self {
            Self::Path(e) => &mut e.loc,
            Self::StringLiteral(e) => &mut e.loc,
            Self::NumberLiteral(e) => &mut e.loc,
            Self::BooleanLiteral(e) => &mut e.loc,
            Self::SubExpression(e) => &mut e.loc,
            Self::Concat(e) => &mut e.loc,
        }
    }
}

/// A single `key=value` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: String,
    pub value: Expression,
    pub loc: SourceSpan,
}

/// The keyword arguments of a mustache or block invocation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hash {
    pub pairs: Vec<HashPair>,
    pub loc: SourceSpan,
}

impl Hash {
    pub fn get(&self, key: &str) -> Option<&Expression> {
        self.pairs.iter().find(|p| p.key == key).map(|p| &p.value)
    }
}

// ── Statements ────────────────────────────────────────────────────────────

/// Literal markup text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub chars: String,
    pub loc: SourceSpan,
}

/// `{{path params key=value}}`
#[derive(Debug, Clone, PartialEq)]
pub struct MustacheStatement {
    pub path: PathExpression,
    pub params: Vec<Expression>,
    pub hash: Option<Hash>,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConcatPart {
    Text(TextNode),
    Mustache(MustacheStatement),
}

/// A quoted attribute value mixing literal text and mustaches:
/// `class="card {{if active 'on'}}"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatStatement {
    pub parts: Vec<ConcatPart>,
    pub loc: SourceSpan,
}

/// The value of an element attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Plain text. A value-less attribute (`<box vertical>`) has empty text.
    Text(TextNode),
    /// Unquoted dynamic value: `class={{classes}}`.
    Mustache(MustacheStatement),
    Concat(ConcatStatement),
}

impl AttrValue {
    /// The literal text of a plain text value.
    pub fn chars(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(&t.chars),
            _ => None,
        }
    }

    pub fn loc(&self) -> SourceSpan {
        match self {
            Self::Text(v) => v.loc,
            Self::Mustache(v) => v.loc,
            Self::Concat(v) => v.loc,
        }
    }
}

/// `name="value"` on an element.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrNode {
    pub name: String,
    pub value: AttrValue,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub tag: String,
    pub attributes: Vec<AttrNode>,
    pub children: Vec<NodeId>,
    pub self_closing: bool,
    pub loc: SourceSpan,
}

/// An ordered list of child nodes: the template root or the body of a block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub body: Vec<NodeId>,
    pub loc: SourceSpan,
}

/// `{{#path params key=value}}…{{/path}}`: a component call wrapping a body.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub path: PathExpression,
    pub params: Vec<Expression>,
    pub hash: Option<Hash>,
    pub program: Block,
    pub loc: SourceSpan,
}

/// `{{! … }}`, `{{!-- … --}}`, or `<!-- … -->`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentStatement {
    pub value: String,
    /// `true` for `<!-- -->`, `false` for mustache comments.
    pub html: bool,
    pub loc: SourceSpan,
}

// ── Node ──────────────────────────────────────────────────────────────────

/// A node in the template tree. Children are referenced by [`NodeId`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Program(Block),
    Element(ElementNode),
    Text(TextNode),
    Mustache(MustacheStatement),
    Block(BlockStatement),
    Comment(CommentStatement),
}

impl Node {
    pub fn loc(&self) -> SourceSpan {
        match self {
            Self::Program(n) => n.loc,
            Self::Element(n) => n.loc,
            Self::Text(n) => n.loc,
            Self::Mustache(n) => n.loc,
            Self::Block(n) => n.loc,
            Self::Comment(n) => n.loc,
        }
    }

    /// Child nodes in document order.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Self::Program(block) => &block.body,
            Self::Element(element) => &element.children,
            Self::Block(statement) => &statement.program.body,
            Self::Text(_) | Self::Mustache(_) | Self::Comment(_) => &[],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Program(_) => "Program",
            Self::Element(_) => "ElementNode",
            Self::Text(_) => "TextNode",
            Self::Mustache(_) => "MustacheStatement",
            Self::Block(_) => "BlockStatement",
            Self::Comment(_) => "CommentStatement",
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&BlockStatement> {
        match self {
            Self::Block(b) => Some(b),
            _ => None,
        }
    }
}

// ── Template arena ────────────────────────────────────────────────────────

/// Stable handle to a node inside a [`Template`].
///
/// Ids stay valid for the lifetime of the template. Rewriting a node with
/// [`Template::replace`] keeps its id, so every structure holding the id
/// observes the new contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A parsed template: an arena of nodes rooted at a `Program`.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Template {
    /// An empty template whose root program spans `loc`.
    pub fn new(loc: SourceSpan) -> Self {
        Self {
            nodes: vec![Node::Program(Block { body: Vec::new(), loc })],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Move `node` into the arena and return its id. The node is not linked
    /// into the tree until some parent lists the id among its children.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Replace the contents of the node at `id`, returning the old contents.
    ///
    /// The id itself is untouched: parents and any other holder of `id` see
    /// the replacement without being notified.
    pub fn replace(&mut self, id: NodeId, node: Node) -> Node {
        std::mem::replace(&mut self.nodes[id.0], node)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// Append `child` to the children of `parent`.
    ///
    /// Leaf nodes (text, mustache, comment) cannot hold children; the call is
    /// ignored for them.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        match &mut self.nodes[parent.0] {
            Node::Program(block) => block.body.push(child),
            Node::Element(element) => element.children.push(child),
            Node::Block(statement) => statement.program.body.push(child),
            Node::Text(_) | Node::Mustache(_) | Node::Comment(_) => {
                log::warn!("cannot append child to leaf node {:?}", parent);
            }
        }
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementNode> {
        self.get(id)?.as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementNode> {
        self.get_mut(id)?.as_element_mut()
    }

    /// Every node reachable from the root, pre-order.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Number of nodes in the arena, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }
}

impl Index<NodeId> for Template {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Template {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new(SourceSpan::default())
    }
}
