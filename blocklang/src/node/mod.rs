use std::fmt;

use crate::block::BlockId;

/// Sentinel source id for nodes that do not originate from an editor block
/// (currently only the root).
pub const NO_SOURCE: BlockId = 0;

/// What a tree node represents. Leaf kinds (`Assign`, `Print`,
/// `ReturnFunction` and the two children of an assignment) come from single
/// blocks; compound kinds own the nodes built from their delimited body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Assign,
    VariableRef,
    Expression,
    Print,
    Loop,
    IfBlock,
    ElifBlock,
    ElseBlock,
    Function,
    ReturnFunction,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Root => "root",
            NodeKind::Assign => "assign",
            NodeKind::VariableRef => "variableRef",
            NodeKind::Expression => "expression",
            NodeKind::Print => "print",
            NodeKind::Loop => "loop",
            NodeKind::IfBlock => "ifBlock",
            NodeKind::ElifBlock => "elifBlock",
            NodeKind::ElseBlock => "elseBlock",
            NodeKind::Function => "function",
            NodeKind::ReturnFunction => "returnFunction",
        };
        f.write_str(name)
    }
}

/// One element of the output syntax tree.
///
/// Consumers (the downstream interpreter, the editor's highlighter) read
/// `kind`, `payload`, `source_id` and `children` only. Children are owned
/// exclusively by their parent; a node is never mutated after the build
/// returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Opaque text attached to the node: an expression, a condition, a loop
    /// header or a function signature. Never parsed at this layer.
    pub payload: String,
    /// Id of the editor block this node was built from, so the UI can
    /// highlight the block currently being executed. `NO_SOURCE` for the root.
    pub source_id: BlockId,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, payload: impl Into<String>, source_id: BlockId) -> Self {
        Node {
            kind,
            payload: payload.into(),
            source_id,
            children: Vec::new(),
        }
    }

    /// The single parentless node every build produces.
    pub fn root() -> Self {
        Node::new(NodeKind::Root, "", NO_SOURCE)
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            f.write_str("  ")?;
        }
        write!(f, "{}", self.kind)?;
        if !self.payload.is_empty() {
            write!(f, " {:?}", self.payload)?;
        }
        if self.source_id != NO_SOURCE {
            write!(f, " #{}", self.source_id)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Indented one-node-per-line rendering, used by `blockc build` and by the
/// fixture runner's `expect_tree` comparison.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
