/// Identifier the editor assigns to a block, unique within one program.
/// `0` is reserved as the sentinel for nodes with no originating block.
pub type BlockId = u64;

/// One record of the flat sequence the editor produces: a single statement
/// or a structural delimiter. Expression, condition and signature text is
/// opaque at this layer; it is carried through to the tree unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Variable declaration/assignment. `declared_type` may be empty.
    Variable {
        id: BlockId,
        name: String,
        declared_type: String,
        value: String,
    },
    /// Print statement.
    Output { id: BlockId, value: String },
    /// Return statement.
    Returning { id: BlockId, value: String },
    /// Loop header. The body follows, delimited by a balanced begin/end pair.
    Loop { id: BlockId, header: String },
    /// One arm of an if/elif/else chain. Each arm is an independent block;
    /// chain membership is positional adjacency in the sequence.
    Condition {
        id: BlockId,
        kind: ConditionKind,
        condition: String,
    },
    /// Function header. The body follows like a loop body.
    Function { id: BlockId, signature: String },
    /// Structural delimiter. Never becomes a tree node and carries no id.
    Flow(FlowKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    If,
    Elif,
    Else,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Begin,
    End,
}
