use crate::block::{Block, BlockId, ConditionKind, FlowKind};
use crate::node::{Node, NodeKind};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the syntax tree for a flat block sequence.
///
/// Total over any input: it never panics and never reports an error. A
/// compound header whose body delimiters do not balance marks a program the
/// user is still editing, so the broken construct is dropped and the rest of
/// the tree is kept. Empty input yields a bare root.
pub fn build_tree(blocks: &[Block]) -> Node {
    let mut root = Node::root();
    attach_statements(&mut root, blocks);
    root
}

// ---------------------------------------------------------------------------
// Statement walk
// ---------------------------------------------------------------------------

/// Append one node per statement in `blocks` to `parent`, in source order.
///
/// `blocks` is either the whole program (parent is the root) or the body of
/// a compound construct with its header already stripped. The cursor is
/// local to this call; nested constructs are consumed whole via
/// `matching_end`, so each block is dispatched at exactly one level.
fn attach_statements(parent: &mut Node, blocks: &[Block]) {
    let mut cursor = 0;
    while cursor < blocks.len() {
        match &blocks[cursor] {
            // Delimiters at this level bound the enclosing construct; they
            // were already accounted for when this slice was extracted.
            Block::Flow(_) => cursor += 1,

            Block::Variable {
                id,
                name,
                declared_type,
                value,
            } => {
                parent.add_child(assign_node(*id, name, declared_type, value));
                cursor += 1;
            }

            Block::Output { id, value } => {
                parent.add_child(Node::new(NodeKind::Print, value.as_str(), *id));
                cursor += 1;
            }

            Block::Returning { id, value } => {
                parent.add_child(Node::new(NodeKind::ReturnFunction, value.as_str(), *id));
                cursor += 1;
            }

            Block::Loop { .. } | Block::Condition { .. } | Block::Function { .. } => {
                match matching_end(blocks, cursor + 1) {
                    Some(end) => {
                        if let Some(node) = compound_node(&blocks[cursor..=end]) {
                            parent.add_child(node);
                        }
                        cursor = end + 1;
                    }
                    // No balancing end delimiter: everything from the header
                    // onward belongs to the broken construct. Drop it.
                    None => cursor = blocks.len(),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Delimiter balance matching
// ---------------------------------------------------------------------------

/// Find the index of the `end` delimiter that balances the first `begin` at
/// or after `start`. Classical bracket matching: begins push, ends pop, and
/// the end that brings the depth back to zero is the match. Returns `None`
/// when the region is unbalanced (an end before any begin, or no end at all).
fn matching_end(blocks: &[Block], start: usize) -> Option<usize> {
    let mut depth: i32 = 0;
    for (i, block) in blocks.iter().enumerate().skip(start) {
        match block {
            Block::Flow(FlowKind::Begin) => depth += 1,
            Block::Flow(FlowKind::End) => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Node construction
// ---------------------------------------------------------------------------

/// Build the node for one compound construct.
///
/// `slice` covers the construct's full extent: the header first, then the
/// delimited body. Returns `None` when the slice does not start with a
/// compound header, which only arises from extractions over broken input.
fn compound_node(slice: &[Block]) -> Option<Node> {
    let mut node = match slice.first()? {
        Block::Loop { id, header } => Node::new(NodeKind::Loop, header.as_str(), *id),
        Block::Function { id, signature } => {
            Node::new(NodeKind::Function, signature.as_str(), *id)
        }
        Block::Condition {
            id,
            kind,
            condition,
        } => {
            let kind = match kind {
                ConditionKind::If => NodeKind::IfBlock,
                ConditionKind::Elif => NodeKind::ElifBlock,
                ConditionKind::Else => NodeKind::ElseBlock,
            };
            Node::new(kind, condition.as_str(), *id)
        }
        _ => return None,
    };
    attach_statements(&mut node, &slice[1..]);
    Some(node)
}

/// `let x: Int = 5` becomes an `assign` node whose payload is the declared
/// type, with the name and the raw value text as its two children. All three
/// nodes carry the originating block's id.
fn assign_node(id: BlockId, name: &str, declared_type: &str, value: &str) -> Node {
    let mut node = Node::new(NodeKind::Assign, declared_type, id);
    node.add_child(Node::new(NodeKind::VariableRef, name, id));
    node.add_child(Node::new(NodeKind::Expression, value, id));
    node
}
