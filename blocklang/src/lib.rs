pub mod block;
pub mod builder;
pub mod node;
pub mod parser;

use crate::block::Block;

/// A parsed block program: the flat, ordered sequence produced by the visual
/// editor (or by the textual listing front end), ready for tree construction.
#[derive(Debug, Clone)]
pub struct Program {
    /// Block records in source order.
    pub blocks: Vec<Block>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}
