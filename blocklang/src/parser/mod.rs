pub mod error;
mod listing;

pub use error::ParseError;

use crate::Program;

/// Parser entry point for the textual block listing, the console stand-in
/// for the visual editor. Assigns editor-style sequential ids to the blocks
/// it produces.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse the listing into a complete Program.
    pub fn parse(&self) -> Result<Program, Vec<ParseError>> {
        let blocks = listing::parse_listing(&self.source, self.file_id)?;
        Ok(Program {
            blocks,
            source_id: self.file_id,
        })
    }
}
