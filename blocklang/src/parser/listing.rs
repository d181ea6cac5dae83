use std::ops::Range;

use crate::block::{Block, BlockId, ConditionKind, FlowKind};
use crate::parser::error::ParseError;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a block listing into the flat block sequence.
///
/// One statement per line; blank lines and lines starting with `#` are
/// skipped. Everything to the right of a statement keyword is opaque text
/// carried through verbatim. Errors are collected so one bad line does not
/// hide the ones after it.
pub fn parse_listing(source: &str, file_id: usize) -> Result<Vec<Block>, Vec<ParseError>> {
    let mut state = ListingState::new(file_id);

    let mut offset = 0;
    for line in source.split('\n') {
        state.parse_line(line, offset);
        offset += line.len() + 1;
    }

    state.finalize()
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

const STATEMENT_NOTE: &str =
    "statements start with one of: let, print, return, loop, if, elif, else, func, begin, end";

struct ListingState {
    file_id: usize,
    /// Next editor-style id. Starts at 1; 0 is the root sentinel.
    next_id: BlockId,
    blocks: Vec<Block>,
    errors: Vec<ParseError>,
}

impl ListingState {
    fn new(file_id: usize) -> Self {
        ListingState {
            file_id,
            next_id: 1,
            blocks: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn parse_line(&mut self, line: &str, line_start: usize) {
        let stripped = line.trim_end();
        let trimmed = stripped.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return;
        }

        // Byte range of the statement text, for diagnostics.
        let lead = stripped.len() - trimmed.len();
        let span = line_start + lead..line_start + stripped.len();

        let (keyword, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (trimmed, ""),
        };

        match keyword {
            "let" => self.parse_variable(rest, span),
            "print" => {
                let id = self.take_id();
                self.blocks.push(Block::Output {
                    id,
                    value: rest.to_string(),
                });
            }
            "return" => {
                let id = self.take_id();
                self.blocks.push(Block::Returning {
                    id,
                    value: rest.to_string(),
                });
            }
            "loop" => {
                if rest.is_empty() {
                    self.error("missing loop header", span);
                } else {
                    let id = self.take_id();
                    self.blocks.push(Block::Loop {
                        id,
                        header: rest.to_string(),
                    });
                }
            }
            "if" | "elif" => {
                if rest.is_empty() {
                    self.error(format!("missing condition after '{}'", keyword), span);
                } else {
                    let kind = if keyword == "if" {
                        ConditionKind::If
                    } else {
                        ConditionKind::Elif
                    };
                    let id = self.take_id();
                    self.blocks.push(Block::Condition {
                        id,
                        kind,
                        condition: rest.to_string(),
                    });
                }
            }
            "else" => {
                if rest.is_empty() {
                    let id = self.take_id();
                    self.blocks.push(Block::Condition {
                        id,
                        kind: ConditionKind::Else,
                        condition: String::new(),
                    });
                } else {
                    self.error("unexpected text after 'else'", span);
                }
            }
            "func" => {
                if rest.is_empty() {
                    self.error("missing function signature", span);
                } else {
                    let id = self.take_id();
                    self.blocks.push(Block::Function {
                        id,
                        signature: rest.to_string(),
                    });
                }
            }
            "begin" | "end" => {
                if rest.is_empty() {
                    let kind = if keyword == "begin" {
                        FlowKind::Begin
                    } else {
                        FlowKind::End
                    };
                    self.blocks.push(Block::Flow(kind));
                } else {
                    self.error(format!("unexpected text after '{}'", keyword), span);
                }
            }
            _ => {
                self.errors.push(
                    ParseError::new(
                        format!("unknown statement '{}'", keyword),
                        span,
                        self.file_id,
                    )
                    .with_note(STATEMENT_NOTE),
                );
            }
        }
    }

    /// `let NAME = EXPR` or `let NAME: TYPE = EXPR`. The value text is
    /// opaque and may be empty; the name may not.
    fn parse_variable(&mut self, rest: &str, span: Range<usize>) {
        let Some((target, value)) = rest.split_once('=') else {
            self.error("expected '=' in variable declaration", span);
            return;
        };

        let (name, declared_type) = match target.split_once(':') {
            Some((name, ty)) => (name.trim(), ty.trim()),
            None => (target.trim(), ""),
        };

        if name.is_empty() {
            self.error("missing variable name", span);
            return;
        }

        let id = self.take_id();
        self.blocks.push(Block::Variable {
            id,
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            value: value.trim().to_string(),
        });
    }

    fn take_id(&mut self) -> BlockId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn error(&mut self, message: impl Into<String>, span: Range<usize>) {
        self.errors.push(ParseError::new(message, span, self.file_id));
    }

    fn finalize(self) -> Result<Vec<Block>, Vec<ParseError>> {
        if self.errors.is_empty() {
            Ok(self.blocks)
        } else {
            Err(self.errors)
        }
    }
}
