// AST definitions for AnnoyScript token pairs

use std::fmt;

/// Unique identifier for blocks, used for tracking execution position
///
/// Ids are assigned in pre-order while parsing, so the first top-level block
/// is always `0` and a block's id is smaller than the ids of its children.
pub type NodeId = usize;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// Character (not byte) offset into the cleaned source
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The two token-pair flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `(< … >)`, always executed
    Normal,
    /// `(? … ?)`, executed only when the cell under the pointer is non-zero
    Conditional,
}

impl BlockKind {
    /// Selects the block kind from the character following `(`
    pub fn from_opener(c: char) -> Option<Self> {
        match c {
            '<' => Some(BlockKind::Normal),
            '?' => Some(BlockKind::Conditional),
            _ => None,
        }
    }

    pub fn opener(self) -> &'static str {
        match self {
            BlockKind::Normal => "(<",
            BlockKind::Conditional => "(?",
        }
    }

    pub fn closer(self) -> &'static str {
        match self {
            BlockKind::Normal => ">)",
            BlockKind::Conditional => "?)",
        }
    }
}

/// A run of raw operator characters between nested blocks
#[derive(Debug, Clone)]
pub struct Literal {
    pub text: String,
    pub location: SourceLocation,
}

/// One entry in a block body
#[derive(Debug, Clone)]
pub enum Item {
    Literal(Literal),
    Block(Block),
}

/// One complete token pair
#[derive(Debug, Clone)]
pub struct Block {
    pub id: NodeId,
    pub kind: BlockKind,
    pub items: Vec<Item>,
    pub location: SourceLocation,
}

impl Block {
    /// Number of blocks in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self
            .items
            .iter()
            .map(|item| match item {
                Item::Block(child) => child.node_count(),
                Item::Literal(_) => 0,
            })
            .sum::<usize>()
    }

    /// Depth-first search for a block by id
    pub fn find(&self, id: NodeId) -> Option<&Block> {
        if self.id == id {
            return Some(self);
        }
        self.items.iter().find_map(|item| match item {
            Item::Block(child) => child.find(id),
            Item::Literal(_) => None,
        })
    }
}

/// A parsed program: the ordered top-level blocks
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub blocks: Vec<Block>,
}

impl Program {
    pub fn node_count(&self) -> usize {
        self.blocks.iter().map(Block::node_count).sum()
    }

    pub fn find_block(&self, id: NodeId) -> Option<&Block> {
        self.blocks.iter().find_map(|block| block.find(id))
    }
}

// Structural equality ignores ids and locations so that a printed and
// re-parsed program compares equal to the original.

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Item::Literal(a), Item::Literal(b)) => a == b,
            (Item::Block(a), Item::Block(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.items == other.items
    }
}

impl PartialEq for Program {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Literal(literal) => f.write_str(&literal.text),
            Item::Block(block) => write!(f, "{}", block),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.opener())?;
        for item in &self.items {
            write!(f, "{}", item)?;
        }
        f.write_str(self.kind.closer())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", block)?;
        }
        Ok(())
    }
}
