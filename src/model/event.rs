use serde::{Deserialize, Serialize};

/// Unique identifier for a pane (a leaf of the split tree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaneId(pub usize);

/// Unique identifier for a split container node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SplitId(pub usize);

/// Unique identifier for a view (one tab bound to a document)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(pub usize);

/// Direction in which a split container lays out its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitDirection {
    /// Children side by side, left to right
    Horizontal,
    /// Children stacked, top to bottom
    Vertical,
}

/// Which side of the target a newly inserted pane goes on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertSide {
    /// Left of / above the target
    Before,
    /// Right of / below the target
    After,
}

impl InsertSide {
    /// Index offset relative to the target's position in its parent
    pub fn offset(self) -> usize {
        match self {
            Self::Before => 0,
            Self::After => 1,
        }
    }
}

/// A position in a document: zero-based line and column (in chars)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TextPosition {
    pub line: usize,
    pub column: usize,
}

impl TextPosition {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Notifications a document sends to its subscribed views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    /// Raw text changed (an edit was applied)
    ContentsChanged,
    /// A highlight pass finished and the styled buffer was replaced
    HighlightUpdated,
}
