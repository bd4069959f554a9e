/// Split layout for docking tab panes
///
/// Design:
/// - The layout is an n-ary tree: leaves are panes, inner nodes are splitters
///   laying their children out side by side (horizontal) or stacked (vertical)
/// - The root is always a splitter (the window's top-level container); it is
///   the only splitter allowed to hold a single child
/// - Any other splitter left with one child is replaced by that child
/// - At least one pane always exists
/// - One pane is "active" (last focused); it is where new files open
///
/// Example layouts:
/// ```text
/// ┌────────────────────┐      ┌──────────┬─────────┐
/// │                    │      │          │         │
/// │      Pane A        │      │  Pane A  │ Pane B  │
/// │                    │      │          │         │
/// └────────────────────┘      └──────────┴─────────┘
///   (root, one child)           (horizontal root)
///
/// ┌────────────────────┐      ┌──────────┬─────────┐
/// │      Pane A        │      │          │ Pane B  │
/// ├────────────────────┤      │  Pane A  ├─────────┤
/// │      Pane B        │      │          │ Pane C  │
/// └────────────────────┘      └──────────┴─────────┘
///   (vertical root)            (nested vertical splitter)
/// ```
///
/// Nodes are addressed by child-index paths from the root. Mutation always
/// goes through a path so no two mutable references into the tree exist.
use crate::model::event::{InsertSide, PaneId, SplitDirection, SplitId, ViewId};
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

/// A refused layout operation. The layout is unchanged when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// Removing the pane would leave the window with no panes
    LastPane,
    /// The pane is not part of the layout
    PaneNotFound(PaneId),
    /// The pane is already part of the layout
    PaneExists(PaneId),
    /// A tab index is out of range for the pane
    TabOutOfRange { pane: PaneId, index: usize },
    /// The view is not a tab of the pane
    ViewNotFound { pane: PaneId, view: ViewId },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LastPane => write!(f, "cannot remove the last pane"),
            Self::PaneNotFound(id) => write!(f, "pane {} not found", id.0),
            Self::PaneExists(id) => write!(f, "pane {} is already in the layout", id.0),
            Self::TabOutOfRange { pane, index } => {
                write!(f, "tab {} out of range in pane {}", index, pane.0)
            }
            Self::ViewNotFound { pane, view } => {
                write!(f, "view {} is not a tab of pane {}", view.0, pane.0)
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// A node in the split tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitNode {
    /// Leaf node: a pane of tabs
    Leaf { pane_id: PaneId },
    /// Internal node: children laid out along `direction`
    Split {
        direction: SplitDirection,
        children: Vec<SplitNode>,
        split_id: SplitId,
    },
}

impl SplitNode {
    pub fn leaf(pane_id: PaneId) -> Self {
        Self::Leaf { pane_id }
    }

    pub fn split(direction: SplitDirection, children: Vec<SplitNode>, split_id: SplitId) -> Self {
        Self::Split {
            direction,
            children,
            split_id,
        }
    }

    /// The pane id if this is a leaf
    pub fn pane_id(&self) -> Option<PaneId> {
        match self {
            Self::Leaf { pane_id } => Some(*pane_id),
            Self::Split { .. } => None,
        }
    }

    pub fn direction(&self) -> Option<SplitDirection> {
        match self {
            Self::Leaf { .. } => None,
            Self::Split { direction, .. } => Some(*direction),
        }
    }

    pub fn children(&self) -> &[SplitNode] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Split { children, .. } => children,
        }
    }

    /// Pane ids in layout order (left to right, top to bottom)
    pub fn leaf_ids(&self) -> Vec<PaneId> {
        match self {
            Self::Leaf { pane_id } => vec![*pane_id],
            Self::Split { children, .. } => children.iter().flat_map(Self::leaf_ids).collect(),
        }
    }

    pub fn count_leaves(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Split { children, .. } => children.iter().map(Self::count_leaves).sum(),
        }
    }

    /// Child-index path from this node to the leaf holding `pane`
    pub fn find_path(&self, pane: PaneId) -> Option<Vec<usize>> {
        match self {
            Self::Leaf { pane_id } => (*pane_id == pane).then(Vec::new),
            Self::Split { children, .. } => children.iter().enumerate().find_map(|(i, child)| {
                child.find_path(pane).map(|mut path| {
                    path.insert(0, i);
                    path
                })
            }),
        }
    }

    pub fn node_at(&self, path: &[usize]) -> Option<&Self> {
        match path.split_first() {
            None => Some(self),
            Some((&i, rest)) => self.children().get(i)?.node_at(rest),
        }
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Self> {
        match path.split_first() {
            None => Some(self),
            Some((&i, rest)) => match self {
                Self::Leaf { .. } => None,
                Self::Split { children, .. } => children.get_mut(i)?.node_at_mut(rest),
            },
        }
    }

    /// All panes with their rectangles
    pub fn leaves_with_rects(&self, rect: Rect) -> Vec<(PaneId, Rect)> {
        match self {
            Self::Leaf { pane_id } => vec![(*pane_id, rect)],
            Self::Split {
                direction,
                children,
                ..
            } => split_rects(rect, *direction, children.len())
                .into_iter()
                .zip(children)
                .flat_map(|(r, child)| child.leaves_with_rects(r))
                .collect(),
        }
    }

    /// Separator lines between children, as (direction, x, y, length).
    /// A horizontal splitter draws vertical lines between its children.
    pub fn separators(&self, rect: Rect) -> Vec<(SplitDirection, u16, u16, u16)> {
        match self {
            Self::Leaf { .. } => vec![],
            Self::Split {
                direction,
                children,
                ..
            } => {
                let rects = split_rects(rect, *direction, children.len());
                let mut separators = Vec::new();
                for pair in rects.windows(2) {
                    let first = pair[0];
                    match direction {
                        SplitDirection::Horizontal => separators.push((
                            SplitDirection::Horizontal,
                            first.x + first.width,
                            rect.y,
                            rect.height,
                        )),
                        SplitDirection::Vertical => separators.push((
                            SplitDirection::Vertical,
                            rect.x,
                            first.y + first.height,
                            rect.width,
                        )),
                    }
                }
                for (r, child) in rects.into_iter().zip(children) {
                    separators.extend(child.separators(r));
                }
                separators
            }
        }
    }
}

/// Divide a rectangle into `count` equal parts along `direction`, leaving a
/// 1-cell gap between neighbours for the separator line. Leftover cells go
/// to the first children.
fn split_rects(rect: Rect, direction: SplitDirection, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let count16 = u16::try_from(count).unwrap_or(u16::MAX);
    let extent = match direction {
        SplitDirection::Horizontal => rect.width,
        SplitDirection::Vertical => rect.height,
    };
    let available = extent.saturating_sub(count16.saturating_sub(1));
    let base = available / count16;
    let extra = available % count16;

    let mut rects = Vec::with_capacity(count);
    let mut offset = 0u16;
    for i in 0..count16 {
        let size = base + u16::from(i < extra);
        let r = match direction {
            SplitDirection::Horizontal => Rect {
                x: rect.x + offset,
                y: rect.y,
                width: size,
                height: rect.height,
            },
            SplitDirection::Vertical => Rect {
                x: rect.x,
                y: rect.y + offset,
                width: rect.width,
                height: size,
            },
        };
        rects.push(r);
        offset = offset.saturating_add(size).saturating_add(1); // +1 for separator
    }
    rects
}

/// Manager for the pane layout
#[derive(Debug, Clone)]
pub struct SplitManager {
    /// Root container; always a `Split`
    root: SplitNode,

    /// Last focused pane
    active_pane: PaneId,

    /// Next split ID to assign
    next_split_id: usize,
}

impl SplitManager {
    /// Layout with a single pane inside a horizontal root
    pub fn new(pane: PaneId) -> Self {
        Self {
            root: SplitNode::split(SplitDirection::Horizontal, vec![SplitNode::leaf(pane)], SplitId(0)),
            active_pane: pane,
            next_split_id: 1,
        }
    }

    pub fn root(&self) -> &SplitNode {
        &self.root
    }

    pub fn active_pane(&self) -> PaneId {
        self.active_pane
    }

    /// Make `pane` the last focused pane. Returns false if it is not in the layout.
    pub fn set_active_pane(&mut self, pane: PaneId) -> bool {
        if self.contains(pane) {
            self.active_pane = pane;
            true
        } else {
            false
        }
    }

    pub fn contains(&self, pane: PaneId) -> bool {
        self.root.find_path(pane).is_some()
    }

    /// Pane ids in layout order
    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.root.leaf_ids()
    }

    pub fn pane_count(&self) -> usize {
        self.root.count_leaves()
    }

    fn allocate_split_id(&mut self) -> SplitId {
        let id = SplitId(self.next_split_id);
        self.next_split_id += 1;
        id
    }

    /// Replace the node at `path` with `node`
    fn replace_child_at(&mut self, path: &[usize], node: SplitNode) {
        if let Some(slot) = self.root.node_at_mut(path) {
            *slot = node;
        }
    }

    /// Place `new_pane` next to `target` along `direction`.
    ///
    /// If the target's parent already lays out along `direction` the new pane
    /// becomes a sibling; otherwise the target is wrapped in a new splitter.
    /// A root holding a single child simply takes on the requested direction.
    pub fn split_insert(
        &mut self,
        target: PaneId,
        direction: SplitDirection,
        side: InsertSide,
        new_pane: PaneId,
    ) -> Result<(), LayoutError> {
        if self.contains(new_pane) {
            return Err(LayoutError::PaneExists(new_pane));
        }
        let path = self
            .root
            .find_path(target)
            .ok_or(LayoutError::PaneNotFound(target))?;
        let (&index, parent_path) = path
            .split_last()
            .ok_or(LayoutError::PaneNotFound(target))?;

        let needs_wrap = match self.root.node_at(parent_path) {
            Some(SplitNode::Split {
                direction: parent_direction,
                children,
                ..
            }) => children.len() > 1 && *parent_direction != direction,
            _ => return Err(LayoutError::PaneNotFound(target)),
        };
        let wrap_id = needs_wrap.then(|| self.allocate_split_id());

        let Some(SplitNode::Split {
            direction: parent_direction,
            children,
            ..
        }) = self.root.node_at_mut(parent_path)
        else {
            return Err(LayoutError::PaneNotFound(target));
        };

        match wrap_id {
            Some(split_id) => {
                let old = std::mem::replace(&mut children[index], SplitNode::leaf(new_pane));
                let mut pair = vec![old];
                pair.insert(side.offset(), SplitNode::leaf(new_pane));
                children[index] = SplitNode::split(direction, pair, split_id);
            }
            None => {
                *parent_direction = direction;
                children.insert(index + side.offset(), SplitNode::leaf(new_pane));
            }
        }
        tracing::debug!(
            "inserted pane {:?} {:?} pane {:?} ({:?})",
            new_pane,
            side,
            target,
            direction
        );
        Ok(())
    }

    /// Remove a pane from the layout, collapsing splitters left with one child.
    ///
    /// The last pane is never removed. If the removed pane was active, focus
    /// moves to the first remaining pane.
    pub fn remove_leaf(&mut self, pane: PaneId) -> Result<(), LayoutError> {
        let path = self
            .root
            .find_path(pane)
            .ok_or(LayoutError::PaneNotFound(pane))?;
        if self.pane_count() <= 1 {
            return Err(LayoutError::LastPane);
        }
        let (&index, parent_path) = path
            .split_last()
            .ok_or(LayoutError::PaneNotFound(pane))?;

        if let Some(SplitNode::Split { children, .. }) = self.root.node_at_mut(parent_path) {
            children.remove(index);
        }

        // Walk upward replacing single-child splitters by their child
        let mut current = parent_path.to_vec();
        while !current.is_empty() {
            let only_child = match self.root.node_at(&current) {
                Some(SplitNode::Split { children, .. }) if children.len() == 1 => {
                    children.first().cloned()
                }
                _ => None,
            };
            if let Some(child) = only_child {
                self.replace_child_at(&current, child);
            }
            current.pop();
        }
        self.adopt_single_split_child();

        if self.active_pane == pane {
            if let Some(first) = self.root.leaf_ids().first() {
                self.active_pane = *first;
            }
        }
        tracing::debug!("removed pane {:?}", pane);
        Ok(())
    }

    /// A root whose only child is a splitter takes over that splitter's
    /// direction and children.
    fn adopt_single_split_child(&mut self) {
        let SplitNode::Split {
            direction,
            children,
            ..
        } = &mut self.root
        else {
            return;
        };
        if children.len() != 1 || children[0].pane_id().is_some() {
            return;
        }
        if let Some(SplitNode::Split {
            direction: child_direction,
            children: grandchildren,
            ..
        }) = children.pop()
        {
            *direction = child_direction;
            *children = grandchildren;
        }
    }

    /// Pane rectangles within `area`
    pub fn pane_rects(&self, area: Rect) -> Vec<(PaneId, Rect)> {
        self.root.leaves_with_rects(area)
    }

    /// Separator lines within `area`
    pub fn separators(&self, area: Rect) -> Vec<(SplitDirection, u16, u16, u16)> {
        self.root.separators(area)
    }

    /// Pane under a screen position
    pub fn pane_at(&self, area: Rect, col: u16, row: u16) -> Option<(PaneId, Rect)> {
        self.pane_rects(area).into_iter().find(|(_, r)| {
            col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
        })
    }

    /// Focus the next pane (circular)
    pub fn next_pane(&mut self) {
        let ids = self.pane_ids();
        if let Some(pos) = ids.iter().position(|id| *id == self.active_pane) {
            self.active_pane = ids[(pos + 1) % ids.len()];
        }
    }

    /// Focus the previous pane (circular)
    pub fn prev_pane(&mut self) {
        let ids = self.pane_ids();
        if let Some(pos) = ids.iter().position(|id| *id == self.active_pane) {
            let prev_pos = if pos == 0 { ids.len() } else { pos } - 1;
            self.active_pane = ids[prev_pos];
        }
    }

    /// Check the structural invariants of the layout
    pub fn validate(&self) -> Result<(), String> {
        let SplitNode::Split { children, .. } = &self.root else {
            return Err("root is not a splitter".to_string());
        };
        if children.is_empty() {
            return Err("layout has no panes".to_string());
        }
        if children.len() == 1 && children[0].pane_id().is_none() {
            return Err("root holds a single splitter".to_string());
        }
        for child in children {
            check_subtree(child)?;
        }
        let mut ids = self.pane_ids();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        if ids.len() != total {
            return Err("pane appears more than once".to_string());
        }
        if !self.contains(self.active_pane) {
            return Err(format!("active pane {:?} not in layout", self.active_pane));
        }
        Ok(())
    }
}

fn check_subtree(node: &SplitNode) -> Result<(), String> {
    if let SplitNode::Split {
        children, split_id, ..
    } = node
    {
        if children.len() < 2 {
            return Err(format!(
                "splitter {:?} has {} children",
                split_id,
                children.len()
            ));
        }
        for child in children {
            check_subtree(child)?;
        }
    }
    Ok(())
}
