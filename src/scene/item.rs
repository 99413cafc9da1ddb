// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;

use crate::model::{ItemId, Node, NodeId, NodeKind, NodeKindTag, ParticipantId};

use super::geometry::{Point, Rect, Size};

/// Visual counterpart of a logical node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Rule,
    RuleCondition,
    Message,
    GotoAction,
    ProgramAction,
    Label,
}

impl ItemKind {
    pub fn from_tag(tag: NodeKindTag) -> Self {
        match tag {
            NodeKindTag::Rule => Self::Rule,
            NodeKindTag::RuleCondition => Self::RuleCondition,
            NodeKindTag::Message => Self::Message,
            NodeKindTag::GotoAction => Self::GotoAction,
            NodeKindTag::ProgramAction => Self::ProgramAction,
            NodeKindTag::FieldLabel => Self::Label,
        }
    }

    pub fn is_selectable(self) -> bool {
        matches!(self, Self::RuleCondition | Self::Message | Self::GotoAction | Self::ProgramAction)
    }

    pub fn is_movable(self) -> bool {
        matches!(self, Self::Message | Self::GotoAction | Self::ProgramAction)
    }

    pub fn accepts_drops(self) -> bool {
        true
    }

    /// Conditions and actions contribute their label row to the minimum content width.
    pub fn reserves_width(self) -> bool {
        matches!(self, Self::RuleCondition | Self::GotoAction | Self::ProgramAction)
    }
}

/// Where a drop lands relative to the item under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPosition {
    Above,
    On,
    Below,
}

impl DropPosition {
    /// Conditions accept `On` across the middle half of their rect; everything else splits at the
    /// vertical middle.
    pub fn from_point(kind: ItemKind, rect: Rect, point: Point) -> Self {
        let offset = point.y - rect.y;
        if kind == ItemKind::RuleCondition {
            if offset < rect.height / 4.0 {
                Self::Above
            } else if offset < rect.height * 3.0 / 4.0 {
                Self::On
            } else {
                Self::Below
            }
        } else if offset < rect.height / 2.0 {
            Self::Above
        } else {
            Self::Below
        }
    }
}

/// Lane an actor item stands for. `Unassigned` is the synthetic actor of messages without sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKey {
    Participant(ParticipantId),
    Unassigned,
}

impl ActorKey {
    pub fn from_source(source: Option<ParticipantId>) -> Self {
        source.map_or(Self::Unassigned, Self::Participant)
    }
}

/// Anything hit-testing can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneItemRef {
    Content(ItemId),
    Actor(ActorKey),
}

/// One positioned item mirroring a logical node.
///
/// Positions are absolute scene coordinates. `parent`/`children` mirror the logical tree and are
/// only rewritten by the synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualItem {
    item_id: ItemId,
    node_id: NodeId,
    kind: ItemKind,
    parent: Option<ItemId>,
    children: Vec<ItemId>,
    pos: Point,
    size: Size,
    labels_width: f64,
    index: String,
    text: String,
    endpoints: Option<(ActorKey, ActorKey)>,
    selectable: bool,
    movable: bool,
    accepts_drops: bool,
    selected: bool,
    logging_active: bool,
    valid: bool,
    drop_indicator: Option<DropPosition>,
}

impl VisualItem {
    pub(crate) fn new(item_id: ItemId, node_id: NodeId, kind: ItemKind) -> Self {
        Self {
            item_id,
            node_id,
            kind,
            parent: None,
            children: Vec::new(),
            pos: Point::default(),
            size: Size::default(),
            labels_width: 0.0,
            index: String::new(),
            text: String::new(),
            endpoints: None,
            selectable: false,
            movable: false,
            accepts_drops: false,
            selected: false,
            logging_active: true,
            valid: true,
            drop_indicator: None,
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ItemId>) {
        self.parent = parent;
    }

    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<ItemId> {
        &mut self.children
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.pos, self.size)
    }

    pub(crate) fn set_geometry(&mut self, pos: Point, size: Size) {
        self.pos = pos;
        self.size = size;
    }

    /// Width of the item's label row (its text box, or the row of field labels for messages).
    pub fn labels_width(&self) -> f64 {
        self.labels_width
    }

    pub(crate) fn set_labels_width(&mut self, labels_width: f64) {
        self.labels_width = labels_width;
    }

    /// Dotted tree position, e.g. `2.1.3`. Empty for labels.
    pub fn index(&self) -> &str {
        &self.index
    }

    pub(crate) fn set_index(&mut self, index: String) {
        self.index = index;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// `(source, destination)` lanes of a message item.
    pub fn endpoints(&self) -> Option<(ActorKey, ActorKey)> {
        self.endpoints
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn is_movable(&self) -> bool {
        self.movable
    }

    pub fn accepts_drops(&self) -> bool {
        self.accepts_drops
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Returns whether the flag changed. Non-selectable items never become selected.
    pub(crate) fn set_selected(&mut self, selected: bool) -> bool {
        let selected = selected && self.selectable;
        let changed = self.selected != selected;
        self.selected = selected;
        changed
    }

    pub fn logging_active(&self) -> bool {
        self.logging_active
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    pub fn drop_indicator(&self) -> Option<DropPosition> {
        self.drop_indicator
    }

    pub(crate) fn set_drop_indicator(&mut self, drop_indicator: Option<DropPosition>) {
        self.drop_indicator = drop_indicator;
    }

    pub(crate) fn update_flags(&mut self) {
        self.selectable = self.kind.is_selectable();
        self.movable = self.kind.is_movable();
        self.accepts_drops = self.kind.accepts_drops();
        if !self.selectable {
            self.selected = false;
        }
    }

    /// Re-reads the attributes mirrored from the logical node.
    pub(crate) fn refresh(&mut self, node: &Node) {
        self.logging_active = node.logging_active();
        self.endpoints = match node.kind() {
            NodeKind::Message(message) => Some((
                ActorKey::from_source(message.source()),
                ActorKey::Participant(message.destination()),
            )),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::{DropPosition, ItemKind};
    use crate::scene::geometry::{Point, Rect};

    #[test]
    fn condition_accepts_on_in_its_middle_half() {
        let rect = Rect::new(0.0, 100.0, 50.0, 40.0);
        let kind = ItemKind::RuleCondition;
        assert_eq!(DropPosition::from_point(kind, rect, Point::new(5.0, 105.0)), DropPosition::Above);
        assert_eq!(DropPosition::from_point(kind, rect, Point::new(5.0, 120.0)), DropPosition::On);
        assert_eq!(DropPosition::from_point(kind, rect, Point::new(5.0, 135.0)), DropPosition::Below);
    }

    #[test]
    fn other_items_split_at_the_middle() {
        let rect = Rect::new(0.0, 0.0, 50.0, 20.0);
        let kind = ItemKind::Message;
        assert_eq!(DropPosition::from_point(kind, rect, Point::new(5.0, 9.0)), DropPosition::Above);
        assert_eq!(DropPosition::from_point(kind, rect, Point::new(5.0, 10.0)), DropPosition::Below);
    }

    #[test]
    fn flags_by_kind() {
        assert!(!ItemKind::Rule.is_selectable());
        assert!(ItemKind::RuleCondition.is_selectable() && !ItemKind::RuleCondition.is_movable());
        assert!(ItemKind::Message.is_movable());
        assert!(!ItemKind::Label.is_selectable());
        assert!(ItemKind::Label.accepts_drops());
    }
}
