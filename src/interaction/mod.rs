// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interaction controller.
//!
//! [`Editor`] owns a logical tree and its scene. Every gesture or command becomes a mutation
//! request on the tree; the notifications the tree queues in response are then pumped into the
//! scene, in order, before the call returns.

pub mod dragdrop;


use std::fmt;

use smol_str::SmolStr;

use crate::config::SceneConfig;
use crate::model::{
    ConditionType, FieldLabel, ItemId, MessageType, NewNode, NodeId, NodeKindTag, ParticipantId,
    Protocol, ProtocolTree, RecordedMessage, ScriptModel, SimMessage, TreeError,
};
use crate::scene::{
    ActorKey, DropPosition, ItemKind, Point, Scene, SceneItemRef, SyncError, TextMetrics,
};

pub use dragdrop::{
    drag_verdict, parse_drag_payload, resolve_drop_nodes, DragIndex, DragPhase, DragSession,
    DragVerdict,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    Tree(TreeError),
    Sync(SyncError),
    UnknownItem { item_id: ItemId },
    NothingInserted { parent: Option<NodeId> },
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree(err) => write!(f, "tree rejected the edit: {err}"),
            Self::Sync(err) => write!(f, "scene sync failed: {err}"),
            Self::UnknownItem { item_id } => write!(f, "scene item not found (id={item_id})"),
            Self::NothingInserted { parent: Some(parent) } => {
                write!(f, "insert under {parent} reported no new node")
            }
            Self::NothingInserted { parent: None } => write!(f, "top-level insert reported no new node"),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            Self::Sync(err) => Some(err),
            Self::UnknownItem { .. } | Self::NothingInserted { .. } => None,
        }
    }
}

impl From<TreeError> for EditorError {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

impl From<SyncError> for EditorError {
    fn from(err: SyncError) -> Self {
        Self::Sync(err)
    }
}

/// A concrete place in the logical tree: `parent = None` is the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    pub parent: Option<NodeId>,
    pub index: usize,
}

/// Everything needed to build a message node; field labels are copied from `message_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    pub plain_bits: Vec<bool>,
    pub pause: u64,
    pub message_type: MessageType,
    pub decoder: Option<SmolStr>,
    pub source: Option<ParticipantId>,
    /// `None` addresses the broadcast participant.
    pub destination: Option<ParticipantId>,
}

impl MessageTemplate {
    pub fn new(plain_bits: Vec<bool>, message_type: MessageType) -> Self {
        Self { plain_bits, pause: 0, message_type, decoder: None, source: None, destination: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Accepted without selection or drag handling.
    Consumed,
    /// Selection replaced by the topmost selectable item under the cursor, if any.
    Selected(Option<ItemId>),
}

#[derive(Debug)]
pub struct Editor<M: ScriptModel> {
    model: M,
    scene: Scene,
    drag: DragSession,
}

impl<M: ScriptModel> Editor<M> {
    pub fn new(
        mut model: M,
        config: SceneConfig,
        metrics: Box<dyn TextMetrics>,
    ) -> Result<Self, EditorError> {
        // The scene is built from the current tree; earlier notifications are already reflected.
        model.take_events();
        let scene = Scene::new(&model, config, metrics)?;
        Ok(Self { model, scene, drag: DragSession::default() })
    }

    pub fn with_config(mut model: M, config: SceneConfig) -> Result<Self, EditorError> {
        model.take_events();
        let scene = Scene::with_config(&model, config)?;
        Ok(Self { model, scene, drag: DragSession::default() })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn drag_session(&self) -> &DragSession {
        &self.drag
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Runs an arbitrary edit on the tree, then brings the scene up to date.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut M) -> R) -> Result<R, EditorError> {
        let result = f(&mut self.model);
        self.pump()?;
        Ok(result)
    }

    fn pump(&mut self) -> Result<(), SyncError> {
        let events = self.model.take_events();
        for (handled, event) in events.iter().enumerate() {
            if let Err(err) = self.scene.handle_event(&self.model, event) {
                let dropped = events.len() - handled - 1;
                log::error!("editor: {err}; {dropped} queued notification(s) left unhandled");
                return Err(err);
            }
        }
        Ok(())
    }

    fn node_of(&self, item_id: ItemId) -> Result<NodeId, EditorError> {
        self.scene.item(item_id).map(|item| item.node_id()).ok_or(EditorError::UnknownItem { item_id })
    }

    fn nodes_of(&self, items: &[ItemId]) -> Result<Vec<NodeId>, EditorError> {
        items.iter().map(|item_id| self.node_of(*item_id)).collect()
    }

    fn position_of(&self, node_id: NodeId) -> Result<usize, EditorError> {
        Ok(self.model.index_of(node_id).ok_or(TreeError::UnknownNode { node_id })?)
    }

    // Selection

    pub fn selected_items(&self) -> Vec<ItemId> {
        self.scene.selected_items()
    }

    pub fn all_messages(&self) -> Vec<ItemId> {
        self.scene.all_messages()
    }

    pub fn selectable_items(&self) -> Vec<ItemId> {
        self.scene.selectable_items()
    }

    pub fn select(&mut self, item_id: ItemId, selected: bool) -> bool {
        self.scene.set_selected(item_id, selected)
    }

    pub fn clear_selection(&mut self) {
        self.scene.clear_selection();
    }

    pub fn select_all_items(&mut self) {
        self.scene.select_all_items();
    }

    /// Replaces the selection with the messages sent (`from_source`) or received by `actor`.
    pub fn select_messages_with_participant(&mut self, actor: ActorKey, from_source: bool) {
        self.scene.clear_selection();
        for item_id in self.scene.all_messages() {
            let Some((source, destination)) = self.scene.item(item_id).and_then(|i| i.endpoints())
            else {
                continue;
            };
            let endpoint = if from_source { source } else { destination };
            if endpoint == actor {
                self.scene.select_all(item_id);
            }
        }
    }

    /// Selected movable nodes, in tree order.
    pub fn get_drag_nodes(&self) -> Vec<NodeId> {
        self.scene
            .items_in_tree_order()
            .into_iter()
            .filter_map(|item_id| self.scene.item(item_id))
            .filter(|item| item.is_selected() && item.is_movable())
            .map(|item| item.node_id())
            .collect()
    }

    // Logging

    pub fn log_items(&mut self, items: &[ItemId], logging_active: bool) -> Result<(), EditorError> {
        let nodes = self.nodes_of(items)?;
        for node_id in &nodes {
            self.model.set_logging(*node_id, logging_active)?;
        }
        self.model.notify_updated(nodes);
        Ok(self.pump()?)
    }

    pub fn log_selected_items(&mut self, logging_active: bool) -> Result<(), EditorError> {
        let items = self.scene.selected_items();
        self.log_items(&items, logging_active)
    }

    pub fn log_toggle_selected_items(&mut self) -> Result<(), EditorError> {
        let nodes = self.nodes_of(&self.scene.selected_items())?;
        for node_id in &nodes {
            let active = self
                .model
                .node(*node_id)
                .map(|node| node.logging_active())
                .ok_or(TreeError::UnknownNode { node_id: *node_id })?;
            self.model.set_logging(*node_id, !active)?;
        }
        self.model.notify_updated(nodes);
        Ok(self.pump()?)
    }

    pub fn log_all_items(&mut self, logging_active: bool) -> Result<(), EditorError> {
        let items = self.scene.selectable_items();
        self.log_items(&items, logging_active)
    }

    // Structural edits

    pub fn delete_selected_items(&mut self) -> Result<(), EditorError> {
        let nodes = self.nodes_of(&self.scene.selected_items())?;
        self.scene.clear_selection();
        self.model.delete_items(&nodes);
        Ok(self.pump()?)
    }

    pub fn clear_all(&mut self) -> Result<(), EditorError> {
        let nodes = self.model.children(None).to_vec();
        self.model.delete_items(&nodes);
        Ok(self.pump()?)
    }

    /// Resolves a drop/insert position relative to `ref_item` to a place in the tree.
    ///
    /// - no reference: append at top level;
    /// - `insert_rule`: before/after the reference's top-level ancestor;
    /// - a condition with `On`: append to the condition; `Above`/`Below` anchor on its rule;
    /// - anything else: sibling of the reference. Labels count as their message.
    pub fn insert_at(
        &self,
        ref_item: Option<ItemId>,
        position: DropPosition,
        insert_rule: bool,
    ) -> Result<InsertionPoint, EditorError> {
        let Some(item_id) = ref_item else {
            return Ok(InsertionPoint { parent: None, index: self.model.n_top_level_items() });
        };
        let item = self.scene.item(item_id).ok_or(EditorError::UnknownItem { item_id })?;

        let mut node_id = item.node_id();
        if item.kind() == ItemKind::Label {
            node_id = self.model.parent(node_id).unwrap_or(node_id);
        }
        let kind = self.model.node(node_id).ok_or(TreeError::UnknownNode { node_id })?.kind().tag();

        let (parent, mut index) = if insert_rule {
            let mut top = node_id;
            while let Some(parent) = self.model.parent(top) {
                top = parent;
            }
            (None, self.position_of(top)?)
        } else if kind == NodeKindTag::RuleCondition {
            if position == DropPosition::On {
                (Some(node_id), self.model.child_count(Some(node_id)))
            } else {
                let rule = self.model.parent(node_id).unwrap_or(node_id);
                (None, self.position_of(rule)?)
            }
        } else {
            (self.model.parent(node_id), self.position_of(node_id)?)
        };

        if position == DropPosition::Below {
            index += 1;
        }
        Ok(InsertionPoint { parent, index })
    }

    fn add_at(
        &mut self,
        nodes: Vec<NewNode>,
        at: InsertionPoint,
    ) -> Result<Vec<NodeId>, EditorError> {
        let added = self.model.add_items(nodes, at.index, at.parent)?;
        self.pump()?;
        Ok(added)
    }

    fn add_one(&mut self, node: NewNode, at: InsertionPoint) -> Result<NodeId, EditorError> {
        let added = self.add_at(vec![node], at)?;
        added.into_iter().next().ok_or(EditorError::NothingInserted { parent: at.parent })
    }

    pub fn move_items(
        &mut self,
        nodes: &[NodeId],
        ref_item: Option<ItemId>,
        position: DropPosition,
    ) -> Result<(), EditorError> {
        let at = self.insert_at(ref_item, position, false)?;
        self.model.move_items(nodes, at.index, at.parent)?;
        Ok(self.pump()?)
    }

    /// Adds a rule at top level next to the reference, together with its `if` branch.
    pub fn add_rule(
        &mut self,
        ref_item: Option<ItemId>,
        position: DropPosition,
    ) -> Result<NodeId, EditorError> {
        let at = self.insert_at(ref_item, position, true)?;
        let rule = self.add_one(NewNode::rule(), at)?;
        self.add_rule_condition(rule, ConditionType::If)?;
        Ok(rule)
    }

    /// Appends a branch to `rule`; an `else if` goes before an existing `else`.
    pub fn add_rule_condition(
        &mut self,
        rule: NodeId,
        condition_type: ConditionType,
    ) -> Result<NodeId, EditorError> {
        let mut index = self.model.child_count(Some(rule));
        if condition_type == ConditionType::ElseIf && self.model.has_else_condition(rule) {
            index -= 1;
        }
        self.add_one(NewNode::condition(condition_type), InsertionPoint { parent: Some(rule), index })
    }

    pub fn add_goto_action(
        &mut self,
        ref_item: Option<ItemId>,
        position: DropPosition,
    ) -> Result<NodeId, EditorError> {
        let at = self.insert_at(ref_item, position, false)?;
        self.add_one(NewNode::goto_action(None), at)
    }

    pub fn add_program_action(
        &mut self,
        ref_item: Option<ItemId>,
        position: DropPosition,
    ) -> Result<NodeId, EditorError> {
        let at = self.insert_at(ref_item, position, false)?;
        self.add_one(NewNode::program_action(""), at)
    }

    pub fn add_message(
        &mut self,
        template: MessageTemplate,
        ref_item: Option<ItemId>,
        position: DropPosition,
    ) -> Result<NodeId, EditorError> {
        let message = self.create_message(template);
        let at = self.insert_at(ref_item, position, false)?;
        self.add_one(message, at)
    }

    /// Builds a detached message node with one label child per field label of its type.
    pub fn create_message(&self, template: MessageTemplate) -> NewNode {
        let destination =
            template.destination.unwrap_or_else(|| self.model.broadcast().participant_id());
        let mut message = SimMessage::new(
            template.source,
            destination,
            template.plain_bits,
            template.pause,
            template.message_type.name(),
        );
        message.set_decoder(template.decoder);

        template
            .message_type
            .labels()
            .iter()
            .cloned()
            .fold(NewNode::message(message), |node, label: FieldLabel| node.with_child(NewNode::label(label)))
    }

    /// Sender and receiver for an imported message.
    ///
    /// The destination is always broadcast. The source is the first participant, or with more
    /// than two participants the one the recording was attributed to.
    pub fn detect_source_destination(
        &self,
        message: &RecordedMessage,
    ) -> (Option<ParticipantId>, ParticipantId) {
        let participants = self.model.participants();
        let destination = self.model.broadcast().participant_id();
        let first = participants.first().map(|p| p.participant_id());
        let source = match participants.len() {
            0 | 1 => None,
            2 => first,
            _ => message.participant().or(first),
        };
        (source, destination)
    }

    /// Converts every message of `protocols` and inserts them in one batch.
    pub fn add_protocols(
        &mut self,
        ref_item: Option<ItemId>,
        position: DropPosition,
        protocols: &[&Protocol],
    ) -> Result<Vec<NodeId>, EditorError> {
        let at = self.insert_at(ref_item, position, false)?;
        let messages = protocols
            .iter()
            .flat_map(|protocol| protocol.messages())
            .map(|recorded| {
                let (source, destination) = self.detect_source_destination(recorded);
                self.create_message(MessageTemplate {
                    plain_bits: recorded.decoded_bits().to_vec(),
                    pause: recorded.pause(),
                    message_type: recorded.message_type().clone(),
                    decoder: recorded.decoder().map(SmolStr::new),
                    source,
                    destination: Some(destination),
                })
            })
            .collect::<Vec<_>>();
        if messages.is_empty() {
            return Ok(Vec::new());
        }
        let names = protocols.iter().map(|protocol| protocol.name()).collect::<Vec<_>>();
        log::info!("importing {} message(s) from {names:?} at {at:?}", messages.len());
        self.add_at(messages, at)
    }

    // Pointer and drag gestures

    pub fn mouse_press(&mut self, button: PointerButton, point: Point) -> PressOutcome {
        if button != PointerButton::Left {
            return PressOutcome::Consumed;
        }
        let target = self.scene.items_at(point).into_iter().find_map(|hit| match hit {
            SceneItemRef::Content(item_id) => {
                self.scene.item(item_id).filter(|item| item.is_selectable()).map(|_| item_id)
            }
            SceneItemRef::Actor(_) => None,
        });
        self.scene.clear_selection();
        if let Some(item_id) = target {
            self.scene.set_selected(item_id, true);
        }
        PressOutcome::Selected(target)
    }

    pub fn drag_enter(&mut self) {
        self.drag.enter();
    }

    /// Updates the drop indicator under `point` and tells the toolkit whether to forward the event.
    pub fn drag_move(&mut self, point: Point) -> DragVerdict {
        self.drag.move_to(point);
        let hits = self.scene.items_at(point);
        let verdict = drag_verdict(&self.scene, &hits);
        match (verdict, self.drop_target(&hits, point)) {
            (DragVerdict::Forward, Some((item_id, position))) => {
                self.scene.set_drop_indicator(Some(item_id), Some(position));
            }
            _ => self.scene.set_drop_indicator(None, None),
        }
        verdict
    }

    pub fn drag_leave(&mut self) {
        self.drag.cancel();
        self.scene.set_drop_indicator(None, None);
    }

    /// Imports the protocols named by `payload` at the drop target under `point`.
    ///
    /// All messages are inserted with a single tree request; nothing is inserted before this call.
    pub fn drop(
        &mut self,
        point: Point,
        payload: &str,
        protocols: &ProtocolTree,
    ) -> Result<Vec<NodeId>, EditorError> {
        let hits = self.scene.items_at(point);
        let target = self.drop_target(&hits, point);
        self.drag.drop_at(point);
        self.scene.set_drop_indicator(None, None);

        let (ref_item, position) = match target {
            Some((item_id, position)) => (Some(item_id), position),
            None => (None, DropPosition::Below),
        };
        self.add_protocols_from_payload(ref_item, position, payload, protocols)
    }

    /// Imports the protocols a drag payload addresses, relative to `ref_item`.
    pub fn add_protocols_from_payload(
        &mut self,
        ref_item: Option<ItemId>,
        position: DropPosition,
        payload: &str,
        protocols: &ProtocolTree,
    ) -> Result<Vec<NodeId>, EditorError> {
        let nodes = resolve_drop_nodes(protocols, &parse_drag_payload(payload));
        let to_add = nodes.iter().filter_map(|node| protocols.protocol(*node)).collect::<Vec<_>>();
        self.add_protocols(ref_item, position, &to_add)
    }

    /// The first drop-accepting item under the cursor and where a drop on it would land.
    fn drop_target(&self, hits: &[SceneItemRef], point: Point) -> Option<(ItemId, DropPosition)> {
        hits.iter().find_map(|hit| match hit {
            SceneItemRef::Content(item_id) => self
                .scene
                .item(*item_id)
                .filter(|item| item.accepts_drops())
                .map(|item| (*item_id, DropPosition::from_point(item.kind(), item.rect(), point))),
            SceneItemRef::Actor(_) => None,
        })
    }
}
