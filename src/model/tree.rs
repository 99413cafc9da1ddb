// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The logical tree of a simulation script and the notifications it emits.
//!
//! The scene never mutates the tree directly: it issues requests through [`ScriptModel`] and
//! reacts to the [`TreeEvent`]s the tree queues in response.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use smol_str::SmolStr;

use super::ids::{IdGen, NodeId, NodeIdTag, ParticipantId, ParticipantIdTag};
use super::node::{ConditionType, NewNode, Node, NodeKind, NodeKindTag};
use super::participant::Participant;

/// Structural change notification, delivered in the order the changes happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    ParticipantsChanged,
    ItemsAdded(Vec<NodeId>),
    ItemsUpdated(Vec<NodeId>),
    ItemsMoved(Vec<NodeId>),
    ItemsDeleted(Vec<NodeId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    UnknownNode { node_id: NodeId },
    UnknownParent { parent_id: NodeId },
    UnknownParticipant { participant_id: ParticipantId },
    CyclicMove { node_id: NodeId, parent_id: NodeId },
    InvalidPlacement { kind: NodeKindTag, parent: Option<NodeKindTag> },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node_id } => write!(f, "node not found (id={node_id})"),
            Self::UnknownParent { parent_id } => write!(f, "parent node not found (id={parent_id})"),
            Self::UnknownParticipant { participant_id } => {
                write!(f, "participant not found (id={participant_id})")
            }
            Self::CyclicMove { node_id, parent_id } => {
                write!(f, "cannot move node {node_id} below its own descendant {parent_id}")
            }
            Self::InvalidPlacement { kind, parent } => match parent {
                Some(parent) => write!(f, "a {kind:?} node cannot be placed under a {parent:?}"),
                None => write!(f, "a {kind:?} node cannot be placed at top level"),
            },
        }
    }
}

impl std::error::Error for TreeError {}

/// Whether a node of kind `kind` may be a child of `parent` (`None` = implicit root).
pub fn placement_allowed(kind: NodeKindTag, parent: Option<NodeKindTag>) -> bool {
    match kind {
        NodeKindTag::Rule => parent.is_none(),
        NodeKindTag::RuleCondition => parent == Some(NodeKindTag::Rule),
        NodeKindTag::FieldLabel => parent == Some(NodeKindTag::Message),
        NodeKindTag::Message | NodeKindTag::GotoAction | NodeKindTag::ProgramAction => {
            matches!(parent, None | Some(NodeKindTag::RuleCondition))
        }
    }
}

/// The interface the scene consumes from the logical tree.
///
/// `parent = None` always denotes the implicit root, which has no node of its own.
pub trait ScriptModel {
    fn node(&self, node_id: NodeId) -> Option<&Node>;

    fn children(&self, parent: Option<NodeId>) -> &[NodeId];

    fn participants(&self) -> &[Participant];

    /// The synthetic participant addressing every device.
    fn broadcast(&self) -> &Participant;

    fn item_count(&self) -> usize;

    fn add_items(
        &mut self,
        nodes: Vec<NewNode>,
        index: usize,
        parent: Option<NodeId>,
    ) -> Result<Vec<NodeId>, TreeError>;

    fn move_items(
        &mut self,
        nodes: &[NodeId],
        index: usize,
        parent: Option<NodeId>,
    ) -> Result<(), TreeError>;

    /// Deletes the nodes and their descendants. Unknown nodes are ignored.
    fn delete_items(&mut self, nodes: &[NodeId]);

    fn set_logging(&mut self, node_id: NodeId, logging_active: bool) -> Result<(), TreeError>;

    /// Queues an `ItemsUpdated` notification for attribute changes made outside the tree.
    fn notify_updated(&mut self, nodes: Vec<NodeId>);

    /// Drains queued notifications in arrival order.
    fn take_events(&mut self) -> Vec<TreeEvent>;

    fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.node(node_id).and_then(Node::parent)
    }

    fn contains(&self, node_id: NodeId) -> bool {
        self.node(node_id).is_some()
    }

    fn index_of(&self, node_id: NodeId) -> Option<usize> {
        let parent = self.node(node_id)?.parent();
        self.children(parent).iter().position(|child| *child == node_id)
    }

    fn child_count(&self, parent: Option<NodeId>) -> usize {
        self.children(parent).len()
    }

    fn n_top_level_items(&self) -> usize {
        self.children(None).len()
    }

    fn participant(&self, participant_id: ParticipantId) -> Option<&Participant> {
        if self.broadcast().participant_id() == participant_id {
            return Some(self.broadcast());
        }
        self.participants().iter().find(|p| p.participant_id() == participant_id)
    }

    /// Every live node in depth-first tree order.
    fn all_items(&self) -> Vec<NodeId> {
        fn walk<M: ScriptModel + ?Sized>(model: &M, parent: Option<NodeId>, out: &mut Vec<NodeId>) {
            for child in model.children(parent) {
                out.push(*child);
                walk(model, Some(*child), out);
            }
        }

        let mut out = Vec::with_capacity(self.item_count());
        walk(self, None, &mut out);
        out
    }

    fn has_else_condition(&self, rule: NodeId) -> bool {
        self.children(Some(rule)).iter().any(|child| {
            self.node(*child)
                .and_then(Node::as_condition)
                .is_some_and(|c| c.condition_type() == ConditionType::Else)
        })
    }

    fn is_valid(&self, node_id: NodeId) -> bool {
        let Some(node) = self.node(node_id) else {
            return false;
        };
        match node.kind() {
            NodeKind::GotoAction(goto) => goto.target().is_some_and(|target| {
                target != node_id
                    && self
                        .node(target)
                        .is_some_and(|t| t.kind().tag() != NodeKindTag::FieldLabel)
            }),
            NodeKind::ProgramAction(program) => !program.command().trim().is_empty(),
            NodeKind::RuleCondition(condition) => {
                condition.condition_type() == ConditionType::Else
                    || !condition.condition().trim().is_empty()
            }
            NodeKind::Rule | NodeKind::Message(_) | NodeKind::FieldLabel(_) => true,
        }
    }
}

/// In-memory logical tree with a notification queue.
#[derive(Debug, Clone)]
pub struct SimulatorTree {
    nodes: BTreeMap<NodeId, Node>,
    top_level: Vec<NodeId>,
    node_ids: IdGen<NodeIdTag>,
    participants: Vec<Participant>,
    broadcast: Participant,
    participant_ids: IdGen<ParticipantIdTag>,
    events: Vec<TreeEvent>,
}

impl Default for SimulatorTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatorTree {
    pub fn new() -> Self {
        let mut participant_ids = IdGen::default();
        let broadcast = Participant::new(participant_ids.next_id(), "Broadcast", "Broadcast");
        Self {
            nodes: BTreeMap::new(),
            top_level: Vec::new(),
            node_ids: IdGen::default(),
            participants: Vec::new(),
            broadcast,
            participant_ids,
            events: Vec::new(),
        }
    }

    pub fn add_participant(
        &mut self,
        name: impl Into<SmolStr>,
        shortname: impl Into<SmolStr>,
    ) -> ParticipantId {
        let participant_id = self.participant_ids.next_id();
        self.participants.push(Participant::new(participant_id, name, shortname));
        self.events.push(TreeEvent::ParticipantsChanged);
        participant_id
    }

    pub fn rename_participant(
        &mut self,
        participant_id: ParticipantId,
        name: impl Into<SmolStr>,
        shortname: impl Into<SmolStr>,
    ) -> Result<(), TreeError> {
        let Some(participant) =
            self.participants.iter_mut().find(|p| p.participant_id() == participant_id)
        else {
            return Err(TreeError::UnknownParticipant { participant_id });
        };
        participant.set_name(name);
        participant.set_shortname(shortname);
        self.events.push(TreeEvent::ParticipantsChanged);
        Ok(())
    }

    /// Removes a participant. Messages sent by it become unassigned, messages addressed to it
    /// fall back to broadcast; both are reported as updated before the participant change.
    pub fn remove_participant(&mut self, participant_id: ParticipantId) -> Result<(), TreeError> {
        let Some(index) =
            self.participants.iter().position(|p| p.participant_id() == participant_id)
        else {
            return Err(TreeError::UnknownParticipant { participant_id });
        };
        self.participants.remove(index);

        let broadcast_id = self.broadcast.participant_id();
        let mut touched = Vec::new();
        for (node_id, node) in &mut self.nodes {
            let NodeKind::Message(message) = node.kind_mut() else {
                continue;
            };
            let mut changed = false;
            if message.source() == Some(participant_id) {
                message.set_source(None);
                changed = true;
            }
            if message.destination() == participant_id {
                message.set_destination(broadcast_id);
                changed = true;
            }
            if changed {
                touched.push(*node_id);
            }
        }

        if !touched.is_empty() {
            self.events.push(TreeEvent::ItemsUpdated(touched));
        }
        self.events.push(TreeEvent::ParticipantsChanged);
        Ok(())
    }

    /// Mutable access for attribute edits; callers report them with `notify_updated`.
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    pub fn set_message_endpoints(
        &mut self,
        node_id: NodeId,
        source: Option<ParticipantId>,
        destination: ParticipantId,
    ) -> Result<(), TreeError> {
        for participant_id in source.into_iter().chain(Some(destination)) {
            if self.participant(participant_id).is_none() {
                return Err(TreeError::UnknownParticipant { participant_id });
            }
        }
        let Some(NodeKind::Message(message)) = self.nodes.get_mut(&node_id).map(Node::kind_mut)
        else {
            return Err(TreeError::UnknownNode { node_id });
        };
        message.set_source(source);
        message.set_destination(destination);
        self.events.push(TreeEvent::ItemsUpdated(vec![node_id]));
        Ok(())
    }

    fn kind_tag_of(&self, parent: Option<NodeId>) -> Result<Option<NodeKindTag>, TreeError> {
        match parent {
            None => Ok(None),
            Some(parent_id) => self
                .nodes
                .get(&parent_id)
                .map(|node| Some(node.kind().tag()))
                .ok_or(TreeError::UnknownParent { parent_id }),
        }
    }

    fn siblings_mut(&mut self, parent: Option<NodeId>) -> Option<&mut Vec<NodeId>> {
        match parent {
            None => Some(&mut self.top_level),
            Some(parent_id) => self.nodes.get_mut(&parent_id).map(Node::children_mut),
        }
    }

    fn is_descendant_or_self(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(&current).and_then(Node::parent);
        }
        false
    }

    fn validate_new(node: &NewNode, parent: Option<NodeKindTag>) -> Result<(), TreeError> {
        let kind = node.kind().tag();
        if !placement_allowed(kind, parent) {
            return Err(TreeError::InvalidPlacement { kind, parent });
        }
        for child in node.children() {
            Self::validate_new(child, Some(kind))?;
        }
        Ok(())
    }

    fn attach_new(&mut self, node: NewNode, parent: Option<NodeId>) -> NodeId {
        let node_id = self.node_ids.next_id();
        let (kind, logging_active, children) = node.into_parts();
        self.nodes.insert(node_id, Node::new(kind, logging_active, parent));
        for child in children {
            let child_id = self.attach_new(child, Some(node_id));
            if let Some(node) = self.nodes.get_mut(&node_id) {
                node.children_mut().push(child_id);
            }
        }
        node_id
    }

    fn remove_subtree(&mut self, node_id: NodeId) {
        if let Some(node) = self.nodes.remove(&node_id) {
            for child in node.children() {
                self.remove_subtree(*child);
            }
        }
    }

    fn detach(&mut self, node_id: NodeId) {
        let parent = self.nodes.get(&node_id).and_then(Node::parent);
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.retain(|sibling| *sibling != node_id);
        }
    }
}

impl ScriptModel for SimulatorTree {
    fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    fn children(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            None => &self.top_level,
            Some(parent_id) => self.nodes.get(&parent_id).map(Node::children).unwrap_or(&[]),
        }
    }

    fn participants(&self) -> &[Participant] {
        &self.participants
    }

    fn broadcast(&self) -> &Participant {
        &self.broadcast
    }

    fn item_count(&self) -> usize {
        self.nodes.len()
    }

    fn add_items(
        &mut self,
        nodes: Vec<NewNode>,
        index: usize,
        parent: Option<NodeId>,
    ) -> Result<Vec<NodeId>, TreeError> {
        let parent_kind = self.kind_tag_of(parent)?;
        for node in &nodes {
            Self::validate_new(node, parent_kind)?;
        }
        if nodes.is_empty() {
            return Ok(Vec::new());
        }

        let mut added = Vec::with_capacity(nodes.len());
        for node in nodes {
            added.push(self.attach_new(node, parent));
        }

        if let Some(siblings) = self.siblings_mut(parent) {
            let index = index.min(siblings.len());
            siblings.splice(index..index, added.iter().copied());
        }

        self.events.push(TreeEvent::ItemsAdded(added.clone()));
        Ok(added)
    }

    fn move_items(
        &mut self,
        nodes: &[NodeId],
        index: usize,
        parent: Option<NodeId>,
    ) -> Result<(), TreeError> {
        let mut seen = HashSet::new();
        let nodes = nodes.iter().copied().filter(|node_id| seen.insert(*node_id)).collect::<Vec<_>>();

        let parent_kind = self.kind_tag_of(parent)?;
        for node_id in &nodes {
            let Some(node) = self.nodes.get(node_id) else {
                return Err(TreeError::UnknownNode { node_id: *node_id });
            };
            let kind = node.kind().tag();
            if !placement_allowed(kind, parent_kind) {
                return Err(TreeError::InvalidPlacement { kind, parent: parent_kind });
            }
            if let Some(parent_id) = parent {
                if self.is_descendant_or_self(parent_id, *node_id) {
                    return Err(TreeError::CyclicMove { node_id: *node_id, parent_id });
                }
            }
        }
        if nodes.is_empty() {
            return Ok(());
        }

        // Moving forward inside the same parent shifts the target left once per moved item.
        let mut index = index;
        for node_id in &nodes {
            if self.parent(*node_id) == parent {
                if let Some(pos) = self.index_of(*node_id) {
                    if pos < index {
                        index -= 1;
                    }
                }
            }
        }

        for node_id in &nodes {
            self.detach(*node_id);
        }
        for node_id in &nodes {
            if let Some(node) = self.nodes.get_mut(node_id) {
                node.set_parent(parent);
            }
        }
        if let Some(siblings) = self.siblings_mut(parent) {
            let index = index.min(siblings.len());
            siblings.splice(index..index, nodes.iter().copied());
        }

        self.events.push(TreeEvent::ItemsMoved(nodes));
        Ok(())
    }

    fn delete_items(&mut self, nodes: &[NodeId]) {
        let existing =
            nodes.iter().copied().filter(|node_id| self.nodes.contains_key(node_id)).collect::<Vec<_>>();
        if existing.is_empty() {
            return;
        }

        for node_id in &existing {
            if !self.nodes.contains_key(node_id) {
                continue;
            }
            self.detach(*node_id);
            self.remove_subtree(*node_id);
        }

        self.events.push(TreeEvent::ItemsDeleted(existing));
    }

    fn set_logging(&mut self, node_id: NodeId, logging_active: bool) -> Result<(), TreeError> {
        let node = self.nodes.get_mut(&node_id).ok_or(TreeError::UnknownNode { node_id })?;
        node.set_logging_active(logging_active);
        Ok(())
    }

    fn notify_updated(&mut self, nodes: Vec<NodeId>) {
        if !nodes.is_empty() {
            self.events.push(TreeEvent::ItemsUpdated(nodes));
        }
    }

    fn take_events(&mut self) -> Vec<TreeEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{ScriptModel, SimulatorTree, TreeError, TreeEvent};
    use crate::model::node::{ConditionType, FieldLabel, NewNode, NodeKind, NodeKindTag, SimMessage};

    fn message(tree: &SimulatorTree) -> NewNode {
        let dst = tree.broadcast().participant_id();
        NewNode::message(SimMessage::new(None, dst, vec![true, false], 0, "t"))
            .with_child(NewNode::label(FieldLabel::new("preamble", 0, 8)))
    }

    #[test]
    fn add_items_attaches_prebuilt_children_and_emits_one_event() {
        let mut tree = SimulatorTree::new();
        let msg = message(&tree);
        let added = tree.add_items(vec![msg], 0, None).expect("add");

        assert_eq!(added.len(), 1);
        assert_eq!(tree.item_count(), 2);
        assert_eq!(tree.children(Some(added[0])).len(), 1);
        assert_eq!(tree.take_events(), vec![TreeEvent::ItemsAdded(added)]);
        assert!(tree.take_events().is_empty());
    }

    #[test]
    fn add_items_rejects_conditions_outside_rules() {
        let mut tree = SimulatorTree::new();
        let err = tree
            .add_items(vec![NewNode::condition(ConditionType::If)], 0, None)
            .expect_err("placement");
        assert_eq!(
            err,
            TreeError::InvalidPlacement { kind: NodeKindTag::RuleCondition, parent: None }
        );
        assert!(tree.take_events().is_empty());
    }

    #[test]
    fn move_forward_within_parent_adjusts_index() {
        let mut tree = SimulatorTree::new();
        let a = tree.add_items(vec![message(&tree)], 0, None).expect("a")[0];
        let b = tree.add_items(vec![message(&tree)], 1, None).expect("b")[0];
        let c = tree.add_items(vec![message(&tree)], 2, None).expect("c")[0];
        tree.take_events();

        // Drop `a` below `c`: index 3 in the pre-move list.
        tree.move_items(&[a], 3, None).expect("move");
        assert_eq!(tree.children(None), &[b, c, a]);
        assert_eq!(tree.take_events(), vec![TreeEvent::ItemsMoved(vec![a])]);
    }

    #[test]
    fn move_with_repeated_ids_moves_each_node_once() {
        let mut tree = SimulatorTree::new();
        let a = tree.add_items(vec![message(&tree)], 0, None).expect("a")[0];
        let b = tree.add_items(vec![message(&tree)], 1, None).expect("b")[0];
        let c = tree.add_items(vec![message(&tree)], 2, None).expect("c")[0];
        tree.take_events();

        tree.move_items(&[a, a], 3, None).expect("move");
        assert_eq!(tree.children(None), &[b, c, a]);
        assert_eq!(tree.take_events(), vec![TreeEvent::ItemsMoved(vec![a])]);
    }

    #[test]
    fn move_into_own_subtree_is_rejected() {
        let mut tree = SimulatorTree::new();
        let rule = tree
            .add_items(vec![NewNode::rule().with_child(NewNode::condition(ConditionType::If))], 0, None)
            .expect("rule")[0];
        let cond = tree.children(Some(rule))[0];
        let inner = tree.add_items(vec![message(&tree)], 0, Some(cond)).expect("inner")[0];

        let err = tree.move_items(&[rule], 0, Some(cond)).expect_err("cyclic");
        assert!(matches!(err, TreeError::InvalidPlacement { .. } | TreeError::CyclicMove { .. }));
        assert_eq!(tree.parent(inner), Some(cond));
    }

    #[test]
    fn delete_cascades_and_ignores_already_removed_entries() {
        let mut tree = SimulatorTree::new();
        let rule = tree
            .add_items(vec![NewNode::rule().with_child(NewNode::condition(ConditionType::If))], 0, None)
            .expect("rule")[0];
        let cond = tree.children(Some(rule))[0];
        let msg = tree.add_items(vec![message(&tree)], 0, Some(cond)).expect("msg")[0];
        tree.take_events();

        tree.delete_items(&[rule, msg]);
        assert_eq!(tree.item_count(), 0);
        assert!(tree.children(None).is_empty());
        assert_eq!(tree.take_events(), vec![TreeEvent::ItemsDeleted(vec![rule, msg])]);
    }

    #[test]
    fn has_else_condition_and_validity() {
        let mut tree = SimulatorTree::new();
        let rule = tree
            .add_items(
                vec![NewNode::rule()
                    .with_child(NewNode::condition(ConditionType::If))
                    .with_child(NewNode::condition(ConditionType::Else))],
                0,
                None,
            )
            .expect("rule")[0];
        assert!(tree.has_else_condition(rule));

        let children = tree.children(Some(rule)).to_vec();
        assert!(!tree.is_valid(children[0]), "empty if condition is invalid");
        assert!(tree.is_valid(children[1]), "else needs no condition");

        let goto = tree.add_items(vec![NewNode::goto_action(None)], 1, None).expect("goto")[0];
        assert!(!tree.is_valid(goto));
        if let Some(NodeKind::GotoAction(action)) = tree.node_mut(goto).map(|n| n.kind_mut()) {
            action.set_target(Some(rule));
        }
        assert!(tree.is_valid(goto));
    }

    #[test]
    fn removing_participant_reassigns_messages_before_notifying() {
        let mut tree = SimulatorTree::new();
        let alice = tree.add_participant("Alice", "A");
        let bob = tree.add_participant("Bob", "B");
        let msg = tree
            .add_items(
                vec![NewNode::message(SimMessage::new(Some(alice), bob, vec![], 0, "t"))],
                0,
                None,
            )
            .expect("msg")[0];
        tree.take_events();

        tree.remove_participant(bob).expect("remove");
        let message = tree.node(msg).and_then(|n| n.as_message()).expect("message");
        assert_eq!(message.source(), Some(alice));
        assert_eq!(message.destination(), tree.broadcast().participant_id());
        assert_eq!(
            tree.take_events(),
            vec![TreeEvent::ItemsUpdated(vec![msg]), TreeEvent::ParticipantsChanged]
        );
    }
}
