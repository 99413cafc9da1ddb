// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Logical node types of a simulation script.

use std::fmt;

use serde::Serialize;
use smol_str::SmolStr;

use super::ids::{NodeId, ParticipantId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKindTag {
    Rule,
    RuleCondition,
    Message,
    GotoAction,
    ProgramAction,
    FieldLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    If,
    ElseIf,
    Else,
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::If => f.write_str("if"),
            Self::ElseIf => f.write_str("else if"),
            Self::Else => f.write_str("else"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCondition {
    condition_type: ConditionType,
    condition: String,
}

impl RuleCondition {
    pub fn new(condition_type: ConditionType) -> Self {
        Self { condition_type, condition: String::new() }
    }

    pub fn condition_type(&self) -> ConditionType {
        self.condition_type
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn set_condition(&mut self, condition: impl Into<String>) {
        self.condition = condition.into();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLabel {
    name: SmolStr,
    start: usize,
    end: usize,
}

impl FieldLabel {
    pub fn new(name: impl Into<SmolStr>, start: usize, end: usize) -> Self {
        Self { name: name.into(), start, end }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }
}

/// A named set of field label definitions shared by messages of the same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageType {
    name: SmolStr,
    labels: Vec<FieldLabel>,
}

impl MessageType {
    pub fn new(name: impl Into<SmolStr>, labels: Vec<FieldLabel>) -> Self {
        Self { name: name.into(), labels }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[FieldLabel] {
        &self.labels
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimMessage {
    source: Option<ParticipantId>,
    destination: ParticipantId,
    plain_bits: Vec<bool>,
    pause: u64,
    message_type: SmolStr,
    decoder: Option<SmolStr>,
}

impl SimMessage {
    /// `source = None` leaves the sender unassigned.
    pub fn new(
        source: Option<ParticipantId>,
        destination: ParticipantId,
        plain_bits: Vec<bool>,
        pause: u64,
        message_type: impl Into<SmolStr>,
    ) -> Self {
        Self {
            source,
            destination,
            plain_bits,
            pause,
            message_type: message_type.into(),
            decoder: None,
        }
    }

    pub fn source(&self) -> Option<ParticipantId> {
        self.source
    }

    pub fn destination(&self) -> ParticipantId {
        self.destination
    }

    pub fn set_source(&mut self, source: Option<ParticipantId>) {
        self.source = source;
    }

    pub fn set_destination(&mut self, destination: ParticipantId) {
        self.destination = destination;
    }

    pub fn plain_bits(&self) -> &[bool] {
        &self.plain_bits
    }

    pub fn pause(&self) -> u64 {
        self.pause
    }

    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    pub fn decoder(&self) -> Option<&str> {
        self.decoder.as_deref()
    }

    pub fn set_decoder<T: Into<SmolStr>>(&mut self, decoder: Option<T>) {
        self.decoder = decoder.map(Into::into);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GotoAction {
    target: Option<NodeId>,
}

impl GotoAction {
    pub fn new(target: Option<NodeId>) -> Self {
        Self { target }
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<NodeId>) {
        self.target = target;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgramAction {
    command: String,
    pass_transcript: bool,
}

impl ProgramAction {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), pass_transcript: false }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn pass_transcript(&self) -> bool {
        self.pass_transcript
    }

    pub fn set_pass_transcript(&mut self, pass_transcript: bool) {
        self.pass_transcript = pass_transcript;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Rule,
    RuleCondition(RuleCondition),
    Message(SimMessage),
    GotoAction(GotoAction),
    ProgramAction(ProgramAction),
    FieldLabel(FieldLabel),
}

impl NodeKind {
    pub fn tag(&self) -> NodeKindTag {
        match self {
            Self::Rule => NodeKindTag::Rule,
            Self::RuleCondition(_) => NodeKindTag::RuleCondition,
            Self::Message(_) => NodeKindTag::Message,
            Self::GotoAction(_) => NodeKindTag::GotoAction,
            Self::ProgramAction(_) => NodeKindTag::ProgramAction,
            Self::FieldLabel(_) => NodeKindTag::FieldLabel,
        }
    }
}

/// A live node of the logical tree. `parent = None` means the node hangs off the implicit root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    logging_active: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, logging_active: bool, parent: Option<NodeId>) -> Self {
        Self { kind, logging_active, parent, children: Vec::new() }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn logging_active(&self) -> bool {
        self.logging_active
    }

    pub(crate) fn set_logging_active(&mut self, logging_active: bool) {
        self.logging_active = logging_active;
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }

    pub fn as_message(&self) -> Option<&SimMessage> {
        match &self.kind {
            NodeKind::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn as_condition(&self) -> Option<&RuleCondition> {
        match &self.kind {
            NodeKind::RuleCondition(condition) => Some(condition),
            _ => None,
        }
    }
}

/// A detached node (with its own detached children) waiting to be inserted via `add_items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    kind: NodeKind,
    logging_active: bool,
    children: Vec<NewNode>,
}

impl NewNode {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, logging_active: true, children: Vec::new() }
    }

    pub fn rule() -> Self {
        Self::new(NodeKind::Rule)
    }

    pub fn condition(condition_type: ConditionType) -> Self {
        Self::new(NodeKind::RuleCondition(RuleCondition::new(condition_type)))
    }

    pub fn goto_action(target: Option<NodeId>) -> Self {
        Self::new(NodeKind::GotoAction(GotoAction::new(target)))
    }

    pub fn program_action(command: impl Into<String>) -> Self {
        Self::new(NodeKind::ProgramAction(ProgramAction::new(command)))
    }

    pub fn message(message: SimMessage) -> Self {
        Self::new(NodeKind::Message(message))
    }

    pub fn label(label: FieldLabel) -> Self {
        Self::new(NodeKind::FieldLabel(label))
    }

    pub fn with_child(mut self, child: NewNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_logging(mut self, logging_active: bool) -> Self {
        self.logging_active = logging_active;
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[NewNode] {
        &self.children
    }

    pub(crate) fn into_parts(self) -> (NodeKind, bool, Vec<NewNode>) {
        (self.kind, self.logging_active, self.children)
    }
}
