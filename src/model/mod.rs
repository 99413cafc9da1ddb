// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Logical model of a simulation script.
//!
//! Scripts are trees of rules, conditions, messages, actions and field labels. The scene layer
//! only sees them through [`ScriptModel`].

pub mod fixtures;
pub mod ids;
pub mod node;
pub mod participant;
pub mod protocol;
pub mod tree;

pub use ids::{Id, IdGen, ItemId, NodeId, ParticipantId};
pub use node::{
    ConditionType, FieldLabel, GotoAction, MessageType, NewNode, Node, NodeKind,
    NodeKindTag, ProgramAction, RuleCondition, SimMessage,
};
pub use participant::Participant;
pub use protocol::{Protocol, ProtocolGroup, ProtocolNodeRef, ProtocolTree, RecordedMessage};
pub use tree::{placement_allowed, ScriptModel, SimulatorTree, TreeError, TreeEvent};
