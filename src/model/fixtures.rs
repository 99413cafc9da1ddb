// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Deterministic demo documents shared by the binary, tests and benches.

use super::ids::ParticipantId;
use super::node::{ConditionType, FieldLabel, MessageType, NewNode, NodeKind, SimMessage};
use super::protocol::{Protocol, ProtocolGroup, ProtocolTree, RecordedMessage};
use super::tree::{ScriptModel, SimulatorTree};

fn bits(pattern: &str) -> Vec<bool> {
    pattern.chars().filter(|c| *c == '0' || *c == '1').map(|c| c == '1').collect()
}

fn message_node(
    source: Option<ParticipantId>,
    destination: ParticipantId,
    pattern: &str,
    labels: &[(&str, usize, usize)],
) -> NewNode {
    let mut node =
        NewNode::message(SimMessage::new(source, destination, bits(pattern), 100_000, "default"));
    for (name, start, end) in labels {
        node = node.with_child(NewNode::label(FieldLabel::new(*name, *start, *end)));
    }
    node
}

/// Two devices exchanging a request/acknowledge pair guarded by a rule, plus a program action.
pub fn demo_tree() -> SimulatorTree {
    let mut tree = SimulatorTree::new();
    let alice = tree.add_participant("Alice", "A");
    let bob = tree.add_participant("Bob", "B");

    let request = message_node(
        Some(alice),
        bob,
        "1010 1010 1010 1010 0011 0100 1111 0000",
        &[("preamble", 0, 8), ("sync", 8, 16), ("address", 16, 24), ("data", 24, 32)],
    );
    let request_id = tree.add_items(vec![request], 0, None).expect("demo request")[0];

    let rule = NewNode::rule()
        .with_child(NewNode::condition(ConditionType::If))
        .with_child(NewNode::condition(ConditionType::Else));
    let rule_id = tree.add_items(vec![rule], 1, None).expect("demo rule")[0];
    let (if_branch, else_branch) = match tree.children(Some(rule_id)) {
        [if_branch, else_branch] => (*if_branch, *else_branch),
        other => panic!("demo rule has {} branches", other.len()),
    };

    if let Some(NodeKind::RuleCondition(condition)) = tree.node_mut(if_branch).map(|node| node.kind_mut()) {
        condition.set_condition("item1.data == 15");
    }
    let ack = message_node(Some(bob), alice, "1010 1010 0101 0101", &[("preamble", 0, 8), ("ack", 8, 16)]);
    tree.add_items(vec![ack], 0, Some(if_branch)).expect("demo ack");
    tree.add_items(vec![NewNode::goto_action(Some(request_id))], 0, Some(else_branch)).expect("demo goto");

    tree.add_items(vec![NewNode::program_action("notify.sh")], 2, None).expect("demo program");
    tree.take_events();
    tree
}

/// A protocol tree with one group of two recordings.
pub fn demo_protocols(annotated: Option<ParticipantId>) -> ProtocolTree {
    let door_type = MessageType::new(
        "door",
        vec![FieldLabel::new("preamble", 0, 8), FieldLabel::new("state", 8, 12)],
    );
    let thermo_type = MessageType::new(
        "thermo",
        vec![FieldLabel::new("preamble", 0, 8), FieldLabel::new("temperature", 8, 16)],
    );

    let door = Protocol::new(
        "door_bell",
        vec![
            RecordedMessage::new(bits("10101010 0001"), 50_000, door_type.clone()),
            RecordedMessage::new(bits("10101010 0010"), 50_000, door_type),
        ],
    );
    let thermo = Protocol::new(
        "thermostat",
        vec![RecordedMessage::new(bits("10101010 00010110"), 80_000, thermo_type)
            .with_participant(annotated)],
    );

    ProtocolTree::new(vec![ProtocolGroup::new("Recordings", vec![door, thermo])])
}
