// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use simscene::model::{
    ConditionType, FieldLabel, NewNode, ParticipantId, ScriptModel, SimMessage, SimulatorTree,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// (participants, top-level messages, rules)
    fn shape(self) -> (usize, usize, usize) {
        match self {
            Self::Small => (3, 12, 2),
            Self::Medium => (8, 120, 20),
            Self::Large => (24, 1_200, 200),
        }
    }

    pub fn all() -> [Case; 3] {
        [Self::Small, Self::Medium, Self::Large]
    }
}

fn message(source: ParticipantId, destination: ParticipantId, seed: usize) -> NewNode {
    let bits = (0..32).map(|bit| (seed >> (bit % 8)) & 1 == 1).collect();
    let mut node = NewNode::message(SimMessage::new(Some(source), destination, bits, 1_000, "bench"));
    let labels = 1 + seed % 4;
    for label in 0..labels {
        let name = format!("field_{label}_{}", "x".repeat(seed % 7));
        node = node.with_child(NewNode::label(FieldLabel::new(name, label * 8, label * 8 + 8)));
    }
    node
}

/// A script with messages between neighbouring and far apart participants, interleaved with
/// two-branch rules.
pub fn script(case: Case) -> SimulatorTree {
    let (participants, messages, rules) = case.shape();
    let mut tree = SimulatorTree::new();
    let ids = (0..participants)
        .map(|i| tree.add_participant(format!("Device {i}"), format!("D{i}")))
        .collect::<Vec<_>>();

    let rule_every = (messages / rules.max(1)).max(1);
    for seed in 0..messages {
        let source = ids[seed % participants];
        let destination = ids[(seed * 7 + 1) % participants];
        let index = tree.n_top_level_items();
        if seed % rule_every == rule_every - 1 {
            let rule = NewNode::rule()
                .with_child(
                    NewNode::condition(ConditionType::If)
                        .with_child(message(destination, source, seed + 1)),
                )
                .with_child(NewNode::condition(ConditionType::Else).with_child(NewNode::goto_action(None)));
            tree.add_items(vec![rule], index, None).expect("bench rule");
        } else {
            tree.add_items(vec![message(source, destination, seed)], index, None).expect("bench message");
        }
    }
    tree.take_events();
    tree
}
