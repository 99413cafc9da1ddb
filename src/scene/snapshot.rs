// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;

use crate::model::{ItemId, NodeId};

use super::geometry::Rect;
use super::item::{ActorKey, ItemKind};
use super::Scene;

/// A serializable frame of the scene, items in tree order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    pub view_rev: u64,
    pub extent: Rect,
    pub actors: Vec<ActorSnapshot>,
    pub items: Vec<ItemSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorSnapshot {
    pub key: ActorKey,
    pub name: String,
    pub visible: bool,
    pub x: f64,
    pub line_bottom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSnapshot {
    pub item_id: ItemId,
    pub node_id: NodeId,
    pub kind: ItemKind,
    pub depth: usize,
    pub index: String,
    pub text: String,
    pub rect: Rect,
    pub selected: bool,
    pub valid: bool,
    pub logging_active: bool,
}

impl Scene {
    pub fn snapshot(&self) -> SceneSnapshot {
        let actors = self
            .actors
            .iter()
            .map(|actor| ActorSnapshot {
                key: actor.key(),
                name: actor.name().to_owned(),
                visible: actor.is_visible(),
                x: actor.x(),
                line_bottom: actor.line_bottom(),
            })
            .collect();

        let mut items = Vec::with_capacity(self.items.len());
        let mut stack = self.top_level.iter().rev().map(|item_id| (*item_id, 0usize)).collect::<Vec<_>>();
        while let Some((item_id, depth)) = stack.pop() {
            let Some(item) = self.items.get(&item_id) else {
                continue;
            };
            items.push(ItemSnapshot {
                item_id,
                node_id: item.node_id(),
                kind: item.kind(),
                depth,
                index: item.index().to_owned(),
                text: item.text().to_owned(),
                rect: item.rect(),
                selected: item.is_selected(),
                valid: item.is_valid(),
                logging_active: item.logging_active(),
            });
            stack.extend(item.children().iter().rev().map(|child| (*child, depth + 1)));
        }

        SceneSnapshot { view_rev: self.view_rev, extent: self.extent, actors, items }
    }
}
