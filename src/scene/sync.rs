// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tree -> scene synchronization.
//!
//! The identity map (`by_node`) is the only way from a logical node to its visual item. Every
//! handler keeps it a bijection over the live tree and finishes with a layout pass.

use std::collections::HashSet;
use std::fmt;

use crate::model::{ItemId, NodeId, ScriptModel, TreeEvent};

use super::factory::create_item;
use super::item::VisualItem;
use super::Scene;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A live node has no visual item: an earlier add notification was missed.
    UnmappedNode { node_id: NodeId },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedNode { node_id } => {
                write!(f, "no visual item for node {node_id}; scene is out of sync with the tree")
            }
        }
    }
}

impl std::error::Error for SyncError {}

impl Scene {
    pub fn handle_event<M: ScriptModel + ?Sized>(
        &mut self,
        model: &M,
        event: &TreeEvent,
    ) -> Result<(), SyncError> {
        log::debug!("scene: handling {event:?}");
        match event {
            TreeEvent::ParticipantsChanged => {
                self.update_participants(model);
                Ok(())
            }
            TreeEvent::ItemsAdded(nodes) => self.on_items_added(model, nodes),
            TreeEvent::ItemsUpdated(nodes) => self.on_items_updated(model, nodes),
            TreeEvent::ItemsMoved(nodes) => self.on_items_moved(model, nodes),
            TreeEvent::ItemsDeleted(nodes) => {
                self.on_items_deleted(model, nodes);
                Ok(())
            }
        }
    }

    /// Creates items for `nodes` and all their descendants, depth first in caller order.
    pub fn on_items_added<M: ScriptModel + ?Sized>(
        &mut self,
        model: &M,
        nodes: &[NodeId],
    ) -> Result<(), SyncError> {
        for node_id in nodes {
            self.on_item_added(model, *node_id)?;
        }
        self.update_view(model);
        Ok(())
    }

    fn on_item_added<M: ScriptModel + ?Sized>(
        &mut self,
        model: &M,
        node_id: NodeId,
    ) -> Result<(), SyncError> {
        let Some(node) = model.node(node_id) else {
            log::debug!("scene: added node {node_id} is gone already");
            return Ok(());
        };

        let item_id = match self.by_node.get(&node_id) {
            Some(existing) => {
                log::warn!("scene: node {node_id} added twice, reattaching {existing}");
                *existing
            }
            None => {
                let item_id = self.item_ids.next_id();
                self.items.insert(item_id, create_item(item_id, node_id, node));
                item_id
            }
        };
        self.insert_item(model, item_id)?;

        for child in model.children(Some(node_id)) {
            self.on_item_added(model, *child)?;
        }
        Ok(())
    }

    pub fn on_items_updated<M: ScriptModel + ?Sized>(
        &mut self,
        model: &M,
        nodes: &[NodeId],
    ) -> Result<(), SyncError> {
        for node_id in nodes {
            let Some(node) = model.node(*node_id) else {
                continue;
            };
            let item_id = self.require_item(*node_id)?;
            if let Some(item) = self.items.get_mut(&item_id) {
                item.refresh(node);
            }
        }
        self.update_view(model);
        Ok(())
    }

    /// Reattaches the items of moved nodes under their new visual parent. Items keep their id
    /// and any UI state such as selection.
    pub fn on_items_moved<M: ScriptModel + ?Sized>(
        &mut self,
        model: &M,
        nodes: &[NodeId],
    ) -> Result<(), SyncError> {
        for node_id in nodes {
            if !model.contains(*node_id) {
                continue;
            }
            let item_id = self.require_item(*node_id)?;
            self.insert_item(model, item_id)?;
        }
        self.update_view(model);
        Ok(())
    }

    pub fn on_items_deleted<M: ScriptModel + ?Sized>(&mut self, model: &M, nodes: &[NodeId]) {
        for node_id in nodes {
            if let Some(item_id) = self.by_node.get(node_id).copied() {
                self.remove_item(item_id);
            }
        }
        self.purge_stale(model);
        self.update_view(model);
    }

    pub fn update_participants<M: ScriptModel + ?Sized>(&mut self, model: &M) {
        self.actors.sync(model.participants(), model.broadcast());
        self.update_view(model);
    }

    /// Resolves a logical node to its item. `None` (the implicit root) maps to `None`; a live node
    /// without item is a consistency violation.
    pub fn model_to_scene(&self, node: Option<NodeId>) -> Result<Option<ItemId>, SyncError> {
        match node {
            None => Ok(None),
            Some(node_id) => self.require_item(node_id).map(Some),
        }
    }

    fn require_item(&self, node_id: NodeId) -> Result<ItemId, SyncError> {
        match self.by_node.get(&node_id) {
            Some(item_id) => Ok(*item_id),
            None => {
                log::error!("scene: node {node_id} has no visual item");
                Err(SyncError::UnmappedNode { node_id })
            }
        }
    }

    /// Registers `item_id` and (re)attaches it under the item of its node's current parent.
    fn insert_item<M: ScriptModel + ?Sized>(
        &mut self,
        model: &M,
        item_id: ItemId,
    ) -> Result<(), SyncError> {
        let Some(node_id) = self.items.get(&item_id).map(VisualItem::node_id) else {
            return Ok(());
        };
        let parent_item = self.model_to_scene(model.parent(node_id))?;

        self.detach(item_id);
        self.by_node.insert(node_id, item_id);
        if let Some(item) = self.items.get_mut(&item_id) {
            item.set_parent(parent_item);
            item.update_flags();
            if let Some(node) = model.node(node_id) {
                item.refresh(node);
            }
        }
        self.reorder_children(model, parent_item);
        Ok(())
    }

    fn detach(&mut self, item_id: ItemId) {
        let parent = self.items.get(&item_id).and_then(VisualItem::parent);
        if let Some(siblings) = self.children_mut(parent) {
            siblings.retain(|sibling| *sibling != item_id);
        }
    }

    fn children_mut(&mut self, parent: Option<ItemId>) -> Option<&mut Vec<ItemId>> {
        match parent {
            None => Some(&mut self.top_level),
            Some(parent_id) => self.items.get_mut(&parent_id).map(VisualItem::children_mut),
        }
    }

    /// Rebuilds the child list of `parent_item` in logical order from the items attached to it.
    fn reorder_children<M: ScriptModel + ?Sized>(&mut self, model: &M, parent_item: Option<ItemId>) {
        let parent_node = match parent_item {
            None => None,
            Some(parent_id) => match self.items.get(&parent_id) {
                Some(parent) => Some(parent.node_id()),
                None => return,
            },
        };
        let ordered = model
            .children(parent_node)
            .iter()
            .filter_map(|node_id| self.by_node.get(node_id).copied())
            .filter(|item_id| self.items.get(item_id).is_some_and(|item| item.parent() == parent_item))
            .collect::<Vec<_>>();
        if let Some(children) = self.children_mut(parent_item) {
            *children = ordered;
        }
    }

    /// Drops an item and its whole visual subtree, identity entries included.
    fn remove_item(&mut self, item_id: ItemId) {
        self.detach(item_id);
        let mut stack = vec![item_id];
        while let Some(current) = stack.pop() {
            let Some(item) = self.items.remove(&current) else {
                continue;
            };
            if self.by_node.get(&item.node_id()) == Some(&current) {
                self.by_node.remove(&item.node_id());
            }
            stack.extend_from_slice(item.children());
        }
    }

    /// Removes every identity entry (and its item) whose node is no longer reachable.
    fn purge_stale<M: ScriptModel + ?Sized>(&mut self, model: &M) {
        let live = model.all_items().into_iter().collect::<HashSet<_>>();
        let stale = self
            .by_node
            .iter()
            .filter(|(node_id, _)| !live.contains(node_id))
            .map(|(_, item_id)| *item_id)
            .collect::<Vec<_>>();
        for item_id in stale {
            log::debug!("scene: purging stale item {item_id}");
            self.remove_item(item_id);
        }
    }
}
