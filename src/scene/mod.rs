// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The visual scene mirroring a script's logical tree.
//!
//! A [`Scene`] owns one visual item per logical node plus the actor lanes. It is only ever
//! changed structurally by [`TreeEvent`](crate::model::TreeEvent)s (see `sync`), and every handled
//! event ends with a full [`Scene::update_view`] pass.

pub mod actors;
pub mod factory;
pub mod geometry;
pub mod item;
pub mod metrics;
pub mod snapshot;
mod sync;
mod view;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, HashMap};

use crate::config::SceneConfig;
use crate::model::ids::ItemIdTag;
use crate::model::{IdGen, ItemId, NodeId, ScriptModel};

pub use actors::{ActorItem, ActorRegistry};
pub use geometry::{Point, Rect, Size};
pub use item::{ActorKey, DropPosition, ItemKind, SceneItemRef, VisualItem};
pub use metrics::{MonospaceMetrics, TextMetrics};
pub use snapshot::{ActorSnapshot, ItemSnapshot, SceneSnapshot};
pub use sync::SyncError;

#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    metrics: Box<dyn TextMetrics>,
    items: BTreeMap<ItemId, VisualItem>,
    by_node: HashMap<NodeId, ItemId>,
    top_level: Vec<ItemId>,
    item_ids: IdGen<ItemIdTag>,
    actors: ActorRegistry,
    extent: Rect,
    view_rev: u64,
}

impl Scene {
    /// Builds the scene for everything already in `model` and lays it out once.
    pub fn new<M: ScriptModel + ?Sized>(
        model: &M,
        config: SceneConfig,
        metrics: Box<dyn TextMetrics>,
    ) -> Result<Self, SyncError> {
        let mut actors = ActorRegistry::new(model.broadcast());
        actors.sync(model.participants(), model.broadcast());

        let mut scene = Self {
            config,
            metrics,
            items: BTreeMap::new(),
            by_node: HashMap::new(),
            top_level: Vec::new(),
            item_ids: IdGen::default(),
            actors,
            extent: Rect::default(),
            view_rev: 0,
        };
        scene.on_items_added(model, model.children(None))?;
        Ok(scene)
    }

    /// Same as [`Scene::new`] with monospace text metrics taken from `config`.
    pub fn with_config<M: ScriptModel + ?Sized>(
        model: &M,
        config: SceneConfig,
    ) -> Result<Self, SyncError> {
        let metrics = MonospaceMetrics::new(config.char_width, config.line_height);
        Self::new(model, config, Box::new(metrics))
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn item(&self, item_id: ItemId) -> Option<&VisualItem> {
        self.items.get(&item_id)
    }

    pub fn items(&self) -> impl Iterator<Item = &VisualItem> {
        self.items.values()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn top_level(&self) -> &[ItemId] {
        &self.top_level
    }

    pub fn actors(&self) -> &ActorRegistry {
        &self.actors
    }

    /// Scroll region: bounding box of everything visible, widened to the left.
    pub fn extent(&self) -> Rect {
        self.extent
    }

    /// Bumped by every layout pass.
    pub fn view_rev(&self) -> u64 {
        self.view_rev
    }

    /// The item mirroring `node_id`, if any. Unlike `model_to_scene` a miss is not an error.
    pub fn item_for_node(&self, node_id: NodeId) -> Option<ItemId> {
        self.by_node.get(&node_id).copied()
    }

    /// Number of node -> item associations currently held.
    pub fn mapped_len(&self) -> usize {
        self.by_node.len()
    }

    /// Every item, parents before children, siblings in tree order.
    pub fn items_in_tree_order(&self) -> Vec<ItemId> {
        let mut out = Vec::with_capacity(self.items.len());
        let mut stack = self.top_level.iter().rev().copied().collect::<Vec<_>>();
        while let Some(item_id) = stack.pop() {
            let Some(item) = self.items.get(&item_id) else {
                continue;
            };
            out.push(item_id);
            stack.extend(item.children().iter().rev().copied());
        }
        out
    }

    /// Returns whether the selection changed.
    pub fn set_selected(&mut self, item_id: ItemId, selected: bool) -> bool {
        self.items.get_mut(&item_id).is_some_and(|item| item.set_selected(selected))
    }

    pub fn clear_selection(&mut self) {
        for item in self.items.values_mut() {
            item.set_selected(false);
        }
    }

    /// Selects `item_id` and every descendant that can be selected.
    pub fn select_all(&mut self, item_id: ItemId) {
        let mut stack = vec![item_id];
        while let Some(current) = stack.pop() {
            let Some(item) = self.items.get_mut(&current) else {
                continue;
            };
            item.set_selected(true);
            stack.extend_from_slice(item.children());
        }
    }

    pub fn select_all_items(&mut self) {
        for item_id in self.top_level.clone() {
            self.select_all(item_id);
        }
    }

    pub fn selected_items(&self) -> Vec<ItemId> {
        self.filter_in_tree_order(VisualItem::is_selected)
    }

    pub fn all_messages(&self) -> Vec<ItemId> {
        self.filter_in_tree_order(|item| item.kind() == ItemKind::Message)
    }

    pub fn selectable_items(&self) -> Vec<ItemId> {
        self.filter_in_tree_order(VisualItem::is_selectable)
    }

    fn filter_in_tree_order(&self, keep: impl Fn(&VisualItem) -> bool) -> Vec<ItemId> {
        self.items_in_tree_order()
            .into_iter()
            .filter(|item_id| self.items.get(item_id).is_some_and(&keep))
            .collect()
    }

    /// Everything under `point`, topmost first: deeper items before their ancestors, later
    /// siblings before earlier ones, actor headers last.
    pub fn items_at(&self, point: Point) -> Vec<SceneItemRef> {
        let mut hits = Vec::new();
        let mut stack = self.top_level.iter().map(|item_id| (*item_id, 0usize)).collect::<Vec<_>>();
        let mut order = 0usize;
        while let Some((item_id, depth)) = stack.pop() {
            let Some(item) = self.items.get(&item_id) else {
                continue;
            };
            if item.rect().contains(point) {
                hits.push((depth, order, item_id));
            }
            order += 1;
            stack.extend(item.children().iter().map(|child| (*child, depth + 1)));
        }
        hits.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let mut out = hits.into_iter().map(|(_, _, item_id)| SceneItemRef::Content(item_id)).collect::<Vec<_>>();
        out.extend(
            self.actors
                .visible()
                .filter(|actor| actor.header_rect().contains(point))
                .map(|actor| SceneItemRef::Actor(actor.key())),
        );
        out
    }

    /// Marks where a drop onto `item_id` would land and clears every other indicator.
    pub(crate) fn set_drop_indicator(&mut self, item_id: Option<ItemId>, position: Option<DropPosition>) {
        for item in self.items.values_mut() {
            let indicator = if Some(item.item_id()) == item_id { position } else { None };
            item.set_drop_indicator(indicator);
        }
    }
}
