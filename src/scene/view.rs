// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The refresh pipeline run after every handled notification.

use std::collections::HashMap;

use crate::layout::{place_lanes, stack_items, LaneMessage, LaneParams};
use crate::model::{ItemId, NodeKind, ScriptModel};

use super::geometry::{Point, Rect, Size};
use super::item::{ActorKey, ItemKind};
use super::Scene;

impl Scene {
    /// Numbering, validity, measurement, lanes, stacking, extent. Running it twice without a
    /// mutation in between yields the same geometry.
    pub fn update_view<M: ScriptModel + ?Sized>(&mut self, model: &M) {
        self.update_numbering();
        self.update_valid_states(model);
        self.measure(model);
        self.arrange_participants();
        self.arrange_items();
        self.extent = self
            .items_bounding_rect()
            .adjusted(-self.config.extent_left_pad, 0.0, 0.0, 0.0);
        self.view_rev += 1;
    }

    fn update_numbering(&mut self) {
        let mut stack = self
            .top_level
            .iter()
            .enumerate()
            .map(|(pos, item_id)| (*item_id, (pos + 1).to_string()))
            .collect::<Vec<_>>();
        while let Some((item_id, index)) = stack.pop() {
            let Some(item) = self.items.get_mut(&item_id) else {
                continue;
            };
            let index = if item.kind() == ItemKind::Label { String::new() } else { index };
            for (pos, child) in item.children().iter().enumerate() {
                stack.push((*child, format!("{index}.{}", pos + 1)));
            }
            item.set_index(index);
        }
    }

    fn update_valid_states<M: ScriptModel + ?Sized>(&mut self, model: &M) {
        for item in self.items.values_mut() {
            item.set_valid(model.is_valid(item.node_id()));
        }
    }

    fn row_height(&self) -> f64 {
        self.metrics.line_height() + 2.0 * self.config.label_padding
    }

    /// Captions and label-row widths of every item, header sizes of every actor.
    fn measure<M: ScriptModel + ?Sized>(&mut self, model: &M) {
        let padding = 2.0 * self.config.label_padding;

        let captions = self
            .items
            .values()
            .map(|item| {
                let caption = match model.node(item.node_id()).map(|node| node.kind()) {
                    Some(NodeKind::RuleCondition(condition)) => {
                        let keyword = condition.condition_type().to_string().to_uppercase();
                        format!("{keyword} {}", condition.condition()).trim_end().to_owned()
                    }
                    Some(NodeKind::GotoAction(goto)) => {
                        let target = goto
                            .target()
                            .and_then(|target| self.by_node.get(&target))
                            .and_then(|target| self.items.get(target))
                            .map(|target| target.index().to_owned())
                            .filter(|index| !index.is_empty());
                        format!("GOTO: {}", target.as_deref().unwrap_or("?"))
                    }
                    Some(NodeKind::ProgramAction(program)) => {
                        format!("Start program [{}]", program.command())
                    }
                    Some(NodeKind::FieldLabel(label)) => label.name().to_owned(),
                    Some(NodeKind::Rule | NodeKind::Message(_)) | None => String::new(),
                };
                (item.item_id(), caption)
            })
            .collect::<Vec<_>>();

        for (item_id, caption) in captions {
            let width = match self.items.get(&item_id).map(|item| item.kind()) {
                Some(ItemKind::Rule | ItemKind::Message) | None => 0.0,
                Some(_) => self.metrics.text_width(&caption) + padding,
            };
            if let Some(item) = self.items.get_mut(&item_id) {
                item.set_text(caption);
                item.set_labels_width(width);
            }
        }

        let message_widths = self
            .items
            .values()
            .filter(|item| item.kind() == ItemKind::Message)
            .map(|item| (item.item_id(), self.label_row_width(item.children())))
            .collect::<Vec<_>>();
        for (item_id, row_width) in message_widths {
            if let Some(item) = self.items.get_mut(&item_id) {
                item.set_labels_width(row_width.max(self.config.min_message_width));
            }
        }

        let header_height = self.metrics.line_height() + 2.0 * self.config.actor_padding;
        let header_widths = self
            .actors
            .iter()
            .map(|actor| self.metrics.text_width(actor.name()) + 2.0 * self.config.actor_padding)
            .collect::<Vec<_>>();
        for (actor, width) in self.actors.iter_mut().zip(header_widths) {
            actor.set_header(Size::new(width, header_height));
        }
    }

    /// Width of a row of labels laid out side by side.
    fn label_row_width(&self, labels: &[ItemId]) -> f64 {
        let widths = labels
            .iter()
            .filter_map(|item_id| self.items.get(item_id))
            .map(|item| item.labels_width())
            .collect::<Vec<_>>();
        if widths.is_empty() {
            return 0.0;
        }
        widths.iter().sum::<f64>() + self.config.item_spacing * (widths.len() - 1) as f64
    }

    /// Widest label row among conditions and actions.
    pub fn min_items_width(&self) -> f64 {
        self.items
            .values()
            .filter(|item| item.kind().reserves_width())
            .map(|item| item.labels_width())
            .fold(0.0, f64::max)
    }

    /// Width rules and conditions span: the lane span when two or more lanes are visible.
    pub fn items_width(&self) -> f64 {
        let mut visible = self.actors.visible();
        match (visible.next(), visible.last()) {
            (Some(first), Some(last)) => last.x() - first.x(),
            _ => self.min_items_width(),
        }
    }

    fn arrange_participants(&mut self) {
        let messages = self
            .items
            .values()
            .filter_map(|item| item.endpoints().map(|(src, dst)| (src, dst, item.labels_width())))
            .collect::<Vec<_>>();

        let hidden_x = self.config.hidden_actor_x;
        for actor in self.actors.iter_mut() {
            let key = actor.key();
            let visible = messages.iter().any(|(src, dst, _)| *src == key || *dst == key);
            actor.set_visible(visible);
            if !visible {
                actor.set_x(hidden_x);
            }
        }

        let lanes = self.actors.visible().map(|actor| (actor.key(), actor.width())).collect::<Vec<_>>();
        if lanes.is_empty() {
            return;
        }
        let lane_of = lanes
            .iter()
            .enumerate()
            .map(|(lane, (key, _))| (*key, lane))
            .collect::<HashMap<ActorKey, usize>>();
        let widths = lanes.iter().map(|(_, width)| *width).collect::<Vec<_>>();
        let lane_messages = messages
            .iter()
            .filter_map(|(src, dst, width)| {
                Some(LaneMessage::new(*lane_of.get(src)?, *lane_of.get(dst)?, *width))
            })
            .collect::<Vec<_>>();

        let params = LaneParams { spacing: self.config.lane_spacing, gap: self.config.actor_gap };
        let layout = place_lanes(&widths, &lane_messages, self.min_items_width(), params);
        for ((key, _), x) in lanes.iter().zip(layout.xs()) {
            if let Some(actor) = self.actors.get_mut(*key) {
                actor.set_x(*x);
            }
        }
    }

    /// Height of an item including its children, rounded per stacked child.
    fn item_height(&self, item_id: ItemId) -> f64 {
        let Some(item) = self.items.get(&item_id) else {
            return 0.0;
        };
        let row = self.row_height();
        let spacing = self.config.item_spacing;
        let stacked = || item.children().iter().map(|child| self.item_height(*child).round()).sum::<f64>();
        match item.kind() {
            ItemKind::Label => row,
            ItemKind::Message => row + 2.0 * spacing,
            ItemKind::GotoAction | ItemKind::ProgramAction => row + spacing,
            ItemKind::RuleCondition => row + stacked() + spacing,
            ItemKind::Rule => stacked(),
        }
    }

    fn arrange_items(&mut self) {
        let heights = self.top_level.iter().map(|item_id| self.item_height(*item_id)).collect::<Vec<_>>();
        let stack = stack_items(&heights, self.config.top_margin);
        let width = self.items_width();
        let lanes = self.actors.iter().map(|actor| (actor.key(), actor.x())).collect::<HashMap<_, _>>();

        for (item_id, y) in self.top_level.clone().into_iter().zip(stack.ys().to_vec()) {
            self.position_item(item_id, Point::new(0.0, y), width, &lanes);
        }

        let baseline = stack.actor_baseline(self.config.actor_min_offset);
        for actor in self.actors.iter_mut() {
            actor.set_line_bottom(baseline);
        }
    }

    fn position_item(&mut self, item_id: ItemId, origin: Point, width: f64, lanes: &HashMap<ActorKey, f64>) {
        let Some(item) = self.items.get(&item_id) else {
            return;
        };
        let kind = item.kind();
        let labels_width = item.labels_width();
        let endpoints = item.endpoints();
        let children = item.children().to_vec();
        let height = self.item_height(item_id);
        let row = self.row_height();
        let spacing = self.config.item_spacing;

        let (pos, size) = match kind {
            ItemKind::Rule => {
                let mut y = origin.y;
                for child in &children {
                    let child_height = self.item_height(*child).round();
                    self.position_item(*child, Point::new(origin.x, y), width, lanes);
                    y += child_height;
                }
                (origin, Size::new(width.max(labels_width), height))
            }
            ItemKind::RuleCondition => {
                let mut y = origin.y + row;
                let inner_x = origin.x + self.config.condition_indent;
                for child in &children {
                    let child_height = self.item_height(*child).round();
                    self.position_item(*child, Point::new(inner_x, y), width, lanes);
                    y += child_height;
                }
                (origin, Size::new(width.max(labels_width), height))
            }
            ItemKind::Message => {
                let lane_x = |key: ActorKey| lanes.get(&key).copied().unwrap_or(self.config.hidden_actor_x);
                let (src, dst) = endpoints.unwrap_or((ActorKey::Unassigned, ActorKey::Unassigned));
                let (src_x, dst_x) = (lane_x(src), lane_x(dst));
                let center = (src_x + dst_x) / 2.0;
                let message_width = (dst_x - src_x).abs().max(labels_width);

                let mut x = center - self.label_row_width(&children) / 2.0;
                for child in &children {
                    let child_width = self.items.get(child).map_or(0.0, |label| label.labels_width());
                    self.position_item(*child, Point::new(x, origin.y + spacing), child_width, lanes);
                    x += child_width + spacing;
                }
                (Point::new(center - message_width / 2.0, origin.y), Size::new(message_width, height))
            }
            ItemKind::GotoAction | ItemKind::ProgramAction => (origin, Size::new(labels_width, height)),
            ItemKind::Label => (origin, Size::new(width, height)),
        };

        if let Some(item) = self.items.get_mut(&item_id) {
            item.set_geometry(pos, size);
        }
    }

    fn items_bounding_rect(&self) -> Rect {
        let content = self.items.values().map(|item| item.rect());
        let actors = self.actors.visible().map(|actor| actor.bounding_rect());
        content.chain(actors).fold(Rect::default(), |acc, rect| acc.union(&rect))
    }
}
