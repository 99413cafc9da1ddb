// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Actor items: one lane per participant plus the synthetic "unassigned" and "broadcast" lanes.

use smol_str::SmolStr;

use crate::model::{Participant, ParticipantId};

use super::geometry::{Rect, Size};
use super::item::ActorKey;

const UNASSIGNED_NAME: &str = "?";

#[derive(Debug, Clone, PartialEq)]
pub struct ActorItem {
    key: ActorKey,
    name: SmolStr,
    synthetic: bool,
    visible: bool,
    x: f64,
    line_bottom: f64,
    header: Size,
}

impl ActorItem {
    fn new(key: ActorKey, name: impl Into<SmolStr>, synthetic: bool) -> Self {
        Self {
            key,
            name: name.into(),
            synthetic,
            visible: false,
            x: 0.0,
            line_bottom: 0.0,
            header: Size::default(),
        }
    }

    pub fn key(&self) -> ActorKey {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Lane center.
    pub fn x(&self) -> f64 {
        self.x
    }

    pub(crate) fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    /// Where the lifeline ends.
    pub fn line_bottom(&self) -> f64 {
        self.line_bottom
    }

    pub(crate) fn set_line_bottom(&mut self, line_bottom: f64) {
        self.line_bottom = line_bottom;
    }

    pub fn width(&self) -> f64 {
        self.header.width
    }

    pub(crate) fn set_header(&mut self, header: Size) {
        self.header = header;
    }

    /// The name box at the top of the lane; the only part that takes part in hit-testing.
    pub fn header_rect(&self) -> Rect {
        Rect::new(self.x - self.header.width / 2.0, 0.0, self.header.width, self.header.height)
    }

    /// Header plus lifeline.
    pub fn bounding_rect(&self) -> Rect {
        let header = self.header_rect();
        Rect::new(header.x, header.y, header.width, self.line_bottom.max(header.height))
    }
}

/// Ordered actor items: real participants in insertion order, then unassigned, then broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorRegistry {
    actors: Vec<ActorItem>,
}

impl ActorRegistry {
    pub fn new(broadcast: &Participant) -> Self {
        let actors = vec![
            ActorItem::new(ActorKey::Unassigned, UNASSIGNED_NAME, true),
            ActorItem::new(
                ActorKey::Participant(broadcast.participant_id()),
                broadcast.display_name(),
                true,
            ),
        ];
        Self { actors }
    }

    /// Inserts a new lane just before the two synthetic ones.
    fn insert(&mut self, participant: &Participant) {
        let index = self.actors.len().saturating_sub(2);
        self.actors.insert(
            index,
            ActorItem::new(
                ActorKey::Participant(participant.participant_id()),
                participant.display_name(),
                false,
            ),
        );
    }

    /// Tracks the external participant list: drops lanes of removed participants, refreshes names,
    /// appends new participants. Existing lanes keep their relative order.
    pub fn sync(&mut self, participants: &[Participant], broadcast: &Participant) {
        self.actors.retain(|actor| {
            actor.synthetic
                || participants
                    .iter()
                    .any(|p| ActorKey::Participant(p.participant_id()) == actor.key)
        });

        for participant in participants {
            let key = ActorKey::Participant(participant.participant_id());
            if let Some(actor) = self.get_mut(key) {
                actor.name = participant.display_name().into();
                continue;
            }
            self.insert(participant);
        }

        if let Some(actor) = self.get_mut(ActorKey::Participant(broadcast.participant_id())) {
            actor.name = broadcast.display_name().into();
        }
    }

    pub fn get(&self, key: ActorKey) -> Option<&ActorItem> {
        self.actors.iter().find(|actor| actor.key == key)
    }

    pub fn get_mut(&mut self, key: ActorKey) -> Option<&mut ActorItem> {
        self.actors.iter_mut().find(|actor| actor.key == key)
    }

    pub fn participant(&self, participant_id: ParticipantId) -> Option<&ActorItem> {
        self.get(ActorKey::Participant(participant_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActorItem> {
        self.actors.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ActorItem> {
        self.actors.iter_mut()
    }

    pub fn visible(&self) -> impl Iterator<Item = &ActorItem> {
        self.actors.iter().filter(|actor| actor.visible)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
