// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Drag-and-drop of recorded protocols into the script.
//!
//! Payload format: `/`-terminated `row,column,parent_row` tokens addressing nodes of the
//! [`ProtocolTree`], `parent_row = -1` meaning a top-level group.

use std::collections::HashSet;

use smallvec::SmallVec;

use crate::model::{ProtocolNodeRef, ProtocolTree};
use crate::scene::{Point, Scene, SceneItemRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragIndex {
    pub row: usize,
    pub column: usize,
    pub parent_row: i64,
}

fn parse_token(token: &str) -> Option<DragIndex> {
    let parts = token.split(',').map(str::trim).collect::<SmallVec<[&str; 3]>>();
    let [row, column, parent_row] = parts.as_slice() else {
        return None;
    };
    Some(DragIndex {
        row: row.parse().ok()?,
        column: column.parse().ok()?,
        parent_row: parent_row.parse().ok()?,
    })
}

/// Parses every well-formed token; malformed ones are skipped. Text after the last `/` is not a
/// terminated token and is ignored.
pub fn parse_drag_payload(payload: &str) -> Vec<DragIndex> {
    let mut tokens = payload.split('/').collect::<Vec<_>>();
    if let Some(rest) = tokens.pop() {
        if !rest.trim().is_empty() {
            log::warn!("drag payload: ignoring unterminated token {rest:?}");
        }
    }

    tokens
        .into_iter()
        .filter_map(|token| {
            let index = parse_token(token);
            if index.is_none() {
                log::warn!("drag payload: skipping malformed token {token:?}");
            }
            index
        })
        .collect()
}

/// Resolves dragged indexes to protocol files: groups expand to their files, and every file is
/// returned once, groups first.
pub fn resolve_drop_nodes(tree: &ProtocolTree, indexes: &[DragIndex]) -> Vec<ProtocolNodeRef> {
    let mut groups = Vec::new();
    let mut files = Vec::new();
    for index in indexes {
        match tree.resolve(index.row, index.parent_row) {
            Some(ProtocolNodeRef::Group { group }) => groups.push(group),
            Some(file @ ProtocolNodeRef::File { .. }) => files.push(file),
            None => log::warn!("drag payload: {index:?} does not address a protocol node"),
        }
    }

    let mut seen = HashSet::new();
    groups
        .into_iter()
        .flat_map(|group| {
            if let Some(protocol_group) = tree.groups().get(group) {
                log::debug!("drag payload: expanding group {:?}", protocol_group.name());
            }
            tree.group_children(group)
        })
        .chain(files)
        .filter(|node| seen.insert(*node))
        .collect()
}

/// What the toolkit should do with a drag-move event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragVerdict {
    /// Let the items under the cursor handle it.
    Forward,
    /// Accept the event without a target so no default drop happens.
    Handled,
}

/// Items only see a drag when every one of them under the cursor accepts drops.
pub fn drag_verdict(scene: &Scene, hits: &[SceneItemRef]) -> DragVerdict {
    let all_accept = hits.iter().all(|hit| match hit {
        SceneItemRef::Content(item_id) => scene.item(*item_id).is_some_and(|item| item.accepts_drops()),
        SceneItemRef::Actor(_) => false,
    });
    if !hits.is_empty() && all_accept {
        DragVerdict::Forward
    } else {
        DragVerdict::Handled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Entered,
    Moving,
}

/// One drag gesture: `Idle -> Entered -> Moving* -> (drop | cancel) -> Idle`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragSession {
    phase: DragPhase,
    last_point: Option<Point>,
}

impl DragSession {
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    pub fn enter(&mut self) {
        if self.phase != DragPhase::Idle {
            log::debug!("drag: enter while {:?}, restarting gesture", self.phase);
        }
        self.phase = DragPhase::Entered;
        self.last_point = None;
    }

    pub fn move_to(&mut self, point: Point) {
        if self.phase == DragPhase::Idle {
            log::debug!("drag: move without enter");
        }
        self.phase = DragPhase::Moving;
        self.last_point = Some(point);
    }

    pub fn drop_at(&mut self, point: Point) {
        log::debug!("drag: dropped at ({}, {})", point.x, point.y);
        self.reset();
    }

    pub fn cancel(&mut self) {
        log::debug!("drag: cancelled");
        self.reset();
    }

    fn reset(&mut self) {
        self.phase = DragPhase::Idle;
        self.last_point = None;
    }
}
