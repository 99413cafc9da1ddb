// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{ItemId, Node, NodeId};

use super::item::{ItemKind, VisualItem};

/// Builds the visual item for `node`, wired to it by `node_id`. The item starts detached.
pub fn create_item(item_id: ItemId, node_id: NodeId, node: &Node) -> VisualItem {
    let mut item = VisualItem::new(item_id, node_id, ItemKind::from_tag(node.kind().tag()));
    item.update_flags();
    item.refresh(node);
    item
}
