// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The protocol tree the user drags recorded protocols from.
//!
//! It is a two-level tree: top-level groups, each holding protocol files. Drag payloads address
//! nodes by `(row, parent_row)` where `parent_row = -1` selects a group itself.

use smol_str::SmolStr;

use super::ids::ParticipantId;
use super::node::MessageType;

/// A recorded message as it appears in an analyzed protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMessage {
    decoded_bits: Vec<bool>,
    pause: u64,
    message_type: MessageType,
    decoder: Option<SmolStr>,
    participant: Option<ParticipantId>,
}

impl RecordedMessage {
    pub fn new(decoded_bits: Vec<bool>, pause: u64, message_type: MessageType) -> Self {
        Self { decoded_bits, pause, message_type, decoder: None, participant: None }
    }

    pub fn with_participant(mut self, participant: Option<ParticipantId>) -> Self {
        self.participant = participant;
        self
    }

    pub fn with_decoder(mut self, decoder: impl Into<SmolStr>) -> Self {
        self.decoder = Some(decoder.into());
        self
    }

    pub fn decoded_bits(&self) -> &[bool] {
        &self.decoded_bits
    }

    pub fn pause(&self) -> u64 {
        self.pause
    }

    pub fn message_type(&self) -> &MessageType {
        &self.message_type
    }

    pub fn decoder(&self) -> Option<&str> {
        self.decoder.as_deref()
    }

    /// The participant the analysis attributed this message to, if any.
    pub fn participant(&self) -> Option<ParticipantId> {
        self.participant
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protocol {
    name: SmolStr,
    messages: Vec<RecordedMessage>,
}

impl Protocol {
    pub fn new(name: impl Into<SmolStr>, messages: Vec<RecordedMessage>) -> Self {
        Self { name: name.into(), messages }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn messages(&self) -> &[RecordedMessage] {
        &self.messages
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolGroup {
    name: SmolStr,
    files: Vec<Protocol>,
}

impl ProtocolGroup {
    pub fn new(name: impl Into<SmolStr>, files: Vec<Protocol>) -> Self {
        Self { name: name.into(), files }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[Protocol] {
        &self.files
    }
}

/// Position of a node inside a [`ProtocolTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProtocolNodeRef {
    Group { group: usize },
    File { group: usize, file: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProtocolTree {
    groups: Vec<ProtocolGroup>,
}

impl ProtocolTree {
    pub fn new(groups: Vec<ProtocolGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[ProtocolGroup] {
        &self.groups
    }

    /// Resolves a tree-view index. `parent_row = -1` addresses a top-level group.
    pub fn resolve(&self, row: usize, parent_row: i64) -> Option<ProtocolNodeRef> {
        if parent_row == -1 {
            return self.groups.get(row).map(|_| ProtocolNodeRef::Group { group: row });
        }
        let group = usize::try_from(parent_row).ok()?;
        let files = self.groups.get(group)?.files();
        files.get(row).map(|_| ProtocolNodeRef::File { group, file: row })
    }

    pub fn protocol(&self, node: ProtocolNodeRef) -> Option<&Protocol> {
        match node {
            ProtocolNodeRef::Group { .. } => None,
            ProtocolNodeRef::File { group, file } => self.groups.get(group)?.files().get(file),
        }
    }

    /// The file nodes of a group, in order.
    pub fn group_children(&self, group: usize) -> Vec<ProtocolNodeRef> {
        self.groups
            .get(group)
            .map(|g| (0..g.files().len()).map(|file| ProtocolNodeRef::File { group, file }).collect())
            .unwrap_or_default()
    }
}
