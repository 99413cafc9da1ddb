// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::marker::PhantomData;

use serde::{Serialize, Serializer};

/// A compact handle into one of the arenas (logical nodes, visual items, participants).
///
/// Handles are never reused within one arena, so a stale handle can only miss, never alias a
/// different object. The tag type keeps node handles and item handles from being mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub const fn new(value: u32) -> Self {
        Self { value, _marker: PhantomData }
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

impl<T: IdTag> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::PREFIX, self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.value)
    }
}

/// Display prefix per arena, so log lines read `n4` / `i4` / `p1` instead of bare numbers.
pub trait IdTag {
    const PREFIX: &'static str;
}

/// Monotonic allocator for one arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGen<T> {
    next: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for IdGen<T> {
    fn default() -> Self {
        Self { next: 0, _marker: PhantomData }
    }
}

impl<T> IdGen<T> {
    pub fn next_id(&mut self) -> Id<T> {
        let id = Id::new(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdTag {}
pub type NodeId = Id<NodeIdTag>;

impl IdTag for NodeIdTag {
    const PREFIX: &'static str = "n";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemIdTag {}
pub type ItemId = Id<ItemIdTag>;

impl IdTag for ItemIdTag {
    const PREFIX: &'static str = "i";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParticipantIdTag {}
pub type ParticipantId = Id<ParticipantIdTag>;

impl IdTag for ParticipantIdTag {
    const PREFIX: &'static str = "p";
}
