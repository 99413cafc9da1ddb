// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Simscene: an editable diagram of a protocol simulation script.
//!
//! - [`model`]: the logical tree (rules, conditions, messages, actions, labels) and participants.
//! - [`scene`]: visual items mirroring the tree, kept in sync through tree notifications.
//! - [`layout`]: pure lane placement and vertical stacking.
//! - [`interaction`]: selection, insertion, logging and drag-and-drop on top of a scene.

pub mod config;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod scene;
