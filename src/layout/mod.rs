// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout algorithms for the script scene.
//!
//! Two independent passes: vertical stacking of top-level items and left-to-right placement of
//! actor lanes. Both are pure; the scene feeds them measured sizes and applies the result.

pub mod lanes;
pub mod stack;

pub use lanes::{place_lanes, LaneLayout, LaneMessage, LaneParams};
pub use stack::{stack_items, StackLayout};
