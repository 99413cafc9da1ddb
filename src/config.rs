// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scene geometry constants.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// y of the first top-level item.
    pub top_margin: f64,
    /// Lowest y the actor lifelines may end at, even for an empty script.
    pub actor_min_offset: f64,
    /// Extra room added to a message width when it pushes a lane to the right.
    pub lane_spacing: f64,
    /// Gap between the header boxes of neighbouring lanes.
    pub actor_gap: f64,
    /// x of actors no message refers to.
    pub hidden_actor_x: f64,
    /// Left padding of the scroll region.
    pub extent_left_pad: f64,
    pub char_width: f64,
    pub line_height: f64,
    pub label_padding: f64,
    pub min_message_width: f64,
    pub condition_indent: f64,
    pub item_spacing: f64,
    pub actor_padding: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            top_margin: 30.0,
            actor_min_offset: 50.0,
            lane_spacing: 30.0,
            actor_gap: 10.0,
            hidden_actor_x: 30.0,
            extent_left_pad: 10.0,
            char_width: 7.0,
            line_height: 18.0,
            label_padding: 4.0,
            min_message_width: 40.0,
            condition_indent: 10.0,
            item_spacing: 6.0,
            actor_padding: 8.0,
        }
    }
}

impl SceneConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_owned(), source })?;
        serde_json::from_str(&raw)
            .map_err(|source| ConfigError::Json { path: path.to_owned(), source })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}
