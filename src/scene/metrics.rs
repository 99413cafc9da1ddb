// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use unicode_width::UnicodeWidthStr;

/// Text measurement supplied by whatever toolkit renders the scene.
pub trait TextMetrics: fmt::Debug {
    fn text_width(&self, text: &str) -> f64;

    fn line_height(&self) -> f64;
}

/// Fixed-pitch metrics: every display column is `char_width` wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    char_width: f64,
    line_height: f64,
}

impl MonospaceMetrics {
    pub fn new(char_width: f64, line_height: f64) -> Self {
        Self { char_width, line_height }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn text_width(&self, text: &str) -> f64 {
        text.width() as f64 * self.char_width
    }

    fn line_height(&self) -> f64 {
        self.line_height
    }
}
