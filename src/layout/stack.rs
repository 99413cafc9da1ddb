// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StackLayout {
    ys: Vec<f64>,
    bottom: f64,
}

impl StackLayout {
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Running offset after the last item.
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Where actor lifelines end: below the content, but never above `floor`.
    pub fn actor_baseline(&self, floor: f64) -> f64 {
        self.bottom.max(floor)
    }
}

/// Stacks items top to bottom starting at `top_margin`; each height is rounded to whole units.
pub fn stack_items(heights: &[f64], top_margin: f64) -> StackLayout {
    let mut ys = Vec::with_capacity(heights.len());
    let mut y = top_margin;
    for height in heights {
        ys.push(y);
        y += height.round();
    }
    StackLayout { ys, bottom: y }
}

#[cfg(test)]
mod tests {
    use super::stack_items;

    #[test]
    fn stacks_from_top_margin_with_rounded_heights() {
        let layout = stack_items(&[20.4, 35.6, 10.0], 30.0);
        assert_eq!(layout.ys(), &[30.0, 50.0, 86.0]);
        assert_eq!(layout.bottom(), 96.0);
        assert_eq!(layout.actor_baseline(50.0), 96.0);
    }

    #[test]
    fn empty_content_uses_actor_floor() {
        let layout = stack_items(&[], 30.0);
        assert!(layout.ys().is_empty());
        assert_eq!(layout.bottom(), 30.0);
        assert_eq!(layout.actor_baseline(50.0), 50.0);
    }
}
