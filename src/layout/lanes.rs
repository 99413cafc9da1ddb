// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// A message between two visible lanes, by index into the visible-actor slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneMessage {
    source: usize,
    destination: usize,
    width: f64,
}

impl LaneMessage {
    pub fn new(source: usize, destination: usize, width: f64) -> Self {
        Self { source, destination, width }
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn destination(&self) -> usize {
        self.destination
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// The endpoint opposite `lane` when that endpoint lies strictly left of it.
    fn left_partner_of(&self, lane: usize) -> Option<usize> {
        if self.source == lane && self.destination < lane {
            Some(self.destination)
        } else if self.destination == lane && self.source < lane {
            Some(self.source)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneParams {
    /// Room added to a message width when it pushes its right endpoint.
    pub spacing: f64,
    /// Gap between neighbouring header boxes.
    pub gap: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LaneLayout {
    xs: Vec<f64>,
}

impl LaneLayout {
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Distance between the first and the last lane (0 for fewer than two lanes).
    pub fn span(&self) -> f64 {
        match (self.xs.first(), self.xs.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

/// Left-to-right greedy lane placement.
///
/// Lanes keep their given order. Lane `i` sits at the largest of
/// - the header clearance: `x[i-1] + (w[i-1] + w[i]) / 2 + gap`,
/// - `x[other] + width + spacing` for every message between `i` and an already placed lane,
/// - `min_last_width`, for the last lane only.
///
/// The first lane sits at 0 and nothing is ever revisited.
pub fn place_lanes(
    widths: &[f64],
    messages: &[LaneMessage],
    min_last_width: f64,
    params: LaneParams,
) -> LaneLayout {
    let mut xs = Vec::with_capacity(widths.len());
    if widths.is_empty() {
        return LaneLayout { xs };
    }
    xs.push(0.0);

    for lane in 1..widths.len() {
        let mut x_max = xs[lane - 1] + (widths[lane - 1] + widths[lane]) / 2.0 + params.gap;

        for message in messages {
            let Some(other) = message.left_partner_of(lane) else {
                continue;
            };
            let candidate = xs[other] + message.width + params.spacing;
            if candidate > x_max {
                x_max = candidate;
            }
        }

        if lane == widths.len() - 1 && min_last_width > x_max {
            x_max = min_last_width;
        }

        xs.push(x_max);
    }

    LaneLayout { xs }
}
