// quill/content/src/gradient.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Gradient descriptions, as handed over by the resource manager.

use quill_color::ColorU;

/// A single gradient stop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient, in `[0, 1]`.
    pub offset: f32,
    pub color: ColorU,
}

/// A gradient as a sorted list of stops.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Gradient {
    stops: Vec<ColorStop>,
}

impl Gradient {
    #[inline]
    pub fn new() -> Gradient {
        Gradient::default()
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Inserts a stop, keeping the list sorted by offset.
    pub fn add_color_stop(&mut self, offset: f32, color: ColorU) {
        let offset = offset.max(0.0).min(1.0);
        let index = self
            .stops
            .iter()
            .position(|stop| stop.offset > offset)
            .unwrap_or(self.stops.len());
        self.stops.insert(index, ColorStop { offset, color });
    }

    pub fn is_opaque(&self) -> bool {
        self.stops.iter().all(|stop| stop.color.is_opaque())
    }

    /// Samples the gradient at `t`, clamping outside the stop range.
    pub fn sample(&self, t: f32) -> ColorU {
        if self.stops.is_empty() {
            return ColorU::transparent_black();
        }

        let upper = match self.stops.iter().position(|stop| stop.offset >= t) {
            None => return self.stops.last().unwrap().color,
            Some(0) => return self.stops[0].color,
            Some(upper) => upper,
        };
        let (lo, hi) = (self.stops[upper - 1], self.stops[upper]);
        let span = hi.offset - lo.offset;
        if span <= 0.0 {
            return hi.color;
        }
        let fraction = (t - lo.offset) / span;
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * fraction).round() as u8;
        ColorU::new(lerp(lo.color.r, hi.color.r),
                    lerp(lo.color.g, hi.color.g),
                    lerp(lo.color.b, hi.color.b),
                    lerp(lo.color.a, hi.color.a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample() {
        let mut gradient = Gradient::new();
        gradient.add_color_stop(1.0, ColorU::white());
        gradient.add_color_stop(0.0, ColorU::black());
        assert_eq!(gradient.stops()[0].color, ColorU::black());
        assert_eq!(gradient.sample(0.0), ColorU::black());
        assert_eq!(gradient.sample(1.0), ColorU::white());
        let mid = gradient.sample(0.5);
        assert!(mid.r > 100 && mid.r < 155);
    }
}
