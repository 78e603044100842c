// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns a buffer of root indices into a picture.  Slot value 0 (no
//! root) is black; the roots get hues spread evenly around the colour
//! wheel.

use image::{Rgb, RgbImage};

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

// Fully saturated, full brightness colour of the given hue in degrees.
fn hue(degrees: f64) -> Rgb<u8> {
    let h = (degrees % 360.0) / 60.0;
    let x = 1.0 - ((h % 2.0) - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let byte = |v: f64| (v * 255.0).round() as u8;
    Rgb([byte(r), byte(g), byte(b)])
}

/// One colour per slot value: black for 0, then a distinct hue for
/// each of the `num_colors - 1` roots.
pub fn palette(num_colors: usize) -> Vec<Rgb<u8>> {
    let roots = num_colors.saturating_sub(1);
    let mut colors = vec![BLACK];
    colors.extend((0..roots).map(|i| hue(360.0 * i as f64 / roots as f64)));
    colors
}

/// Paints a `width` by `height` buffer as produced by a render.
pub fn paint(buffer: &[u16], width: usize, height: usize, num_colors: usize) -> RgbImage {
    assert_eq!(buffer.len(), width * height);
    let palette = palette(num_colors);
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let value = buffer[y as usize * width + x as usize] as usize;
        palette.get(value).copied().unwrap_or(BLACK)
    })
}
