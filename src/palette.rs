//! Stroke Palette
//!
//! One colour per input line, cycling through a fixed list.

use serde::{Deserialize, Serialize};

use crate::geometry::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Unit-range RGBA with opaque alpha, each channel rounded to 2 decimals.
    pub fn to_unit_rgba(self) -> [f64; 4] {
        let [r, g, b] = self.0;
        [
            round2(f64::from(r) / 255.0),
            round2(f64::from(g) / 255.0),
            round2(f64::from(b) / 255.0),
            1.0,
        ]
    }
}

pub const PALETTE: [Rgb; 29] = [
    Rgb::new(0x43, 0xab, 0xc9),
    Rgb::new(0xda, 0x62, 0x1e),
    Rgb::new(0xd3, 0xb5, 0x3d),
    Rgb::new(0x0d, 0x3d, 0x56),
    Rgb::new(0xad, 0x2a, 0x1a),
    Rgb::new(0xa3, 0xb8, 0x6c),
    Rgb::new(0xc2, 0x57, 0x1a),
    Rgb::new(0x3c, 0x64, 0x78),
    Rgb::new(0xbc, 0xa1, 0x36),
    Rgb::new(0x9a, 0x26, 0x17),
    Rgb::new(0xb5, 0xc6, 0x89),
    Rgb::new(0x14, 0x96, 0xbb),
    Rgb::new(0xf6, 0x4b, 0x44),
    Rgb::new(0xfa, 0xc9, 0x00),
    Rgb::new(0xef, 0x7c, 0x85),
    Rgb::new(0xef, 0xed, 0xd2),
    Rgb::new(0xbc, 0xad, 0xcc),
    Rgb::new(0x00, 0xc1, 0x9f),
    Rgb::new(0x32, 0x92, 0xbc),
    Rgb::new(0xbc, 0xcc, 0xd7),
    Rgb::new(0xfa, 0xb8, 0xc0),
    Rgb::new(0x77, 0x5a, 0xa6),
    Rgb::new(0xfc, 0xed, 0x5a),
    Rgb::new(0x8e, 0xce, 0xc1),
    Rgb::new(0xf6, 0x4b, 0x44),
    Rgb::new(0x32, 0x92, 0xbc),
    Rgb::new(0xef, 0x7c, 0x85),
    Rgb::new(0x8e, 0xce, 0xc1),
    Rgb::new(0xbc, 0xcc, 0xd7),
];

/// Running palette position; advances once per contributing line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaletteCursor {
    index: usize,
}

impl PaletteCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Rgb {
        PALETTE[self.index]
    }

    pub fn advance(&mut self) {
        self.index = (self.index + 1) % PALETTE.len();
    }
}
