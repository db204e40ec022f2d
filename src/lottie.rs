//! Lottie wire schema (the subset emitted by the compiler)
//!
//! Field names follow the player format verbatim; everything here is plain data.

use serde::{Deserialize, Serialize};

pub const LAYER_SOLID: u8 = 1;
pub const LAYER_SHAPE: u8 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub v: String,
    pub fr: f64,
    pub ip: u32,
    pub op: u32,
    pub nm: String,
    pub ddd: u8,
    pub h: u32,
    pub w: u32,
    pub meta: Meta,
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub g: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub nm: String,
    pub ty: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddd: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ind: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sr: Option<f64>,
    pub ip: u32,
    pub op: u32,
    pub st: u32,
    pub ks: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ao: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bm: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shapes: Option<Vec<ShapeItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sh: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sw: Option<u32>,
}

impl Layer {
    pub fn shape(nm: impl Into<String>, ip: u32, op: u32, st: u32, shapes: Vec<ShapeItem>) -> Self {
        Self {
            nm: nm.into(),
            ty: LAYER_SHAPE,
            ddd: None,
            ind: None,
            sr: None,
            ip,
            op,
            st,
            ks: Transform::identity(),
            ao: None,
            bm: None,
            shapes: Some(shapes),
            sc: None,
            sh: None,
            sw: None,
        }
    }

    pub fn solid(nm: impl Into<String>, ip: u32, op: u32, color: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            nm: nm.into(),
            ty: LAYER_SOLID,
            ddd: None,
            ind: None,
            sr: None,
            ip,
            op,
            st: 0,
            ks: Transform::identity(),
            ao: None,
            bm: None,
            shapes: None,
            sc: Some(color.into()),
            sh: Some(height),
            sw: Some(width),
        }
    }
}

/// A property that is either a constant (`a: 0`) or keyframed (`a: 1`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property<T> {
    pub a: u8,
    pub k: PropertyValue<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ix: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue<T> {
    Keyframes(Vec<Keyframe>),
    Static(T),
}

impl<T> Property<T> {
    pub fn fixed(value: T) -> Self {
        Self {
            a: 0,
            k: PropertyValue::Static(value),
            ix: None,
        }
    }

    pub fn animated(keyframes: Vec<Keyframe>) -> Self {
        Self {
            a: 1,
            k: PropertyValue::Keyframes(keyframes),
            ix: None,
        }
    }

    pub fn with_index(mut self, ix: u8) -> Self {
        self.ix = Some(ix);
        self
    }

    pub fn keyframes(&self) -> Option<&[Keyframe]> {
        match &self.k {
            PropertyValue::Keyframes(k) => Some(k),
            PropertyValue::Static(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i: Option<Easing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o: Option<Easing>,
    pub t: u32,
    pub s: Vec<f64>,
}

impl Keyframe {
    pub fn hold(t: u32, value: f64) -> Self {
        Self { i: None, o: None, t, s: vec![value] }
    }

    pub fn eased(t: u32, value: f64, ease_in: Easing, ease_out: Easing) -> Self {
        Self {
            i: Some(ease_in),
            o: Some(ease_out),
            t,
            s: vec![value],
        }
    }
}

/// Bezier easing handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Easing {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Easing {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x: vec![x], y: vec![y] }
    }
}

/// Layer transform (`ks`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: Property<[f64; 2]>,
    pub p: Property<[f64; 2]>,
    pub s: Property<[f64; 2]>,
    pub r: Property<f64>,
    pub o: Property<f64>,
    pub sk: Property<f64>,
    pub sa: Property<f64>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            a: Property::fixed([0.0, 0.0]),
            p: Property::fixed([0.0, 0.0]),
            s: Property::fixed([100.0, 100.0]),
            r: Property::fixed(0.0),
            o: Property::fixed(100.0),
            sk: Property::fixed(0.0),
            sa: Property::fixed(0.0),
        }
    }
}

/// Cubic path data: in/out tangents relative to each vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bezier {
    pub i: Vec<[f64; 2]>,
    pub o: Vec<[f64; 2]>,
    pub v: Vec<[f64; 2]>,
    pub c: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "ty")]
pub enum ShapeItem {
    #[serde(rename = "el")]
    Ellipse {
        p: Property<[f64; 2]>,
        s: Property<[f64; 2]>,
        nm: String,
    },
    #[serde(rename = "sh")]
    Path {
        ks: Property<Bezier>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nm: Option<String>,
    },
    #[serde(rename = "st")]
    Stroke {
        c: Property<[f64; 4]>,
        o: Property<f64>,
        w: Property<f64>,
        lc: u8,
        lj: u8,
        ml: f64,
        bm: u8,
        nm: String,
    },
    #[serde(rename = "tm")]
    Trim {
        nm: String,
        ix: u8,
        hd: bool,
        s: Property<f64>,
        e: Property<f64>,
        o: Property<f64>,
        m: u8,
    },
    #[serde(rename = "tr")]
    Transform {
        #[serde(flatten)]
        transform: Transform,
    },
    #[serde(rename = "gr")]
    Group {
        it: Vec<ShapeItem>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nm: Option<String>,
    },
}
