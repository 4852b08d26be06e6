//! Visual encodings: which mark and channel a data identifier receives in one chart.
use crate::store::DataId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkKind {
    Point,
    Line,
    Area,
    Square,
    Bar,
    SpaceFilling,
}

impl MarkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkKind::Point => "point",
            MarkKind::Line => "line",
            MarkKind::Area => "area",
            MarkKind::Square => "square",
            MarkKind::Bar => "bar",
            MarkKind::SpaceFilling => "space-filling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelClass {
    /// Placement on a positional axis (scatter points).
    Position,
    /// Location of one scalar along a shared axis (stacked segments, reference lines).
    ScalarLocation,
    Length,
    Area,
    Color,
}

impl ChannelClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelClass::Position => "position",
            ChannelClass::ScalarLocation => "scalar-location",
            ChannelClass::Length => "length",
            ChannelClass::Area => "area",
            ChannelClass::Color => "color",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// The encoding of one data identifier inside one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encoding {
    pub mark: MarkKind,
    pub channel: ChannelClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<bool>,
    /// Position this element relative to the mark of another identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tied_offset_of: Option<DataId>,
}

impl Encoding {
    pub fn new(mark: MarkKind, channel: ChannelClass) -> Self {
        Self { mark, channel, axis: None, skip: None, tied_offset_of: None }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Field-wise union: every `Some` field of `patch` overrides.
    pub fn apply(&mut self, patch: &EncodingPatch) {
        if let Some(mark) = patch.mark { self.mark = mark; }
        if let Some(channel) = patch.channel { self.channel = channel; }
        if let Some(axis) = patch.axis { self.axis = Some(axis); }
        if let Some(skip) = patch.skip { self.skip = Some(skip); }
        if let Some(tied) = &patch.tied_offset_of { self.tied_offset_of = Some(tied.clone()); }
    }
}

/// A partial write to an [`Encoding`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingPatch {
    pub mark: Option<MarkKind>,
    pub channel: Option<ChannelClass>,
    pub axis: Option<Axis>,
    pub skip: Option<bool>,
    pub tied_offset_of: Option<DataId>,
}

impl EncodingPatch {
    pub fn tied_to(anchor: DataId) -> Self {
        Self { tied_offset_of: Some(anchor), ..Default::default() }
    }

    pub fn axis(axis: Axis) -> Self {
        Self { axis: Some(axis), ..Default::default() }
    }

    /// Materialises the patch as a new encoding if it names both mark and channel.
    fn complete(&self) -> Option<Encoding> {
        let mut enc = Encoding::new(self.mark?, self.channel?);
        enc.apply(self);
        Some(enc)
    }
}

impl From<Encoding> for EncodingPatch {
    fn from(e: Encoding) -> Self {
        Self {
            mark: Some(e.mark),
            channel: Some(e.channel),
            axis: e.axis,
            skip: e.skip,
            tied_offset_of: e.tied_offset_of,
        }
    }
}

impl From<&Encoding> for EncodingPatch {
    fn from(e: &Encoding) -> Self { e.clone().into() }
}

/// Encodings of one chart, keyed by data identifier. Keys are unique; every
/// write is a field-wise union where the later write wins per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EncodingMap(BTreeMap<DataId, Encoding>);

impl EncodingMap {
    pub fn new() -> Self { Self::default() }

    /// Returns `false` when the key is absent and the patch is too partial to
    /// create an encoding on its own; the write is dropped in that case.
    pub fn apply(&mut self, key: &DataId, patch: &EncodingPatch) -> bool {
        if let Some(existing) = self.0.get_mut(key) {
            existing.apply(patch);
            return true;
        }
        match patch.complete() {
            Some(enc) => {
                self.0.insert(key.clone(), enc);
                true
            }
            None => {
                tracing::trace!(key = %key, ?patch, "dropping partial patch for unencoded identifier");
                false
            }
        }
    }

    pub fn merge(&mut self, key: &DataId, encoding: &Encoding) {
        self.apply(key, &EncodingPatch::from(encoding));
    }

    /// Writes every entry of `other` over this map.
    pub fn union(&mut self, other: &EncodingMap) {
        for (key, enc) in &other.0 {
            self.merge(key, enc);
        }
    }

    pub fn get(&self, key: &DataId) -> Option<&Encoding> { self.0.get(key) }
    pub fn contains(&self, key: &DataId) -> bool { self.0.contains_key(key) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn keys(&self) -> impl Iterator<Item = &DataId> { self.0.keys() }
    pub fn iter(&self) -> impl Iterator<Item = (&DataId, &Encoding)> { self.0.iter() }
}
