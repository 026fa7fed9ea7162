//! span records, their attributes and the clock they share.
use lazy_static::lazy_static;
use serde::Serialize;
use std::time::Instant;

lazy_static! {
    /// process epoch; every span time is nanoseconds elapsed since it.
    static ref EPOCH: Instant = Instant::now();
}

pub(crate) fn now_nanos() -> u128 {
    EPOCH.elapsed().as_nanos()
}

/// one attribute value: a string, a number or a boolean.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(value.into())
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        AttrValue::Int(value.into())
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

/// one recorded unit of work, as handed to the store and to snapshots.
///
/// `parent` links the record into its trace's tree; a root span has none.
/// `end_ns` is zero until the span is closed; only closed records ever
/// reach the store.
#[derive(Debug, Clone, Serialize)]
pub struct SpanRecord {
    pub id: u64,
    pub parent: Option<u64>,
    pub name: String,
    pub start_ns: u128,
    pub end_ns: u128,
    pub attributes: Vec<(String, AttrValue)>,
}

impl SpanRecord {
    pub(crate) fn new(id: u64, parent: Option<u64>, name: String) -> Self {
        SpanRecord {
            id,
            parent,
            name,
            start_ns: now_nanos(),
            end_ns: 0,
            attributes: Vec::new(),
        }
    }

    /// last write for a key wins; the key keeps its original position
    /// so display order stays stable.
    pub(crate) fn set_attr(&mut self, key: String, value: AttrValue) {
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.attributes.push((key, value));
        }
    }

    pub fn duration_ns(&self) -> u128 {
        self.end_ns.saturating_sub(self.start_ns)
    }
}
