//! Tri-state answer slot for one wizard step.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The answer recorded for a step.
///
/// On the wire `Unset` is an absent key (pair it with
/// `#[serde(default, skip_serializing_if = "Field::is_unset")]`), `Skipped`
/// is `null`, and `Provided` is the value itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// The step has never been submitted.
    Unset,
    /// The step was submitted through "skip".
    Skipped,
    Provided(T),
}

// Manual impl: the derive would demand `T: Default`.
impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Unset
    }
}

impl<T> Field<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Field::Unset)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Field::Skipped)
    }

    pub fn provided(&self) -> Option<&T> {
        match self {
            Field::Provided(v) => Some(v),
            Field::Unset | Field::Skipped => None,
        }
    }

    /// `Some(v)` becomes `Provided(v)`, `None` becomes `Skipped`.
    pub fn from_answer(answer: Option<T>) -> Self {
        answer.map_or(Field::Skipped, Field::Provided)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Provided(v) => serializer.serialize_some(v),
            Field::Unset | Field::Skipped => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Field::from_answer)
    }
}
