//! Record types delivered by the live feed
//!
//! Two message families exist: [`AisMessage`] from the `ais` endpoints,
//! tagged by an explicit `type` field, and [`CombinedMessage`] from the
//! `combined` endpoints, which is untagged and classified by shape.

mod combined;
mod position;

pub use combined::{
    classify, CombinedKind, CombinedMessage, Feature, FullGeojson, FullJson, FullProperties,
    PointGeometry, SimpleGeojson, SimpleJson, SimpleProperties, VoyageDetails,
};
pub use position::{AidToNavigation, AisMessage, AisMessageKind, Position, StaticData};

use serde::{Deserialize, Deserializer};

/// Reads an absent or `null` value as `T::default()`
///
/// Use together with `#[serde(default)]` so that a missing key is covered too.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
