//! Persisted plugin state.
//!
//! The state is a small self-describing JSON document:
//!
//! ```json
//! {"tag":"Parameters","version":1,"params":[{"id":"CUTOFF","value":2000.0}, ...]}
//! ```
//!
//! Values are stored as `f64` so every `f32` survives the text round trip bit for bit.

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::params::ParameterId;
use crate::store::{defaults, ParameterStore};

/// Root tag of every document this plugin writes.
pub const STATE_TAG: &str = "Parameters";

/// Current document version.
pub const STATE_VERSION: u32 = 1;

/// A serialized snapshot of the parameter store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    /// Schema tag; must equal [`STATE_TAG`].
    pub tag: String,
    /// Document version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// One entry per parameter.
    #[serde(default)]
    pub params: Vec<ParamEntry>,
}

/// One parameter in a [`StateDocument`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamEntry {
    /// Parameter identifier, e.g. `"CUTOFF"`.
    pub id: String,
    /// Raw value.
    pub value: f64,
}

fn default_version() -> u32 {
    STATE_VERSION
}

impl StateDocument {
    /// Capture the store's current values.
    pub fn capture(store: &ParameterStore) -> StateDocument {
        StateDocument {
            tag: STATE_TAG.to_string(),
            version: STATE_VERSION,
            params: ParameterId::ALL
                .iter()
                .map(|&id| ParamEntry {
                    id: id.as_str().to_string(),
                    value: f64::from(store.get(id)),
                })
                .collect(),
        }
    }

    /// Parse a document and check its root tag.
    pub fn from_bytes(bytes: &[u8]) -> Result<StateDocument, StateError> {
        let document: StateDocument = serde_json::from_slice(bytes)?;
        if document.tag != STATE_TAG {
            return Err(StateError::SchemaMismatch {
                expected: STATE_TAG,
                found: document.tag,
            });
        }
        Ok(document)
    }

    /// Encode the document.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StateError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Resolve the full set of raw values this document describes.
    ///
    /// The document replaces the whole state: parameters it does not mention take their default.
    /// Unknown identifiers are skipped; later duplicates win.
    pub fn values(&self) -> Result<[f32; ParameterId::COUNT], StateError> {
        let mut values = defaults();
        for entry in &self.params {
            let id = match entry.id.parse::<ParameterId>() {
                Ok(id) => id,
                Err(e) => {
                    debug!("Skipping state entry: {}", e);
                    continue;
                }
            };
            let value = entry.value as f32;
            if !value.is_finite() {
                return Err(StateError::NonFinite { id: entry.id.clone() });
            }
            values[id.index()] = value;
        }
        Ok(values)
    }
}

/// Serialize the store into an opaque blob for the host.
pub fn save(store: &ParameterStore) -> Result<Vec<u8>, StateError> {
    StateDocument::capture(store).to_bytes()
}

/// Replace the store's contents with the state in `bytes`.
///
/// The blob is validated completely before anything is written, so a rejected blob leaves the
/// store exactly as it was. A successful restore is flagged on the store so the next `prepare`
/// keeps the restored mode.
pub fn restore(store: &ParameterStore, bytes: &[u8]) -> Result<(), StateError> {
    let values = StateDocument::from_bytes(bytes)?.values()?;
    store.replace(&values);
    store.mark_restored();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{restore, save, StateDocument, STATE_TAG};
    use crate::error::StateError;
    use crate::params::ParameterId;
    use crate::store::ParameterStore;

    #[test]
    fn round_trip_is_exact() {
        let store = ParameterStore::new();
        store.replace(&[1234.567, 0.123_456_7, 9.999, 5.0]);
        let blob = save(&store).unwrap();

        let other = ParameterStore::new();
        restore(&other, &blob).unwrap();
        assert_eq!(other.values(), store.values());
    }

    #[test]
    fn wrong_tag_is_rejected() {
        let store = ParameterStore::new();
        store.set(ParameterId::Drive, 5.0);
        let blob = br#"{"tag":"Other","params":[{"id":"DRIVE","value":2.0}]}"#;

        match restore(&store, blob) {
            Err(StateError::SchemaMismatch { expected, found }) => {
                assert_eq!(expected, STATE_TAG);
                assert_eq!(found, "Other");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(store.get(ParameterId::Drive), 5.0);
    }

    #[test]
    fn missing_entries_take_defaults_and_unknown_are_skipped() {
        let store = ParameterStore::new();
        store.replace(&[100.0, 0.5, 3.0, 6.0]);
        let blob = br#"{"tag":"Parameters","params":[{"id":"RESONANCE","value":0.25},{"id":"GAIN","value":7.0}]}"#;

        restore(&store, blob).unwrap();
        assert_eq!(store.values(), [2000.0, 0.25, 1.0, 1.0]);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let store = ParameterStore::new();
        let blob = br#"{"tag":"Parameters","params":[{"id":"CUTOFF","value":1e9}]}"#;
        restore(&store, blob).unwrap();
        assert_eq!(store.get(ParameterId::Cutoff), 20000.0);
    }

    #[test]
    fn overflowing_value_leaves_store_untouched() {
        let store = ParameterStore::new();
        store.set(ParameterId::Cutoff, 700.0);
        let blob = br#"{"tag":"Parameters","params":[{"id":"DRIVE","value":2.0},{"id":"CUTOFF","value":1e300}]}"#;

        assert!(matches!(restore(&store, blob), Err(StateError::NonFinite { .. })));
        assert_eq!(store.get(ParameterId::Cutoff), 700.0);
        assert_eq!(store.get(ParameterId::Drive), 1.0);
    }

    #[test]
    fn fractional_mode_choice_is_snapped() {
        let store = ParameterStore::new();
        let blob = br#"{"tag":"Parameters","params":[{"id":"TYPE","value":2.4}]}"#;
        restore(&store, blob).unwrap();
        assert_eq!(store.get(ParameterId::Type), 2.0);

        let saved = StateDocument::from_bytes(&save(&store).unwrap()).unwrap();
        let ty = saved.params.iter().find(|p| p.id == "TYPE").map(|p| p.value);
        assert_eq!(ty, Some(2.0));
    }

    #[test]
    fn only_accepted_restores_are_flagged() {
        let store = ParameterStore::new();
        assert!(restore(&store, b"not json").is_err());
        assert!(!store.take_restored());

        restore(&store, br#"{"tag":"Parameters"}"#).unwrap();
        assert!(store.take_restored());
    }

    #[test]
    fn document_lists_every_parameter() {
        let document = StateDocument::capture(&ParameterStore::new());
        let ids: Vec<_> = document.params.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["CUTOFF", "RESONANCE", "DRIVE", "TYPE"]);
    }
}
