//! Value <-> stored text conversion

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CodecError;

/// Serializer/deserializer pair for one stored type
pub trait Codec<T> {
    fn encode(&self, value: &T) -> Result<String, CodecError>;
    fn decode(&self, raw: &str) -> Result<T, CodecError>;
}

/// JSON via serde_json, the format LocalStorage entries use
pub struct JsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JsonCodec")
    }
}

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec<T> {
    fn encode(&self, value: &T) -> Result<String, CodecError> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode(&self, raw: &str) -> Result<T, CodecError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        theme: String,
        font_size: u32,
        pinned: Vec<i64>,
    }

    #[test]
    fn test_struct_json_shape() {
        let codec = JsonCodec::<Prefs>::new();
        let prefs = Prefs {
            theme: "dark".to_string(),
            font_size: 14,
            pinned: vec![100000001],
        };
        let raw = codec.encode(&prefs).unwrap();
        assert_eq!(raw, r#"{"theme":"dark","font_size":14,"pinned":[100000001]}"#);
        assert_eq!(codec.decode(&raw).unwrap(), prefs);
    }

    #[test]
    fn test_decode_malformed() {
        let codec = JsonCodec::<Prefs>::new();
        assert!(codec.decode("{not json").is_err());
        // Valid JSON of the wrong shape is also rejected
        assert!(codec.decode("42").is_err());
    }

    #[test]
    fn test_non_string_map_keys_fail_to_encode() {
        let codec = JsonCodec::<BTreeMap<(u8, u8), u8>>::new();
        let mut map = BTreeMap::new();
        map.insert((1, 2), 3);
        assert!(codec.encode(&map).is_err());
    }

    proptest! {
        #[test]
        fn prop_json_round_trip(theme in ".*", font_size: u32, pinned in prop::collection::vec(any::<i64>(), 0..8)) {
            let codec = JsonCodec::<Prefs>::new();
            let prefs = Prefs { theme, font_size, pinned };
            let raw = codec.encode(&prefs).unwrap();
            prop_assert_eq!(codec.decode(&raw).unwrap(), prefs);
        }
    }
}
