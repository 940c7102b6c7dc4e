use serde::de::DeserializeOwned;

use crate::error::ShorthandError;
use crate::shorthand::ShorthandMap;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, ShorthandError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        ShorthandError::Json(format!("at JSON path {path} → {}", err.into_inner()))
    })
}

/// Load a top-level shorthand mapping from JSON source.
pub fn shorthand_map_from_str(src: &str) -> Result<ShorthandMap, ShorthandError> {
    from_str_with_path::<ShorthandMap>(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_path_of_bad_value() {
        let err = shorthand_map_from_str(r#"{"user": {"name": "string", "nick": null}}"#).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("user"), "{msg}");
        assert!(msg.contains("unsupported shorthand value null"), "{msg}");
    }

    #[test]
    fn top_level_must_be_a_mapping() {
        assert!(shorthand_map_from_str(r#"["string"]"#).is_err());
        assert!(from_str_with_path::<crate::shorthand::Shorthand>(r#"["string"]"#).is_ok());
    }

    #[test]
    fn keeps_source_order() {
        let map = shorthand_map_from_str(r#"{"z": "string", "a": "number"}"#).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["z", "a"]);
    }
}
