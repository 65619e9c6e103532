// YAML front matter decoding. Per §1/§9 this is delegated to an external
// library; we specify only the interface and bind it to `serde_yml`.

use crate::error::MMarkErr;
use serde_json::Value as JsonValue;

/// Decode YAML front-matter text into a JSON-shaped value.
///
/// On failure, returns the decoder's own offset into `text` (0 if the
/// decoder does not surface one) plus its message, so the caller can
/// translate it into a `YamlParseError` located relative to the front
/// matter block.
pub fn decode_yaml(text: &str) -> Result<JsonValue, (usize, String)> {
    let yaml_value: serde_yml::Value = serde_yml::from_str(text).map_err(|e| (0, e.to_string()))?;
    serde_json::to_value(yaml_value).map_err(|e| (0, e.to_string()))
}

pub fn decode_yaml_err(text: &str) -> Result<JsonValue, MMarkErr> {
    decode_yaml(text).map_err(|(_, msg)| MMarkErr::YamlParseError(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_simple_mapping() {
        let value = decode_yaml_err("key: 1\nother: two\n").unwrap();
        assert_eq!(value["key"], 1);
        assert_eq!(value["other"], "two");
    }

    #[test]
    fn reports_an_error_on_malformed_yaml() {
        let result = decode_yaml_err(": : :\n\tbad");
        assert!(result.is_err());
    }
}
