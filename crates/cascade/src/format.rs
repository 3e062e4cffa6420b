//! source formats a document can be written in
//!
//! The resolver does not care how documents are stored. A [Format] only has to turn text into a [Value];
//! nothing is ever written back.
use crate::value::{Value, ValueError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Hcl,
}

impl Format {
    /// File extensions in lookup order
    ///
    /// When more than one file exists for the same document name, the earlier extension wins.
    pub const EXTENSIONS: [(&'static str, Format); 4] = [
        ("yml", Format::Yaml),
        ("yaml", Format::Yaml),
        ("json", Format::Json),
        ("hcl", Format::Hcl),
    ];

    pub fn from_extension(extension: &str) -> Option<Format> {
        Self::EXTENSIONS
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, format)| *format)
    }

    /// Parse text into the document value model
    ///
    /// Blank text is [Value::Null], callers decide what an empty document means.
    pub fn parse(self, text: &str) -> Result<Value, FormatError> {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        let value: Value = match self {
            Format::Yaml => Value::try_from(serde_yaml::from_str::<serde_yaml::Value>(text)?)?,
            Format::Json => serde_json::from_str::<serde_json::Value>(text)?.into(),
            Format::Hcl => hcl::from_str::<hcl::Value>(text)?.into(),
        };

        Ok(value)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("unable to parse yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unable to parse json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unable to parse hcl: {0}")]
    Hcl(#[from] hcl::Error),
    #[error(transparent)]
    Value(#[from] ValueError),
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_text_is_null() {
        for format in [Format::Yaml, Format::Json, Format::Hcl] {
            assert_eq!(format.parse("  \n").unwrap(), Value::Null);
        }
    }

    #[test]
    fn extensions() {
        assert_eq!(Format::from_extension("yml"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("yaml"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("json"), Some(Format::Json));
        assert_eq!(Format::from_extension("hcl"), Some(Format::Hcl));
        assert_eq!(Format::from_extension("toml"), None);
    }

    #[test]
    fn json_keeps_key_order() {
        let value = Format::Json.parse(r#"{"b": 1, "a": {"d": true, "c": null}}"#).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(
            object["a"].as_object().unwrap().keys().collect::<Vec<_>>(),
            ["d", "c"]
        );
    }

    #[test]
    fn hcl_attributes() {
        let value = Format::Hcl
            .parse("greeting = \"hello\"\nlimits = { retries = 3 }")
            .unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["greeting"], Value::from("hello"));
        assert_eq!(
            object["limits"].as_object().unwrap()["retries"],
            Value::Integer(3)
        );
    }

    #[test]
    fn malformed_yaml() {
        assert!(matches!(
            Format::Yaml.parse("key: [unclosed"),
            Err(FormatError::Yaml(_))
        ));
    }
}
