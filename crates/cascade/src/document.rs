//! raw and resolved documents
use crate::error::{Error, Result};
use crate::value::{Mapping, Value};

/// Reserved key listing the parents of a document
pub const INHERITS_KEY: &str = "_inherits";

/// Name of the root document
///
/// It is terminal in every chain and never has parents of its own.
pub const BASE: &str = "base";

/// A document as loaded from a store, before inheritance is applied
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub name: String,
    /// Own fields, without the inheritance declaration
    pub fields: Mapping,
    /// Parent names in declared order
    pub inherits: Vec<String>,
}

impl RawDocument {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Mapping::new(),
            inherits: vec![],
        }
    }

    /// Build a document from a parsed value
    ///
    /// `null` (an empty file) is an empty document. Anything that is not a mapping is rejected.
    pub fn from_value(name: impl Into<String>, value: Value) -> Result<Self> {
        let name = name.into();

        let mut fields = match value {
            Value::Null => Mapping::new(),
            Value::Object(fields) => fields,
            other => {
                return Err(Error::validation(
                    name,
                    format!("document root must be a mapping, found {}", other.kind()),
                ))
            }
        };

        let declared = fields.shift_remove(INHERITS_KEY);
        if name == BASE {
            if declared.is_some() {
                tracing::trace!("ignoring inheritance declared by the base document");
            }
            return Ok(Self {
                name,
                fields,
                inherits: vec![],
            });
        }

        let inherits = match declared {
            None | Some(Value::Null) => vec![],
            Some(Value::Array(parents)) => parents
                .into_iter()
                .map(|parent| match parent {
                    Value::String(parent) => Ok(parent),
                    other => Err(Error::validation(
                        &name,
                        format!(
                            "`{INHERITS_KEY}` entries must be document names, found {}",
                            other.kind()
                        ),
                    )),
                })
                .collect::<Result<_>>()?,
            Some(other) => {
                return Err(Error::validation(
                    name,
                    format!(
                        "`{INHERITS_KEY}` must be a sequence of document names, found {}",
                        other.kind()
                    ),
                ))
            }
        };

        Ok(Self {
            name,
            fields,
            inherits,
        })
    }
}

/// A document with all ancestors merged in
#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct ResolvedDocument {
    pub name: String,
    pub fields: Mapping,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::format::Format;
    use pretty_assertions::assert_eq;

    fn raw(name: &str, yaml: &str) -> Result<RawDocument> {
        RawDocument::from_value(name, Format::Yaml.parse(yaml).unwrap())
    }

    #[test]
    fn inherits_is_extracted() {
        let document = raw("editblock", "_inherits: [base, fenced]\nmain_system: hi").unwrap();

        assert_eq!(document.inherits, ["base", "fenced"]);
        assert!(!document.fields.contains_key(INHERITS_KEY));
        assert_eq!(document.fields["main_system"], Value::from("hi"));
    }

    #[test]
    fn missing_or_null_inherits_is_empty() {
        assert!(raw("one", "a: 1").unwrap().inherits.is_empty());
        assert!(raw("two", "_inherits:\na: 1").unwrap().inherits.is_empty());
    }

    #[test]
    fn empty_document() {
        assert_eq!(raw("empty", "").unwrap(), RawDocument::empty("empty"));
    }

    #[test]
    fn base_inherits_nothing() {
        let base = raw(BASE, "_inherits: [other]\na: 1").unwrap();

        assert!(base.inherits.is_empty());
        assert!(!base.fields.contains_key(INHERITS_KEY));
    }

    #[test]
    fn root_must_be_a_mapping() {
        let err = raw("list", "- a\n- b").unwrap_err();
        assert!(matches!(err, Error::Validation { name, .. } if name == "list"));
    }

    #[test]
    fn inherits_must_be_a_list_of_names() {
        assert!(matches!(
            raw("scalar", "_inherits: base"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            raw("nested", "_inherits: [[base]]"),
            Err(Error::Validation { .. })
        ));
    }
}
