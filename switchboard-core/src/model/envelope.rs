use crate::model::peer::PeerId;
use serde_json::value::RawValue;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("envelope is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("envelope has no `type` field")]
    MissingType,

    #[error("field `{0}` must be a string")]
    NotAString(&'static str),

    #[error("`{kind}` envelope is missing `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
}

/// One JSON object received from a client.
///
/// Field values are held as the raw JSON text the client sent, so relaying an
/// envelope never re-encodes its payload. Only `sender` is ever rewritten.
#[derive(Debug, Clone)]
pub struct Envelope {
    fields: BTreeMap<String, Box<RawValue>>,
}

impl Envelope {
    pub fn parse(text: &str) -> Result<Self, EnvelopeError> {
        let fields = serde_json::from_str(text)?;
        Ok(Self { fields })
    }

    pub fn kind(&self) -> Result<String, EnvelopeError> {
        self.string_field("type")?.ok_or(EnvelopeError::MissingType)
    }

    /// `Ok(None)` when the field is absent, an error when it is not a string.
    pub fn string_field(&self, key: &'static str) -> Result<Option<String>, EnvelopeError> {
        let Some(raw) = self.fields.get(key) else {
            return Ok(None);
        };
        serde_json::from_str::<String>(raw.get())
            .map(Some)
            .map_err(|_| EnvelopeError::NotAString(key))
    }

    pub fn raw_field(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key).map(|raw| raw.as_ref())
    }

    /// Sets `sender`, replacing any client-supplied value, and encodes the envelope.
    pub fn stamped(mut self, sender: &PeerId) -> Result<String, EnvelopeError> {
        let raw = serde_json::value::to_raw_value(sender)?;
        self.fields.insert("sender".to_owned(), raw);
        Ok(serde_json::to_string(&self.fields)?)
    }
}
