use serde::{Deserialize, Serialize};

/// A member of the tracked index as reported by the provider.
///
/// `sector` is the provider's raw classification string; normalisation to the
/// canonical sector names happens in the domain layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constituent {
    pub symbol: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub sector: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_sector: Option<String>,
}

impl Constituent {
    pub fn new(symbol: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            sector: sector.into(),
            sub_sector: None,
        }
    }
}
