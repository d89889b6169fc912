//! Locale tools: read-only reference data.

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::ToolDef;
use crate::clients::ClientRegistry;
use crate::convert::{parse_call, NoArgs};
use crate::error::Result;
use crate::schema;

/// Get all locale tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new("list_countries", "List all countries", schema!(object {})),
        ToolDef::new("list_countries_eu", "List all EU countries", schema!(object {})),
        ToolDef::new(
            "list_countries_phones",
            "List all countries with phone codes",
            schema!(object {}),
        ),
        ToolDef::new("list_continents", "List all continents", schema!(object {})),
        ToolDef::new("list_languages", "List all supported languages", schema!(object {})),
        ToolDef::new("list_currencies", "List all currencies", schema!(object {})),
        ToolDef::new("list_codes", "List all locale codes", schema!(object {})),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
enum LocaleCall {
    ListCountries(NoArgs),
    ListCountriesEu(NoArgs),
    ListCountriesPhones(NoArgs),
    ListContinents(NoArgs),
    ListLanguages(NoArgs),
    ListCurrencies(NoArgs),
    ListCodes(NoArgs),
}

/// Dispatch a locale tool call.
pub async fn dispatch(
    clients: &ClientRegistry,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let locale = clients.locale()?;

    match parse_call::<LocaleCall>(name, args)? {
        LocaleCall::ListCountries(_) => locale.list_countries().await,
        LocaleCall::ListCountriesEu(_) => locale.list_countries_eu().await,
        LocaleCall::ListCountriesPhones(_) => locale.list_countries_phones().await,
        LocaleCall::ListContinents(_) => locale.list_continents().await,
        LocaleCall::ListLanguages(_) => locale.list_languages().await,
        LocaleCall::ListCurrencies(_) => locale.list_currencies().await,
        LocaleCall::ListCodes(_) => locale.list_codes().await,
    }
}
