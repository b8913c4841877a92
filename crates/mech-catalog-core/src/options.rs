use serde_json::Value;

use crate::{coerce, CatalogError};

/// Top-level key of the verifier options document.
pub const VERIFIER_KEY: &str = "entityverifier";

/// Extracts the verifier settings blob that is stored as the default options.
pub fn verifier_settings(root: &Value) -> Result<&Value, CatalogError> {
    let Value::Object(fields) = root else {
        return Err(CatalogError::NotAnObject);
    };
    fields
        .get(VERIFIER_KEY)
        .filter(|settings| coerce::is_truthy(settings))
        .ok_or(CatalogError::MissingField(VERIFIER_KEY))
}
