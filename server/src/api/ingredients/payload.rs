use crate::api::{ApiError, ApiResult};
use crate::models::IngredientChangeset;
use serde::Deserialize;
use utoipa::ToSchema;

const MAX_LENGTH: usize = 200;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIngredientRequest {
    pub name: String,
    /// e.g. `g`, `ml`, `шт`
    pub measurement_unit: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateIngredientRequest {
    pub name: Option<String>,
    pub measurement_unit: Option<String>,
}

impl CreateIngredientRequest {
    /// Returns the trimmed `(name, measurement_unit)` pair.
    pub fn validate(&self) -> ApiResult<(&str, &str)> {
        Ok((
            check("name", &self.name)?,
            check("measurement_unit", &self.measurement_unit)?,
        ))
    }
}

impl UpdateIngredientRequest {
    pub fn validate(&self) -> ApiResult<IngredientChangeset<'_>> {
        Ok(IngredientChangeset {
            name: self.name.as_deref().map(|v| check("name", v)).transpose()?,
            measurement_unit: self
                .measurement_unit
                .as_deref()
                .map(|v| check("measurement_unit", v))
                .transpose()?,
        })
    }
}

fn check<'a>(field: &'static str, value: &'a str) -> ApiResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::validation(field, format!("{field} cannot be empty")));
    }
    if value.chars().count() > MAX_LENGTH {
        return Err(ApiError::validation(
            field,
            format!("{field} must be at most {MAX_LENGTH} characters"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trims() {
        let req = CreateIngredientRequest {
            name: " Flour ".to_string(),
            measurement_unit: "g ".to_string(),
        };
        assert_eq!(req.validate().unwrap(), ("Flour", "g"));
    }

    #[test]
    fn test_create_requires_both_fields() {
        let req = CreateIngredientRequest {
            name: "Flour".to_string(),
            measurement_unit: "  ".to_string(),
        };
        match req.validate() {
            Err(ApiError::Validation { field, .. }) => assert_eq!(field, Some("measurement_unit")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_too_long_name() {
        let req = CreateIngredientRequest {
            name: "x".repeat(MAX_LENGTH + 1),
            measurement_unit: "g".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_changeset() {
        let req = UpdateIngredientRequest {
            measurement_unit: Some(" kg".to_string()),
            ..Default::default()
        };
        let changeset = req.validate().unwrap();
        assert_eq!(changeset.name, None);
        assert_eq!(changeset.measurement_unit, Some("kg"));
    }
}
