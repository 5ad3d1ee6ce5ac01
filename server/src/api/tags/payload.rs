use crate::api::{ApiError, ApiResult};
use crate::models::TagChangeset;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use utoipa::ToSchema;

const NAME_MAX_LENGTH: usize = 200;
const SLUG_MAX_LENGTH: usize = 100;

static COLOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color regex"));
static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTagRequest {
    pub name: String,
    /// Hex color, e.g. `#49B64E`
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub slug: Option<String>,
}

/// Validated and normalized tag fields: trimmed, color upper-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFields {
    pub name: Option<String>,
    pub color: Option<String>,
    pub slug: Option<String>,
}

impl TagFields {
    pub fn changeset(&self) -> TagChangeset<'_> {
        TagChangeset {
            name: self.name.as_deref(),
            color: self.color.as_deref(),
            slug: self.slug.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.slug.is_none()
    }
}

impl CreateTagRequest {
    pub fn validate(&self) -> ApiResult<TagFields> {
        UpdateTagRequest {
            name: Some(self.name.clone()),
            color: Some(self.color.clone()),
            slug: Some(self.slug.clone()),
        }
        .validate()
    }
}

impl UpdateTagRequest {
    pub fn validate(&self) -> ApiResult<TagFields> {
        let name = self.name.as_deref().map(normalize_name).transpose()?;
        let color = self.color.as_deref().map(normalize_color).transpose()?;
        let slug = self.slug.as_deref().map(normalize_slug).transpose()?;
        Ok(TagFields { name, color, slug })
    }
}

fn normalize_name(name: &str) -> ApiResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("name", "Tag name cannot be empty"));
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(ApiError::validation(
            "name",
            format!("Tag name must be at most {NAME_MAX_LENGTH} characters"),
        ));
    }
    Ok(name.to_string())
}

fn normalize_color(color: &str) -> ApiResult<String> {
    let color = color.trim();
    if !COLOR_PATTERN.is_match(color) {
        return Err(ApiError::validation(
            "color",
            "Color must be a hex code such as #E26C2D",
        ));
    }
    Ok(color.to_ascii_uppercase())
}

fn normalize_slug(slug: &str) -> ApiResult<String> {
    let slug = slug.trim();
    if slug.is_empty() || slug.len() > SLUG_MAX_LENGTH || !SLUG_PATTERN.is_match(slug) {
        return Err(ApiError::validation(
            "slug",
            format!("Slug must be 1-{SLUG_MAX_LENGTH} letters, digits, hyphens or underscores"),
        ));
    }
    Ok(slug.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, color: &str, slug: &str) -> CreateTagRequest {
        CreateTagRequest {
            name: name.to_string(),
            color: color.to_string(),
            slug: slug.to_string(),
        }
    }

    fn field_of<T: std::fmt::Debug>(result: ApiResult<T>) -> Option<&'static str> {
        match result {
            Err(ApiError::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_tag_is_normalized() {
        let fields = request(" Breakfast ", "#e26c2d", "breakfast").validate().unwrap();
        assert_eq!(fields.name.as_deref(), Some("Breakfast"));
        assert_eq!(fields.color.as_deref(), Some("#E26C2D"));
        assert_eq!(fields.slug.as_deref(), Some("breakfast"));
    }

    #[test]
    fn test_bad_color() {
        for color in ["E26C2D", "#E26C2", "#GGGGGG", "red"] {
            assert_eq!(
                field_of(request("Lunch", color, "lunch").validate()),
                Some("color"),
                "{color}"
            );
        }
    }

    #[test]
    fn test_bad_slug() {
        for slug in ["", "with space", "ужин", "a/b"] {
            assert_eq!(
                field_of(request("Dinner", "#8775D2", slug).validate()),
                Some("slug"),
                "{slug:?}"
            );
        }
    }

    #[test]
    fn test_blank_name() {
        assert_eq!(
            field_of(request("  ", "#8775D2", "dinner").validate()),
            Some("name")
        );
    }

    #[test]
    fn test_partial_update() {
        let fields = UpdateTagRequest {
            slug: Some("brunch".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(fields.slug.as_deref(), Some("brunch"));
        assert!(fields.name.is_none());
        assert!(!fields.is_empty());

        assert!(UpdateTagRequest::default().validate().unwrap().is_empty());
    }
}
