use crate::api::{ApiError, ApiResult};

/// Filters accepted by the recipe list. `tags` may repeat in the query
/// string and matches recipes carrying any of the given slugs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<i32>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeFilter {
    pub fn from_pairs(pairs: &[(String, String)]) -> ApiResult<Self> {
        let mut filter = RecipeFilter::default();

        for (key, value) in pairs {
            match key.as_str() {
                "author" => {
                    let author = value.trim().parse().map_err(|_| {
                        ApiError::validation("author", "author must be a user id")
                    })?;
                    filter.author = Some(author);
                }
                "tags" => {
                    let slug = value.trim();
                    if !slug.is_empty() && !filter.tags.iter().any(|t| t == slug) {
                        filter.tags.push(slug.to_string());
                    }
                }
                "is_favorited" => filter.is_favorited = is_truthy(value),
                "is_in_shopping_cart" => filter.is_in_shopping_cart = is_truthy(value),
                _ => {}
            }
        }

        Ok(filter)
    }
}

/// Only `1` and `true` switch a flag on; anything else leaves it off.
fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_query() {
        let filter = RecipeFilter::from_pairs(&[]).unwrap();
        assert_eq!(filter, RecipeFilter::default());
    }

    #[test]
    fn test_repeated_tags() {
        let filter =
            RecipeFilter::from_pairs(&pairs(&[("tags", "breakfast"), ("tags", "lunch")])).unwrap();
        assert_eq!(filter.tags, vec!["breakfast", "lunch"]);
    }

    #[test]
    fn test_duplicate_and_blank_tags_dropped() {
        let filter = RecipeFilter::from_pairs(&pairs(&[
            ("tags", "lunch"),
            ("tags", ""),
            ("tags", "lunch"),
        ]))
        .unwrap();
        assert_eq!(filter.tags, vec!["lunch"]);
    }

    #[test]
    fn test_author() {
        let filter = RecipeFilter::from_pairs(&pairs(&[("author", "42")])).unwrap();
        assert_eq!(filter.author, Some(42));

        assert!(RecipeFilter::from_pairs(&pairs(&[("author", "bob")])).is_err());
    }

    #[test]
    fn test_flags() {
        let filter = RecipeFilter::from_pairs(&pairs(&[
            ("is_favorited", "1"),
            ("is_in_shopping_cart", "TRUE"),
        ]))
        .unwrap();
        assert!(filter.is_favorited);
        assert!(filter.is_in_shopping_cart);

        let filter = RecipeFilter::from_pairs(&pairs(&[
            ("is_favorited", "0"),
            ("is_in_shopping_cart", "false"),
        ]))
        .unwrap();
        assert!(!filter.is_favorited);
        assert!(!filter.is_in_shopping_cart);
    }

    #[test]
    fn test_pagination_keys_ignored() {
        let filter =
            RecipeFilter::from_pairs(&pairs(&[("page", "2"), ("limit", "6"), ("tags", "dinner")]))
                .unwrap();
        assert_eq!(filter.tags, vec!["dinner"]);
        assert_eq!(filter.author, None);
    }
}
