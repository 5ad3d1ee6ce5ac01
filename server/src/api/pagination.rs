use super::{ApiError, ApiResult};
use crate::config::Config;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Clone, Copy, Deserialize, IntoParams)]
pub struct PageParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Items per page (default: PAGE_SIZE, max: MAX_PAGE_SIZE)
    pub limit: Option<i64>,
}

/// LIMIT/OFFSET pair derived from [`PageParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T: ToSchema> {
    /// Total number of matching items across all pages
    pub count: i64,
    pub results: Vec<T>,
}

impl PageParams {
    /// Picks `page` and `limit` out of raw query pairs, for handlers that
    /// need repeated keys and so cannot use a typed `Query`.
    pub fn from_pairs(pairs: &[(String, String)]) -> ApiResult<Self> {
        let mut params = PageParams::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" => params.page = Some(parse_number("page", value)?),
                "limit" => params.limit = Some(parse_number("limit", value)?),
                _ => {}
            }
        }
        Ok(params)
    }

    pub fn window(&self, config: &Config) -> ApiResult<PageWindow> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(ApiError::validation("page", "Page must be a positive integer"));
        }

        let limit = self
            .limit
            .unwrap_or(config.page_size)
            .clamp(1, config.max_page_size);

        Ok(PageWindow {
            limit,
            offset: (page - 1) * limit,
        })
    }
}

/// Total for a page whose rows carry `COUNT(*) OVER()`. A page past the end
/// has no rows to carry it, so `recount` runs the plain count instead.
pub fn page_total<F>(first: Option<i64>, window: PageWindow, recount: F) -> ApiResult<i64>
where
    F: FnOnce() -> diesel::QueryResult<i64>,
{
    match first {
        Some(total) => Ok(total),
        None if window.offset == 0 => Ok(0),
        None => Ok(recount()?),
    }
}

pub fn parse_number(field: &'static str, value: &str) -> ApiResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::validation(field, format!("{field} must be an integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database_url: String::new(),
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            page_size: 6,
            max_page_size: 100,
        }
    }

    #[test]
    fn test_default_window() {
        let window = PageParams::default().window(&config()).unwrap();
        assert_eq!(window, PageWindow { limit: 6, offset: 0 });
    }

    #[test]
    fn test_third_page() {
        let params = PageParams {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(
            params.window(&config()).unwrap(),
            PageWindow {
                limit: 10,
                offset: 20
            }
        );
    }

    #[test]
    fn test_limit_is_clamped() {
        let params = PageParams {
            page: None,
            limit: Some(10_000),
        };
        assert_eq!(params.window(&config()).unwrap().limit, 100);

        let params = PageParams {
            page: None,
            limit: Some(0),
        };
        assert_eq!(params.window(&config()).unwrap().limit, 1);
    }

    #[test]
    fn test_page_zero_rejected() {
        let params = PageParams {
            page: Some(0),
            limit: None,
        };
        assert!(params.window(&config()).is_err());
    }

    #[test]
    fn test_page_total_uses_window_count() {
        let window = PageWindow { limit: 6, offset: 6 };
        let total = page_total(Some(9), window, || panic!("should not recount")).unwrap();
        assert_eq!(total, 9);
    }

    #[test]
    fn test_page_total_empty_first_page() {
        let window = PageWindow { limit: 6, offset: 0 };
        let total = page_total(None, window, || panic!("should not recount")).unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn test_page_total_past_the_end_recounts() {
        let window = PageWindow { limit: 6, offset: 600 };
        assert_eq!(page_total(None, window, || Ok(4)).unwrap(), 4);

        let failed = page_total(None, window, || Err(diesel::result::Error::NotFound));
        assert!(failed.is_err());
    }

    #[test]
    fn test_from_pairs() {
        let pairs = vec![
            ("tags".to_string(), "lunch".to_string()),
            ("page".to_string(), "2".to_string()),
            ("limit".to_string(), "12".to_string()),
        ];
        let params = PageParams::from_pairs(&pairs).unwrap();
        assert_eq!(params.page, Some(2));
        assert_eq!(params.limit, Some(12));

        let bad = vec![("page".to_string(), "two".to_string())];
        assert!(PageParams::from_pairs(&bad).is_err());
    }
}
