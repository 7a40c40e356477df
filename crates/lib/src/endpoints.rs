//! # Endpoint Catalog
//!
//! The closed set of Foreplay API operations this client knows about. Each
//! variant carries the values its request needs and knows its HTTP method,
//! path and query mapping.

use crate::constants::DEFAULT_DOMAIN_ORDER;
use crate::params::{AdFilters, FilterProfile, Page, QueryParams};
use reqwest::Method;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    SwipefileAds {
        filters: AdFilters,
        page: Page,
    },
    Boards,
    BoardBrands {
        board_id: String,
        page: Page,
    },
    BoardAds {
        board_id: String,
        filters: AdFilters,
        page: Page,
    },
    SpyderBrands {
        page: Page,
    },
    SpyderBrand {
        brand_id: String,
    },
    SpyderBrandAds {
        brand_id: String,
        filters: AdFilters,
        page: Page,
    },
    /// Ad detail, query-parameter form.
    Ad {
        ad_id: String,
    },
    /// Ad detail, path-segment form.
    AdById {
        ad_id: String,
    },
    AdsByBrandId {
        brand_id: String,
        filters: AdFilters,
        page: Page,
    },
    AdsByPageId {
        page_id: String,
        filters: AdFilters,
        page: Page,
    },
    BrandsByDomain {
        domain: String,
        page: Page,
    },
    BrandAnalytics {
        id: String,
        start_date: Option<String>,
        end_date: Option<String>,
        order: String,
    },
    DiscoverAds {
        query: Option<String>,
        filters: AdFilters,
        page: Page,
    },
    DiscoverBrands {
        query: Option<String>,
        page: Page,
    },
    Usage,
}

/// One row of the catalog listing.
#[derive(Debug, Clone, Serialize)]
pub struct OperationInfo {
    pub name: &'static str,
    pub method: &'static str,
    pub path: &'static str,
    pub consumes_credits: bool,
}

impl Endpoint {
    /// Brands-by-domain with its own default ordering.
    pub fn brands_by_domain(domain: impl Into<String>) -> Self {
        Endpoint::BrandsByDomain {
            domain: domain.into(),
            page: Page::default().with_order(DEFAULT_DOMAIN_ORDER),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::SwipefileAds { .. } => "swipefile_ads",
            Endpoint::Boards => "boards",
            Endpoint::BoardBrands { .. } => "board_brands",
            Endpoint::BoardAds { .. } => "board_ads",
            Endpoint::SpyderBrands { .. } => "spyder_brands",
            Endpoint::SpyderBrand { .. } => "spyder_brand",
            Endpoint::SpyderBrandAds { .. } => "spyder_brand_ads",
            Endpoint::Ad { .. } => "ad",
            Endpoint::AdById { .. } => "ad_by_id",
            Endpoint::AdsByBrandId { .. } => "ads_by_brand_id",
            Endpoint::AdsByPageId { .. } => "ads_by_page_id",
            Endpoint::BrandsByDomain { .. } => "brands_by_domain",
            Endpoint::BrandAnalytics { .. } => "brand_analytics",
            Endpoint::DiscoverAds { .. } => "discover_ads",
            Endpoint::DiscoverBrands { .. } => "discover_brands",
            Endpoint::Usage => "usage",
        }
    }

    /// Every operation is a read.
    pub fn method(&self) -> Method {
        Method::GET
    }

    /// The path template as documented by the service.
    pub fn path_template(&self) -> &'static str {
        match self {
            Endpoint::SwipefileAds { .. } => "api/swipefile/ads",
            Endpoint::Boards => "api/boards",
            Endpoint::BoardBrands { .. } => "api/board/brands",
            Endpoint::BoardAds { .. } => "api/board/ads",
            Endpoint::SpyderBrands { .. } => "api/spyder/brands",
            Endpoint::SpyderBrand { .. } => "api/spyder/brand",
            Endpoint::SpyderBrandAds { .. } => "api/spyder/brand/ads",
            Endpoint::Ad { .. } => "api/ad",
            Endpoint::AdById { .. } => "api/ad/{ad_id}",
            Endpoint::AdsByBrandId { .. } => "api/brand/getAdsByBrandId",
            Endpoint::AdsByPageId { .. } => "api/brand/getAdsByPageId",
            Endpoint::BrandsByDomain { .. } => "api/brand/getBrandsByDomain",
            Endpoint::BrandAnalytics { .. } => "api/brand/analytics",
            Endpoint::DiscoverAds { .. } => "api/discovery/ads",
            Endpoint::DiscoverBrands { .. } => "api/discovery/brands",
            Endpoint::Usage => "api/usage",
        }
    }

    /// The concrete path segments, with any embedded identifier as its own segment.
    pub fn path_segments(&self) -> Vec<String> {
        match self {
            Endpoint::AdById { ad_id } => vec!["api".into(), "ad".into(), ad_id.clone()],
            _ => self
                .path_template()
                .split('/')
                .map(str::to_string)
                .collect(),
        }
    }

    /// The concrete relative path, for logging.
    pub fn path(&self) -> String {
        self.path_segments().join("/")
    }

    /// The usage lookup is free; everything else costs credits.
    pub fn consumes_credits(&self) -> bool {
        !matches!(self, Endpoint::Usage)
    }

    /// Builds the query-parameter mapping for this operation.
    pub fn query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        match self {
            Endpoint::SwipefileAds { filters, page } => {
                page.apply(&mut params);
                FilterProfile::Swipefile.apply(filters, &mut params);
            }
            Endpoint::Boards | Endpoint::Usage | Endpoint::AdById { .. } => {}
            Endpoint::BoardBrands { board_id, page } => {
                params.set("board_id", board_id.as_str());
                page.apply_window(&mut params);
            }
            Endpoint::BoardAds {
                board_id,
                filters,
                page,
            } => {
                params.set("board_id", board_id.as_str());
                page.apply(&mut params);
                FilterProfile::Board.apply(filters, &mut params);
            }
            Endpoint::SpyderBrands { page } => page.apply_window(&mut params),
            Endpoint::SpyderBrand { brand_id } => {
                params.set("brand_id", brand_id.as_str());
            }
            Endpoint::SpyderBrandAds {
                brand_id,
                filters,
                page,
            }
            | Endpoint::AdsByBrandId {
                brand_id,
                filters,
                page,
            } => {
                params.set("brand_id", brand_id.as_str());
                page.apply(&mut params);
                FilterProfile::Catalog.apply(filters, &mut params);
            }
            Endpoint::Ad { ad_id } => {
                params.set("ad_id", ad_id.as_str());
            }
            Endpoint::AdsByPageId {
                page_id,
                filters,
                page,
            } => {
                params.set("page_id", page_id.as_str());
                page.apply(&mut params);
                FilterProfile::Catalog.apply(filters, &mut params);
            }
            Endpoint::BrandsByDomain { domain, page } => {
                params.set("domain", domain.as_str());
                page.apply(&mut params);
            }
            Endpoint::BrandAnalytics {
                id,
                start_date,
                end_date,
                order,
            } => {
                params
                    .set("id", id.as_str())
                    .set("order", order.as_str())
                    .set_str("start_date", start_date.as_deref())
                    .set_str("end_date", end_date.as_deref());
            }
            Endpoint::DiscoverAds {
                query,
                filters,
                page,
            } => {
                page.apply(&mut params);
                params.set_str("query", query.as_deref());
                FilterProfile::Discovery.apply(filters, &mut params);
            }
            Endpoint::DiscoverBrands { query, page } => {
                page.apply_window(&mut params);
                params.set_str("query", query.as_deref());
            }
        }
        params
    }
}

/// Lists every operation in the catalog.
pub fn catalog() -> Vec<OperationInfo> {
    let placeholder = String::new;
    let operations = [
        Endpoint::SwipefileAds {
            filters: AdFilters::default(),
            page: Page::default(),
        },
        Endpoint::Boards,
        Endpoint::BoardBrands {
            board_id: placeholder(),
            page: Page::default(),
        },
        Endpoint::BoardAds {
            board_id: placeholder(),
            filters: AdFilters::default(),
            page: Page::default(),
        },
        Endpoint::SpyderBrands {
            page: Page::default(),
        },
        Endpoint::SpyderBrand {
            brand_id: placeholder(),
        },
        Endpoint::SpyderBrandAds {
            brand_id: placeholder(),
            filters: AdFilters::default(),
            page: Page::default(),
        },
        Endpoint::Ad {
            ad_id: placeholder(),
        },
        Endpoint::AdById {
            ad_id: placeholder(),
        },
        Endpoint::AdsByBrandId {
            brand_id: placeholder(),
            filters: AdFilters::default(),
            page: Page::default(),
        },
        Endpoint::AdsByPageId {
            page_id: placeholder(),
            filters: AdFilters::default(),
            page: Page::default(),
        },
        Endpoint::brands_by_domain(placeholder()),
        Endpoint::BrandAnalytics {
            id: placeholder(),
            start_date: None,
            end_date: None,
            order: placeholder(),
        },
        Endpoint::DiscoverAds {
            query: None,
            filters: AdFilters::default(),
            page: Page::default(),
        },
        Endpoint::DiscoverBrands {
            query: None,
            page: Page::default(),
        },
        Endpoint::Usage,
    ];

    operations
        .iter()
        .map(|op| OperationInfo {
            name: op.name(),
            method: "GET",
            path: op.path_template(),
            consumes_credits: op.consumes_credits(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::QueryValue;

    #[test]
    fn test_ad_detail_has_both_forms() {
        let query_form = Endpoint::Ad {
            ad_id: "ad-1".into(),
        };
        assert_eq!(query_form.path(), "api/ad");
        assert_eq!(query_form.query().get("ad_id"), Some(&QueryValue::from("ad-1")));

        let path_form = Endpoint::AdById {
            ad_id: "ad-1".into(),
        };
        assert_eq!(path_form.path(), "api/ad/ad-1");
        assert!(path_form.query().is_empty());
    }

    #[test]
    fn test_domain_lookup_defaults_to_most_ranked() {
        let endpoint = Endpoint::brands_by_domain("example.com");
        let query = endpoint.query();
        assert_eq!(query.get("order"), Some(&QueryValue::from("most_ranked")));
        assert_eq!(query.get("domain"), Some(&QueryValue::from("example.com")));
    }

    #[test]
    fn test_board_brands_has_no_order() {
        let endpoint = Endpoint::BoardBrands {
            board_id: "b1".into(),
            page: Page::default(),
        };
        let keys: Vec<_> = endpoint.query().keys().map(str::to_string).collect();
        assert_eq!(keys, vec!["board_id", "limit", "offset"]);
    }

    #[test]
    fn test_brand_analytics_omits_missing_dates() {
        let endpoint = Endpoint::BrandAnalytics {
            id: "brand".into(),
            start_date: Some("2024-01-01".into()),
            end_date: None,
            order: "oldest".into(),
        };
        let query = endpoint.query();
        assert!(query.contains_key("start_date"));
        assert!(!query.contains_key("end_date"));
        assert_eq!(query.get("order"), Some(&QueryValue::from("oldest")));
    }

    /// One instance of every operation, carrying `filters` and `text` wherever
    /// the operation accepts them.
    fn every_operation(filters: &AdFilters, text: Option<&str>) -> Vec<Endpoint> {
        let page = Page::default;
        vec![
            Endpoint::SwipefileAds {
                filters: filters.clone(),
                page: page(),
            },
            Endpoint::Boards,
            Endpoint::BoardBrands {
                board_id: "b1".into(),
                page: page(),
            },
            Endpoint::BoardAds {
                board_id: "b1".into(),
                filters: filters.clone(),
                page: page(),
            },
            Endpoint::SpyderBrands { page: page() },
            Endpoint::SpyderBrand {
                brand_id: "br1".into(),
            },
            Endpoint::SpyderBrandAds {
                brand_id: "br1".into(),
                filters: filters.clone(),
                page: page(),
            },
            Endpoint::Ad { ad_id: "a1".into() },
            Endpoint::AdById { ad_id: "a1".into() },
            Endpoint::AdsByBrandId {
                brand_id: "br1".into(),
                filters: filters.clone(),
                page: page(),
            },
            Endpoint::AdsByPageId {
                page_id: "p1".into(),
                filters: filters.clone(),
                page: page(),
            },
            Endpoint::brands_by_domain("example.com"),
            Endpoint::BrandAnalytics {
                id: "br1".into(),
                start_date: filters.start_date.clone(),
                end_date: filters.end_date.clone(),
                order: "newest".into(),
            },
            Endpoint::DiscoverAds {
                query: text.map(str::to_string),
                filters: filters.clone(),
                page: page(),
            },
            Endpoint::DiscoverBrands {
                query: text.map(str::to_string),
                page: page(),
            },
            Endpoint::Usage,
        ]
    }

    fn keys_of(endpoint: &Endpoint) -> Vec<String> {
        endpoint.query().keys().map(str::to_string).collect()
    }

    #[test]
    fn test_every_operation_sends_only_required_keys_by_default() {
        let expected: [(&str, &[&str]); 16] = [
            ("swipefile_ads", &["limit", "offset", "order"]),
            ("boards", &[]),
            ("board_brands", &["board_id", "limit", "offset"]),
            ("board_ads", &["board_id", "limit", "offset", "order"]),
            ("spyder_brands", &["limit", "offset"]),
            ("spyder_brand", &["brand_id"]),
            ("spyder_brand_ads", &["brand_id", "limit", "offset", "order"]),
            ("ad", &["ad_id"]),
            ("ad_by_id", &[]),
            ("ads_by_brand_id", &["brand_id", "limit", "offset", "order"]),
            ("ads_by_page_id", &["limit", "offset", "order", "page_id"]),
            ("brands_by_domain", &["domain", "limit", "offset", "order"]),
            ("brand_analytics", &["id", "order"]),
            ("discover_ads", &["limit", "offset", "order"]),
            ("discover_brands", &["limit", "offset"]),
            ("usage", &[]),
        ];

        let operations = every_operation(&AdFilters::default(), None);
        assert_eq!(operations.len(), catalog().len());
        for (endpoint, (name, keys)) in operations.iter().zip(expected) {
            assert_eq!(endpoint.name(), name);
            assert_eq!(keys_of(endpoint), keys.to_vec(), "{name}");
        }
    }

    #[test]
    fn test_every_operation_sends_supplied_filters_verbatim() {
        const SHARED: [&str; 5] = [
            "display_format",
            "end_date",
            "live",
            "publisher_platform",
            "start_date",
        ];
        let filters = AdFilters {
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-02-01".into()),
            live: Some(false),
            display_format: Some("video".into()),
            publisher_platform: Some("facebook".into()),
            niche: Some("Beauty".into()),
            market_target: Some("B2C".into()),
            language: Some("en".into()),
            search: Some("serum".into()),
        };
        let with = |extra: &[&str], own: &[&str]| {
            let mut keys: Vec<String> = extra.iter().chain(own).map(|k| k.to_string()).collect();
            keys.sort();
            keys
        };
        let window = ["limit", "offset"];
        let listing = ["limit", "offset", "order"];
        let catalog_filters = ["languages", "market_target", "niches"];
        let expected: Vec<Vec<String>> = vec![
            with(&SHARED, &[&listing[..], &["language", "market_target", "niche", "search"][..]].concat()),
            vec![],
            with(&window, &["board_id"]),
            with(&SHARED, &[&listing[..], &["board_id", "search"][..]].concat()),
            with(&window, &[]),
            with(&["brand_id"], &[]),
            with(&SHARED, &[&listing[..], &catalog_filters[..], &["brand_id"][..]].concat()),
            with(&["ad_id"], &[]),
            vec![],
            with(&SHARED, &[&listing[..], &catalog_filters[..], &["brand_id"][..]].concat()),
            with(&SHARED, &[&listing[..], &catalog_filters[..], &["page_id"][..]].concat()),
            with(&listing, &["domain"]),
            with(&["end_date", "id", "order", "start_date"], &[]),
            with(&SHARED, &[&listing[..], &catalog_filters[..], &["query"][..]].concat()),
            with(&window, &["query"]),
            vec![],
        ];
        let supplied: [(&str, QueryValue); 13] = [
            ("start_date", "2024-01-01".into()),
            ("end_date", "2024-02-01".into()),
            ("live", false.into()),
            ("display_format", "video".into()),
            ("publisher_platform", "facebook".into()),
            ("niche", "Beauty".into()),
            ("niches", "Beauty".into()),
            ("market_target", "B2C".into()),
            ("language", "en".into()),
            ("languages", "en".into()),
            ("search", "serum".into()),
            ("query", "glow".into()),
            ("domain", "example.com".into()),
        ];

        let operations = every_operation(&filters, Some("glow"));
        assert_eq!(operations.len(), expected.len());
        for (endpoint, keys) in operations.iter().zip(expected) {
            let name = endpoint.name();
            assert_eq!(keys_of(endpoint), keys, "{name}");
            let query = endpoint.query();
            for (key, value) in &supplied {
                if let Some(sent) = query.get(key) {
                    assert_eq!(sent, value, "{name}: {key}");
                }
            }
        }
    }

    #[test]
    fn test_catalog_is_closed() {
        let ops = catalog();
        assert_eq!(ops.len(), 16);
        let free: Vec<_> = ops.iter().filter(|o| !o.consumes_credits).collect();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].path, "api/usage");
    }
}
