use std::time::Duration;

use autoscore_core::{
    CanonicalNames, CatalogStore, ContextQuery, FamilySummary, ReviewFilter, ReviewRecord,
    StoreError,
};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::RemoteConfig;
use crate::error::RemoteError;
use crate::rows::{RawFamilyRow, decode_families, decode_reviews};

const REVIEWS_TABLE: &str = "reviews";
const RPC_RESOLVE_BRAND: &str = "resolve_brand_by_slug";
const RPC_RESOLVE_CONTEXT: &str = "resolve_full_context";
const RPC_LIST_FAMILIES: &str = "list_families_for_brand";

/// HTTP client for a PostgREST-style catalog API.
pub struct RemoteStore {
    http: reqwest::Client,
    config: RemoteConfig,
}

#[derive(Serialize)]
struct BrandArgs<'a> {
    p_slug: &'a str,
}

#[derive(Serialize)]
struct ContextArgs<'a> {
    p_brand_slug: &'a str,
    p_family_slug: &'a str,
    p_model_year: Option<i32>,
    p_model_slug: Option<&'a str>,
    p_powertrain_slug: Option<&'a str>,
}

#[derive(Serialize)]
struct FamilyArgs<'a> {
    p_brand: &'a str,
}

impl RemoteStore {
    /// Build a client with the API key and schema baked into every request.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        let key = header_value(&config.api_key, "api_key")?;
        headers.insert("apikey", key);
        headers.insert(
            reqwest::header::AUTHORIZATION,
            header_value(&format!("Bearer {}", config.api_key), "api_key")?,
        );
        let schema = header_value(&config.schema, "schema")?;
        headers.insert("accept-profile", schema.clone());
        headers.insert("content-profile", schema);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, path)
    }

    /// Call a stored function and decode its JSON result.
    async fn rpc<B: Serialize, T: DeserializeOwned>(
        &self,
        function: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        log::debug!("RPC {function}");
        let resp = self
            .http
            .post(self.rest_url(&format!("rpc/{function}")))
            .json(body)
            .send()
            .await?;
        read_json(resp, function).await
    }

    /// Fetch review rows matching any AND-group of the filter.
    pub async fn fetch_reviews(&self, filter: &ReviewFilter) -> Result<Vec<ReviewRecord>, RemoteError> {
        if filter.is_empty() {
            return Ok(Vec::new());
        }
        let resp = self
            .http
            .get(self.rest_url(REVIEWS_TABLE))
            .query(&[
                ("select", "*".to_string()),
                ("or", filter.to_postgrest()),
                ("order", "TestDate.desc.nullslast".to_string()),
            ])
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = read_json(resp, REVIEWS_TABLE).await?;
        Ok(decode_reviews(rows))
    }
}

fn header_value(value: &str, field: &str) -> Result<HeaderValue, RemoteError> {
    HeaderValue::from_str(value)
        .map_err(|_| RemoteError::Config(format!("{field} contains characters not allowed in a header")))
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response, what: &str) -> Result<T, RemoteError> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(RemoteError::Unauthorized);
    }

    let text = resp.text().await?;
    if !status.is_success() {
        return Err(RemoteError::ServerError {
            status: status.as_u16(),
            message: snippet(&text).to_string(),
        });
    }

    serde_json::from_str(&text).map_err(|e| {
        RemoteError::Api(format!(
            "Failed to parse {what} response: {e}. Response: {}",
            snippet(&text)
        ))
    })
}

fn snippet(text: &str) -> &str {
    match text.char_indices().nth(200) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

impl CatalogStore for RemoteStore {
    async fn resolve_brand_by_slug(&self, brand_slug: &str) -> Result<Option<String>, StoreError> {
        let brand: Option<String> = self
            .rpc(RPC_RESOLVE_BRAND, &BrandArgs { p_slug: brand_slug })
            .await?;
        Ok(brand)
    }

    async fn resolve_full_context(
        &self,
        query: &ContextQuery,
    ) -> Result<CanonicalNames, StoreError> {
        let args = ContextArgs {
            p_brand_slug: &query.brand_slug,
            p_family_slug: &query.family_slug,
            p_model_year: query.model_year,
            p_model_slug: query.model_slug.as_deref(),
            p_powertrain_slug: query.powertrain_slug.as_deref(),
        };
        let rows: Vec<CanonicalNames> = self.rpc(RPC_RESOLVE_CONTEXT, &args).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn list_families_for_brand(&self, brand: &str) -> Result<Vec<FamilySummary>, StoreError> {
        let rows: Vec<RawFamilyRow> = self
            .rpc(RPC_LIST_FAMILIES, &FamilyArgs { p_brand: brand })
            .await?;
        Ok(decode_families(rows))
    }

    async fn query_reviews(&self, filter: &ReviewFilter) -> Result<Vec<ReviewRecord>, StoreError> {
        Ok(self.fetch_reviews(filter).await?)
    }
}
