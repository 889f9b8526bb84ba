//! Bitquery GraphQL client

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use tracing::debug;
use crate::{
    config::{normalize_address, Config},
    errors::{FetchError, FetchResult},
    network::{
        parse::{parse_mempool_records, parse_pool_records, records},
        queries,
        retry::{retry_with_backoff, RetryConfig},
    },
    types::{MempoolTrade, PoolSnapshot},
};

const MAX_ERROR_BODY_CHARS: usize = 512;
const MIN_MEMPOOL_PER_DIRECTION: u32 = 5;

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<Value>>,
}

#[derive(Debug, Clone)]
pub struct BitqueryClient {
    http: reqwest::Client,
    api_url: String,
    api_token: String,
    retry: RetryConfig,
}

impl BitqueryClient {
    pub fn new(config: &Config) -> FetchResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .connect_timeout(config.http_timeout)
            .build()
            .map_err(|e| FetchError::network("Failed to build HTTP client", e))?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
            retry: RetryConfig::with_max_attempts(config.fetch_max_attempts),
        })
    }

    /// Most recent pool slippage records across all pairs.
    pub async fn fetch_slippage_data(&self, limit: u32) -> FetchResult<Vec<PoolSnapshot>> {
        let data = self
            .execute_query(&queries::pool_slippages_query(), json!({ "limit": limit }), "pool slippages")
            .await?;
        let raw = records(&data, queries::POOL_SLIPPAGES_FIELD)?;
        Ok(parse_pool_records(raw, Utc::now()))
    }

    /// Most recent pending swaps across all pairs.
    pub async fn fetch_mempool_data(&self, limit: u32) -> FetchResult<Vec<MempoolTrade>> {
        let data = self
            .execute_query(&queries::mempool_trades_query(), json!({ "limit": limit }), "mempool trades")
            .await?;
        let raw = records(&data, queries::MEMPOOL_TRADES_FIELD)?;
        Ok(parse_mempool_records(raw, Utc::now()))
    }

    /// Pools for one pair. Pools are keyed by currency order on-chain, so the
    /// reverse order is only tried when the requested order has no pools.
    pub async fn fetch_slippage_for_pair(
        &self,
        limit: u32,
        token_a: &str,
        token_b: &str,
    ) -> FetchResult<Vec<PoolSnapshot>> {
        let (ta, tb) = (normalize_address(token_a), normalize_address(token_b));
        let query = queries::pool_slippages_by_tokens_query();

        for (first, second) in [(&ta, &tb), (&tb, &ta)] {
            let data = self
                .execute_query(
                    &query,
                    json!({ "limit": limit, "tokenA": first, "tokenB": second }),
                    "pool slippages by pair",
                )
                .await?;
            let raw = records(&data, queries::POOL_SLIPPAGES_FIELD)?;
            if !raw.is_empty() {
                let mut pools = parse_pool_records(raw, Utc::now());
                pools.truncate(limit as usize);
                return Ok(pools);
            }
            debug!(token_a = %first, token_b = %second, "No pools for pair order");
        }

        Ok(Vec::new())
    }

    /// Pending swaps in both directions of a pair, de-duplicated by transaction hash.
    pub async fn fetch_mempool_for_pair(
        &self,
        limit: u32,
        token_a: &str,
        token_b: &str,
    ) -> FetchResult<Vec<MempoolTrade>> {
        let (ta, tb) = (normalize_address(token_a), normalize_address(token_b));
        let query = queries::mempool_trades_by_tokens_query();
        let per_direction = (limit / 2).max(MIN_MEMPOOL_PER_DIRECTION);

        let (ab, ba) = tokio::try_join!(
            self.execute_query(
                &query,
                json!({ "limit": per_direction, "tokenA": ta, "tokenB": tb }),
                "mempool trades A->B",
            ),
            self.execute_query(
                &query,
                json!({ "limit": per_direction, "tokenA": tb, "tokenB": ta }),
                "mempool trades B->A",
            ),
        )?;

        let fetched_at = Utc::now();
        let mut trades = parse_mempool_records(records(&ab, queries::MEMPOOL_TRADES_FIELD)?, fetched_at);
        trades.extend(parse_mempool_records(records(&ba, queries::MEMPOOL_TRADES_FIELD)?, fetched_at));

        let mut seen = HashSet::new();
        trades.retain(|t| t.tx_hash.is_empty() || seen.insert(t.tx_hash.clone()));
        trades.truncate(limit as usize);
        Ok(trades)
    }

    async fn execute_query(&self, query: &str, variables: Value, context: &str) -> FetchResult<Value> {
        retry_with_backoff(
            || self.execute_query_once(query, &variables),
            &self.retry,
            context,
        )
        .await
    }

    async fn execute_query_once(&self, query: &str, variables: &Value) -> FetchResult<Value> {
        let payload = json!({ "query": query, "variables": variables });

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| FetchError::network("Request to data provider failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::network("Failed to read response body", e))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let envelope: GraphQlEnvelope = serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            context: "GraphQL response envelope".to_string(),
            source: e,
        })?;

        if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
            let message = errors
                .iter()
                .map(|e| e["message"].as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(FetchError::GraphQl { message });
        }

        envelope.data.ok_or_else(|| FetchError::MissingField {
            path: "data".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::collections::HashMap;

    fn config_for(server: &mockito::Server, attempts: &str) -> Config {
        let vars: HashMap<&str, String> = HashMap::from([
            ("BITQUERY_TOKEN", "test-token".to_string()),
            ("BITQUERY_API_URL", format!("{}/graphql", server.url())),
            ("FETCH_MAX_ATTEMPTS", attempts.to_string()),
            ("HTTP_TIMEOUT_SECS", "5".to_string()),
        ]);
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    fn pool_body(addresses: &[&str]) -> String {
        let items: Vec<Value> = addresses
            .iter()
            .map(|addr| {
                json!({
                    "Block": { "Time": "2024-05-10T12:00:00Z", "Number": 19842771 },
                    "Price": {
                        "AtoB": { "Price": 3000, "MaxAmountIn": 10, "MinAmountOut": 29000 },
                        "BtoA": { "Price": 0.000333, "MaxAmountIn": 30000, "MinAmountOut": 9.9 },
                        "Pool": {
                            "SmartContract": addr,
                            "CurrencyA": { "Symbol": "WETH", "SmartContract": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2" },
                            "CurrencyB": { "Symbol": "USDC", "SmartContract": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48" }
                        },
                        "Dex": { "ProtocolName": "uniswap_v3", "ProtocolVersion": "3" },
                        "SlippageBasisPoints": 10
                    }
                })
            })
            .collect();
        json!({ "data": { "EVM": { "DEXPoolSlippages": items } } }).to_string()
    }

    fn mempool_body(hashes: &[&str]) -> String {
        let items: Vec<Value> = hashes
            .iter()
            .map(|hash| {
                json!({
                    "Trade": {
                        "Amount": "1", "AmountInUSD": "3000",
                        "Dex": { "ProtocolName": "uniswap_v2" },
                        "Currency": { "Symbol": "WETH" },
                        "Side": { "Amount": "3000", "Currency": { "Symbol": "USDC" } }
                    },
                    "Transaction": { "Hash": hash }
                })
            })
            .collect();
        json!({ "data": { "EVM": { "DEXTradeByTokens": items } } }).to_string()
    }

    #[tokio::test]
    async fn sends_bearer_token_and_limit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_header("authorization", "Bearer test-token")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({ "variables": { "limit": 7 } })))
            .with_status(200)
            .with_body(pool_body(&["0xpool1", "0xpool2"]))
            .create_async()
            .await;

        let client = BitqueryClient::new(&config_for(&server, "1")).unwrap();
        let pools = client.fetch_slippage_data(7).await.unwrap();

        mock.assert_async().await;
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0].pool_address, "0xpool1");
    }

    #[tokio::test]
    async fn non_success_status_is_a_typed_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let client = BitqueryClient::new(&config_for(&server, "1")).unwrap();
        let err = client.fetch_mempool_data(5).await.unwrap_err();

        match err {
            FetchError::Status { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .with_status(502)
            .expect(2)
            .create_async()
            .await;

        let client = BitqueryClient::new(&config_for(&server, "2")).unwrap();
        let err = client.fetch_slippage_data(5).await.unwrap_err();

        mock.assert_async().await;
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn graphql_errors_surface_their_messages() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(json!({ "errors": [{ "message": "limit exceeded" }] }).to_string())
            .create_async()
            .await;

        let client = BitqueryClient::new(&config_for(&server, "1")).unwrap();
        let err = client.fetch_slippage_data(5).await.unwrap_err();
        assert!(matches!(err, FetchError::GraphQl { ref message } if message == "limit exceeded"));
    }

    #[tokio::test]
    async fn malformed_bodies_are_decode_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = BitqueryClient::new(&config_for(&server, "1")).unwrap();
        let err = client.fetch_mempool_data(5).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn missing_records_array_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(json!({ "data": { "EVM": {} } }).to_string())
            .create_async()
            .await;

        let client = BitqueryClient::new(&config_for(&server, "1")).unwrap();
        let err = client.fetch_slippage_data(5).await.unwrap_err();
        assert!(matches!(err, FetchError::MissingField { .. }));
    }

    #[tokio::test]
    async fn pair_lookup_falls_back_to_reverse_order() {
        let mut server = mockito::Server::new_async().await;
        let forward = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({ "variables": { "tokenA": "0xaaaa" } })))
            .with_status(200)
            .with_body(pool_body(&[]))
            .create_async()
            .await;
        let reverse = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({ "variables": { "tokenA": "0xbbbb" } })))
            .with_status(200)
            .with_body(pool_body(&["0xreversed"]))
            .create_async()
            .await;

        let client = BitqueryClient::new(&config_for(&server, "1")).unwrap();
        let pools = client.fetch_slippage_for_pair(10, "0xAAAA", "bbbb").await.unwrap();

        forward.assert_async().await;
        reverse.assert_async().await;
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].pool_address, "0xreversed");
    }

    #[tokio::test]
    async fn pair_mempool_merges_and_deduplicates() {
        let mut server = mockito::Server::new_async().await;
        let _ab = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({ "variables": { "tokenA": "0xaaaa", "limit": 5 } })))
            .with_status(200)
            .with_body(mempool_body(&["0x1", "0x2"]))
            .create_async()
            .await;
        let _ba = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({ "variables": { "tokenA": "0xbbbb", "limit": 5 } })))
            .with_status(200)
            .with_body(mempool_body(&["0x2", "0x3"]))
            .create_async()
            .await;

        let client = BitqueryClient::new(&config_for(&server, "1")).unwrap();
        let trades = client.fetch_mempool_for_pair(4, "0xaaaa", "0xbbbb").await.unwrap();

        let hashes: Vec<&str> = trades.iter().map(|t| t.tx_hash.as_str()).collect();
        assert_eq!(hashes, vec!["0x1", "0x2", "0x3"]);
    }
}
