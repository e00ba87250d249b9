use bytes::Bytes;
use eyre::{Context as _, Result};
use http_body_util::{BodyExt, Full};
use hyper::{
    body::Body,
    header::{ACCEPT, USER_AGENT},
    Method, Request, Response,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client as HyperClient},
    rt::TokioExecutor,
};
use serde::Serialize;

use crate::model::{AchievementDefinition, GameShop};

static MY_USER_AGENT: &str = env!("CARGO_PKG_NAME");

type InnerClient = HyperClient<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Client for the catalog API.
pub struct Client {
    client: InnerClient,
    base_url: Box<str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AchievementsQuery<'a> {
    shop: GameShop,
    object_id: &'a str,
    language: &'a str,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let connector = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())
            .context("failed to configure TLS")?
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build();

        let client = HyperClient::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').into(),
        })
    }

    /// Request the achievement catalog of a game
    pub async fn get_game_achievements(
        &self,
        object_id: &str,
        shop: GameShop,
        language: &str,
    ) -> Result<Vec<AchievementDefinition>> {
        let query = AchievementsQuery {
            shop,
            object_id,
            language,
        };

        let query = serde_urlencoded::to_string(&query)
            .context("failed to encode achievements query")?;

        let url = format!("{}/games/achievements?{query}", self.base_url);
        let bytes = self.send_get_request(url).await?;

        serde_json::from_slice(&bytes).with_context(|| {
            let text = String::from_utf8_lossy(&bytes);

            format!("failed to deserialize achievements: {text}")
        })
    }

    /// Sends a GET request
    async fn send_get_request(&self, url: impl AsRef<str>) -> Result<Bytes> {
        let url = url.as_ref();
        trace!("sending GET request to url {url}");

        let req = Request::builder()
            .uri(url)
            .method(Method::GET)
            .header(USER_AGENT, MY_USER_AGENT)
            .header(ACCEPT, "application/json")
            .body(Full::default())
            .context("failed to build GET request")?;

        let response = self
            .client
            .request(req)
            .await
            .context("failed to receive GET response")?;

        Self::error_for_status(response, url).await
    }

    async fn error_for_status<B>(response: Response<B>, url: &str) -> Result<Bytes>
    where
        B: Body,
        B::Error: std::error::Error + Send + Sync + 'static,
    {
        let status = response.status();

        ensure!(
            !(status.is_client_error() || status.is_server_error()),
            "failed with status code {status} when requesting url {url}"
        );

        response
            .into_body()
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .context("failed to extract response bytes")
    }
}
