use std::collections::BTreeMap;

use anyhow::Context;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::collection::EmbedCollection;
use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::json_util::{improve_json_error, parse_id};
use crate::wire::{WireEmbed, to_wire};

/// Channel display name → channel identifier
pub type Channels = BTreeMap<String, ChannelId>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(#[serde(deserialize_with = "parse_id")] pub String);

#[derive(Debug, Clone, Serialize)]
struct SendRequest<'a> {
    channel: &'a str,
    embeds: Vec<WireEmbed<'a>>,
}

/// Blocking client for the remote service that lists channels and posts embeds.
///
/// Every request is attempted exactly once and bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http_client: Client,
    base_url: Url,
    api_key: String,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Could not create HTTP client")?;
        Ok(Self {
            http_client,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, relative_url: &str) -> std::result::Result<Url, String> {
        self.base_url
            .join(relative_url)
            .map_err(|e| format!("Could not create URL for {relative_url}: {e}"))
    }

    fn execute(&self, request: RequestBuilder) -> std::result::Result<String, String> {
        let resp: Response = request
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .map_err(|e| format!("request failed: {}", e.without_url()))?;
        handle_response(resp)
    }

    /// Fetches the channel listing, failing with [`Error::GatewayUnavailable`].
    pub fn fetch_channels(&self) -> Result<Channels> {
        let url = self.endpoint("get_channels").map_err(Error::GatewayUnavailable)?;
        log::debug!("Fetching channels from {url}");

        let text = self
            .execute(self.http_client.get(url))
            .map_err(Error::GatewayUnavailable)?;
        serde_json::from_str(&text).map_err(|e| {
            Error::GatewayUnavailable(format!(
                "unexpected channel listing: {}",
                improve_json_error(&e, &text)
            ))
        })
    }

    /// Like [`Self::fetch_channels`], but degrades to an empty listing.
    pub fn list_channels(&self) -> Channels {
        match self.fetch_channels() {
            Ok(channels) => {
                log::info!("Gateway offers {} channels", channels.len());
                channels
            }
            Err(e) => {
                log::warn!("{e}; continuing without channels");
                Channels::new()
            }
        }
    }

    /// Sends every exportable embed to the given channel.
    ///
    /// Missing channel or nothing to export are rejected before any request is made.
    pub fn send(&self, channel: Option<&str>, collection: &EmbedCollection) -> Result<()> {
        let channel = channel
            .filter(|c| !c.is_empty())
            .ok_or(Error::NoChannelSelected)?;
        let embeds = to_wire(collection);
        if embeds.is_empty() {
            return Err(Error::NothingToSend);
        }

        log::info!("Sending {} embeds to channel {channel:?}", embeds.len());
        let url = self.endpoint("send_embed").map_err(Error::SendFailed)?;
        let body = SendRequest { channel, embeds };
        self.execute(self.http_client.post(url).json(&body))
            .map_err(Error::SendFailed)?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    detail: Option<String>,
    message: Option<String>,
}

fn handle_response(response: Response) -> std::result::Result<String, String> {
    let status: StatusCode = response.status();
    let text: String = response
        .text()
        .map_err(|e| {
            format!(
                "Could not extract text from response with status {status}: {}",
                e.without_url()
            )
        })?;

    if status == StatusCode::OK {
        return Ok(text);
    }

    // Request was not successful
    let message: String = match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(json) => extract_error(json).unwrap_or(text),
        Err(_) if text.trim().is_empty() => String::from("<empty response>"),
        Err(_) => text,
    };

    Err(format!("Request failed with status {status}: {message}"))
}

fn extract_error(err: ErrorResponse) -> Option<String> {
    [err.error, err.detail, err.message]
        .into_iter()
        .flatten()
        .find(|msg| !msg.is_empty())
}
