//! Main client implementation

use crate::{
    codec, Config, ClientError, Result,
    types::*,
};
use bytes::Bytes;
use reqwest::{header, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// Header carrying the secret API key
pub const API_KEY_HEADER: &str = "x-uploadthing-api-key";

/// UploadThing API client
#[derive(Clone, Debug)]
pub struct UtApi {
    config: Config,
    http: Client,
    /// Headers attached to every API call, built once from the config
    api_headers: header::HeaderMap,
}

impl UtApi {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header_value(&config.user_agent)?);

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ClientError::Network)?;

        Self::with_http_client(config, http)
    }

    /// Create a client on top of an existing connection pool
    pub fn with_http_client(config: Config, http: Client) -> Result<Self> {
        config.validate()?;

        let mut api_headers = header::HeaderMap::new();
        api_headers.insert(API_KEY_HEADER, header_value(&config.api_key)?);
        api_headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(Self {
            config,
            http,
            api_headers,
        })
    }

    /// Create with an API key against the default host
    pub fn with_api_key(api_key: &str) -> Result<Self> {
        Self::new(Config::new(api_key))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    // ==================== File Operations ====================

    /// Request an upload grant for the first file in `opts`
    #[instrument(skip(self, opts), fields(files = opts.files.len()))]
    pub async fn prepare_upload(&self, opts: PrepareUploadOpts) -> Result<UploadGrant> {
        codec::first(self.prepare_uploads(opts).await?)
    }

    /// Request upload grants for every file in `opts`, in request order
    #[instrument(skip(self, opts), fields(files = opts.files.len()))]
    pub async fn prepare_uploads(&self, opts: PrepareUploadOpts) -> Result<Vec<UploadGrant>> {
        self.call("/prepareUpload", Some(codec::encode(&opts)?)).await
    }

    /// Delete files by key
    #[instrument(skip(self, opts), fields(keys = opts.file_keys.len()))]
    pub async fn delete_files(&self, opts: DeleteFilesOpts) -> Result<DeleteFilesResponse> {
        self.call("/deleteFiles", Some(codec::encode(&opts)?)).await
    }

    /// Rename files by key
    #[instrument(skip(self, updates), fields(updates = updates.len()))]
    pub async fn rename_files(&self, updates: &[RenameFileOpt]) -> Result<RenameFilesResponse> {
        let body = codec::encode(&RenameRequest { updates })?;
        self.call("/renameFiles", Some(body)).await
    }

    /// List one page of stored files
    #[instrument(skip(self))]
    pub async fn list_files(&self, opts: ListFilesOpts) -> Result<ListFilesResponse> {
        self.call("/listFiles", Some(codec::encode(&opts)?)).await
    }

    /// Get storage usage for the account and app
    #[instrument(skip(self))]
    pub async fn get_usage_info(&self) -> Result<UsageInfo> {
        self.call("/getUsageInfo", None).await
    }

    // ==================== Helper Methods ====================

    async fn call<T: DeserializeOwned>(&self, path: &str, body: Option<Vec<u8>>) -> Result<T> {
        let response = self.send(path, Method::POST, body).await?;
        codec::decode(&response)
    }

    /// Send a raw API request and return the buffered response body.
    ///
    /// Attaches the API-key and JSON content-type headers. Any status other
    /// than 200 fails with [`ClientError::Transport`] carrying the body verbatim.
    pub async fn send(&self, path: &str, method: Method, body: Option<Vec<u8>>) -> Result<Bytes> {
        let url = format!("{}{}", self.config.base_url(), path);

        let mut req = self
            .http
            .request(method.clone(), &url)
            .headers(self.api_headers.clone());

        if let Some(data) = body {
            req = req.body(data);
        }

        debug!("Sending {} request to {}", method, url);
        let response = req.send().await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "API request failed");
            return Err(ClientError::Transport {
                status: status.as_u16(),
                body: bytes,
            });
        }

        Ok(bytes)
    }
}

fn header_value(value: &str) -> Result<header::HeaderValue> {
    header::HeaderValue::from_str(value)
        .map_err(|e| ClientError::Config(format!("invalid header value: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_headers() {
        let client = UtApi::with_api_key("sk_live_123").unwrap();

        assert_eq!(client.api_headers[API_KEY_HEADER], "sk_live_123");
        assert_eq!(client.api_headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(client.config().base_url(), "https://api.uploadthing.com/v6");
    }

    #[test]
    fn test_rejects_unprintable_api_key() {
        let result = UtApi::with_api_key("sk_\nlive");
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_rejects_invalid_host() {
        let result = UtApi::new(Config::new("sk").with_host("localhost:3000"));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
