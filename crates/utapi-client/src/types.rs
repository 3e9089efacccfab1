//! Request and response types for the UploadThing API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Caller-defined identifier attached to a file.
///
/// The API accepts any JSON value here and this client never interprets it.
pub type CustomId = serde_json::Value;

/// Decode `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A file to be uploaded, as described to `/prepareUpload`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRequest {
    /// File name (base name of the local path)
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Content type sniffed from the leading bytes
    #[serde(rename = "type")]
    pub file_type: String,
}

/// Options for `/prepareUpload`
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareUploadOpts {
    /// Files to request grants for
    pub files: Vec<FileRequest>,
    /// URL the service calls once the upload completes
    pub callback_url: String,
    /// Slug passed back to the callback
    pub callback_slug: String,
    /// Route identifiers (e.g. `"pdf"`, `"image"`)
    pub route_config: Vec<String>,
}

impl PrepareUploadOpts {
    /// Request a grant for a single file
    pub fn single(file: FileRequest) -> Self {
        Self {
            files: vec![file],
            ..Default::default()
        }
    }

    /// Set the callback URL
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = url.into();
        self
    }

    /// Set the callback slug
    pub fn with_callback_slug(mut self, slug: impl Into<String>) -> Self {
        self.callback_slug = slug.into();
        self
    }

    /// Add a route identifier
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route_config.push(route.into());
        self
    }
}

/// Signed form fields of an upload grant
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignedFields {
    #[serde(rename = "Content-Type", deserialize_with = "null_as_default")]
    pub content_type: String,
    #[serde(rename = "Content-Disposition", deserialize_with = "null_as_default")]
    pub content_disposition: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bucket: String,
    #[serde(rename = "X-Amz-Algorithm", deserialize_with = "null_as_default")]
    pub algorithm: String,
    #[serde(rename = "X-Amz-Credential", deserialize_with = "null_as_default")]
    pub credential: String,
    #[serde(rename = "X-Amz-Date", deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(rename = "X-Amz-Security-Token", deserialize_with = "null_as_default")]
    pub security_token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(rename = "Policy", deserialize_with = "null_as_default")]
    pub policy: String,
    #[serde(rename = "X-Amz-Signature", deserialize_with = "null_as_default")]
    pub signature: String,
}

impl SignedFields {
    /// Form fields to send, in wire order, with empty values dropped.
    ///
    /// Storage endpoints reject signed fields that are present but empty.
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Content-Type", self.content_type.as_str()),
            ("Content-Disposition", self.content_disposition.as_str()),
            ("bucket", self.bucket.as_str()),
            ("X-Amz-Algorithm", self.algorithm.as_str()),
            ("X-Amz-Credential", self.credential.as_str()),
            ("X-Amz-Date", self.date.as_str()),
            ("X-Amz-Security-Token", self.security_token.as_str()),
            ("key", self.key.as_str()),
            ("Policy", self.policy.as_str()),
            ("X-Amz-Signature", self.signature.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

/// Upload grant returned by `/prepareUpload`, one per requested file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadGrant {
    /// Storage endpoint to POST the form to
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    /// Signed form fields
    #[serde(deserialize_with = "null_as_default")]
    pub fields: SignedFields,
    /// Storage key of the file
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    /// Content-Disposition the stored object is served with
    #[serde(deserialize_with = "null_as_default")]
    pub content_disposition: String,
    /// Public file URL
    #[serde(deserialize_with = "null_as_default")]
    pub file_url: String,
    /// App-scoped file URL
    #[serde(deserialize_with = "null_as_default")]
    pub app_url: String,
    /// UploadThing file-system URL
    #[serde(deserialize_with = "null_as_default")]
    pub ufs_url: String,
    /// Token for polling the upload status
    #[serde(deserialize_with = "null_as_default")]
    pub polling_jwt: String,
    /// Endpoint reporting when the upload has been processed
    #[serde(deserialize_with = "null_as_default")]
    pub polling_url: String,
    /// File name as registered with the service
    #[serde(deserialize_with = "null_as_default")]
    pub file_name: String,
    /// Content type as registered with the service
    #[serde(deserialize_with = "null_as_default")]
    pub file_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<CustomId>,
}

/// Options for `/deleteFiles`
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFilesOpts {
    /// Keys of the files to delete
    pub file_keys: Vec<String>,
}

impl DeleteFilesOpts {
    /// Delete the given keys
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            file_keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of `/deleteFiles`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteFilesResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub deleted_count: u64,
}

/// A single rename
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameFileOpt {
    /// New display name
    pub new_name: String,
    /// Key of the file to rename
    pub file_key: String,
}

impl RenameFileOpt {
    pub fn new(file_key: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            new_name: new_name.into(),
            file_key: file_key.into(),
        }
    }
}

/// Request body of `/renameFiles`
#[derive(Clone, Debug, Serialize)]
pub(crate) struct RenameRequest<'a> {
    pub updates: &'a [RenameFileOpt],
}

/// Result of `/renameFiles`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenameFilesResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub renamed_count: u64,
}

/// Options for `/listFiles`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ListFilesOpts {
    /// Maximum files to return
    pub limit: u64,
    /// Files to skip
    pub offset: u64,
}

/// A stored file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub size: u64,
    /// Upload time, milliseconds since the Unix epoch
    #[serde(deserialize_with = "null_as_default")]
    pub uploaded_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<CustomId>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

impl FileRecord {
    /// Upload time as a UTC timestamp
    pub fn uploaded_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.uploaded_at)
    }
}

/// Result of `/listFiles`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListFilesResponse {
    /// Whether more files exist past this page
    #[serde(deserialize_with = "null_as_default")]
    pub has_more: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub files: Vec<FileRecord>,
}

/// Result of `/getUsageInfo`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsageInfo {
    /// Bytes stored across all apps
    #[serde(deserialize_with = "null_as_default")]
    pub total_bytes: u64,
    /// Bytes stored by this app
    #[serde(deserialize_with = "null_as_default")]
    pub app_total_bytes: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub files_uploaded: u64,
    /// Configured storage limit
    #[serde(deserialize_with = "null_as_default")]
    pub limit_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_fields_order_and_skip_empty() {
        let fields = SignedFields {
            content_type: "application/pdf".into(),
            bucket: "uploadthing".into(),
            algorithm: "AWS4-HMAC-SHA256".into(),
            key: "abc-123.pdf".into(),
            policy: "eyJ...".into(),
            signature: "deadbeef".into(),
            ..Default::default()
        };

        let names: Vec<_> = fields.form_fields().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec!["Content-Type", "bucket", "X-Amz-Algorithm", "key", "Policy", "X-Amz-Signature"]
        );
    }

    #[test]
    fn test_prepare_upload_opts_field_names() {
        let opts = PrepareUploadOpts::single(FileRequest {
            name: "abc.pdf".into(),
            size: 1024,
            file_type: "application/pdf".into(),
        })
        .with_callback_url("https://example.com/cb")
        .with_callback_slug("abc.pdf")
        .with_route("pdf");

        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(
            value,
            json!({
                "files": [{"name": "abc.pdf", "size": 1024, "type": "application/pdf"}],
                "callbackUrl": "https://example.com/cb",
                "callbackSlug": "abc.pdf",
                "routeConfig": ["pdf"]
            })
        );
    }

    #[test]
    fn test_grant_tolerates_missing_and_unknown_fields() {
        let grant: UploadGrant = serde_json::from_value(json!({
            "url": "https://bucket.s3.amazonaws.com",
            "fields": {"key": "k1", "X-Amz-Signature": "sig", "unexpected": "x"},
            "key": "k1",
            "customId": 42,
            "somethingNew": true
        }))
        .unwrap();

        assert_eq!(grant.url, "https://bucket.s3.amazonaws.com");
        assert_eq!(grant.fields.key, "k1");
        assert_eq!(grant.fields.policy, "");
        assert_eq!(grant.custom_id, Some(json!(42)));
        assert_eq!(grant.ufs_url, "");
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let grants: Vec<UploadGrant> = serde_json::from_str(
            r#"[{"url":"https://s3","fields":{"key":"k","X-Amz-Security-Token":null},"key":"k","pollingJwt":null,"customId":null}]"#,
        )
        .unwrap();
        let grant = &grants[0];
        assert_eq!(grant.fields.security_token, "");
        assert_eq!(grant.polling_jwt, "");
        assert!(grant.custom_id.is_none());
        assert_eq!(grant.fields.form_fields(), vec![("key", "k")]);

        let page: ListFilesResponse = serde_json::from_str(
            r#"{"hasMore":null,"files":[{"id":"f1","key":"k1","name":"a.txt","size":null,"uploadedAt":null,"status":null}]}"#,
        )
        .unwrap();
        assert!(!page.has_more);
        assert_eq!(page.files[0].status, "");
        assert_eq!(page.files[0].size, 0);

        let grant: UploadGrant = serde_json::from_value(json!({"fields": null})).unwrap();
        assert_eq!(grant.fields, SignedFields::default());
    }

    #[test]
    fn test_null_custom_id_is_absent() {
        let record: FileRecord =
            serde_json::from_value(json!({"id": "f1", "customId": null})).unwrap();
        assert!(record.custom_id.is_none());
    }

    #[test]
    fn test_rename_request_wraps_updates() {
        let updates = vec![RenameFileOpt::new("y.md", "x.md")];
        let value = serde_json::to_value(RenameRequest { updates: &updates }).unwrap();
        assert_eq!(value, json!({"updates": [{"newName": "x.md", "fileKey": "y.md"}]}));
    }

    #[test]
    fn test_uploaded_at_utc() {
        let record = FileRecord {
            uploaded_at: 1_700_000_000_000,
            ..Default::default()
        };
        assert_eq!(
            record.uploaded_at_utc().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }
}
