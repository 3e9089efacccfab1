//! Direct-to-storage multipart upload

use crate::{file::base_name, ClientError, FileRequest, PrepareUploadOpts, Result, UploadGrant, UtApi};
use bytes::Bytes;
use futures::{stream, Stream};
use parking_lot::Mutex;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{debug, instrument, warn};

/// Name of the form part carrying the file content
pub const FILE_PART_NAME: &str = "file";

const FILE_PART_MIME: &str = "application/octet-stream";

const CHUNK_SIZE: usize = 64 * 1024;

/// First read failure seen while streaming the file part
type ReadError = Arc<Mutex<Option<io::Error>>>;

impl UtApi {
    /// Upload a local file to the storage endpoint named by `grant`.
    ///
    /// The signed fields go first, then the file as the part named `file`.
    /// The request goes straight to `grant.url` and carries no API key; any
    /// status of 300 or above fails with [`ClientError::Upload`].
    ///
    /// The part length is taken from the file size when the upload starts.
    /// A read failure while streaming, or a file that grows or shrinks before
    /// it has been sent, aborts the request with [`ClientError::FileAccess`].
    #[instrument(skip(self, grant, path), fields(key = %grant.key, path = %path.as_ref().display()))]
    pub async fn upload_file(&self, grant: &UploadGrant, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let read_error = ReadError::default();
        let form = build_form(grant, path, Arc::clone(&read_error)).await?;

        debug!("Posting multipart form to {}", grant.url);
        let response = match self.http().post(&grant.url).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => {
                if let Some(source) = read_error.lock().take() {
                    warn!("Reading {} failed mid-upload: {}", path.display(), source);
                    return Err(ClientError::file_access(path, source));
                }
                return Err(e.into());
            }
        };

        let status = response.status();
        if status.as_u16() >= 300 {
            let body = response.bytes().await?;
            warn!(status = status.as_u16(), "Storage host rejected upload");
            return Err(ClientError::Upload {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Upload accepted");
        Ok(())
    }

    /// Inspect, prepare and upload a local file in one call.
    ///
    /// `opts` supplies the callback and route settings; its `files` are
    /// replaced by the descriptor of `path`. Returns the grant so the caller
    /// can read the resulting file URLs.
    #[instrument(skip(self, path, opts), fields(path = %path.as_ref().display()))]
    pub async fn upload_local_file(
        &self,
        path: impl AsRef<Path>,
        opts: PrepareUploadOpts,
    ) -> Result<UploadGrant> {
        let path = path.as_ref();
        let file = FileRequest::from_path(path).await?;
        let grant = self
            .prepare_upload(PrepareUploadOpts {
                files: vec![file],
                ..opts
            })
            .await?;

        self.upload_file(&grant, path).await?;
        Ok(grant)
    }
}

/// Build the multipart form for a grant, streaming the file content.
async fn build_form(grant: &UploadGrant, path: &Path, read_error: ReadError) -> Result<Form> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| ClientError::file_access(path, e))?;
    let length = file
        .metadata()
        .await
        .map_err(|e| ClientError::file_access(path, e))?
        .len();

    let mut form = Form::new();
    for (name, value) in grant.fields.form_fields() {
        form = form.text(name, value.to_string());
    }

    let body = Body::wrap_stream(file_chunks(file, length, read_error));
    let part = Part::stream_with_length(body, length)
        .file_name(base_name(path))
        .mime_str(FILE_PART_MIME)?;

    Ok(form.part(FILE_PART_NAME, part))
}

/// Stream exactly `length` bytes of `file`, recording the first failure.
fn file_chunks(
    file: tokio::fs::File,
    length: u64,
    read_error: ReadError,
) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
    stream::try_unfold((file, length), move |(mut file, remaining)| {
        let read_error = Arc::clone(&read_error);
        async move {
            let mut buf = vec![0u8; CHUNK_SIZE];
            match file.read(&mut buf).await {
                Ok(0) if remaining == 0 => Ok(None),
                Ok(n) if n > 0 && n as u64 <= remaining => {
                    buf.truncate(n);
                    Ok(Some((Bytes::from(buf), (file, remaining - n as u64))))
                }
                Ok(0) => Err(record(
                    &read_error,
                    io::Error::new(io::ErrorKind::UnexpectedEof, "file shrank during upload"),
                )),
                Ok(_) => Err(record(
                    &read_error,
                    io::Error::new(io::ErrorKind::InvalidData, "file grew during upload"),
                )),
                Err(e) => Err(record(&read_error, e)),
            }
        }
    })
}

fn record(read_error: &ReadError, e: io::Error) -> io::Error {
    read_error
        .lock()
        .get_or_insert_with(|| io::Error::new(e.kind(), e.to_string()));
    e
}
