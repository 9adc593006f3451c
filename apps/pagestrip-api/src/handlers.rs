//! HTTP handlers for the pagestrip API

use std::io::{self, Read, Seek};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use pagestrip_core::{remove_page, ArchiveBuilder, PageStripError};

use crate::error::ApiError;
use crate::intake::{self, Upload};
use crate::state::{AppState, DeliveryMode};
use crate::stream::{ChannelSink, ChunkSender, CHANNEL_CAPACITY};

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Landing page with the upload form
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

/// Terminal state of a streamed request, logged so the two failure
/// shapes stay distinguishable even though a mid-stream client only
/// sees a truncated download.
#[derive(Debug)]
enum StreamOutcome {
    Done,
    AbortedMidStream,
}

/// Remove one page from every uploaded PDF and deliver the results as a
/// zip archive.
pub async fn remove_page_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let intake = intake::collect(multipart, &state.limits).await?;

    // Validation is eager: nothing is processed past this point unless
    // the page number and the batch are both acceptable.
    let page = intake.target_page()?;
    let uploads = intake.uploads;
    if uploads.is_empty() {
        return Err(ApiError::NoFilesUploaded);
    }

    tracing::info!(
        files = uploads.len(),
        page,
        delivery = ?state.delivery,
        "processing remove-page batch"
    );

    let filename = format!("processed-{}.zip", Utc::now().timestamp_millis());

    match state.delivery {
        DeliveryMode::Stream => Ok(stream_archive(uploads, page, &filename)),
        DeliveryMode::TempFile => buffered_archive(uploads, page, &filename).await,
    }
}

/// Streaming profile: headers go out now, archive bytes follow as each
/// document is processed. A failure from here on cannot change the
/// status code; the body stream yields an error and the connection is
/// torn down.
fn stream_archive(uploads: Vec<Upload>, page: u32, filename: &str) -> Response {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    let abort_tx = tx.clone();
    tokio::task::spawn_blocking(move || {
        let outcome = match drive_archive(uploads, page, tx) {
            Ok(()) => StreamOutcome::Done,
            Err(err) => {
                tracing::error!("archive failed after headers were sent: {}", err);
                let _ = abort_tx.blocking_send(Err(io::Error::other(err.to_string())));
                StreamOutcome::AbortedMidStream
            }
        };
        tracing::info!(?outcome, "remove-page stream finished");
    });

    zip_response(filename, Body::from_stream(ReceiverStream::new(rx)))
}

/// Process every upload in order, appending each result to the archive
/// as soon as it is ready. One decode failure fails the whole batch.
fn drive_archive(uploads: Vec<Upload>, page: u32, tx: ChunkSender) -> Result<(), PageStripError> {
    let mut builder = ArchiveBuilder::new(ChannelSink::new(tx));

    for upload in uploads {
        let processed = remove_page(&upload.content, page)?;
        let entry_name = format!("modified-{}", upload.original_name);
        builder.append(&entry_name, processed.bytes())?;
    }

    builder.finalize()?.finish()?;
    Ok(())
}

/// Temp-file profile: the archive is built to completion before the
/// response starts, so processing failures still map to JSON errors.
/// The anonymous file is unlinked when the handle drops.
async fn buffered_archive(
    uploads: Vec<Upload>,
    page: u32,
    filename: &str,
) -> Result<Response, ApiError> {
    let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, PageStripError> {
        let mut builder = ArchiveBuilder::new(tempfile::tempfile()?);

        for upload in &uploads {
            let processed = remove_page(&upload.content, page)?;
            let entry_name = format!("modified-{}", upload.original_name);
            builder.append(&entry_name, processed.bytes())?;
        }

        let mut file = builder.finalize()?;
        file.rewind()?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        Ok(buf)
    })
    .await
    .map_err(|e| ApiError::Internal(e.into()))??;

    Ok(zip_response(filename, Body::from(bytes)))
}

fn zip_response(filename: &str, body: Body) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        body,
    )
        .into_response()
}
