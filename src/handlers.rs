use std::io::Write;
use std::path::Path;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use tempfile::{Builder, NamedTempFile};
use uuid::Uuid;

use crate::classifier::{classify, Classifier};
use crate::config::UploadSettings;
use crate::error::{ApiError, ClassifierError};
use crate::models::PredictionResponse;

/// Multipart field that carries the scan.
const FILE_FIELD: &str = "file";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::post().to(predict)))
        .service(web::resource("/predict").route(web::post().to(predict)))
        .service(web::resource("/healthcheck").route(web::get().to(healthcheck)));
}

pub async fn healthcheck() -> &'static str {
    "Healthy"
}

pub async fn predict(
    mut payload: Multipart,
    classifier: web::Data<dyn Classifier>,
    settings: web::Data<UploadSettings>,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4();

    let upload = save_upload(&mut payload, &settings).await.map_err(|e| {
        log::warn!("[{}] Rejected upload: {}", request_id, e);
        e
    })?;
    log::debug!("[{}] Saved upload to {}", request_id, upload.path().display());

    let path = upload.path().to_path_buf();
    let classifier = classifier.into_inner();
    let outcome = web::block(move || -> Result<_, ClassifierError> {
        let image = image::io::Reader::open(&path)?
            .with_guessed_format()?
            .decode()?;
        classify(classifier.as_ref(), &image)
    })
    .await;

    if let Err(e) = upload.close() {
        log::warn!("[{}] Failed to remove upload: {}", request_id, e);
    }

    let class = outcome
        .map_err(|e| ApiError::Processing(e.to_string()))?
        .map_err(|e| {
            log::error!("[{}] Prediction failed: {}", request_id, e);
            ApiError::from(e)
        })?;

    log::info!("[{}] Predicted class: {}", request_id, class.label());

    Ok(HttpResponse::Ok().json(PredictionResponse::from(class)))
}

/// Streams the `file` field into a fresh temp file under the upload dir.
///
/// The returned file is deleted when dropped, so every early return here and
/// in the caller cleans up after itself.
async fn save_upload(
    payload: &mut Multipart,
    settings: &UploadSettings,
) -> Result<NamedTempFile, ApiError> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            log::debug!("Unreadable multipart body: {}", e);
            ApiError::MissingFile
        })?;

        let disposition = field.content_disposition();
        if disposition.get_name() != Some(FILE_FIELD) {
            continue;
        }
        // A `file` field without a filename is a plain form value, not an upload.
        let filename = match disposition.get_filename() {
            Some(name) => name.to_string(),
            None => continue,
        };
        if filename.is_empty() {
            return Err(ApiError::EmptyFilename);
        }

        let suffix = extension_suffix(&filename);
        let dir = settings.dir.clone();
        let mut file = web::block(move || {
            Builder::new()
                .prefix("scan-")
                .suffix(&suffix)
                .tempfile_in(dir)
        })
        .await
        .map_err(|e| ApiError::Processing(e.to_string()))??;

        let mut written = 0usize;
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| ApiError::Processing(e.to_string()))?;
            written += data.len();
            if written > settings.max_bytes {
                return Err(ApiError::TooLarge(settings.max_bytes));
            }
            file = web::block(move || file.write_all(&data).map(|_| file))
                .await
                .map_err(|e| ApiError::Processing(e.to_string()))??;
        }

        if written == 0 {
            return Err(ApiError::EmptyFile);
        }

        return Ok(file);
    }

    Err(ApiError::MissingFile)
}

/// Keeps a short alphanumeric extension from the client's filename, if any.
fn extension_suffix(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_from_filename() {
        assert_eq!(extension_suffix("scan.PNG"), ".png");
        assert_eq!(extension_suffix("dir/scan.jpeg"), ".jpeg");
        assert_eq!(extension_suffix("scan"), "");
        assert_eq!(extension_suffix("scan.p%g"), "");
        assert_eq!(extension_suffix("scan.averyverylongext"), "");
    }
}
