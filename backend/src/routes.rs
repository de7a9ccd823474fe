use actix_multipart::Multipart;
use actix_web::error::ErrorBadRequest;
use actix_web::{web, Error, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use log::{error, info};
use serde::Serialize;
use serde_json::json;
use std::io::Write;

use crate::config::UploadMode;
use crate::echo;
use crate::extractor::service::ReceiptExtractor;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// One uploaded multipart `file` part, fully buffered.
struct UploadedImage {
    data: Vec<u8>,
    media_type: Option<String>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, mode: &UploadMode) {
    let upload = web::resource("/get-img-data").route(web::get().to(upload_form));
    let upload = match mode {
        UploadMode::Echo => upload.route(web::post().to(echo_upload)),
        UploadMode::Extract => upload.route(web::post().to(extract_upload)),
    };

    cfg.service(web::resource("/").route(web::get().to(liveness)))
        .service(upload);
}

async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "server on" }))
}

async fn upload_form() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(echo::UPLOAD_FORM_HTML)
}

/// Buffer the `file` part into memory. Other parts are skipped; a request
/// with no `file` part is a client error. No size limit is enforced.
async fn read_file_part(mut payload: Multipart) -> Result<UploadedImage, Error> {
    while let Ok(Some(mut field)) = payload.try_next().await {
        if field.name() != Some("file") {
            continue;
        }

        let media_type = field.content_type().map(|mime| mime.to_string());
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let bytes = chunk?;
            data.write_all(&bytes)?;
        }

        return Ok(UploadedImage { data, media_type });
    }

    Err(ErrorBadRequest("missing multipart field \"file\""))
}

async fn echo_upload(payload: Multipart) -> Result<HttpResponse, Error> {
    let upload = read_file_part(payload).await?;
    info!(
        "Echoing uploaded image ({} bytes, declared type {:?})",
        upload.data.len(),
        upload.media_type
    );

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(echo::render_echo_page(&upload.data)))
}

async fn extract_upload(
    extractor: web::Data<ReceiptExtractor>,
    payload: Multipart,
) -> Result<HttpResponse, Error> {
    let upload = read_file_part(payload).await?;
    info!(
        "Extracting receipt fields from upload ({} bytes, declared type {:?})",
        upload.data.len(),
        upload.media_type
    );

    match extractor.extract(&upload.data).await {
        Ok(fields) => Ok(HttpResponse::Ok().json(fields)),
        Err(e) => {
            let error_msg = e.to_string();
            error!("Receipt extraction failed: {}", error_msg);
            // Failure keeps HTTP 200; clients read the `error` key.
            Ok(HttpResponse::Ok().json(ErrorResponse { error: error_msg }))
        }
    }
}
