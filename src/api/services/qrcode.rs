//! 短链接二维码

use std::io::Cursor;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use tracing::{debug, error};

use crate::api::state::AppState;
use crate::errors::{NyooomError, Result};

use super::helpers::error_from_nyooom;

/// Smallest edge of the rendered image in pixels
const QR_MIN_DIMENSION: u32 = 256;

/// Render `data` as a PNG QR code.
pub fn render_qr_png(data: &str) -> Result<Vec<u8>> {
    let code = QrCode::new(data.as_bytes())
        .map_err(|e| NyooomError::validation(format!("Failed to generate QR code: {}", e)))?;

    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| NyooomError::serialization(format!("Failed to encode QR code: {}", e)))?;
    Ok(png)
}

/// GET /qr/{slug}
pub async fn qr_code(
    req: HttpRequest,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> HttpResponse {
    let slug = slug.into_inner();

    match state.db.get_link(&slug).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            debug!("QR code requested for unknown link {}", slug);
            return HttpResponse::build(StatusCode::NOT_FOUND)
                .content_type("text/plain; charset=utf-8")
                .body("Couldn't find the URL you were looking for :(");
        }
        Err(e) => return error_from_nyooom(&format!("Failed to get link {}", slug), &e),
    }

    let short_url = format!("{}/{}", state.base_url(&req), slug);
    match render_qr_png(&short_url) {
        Ok(png) => HttpResponse::Ok()
            .content_type("image/png")
            .insert_header(("Cache-Control", "public, max-age=86400"))
            .body(png),
        Err(e) => {
            error!("QR code for {} failed: {}", short_url, e);
            HttpResponse::InternalServerError().body("Failed to generate QR code")
        }
    }
}
