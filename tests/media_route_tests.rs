use agenda::config::StorageConfig;
use agenda_schema::{ApiErrorBody, MessageBody};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

const BOUNDARY: &str = "agenda-test-boundary";

async fn build_app(tag: &str, max_upload_bytes: usize) -> (Router, StorageConfig) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let root = std::env::temp_dir().join(format!(
        "agenda-media-{tag}-{}-{nanos}",
        std::process::id()
    ));
    let storage = StorageConfig {
        contacts_path: root.join("contacts.csv"),
        images_dir: root.join("images"),
        max_upload_bytes,
    };
    let contacts = agenda::store::spawn(storage.contacts_path.clone())
        .await
        .expect("failed to open contact store");
    let state = agenda::server::AgendaState::new(contacts, &storage);
    (agenda::server::agenda_router(state), storage)
}

fn cleanup(storage: &StorageConfig) {
    if let Some(root) = storage.contacts_path.parent() {
        std::fs::remove_dir_all(root).ok();
    }
}

/// 4x2 image: left half black, right half white.
fn sample_png() -> Vec<u8> {
    let img = RgbImage::from_fn(4, 2, |x, _| {
        if x < 2 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn multipart_body(field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(query: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/images{query}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("content-length", body.len())
        .body(Body::from(body))
        .expect("failed to build request")
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, body.to_vec())
}

#[tokio::test]
async fn qr_route_returns_png_and_keeps_a_copy() {
    let (app, storage) = build_app("qr", 1024 * 1024).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/qr?url=https%3A%2F%2Fexample.com%2Fcat.png")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "image/png");
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(body.starts_with(b"\x89PNG\r\n\x1a\n"));

    let saved = std::fs::read(storage.images_dir.join("qr_code.png")).unwrap();
    assert_eq!(saved, body.to_vec());

    // missing / empty url
    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/qr")
            .body(Body::empty())
            .expect("failed to build request"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/qr?url=")
            .body(Body::empty())
            .expect("failed to build request"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ApiErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.inner.code, "INVALID_QR_DATA");

    cleanup(&storage);
}

#[tokio::test]
async fn image_upload_crops_flips_and_colorizes() {
    let (app, storage) = build_app("upload", 1024 * 1024).await;

    let (status, body) = send(
        &app,
        upload_request(
            "?crop=1,0,4,1&fliph=true&colorize=true",
            multipart_body("image", "../sneaky/pic.png", &sample_png()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let msg: MessageBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg.message, "Image processed and saved");

    let saved = image::open(storage.images_dir.join("pic.png"))
        .unwrap()
        .to_rgb8();
    assert_eq!((saved.width(), saved.height()), (3, 1));
    // Crop keeps x = 1..4 (black, white, white); flipped: white, white, black.
    assert_eq!(saved.get_pixel(0, 0).0, [255, 0, 0]);
    assert_eq!(saved.get_pixel(1, 0).0, [255, 0, 0]);
    assert_eq!(saved.get_pixel(2, 0).0, [0, 0, 255]);

    cleanup(&storage);
}

#[tokio::test]
async fn image_upload_without_options_keeps_image() {
    let (app, storage) = build_app("plain", 1024 * 1024).await;

    let (status, _) = send(
        &app,
        upload_request("", multipart_body("image", "plain.png", &sample_png())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let saved = image::open(storage.images_dir.join("plain.png"))
        .unwrap()
        .to_rgb8();
    assert_eq!((saved.width(), saved.height()), (4, 2));
    assert_eq!(saved.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(saved.get_pixel(3, 1).0, [255, 255, 255]);

    cleanup(&storage);
}

#[tokio::test]
async fn image_upload_rejects_bad_input() {
    let (app, storage) = build_app("bad", 1024).await;

    // crop outside the image
    let (status, body) = send(
        &app,
        upload_request(
            "?crop=0,0,10,10",
            multipart_body("image", "a.png", &sample_png()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ApiErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.inner.code, "INVALID_CROP");

    // malformed crop box
    let (status, _) = send(
        &app,
        upload_request("?crop=1,2", multipart_body("image", "a.png", &sample_png())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // not an image
    let (status, body) = send(
        &app,
        upload_request("", multipart_body("image", "a.png", b"definitely not a png")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ApiErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.inner.code, "INVALID_IMAGE");

    // wrong field name
    let (status, body) = send(
        &app,
        upload_request("", multipart_body("file", "a.png", &sample_png())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ApiErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.inner.code, "MISSING_IMAGE");

    // over the configured limit
    let (status, body) = send(
        &app,
        upload_request("", multipart_body("image", "big.png", &vec![0u8; 4096])),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let err: ApiErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.inner.code, "UPLOAD_TOO_LARGE");

    // rejected uploads leave nothing behind
    let saved = std::fs::read_dir(&storage.images_dir)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(saved, 0);

    cleanup(&storage);
}
