use detectview::{
    BoundingBox, Config, Detection, DetectionClient, DetectionResponse, FileCandidate,
};
use image::{ImageBuffer, Rgb};
use tempfile::NamedTempFile;

/// Creates a 100x100 red test image and returns the temp file.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image() -> NamedTempFile {
    let img = ImageBuffer::from_fn(100, 100, |_, _| Rgb([255u8, 0u8, 0u8]));
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// In-memory candidate with a plain-ASCII body, so multipart bodies stay
/// readable for regex matchers.
pub fn make_candidate(name: &str, mime_type: &str) -> FileCandidate {
    FileCandidate::new(name, mime_type, b"not really a png".to_vec())
}

/// Candidate that only claims a size; contents are irrelevant to validation.
pub fn make_sized_candidate(mime_type: &str, size: u64) -> FileCandidate {
    FileCandidate {
        name: "sized.bin".to_string(),
        mime_type: mime_type.to_string(),
        size,
        bytes: Vec::new(),
    }
}

pub fn make_detection(class_name: &str, confidence: f32, bbox: [f32; 4]) -> Detection {
    Detection {
        class_name: class_name.to_string(),
        confidence,
        bbox: BoundingBox::from(bbox),
        class_id: 0,
    }
}

pub fn make_response(detections: Vec<Detection>) -> DetectionResponse {
    DetectionResponse {
        success: true,
        image_url: "/static/result.jpg".to_string(),
        detections,
        processing_time: 0.25,
        image_size: (640, 480),
    }
}

pub fn response_body(response: &DetectionResponse) -> String {
    serde_json::to_string(response).expect("Failed to serialize response")
}

pub fn client_for(origin: &str) -> DetectionClient {
    DetectionClient::new(&Config::default().with_origin(origin)).expect("Failed to build client")
}
