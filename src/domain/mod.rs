mod audio_format;
mod content_rating;
mod generated_image;
mod image_spec;
mod session;
mod verdicts;

pub use audio_format::{AudioFormat, SUPPORTED_FORMATS, UPLOAD_FORMATS};
pub use content_rating::ContentRating;
pub use generated_image::GeneratedImageRecord;
pub use image_spec::{ImageQuality, ImageSize};
pub use session::Session;
pub use verdicts::{ImageVerdict, TextVerdict};
