mod capabilities;
mod gallery;
mod health;
mod images;
mod prompts;
mod recordings;
mod sessions;
mod transcriptions;

pub use capabilities::capabilities_handler;
pub use gallery::{gallery_handler, gallery_image_handler};
pub use health::health_handler;
pub use images::create_image_handler;
pub use prompts::{enhance_prompt_handler, validate_prompt_handler, variations_handler};
pub use recordings::record_handler;
pub use sessions::{create_session_handler, reset_session_handler};
pub use transcriptions::transcribe_handler;
