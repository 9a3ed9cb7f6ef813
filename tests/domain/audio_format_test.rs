use skagen::domain::{AudioFormat, SUPPORTED_FORMATS, UPLOAD_FORMATS};

#[test]
fn given_known_extensions_then_formats_parse() {
    assert_eq!(AudioFormat::from_extension("wav"), Some(AudioFormat::Wav));
    assert_eq!(AudioFormat::from_extension(".MP3"), Some(AudioFormat::Mp3));
    assert_eq!(AudioFormat::from_extension("m4a"), Some(AudioFormat::M4a));
    assert_eq!(AudioFormat::from_extension("xyz"), None);
}

#[test]
fn given_filenames_then_extension_wins() {
    assert_eq!(
        AudioFormat::from_filename("voice memo.final.OGG"),
        Some(AudioFormat::Ogg)
    );
    assert_eq!(AudioFormat::from_filename("no-extension"), None);
}

#[test]
fn given_mime_aliases_then_formats_parse() {
    assert_eq!(AudioFormat::from_mime("audio/x-wav"), Some(AudioFormat::Wav));
    assert_eq!(AudioFormat::from_mime("audio/mpeg"), Some(AudioFormat::Mp3));
    assert_eq!(AudioFormat::from_mime("video/mp4"), None);
}

#[test]
fn upload_surface_accepts_four_of_six_supported_formats() {
    assert_eq!(UPLOAD_FORMATS.len(), 4);
    assert_eq!(SUPPORTED_FORMATS.len(), 6);
    assert!(AudioFormat::Wav.accepted_for_upload());
    assert!(AudioFormat::Ogg.accepted_for_upload());
    assert!(!AudioFormat::Flac.accepted_for_upload());
    assert!(!AudioFormat::Aac.accepted_for_upload());
}
