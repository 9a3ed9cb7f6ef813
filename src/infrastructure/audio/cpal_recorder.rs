use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, SampleRate, StreamConfig};
use hound::{WavSpec, WavWriter};

use crate::application::ports::{AudioCaptureError, AudioRecorder};

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Fixed-duration microphone capture via the default input device. The
/// device is probed once at construction; when none is found the recording
/// path stays disabled for the life of the process.
pub struct CpalAudioRecorder {
    device: Option<Device>,
    sample_rate: u32,
}

impl CpalAudioRecorder {
    pub fn new(sample_rate: u32) -> Self {
        let device = cpal::default_host().default_input_device();
        match &device {
            Some(d) => {
                tracing::info!(
                    device = %d.name().unwrap_or_else(|_| "unknown".to_string()),
                    sample_rate,
                    "Audio input device found"
                );
            }
            None => {
                tracing::warn!("No audio input device available, recording disabled");
            }
        }
        Self {
            device,
            sample_rate,
        }
    }
}

#[async_trait]
impl AudioRecorder for CpalAudioRecorder {
    fn is_available(&self) -> bool {
        self.device.is_some()
    }

    async fn record(&self, duration: Duration) -> Result<Vec<u8>, AudioCaptureError> {
        let device = self
            .device
            .clone()
            .ok_or(AudioCaptureError::DeviceUnavailable)?;
        let sample_rate = self.sample_rate;

        // cpal streams are not Send; the whole capture runs on a blocking
        // thread and only the encoded WAV crosses back.
        tokio::task::spawn_blocking(move || capture_wav(&device, sample_rate, duration))
            .await
            .map_err(|e| AudioCaptureError::CaptureFailed(format!("capture task: {}", e)))?
    }
}

fn capture_wav(
    device: &Device,
    sample_rate: u32,
    duration: Duration,
) -> Result<Vec<u8>, AudioCaptureError> {
    let default_config = device
        .default_input_config()
        .map_err(|e| AudioCaptureError::CaptureFailed(format!("device config: {}", e)))?;
    let sample_format = default_config.sample_format();
    let source_channels = default_config.channels();

    let stream_config = StreamConfig {
        channels: source_channels,
        sample_rate: SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let samples: Arc<Mutex<Vec<i16>>> = Arc::new(Mutex::new(Vec::new()));

    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(device, &stream_config, Arc::clone(&samples)),
        SampleFormat::I16 => build_stream::<i16>(device, &stream_config, Arc::clone(&samples)),
        SampleFormat::U16 => build_stream::<u16>(device, &stream_config, Arc::clone(&samples)),
        other => {
            return Err(AudioCaptureError::CaptureFailed(format!(
                "unsupported sample format: {:?}",
                other
            )));
        }
    }?;

    stream
        .play()
        .map_err(|e| AudioCaptureError::CaptureFailed(format!("stream start: {}", e)))?;

    tracing::debug!(seconds = duration.as_secs_f32(), "Recording audio");
    std::thread::sleep(duration);
    drop(stream);

    let captured = samples
        .lock()
        .map_err(|_| AudioCaptureError::CaptureFailed("capture buffer poisoned".to_string()))?;

    if captured.is_empty() {
        return Err(AudioCaptureError::CaptureFailed(
            "no samples captured".to_string(),
        ));
    }

    let mono = downmix(&captured, source_channels as usize);
    encode_wav(&mono, sample_rate)
}

fn build_stream<S>(
    device: &Device,
    config: &StreamConfig,
    samples: Arc<Mutex<Vec<i16>>>,
) -> Result<cpal::Stream, AudioCaptureError>
where
    S: cpal::SizedSample,
    f32: cpal::FromSample<S>,
{
    device
        .build_input_stream(
            config,
            move |data: &[S], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buffer) = samples.lock() {
                    for &sample in data {
                        let value: f32 = cpal::Sample::from_sample(sample);
                        buffer.push((value.clamp(-1.0, 1.0) * i16::MAX as f32) as i16);
                    }
                }
            },
            |err| {
                tracing::error!(error = %err, "Audio input stream error");
            },
            None,
        )
        .map_err(|e| AudioCaptureError::CaptureFailed(format!("stream build: {}", e)))
}

fn downmix(samples: &[i16], channels: usize) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, AudioCaptureError> {
    let spec = WavSpec {
        channels: CHANNELS,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };

    let mut wav_bytes: Vec<u8> = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut wav_bytes), spec)
            .map_err(|e| AudioCaptureError::EncodingFailed(format!("writer: {}", e)))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| AudioCaptureError::EncodingFailed(format!("sample: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| AudioCaptureError::EncodingFailed(format!("finalize: {}", e)))?;
    }

    tracing::info!(
        samples = samples.len(),
        bytes = wav_bytes.len(),
        "Recording packed into WAV container"
    );

    Ok(wav_bytes)
}
