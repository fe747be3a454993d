//! Microphone track adapter using cpal
//!
//! Captures mono i16 PCM at the device's default rate and flushes it as
//! a single WAV chunk on stop. The cpal stream lives on its own thread
//! because `cpal::Stream` is not `Send`.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use tokio::time::{sleep, Duration as TokioDuration};

use crate::application::ports::{DeviceError, RecordError, TrackRecorder};
use crate::domain::device::{DeviceDescriptor, DeviceKind};
use crate::domain::media::{MediaChunk, MediaKind};

/// List available microphones. Blocking; call from a blocking context.
pub fn list_microphones() -> Result<Vec<DeviceDescriptor>, DeviceError> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| DeviceError::EnumerationFailed(e.to_string()))?;

    let mut out = Vec::new();
    for device in devices {
        // A device without a queryable name is skipped rather than fatal
        if let Ok(name) = device.name() {
            out.push(DeviceDescriptor::new(
                name.clone(),
                DeviceKind::Microphone,
                name,
            ));
        }
    }
    Ok(out)
}

/// Resolve a microphone by id (its cpal name); empty id selects the default
fn resolve_input_device(device_id: &str) -> Result<cpal::Device, DeviceError> {
    let host = cpal::default_host();
    if device_id.is_empty() {
        return host
            .default_input_device()
            .ok_or_else(|| DeviceError::Unavailable("no default microphone".to_string()));
    }

    let devices = host
        .input_devices()
        .map_err(|e| DeviceError::EnumerationFailed(e.to_string()))?;
    for device in devices {
        if device.name().map(|n| n == device_id).unwrap_or(false) {
            return Ok(device);
        }
    }
    Err(DeviceError::Unavailable(format!(
        "microphone '{}' not found",
        device_id
    )))
}

/// One exclusive microphone grant
///
/// Opening verifies the device exists; `start` spawns the stream thread
/// and `stop` drains the accumulated samples into a WAV container.
pub struct CpalAudioTrack {
    device_id: String,
    /// Recorded samples (mono, i16, at device sample rate)
    audio_buffer: Arc<StdMutex<Vec<i16>>>,
    device_sample_rate: Arc<AtomicU32>,
    is_recording: Arc<AtomicBool>,
}

impl CpalAudioTrack {
    /// Acquire the microphone grant. Blocking; call from a blocking context.
    pub fn open(device_id: &str) -> Result<Self, DeviceError> {
        // Resolve now so a missing device fails the grant, not the start
        let device = resolve_input_device(device_id)?;
        let resolved_id = device.name().unwrap_or_else(|_| device_id.to_string());

        Ok(Self {
            device_id: resolved_id,
            audio_buffer: Arc::new(StdMutex::new(Vec::new())),
            device_sample_rate: Arc::new(AtomicU32::new(0)),
            is_recording: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Mix interleaved frames down to mono
    fn to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }
        samples
            .chunks(channels as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    /// Encode PCM samples into an in-memory WAV file
    fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, RecordError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| RecordError::FlushFailed(e.to_string()))?;
            for &sample in samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| RecordError::FlushFailed(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| RecordError::FlushFailed(e.to_string()))?;
        }
        Ok(cursor.into_inner())
    }
}

#[async_trait]
impl TrackRecorder for CpalAudioTrack {
    fn media_kind(&self) -> MediaKind {
        MediaKind::Audio
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    async fn start(&mut self) -> Result<(), RecordError> {
        if self.is_recording.load(Ordering::SeqCst) {
            return Err(RecordError::StartFailed(
                "Recording already in progress".to_string(),
            ));
        }

        {
            let mut buffer = self.audio_buffer.lock().map_err(|_| {
                RecordError::StartFailed("Audio buffer lock poisoned".to_string())
            })?;
            buffer.clear();
        }
        self.is_recording.store(true, Ordering::SeqCst);

        let device_id = self.device_id.clone();
        let audio_buffer = Arc::clone(&self.audio_buffer);
        let device_sample_rate = Arc::clone(&self.device_sample_rate);
        let is_recording = Arc::clone(&self.is_recording);

        // Stream thread; not spawn_blocking since we never await it
        std::thread::spawn(move || {
            let device = match resolve_input_device(&device_id) {
                Ok(d) => d,
                Err(_) => {
                    is_recording.store(false, Ordering::SeqCst);
                    return;
                }
            };

            let supported = match device.default_input_config() {
                Ok(c) => c,
                Err(_) => {
                    is_recording.store(false, Ordering::SeqCst);
                    return;
                }
            };
            let sample_format = supported.sample_format();
            let config: cpal::StreamConfig = supported.into();
            let channels = config.channels;
            device_sample_rate.store(config.sample_rate.0, Ordering::SeqCst);

            let buffer_clone = Arc::clone(&audio_buffer);
            let recording_clone = Arc::clone(&is_recording);

            let stream_result = match sample_format {
                SampleFormat::I16 => device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if recording_clone.load(Ordering::SeqCst) {
                            let mono = CpalAudioTrack::to_mono(data, channels);
                            if let Ok(mut buffer) = buffer_clone.lock() {
                                buffer.extend_from_slice(&mono);
                            }
                        }
                    },
                    |err| eprintln!("Audio stream error: {}", err),
                    None,
                ),

                SampleFormat::F32 => {
                    let buffer_clone = Arc::clone(&audio_buffer);
                    let recording_clone = Arc::clone(&is_recording);

                    device.build_input_stream(
                        &config,
                        move |data: &[f32], _: &cpal::InputCallbackInfo| {
                            if recording_clone.load(Ordering::SeqCst) {
                                let i16_data: Vec<i16> =
                                    data.iter().map(|&s| (s * 32767.0) as i16).collect();
                                let mono = CpalAudioTrack::to_mono(&i16_data, channels);
                                if let Ok(mut buffer) = buffer_clone.lock() {
                                    buffer.extend_from_slice(&mono);
                                }
                            }
                        },
                        |err| eprintln!("Audio stream error: {}", err),
                        None,
                    )
                }

                _ => {
                    is_recording.store(false, Ordering::SeqCst);
                    return;
                }
            };

            let stream = match stream_result {
                Ok(s) => s,
                Err(_) => {
                    is_recording.store(false, Ordering::SeqCst);
                    return;
                }
            };

            if stream.play().is_err() {
                is_recording.store(false, Ordering::SeqCst);
                return;
            }

            while is_recording.load(Ordering::SeqCst) {
                std::thread::sleep(std::time::Duration::from_millis(50));
            }
            drop(stream);
        });

        // Give the thread a moment to start
        sleep(TokioDuration::from_millis(50)).await;

        if !self.is_recording.load(Ordering::SeqCst) {
            return Err(RecordError::StartFailed(
                "Failed to start microphone stream".to_string(),
            ));
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<Vec<MediaChunk>, RecordError> {
        self.is_recording.store(false, Ordering::SeqCst);

        // Let the stream thread flush its last callback and exit
        sleep(TokioDuration::from_millis(100)).await;

        let sample_rate = self.device_sample_rate.load(Ordering::SeqCst);
        let samples = {
            let mut buffer = self.audio_buffer.lock().map_err(|_| {
                RecordError::FlushFailed("Audio buffer lock poisoned".to_string())
            })?;
            std::mem::take(&mut *buffer)
        };

        // No data is a degraded track, not a failure
        if samples.is_empty() || sample_rate == 0 {
            return Ok(Vec::new());
        }

        let wav = tokio::task::spawn_blocking(move || Self::encode_wav(&samples, sample_rate))
            .await
            .map_err(|e| RecordError::FlushFailed(format!("Encode task error: {}", e)))??;

        Ok(vec![MediaChunk::new(wav)])
    }

    async fn release(&mut self) {
        self.is_recording.store(false, Ordering::SeqCst);
        if let Ok(mut buffer) = self.audio_buffer.lock() {
            buffer.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_mono_single_channel_passthrough() {
        let mono = vec![100i16, 200, 300];
        assert_eq!(CpalAudioTrack::to_mono(&mono, 1), mono);
    }

    #[test]
    fn to_mono_averages_stereo_pairs() {
        let stereo = vec![100i16, 200, 300, 400];
        assert_eq!(CpalAudioTrack::to_mono(&stereo, 2), vec![150, 350]);
    }

    #[test]
    fn encode_wav_produces_riff_header() {
        let samples = vec![0i16; 160];
        let wav = CpalAudioTrack::encode_wav(&samples, 16000).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // 44-byte header plus two bytes per sample
        assert_eq!(wav.len(), 44 + samples.len() * 2);
    }
}
