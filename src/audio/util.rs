use rodio::{OutputStream, OutputStreamBuilder};
use tracing::info;

use crate::audio::error::AudioError;

/// Opens the default output device, falling back to any working config.
pub fn open_output_stream() -> Result<OutputStream, AudioError> {
    let stream = OutputStreamBuilder::from_default_device()?.open_stream_or_fallback()?;
    info!("audio_output_opened");
    Ok(stream)
}
