use std::path::Path;

use crate::domain::{EngineError, PcmAudio};

/// Write float samples as a 16 kHz mono 16-bit WAV for sidecar handoff.
pub(crate) fn write_wav(path: &Path, samples: &[f32]) -> Result<(), EngineError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: PcmAudio::SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer =
        hound::WavWriter::create(path, spec).map_err(|e| EngineError::Io(e.to_string()))?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
        writer
            .write_sample(value)
            .map_err(|e| EngineError::Io(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| EngineError::Io(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_wav_spec_and_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("handoff.wav");
        write_wav(&path, &[0.0, 0.5, -0.5, 2.0, -2.0]).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 5);

        // Out-of-range input is clamped, not wrapped.
        let samples: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples[3], 32767);
        assert_eq!(samples[4], -32767);
    }
}
