//! WAV container synthesis for the raw 11K audio payloads.
//!
//! The shipped .11K files are headerless 8-bit mono PCM at 11025 Hz;
//! cooking them is a single deterministic header pack in front of the
//! untouched sample bytes.

pub const SAMPLE_RATE: u32 = 11025;

const HEADER_SIZE: usize = 44;

/// The canonical 44-byte RIFF/WAVE header for `data_len` sample bytes.
pub fn wav_header(data_len: u32) -> [u8; HEADER_SIZE] {
    let mut header = [0u8; HEADER_SIZE];

    // RIFF descriptor.
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&(36 + data_len).to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt chunk: PCM, mono, 8 bits per sample. Byte rate and block
    // align collapse to the sample rate and 1 for this layout.
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&1u16.to_le_bytes());
    header[24..28].copy_from_slice(&SAMPLE_RATE.to_le_bytes());
    header[28..32].copy_from_slice(&SAMPLE_RATE.to_le_bytes());
    header[32..34].copy_from_slice(&1u16.to_le_bytes());
    header[34..36].copy_from_slice(&8u16.to_le_bytes());

    // data chunk.
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_len.to_le_bytes());

    header
}

/// Wrap raw sample bytes in a complete WAV file image.
pub fn cook_wav(samples: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + samples.len());
    out.extend_from_slice(&wav_header(samples.len() as u32));
    out.extend_from_slice(samples);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fields_are_packed_little_endian() {
        let header = wav_header(1000);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(header[4..8].try_into().unwrap()), 1036);
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        assert_eq!(u16::from_le_bytes(header[20..22].try_into().unwrap()), 1);
        assert_eq!(u16::from_le_bytes(header[22..24].try_into().unwrap()), 1);
        assert_eq!(
            u32::from_le_bytes(header[24..28].try_into().unwrap()),
            SAMPLE_RATE
        );
        assert_eq!(u16::from_le_bytes(header[34..36].try_into().unwrap()), 8);
        assert_eq!(&header[36..40], b"data");
        assert_eq!(u32::from_le_bytes(header[40..44].try_into().unwrap()), 1000);
    }

    #[test]
    fn cooked_file_is_header_plus_untouched_samples() {
        let samples = [1u8, 2, 3, 4, 5];
        let cooked = cook_wav(&samples);
        assert_eq!(cooked.len(), 44 + samples.len());
        assert_eq!(&cooked[44..], &samples);
    }
}
