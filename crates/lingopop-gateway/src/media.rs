use lingopop_types::MediaRef;

/// Rate the TTS model uses when the media type omits it
const DEFAULT_PCM_RATE: u32 = 24_000;

/// Sample rate of a raw PCM media type such as `audio/L16;codec=pcm;rate=24000`.
///
/// Returns `None` for anything that is not raw PCM.
pub fn pcm_sample_rate(mime_type: &str) -> Option<u32> {
    let mut params = mime_type.split(';').map(str::trim);
    let essence = params.next()?.to_ascii_lowercase();
    if essence != "audio/l16" && essence != "audio/pcm" {
        return None;
    }

    let rate = params
        .filter_map(|p| p.split_once('='))
        .find(|(k, _)| k.eq_ignore_ascii_case("rate"))
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(DEFAULT_PCM_RATE);
    Some(rate)
}

/// Wrap 16-bit little-endian mono PCM in a WAV container
pub fn wrap_pcm_as_wav(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * num_channels as u32 * bits_per_sample as u32 / 8;
    let block_align = num_channels * bits_per_sample / 8;
    let data_size = pcm.len() as u32;

    let mut wav = Vec::with_capacity(44 + pcm.len());

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt subchunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data subchunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.extend_from_slice(pcm);

    wav
}

/// Make TTS output directly playable
pub(crate) fn playable_audio(media: MediaRef) -> MediaRef {
    match pcm_sample_rate(&media.mime_type) {
        Some(rate) => MediaRef::new("audio/wav", wrap_pcm_as_wav(&media.data, rate)),
        None => media,
    }
}
