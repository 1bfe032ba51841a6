//! Transport codec for configuration snapshots.
//!
//! [`encode`] turns any serializable value into a compact string restricted
//! to the base45 alphabet, the character set of a QR code's alphanumeric
//! mode: value → CBOR → gzip → base45. [`decode`] is the exact inverse with
//! the stage order reversed.
//!
//! The pipeline is a pure transform: no state, no retries, and identical
//! input yields a byte-identical string, so a displayed QR code stays stable
//! for as long as it is on screen. The only suspension point is the
//! compression stage, which runs on the blocking pool; concurrent calls
//! operate on their own buffers and never interfere.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use error::CodecError;

mod error;

/// Encodes `value` into a compact transport string.
///
/// Always succeeds for well-formed input; the error paths exist for values
/// that cannot be represented in CBOR (e.g. non-finite floats inside maps
/// with non-string keys) and for runtime failures of the blocking pool.
pub async fn encode<T: Serialize>(value: &T) -> Result<String, CodecError> {
    let mut payload = Vec::new();
    ciborium::into_writer(value, &mut payload)
        .map_err(|err| CodecError::Serialize(err.to_string()))?;

    let compressed = tokio::task::spawn_blocking(move || compress(&payload))
        .await?
        .map_err(CodecError::Compress)?;

    Ok(base45::encode(&compressed))
}

/// Decodes a transport string back into a structured value.
///
/// Any stage failure (characters outside the alphabet, a truncated or
/// corrupt compressed stream, a CBOR parse error) is surfaced as a single
/// [`CodecError`]. Decoding into `serde_json::Value` yields the raw
/// structured value to hand to validation.
pub async fn decode<T: DeserializeOwned>(encoded: &str) -> Result<T, CodecError> {
    let compressed =
        base45::decode(encoded).map_err(|err| CodecError::Alphabet(format!("{err:?}")))?;

    let payload = tokio::task::spawn_blocking(move || decompress(&compressed))
        .await?
        .map_err(CodecError::Decompress)?;

    ciborium::from_reader(payload.as_slice())
        .map_err(|err| CodecError::Deserialize(err.to_string()))
}

/// Single-shot gzip: write all bytes, then close the stream.
fn compress(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}

fn decompress(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use engine::presets;
    use model::{Settings, export_settings, import_settings};
    use serde_json::Value;

    use super::*;

    fn settings() -> Settings {
        export_settings(presets::preset_categories(), presets::preset_methods())
    }

    #[tokio::test]
    async fn round_trips_a_snapshot() {
        let settings = settings();

        let encoded = encode(&settings).await.unwrap();
        let decoded: Settings = decode(&encoded).await.unwrap();

        assert_eq!(decoded, settings);
    }

    #[tokio::test]
    async fn decoded_raw_value_passes_validation() {
        let settings = settings();

        let encoded = encode(&settings).await.unwrap();
        let raw: Value = decode(&encoded).await.unwrap();

        assert_eq!(import_settings(&raw).unwrap(), settings);
    }

    #[tokio::test]
    async fn encoding_is_deterministic() {
        let settings = settings();

        let first = encode(&settings).await.unwrap();
        let second = encode(&settings).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn output_stays_inside_the_alphabet() {
        const ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

        let encoded = encode(&settings()).await.unwrap();
        assert!(!encoded.is_empty());
        assert!(encoded.chars().all(|c| ALPHABET.contains(c)));
    }

    #[tokio::test]
    async fn rejects_characters_outside_the_alphabet() {
        let err = decode::<Value>("not@a#code!").await.unwrap_err();
        assert!(matches!(err, CodecError::Alphabet(_)));
    }

    #[tokio::test]
    async fn rejects_a_truncated_payload() {
        let encoded = encode(&settings()).await.unwrap();
        let truncated = &encoded[..encoded.len() / 2];

        assert!(decode::<Value>(truncated).await.is_err());
    }

    #[tokio::test]
    async fn rejects_a_valid_alphabet_but_garbage_stream() {
        // Proper base45, but the bytes underneath are not gzip.
        let garbage = base45::encode(b"definitely not gzip");

        let err = decode::<Value>(&garbage).await.unwrap_err();
        assert!(matches!(err, CodecError::Decompress(_)));
    }
}
