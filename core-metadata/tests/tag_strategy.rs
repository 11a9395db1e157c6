use core_metadata::{LoftyTagDictionary, MetadataError, TagFamily, TagStrategy};
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn write_wav(path: &Path) {
    let samples: Vec<u8> = (0..4_000u32).map(|i| (i % 97) as u8).collect();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + samples.len() as u32).to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&11_025u32.to_le_bytes());
    bytes.extend_from_slice(&44_100u32.to_le_bytes());
    bytes.extend_from_slice(&4u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&(samples.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&samples);
    fs::write(path, bytes).unwrap();
}

fn strategy() -> TagStrategy {
    TagStrategy::new(Arc::new(LoftyTagDictionary::new()), TagFamily::AudioContainer)
}

#[test]
fn test_embed_and_extract_with_lofty() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.wav");
    let output = dir.path().join("output.wav");
    write_wav(&input);
    let original = fs::read(&input).unwrap();

    strategy()
        .embed(&input, &output, "Ünïcödé payload ✓")
        .unwrap();

    assert_eq!(strategy().extract(&output).unwrap(), "Ünïcödé payload ✓");
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn test_pristine_file_has_nothing_hidden() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pristine.wav");
    write_wav(&input);

    assert!(matches!(
        strategy().extract(&input),
        Err(MetadataError::NoHiddenPayload(_))
    ));
}

#[test]
fn test_unreadable_container_is_bridge_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.m4a");
    fs::write(&input, b"\0\0\0\x08junk").unwrap();

    assert!(matches!(
        strategy().extract(&input),
        Err(MetadataError::Bridge(_))
    ));
}
