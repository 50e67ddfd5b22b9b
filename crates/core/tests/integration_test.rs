//! Integration tests for the full huffc pipeline.
//!
//! These tests verify end-to-end behavior: input file -> compress ->
//! compressed file -> decompress -> output file, with verification that
//! output matches input.

use huffc_core::{
    bitio::BitReader,
    code_table::CodeTable,
    compress_bytes, compress_file, decompress_bytes, decompress_file,
    error::{Error, HeaderError},
    header::Header,
    histogram::Histogram,
    HuffmanTree,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn round_trip(data: &[u8]) -> Vec<u8> {
    let packed = compress_bytes(data).expect("compression failed");
    decompress_bytes(&packed).expect("decompression failed")
}

/// Mixed-compressibility data: runs, text-like, and random sections.
fn sample_data(seed: u64, size: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size);

    while data.len() < size {
        let chunk = (size - data.len()).min(rng.gen_range(16..=512));
        match rng.gen_range(0..3) {
            0 => {
                let byte: u8 = rng.gen();
                data.extend(std::iter::repeat(byte).take(chunk));
            }
            1 => {
                let alphabet = b"abcdefghijklmnopqrstuvwxyz .!,\n";
                for _ in 0..chunk {
                    data.push(alphabet[rng.gen_range(0..alphabet.len())]);
                }
            }
            _ => {
                for _ in 0..chunk {
                    data.push(rng.gen());
                }
            }
        }
    }

    data
}

#[test]
fn test_round_trip_boundaries() {
    assert_eq!(round_trip(b""), b"");
    assert_eq!(round_trip(&[0x00]), vec![0x00]);
    assert_eq!(round_trip(&[0xFF]), vec![0xFF]);
    assert_eq!(round_trip(&[0x41, 0x41, 0x42]), vec![0x41, 0x41, 0x42]);
}

/// Test with all symbols present (full 256-byte alphabet).
#[test]
fn test_all_symbols() {
    let input_data: Vec<u8> = (0..=255).collect();
    let packed = compress_bytes(&input_data).unwrap();

    let mut reader = BitReader::new(&packed[..]);
    let header = Header::read(&mut reader).unwrap();
    assert_eq!(header.leaf_count, 256);
    assert_eq!(header.original_size, 256);

    assert_eq!(decompress_bytes(&packed).unwrap(), input_data);
}

#[test]
fn test_single_repeated_byte() {
    let input_data = vec![b'X'; 128 * 1024];
    let packed = compress_bytes(&input_data).unwrap();

    let mut reader = BitReader::new(&packed[..]);
    let header = Header::read(&mut reader).unwrap();
    // 'X' plus the two seeds
    assert_eq!(header.leaf_count, 3);

    // One bit per byte
    assert!(packed.len() < input_data.len() / 7);
    assert_eq!(decompress_bytes(&packed).unwrap(), input_data);
}

#[test]
fn test_random_round_trips() {
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let size = rng.gen_range(0..4096);
        let data: Vec<u8> = (0..size).map(|_| rng.gen()).collect();
        assert_eq!(round_trip(&data), data, "seed {seed}");
    }
}

#[test]
fn test_mixed_data_round_trip() {
    let data = sample_data(42, 100_000);
    let packed = compress_bytes(&data).unwrap();
    assert_eq!(decompress_bytes(&packed).unwrap(), data);
}

#[test]
fn test_determinism() {
    let data = sample_data(7, 20_000);
    assert_eq!(compress_bytes(&data).unwrap(), compress_bytes(&data).unwrap());
}

#[test]
fn test_header_counts_distinct_symbols_and_seeds() {
    let data = sample_data(99, 5_000);
    let mut expected_leaves: Vec<u8> = data.clone();
    expected_leaves.extend_from_slice(&[0x00, 0xFF]);
    expected_leaves.sort_unstable();
    expected_leaves.dedup();

    let packed = compress_bytes(&data).unwrap();
    let mut reader = BitReader::new(&packed[..]);
    let header = Header::read(&mut reader).unwrap();

    assert_eq!(header.original_size as usize, data.len());
    assert_eq!(header.leaf_count as usize, expected_leaves.len());

    let tree = HuffmanTree::read(&mut reader, header.leaf_count).unwrap();
    assert_eq!(tree.node_count(), 2 * expected_leaves.len() - 1);
}

#[test]
fn test_code_table_properties_on_sample() {
    let data = sample_data(3, 30_000);
    let histogram = Histogram::from_bytes(&data);
    let tree = HuffmanTree::build(&histogram).unwrap();
    let table = CodeTable::from_tree(&tree).unwrap();

    for &byte in &data {
        assert!(table[byte].length > 0);
    }
    assert!(table.is_prefix_free());
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("input.bin");
    let compressed = dir.path().join("input.bin.huff");
    let restored = dir.path().join("restored.bin");

    let data = sample_data(1234, 64 * 1024);
    std::fs::write(&original, &data).unwrap();

    let encode_stats = compress_file(&original, &compressed).unwrap();
    let decode_stats = decompress_file(&compressed, &restored).unwrap();

    assert_eq!(std::fs::read(&restored).unwrap(), data);

    let compressed_len = std::fs::metadata(&compressed).unwrap().len();
    assert_eq!(encode_stats.uncompressed_bytes, data.len() as u64);
    assert_eq!(encode_stats.compressed_bytes, compressed_len);
    assert_eq!(decode_stats.compressed_bytes, compressed_len);
    assert_eq!(decode_stats.leaf_count, encode_stats.leaf_count);
}

#[test]
fn test_empty_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("empty");
    let compressed = dir.path().join("empty.huff");
    let restored = dir.path().join("empty.out");

    std::fs::write(&original, b"").unwrap();
    compress_file(&original, &compressed).unwrap();
    decompress_file(&compressed, &restored).unwrap();

    assert!(std::fs::read(&restored).unwrap().is_empty());
}

#[test]
fn test_missing_input_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let output = dir.path().join("out");

    let err = compress_file(&missing, &output).unwrap_err();
    assert!(matches!(err, Error::Open { ref path, .. } if path == &missing));
    assert!(!output.exists());
}

#[test]
fn test_decompress_rejects_foreign_file() {
    let dir = tempfile::tempdir().unwrap();
    let foreign = dir.path().join("foreign.txt");
    let output = dir.path().join("out");
    std::fs::write(&foreign, b"plain text, not compressed").unwrap();

    let err = decompress_file(&foreign, &output).unwrap_err();
    assert!(matches!(
        err,
        Error::Header(HeaderError::InvalidMagic { actual: [b'p', b'l'], .. })
    ));
}
