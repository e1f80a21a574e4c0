//! Benchmarks for tag directory parsing.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use exif_reader::ExifReader;

/// Build a representative payload: a primary directory with a mix of
/// inline scalars, external strings/rationals, and a photo sub-directory.
fn build_payload() -> Vec<u8> {
    let mut buf = vec![0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];

    let inline_entries: &[(u16, u16, u32, [u8; 4])] = &[
        (256, 4, 1, 4032u32.to_le_bytes()),
        (257, 4, 1, 3024u32.to_le_bytes()),
        (259, 3, 1, [6, 0, 0, 0]),
        (274, 3, 1, [1, 0, 0, 0]),
        (277, 3, 1, [3, 0, 0, 0]),
        (296, 3, 1, [2, 0, 0, 0]),
    ];
    // inline entries + make/model/software strings + 2 rationals + pointer
    let entry_count = inline_entries.len() + 6;
    let dir_end = 8 + 2 + 12 * entry_count + 4;

    let mut external: Vec<u8> = Vec::new();
    let mut directory: Vec<u8> = Vec::new();

    let push_entry = |dir: &mut Vec<u8>, tag: u16, ty: u16, count: u32, inline: [u8; 4]| {
        dir.extend_from_slice(&tag.to_le_bytes());
        dir.extend_from_slice(&ty.to_le_bytes());
        dir.extend_from_slice(&count.to_le_bytes());
        dir.extend_from_slice(&inline);
    };

    for &(tag, ty, count, inline) in inline_entries {
        push_entry(&mut directory, tag, ty, count, inline);
    }

    for (tag, text) in [
        (271u16, b"Benchmark Camera Works\0".as_slice()),
        (272, b"Model X-100\0".as_slice()),
        (305, b"exif-reader test rig\0".as_slice()),
    ] {
        let offset = (dir_end + external.len()) as u32;
        push_entry(
            &mut directory,
            tag,
            2,
            text.len() as u32,
            offset.to_le_bytes(),
        );
        external.extend_from_slice(text);
    }

    for tag in [282u16, 283] {
        let offset = (dir_end + external.len()) as u32;
        push_entry(&mut directory, tag, 5, 1, offset.to_le_bytes());
        external.extend_from_slice(&72u32.to_le_bytes());
        external.extend_from_slice(&1u32.to_le_bytes());
    }

    // Photo sub-directory lives after the external area
    let photo_offset = (dir_end + external.len()) as u32;
    push_entry(&mut directory, 34665, 4, 1, photo_offset.to_le_bytes());

    buf.extend_from_slice(&(entry_count as u16).to_le_bytes());
    buf.extend_from_slice(&directory);
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&external);

    // Photo block: dimensions + ISO
    buf.extend_from_slice(&3u16.to_le_bytes());
    for (tag, value) in [(40962u16, 4032u32), (40963, 3024), (34855, 200)] {
        buf.extend_from_slice(&tag.to_le_bytes());
        buf.extend_from_slice(&3u16.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&(value as u16).to_le_bytes());
        buf.extend_from_slice(&[0, 0]);
    }
    buf.extend_from_slice(&0u32.to_le_bytes());

    buf
}

fn bench_parse(c: &mut Criterion) {
    let payload = build_payload();

    c.bench_function("parse classic payload", |b| {
        b.iter(|| ExifReader::new(black_box(&payload)).parse())
    });

    c.bench_function("parse and read tags", |b| {
        b.iter(|| {
            let result = ExifReader::new(black_box(&payload)).parse();
            let width = result.get_u32(exif_reader::ExifTag::ImageWidth).unwrap();
            let make = result.get_string(exif_reader::ExifTag::Make).unwrap();
            (width, make.len())
        })
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
