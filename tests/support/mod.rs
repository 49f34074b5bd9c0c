#![allow(dead_code)]

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use pomocodec::formats::mo::Endianness;

fn write_u32(out: &mut Vec<u8>, value: u32, endianness: Endianness) {
    match endianness {
        Endianness::Little => out.write_u32::<LittleEndian>(value).unwrap(),
        Endianness::Big => out.write_u32::<BigEndian>(value).unwrap(),
    }
}

/// Lays out a compiled catalog: header, original table, translated table,
/// then NUL-terminated string data.
pub fn build_mo_bytes(pairs: &[(&[u8], &[u8])], endianness: Endianness, revision: u32) -> Vec<u8> {
    let header_len: u32 = if revision == 1 { 48 } else { 28 };
    let count = pairs.len() as u32;
    let original_table = header_len;
    let translated_table = original_table + count * 8;
    let mut data_offset = translated_table + count * 8;

    let mut original_refs = Vec::new();
    let mut translated_refs = Vec::new();
    let mut data = Vec::new();

    for (source, _) in pairs {
        original_refs.push((source.len() as u32, data_offset));
        data.extend_from_slice(source);
        data.push(0);
        data_offset += source.len() as u32 + 1;
    }
    for (_, target) in pairs {
        translated_refs.push((target.len() as u32, data_offset));
        data.extend_from_slice(target);
        data.push(0);
        data_offset += target.len() as u32 + 1;
    }

    let mut out = match endianness {
        Endianness::Little => vec![0xde, 0x12, 0x04, 0x95],
        Endianness::Big => vec![0x95, 0x04, 0x12, 0xde],
    };
    for value in [revision, count, original_table, translated_table, 0, 0] {
        write_u32(&mut out, value, endianness);
    }
    if revision == 1 {
        for _ in 0..5 {
            write_u32(&mut out, 0, endianness);
        }
    }
    for (length, offset) in original_refs.into_iter().chain(translated_refs) {
        write_u32(&mut out, length, endianness);
        write_u32(&mut out, offset, endianness);
    }
    out.extend_from_slice(&data);
    out
}

pub fn build_mo(pairs: &[(&str, &str)]) -> Vec<u8> {
    let pairs = pairs
        .iter()
        .map(|(source, target)| (source.as_bytes(), target.as_bytes()))
        .collect::<Vec<_>>();
    build_mo_bytes(&pairs, Endianness::Little, 0)
}

pub fn build_mo_with(pairs: &[(&str, &str)], endianness: Endianness, revision: u32) -> Vec<u8> {
    let pairs = pairs
        .iter()
        .map(|(source, target)| (source.as_bytes(), target.as_bytes()))
        .collect::<Vec<_>>();
    build_mo_bytes(&pairs, endianness, revision)
}
