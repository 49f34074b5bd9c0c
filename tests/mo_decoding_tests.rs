mod support;

use pomocodec::formats::mo::{Endianness, read_header};
use pomocodec::{Entry, FormatError, MoFile, PoFile, Source, Target, decode_binary};
use support::{build_mo, build_mo_bytes, build_mo_with};

const METADATA: &str = "Project-Id-Version: demo\n\
Content-Type: text/plain; charset=UTF-8\n\
Plural-Forms: nplurals=2; plural=(n != 1);\n";

#[test]
fn parses_empty_catalog() {
    assert!(decode_binary(&build_mo(&[])).unwrap().is_empty());
}

#[test]
fn reads_singulars() {
    let mo = MoFile::parse(&build_mo(&[("Back", "Zurück")])).unwrap();
    assert_eq!(mo.entries, vec![Entry::singular("Back", "Zurück")]);
    assert_eq!(mo.entries[0].comment, None);
}

#[test]
fn reads_plurals() {
    let mo = MoFile::parse(&build_mo(&[("Axis\0Axes", "Achse\0Achsen")])).unwrap();
    let entry = &mo.entries[0];
    assert!(entry.is_plural());
    assert_eq!(
        entry.source,
        Some(Source::Plural {
            singular: "Axis".to_string(),
            plural: "Axes".to_string()
        })
    );
    assert_eq!(
        entry.target,
        Some(Target::Plural(vec![
            Some("Achse".to_string()),
            Some("Achsen".to_string())
        ]))
    );
}

#[test]
fn reads_both_byte_orders_and_revisions() {
    let pairs = [("Back", "Zurück"), ("Axis\0Axes", "Achse\0Achsen")];
    let expected = MoFile::parse(&build_mo(&pairs)).unwrap().entries;

    for endianness in [Endianness::Little, Endianness::Big] {
        for revision in [0, 1] {
            let bytes = build_mo_with(&pairs, endianness, revision);
            let header = read_header(&bytes).unwrap();
            assert_eq!(header.endianness, endianness);
            assert_eq!(header.revision, revision);
            assert_eq!(header.string_count, 2);
            assert_eq!(decode_binary(&bytes).unwrap(), expected);
        }
    }
}

#[test]
fn combines_multiple_catalogs() {
    let mut mo = MoFile::new();
    mo.add_entries_from_bytes(&build_mo(&[("Axis\0Axes", "Achse\0Achsen")]))
        .unwrap();
    mo.add_entries_from_bytes(&build_mo(&[("Back", "Zurück")]))
        .unwrap();
    assert_eq!(mo.entries.len(), 2);
    assert_ne!(mo.entries[0].source, mo.entries[1].source);
}

#[test]
fn does_not_generate_duplicate_entries() {
    let first = build_mo(&[("Back", "Zurück")]);
    let second = build_mo_with(&[("Back", "Zurück")], Endianness::Big, 0);

    let mut mo = MoFile::new();
    mo.add_entries_from_bytes(&first).unwrap();
    mo.add_entries_from_bytes(&second).unwrap();
    assert_eq!(mo.entries.len(), 1);
}

#[test]
fn keeps_entries_that_differ_in_target() {
    let mut mo = MoFile::new();
    mo.add_entries_from_bytes(&build_mo(&[("Back", "Zurück")]))
        .unwrap();
    mo.add_entries_from_bytes(&build_mo(&[("Back", "Rückwärts")]))
        .unwrap();
    assert_eq!(mo.entries.len(), 2);
}

#[test]
fn dedupe_does_not_merge_comments() {
    let mut mo = MoFile::with_entries(vec![
        Entry::singular("Back", "Zurück").with_comment("kept\n"),
    ]);
    mo.add_entries_from_bytes(&build_mo(&[("Back", "Zurück")]))
        .unwrap();
    assert_eq!(mo.entries.len(), 1);
    assert_eq!(mo.entries[0].comment.as_deref(), Some("kept\n"));
}

#[test]
fn reads_metadata() {
    let mo = MoFile::parse(&build_mo(&[("", METADATA), ("Back", "Zurück")])).unwrap();

    assert_eq!(mo.header.charset.as_deref(), Some("UTF-8"));
    assert_eq!(mo.header.plural_count, "2");
    assert_eq!(mo.header.plural_expression, "(n != 1)");

    let meta = mo.entries.iter().find(|e| e.is_metadata()).unwrap();
    assert!(meta.is_complete());
    assert_eq!(meta.target, Some(Target::Singular(METADATA.to_string())));
}

#[test]
fn metadata_survives_text_round_trip() {
    let mo = MoFile::parse(&build_mo(&[("", METADATA), ("Back", "Zurück")])).unwrap();
    let text = PoFile::with_entries(mo.entries.clone()).to_text();
    let po = PoFile::parse(&text).unwrap();

    assert_eq!(po.entries.len(), 2);
    assert!(po.entries[0].is_metadata());
    assert_eq!(po.header(), mo.header);
}

#[test]
fn defaults_without_metadata() {
    let mo = MoFile::parse(&build_mo(&[("Back", "Zurück")])).unwrap();
    assert_eq!(mo.header.charset, None);
    assert_eq!(mo.header.plural_count, "1");
    assert_eq!(mo.header.plural_expression, "0");
}

#[test]
fn rejects_unknown_signature() {
    let mut bytes = build_mo(&[("Back", "Zurück")]);
    bytes[0] = 0x00;
    assert!(matches!(
        decode_binary(&bytes),
        Err(FormatError::UnrecognizedSignature(_))
    ));
}

#[test]
fn rejects_newer_revision() {
    let bytes = build_mo_with(&[("Back", "Zurück")], Endianness::Little, 2);
    assert!(matches!(
        decode_binary(&bytes),
        Err(FormatError::UnsupportedRevision(2))
    ));
}

#[test]
fn rejects_truncated_string_data() {
    let bytes = build_mo(&[("Back", "Zurück")]);
    let truncated = &bytes[..bytes.len() - 4];
    assert!(matches!(
        decode_binary(truncated),
        Err(FormatError::Truncated { .. })
    ));
}

#[test]
fn rejects_invalid_utf8() {
    let bytes = build_mo_bytes(
        &[(b"Back".as_slice(), b"Zur\xfcck".as_slice())],
        Endianness::Little,
        0,
    );
    assert!(matches!(
        decode_binary(&bytes),
        Err(FormatError::InvalidUtf8 { index: 0, .. })
    ));
}

#[test]
fn rejects_invalid_utf8_in_source() {
    let bytes = build_mo_bytes(
        &[
            (b"Back".as_slice(), b"Back".as_slice()),
            (b"Men\xfc".as_slice(), b"Menu".as_slice()),
        ],
        Endianness::Big,
        0,
    );
    assert!(matches!(
        decode_binary(&bytes),
        Err(FormatError::InvalidUtf8 { index: 1, .. })
    ));
}

#[test]
fn failed_decode_leaves_catalog_untouched() {
    let mut mo = MoFile::parse(&build_mo(&[("Back", "Zurück")])).unwrap();
    assert!(mo.add_entries_from_bytes(b"garbage!").is_err());
    assert_eq!(mo.entries.len(), 1);
}
