use base64::engine::{general_purpose::STANDARD, Engine as _};
use pgpenc::armor::{armor, dearmor, BlockType, Headers};
use pgpenc::crypto::checksum::crc24;
use pgpenc::errors::ErrorKind;

#[test]
fn crc24_pinned() {
    assert_eq!(crc24(b"123456789"), 0x21CF02);
    assert_eq!(crc24(b""), 0xB704CE);
}

#[test]
fn armor_long_line() {
    // some writers put the whole body on a single line
    let data: Vec<u8> = (0..15_000u32).map(|i| (i * 31 % 256) as u8).collect();
    let crc = crc24(&data).to_be_bytes();
    let text = format!(
        "-----BEGIN PGP MESSAGE-----\n\n{}\n={}\n-----END PGP MESSAGE-----\n",
        STANDARD.encode(&data),
        STANDARD.encode(&crc[1..])
    );

    let (typ, headers, parsed) = dearmor(&text).unwrap();
    assert_eq!(typ, BlockType::Message);
    assert!(headers.is_empty());
    assert_eq!(&parsed[..], &data[..]);
}

#[test]
fn armor_first_block_only() {
    let first = armor(BlockType::PublicKey, None, b"first").unwrap();
    let second = armor(BlockType::PublicKey, None, b"second").unwrap();
    let text = format!("{first}\n{second}");

    let (_, _, data) = dearmor(&text).unwrap();
    assert_eq!(&data[..], b"first");
}

#[test]
fn armor_headers_written_in_order() {
    let mut headers = Headers::new();
    headers.insert("Version".to_string(), vec!["pgpenc".to_string()]);
    headers.insert("Comment".to_string(), vec!["hello".to_string()]);

    let text = armor(BlockType::Message, Some(&headers), b"x").unwrap();
    let lines: Vec<&str> = text.split("\r\n").collect();
    assert_eq!(lines[0], "-----BEGIN PGP MESSAGE-----");
    assert_eq!(lines[1], "Comment: hello");
    assert_eq!(lines[2], "Version: pgpenc");
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "eA==");
    assert_eq!(lines[6], "-----END PGP MESSAGE-----");
}

#[test]
fn armor_wrong_crc() {
    let text = armor(BlockType::Signature, None, b"signed").unwrap();
    let mut lines: Vec<String> = text.split("\r\n").map(str::to_string).collect();
    let crc = lines.iter().position(|l| l.starts_with('=')).unwrap();
    lines[crc] = "=AAAA".to_string();

    let err = dearmor(&lines.join("\r\n")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArmorChecksumMismatch);
}
