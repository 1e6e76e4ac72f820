use base64::engine::{general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use log::{debug, warn};

use crate::armor::{BlockType, Headers};
use crate::crypto::checksum;
use crate::errors::{Error, Result};

const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";
const DASHES: &str = "-----";

/// Line states of the armor parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Skipping anything before the BEGIN line.
    SeekBegin,
    InHeaders,
    InBody,
    /// The checksum line was read, only the END line may follow.
    SeekEnd,
    Done,
}

/// Parses the label of a `-----BEGIN <label>-----` or `-----END <label>-----` line.
fn marker<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix)?.strip_suffix(DASHES)
}

fn is_marker(line: &str) -> bool {
    line.starts_with(BEGIN) || line.starts_with(END)
}

/// Read the checksum from a base64 encoded `=XXXX` line.
fn read_checksum(line: &str) -> Result<u32> {
    let raw = STANDARD
        .decode(line)
        .map_err(|err| crate::armor_err!("invalid checksum line {:?}: {}", line, err))?;
    match raw[..] {
        [a, b, c] => Ok(u32::from_be_bytes([0, a, b, c])),
        _ => Err(crate::armor_err!("checksum of {} bytes", raw.len())),
    }
}

/// Decodes an armored block.
///
/// Lines may end in `\n` or `\r\n`. Text before the BEGIN line and after the END
/// line is ignored. A missing checksum line is accepted, a wrong one is not.
pub fn dearmor(input: &str) -> Result<(BlockType, Headers, Bytes)> {
    let mut state = State::SeekBegin;
    let mut typ = None;
    let mut headers = Headers::new();
    let mut body = String::new();
    let mut expected_crc = None;

    for line in input.lines() {
        let line = line.trim_end();

        state = match state {
            State::SeekBegin => {
                if let Some(label) = marker(line, BEGIN) {
                    typ = Some(BlockType::from_label(label));
                    State::InHeaders
                } else if line.starts_with(END) {
                    return Err(crate::armor_err!("END line before BEGIN line"));
                } else {
                    State::SeekBegin
                }
            }
            State::InHeaders => {
                if line.is_empty() {
                    State::InBody
                } else if is_marker(line) {
                    return Err(crate::armor_err!("unexpected marker in headers: {}", line));
                } else {
                    let (key, value) = line
                        .split_once(':')
                        .filter(|(key, _)| !key.is_empty())
                        .map(|(key, value)| (key, value.strip_prefix(' ').unwrap_or(value)))
                        .ok_or_else(|| crate::armor_err!("invalid header line {:?}", line))?;
                    headers
                        .entry(key.to_string())
                        .or_default()
                        .push(value.to_string());
                    State::InHeaders
                }
            }
            State::InBody => {
                if let Some(crc) = line.strip_prefix('=') {
                    expected_crc = Some(read_checksum(crc)?);
                    State::SeekEnd
                } else if line.starts_with(END) {
                    check_end(line, typ.as_ref())?;
                    State::Done
                } else if line.starts_with(BEGIN) {
                    return Err(crate::armor_err!("duplicate BEGIN line"));
                } else {
                    body.extend(line.chars().filter(|c| !c.is_ascii_whitespace()));
                    State::InBody
                }
            }
            State::SeekEnd => {
                if line.is_empty() {
                    State::SeekEnd
                } else if line.starts_with(END) {
                    check_end(line, typ.as_ref())?;
                    State::Done
                } else {
                    return Err(crate::armor_err!("unexpected line after checksum: {:?}", line));
                }
            }
            State::Done => break,
        };
    }

    let typ = match (state, typ) {
        (State::Done, Some(typ)) => typ,
        (State::SeekBegin, _) => return Err(crate::armor_err!("missing BEGIN line")),
        _ => return Err(crate::armor_err!("missing END line")),
    };

    let data = STANDARD.decode(body.as_bytes())?;
    let actual = checksum::crc24(&data);
    match expected_crc {
        Some(expected) if expected != actual => {
            return Err(Error::ArmorChecksumMismatch { expected, actual });
        }
        Some(_) => {}
        None => warn!("armor without checksum"),
    }
    debug!("dearmored {}: {} bytes", typ, data.len());

    Ok((typ, headers, Bytes::from(data)))
}

fn check_end(line: &str, typ: Option<&BlockType>) -> Result<()> {
    let label = marker(line, END).ok_or_else(|| crate::armor_err!("invalid END line {:?}", line))?;
    match typ {
        Some(typ) if BlockType::from_label(label) == *typ => Ok(()),
        _ => Err(crate::armor_err!("END {} does not match BEGIN", label)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    const BLOCK: &str = "-----BEGIN PGP MESSAGE-----\r\n\r\nMTIzNDU2Nzg5\r\n=Ic8C\r\n-----END PGP MESSAGE-----\r\n";

    fn kind(input: &str) -> ErrorKind {
        dearmor(input).unwrap_err().kind()
    }

    #[test]
    fn test_dearmor_simple() {
        let (typ, headers, data) = dearmor(BLOCK).unwrap();
        assert_eq!(typ, BlockType::Message);
        assert!(headers.is_empty());
        assert_eq!(&data[..], b"123456789");
    }

    #[test]
    fn test_dearmor_surrounding_text() {
        let input = format!("Hello,\nsee below.\n\n{}\nthanks\n-----BEGIN nonsense", BLOCK);
        let (_, _, data) = dearmor(&input).unwrap();
        assert_eq!(&data[..], b"123456789");
    }

    #[test]
    fn test_dearmor_lf_and_whitespace() {
        let input = "-----BEGIN PGP MESSAGE-----\nVersion: x\n\nMTIz NDU2\n  Nzg5  \n\n=Ic8C\n-----END PGP MESSAGE-----";
        let (_, headers, data) = dearmor(input).unwrap();
        assert_eq!(headers["Version"], vec!["x".to_string()]);

        let input = input.replace("Version: x", "Comment:");
        let (_, headers, _) = dearmor(&input).unwrap();
        assert_eq!(headers["Comment"], vec![String::new()]);
        assert_eq!(&data[..], b"123456789");
    }

    #[test]
    fn test_dearmor_missing_checksum() {
        let input = "-----BEGIN PGP MESSAGE-----\n\nMTIzNDU2Nzg5\n-----END PGP MESSAGE-----\n";
        let (_, _, data) = dearmor(input).unwrap();
        assert_eq!(&data[..], b"123456789");
    }

    #[test]
    fn test_dearmor_checksum_mismatch() {
        let input = BLOCK.replace("=Ic8C", "=twTO");
        match dearmor(&input).unwrap_err() {
            Error::ArmorChecksumMismatch { expected, actual } => {
                assert_eq!(expected, 0xB704CE);
                assert_eq!(actual, 0x21CF02);
            }
            err => panic!("unexpected error {err:?}"),
        }
    }

    #[test]
    fn test_dearmor_malformed() {
        // no markers at all
        assert_eq!(kind("MTIzNDU2Nzg5\n"), ErrorKind::ArmorMalformed);
        // missing END
        assert_eq!(kind(&BLOCK[..BLOCK.len() - 28]), ErrorKind::ArmorMalformed);
        // END first
        assert_eq!(kind("-----END PGP MESSAGE-----\n"), ErrorKind::ArmorMalformed);
        // mismatched END
        assert_eq!(
            kind(&BLOCK.replace("END PGP MESSAGE", "END PGP SIGNATURE")),
            ErrorKind::ArmorMalformed
        );
        // duplicated BEGIN
        assert_eq!(
            kind(&BLOCK.replace("MTIzNDU2Nzg5", "-----BEGIN PGP MESSAGE-----")),
            ErrorKind::ArmorMalformed
        );
        // header without separator
        assert_eq!(
            kind(&BLOCK.replace("-----\r\n\r\n", "-----\r\nVersion\r\n\r\n")),
            ErrorKind::ArmorMalformed
        );
        // invalid base64
        assert_eq!(
            kind(&BLOCK.replace("MTIzNDU2Nzg5", "MTIz*DU2Nzg5")),
            ErrorKind::ArmorMalformed
        );
        // garbage after the checksum
        assert_eq!(
            kind(&BLOCK.replace("=Ic8C\r\n", "=Ic8C\r\nMTIz\r\n")),
            ErrorKind::ArmorMalformed
        );
        // short checksum
        assert_eq!(
            kind(&BLOCK.replace("=Ic8C", "=Ic8")),
            ErrorKind::ArmorMalformed
        );
    }

    #[test]
    fn test_dearmor_unknown_type() {
        let input = BLOCK.replace("PGP MESSAGE", "PGP ARMORED FILE");
        let (typ, _, _) = dearmor(&input).unwrap();
        assert_eq!(typ, BlockType::Other("PGP ARMORED FILE".to_string()));
    }
}
