use std::io::Write;

use base64::engine::{general_purpose::STANDARD, Engine as _};
use log::debug;

use crate::armor::{BlockType, Headers};
use crate::crypto::checksum;
use crate::errors::Result;
use crate::line_writer::{LineBreak, LineWriter};
use crate::ser::Serialize;

const LINE_BREAK: LineBreak = LineBreak::Crlf;

/// Maximum number of base64 characters per body line.
pub const LINE_LENGTH: usize = 76;

/// Writes `data` as an armored block, including the CRC-24 checksum line.
///
/// All lines, including the last one, are terminated with `\r\n`.
pub fn write<W: Write>(
    writer: &mut W,
    typ: &BlockType,
    headers: Option<&Headers>,
    data: &[u8],
) -> Result<()> {
    let line_break = LINE_BREAK.as_ref();

    // write armor header
    writer.write_all(&b"-----BEGIN "[..])?;
    typ.to_writer(writer)?;
    writer.write_all(&b"-----"[..])?;
    writer.write_all(line_break)?;

    // write armor headers
    if let Some(headers) = headers {
        for (key, values) in headers.iter() {
            check_header(key, values)?;
            for value in values {
                writer.write_all(key.as_bytes())?;
                writer.write_all(&b": "[..])?;
                writer.write_all(value.as_bytes())?;
                writer.write_all(line_break)?;
            }
        }
    }
    writer.write_all(line_break)?;

    // write body
    {
        let mut line_wrapper = LineWriter::<_, LINE_LENGTH>::new(writer.by_ref(), LINE_BREAK);
        line_wrapper.write_all(STANDARD.encode(data).as_bytes())?;
        line_wrapper.finish()?;
    }

    // write crc
    let crc = checksum::crc24(data);
    let crc_buf = [(crc >> 16) as u8, (crc >> 8) as u8, crc as u8];
    writer.write_all(b"=")?;
    writer.write_all(STANDARD.encode(crc_buf).as_bytes())?;
    writer.write_all(line_break)?;

    // write footer
    writer.write_all(&b"-----END "[..])?;
    typ.to_writer(writer)?;
    writer.write_all(&b"-----"[..])?;
    writer.write_all(line_break)?;

    debug!("armored {} bytes as {}, crc {:06X}", data.len(), typ, crc);

    Ok(())
}

/// Armors `data` into a string.
pub fn armor(typ: BlockType, headers: Option<&Headers>, data: &[u8]) -> Result<String> {
    let mut out = Vec::with_capacity(data.len() / 3 * 4 + data.len() / 38 + 128);
    write(&mut out, &typ, headers, data)?;

    String::from_utf8(out).map_err(|_| crate::armor_err!("armor header is not valid UTF-8"))
}

fn check_header(key: &str, values: &[String]) -> Result<()> {
    let bad_char = |c: char| c == '\r' || c == '\n';
    if key.is_empty() || key.contains(':') || key.contains(bad_char) {
        return Err(crate::armor_err!("invalid armor header key {:?}", key));
    }
    if let Some(value) = values.iter().find(|v| v.contains(bad_char)) {
        return Err(crate::armor_err!(
            "invalid value for armor header {}: {:?}",
            key,
            value
        ));
    }

    Ok(())
}
