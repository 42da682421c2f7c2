use std::borrow::Cow;

use encoding_rs::{Encoding, GB18030};

/// Decode raw lyric file bytes into text.
///
/// A byte order mark (UTF-8, UTF-16 LE/BE) picks the encoding. Without one
/// the bytes are read as UTF-8 when valid, otherwise as GB18030, the 8-bit
/// superset of GBK that most legacy `.lrc` files use.
pub fn decode_lyric_bytes(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return encoding.decode_without_bom_handling(&bytes[bom_len..]).0;
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => GB18030.decode_without_bom_handling(bytes).0,
    }
}
