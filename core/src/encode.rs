//! `application/x-www-form-urlencoded` payload building.

use crate::engine::Engine;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

/// Escape every byte outside the RFC 3986 unreserved set as `%XX`.
pub fn percent_encode(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len() * 3);
    for &b in raw {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0f) as usize] as char);
        }
    }
    out
}

/// Join alternating keys and values as `k1=v1&k2=v2` and escape the result
/// with the engine's percent-encoder.
///
/// Returns `None` if `pairs` has an odd number of elements.
pub fn encode_key_values<E, S>(engine: &E, pairs: &[S]) -> Option<String>
where
    E: Engine + ?Sized,
    S: AsRef<[u8]>,
{
    if pairs.len() % 2 != 0 {
        return None;
    }

    // One '=' per pair and one '&' between pairs.
    let capacity = pairs.iter().map(|s| s.as_ref().len()).sum::<usize>() + pairs.len();
    let mut plain = Vec::with_capacity(capacity);
    for (i, pair) in pairs.chunks_exact(2).enumerate() {
        if i > 0 {
            plain.push(b'&');
        }
        plain.extend_from_slice(pair[0].as_ref());
        plain.push(b'=');
        plain.extend_from_slice(pair[1].as_ref());
    }

    Some(engine.escape(&plain))
}
