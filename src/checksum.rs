//! CRC32 framing for append-only JSON line files.
//!
//! Each line is `<crc32 as 8 hex digits> <json>`. The checksum covers the
//! JSON text only. Any mismatch is corruption.

use crc32fast::Hasher;

/// Computes a CRC32 (IEEE) checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Verifies that the computed checksum matches the expected checksum.
pub fn verify_checksum(data: &[u8], expected: u32) -> bool {
    compute_checksum(data) == expected
}

/// Frame a JSON text as a checksummed line (without trailing newline)
pub fn encode_line(json: &str) -> String {
    format!("{:08x} {}", compute_checksum(json.as_bytes()), json)
}

/// Strip and verify the checksum prefix of a framed line
pub fn decode_line(line: &str) -> Result<&str, String> {
    let (prefix, json) = line
        .split_once(' ')
        .ok_or_else(|| "missing checksum prefix".to_string())?;

    let expected = u32::from_str_radix(prefix, 16)
        .map_err(|_| format!("malformed checksum '{}'", prefix))?;

    if !verify_checksum(json.as_bytes(), expected) {
        return Err(format!(
            "checksum mismatch: expected {:08x}, computed {:08x}",
            expected,
            compute_checksum(json.as_bytes())
        ));
    }

    Ok(json)
}
