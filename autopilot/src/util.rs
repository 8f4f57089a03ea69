use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

/// Accepts `0x`-prefixed hex or plain decimal, surrounding whitespace ignored.
pub fn parse_seed(seed: &str) -> Result<u32> {
    let token = seed.trim();
    let (digits, radix) = match token.get(..2) {
        Some("0x" | "0X") => (&token[2..], 16),
        _ => (token, 10),
    };
    if digits.is_empty() {
        return Err(anyhow!("empty seed '{seed}'"));
    }
    u32::from_str_radix(digits, radix).with_context(|| format!("invalid seed '{token}'"))
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

fn collect_seeds<'a>(tokens: impl Iterator<Item = &'a str>, source: &str) -> Result<Vec<u32>> {
    let seeds = tokens
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_seed)
        .collect::<Result<Vec<_>>>()?;
    if seeds.is_empty() {
        return Err(anyhow!("no seeds found in {source}"));
    }
    Ok(seeds)
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    collect_seeds(input.split(','), "--seeds")
}

/// One or more seeds per line (comma separated); `#` starts a comment.
pub fn parse_seed_file(path: &Path) -> Result<Vec<u32>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading seed file {}", path.display()))?;
    let tokens = data
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(|line| line.split(','));
    collect_seeds(tokens, &path.display().to_string())
}

/// `count` seeds starting at `start`, each derived from the previous by an LCG step.
pub fn seed_sequence(start: u32, count: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(count as usize);
    let mut cur = start;
    for _ in 0..count {
        out.push(cur);
        cur = cur.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    }
    out
}

/// FNV-1a over `bytes`; stable across platforms and runs.
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = 0xCBF2_9CE4_8422_2325u64;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_decimal() {
        assert_eq!(parse_seed("0xDEADBEEF").unwrap(), 0xDEAD_BEEF);
        assert_eq!(parse_seed(" 0X10 ").unwrap(), 16);
        assert_eq!(parse_seed("42").unwrap(), 42);
        assert!(parse_seed("").is_err());
        assert!(parse_seed("0xZZ").is_err());
        assert!(parse_seed("-1").is_err());
    }

    #[test]
    fn csv_skips_blanks_and_rejects_empty() {
        assert_eq!(parse_seed_csv("1, 0x2,,3").unwrap(), vec![1, 2, 3]);
        assert!(parse_seed_csv(" , ").is_err());
    }

    #[test]
    fn seed_file_ignores_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seeds.txt");
        fs::write(&path, "# header\n0x0000000a\n\n11, 12 # tail\n").unwrap();
        assert_eq!(parse_seed_file(&path).unwrap(), vec![10, 11, 12]);
    }

    #[test]
    fn hex_round_trip_formatting() {
        assert_eq!(seed_to_hex(0xA57E_0001), "0xa57e0001");
        assert_eq!(parse_seed(&seed_to_hex(7)).unwrap(), 7);
    }

    #[test]
    fn seed_sequence_is_stable() {
        let seeds = seed_sequence(1, 3);
        assert_eq!(seeds[0], 1);
        assert_eq!(seeds[1], 1_664_525u32.wrapping_add(1_013_904_223));
        assert_eq!(seeds.len(), 3);
        assert!(seed_sequence(5, 0).is_empty());
    }

    #[test]
    fn fnv_known_vectors() {
        assert_eq!(fnv1a64(b""), 0xCBF2_9CE4_8422_2325);
        assert_eq!(fnv1a64(b"a"), 0xAF63_DC4C_8601_EC8C);
    }
}
