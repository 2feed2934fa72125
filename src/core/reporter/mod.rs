//! # Reporter Module
//!
//! Human-readable descriptions of duplicate candidates.
//!
//! The operator chooses a keeper from a table like:
//! ```text
//! choice  score    id    file                  size     duration  bitrate    resolution          codecs
//! 1       101,000  4711  /movies/Heat.mkv      8.82 GB  02:01:05  10.19 Mbps 1080 (1920 x 800)   h264, dca x 6
//! ```

mod table;

pub use table::CandidateTable;

const BYTE_UNITS: [(&str, usize); 6] = [
    ("bytes", 0),
    ("KB", 0),
    ("MB", 1),
    ("GB", 2),
    ("TB", 2),
    ("PB", 2),
];

/// `1 byte`, `512 bytes`, `14 KB`, `700.3 MB`, `8.82 GB`
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 1 {
        return "1 byte".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = BYTE_UNITS[0];
    for candidate in BYTE_UNITS {
        unit = candidate;
        if value < 1024.0 {
            break;
        }
        if candidate != BYTE_UNITS[BYTE_UNITS.len() - 1] {
            value /= 1024.0;
        }
    }

    let (suffix, precision) = unit;
    if precision == 0 {
        format!("{} {}", value.trunc() as u64, suffix)
    } else {
        format!("{:.*} {}", precision, value, suffix)
    }
}

/// `HH:MM:SS`
pub fn format_duration(millis: u64) -> String {
    let seconds = millis / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

/// `950 Kbps` below 1024, otherwise `10.19 Mbps`
pub fn format_bitrate(kbps: u64) -> String {
    if kbps < 1024 {
        format!("{} Kbps", kbps)
    } else {
        format!("{:.2} Mbps", kbps as f64 / 1024.0)
    }
}

/// `101000` -> `101,000`
pub fn format_score(score: i64) -> String {
    let digits = score.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if score < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
