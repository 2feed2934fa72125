//! Candidate table shown when the operator picks a keeper.

use super::{format_bitrate, format_bytes, format_duration, format_score};
use crate::core::media::MediaInfo;
use console::{measure_text_width, pad_str, Alignment};

const COLUMN_GAP: &str = "  ";

/// Ranked candidates as rows of display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTable {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl CandidateTable {
    /// One row per candidate, numbered from 1 in ranking order.
    /// The score column is left out when nothing was scored.
    pub fn new(ranked: &[MediaInfo], scored: bool) -> Self {
        let mut headers = vec!["choice"];
        if scored {
            headers.push("score");
        }
        headers.extend([
            "id",
            "file",
            "size",
            "duration",
            "bitrate",
            "resolution",
            "codecs",
        ]);

        let rows = ranked
            .iter()
            .enumerate()
            .map(|(i, media)| {
                let mut row = vec![(i + 1).to_string()];
                if scored {
                    row.push(media.score.map(format_score).unwrap_or_else(|| "N/A".to_string()));
                }
                row.extend([
                    media.id.to_string(),
                    media.files.join(", "),
                    format_bytes(media.file_size_bytes),
                    format_duration(media.duration_millis),
                    format_bitrate(media.bitrate_kbps),
                    format!("{} ({} x {})", media.video_resolution, media.width, media.height),
                    format!(
                        "{}, {} x {}",
                        media.video_codec, media.audio_codec, media.audio_channels
                    ),
                ]);
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[&'static str] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Header, separator and rows as aligned lines
    pub fn lines(&self) -> Vec<String> {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                self.rows
                    .iter()
                    .map(|row| measure_text_width(&row[col]))
                    .chain(std::iter::once(self.headers[col].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let render = |cells: Vec<&str>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, None).into_owned())
                .collect::<Vec<_>>()
                .join(COLUMN_GAP)
                .trim_end()
                .to_string()
        };

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(render(self.headers.clone()));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join(COLUMN_GAP),
        );
        for row in &self.rows {
            lines.push(render(row.iter().map(String::as_str).collect()));
        }
        lines
    }
}

impl std::fmt::Display for CandidateTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heat(id: u64, score: Option<i64>) -> MediaInfo {
        MediaInfo {
            id,
            audio_codec: "dca".to_string(),
            video_codec: "h264".to_string(),
            video_resolution: "1080".to_string(),
            width: 1920,
            height: 800,
            duration_millis: 7_265_000,
            bitrate_kbps: 10_432,
            audio_channels: 6,
            files: vec![format!("/movies/Heat.{}.mkv", id)],
            file_size_bytes: 9_468_211_200,
            score,
            ..Default::default()
        }
    }

    #[test]
    fn scored_table_has_score_column() {
        let table = CandidateTable::new(&[heat(4711, Some(101_000))], true);

        assert_eq!(table.headers()[1], "score");
        assert_eq!(
            table.rows()[0],
            vec![
                "1",
                "101,000",
                "4711",
                "/movies/Heat.4711.mkv",
                "8.82 GB",
                "02:01:05",
                "10.19 Mbps",
                "1080 (1920 x 800)",
                "h264, dca x 6",
            ]
        );
    }

    #[test]
    fn filepath_mode_omits_score() {
        let table = CandidateTable::new(&[heat(1, None), heat(2, None)], false);
        assert!(!table.headers().contains(&"score"));
        assert_eq!(table.rows()[1][0], "2");
        assert_eq!(table.rows()[1][1], "2");
    }

    #[test]
    fn lines_are_aligned() {
        let table = CandidateTable::new(&[heat(7, Some(5)), heat(123456, Some(100_000))], true);
        let lines = table.lines();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("choice  score"));
        let id_column = lines[0].find(" id").unwrap() + 1;
        assert_eq!(&lines[2][id_column..id_column + 1], "7");
        assert_eq!(&lines[3][id_column..id_column + 6], "123456");
    }
}
