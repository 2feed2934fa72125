//! Built-in weight tables and the starter config contents.

use std::collections::BTreeMap;

fn table(entries: &[(&str, i64)]) -> BTreeMap<String, i64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

pub fn default_audio_codec_scores() -> BTreeMap<String, i64> {
    table(&[
        ("Unknown", 0),
        ("wmapro", 200),
        ("mp2", 500),
        ("mp3", 1000),
        ("ac3", 1000),
        ("dca", 2000),
        ("pcm", 2500),
        ("flac", 2500),
        ("dca-ma", 4000),
        ("truehd", 4500),
        ("aac", 1000),
        ("eac3", 1250),
    ])
}

pub fn default_video_codec_scores() -> BTreeMap<String, i64> {
    table(&[
        ("Unknown", 0),
        ("h264", 10000),
        ("h265", 5000),
        ("hevc", 5000),
        ("mpeg4", 500),
        ("vc1", 3000),
        ("vp9", 1000),
        ("mpeg1video", 250),
        ("mpeg2video", 250),
        ("wmv2", 250),
        ("wmv3", 250),
        ("msmpeg4", 100),
        ("msmpeg4v2", 100),
        ("msmpeg4v3", 100),
    ])
}

pub fn default_resolution_scores() -> BTreeMap<String, i64> {
    table(&[
        ("Unknown", 0),
        ("4k", 20000),
        ("1080", 10000),
        ("720", 5000),
        ("480", 3000),
        ("sd", 1000),
    ])
}

/// Example sections: `Movies` (1) and `TV` (2)
pub fn default_libraries() -> BTreeMap<String, i64> {
    table(&[("Movies", 1), ("TV", 2)])
}

/// Release-name weights favouring remuxes and BluRay encodes
pub fn default_filename_scores() -> BTreeMap<String, i64> {
    table(&[
        ("*Remux*", 20000),
        ("*1080p*BluRay*", 15000),
        ("*720p*BluRay*", 10000),
        ("*WEB*NTB*", 5000),
        ("*WEB*VISUM*", 5000),
        ("*WEB*KINGS*", 5000),
        ("*WEB*CasStudio*", 5000),
        ("*WEB*SiGMA*", 5000),
        ("*WEB*QOQ*", 5000),
        ("*WEB*TROLLHD*", 2500),
        ("*REPACK*", 1500),
        ("*PROPER*", 1500),
        ("*WEB*TBS*", -1000),
        ("*HDTV*", -1000),
        ("*dvd*", -1000),
        ("*.avi", -1000),
        ("*.ts", -1000),
        ("*.vob", -5000),
    ])
}
