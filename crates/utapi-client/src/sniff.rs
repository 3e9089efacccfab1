//! Content-type detection from leading file bytes
//!
//! Implements the signature table of the WHATWG MIME sniffing standard. Only
//! the first [`SNIFF_LEN`] bytes are considered; the file name is never used.

/// Maximum number of bytes inspected
pub const SNIFF_LEN: usize = 512;

/// Fallback for unrecognized binary content
pub const OCTET_STREAM: &str = "application/octet-stream";

const TEXT_UTF8: &str = "text/plain; charset=utf-8";

enum Signature {
    /// Case-insensitive tag after leading whitespace, followed by space or `>`
    Html(&'static [u8]),
    /// `data & mask == pattern`, optionally after leading whitespace
    Masked {
        mask: &'static [u8],
        pattern: &'static [u8],
        skip_ws: bool,
        mime: &'static str,
    },
    Exact(&'static [u8], &'static str),
    Mp4,
    Text,
}

const HTML: &str = "text/html; charset=utf-8";

static SIGNATURES: &[Signature] = &[
    Signature::Html(b"<!DOCTYPE HTML"),
    Signature::Html(b"<HTML"),
    Signature::Html(b"<HEAD"),
    Signature::Html(b"<SCRIPT"),
    Signature::Html(b"<IFRAME"),
    Signature::Html(b"<H1"),
    Signature::Html(b"<DIV"),
    Signature::Html(b"<FONT"),
    Signature::Html(b"<TABLE"),
    Signature::Html(b"<A"),
    Signature::Html(b"<STYLE"),
    Signature::Html(b"<TITLE"),
    Signature::Html(b"<B"),
    Signature::Html(b"<BODY"),
    Signature::Html(b"<BR"),
    Signature::Html(b"<P"),
    Signature::Html(b"<!--"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF",
        pattern: b"<?xml",
        skip_ws: true,
        mime: "text/xml; charset=utf-8",
    },
    Signature::Exact(b"%PDF-", "application/pdf"),
    Signature::Exact(b"%!PS-Adobe-", "application/postscript"),
    // UTF BOMs
    Signature::Masked {
        mask: b"\xFF\xFF\x00\x00",
        pattern: b"\xFE\xFF\x00\x00",
        skip_ws: false,
        mime: "text/plain; charset=utf-16be",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\x00\x00",
        pattern: b"\xFF\xFE\x00\x00",
        skip_ws: false,
        mime: "text/plain; charset=utf-16le",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\x00",
        pattern: b"\xEF\xBB\xBF\x00",
        skip_ws: false,
        mime: TEXT_UTF8,
    },
    // Images
    Signature::Exact(b"\x00\x00\x01\x00", "image/x-icon"),
    Signature::Exact(b"\x00\x00\x02\x00", "image/x-icon"),
    Signature::Exact(b"BM", "image/bmp"),
    Signature::Exact(b"GIF87a", "image/gif"),
    Signature::Exact(b"GIF89a", "image/gif"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WEBPVP",
        skip_ws: false,
        mime: "image/webp",
    },
    Signature::Exact(b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    Signature::Exact(b"\xFF\xD8\xFF", "image/jpeg"),
    // Audio and video
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"FORM\x00\x00\x00\x00AIFF",
        skip_ws: false,
        mime: "audio/aiff",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF",
        pattern: b"ID3",
        skip_ws: false,
        mime: "audio/mpeg",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF",
        pattern: b"OggS\x00",
        skip_ws: false,
        mime: "application/ogg",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF",
        pattern: b"MThd\x00\x00\x00\x06",
        skip_ws: false,
        mime: "audio/midi",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00AVI ",
        skip_ws: false,
        mime: "video/avi",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WAVE",
        skip_ws: false,
        mime: "audio/wave",
    },
    Signature::Mp4,
    Signature::Exact(b"\x1A\x45\xDF\xA3", "video/webm"),
    // Fonts
    Signature::Exact(b"OTTO", "font/otf"),
    Signature::Exact(b"ttcf", "font/collection"),
    Signature::Exact(b"wOFF", "font/woff"),
    Signature::Exact(b"wOF2", "font/woff2"),
    Signature::Exact(b"\x00\x01\x00\x00", "font/ttf"),
    // Archives
    Signature::Exact(b"\x1F\x8B\x08", "application/x-gzip"),
    Signature::Exact(b"PK\x03\x04", "application/zip"),
    Signature::Exact(b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    Signature::Exact(b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    Signature::Exact(b"\x00\x61\x73\x6D", "application/wasm"),
    Signature::Text,
];

/// Detect the MIME type of `data`, looking at no more than [`SNIFF_LEN`] bytes.
///
/// Always returns a valid MIME type, falling back to
/// `application/octet-stream`.
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];
    let first_non_ws = data
        .iter()
        .position(|b| !is_ws(*b))
        .unwrap_or(data.len());

    SIGNATURES
        .iter()
        .find_map(|sig| sig.sniff(data, first_non_ws))
        .unwrap_or(OCTET_STREAM)
}

impl Signature {
    fn sniff(&self, data: &[u8], first_non_ws: usize) -> Option<&'static str> {
        let matched = match self {
            Self::Html(tag) => {
                let data = &data[first_non_ws..];
                data.len() > tag.len()
                    && data[..tag.len()].eq_ignore_ascii_case(tag)
                    && is_tag_terminator(data[tag.len()])
            }
            Self::Masked {
                mask,
                pattern,
                skip_ws,
                ..
            } => {
                let data = if *skip_ws { &data[first_non_ws..] } else { data };
                data.len() >= pattern.len()
                    && data
                        .iter()
                        .zip(mask.iter())
                        .zip(pattern.iter())
                        .all(|((d, m), p)| d & m == *p)
            }
            Self::Exact(prefix, _) => data.starts_with(prefix),
            Self::Mp4 => is_mp4(data),
            Self::Text => !data.iter().any(|b| is_binary(*b)),
        };

        if !matched {
            return None;
        }

        Some(match self {
            Self::Html(_) => HTML,
            Self::Masked { mime, .. } | Self::Exact(_, mime) => *mime,
            Self::Mp4 => "video/mp4",
            Self::Text => TEXT_UTF8,
        })
    }
}

fn is_ws(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

fn is_tag_terminator(b: u8) -> bool {
    b == b' ' || b == b'>'
}

fn is_binary(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

// ISO base media file with an `ftyp` box naming an mp4 brand
fn is_mp4(data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }

    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < box_size || box_size % 4 != 0 || &data[4..8] != b"ftyp" {
        return false;
    }

    // offset 12 holds the minor version, not a brand
    (8..box_size)
        .step_by(4)
        .filter(|&offset| offset != 12)
        .any(|offset| &data[offset..offset + 3] == b"mp4")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents() {
        assert_eq!(detect_content_type(b"%PDF-1.7\n%\xE2\xE3"), "application/pdf");
        assert_eq!(
            detect_content_type(b"  \n<!doctype html><html></html>"),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            detect_content_type(b"<?xml version=\"1.0\"?><a/>"),
            "text/xml; charset=utf-8"
        );
    }

    #[test]
    fn test_html_needs_terminator() {
        // "<Bogus" is not "<B" followed by a terminator
        assert_eq!(detect_content_type(b"<Bogus markup"), TEXT_UTF8);
        assert_eq!(detect_content_type(b"<b>bold</b>"), HTML);
    }

    #[test]
    fn test_images() {
        assert_eq!(
            detect_content_type(b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR"),
            "image/png"
        );
        assert_eq!(detect_content_type(b"\xFF\xD8\xFF\xE0\x00\x10JFIF"), "image/jpeg");
        assert_eq!(detect_content_type(b"GIF89a\x01\x00"), "image/gif");
        assert_eq!(detect_content_type(b"RIFF\x24\x00\x00\x00WEBPVP8 "), "image/webp");
    }

    #[test]
    fn test_media_and_archives() {
        assert_eq!(detect_content_type(b"RIFF\x24\x00\x00\x00WAVEfmt "), "audio/wave");
        assert_eq!(detect_content_type(b"ID3\x04\x00"), "audio/mpeg");
        assert_eq!(
            detect_content_type(b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00mp42isom"),
            "video/mp4"
        );
        assert_eq!(detect_content_type(b"PK\x03\x04\x14\x00"), "application/zip");
        assert_eq!(detect_content_type(b"\x1F\x8B\x08\x00"), "application/x-gzip");
    }

    #[test]
    fn test_text_and_binary_fallback() {
        assert_eq!(detect_content_type(b""), TEXT_UTF8);
        assert_eq!(detect_content_type(b"hello, world\n"), TEXT_UTF8);
        assert_eq!(detect_content_type(b"\xEF\xBB\xBFhello"), TEXT_UTF8);
        assert_eq!(detect_content_type(b"\x01\x02\x03binary"), OCTET_STREAM);
    }

    #[test]
    fn test_only_first_512_bytes_considered() {
        let mut data = vec![b'a'; SNIFF_LEN];
        data.push(0x00);
        assert_eq!(detect_content_type(&data), TEXT_UTF8);
    }
}
