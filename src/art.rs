//! Album art helpers.
//!
//! Tracks without embedded pictures get a generated placeholder: a square
//! two-color gradient with the first letter of a seed (usually the title)
//! on top. Generation is a pure function of the seed, so the same track
//! always renders the same art without any caching.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const SVG_DATA_PREFIX: &str = "data:image/svg+xml;base64,";

/// Colors and glyph derived from a seed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderArt {
    pub from: (u8, u8, u8),
    pub to: (u8, u8, u8),
    pub glyph: String,
}

impl PlaceholderArt {
    pub fn new(seed: &str) -> Self {
        let hash = seed_hash(seed);
        Self {
            from: rgb((hash & 0x00FF_FFFF) as u32),
            to: rgb(((hash >> 8) & 0x00FF_FFFF) as u32),
            glyph: seed
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_default(),
        }
    }

    /// Render as a self-contained SVG `data:` URI.
    pub fn to_data_uri(&self) -> String {
        let svg = format!(
            concat!(
                r#"<svg width="200" height="200" viewBox="0 0 200 200" xmlns="http://www.w3.org/2000/svg">"#,
                r#"<defs><linearGradient id="grad" x1="0%" y1="0%" x2="100%" y2="100%">"#,
                r#"<stop offset="0%" style="stop-color:{from};stop-opacity:1" />"#,
                r#"<stop offset="100%" style="stop-color:{to};stop-opacity:1" />"#,
                r#"</linearGradient></defs>"#,
                r#"<rect width="200" height="200" fill="url(#grad)" />"#,
                r##"<text x="50%" y="55%" dominant-baseline="middle" text-anchor="middle" font-family="sans-serif" font-size="90" fill="#FFFFFF" opacity="0.6">{glyph}</text>"##,
                r#"</svg>"#
            ),
            from = hex(self.from),
            to = hex(self.to),
            glyph = escape_xml(&self.glyph),
        );
        format!("{SVG_DATA_PREFIX}{}", STANDARD.encode(svg))
    }
}

/// Placeholder album art for `seed` as a `data:` URI.
pub fn placeholder_art(seed: &str) -> String {
    PlaceholderArt::new(seed).to_data_uri()
}

/// Embed raw image bytes as a `data:` URI.
pub fn embed_image(mime: &str, data: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(data))
}

/// What kind of image an album art reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artwork<'a> {
    Placeholder,
    Embedded { mime: &'a str },
    Remote { url: &'a str },
}

impl<'a> Artwork<'a> {
    pub fn classify(reference: &'a str) -> Self {
        if reference.starts_with(SVG_DATA_PREFIX) {
            return Self::Placeholder;
        }
        match reference.strip_prefix("data:") {
            Some(rest) => Self::Embedded {
                mime: rest.split(';').next().unwrap_or_default(),
            },
            None => Self::Remote { url: reference },
        }
    }
}

// 32-bit string hash over UTF-16 code units: h = h * 31 + c, wrapping.
fn seed_hash(seed: &str) -> i32 {
    seed.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

fn rgb(v: u32) -> (u8, u8, u8) {
    ((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_svg(uri: &str) -> String {
        let b64 = uri.strip_prefix(SVG_DATA_PREFIX).unwrap();
        String::from_utf8(STANDARD.decode(b64).unwrap()).unwrap()
    }

    #[test]
    fn placeholder_art_is_deterministic() {
        assert_eq!(placeholder_art("Midnight Drive"), placeholder_art("Midnight Drive"));
        assert_ne!(placeholder_art("Midnight Drive"), placeholder_art("Morning Run"));
    }

    #[test]
    fn seed_hash_matches_java_style_string_hash() {
        assert_eq!(seed_hash(""), 0);
        assert_eq!(seed_hash("a"), 97);
        assert_eq!(seed_hash("ab"), 97 * 31 + 98);
        assert_eq!(seed_hash("hello world"), 1_794_106_052);
        assert_eq!(seed_hash("polygenelubricants"), i32::MIN);
    }

    #[test]
    fn negative_hash_uses_arithmetic_shift() {
        let art = PlaceholderArt::new("polygenelubricants");
        assert_eq!(art.from, (0, 0, 0));
        assert_eq!(art.to, (0x80, 0x00, 0x00));
    }

    #[test]
    fn colors_come_from_masked_and_shifted_hash() {
        // hash("ab") = 3105 = 0x000C21
        let art = PlaceholderArt::new("ab");
        assert_eq!(art.from, (0x00, 0x0C, 0x21));
        assert_eq!(art.to, (0x00, 0x00, 0x0C));
        assert_eq!(art.glyph, "A");
    }

    #[test]
    fn empty_seed_renders_black_gradient_without_glyph() {
        let art = PlaceholderArt::new("");
        assert_eq!(art.from, (0, 0, 0));
        assert_eq!(art.to, (0, 0, 0));
        assert_eq!(art.glyph, "");

        let svg = decode_svg(&placeholder_art(""));
        assert!(svg.contains("stop-color:#000000"));
        assert!(svg.contains("opacity=\"0.6\"></text>"));
    }

    #[test]
    fn svg_contains_colors_and_escaped_glyph() {
        let svg = decode_svg(&placeholder_art("<intro>"));
        assert!(svg.contains("&lt;</text>"));
        assert!(svg.starts_with("<svg width=\"200\""));

        let art = PlaceholderArt::new("neon");
        let svg = decode_svg(&art.to_data_uri());
        assert!(svg.contains(&hex(art.from)));
        assert!(svg.contains(&hex(art.to)));
        assert!(svg.contains(">N</text>"));
    }

    #[test]
    fn classify_distinguishes_reference_kinds() {
        assert_eq!(Artwork::classify(&placeholder_art("x")), Artwork::Placeholder);
        assert_eq!(
            Artwork::classify(&embed_image("image/png", &[1, 2, 3])),
            Artwork::Embedded { mime: "image/png" }
        );
        assert_eq!(
            Artwork::classify("https://picsum.photos/200"),
            Artwork::Remote {
                url: "https://picsum.photos/200"
            }
        );
    }
}
