//! Bitmap-font metrics document — parse and canonical emit.
//!
//! The on-disk format is the XML flavour of the classic bitmap-font
//! description: an `<info>` tag (face, size), a `<common>` tag
//! (lineHeight, base, texture dimensions), a `<chars>` block of
//! `<char id= x= y= width= height= xoffset= yoffset= xadvance=/>`
//! entries and an optional `<kernings>` block of
//! `<kerning first= second= amount=/>` triples.
//!
//! The format is flat and attribute-only, so a small hand-written tag
//! scanner is all that is needed. Emission is canonical — `char` entries
//! ordered by ascending id, kernings by (first, second) — which makes
//! `parse(emit(font))` reproduce identical metrics.

use retrobox_core::{Point, Rect, Symbol};
use thiserror::Error;

use crate::font::{BitmapFont, FontChar};

#[derive(Error, Debug)]
pub enum FontError {
    #[error("malformed font metrics: {0}")]
    Parse(String),
    #[error("missing attribute `{attr}` on <{tag}>")]
    MissingAttribute { tag: String, attr: String },
    #[error("bad value for `{attr}` on <{tag}>: {value:?}")]
    BadValue {
        tag: String,
        attr: String,
        value: String,
    },
    #[error("id {0} is not a valid Unicode scalar value")]
    BadCodePoint(u32),
}

// ── Tag scanner ─────────────────────────────────────────────────────

struct Tag {
    name: String,
    attrs: Vec<(String, String)>,
}

impl Tag {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn require(&self, name: &str) -> Result<&str, FontError> {
        self.attr(name).ok_or_else(|| FontError::MissingAttribute {
            tag: self.name.clone(),
            attr: name.to_string(),
        })
    }

    fn num(&self, name: &str) -> Result<i32, FontError> {
        let raw = self.require(name)?;
        raw.parse::<i32>().map_err(|_| FontError::BadValue {
            tag: self.name.clone(),
            attr: name.to_string(),
            value: raw.to_string(),
        })
    }
}

/// Scan the next tag starting at or after `pos`. Returns the tag and the
/// position one past its closing `>`. Declarations (`<?`), comments and
/// closing tags (`</`) are skipped by the caller via the empty name.
fn next_tag(doc: &str, pos: usize) -> Result<Option<(Tag, usize)>, FontError> {
    let open = match doc[pos..].find('<') {
        Some(i) => pos + i,
        None => return Ok(None),
    };
    let close = doc[open..]
        .find('>')
        .map(|i| open + i)
        .ok_or_else(|| FontError::Parse("unterminated tag".into()))?;
    let inner = doc[open + 1..close]
        .trim_end_matches('/')
        .trim_end_matches('?');

    // Declarations and closing tags carry no data for this format.
    if inner.starts_with('?') || inner.starts_with('/') || inner.starts_with('!') {
        return Ok(Some((
            Tag {
                name: String::new(),
                attrs: Vec::new(),
            },
            close + 1,
        )));
    }

    let name_end = inner
        .find(|c: char| c.is_whitespace())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_string();
    if name.is_empty() {
        return Err(FontError::Parse("empty tag name".into()));
    }

    // Attribute pairs: key="value".
    let mut attrs = Vec::new();
    let mut rest = inner[name_end..].trim_start();
    while !rest.is_empty() {
        let eq = rest
            .find('=')
            .ok_or_else(|| FontError::Parse(format!("attribute without `=` in <{name}>")))?;
        let key = rest[..eq].trim().to_string();
        let after = &rest[eq + 1..];
        if !after.starts_with('"') {
            return Err(FontError::Parse(format!(
                "unquoted attribute `{key}` in <{name}>"
            )));
        }
        let val_end = after[1..]
            .find('"')
            .ok_or_else(|| FontError::Parse(format!("unterminated attribute `{key}`")))?;
        attrs.push((key, unescape(&after[1..1 + val_end])));
        rest = after[val_end + 2..].trim_start();
    }

    Ok(Some((Tag { name, attrs }, close + 1)))
}

fn unescape(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn symbol_for_id(tag: &Tag, attr: &str) -> Result<Symbol, FontError> {
    let id = tag.num(attr)?;
    let cp = u32::try_from(id).map_err(|_| FontError::BadCodePoint(id as u32))?;
    let c = char::from_u32(cp).ok_or(FontError::BadCodePoint(cp))?;
    Ok(Symbol::from(c))
}

// ── Parse ───────────────────────────────────────────────────────────

/// Parse a bitmap-font metrics document.
pub fn parse(doc: &str) -> Result<BitmapFont, FontError> {
    let mut face: Option<String> = None;
    let mut size = 0u32;
    let mut line_height: Option<u32> = None;
    let mut base = 0u32;
    let mut texture_w = 0u32;
    let mut texture_h = 0u32;
    let mut chars: Vec<FontChar> = Vec::new();
    let mut kernings: Vec<(Symbol, Symbol, i32)> = Vec::new();

    let mut pos = 0usize;
    while let Some((tag, next)) = next_tag(doc, pos)? {
        pos = next;
        match tag.name.as_str() {
            "info" => {
                face = Some(tag.require("face")?.to_string());
                size = tag.num("size")?.unsigned_abs();
            }
            "common" => {
                line_height = Some(tag.num("lineHeight")?.unsigned_abs());
                base = tag.num("base")?.unsigned_abs();
                texture_w = tag.num("scaleW")?.unsigned_abs();
                texture_h = tag.num("scaleH")?.unsigned_abs();
            }
            "char" => {
                chars.push(FontChar {
                    id: symbol_for_id(&tag, "id")?,
                    rect: Rect::new(
                        tag.num("x")?,
                        tag.num("y")?,
                        tag.num("width")?.unsigned_abs(),
                        tag.num("height")?.unsigned_abs(),
                    ),
                    offset: Point::new(tag.num("xoffset")?, tag.num("yoffset")?),
                    x_advance: tag.num("xadvance")?,
                });
            }
            "kerning" => {
                kernings.push((
                    symbol_for_id(&tag, "first")?,
                    symbol_for_id(&tag, "second")?,
                    tag.num("amount")?,
                ));
            }
            // Container and declaration tags carry nothing we need.
            _ => {}
        }
    }

    let face = face.ok_or_else(|| FontError::Parse("missing <info> tag".into()))?;
    let line_height =
        line_height.ok_or_else(|| FontError::Parse("missing <common> tag".into()))?;

    log::debug!(
        "parsed font metrics: face={face:?} size={size} chars={} kernings={}",
        chars.len(),
        kernings.len(),
    );

    Ok(BitmapFont::new(
        face, size, line_height, base, texture_w, texture_h, chars, kernings,
    ))
}

// ── Emit ────────────────────────────────────────────────────────────

/// Emit a bitmap-font metrics document in canonical form.
///
/// Entries are ordered by ascending code-point id so that emitted
/// documents are stable and reproducible. Symbols spanning multiple
/// code points have no integer id in this format and are not emitted.
pub fn emit(font: &BitmapFont) -> String {
    let mut chars: Vec<&FontChar> = font
        .chars()
        .filter(|c| c.id.code_point().is_some())
        .collect();
    chars.sort_by_key(|c| c.id.code_point());

    let mut kernings: Vec<(u32, u32, i32)> = font
        .kernings()
        .filter_map(|((a, b), amount)| Some((a.code_point()?, b.code_point()?, amount)))
        .collect();
    kernings.sort();

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\"?>\n<font>\n");
    out.push_str(&format!(
        "  <info face=\"{}\" size=\"{}\"/>\n",
        escape(&font.face),
        font.size,
    ));
    out.push_str(&format!(
        "  <common lineHeight=\"{}\" base=\"{}\" scaleW=\"{}\" scaleH=\"{}\"/>\n",
        font.line_height, font.base, font.texture_w, font.texture_h,
    ));
    out.push_str(&format!("  <chars count=\"{}\">\n", chars.len()));
    for c in &chars {
        out.push_str(&format!(
            "    <char id=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" \
             xoffset=\"{}\" yoffset=\"{}\" xadvance=\"{}\"/>\n",
            c.id.code_point().unwrap_or(0),
            c.rect.x,
            c.rect.y,
            c.rect.w,
            c.rect.h,
            c.offset.x,
            c.offset.y,
            c.x_advance,
        ));
    }
    out.push_str("  </chars>\n");
    if !kernings.is_empty() {
        out.push_str(&format!("  <kernings count=\"{}\">\n", kernings.len()));
        for (first, second, amount) in &kernings {
            out.push_str(&format!(
                "    <kerning first=\"{first}\" second=\"{second}\" amount=\"{amount}\"/>\n",
            ));
        }
        out.push_str("  </kernings>\n");
    }
    out.push_str("</font>\n");
    out
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<font>
  <info face="Pixel Sans" size="13"/>
  <common lineHeight="16" base="13" scaleW="256" scaleH="64"/>
  <chars count="2">
    <char id="65" x="0" y="0" width="8" height="10" xoffset="0" yoffset="2" xadvance="9"/>
    <char id="86" x="9" y="0" width="8" height="10" xoffset="-1" yoffset="2" xadvance="8"/>
  </chars>
  <kernings count="1">
    <kerning first="65" second="86" amount="-2"/>
  </kernings>
</font>
"#;

    #[test]
    fn test_parse_sample() {
        let font = parse(SAMPLE).unwrap();
        assert_eq!(font.face, "Pixel Sans");
        assert_eq!(font.size, 13);
        assert_eq!(font.line_height, 16);
        assert_eq!(font.base, 13);
        assert_eq!((font.texture_w, font.texture_h), (256, 64));
        assert_eq!(font.char_count(), 2);
        assert_eq!(font.kerning_count(), 1);

        let a = font.char_for(&Symbol::from('A')).unwrap();
        assert_eq!(a.rect, Rect::new(0, 0, 8, 10));
        assert_eq!(a.offset, Point::new(0, 2));
        assert_eq!(a.x_advance, 9);
        assert_eq!(font.kerning(&Symbol::from('A'), &Symbol::from('V')), -2);
    }

    #[test]
    fn test_parse_negative_offsets() {
        let font = parse(SAMPLE).unwrap();
        let v = font.char_for(&Symbol::from('V')).unwrap();
        assert_eq!(v.offset.x, -1);
    }

    #[test]
    fn test_round_trip_identical_maps() {
        let font = parse(SAMPLE).unwrap();
        let emitted = emit(&font);
        let again = parse(&emitted).unwrap();

        assert_eq!(font.face, again.face);
        assert_eq!(font.size, again.size);
        assert_eq!(font.line_height, again.line_height);
        assert_eq!(font.base, again.base);
        assert_eq!((font.texture_w, font.texture_h), (again.texture_w, again.texture_h));

        let mut lhs: Vec<&FontChar> = font.chars().collect();
        let mut rhs: Vec<&FontChar> = again.chars().collect();
        lhs.sort_by_key(|c| c.id.clone());
        rhs.sort_by_key(|c| c.id.clone());
        assert_eq!(lhs, rhs);

        let mut lk: Vec<_> = font.kernings().map(|(k, v)| (k.clone(), v)).collect();
        let mut rk: Vec<_> = again.kernings().map(|(k, v)| (k.clone(), v)).collect();
        lk.sort();
        rk.sort();
        assert_eq!(lk, rk);
    }

    #[test]
    fn test_emit_is_canonical_order() {
        // Build a font with chars inserted out of order.
        let chars = vec![
            FontChar {
                id: Symbol::from('Z'),
                rect: Rect::new(0, 0, 5, 5),
                offset: Point::default(),
                x_advance: 6,
            },
            FontChar {
                id: Symbol::from('A'),
                rect: Rect::new(6, 0, 5, 5),
                offset: Point::default(),
                x_advance: 6,
            },
        ];
        let font = BitmapFont::new("T", 10, 12, 10, 64, 16, chars, vec![]);
        let doc = emit(&font);
        let a_pos = doc.find("id=\"65\"").unwrap();
        let z_pos = doc.find("id=\"90\"").unwrap();
        assert!(a_pos < z_pos, "chars must be emitted by ascending id");
    }

    #[test]
    fn test_emit_stable() {
        let font = parse(SAMPLE).unwrap();
        assert_eq!(emit(&font), emit(&font));
    }

    #[test]
    fn test_face_name_escaping_round_trips() {
        let font = BitmapFont::new("A \"B\" <C> & D", 8, 10, 8, 32, 32, vec![], vec![]);
        let again = parse(&emit(&font)).unwrap();
        assert_eq!(again.face, "A \"B\" <C> & D");
    }

    #[test]
    fn test_missing_info_is_error() {
        let err = parse("<font><common lineHeight=\"10\" base=\"8\" scaleW=\"1\" scaleH=\"1\"/></font>");
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_attribute_is_error() {
        let doc = r#"<font><info face="X" size="10"/>
            <common lineHeight="12" base="10" scaleW="8" scaleH="8"/>
            <char id="65" x="0" y="0" width="4" height="4" xoffset="0" yoffset="0"/></font>"#;
        match parse(doc) {
            Err(FontError::MissingAttribute { tag, attr }) => {
                assert_eq!(tag, "char");
                assert_eq!(attr, "xadvance");
            }
            other => panic!("expected MissingAttribute, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_number_is_error() {
        let doc = r#"<font><info face="X" size="ten"/></font>"#;
        assert!(matches!(parse(doc), Err(FontError::BadValue { .. })));
    }

    #[test]
    fn test_bad_code_point_is_error() {
        let doc = r#"<font><info face="X" size="10"/>
            <common lineHeight="12" base="10" scaleW="8" scaleH="8"/>
            <char id="55296" x="0" y="0" width="4" height="4" xoffset="0" yoffset="0" xadvance="5"/></font>"#;
        // 55296 = 0xD800, a surrogate — not a scalar value.
        assert!(matches!(parse(doc), Err(FontError::BadCodePoint(0xD800))));
    }

    #[test]
    fn test_unknown_attributes_ignored() {
        let doc = r#"<font><info face="X" size="10" bold="0" charset=""/>
            <common lineHeight="12" base="10" scaleW="8" scaleH="8" pages="1"/></font>"#;
        let font = parse(doc).unwrap();
        assert_eq!(font.face, "X");
    }
}
