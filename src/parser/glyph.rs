//! Positioned-glyph reader.
//!
//! Walks a page's content stream and emits one [`GlyphRun`] per shown
//! string, carrying the text rendering matrix at the start of the string
//! and the font's base name.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};
use crate::error::Result;

/// Word-break threshold for TJ adjustments, in thousandths of text space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Average glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// A run of text shown by a single text-showing operator.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    /// Decoded, NFC-normalised text (not trimmed)
    pub text: String,
    /// Text rendering matrix `[a, b, c, d, e, f]`
    pub transform: [f32; 6],
    /// Font identifier, e.g. `ABCDEF+Helvetica-Bold`
    pub font_name: String,
}

/// Affine transform in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Matrix([f32; 6]);

impl Matrix {
    pub(crate) const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translation(tx: f32, ty: f32) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    fn from_operands(op: &ContentOp) -> Self {
        Matrix([
            op.number(0, 1.0),
            op.number(1, 0.0),
            op.number(2, 0.0),
            op.number(3, 1.0),
            op.number(4, 0.0),
            op.number(5, 0.0),
        ])
    }

    /// `self × other`
    pub(crate) fn multiply(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    pub(crate) fn values(&self) -> [f32; 6] {
        self.0
    }
}

/// Text state parameters that survive across text objects.
#[derive(Debug, Clone)]
struct TextState {
    font_resource: Vec<u8>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scaling: f32,
    leading: f32,
    rise: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_resource: Vec::new(),
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// Reads glyph runs from pages through a [`PdfBackend`].
pub struct GlyphReader<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> GlyphReader<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Read every glyph run on a page, in content-stream order.
    pub fn read_page(&self, page: PageId) -> Result<Vec<GlyphRun>> {
        let fonts: HashMap<Vec<u8>, String> = self
            .backend
            .page_fonts(page)?
            .into_iter()
            .map(|f| (f.name, f.base_font))
            .collect();

        let content = self.backend.page_content(page)?;
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let ops = self.backend.decode_content(&content)?;

        let mut interp = Interpreter {
            backend: self.backend,
            page,
            fonts: &fonts,
            state: TextState::default(),
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            in_text: false,
            runs: Vec::new(),
        };
        for op in &ops {
            interp.apply(op);
        }
        Ok(interp.runs)
    }
}

struct Interpreter<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    page: PageId,
    fonts: &'a HashMap<Vec<u8>, String>,
    state: TextState,
    ctm: Matrix,
    ctm_stack: Vec<(Matrix, TextState)>,
    tm: Matrix,
    tlm: Matrix,
    in_text: bool,
    runs: Vec<GlyphRun>,
}

impl<'a, B: PdfBackend + ?Sized> Interpreter<'a, B> {
    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "q" => self.ctm_stack.push((self.ctm, self.state.clone())),
            "Q" => {
                if let Some((ctm, state)) = self.ctm_stack.pop() {
                    self.ctm = ctm;
                    self.state = state;
                }
            }
            "cm" => self.ctm = Matrix::from_operands(op).multiply(&self.ctm),
            "BT" => {
                self.in_text = true;
                self.tm = Matrix::IDENTITY;
                self.tlm = Matrix::IDENTITY;
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.state.font_resource = name.clone();
                }
                self.state.font_size = op.number(1, self.state.font_size);
            }
            "Tc" => self.state.char_spacing = op.number(0, 0.0),
            "Tw" => self.state.word_spacing = op.number(0, 0.0),
            "Tz" => self.state.horizontal_scaling = op.number(0, 100.0) / 100.0,
            "TL" => self.state.leading = op.number(0, 0.0),
            "Ts" => self.state.rise = op.number(0, 0.0),
            "Td" => self.move_line(op.number(0, 0.0), op.number(1, 0.0)),
            "TD" => {
                let ty = op.number(1, 0.0);
                self.state.leading = -ty;
                self.move_line(op.number(0, 0.0), ty);
            }
            "Tm" => {
                self.tm = Matrix::from_operands(op);
                self.tlm = self.tm;
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    self.show(items);
                }
            }
            "'" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            "\"" => {
                self.state.word_spacing = op.number(0, self.state.word_spacing);
                self.state.char_spacing = op.number(1, self.state.char_spacing);
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).multiply(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        // Unset leading falls back to the font size.
        let leading = if self.state.leading != 0.0 {
            self.state.leading
        } else {
            self.state.font_size
        };
        self.move_line(0.0, -leading);
    }

    fn rendering_matrix(&self) -> Matrix {
        let size = self.state.font_size;
        Matrix([size, 0.0, 0.0, size, 0.0, self.state.rise])
            .multiply(&self.tm)
            .multiply(&self.ctm)
    }

    fn show(&mut self, items: &[PdfValue]) {
        if !self.in_text {
            return;
        }
        let transform = self.rendering_matrix().values();
        let mut text = String::new();

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    let decoded =
                        self.backend
                            .decode_text(self.page, &self.state.font_resource, bytes);
                    self.advance_by_text(&decoded);
                    text.push_str(&decoded);
                }
                other => {
                    let Some(adjustment) = other.as_number() else {
                        continue;
                    };
                    let shift =
                        -adjustment / 1000.0 * self.state.font_size * self.state.horizontal_scaling;
                    self.tm = Matrix::translation(shift, 0.0).multiply(&self.tm);

                    if -adjustment > TJ_SPACE_THRESHOLD
                        && !text.is_empty()
                        && !text.ends_with(' ')
                        && !text.ends_with('\u{00A0}')
                        && !text.chars().last().is_some_and(is_spaceless_script_char)
                    {
                        text.push(' ');
                    }
                }
            }
        }

        if text.is_empty() {
            return;
        }

        let font_name = self
            .fonts
            .get(&self.state.font_resource)
            .cloned()
            .unwrap_or_else(|| String::from_utf8_lossy(&self.state.font_resource).to_string());

        self.runs.push(GlyphRun {
            text: text.nfc().collect(),
            transform,
            font_name,
        });
    }

    /// Approximate horizontal advance; glyph widths are not consulted.
    fn advance_by_text(&mut self, text: &str) {
        let state = &self.state;
        let width: f32 = text
            .chars()
            .map(|c| {
                let mut w = AVG_GLYPH_WIDTH * state.font_size + state.char_spacing;
                if c == ' ' {
                    w += state.word_spacing;
                }
                w
            })
            .sum();
        let shift = width * state.horizontal_scaling;
        self.tm = Matrix::translation(shift, 0.0).multiply(&self.tm);
    }
}

/// Check if a character belongs to a script written without word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::backend::{decode_text_simple, BackendFontInfo};
    use std::collections::BTreeMap;

    /// Backend serving one page from a prepared operation list.
    struct ScriptedBackend {
        ops: Vec<ContentOp>,
    }

    impl PdfBackend for ScriptedBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (1, 0))])
        }

        fn page_fonts(&self, _page: PageId) -> Result<Vec<BackendFontInfo>> {
            Ok(vec![
                BackendFontInfo {
                    name: b"F1".to_vec(),
                    base_font: "ABCDEF+Helvetica-Bold".to_string(),
                },
                BackendFontInfo {
                    name: b"F2".to_vec(),
                    base_font: "Helvetica".to_string(),
                },
            ])
        }

        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(b"BT ET".to_vec())
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(self.ops.clone())
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            decode_text_simple(bytes)
        }
    }

    fn op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
        ContentOp {
            operator: operator.to_string(),
            operands,
        }
    }

    fn num(n: f32) -> PdfValue {
        PdfValue::Real(n)
    }

    fn string(s: &str) -> PdfValue {
        PdfValue::Str(s.as_bytes().to_vec())
    }

    fn read(ops: Vec<ContentOp>) -> Vec<GlyphRun> {
        let backend = ScriptedBackend { ops };
        GlyphReader::new(&backend).read_page((1, 0)).unwrap()
    }

    #[test]
    fn test_matrix_multiply_identity() {
        let m = Matrix([2.0, 0.0, 0.0, 2.0, 10.0, 20.0]);
        assert_eq!(m.multiply(&Matrix::IDENTITY), m);
        assert_eq!(Matrix::IDENTITY.multiply(&m), m);
    }

    #[test]
    fn test_tf_and_td_produce_transform() {
        let runs = read(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(18.0)]),
            op("Td", vec![num(72.0), num(720.0)]),
            op("Tj", vec![string("Jane Doe")]),
            op("ET", vec![]),
        ]);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Jane Doe");
        assert_eq!(runs[0].font_name, "ABCDEF+Helvetica-Bold");
        assert_eq!(runs[0].transform, [18.0, 0.0, 0.0, 18.0, 72.0, 720.0]);
    }

    #[test]
    fn test_tm_scales_font_size() {
        let runs = read(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(1.0)]),
            op(
                "Tm",
                vec![num(11.0), num(0.0), num(0.0), num(11.0), num(50.0), num(600.0)],
            ),
            op("Tj", vec![string("Education")]),
            op("ET", vec![]),
        ]);
        assert_eq!(runs[0].transform, [11.0, 0.0, 0.0, 11.0, 50.0, 600.0]);
        assert_eq!(runs[0].font_name, "Helvetica");
    }

    #[test]
    fn test_cm_and_restore() {
        let runs = read(vec![
            op("q", vec![]),
            op(
                "cm",
                vec![num(1.0), num(0.0), num(0.0), num(1.0), num(0.0), num(100.0)],
            ),
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(10.0)]),
            op("Td", vec![num(10.0), num(10.0)]),
            op("Tj", vec![string("shifted")]),
            op("ET", vec![]),
            op("Q", vec![]),
            op("BT", vec![]),
            op("Td", vec![num(10.0), num(10.0)]),
            op("Tj", vec![string("plain")]),
            op("ET", vec![]),
        ]);
        assert_eq!(runs[0].transform[5], 110.0);
        assert_eq!(runs[1].transform[5], 10.0);
    }

    #[test]
    fn test_t_star_uses_leading() {
        let runs = read(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(10.0)]),
            op("TL", vec![num(14.0)]),
            op("Td", vec![num(0.0), num(700.0)]),
            op("Tj", vec![string("first")]),
            op("T*", vec![]),
            op("Tj", vec![string("second")]),
            op("'", vec![string("third")]),
            op("ET", vec![]),
        ]);
        let ys: Vec<f32> = runs.iter().map(|r| r.transform[5]).collect();
        assert_eq!(ys, vec![700.0, 686.0, 672.0]);
        assert_eq!(runs[1].transform[4], 0.0);
    }

    #[test]
    fn test_tj_kerning_inserts_space() {
        let runs = read(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(10.0)]),
            op(
                "TJ",
                vec![PdfValue::Array(vec![
                    string("Python"),
                    PdfValue::Integer(-250),
                    string("Go"),
                    PdfValue::Integer(-20),
                    string("lang"),
                ])],
            ),
            op("ET", vec![]),
        ]);
        assert_eq!(runs[0].text, "Python Golang");
    }

    #[test]
    fn test_text_outside_bt_is_ignored() {
        let runs = read(vec![
            op("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(10.0)]),
            op("Tj", vec![string("stray")]),
        ]);
        assert!(runs.is_empty());
    }

    #[test]
    fn test_spaceless_script() {
        assert!(is_spaceless_script_char('学'));
        assert!(is_spaceless_script_char('カ'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }
}
