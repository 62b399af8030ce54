use std::ops::Range;

use crate::color::Color;
use crate::math::BoundingBox;
use crate::mesh::TextureId;

/// Alignment of text lines inside the space available to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

impl TextAlign {
    /// Offset of content of length `used` inside `available`.
    #[inline]
    pub fn offset(self, available: f32, used: f32) -> f32 {
        match self {
            TextAlign::Start => 0.0,
            TextAlign::Center => (available - used) / 2.0,
            TextAlign::End => available - used,
        }
    }
}

/// Configuration settings for text elements.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextConfig {
    /// The color of the text.
    pub color: Color,
    /// Fonts are not managed here. The caller assigns a unique id to each font
    /// and resolves it in its [`TextMeasurer`] and [`GlyphAtlas`].
    pub font_id: u16,
    /// The font size of the text.
    pub font_size: f32,
    /// The height of each line of text. `0.0` uses the font size.
    pub line_height: f32,
    /// Alignment of lines against each other, and of the text inside a wider element.
    pub horizontal_align: TextAlign,
    /// Alignment of the text inside a taller element.
    pub vertical_align: TextAlign,
    /// Wraps on whitespace and new lines when set; one line otherwise.
    pub multiline: bool,
}

impl TextConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text color.
    #[inline]
    pub fn color(&mut self, color: impl Into<Color>) -> &mut Self {
        self.color = color.into();
        self
    }

    /// Sets the font ID. The user is responsible for assigning unique font IDs.
    #[inline]
    pub fn font_id(&mut self, id: u16) -> &mut Self {
        self.font_id = id;
        self
    }

    /// Sets the font size.
    #[inline]
    pub fn font_size(&mut self, size: f32) -> &mut Self {
        self.font_size = size;
        self
    }

    /// Sets the line height.
    #[inline]
    pub fn line_height(&mut self, height: f32) -> &mut Self {
        self.line_height = height;
        self
    }

    #[inline]
    pub fn horizontal_align(&mut self, align: TextAlign) -> &mut Self {
        self.horizontal_align = align;
        self
    }

    #[inline]
    pub fn vertical_align(&mut self, align: TextAlign) -> &mut Self {
        self.vertical_align = align;
        self
    }

    #[inline]
    pub fn multiline(&mut self, multiline: bool) -> &mut Self {
        self.multiline = multiline;
        self
    }

    #[inline]
    pub fn end(&self) -> Self {
        self.clone()
    }

    /// Line height in pixels, falling back to the font size.
    pub fn effective_line_height(&self) -> f32 {
        if self.line_height > 0.0 {
            self.line_height
        } else {
            self.font_size
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            font_id: 0,
            font_size: 16.0,
            line_height: 0.0,
            horizontal_align: TextAlign::Start,
            vertical_align: TextAlign::Center,
            multiline: false,
        }
    }
}

/// One laid out line of text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLine {
    /// Relative to the top-left corner of the text block.
    pub bounds: BoundingBox,
    /// Byte range of the line in the source text.
    pub range: Range<usize>,
    /// Pen position after each character of the line, relative to `bounds.x`.
    pub char_offsets: Vec<f32>,
}

impl TextLine {
    /// Pen position before the character at `index`.
    pub fn char_start(&self, index: usize) -> f32 {
        match index {
            0 => 0.0,
            i => self.char_offsets.get(i - 1).copied().unwrap_or(self.bounds.width),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLayout {
    pub lines: Vec<TextLine>,
    pub width: f32,
    pub height: f32,
}

/// Measures and breaks text into lines.
///
/// The layout engine treats the result as the intrinsic size of a text element.
pub trait TextMeasurer {
    fn layout_text(&self, text: &str, config: &TextConfig, max_width: f32) -> TextLayout;
}

/// One glyph of a font atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Quad relative to the pen position at the top of the line.
    pub bounds: BoundingBox,
    /// Region of the atlas texture, normalized to `0.0..=1.0`.
    pub uv: BoundingBox,
}

/// Source of glyph quads for text rendering.
pub trait GlyphAtlas {
    /// Texture holding the glyphs of `font_id`.
    fn texture(&self, font_id: u16) -> TextureId;
    /// `None` for characters without a visible glyph.
    fn glyph(&self, font_id: u16, font_size: f32, ch: char) -> Option<Glyph>;
}

/// Measures every character with the same advance, a fixed share of the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    pub advance_ratio: f32,
}

impl MonospaceMeasurer {
    pub fn new(advance_ratio: f32) -> Self {
        Self { advance_ratio }
    }

    fn wrap_paragraph(
        text: &str,
        paragraph: Range<usize>,
        advance: f32,
        max_width: f32,
        lines: &mut Vec<Range<usize>>,
    ) {
        let mut line: Option<Range<usize>> = None;
        let mut word_start = paragraph.start;
        for word in text[paragraph.clone()].split(' ') {
            let start = word_start;
            let end = start + word.len();
            word_start = end + 1;
            if word.is_empty() {
                continue;
            }
            line = Some(match line {
                None => start..end,
                Some(current) => {
                    let width = text[current.start..end].chars().count() as f32 * advance;
                    if width > max_width {
                        lines.push(current);
                        start..end
                    } else {
                        current.start..end
                    }
                }
            });
        }
        lines.push(line.unwrap_or(paragraph.start..paragraph.start));
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn layout_text(&self, text: &str, config: &TextConfig, max_width: f32) -> TextLayout {
        let advance = config.font_size * self.advance_ratio;
        let line_height = config.effective_line_height();

        let mut ranges = Vec::new();
        if config.multiline {
            let mut start = 0;
            for paragraph in text.split('\n') {
                let end = start + paragraph.len();
                Self::wrap_paragraph(text, start..end, advance, max_width, &mut ranges);
                start = end + 1;
            }
        } else {
            ranges.push(0..text.len());
        }

        let mut lines: Vec<TextLine> = ranges
            .into_iter()
            .enumerate()
            .map(|(index, range)| {
                let count = text[range.clone()].chars().count();
                let char_offsets: Vec<f32> = (1..=count).map(|i| i as f32 * advance).collect();
                TextLine {
                    bounds: BoundingBox::new(0.0, index as f32 * line_height, count as f32 * advance, line_height),
                    range,
                    char_offsets,
                }
            })
            .collect();

        let width = lines.iter().map(|l| l.bounds.width).fold(0.0, f32::max);
        for line in &mut lines {
            line.bounds.x = config.horizontal_align.offset(width, line.bounds.width);
        }

        TextLayout {
            height: lines.len() as f32 * line_height,
            width,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(multiline: bool) -> TextConfig {
        TextConfig::new().font_size(10.0).multiline(multiline).end()
    }

    #[test]
    fn single_line_ignores_width() {
        let layout = MonospaceMeasurer::new(1.0).layout_text("hello world", &config(false), 20.0);
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.width, 110.0);
        assert_eq!(layout.height, 10.0);
    }

    #[test]
    fn wraps_on_words() {
        let text = "aaa bbb cc";
        let layout = MonospaceMeasurer::new(1.0).layout_text(text, &config(true), 75.0);
        let lines: Vec<&str> = layout.lines.iter().map(|l| &text[l.range.clone()]).collect();
        assert_eq!(lines, vec!["aaa bbb", "cc"]);
        assert_eq!(layout.width, 70.0);
        assert_eq!(layout.height, 20.0);
        assert_eq!(layout.lines[1].bounds.y, 10.0);
    }

    #[test]
    fn breaks_on_newlines_and_keeps_empty_lines() {
        let text = "ab\n\ncd";
        let layout = MonospaceMeasurer::new(1.0).layout_text(text, &config(true), f32::INFINITY);
        assert_eq!(layout.lines.len(), 3);
        assert!(layout.lines[1].range.is_empty());
        assert_eq!(&text[layout.lines[2].range.clone()], "cd");
    }

    #[test]
    fn char_offsets_accumulate() {
        let layout = MonospaceMeasurer::new(0.5).layout_text("abc", &config(false), f32::INFINITY);
        let line = &layout.lines[0];
        assert_eq!(line.char_offsets, vec![5.0, 10.0, 15.0]);
        assert_eq!(line.char_start(0), 0.0);
        assert_eq!(line.char_start(2), 10.0);
    }

    #[test]
    fn lines_align_within_block() {
        let mut config = config(true);
        config.horizontal_align(TextAlign::End);
        let layout = MonospaceMeasurer::new(1.0).layout_text("abcd\nab", &config, f32::INFINITY);
        assert_eq!(layout.lines[0].bounds.x, 0.0);
        assert_eq!(layout.lines[1].bounds.x, 20.0);
    }

    #[test]
    fn line_height_falls_back_to_font_size() {
        let mut config = TextConfig::default();
        assert_eq!(config.effective_line_height(), 16.0);
        config.line_height(20.0);
        assert_eq!(config.effective_line_height(), 20.0);
    }
}
