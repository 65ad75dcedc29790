//! Page layout for plain-text PDF export.
//!
//! Layout is computed in PDF points (1/72 inch) with the origin at the bottom
//! left of the page, independent of the library that draws it.

/// US Letter width in points.
pub const PAGE_WIDTH_PT: f32 = 612.0;
/// US Letter height in points.
pub const PAGE_HEIGHT_PT: f32 = 792.0;
pub const MARGIN_PT: f32 = 50.0;
pub const LINE_STEP_PT: f32 = 15.0;
/// Gap between the title baseline and the first body line.
pub const TITLE_GAP_PT: f32 = 30.0;
pub const TITLE_FONT_SIZE: f32 = 16.0;
pub const BODY_FONT_SIZE: f32 = 12.0;
/// Lines longer than this many characters are hard-wrapped.
pub const MAX_LINE_CHARS: usize = 100;

/// A line of text positioned on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub title: PlacedLine,
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|page| page.lines.len()).sum()
    }
}

/// Split a line into chunks of at most [`MAX_LINE_CHARS`] characters.
///
/// An empty line yields a single empty chunk so that blank lines keep their
/// vertical space.
pub fn wrap_line(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(MAX_LINE_CHARS).map(|chunk| chunk.iter().collect()).collect()
}

/// Wrap every input line of `text`.
pub fn wrap_text(text: &str) -> Vec<String> {
    text.split('\n').map(|line| line.trim_end_matches('\r')).flat_map(wrap_line).collect()
}

/// Lay out `title` and `text` across as many pages as needed.
///
/// The title sits at the top margin of the first page. Body lines advance by
/// [`LINE_STEP_PT`]; a new page starts whenever the next baseline would fall
/// below the bottom margin.
pub fn layout_document(title: &str, text: &str) -> DocumentLayout {
    let top = PAGE_HEIGHT_PT - MARGIN_PT;
    let title = PlacedLine { text: title.to_string(), x: MARGIN_PT, y: top };

    let mut pages = vec![PageLayout::default()];
    let mut y = top - TITLE_GAP_PT;

    for line in wrap_text(text) {
        if y < MARGIN_PT {
            pages.push(PageLayout::default());
            y = top;
        }
        if let Some(page) = pages.last_mut() {
            page.lines.push(PlacedLine { text: line, x: MARGIN_PT, y });
        }
        y -= LINE_STEP_PT;
    }

    DocumentLayout { title, pages }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_lines_are_untouched() {
        assert_eq!(wrap_line("Grade 3: Addition"), vec!["Grade 3: Addition"]);
        assert_eq!(wrap_line(""), vec![""]);
    }

    #[test]
    fn long_line_splits_into_hundred_char_chunks() {
        let line = "x".repeat(250);
        let chunks = wrap_line(&line);
        assert_eq!(chunks.iter().map(|c| c.len()).collect::<Vec<_>>(), vec![100, 100, 50]);
    }

    #[test]
    fn multibyte_characters_are_counted_once() {
        let line = "é".repeat(101);
        let chunks = wrap_line(&line);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 100);
    }

    #[test]
    fn first_page_holds_forty_five_body_lines() {
        let text = vec!["line"; 45].join("\n");
        assert_eq!(layout_document("Title", &text).pages.len(), 1);

        let text = vec!["line"; 46].join("\n");
        let layout = layout_document("Title", &text);
        assert_eq!(layout.pages.len(), 2);
        assert_eq!(layout.pages[1].lines[0].y, PAGE_HEIGHT_PT - MARGIN_PT);
    }

    #[test]
    fn title_is_placed_at_top_margin() {
        let layout = layout_document("Educational Content", "");
        assert_eq!(layout.title.y, 742.0);
        assert_eq!(layout.pages[0].lines[0].y, 712.0);
    }

    proptest! {
        #[test]
        fn wrapping_preserves_content(line in "[a-z ]{0,450}") {
            let chunks = wrap_line(&line);
            let expected = line.chars().count().div_ceil(MAX_LINE_CHARS).max(1);
            prop_assert_eq!(chunks.len(), expected);
            prop_assert!(chunks.iter().all(|c| c.chars().count() <= MAX_LINE_CHARS));
            prop_assert_eq!(chunks.concat(), line);
        }

        #[test]
        fn pagination_breaks_only_at_bottom_margin(
            lines in proptest::collection::vec("[a-z]{0,230}", 1..200)
        ) {
            let text = lines.join("\n");
            let layout = layout_document("T", &text);

            prop_assert_eq!(layout.line_count(), wrap_text(&text).len());
            for (index, page) in layout.pages.iter().enumerate() {
                prop_assert!(!page.lines.is_empty());
                prop_assert!(page.lines.iter().all(|l| l.y >= MARGIN_PT));
                if index + 1 < layout.pages.len() {
                    let last = page.lines.last().map(|l| l.y).unwrap_or(0.0);
                    prop_assert!(last - LINE_STEP_PT < MARGIN_PT);
                }
            }
        }
    }
}
