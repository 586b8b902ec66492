//! Page layout in PDF points, origin bottom-left.

use super::TripDocument;

pub const PAGE_WIDTH_PT: f32 = 612.0;
pub const PAGE_HEIGHT_PT: f32 = 792.0;
pub const MARGIN_PT: f32 = 72.0;

const TITLE: &str = "Your Travel Itinerary";
const SPACER_PT: f32 = 12.0;
const BULLET: &str = "\u{2022} ";
/// Rough Helvetica advance width as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TextStyle {
    size: f32,
    leading: f32,
    weight: FontWeight,
}

const TITLE_STYLE: TextStyle = TextStyle { size: 18.0, leading: 22.0, weight: FontWeight::Bold };
const HEADING_STYLE: TextStyle = TextStyle { size: 14.0, leading: 17.0, weight: FontWeight::Bold };
const BODY_STYLE: TextStyle = TextStyle { size: 10.0, leading: 12.0, weight: FontWeight::Regular };

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub size: f32,
    pub weight: FontWeight,
    pub x: f32,
    /// Baseline.
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

struct Cursor {
    pages: Vec<Page>,
    top: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            top: PAGE_HEIGHT_PT - MARGIN_PT,
        }
    }

    fn paragraph(&mut self, text: &str, style: TextStyle, indent: &str) {
        let width = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;
        let max_chars = ((width / (style.size * AVG_CHAR_WIDTH)) as usize).max(1);
        for (i, line) in wrap(text, max_chars.saturating_sub(indent.chars().count()).max(1))
            .into_iter()
            .enumerate()
        {
            let text = if i == 0 {
                line
            } else {
                format!("{}{}", " ".repeat(indent.chars().count()), line)
            };
            self.line(text, style);
        }
    }

    fn line(&mut self, text: String, style: TextStyle) {
        if self.top - style.leading < MARGIN_PT {
            self.pages.push(Page::default());
            self.top = PAGE_HEIGHT_PT - MARGIN_PT;
        }
        let y = self.top - style.size;
        self.top -= style.leading;
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(PlacedLine {
                text,
                size: style.size,
                weight: style.weight,
                x: MARGIN_PT,
                y,
            });
        }
    }

    fn space(&mut self) {
        self.top -= SPACER_PT;
    }
}

/// Lays out title, destinations, duration and one heading plus bulleted activities
/// per day, starting a new page whenever the bottom margin would be crossed.
pub fn layout_document(doc: &TripDocument) -> Vec<Page> {
    let mut cursor = Cursor::new();

    cursor.paragraph(TITLE, TITLE_STYLE, "");
    cursor.space();

    cursor.paragraph(&format!("Destinations: {}", doc.destinations.join(", ")), HEADING_STYLE, "");
    cursor.space();

    cursor.paragraph(&format!("Duration: {} days", doc.duration), HEADING_STYLE, "");
    cursor.space();

    for (day, activities) in &doc.itinerary {
        cursor.paragraph(&format!("Day {}", day), HEADING_STYLE, "");
        for activity in activities {
            cursor.paragraph(&format!("{}{}", BULLET, activity), BODY_STYLE, BULLET);
        }
        cursor.space();
    }

    cursor.pages
}

/// Greedy word wrap; words longer than a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() { 0 } else { current.chars().count() + 1 };
        if needed + word.chars().count() > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(days: usize, activities: usize) -> TripDocument {
        TripDocument {
            id: "t1".to_string(),
            destinations: vec!["Paris".to_string(), "Lyon".to_string()],
            duration: days as i64,
            itinerary: (1..=days)
                .map(|d| {
                    (
                        d.to_string(),
                        (1..=activities).map(|a| format!("Activity {}", a)).collect(),
                    )
                })
                .collect(),
        }
    }

    fn texts(pages: &[Page]) -> Vec<String> {
        pages.iter().flat_map(|p| p.lines.iter().map(|l| l.text.clone())).collect()
    }

    #[test]
    fn lays_out_header_then_days() {
        let pages = layout_document(&doc(2, 2));
        assert_eq!(pages.len(), 1);
        assert_eq!(
            texts(&pages),
            vec![
                "Your Travel Itinerary",
                "Destinations: Paris, Lyon",
                "Duration: 2 days",
                "Day 1",
                "\u{2022} Activity 1",
                "\u{2022} Activity 2",
                "Day 2",
                "\u{2022} Activity 1",
                "\u{2022} Activity 2",
            ]
        );
        let first = &pages[0].lines[0];
        assert_eq!(first.weight, FontWeight::Bold);
        assert_eq!(first.x, MARGIN_PT);
        assert!(first.y < PAGE_HEIGHT_PT - MARGIN_PT);
    }

    #[test]
    fn paginates_within_margins() {
        let pages = layout_document(&doc(20, 10));
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(!page.lines.is_empty());
            for line in &page.lines {
                assert!(line.y >= MARGIN_PT - line.size, "line {:?} crosses bottom margin", line.text);
                assert!(line.y <= PAGE_HEIGHT_PT - MARGIN_PT);
            }
        }
        assert_eq!(texts(&pages).iter().filter(|t| t.starts_with("Day ")).count(), 20);
    }

    #[test]
    fn long_activity_wraps() {
        let mut document = doc(1, 0);
        document.itinerary[0].1.push("walk ".repeat(60).trim().to_string());
        let pages = layout_document(&document);
        let body: Vec<&PlacedLine> = pages[0].lines.iter().filter(|l| l.size == BODY_STYLE.size).collect();
        assert!(body.len() > 1);
        assert!(body[0].text.starts_with(BULLET));
        assert!(body[1].text.starts_with("  walk"));
    }

    #[test]
    fn wrap_splits_overlong_words() {
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("a bb ccc", 4), vec!["a bb", "ccc"]);
        assert_eq!(wrap("", 4), vec![""]);
    }
}
