use time::Date;

use crate::configuration::LayoutConfiguration;
use crate::fonts::BuiltinFont;
use crate::record::{ContactRecord, Field};

/// Printed in place of an empty value.
pub const EMPTY_VALUE_PLACEHOLDER: &str = "-";

/// A piece of text placed with its baseline starting at `position`, in millimeters from the
/// top-left corner of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: BuiltinFont,
    pub font_size: f32,
    pub position: [f32; 2],
}

/// A straight line between two points, in millimeters from the top-left corner of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub color: [f32; 3],
    pub thickness: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutElement {
    Text(TextRun),
    Line(Rule),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub elements: Vec<LayoutElement>,
}

impl PageLayout {
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|element| match element {
            LayoutElement::Text(text_run) => Some(text_run),
            LayoutElement::Line(_) => None,
        })
    }

    fn push_text(&mut self, text: String, font: BuiltinFont, font_size: f32, position: [f32; 2]) {
        self.elements.push(LayoutElement::Text(TextRun {
            text,
            font,
            font_size,
            position,
        }));
    }
}

/// The positioned contents of every page of the contact sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
    /// Where the vertical cursor ended up on the last page, after the description block.
    pub(crate) final_cursor: f32,
}

/// Lays the record out top to bottom.
///
/// Name, email, phone and position each get a bold label and a value on the same baseline,
/// one line height apart. The description follows, wrapped to the configured width and
/// continued on a new page when it would run into the footer area. Every page ends with a
/// separator and a centered footer carrying the generation date.
pub fn layout_contact_record(
    record: &ContactRecord,
    configuration: &LayoutConfiguration,
    generated_on: Date,
) -> DocumentLayout {
    let mut pages = vec![PageLayout::default()];
    let mut cursor = configuration.top_margin;

    for field in [Field::Name, Field::Email, Field::Phone, Field::Position] {
        let page = last_page(&mut pages);
        page.push_text(
            field.label().into(),
            BuiltinFont::HelveticaBold,
            configuration.font_size,
            [configuration.label_column, cursor],
        );
        page.push_text(
            value_or_placeholder(record.value(field)),
            BuiltinFont::Helvetica,
            configuration.font_size,
            [configuration.value_column, cursor],
        );
        cursor += configuration.line_height;
    }

    last_page(&mut pages).push_text(
        Field::Description.label().into(),
        BuiltinFont::HelveticaBold,
        configuration.font_size,
        [configuration.label_column, cursor],
    );

    let description_lines = wrap_text(
        &value_or_placeholder(record.description()),
        BuiltinFont::Helvetica,
        configuration.font_size,
        configuration.description_max_width,
    );
    let wrapped_line_spacing = configuration.wrapped_line_spacing();
    let mut line_cursor = cursor;
    for (index, line) in description_lines.into_iter().enumerate() {
        if index > 0 {
            line_cursor += wrapped_line_spacing;
        }
        // At least one line is placed on every page, so the layout always makes progress
        if index > 0 && line_cursor > configuration.content_bottom_limit {
            log::debug!(
                "The description continues on page {} after line {}",
                pages.len() + 1,
                index
            );
            pages.push(PageLayout::default());
            line_cursor = configuration.top_margin;
        }
        last_page(&mut pages).push_text(
            line,
            BuiltinFont::Helvetica,
            configuration.font_size,
            [configuration.value_column, line_cursor],
        );
    }
    let final_cursor = line_cursor + configuration.line_height;

    let footer_text = footer_text(generated_on);
    for page in pages.iter_mut() {
        push_footer(page, configuration, &footer_text);
    }

    DocumentLayout {
        pages,
        final_cursor,
    }
}

/// The footer line printed at the bottom of every page.
pub fn footer_text(generated_on: Date) -> String {
    format!("Generated on: {}", iso_date(generated_on))
}

/// Formats the date as `YYYY-MM-DD`.
pub fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn push_footer(page: &mut PageLayout, configuration: &LayoutConfiguration, footer_text: &str) {
    let [separator_start, separator_end] = configuration.separator_x_range;
    page.elements.push(LayoutElement::Line(Rule {
        from: [separator_start, configuration.separator_y],
        to: [separator_end, configuration.separator_y],
        color: configuration.separator_color_components(),
        thickness: configuration.separator_thickness,
    }));

    let footer_width =
        BuiltinFont::HelveticaOblique.text_width(footer_text, configuration.footer_font_size);
    page.push_text(
        footer_text.into(),
        BuiltinFont::HelveticaOblique,
        configuration.footer_font_size,
        [
            configuration.footer_x - footer_width / 2.0,
            configuration.footer_y,
        ],
    );
}

fn last_page(pages: &mut Vec<PageLayout>) -> &mut PageLayout {
    if pages.is_empty() {
        pages.push(PageLayout::default());
    }
    let last_index = pages.len() - 1;
    &mut pages[last_index]
}

fn value_or_placeholder(value: &str) -> String {
    if value.is_empty() {
        EMPTY_VALUE_PLACEHOLDER.into()
    } else {
        value.into()
    }
}

/// Splits the text into lines no wider than `maximum_width` millimeters when set in the given
/// font and size.
///
/// Explicit line breaks are kept, words are separated by single spaces and a word that does
/// not fit on a line of its own is broken between characters.
pub fn wrap_text(text: &str, font: BuiltinFont, font_size: f32, maximum_width: f32) -> Vec<String> {
    let fits = |candidate: &str| font.text_width(candidate, font_size) <= maximum_width;
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current_line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };
            if fits(&candidate) {
                current_line = candidate;
                continue;
            }

            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            if fits(word) {
                current_line = word.to_string();
                continue;
            }

            for character in word.chars() {
                current_line.push(character);
                if !fits(&current_line) && current_line.chars().count() > 1 {
                    current_line.pop();
                    lines.push(std::mem::take(&mut current_line));
                    current_line.push(character);
                }
            }
        }
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
