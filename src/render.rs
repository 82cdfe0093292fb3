use std::path::{Path, PathBuf};

use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;
use time::{Date, OffsetDateTime};

use crate::configuration::LayoutConfiguration;
use crate::error::ContextError;
use crate::fonts::BuiltinFont;
use crate::layout::{iso_date, layout_contact_record, LayoutElement};
use crate::pdf::{DocumentInfo, PdfDocument};
use crate::record::ContactRecord;

/// Runs of whitespace, and the path separators which would otherwise turn the name into
/// a directory.
static FILE_NAME_SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s/\\]+").expect("Failed to compile the file name separator pattern")
});

/// Used in the file name when the record has no name.
pub const DEFAULT_FILE_NAME_STEM: &str = "User";

/// The color of the text, black.
const TEXT_COLOR: [f32; 3] = [0.0, 0.0, 0.0];

/// A rendered contact sheet: the PDF bytes together with the name it is to be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDocument {
    file_name: String,
    bytes: Vec<u8>,
    page_count: usize,
}

impl ContactDocument {
    /// The file name `{name}_{YYYY-MM-DD}.pdf` computed from the record and the generation date.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// The binary PDF payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// A `data:` URL embedding the whole document, which a browser or an `iframe` displays inline.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:application/pdf;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Writes the document into the given directory under its computed file name and returns
    /// the path of the written file.
    pub fn save(&self, directory: &Path) -> Result<PathBuf, ContextError> {
        let pdf_file_path = directory.join(&self.file_name);
        self.save_as(&pdf_file_path)?;

        Ok(pdf_file_path)
    }

    /// Writes the document to the given path, regardless of its computed file name.
    pub fn save_as(&self, pdf_file_path: &Path) -> Result<(), ContextError> {
        std::fs::write(pdf_file_path, &self.bytes).map_err(|error| {
            ContextError::with_error(
                format!("Failed to save the PDF document to {:?}", pdf_file_path),
                &error,
            )
        })?;
        log::info!(
            "Saved the contact sheet ({} bytes) to the path: {:?}",
            self.bytes.len(),
            pdf_file_path
        );

        Ok(())
    }
}

/// Computes `{sanitizedName}_{YYYY-MM-DD}.pdf`, where whitespace runs (and path separators)
/// in the name become underscores and an empty name becomes `User`.
pub fn derive_file_name(name: &str, date: Date) -> String {
    let sanitized_name = FILE_NAME_SEPARATORS.replace_all(name, "_");
    let file_name_stem = if sanitized_name.is_empty() {
        DEFAULT_FILE_NAME_STEM
    } else {
        sanitized_name.as_ref()
    };

    format!("{}_{}.pdf", file_name_stem, iso_date(date))
}

/// Renders the record as a PDF contact sheet generated on the given date.
///
/// The date is the only input that varies with time: the document identifiers and the
/// metadata timestamps are derived from it and from the record, so rendering the same record
/// on the same date yields the same bytes.
pub fn render_contact_record(
    record: &ContactRecord,
    configuration: &LayoutConfiguration,
    generated_on: Date,
) -> Result<ContactDocument, ContextError> {
    let file_name = derive_file_name(record.name(), generated_on);
    let document_layout = layout_contact_record(record, configuration, generated_on);
    log::debug!(
        "Laid out the contact sheet {:?} on {} page(s), ending at {:.1}mm",
        file_name,
        document_layout.pages.len(),
        document_layout.final_cursor
    );

    let document_identifier = file_name.trim_end_matches(".pdf").to_string();
    let mut pdf_document = PdfDocument::new(document_identifier.clone());
    let font_indices = BuiltinFont::ALL.map(|font| (font, pdf_document.add_builtin_font(font)));
    let font_index = |font: BuiltinFont| {
        font_indices
            .iter()
            .find(|(registered_font, _)| *registered_font == font)
            .map(|(_, font_index)| *font_index)
            .ok_or(ContextError::with_context(format!(
                "The font {} has not been registered",
                font.base_font()
            )))
    };

    let page_height = configuration.page_height;
    for page_layout in &document_layout.pages {
        let (page_index, layer_index) =
            pdf_document.add_page_with_layer(configuration.page_width, page_height);

        // The layout measures from the top of the page, the PDF from the bottom
        for element in &page_layout.elements {
            match element {
                LayoutElement::Text(text_run) => {
                    let [x, y] = text_run.position;
                    pdf_document.write_text_to_layer_in_page(
                        page_index,
                        layer_index,
                        TEXT_COLOR,
                        &text_run.text,
                        font_index(text_run.font)?,
                        text_run.font_size,
                        [x, page_height - y],
                    )?;
                }
                LayoutElement::Line(rule) => {
                    pdf_document.draw_line_to_layer_in_page(
                        page_index,
                        layer_index,
                        rule.color,
                        rule.thickness,
                        [rule.from[0], page_height - rule.from[1]],
                        [rule.to[0], page_height - rule.to[1]],
                    )?;
                }
            }
        }
    }

    let document_info = DocumentInfo {
        title: format!("Contact details: {}", record.name()),
        author: record.name().to_string(),
        subject: "Contact details".into(),
        creation_date: generated_on.midnight().assume_utc(),
    };
    let instance_id = format!("{}_{}", document_identifier, record.phone());
    pdf_document.write_all(instance_id, &document_info)?;
    let bytes = pdf_document.save_to_bytes()?;

    Ok(ContactDocument {
        file_name,
        bytes,
        page_count: document_layout.pages.len(),
    })
}

/// Renders the record with today's date, in UTC.
pub fn render_contact_record_today(
    record: &ContactRecord,
    configuration: &LayoutConfiguration,
) -> Result<ContactDocument, ContextError> {
    render_contact_record(record, configuration, today())
}

/// The current date, in UTC.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn whitespace_runs_become_single_underscores() {
        assert_eq!(
            derive_file_name("Ada Lovelace", date!(2026-10-19)),
            "Ada_Lovelace_2026-10-19.pdf"
        );
        assert_eq!(
            derive_file_name("Ada \t  King\nLovelace", date!(2026-01-02)),
            "Ada_King_Lovelace_2026-01-02.pdf"
        );
    }

    #[test]
    fn empty_names_default_to_user() {
        assert_eq!(
            derive_file_name("", date!(2026-10-19)),
            "User_2026-10-19.pdf"
        );
    }

    #[test]
    fn rendering_today_names_the_file_after_today() {
        let record = crate::validation::validate(&crate::record::RawSubmission {
            name: Some("John Doe".into()),
            email: Some("john@doe.com".into()),
            phone: Some("1234567890".into()),
            ..Default::default()
        })
        .unwrap();
        let contact_document =
            render_contact_record_today(&record, &LayoutConfiguration::default()).unwrap();

        // Tolerate the date changing in between
        let yesterday = today().previous_day().unwrap();
        assert!(
            contact_document.file_name() == derive_file_name("John Doe", today())
                || contact_document.file_name() == derive_file_name("John Doe", yesterday)
        );
    }

    #[test]
    fn path_separators_do_not_escape_the_directory() {
        assert_eq!(
            derive_file_name("../etc/passwd", date!(2026-10-19)),
            ".._etc_passwd_2026-10-19.pdf"
        );
        assert_eq!(
            derive_file_name(r"a\b", date!(2026-10-19)),
            "a_b_2026-10-19.pdf"
        );
    }
}
