use lopdf::{content::Operation, Object, StringFormat};
use std::{collections::BTreeMap, io::BufWriter, mem};
use time::OffsetDateTime;

use crate::error::ContextError;
use crate::fonts::{encode_win_ansi, millimeters_to_points, BuiltinFont};

/// One layer of PDF data, that is the sequence of content operations drawn on a page.
#[derive(Debug, Clone)]
pub struct PdfLayer {
    /// Name of the layer, only used for diagnostics.
    pub(crate) name: String,
    /// Content operations of this layer. One layer equals to one content stream.
    pub(crate) operations: Vec<Operation>,
}

impl PdfLayer {
    /// Encodes the operations into an uncompressed content stream, isolating the graphics
    /// state of the layer with the `q`/`Q` operators.
    fn into_stream(self) -> Result<lopdf::Stream, ContextError> {
        let mut operations = Vec::with_capacity(self.operations.len() + 2);
        operations.push(Operation::new("q", vec![]));
        operations.extend(self.operations);
        operations.push(Operation::new("Q", vec![]));

        let stream_content = lopdf::content::Content { operations }
            .encode()
            .map_err(|error| {
                ContextError::with_error(
                    format!("Failed to encode the content of the layer {:?}", self.name),
                    &error,
                )
            })?;

        // Page contents are left uncompressed so that they stay inspectable
        Ok(lopdf::Stream::new(lopdf::Dictionary::new(), stream_content).with_compression(false))
    }
}

/// The representation of a PDF page, with its size in points and its layers.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    /// Page layers.
    pub layers: Vec<PdfLayer>,
}

/// The metadata written into the document information dictionary.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    /// Used for both the creation and the modification date.
    pub creation_date: OffsetDateTime,
}

/// This struct represents the actual PDF document on a high-level. It is an interface to the
/// underlying `lopdf::Document` with the addition of the pages, the document identifier and the
/// fonts used in the document.
///
/// Positions are given in millimeters from the bottom-left corner of the page, as the PDF
/// coordinate system expects, and converted to points when the operations are emitted.
/// Nothing in the output is random: given the same calls, identifier and metadata, the saved
/// bytes are identical.
pub struct PdfDocument {
    /// The association between the font resource names, the object they are stored in and the font.
    fonts: BTreeMap<String, (lopdf::ObjectId, BuiltinFont)>,
    /// The underlying PDF document.
    pub inner_document: lopdf::Document,
    /// The identifier of the document, it is used in order to set the PDF `ID` tag.
    pub identifier: String,
    /// The pages of the PDF document.
    pub(crate) pages: Vec<PdfPage>,
}

impl PdfDocument {
    /// Create a new `PdfDocument` by defaulting the underlying PDF document to version 1.5
    /// of the PDF specification and customly specifying the PDF identifier.
    pub fn new(pdf_document_identifier: String) -> Self {
        PdfDocument {
            fonts: BTreeMap::default(),
            inner_document: lopdf::Document::with_version("1.5"),
            identifier: pdf_document_identifier,
            pages: Vec::new(),
        }
    }

    /// Adds a page of given width and height in millimeters with an empty layer for contents
    /// to be added to. Returns the index of the page and of the layer in the page, which are to
    /// be passed to the drawing functions.
    pub fn add_page_with_layer(&mut self, page_width: f32, page_height: f32) -> (usize, usize) {
        let pdf_page = PdfPage {
            width: millimeters_to_points(page_width),
            height: millimeters_to_points(page_height),
            layers: vec![PdfLayer {
                name: "Layer0".into(),
                operations: Vec::new(),
            }],
        };
        self.pages.push(pdf_page);

        (self.pages.len() - 1, 0)
    }

    /// Registers one of the standard fonts and returns its index, to be passed to
    /// `write_text_to_layer_in_page`. Adding the same font twice returns the same index.
    pub fn add_builtin_font(&mut self, font: BuiltinFont) -> usize {
        let registered_font_index = self
            .fonts
            .iter()
            .find(|(_, (_, registered_font))| *registered_font == font)
            .and_then(|(font_resource_name, _)| font_resource_name[1..].parse::<usize>().ok());
        if let Some(font_index) = registered_font_index {
            return font_index;
        }

        let font_index = self.fonts.len();
        let font_object_id = self.inner_document.new_object_id();
        self.fonts
            .insert(font_resource_name(font_index), (font_object_id, font));

        font_index
    }

    /// Writes the text in the specified font, size and color with its baseline starting at the
    /// given position, on the given layer of the specified page.
    ///
    /// The text is encoded with `WinAnsiEncoding`, characters outside of it are replaced.
    #[allow(clippy::too_many_arguments)]
    pub fn write_text_to_layer_in_page(
        &mut self,
        page_index: usize,
        layer_index: usize,
        color: [f32; 3],
        text: &str,
        font_index: usize,
        font_size: f32,
        position: [f32; 2],
    ) -> Result<(), ContextError> {
        let font_resource_name = font_resource_name(font_index);
        if !self.fonts.contains_key(&font_resource_name) {
            return Err(ContextError::with_context(format!(
                "Failed to find font {} into the fonts map",
                font_index
            )));
        }

        let [x, y] = position;
        let [red, green, blue] = color;
        self.add_operations_to_layer_in_page(
            layer_index,
            page_index,
            vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(font_resource_name.into_bytes()), font_size.into()],
                ),
                Operation::new(
                    "Td",
                    vec![millimeters_to_points(x).into(), millimeters_to_points(y).into()],
                ),
                Operation::new(
                    "rg",
                    vec![red, green, blue].into_iter().map(Object::Real).collect(),
                ),
                Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ),
                Operation::new("ET", vec![]),
            ],
        )
    }

    /// Strokes a straight line between two points with the given color and thickness, all
    /// lengths being expressed in millimeters.
    pub fn draw_line_to_layer_in_page(
        &mut self,
        page_index: usize,
        layer_index: usize,
        color: [f32; 3],
        thickness: f32,
        from: [f32; 2],
        to: [f32; 2],
    ) -> Result<(), ContextError> {
        let [red, green, blue] = color;
        self.add_operations_to_layer_in_page(
            layer_index,
            page_index,
            vec![
                Operation::new(
                    "RG",
                    vec![red, green, blue].into_iter().map(Object::Real).collect(),
                ),
                Operation::new("w", vec![millimeters_to_points(thickness).into()]),
                Operation::new(
                    "m",
                    vec![
                        millimeters_to_points(from[0]).into(),
                        millimeters_to_points(from[1]).into(),
                    ],
                ),
                Operation::new(
                    "l",
                    vec![
                        millimeters_to_points(to[0]).into(),
                        millimeters_to_points(to[1]).into(),
                    ],
                ),
                Operation::new("S", vec![]),
            ],
        )
    }

    /// Write the operations so far specified to the underlying document and finalize it: the
    /// information dictionary, the catalog, the fonts and the page tree are inserted.
    ///
    /// The instance ID is the second entry of the trailer `ID` array.
    pub fn write_all(
        &mut self,
        instance_id: String,
        document_info: &DocumentInfo,
    ) -> Result<(), ContextError> {
        use lopdf::Object::*;

        let timestamp = to_pdf_timestamp_format(&document_info.creation_date);
        let producer = format!("contactsheet {}", env!("CARGO_PKG_VERSION"));
        let document_info = lopdf::Dictionary::from_iter(vec![
            ("Trapped", "False".into()),
            (
                "CreationDate",
                String(timestamp.clone().into_bytes(), StringFormat::Literal),
            ),
            (
                "ModDate",
                String(timestamp.into_bytes(), StringFormat::Literal),
            ),
            ("Title", text_string(&document_info.title)),
            ("Author", text_string(&document_info.author)),
            ("Subject", text_string(&document_info.subject)),
            ("Creator", text_string(&producer)),
            ("Producer", text_string(&producer)),
        ]);
        let document_info_id = self.inner_document.add_object(Dictionary(document_info));

        let pages_id = self.inner_document.new_object_id();
        let catalog = lopdf::Dictionary::from_iter(vec![
            ("Type", "Catalog".into()),
            ("PageLayout", "OneColumn".into()),
            ("PageMode", "UseNone".into()),
            ("Pages", Reference(pages_id)),
        ]);
        let catalog_id = self.inner_document.add_object(catalog);

        self.inner_document
            .trailer
            .set("Root", Reference(catalog_id));
        self.inner_document
            .trailer
            .set("Info", Reference(document_info_id));
        self.inner_document.trailer.set(
            "ID",
            Array(vec![
                String(self.identifier.clone().into_bytes(), StringFormat::Literal),
                String(instance_id.into_bytes(), StringFormat::Literal),
            ]),
        );

        let fonts_dictionary = self.insert_fonts_into_document();

        let mut page_ids = Vec::<lopdf::Object>::new();
        for page in mem::take(&mut self.pages) {
            let media_box: lopdf::Object = vec![
                Integer(0),
                Integer(0),
                Real(page.width),
                Real(page.height),
            ]
            .into();
            let mut page_dictionary = lopdf::Dictionary::from_iter(vec![
                ("Type", "Page".into()),
                ("Rotate", Integer(0)),
                ("MediaBox", media_box.clone()),
                ("TrimBox", media_box.clone()),
                ("CropBox", media_box),
                ("Parent", Reference(pages_id)),
            ]);

            let resources = lopdf::Dictionary::from_iter(vec![(
                "Font",
                Dictionary(fonts_dictionary.clone()),
            )]);
            page_dictionary.set("Resources", Dictionary(resources));

            // Merge the streams of the individual layers into one unified content stream
            let mut merged_layer_streams = Vec::<u8>::new();
            for layer in page.layers {
                merged_layer_streams.append(&mut layer.into_stream()?.content);
            }
            let merged_layer_stream =
                lopdf::Stream::new(lopdf::Dictionary::new(), merged_layer_streams)
                    .with_compression(false);
            let page_content_id = self.inner_document.add_object(merged_layer_stream);
            page_dictionary.set("Contents", Reference(page_content_id));

            let page_id = self.inner_document.add_object(page_dictionary);
            page_ids.push(Reference(page_id))
        }

        let pages = lopdf::Dictionary::from_iter(vec![
            ("Type", "Pages".into()),
            ("Count", Integer(page_ids.len() as i64)),
            ("Kids", Array(page_ids)),
        ]);
        self.inner_document
            .objects
            .insert(pages_id, Dictionary(pages));

        Ok(())
    }

    /// Save the `PdfDocument` to bytes in order for it to be written to a file or further processed.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, ContextError> {
        let mut pdf_document_bytes = Vec::new();
        let mut writer = BufWriter::new(&mut pdf_document_bytes);
        self.inner_document.save_to(&mut writer).map_err(|error| {
            ContextError::with_error("Error while saving the PDF document to bytes", &error)
        })?;
        mem::drop(writer);

        Ok(pdf_document_bytes)
    }

    /// Inserts the font dictionaries into the document and returns the resource dictionary
    /// which associates the font names to them.
    fn insert_fonts_into_document(&mut self) -> lopdf::Dictionary {
        use lopdf::Object::*;
        let mut font_dictionary = lopdf::Dictionary::new();

        for (font_resource_name, (font_object_id, font)) in self.fonts.iter() {
            let font_object = lopdf::Dictionary::from_iter(vec![
                ("Type", Name("Font".into())),
                ("Subtype", Name("Type1".into())),
                ("BaseFont", Name(font.base_font().into())),
                ("Encoding", Name("WinAnsiEncoding".into())),
            ]);
            self.inner_document
                .objects
                .insert(*font_object_id, Dictionary(font_object));
            font_dictionary.set(font_resource_name.clone(), Reference(*font_object_id));
        }

        font_dictionary
    }

    /// This function is responsible for adding the given operations to the specified layer and page.
    fn add_operations_to_layer_in_page(
        &mut self,
        layer_index: usize,
        page_index: usize,
        operations: Vec<Operation>,
    ) -> Result<(), ContextError> {
        let pdf_layer_reference = self.get_mut_layer_in_page(layer_index, page_index)?;
        pdf_layer_reference.operations.extend(operations);

        Ok(())
    }

    // Retrieve the specified layer in the given page via the respective indices.
    fn get_mut_layer_in_page(
        &mut self,
        layer_index: usize,
        page_index: usize,
    ) -> Result<&mut PdfLayer, ContextError> {
        let pdf_page = self
            .pages
            .get_mut(page_index)
            .ok_or(ContextError::with_context(format!(
                "Failed to find the page with index {}",
                page_index
            )))?;
        let pdf_layer = pdf_page
            .layers
            .get_mut(layer_index)
            .ok_or(ContextError::with_context(format!(
                "Failed to find the layer with index {}",
                layer_index
            )))?;

        Ok(pdf_layer)
    }
}

fn font_resource_name(font_index: usize) -> String {
    format!("F{font_index}")
}

/// Encodes a text string for the information dictionary: plain ASCII is written as is, anything
/// else as UTF-16BE with a byte order mark.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xfe, 0xff];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Formats the given time so that it matches what the PDF specification expects.
/// An example of it is the following: D:20170505150224+02'00'.
fn to_pdf_timestamp_format(date: &OffsetDateTime) -> String {
    let offset = date.offset();
    let offset_sign = if offset.is_negative() { '-' } else { '+' };
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{offset_sign}{:02}'{:02}'",
        date.year(),
        u8::from(date.month()),
        date.day(),
        date.hour(),
        date.minute(),
        date.second(),
        offset.whole_hours().abs(),
        offset.minutes_past_hour().abs(),
    )
}
