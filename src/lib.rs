//! contactsheet validates the contact details collected by a form (name, email, phone, position
//! and description) and renders them as a single PDF contact sheet, either saved to disk under
//! a name derived from the contact or embedded in a data URL for an inline preview.
//!
//! The pipeline is made of two steps which hand a value to each other directly:
//! `validation::validate` turns a `RawSubmission` into a `ContactRecord` (or into the list of
//! field errors to show next to the form), and `render::render_contact_record` turns that
//! record into a `ContactDocument`.

/// The module where the data of a submission is presented.
///
/// A `RawSubmission` holds the five values exactly as they were typed, each of them possibly
/// absent. A `ContactRecord` holds the same values once trimmed, normalized and checked: its
/// fields are private and the only way to obtain one is through the validator, so that any
/// record the renderer receives is known to be well-formed.
pub mod record;

/// The rules a submission must satisfy in order to become a `ContactRecord`.
///
/// Every field is checked independently, so that a user interface can display all the errors
/// at once: an empty name is `required`, an email which is not shaped like `local@domain.tld`
/// is `invalid`, a phone with anything but digits is `invalid` and one with fewer than ten
/// digits is `too_short`. Position and description are free text.
pub mod validation;

/// This module contains the `ContextError` type which is the error type used for the failures
/// which are not the fault of the user, such as a file which cannot be read or written.
pub mod error;

/// The geometry of the contact sheet, with defaults for an A4 page and overridable from a JSON file.
pub mod configuration;

/// The standard Helvetica faces and their metrics, used both for measuring text during the layout
/// and for declaring the fonts in the PDF document.
pub mod fonts;

/// The layout of a record on one or more pages: labels and values on fixed columns, a wrapped
/// description, and a separator with a footer at the bottom of each page.
pub mod layout;

/// The module where the `PdfDocument` interface for working with PDF documents is presented.
///
/// It is a thin layer over `lopdf`, which takes care of the pages, the fonts, the content
/// streams and the document trailer. No randomly generated identifier is ever written, which
/// keeps the output reproducible and therefore testable byte for byte.
pub mod pdf;

/// The rendering of a `ContactRecord` into a `ContactDocument`, together with the file name policy.
pub mod render;

/// The optional prefilling of the form with a random identity taken from a public demo API.
pub mod identity;

pub use configuration::LayoutConfiguration;
pub use error::ContextError;
pub use record::{ContactRecord, Field, RawSubmission};
pub use render::{derive_file_name, render_contact_record, ContactDocument};
pub use validation::{validate, FieldError, FieldErrorKind, ValidationErrors};
