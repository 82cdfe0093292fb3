use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ContextError;

/// The geometry of the rendered contact sheet. All lengths are expressed in millimeters and
/// measured from the top-left corner of the page, font sizes are expressed in points.
///
/// The default values lay the document out on an A4 page. A JSON file with any subset of the
/// keys (in camel case) can be loaded with `from_path` in order to override them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfiguration {
    pub page_width: f32,
    pub page_height: f32,
    /// The baseline of the first field.
    pub top_margin: f32,
    /// Where the bold labels begin.
    pub label_column: f32,
    /// Where the values begin, on the same baseline as their label.
    pub value_column: f32,
    /// The distance between two consecutive fields.
    pub line_height: f32,
    pub font_size: f32,
    /// The width the description is wrapped to.
    pub description_max_width: f32,
    /// The distance between two wrapped lines of the description, as a multiple of the font size.
    pub wrapped_line_factor: f32,
    /// No description line is placed below this baseline, it continues on a new page instead.
    pub content_bottom_limit: f32,
    pub separator_y: f32,
    pub separator_x_range: [f32; 2],
    /// The RGB color of the separator, each component between 0 and 255.
    pub separator_color: [u8; 3],
    pub separator_thickness: f32,
    pub footer_y: f32,
    /// The horizontal center of the footer line.
    pub footer_x: f32,
    pub footer_font_size: f32,
}

impl Default for LayoutConfiguration {
    fn default() -> Self {
        LayoutConfiguration {
            page_width: 210.0,
            page_height: 297.0,
            top_margin: 40.0,
            label_column: 20.0,
            value_column: 60.0,
            line_height: 12.0,
            font_size: 12.0,
            description_max_width: 130.0,
            wrapped_line_factor: 1.15,
            content_bottom_limit: 272.0,
            separator_y: 280.0,
            separator_x_range: [20.0, 190.0],
            separator_color: [200, 200, 200],
            separator_thickness: 0.2,
            footer_y: 287.0,
            footer_x: 105.0,
            footer_font_size: 10.0,
        }
    }
}

impl LayoutConfiguration {
    pub fn from_path(configuration_file_path: &Path) -> Result<Self, ContextError> {
        let configuration_file_contents = std::fs::read_to_string(configuration_file_path)
            .map_err(|error| {
                ContextError::with_error(
                    format!(
                        "Failed to read the layout configuration file {:?}",
                        configuration_file_path
                    ),
                    &error,
                )
            })?;
        let configuration: LayoutConfiguration =
            serde_json::from_str(&configuration_file_contents).map_err(|error| {
                ContextError::with_error(
                    format!(
                        "Failed to parse the layout configuration file {:?}",
                        configuration_file_path
                    ),
                    &error,
                )
            })?;
        configuration.check()?;

        Ok(configuration)
    }

    /// Rejects geometries in which the layout cannot make progress.
    pub fn check(&self) -> Result<(), ContextError> {
        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            return Err(ContextError::with_context(format!(
                "The page size {}x{} is not positive",
                self.page_width, self.page_height
            )));
        }
        if self.font_size <= 0.0 || self.footer_font_size <= 0.0 {
            return Err(ContextError::with_context("The font sizes must be positive"));
        }
        if self.line_height <= 0.0 || self.wrapped_line_factor <= 0.0 {
            return Err(ContextError::with_context(
                "The line height and the wrapped line factor must be positive",
            ));
        }
        if self.description_max_width <= 0.0 {
            return Err(ContextError::with_context(
                "The description maximum width must be positive",
            ));
        }
        if self.content_bottom_limit <= self.top_margin {
            return Err(ContextError::with_context(format!(
                "The content bottom limit {} must be below the top margin {}",
                self.content_bottom_limit, self.top_margin
            )));
        }

        Ok(())
    }

    /// The distance in millimeters between two wrapped lines of the description.
    pub fn wrapped_line_spacing(&self) -> f32 {
        crate::fonts::points_to_millimeters(self.font_size * self.wrapped_line_factor)
    }

    /// The separator color with components in the `0.0..=1.0` range expected by the PDF operators.
    pub fn separator_color_components(&self) -> [f32; 3] {
        self.separator_color
            .map(|component| f32::from(component) / 255.0)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::LayoutConfiguration;

    #[test]
    fn partial_configuration_falls_back_to_the_defaults() {
        let mut configuration_file = tempfile::NamedTempFile::new().unwrap();
        write!(
            configuration_file,
            r#"{{ "topMargin": 30.0, "descriptionMaxWidth": 100.0 }}"#
        )
        .unwrap();

        let configuration = LayoutConfiguration::from_path(configuration_file.path()).unwrap();

        assert_eq!(configuration.top_margin, 30.0);
        assert_eq!(configuration.description_max_width, 100.0);
        assert_eq!(configuration.label_column, 20.0);
        assert_eq!(configuration.page_height, 297.0);
    }

    #[test]
    fn unreadable_configuration_reports_the_path() {
        let error =
            LayoutConfiguration::from_path(std::path::Path::new("does/not/exist.json"))
                .unwrap_err();

        assert!(error.context.contains("does/not/exist.json"));
        assert!(error.source_error.is_some());
    }

    #[test]
    fn degenerate_geometry_is_rejected() {
        let configuration = LayoutConfiguration {
            content_bottom_limit: 10.0,
            ..Default::default()
        };

        assert!(configuration.check().is_err());
        assert!(LayoutConfiguration::default().check().is_ok());
    }

    #[test]
    fn separator_color_is_scaled_to_unit_range() {
        let [red, green, blue] = LayoutConfiguration::default().separator_color_components();

        assert!((red - 200.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(red, green);
        assert_eq!(green, blue);
    }
}
