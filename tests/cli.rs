#[cfg(test)]
mod tests {
    use std::process::{Command, Output};

    fn contactsheet(arguments: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_contactsheet"))
            .args(arguments)
            .env("RUST_LOG", "off")
            .output()
            .unwrap()
    }

    #[test]
    fn invalid_input_prints_every_field_error_and_fails() {
        let output = contactsheet(&["validate", "--name", "", "--email", "bad", "--phone", "12"]);

        assert_eq!(output.status.code(), Some(1));
        let validation_errors: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        similar_asserts::assert_eq!(
            validation_errors,
            serde_json::json!({
                "name": "Name is required",
                "email": "Invalid email",
                "phone": "Phone must be at least 10 digits",
            })
        );
    }

    #[test]
    fn valid_input_prints_the_normalized_record() {
        let output = contactsheet(&[
            "validate",
            "--name",
            "  John Doe ",
            "--email",
            "john@doe.com",
            "--phone",
            "1234567890",
        ]);

        assert!(output.status.success());
        let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(record["name"], "John Doe");
        assert_eq!(record["position"], "");
    }

    #[test]
    fn download_saves_the_pdf_under_the_derived_name() {
        let output_directory = tempfile::tempdir().unwrap();
        let output = contactsheet(&[
            "download",
            "--name",
            "Ada Lovelace",
            "--email",
            "ada@lovelace.uk",
            "--phone",
            "02071234567",
            "--date",
            "2026-10-19",
            "--output-directory",
            output_directory.path().to_str().unwrap(),
        ]);

        assert!(output.status.success());
        let pdf_file_path = output_directory.path().join("Ada_Lovelace_2026-10-19.pdf");
        assert_eq!(
            String::from_utf8(output.stdout).unwrap().trim(),
            pdf_file_path.to_str().unwrap()
        );
        assert!(std::fs::read(&pdf_file_path).unwrap().starts_with(b"%PDF-"));
    }

    #[test]
    fn preview_prints_a_data_url() {
        let output = contactsheet(&[
            "preview",
            "--name",
            "John Doe",
            "--email",
            "john@doe.com",
            "--phone",
            "1234567890",
            "--date",
            "2026-10-19",
        ]);

        assert!(output.status.success());
        assert!(String::from_utf8(output.stdout)
            .unwrap()
            .starts_with("data:application/pdf;base64,JVBERi0"));
    }

    #[test]
    fn invalid_input_renders_nothing() {
        let output_directory = tempfile::tempdir().unwrap();
        let output = contactsheet(&[
            "download",
            "--name",
            "John Doe",
            "--phone",
            "123-456",
            "--output-directory",
            output_directory.path().to_str().unwrap(),
        ]);

        assert_eq!(output.status.code(), Some(1));
        assert_eq!(std::fs::read_dir(output_directory.path()).unwrap().count(), 0);
    }
}
