#[cfg(test)]
mod tests {
    use contactsheet::{
        derive_file_name, render_contact_record, validate, ContactDocument, ContactRecord, Field,
        LayoutConfiguration, RawSubmission,
    };
    use lopdf::Object;
    use time::macros::date;

    fn record(
        name: &str,
        email: &str,
        phone: &str,
        position: &str,
        description: &str,
    ) -> ContactRecord {
        validate(&RawSubmission {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
            position: Some(position.into()),
            description: Some(description.into()),
        })
        .unwrap()
    }

    fn john_doe() -> ContactRecord {
        record("John Doe", "john@doe.com", "1234567890", "", "")
    }

    /// Decodes the content streams of every page and collects the shown strings, one per line.
    fn extract_text_lines(contact_document: &ContactDocument) -> Vec<Vec<String>> {
        let pdf_document = lopdf::Document::load_mem(contact_document.as_bytes()).unwrap();
        pdf_document
            .get_pages()
            .values()
            .map(|page_id| {
                let content = pdf_document.get_page_content(*page_id).unwrap();
                lopdf::content::Content::decode(&content)
                    .unwrap()
                    .operations
                    .into_iter()
                    .filter(|operation| operation.operator == "Tj")
                    .map(|operation| match &operation.operands[0] {
                        // The fonts use WinAnsiEncoding, which matches Latin-1 for these texts
                        Object::String(bytes, _) => {
                            bytes.iter().map(|byte| *byte as char).collect()
                        }
                        other => panic!("unexpected operand {:?}", other),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn john_doe_renders_labels_and_values() {
        let contact_document =
            render_contact_record(&john_doe(), &LayoutConfiguration::default(), date!(2026-10-19))
                .unwrap();

        assert_eq!(contact_document.page_count(), 1);
        let pages = extract_text_lines(&contact_document);
        similar_asserts::assert_eq!(
            pages[0],
            vec![
                "Name:",
                "John Doe",
                "Email:",
                "john@doe.com",
                "Phone:",
                "1234567890",
                "Position:",
                "-",
                "Description:",
                "-",
                "Generated on: 2026-10-19",
            ]
        );
    }

    #[test]
    fn output_starts_with_a_pdf_header() {
        let contact_document =
            render_contact_record(&john_doe(), &LayoutConfiguration::default(), date!(2026-10-19))
                .unwrap();

        assert!(contact_document.as_bytes().starts_with(b"%PDF-1.5"));
        assert!(contact_document
            .to_data_url()
            .starts_with("data:application/pdf;base64,JVBERi0xLjU"));
    }

    #[test]
    fn rendering_is_deterministic_for_a_fixed_date() {
        let configuration = LayoutConfiguration::default();
        let record = record(
            "Ada Lovelace",
            "ada@analytical.engine",
            "02071234567",
            "Mathematician",
            "Wrote the first algorithm intended for a machine.",
        );

        let first = render_contact_record(&record, &configuration, date!(2026-10-19)).unwrap();
        let second = render_contact_record(&record, &configuration, date!(2026-10-19)).unwrap();
        assert!(first.as_bytes() == second.as_bytes());

        let next_day = render_contact_record(&record, &configuration, date!(2026-10-20)).unwrap();
        assert!(first.as_bytes() != next_day.as_bytes());
    }

    #[test]
    fn file_name_follows_the_record_name_and_date() {
        let record = record("Ada Lovelace", "ada@lovelace.uk", "1234567890", "", "");
        let contact_document =
            render_contact_record(&record, &LayoutConfiguration::default(), date!(2026-10-19))
                .unwrap();

        assert_eq!(contact_document.file_name(), "Ada_Lovelace_2026-10-19.pdf");
        assert_eq!(
            contact_document.file_name(),
            derive_file_name(record.value(Field::Name), date!(2026-10-19))
        );
    }

    #[test]
    fn save_writes_the_payload_under_the_file_name() {
        let output_directory = tempfile::tempdir().unwrap();
        let contact_document =
            render_contact_record(&john_doe(), &LayoutConfiguration::default(), date!(2026-10-19))
                .unwrap();

        let pdf_file_path = contact_document.save(output_directory.path()).unwrap();

        assert_eq!(
            pdf_file_path,
            output_directory.path().join("John_Doe_2026-10-19.pdf")
        );
        assert_eq!(
            std::fs::read(&pdf_file_path).unwrap(),
            contact_document.as_bytes()
        );
    }

    #[test]
    fn saving_into_a_missing_directory_fails_with_context() {
        let output_directory = tempfile::tempdir().unwrap();
        let contact_document =
            render_contact_record(&john_doe(), &LayoutConfiguration::default(), date!(2026-10-19))
                .unwrap();

        let error = contact_document
            .save(&output_directory.path().join("missing"))
            .unwrap_err();

        assert!(error.context.starts_with("Failed to save the PDF document"));
        assert!(error.source_error.is_some());
    }

    #[test]
    fn long_descriptions_span_several_pages() {
        let description = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(120);
        let record = record("John Doe", "john@doe.com", "1234567890", "Writer", &description);
        let contact_document =
            render_contact_record(&record, &LayoutConfiguration::default(), date!(2026-10-19))
                .unwrap();

        assert!(contact_document.page_count() > 1);
        let pages = extract_text_lines(&contact_document);
        assert_eq!(pages.len(), contact_document.page_count());
        for page in &pages {
            assert_eq!(page.last().unwrap(), "Generated on: 2026-10-19");
        }

        let words = pages
            .iter()
            .flat_map(|page| &page[..page.len() - 1])
            .skip_while(|line| line.as_str() != "Description:")
            .skip(1)
            .flat_map(|line| line.split_whitespace())
            .collect::<Vec<_>>();
        assert_eq!(words, description.split_whitespace().collect::<Vec<_>>());
    }

    #[test]
    fn latin_characters_survive_and_others_are_replaced() {
        let record = record(
            "Jos\u{e9} Mart\u{ed}",
            "jose@marti.cu",
            "1234567890",
            "\u{6f22}\u{5b57}",
            "",
        );
        let contact_document =
            render_contact_record(&record, &LayoutConfiguration::default(), date!(2026-10-19))
                .unwrap();
        let pages = extract_text_lines(&contact_document);

        assert_eq!(pages[0][1], "Jos\u{e9} Mart\u{ed}");
        assert_eq!(pages[0][7], "??");
        assert_eq!(
            contact_document.file_name(),
            "Jos\u{e9}_Mart\u{ed}_2026-10-19.pdf"
        );
    }

    #[test]
    fn document_metadata_names_the_contact() {
        let contact_document =
            render_contact_record(&john_doe(), &LayoutConfiguration::default(), date!(2026-10-19))
                .unwrap();
        let pdf_document = lopdf::Document::load_mem(contact_document.as_bytes()).unwrap();
        let info_id = pdf_document
            .trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .unwrap();
        let info = pdf_document.get_dictionary(info_id).unwrap();

        let string = |key: &[u8]| match info.get(key).unwrap() {
            Object::String(bytes, _) => String::from_utf8(bytes.clone()).unwrap(),
            other => panic!("unexpected metadata {:?}", other),
        };
        assert_eq!(string(b"Title"), "Contact details: John Doe");
        assert_eq!(string(b"Author"), "John Doe");
        assert_eq!(string(b"CreationDate"), "D:20261019000000+00'00'");
    }
}
