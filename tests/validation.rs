#[cfg(test)]
mod tests {
    use contactsheet::{
        render_contact_record, validate, ContactRecord, Field, FieldErrorKind,
        LayoutConfiguration, RawSubmission,
    };
    use time::macros::date;

    fn submission(name: &str, email: &str, phone: &str) -> RawSubmission {
        RawSubmission {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
            ..Default::default()
        }
    }

    #[test]
    fn every_failing_field_is_reported_at_once() {
        let validation_errors = validate(&submission("", "bad", "12")).unwrap_err();

        assert_eq!(validation_errors.len(), 3);
        assert_eq!(
            validation_errors.get(Field::Name).unwrap().kind,
            FieldErrorKind::Required
        );
        assert_eq!(
            validation_errors.get(Field::Email).unwrap().kind,
            FieldErrorKind::Invalid
        );
        assert_eq!(
            validation_errors.get(Field::Phone).unwrap().kind,
            FieldErrorKind::TooShort
        );
        similar_asserts::assert_eq!(
            serde_json::to_value(&validation_errors).unwrap(),
            serde_json::json!({
                "name": "Name is required",
                "email": "Invalid email",
                "phone": "Phone must be at least 10 digits",
            })
        );
    }

    #[test]
    fn blank_names_are_required() {
        for name in ["", "   ", "\t\n"] {
            let validation_errors =
                validate(&submission(name, "john@doe.com", "1234567890")).unwrap_err();
            assert_eq!(validation_errors.len(), 1);
            assert_eq!(
                validation_errors.get(Field::Name).unwrap().message,
                "Name is required"
            );
        }
    }

    #[test]
    fn phones_with_anything_but_digits_are_invalid() {
        for phone in ["123-456-7890", "+11234567890", "12345 67890", "１２３４５６７８９０"] {
            let validation_errors =
                validate(&submission("John Doe", "john@doe.com", phone)).unwrap_err();
            assert_eq!(
                validation_errors.get(Field::Phone).unwrap().kind,
                FieldErrorKind::Invalid,
                "{:?}",
                phone
            );
        }
    }

    #[test]
    fn phones_with_fewer_than_ten_digits_are_too_short() {
        for digits in 0..10 {
            let phone = "9".repeat(digits);
            let validation_errors =
                validate(&submission("John Doe", "john@doe.com", &phone)).unwrap_err();
            assert_eq!(
                validation_errors.get(Field::Phone).unwrap().kind,
                FieldErrorKind::TooShort,
                "{:?}",
                phone
            );
        }
        assert!(validate(&submission("John Doe", "john@doe.com", "9999999999")).is_ok());
    }

    #[test]
    fn a_valid_submission_round_trips_through_json() {
        let record = validate(&RawSubmission {
            name: Some("  Grace Hopper ".into()),
            email: Some("grace@navy.mil".into()),
            phone: Some("2025550143".into()),
            position: Some("Rear Admiral".into()),
            description: None,
        })
        .unwrap();
        assert_eq!(record.name(), "Grace Hopper");
        assert_eq!(record.description(), "");

        let reread = ContactRecord::from_json(&record.to_json().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(reread, record);
    }

    #[test]
    fn a_tampered_record_is_validated_again() {
        let tampered_record = r#"{ "name": "John Doe", "email": "john", "phone": "1234567890" }"#;
        let validation_errors = ContactRecord::from_json(tampered_record)
            .unwrap()
            .unwrap_err();
        assert_eq!(validation_errors.len(), 1);
        assert!(validation_errors.get(Field::Email).is_some());
    }

    #[test]
    fn only_validated_records_reach_the_renderer() {
        let record = validate(&submission("John Doe", "john@doe.com", "1234567890")).unwrap();
        let contact_document =
            render_contact_record(&record, &LayoutConfiguration::default(), date!(2026-10-19))
                .unwrap();
        assert_eq!(contact_document.file_name(), "John_Doe_2026-10-19.pdf");
    }
}
