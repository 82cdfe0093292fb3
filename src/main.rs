use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use time::{macros::format_description, Date};

use contactsheet::{
    configuration::LayoutConfiguration,
    error::ContextError,
    identity::{self, SampleIdentity},
    layout::iso_date,
    record::{ContactRecord, RawSubmission},
    render::{self, ContactDocument},
    validation::{validate, ValidationErrors},
};

/// Validate contact details and render them as a PDF contact sheet.
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct CliArguments {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the submission and print the normalized record as JSON.
    Validate {
        #[command(flatten)]
        submission: SubmissionArguments,
    },
    /// Render the contact sheet and save it as `{name}_{date}.pdf`.
    Download {
        #[command(flatten)]
        submission: SubmissionArguments,
        #[command(flatten)]
        rendering: RenderingArguments,
        /// The directory the PDF file is saved into.
        #[arg(short = 'o', long = "output-directory", value_name = "directory", default_value = ".")]
        output_directory: PathBuf,
    },
    /// Render the contact sheet and print it as a data URL for an inline preview.
    Preview {
        #[command(flatten)]
        submission: SubmissionArguments,
        #[command(flatten)]
        rendering: RenderingArguments,
    },
}

/// Where the field values come from. Flags take precedence over the values of the files.
#[derive(Args, Debug)]
struct SubmissionArguments {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    position: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// A JSON file with the raw values of the form, any key may be missing.
    #[arg(long = "submission", value_name = "json_file", conflicts_with = "record_path")]
    submission_path: Option<PathBuf>,
    /// A JSON record previously printed by the `validate` command.
    #[arg(long = "record", value_name = "json_file")]
    record_path: Option<PathBuf>,
    /// Fill the missing name and email with a random identity from the demo API.
    #[arg(long)]
    random_identity: bool,
    #[arg(long, value_name = "url", default_value = identity::DEFAULT_SAMPLE_IDENTITY_URL)]
    random_identity_url: String,
}

#[derive(Args, Debug)]
struct RenderingArguments {
    /// A JSON file overriding the layout of the contact sheet.
    #[arg(short = 'c', long = "configuration", value_name = "json_file")]
    configuration_path: Option<PathBuf>,
    /// The generation date, as YYYY-MM-DD, instead of today's.
    #[arg(long, value_name = "date", value_parser = parse_iso_date)]
    date: Option<Date>,
}

fn main() {
    if let Err(error) = fallible_main() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

fn fallible_main() -> Result<(), ContextError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let arguments = CliArguments::parse();
    log::debug!("{:?}", arguments);

    match arguments.command {
        Command::Validate { submission } => {
            let record = match collect_record(submission)? {
                Ok(record) => record,
                Err(validation_errors) => exit_with_validation_errors(&validation_errors),
            };
            println!("{}", record.to_json()?);
        }
        Command::Download {
            submission,
            rendering,
            output_directory,
        } => {
            let record = match collect_record(submission)? {
                Ok(record) => record,
                Err(validation_errors) => exit_with_validation_errors(&validation_errors),
            };
            let contact_document = render_with(&record, &rendering)?;
            let pdf_file_path = contact_document.save(&output_directory)?;
            println!("{}", pdf_file_path.display());
        }
        Command::Preview {
            submission,
            rendering,
        } => {
            let record = match collect_record(submission)? {
                Ok(record) => record,
                Err(validation_errors) => exit_with_validation_errors(&validation_errors),
            };
            let contact_document = render_with(&record, &rendering)?;
            println!("{}", contact_document.to_data_url());
        }
    }

    Ok(())
}

/// Gathers the field values from the files, the flags and possibly the demo API, then
/// validates them.
fn collect_record(
    arguments: SubmissionArguments,
) -> Result<Result<ContactRecord, ValidationErrors>, ContextError> {
    let sample_identity = if arguments.random_identity {
        identity::fetch_sample_identity(&arguments.random_identity_url)
    } else {
        None
    };

    let submission = collect_submission(arguments, sample_identity)?;

    Ok(submission.and_then(|submission| validate(&submission)))
}

/// Merges the field sources: the values of the flags win over the ones of the files, and the
/// sample identity only fills what is still blank. A `--record` which no longer validates is
/// reported as it is.
fn collect_submission(
    arguments: SubmissionArguments,
    sample_identity: Option<SampleIdentity>,
) -> Result<Result<RawSubmission, ValidationErrors>, ContextError> {
    let mut submission = match (&arguments.submission_path, &arguments.record_path) {
        (Some(submission_path), _) => RawSubmission::from_path(submission_path)?,
        (None, Some(record_path)) => {
            let record_content = std::fs::read_to_string(record_path).map_err(|error| {
                ContextError::with_error(
                    format!("Unable to read the record {:?}", record_path),
                    &error,
                )
            })?;
            match ContactRecord::from_json(&record_content)? {
                Ok(record) => RawSubmission::from(&record),
                Err(validation_errors) => return Ok(Err(validation_errors)),
            }
        }
        (None, None) => RawSubmission::default(),
    };

    let flags = [
        (&mut submission.name, arguments.name),
        (&mut submission.email, arguments.email),
        (&mut submission.phone, arguments.phone),
        (&mut submission.position, arguments.position),
        (&mut submission.description, arguments.description),
    ];
    for (slot, flag) in flags {
        if flag.is_some() {
            *slot = flag;
        }
    }

    if let Some(sample_identity) = sample_identity {
        sample_identity.prefill(&mut submission);
    }

    Ok(Ok(submission))
}

fn render_with(
    record: &ContactRecord,
    arguments: &RenderingArguments,
) -> Result<ContactDocument, ContextError> {
    let configuration = match &arguments.configuration_path {
        Some(configuration_path) => LayoutConfiguration::from_path(configuration_path)?,
        None => LayoutConfiguration::default(),
    };
    let generated_on = arguments.date.unwrap_or_else(render::today);
    log::debug!("Rendering the contact sheet on {}", iso_date(generated_on));

    render::render_contact_record(record, &configuration, generated_on)
}

/// Prints the field errors as a `{ "field": "message" }` JSON object and exits with a failure.
fn exit_with_validation_errors(validation_errors: &ValidationErrors) -> ! {
    for (field, field_error) in validation_errors.iter() {
        log::error!("{}: {} ({})", field, field_error.message, field_error.kind.code());
    }
    match serde_json::to_string_pretty(validation_errors) {
        Ok(validation_errors_json) => println!("{}", validation_errors_json),
        Err(error) => log::error!("Unable to serialize the validation errors: {}", error),
    }
    std::process::exit(1);
}

fn parse_iso_date(date: &str) -> Result<Date, String> {
    Date::parse(date, format_description!("[year]-[month]-[day]"))
        .map_err(|error| format!("invalid date {:?}, expected YYYY-MM-DD: {}", date, error))
}
