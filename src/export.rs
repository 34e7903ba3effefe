use crate::registration::Registration;

/// The filename the export is served under.
pub const EXPORT_FILENAME: &str = "registrations_export.csv";

const HEADER: [&str; 9] = [
    "ID",
    "Name",
    "Email",
    "College",
    "Department",
    "Category",
    "Event Name",
    "Event Date",
    "Submission Date",
];

/// Renders registrations as CSV with CRLF line endings. The rows mirror the
/// admin listing, so an export under a filter contains exactly the rows the
/// screen showed.
pub fn to_csv(registrations: &[Registration]) -> String {
    let mut output = String::new();

    write_row(&mut output, HEADER.iter().map(|s| (*s).to_owned()));

    for registration in registrations {
        write_row(
            &mut output,
            vec![
                registration.id.to_string(),
                registration.name.clone(),
                registration.email.clone(),
                registration.college.clone(),
                registration.department.clone(),
                registration.category.to_string(),
                registration.event_name.clone(),
                registration.event_date.format("%F"),
                // %T leaves the hour unpadded in this version of `time`
                registration.created.format("%F %H:%M:%S"),
            ]
            .into_iter(),
        );
    }

    output
}

fn write_row(output: &mut String, fields: impl Iterator<Item = String>) {
    let mut first = true;

    for field in fields {
        if !first {
            output.push(',');
        }
        first = false;
        output.push_str(&escape(&field));
    }

    output.push_str("\r\n");
}

fn escape(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
