use std::io::{self, Write};

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use shortages::{Category, Filter, Request, Room, service};
use tracing::instrument;

use super::{
    Session,
    terminal::{Layout, Tone},
};

/// Command arguments for `shortages list`.
#[derive(Debug, Parser)]
pub struct List {
    /// Case-insensitive substring match against the title.
    #[arg(long, short)]
    title: Option<String>,

    /// Only requests created on or after this date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date, value_name = "DATE")]
    from: Option<NaiveDate>,

    /// Only requests created on or before this date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date, value_name = "DATE")]
    to: Option<NaiveDate>,

    /// Filter by category: Electronics, Food or Other.
    #[arg(long, short)]
    category: Option<Category>,

    /// Filter by room: MeetingRoom, Kitchen or Bathroom.
    #[arg(long)]
    room: Option<Room>,

    /// Output format (default: table).
    #[arg(long, short, value_enum, default_value_t)]
    output: OutputFormat,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

#[derive(Debug, Serialize)]
struct SerializableRow<'a> {
    title: &'a str,
    room: String,
    category: String,
    priority: u8,
    owner: &'a str,
    created: String,
}

impl<'a> From<&'a Request> for SerializableRow<'a> {
    fn from(request: &'a Request) -> Self {
        Self {
            title: request.title().as_str(),
            room: request.room().to_string(),
            category: request.category().to_string(),
            priority: request.priority().get(),
            owner: request.owner(),
            created: request.created().to_rfc3339(),
        }
    }
}

impl List {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let format = self.output;
        let filter = Filter {
            title: self.title,
            from: self.from,
            to: self.to,
            category: self.category,
            room: self.room,
        };

        let visible = session.service.visible(&session.actor);
        let requests = service::filter(visible, &filter);

        let stdout = io::stdout();
        let mut out = stdout.lock();
        render(&requests, format, Layout::detect(), &mut out)?;
        Ok(())
    }
}

fn render<W: Write>(
    requests: &[Request],
    format: OutputFormat,
    layout: Layout,
    out: &mut W,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<SerializableRow<'_>> = requests.iter().map(SerializableRow::from).collect();
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
        OutputFormat::Table => {
            if requests.is_empty() {
                writeln!(out, "{}", Tone::Muted.paint("Nothing found."))?;
                return Ok(());
            }
            for request in requests {
                writeln!(out, "{}", table_row(request, layout))?;
            }
        }
    }
    Ok(())
}

fn table_row(request: &Request, layout: Layout) -> String {
    match layout {
        Layout::Compact => format!(
            "{} | {} | {} | {}",
            request.title(),
            request.room(),
            request.category(),
            request.priority()
        ),
        Layout::Full => format!(
            "{} | {} | {} | {} | {} | {}",
            request.title(),
            request.room(),
            request.category(),
            request.priority(),
            request.owner(),
            request.created().format("%Y-%m-%d")
        ),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use shortages::{NewRequest, Priority, Title};

    use super::*;

    fn request(title: &str, priority: u8) -> Request {
        Request::new(
            NewRequest {
                title: Title::new(title).unwrap(),
                room: Room::Kitchen,
                category: Category::Food,
                priority: Priority::new(priority).unwrap(),
            },
            "alice",
            Utc.with_ymd_and_hms(2024, 2, 29, 18, 30, 0).unwrap(),
        )
    }

    fn rendered(requests: &[Request], format: OutputFormat, layout: Layout) -> String {
        let mut out = Vec::new();
        render(requests, format, layout, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn table_rows_show_every_column() {
        let output = rendered(&[request("Coffee", 7)], OutputFormat::Table, Layout::Full);
        assert_eq!(output, "Coffee | Kitchen | Food | 7 | alice | 2024-02-29\n");
    }

    #[test]
    fn narrow_rows_drop_owner_and_date() {
        let output = rendered(&[request("Coffee", 7)], OutputFormat::Table, Layout::Compact);
        assert_eq!(output, "Coffee | Kitchen | Food | 7\n");
    }

    #[test]
    fn empty_table_says_nothing_found() {
        let output = rendered(&[], OutputFormat::Table, Layout::Full);
        assert!(output.contains("Nothing found."));
    }

    #[test]
    fn json_output_lists_rows() {
        let output = rendered(
            &[request("Coffee", 7), request("Tea", 2)],
            OutputFormat::Json,
            Layout::Full,
        );
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["title"], "Coffee");
        assert_eq!(value[0]["room"], "Kitchen");
        assert_eq!(value[1]["priority"], 2);
        assert_eq!(value[1]["owner"], "alice");
    }

    #[test]
    fn dates_must_be_iso() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("29/02/2024").is_err());
        assert!(parse_date("2023-02-29").is_err());
    }
}
