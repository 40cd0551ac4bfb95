use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::domain::{ConfirmationRecord, GuestRecord};

const CSV_HEADER: [&str; 10] = [
    "Nombre",
    "Apellido",
    "Email",
    "Teléfono",
    "Asiste",
    "Restricciones Dietéticas",
    "Solicitudes Especiales",
    "Acompañantes",
    "Restricciones Acompañantes",
    "Fecha Confirmación",
];

/// Aggregates over the latest confirmation of every guest.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_guests: usize,
    pub total_confirmations: usize,
    pub confirmed_guests: usize,
    pub declined_guests: usize,
    pub pending_responses: usize,
    pub total_plus_ones: usize,
    pub attendance_rate: f64,
    pub response_rate: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Confirmed,
    Declined,
    Pending,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Option<StatusFilter> {
        match value.trim().to_lowercase().as_str() {
            "all" => Some(StatusFilter::All),
            "confirmed" => Some(StatusFilter::Confirmed),
            "declined" => Some(StatusFilter::Declined),
            "pending" => Some(StatusFilter::Pending),
            _ => None,
        }
    }

    fn matches(&self, guest: &GuestRecord) -> bool {
        let latest = guest.latest_confirmation();
        match self {
            StatusFilter::All => true,
            StatusFilter::Confirmed => latest.is_some_and(|c| c.attending),
            StatusFilter::Declined => latest.is_some_and(|c| !c.attending),
            StatusFilter::Pending => latest.is_none(),
        }
    }
}

pub fn compute_stats(guests: &[GuestRecord]) -> AdminStats {
    let latest: Vec<&ConfirmationRecord> = guests
        .iter()
        .filter_map(GuestRecord::latest_confirmation)
        .collect();

    let total_guests = guests.len();
    let total_confirmations = latest.len();
    let confirmed_guests = latest.iter().filter(|c| c.attending).count();
    let declined_guests = total_confirmations - confirmed_guests;
    let total_plus_ones = latest.iter().map(|c| c.plus_ones.len()).sum();

    AdminStats {
        total_guests,
        total_confirmations,
        confirmed_guests,
        declined_guests,
        pending_responses: total_guests - total_confirmations,
        total_plus_ones,
        attendance_rate: percentage(confirmed_guests, total_confirmations),
        response_rate: percentage(total_confirmations, total_guests),
    }
}

// Two decimals; zero when there is nothing to divide by.
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let rate = part as f64 / whole as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Case-insensitive substring match over first name, last name and email.
pub fn matches_search(guest: &GuestRecord, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [
        guest.first_name.as_str(),
        guest.last_name.as_str(),
        guest.email.as_deref().unwrap_or(""),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

pub fn to_csv<'a>(guests: impl IntoIterator<Item = &'a GuestRecord>) -> String {
    let mut lines = vec![CSV_HEADER.join(",")];
    for guest in guests {
        lines.push(
            csv_row(guest)
                .iter()
                .map(|field| quote(field))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("invitados_boda_{}.csv", date.format("%Y-%m-%d"))
}

fn csv_row(guest: &GuestRecord) -> [String; 10] {
    let confirmation = guest.latest_confirmation();
    let plus_ones = confirmation.map(|c| c.plus_ones.as_slice()).unwrap_or(&[]);
    let attending = match confirmation {
        Some(c) if c.attending => "Sí",
        Some(_) => "No",
        None => "Sin respuesta",
    };

    [
        guest.first_name.clone(),
        guest.last_name.clone(),
        guest.email.clone().unwrap_or_default(),
        guest.phone.clone().unwrap_or_default(),
        attending.to_string(),
        confirmation
            .and_then(|c| c.dietary_restrictions.clone())
            .unwrap_or_default(),
        confirmation
            .and_then(|c| c.special_requests.clone())
            .unwrap_or_default(),
        plus_ones
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        plus_ones
            .iter()
            .map(|p| p.dietary_restrictions.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(", "),
        confirmation
            .map(|c| c.created_at.format("%d/%m/%Y").to_string())
            .unwrap_or_default(),
    ]
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Loaded admin listing plus the aggregates derived from it.
#[derive(Clone, Debug)]
pub struct AdminReport {
    guests: Vec<GuestRecord>,
    stats: AdminStats,
}

impl AdminReport {
    pub fn new(guests: Vec<GuestRecord>) -> Self {
        let stats = compute_stats(&guests);
        Self { guests, stats }
    }

    pub fn guests(&self) -> &[GuestRecord] {
        &self.guests
    }

    pub fn stats(&self) -> &AdminStats {
        &self.stats
    }

    pub fn filter(&self, search: &str, status: StatusFilter) -> Vec<&GuestRecord> {
        self.guests
            .iter()
            .filter(|guest| matches_search(guest, search) && status.matches(guest))
            .collect()
    }

    pub fn filtered_csv(&self, search: &str, status: StatusFilter) -> String {
        to_csv(self.filter(search, status))
    }

    // Writes the filtered listing into `dir`, returning the file path.
    pub fn export_to(
        &self,
        dir: &Path,
        search: &str,
        status: StatusFilter,
        today: NaiveDate,
    ) -> std::io::Result<PathBuf> {
        let rows = self.filter(search, status);
        let path = dir.join(export_file_name(today));
        std::fs::write(&path, to_csv(rows.iter().copied()))?;
        info!(path = %path.display(), rows = rows.len(), "guest list exported");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{confirmation_record, guest_record, timestamp};

    // Ten guests: four attending (two plus-ones between them), two declining, four pending.
    fn wedding_fixture() -> Vec<GuestRecord> {
        let names = [
            ("Ana", "García"),
            ("Bruno", "López"),
            ("Carla", "Martín"),
            ("Diego", "Ruiz"),
            ("Elena", "Sanz"),
            ("Fabio", "Torres"),
            ("Gala", "Vidal"),
            ("Hugo", "Navarro"),
            ("Inés", "Moreno"),
            ("Jorge", "Castro"),
        ];
        let mut guests: Vec<GuestRecord> = names
            .iter()
            .enumerate()
            .map(|(index, (first, last))| guest_record(index as i64 + 1, first, last))
            .collect();

        guests[0].confirmations = vec![confirmation_record(1, 1, true, &["Luis"])];
        guests[1].confirmations = vec![confirmation_record(2, 2, true, &["Marta"])];
        guests[2].confirmations = vec![confirmation_record(3, 3, true, &[])];
        guests[3].confirmations = vec![confirmation_record(4, 4, true, &[])];
        guests[4].confirmations = vec![confirmation_record(5, 5, false, &[])];
        guests[5].confirmations = vec![confirmation_record(6, 6, false, &[])];
        guests
    }

    #[test]
    fn when_fixture_is_summarized_then_stats_match_expected_counts() {
        let stats = compute_stats(&wedding_fixture());

        assert_eq!(
            stats,
            AdminStats {
                total_guests: 10,
                total_confirmations: 6,
                confirmed_guests: 4,
                declined_guests: 2,
                pending_responses: 4,
                total_plus_ones: 2,
                attendance_rate: 66.67,
                response_rate: 60.0,
            }
        );
    }

    #[test]
    fn when_there_are_no_guests_then_rates_are_zero() {
        let stats = compute_stats(&[]);

        assert_eq!(stats, AdminStats::default());
    }

    #[test]
    fn when_guest_changed_their_answer_then_latest_confirmation_counts() {
        let mut guests = wedding_fixture();
        // Older "attending" row listed first, newer "declined" row second.
        let mut older = confirmation_record(20, 1, true, &["Luis"]);
        older.created_at = timestamp(1_600_000_000);
        let newer = confirmation_record(21, 1, false, &[]);
        guests[0].confirmations = vec![older, newer];

        let stats = compute_stats(&guests);

        assert_eq!(stats.confirmed_guests, 3);
        assert_eq!(stats.declined_guests, 3);
        assert_eq!(stats.total_plus_ones, 1);
    }

    #[test]
    fn when_searching_then_names_and_email_match_case_insensitively() {
        let report = AdminReport::new(wedding_fixture());

        let by_last_name = report.filter("GARC", StatusFilter::All);
        let by_email = report.filter("bruno@EXAMPLE", StatusFilter::All);

        assert_eq!(by_last_name.len(), 1);
        assert_eq!(by_last_name[0].first_name, "Ana");
        assert_eq!(by_email.len(), 1);
        assert_eq!(report.filter("   ", StatusFilter::All).len(), 10);
    }

    #[test]
    fn when_filtering_by_status_then_latest_confirmation_decides() {
        let report = AdminReport::new(wedding_fixture());

        assert_eq!(report.filter("", StatusFilter::Confirmed).len(), 4);
        assert_eq!(report.filter("", StatusFilter::Declined).len(), 2);
        assert_eq!(report.filter("", StatusFilter::Pending).len(), 4);
        assert_eq!(StatusFilter::parse(" Pending "), Some(StatusFilter::Pending));
        assert_eq!(StatusFilter::parse("maybe"), None);
    }

    #[test]
    fn when_one_guest_with_two_plus_ones_is_exported_then_names_share_one_field() {
        let mut guest = guest_record(1, "Ana", "García");
        guest.phone = Some("555-0101".to_string());
        let mut confirmation = confirmation_record(1, 1, true, &["Luis", "Marta"]);
        confirmation.plus_ones[1].dietary_restrictions = Some("vegana".to_string());
        confirmation.created_at = timestamp(1_709_251_200); // 2024-03-01
        guest.confirmations = vec![confirmation];

        let csv = to_csv([&guest]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Nombre,Apellido,Email,Teléfono,Asiste,Restricciones Dietéticas,\
Solicitudes Especiales,Acompañantes,Restricciones Acompañantes,Fecha Confirmación"
        );
        assert_eq!(
            lines[1],
            "\"Ana\",\"García\",\"ana@example.com\",\"555-0101\",\"Sí\",\"\",\"\",\
\"Luis, Marta\",\", vegana\",\"01/03/2024\""
        );
    }

    #[test]
    fn when_field_contains_quotes_then_they_are_doubled() {
        let mut guest = guest_record(1, "Ana \"Anita\"", "García");
        guest.email = None;

        let csv = to_csv([&guest]);

        assert!(csv.contains("\"Ana \"\"Anita\"\"\""));
        assert!(csv.contains("\"Sin respuesta\""));
    }

    #[test]
    fn when_exported_then_file_is_named_after_the_date_and_holds_filtered_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = AdminReport::new(wedding_fixture());
        let today = NaiveDate::from_ymd_opt(2025, 6, 14).expect("valid date");

        let path = report
            .export_to(dir.path(), "", StatusFilter::Declined, today)
            .expect("export");

        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("invitados_boda_2025-06-14.csv")
        );
        let written = std::fs::read_to_string(&path).expect("read export");
        assert_eq!(written.lines().count(), 3);
        assert_eq!(written, report.filtered_csv("", StatusFilter::Declined));
    }
}
