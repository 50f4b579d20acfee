use venuedb_core::{Coordinates, GuestRange, ReviewScore, VenueDetails};

use super::*;

const HEADER_LINE: &str = "name,price,min_guests,max_guests,latitude,longitude,website,\
                           review_score,has_more_info,multiple_events,location_type";

fn complete() -> VenueDetails {
    VenueDetails {
        price: Some(120),
        guests: Some(GuestRange { gte: 80, lte: 250 }),
        coordinates: Some(Coordinates {
            lat: 40.5,
            lon: -3.25,
        }),
        review_score: ReviewScore::Rated(4.5),
        has_extended_info: true,
        multiple_events_per_day: Some(true),
        location_type: Some(LocationType::Rural),
    }
}

fn venue(name: &str, details: VenueDetails) -> Venue {
    Venue::new(name, format!("https://venues.example/{name}"), details).unwrap()
}

fn export(venues: &VenueMap) -> (ExportReport, String) {
    let mut out = Vec::new();
    let report = write_csv(&mut out, venues).unwrap();
    (report, String::from_utf8(out).unwrap())
}

#[test]
fn header_is_written_for_empty_export() {
    let (report, text) = export(&VenueMap::new());
    assert_eq!(report, ExportReport::default());
    assert_eq!(text, format!("{HEADER_LINE}\n"));
}

#[test]
fn header_is_written_when_every_venue_is_rejected() {
    let venues: VenueMap = [venue("HallA", VenueDetails::default())].into_iter().collect();
    let (report, text) = export(&venues);
    assert_eq!(
        report,
        ExportReport {
            exported: 0,
            rejected: 1,
        }
    );
    assert_eq!(text.lines().collect::<Vec<_>>(), [HEADER_LINE]);
}

#[test]
fn complete_venue_is_exported_with_min_and_max_guests_in_order() {
    let venues: VenueMap = [venue("HallA", complete())].into_iter().collect();
    let (report, text) = export(&venues);

    assert_eq!(report.exported, 1);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[1],
        "HallA,120,80,250,40.5,-3.25,https://venues.example/HallA,4.5,true,true,rural"
    );
}

#[test]
fn optional_cells_are_empty_and_unrated_is_zero() {
    let details = VenueDetails {
        review_score: ReviewScore::Unrated,
        multiple_events_per_day: None,
        location_type: None,
        has_extended_info: false,
        ..complete()
    };
    let unknown = VenueDetails {
        review_score: ReviewScore::Unknown,
        location_type: Some(LocationType::Urban),
        ..complete()
    };
    let venues: VenueMap = [venue("HallB", details), venue("HallC", unknown)]
        .into_iter()
        .collect();
    let (_, text) = export(&venues);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[1],
        "HallB,120,80,250,40.5,-3.25,https://venues.example/HallB,0.0,false,,"
    );
    assert_eq!(
        lines[2],
        "HallC,120,80,250,40.5,-3.25,https://venues.example/HallC,,true,true,urban"
    );
}

#[test]
fn incomplete_venues_are_rejected_field_by_field() {
    let no_price = VenueDetails {
        price: None,
        ..complete()
    };
    let no_point = VenueDetails {
        coordinates: None,
        ..complete()
    };
    let no_guests = VenueDetails {
        guests: None,
        ..complete()
    };
    let venues: VenueMap = [
        venue("NoPrice", no_price),
        venue("NoPoint", no_point),
        venue("NoGuests", no_guests),
        venue("Kept", complete()),
    ]
    .into_iter()
    .collect();

    let (report, text) = export(&venues);

    assert_eq!(
        report,
        ExportReport {
            exported: 1,
            rejected: 3,
        }
    );
    let names: Vec<&str> = text
        .lines()
        .skip(1)
        .filter_map(|l| l.split(',').next())
        .collect();
    assert_eq!(names, ["Kept"]);
}

#[test]
fn missing_fields_are_all_listed() {
    let bare = venue("Bare", VenueDetails::default());
    let missing = ExportRow::from_venue(&bare).unwrap_err();
    assert_eq!(missing, ["price", "coordinates", "guests"]);
}

#[test]
fn names_with_commas_are_quoted() {
    let venues: VenueMap = [venue("Finca, Jardín", complete())]
        .into_iter()
        .collect();
    let (_, text) = export(&venues);
    assert!(text.lines().nth(1).unwrap().starts_with("\"Finca, Jardín\",120,"));
}
