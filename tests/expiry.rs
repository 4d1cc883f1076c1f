mod common;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use common::{LEGACY_FILE, MULTI_VEHICLE_FILE, dataset, fixture_path};
use plate_lookup::{
    LoadOptions, is_expired, load_dataset,
    expiry::{CANONICAL_EXPIRY_COLUMNS, ExpiryColumnSet, LEGACY_EXPIRY_COLUMNS, expired_columns},
};
use proptest::prelude::*;

fn at(y: i32, m: u32, d: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
}

#[test]
fn past_registration_is_expired() {
    let data = dataset(
        &["NIK", "Masa Berlaku STNK Mobil ke-1"],
        &[&["3201020304050001", "01/01/2020"]],
    );
    let columns = ExpiryColumnSet::resolve(data.headers(), &CANONICAL_EXPIRY_COLUMNS);
    assert!(is_expired(&data.records()[0], &columns, at(2024, 1, 1, 0)));
}

#[test]
fn registration_in_the_future_is_not_expired() {
    let data = dataset(
        &["NIK", "Masa Berlaku STNK Mobil ke-1"],
        &[&["3201020304050001", "01/01/2020"]],
    );
    let columns = ExpiryColumnSet::resolve(data.headers(), &CANONICAL_EXPIRY_COLUMNS);
    assert!(!is_expired(&data.records()[0], &columns, at(2019, 12, 31, 23)));
}

#[test]
fn document_expiring_today_is_not_yet_expired() {
    let data = dataset(&["Masa Berlaku SIM Mobil"], &[&["15/06/2026"]]);
    let columns = ExpiryColumnSet::resolve(data.headers(), &CANONICAL_EXPIRY_COLUMNS);
    let record = &data.records()[0];
    assert!(!is_expired(record, &columns, at(2026, 6, 15, 23)));
    assert!(is_expired(record, &columns, at(2026, 6, 16, 0)));
}

#[test]
fn two_digit_year_datetime_in_the_future_is_not_expired() {
    let data = dataset(
        &["Masa Berlaku SIM Mobil", "Masa Berlaku STNK Mobil ke-1"],
        &[&["05/03/27 00:00", "05/03/24 13:45"]],
    );
    let columns = ExpiryColumnSet::resolve(data.headers(), &CANONICAL_EXPIRY_COLUMNS);
    let record = &data.records()[0];
    assert!(!is_expired(record, &columns, at(2024, 1, 1, 0)));
    assert_eq!(
        expired_columns(record, &columns, at(2024, 6, 1, 0)),
        vec!["Masa Berlaku STNK Mobil ke-1"]
    );
}

#[test]
fn truncated_year_is_never_expired() {
    let data = dataset(&["Masa Berlaku SIM Motor"], &[&["05/03/202"]]);
    let columns = ExpiryColumnSet::resolve(data.headers(), &CANONICAL_EXPIRY_COLUMNS);
    assert!(!is_expired(&data.records()[0], &columns, at(2024, 1, 1, 0)));
}

#[test]
fn columns_outside_the_expiry_set_are_ignored() {
    let data = dataset(&["Tanggal Masuk", "NIK"], &[&["01/01/2000", "1"]]);
    let columns = ExpiryColumnSet::resolve(data.headers(), &CANONICAL_EXPIRY_COLUMNS);
    assert!(columns.is_empty());
    assert!(!is_expired(&data.records()[0], &columns, at(2024, 1, 1, 0)));
}

#[test]
fn fixture_rows_report_the_expired_documents() {
    let data = load_dataset(&fixture_path(MULTI_VEHICLE_FILE), &LoadOptions::default())
        .expect("load fixture");
    let columns = ExpiryColumnSet::resolve(data.headers(), &CANONICAL_EXPIRY_COLUMNS);
    assert_eq!(columns.columns().len(), 6);
    let now = at(2024, 6, 1, 9);

    let flags = data
        .records()
        .iter()
        .map(|record| is_expired(record, &columns, now))
        .collect::<Vec<_>>();
    assert_eq!(flags, vec![true, true, false, false]);

    assert_eq!(
        expired_columns(&data.records()[0], &columns, now),
        vec!["Masa Berlaku STNK Mobil ke-1"]
    );
    assert_eq!(
        expired_columns(&data.records()[1], &columns, now),
        vec!["Masa Berlaku STNK Motor ke-2"]
    );
}

#[test]
fn legacy_columns_use_iso_dates() {
    let data =
        load_dataset(&fixture_path(LEGACY_FILE), &LoadOptions::default()).expect("load fixture");
    let columns = ExpiryColumnSet::resolve(data.headers(), &LEGACY_EXPIRY_COLUMNS);
    let flags = data
        .records()
        .iter()
        .map(|record| is_expired(record, &columns, at(2024, 6, 1, 0)))
        .collect::<Vec<_>>();
    assert_eq!(flags, vec![true, false, false]);
}

fn day_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..40_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

proptest! {
    #[test]
    fn once_expired_always_expired(
        expiry in day_strategy(),
        now in day_strategy(),
        later in 0u64..5_000,
    ) {
        let cell = expiry.format("%d/%m/%Y").to_string();
        let data = dataset(&["Masa Berlaku SIM Motor"], &[&[cell.as_str()]]);
        let columns = ExpiryColumnSet::resolve(data.headers(), &CANONICAL_EXPIRY_COLUMNS);
        let record = &data.records()[0];
        let now = now.and_time(NaiveTime::MIN);
        let later_now = now.checked_add_days(Days::new(later)).unwrap();

        prop_assert_eq!(is_expired(record, &columns, now), expiry < now.date());
        if is_expired(record, &columns, now) {
            prop_assert!(is_expired(record, &columns, later_now));
        }
    }

    #[test]
    fn blank_or_unparseable_dates_never_flag(
        cells in proptest::collection::vec("[a-z ]{0,10}", 6),
        now in day_strategy(),
    ) {
        let refs = cells.iter().map(String::as_str).collect::<Vec<_>>();
        let data = dataset(&CANONICAL_EXPIRY_COLUMNS, &[refs.as_slice()]);
        let columns = ExpiryColumnSet::resolve(data.headers(), &CANONICAL_EXPIRY_COLUMNS);
        prop_assert_eq!(columns.columns().len(), 6);
        prop_assert!(!is_expired(&data.records()[0], &columns, now.and_time(NaiveTime::MIN)));
    }
}
