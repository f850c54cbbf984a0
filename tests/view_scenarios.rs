use std::cmp::Ordering;
use std::path::PathBuf;

use sv::filter::{self, FilterCriteria, MatchMode, FILTER_FIELDS};
use sv::loader::load_records;
use sv::sort::{Comparator, SortDirection, SortValue};
use sv::{Field, Record, ViewState};

fn fixture() -> Vec<Record> {
    load_records(PathBuf::from("tests/fixtures/screenings.json")).unwrap()
}

fn loaded_state() -> ViewState {
    let mut state = ViewState::new();
    state.set_data(fixture());
    state
}

#[test]
fn shows_all_rows_after_load() {
    assert_eq!(loaded_state().display_data().unwrap().len(), 21);
}

#[test]
fn filter_by_name_then_severity_then_reset() {
    let mut state = loaded_state();

    state.set_name_filter(Some("ar"));
    assert_eq!(state.display_data().unwrap().len(), 5);

    state.set_severity_filter(Some("90-CRITICAL"));
    assert_eq!(state.display_data().unwrap().len(), 1);

    state.reset_state();
    assert_eq!(state.display_data().unwrap().len(), 21);
}

#[test]
fn filter_by_severity() {
    let mut state = loaded_state();
    for (severity, expected) in [("30-UNKNOWN", 6), ("60-OK", 7), ("90-CRITICAL", 6)] {
        state.set_severity_filter(Some(severity));
        let rows = state.display_data().unwrap();
        assert_eq!(rows.len(), expected, "severity {severity}");
        assert!(rows.iter().all(|r| r.country_check_severity == severity));
    }
}

#[test]
fn name_filter_ignores_case() {
    let data = fixture();
    let upper = filter::filter_by(&data, Field::Name, "AR", MatchMode::Substring);
    let lower = filter::filter_by(&data, Field::Name, "ar", MatchMode::Substring);
    assert_eq!(upper.len(), 5);
    assert_eq!(upper, lower);
}

#[test]
fn filtering_twice_changes_nothing() {
    let data = fixture();
    let mut criteria = FilterCriteria::default();
    criteria.set(&FILTER_FIELDS[0], Some("ar"));
    criteria.set(&FILTER_FIELDS[1], Some("60-OK"));

    let once = filter::filter_by_criteria(&data, &criteria);
    let twice = filter::filter_by_criteria(&once, &criteria);
    assert_eq!(once, twice);
}

#[test]
fn default_filter_value_is_a_noop() {
    let untouched = loaded_state().display_data().unwrap();

    let mut state = loaded_state();
    state.set_name_filter(Some(""));
    state.set_severity_filter(Some("all"));
    assert_eq!(state.display_data().unwrap(), untouched);

    state.set_name_filter(None);
    state.set_severity_filter(None);
    assert_eq!(state.display_data().unwrap(), untouched);
}

#[test]
fn consecutive_rows_are_ordered() {
    let mut state = loaded_state();
    for field in Field::ALL {
        let comparator = Comparator::for_field(field);
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            state.set_sorting(field, Some(direction));
            let rows = state.display_data().unwrap();
            for pair in rows.windows(2) {
                let ord = comparator
                    .compare(
                        &SortValue::Text(pair[0].get(field)),
                        &SortValue::Text(pair[1].get(field)),
                        SortDirection::Ascending,
                    )
                    .unwrap();
                match direction {
                    SortDirection::Ascending => assert_ne!(ord, Ordering::Greater, "{field} asc"),
                    SortDirection::Descending => assert_ne!(ord, Ordering::Less, "{field} desc"),
                }
            }
        }
    }
}

#[test]
fn toggle_twice_restores_direction() {
    let mut state = loaded_state();
    state.set_sorting(Field::Modified, Some(SortDirection::Descending));
    state.toggle_sort_direction().unwrap();
    state.toggle_sort_direction().unwrap();
    assert_eq!(state.sort_criteria().direction, SortDirection::Descending);
}

#[test]
fn toggling_created_sort_mirrors_rows() {
    let mut state = loaded_state();
    state.set_sorting(Field::Created, Some(SortDirection::Ascending));
    let ascending = state.display_data().unwrap();

    state.toggle_sort_direction().unwrap();
    let mut descending = state.display_data().unwrap();
    descending.reverse();

    assert_eq!(ascending, descending);
}

#[test]
fn narrowed_to_nothing_stays_valid() {
    let mut state = loaded_state();
    state.set_name_filter(Some("no such screening"));
    state.set_severity_filter(Some("90-CRITICAL"));
    state.set_sorting(Field::Created, None);
    assert!(state.display_data().unwrap().is_empty());
}

#[test]
fn one_bad_date_fails_the_whole_view() {
    let mut data = fixture();
    data[3].created = "not a date".into();
    let mut state = ViewState::new();
    state.set_data(data);

    // Name sort never looks at the date
    assert_eq!(state.display_data().unwrap().len(), 21);

    state.set_sorting(Field::Created, None);
    assert!(matches!(state.display_data(), Err(sv::ViewError::InvalidArgument(_))));
}
