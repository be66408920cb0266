// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CalendarEntry, DomainError, IdGenerator, SeasonPolicy, SequentialIds, calendar_entry,
    default_tire_prefix, season_calendar,
};
use pretty_assertions::assert_eq;
use time::macros::date;

#[test]
fn test_default_quota_table() {
    let policy: SeasonPolicy = SeasonPolicy::default();
    assert_eq!(policy.quota_for(1), 16);
    assert_eq!(policy.quota_for(2), 8);
    assert_eq!(policy.quota_for(12), 8);
}

#[test]
fn test_stage_bounds() {
    let policy: SeasonPolicy = SeasonPolicy::default();
    assert!(policy.validate_stage(1).is_ok());
    assert!(policy.validate_stage(12).is_ok());
    assert!(matches!(
        policy.validate_stage(0),
        Err(DomainError::InvalidStageNumber { stage: 0, .. })
    ));
    assert!(matches!(
        policy.validate_stage(13),
        Err(DomainError::InvalidStageNumber {
            stage: 13,
            final_stage: 12
        })
    ));
    assert!(policy.is_final(12));
    assert!(!policy.is_final(11));
}

#[test]
fn test_calendar_has_twelve_ordered_stages() {
    let calendar: Vec<CalendarEntry> = season_calendar();
    assert_eq!(calendar.len(), 12);
    for (index, entry) in calendar.iter().enumerate() {
        assert_eq!(usize::from(entry.stage), index + 1);
    }
    assert!(calendar.windows(2).all(|pair| pair[0].date < pair[1].date));
}

#[test]
fn test_calendar_lookup() {
    let opener: CalendarEntry = calendar_entry(1).unwrap();
    assert_eq!(opener.date, date!(2026 - 03 - 08));
    assert_eq!(opener.venue, "Curvelo");
    assert_eq!(calendar_entry(12).unwrap().track_name, "Interlagos");
    assert!(calendar_entry(13).is_none());
}

#[test]
fn test_sequential_ids() {
    let ids: SequentialIds = SequentialIds::default();
    assert_eq!(ids.format(&default_tire_prefix(1), 1), "P1001");
    assert_eq!(ids.format("S", 12), "S012");
    assert_eq!(ids.barcode(2, 17), "200017");
}

#[test]
fn test_next_free_skips_taken_ids() {
    let ids: SequentialIds = SequentialIds::default();
    let existing: Vec<String> = vec![String::from("S001"), String::from("S003")];
    assert_eq!(ids.next_free("S", &existing), "S004");

    let existing: Vec<String> = vec![String::from("S002")];
    assert_eq!(ids.next_free("S", &existing), "S003");
    assert_eq!(ids.next_free("S", &[]), "S001");
}
