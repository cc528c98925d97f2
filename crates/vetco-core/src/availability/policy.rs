//! Booking slot checks against a vet's availability settings.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{Appointment, AvailabilitySettings, PolicyViolation};

/// Check a requested slot.
///
/// `open` holds the vet's other pending and confirmed appointments on
/// `date`. An available special date overrides the weekday's hours; a
/// closed one refuses the whole day. The buffer is measured between start
/// times.
pub fn check_slot(
    settings: &AvailabilitySettings,
    open: &[Appointment],
    date: NaiveDate,
    time: NaiveTime,
    now: NaiveDateTime,
) -> Result<(), PolicyViolation> {
    if !settings.accepting_bookings {
        return Err(PolicyViolation::NotAcceptingBookings);
    }

    match settings.special_date(date) {
        Some(special) if !special.available => {
            return Err(PolicyViolation::SpecialDateClosed {
                reason: special.reason.clone(),
            });
        }
        Some(_) => {}
        None => {
            let weekday = date.weekday();
            match settings.hours_for(weekday) {
                Some(hours) if hours.enabled => {
                    if !hours.covers(time) {
                        return Err(PolicyViolation::OutsideHours {
                            start: hours.start,
                            end: hours.end,
                        });
                    }
                }
                _ => return Err(PolicyViolation::ClosedDay { weekday }),
            }
        }
    }

    let policy = &settings.policy;
    let lead = date.and_time(time) - now;
    if lead < chrono::Duration::hours(i64::from(policy.notice_hours)) {
        return Err(PolicyViolation::InsufficientNotice {
            notice_hours: policy.notice_hours,
        });
    }

    if open.len() >= policy.max_per_day as usize {
        return Err(PolicyViolation::DailyLimitReached {
            max_per_day: policy.max_per_day,
        });
    }

    let buffer = chrono::Duration::minutes(i64::from(policy.buffer_minutes));
    if let Some(conflict) = open.iter().find(|a| {
        let gap = a.time - time;
        gap < buffer && -gap < buffer
    }) {
        return Err(PolicyViolation::BufferConflict {
            appointment_id: conflict.id,
            buffer_minutes: policy.buffer_minutes,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        calendar, AppointmentStatus, BookingPolicy, FarmerSummary, SpecialDate, VetSummary,
        WorkingHours,
    };
    use chrono::Weekday;

    fn settings() -> AvailabilitySettings {
        AvailabilitySettings {
            vet_id: "vet-001".into(),
            accepting_bookings: true,
            working_hours: WorkingHours::default_week(),
            locations: Vec::new(),
            services: Vec::new(),
            special_dates: Vec::new(),
            policy: BookingPolicy::default(),
        }
    }

    fn open_at(id: i64, time: &str) -> Appointment {
        Appointment {
            id,
            farmer: FarmerSummary {
                id: "farmer-001".into(),
                name: "John Doe".into(),
                location: "Kampala".into(),
                phone: String::new(),
                avatar: None,
            },
            vet: VetSummary {
                id: "vet-001".into(),
                name: "Dr. Mukasa".into(),
                specialty: String::new(),
                avatar: None,
            },
            date: friday(),
            time: calendar::parse_time(time).unwrap(),
            location: String::new(),
            animal_type: String::new(),
            animal_id: None,
            issue: String::new(),
            notes: String::new(),
            status: AppointmentStatus::Confirmed,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    // 2023-12-15 is a Friday
    fn friday() -> NaiveDate {
        calendar::parse_date("2023-12-15").unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        calendar::parse_time(s).unwrap()
    }

    fn week_before() -> NaiveDateTime {
        calendar::parse_date("2023-12-08").unwrap().and_time(t("08:00"))
    }

    #[test]
    fn test_slot_inside_hours() {
        assert_eq!(check_slot(&settings(), &[], friday(), t("10:00"), week_before()), Ok(()));
    }

    #[test]
    fn test_closed_day_and_hours() {
        let sunday = calendar::parse_date("2023-12-17").unwrap();
        assert_eq!(
            check_slot(&settings(), &[], sunday, t("10:00"), week_before()),
            Err(PolicyViolation::ClosedDay {
                weekday: Weekday::Sun
            })
        );
        assert!(matches!(
            check_slot(&settings(), &[], friday(), t("17:30"), week_before()),
            Err(PolicyViolation::OutsideHours { .. })
        ));
    }

    #[test]
    fn test_special_dates_override_weekday() {
        let mut s = settings();
        let sunday = calendar::parse_date("2023-12-17").unwrap();
        s.special_dates.push(SpecialDate {
            date: sunday,
            available: true,
            reason: "Vaccination drive".into(),
        });
        s.special_dates.push(SpecialDate {
            date: friday(),
            available: false,
            reason: "Conference".into(),
        });

        assert_eq!(check_slot(&s, &[], sunday, t("10:00"), week_before()), Ok(()));
        assert_eq!(
            check_slot(&s, &[], friday(), t("10:00"), week_before()),
            Err(PolicyViolation::SpecialDateClosed {
                reason: "Conference".into()
            })
        );
    }

    #[test]
    fn test_notice_hours() {
        let now = friday().and_time(t("09:00"));
        assert_eq!(
            check_slot(&settings(), &[], friday(), t("10:00"), now),
            Err(PolicyViolation::InsufficientNotice { notice_hours: 2 })
        );
        assert_eq!(check_slot(&settings(), &[], friday(), t("11:00"), now), Ok(()));
    }

    #[test]
    fn test_buffer_and_daily_limit() {
        let open = vec![open_at(1, "10:00")];
        assert_eq!(
            check_slot(&settings(), &open, friday(), t("10:15"), week_before()),
            Err(PolicyViolation::BufferConflict {
                appointment_id: 1,
                buffer_minutes: 30
            })
        );
        assert_eq!(check_slot(&settings(), &open, friday(), t("10:30"), week_before()), Ok(()));

        let mut s = settings();
        s.policy.max_per_day = 1;
        assert_eq!(
            check_slot(&s, &open, friday(), t("14:00"), week_before()),
            Err(PolicyViolation::DailyLimitReached { max_per_day: 1 })
        );
    }

    #[test]
    fn test_not_accepting() {
        let mut s = settings();
        s.accepting_bookings = false;
        assert_eq!(
            check_slot(&s, &[], friday(), t("10:00"), week_before()),
            Err(PolicyViolation::NotAcceptingBookings)
        );
    }
}
