use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const WILDCARD: u8 = 0xFF;

/// A BACnet date as carried on the wire.
///
/// `weekday` is ISO numbered (Monday = 1, Sunday = 7). Any field may be the
/// 0xFF wildcard; the all-wildcard value is [`Date::UNSPECIFIED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Date {
    pub year_since_1900: u8,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
}

impl Date {
    pub const UNSPECIFIED: Self = Self::from_bytes([WILDCARD; 4]);

    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self {
            year_since_1900: b[0],
            month: b[1],
            day: b[2],
            weekday: b[3],
        }
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        [self.year_since_1900, self.month, self.day, self.weekday]
    }

    pub const fn is_unspecified(&self) -> bool {
        self.year_since_1900 == WILDCARD
            && self.month == WILDCARD
            && self.day == WILDCARD
            && self.weekday == WILDCARD
    }

    pub const fn year(&self) -> Option<u16> {
        if self.year_since_1900 == WILDCARD {
            None
        } else {
            Some(1900 + self.year_since_1900 as u16)
        }
    }

    /// Returns `None` for years outside 1900..=2154, which the wire cannot hold.
    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        let year = u8::try_from(date.year().checked_sub(1900)?).ok()?;
        if year == WILDCARD {
            return None;
        }
        Some(Self {
            year_since_1900: year,
            month: date.month() as u8,
            day: date.day() as u8,
            weekday: date.weekday().number_from_monday() as u8,
        })
    }

    /// `None` when any of year, month or day is a wildcard or out of range.
    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year()?),
            u32::from(self.month),
            u32::from(self.day),
        )
    }
}

/// A BACnet time of day as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub hundredths: u8,
}

impl Time {
    pub const UNSPECIFIED: Self = Self::from_bytes([WILDCARD; 4]);

    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self {
            hour: b[0],
            minute: b[1],
            second: b[2],
            hundredths: b[3],
        }
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        [self.hour, self.minute, self.second, self.hundredths]
    }

    pub const fn is_unspecified(&self) -> bool {
        self.hour == WILDCARD
            && self.minute == WILDCARD
            && self.second == WILDCARD
            && self.hundredths == WILDCARD
    }

    pub fn from_naive(time: NaiveTime) -> Self {
        let hundredths = (time.nanosecond() / 10_000_000).min(99) as u8;
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second() as u8,
            hundredths,
        }
    }

    pub fn to_naive(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_milli_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
            u32::from(self.hundredths) * 10,
        )
    }
}

/// A date and a time, encoded back to back as two application values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateTime {
    pub date: Date,
    pub time: Time,
}

impl DateTime {
    pub const UNSPECIFIED: Self = Self {
        date: Date::UNSPECIFIED,
        time: Time::UNSPECIFIED,
    };

    pub const fn is_unspecified(&self) -> bool {
        self.date.is_unspecified() && self.time.is_unspecified()
    }

    pub fn from_naive(value: NaiveDateTime) -> Option<Self> {
        Some(Self {
            date: Date::from_naive(value.date())?,
            time: Time::from_naive(value.time()),
        })
    }

    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        Some(NaiveDateTime::new(self.date.to_naive()?, self.time.to_naive()?))
    }
}

#[cfg(test)]
mod tests {
    use super::{Date, DateTime, Time};
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn sunday_is_seven() {
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let d = Date::from_naive(sunday).unwrap();
        assert_eq!(d.to_bytes(), [124, 3, 3, 7]);
        assert_eq!(d.to_naive(), Some(sunday));
    }

    #[test]
    fn years_outside_wire_range() {
        assert!(Date::from_naive(NaiveDate::from_ymd_opt(1899, 12, 31).unwrap()).is_none());
        assert!(Date::from_naive(NaiveDate::from_ymd_opt(2155, 1, 1).unwrap()).is_none());
        assert!(Date::from_naive(NaiveDate::from_ymd_opt(2154, 1, 1).unwrap()).is_some());
    }

    #[test]
    fn wildcards_have_no_calendar_value() {
        assert!(Date::UNSPECIFIED.is_unspecified());
        assert_eq!(Date::UNSPECIFIED.to_naive(), None);
        assert_eq!(Time::UNSPECIFIED.to_naive(), None);
        assert!(DateTime::UNSPECIFIED.is_unspecified());
    }

    #[test]
    fn time_keeps_hundredths() {
        let t = NaiveTime::from_hms_milli_opt(13, 5, 9, 470).unwrap();
        let wire = Time::from_naive(t);
        assert_eq!(wire.to_bytes(), [13, 5, 9, 47]);
        assert_eq!(wire.to_naive(), Some(t));
    }
}
