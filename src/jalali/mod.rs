//! # تاریخ شمسی (Jalali)
//!
//! تاریخ‌ها میلادی ذخیره میشن و فقط برای نمایش به شمسی با ارقام فارسی
//! تبدیل میشن. این ماژول هیچ state ای نداره.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::normalizer::normalize_digits;

/// روزهای گذشته از اول سال میلادی تا اول هر ماه (سال غیر کبیسه)
const GREGORIAN_DAYS_BEFORE_MONTH: [i64; 12] =
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// تاریخ شمسی
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// نمایش به شکل `YYYY/MM/DD` با ارقام لاتین
impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

/// تبدیل تاریخ میلادی به شمسی
///
/// # مثال
/// ```rust
/// use chrono::NaiveDate;
/// use laum::jalali::to_jalali;
///
/// let nowruz = NaiveDate::from_ymd_opt(2023, 3, 21).unwrap();
/// assert_eq!(to_jalali(nowruz).to_string(), "1402/01/01");
/// ```
#[must_use]
pub fn to_jalali(date: NaiveDate) -> JalaliDate {
    let gy = i64::from(date.year());
    let gm = date.month() as usize;
    let gd = i64::from(date.day());

    // برای ماه‌های بعد از فوریه روز کبیسه همین سال هم حساب میشه
    let gy2 = if gm > 2 { gy + 1 } else { gy };
    let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400
        + gd
        + GREGORIAN_DAYS_BEFORE_MONTH[gm - 1];

    // دوره‌های ۳۳ ساله
    let mut jy = -1595 + 33 * (days / 12_053);
    days %= 12_053;

    jy += 4 * (days / 1461);
    days %= 1461;

    if days > 365 {
        jy += (days - 1) / 365;
        days = (days - 1) % 365;
    }

    let (month, day) = if days < 186 {
        (1 + days / 31, 1 + days % 31)
    } else {
        (7 + (days - 186) / 30, 1 + (days - 186) % 30)
    };

    JalaliDate {
        year: jy as i32,
        month: month as u32,
        day: day as u32,
    }
}

/// تبدیل ارقام لاتین یک رشته به ارقام فارسی
#[must_use]
pub fn to_persian_digits(text: &str) -> String {
    normalize_digits(text)
}

/// تاریخ شمسی روز UTC با ارقام فارسی، مثل `۱۴۰۲/۰۱/۰۱`
#[must_use]
pub fn format_jalali(timestamp: DateTime<Utc>) -> String {
    to_persian_digits(&to_jalali(timestamp.date_naive()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nowruz_dates() {
        assert_eq!(to_jalali(date(2023, 3, 21)), JalaliDate { year: 1402, month: 1, day: 1 });
        assert_eq!(to_jalali(date(2024, 3, 20)), JalaliDate { year: 1403, month: 1, day: 1 });
        assert_eq!(to_jalali(date(2025, 3, 21)), JalaliDate { year: 1404, month: 1, day: 1 });
    }

    #[test]
    fn test_last_day_before_nowruz() {
        // ۱۴۰۱ سال عادی، اسفند ۲۹ روزه
        assert_eq!(to_jalali(date(2023, 3, 20)), JalaliDate { year: 1401, month: 12, day: 29 });
        // ۱۴۰۳ کبیسه‌ست
        assert_eq!(to_jalali(date(2025, 3, 20)), JalaliDate { year: 1403, month: 12, day: 30 });
    }

    #[test]
    fn test_second_half_of_year() {
        // اول مهر
        assert_eq!(to_jalali(date(2023, 9, 23)), JalaliDate { year: 1402, month: 7, day: 1 });
        assert_eq!(to_jalali(date(2000, 1, 1)), JalaliDate { year: 1378, month: 10, day: 11 });
    }

    #[test]
    fn test_format_jalali_uses_persian_digits() {
        let ts = Utc.with_ymd_and_hms(2023, 3, 21, 23, 59, 0).unwrap();
        assert_eq!(format_jalali(ts), "۱۴۰۲/۰۱/۰۱");
    }
}
