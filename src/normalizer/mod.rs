//! # نرمال‌سازی متن فارسی
//!
//! یک pipeline از pass‌های تمیزکاری که قبل از ذخیره روی فیلدهای متنی اجرا میشه.
//!
//! | pass                | کار                                                     |
//! |---------------------|---------------------------------------------------------|
//! | `space`             | یکی کردن فاصله‌ها و نیم‌فاصله‌ها، trim                   |
//! | `number`            | تبدیل ارقام لاتین و عربی به ارقام فارسی                 |
//! | `arabic`            | تبدیل حروف عربی (ي، ك، ...) به معادل فارسی             |
//! | `punctuation_marks` | علائم نگارشی فارسی و فاصله‌گذاری دورشون                 |
//!
//! هر pass با یک بار اجرا به نقطه ثابت میرسه، پس اجرای دوباره‌ی ویرایشگر
//! چیزی رو عوض نمیکنه.
//!
//! ## مثال
//! ```rust
//! use laum::normalizer::{Pass, PersianEditor};
//!
//! let editor = PersianEditor::new([Pass::Space, Pass::Arabic]);
//! assert_eq!(editor.run("  علي   كريمي "), "علی کریمی");
//! ```

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// نیم‌فاصله (ZWNJ)
pub const ZWNJ: char = '\u{200C}';

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

// =====================================
// Regex patterns
// =====================================
/// نیم‌فاصله‌ای که به whitespace چسبیده
static ZWNJ_AROUND_SPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x{200C}*\s+\x{200C}*").expect("Invalid regex pattern")
});

static ZWNJ_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x{200C}{2,}").expect("Invalid regex pattern")
});

/// فاصله (یا نیم‌فاصله) قبل از علامت‌هایی که به کلمه قبلی میچسبن
static SPACE_BEFORE_MARK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s\x{200C}]+([،؛؟!»])").expect("Invalid regex pattern")
});

static SPACE_AFTER_OPEN_QUOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"«[\s\x{200C}]+").expect("Invalid regex pattern")
});

/// علامت فارسی که مستقیم به کلمه بعدی چسبیده
static MARK_WITHOUT_SPACE: Lazy<Regex> = Lazy::new(|| {
    // `\w` شامل نیم‌فاصله هم میشه؛ اون کلمه نیست
    Regex::new(r"([،؛؟])([^\W\x{200C}]|[«(])").expect("Invalid regex pattern")
});

// =====================================
// Pass
// =====================================
/// یک مرحله نرمال‌سازی
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    Space,
    Number,
    Arabic,
    PunctuationMarks,
}

impl Pass {
    /// همه pass‌ها به ترتیب پیش‌فرض
    ///
    /// فاصله آخر اجرا میشه تا فاصله‌هایی که بقیه pass‌ها جا میذارن (مثلا
    /// بعد از حذف کشیده) هم یکدست بشن.
    pub const ALL: [Pass; 4] = [Pass::Arabic, Pass::Number, Pass::PunctuationMarks, Pass::Space];

    /// نام pass در تنظیمات
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::Number => "number",
            Self::Arabic => "arabic",
            Self::PunctuationMarks => "punctuation_marks",
        }
    }
}

impl FromStr for Pass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "space" => Ok(Self::Space),
            "number" => Ok(Self::Number),
            "arabic" => Ok(Self::Arabic),
            "punctuation_marks" => Ok(Self::PunctuationMarks),
            other => Err(format!("unknown normalization pass '{}'", other)),
        }
    }
}

// =====================================
// Editor
// =====================================
/// ویرایشگر متن با مجموعه‌ای از pass‌ها
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersianEditor {
    passes: Vec<Pass>,
    escape_return: bool,
}

impl Default for PersianEditor {
    /// همه pass‌ها، شکستن خط به فاصله تبدیل میشه
    fn default() -> Self {
        Self::new(Pass::ALL)
    }
}

impl PersianEditor {
    /// ساخت ویرایشگر با pass‌های داده شده (به همون ترتیب، تکراری‌ها حذف میشن)
    #[must_use]
    pub fn new(passes: impl IntoIterator<Item = Pass>) -> Self {
        let mut editor = Self {
            passes: Vec::new(),
            escape_return: true,
        };
        editor.set_passes(passes);
        editor
    }

    /// ویرایشگر متن چندخطی: فقط فاصله‌ها، شکستن خط حفظ میشه
    #[must_use]
    pub fn multiline_space_only() -> Self {
        Self::new([Pass::Space]).escape_return(false)
    }

    /// عوض کردن pass‌های فعال
    pub fn set_passes(&mut self, passes: impl IntoIterator<Item = Pass>) {
        self.passes.clear();
        for pass in passes {
            if !self.passes.contains(&pass) {
                self.passes.push(pass);
            }
        }
    }

    /// اگه true باشه شکستن خط مثل فاصله رفتار میکنه، وگرنه حفظ میشه
    #[must_use]
    pub fn escape_return(mut self, escape: bool) -> Self {
        self.escape_return = escape;
        self
    }

    #[must_use]
    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    /// اجرای همه pass‌ها روی متن
    #[must_use]
    pub fn run(&self, text: &str) -> String {
        let mut output = text.to_string();
        for pass in &self.passes {
            output = match pass {
                Pass::Space => normalize_spaces(&output, self.escape_return),
                Pass::Number => normalize_digits(&output),
                Pass::Arabic => arabic_to_persian(&output),
                Pass::PunctuationMarks => normalize_punctuation(&output),
            };
        }
        output
    }

    /// مثل `run` برای فیلدهای اختیاری
    #[must_use]
    pub fn run_opt(&self, text: Option<&str>) -> Option<String> {
        text.map(|t| self.run(t))
    }
}

// =====================================
// Passes
// =====================================
/// pass فاصله
#[must_use]
pub fn normalize_spaces(text: &str, escape_return: bool) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    if escape_return {
        return clean_line(&text);
    }

    let mut lines: Vec<String> = Vec::new();
    for line in text.split('\n').map(clean_line) {
        // بیشتر از یک خط خالی پشت سر هم نگه نمیداریم
        if line.is_empty() && lines.last().map_or(true, String::is_empty) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }

    lines.join("\n")
}

fn clean_line(line: &str) -> String {
    let line = ZWNJ_AROUND_SPACE.replace_all(line, " ");
    let line = ZWNJ_RUN.replace_all(&line, ZWNJ.to_string());

    line.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(ZWNJ)
        .to_string()
}

/// pass اعداد: ارقام لاتین و عربی به فارسی
#[must_use]
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0'..='9' => PERSIAN_DIGITS[c as usize - '0' as usize],
            '\u{0660}'..='\u{0669}' => PERSIAN_DIGITS[c as usize - 0x0660],
            _ => c,
        })
        .collect()
}

/// pass حروف عربی
#[must_use]
pub fn arabic_to_persian(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\u{0640}') // کشیده (tatweel)
        .map(|c| match c {
            'ي' | 'ى' => 'ی',
            'ك' => 'ک',
            'ە' => 'ه',
            _ => c,
        })
        .collect()
}

/// pass علائم نگارشی
#[must_use]
pub fn normalize_punctuation(text: &str) -> String {
    let mut converted = String::with_capacity(text.len());
    let mut previous: Option<char> = None;

    for c in text.chars() {
        let mapped = match (c, previous) {
            (',', Some(p)) if is_arabic_script(p) => '،',
            (';', Some(p)) if is_arabic_script(p) => '؛',
            ('?', Some(p)) if is_arabic_script(p) => '؟',
            _ => c,
        };
        converted.push(mapped);
        if !mapped.is_whitespace() && mapped != ZWNJ {
            previous = Some(mapped);
        }
    }

    let text = SPACE_BEFORE_MARK.replace_all(&converted, "$1");
    let text = SPACE_AFTER_OPEN_QUOTE.replace_all(&text, "«");
    MARK_WITHOUT_SPACE.replace_all(&text, "$1 $2").into_owned()
}

/// آیا کاراکتر از بلوک عربی/فارسی یونیکد هست؟
fn is_arabic_script(c: char) -> bool {
    matches!(c, '\u{0600}'..='\u{06FF}' | '\u{FB50}'..='\u{FDFF}' | '\u{FE70}'..='\u{FEFF}')
}
