//! # Property-based تست‌های نرمال‌ساز
//!
//! ## مفاهیم:
//! - proptest ورودی تصادفی میسازه و در صورت شکست، کوچک‌ترین نمونه رو پیدا میکنه

use laum::normalizer::{Pass, PersianEditor};
use proptest::prelude::*;

/// متن ترکیبی از حروف فارسی، عربی، لاتین، رقم و انواع فاصله
fn mixed_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            'ا', 'ب', 'ی', 'ي', 'ك', 'ک', 'ه', 'ـ', 'a', 'Z', '1', '٣', '۷', ' ', '\t', '\n',
            '\r', '\u{200C}', ',', '?', ';', '!', '«', '»', '(',
        ]),
        0..64,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn single_pass() -> impl Strategy<Value = Pass> {
    prop::sample::select(Pass::ALL.to_vec())
}

proptest! {
    /// ویرایشگر بدون pass متن رو دست نمیزنه
    #[test]
    fn empty_pass_set_is_identity(text in any::<String>()) {
        let editor = PersianEditor::new(Vec::<Pass>::new());
        prop_assert_eq!(editor.run(&text), text);
    }

    /// اجرای دوباره هر pass چیزی رو عوض نمیکنه
    #[test]
    fn each_pass_is_idempotent(text in mixed_text(), pass in single_pass()) {
        let editor = PersianEditor::new([pass]);
        let once = editor.run(&text);
        prop_assert_eq!(editor.run(&once), once.clone());
    }

    /// ویرایشگر پیش‌فرض (همون که موقع ذخیره صفحه اجرا میشه) هم پایداره
    #[test]
    fn default_editor_is_idempotent(text in mixed_text()) {
        let editor = PersianEditor::default();
        let once = editor.run(&text);
        prop_assert_eq!(editor.run(&once), once.clone());
    }

    #[test]
    fn multiline_editor_is_idempotent(text in mixed_text()) {
        let editor = PersianEditor::multiline_space_only();
        let once = editor.run(&text);
        prop_assert_eq!(editor.run(&once), once);
    }

    /// خروجی pass فاصله هیچوقت با فاصله شروع یا تموم نمیشه
    #[test]
    fn space_pass_trims(text in mixed_text()) {
        let output = PersianEditor::new([Pass::Space]).run(&text);
        prop_assert_eq!(output.trim(), output.as_str());
        prop_assert!(!output.contains("  "));
    }
}
