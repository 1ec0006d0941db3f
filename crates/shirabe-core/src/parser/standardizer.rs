//! # Standardizer
//!
//! Rewrites full-width punctuation and stylistic variants that release
//! groups mix freely into one canonical character set, so the tokenizer and
//! recognizers only ever see `[`, `]`, `(`, `)`, `:`, `&` and a lowercase `x`.

/// Ordered substitution table.
///
/// Newlines go first: removing them is the only rewrite that can bring two
/// underscores together, and `__` must be folded after that.
pub const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("\r", ""),
    ("\n", ""),
    ("【", "["),
    ("】", "]"),
    ("：", ":"),
    ("（", "("),
    ("）", ")"),
    ("＆", "&"),
    ("×", "x"),
    ("Ⅹ", "x"),
    ("X", "x"),
    ("__", "/"),
];

/// Applies [`SUBSTITUTIONS`] in order.
///
/// The result is idempotent: `standardize(&standardize(s)) == standardize(s)`.
///
/// # Examples
/// ```
/// use shirabe_core::parser::standardize;
///
/// assert_eq!(standardize("【幻樱字幕组】【4月新番】"), "[幻樱字幕组][4月新番]");
/// ```
#[must_use]
pub fn standardize(raw: &str) -> String {
    let mut out = raw.to_string();
    for &(from, to) in SUBSTITUTIONS {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_width_brackets() {
        assert_eq!(standardize("【幻樱字幕组】【4月新番】"), "[幻樱字幕组][4月新番]");
    }

    #[test]
    fn punctuation_and_multiplication_signs() {
        assert_eq!(standardize("尼尔：机械纪元"), "尼尔:机械纪元");
        assert_eq!(standardize("（仅限港澳台地区）"), "(仅限港澳台地区)");
        assert_eq!(standardize("A＆B"), "A&B");
        assert_eq!(standardize("1920×1080"), "1920x1080");
        assert_eq!(standardize("1920X1080"), "1920x1080");
        assert_eq!(standardize("SPYⅩFAMILY"), "SPYxFAMILY");
    }

    #[test]
    fn double_underscore_and_newlines() {
        assert_eq!(standardize("a__b"), "a/b");
        assert_eq!(standardize("GB_MP4"), "GB_MP4");
        assert_eq!(standardize("line\r\nbreak\n"), "linebreak");
        assert_eq!(standardize("_\n_"), "/");
    }

    #[test]
    fn empty_input() {
        assert_eq!(standardize(""), "");
    }

    #[test]
    fn idempotent_on_tricky_inputs() {
        for input in [
            "___",
            "____",
            "_\n__\n_",
            "【X】×Ⅹ",
            "【幻樱字幕组】【4月新番】【古见同学有交流障碍症 第二季 Komi-san wa, Komyushou Desu. S02】【22】【GB_MP4】【1920X1080】",
        ] {
            let once = standardize(input);
            assert_eq!(standardize(&once), once, "not idempotent for {input:?}");
        }
    }
}
