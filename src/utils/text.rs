//! 文本处理：slug、摘要、GLOB 模式与 XML 转义

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]*>").expect("Invalid regex pattern")
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("Invalid regex pattern")
});

/// 生成 URL slug（小写、以连字符分隔）
pub fn slugify(text: &str) -> String {
    slug::slugify(text)
}

/// 去除 HTML 标签并截断为最多 `max_len` 个字符，截断时补上 "..."
///
/// 尽量在单词边界处截断。
pub fn trim_text(content: &str, max_len: usize) -> String {
    let plain = HTML_TAG.replace_all(content, " ");
    let plain = WHITESPACE.replace_all(plain.trim(), " ");

    if plain.chars().count() <= max_len {
        return plain.into_owned();
    }

    let cut: String = plain.chars().take(max_len).collect();
    let cut = match cut.rfind(' ') {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut.as_str(),
    };
    format!("{}...", cut.trim_end())
}

/// 构造大小写不敏感的子串匹配 GLOB 模式
///
/// SQLite 的 `lower()` 与 `LIKE` 只折叠 ASCII 字母，这里把每个有大小写之分的字符
/// 展开成 `[éÉ]` 这样的字符集，通配符 `*`、`?`、`[` 放进字符集中按字面匹配。
pub fn glob_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() * 2 + 2);
    pattern.push('*');
    for c in query.trim().chars() {
        let mut variants = vec![c];
        for folded in [single_char(c.to_lowercase()), single_char(c.to_uppercase())]
            .into_iter()
            .flatten()
        {
            if !variants.contains(&folded) {
                variants.push(folded);
            }
        }

        if variants.len() == 1 && !matches!(c, '*' | '?' | '[') {
            pattern.push(c);
        } else {
            pattern.push('[');
            pattern.extend(variants);
            pattern.push(']');
        }
    }
    pattern.push('*');
    pattern
}

/// 大小写映射只产生一个字符时返回它（`ß` → `SS` 之类不参与）
fn single_char(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    let first = mapped.next()?;
    mapped.next().is_none().then_some(first)
}

/// 转义 XML 特殊字符，无需转义时直接借用原字符串
pub fn xml_escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Visual Studio Code 1.85"), "visual-studio-code-1-85");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
    }

    #[test]
    fn trim_text_strips_tags() {
        assert_eq!(trim_text("<p>Hello <b>world</b></p>", 160), "Hello world");
    }

    #[test]
    fn trim_text_cuts_on_word_boundary() {
        let text = "alpha beta gamma delta";
        assert_eq!(trim_text(text, 12), "alpha beta...");
    }

    #[test]
    fn glob_pattern_expands_letter_case() {
        assert_eq!(glob_pattern(" Ab1 "), "*[Aa][bB]1*");
        assert_eq!(glob_pattern("é"), "*[éÉ]*");
        assert_eq!(glob_pattern("50%_off"), "*50%_[oO][fF][fF]*");
    }

    #[test]
    fn glob_pattern_keeps_wildcards_literal() {
        assert_eq!(glob_pattern("a*b?[c]"), "*[aA][*][bB][?][[][cC]]*");
        // `ß` 的大写是两个字符，不参与展开
        assert_eq!(glob_pattern("ß"), "*ß*");
    }

    #[test]
    fn xml_escape_borrows_clean_input() {
        assert!(matches!(xml_escape("plain"), Cow::Borrowed("plain")));
        assert_eq!(xml_escape("a&b<c>"), "a&amp;b&lt;c&gt;");
    }
}
