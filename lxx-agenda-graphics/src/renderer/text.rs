//! 文本规范化与截断
//!
//! 内置字体只有 ASCII 字形，所有显示文本先经过 `normalize`：
//! 带重音的字母折叠为基本字母，其余非 ASCII 字符替换为 `?`，
//! 芬兰语星期全称缩写为两个字母。截断在规范化之后进行。

use alloc::string::String;

pub const ELLIPSIS: &str = "...";

pub const TITLE_MAX_CHARS: usize = 32;
pub const DESCRIPTION_MAX_CHARS: usize = 40;
pub const TIME_LABEL_MAX_CHARS: usize = 20;

const WEEKDAYS: [(&str, &str); 7] = [
    ("Maanantai", "Ma"),
    ("Tiistai", "Ti"),
    ("Keskiviikko", "Ke"),
    ("Torstai", "To"),
    ("Perjantai", "Pe"),
    ("Lauantai", "La"),
    ("Sunnuntai", "Su"),
];

fn fold_char(c: char) -> char {
    match c {
        'ä' | 'å' | 'á' | 'à' | 'â' | 'ã' => 'a',
        'Ä' | 'Å' | 'Á' | 'À' | 'Â' | 'Ã' => 'A',
        'ö' | 'ó' | 'ò' | 'ô' | 'õ' | 'ø' => 'o',
        'Ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ø' => 'O',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'ü' | 'ú' | 'ù' | 'û' => 'u',
        'Ü' | 'Ú' | 'Ù' | 'Û' => 'U',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'š' => 's',
        'Š' => 'S',
        'ž' => 'z',
        'Ž' => 'Z',
        c if c.is_ascii_control() => ' ',
        c if c.is_ascii() => c,
        _ => '?',
    }
}

/// 规范化显示文本，结果只含可打印 ASCII，且重复调用结果不变
pub fn normalize(input: &str) -> String {
    let mut out: String = input.chars().map(fold_char).collect();

    // 每次替换都会缩短字符串，循环必然终止
    loop {
        let mut changed = false;
        for (full, short) in WEEKDAYS {
            if out.contains(full) {
                out = out.replace(full, short);
                changed = true;
            }
        }
        if !changed {
            return out;
        }
    }
}

/// 超过 `max_chars` 时保留 `max_chars - 3` 个字符并追加省略号
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return String::from(text);
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// 先规范化再截断
pub fn fit(text: &str, max_chars: usize) -> String {
    truncate(&normalize(text), max_chars)
}
