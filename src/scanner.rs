use ignore::WalkBuilder;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const CLASS_ATTR: &str = "className";

pub fn collect_classes(text: &str) -> Vec<String> {
    let mut classes = Vec::new();
    let mut seen = HashSet::new();

    for (idx, _) in text.match_indices(CLASS_ATTR) {
        if !is_attr_boundary(text, idx, CLASS_ATTR.len()) {
            continue;
        }
        let mut pos = idx + CLASS_ATTR.len();
        pos = skip_whitespace(text, pos);
        if !text[pos..].starts_with('=') {
            continue;
        }
        pos += 1;
        pos = skip_whitespace(text, pos);
        if pos >= text.len() {
            continue;
        }
        let (values, _) = parse_attribute_value(text, pos);
        for value in values {
            if !value.is_empty() && seen.insert(value.clone()) {
                classes.push(value);
            }
        }
    }

    classes
}

pub fn read_text_from_dir(dir: &Path, file_extension: &str) -> String {
    if !dir.exists() {
        return String::new();
    }

    let mut builder = WalkBuilder::new(dir);
    builder
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .sort_by_file_path(|a, b| a.cmp(b));

    let mut text = String::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("");
        if !file_name.contains(file_extension) {
            continue;
        }
        if let Ok(contents) = fs::read_to_string(path) {
            text.push_str(&contents);
        }
    }

    text
}

fn parse_attribute_value(text: &str, idx: usize) -> (Vec<String>, usize) {
    let Some((ch, size)) = next_char(text, idx) else {
        return (Vec::new(), idx);
    };

    match ch {
        '"' | '\'' => parse_quoted_value(text, idx + size, ch),
        '{' => parse_braced_value(text, idx),
        _ => (Vec::new(), idx),
    }
}

fn parse_quoted_value(text: &str, mut idx: usize, quote: char) -> (Vec<String>, usize) {
    let mut value = String::new();
    while idx < text.len() {
        let Some((ch, size)) = next_char(text, idx) else {
            break;
        };
        if ch == quote {
            idx += size;
            break;
        }
        value.push(ch);
        idx += size;
    }
    let tokens = value.split_whitespace().map(str::to_string).collect();
    (tokens, idx)
}

fn parse_braced_value(text: &str, idx: usize) -> (Vec<String>, usize) {
    let mut depth: usize = 0;
    let mut pos = idx;
    let mut start = None;
    while pos < text.len() {
        let Some((ch, size)) = next_char(text, pos) else {
            break;
        };
        if ch == '{' {
            depth += 1;
            if depth == 1 {
                start = Some(pos + size);
            }
        } else if ch == '}' {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                // The whole expression text is one opaque token; it is
                // never evaluated.
                let inner = start.map(|s| &text[s..pos]).unwrap_or("");
                let values = if inner.is_empty() {
                    Vec::new()
                } else {
                    vec![inner.to_string()]
                };
                return (values, pos + size);
            }
        }
        pos += size;
    }
    (Vec::new(), pos)
}

fn is_attr_boundary(text: &str, idx: usize, len: usize) -> bool {
    let prev = if idx == 0 {
        None
    } else {
        text[..idx].chars().last()
    };
    let next = text[idx + len..].chars().next();

    let prev_ok = prev.is_none_or(is_boundary_char);
    let next_ok = next.is_none_or(|c| is_boundary_char(c) || c == '=');

    prev_ok && next_ok
}

fn is_boundary_char(c: char) -> bool {
    !(c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn skip_whitespace(text: &str, mut idx: usize) -> usize {
    while idx < text.len() {
        let Some((ch, size)) = next_char(text, idx) else {
            break;
        };
        if !ch.is_whitespace() {
            break;
        }
        idx += size;
    }
    idx
}

fn next_char(text: &str, idx: usize) -> Option<(char, usize)> {
    let ch = text[idx..].chars().next()?;
    Some((ch, ch.len_utf8()))
}
