//! Japanese address decomposition.

use std::sync::LazyLock;

use regex::Regex;

use crate::text::normalize_digits;

/// Prefecture: the three irregular names or a 2-3 character name ending
/// in 県. Everything ending in 都/道/府 is one of the irregular ones.
static RE_PREFECTURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(東京都|北海道|大阪府|京都府|[^\s0-9]{2,3}県)(.*)$").expect("regex is compile-time constant")
});

const MUNICIPALITY_SUFFIXES: &[char] = &['市', '区', '町', '村', '郡'];

fn is_suffix(c: char) -> bool {
    MUNICIPALITY_SUFFIXES.contains(&c)
}

/// Split the municipality off the text following the prefecture.
///
/// The city ends at the first suffix character after its first character,
/// extended over a directly following suffix (`四日市` + `市`). A `郡` only
/// ends the city when a town or village follows it; before a `市` it is
/// part of the name (`大和郡山市`).
fn split_city(rest: &str) -> (&str, &str) {
    let run: Vec<(usize, char)> = rest
        .char_indices()
        .take_while(|&(_, c)| !c.is_whitespace() && !c.is_ascii_digit())
        .collect();

    let Some(mut end) = (1..run.len()).find(|&i| is_suffix(run[i].1)) else {
        return ("", rest);
    };
    if run[end].1 == '郡' {
        let next = (end + 1..run.len()).find(|&i| is_suffix(run[i].1));
        if let Some(next) = next.filter(|&i| run[i].1 == '市') {
            end = next;
        }
    }
    while end + 1 < run.len() && is_suffix(run[end + 1].1) {
        end += 1;
    }

    let (offset, c) = run[end];
    rest.split_at(offset + c.len_utf8())
}

static RE_POSTAL_MARK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^〒?\s*([0-9]{3})[-－ー−]?([0-9]{4})\s*").expect("regex is compile-time constant")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParts {
    /// Postal code from a leading `〒123-4567`, formatted `123-4567`
    pub postal_code: String,
    pub state: String,
    pub city: String,
    pub address: String,
}

/// Split a full address into prefecture, municipality and the rest.
///
/// Without a recognizable prefecture the whole value is the street address.
pub fn decompose(raw: &str) -> AddressParts {
    let value = raw.trim();
    let mut parts = AddressParts::default();

    let normalized = normalize_digits(value);
    let rest = match RE_POSTAL_MARK.captures(&normalized) {
        Some(caps) if normalized.starts_with('〒') || caps[0].ends_with(char::is_whitespace) => {
            parts.postal_code = format!("{}-{}", &caps[1], &caps[2]);
            // Normalization maps char for char; skip by count to keep the
            // original digits of the remainder.
            let skipped = normalized[..caps[0].len()].chars().count();
            value.chars().skip(skipped).collect::<String>()
        }
        _ => value.to_string(),
    };

    match RE_PREFECTURE.captures(&rest) {
        Some(caps) => {
            let (city, street) = split_city(caps.get(2).map_or("", |m| m.as_str()));
            parts.state = caps[1].to_string();
            parts.city = city.to_string();
            parts.address = street.trim().to_string();
        }
        None => parts.address = rest.trim().to_string(),
    }

    parts
}
