//! Structured record extraction from label/value form text.
//!
//! ## Architecture
//!
//! - [`record`]: the fixed output field set
//! - [`fields`]: the declarative label table
//! - [`composite`], [`address`], [`date`]: splitters for values that carry
//!   more than one field
//!
//! Extraction runs in two passes. Plain fields are captured first and
//! remember which fields had their own label line. Splitters run second and
//! only fill fields that no standalone label claimed, even when that
//! standalone line was blank.

pub mod address;
pub mod composite;
pub mod date;
pub mod fields;
pub mod record;

use std::collections::HashSet;

use tracing::debug;

use crate::config::ExtractorConfig;
use fields::{CompiledSpec, Splitter, Target};

pub use date::DateInput;
pub use fields::{FieldSpec, FieldTable, PostProcess};
pub use record::{Field, ParsedRequestRecord};

/// Extract a record from one block of form text.
pub fn extract(text: &str, config: &ExtractorConfig) -> ParsedRequestRecord {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = text.lines().collect();

    let mut record = ParsedRequestRecord::default();
    let mut claimed = HashSet::new();

    for compiled in config.table.specs() {
        if let Target::Plain(field, post) = compiled.spec.target {
            if let Some(value) = capture(compiled, &lines, &config.value_marker) {
                let value = match post {
                    Some(post) => post.apply(&value),
                    None => value,
                };
                record.set(field, value);
                claimed.insert(field);
            }
        }
    }

    let mut fill = |field: Field, value: String| {
        if !claimed.contains(&field) && record.get(field).is_empty() {
            record.set(field, value);
        }
    };

    for compiled in config.table.specs() {
        let Target::Split(splitter) = compiled.spec.target else {
            continue;
        };
        let captured = capture(compiled, &lines, &config.value_marker);

        match splitter {
            Splitter::ColorCount => {
                if let Some(value) = captured {
                    let (color, count) = composite::split_color_count(&value);
                    fill(Field::BodyColor, color);
                    fill(Field::DoorCount, count);
                }
            }
            Splitter::ModelEquipment => {
                if let Some(value) = captured {
                    let (code, equipment) = composite::split_model_equipment(&value);
                    fill(Field::ModelCode, code);
                    fill(Field::EquipmentInfo, equipment);
                }
            }
            Splitter::Address => {
                if let Some(value) = captured {
                    let parts = address::decompose(&value);
                    fill(Field::PostalCode, parts.postal_code);
                    fill(Field::State, parts.state);
                    fill(Field::City, parts.city);
                    fill(Field::Address, parts.address);
                }
            }
            Splitter::DatedReference => {
                let (phrase, number) = match captured {
                    Some(value) => match date::find_dated_reference(&value) {
                        Some((phrase, number)) => (phrase, number),
                        None => (value, String::new()),
                    },
                    None => date::find_dated_reference(&text).unwrap_or_default(),
                };
                let normalized =
                    date::normalize(&DateInput::Text(phrase.clone()), config.zone).unwrap_or_default();
                fill(Field::RequestDate, normalized);
                fill(Field::RequestDateLabel, phrase);
                fill(Field::AssessmentNumber, number);
            }
        }
    }

    debug!(
        filled = record.fields().filter(|(_, v)| !v.is_empty()).count(),
        total = Field::ALL.len(),
        "record extracted"
    );
    record
}

/// Extract a record from several decoded text blocks, read as one form.
pub fn extract_blocks<S: AsRef<str>>(blocks: &[S], config: &ExtractorConfig) -> ParsedRequestRecord {
    let joined = blocks.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n");
    extract(&joined, config)
}

/// Capture the value for the first label that matches any line.
///
/// Labels are tried in order over the whole text before moving to the next
/// label. The value loses a trailing marker token and surrounding space.
fn capture(compiled: &CompiledSpec, lines: &[&str], marker: &str) -> Option<String> {
    compiled.matchers.iter().find_map(|matcher| {
        lines.iter().find_map(|line| {
            let caps = matcher.captures(line)?;
            Some(clean_value(&caps[1], marker))
        })
    })
}

fn clean_value(raw: &str, marker: &str) -> String {
    let value = raw.trim();
    let value = if marker.is_empty() {
        value
    } else {
        value.strip_suffix(marker).unwrap_or(value)
    };
    value.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = "\
■ 査定依頼フォーム
申込日時：2024年5月1日10時30分(123456)
メーカー：トヨタ
車種：プリウス【必須】
グレード：S ツーリングセレクション
年式：2016年（平成28年）
走行距離：45,000km
車体色・ドア数：ホワイトパールクリスタルシャイン／5ドア
型式・装備：DAA-ZVW50, ナビ/ETC
排気量：1800cc
事故歴：なし
売却希望時期：1ヶ月以内
お名前：山田　太郎
フリガナ：ヤマダ　タロウ
電話番号：０９０－１２３４－５６７８
メールアドレス：taro@example.com
住所：東京都渋谷区1-2-3
備考：\t
";

    fn record(text: &str) -> ParsedRequestRecord {
        extract(text, &ExtractorConfig::default())
    }

    #[test]
    fn test_full_form() {
        let r = record(FORM);
        assert_eq!(r.request_date, "2024-05-01T01:30:00Z");
        assert_eq!(r.request_date_label, "2024年5月1日10時30分");
        assert_eq!(r.assessment_number, "123456");
        assert_eq!(r.brand, "トヨタ");
        assert_eq!(r.model, "プリウス");
        assert_eq!(r.grade, "S ツーリングセレクション");
        assert_eq!(r.model_year, "2016年（平成28年）");
        assert_eq!(r.mileage, "45,000km");
        assert_eq!(r.body_color, "ホワイトパールクリスタルシャイン");
        assert_eq!(r.door_count, "5");
        assert_eq!(r.model_code, "DAA-ZVW50");
        assert_eq!(r.equipment_info, "ナビ/ETC");
        assert_eq!(r.displacement, "1800cc");
        assert_eq!(r.accident_history, "なし");
        assert_eq!(r.sale_timing, "1ヶ月以内");
        assert_eq!(r.name, "山田 太郎");
        assert_eq!(r.name_kana, "ヤマダ タロウ");
        assert_eq!(r.phone, "090－1234－5678");
        assert_eq!(r.email, "taro@example.com");
        assert_eq!(r.state, "東京都");
        assert_eq!(r.city, "渋谷区");
        assert_eq!(r.address, "1-2-3");
        assert_eq!(r.remarks, "");
        assert_eq!(r.transmission, "");
    }

    #[test]
    fn test_blank_value_is_empty() {
        let r = record("車種：   \nメーカー：ホンダ");
        assert_eq!(r.model, "");
        assert_eq!(r.brand, "ホンダ");
    }

    #[test]
    fn test_alias_priority_over_position() {
        // The primary label wins even when an alias appears first.
        let r = record("車名：旧フォーム\n車種：新フォーム");
        assert_eq!(r.model, "新フォーム");
    }

    #[test]
    fn test_first_line_for_label_wins() {
        let r = record("メーカー：トヨタ\nメーカー：日産");
        assert_eq!(r.brand, "トヨタ");
    }

    #[test]
    fn test_standalone_label_beats_composite() {
        let r = record("車体色・ドア数：ブラック／3ドア\nドア数：5\n型式・装備：DBA-GK3／ナビ\n装備：\n");
        assert_eq!(r.body_color, "ブラック");
        assert_eq!(r.door_count, "5");
        assert_eq!(r.model_code, "DBA-GK3");
        assert_eq!(r.equipment_info, "");
    }

    #[test]
    fn test_crlf_and_marker_suffix() {
        let r = record("車種：フィット 【必須】\r\nグレード：RS\r");
        assert_eq!(r.model, "フィット");
        assert_eq!(r.grade, "RS");
    }

    #[test]
    fn test_dated_reference_without_label() {
        let r = record("2024年5月1日10時30分(777)のお申込みです\n査定番号：888");
        assert_eq!(r.request_date_label, "2024年5月1日10時30分");
        assert_eq!(r.request_date, "2024-05-01T01:30:00Z");
        assert_eq!(r.assessment_number, "888");
    }

    #[test]
    fn test_malformed_date_leaves_other_fields() {
        let r = record("申込日時：5月1日ごろ\n車種：ノート");
        assert_eq!(r.request_date, "");
        assert_eq!(r.request_date_label, "5月1日ごろ");
        assert_eq!(r.model, "ノート");
    }

    #[test]
    fn test_postal_mark_in_address() {
        let r = record("ご住所：〒150-0002 東京都渋谷区渋谷2-1");
        assert_eq!(r.postal_code, "150-0002");
        assert_eq!(r.state, "東京都");
        assert_eq!(r.address, "渋谷2-1");

        let r = record("郵便番号：１００－０００１\n住所：〒150-0002 東京都渋谷区渋谷2-1");
        assert_eq!(r.postal_code, "100－0001");
    }

    #[test]
    fn test_blocks_read_as_one_form() {
        let blocks = ["車種：プリウス".to_string(), "グレード：S".to_string()];
        let r = extract_blocks(&blocks, &ExtractorConfig::default());
        assert_eq!(r.model, "プリウス");
        assert_eq!(r.grade, "S");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(record(""), ParsedRequestRecord::default());
    }
}
