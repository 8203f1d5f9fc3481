mod common;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use encoding_rs::SHIFT_JIS;

use common::{Member, build_zip};
use zipform::{
    Attachment, CompressionMethod, EmptyReason, ExtractorConfig, Outcome, PipelineError,
    PipelineOptions, inspect, process_attachment,
};

const FORM: &str = "申込日時：2024年5月1日10時30分(123456)
メーカー：トヨタ
車種：プリウス
車体色・ドア数：ホワイトパールクリスタルシャイン／5ドア
型式・装備：DAA-ZVW50, ナビ/ETC
お名前：山田 太郎
住所：東京都渋谷区1-2-3
";

fn attachment(payload: String) -> Attachment {
    Attachment {
        name: "form.zip".to_string(),
        mime_type: Some("application/zip".to_string()),
        declared_size: None,
        payload,
    }
}

fn run(payload: String) -> Result<Outcome, PipelineError> {
    process_attachment(
        &attachment(payload),
        &PipelineOptions::default(),
        &ExtractorConfig::default(),
    )
}

fn parsed(outcome: Outcome) -> zipform::ParsedRequestRecord {
    match outcome {
        Outcome::Parsed(record) => record,
        other => panic!("expected a record, got {other:?}"),
    }
}

#[test]
fn test_deflated_base64_attachment() {
    let zip = build_zip(&[Member::deflated("form.txt", FORM.as_bytes())]);
    let record = parsed(run(STANDARD.encode(&zip)).unwrap());

    assert_eq!(record.request_date, "2024-05-01T01:30:00Z");
    assert_eq!(record.assessment_number, "123456");
    assert_eq!(record.brand, "トヨタ");
    assert_eq!(record.body_color, "ホワイトパールクリスタルシャイン");
    assert_eq!(record.door_count, "5");
    assert_eq!(record.model_code, "DAA-ZVW50");
    assert_eq!(record.equipment_info, "ナビ/ETC");
    assert_eq!(record.state, "東京都");
    assert_eq!(record.city, "渋谷区");
    assert_eq!(record.address, "1-2-3");
}

#[test]
fn test_url_safe_wrapped_payload() {
    let zip = build_zip(&[Member::stored("form.txt", FORM.as_bytes())]);
    let encoded = URL_SAFE_NO_PAD.encode(&zip);
    let wrapped: String = encoded
        .as_bytes()
        .chunks(76)
        .map(|c| std::str::from_utf8(c).unwrap())
        .collect::<Vec<_>>()
        .join("\r\n");

    assert_eq!(parsed(run(wrapped).unwrap()).model, "プリウス");
}

#[test]
fn test_decimal_dump_payload() {
    let zip = build_zip(&[Member::stored("form.txt", "車種：ノート\n".as_bytes())]);
    let dump = zip
        .iter()
        .map(|&b| if b > 127 { (b as i32 - 256).to_string() } else { b.to_string() })
        .collect::<Vec<_>>()
        .join(",");

    assert_eq!(parsed(run(dump).unwrap()).model, "ノート");
}

#[test]
fn test_shift_jis_members_read_as_one_form() {
    let (first, _, _) = SHIFT_JIS.encode("メーカー：日産\n");
    let (second, _, _) = SHIFT_JIS.encode("車種：セレナ\n");
    let zip = build_zip(&[
        Member::stored("docs/", b""),
        Member::stored("part1.txt", &first),
        Member::deflated("part2.txt", &second),
    ]);

    let record = parsed(run(STANDARD.encode(&zip)).unwrap());
    assert_eq!(record.brand, "日産");
    assert_eq!(record.model, "セレナ");
}

#[test]
fn test_deflate64_is_rejected() {
    let zip = build_zip(&[
        Member::stored("form.txt", FORM.as_bytes()),
        Member::raw("big.dat", 9, 0),
    ]);

    let entries = inspect(&zip);
    assert_eq!(entries[1].compression_method, CompressionMethod::Deflate64);

    let err = run(STANDARD.encode(&zip)).unwrap_err();
    assert!(matches!(err, PipelineError::UnsupportedMethod { method: CompressionMethod::Deflate64, .. }));
}

#[test]
fn test_encrypted_is_rejected() {
    let zip = build_zip(&[Member::raw("secret.txt", 8, 1)]);
    assert!(matches!(
        run(STANDARD.encode(&zip)).unwrap_err(),
        PipelineError::Encrypted { .. }
    ));
}

#[test]
fn test_oversized_declaration_is_member_error() {
    let mut member = Member::deflated("form.txt", FORM.as_bytes());
    member.uncompressed_len = u32::MAX;
    let zip = build_zip(&[member]);
    assert!(matches!(
        run(STANDARD.encode(&zip)).unwrap_err(),
        PipelineError::Member { .. }
    ));
}

#[test]
fn test_corrupt_member_is_error() {
    let zip = build_zip(&[Member::raw("form.txt", 8, 0)]);
    assert!(matches!(
        run(STANDARD.encode(&zip)).unwrap_err(),
        PipelineError::Member { .. }
    ));
}

#[test]
fn test_empty_outcomes() {
    assert_eq!(
        run(STANDARD.encode(b"plain bytes, no archive")).unwrap(),
        Outcome::Empty(EmptyReason::NotAnArchive)
    );
    assert_eq!(
        run(STANDARD.encode(build_zip(&[]))).unwrap(),
        Outcome::Empty(EmptyReason::NoEntries)
    );
    assert_eq!(
        run(STANDARD.encode(build_zip(&[Member::stored("only/", b"")]))).unwrap(),
        Outcome::Empty(EmptyReason::NoFiles)
    );
}

#[test]
fn test_undecodable_payload() {
    let err = run("this is ~not~ a payload!".to_string()).unwrap_err();
    match err {
        PipelineError::Decode(e) => {
            assert_eq!(e.attempts.len(), 3);
            assert!(e.invalid_chars.contains(&'~'));
            assert!(e.invalid_chars.contains(&'!'));
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}
