//! Declarative label table.
//!
//! Each [`FieldSpec`] names the labels that introduce a value on a form line
//! and what to do with the captured value. Labels are tried in order, so the
//! first label is the primary one and later labels are older or alternate
//! revisions of the form.

use regex::Regex;

use super::record::Field;
use crate::text::{collapse_spaces, normalize_digits};

/// Post-processing applied to a plain field's captured value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    HalfWidthDigits,
    CollapseSpaces,
}

impl PostProcess {
    pub fn apply(self, value: &str) -> String {
        match self {
            PostProcess::HalfWidthDigits => normalize_digits(value),
            PostProcess::CollapseSpaces => collapse_spaces(value),
        }
    }
}

/// Splitters for lines that carry more than one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Splitter {
    /// `ホワイト／5ドア` into body color and door count
    ColorCount,
    /// `DAA-ZVW50, ナビ/ETC` into model code and equipment
    ModelEquipment,
    /// Full address into prefecture, city and street
    Address,
    /// `2024年5月1日10時30分(123456)` into date and reference number
    DatedReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Plain(Field, Option<PostProcess>),
    Split(Splitter),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Table key, used by label overrides
    pub name: &'static str,
    pub labels: Vec<String>,
    pub target: Target,
}

impl FieldSpec {
    fn plain(field: Field, labels: &[&str]) -> Self {
        Self {
            name: field.name(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            target: Target::Plain(field, None),
        }
    }

    fn post(field: Field, post: PostProcess, labels: &[&str]) -> Self {
        Self {
            target: Target::Plain(field, Some(post)),
            ..Self::plain(field, labels)
        }
    }

    fn split(name: &'static str, splitter: Splitter, labels: &[&str]) -> Self {
        Self {
            name,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            target: Target::Split(splitter),
        }
    }
}

/// Built-in label table for vehicle assessment request forms.
pub fn default_specs() -> Vec<FieldSpec> {
    use Field::*;
    use PostProcess::*;

    vec![
        FieldSpec::split(
            "requestDate",
            Splitter::DatedReference,
            &["申込日時", "査定依頼日時", "依頼日時", "受付日時", "申込日"],
        ),
        FieldSpec::plain(AssessmentNumber, &["査定番号", "受付番号", "問合せ番号", "お問い合わせ番号"]),
        FieldSpec::plain(Brand, &["メーカー", "メーカー名", "車メーカー"]),
        FieldSpec::plain(Model, &["車種", "車種名", "車名"]),
        FieldSpec::plain(Grade, &["グレード"]),
        FieldSpec::plain(ModelYear, &["年式", "初度登録年", "初年度登録"]),
        FieldSpec::plain(Mileage, &["走行距離"]),
        FieldSpec::split(
            "bodyColorDoorCount",
            Splitter::ColorCount,
            &["車体色・ドア数", "ボディカラー・ドア数", "色・ドア数"],
        ),
        FieldSpec::plain(BodyColor, &["車体色", "ボディカラー", "ボディーカラー", "色"]),
        FieldSpec::plain(DoorCount, &["ドア数"]),
        FieldSpec::plain(BodyType, &["ボディタイプ", "車両タイプ"]),
        FieldSpec::plain(Displacement, &["排気量"]),
        FieldSpec::plain(Transmission, &["ミッション", "トランスミッション", "シフト"]),
        FieldSpec::plain(DriveType, &["駆動方式", "駆動"]),
        FieldSpec::plain(FuelType, &["燃料", "燃料種別", "燃料タイプ"]),
        FieldSpec::plain(VehicleCondition, &["車の状態", "車両状態", "状態"]),
        FieldSpec::plain(AccidentHistory, &["事故歴", "修復歴", "事故・修復歴"]),
        FieldSpec::plain(InspectionExpiry, &["車検", "車検満了日", "車検有効期限"]),
        FieldSpec::plain(SaleTiming, &["売却希望時期", "売却予定時期", "売却時期"]),
        FieldSpec::split(
            "modelCodeEquipment",
            Splitter::ModelEquipment,
            &["型式・装備", "型式・オプション"],
        ),
        FieldSpec::plain(ModelCode, &["型式"]),
        FieldSpec::plain(EquipmentInfo, &["装備", "オプション", "装備品"]),
        FieldSpec::plain(ChassisNumber, &["車台番号"]),
        FieldSpec::post(Name, CollapseSpaces, &["お名前", "氏名", "名前"]),
        FieldSpec::post(
            NameKana,
            CollapseSpaces,
            &["フリガナ", "ふりがな", "お名前（フリガナ）", "氏名カナ"],
        ),
        FieldSpec::post(Phone, HalfWidthDigits, &["電話番号", "携帯電話番号", "TEL", "連絡先"]),
        FieldSpec::plain(Email, &["メールアドレス", "E-mail", "Email", "メール"]),
        FieldSpec::post(PostalCode, HalfWidthDigits, &["郵便番号"]),
        FieldSpec::split("fullAddress", Splitter::Address, &["住所", "ご住所", "所在地"]),
        FieldSpec::plain(State, &["都道府県"]),
        FieldSpec::plain(City, &["市区町村"]),
        FieldSpec::plain(Address, &["番地", "町名・番地"]),
        FieldSpec::plain(Remarks, &["備考", "ご要望", "その他ご要望", "自由記入欄"]),
    ]
}

/// Characters allowed before a label: indentation, bullets, list marks.
const LEADING_MARKERS: &str = r"[\s・●○■□◆◇▼▽▶★☆※*＊>＞\-]*";

/// Build the line matcher for one label.
///
/// The label may be wrapped in `【】` or `[]` and is followed by a half-width
/// or full-width colon; group 1 is the rest of the line.
pub fn label_matcher(label: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"^{LEADING_MARKERS}[【\[]?{}[】\]]?\s*[:：](.*)$",
        regex::escape(label)
    ))
}

/// A spec with one compiled matcher per label, in label order
#[derive(Debug, Clone)]
pub struct CompiledSpec {
    pub spec: FieldSpec,
    pub matchers: Vec<Regex>,
}

impl CompiledSpec {
    fn compile(spec: FieldSpec) -> Result<Self, regex::Error> {
        let matchers = spec
            .labels
            .iter()
            .map(|label| label_matcher(label))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { spec, matchers })
    }
}

/// Compiled label table
#[derive(Debug, Clone)]
pub struct FieldTable {
    specs: Vec<CompiledSpec>,
}

impl FieldTable {
    pub fn compile(specs: Vec<FieldSpec>) -> Result<Self, regex::Error> {
        let specs = specs
            .into_iter()
            .map(CompiledSpec::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { specs })
    }

    pub fn specs(&self) -> &[CompiledSpec] {
        &self.specs
    }

    pub fn get(&self, name: &str) -> Option<&CompiledSpec> {
        self.specs.iter().find(|c| c.spec.name == name)
    }

    /// Append aliases to the spec called `name`.
    ///
    /// Returns `Ok(false)` when no spec has that name. Aliases already
    /// present are skipped; new ones rank after the existing labels.
    pub fn add_aliases(&mut self, name: &str, aliases: &[String]) -> Result<bool, regex::Error> {
        let Some(compiled) = self.specs.iter_mut().find(|c| c.spec.name == name) else {
            return Ok(false);
        };
        for alias in aliases {
            let alias = alias.trim();
            if alias.is_empty() || compiled.spec.labels.iter().any(|l| l == alias) {
                continue;
            }
            compiled.matchers.push(label_matcher(alias)?);
            compiled.spec.labels.push(alias.to_string());
        }
        Ok(true)
    }
}

impl Default for FieldTable {
    fn default() -> Self {
        FieldTable::compile(default_specs()).expect("built-in labels are compile-time constant")
    }
}
