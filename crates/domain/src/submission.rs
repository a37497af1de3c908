//! # 送信レコード
//!
//! サイトのフォームから送信される 3 種類のレコードと、その検証ルールを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 必須フィールド |
//! |---|------------|--------------|
//! | [`ContactMessage`] | お問い合わせ | name, email, message |
//! | [`Quotation`] | 見積もり依頼 | name, email, phone, details |
//! | [`Review`] | レビュー | name, email, review, rating |
//!
//! ## 不変条件
//!
//! - レコードは検証済みフォームからのみ生成される（全必須フィールドが非空）
//! - 作成日時（`createdAt`）はストアが挿入時に採番し、以後変更されない
//! - 更新・削除の経路は存在しない（追記のみ）

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use strum::IntoStaticStr;

use crate::{DomainError, notification::SubmissionNotification};

/// 送信レコード ID（UUID v7）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct SubmissionId(uuid::Uuid);

impl SubmissionId {
    /// 新しい ID を生成する（UUID v7）
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// 既存の UUID から ID を作成する
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// 内部の UUID 参照を取得する
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

/// レコード種別
///
/// ドキュメントストアの `kind` カラムに格納される値。snake_case でシリアライズされる。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionKind {
    ContactMessage,
    Quotation,
    Review,
}

impl SubmissionKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// 送信パイプラインが扱うレコードの共通インターフェース
///
/// ドキュメントストアには JSON として保存されるため、
/// `Serialize` / `DeserializeOwned` を要求する。
pub trait SubmissionRecord:
    Clone + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// レコード種別
    const KIND: SubmissionKind;

    /// このレコードから生成される通知イベント
    ///
    /// 通知を伴わない種別（レビュー）は `None` を返す。
    fn notification(&self) -> Option<SubmissionNotification>;
}

/// 未検証の入力（フォーム）
///
/// [`validate`](SubmissionForm::validate) が唯一のレコード生成経路となる。
pub trait SubmissionForm: Send {
    type Record: SubmissionRecord;

    /// 必須フィールドを検証し、レコードに変換する
    ///
    /// 未入力のフィールドがあれば、宣言順で最初のものを
    /// [`DomainError::MissingField`] として返す。
    fn validate(self) -> Result<Self::Record, DomainError>;
}

/// ストアに保存されたレコード
///
/// JSON では `{ "id", <レコードのフィールド>, "createdAt" }` のフラットな形で出力する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubmission<R> {
    pub id:         SubmissionId,
    #[serde(flatten)]
    pub record:     R,
    pub created_at: DateTime<Utc>,
}

// =========================================================================
// レコード
// =========================================================================

/// お問い合わせ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name:    String,
    pub email:   String,
    pub message: String,
}

impl SubmissionRecord for ContactMessage {
    const KIND: SubmissionKind = SubmissionKind::ContactMessage;

    fn notification(&self) -> Option<SubmissionNotification> {
        Some(SubmissionNotification::ContactReceived {
            name:    self.name.clone(),
            email:   self.email.clone(),
            message: self.message.clone(),
        })
    }
}

/// 見積もり依頼
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotation {
    pub name:    String,
    pub email:   String,
    pub phone:   String,
    pub details: String,
}

impl SubmissionRecord for Quotation {
    const KIND: SubmissionKind = SubmissionKind::Quotation;

    fn notification(&self) -> Option<SubmissionNotification> {
        Some(SubmissionNotification::QuotationRequested {
            name:    self.name.clone(),
            email:   self.email.clone(),
            phone:   self.phone.clone(),
            details: self.details.clone(),
        })
    }
}

/// レビュー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub name:   String,
    pub email:  String,
    pub review: String,
    pub rating: Rating,
}

impl SubmissionRecord for Review {
    const KIND: SubmissionKind = SubmissionKind::Review;

    fn notification(&self) -> Option<SubmissionNotification> {
        None
    }
}

/// 評価（星の数）
///
/// # 不変条件
///
/// - 1 以上 5 以下
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    /// 評価を作成する
    ///
    /// 0 は未入力として扱い [`DomainError::MissingField`] を返す。
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::MissingField { field: "rating" });
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DomainError::OutOfRange {
                field: "rating",
                min: Self::MIN,
                max: Self::MAX,
                value,
            });
        }
        // 範囲チェック済みのため u8 に収まる
        Ok(Self(value as u8))
    }

    pub fn as_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        i64::from(rating.0)
    }
}

// =========================================================================
// フォーム
// =========================================================================

/// 必須テキストを検証する
///
/// 前後の空白を除去した結果が空であれば未入力とみなす。
fn required_text(field: &'static str, value: Option<String>) -> Result<String, DomainError> {
    let value = value.as_deref().map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(DomainError::MissingField { field });
    }
    Ok(value.to_string())
}

/// テキスト項目の入力値
///
/// 電話番号などが JSON の数値で届いても文字列として受け付ける。
#[derive(Deserialize)]
#[serde(untagged)]
enum TextInput {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// テキスト項目をデコードする
///
/// 数値は文字列に変換する。`0` は未入力として `None` にする。
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = Option::<TextInput>::deserialize(deserializer)?;
    Ok(input.and_then(|input| match input {
        TextInput::Text(text) => Some(text),
        TextInput::Integer(0) => None,
        TextInput::Integer(value) => Some(value.to_string()),
        TextInput::Float(value) if value.abs() < f64::EPSILON => None,
        TextInput::Float(value) => Some(value.to_string()),
    }))
}

/// お問い合わせフォーム
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default, deserialize_with = "text_or_number")]
    pub name:    Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub email:   Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub message: Option<String>,
}

impl SubmissionForm for ContactForm {
    type Record = ContactMessage;

    fn validate(self) -> Result<ContactMessage, DomainError> {
        Ok(ContactMessage {
            name:    required_text("name", self.name)?,
            email:   required_text("email", self.email)?,
            message: required_text("message", self.message)?,
        })
    }
}

/// 見積もり依頼フォーム
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotationForm {
    #[serde(default, deserialize_with = "text_or_number")]
    pub name:    Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub email:   Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub phone:   Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub details: Option<String>,
}

impl SubmissionForm for QuotationForm {
    type Record = Quotation;

    fn validate(self) -> Result<Quotation, DomainError> {
        Ok(Quotation {
            name:    required_text("name", self.name)?,
            email:   required_text("email", self.email)?,
            phone:   required_text("phone", self.phone)?,
            details: required_text("details", self.details)?,
        })
    }
}

/// 評価の入力値
///
/// フロントエンドの `<select>` から文字列で届く場合があるため、数値と文字列の両方を受け付ける。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RatingInput {
    Number(i64),
    Text(String),
}

impl RatingInput {
    fn into_rating(self) -> Result<Rating, DomainError> {
        match self {
            Self::Number(value) => Rating::new(value),
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::MissingField { field: "rating" });
                }
                let value = trimmed
                    .parse::<i64>()
                    .map_err(|_| DomainError::InvalidFormat {
                        field: "rating",
                        value: text.clone(),
                    })?;
                Rating::new(value)
            }
        }
    }
}

/// レビューフォーム
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(default, deserialize_with = "text_or_number")]
    pub name:   Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub email:  Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub review: Option<String>,
    pub rating: Option<RatingInput>,
}

impl SubmissionForm for ReviewForm {
    type Record = Review;

    fn validate(self) -> Result<Review, DomainError> {
        let name = required_text("name", self.name)?;
        let email = required_text("email", self.email)?;
        let review = required_text("review", self.review)?;
        let rating = self
            .rating
            .ok_or(DomainError::MissingField { field: "rating" })?
            .into_rating()?;

        Ok(Review {
            name,
            email,
            review,
            rating,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn contact_form() -> ContactForm {
        ContactForm {
            name:    Some("Ana".to_string()),
            email:   Some("ana@example.com".to_string()),
            message: Some("Hola".to_string()),
        }
    }

    fn quotation_form() -> QuotationForm {
        QuotationForm {
            name:    Some("Luis".to_string()),
            email:   Some("luis@example.com".to_string()),
            phone:   Some("+52 555 000 0000".to_string()),
            details: Some("Tienda en línea".to_string()),
        }
    }

    fn review_form() -> ReviewForm {
        ReviewForm {
            name:   Some("Marta".to_string()),
            email:  Some("marta@example.com".to_string()),
            review: Some("Excelente trabajo".to_string()),
            rating: Some(RatingInput::Number(5)),
        }
    }

    // ===== SubmissionKind =====

    #[test]
    fn test_submission_kindの文字列表現がsnake_case() {
        assert_eq!(SubmissionKind::ContactMessage.as_str(), "contact_message");
        assert_eq!(SubmissionKind::Quotation.as_str(), "quotation");
        assert_eq!(SubmissionKind::Review.as_str(), "review");
        assert_eq!(
            "review".parse::<SubmissionKind>().unwrap(),
            SubmissionKind::Review
        );
    }

    // ===== ContactForm =====

    #[test]
    fn test_お問い合わせフォームが全項目入力済みならレコードになる() {
        let record = contact_form().validate().unwrap();

        assert_eq!(
            record,
            ContactMessage {
                name:    "Ana".to_string(),
                email:   "ana@example.com".to_string(),
                message: "Hola".to_string(),
            }
        );
    }

    #[rstest]
    #[case::name_none(ContactForm { name: None, ..contact_form() }, "name")]
    #[case::name_empty(ContactForm { name: Some(String::new()), ..contact_form() }, "name")]
    #[case::email_blank(ContactForm { email: Some("   ".to_string()), ..contact_form() }, "email")]
    #[case::message_none(ContactForm { message: None, ..contact_form() }, "message")]
    fn test_お問い合わせフォームの未入力項目を検出する(
        #[case] form: ContactForm,
        #[case] field: &str,
    ) {
        let err = form.validate().unwrap_err();

        assert_eq!(err.field(), field);
        assert!(matches!(err, DomainError::MissingField { .. }));
    }

    #[test]
    fn test_複数未入力の場合は宣言順で最初のフィールドを返す() {
        let err = ContactForm::default().validate().unwrap_err();

        assert_eq!(err, DomainError::MissingField { field: "name" });
    }

    #[test]
    fn test_前後の空白は除去して保存する() {
        let form = ContactForm {
            name: Some("  Ana  ".to_string()),
            ..contact_form()
        };

        assert_eq!(form.validate().unwrap().name, "Ana");
    }

    // ===== QuotationForm =====

    #[rstest]
    #[case::name(QuotationForm { name: None, ..quotation_form() }, "name")]
    #[case::email(QuotationForm { email: None, ..quotation_form() }, "email")]
    #[case::phone(QuotationForm { phone: Some(String::new()), ..quotation_form() }, "phone")]
    #[case::details(QuotationForm { details: None, ..quotation_form() }, "details")]
    fn test_見積もりフォームの未入力項目を検出する(
        #[case] form: QuotationForm,
        #[case] field: &str,
    ) {
        assert_eq!(form.validate().unwrap_err().field(), field);
    }

    #[test]
    fn test_見積もりフォームが全項目入力済みならレコードになる() {
        let record = quotation_form().validate().unwrap();

        assert_eq!(record.phone, "+52 555 000 0000");
        assert_eq!(record.details, "Tienda en línea");
    }

    // ===== ReviewForm / Rating =====

    #[rstest]
    #[case::review(ReviewForm { review: None, ..review_form() }, "review")]
    #[case::rating_none(ReviewForm { rating: None, ..review_form() }, "rating")]
    #[case::rating_zero(ReviewForm { rating: Some(RatingInput::Number(0)), ..review_form() }, "rating")]
    #[case::rating_empty_text(ReviewForm { rating: Some(RatingInput::Text(String::new())), ..review_form() }, "rating")]
    fn test_レビューフォームの未入力項目を検出する(
        #[case] form: ReviewForm,
        #[case] field: &'static str,
    ) {
        assert_eq!(form.validate().unwrap_err(), DomainError::MissingField { field });
    }

    #[test]
    fn test_文字列の評価を数値として受け付ける() {
        let form = ReviewForm {
            rating: Some(RatingInput::Text("4".to_string())),
            ..review_form()
        };

        assert_eq!(form.validate().unwrap().rating.as_u8(), 4);
    }

    #[test]
    fn test_範囲外の評価はout_of_range() {
        let form = ReviewForm {
            rating: Some(RatingInput::Number(6)),
            ..review_form()
        };

        assert_eq!(
            form.validate().unwrap_err(),
            DomainError::OutOfRange {
                field: "rating",
                min:   1,
                max:   5,
                value: 6,
            }
        );
    }

    #[test]
    fn test_数値でない評価はinvalid_format() {
        let form = ReviewForm {
            rating: Some(RatingInput::Text("cinco".to_string())),
            ..review_form()
        };

        assert!(matches!(
            form.validate().unwrap_err(),
            DomainError::InvalidFormat { field: "rating", .. }
        ));
    }

    #[test]
    fn test_rating_inputは数値と文字列の両方をデシリアライズできる() {
        let number: ReviewForm = serde_json::from_str(r#"{"rating": 3}"#).unwrap();
        let text: ReviewForm = serde_json::from_str(r#"{"rating": "3"}"#).unwrap();
        let null: ReviewForm = serde_json::from_str(r#"{"rating": null}"#).unwrap();

        assert_eq!(number.rating, Some(RatingInput::Number(3)));
        assert_eq!(text.rating, Some(RatingInput::Text("3".to_string())));
        assert_eq!(null.rating, None);
    }

    // ===== テキスト項目のデコード =====

    #[test]
    fn test_数値の電話番号は文字列として受け付ける() {
        let form: QuotationForm = serde_json::from_str(
            r#"{"name": "Luis", "email": "luis@example.com", "phone": 5551234567, "details": "x"}"#,
        )
        .unwrap();

        assert_eq!(form.phone.as_deref(), Some("5551234567"));
        assert_eq!(form.validate().unwrap().phone, "5551234567");
    }

    #[rstest]
    #[case::zero(r#"{"phone": 0}"#)]
    #[case::zero_float(r#"{"phone": 0.0}"#)]
    #[case::null(r#"{"phone": null}"#)]
    #[case::absent(r#"{}"#)]
    fn test_ゼロやnullや未指定のテキスト項目は未入力になる(#[case] body: &str) {
        let form: QuotationForm = serde_json::from_str(body).unwrap();

        assert_eq!(form.phone, None);
    }

    #[test]
    fn test_オブジェクトや真偽値のテキスト項目はデコードできない() {
        assert!(serde_json::from_str::<ContactForm>(r#"{"message": {"text": "Hola"}}"#).is_err());
        assert!(serde_json::from_str::<ContactForm>(r#"{"name": true}"#).is_err());
    }

    #[test]
    fn test_小数のテキスト項目はそのまま文字列になる() {
        let form: ReviewForm = serde_json::from_str(r#"{"review": 4.5}"#).unwrap();

        assert_eq!(form.review.as_deref(), Some("4.5"));
    }

    // ===== notification =====

    #[test]
    fn test_レビューは通知を生成しない() {
        let review = review_form().validate().unwrap();

        assert!(review.notification().is_none());
    }

    #[test]
    fn test_お問い合わせは送信内容を含む通知を生成する() {
        let notification = contact_form().validate().unwrap().notification().unwrap();

        assert_eq!(notification.submitter_name(), "Ana");
        assert_eq!(notification.echoed_text(), "Hola");
    }

    // ===== StoredSubmission =====

    #[test]
    fn test_stored_submissionはフラットなjsonでcreated_atをキャメルケースにする() {
        let id = SubmissionId::new();
        let created_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let stored = StoredSubmission {
            id: id.clone(),
            record: review_form().validate().unwrap(),
            created_at,
        };

        let json = serde_json::to_value(&stored).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": id.to_string(),
                "name": "Marta",
                "email": "marta@example.com",
                "review": "Excelente trabajo",
                "rating": 5,
                "createdAt": "2023-11-14T22:13:20Z",
            })
        );
    }
}
