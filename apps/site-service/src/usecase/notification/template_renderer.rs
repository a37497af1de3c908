//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで管理者通知と受付確認メールを生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **管理者通知はプレーンテキストのみ**: 送信内容をすべて列挙する
//! - **受付確認はスタイル選択制**: `plain`（テキストのみ）と `rich`（HTML + テキスト）

use rivasdev_domain::{
    notification::{EmailMessage, NotificationError, SubmissionNotification},
    submission::SubmissionKind,
};
use tera::{Context, Tera};

/// 受付確認メールの送信者表示名
const SUBMITTER_SENDER_NAME: &str = "RivasDev";
/// 受付確認メールの件名
const SUBMITTER_SUBJECT: &str = "Gracias por contactarnos";

/// 受付確認メールのスタイル
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString, strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SubmitterTemplateStyle {
    /// プレーンテキストのみ
    #[default]
    Plain,
    /// ブランド HTML（ヘッダー・本文・CTA リンク・フッター）とテキストの multipart
    Rich,
}

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、`SubmissionNotification` から
/// `EmailMessage` を生成する。
pub struct TemplateRenderer {
    engine:   Tera,
    style:    SubmitterTemplateStyle,
    site_url: String,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// # 引数
    ///
    /// - `style`: 受付確認メールのスタイル
    /// - `site_url`: rich スタイルの CTA リンク先（例: `https://rivasdev.com`）
    pub fn new(
        style: SubmitterTemplateStyle,
        site_url: impl Into<String>,
    ) -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "admin_contact_message.txt",
                    include_str!("../../../templates/notifications/admin_contact_message.txt"),
                ),
                (
                    "admin_quotation.txt",
                    include_str!("../../../templates/notifications/admin_quotation.txt"),
                ),
                (
                    "submitter_confirmation.txt",
                    include_str!("../../../templates/notifications/submitter_confirmation.txt"),
                ),
                (
                    "submitter_confirmation.html",
                    include_str!("../../../templates/notifications/submitter_confirmation.html"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self {
            engine,
            style,
            site_url: site_url.into(),
        })
    }

    pub fn style(&self) -> SubmitterTemplateStyle {
        self.style
    }

    /// 管理者向け通知メールを生成する
    ///
    /// 宛先は固定の管理者アドレス。送信内容をすべてプレーンテキストで列挙する。
    pub fn render_admin(
        &self,
        notification: &SubmissionNotification,
        admin_email: &str,
    ) -> Result<EmailMessage, NotificationError> {
        let mut context = Context::new();
        let (sender_name, subject) = match notification {
            SubmissionNotification::ContactReceived {
                name,
                email,
                message,
            } => {
                context.insert("name", name);
                context.insert("email", email);
                context.insert("message", message);
                (
                    "Formulario de Contacto",
                    "Nuevo mensaje del formulario de contacto",
                )
            }
            SubmissionNotification::QuotationRequested {
                name,
                email,
                phone,
                details,
            } => {
                context.insert("name", name);
                context.insert("email", email);
                context.insert("phone", phone);
                context.insert("details", details);
                ("Formulario de Cotización", "Nueva solicitud de cotización")
            }
        };

        let text_body = self.render_template(&admin_template_name(notification.kind()), &context)?;

        Ok(EmailMessage {
            sender_name: sender_name.to_string(),
            to: admin_email.to_string(),
            subject: subject.to_string(),
            text_body,
            html_body: None,
        })
    }

    /// 送信者向けの受付確認メールを生成する
    ///
    /// 宛先は送信者本人。送信された自由記述（お問い合わせ本文・見積もり詳細）を引用する。
    pub fn render_submitter(
        &self,
        notification: &SubmissionNotification,
    ) -> Result<EmailMessage, NotificationError> {
        let mut context = Context::new();
        context.insert("name", notification.submitter_name());
        context.insert("echoed_text", notification.echoed_text());
        context.insert("site_url", &self.site_url);

        let text_body = self.render_template("submitter_confirmation.txt", &context)?;
        let html_body = match self.style {
            SubmitterTemplateStyle::Plain => None,
            SubmitterTemplateStyle::Rich => {
                Some(self.render_template("submitter_confirmation.html", &context)?)
            }
        };

        Ok(EmailMessage {
            sender_name: SUBMITTER_SENDER_NAME.to_string(),
            to: notification.submitter_email().to_string(),
            subject: SUBMITTER_SUBJECT.to_string(),
            text_body,
            html_body,
        })
    }

    fn render_template(&self, name: &str, context: &Context) -> Result<String, NotificationError> {
        self.engine
            .render(name, context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))
    }
}

fn admin_template_name(kind: SubmissionKind) -> String {
    format!("admin_{kind}.txt")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SITE_URL: &str = "https://rivasdev.com";

    fn make_contact() -> SubmissionNotification {
        SubmissionNotification::ContactReceived {
            name:    "Ana".to_string(),
            email:   "ana@example.com".to_string(),
            message: "Hola".to_string(),
        }
    }

    fn make_quotation() -> SubmissionNotification {
        SubmissionNotification::QuotationRequested {
            name:    "Luis".to_string(),
            email:   "luis@example.com".to_string(),
            phone:   "+52 555 000 0000".to_string(),
            details: "Tienda en línea\ncon pagos".to_string(),
        }
    }

    #[test]
    fn newが正常に初期化される() {
        assert!(TemplateRenderer::new(SubmitterTemplateStyle::Plain, SITE_URL).is_ok());
    }

    #[test]
    fn お問い合わせの管理者通知が送信内容をすべて含む() {
        let renderer = TemplateRenderer::new(SubmitterTemplateStyle::Plain, SITE_URL).unwrap();

        let email = renderer
            .render_admin(&make_contact(), "admin@rivasdev.com")
            .unwrap();

        assert_eq!(email.to, "admin@rivasdev.com");
        assert_eq!(email.sender_name, "Formulario de Contacto");
        assert_eq!(email.subject, "Nuevo mensaje del formulario de contacto");
        assert_eq!(
            email.text_body,
            "Has recibido un nuevo mensaje:\n\nNombre: Ana\nCorreo: ana@example.com\nMensaje: Hola"
        );
        assert!(email.html_body.is_none());
    }

    #[test]
    fn 見積もりの管理者通知が電話番号と詳細を含む() {
        let renderer = TemplateRenderer::new(SubmitterTemplateStyle::Plain, SITE_URL).unwrap();

        let email = renderer
            .render_admin(&make_quotation(), "admin@rivasdev.com")
            .unwrap();

        assert_eq!(email.sender_name, "Formulario de Cotización");
        assert_eq!(email.subject, "Nueva solicitud de cotización");
        assert!(email.text_body.contains("Teléfono: +52 555 000 0000"));
        assert!(email.text_body.contains("Detalles:\nTienda en línea\ncon pagos"));
    }

    #[test]
    fn plainスタイルの受付確認はテキストのみ() {
        let renderer = TemplateRenderer::new(SubmitterTemplateStyle::Plain, SITE_URL).unwrap();

        let email = renderer.render_submitter(&make_contact()).unwrap();

        assert_eq!(email.to, "ana@example.com");
        assert_eq!(email.sender_name, "RivasDev");
        assert_eq!(email.subject, "Gracias por contactarnos");
        assert_eq!(
            email.text_body,
            "Hola Ana,\n\nHemos recibido tu mensaje y te responderemos lo antes posible.\n\nTu mensaje:\n\"Hola\"\n\nGracias por comunicarte con RivasDev.\n\nSaludos,\nEl equipo de RivasDev"
        );
        assert!(email.html_body.is_none());
    }

    #[test]
    fn 見積もりの受付確認は詳細を引用する() {
        let renderer = TemplateRenderer::new(SubmitterTemplateStyle::Plain, SITE_URL).unwrap();

        let email = renderer.render_submitter(&make_quotation()).unwrap();

        assert_eq!(email.to, "luis@example.com");
        assert!(email.text_body.contains("\"Tienda en línea\ncon pagos\""));
    }

    #[test]
    fn richスタイルの受付確認はhtmlとctaリンクを含む() {
        let renderer = TemplateRenderer::new(SubmitterTemplateStyle::Rich, SITE_URL).unwrap();

        let email = renderer.render_submitter(&make_contact()).unwrap();

        let html = email.html_body.unwrap();
        assert!(html.contains("Hola Ana,"));
        assert!(html.contains(r#"href="https://rivasdev.com""#));
        assert!(html.contains("El equipo de RivasDev"));
        assert!(email.text_body.contains("Tu mensaje:"));
    }

    #[test]
    fn richスタイルのhtmlは送信内容をエスケープする() {
        let renderer = TemplateRenderer::new(SubmitterTemplateStyle::Rich, SITE_URL).unwrap();
        let notification = SubmissionNotification::ContactReceived {
            name:    "Ana".to_string(),
            email:   "ana@example.com".to_string(),
            message: "<script>alert(1)</script>".to_string(),
        };

        let email = renderer.render_submitter(&notification).unwrap();

        let html = email.html_body.unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        // テキスト本文はエスケープしない
        assert!(email.text_body.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn スタイルを文字列から解釈できる() {
        assert_eq!(
            "rich".parse::<SubmitterTemplateStyle>().unwrap(),
            SubmitterTemplateStyle::Rich
        );
        assert_eq!(
            "PLAIN".parse::<SubmitterTemplateStyle>().unwrap(),
            SubmitterTemplateStyle::Plain
        );
        assert!("fancy".parse::<SubmitterTemplateStyle>().is_err());
    }
}
