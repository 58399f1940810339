//! access code 邮件：登录链接拼装、正文渲染与投递出口。

use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::guests::GuestRecord;

/// access code 邮件主题。
pub(crate) const ACCESS_CODE_SUBJECT: &str = "Access Code";

/// 待投递邮件。
#[derive(Debug, Clone)]
pub(crate) struct OutgoingMail {
    pub(crate) message_id: String,
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) reply_to: String,
    pub(crate) subject: String,
    pub(crate) body: String,
}

/// 邮件投递出口；具体传输由实现方负责。
pub(crate) trait MailSink: Send + Sync {
    fn deliver(&self, mail: &OutgoingMail) -> anyhow::Result<()>;
}

/// 将邮件写入日志（控制台投递）。
#[derive(Debug, Default)]
pub(crate) struct LogMailSink;

impl MailSink for LogMailSink {
    fn deliver(&self, mail: &OutgoingMail) -> anyhow::Result<()> {
        info!(
            message_id = %mail.message_id,
            from = %mail.from,
            to = %mail.to,
            reply_to = %mail.reply_to,
            subject = %mail.subject,
            "mail delivered to log sink"
        );
        debug!(message_id = %mail.message_id, "mail body:\n{}", mail.body);
        Ok(())
    }
}

/// 拼装登录链接：`<site>/login?access_code=<code>[&next=<next>]`。
pub(crate) fn login_link(site_url: &Url, access_code: &str, next: Option<&str>) -> Url {
    let mut link = site_url.clone();
    let base = link.path().trim_end_matches('/').to_string();
    link.set_path(&format!("{base}/login"));
    link.set_fragment(None);
    link.set_query(None);
    {
        let mut pairs = link.query_pairs_mut();
        pairs.append_pair("access_code", access_code);
        if let Some(next) = next.map(str::trim).filter(|next| !next.is_empty()) {
            pairs.append_pair("next", next);
        }
    }
    link
}

/// 按宾客语言渲染 access code 邮件。
pub(crate) fn compose_access_code_mail(
    guest: &GuestRecord,
    access_code: &str,
    site_url: &Url,
    from: &str,
) -> OutgoingMail {
    let link = login_link(site_url, access_code, None);
    let name = guest.display_name();
    let body = if guest.language == "es" {
        format!(
            "Hola {name},\n\n\
             Tu código de acceso es: {access_code}\n\n\
             Podés entrar directamente con este enlace:\n{link}\n\n\
             El código vence con el tiempo; si deja de funcionar, pedí uno nuevo en la página de ingreso.\n\n\
             ¡Nos vemos pronto!\n"
        )
    } else {
        format!(
            "Hi {name},\n\n\
             Your access code is: {access_code}\n\n\
             You can log in directly with this link:\n{link}\n\n\
             The code expires after a while; if it stops working, request a new one on the login page.\n\n\
             See you soon!\n"
        )
    };

    OutgoingMail {
        message_id: Uuid::new_v4().simple().to_string(),
        from: from.to_string(),
        to: guest.email.trim().to_string(),
        reply_to: from.to_string(),
        subject: ACCESS_CODE_SUBJECT.to_string(),
        body,
    }
}
