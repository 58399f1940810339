//! 宾客名录：宾客记录与查询。

pub(crate) mod store;

use ow_login_token::Identity;
use serde::{Deserialize, Serialize};

/// 宾客审核状态。
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum GuestStatus {
    /// 已确认，可以登录。
    #[default]
    Approved,
    /// 自助报名，等待主人审核。
    Pending,
}

/// 单个宾客记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GuestRecord {
    pub(crate) id: u64,
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) first_name: String,
    #[serde(default)]
    pub(crate) last_name: String,
    #[serde(default)]
    pub(crate) nickname: Option<String>,
    /// `en` / `es`。
    #[serde(default = "default_language")]
    pub(crate) language: String,
    #[serde(default)]
    pub(crate) status: GuestStatus,
    /// 最近登录时间（RFC3339）。
    #[serde(default)]
    pub(crate) last_login: Option<String>,
}

fn default_language() -> String {
    "es".to_string()
}

impl GuestRecord {
    /// 展示名：昵称 > 姓名 > ID。
    pub(crate) fn display_name(&self) -> String {
        if let Some(nickname) = self.nickname.as_deref().map(str::trim)
            && !nickname.is_empty()
        {
            return nickname.to_string();
        }
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if !first.is_empty() && !last.is_empty() {
            return format!("{first} {last}");
        }
        self.id.to_string()
    }

    /// 签名用身份。
    pub(crate) fn identity(&self) -> Identity {
        Identity::new(self.id, self.email.clone())
    }

    pub(crate) fn is_approved(&self) -> bool {
        self.status == GuestStatus::Approved
    }
}

/// 宾客名录文件内容。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GuestStore {
    pub(crate) version: u32,
    #[serde(default)]
    pub(crate) guests: Vec<GuestRecord>,
}

impl Default for GuestStore {
    fn default() -> Self {
        Self {
            version: 1,
            guests: Vec::new(),
        }
    }
}

impl GuestStore {
    /// 按邮箱查找（去空白、ASCII 大小写不敏感）。
    pub(crate) fn find_by_email(&self, email: &str) -> Option<&GuestRecord> {
        let wanted = email.trim();
        if wanted.is_empty() {
            return None;
        }
        self.guests
            .iter()
            .find(|guest| guest.email.trim().eq_ignore_ascii_case(wanted))
    }

    pub(crate) fn find_by_id(&self, id: u64) -> Option<&GuestRecord> {
        self.guests.iter().find(|guest| guest.id == id)
    }

    /// 下一个宾客 ID：现有最大 ID + 1，空名录从 1 开始。
    pub(crate) fn next_id(&self) -> u64 {
        self.guests
            .iter()
            .map(|guest| guest.id)
            .max()
            .map_or(1, |id| id.saturating_add(1))
    }

    /// 加入待审核宾客并返回其 ID；邮箱已存在返回 `None`。
    pub(crate) fn add_pending(
        &mut self,
        email: &str,
        first_name: &str,
        last_name: &str,
        language: &str,
    ) -> Option<u64> {
        if self.find_by_email(email).is_some() {
            return None;
        }
        let id = self.next_id();
        self.guests.push(GuestRecord {
            id,
            email: email.trim().to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            nickname: None,
            language: language.to_string(),
            status: GuestStatus::Pending,
            last_login: None,
        });
        Some(id)
    }

    /// 记录登录时间；宾客不存在返回 `false`。
    pub(crate) fn touch_last_login(&mut self, id: u64, at: String) -> bool {
        let Some(guest) = self.guests.iter_mut().find(|guest| guest.id == id) else {
            return false;
        };
        guest.last_login = Some(at);
        true
    }
}
