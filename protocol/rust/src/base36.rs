//! base36 编解码（小写输出，大小写不敏感输入）。

/// 单段 base36 文本最大长度，超长直接拒绝。
pub const MAX_LEN: usize = 13;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 编码为小写 base36。
pub fn encode(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::with_capacity(MAX_LEN);
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}

/// 解码 base36；空串、超长、非法字符与溢出均返回 `None`。
pub fn decode(raw: &str) -> Option<u64> {
    if raw.is_empty() || raw.len() > MAX_LEN {
        return None;
    }
    raw.bytes().try_fold(0u64, |acc, byte| {
        let digit = (byte as char).to_digit(36)?;
        acc.checked_mul(36)?.checked_add(u64::from(digit))
    })
}
