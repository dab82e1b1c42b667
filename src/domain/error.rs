/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 無効な宿泊期間（チェックアウト日がチェックイン日以前）
    InvalidRange,
    /// 負の金額
    NegativeAmount,
    /// 無効な宿泊者情報（例: 空の氏名やメールアドレス）
    InvalidGuest(String),
    /// 無効な値
    InvalidValue(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidRange => write!(f, "End date must be after start date"),
            DomainError::NegativeAmount => write!(f, "Amount cannot be negative"),
            DomainError::InvalidGuest(msg) => write!(f, "Invalid guest: {}", msg),
            DomainError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
