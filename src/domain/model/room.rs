use crate::domain::model::{Money, RoomId};
use serde::{Deserialize, Serialize};

use std::fmt;

/// 客室エンティティ
/// カタログ読み込み時に一度だけ作成され、セッション中は変更されない
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    number: String,
    category: String,
    nightly_price: Money,
}

impl Room {
    /// 新しい客室を作成
    pub fn new(id: RoomId, number: &str, category: &str, nightly_price: Money) -> Self {
        Self {
            id,
            number: number.to_string(),
            category: category.to_string(),
            nightly_price,
        }
    }

    /// 客室IDを取得
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// 部屋番号を取得
    pub fn number(&self) -> &str {
        &self.number
    }

    /// カテゴリを取得
    pub fn category(&self) -> &str {
        &self.category
    }

    /// 1泊あたりの料金を取得
    pub fn nightly_price(&self) -> Money {
        self.nightly_price
    }

    /// カテゴリが一致するか（大文字小文字を区別しない）
    pub fn is_in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.trim().to_lowercase()
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Room[number={}, category={}, price={}, id={}]",
            self.number, self.category, self.nightly_price, self.id
        )
    }
}
