use crate::domain::error::DomainError;
use crate::domain::model::{Money, Room, RoomId};
use rust_decimal::Decimal;

use std::collections::{BTreeSet, HashSet};

/// 客室カタログ
/// 起動時に一度だけ構築され、以降は読み取り専用
#[derive(Debug, Clone, PartialEq)]
pub struct RoomCatalog {
    rooms: Vec<Room>,
}

impl RoomCatalog {
    /// 客室のリストからカタログを作成
    /// 客室IDの重複はエラー
    pub fn new(rooms: Vec<Room>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for room in &rooms {
            if !seen.insert(room.id()) {
                return Err(DomainError::InvalidValue(format!(
                    "客室IDが重複しています: {}",
                    room.id()
                )));
            }
        }
        Ok(Self { rooms })
    }

    /// 初期データとして投入する5室
    /// Standard 2室、Deluxe 2室、Suite 1室
    pub fn default_rooms() -> Vec<Room> {
        vec![
            Room::new(RoomId::new(), "101", "Standard", Self::price(150_000)),
            Room::new(RoomId::new(), "102", "Standard", Self::price(160_000)),
            Room::new(RoomId::new(), "201", "Deluxe", Self::price(180_000)),
            Room::new(RoomId::new(), "202", "Deluxe", Self::price(185_000)),
            Room::new(RoomId::new(), "301", "Suite", Self::price(1_500_000)),
        ]
    }

    // 小数点以下2桁の固定小数で料金を作成
    fn price(minor_units: i64) -> Money {
        Money::new(Decimal::new(minor_units, 2)).unwrap_or_else(|_| Money::zero())
    }

    /// 重複を除いたカテゴリ名を昇順で取得
    pub fn list_categories(&self) -> Vec<String> {
        self.rooms
            .iter()
            .map(|room| room.category().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 客室IDで客室を検索
    pub fn get_room(&self, room_id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id() == room_id)
    }

    /// すべての客室を登録順で取得
    pub fn all_rooms(&self) -> &[Room] {
        &self.rooms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rooms() {
        let rooms = RoomCatalog::default_rooms();
        assert_eq!(rooms.len(), 5);
        assert_eq!(rooms.iter().filter(|r| r.category() == "Standard").count(), 2);
        assert_eq!(rooms.iter().filter(|r| r.category() == "Deluxe").count(), 2);
        assert_eq!(rooms.iter().filter(|r| r.category() == "Suite").count(), 1);
        assert_eq!(rooms[0].nightly_price().to_string(), "1500.00");
        assert_eq!(rooms[4].nightly_price().to_string(), "15000.00");
    }

    #[test]
    fn test_list_categories_sorted_and_distinct() {
        let catalog = RoomCatalog::new(RoomCatalog::default_rooms()).unwrap();
        assert_eq!(
            catalog.list_categories(),
            vec!["Deluxe".to_string(), "Standard".to_string(), "Suite".to_string()]
        );
    }

    #[test]
    fn test_get_room() {
        let rooms = RoomCatalog::default_rooms();
        let id = rooms[2].id();
        let catalog = RoomCatalog::new(rooms).unwrap();

        assert_eq!(catalog.get_room(id).map(|r| r.number()), Some("201"));
        assert!(catalog.get_room(RoomId::new()).is_none());
    }

    #[test]
    fn test_duplicate_room_id_rejected() {
        let rooms = RoomCatalog::default_rooms();
        let duplicate = rooms[0].clone();
        let mut all = rooms;
        all.push(duplicate);

        assert!(RoomCatalog::new(all).is_err());
    }
}
