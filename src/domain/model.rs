// ドメインモデル（エンティティと値オブジェクト）

mod value_objects;
mod room;
mod booking;
mod catalog;
mod ledger;

pub use value_objects::{
    RoomId, BookingId,
    Money,
    StayPeriod,
    GuestContact,
    BookingStatus,
};

pub use room::Room;
pub use booking::Booking;
pub use catalog::RoomCatalog;
pub use ledger::BookingLedger;
