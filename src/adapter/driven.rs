// 駆動される側アダプター（リポジトリ実装など）

mod booking_repository;
mod console_logger;
mod json_file;
mod payment_simulator;
mod room_repository;

pub use booking_repository::JsonBookingRepository;
pub use console_logger::{ConsoleLogger, LogEntry};
pub use json_file::JsonFile;
pub use payment_simulator::PaymentSimulator;
pub use room_repository::JsonRoomRepository;
