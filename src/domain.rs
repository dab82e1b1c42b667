// ドメイン層
// 予約台帳のビジネスルールと外部依存のポートを定義

pub mod error;
pub mod event;
pub mod model;
pub mod port;
pub mod serialization;
pub mod service;
