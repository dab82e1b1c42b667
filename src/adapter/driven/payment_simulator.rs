use crate::domain::error::DomainError;
use crate::domain::model::Money;
use crate::domain::port::{PaymentGateway, PaymentResult};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use uuid::Uuid;

/// 決済シミュレーター
/// 設定された確率で請求を承認する
/// シードを指定すると結果の並びが再現できる
pub struct PaymentSimulator {
    success_rate: f64,
    rng: Mutex<StdRng>,
}

impl PaymentSimulator {
    /// 新しい決済シミュレーターを作成
    ///
    /// # Arguments
    /// * `success_rate` - 承認される確率（0.0〜1.0）
    /// * `seed` - 乱数のシード。`None` の場合はOSの乱数源から初期化する
    pub fn new(success_rate: f64, seed: Option<u64>) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&success_rate) {
            return Err(DomainError::InvalidValue(format!(
                "success rate must be between 0 and 1: {}",
                success_rate
            )));
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            success_rate,
            rng: Mutex::new(rng),
        })
    }

    fn roll(&self) -> bool {
        // ロックが汚染されていても乱数生成器の状態は使える
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen::<f64>() < self.success_rate
    }
}

#[async_trait]
impl PaymentGateway for PaymentSimulator {
    async fn charge(&self, amount: Money) -> PaymentResult {
        let success = self.roll();
        let message = if success {
            "Payment successful"
        } else {
            "Payment failed (simulated)"
        };

        PaymentResult {
            success,
            transaction_id: Uuid::new_v4().to_string(),
            amount,
            message: message.to_string(),
        }
    }
}
