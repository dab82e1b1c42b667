use hotel_reservation::adapter::driven::{
    ConsoleLogger, JsonBookingRepository, JsonRoomRepository, PaymentSimulator,
};
use hotel_reservation::adapter::driver::Cli;
use hotel_reservation::adapter::AppConfig;
use hotel_reservation::application::service::{BookingApplicationService, CheckoutService};
use hotel_reservation::domain::port::Logger;

use std::sync::Arc;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::new(config.log_level));
    logger.debug(
        "Main",
        &format!("設定を読み込みました: {}", config.data_dir.display()),
        None,
        None,
    );

    // JSONファイルリポジトリを作成
    let room_repository = JsonRoomRepository::new(config.rooms_path());
    let booking_repository = Arc::new(JsonBookingRepository::new(config.bookings_path()));

    // 保存データの読み込みに失敗した場合はここで終了する
    let booking_service = Arc::new(
        BookingApplicationService::initialize(
            &room_repository,
            booking_repository,
            logger.clone(),
        )
        .await?,
    );

    let payment_gateway = Arc::new(PaymentSimulator::new(
        config.payment_success_rate,
        config.payment_seed,
    )?);
    let checkout_service = Arc::new(CheckoutService::new(
        booking_service.clone(),
        payment_gateway,
        logger.clone(),
    ));

    let mut cli = Cli::new(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        booking_service,
        checkout_service,
    );
    cli.run().await?;

    Ok(())
}
