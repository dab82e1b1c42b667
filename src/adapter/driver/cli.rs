use crate::application::service::{BookingApplicationService, CheckoutService};
use crate::application::ApplicationError;
use crate::domain::model::{BookingId, Room};
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

const DATE_FORMAT: &str = "%Y-%m-%d";

const MENU: &str = "\nMenu:\n1) Search rooms\n2) Book a room\n3) Cancel booking\n4) View my bookings\n5) List room categories\n6) Exit\n";

/// 対話画面のエラー
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 入力が終端に達した
    #[error("end of input")]
    EndOfInput,

    #[error("{0}")]
    Application(#[from] ApplicationError),
}

/// コンソールメニュー
/// 1行ずつ読み取ってアプリケーションサービスを呼び出す
pub struct Cli<R, W> {
    lines: Lines<R>,
    output: W,
    booking_service: Arc<BookingApplicationService>,
    checkout_service: Arc<CheckoutService>,
}

impl<R, W> Cli<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        input: R,
        output: W,
        booking_service: Arc<BookingApplicationService>,
        checkout_service: Arc<CheckoutService>,
    ) -> Self {
        Self {
            lines: input.lines(),
            output,
            booking_service,
            checkout_service,
        }
    }

    /// 出力先を取り出す
    pub fn into_output(self) -> W {
        self.output
    }

    /// メニューを繰り返し表示する
    /// 「6」または入力の終端で正常終了する
    /// 各操作のエラーは表示してメニューに戻る
    pub async fn run(&mut self) -> Result<(), CliError> {
        self.write("Welcome to the Hotel Reservation System\n").await?;

        loop {
            self.write(MENU).await?;
            let choice = match self.prompt("Select an option: ").await {
                Ok(choice) => choice,
                Err(CliError::EndOfInput) => return self.goodbye().await,
                Err(e) => return Err(e),
            };

            let result = match choice.as_str() {
                "1" => self.search().await,
                "2" => self.book().await,
                "3" => self.cancel().await,
                "4" => self.view_bookings().await,
                "5" => self.list_categories().await,
                "6" => return self.goodbye().await,
                _ => self.write("Invalid option\n").await,
            };

            match result {
                Ok(()) => {}
                Err(CliError::EndOfInput) => return self.goodbye().await,
                Err(CliError::Application(e)) => self.write(&format!("Error: {}\n", e)).await?,
                Err(e) => return Err(e),
            }
        }
    }

    async fn goodbye(&mut self) -> Result<(), CliError> {
        self.write("Goodbye!\n").await
    }

    async fn list_categories(&mut self) -> Result<(), CliError> {
        let categories = self.booking_service.list_categories();
        self.write("Available categories:\n").await?;
        for category in categories {
            self.write(&format!("- {}\n", category)).await?;
        }
        Ok(())
    }

    async fn search(&mut self) -> Result<(), CliError> {
        let (start, end, rooms) = self.find_rooms().await?;
        if rooms.is_empty() {
            return self
                .write("No rooms available for the selected criteria.\n")
                .await;
        }

        self.write(&format!("Available rooms ({} -> {}):\n", start, end))
            .await?;
        for (i, room) in rooms.iter().enumerate() {
            self.write(&format!(
                "{}) Number: {}, Category: {}, Price/night: {}, RoomID: {}\n",
                i + 1,
                room.number(),
                room.category(),
                room.nightly_price(),
                room.id()
            ))
            .await?;
        }
        Ok(())
    }

    async fn book(&mut self) -> Result<(), CliError> {
        let (start, end, rooms) = self.find_rooms().await?;
        if rooms.is_empty() {
            return self
                .write("No rooms available for those dates/category.\n")
                .await;
        }

        self.write("Select a room by number:\n").await?;
        for (i, room) in rooms.iter().enumerate() {
            self.write(&format!(
                "{}) {} - {} - {}\n",
                i + 1,
                room.number(),
                room.category(),
                room.nightly_price()
            ))
            .await?;
        }
        let index = self.read_choice("Choice: ", 1, rooms.len()).await? - 1;
        let room_id = rooms[index].id();

        let name = self.prompt("Guest name: ").await?;
        let email = self.prompt("Guest email: ").await?;

        let total = self.booking_service.quote(room_id, start, end)?;
        self.write(&format!("Total price: {}\n", total)).await?;

        let proceed = self.prompt("Proceed to payment? (yes/no): ").await?;
        if !matches!(proceed.to_lowercase().as_str(), "yes" | "y") {
            return self.write("Booking cancelled by user.\n").await;
        }

        match self
            .checkout_service
            .checkout(room_id, &name, &email, start, end)
            .await
        {
            Ok(receipt) => {
                self.write(&format!(
                    "{} (txn: {})\n",
                    receipt.payment.message, receipt.payment.transaction_id
                ))
                .await?;
                self.write(&format!("Booking successful! ID: {}\n", receipt.booking.id()))
                    .await
            }
            Err(ApplicationError::PaymentDeclined {
                transaction_id,
                message,
            }) => {
                self.write(&format!("{} (txn: {})\n", message, transaction_id))
                    .await?;
                self.write("Payment failed. Booking not completed.\n").await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn cancel(&mut self) -> Result<(), CliError> {
        let input = self.prompt("Enter booking ID to cancel: ").await?;
        // 解釈できないIDは存在しない予約と同じ扱い
        let cancelled = match BookingId::from_string(&input) {
            Ok(booking_id) => self.booking_service.cancel_booking(booking_id).await?,
            Err(_) => false,
        };

        if cancelled {
            self.write("Booking cancelled.\n").await
        } else {
            self.write("Booking not found.\n").await
        }
    }

    async fn view_bookings(&mut self) -> Result<(), CliError> {
        let email = self.prompt("Enter your email to view bookings: ").await?;
        let bookings = self.booking_service.find_bookings_by_email(&email).await;
        if bookings.is_empty() {
            return self
                .write(&format!("No bookings found for {}\n", email))
                .await;
        }

        self.write("Bookings:\n").await?;
        for booking in bookings {
            self.write(&format!("{}\n", booking)).await?;
        }
        Ok(())
    }

    /// 日付とカテゴリを読み取り、空いている客室を検索する
    async fn find_rooms(&mut self) -> Result<(NaiveDate, NaiveDate, Vec<Room>), CliError> {
        let start = self.read_date("Enter check-in date (YYYY-MM-DD): ").await?;
        let end = self.read_date("Enter check-out date (YYYY-MM-DD): ").await?;
        let category = self.prompt("Category (leave blank for any): ").await?;
        let category = Some(category.as_str()).filter(|c| !c.is_empty());

        let rooms = self
            .booking_service
            .search_available(start, end, category)
            .await?;
        Ok((start, end, rooms))
    }

    async fn read_date(&mut self, prompt: &str) -> Result<NaiveDate, CliError> {
        loop {
            let line = self.prompt(prompt).await?;
            match NaiveDate::parse_from_str(&line, DATE_FORMAT) {
                Ok(date) => return Ok(date),
                Err(_) => self.write("Invalid date format. Use YYYY-MM-DD.\n").await?,
            }
        }
    }

    async fn read_choice(&mut self, prompt: &str, min: usize, max: usize) -> Result<usize, CliError> {
        loop {
            let line = self.prompt(prompt).await?;
            match line.parse::<usize>() {
                Ok(value) if (min..=max).contains(&value) => return Ok(value),
                _ => {
                    self.write(&format!("Enter a number between {} and {}.\n", min, max))
                        .await?
                }
            }
        }
    }

    /// プロンプトを表示して1行読み取る（前後の空白は除去）
    async fn prompt(&mut self, prompt: &str) -> Result<String, CliError> {
        self.write(prompt).await?;
        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(CliError::EndOfInput),
        }
    }

    async fn write(&mut self, text: &str) -> Result<(), CliError> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }
}
