pub mod errors;
pub mod format;
pub mod models;
pub mod providers;
pub mod services;

use rust_decimal::Decimal;
use tracing::debug;

use errors::{CoreError, RejectReason};
use format::format_currency;
use models::{
    chart::ChartData,
    portfolio::PortfolioState,
    price::{PricePoint, PriceStats, Ticker},
    settings::Settings,
    trade::{LedgerAction, TradeIntent},
    transaction::{TradeType, Transaction},
};
use providers::registry::PriceProviderRegistry;
use services::{
    chart_service::ChartService,
    ledger_service::{net_invested, LedgerService},
    price_service::{price_stats, PriceService},
    trade_service::{TradeForm, TradeService},
};

/// Main entry point for the coins-core library.
///
/// Owns one trading session: the portfolio state, the price feed and the
/// latest market data. Dropping it ends the session; nothing is persisted.
///
/// Whenever the current price is known, profit/loss is recomputed after
/// every accepted trade and every price update.
#[must_use]
pub struct CoinsTracker {
    state: PortfolioState,
    settings: Settings,
    ledger: LedgerService,
    price_service: PriceService,
    chart_service: ChartService,
    trade_service: TradeService,
    current_price: Option<Decimal>,
    ticker: Option<Ticker>,
    history: Vec<PricePoint>,
}

impl std::fmt::Debug for CoinsTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinsTracker")
            .field("balance", &self.state.balance)
            .field("btc_amount", &self.state.btc_amount)
            .field("transactions", &self.state.transactions.len())
            .field("current_price", &self.current_price)
            .field("history_points", &self.history.len())
            .finish()
    }
}

impl CoinsTracker {
    /// Start a session with default settings and the Bitstamp feed.
    pub fn create_new() -> Self {
        let settings = Settings::default();
        let registry = PriceProviderRegistry::from_settings(&settings);
        Self::build(settings, registry)
    }

    /// Start a session with custom settings and the Bitstamp feed.
    pub fn with_settings(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let registry = PriceProviderRegistry::from_settings(&settings);
        Ok(Self::build(settings, registry))
    }

    /// Start a session with custom settings and a caller-supplied feed.
    pub fn with_registry(
        settings: Settings,
        registry: PriceProviderRegistry,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self::build(settings, registry))
    }

    // ── Ledger ──────────────────────────────────────────────────────

    /// Apply a trade. Returns `false` (and changes nothing) if it was rejected.
    pub fn execute_trade(&mut self, intent: TradeIntent) -> bool {
        self.try_execute_trade(intent).is_ok()
    }

    /// Apply a trade, reporting why it was rejected.
    pub fn try_execute_trade(&mut self, intent: TradeIntent) -> Result<(), RejectReason> {
        let state = std::mem::take(&mut self.state);
        let outcome = self.ledger.try_execute_trade(state, intent);
        let reason = outcome.reject_reason();
        self.state = outcome.into_state();

        match reason {
            Some(reason) => Err(reason),
            None => {
                self.recompute_profit_loss();
                Ok(())
            }
        }
    }

    /// Buy `amount` BTC at the current market price.
    pub fn buy(&mut self, amount: Decimal) -> Result<(), CoreError> {
        self.trade_at_market(TradeType::Buy, amount)
    }

    /// Sell `amount` BTC at the current market price.
    pub fn sell(&mut self, amount: Decimal) -> Result<(), CoreError> {
        self.trade_at_market(TradeType::Sell, amount)
    }

    /// Recompute profit/loss at `price`. Never fails.
    pub fn update_profit_loss(&mut self, price: Decimal) {
        let state = std::mem::take(&mut self.state);
        self.state = self.ledger.update_profit_loss(state, price);
    }

    /// Apply a ledger action.
    pub fn dispatch(&mut self, action: LedgerAction) {
        match action {
            LedgerAction::ExecuteTrade(intent) => {
                self.execute_trade(intent);
            }
            LedgerAction::UpdateProfitLoss(price) => self.update_profit_loss(price),
        }
    }

    /// Submit the trade modal's BTC amount at the current market price.
    ///
    /// On rejection the form carries the message to display.
    pub fn submit_trade(
        &mut self,
        form: &mut TradeForm,
        trade_type: TradeType,
    ) -> Result<(), CoreError> {
        let price = self.require_current_price()?;
        let state = std::mem::take(&mut self.state);
        let outcome = self.trade_service.submit(form, state, trade_type, price);
        let accepted = outcome.is_accepted();
        self.state = outcome.into_state();
        if accepted {
            self.recompute_profit_loss();
        }
        Ok(())
    }

    /// Pre-check a trade at the current market price without applying it.
    pub fn validate_trade(&self, trade_type: TradeType, amount: Decimal) -> Result<(), CoreError> {
        let price = self.require_current_price()?;
        self.trade_service
            .validate_trade(&self.state, trade_type, amount, price)
            .map_err(CoreError::from)
    }

    /// Throw away all trades and start over with the initial balance.
    pub fn reset(&mut self) {
        self.state = PortfolioState::new(self.settings.initial_balance);
        self.recompute_profit_loss();
    }

    // ── Market data ─────────────────────────────────────────────────

    /// Record a price pushed by a live feed and recompute profit/loss.
    pub fn set_current_price(&mut self, price: Decimal) {
        self.current_price = Some(price);
        self.update_profit_loss(price);
    }

    /// Fetch the latest ticker, make it the current price and recompute
    /// profit/loss. Returns the new price.
    pub async fn refresh_price(&mut self) -> Result<Decimal, CoreError> {
        let ticker = self.price_service.get_ticker(&self.settings.pair).await?;
        let price = ticker.last;
        debug!(pair = %self.settings.pair, %price, "price refreshed");
        self.ticker = Some(ticker);
        self.set_current_price(price);
        Ok(price)
    }

    /// Fetch the historical series. Returns the number of points received.
    pub async fn refresh_history(&mut self) -> Result<usize, CoreError> {
        let history = self
            .price_service
            .get_historical_data(
                &self.settings.pair,
                self.settings.history_step_secs,
                self.settings.history_limit,
            )
            .await?;
        debug!(pair = %self.settings.pair, points = history.len(), "history refreshed");
        self.history = history;
        Ok(self.history.len())
    }

    /// Change of the current price against the start of the history window.
    #[must_use]
    pub fn price_stats(&self) -> PriceStats {
        price_stats(self.current_price, &self.history)
    }

    /// Chart data for the stored history, or `None` if there is not enough of it.
    #[must_use]
    pub fn chart_data(&self) -> Option<ChartData> {
        let prev_close = self.history.first().map(|p| p.price);
        self.chart_service.chart_data(&self.history, prev_close)
    }

    #[must_use]
    pub fn current_price(&self) -> Option<Decimal> {
        self.current_price
    }

    #[must_use]
    pub fn ticker(&self) -> Option<&Ticker> {
        self.ticker.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &[PricePoint] {
        &self.history
    }

    // ── Portfolio accessors ─────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> &PortfolioState {
        &self.state
    }

    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.state.balance
    }

    #[must_use]
    pub fn btc_amount(&self) -> Decimal {
        self.state.btc_amount
    }

    #[must_use]
    pub fn profit_loss(&self) -> Decimal {
        self.state.profit_loss
    }

    /// Net invested capital: buys minus sells, at their trade prices.
    #[must_use]
    pub fn net_invested(&self) -> Decimal {
        net_invested(&self.state.transactions)
    }

    /// Cash plus holdings at the current price, if one is known.
    #[must_use]
    pub fn total_value(&self) -> Option<Decimal> {
        self.current_price.map(|price| {
            self.state
                .balance
                .saturating_add(self.state.btc_amount.saturating_mul(price))
        })
    }

    /// Transactions in execution order (oldest first).
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.state.transactions
    }

    /// Transactions for display (newest first).
    #[must_use]
    pub fn transactions_newest_first(&self) -> Vec<&Transaction> {
        self.state.transactions_newest_first()
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.state.transactions.len()
    }

    #[must_use]
    pub fn get_transaction(&self, id: uuid::Uuid) -> Option<&Transaction> {
        self.state.transactions.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.price_service.get_provider_names()
    }

    // ── Display ─────────────────────────────────────────────────────

    /// `amount` formatted in the session's display currency.
    #[must_use]
    pub fn format_fiat(&self, amount: Decimal) -> String {
        format_currency(amount, self.settings.display_currency.trim())
    }

    /// Cash balance in the display currency, e.g. `"10000 EUR"`.
    #[must_use]
    pub fn format_balance(&self) -> String {
        self.format_fiat(self.state.balance)
    }

    /// Profit/loss in the display currency.
    #[must_use]
    pub fn format_profit_loss(&self) -> String {
        self.format_fiat(self.state.profit_loss)
    }

    /// BTC holdings with eight fraction digits, e.g. `"0,50000000 BTC"`.
    #[must_use]
    pub fn format_btc_amount(&self) -> String {
        format_currency(self.state.btc_amount, "BTC")
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Snapshot of the portfolio state as JSON, for the presentation layer.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.state)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))
    }

    /// All transactions (oldest first) as a JSON array.
    pub fn export_transactions_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.state.transactions)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize transactions: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn trade_at_market(&mut self, trade_type: TradeType, amount: Decimal) -> Result<(), CoreError> {
        let price = self.require_current_price()?;
        self.try_execute_trade(TradeIntent::new(trade_type, amount, price))
            .map_err(CoreError::from)
    }

    fn require_current_price(&self) -> Result<Decimal, CoreError> {
        self.current_price.ok_or_else(|| CoreError::PriceNotAvailable {
            pair: self.settings.pair.clone(),
        })
    }

    fn recompute_profit_loss(&mut self) {
        if let Some(price) = self.current_price {
            self.update_profit_loss(price);
        }
    }

    fn build(settings: Settings, registry: PriceProviderRegistry) -> Self {
        Self {
            state: PortfolioState::new(settings.initial_balance),
            settings,
            ledger: LedgerService::new(),
            price_service: PriceService::new(registry),
            chart_service: ChartService::new(),
            trade_service: TradeService::new(),
            current_price: None,
            ticker: None,
            history: Vec::new(),
        }
    }
}
