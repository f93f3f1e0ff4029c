//! Execution-to-trade mapping.

use tracing::error;

use crate::Result;
use crate::adapters::{adapt_own_fills, adapt_public_trades};
use crate::error::CambistError;
use crate::models::message::Execution;
use crate::models::product::Product;
use crate::models::trade::Trade;

/// Converts executions into trades.
///
/// Both methods take slices and return collections; the mapper requires
/// exactly one trade back for each single-execution call.
pub trait TradeAdapter {
    fn public_trades(&self, executions: &[Execution], product: &Product) -> Vec<Trade>;

    fn own_fills(&self, executions: &[Execution]) -> Vec<Trade>;
}

/// Adapter backed by [`adapt_public_trades`] and [`adapt_own_fills`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VenueTradeAdapter;

impl TradeAdapter for VenueTradeAdapter {
    fn public_trades(&self, executions: &[Execution], product: &Product) -> Vec<Trade> {
        adapt_public_trades(executions, product)
    }

    fn own_fills(&self, executions: &[Execution]) -> Vec<Trade> {
        adapt_own_fills(executions)
    }
}

/// Maps each execution for one product to exactly one trade.
#[derive(Debug, Clone)]
pub struct TradeMapper<A> {
    product: Product,
    adapter: A,
}

impl<A: TradeAdapter> TradeMapper<A> {
    pub fn new(product: Product, adapter: A) -> Self {
        Self { product, adapter }
    }

    /// Classifies `execution` as an own fill (non-empty account id) or a
    /// public trade and maps it through the matching adapter.
    ///
    /// # Errors
    ///
    /// Returns [`CambistError::EmptyAdaptation`] if the adapter yields no
    /// trade. That is a contract breach between decoder and adapter, not
    /// bad data, and ends the stream.
    pub fn map(&self, execution: Execution) -> Result<Trade> {
        let trade_id = execution.trade_id;
        let own = execution.is_own();
        let batch = [execution];

        let trades = if own {
            self.adapter.own_fills(&batch)
        } else {
            self.adapter.public_trades(&batch, &self.product)
        };

        trades.into_iter().next().ok_or_else(|| {
            error!(
                product = %self.product,
                trade_id,
                own_fill = own,
                "Trade adapter returned no trade for a single execution"
            );
            CambistError::EmptyAdaptation { trade_id }
        })
    }
}
