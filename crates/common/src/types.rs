use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directional decision emitted by a strategy for a given price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    #[default]
    Hold,
    Buy,
    Sell,
}

impl Signal {
    /// The order side this signal calls for. `Hold` is not actionable.
    pub fn side(&self) -> Option<OrderSide> {
        match self {
            Signal::Hold => None,
            Signal::Buy => Some(OrderSide::Buy),
            Signal::Sell => Some(OrderSide::Sell),
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.side().is_some()
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Hold => write!(f, "hold"),
            Signal::Buy => write!(f, "buy"),
            Signal::Sell => write!(f, "sell"),
        }
    }
}

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Record of one trading decision.
///
/// Built by the trading loop only for actionable signals, then handed to the
/// ledger by value. There are no mutators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    id: String,
    strategy_name: String,
    side: OrderSide,
    quantity: f64,
    created_at: DateTime<Utc>,
}

impl Trade {
    /// Whether `quantity` can be traded: finite and strictly positive.
    pub fn is_valid_quantity(quantity: f64) -> bool {
        quantity.is_finite() && quantity > 0.0
    }

    pub fn new(strategy_name: impl Into<String>, side: OrderSide, quantity: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            strategy_name: strategy_name.into(),
            side,
            quantity,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Cash amount this trade moves at the given price.
    pub fn notional(&self, price: f64) -> f64 {
        self.quantity * price
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} units using {} at {}",
            self.side,
            self.quantity,
            self.strategy_name,
            self.created_at.to_rfc3339()
        )
    }
}

/// Confirmation of a trade booked against the paper ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub trade: Trade,
    pub price: f64,
    /// `quantity × price` moved in or out of the balance.
    pub notional: f64,
    pub balance_after: f64,
}

/// Reason the ledger refused a trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectionReason {
    InsufficientFunds { required: f64, available: f64 },
    /// Quantity or price was zero, negative or not a finite number.
    InvalidAmount { quantity: f64, price: f64 },
    Other(String),
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::InsufficientFunds {
                required,
                available,
            } => write!(
                f,
                "insufficient funds: need {required:.2}, have {available:.2}"
            ),
            RejectionReason::InvalidAmount { quantity, price } => {
                write!(f, "invalid amount: quantity {quantity} at price {price}")
            }
            RejectionReason::Other(s) => write!(f, "{s}"),
        }
    }
}
