use crate::core::error::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a customer pays; drives the payment service time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Card or tap
    Card,
    Cash,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Card
    }
}

impl PaymentMethod {
    /// Parse a record token: `card`/`1` or `cash`/`0`. Anything else is `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "card" | "tap" | "1" => Some(PaymentMethod::Card),
            "cash" | "0" => Some(PaymentMethod::Cash),
            _ => None,
        }
    }

    pub fn is_card(self) -> bool {
        self == PaymentMethod::Card
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Cash => write!(f, "cash"),
        }
    }
}

/// Immutable snapshot of one customer, copied by value through the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerData {
    pub customer_id: i64,
    pub num_items: u32,
    /// Online orders take the packing/curbside path instead of the lanes
    pub is_online_order: bool,
    pub payment: PaymentMethod,
    /// Walk-to-exit time, or time until an online customer arrives to collect
    pub travel_time: f64,
    /// Packing duration override; non-positive means "derive from item count"
    pub search_time: f64,
}

impl Default for CustomerData {
    fn default() -> Self {
        Self {
            customer_id: -1,
            num_items: 0,
            is_online_order: false,
            payment: PaymentMethod::Card,
            travel_time: 0.0,
            search_time: 0.0,
        }
    }
}

impl CustomerData {
    /// Build a customer; negative durations are clamped to zero
    pub fn new(
        customer_id: i64,
        num_items: u32,
        is_online_order: bool,
        payment: PaymentMethod,
        travel_time: f64,
        search_time: f64,
    ) -> Self {
        Self {
            customer_id,
            num_items,
            is_online_order,
            payment,
            travel_time: travel_time.max(0.0),
            search_time: search_time.max(0.0),
        }
    }

    /// Walk-in customer paying by card
    pub fn walk_in(customer_id: i64, num_items: u32, travel_time: f64) -> Self {
        Self::new(customer_id, num_items, false, PaymentMethod::Card, travel_time, 0.0)
    }

    /// Online order collected at the curb after `travel_time`
    pub fn online(customer_id: i64, num_items: u32, travel_time: f64, search_time: f64) -> Self {
        Self::new(customer_id, num_items, true, PaymentMethod::Card, travel_time, search_time)
    }

    /// Parse the six whitespace-separated record fields
    /// `customerId numItems isOnline paymentType travelTime searchTime`.
    ///
    /// An unparseable payment token falls back to the default method instead
    /// of rejecting the record. Other malformed fields are reported against
    /// `line`.
    pub fn from_fields(fields: &[&str], line: usize) -> Result<Self, SimError> {
        let err = |reason: String| SimError::Parse { line, reason };
        if fields.len() != 6 {
            return Err(err(format!("expected 6 fields, found {}", fields.len())));
        }

        let customer_id = fields[0]
            .parse::<i64>()
            .map_err(|e| err(format!("customer id '{}': {}", fields[0], e)))?;
        let num_items = fields[1]
            .parse::<u32>()
            .map_err(|e| err(format!("item count '{}': {}", fields[1], e)))?;
        let is_online_order = match fields[2] {
            "0" | "false" => false,
            "1" | "true" => true,
            other => return Err(err(format!("online flag '{}' is not 0/1", other))),
        };
        let payment = PaymentMethod::from_token(fields[3]).unwrap_or_default();
        let travel_time = fields[4]
            .parse::<f64>()
            .map_err(|e| err(format!("travel time '{}': {}", fields[4], e)))?;
        let search_time = fields[5]
            .parse::<f64>()
            .map_err(|e| err(format!("search time '{}': {}", fields[5], e)))?;

        Ok(Self::new(
            customer_id,
            num_items,
            is_online_order,
            payment,
            travel_time,
            search_time,
        ))
    }

    /// Encode back into the record format
    pub fn to_record(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.customer_id,
            self.num_items,
            u8::from(self.is_online_order),
            self.payment,
            self.travel_time,
            self.search_time
        )
    }
}

impl FromStr for CustomerData {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        Self::from_fields(&fields, 1)
    }
}

impl fmt::Display for CustomerData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id:{},items:{},online:{},payType:{},travel:{},search:{}}}",
            self.customer_id,
            self.num_items,
            u8::from(self.is_online_order),
            self.payment,
            self.travel_time,
            self.search_time
        )
    }
}
