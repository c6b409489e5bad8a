use super::config::{GeneratorConfig, ServiceRange};
use super::customer::{CustomerData, PaymentMethod};
use crate::core::error::SimError;
use rand::distributions::{Bernoulli, Distribution, Uniform};
use rand::Rng;
use rand_distr::{Exp, Normal};

/// Uniform draw from `[range.min, range.max)`; a degenerate range yields `min`
pub fn sample_service_time<R: Rng + ?Sized>(rng: &mut R, range: &ServiceRange) -> f64 {
    if range.max > range.min {
        rng.gen_range(range.min..range.max)
    } else {
        range.min
    }
}

/// Distributions the generator draws each new customer from.
///
/// Holds no random state; every draw takes the caller's generator.
#[derive(Debug, Clone)]
pub struct CustomerSampler {
    inter_arrival: Exp<f64>,
    travel: Normal<f64>,
    search: Exp<f64>,
    items: Uniform<u32>,
    online: Bernoulli,
    card: Bernoulli,
}

impl CustomerSampler {
    pub fn new(config: &GeneratorConfig) -> Result<Self, SimError> {
        config.validate()?;
        let invalid = |what: &str| SimError::Configuration(format!("invalid {} distribution", what));

        Ok(Self {
            inter_arrival: Exp::new(1.0 / config.arrival_mean).map_err(|_| invalid("arrival"))?,
            travel: Normal::new(config.travel_mean, config.travel_std_dev)
                .map_err(|_| invalid("travel"))?,
            search: Exp::new(1.0 / config.search_mean).map_err(|_| invalid("search"))?,
            items: Uniform::new_inclusive(config.min_items, config.max_items),
            online: Bernoulli::new(config.online_prob).map_err(|_| invalid("online"))?,
            card: Bernoulli::new(config.card_prob).map_err(|_| invalid("payment"))?,
        })
    }

    /// Time until the next arrival
    pub fn inter_arrival<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.inter_arrival.sample(rng).abs()
    }

    /// Draw a complete customer with the given id
    pub fn customer<R: Rng + ?Sized>(&self, rng: &mut R, customer_id: i64) -> CustomerData {
        let num_items = self.items.sample(rng);
        let is_online_order = self.online.sample(rng);
        let payment = if self.card.sample(rng) {
            PaymentMethod::Card
        } else {
            PaymentMethod::Cash
        };
        let travel_time = self.travel.sample(rng).max(0.0);
        let search_time = self.search.sample(rng).abs();

        CustomerData::new(
            customer_id,
            num_items,
            is_online_order,
            payment,
            travel_time,
            search_time,
        )
    }
}
