//! Static product tables for the mocked stores.

use super::{Reward, StatKind};

#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    /// Display-only; nothing is charged.
    pub price_label: &'static str,
    pub reward: Reward,
}

pub static PRODUCTS: [Product; 5] = [
    Product {
        id: "cash_small",
        name: "Pocket Money",
        price_label: "$0.99",
        reward: Reward::Wealth(5_000.0),
    },
    Product {
        id: "cash_large",
        name: "Label Advance",
        price_label: "$4.99",
        reward: Reward::Wealth(30_000.0),
    },
    Product {
        id: "energy_full",
        name: "Energy Drink",
        price_label: "$0.99",
        reward: Reward::Energy(100),
    },
    Product {
        id: "energy_max",
        name: "Home Studio",
        price_label: "$2.99",
        reward: Reward::MaxEnergy(20),
    },
    Product {
        id: "hype_pack",
        name: "PR Campaign",
        price_label: "$1.99",
        reward: Reward::Stat {
            stat: StatKind::Reputation,
            amount: 10.0,
        },
    },
];

pub fn find_product(id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

/// Rewards a finished ad can grant; one is picked at random.
pub static AD_REWARDS: [Reward; 4] = [
    Reward::Wealth(500.0),
    Reward::Wealth(1_000.0),
    Reward::Energy(25),
    Reward::Stat {
        stat: StatKind::FanLoyalty,
        amount: 2.0,
    },
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyOffer {
    pub id: &'static str,
    pub energy: u32,
    /// Price in in-game wealth.
    pub cost: f64,
}

pub static ENERGY_OFFERS: [EnergyOffer; 3] = [
    EnergyOffer {
        id: "coffee",
        energy: 20,
        cost: 200.0,
    },
    EnergyOffer {
        id: "studio_nap",
        energy: 50,
        cost: 450.0,
    },
    EnergyOffer {
        id: "vacation",
        energy: 100,
        cost: 800.0,
    },
];

pub fn find_energy_offer(id: &str) -> Option<&'static EnergyOffer> {
    ENERGY_OFFERS.iter().find(|o| o.id == id)
}
