//! Seed records compiled into the binary.

use serde_json::Value;

use crate::db::Collection;

/// One bundled fixture set and the collection it seeds.
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    pub collection: Collection,
    /// Raw JSON array.
    pub source: &'static str,
}

impl Fixture {
    /// Parse the bundled JSON into documents.
    pub fn documents(&self) -> Result<Vec<Value>, serde_json::Error> {
        serde_json::from_str(self.source)
    }
}

const USERS: Fixture = Fixture {
    collection: Collection::Users,
    source: include_str!("../../fixtures/users.json"),
};

const PRODUCTS: Fixture = Fixture {
    collection: Collection::Products,
    source: include_str!("../../fixtures/products.json"),
};

const PRODUCT_STATS: Fixture = Fixture {
    collection: Collection::ProductStats,
    source: include_str!("../../fixtures/product_stats.json"),
};

const TRANSACTIONS: Fixture = Fixture {
    collection: Collection::Transactions,
    source: include_str!("../../fixtures/transactions.json"),
};

const OVERALL_STATS: Fixture = Fixture {
    collection: Collection::OverallStats,
    source: include_str!("../../fixtures/overall_stats.json"),
};

const AFFILIATE_STATS: Fixture = Fixture {
    collection: Collection::AffiliateStats,
    source: include_str!("../../fixtures/affiliate_stats.json"),
};

/// The six fixture sets, in seeding order.
pub const FIXTURES: [Fixture; 6] = [
    USERS,
    PRODUCTS,
    PRODUCT_STATS,
    TRANSACTIONS,
    OVERALL_STATS,
    AFFILIATE_STATS,
];

/// Fixture set for `collection`.
pub fn for_collection(collection: Collection) -> Fixture {
    match collection {
        Collection::Users => USERS,
        Collection::Products => PRODUCTS,
        Collection::ProductStats => PRODUCT_STATS,
        Collection::Transactions => TRANSACTIONS,
        Collection::OverallStats => OVERALL_STATS,
        Collection::AffiliateStats => AFFILIATE_STATS,
    }
}
