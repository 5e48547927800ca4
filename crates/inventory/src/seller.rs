use serde::{Deserialize, Serialize};

use storefront_core::{Entity, SellerId};

/// A seller owning items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: SellerId,
    pub name: String,
    #[serde(default)]
    pub deals: i64,
}

impl Entity for Seller {
    type Id = SellerId;
    const KIND: &'static str = "seller";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
