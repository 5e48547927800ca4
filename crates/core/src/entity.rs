//! Entity trait: records with a stable identity.

use core::fmt::Display;

/// A record addressed by its own id.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + Display;

    /// Short lowercase noun used in messages ("item", "catalog").
    const KIND: &'static str;

    fn id(&self) -> &Self::Id;

    /// `"<kind> <id>"`, e.g. `item 42`.
    fn describe(&self) -> String {
        format!("{} {}", Self::KIND, self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemId;

    struct Widget(ItemId);

    impl Entity for Widget {
        type Id = ItemId;
        const KIND: &'static str = "widget";

        fn id(&self) -> &ItemId {
            &self.0
        }
    }

    #[test]
    fn describe_names_kind_and_id() {
        assert_eq!(Widget(ItemId::new(42)).describe(), "widget 42");
    }
}
