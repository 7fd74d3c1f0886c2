//! Shopping cart shared by every surface of a client process.
//!
//! [`CartStore`] is a cheap clone handle over one shared cart. The owning
//! application creates it once at startup and hands clones to whoever needs
//! it. Listeners are notified synchronously, in subscription order, after
//! each mutation is committed.

use std::sync::{Arc, Mutex, MutexGuard};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::wire::{PreferenceItem, ProductView};

/// Product fields copied into the cart when it is added
#[derive(Debug, Clone, PartialEq)]
pub struct CartProduct {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub establishment: Option<String>,
}

impl From<&ProductView> for CartProduct {
    fn from(product: &ProductView) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            establishment: product.establishment_name.clone(),
        }
    }
}

impl From<ProductView> for CartProduct {
    fn from(product: ProductView) -> Self {
        Self::from(&product)
    }
}

/// One product's entry in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub establishment: Option<String>,
    pub quantity: u32,
}

impl LineItem {
    /// Quantity times unit price
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl From<&LineItem> for PreferenceItem {
    fn from(item: &LineItem) -> Self {
        Self {
            title: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.price,
        }
    }
}

/// Handle returned by [`CartStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&[LineItem]) + Send + Sync>;

#[derive(Default)]
struct CartState {
    items: Vec<LineItem>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

/// Shared, observable cart.
#[derive(Clone, Default)]
pub struct CartStore {
    state: Arc<Mutex<CartState>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("CartStore")
            .field("items", &state.items)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl CartStore {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        // A panicking listener cannot leave the items half-written: listeners
        // run after the guard is released.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply a mutation, then notify every listener with the new contents.
    fn mutate(&self, apply: impl FnOnce(&mut Vec<LineItem>)) {
        let (snapshot, listeners) = {
            let mut state = self.lock();
            apply(&mut state.items);
            let listeners: Vec<Listener> = state
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            (state.items.clone(), listeners)
        };

        for listener in listeners {
            listener(&snapshot);
        }
    }

    /// Copy of the current line items
    pub fn items(&self) -> Vec<LineItem> {
        self.lock().items.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Add one unit of a product.
    ///
    /// Display fields are captured now; later changes to the product do not
    /// reach items already in the cart.
    pub fn add(&self, product: impl Into<CartProduct>) {
        let product = product.into();
        self.mutate(move |items| {
            if let Some(existing) = items.iter_mut().find(|i| i.id == product.id) {
                existing.quantity = existing.quantity.saturating_add(1);
            } else {
                items.push(LineItem {
                    id: product.id,
                    name: product.name,
                    price: product.price,
                    image: product.image,
                    establishment: product.establishment,
                    quantity: 1,
                });
            }
        });
    }

    /// Drop a product from the cart
    pub fn remove(&self, product_id: Uuid) {
        self.mutate(|items| items.retain(|i| i.id != product_id));
    }

    /// Set the quantity of a product. Zero or negative removes it.
    pub fn set_quantity(&self, product_id: Uuid, quantity: i64) {
        self.mutate(|items| {
            if quantity <= 0 {
                items.retain(|i| i.id != product_id);
                return;
            }
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            for item in items.iter_mut().filter(|i| i.id == product_id) {
                item.quantity = quantity;
            }
        });
    }

    /// Empty the cart
    pub fn clear(&self) {
        self.mutate(Vec::clear);
    }

    /// Sum of quantities
    pub fn total_item_count(&self) -> u64 {
        self.lock()
            .items
            .iter()
            .map(|i| u64::from(i.quantity))
            .sum()
    }

    /// Sum of quantity times unit price
    pub fn total_price(&self) -> Decimal {
        self.lock().items.iter().map(LineItem::subtotal).sum()
    }

    /// Register a listener called with the new contents after every mutation
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&[LineItem]) + Send + Sync + 'static,
    {
        let mut state = self.lock();
        let id = SubscriptionId(state.next_subscription);
        state.next_subscription += 1;
        state.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(sid, _)| *sid != id);
        state.listeners.len() != before
    }
}
