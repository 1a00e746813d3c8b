// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers in this common test module

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use cartsync::{
  CartError, CartLine, CartResult, CartStore, IdentityProvider, ProductSnapshot, VariantSnapshot,
};

// --- Tracing setup (initialized once across the test binary) ---

pub fn setup_tracing() {
  use once_cell::sync::Lazy;
  static INIT: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
      .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
      .with_test_writer()
      .try_init();
  });
  Lazy::force(&INIT);
}

// --- Fixture data ---

pub fn product(name: &str, base_price_cents: i32, stock_quantity: i32) -> ProductSnapshot {
  ProductSnapshot {
    id: Uuid::new_v4(),
    name: name.to_string(),
    base_price_cents,
    stock_quantity,
    images: vec![format!("{name}.jpg")],
  }
}

pub fn variant(name: &str, price_modifier_cents: i32, stock_quantity: i32) -> VariantSnapshot {
  VariantSnapshot {
    id: Uuid::new_v4(),
    name: name.to_string(),
    price_modifier_cents,
    stock_quantity,
    images: Vec::new(),
  }
}

// --- Identity provider returning a fixed answer ---

pub struct FixedIdentity(pub Option<Uuid>);

#[async_trait]
impl IdentityProvider for FixedIdentity {
  async fn current_user(&self) -> Option<Uuid> {
    self.0
  }
}

pub fn signed_in(user_id: Uuid) -> Arc<FixedIdentity> {
  Arc::new(FixedIdentity(Some(user_id)))
}

pub fn signed_out() -> Arc<FixedIdentity> {
  Arc::new(FixedIdentity(None))
}

// --- In-memory CartStore with failure injection ---

struct StoredLine {
  user_id: Uuid,
  line: CartLine,
}

/// A `CartStore` holding everything in memory, with counters to fail the
/// next N reads or writes (simulating transport failures) and helpers to
/// mutate rows out of band (simulating another session on the same cart).
#[derive(Default)]
pub struct MemoryStore {
  products: Mutex<Vec<ProductSnapshot>>,
  variants: Mutex<Vec<VariantSnapshot>>,
  lines: Mutex<Vec<StoredLine>>,
  fail_fetches: AtomicU32,
  fail_mutations: AtomicU32,
  pub fetch_calls: AtomicU32,
}

impl MemoryStore {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn add_product(&self, p: &ProductSnapshot) {
    self.products.lock().push(p.clone());
  }

  pub fn add_variant(&self, v: &VariantSnapshot) {
    self.variants.lock().push(v.clone());
  }

  /// The next `n` fetch_lines calls fail with `CartError::Fetch`.
  pub fn fail_next_fetches(&self, n: u32) {
    self.fail_fetches.store(n, Ordering::SeqCst);
  }

  /// The next `n` mutating calls fail with `CartError::Mutation`.
  pub fn fail_next_mutations(&self, n: u32) {
    self.fail_mutations.store(n, Ordering::SeqCst);
  }

  /// Inserts a line directly, bypassing the store API: the "another tab
  /// wrote to the same cart" case. Returns the new line id.
  pub fn raw_insert(&self, user_id: Uuid, product: &ProductSnapshot, quantity: i32) -> Uuid {
    let line = CartLine {
      id: Uuid::new_v4(),
      product: product.clone(),
      variant: None,
      quantity,
    };
    let id = line.id;
    self.lines.lock().push(StoredLine { user_id, line });
    id
  }

  /// Deletes a line directly, bypassing the store API.
  pub fn raw_delete(&self, line_id: Uuid) {
    self.lines.lock().retain(|s| s.line.id != line_id);
  }

  pub fn line_count(&self) -> usize {
    self.lines.lock().len()
  }

  fn take_failure(counter: &AtomicU32) -> bool {
    counter
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
      .is_ok()
  }

  fn check_mutation_failure(&self) -> CartResult<()> {
    if Self::take_failure(&self.fail_mutations) {
      return Err(CartError::mutation(anyhow::anyhow!("injected transport failure")));
    }
    Ok(())
  }
}

#[async_trait]
impl CartStore for MemoryStore {
  async fn fetch_lines(&self, user_id: Uuid) -> CartResult<Vec<CartLine>> {
    self.fetch_calls.fetch_add(1, Ordering::SeqCst);
    if Self::take_failure(&self.fail_fetches) {
      return Err(CartError::fetch(anyhow::anyhow!("injected transport failure")));
    }
    Ok(
      self
        .lines
        .lock()
        .iter()
        .filter(|s| s.user_id == user_id)
        .map(|s| s.line.clone())
        .collect(),
    )
  }

  async fn upsert_line(
    &self,
    user_id: Uuid,
    product_id: Uuid,
    variant_id: Option<Uuid>,
    quantity: i32,
  ) -> CartResult<CartLine> {
    self.check_mutation_failure()?;

    let product = self
      .products
      .lock()
      .iter()
      .find(|p| p.id == product_id)
      .cloned()
      .ok_or_else(|| CartError::NotFound(format!("Product {product_id} not found.")))?;
    let variant = match variant_id {
      None => None,
      Some(vid) => Some(
        self
          .variants
          .lock()
          .iter()
          .find(|v| v.id == vid)
          .cloned()
          .ok_or_else(|| CartError::NotFound(format!("Variant {vid} not found.")))?,
      ),
    };

    let mut lines = self.lines.lock();
    if let Some(stored) = lines.iter_mut().find(|s| {
      s.user_id == user_id
        && s.line.product.id == product_id
        && s.line.variant.as_ref().map(|v| v.id) == variant_id
    }) {
      stored.line.quantity += quantity;
      return Ok(stored.line.clone());
    }

    let line = CartLine {
      id: Uuid::new_v4(),
      product,
      variant,
      quantity,
    };
    lines.push(StoredLine {
      user_id,
      line: line.clone(),
    });
    Ok(line)
  }

  async fn set_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32) -> CartResult<CartLine> {
    self.check_mutation_failure()?;

    let mut lines = self.lines.lock();
    let stored = lines
      .iter_mut()
      .find(|s| s.user_id == user_id && s.line.id == line_id)
      .ok_or_else(|| CartError::NotFound(format!("Cart line {line_id} not found.")))?;
    stored.line.quantity = quantity;
    Ok(stored.line.clone())
  }

  async fn delete_line(&self, user_id: Uuid, line_id: Uuid) -> CartResult<()> {
    self.check_mutation_failure()?;

    let mut lines = self.lines.lock();
    let before = lines.len();
    lines.retain(|s| !(s.user_id == user_id && s.line.id == line_id));
    if lines.len() == before {
      return Err(CartError::NotFound(format!("Cart line {line_id} not found.")));
    }
    Ok(())
  }

  async fn clear(&self, user_id: Uuid) -> CartResult<()> {
    self.check_mutation_failure()?;
    self.lines.lock().retain(|s| s.user_id != user_id);
    Ok(())
  }
}
