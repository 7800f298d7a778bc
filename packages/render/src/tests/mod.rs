/* packages/render/src/tests/mod.rs */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use super::*;


static INIT: Once = Once::new();

fn init_tracing() {
  INIT.call_once(|| {
    let _ = tracing_subscriber::fmt()
      .with_test_writer()
      .with_max_level(tracing::Level::DEBUG)
      .with_target(false)
      .try_init();
  });
}

/// Memory source that counts every fetch reaching it.
#[derive(Default)]
struct CountingSource {
  inner: MemorySource,
  fetches: AtomicUsize,
}

impl CountingSource {
  fn with(self, key: &str, content: &str) -> Self {
    self.inner.insert(key, content);
    self
  }

  fn fetches(&self) -> usize {
    self.fetches.load(Ordering::SeqCst)
  }
}

impl ResourceSource for CountingSource {
  fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<String, LoadError>> {
    self.fetches.fetch_add(1, Ordering::SeqCst);
    self.inner.fetch(key)
  }
}

/// Products list and user profile, the two sections of the demo page.
fn shop_source() -> MemorySource {
  MemorySource::new()
    .with(
      "templates/product-card.asth",
      concat!(
        r#"<div class="card" ast-for="(p, i) in products">"#,
        r#"<h3>{{i}}. {{p.name}}</h3><span ast-if="p.stock > 0">in stock</span></div>"#,
      ),
    )
    .with(
      "data/products.json",
      r#"{"products": [{"name": "Lamp", "stock": 2}, {"name": "Desk", "stock": 0}]}"#,
    )
    .with(
      "templates/user-info.asth",
      r#"<section><p>{{user.name}}</p><em ast-if="user.admin">admin</em></section>"#,
    )
    .with("data/user.json", r#"{"user": {"name": "Ada", "admin": false}}"#)
}

const PRODUCTS_HTML: &str = concat!(
  r#"<div class="card"><h3>0. Lamp</h3><span>in stock</span></div>"#,
  r#"<div class="card"><h3>1. Desk</h3></div>"#,
);
const USER_HTML: &str = "<section><p>Ada</p></section>";
