//! Synthetic product feed
//!
//! Stands in for the storefront's REST backend: answers pagination requests
//! after a short delay with deterministic products.

use std::time::Duration;

use tokio::sync::mpsc;
use vitrine_core::{PageCounters, PaginationRequest};

/// Items per desktop page
pub const PAGE_SIZE: usize = 10;

/// Simulated backend latency
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(350);

const MATERIALS: &[&str] = &["Compact", "Rugged", "Wireless", "Braided", "Slim", "Magnetic"];
const PRODUCTS: &[&str] = &[
    "Charger",
    "Phone Case",
    "Screen Guard",
    "Battery Pack",
    "USB-C Cable",
    "Headset",
    "Car Mount",
];

/// One product row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub price_cents: u64,
}

impl Product {
    pub fn price_label(&self) -> String {
        format!("${}.{:02}", self.price_cents / 100, self.price_cents % 100)
    }
}

/// A response to one pagination request
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub items: Vec<Product>,
    pub counters: PageCounters,
}

/// Deterministic catalog of `total` products
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    total: usize,
}

impl Catalog {
    pub fn new(total: usize) -> Self {
        Self { total }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(PAGE_SIZE)
    }

    pub fn product(&self, index: usize) -> Product {
        let material = MATERIALS[index % MATERIALS.len()];
        let product = PRODUCTS[(index / MATERIALS.len()) % PRODUCTS.len()];
        Product {
            sku: format!("SKU-{:04}", index + 1),
            name: format!("{material} {product}"),
            price_cents: 499 + (index as u64 * 137) % 5000,
        }
    }

    /// Items of one zero-based page
    pub fn page(&self, page: usize) -> CatalogPage {
        let page = page.min(self.total_pages().saturating_sub(1));
        let start = (page * PAGE_SIZE).min(self.total);
        let end = (start + PAGE_SIZE).min(self.total);
        let items: Vec<Product> = (start..end).map(|i| self.product(i)).collect();
        CatalogPage {
            counters: PageCounters {
                current_page: page,
                total_pages: self.total_pages(),
                size: items.len(),
                total_elements: self.total,
            },
            items,
        }
    }

    /// The first `size` items, for incremental loading
    pub fn first(&self, size: usize) -> CatalogPage {
        let end = size.min(self.total);
        let items: Vec<Product> = (0..end).map(|i| self.product(i)).collect();
        CatalogPage {
            counters: PageCounters {
                current_page: end.saturating_sub(1) / PAGE_SIZE,
                total_pages: self.total_pages(),
                size: items.len(),
                total_elements: self.total,
            },
            items,
        }
    }

    pub fn respond(&self, request: PaginationRequest) -> CatalogPage {
        match request {
            PaginationRequest::Page(page) => self.page(page),
            PaginationRequest::LoadMore { size } => self.first(size),
        }
    }
}

/// Serve requests in the background until either side hangs up
pub fn spawn(
    catalog: Catalog,
    mut requests: mpsc::UnboundedReceiver<PaginationRequest>,
    latency: Duration,
) -> mpsc::UnboundedReceiver<CatalogPage> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            tokio::time::sleep(latency).await;
            tracing::debug!(?request, "Catalog responding");
            if tx.send(catalog.respond(request)).is_err() {
                break;
            }
        }
    });
    rx
}
