pub mod categories;
pub mod category_attributes;
pub mod common;
pub mod health;
pub mod products;
pub mod purchases;
pub mod vendors;

use std::sync::Arc;

use crate::{
    auth::AdminValidator,
    db::DbPool,
    services::{
        categories::CategoryService, category_attributes::CategoryAttributeService,
        products::ProductService, purchases::PurchaseService, vendors::VendorService,
    },
    storage::ImageStore,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub category_attributes: Arc<CategoryAttributeService>,
    pub products: Arc<ProductService>,
    pub vendors: Arc<VendorService>,
    pub purchases: Arc<PurchaseService>,
}

impl AppServices {
    /// Wires every service to the shared pool, admin validator and image store.
    pub fn new(db: Arc<DbPool>, admin: Arc<dyn AdminValidator>, images: ImageStore) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(
                db.clone(),
                admin.clone(),
                images.clone(),
            )),
            category_attributes: Arc::new(CategoryAttributeService::new(
                db.clone(),
                admin.clone(),
            )),
            products: Arc::new(ProductService::new(db.clone(), admin.clone(), images)),
            vendors: Arc::new(VendorService::new(db.clone(), admin.clone())),
            purchases: Arc::new(PurchaseService::new(db, admin)),
        }
    }
}
