pub mod category;
pub mod category_attribute;
pub mod category_category_attribute;
pub mod product;
pub mod product_image;
pub mod product_variant;
pub mod purchase;
pub mod purchase_invoice_entry;
pub mod purchase_item;
pub mod vendor;
