use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{dto, entities, handlers};

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "eStore API",
        version = "1.0.0",
        description = r#"
# eStore back office

Per-school catalog and purchasing: categories with attribute sets, products
with variants and images, vendors, purchase orders and invoice reconciliation.

## Authentication

Mutating requests name an acting `adminId`. The caller's `Authorization`
header is forwarded to the user service, which must confirm that the admin
belongs to the school and holds the admin role.

## Envelope

Every response body has the same shape:

```json
{
  "success": true,
  "data": {},
  "message": "Category created",
  "statusCode": 201,
  "errors": []
}
```

## Uploads

Category and product writes are `multipart/form-data` with the JSON body in
a `payload` part. Stored images are served from `/uploads/...`.
        "#
    ),
    paths(
        handlers::health::health_check,
        handlers::categories::list_categories,
        handlers::categories::get_category,
        handlers::categories::create_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,
        handlers::category_attributes::list_attributes,
        handlers::category_attributes::get_attribute,
        handlers::category_attributes::create_attribute,
        handlers::category_attributes::update_attribute,
        handlers::category_attributes::delete_attribute,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::vendors::list_vendors,
        handlers::vendors::get_vendor,
        handlers::vendors::create_vendor,
        handlers::vendors::update_vendor,
        handlers::vendors::delete_vendor,
        handlers::purchases::list_purchases,
        handlers::purchases::get_purchase,
        handlers::purchases::create_purchase,
        handlers::purchases::cancel_purchase,
        handlers::purchases::delete_purchase,
        handlers::purchases::delete_purchase_item,
        handlers::purchases::list_invoice_entries,
        handlers::purchases::record_invoice_entry,
    ),
    components(
        schemas(
            entities::category::SizeType,
            entities::purchase::PurchaseStatus,
            dto::category::CreateCategoryRequest,
            dto::category::UpdateCategoryRequest,
            dto::category::CategoryResponse,
            dto::category_attribute::CreateCategoryAttributeRequest,
            dto::category_attribute::UpdateCategoryAttributeRequest,
            dto::category_attribute::CategoryAttributeResponse,
            dto::product::VariantInput,
            dto::product::CreateProductRequest,
            dto::product::UpdateProductRequest,
            dto::product::ProductResponse,
            dto::product::ProductVariantResponse,
            dto::product::ProductImageResponse,
            dto::vendor::CreateVendorRequest,
            dto::vendor::UpdateVendorRequest,
            dto::vendor::VendorResponse,
            dto::purchase::PurchaseLineInput,
            dto::purchase::CreatePurchaseRequest,
            dto::purchase::CancelPurchaseRequest,
            dto::purchase::RecordInvoiceEntryRequest,
            dto::purchase::PurchaseResponse,
            dto::purchase::PurchaseItemResponse,
            dto::purchase::InvoiceEntryResponse,
            handlers::health::HealthResponse,
            handlers::health::ComponentStatus,
        )
    ),
    tags(
        (name = "health", description = "Liveness and database reachability"),
        (name = "categories", description = "Product categories and their attribute sets"),
        (name = "category-attributes", description = "Reusable attributes with value lists"),
        (name = "products", description = "Products, variants and images"),
        (name = "vendors", description = "Supplier registry"),
        (name = "purchases", description = "Purchase orders and invoice reconciliation")
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON_PATH, ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("eStore API"));
        for path in [
            "/health",
            "/api/categories/{id}",
            "/api/category-attributes/school/{school_id}",
            "/api/products",
            "/api/vendors/{id}",
            "/api/purchases/{id}/invoice-entries",
            "/api/purchases/{id}/items/{item_id}",
        ] {
            assert!(json.contains(path), "missing {}", path);
        }
    }
}
