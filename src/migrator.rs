use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_catalog_tables::Migration),
            Box::new(m20240601_000002_create_product_tables::Migration),
            Box::new(m20240601_000003_create_vendors_table::Migration),
            Box::new(m20240601_000004_create_purchase_tables::Migration),
        ]
    }
}

mod m20240601_000001_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Categories::SchoolId).integer().not_null())
                        .col(ColumnDef::new(Categories::AdminId).uuid().not_null())
                        .col(ColumnDef::new(Categories::Name).string_len(150).not_null())
                        .col(
                            ColumnDef::new(Categories::HasSizeVariants)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Categories::SizeType)
                                .string_len(20)
                                .not_null()
                                .default("None"),
                        )
                        .col(ColumnDef::new(Categories::AvailableSizes).string().null())
                        .col(ColumnDef::new(Categories::ImageUrl).string().null())
                        .col(
                            ColumnDef::new(Categories::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Categories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("ux_categories_school_name")
                        .table(Categories::Table)
                        .col(Categories::SchoolId)
                        .col(Categories::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CategoryAttributes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CategoryAttributes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(CategoryAttributes::SchoolId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CategoryAttributes::AdminId).uuid().not_null())
                        .col(
                            ColumnDef::new(CategoryAttributes::Name)
                                .string_len(150)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CategoryAttributes::Values)
                                .text()
                                .not_null()
                                .default("[]"),
                        )
                        .col(
                            ColumnDef::new(CategoryAttributes::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(CategoryAttributes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("ux_category_attributes_school_name")
                        .table(CategoryAttributes::Table)
                        .col(CategoryAttributes::SchoolId)
                        .col(CategoryAttributes::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CategoryCategoryAttributes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CategoryCategoryAttributes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(CategoryCategoryAttributes::CategoryId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CategoryCategoryAttributes::CategoryAttributeId)
                                .integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cca_category")
                                .from(
                                    CategoryCategoryAttributes::Table,
                                    CategoryCategoryAttributes::CategoryId,
                                )
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cca_attribute")
                                .from(
                                    CategoryCategoryAttributes::Table,
                                    CategoryCategoryAttributes::CategoryAttributeId,
                                )
                                .to(CategoryAttributes::Table, CategoryAttributes::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("ux_cca_category_attribute")
                        .table(CategoryCategoryAttributes::Table)
                        .col(CategoryCategoryAttributes::CategoryId)
                        .col(CategoryCategoryAttributes::CategoryAttributeId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_cca_attribute")
                        .table(CategoryCategoryAttributes::Table)
                        .col(CategoryCategoryAttributes::CategoryAttributeId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(CategoryCategoryAttributes::Table)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(Table::drop().table(CategoryAttributes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Categories {
        Table,
        Id,
        SchoolId,
        AdminId,
        Name,
        HasSizeVariants,
        SizeType,
        AvailableSizes,
        ImageUrl,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum CategoryAttributes {
        Table,
        Id,
        SchoolId,
        AdminId,
        Name,
        Values,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum CategoryCategoryAttributes {
        Table,
        Id,
        CategoryId,
        CategoryAttributeId,
    }
}

mod m20240601_000002_create_product_tables {
    use super::m20240601_000001_create_catalog_tables::{Categories, CategoryAttributes};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000002_create_product_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Products::SchoolId).integer().not_null())
                        .col(ColumnDef::new(Products::AdminId).uuid().not_null())
                        .col(ColumnDef::new(Products::CategoryId).integer().not_null())
                        .col(ColumnDef::new(Products::Name).string_len(150).not_null())
                        .col(
                            ColumnDef::new(Products::ProductCode)
                                .string_len(50)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::HasVariants)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Products::Mrp).decimal_len(16, 2).null())
                        .col(
                            ColumnDef::new(Products::PurchasePrice)
                                .decimal_len(16, 2)
                                .null(),
                        )
                        .col(ColumnDef::new(Products::Quantity).integer().null())
                        .col(ColumnDef::new(Products::ReorderLevel).integer().null())
                        .col(ColumnDef::new(Products::Remarks).text().null())
                        .col(
                            ColumnDef::new(Products::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_category")
                                .from(Products::Table, Products::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("ux_products_school_code")
                        .table(Products::Table)
                        .col(Products::SchoolId)
                        .col(Products::ProductCode)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductVariants::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductVariants::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::ProductId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::AttributeId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::AttributeValue)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::Mrp)
                                .decimal_len(16, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::PurchasePrice)
                                .decimal_len(16, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::ReorderLevel)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_variants_product")
                                .from(ProductVariants::Table, ProductVariants::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_variants_attribute")
                                .from(ProductVariants::Table, ProductVariants::AttributeId)
                                .to(CategoryAttributes::Table, CategoryAttributes::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_product_variants_product")
                        .table(ProductVariants::Table)
                        .col(ProductVariants::ProductId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductImages::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductImages::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ProductImages::ProductId).integer().not_null())
                        .col(ColumnDef::new(ProductImages::ImageUrl).string().not_null())
                        .col(ColumnDef::new(ProductImages::FileName).string().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_images_product")
                                .from(ProductImages::Table, ProductImages::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_product_images_product")
                        .table(ProductImages::Table)
                        .col(ProductImages::ProductId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductImages::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductVariants::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Products {
        Table,
        Id,
        SchoolId,
        AdminId,
        CategoryId,
        Name,
        ProductCode,
        HasVariants,
        Mrp,
        PurchasePrice,
        Quantity,
        ReorderLevel,
        Remarks,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum ProductVariants {
        Table,
        Id,
        ProductId,
        AttributeId,
        AttributeValue,
        Mrp,
        PurchasePrice,
        Quantity,
        ReorderLevel,
    }

    #[derive(DeriveIden)]
    enum ProductImages {
        Table,
        Id,
        ProductId,
        ImageUrl,
        FileName,
    }
}

mod m20240601_000003_create_vendors_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000003_create_vendors_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Vendors::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Vendors::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Vendors::SchoolId).integer().not_null())
                        .col(ColumnDef::new(Vendors::AdminId).uuid().not_null())
                        .col(ColumnDef::new(Vendors::VendorCode).string_len(20).null())
                        .col(
                            ColumnDef::new(Vendors::CompanyName)
                                .string_len(200)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Vendors::GstNumber).string_len(50).not_null())
                        .col(
                            ColumnDef::new(Vendors::ContactPerson)
                                .string_len(150)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Vendors::Designation).string_len(100).null())
                        .col(ColumnDef::new(Vendors::Phone).string_len(20).not_null())
                        .col(ColumnDef::new(Vendors::Email).string_len(150).not_null())
                        .col(ColumnDef::new(Vendors::Address).string_len(500).not_null())
                        .col(ColumnDef::new(Vendors::BankName).string_len(150).null())
                        .col(ColumnDef::new(Vendors::AccountNumber).string_len(50).null())
                        .col(ColumnDef::new(Vendors::IfscCode).string_len(20).null())
                        .col(
                            ColumnDef::new(Vendors::ProductsSupplied)
                                .string_len(500)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Vendors::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Vendors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("ux_vendors_school_company")
                        .table(Vendors::Table)
                        .col(Vendors::SchoolId)
                        .col(Vendors::CompanyName)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Vendors::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Vendors {
        Table,
        Id,
        SchoolId,
        AdminId,
        VendorCode,
        CompanyName,
        GstNumber,
        ContactPerson,
        Designation,
        Phone,
        Email,
        Address,
        BankName,
        AccountNumber,
        IfscCode,
        ProductsSupplied,
        IsActive,
        CreatedAt,
    }
}

mod m20240601_000004_create_purchase_tables {
    use super::m20240601_000003_create_vendors_table::Vendors;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000004_create_purchase_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Purchases::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Purchases::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Purchases::SchoolId).integer().not_null())
                        .col(ColumnDef::new(Purchases::AdminId).uuid().not_null())
                        .col(ColumnDef::new(Purchases::VendorId).integer().not_null())
                        .col(
                            ColumnDef::new(Purchases::PurchaseOrderNumber)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Purchases::PurchaseDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Purchases::Status)
                                .string_len(20)
                                .not_null()
                                .default("Pending"),
                        )
                        .col(
                            ColumnDef::new(Purchases::TotalAmount)
                                .decimal_len(16, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Purchases::Remarks).string_len(500).null())
                        .col(
                            ColumnDef::new(Purchases::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Purchases::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchases_vendor")
                                .from(Purchases::Table, Purchases::VendorId)
                                .to(Vendors::Table, Vendors::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("ux_purchases_school_number")
                        .table(Purchases::Table)
                        .col(Purchases::SchoolId)
                        .col(Purchases::PurchaseOrderNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseItems::PurchaseId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseItems::ProductId).integer().not_null())
                        .col(ColumnDef::new(PurchaseItems::VariantId).integer().null())
                        .col(
                            ColumnDef::new(PurchaseItems::QuantityOrdered)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseItems::UnitCost)
                                .decimal_len(16, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseItems::TotalCost)
                                .decimal_len(16, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseItems::QuantityReceived)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(PurchaseItems::Remarks).string_len(500).null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_items_purchase")
                                .from(PurchaseItems::Table, PurchaseItems::PurchaseId)
                                .to(Purchases::Table, Purchases::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_items_purchase")
                        .table(PurchaseItems::Table)
                        .col(PurchaseItems::PurchaseId)
                        .to_owned(),
                )
                .await?;

            // purchase_order_id carries no foreign key so entries survive deletion of their purchase.
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseInvoiceEntries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseInvoiceEntries::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseInvoiceEntries::PurchaseOrderId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseInvoiceEntries::InvoiceNumber)
                                .string_len(50)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseInvoiceEntries::InvoiceAmount)
                                .decimal_len(16, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseInvoiceEntries::InvoiceDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseInvoiceEntries::DueDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseInvoiceEntries::PurchaseItemId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseInvoiceEntries::DeliveryDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseInvoiceEntries::QuantityReceived)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseInvoiceEntries::DeliveryNotes)
                                .string_len(500)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseInvoiceEntries::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoice_entries_item")
                                .from(
                                    PurchaseInvoiceEntries::Table,
                                    PurchaseInvoiceEntries::PurchaseItemId,
                                )
                                .to(PurchaseItems::Table, PurchaseItems::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoice_entries_purchase_order")
                        .table(PurchaseInvoiceEntries::Table)
                        .col(PurchaseInvoiceEntries::PurchaseOrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoice_entries_item")
                        .table(PurchaseInvoiceEntries::Table)
                        .col(PurchaseInvoiceEntries::PurchaseItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseInvoiceEntries::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Purchases::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Purchases {
        Table,
        Id,
        SchoolId,
        AdminId,
        VendorId,
        PurchaseOrderNumber,
        PurchaseDate,
        Status,
        TotalAmount,
        Remarks,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum PurchaseItems {
        Table,
        Id,
        PurchaseId,
        ProductId,
        VariantId,
        QuantityOrdered,
        UnitCost,
        TotalCost,
        QuantityReceived,
        Remarks,
    }

    #[derive(DeriveIden)]
    enum PurchaseInvoiceEntries {
        Table,
        Id,
        PurchaseOrderId,
        InvoiceNumber,
        InvoiceAmount,
        InvoiceDate,
        DueDate,
        PurchaseItemId,
        DeliveryDate,
        QuantityReceived,
        DeliveryNotes,
        CreatedAt,
    }
}
