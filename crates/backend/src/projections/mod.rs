pub mod p909_product_catalog;
