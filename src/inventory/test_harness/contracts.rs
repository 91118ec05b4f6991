//! Declarative contracts for every inventory entity
//!
//! One [`SchemaExpectation`] per table, consumed by the parametrized
//! validator. Each contract mirrors the table's migration DDL: semantic
//! column types, nullability, server defaults, and the named check, unique,
//! and foreign-key constraints.

use super::expectation::{ColumnExpectation as Col, SchemaExpectation};

/// Category hierarchy: name + level pairs are unique, slugs are unique, and
/// `parent_id` points back into the same table.
pub fn category() -> SchemaExpectation {
    SchemaExpectation::for_table("category")
        .column(Col::integer("id"))
        .column(Col::text("name", 100))
        .column(Col::text("slug", 120))
        .column(Col::boolean("is_active").default_value("false"))
        .column(Col::integer("level").default_value("100"))
        .column(Col::integer("parent_id").nullable())
        .check("category_name_length_check")
        .check("category_slug_length_check")
        .unique("uq_category_name_level")
        .unique("uq_category_slug")
        .foreign_key(["parent_id"], "category")
}

/// Product catalog entry. Carries two independent foreign keys; both must be
/// present for the contract to hold.
pub fn product() -> SchemaExpectation {
    SchemaExpectation::for_table("product")
        .column(Col::integer("id"))
        .column(Col::uuid("pid").default_value("uuid_generate_v4()"))
        .column(Col::text("name", 200))
        .column(Col::text("slug", 220))
        .column(Col::unbounded_text("description").nullable())
        .column(Col::boolean("is_digital").default_value("false"))
        .column(Col::timestamp("created_at").default_value("CURRENT_TIMESTAMP"))
        .column(Col::timestamp("updated_at").default_value("CURRENT_TIMESTAMP"))
        .column(Col::boolean("is_active").default_value("false"))
        .column(Col::enumerated("stock_status", "status_enum").default_value("oos"))
        .column(Col::integer("category_id"))
        .column(Col::integer("seasonal_event").nullable())
        .check("product_name_length_check")
        .check("product_slug_length_check")
        .unique("uq_product_name")
        .unique("uq_product_slug")
        .unique("uq_product_pid")
        .foreign_key(["category_id"], "category")
        .foreign_key(["seasonal_event"], "seasonal_events")
}

/// Sellable variant of a product; price carries precision AND scale.
pub fn product_line() -> SchemaExpectation {
    SchemaExpectation::for_table("product_line")
        .column(Col::integer("id"))
        .column(Col::decimal("price", 5, 2))
        .column(Col::uuid("sku").default_value("uuid_generate_v4()"))
        .column(Col::integer("stock_qty").default_value("0"))
        .column(Col::boolean("is_active").default_value("false"))
        .column(Col::integer("order"))
        .column(Col::float("weight"))
        .column(Col::timestamp("created_at").default_value("CURRENT_TIMESTAMP"))
        .column(Col::integer("product_id"))
        .check("product_line_max_value")
        .check("product_order_line_range")
        .unique("uq_product_line_order_product_id")
        .unique("uq_product_line_sku")
        .foreign_key(["product_id"], "product")
}

pub fn product_image() -> SchemaExpectation {
    SchemaExpectation::for_table("product_image")
        .column(Col::integer("id"))
        .column(Col::text("alternative_text", 100))
        .column(Col::text("url", 100))
        .column(Col::integer("order"))
        .column(Col::integer("product_line_id"))
        .check("product_image_order_range")
        .check("product_image_alternative_length_check")
        .check("product_image_url_length_check")
        .unique("uq_product_image_order_product_line_id")
        .foreign_key(["product_line_id"], "product_line")
}

pub fn seasonal_events() -> SchemaExpectation {
    SchemaExpectation::for_table("seasonal_events")
        .column(Col::integer("id"))
        .column(Col::timestamp("start_date"))
        .column(Col::timestamp("end_date"))
        .column(Col::text("name", 100))
        .check("seasonal_event_name_length_check")
        .unique("uq_seasonal_event_name")
}

pub fn attributes() -> SchemaExpectation {
    SchemaExpectation::for_table("attributes")
        .column(Col::integer("id"))
        .column(Col::text("name", 100))
        .column(Col::text("description", 100).nullable())
        .check("attribute_name_length_check")
        .unique("uq_attribute_name")
}

/// Product type hierarchy; `parent` is a self reference like category's.
pub fn product_type() -> SchemaExpectation {
    SchemaExpectation::for_table("product_type")
        .column(Col::integer("id"))
        .column(Col::text("name", 100))
        .column(Col::integer("level"))
        .column(Col::integer("parent").nullable())
        .check("product_type_name_length_check")
        .unique("uq_product_type_name_level")
        .foreign_key(["parent"], "product_type")
}

pub fn attribute_value() -> SchemaExpectation {
    SchemaExpectation::for_table("attribute_value")
        .column(Col::integer("id"))
        .column(Col::text("attribute_value", 100))
        .column(Col::integer("attribute_id"))
        .check("attribute_value_length_check")
        .unique("uq_attribute_value_value_id")
        .foreign_key(["attribute_id"], "attributes")
}

/// Join table between product lines and attribute values; two independent
/// foreign keys.
pub fn product_line_attribute_value() -> SchemaExpectation {
    SchemaExpectation::for_table("product_line_attribute_value")
        .column(Col::integer("id"))
        .column(Col::integer("attribute_value_id"))
        .column(Col::integer("product_line_id"))
        .unique("uq_attribute_value_product_line_id")
        .foreign_key(["attribute_value_id"], "attribute_value")
        .foreign_key(["product_line_id"], "product_line")
}

/// Join table between products and product types; two independent foreign
/// keys.
pub fn product_product_type() -> SchemaExpectation {
    SchemaExpectation::for_table("product_product_type")
        .column(Col::integer("id"))
        .column(Col::integer("product_id"))
        .column(Col::integer("product_type_id"))
        .unique("uq_product_product_type_id")
        .foreign_key(["product_id"], "product")
        .foreign_key(["product_type_id"], "product_type")
}

/// Every entity contract, for sweeping the whole schema.
pub fn all() -> Vec<SchemaExpectation> {
    vec![
        category(),
        seasonal_events(),
        product(),
        product_line(),
        product_image(),
        attributes(),
        product_type(),
        attribute_value(),
        product_line_attribute_value(),
        product_product_type(),
    ]
}
